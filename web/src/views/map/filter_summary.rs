use explorer_state::category_tree::SelectionGroup;
use explorer_state::store::{Action, Topic};
use leptos::prelude::*;
use shared_types::CategoryId;
use thaw::{Button, ButtonAppearance, ButtonSize, Tag};

use crate::state::use_app_store;

/// Active category filters grouped by top-level category.
#[component]
pub fn FilterSummary() -> impl IntoView {
    let app = use_app_store();
    let preview = app.config().filter_preview;
    // Groups whose "+N" was expanded.
    let expanded = RwSignal::new(Vec::<CategoryId>::new());

    let groups = Memo::new(move |_| {
        app.with(Topic::Categories, |_| ());
        app.with(Topic::Filters, |state| {
            state
                .category_tree
                .grouped_selection(&state.criteria.selected_category_ids)
        })
    });

    view! {
        <Show when=move || groups.with(|groups| !groups.is_empty())>
            <div class="filter-summary">
                {move || {
                    let open = expanded.get();
                    groups
                        .get()
                        .into_iter()
                        .map(|group| {
                            let limit = if open.contains(&group.top_id) { usize::MAX } else { preview };
                            view! { <SummaryGroup group limit expanded /> }
                        })
                        .collect_view()
                }}
                <Button
                    appearance=ButtonAppearance::Subtle
                    size=ButtonSize::Small
                    on_click=move |_| {
                        expanded.set(Vec::new());
                        app.dispatch(Action::ClearCategoryFilters);
                    }
                >
                    "Clear filters"
                </Button>
            </div>
        </Show>
    }
}

#[component]
fn SummaryGroup(
    group: SelectionGroup,
    limit: usize,
    expanded: RwSignal<Vec<CategoryId>>,
) -> impl IntoView {
    let app = use_app_store();
    let top_id = group.top_id;
    let (shown, hidden) = group.preview(limit);

    let chips = shown
        .iter()
        .map(|item| {
            let id = item.id;
            let name = item.name.clone();
            view! {
                <span class="filter-chip">
                    <Tag>{name}</Tag>
                    <button
                        class="filter-chip-remove"
                        aria-label="Remove filter"
                        on:click=move |_| app.dispatch(Action::ToggleCategory(id))
                    >
                        "×"
                    </button>
                </span>
            }
        })
        .collect_view();

    view! {
        <div class="filter-group">
            <span class="filter-group-title">{group.top_name.clone()}</span>
            {chips}
            {(hidden > 0)
                .then(|| {
                    view! {
                        <button
                            class="filter-more"
                            on:click=move |_| expanded.update(|ids| ids.push(top_id))
                        >
                            {format!("+{}", hidden)}
                        </button>
                    }
                })}
        </div>
    }
}
