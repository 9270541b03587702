use std::collections::BTreeSet;

use explorer_state::category_tree::CheckState;
use explorer_state::store::{Action, Topic};
use explorer_state::RequestKind;
use leptos::prelude::*;
use shared_types::CategoryId;
use thaw::{Button, ButtonAppearance, ButtonSize, Flex};

use crate::components::{ErrorView, LoadingView};
use crate::state::use_app_store;

#[derive(Clone, PartialEq)]
struct TopCategory {
    id: CategoryId,
    name: String,
    icon: Option<String>,
}

#[component]
pub fn CategoryPanel() -> impl IntoView {
    let app = use_app_store();

    let tops = Memo::new(move |_| {
        app.with(Topic::Categories, |state| {
            let tree = &state.category_tree;
            tree.roots()
                .iter()
                .map(|root| {
                    let entry = tree.node(*root);
                    TopCategory {
                        id: entry.id,
                        name: entry.name.clone(),
                        icon: entry.icon.clone(),
                    }
                })
                .collect::<Vec<_>>()
        })
    });

    let active_top = Memo::new(move |_| {
        app.with(Topic::Filters, |state| state.criteria.selected_top_category_id)
    });

    view! {
        <div class="category-panel">
            {move || {
                let (error, loading) = app.with(Topic::Status, |state| {
                    (state.categories.error.clone(), state.is_loading(RequestKind::Categories))
                });
                if tops.with(Vec::is_empty) {
                    if let Some(message) = error {
                        return view! { <ErrorView message=Some(message) /> }.into_any();
                    }
                    if loading {
                        return view! {
                            <LoadingView message=Some("Loading categories...".to_string()) compact=true />
                        }
                        .into_any();
                    }
                }
                ().into_any()
            }}

            <Flex class="category-chooser">
                <For
                    each=move || tops.get()
                    key=|top| top.id
                    children=move |top| {
                        let id = top.id;
                        let is_active = move || active_top.get() == Some(id);
                        view! {
                            <Button
                                appearance=Signal::derive(move || {
                                    if is_active() {
                                        ButtonAppearance::Primary
                                    } else {
                                        ButtonAppearance::Secondary
                                    }
                                })
                                on_click=move |_| {
                                    if is_active() {
                                        app.dispatch(Action::SetCategoryPanelOpen(true));
                                    } else {
                                        app.dispatch(Action::SetTopCategory(Some(id)));
                                    }
                                }
                            >
                                {top.icon.map(|icon| view! { <img class="category-icon" src=icon alt="" /> })}
                                {top.name}
                            </Button>
                        }
                    }
                />
            </Flex>

            {move || {
                let open = app.with(Topic::Layout, |state| state.category_panel_open);
                active_top.get().filter(|_| open).map(|top_id| view! { <CategoryTreePanel top_id /> })
            }}
        </div>
    }
}

#[component]
fn CategoryTreePanel(top_id: CategoryId) -> impl IntoView {
    let app = use_app_store();
    // Second-level branches whose children are listed.
    let open_branches = RwSignal::new(BTreeSet::<CategoryId>::new());

    let rows = Memo::new(move |_| {
        app.with(Topic::Categories, |_| ());
        let open = open_branches.get();
        app.with(Topic::Filters, |state| {
            let tree = &state.category_tree;
            let selection = &state.criteria.selected_category_ids;
            let Some(top) = tree.find(top_id) else {
                return (String::new(), CheckState::Unchecked, Vec::new());
            };
            (
                tree.node(top).name.clone(),
                tree.check_state(top, selection),
                tree.panel_rows(top, selection, &open),
            )
        })
    });

    view! {
        <div class="category-tree-panel">
            <div class="category-tree-header">
                <h3>{move || rows.with(|(name, _, _)| name.clone())}</h3>
                <Button
                    size=ButtonSize::Small
                    on_click=move |_| app.dispatch(Action::SetCategoryPanelOpen(false))
                >
                    "Close"
                </Button>
            </div>

            <label class="category-row select-all">
                <input
                    type="checkbox"
                    prop:checked=move || rows.with(|(_, all, _)| *all == CheckState::Checked)
                    prop:indeterminate=move || rows.with(|(_, all, _)| *all == CheckState::Partial)
                    on:change=move |_| app.dispatch(Action::ToggleCategorySubtree(top_id))
                />
                "Select all"
            </label>

            <ul class="category-tree">
                {move || {
                    rows.with(|(_, _, rows)| {
                        rows.iter()
                            .cloned()
                            .map(|row| {
                                let id = row.id;
                                let action = if row.has_children {
                                    Action::ToggleCategorySubtree(id)
                                } else {
                                    Action::ToggleCategory(id)
                                };
                                let expander = (row.depth == 1 && row.has_children)
                                    .then(|| {
                                        view! {
                                            <button
                                                class="category-expand"
                                                aria-expanded=row.expanded.to_string()
                                                on:click=move |_| {
                                                    open_branches.update(|open| {
                                                        if !open.remove(&id) {
                                                            open.insert(id);
                                                        }
                                                    })
                                                }
                                            >
                                                {if row.expanded { "−" } else { "+" }}
                                            </button>
                                        }
                                    });
                                view! {
                                    <li
                                        class="category-row"
                                        class:branch=row.has_children
                                        style=format!("padding-left: {}rem", (row.depth.saturating_sub(1)) as f32 * 1.25)
                                    >
                                        <label>
                                            <input
                                                type="checkbox"
                                                prop:checked=row.state == CheckState::Checked
                                                prop:indeterminate=row.state == CheckState::Partial
                                                on:change=move |_| app.dispatch(action.clone())
                                            />
                                            {row.name}
                                        </label>
                                        {expander}
                                    </li>
                                }
                            })
                            .collect_view()
                    })
                }}
            </ul>
        </div>
    }
}
