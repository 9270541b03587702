use explorer_state::sidebar::PlaceCardModel;
use explorer_state::store::Topic;
use leptos::prelude::*;

use crate::components::{ErrorView, LoadingView};
use crate::state::use_app_store;
use crate::views::sidebar::place_card::PlaceCard;

#[component]
pub fn PlacesSidebar() -> impl IntoView {
    let app = use_app_store();
    let config = app.config();
    let preview = config.facility_preview;

    let cards = Memo::new(move |_| {
        app.with(Topic::Categories, |_| ());
        app.with(Topic::Places, |state| {
            state
                .places
                .iter()
                .map(|place| PlaceCardModel::build(place, &state.category_tree, preview))
                .collect::<Vec<_>>()
        })
    });

    let open = move || app.with(Topic::Layout, |state| state.sidebar_open);

    // Bring the selected card into view; the list may not be mounted yet.
    #[cfg(feature = "hydrate")]
    {
        let max_attempts = config.scroll_max_attempts;
        Effect::new(move |_| {
            let selected = app.with(Topic::Selection, |state| state.interaction.selected_id());
            let visible = open();
            cards.track();
            if let Some(place_id) = selected.filter(|_| visible) {
                scroll::to_card(
                    explorer_state::sidebar::card_dom_id(place_id),
                    explorer_state::sidebar::ScrollRetry::new(max_attempts),
                );
            }
        });
    }

    view! {
        <aside class="places-sidebar" class:open=open>
            <header class="places-sidebar-header">
                <h2>"Places"</h2>
                <span class="places-count">{move || cards.with(Vec::len)}</span>
            </header>
            {move || {
                let (loading, error) =
                    app.with(Topic::Status, |state| (state.places_loading(), state.error.clone()));
                let empty = cards.with(Vec::is_empty);
                if empty && loading {
                    view! { <LoadingView message=Some("Finding places nearby...".to_string()) /> }
                        .into_any()
                } else if empty && error.is_some() {
                    view! { <ErrorView message=error /> }.into_any()
                } else if empty {
                    view! { <p class="places-empty">"No places found."</p> }.into_any()
                } else {
                    view! {
                        <div class="places-list">
                            <For
                                each=move || cards.get()
                                key=|card| (card.id, card.facilities.clone())
                                children=|card| view! { <PlaceCard card /> }
                            />
                        </div>
                    }
                    .into_any()
                }
            }}
        </aside>
    }
}

#[cfg(feature = "hydrate")]
mod scroll {
    use explorer_state::sidebar::{ScrollRetry, ScrollStep};
    use leptos::prelude::*;
    use web_sys::{ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};

    pub fn to_card(dom_id: String, mut retry: ScrollRetry) {
        let card = document().get_element_by_id(&dom_id);
        match retry.next(card.is_some()) {
            ScrollStep::Scrolled => {
                if let Some(card) = card {
                    let options = ScrollIntoViewOptions::new();
                    options.set_behavior(ScrollBehavior::Smooth);
                    options.set_block(ScrollLogicalPosition::Nearest);
                    card.scroll_into_view_with_scroll_into_view_options(&options);
                }
            }
            ScrollStep::Retry => request_animation_frame(move || to_card(dom_id, retry)),
            ScrollStep::GiveUp => {
                leptos::logging::warn!(
                    "Card {} not mounted after {} frames",
                    dom_id,
                    retry.attempts()
                );
            }
        }
    }
}
