use explorer_state::sidebar::PlaceCardModel;
use explorer_state::store::{Action, Topic};
use explorer_state::SelectionOrigin;
use leptos::prelude::*;
use thaw::Tag;

use crate::state::use_app_store;

#[component]
pub fn PlaceCard(card: PlaceCardModel) -> impl IntoView {
    let app = use_app_store();
    let id = card.id;

    let is_selected =
        move || app.with(Topic::Selection, |state| state.interaction.selected_id() == Some(id));
    let is_hovered = move || app.with(Topic::Hover, |state| state.interaction.hovered_id() == Some(id));

    let background = card.image.style();

    view! {
        <article
            id=card.dom_id
            class="place-card"
            class:selected=is_selected
            class:hovered=is_hovered
            on:mouseenter=move |_| app.dispatch(Action::HoverPlace(id))
            on:mouseleave=move |_| app.dispatch(Action::LeavePlace(id))
            on:click=move |_| {
                app.dispatch(Action::TogglePlace {
                    place_id: id,
                    origin: SelectionOrigin::Sidebar,
                })
            }
        >
            <div class="place-card-image" style=background></div>
            <div class="place-card-body">
                <h3 class="place-card-title">{card.title}</h3>
                <p class="place-card-address">{card.address}</p>
                <div class="place-card-facilities">
                    {card
                        .facilities
                        .into_iter()
                        .map(|name| view! { <Tag>{name}</Tag> })
                        .collect_view()}
                    {card
                        .hidden_facilities
                        .map(|names| {
                            view! {
                                <span class="place-card-more" title=names>
                                    {format!("+{}", card.hidden_count)}
                                </span>
                            }
                        })}
                </div>
                <a
                    class="place-card-link"
                    href=format!("/places/{}", id)
                    on:click=|ev| ev.stop_propagation()
                >
                    "View details"
                </a>
            </div>
        </article>
    }
}
