use explorer_state::flags::{FlagBook, PlaceFlags};
use leptos::prelude::*;
use shared_types::PlaceId;
use thaw::{Button, ButtonAppearance, Flex};

use crate::utils::storage::LocalStorage;

#[derive(Clone, Copy)]
enum FlagChange {
    Like,
    Pin,
    CheckIn,
}

/// Like / pin / check-in buttons backed by local storage.
#[component]
pub fn PlaceFlagButtons(place_id: PlaceId) -> impl IntoView {
    let flags = RwSignal::new(PlaceFlags::default());

    // Storage is only readable after hydration.
    Effect::new(move |_| {
        flags.set(FlagBook::load(&LocalStorage).get(place_id));
    });

    let apply = move |change: FlagChange| {
        let mut book = FlagBook::load(&LocalStorage);
        let next = match change {
            FlagChange::Like => book.toggle_like(place_id),
            FlagChange::Pin => book.toggle_pin(place_id),
            FlagChange::CheckIn => book.check_in(place_id),
        };
        if let Err(e) = book.save(&LocalStorage) {
            leptos::logging::warn!("Failed to save place flags: {}", e);
        }
        flags.set(next);
    };

    let appearance = move |on: bool| {
        if on {
            ButtonAppearance::Primary
        } else {
            ButtonAppearance::Secondary
        }
    };

    view! {
        <Flex class="place-flags">
            <Button
                appearance=Signal::derive(move || appearance(flags.get().liked))
                on_click=move |_| apply(FlagChange::Like)
            >
                {move || if flags.get().liked { "♥ Liked" } else { "♡ Like" }}
            </Button>
            <Button
                appearance=Signal::derive(move || appearance(flags.get().pinned))
                on_click=move |_| apply(FlagChange::Pin)
            >
                {move || if flags.get().pinned { "Pinned" } else { "Pin" }}
            </Button>
            <Button
                appearance=Signal::derive(move || appearance(flags.get().checked_in))
                disabled=Signal::derive(move || flags.get().checked_in)
                on_click=move |_| apply(FlagChange::CheckIn)
            >
                {move || if flags.get().checked_in { "Checked in" } else { "Check in" }}
            </Button>
        </Flex>
    }
}
