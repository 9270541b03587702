use explorer_state::store::Action;
use leptos::prelude::*;
use thaw::{Input, InputType};

use crate::state::use_app_store;

/// Free-text search over title and address of the loaded places.
#[component]
pub fn SearchBar() -> impl IntoView {
    let app = use_app_store();
    let text = RwSignal::new(app.with_untracked(|state| state.criteria.search_text.clone()));

    Effect::new(move |_| {
        let current = text.get();
        if app.with_untracked(|state| state.criteria.search_text != current) {
            app.dispatch(Action::SetSearchText(current));
        }
    });

    view! {
        <div class="search-bar">
            <Input
                input_type=InputType::Search
                placeholder="Search places, cities or zip codes"
                value=text
            />
        </div>
    }
}
