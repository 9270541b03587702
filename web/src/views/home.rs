use leptos::prelude::*;

use crate::components::{region_dropdown::RegionDropdown, search_bar::SearchBar};
use crate::state::use_app_store;
use crate::views::{map::ExploreMap, sidebar::PlacesSidebar};

#[component]
pub fn HomePage() -> impl IntoView {
    let app = use_app_store();

    // Effects only run in the browser, so fetching starts after hydration.
    Effect::new(move |_| {
        app.load_missing();
    });

    view! {
        <div class="explorer-page">
            <header class="explorer-header">
                <h1 class="explorer-title">"Explore"</h1>
                <SearchBar />
                <RegionDropdown />
            </header>
            <div class="explorer-body">
                <ExploreMap />
                <PlacesSidebar />
            </div>
        </div>
    }
}
