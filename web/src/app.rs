use leptos::prelude::*;
use leptos_meta::{provide_meta_context, MetaTags, Stylesheet, Title};
use leptos_router::{
    components::{Route, Router, Routes},
    ParamSegment, StaticSegment,
};
use thaw::ssr::SSRMountStyleProvider;
use thaw::ConfigProvider;

use crate::state::provide_app_store;
use crate::views::{home::HomePage, not_found::NotFoundPage, place_details::PlaceDetailsPage};

const MAPLIBRE_VERSION: &str = "4.7.1";

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <SSRMountStyleProvider>
            <!DOCTYPE html>
            <html lang="en">
                <head>
                    <meta charset="utf-8"/>
                    <meta name="viewport" content="width=device-width, initial-scale=1"/>
                    <link
                        rel="stylesheet"
                        href=format!("https://unpkg.com/maplibre-gl@{}/dist/maplibre-gl.css", MAPLIBRE_VERSION)
                    />
                    <script
                        src=format!("https://unpkg.com/maplibre-gl@{}/dist/maplibre-gl.js", MAPLIBRE_VERSION)
                    ></script>
                    <AutoReload options=options.clone() />
                    <HydrationScripts options/>
                    <MetaTags/>
                </head>
                <body>
                    <App/>
                </body>
            </html>
        </SSRMountStyleProvider>
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    provide_app_store();

    view! {
        <Stylesheet id="leptos" href="/pkg/web.css"/>
        <Title text="Places Explorer"/>

        <ConfigProvider>
            <Router>
                <main>
                    <Routes fallback=NotFoundPage>
                        <Route path=StaticSegment("") view=HomePage/>
                        <Route path=(StaticSegment("places"), ParamSegment("id")) view=PlaceDetailsPage/>
                    </Routes>
                </main>
            </Router>
        </ConfigProvider>
    }
}
