use explorer_state::store::{Action, Topic};
use leptos::html::Div;
use leptos::prelude::*;
use thaw::{Button, ButtonAppearance};

use crate::components::{ErrorView, LoadingView};
use crate::state::use_app_store;
use crate::views::map::category_panel::CategoryPanel;
use crate::views::map::filter_summary::FilterSummary;

#[component]
pub fn ExploreMap() -> impl IntoView {
    let app = use_app_store();
    let container = NodeRef::<Div>::new();
    let map_error = RwSignal::new(None::<String>);

    #[cfg(feature = "hydrate")]
    binding::bind(app, container, map_error);

    let sidebar_open = move || app.with(Topic::Layout, |state| state.sidebar_open);

    view! {
        <div class="explore-map">
            <div class="explore-map-canvas" node_ref=container></div>

            <div class="explore-map-controls">
                <CategoryPanel />
                <FilterSummary />
            </div>

            <div class="explore-map-status">
                {move || {
                    let (loading, error) =
                        app.with(Topic::Status, |state| (state.places_loading(), state.error.clone()));
                    if let Some(message) = error {
                        view! {
                            <ErrorView
                                message=Some(message)
                                on_dismiss=move || app.dispatch(Action::ClearError)
                            />
                        }
                        .into_any()
                    } else if loading {
                        view! {
                            <LoadingView message=Some("Loading places...".to_string()) compact=true />
                        }
                        .into_any()
                    } else {
                        ().into_any()
                    }
                }}
                {move || map_error.get().map(|message| view! { <ErrorView message=Some(message) /> })}
            </div>

            <Button
                class="sidebar-toggle"
                appearance=ButtonAppearance::Primary
                on_click=move |_| app.dispatch(Action::ToggleSidebar)
            >
                {move || if sidebar_open() { "Hide list" } else { "Show list" }}
            </Button>
        </div>
    }
}

/// Wires the MapLibre instance to the store. Map events never touch the
/// controller directly: they fire synchronously inside controller calls
/// (e.g. `easeTo`), so reconciliation is deferred to the next frame.
#[cfg(feature = "hydrate")]
mod binding {
    use explorer_state::map::{ClusterLookup, MapController};
    use explorer_state::map::layers::{CLUSTERS_LAYER, UNCLUSTERED_LAYER};
    use explorer_state::store::{Action, Topic};
    use explorer_state::SelectionOrigin;
    use leptos::html::Div;
    use leptos::prelude::*;
    use leptos::task::spawn_local;
    use shared_types::PlaceId;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    use crate::state::AppStore;
    use crate::views::map::maplibre::{self, MaplibreSurface, RenderedFeature};

    type Controller = StoredValue<Option<MapController<MaplibreSurface>>, LocalStorage>;

    const RECONCILE_EVENTS: [&str; 6] = ["move", "zoom", "moveend", "zoomend", "sourcedata", "render"];

    pub fn bind(app: AppStore, container: NodeRef<Div>, map_error: RwSignal<Option<String>>) {
        let controller: Controller = StoredValue::new_local(None);
        let map_loaded = RwSignal::new(false);
        let reconcile_scheduled = StoredValue::new(false);
        let map_hovered = StoredValue::new(None::<PlaceId>);

        let schedule_reconcile = move || {
            if reconcile_scheduled.get_value() {
                return;
            }
            reconcile_scheduled.set_value(true);
            request_animation_frame(move || {
                reconcile_scheduled.set_value(false);
                let selected = app.with_untracked(|state| state.selected_place().cloned());
                controller.update_value(|controller| {
                    if let Some(controller) = controller {
                        controller.reconcile_popup(selected.as_ref());
                    }
                });
            });
        };

        // Create the map once the default location is known.
        Effect::new(move |_| {
            let Some(location) = app.with(Topic::Status, |state| state.default_location) else {
                return;
            };
            let Some(element) = container.get() else {
                return;
            };
            if controller.with_value(Option::is_some) {
                return;
            }

            let settings = app.config().map;
            let center = shared_types::LngLat::new(location.longitude, location.latitude);
            let map = match maplibre::create_map(&element, &settings.style_url, center, settings.initial_zoom) {
                Ok(map) => map,
                Err(e) => {
                    leptos::logging::error!("Map initialisation failed: {}", e);
                    map_error.set(Some("The map could not be loaded.".to_string()));
                    return;
                }
            };

            register_events(&map, app, controller, map_loaded, map_hovered, schedule_reconcile);
            maplibre::register_icons(&map);

            let surface = MaplibreSurface::new(map, move || app.dispatch(Action::ClearSelection));
            controller.set_value(Some(MapController::new(surface, settings)));
        });

        // Visible places -> clustered source.
        Effect::new(move |_| {
            if !map_loaded.get() {
                return;
            }
            let places = app.with(Topic::Places, |state| state.places.clone());
            let hovered = app.with_untracked(|state| state.hovered_place().cloned());
            let lookup = controller
                .try_update_value(|controller| {
                    let controller = controller.as_mut()?;
                    if let Err(e) = controller.sync_places(&places) {
                        leptos::logging::warn!("Failed to update place layers: {}", e);
                    }
                    // The update drops hover marks; put them back on the new data.
                    controller.apply_hover(hovered.as_ref())
                })
                .flatten();
            if let Some(lookup) = lookup {
                resolve_cluster(controller, lookup);
            }
            schedule_reconcile();
        });

        // Selection -> camera and popup.
        Effect::new(move |_| {
            if !map_loaded.get() {
                return;
            }
            let selected = app.with(Topic::Selection, |state| {
                let origin = state.selection().map(|selection| selection.origin);
                state.selected_place().cloned().zip(origin)
            });
            controller.update_value(|controller| {
                if let Some(controller) = controller {
                    controller.apply_selection(selected.as_ref().map(|(place, origin)| (place, *origin)));
                }
            });
        });

        // Hover -> feature-state, possibly via an asynchronous cluster lookup.
        Effect::new(move |_| {
            if !map_loaded.get() {
                return;
            }
            let hovered = app.with(Topic::Hover, |state| state.hovered_place().cloned());
            let lookup = controller
                .try_update_value(|controller| {
                    controller
                        .as_mut()
                        .and_then(|controller| controller.apply_hover(hovered.as_ref()))
                })
                .flatten();
            if let Some(lookup) = lookup {
                resolve_cluster(controller, lookup);
            }
        });

        on_cleanup(move || {
            controller.update_value(|controller| {
                controller.take();
            });
        });
    }

    fn resolve_cluster(controller: Controller, lookup: ClusterLookup) {
        let Some(source) = controller
            .try_with_value(|controller| controller.as_ref().and_then(|c| c.surface().places_source()))
            .flatten()
        else {
            return;
        };
        spawn_local(async move {
            match maplibre::cluster_leaves(source, lookup.cluster.cluster_id).await {
                Ok(leaves) => controller.update_value(|controller| {
                    if let Some(controller) = controller {
                        controller.resolve_cluster_hover(&lookup, &leaves);
                    }
                }),
                Err(e) => leptos::logging::warn!("Cluster lookup failed: {}", e),
            }
        });
    }

    fn first_feature(event: &JsValue) -> Option<RenderedFeature> {
        let features = js_sys::Reflect::get(event, &JsValue::from_str("features")).ok()?;
        let first = js_sys::Array::from(&features).get(0);
        if first.is_undefined() {
            return None;
        }
        RenderedFeature::parse(&first)
    }

    fn register_events(
        map: &maplibre::Map,
        app: AppStore,
        controller: Controller,
        map_loaded: RwSignal<bool>,
        map_hovered: StoredValue<Option<PlaceId>>,
        schedule_reconcile: impl Fn() + Copy + 'static,
    ) {
        let on_load = Closure::wrap(Box::new(move || {
            map_loaded.set(true);
        }) as Box<dyn FnMut()>);
        map.on("load", on_load.as_ref().unchecked_ref());
        on_load.forget();

        for event in RECONCILE_EVENTS {
            let handler = Closure::wrap(Box::new(move || schedule_reconcile()) as Box<dyn FnMut()>);
            map.on(event, handler.as_ref().unchecked_ref());
            handler.forget();
        }

        let on_point_click = Closure::wrap(Box::new(move |event: JsValue| {
            if let Some(place_id) = first_feature(&event).and_then(|f| f.place_id()) {
                app.dispatch(Action::TogglePlace {
                    place_id,
                    origin: SelectionOrigin::Map,
                });
            }
        }) as Box<dyn FnMut(JsValue)>);
        map.on_layer("click", UNCLUSTERED_LAYER, on_point_click.as_ref().unchecked_ref());
        on_point_click.forget();

        let on_cluster_click = Closure::wrap(Box::new(move |event: JsValue| {
            let Some(cluster) = first_feature(&event).and_then(|f| f.cluster()) else {
                return;
            };
            let Some(source) = controller
                .try_with_value(|controller| controller.as_ref().and_then(|c| c.surface().places_source()))
                .flatten()
            else {
                return;
            };
            spawn_local(async move {
                match maplibre::expansion_zoom(source, cluster.cluster_id).await {
                    Ok(zoom) => controller.update_value(|controller| {
                        if let Some(controller) = controller {
                            controller.expand_cluster(cluster.center, zoom);
                        }
                    }),
                    Err(e) => leptos::logging::warn!("Cluster expansion failed: {}", e),
                }
            });
        }) as Box<dyn FnMut(JsValue)>);
        map.on_layer("click", CLUSTERS_LAYER, on_cluster_click.as_ref().unchecked_ref());
        on_cluster_click.forget();

        let cursor_map = map.clone();
        let on_point_enter = Closure::wrap(Box::new(move |event: JsValue| {
            maplibre::set_cursor(&cursor_map, "pointer");
            if let Some(place_id) = first_feature(&event).and_then(|f| f.place_id()) {
                if map_hovered.get_value() != Some(place_id) {
                    map_hovered.set_value(Some(place_id));
                    app.dispatch(Action::HoverPlace(place_id));
                }
            }
        }) as Box<dyn FnMut(JsValue)>);
        map.on_layer("mousemove", UNCLUSTERED_LAYER, on_point_enter.as_ref().unchecked_ref());
        on_point_enter.forget();

        let cursor_map = map.clone();
        let on_point_leave = Closure::wrap(Box::new(move || {
            maplibre::set_cursor(&cursor_map, "");
            if let Some(place_id) = map_hovered.get_value() {
                map_hovered.set_value(None);
                app.dispatch(Action::LeavePlace(place_id));
            }
        }) as Box<dyn FnMut()>);
        map.on_layer("mouseleave", UNCLUSTERED_LAYER, on_point_leave.as_ref().unchecked_ref());
        on_point_leave.forget();

        for (event, cursor) in [("mouseenter", "pointer"), ("mouseleave", "")] {
            let cursor_map = map.clone();
            let handler = Closure::wrap(Box::new(move || {
                maplibre::set_cursor(&cursor_map, cursor);
            }) as Box<dyn FnMut()>);
            map.on_layer(event, CLUSTERS_LAYER, handler.as_ref().unchecked_ref());
            handler.forget();
        }
    }
}
