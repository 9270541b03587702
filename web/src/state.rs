//! Binds the place store to Leptos: the store lives in a `StoredValue`, and a
//! subscriber turns each dispatch into notifications on per-topic triggers.

use chrono::Utc;
use explorer_state::store::{Action, PlacesState, Store, Topic};
use explorer_state::{ExplorerConfig, RequestKind};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::server::{get_categories, get_default_location, get_regions, search_places};

#[derive(Clone, Copy)]
struct TopicTriggers {
    places: Trigger,
    filters: Trigger,
    selection: Trigger,
    hover: Trigger,
    categories: Trigger,
    regions: Trigger,
    layout: Trigger,
    status: Trigger,
}

impl TopicTriggers {
    fn new() -> Self {
        Self {
            places: Trigger::new(),
            filters: Trigger::new(),
            selection: Trigger::new(),
            hover: Trigger::new(),
            categories: Trigger::new(),
            regions: Trigger::new(),
            layout: Trigger::new(),
            status: Trigger::new(),
        }
    }

    fn get(&self, topic: Topic) -> Trigger {
        match topic {
            Topic::Places => self.places,
            Topic::Filters => self.filters,
            Topic::Selection => self.selection,
            Topic::Hover => self.hover,
            Topic::Categories => self.categories,
            Topic::Regions => self.regions,
            Topic::Layout => self.layout,
            Topic::Status => self.status,
        }
    }

    fn all(&self) -> [(Topic, Trigger); 8] {
        [
            Topic::Places,
            Topic::Filters,
            Topic::Selection,
            Topic::Hover,
            Topic::Categories,
            Topic::Regions,
            Topic::Layout,
            Topic::Status,
        ]
        .map(|topic| (topic, self.get(topic)))
    }
}

#[derive(Clone, Copy)]
pub struct AppStore {
    store: StoredValue<Store>,
    triggers: TopicTriggers,
}

impl AppStore {
    pub fn new(config: ExplorerConfig) -> Self {
        let triggers = TopicTriggers::new();
        let mut store = Store::new(config);
        store.subscribe(move |_, changes| {
            for (topic, trigger) in triggers.all() {
                if changes.touched(topic) {
                    trigger.notify();
                }
            }
        });

        Self {
            store: StoredValue::new(store),
            triggers,
        }
    }

    pub fn dispatch(&self, action: Action) {
        self.store.update_value(|store| {
            store.dispatch(action);
        });
    }

    /// Reads the state and subscribes the current reactive scope to `topic`.
    pub fn with<T>(&self, topic: Topic, read: impl FnOnce(&PlacesState) -> T) -> T {
        self.triggers.get(topic).track();
        self.store.with_value(|store| read(store.state()))
    }

    pub fn with_untracked<T>(&self, read: impl FnOnce(&PlacesState) -> T) -> T {
        self.store.with_value(|store| read(store.state()))
    }

    pub fn config(&self) -> ExplorerConfig {
        self.store.with_value(|store| store.config().clone())
    }

    fn begin_request(&self, kind: RequestKind) -> explorer_state::RequestTicket {
        self.store
            .try_update_value(|store| store.begin_request(kind))
            .unwrap_or(explorer_state::RequestTicket { kind, generation: 0 })
    }

    fn needs(&self, check: impl FnOnce(&Store) -> bool) -> bool {
        self.store.with_value(check)
    }

    /// Starts whichever fetches the current state calls for.
    pub fn load_missing(&self) {
        let now = Utc::now();
        if self.needs(Store::needs_default_location) {
            self.fetch_default_location();
        }
        if self.needs(Store::needs_places) {
            self.fetch_places();
        }
        if self.needs(|store| store.needs_categories(now)) {
            self.fetch_categories();
        }
        if self.needs(|store| store.needs_regions(now)) {
            self.fetch_regions();
        }
    }

    fn fetch_default_location(&self) {
        let app = *self;
        let ticket = app.begin_request(RequestKind::DefaultLocation);
        spawn_local(async move {
            let result = get_default_location().await.map_err(|e| e.to_string());
            app.dispatch(Action::DefaultLocationLoaded { ticket, result });
            app.load_missing();
        });
    }

    pub fn fetch_places(&self) {
        let app = *self;
        let Some(location) = app.with_untracked(|state| state.default_location) else {
            return;
        };
        let page_size = app.config().page_size;
        let ticket = app.begin_request(RequestKind::Places);
        spawn_local(async move {
            let result = search_places(location.latitude, location.longitude, None, None, page_size)
                .await
                .map_err(|e| e.to_string());
            app.dispatch(Action::PlacesLoaded { ticket, result });
        });
    }

    fn fetch_categories(&self) {
        let app = *self;
        let ticket = app.begin_request(RequestKind::Categories);
        spawn_local(async move {
            let result = get_categories().await.map_err(|e| e.to_string());
            app.dispatch(Action::CategoriesLoaded {
                ticket,
                result,
                fetched_at: Utc::now(),
            });
        });
    }

    fn fetch_regions(&self) {
        let app = *self;
        let ticket = app.begin_request(RequestKind::Regions);
        spawn_local(async move {
            let result = get_regions().await.map_err(|e| e.to_string());
            app.dispatch(Action::RegionsLoaded {
                ticket,
                result,
                fetched_at: Utc::now(),
            });
        });
    }
}

pub fn provide_app_store() -> AppStore {
    let app = AppStore::new(ExplorerConfig::default());
    provide_context(app);
    app
}

pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}
