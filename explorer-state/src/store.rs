//! The place store: one explicit state struct, a pure reducer per action and
//! a dispatcher that notifies subscribers about the topics an action touched.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use shared_types::{CategoryId, CategoryNode, DefaultLocation, Place, PlaceId, Region, RegionId};

use crate::cache::Cached;
use crate::category_tree::{toggle_all, toggle_one, CategoryTree, NodeIndex};
use crate::config::ExplorerConfig;
use crate::filter::{filter_by_criteria, FilterCriteria};
use crate::interaction::{Interaction, Selection, SelectionOrigin};
use crate::requests::{RequestKind, RequestTicket, RequestTracker};

#[derive(Debug, Clone, PartialEq)]
pub struct PlacesState {
    /// Everything the last place search returned.
    pub all_places: Vec<Place>,
    /// `all_places` after the filter engine ran.
    pub places: Vec<Place>,
    pub criteria: FilterCriteria,
    pub interaction: Interaction,
    pub default_location: Option<DefaultLocation>,
    pub error: Option<String>,
    pub sidebar_open: bool,
    pub category_panel_open: bool,
    pub categories: Cached<CategoryNode>,
    pub category_tree: CategoryTree,
    pub regions: Cached<Region>,
    requests: RequestTracker,
}

impl Default for PlacesState {
    fn default() -> Self {
        Self {
            all_places: Vec::new(),
            places: Vec::new(),
            criteria: FilterCriteria::default(),
            interaction: Interaction::default(),
            default_location: None,
            error: None,
            sidebar_open: true,
            category_panel_open: false,
            categories: Cached::default(),
            category_tree: CategoryTree::default(),
            regions: Cached::default(),
            requests: RequestTracker::default(),
        }
    }
}

impl PlacesState {
    pub fn is_loading(&self, kind: RequestKind) -> bool {
        self.requests.in_flight(kind)
    }

    /// Places (or the location they depend on) are being fetched.
    pub fn places_loading(&self) -> bool {
        self.is_loading(RequestKind::Places) || self.is_loading(RequestKind::DefaultLocation)
    }

    pub fn selection(&self) -> Option<Selection> {
        self.interaction.selection()
    }

    pub fn selected_place(&self) -> Option<&Place> {
        let id = self.interaction.selected_id()?;
        self.visible_place(id)
    }

    pub fn hovered_place(&self) -> Option<&Place> {
        let id = self.interaction.hovered_id()?;
        self.visible_place(id)
    }

    pub fn visible_place(&self, id: PlaceId) -> Option<&Place> {
        self.places.iter().find(|place| place.id == id)
    }

    /// Looks a place up in the unfiltered list, e.g. for a details link.
    pub fn any_place(&self, id: PlaceId) -> Option<&Place> {
        self.all_places.iter().find(|place| place.id == id)
    }

    pub fn top_category(&self) -> Option<NodeIndex> {
        let id = self.criteria.selected_top_category_id?;
        self.category_tree
            .roots()
            .iter()
            .copied()
            .find(|root| self.category_tree.node(*root).id == id)
    }

    fn begin_request(&mut self, kind: RequestKind) -> RequestTicket {
        let ticket = self.requests.begin(kind);
        match kind {
            RequestKind::DefaultLocation | RequestKind::Places => self.error = None,
            RequestKind::Categories => self.categories.error = None,
            RequestKind::Regions => self.regions.error = None,
        }
        ticket
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Places,
    Filters,
    Selection,
    Hover,
    Categories,
    Regions,
    Layout,
    Status,
}

/// Set of topics touched by one dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Changes(u16);

impl Changes {
    pub fn mark(&mut self, topic: Topic) {
        self.0 |= 1 << topic as u16;
    }

    pub fn touched(&self, topic: Topic) -> bool {
        self.0 & (1 << topic as u16) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetSearchText(String),
    SetRegion(RegionId),
    /// Picks the top-level category whose panel is shown; reopens the panel.
    SetTopCategory(Option<CategoryId>),
    SetCategoryIds(BTreeSet<CategoryId>),
    ToggleCategory(CategoryId),
    /// Select-all / deselect-all for the subtree rooted at this category.
    ToggleCategorySubtree(CategoryId),
    /// Empties the category selection and forgets the top-level category.
    ClearCategoryFilters,
    SetCategoryPanelOpen(bool),
    ToggleSidebar,
    SetSidebarOpen(bool),
    TogglePlace {
        place_id: PlaceId,
        origin: SelectionOrigin,
    },
    SelectPlace {
        place_id: PlaceId,
        origin: SelectionOrigin,
    },
    ClearSelection,
    HoverPlace(PlaceId),
    LeavePlace(PlaceId),
    ClearHover,
    DefaultLocationLoaded {
        ticket: RequestTicket,
        result: Result<DefaultLocation, String>,
    },
    PlacesLoaded {
        ticket: RequestTicket,
        result: Result<Vec<Place>, String>,
    },
    CategoriesLoaded {
        ticket: RequestTicket,
        result: Result<Vec<CategoryNode>, String>,
        fetched_at: DateTime<Utc>,
    },
    RegionsLoaded {
        ticket: RequestTicket,
        result: Result<Vec<Region>, String>,
        fetched_at: DateTime<Utc>,
    },
    ClearError,
}

pub fn reduce(state: &mut PlacesState, action: Action) -> Changes {
    let mut changes = Changes::default();

    match action {
        Action::SetSearchText(text) => {
            if state.criteria.search_text != text {
                state.criteria.search_text = text;
                changes.mark(Topic::Filters);
                refilter(state, &mut changes);
            }
        }
        Action::SetRegion(region_id) => {
            if state.criteria.region_id != region_id {
                state.criteria.region_id = region_id;
                changes.mark(Topic::Filters);
                refilter(state, &mut changes);
            }
        }
        Action::SetTopCategory(top_id) => {
            state.criteria.selected_top_category_id = top_id;
            changes.mark(Topic::Filters);
            if top_id.is_some() {
                state.category_panel_open = true;
                changes.mark(Topic::Layout);
            }
        }
        Action::SetCategoryIds(ids) => set_category_ids(state, ids, &mut changes),
        Action::ToggleCategory(id) => {
            let next = toggle_one(&state.criteria.selected_category_ids, id);
            set_category_ids(state, next, &mut changes);
        }
        Action::ToggleCategorySubtree(id) => match state.category_tree.find(id) {
            Some(index) => {
                let subtree = state.category_tree.flatten_category_ids(index);
                let next = toggle_all(&state.criteria.selected_category_ids, &subtree);
                set_category_ids(state, next, &mut changes);
            }
            None => tracing::warn!(category_id = id, "toggle requested for unknown category"),
        },
        Action::ClearCategoryFilters => {
            state.criteria.selected_top_category_id = None;
            changes.mark(Topic::Filters);
            set_category_ids(state, BTreeSet::new(), &mut changes);
        }
        Action::SetCategoryPanelOpen(open) => {
            if state.category_panel_open != open {
                state.category_panel_open = open;
                changes.mark(Topic::Layout);
            }
        }
        Action::ToggleSidebar => {
            state.sidebar_open = !state.sidebar_open;
            changes.mark(Topic::Layout);
        }
        Action::SetSidebarOpen(open) => {
            if state.sidebar_open != open {
                state.sidebar_open = open;
                changes.mark(Topic::Layout);
            }
        }
        Action::TogglePlace { place_id, origin } => {
            if state.visible_place(place_id).is_some() {
                let selection = state.interaction.toggle(place_id, origin);
                tracing::debug!(place_id, selected = selection.is_some(), "place toggled");
                changes.mark(Topic::Selection);
            } else {
                tracing::debug!(place_id, "ignoring click on a filtered-out place");
            }
        }
        Action::SelectPlace { place_id, origin } => {
            if state.visible_place(place_id).is_none() {
                tracing::debug!(place_id, "ignoring selection of a filtered-out place");
            } else if state.interaction.select(place_id, origin) {
                changes.mark(Topic::Selection);
            }
        }
        Action::ClearSelection => {
            if state.interaction.clear_selection() {
                changes.mark(Topic::Selection);
            }
        }
        Action::HoverPlace(place_id) => {
            if state.visible_place(place_id).is_some() && state.interaction.hover(place_id) {
                changes.mark(Topic::Hover);
            }
        }
        Action::LeavePlace(place_id) => {
            if state.interaction.leave(place_id) {
                changes.mark(Topic::Hover);
            }
        }
        Action::ClearHover => {
            if state.interaction.clear_hover() {
                changes.mark(Topic::Hover);
            }
        }
        Action::DefaultLocationLoaded { ticket, result } => {
            if !accept(state, &ticket) {
                return changes;
            }
            match result {
                Ok(location) => state.default_location = Some(location),
                Err(message) => state.error = Some(message),
            }
            changes.mark(Topic::Status);
        }
        Action::PlacesLoaded { ticket, result } => {
            if !accept(state, &ticket) {
                return changes;
            }
            changes.mark(Topic::Status);
            match result {
                Ok(places) => {
                    tracing::debug!(count = places.len(), "places loaded");
                    state.all_places = places;
                    refilter(state, &mut changes);
                }
                Err(message) => state.error = Some(message),
            }
        }
        Action::CategoriesLoaded {
            ticket,
            result,
            fetched_at,
        } => {
            if !accept(state, &ticket) {
                return changes;
            }
            match result {
                Ok(nodes) => {
                    state.category_tree = CategoryTree::from_nodes(&nodes);
                    state.categories.fill(nodes, fetched_at);
                }
                Err(message) => state.categories.fail(message),
            }
            // The in-flight flag and the fetch error are status.
            changes.mark(Topic::Categories);
            changes.mark(Topic::Status);
        }
        Action::RegionsLoaded {
            ticket,
            result,
            fetched_at,
        } => {
            if !accept(state, &ticket) {
                return changes;
            }
            match result {
                Ok(regions) => state.regions.fill(regions, fetched_at),
                Err(message) => state.regions.fail(message),
            }
            changes.mark(Topic::Regions);
            changes.mark(Topic::Status);
        }
        Action::ClearError => {
            if state.error.take().is_some() {
                changes.mark(Topic::Status);
            }
        }
    }

    changes
}

fn accept(state: &mut PlacesState, ticket: &RequestTicket) -> bool {
    let current = state.requests.complete(ticket);
    if !current {
        tracing::warn!(
            kind = ?ticket.kind,
            generation = ticket.generation,
            "discarding stale response"
        );
    }
    current
}

fn set_category_ids(state: &mut PlacesState, ids: BTreeSet<CategoryId>, changes: &mut Changes) {
    if state.criteria.selected_category_ids != ids {
        state.criteria.selected_category_ids = ids;
        changes.mark(Topic::Filters);
        refilter(state, changes);
    }
}

/// Recomputes the visible list and drops interaction state pointing outside it.
fn refilter(state: &mut PlacesState, changes: &mut Changes) {
    state.places = filter_by_criteria(&state.all_places, &state.criteria);
    changes.mark(Topic::Places);

    let (selection_cleared, hover_cleared) = state.interaction.retain_visible(&state.places);
    if selection_cleared {
        tracing::debug!("selected place filtered out, clearing selection");
        changes.mark(Topic::Selection);
    }
    if hover_cleared {
        changes.mark(Topic::Hover);
    }
}

type Listener = Box<dyn Fn(&PlacesState, Changes) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

/// Owns the state; the only way to change it is `dispatch`.
pub struct Store {
    state: PlacesState,
    config: ExplorerConfig,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Store {
    pub fn new(config: ExplorerConfig) -> Self {
        Self {
            state: PlacesState::default(),
            config,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn state(&self) -> &PlacesState {
        &self.state
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn dispatch(&mut self, action: Action) -> Changes {
        let changes = reduce(&mut self.state, action);
        if !changes.is_empty() {
            self.notify(changes);
        }
        changes
    }

    pub fn begin_request(&mut self, kind: RequestKind) -> RequestTicket {
        let ticket = self.state.begin_request(kind);
        let mut changes = Changes::default();
        changes.mark(Topic::Status);
        self.notify(changes);
        ticket
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&PlacesState, Changes) + Send + Sync + 'static,
    {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn needs_default_location(&self) -> bool {
        self.state.default_location.is_none()
            && !self.state.is_loading(RequestKind::DefaultLocation)
    }

    /// The first place search runs once the default location is known.
    pub fn needs_places(&self) -> bool {
        self.state.default_location.is_some()
            && self.state.all_places.is_empty()
            && self.state.error.is_none()
            && !self.state.is_loading(RequestKind::Places)
    }

    pub fn needs_categories(&self, now: DateTime<Utc>) -> bool {
        !self.state.is_loading(RequestKind::Categories)
            && self
                .state
                .categories
                .needs_fetch(now, self.config.cache_max_age())
    }

    pub fn needs_regions(&self, now: DateTime<Utc>) -> bool {
        !self.state.is_loading(RequestKind::Regions)
            && self
                .state
                .regions
                .needs_fetch(now, self.config.cache_max_age())
    }

    fn notify(&self, changes: Changes) {
        for (_, listener) in &self.listeners {
            listener(&self.state, changes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};
    use tracing_test::traced_test;

    fn place(id: PlaceId, region: RegionId, category: &str, title: &str) -> Place {
        Place {
            id,
            regions: vec![region],
            category: category.to_string(),
            title: title.to_string(),
            ..Default::default()
        }
    }

    fn loaded_store(places: Vec<Place>) -> Store {
        let mut store = Store::new(ExplorerConfig::default());
        let ticket = store.begin_request(RequestKind::Places);
        store.dispatch(Action::PlacesLoaded {
            ticket,
            result: Ok(places),
        });
        store
    }

    fn visible_ids(store: &Store) -> Vec<PlaceId> {
        store.state().places.iter().map(|p| p.id).collect()
    }

    fn now() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn filters_are_applied_to_loaded_places() {
        let mut store = loaded_store(vec![
            place(1, 5, "10,20", "Cafe A"),
            place(2, 6, "30", "Cafe B"),
        ]);
        assert_eq!(visible_ids(&store), vec![1, 2]);
        assert!(!store.state().places_loading());

        store.dispatch(Action::SetRegion(5));
        assert_eq!(visible_ids(&store), vec![1]);

        store.dispatch(Action::SetRegion(0));
        store.dispatch(Action::ToggleCategory(30));
        assert_eq!(visible_ids(&store), vec![2]);

        store.dispatch(Action::ToggleCategory(30));
        store.dispatch(Action::SetSearchText("CAFE".to_string()));
        assert_eq!(visible_ids(&store), vec![1, 2]);
        assert_eq!(store.state().all_places.len(), 2);
    }

    #[test]
    fn filter_change_clears_selection_of_hidden_place() {
        let mut store = loaded_store(vec![place(7, 1, "10", "Pier"), place(8, 1, "20", "Fort")]);
        store.dispatch(Action::TogglePlace {
            place_id: 7,
            origin: SelectionOrigin::Map,
        });
        store.dispatch(Action::HoverPlace(7));
        assert_eq!(store.state().selected_place().map(|p| p.id), Some(7));

        let changes = store.dispatch(Action::SetCategoryIds(BTreeSet::from([20])));
        assert!(changes.touched(Topic::Selection));
        assert!(changes.touched(Topic::Hover));
        assert_eq!(store.state().interaction.selected_id(), None);
        assert_eq!(store.state().interaction.hovered_id(), None);
    }

    #[test]
    fn selection_never_references_hidden_place() {
        let mut store = loaded_store(vec![place(1, 1, "10", "A"), place(2, 1, "20", "B")]);
        store.dispatch(Action::SetCategoryIds(BTreeSet::from([10])));

        let changes = store.dispatch(Action::SelectPlace {
            place_id: 2,
            origin: SelectionOrigin::Programmatic,
        });
        assert!(changes.is_empty());
        assert_eq!(store.state().selection(), None);

        for criteria in [
            Action::SetSearchText("b".to_string()),
            Action::SetCategoryIds(BTreeSet::new()),
            Action::SetRegion(9),
        ] {
            store.dispatch(Action::TogglePlace {
                place_id: 1,
                origin: SelectionOrigin::Sidebar,
            });
            store.dispatch(criteria);
            if let Some(id) = store.state().interaction.selected_id() {
                assert!(store.state().visible_place(id).is_some());
            }
        }
    }

    #[test]
    fn clicking_same_place_twice_deselects() {
        let mut store = loaded_store(vec![place(1, 1, "", "A")]);
        let click = Action::TogglePlace {
            place_id: 1,
            origin: SelectionOrigin::Map,
        };
        store.dispatch(click.clone());
        assert_eq!(store.state().interaction.selected_id(), Some(1));
        store.dispatch(click);
        assert_eq!(store.state().interaction.selected_id(), None);
    }

    #[test]
    fn subtree_toggle_uses_loaded_tree() {
        let mut store = loaded_store(vec![place(1, 1, "121", "Wine")]);
        let ticket = store.begin_request(RequestKind::Categories);
        store.dispatch(Action::CategoriesLoaded {
            ticket,
            result: Ok(vec![CategoryNode::branch(
                1,
                "Food",
                vec![
                    CategoryNode::leaf(11, "Bakery"),
                    CategoryNode::branch(12, "Bar", vec![CategoryNode::leaf(121, "Wine Bar")]),
                ],
            )]),
            fetched_at: now(),
        });

        store.dispatch(Action::ToggleCategory(121));
        store.dispatch(Action::ToggleCategorySubtree(12));
        assert_eq!(
            store.state().criteria.selected_category_ids,
            BTreeSet::from([12, 121])
        );

        store.dispatch(Action::ToggleCategorySubtree(12));
        assert!(store.state().criteria.selected_category_ids.is_empty());

        let changes = store.dispatch(Action::ToggleCategorySubtree(999));
        assert!(changes.is_empty());
    }

    #[test]
    fn failed_lookup_fetches_settle_status() {
        let mut store = loaded_store(Vec::new());

        let ticket = store.begin_request(RequestKind::Categories);
        assert!(store.state().is_loading(RequestKind::Categories));
        let changes = store.dispatch(Action::CategoriesLoaded {
            ticket,
            result: Err("categories unavailable".to_string()),
            fetched_at: now(),
        });
        assert!(changes.touched(Topic::Categories));
        assert!(changes.touched(Topic::Status));
        assert!(!store.state().is_loading(RequestKind::Categories));
        assert_eq!(
            store.state().categories.error.as_deref(),
            Some("categories unavailable")
        );

        let ticket = store.begin_request(RequestKind::Regions);
        let changes = store.dispatch(Action::RegionsLoaded {
            ticket,
            result: Err("regions unavailable".to_string()),
            fetched_at: now(),
        });
        assert!(changes.touched(Topic::Status));
        assert!(!store.state().is_loading(RequestKind::Regions));
    }

    #[test]
    fn top_category_opens_panel_and_closing_keeps_filter() {
        let mut store = loaded_store(Vec::new());
        let ticket = store.begin_request(RequestKind::Categories);
        store.dispatch(Action::CategoriesLoaded {
            ticket,
            result: Ok(vec![CategoryNode::branch(1, "Food", vec![CategoryNode::leaf(11, "Bakery")])]),
            fetched_at: now(),
        });

        store.dispatch(Action::SetTopCategory(Some(1)));
        store.dispatch(Action::ToggleCategory(11));
        assert!(store.state().category_panel_open);
        assert!(store.state().top_category().is_some());

        store.dispatch(Action::SetCategoryPanelOpen(false));
        assert!(!store.state().category_panel_open);
        assert_eq!(store.state().criteria.selected_top_category_id, Some(1));
        assert_eq!(
            store.state().criteria.selected_category_ids,
            BTreeSet::from([11])
        );

        store.dispatch(Action::ClearCategoryFilters);
        assert_eq!(store.state().criteria.selected_top_category_id, None);
        assert!(store.state().criteria.selected_category_ids.is_empty());
    }

    #[test]
    #[traced_test]
    fn stale_places_response_is_dropped() {
        let mut store = Store::new(ExplorerConfig::default());
        let older = store.begin_request(RequestKind::Places);
        let newer = store.begin_request(RequestKind::Places);

        store.dispatch(Action::PlacesLoaded {
            ticket: newer,
            result: Ok(vec![place(2, 1, "", "Newer")]),
        });
        let changes = store.dispatch(Action::PlacesLoaded {
            ticket: older,
            result: Ok(vec![place(1, 1, "", "Older")]),
        });

        assert!(changes.is_empty());
        assert_eq!(visible_ids(&store), vec![2]);
        assert!(logs_contain("discarding stale response"));
    }

    #[test]
    fn failed_fetch_surfaces_message_and_clear_error_resets() {
        let mut store = Store::new(ExplorerConfig::default());
        let ticket = store.begin_request(RequestKind::Places);
        store.dispatch(Action::PlacesLoaded {
            ticket,
            result: Err("Failed to fetch places".to_string()),
        });
        assert_eq!(store.state().error.as_deref(), Some("Failed to fetch places"));
        assert!(!store.state().places_loading());

        store.dispatch(Action::ClearError);
        assert_eq!(store.state().error, None);
    }

    #[test]
    fn categories_are_refetched_only_when_stale() {
        let mut store = Store::new(ExplorerConfig::default());
        assert!(store.needs_categories(now()));

        let ticket = store.begin_request(RequestKind::Categories);
        assert!(!store.needs_categories(now()));

        store.dispatch(Action::CategoriesLoaded {
            ticket,
            result: Ok(vec![CategoryNode::leaf(1, "Food")]),
            fetched_at: now(),
        });
        assert!(!store.needs_categories(now() + Duration::minutes(4)));
        assert!(store.needs_categories(now() + Duration::minutes(6)));
    }

    #[test]
    fn regions_failure_keeps_cached_list() {
        let mut store = Store::new(ExplorerConfig::default());
        let ticket = store.begin_request(RequestKind::Regions);
        store.dispatch(Action::RegionsLoaded {
            ticket,
            result: Ok(vec![Region {
                id: 5,
                name: "North".to_string(),
                ..Default::default()
            }]),
            fetched_at: now(),
        });
        let ticket = store.begin_request(RequestKind::Regions);
        store.dispatch(Action::RegionsLoaded {
            ticket,
            result: Err("offline".to_string()),
            fetched_at: now(),
        });
        assert_eq!(store.state().regions.items.len(), 1);
        assert_eq!(store.state().regions.error.as_deref(), Some("offline"));
    }

    #[test]
    fn default_location_gates_first_place_search() {
        let mut store = Store::new(ExplorerConfig::default());
        assert!(store.needs_default_location());
        assert!(!store.needs_places());

        let ticket = store.begin_request(RequestKind::DefaultLocation);
        assert!(store.state().places_loading());
        store.dispatch(Action::DefaultLocationLoaded {
            ticket,
            result: Ok(DefaultLocation {
                latitude: 29.18,
                longitude: -82.14,
                radius: None,
            }),
        });
        assert!(!store.needs_default_location());
        assert!(store.needs_places());
    }

    #[test]
    fn subscribers_receive_touched_topics() {
        let seen: Arc<Mutex<Vec<Changes>>> = Arc::default();
        let mut store = loaded_store(vec![place(1, 1, "", "A")]);
        let sink = Arc::clone(&seen);
        let id = store.subscribe(move |_, changes| sink.lock().unwrap().push(changes));

        store.dispatch(Action::HoverPlace(1));
        store.dispatch(Action::HoverPlace(1));
        store.dispatch(Action::ToggleSidebar);

        {
            let seen = seen.lock().unwrap();
            assert_eq!(seen.len(), 2);
            assert!(seen[0].touched(Topic::Hover));
            assert!(seen[1].touched(Topic::Layout));
            assert!(!seen[1].touched(Topic::Places));
        }

        assert!(store.unsubscribe(id));
        store.dispatch(Action::ToggleSidebar);
        assert_eq!(seen.lock().unwrap().len(), 2);
        assert!(!store.unsubscribe(id));
    }

    #[test]
    fn leaving_a_stale_hover_is_ignored() {
        let mut store = loaded_store(vec![place(1, 1, "", "A"), place(2, 1, "", "B")]);
        store.dispatch(Action::HoverPlace(1));
        store.dispatch(Action::HoverPlace(2));
        let changes = store.dispatch(Action::LeavePlace(1));
        assert!(changes.is_empty());
        assert_eq!(store.state().hovered_place().map(|p| p.id), Some(2));
    }
}
