//! State and behaviour behind the places explorer: filtering, the category
//! tree, the place store and the map/sidebar synchronisation.

pub mod cache;
pub mod category_tree;
pub mod config;
pub mod details;
pub mod error;
pub mod filter;
pub mod flags;
pub mod interaction;
pub mod map;
pub mod requests;
pub mod sidebar;
pub mod store;

pub use config::ExplorerConfig;
pub use error::{ExplorerError, MapError};
pub use filter::{filter_places, FilterCriteria};
pub use interaction::{Selection, SelectionOrigin};
pub use requests::{RequestKind, RequestTicket};
pub use store::{reduce, Action, Changes, PlacesState, Store, SubscriptionId, Topic};
