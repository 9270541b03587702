pub mod category_panel;
pub mod explore_map;
pub mod filter_summary;
#[cfg(feature = "hydrate")]
mod maplibre;

pub use explore_map::ExploreMap;
