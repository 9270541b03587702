pub mod controller;
pub mod geojson;
pub mod icons;
pub mod layers;
pub mod memory;
pub mod surface;

pub use controller::{ClusterLookup, LayerSync, MapController, PopupState};
pub use icons::{icon_group, IconGroup, ICON_GROUPS, PLACEHOLDER_IMAGE_URL};
pub use memory::MemorySurface;
pub use surface::{ClusterHit, FeatureId, MapSurface};
