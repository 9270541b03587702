pub mod place_card;
pub mod sidebar;

pub use sidebar::PlacesSidebar;
