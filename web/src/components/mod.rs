pub mod error;
pub mod loading;
pub mod place_flags;
pub mod region_dropdown;
pub mod search_bar;

pub use error::ErrorView;
pub use loading::LoadingView;
