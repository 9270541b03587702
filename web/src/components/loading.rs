use leptos::prelude::*;
use thaw::{Spinner, SpinnerSize};

/// Spinner with a caption; `compact` fits it into banners and dropdown slots.
#[component]
pub fn LoadingView(message: Option<String>, #[prop(optional)] compact: bool) -> impl IntoView {
    let size = if compact { SpinnerSize::Small } else { SpinnerSize::Large };
    let message = message.unwrap_or_else(|| "Loading...".to_string());

    view! {
        <div class="loading-container" class:compact=compact role="status">
            <Spinner size=size />
            <p class="loading-message">{message}</p>
        </div>
    }
}
