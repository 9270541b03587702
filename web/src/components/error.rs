use leptos::prelude::*;
use thaw::{Button, ButtonSize, MessageBar, MessageBarIntent};

/// Inline failure banner. With `on_dismiss` it renders a button that hides it.
#[component]
pub fn ErrorView(
    message: Option<String>,
    #[prop(optional, into)] on_dismiss: Option<Callback<()>>,
) -> impl IntoView {
    view! {
        <div class="error-view" role="alert">
            <MessageBar intent=MessageBarIntent::Error>
                {message.unwrap_or_else(|| "Something went wrong. Please try again.".to_string())}
            </MessageBar>
            {on_dismiss
                .map(|on_dismiss| {
                    view! {
                        <Button size=ButtonSize::Small on_click=move |_| on_dismiss.run(())>
                            "Dismiss"
                        </Button>
                    }
                })}
        </div>
    }
}
