use chrono::DateTime;
use explorer_state::details::DetailsStatus;
use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_params_map;
use shared_types::{Activity, LocationDetails};
use thaw::{Tag, Text};

use crate::components::{place_flags::PlaceFlagButtons, ErrorView, LoadingView};
use crate::server::get_location_details;

/// Activity timestamps are Unix seconds.
fn posted_on(created_date: i64) -> Option<String> {
    DateTime::from_timestamp(created_date, 0).map(|date| date.format("%b %-d, %Y").to_string())
}

fn directions_url(details: &LocationDetails) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&destination={}",
        urlencoding::encode(&details.display_address())
    )
}

#[component]
pub fn PlaceDetailsPage() -> impl IntoView {
    let params = use_params_map();

    let place_id = Memo::new(move |_| {
        params
            .read()
            .get("id")
            .and_then(|id| id.parse::<i64>().ok())
            .unwrap_or(0)
    });

    let details = Resource::new(
        move || place_id.get(),
        move |id| async move {
            if id <= 0 {
                return Ok(None);
            }
            get_location_details(id).await
        },
    );

    view! {
        <div class="place-details-container">
            <A href="/">"← Back to map"</A>
            <Suspense fallback=move || {
                view! { <LoadingView message=Some("Loading place...".to_string()) /> }
            }>
                {move || {
                    details
                        .get()
                        .map(|response| match DetailsStatus::from_response(response.map_err(|e| e.to_string())) {
                            DetailsStatus::Loaded(details) => {
                                view! { <PlaceDetailsView details=*details /> }.into_any()
                            }
                            DetailsStatus::NotFound => {
                                view! {
                                    <div class="place-details-missing">
                                        <h2>"Place not found"</h2>
                                        <p>"We couldn't find the place you were looking for."</p>
                                    </div>
                                }
                                .into_any()
                            }
                            DetailsStatus::Failed(message) => {
                                view! { <ErrorView message=Some(message) /> }.into_any()
                            }
                        })
                }}
            </Suspense>
        </div>
    }
}

#[component]
fn PlaceDetailsView(details: LocationDetails) -> impl IntoView {
    let directions = directions_url(&details);
    let address = details.display_address();

    view! {
        <article class="place-details">
            <header class="place-details-header">
                {details.logo.map(|logo| view! { <img class="place-details-logo" src=logo alt="" /> })}
                <h1>{details.title.clone()}</h1>
                <PlaceFlagButtons place_id=details.id />
            </header>

            {(!details.images.is_empty())
                .then(|| {
                    view! {
                        <div class="place-details-gallery">
                            {details
                                .images
                                .iter()
                                .map(|url| view! { <img src=url.clone() alt="" loading="lazy" /> })
                                .collect_view()}
                        </div>
                    }
                })}

            <section class="place-details-info">
                <p class="place-details-description">{details.description}</p>
                <p class="place-details-address">{address}</p>
                {(!details.phone.is_empty())
                    .then(|| {
                        view! {
                            <p>
                                <a href=format!("tel:{}", details.phone)>{details.phone.clone()}</a>
                            </p>
                        }
                    })}
                {details
                    .web_site
                    .filter(|site| !site.trim().is_empty())
                    .map(|site| {
                        view! {
                            <p>
                                <a href=site.clone() target="_blank" rel="noopener">{site.clone()}</a>
                            </p>
                        }
                    })}
                <a class="place-details-directions" href=directions target="_blank" rel="noopener">
                    "Get directions"
                </a>
            </section>

            {(!details.amenities.is_empty())
                .then(|| {
                    view! {
                        <section class="place-details-amenities">
                            <h2>"Amenities"</h2>
                            <div class="amenity-list">
                                {details
                                    .amenities
                                    .into_iter()
                                    .map(|amenity| {
                                        let icon = amenity.icon.or(amenity.svg_icon);
                                        view! {
                                            <Tag>
                                                {icon.map(|src| view! { <img class="amenity-icon" src=src alt="" /> })}
                                                {amenity.name}
                                            </Tag>
                                        }
                                    })
                                    .collect_view()}
                            </div>
                        </section>
                    }
                })}

            <section class="place-details-activity">
                <h2>"Recent activity"</h2>
                {if details.activities.is_empty() {
                    view! { <Text>"No check-ins yet."</Text> }.into_any()
                } else {
                    details
                        .activities
                        .into_iter()
                        .map(|activity| view! { <ActivityItem activity /> })
                        .collect_view()
                        .into_any()
                }}
            </section>
        </article>
    }
}

#[component]
fn ActivityItem(activity: Activity) -> impl IntoView {
    let author = activity.author();
    view! {
        <div class="activity-item">
            <div class="activity-header">
                {(!activity.profile.is_empty())
                    .then(|| view! { <img class="activity-avatar" src=activity.profile.clone() alt="" /> })}
                <strong>{author}</strong>
                {posted_on(activity.created_date).map(|date| view! { <span class="activity-date">{date}</span> })}
            </div>
            {(!activity.comment.is_empty()).then(|| view! { <p>{activity.comment.clone()}</p> })}
            {(!activity.photo_url.is_empty())
                .then(|| {
                    view! { <img class="activity-photo" src=activity.photo_url.clone() alt="" loading="lazy" /> }
                })}
            <div class="activity-stats">
                <span>{format!("♥ {}", activity.like_count)}</span>
                <span>{format!("💬 {}", activity.comment_count)}</span>
            </div>
        </div>
    }
}
