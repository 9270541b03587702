use explorer_state::store::{Action, Topic};
use leptos::prelude::*;
use thaw::{Flex, FlexAlign, Label, Select};

use crate::{
    components::{error::ErrorView, loading::LoadingView},
    state::use_app_store,
};

#[component]
pub fn RegionDropdown() -> impl IntoView {
    let app = use_app_store();
    let selected = RwSignal::new(app.with_untracked(|state| state.criteria.region_id.to_string()));

    Effect::new(move |_| {
        let region_id = selected.get().parse().unwrap_or(0);
        if app.with_untracked(|state| state.criteria.region_id) != region_id {
            app.dispatch(Action::SetRegion(region_id));
        }
    });

    view! {
        {move || {
            let (regions, error) =
                app.with(Topic::Regions, |state| (state.regions.items.clone(), state.regions.error.clone()));
            let loading = app.with(Topic::Status, |state| {
                state.is_loading(explorer_state::RequestKind::Regions)
            });

            if let Some(message) = error.filter(|_| regions.is_empty()) {
                return view! { <ErrorView message=Some(message) /> }.into_any();
            }
            if loading && regions.is_empty() {
                return view! {
                    <LoadingView message=Some("Fetching regions...".to_string()) compact=true />
                }
                .into_any();
            }

            view! {
                <Flex vertical=true align=FlexAlign::Start>
                    <Label>"Region"</Label>
                    <Select value=selected>
                        <option value="0">"All regions"</option>
                        {regions
                            .into_iter()
                            .map(|region| {
                                view! { <option value=region.id.to_string()>{region.name}</option> }
                            })
                            .collect_view()}
                    </Select>
                </Flex>
            }
            .into_any()
        }}
    }
}
