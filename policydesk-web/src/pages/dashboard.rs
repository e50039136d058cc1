use client::Action;
use shared::models::{NewPolicy, PolicyId, PolicyPatch};
use yew::{Callback, Html, function_component, html};
use yew_icons::{Icon, IconId};
use yewdux::prelude::use_store;

use crate::{
    actions,
    components::{PolicyForm, PolicyList},
    models::app_state::AppState,
};

#[function_component(DashboardPage)]
pub fn dashboard_page() -> Html {
    let (state, dispatch) = use_store::<AppState>();
    let desk = &state.desk;
    let Some(session) = desk.session() else {
        return html! {};
    };

    let on_draft_change = {
        let dispatch = dispatch.clone();
        Callback::from(move |draft: NewPolicy| {
            dispatch.reduce_mut(|state| state.desk.policy_draft = draft);
        })
    };

    let on_create = {
        let dispatch = dispatch.clone();
        Callback::from(move |()| actions::create_policy(&dispatch))
    };

    let on_delete = {
        let dispatch = dispatch.clone();
        Callback::from(move |id: PolicyId| actions::delete_policy(&dispatch, id))
    };

    let on_update = {
        let dispatch = dispatch.clone();
        Callback::from(move |(id, patch): (PolicyId, PolicyPatch)| {
            actions::update_policy(&dispatch, id, patch);
        })
    };

    let on_logout = Callback::from(move |_| actions::logout(&dispatch));

    let pending: Vec<PolicyId> = desk
        .policies()
        .iter()
        .map(|policy| policy.id)
        .filter(|&id| {
            desk.is_busy(Action::DeletePolicy(id)) || desk.is_busy(Action::UpdatePolicy(id))
        })
        .collect();

    html! {
        <div class="container mx-auto max-w-3xl p-6 space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-2xl font-bold">
                    {format!("Welcome, {} ({})", session.username, session.role)}
                </h1>
                <button class="btn btn-ghost" type="button" onclick={on_logout}>
                    <Icon icon_id={IconId::HeroiconsOutlineArrowRightOnRectangle} class="w-5 h-5" />
                    {"Logout"}
                </button>
            </div>
            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <h2 class="card-title">{"Add Policy"}</h2>
                    <PolicyForm
                        draft={desk.policy_draft.clone()}
                        busy={desk.is_busy(Action::CreatePolicy)}
                        on_change={on_draft_change}
                        on_submit={on_create}
                    />
                </div>
            </div>
            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <h2 class="card-title">{"Policies"}</h2>
                    <PolicyList
                        policies={desk.policies().to_vec()}
                        can_manage={desk.can_manage()}
                        {pending}
                        loading={desk.is_busy(Action::FetchPolicies)}
                        {on_delete}
                        {on_update}
                    />
                </div>
            </div>
        </div>
    }
}
