use client::Action;
use shared::models::Credentials;
use yew::{Callback, Html, function_component, html};
use yewdux::prelude::use_store;

use crate::{actions, components::AuthForm, models::app_state::AppState};

#[function_component(AuthPage)]
pub fn auth_page() -> Html {
    let (state, dispatch) = use_store::<AppState>();

    let on_change = {
        let dispatch = dispatch.clone();
        Callback::from(move |credentials: Credentials| {
            dispatch.reduce_mut(|state| state.desk.auth_form = credentials);
        })
    };

    let on_submit = {
        let dispatch = dispatch.clone();
        Callback::from(move |()| actions::authenticate(&dispatch))
    };

    let on_toggle = Callback::from(move |()| actions::toggle_mode(&dispatch));

    html! {
        <div class="flex items-center justify-center min-h-screen">
            <AuthForm
                mode={state.desk.mode}
                credentials={state.desk.auth_form.clone()}
                busy={state.desk.is_busy(Action::Authenticate)}
                {on_change}
                {on_submit}
                {on_toggle}
            />
        </div>
    }
}
