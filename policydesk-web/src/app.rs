use client::View;
use yew::{Callback, Html, function_component, html};
use yewdux::prelude::use_store;

use crate::{
    actions,
    components::ErrorBanner,
    models::app_state::AppState,
    pages::{AuthPage, DashboardPage},
};

/// Switches between the auth form and the dashboard on session presence.
#[function_component(App)]
pub fn app() -> Html {
    let (state, dispatch) = use_store::<AppState>();
    let on_dismiss = Callback::from(move |()| actions::dismiss_error(&dispatch));

    html! {
        <main class="min-h-screen bg-base-200">
            if let Some(message) = state.desk.last_error() {
                <div class="container mx-auto max-w-3xl pt-4">
                    <ErrorBanner message={message.to_string()} {on_dismiss} />
                </div>
            }
            {
                match state.desk.view() {
                    View::Auth => html! { <AuthPage /> },
                    View::Dashboard => html! { <DashboardPage /> },
                }
            }
        </main>
    }
}
