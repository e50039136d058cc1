use client::AuthMode;
use shared::models::{Credentials, Role};
use strum::IntoEnumIterator;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::{Callback, Html, Properties, TargetCast, function_component, html};

#[derive(Properties, PartialEq, Clone)]
pub struct AuthFormProps {
    pub mode: AuthMode,
    pub credentials: Credentials,
    #[prop_or(false)]
    pub busy: bool,
    pub on_change: Callback<Credentials>,
    pub on_submit: Callback<()>,
    pub on_toggle: Callback<()>,
}

/// Login and register form.
///
/// The role selector is only offered when registering, but the selected
/// role is submitted in both modes.
#[function_component(AuthForm)]
pub fn auth_form(props: &AuthFormProps) -> Html {
    let on_username = {
        let credentials = props.credentials.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |event: yew::events::InputEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            on_change.emit(Credentials {
                username: input.value(),
                ..credentials.clone()
            });
        })
    };

    let on_password = {
        let credentials = props.credentials.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |event: yew::events::InputEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            on_change.emit(Credentials {
                password: input.value(),
                ..credentials.clone()
            });
        })
    };

    let on_role = {
        let credentials = props.credentials.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |event: yew::events::Event| {
            let select: HtmlSelectElement = event.target_unchecked_into();
            if let Ok(role) = select.value().parse::<Role>() {
                on_change.emit(Credentials {
                    role,
                    ..credentials.clone()
                });
            }
        })
    };

    let on_submit = {
        let on_submit = props.on_submit.clone();
        Callback::from(move |event: yew::events::SubmitEvent| {
            event.prevent_default();
            on_submit.emit(());
        })
    };

    let on_toggle = {
        let on_toggle = props.on_toggle.clone();
        Callback::from(move |_| on_toggle.emit(()))
    };

    let label = props.mode.label();
    let disable_submit = props.busy
        || props.credentials.username.trim().is_empty()
        || props.credentials.password.is_empty();

    html! {
        <div class="card w-full max-w-md shadow-lg bg-base-100">
            <form class="card-body" onsubmit={on_submit}>
                <h2 class="card-title text-2xl">{label}</h2>
                <div class="form-control">
                    <label class="label" for="username">
                        <span class="label-text">{"Username"}</span>
                    </label>
                    <input
                        id="username"
                        class="input input-bordered"
                        type="text"
                        required=true
                        value={props.credentials.username.clone()}
                        oninput={on_username}
                    />
                </div>
                <div class="form-control">
                    <label class="label" for="password">
                        <span class="label-text">{"Password"}</span>
                    </label>
                    <input
                        id="password"
                        class="input input-bordered"
                        type="password"
                        required=true
                        value={props.credentials.password.clone()}
                        oninput={on_password}
                    />
                </div>
                if props.mode == AuthMode::Register {
                    <div class="form-control">
                        <label class="label" for="role">
                            <span class="label-text">{"Role"}</span>
                        </label>
                        <select id="role" class="select select-bordered" onchange={on_role}>
                            { for Role::iter().map(|role| html! {
                                <option
                                    value={role.as_str()}
                                    selected={role == props.credentials.role}
                                >
                                    {role.label()}
                                </option>
                            }) }
                        </select>
                    </div>
                }
                <div class="form-control mt-6">
                    <button class="btn btn-primary" type="submit" disabled={disable_submit}>
                        {if props.busy { "Please wait..." } else { label }}
                    </button>
                </div>
                <button class="btn btn-link" type="button" onclick={on_toggle} disabled={props.busy}>
                    {props.mode.switch_label()}
                </button>
            </form>
        </div>
    }
}
