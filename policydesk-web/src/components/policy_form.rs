use shared::models::NewPolicy;
use web_sys::HtmlInputElement;
use yew::{Callback, Html, Properties, TargetCast, function_component, html};
use yew_icons::{Icon, IconId};

#[derive(Properties, PartialEq, Clone)]
pub struct PolicyFormProps {
    pub draft: NewPolicy,
    #[prop_or(false)]
    pub busy: bool,
    pub on_change: Callback<NewPolicy>,
    pub on_submit: Callback<()>,
}

#[function_component(PolicyForm)]
pub fn policy_form(props: &PolicyFormProps) -> Html {
    let on_name = {
        let draft = props.draft.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |event: yew::events::InputEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            on_change.emit(NewPolicy {
                name: input.value(),
                ..draft.clone()
            });
        })
    };

    let on_details = {
        let draft = props.draft.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |event: yew::events::InputEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            on_change.emit(NewPolicy {
                details: input.value(),
                ..draft.clone()
            });
        })
    };

    let on_submit = {
        let on_submit = props.on_submit.clone();
        Callback::from(move |event: yew::events::SubmitEvent| {
            event.prevent_default();
            on_submit.emit(());
        })
    };

    let disable_submit = props.busy || props.draft.missing_field().is_some();

    html! {
        <form class="flex flex-wrap items-end gap-3" onsubmit={on_submit}>
            <input
                class="input input-bordered"
                type="text"
                placeholder="Policy name"
                required=true
                value={props.draft.name.clone()}
                oninput={on_name}
            />
            <input
                class="input input-bordered flex-1"
                type="text"
                placeholder="Details"
                required=true
                value={props.draft.details.clone()}
                oninput={on_details}
            />
            <button class="btn btn-primary" type="submit" disabled={disable_submit}>
                <Icon icon_id={IconId::HeroiconsOutlinePlus} class="w-5 h-5" />
                {if props.busy { "Adding..." } else { "Add Policy" }}
            </button>
        </form>
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    async fn renders_draft_values() {
        let props = PolicyFormProps {
            draft: NewPolicy {
                name: "Car".to_string(),
                details: "Full cover".to_string(),
            },
            busy: false,
            on_change: Callback::noop(),
            on_submit: Callback::noop(),
        };
        let rendered = yew::LocalServerRenderer::<PolicyForm>::with_props(props)
            .render()
            .await;
        assert!(rendered.contains("Add Policy"));
        assert!(rendered.contains("Car"));
        assert!(rendered.contains("Full cover"));
    }

    #[wasm_bindgen_test]
    async fn busy_form_shows_progress() {
        let props = PolicyFormProps {
            draft: NewPolicy::default(),
            busy: true,
            on_change: Callback::noop(),
            on_submit: Callback::noop(),
        };
        let rendered = yew::LocalServerRenderer::<PolicyForm>::with_props(props)
            .render()
            .await;
        assert!(rendered.contains("Adding..."));
    }
}
