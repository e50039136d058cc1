use shared::models::{Policy, PolicyId, PolicyPatch};
use web_sys::HtmlInputElement;
use yew::{
    Callback, Html, Properties, TargetCast, function_component, html, use_state,
};
use yew_icons::{Icon, IconId};

#[derive(Properties, PartialEq, Clone)]
pub struct PolicyListProps {
    pub policies: Vec<Policy>,
    /// Offer edit and delete controls on each row.
    #[prop_or(false)]
    pub can_manage: bool,
    /// Ids with a delete or update outstanding.
    #[prop_or_default]
    pub pending: Vec<PolicyId>,
    #[prop_or(false)]
    pub loading: bool,
    #[prop_or_default]
    pub on_delete: Callback<PolicyId>,
    #[prop_or_default]
    pub on_update: Callback<(PolicyId, PolicyPatch)>,
}

#[function_component(PolicyList)]
pub fn policy_list(props: &PolicyListProps) -> Html {
    if props.policies.is_empty() {
        return html! {
            <div class="p-4 text-center text-base-content/60">
                {if props.loading { "Loading policies..." } else { "No policies yet" }}
            </div>
        };
    }

    html! {
        <ul class="divide-y divide-base-300">
            { for props.policies.iter().map(|policy| html! {
                <PolicyRow
                    key={policy.id}
                    policy={policy.clone()}
                    can_manage={props.can_manage}
                    pending={props.pending.contains(&policy.id)}
                    on_delete={props.on_delete.clone()}
                    on_update={props.on_update.clone()}
                />
            }) }
        </ul>
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct PolicyRowProps {
    pub policy: Policy,
    pub can_manage: bool,
    pub pending: bool,
    pub on_delete: Callback<PolicyId>,
    pub on_update: Callback<(PolicyId, PolicyPatch)>,
}

#[function_component(PolicyRow)]
fn policy_row(props: &PolicyRowProps) -> Html {
    // edit buffer, present while the row is in edit mode
    let editing = use_state(|| None::<Policy>);

    let field_input = |apply: fn(&mut Policy, String)| {
        let editing = editing.clone();
        Callback::from(move |event: yew::events::InputEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            if let Some(mut edited) = (*editing).clone() {
                apply(&mut edited, input.value());
                editing.set(Some(edited));
            }
        })
    };

    let on_edit = {
        let editing = editing.clone();
        let policy = props.policy.clone();
        Callback::from(move |_| editing.set(Some(policy.clone())))
    };

    let on_cancel = {
        let editing = editing.clone();
        Callback::from(move |_| editing.set(None))
    };

    let on_save = {
        let editing = editing.clone();
        let current = props.policy.clone();
        let on_update = props.on_update.clone();
        Callback::from(move |event: yew::events::SubmitEvent| {
            event.prevent_default();
            if let Some(edited) = (*editing).clone()
                && let Some(patch) = edit_patch(&current, &edited)
            {
                on_update.emit((edited.id, patch));
            }
            editing.set(None);
        })
    };

    let on_delete = {
        let on_delete = props.on_delete.clone();
        let id = props.policy.id;
        Callback::from(move |_| on_delete.emit(id))
    };

    if let Some(edited) = (*editing).clone() {
        return html! {
            <li class="py-3">
                <form class="flex flex-wrap items-center gap-2" onsubmit={on_save}>
                    <input
                        class="input input-bordered input-sm"
                        value={edited.name}
                        oninput={field_input(|policy, value| policy.name = value)}
                    />
                    <input
                        class="input input-bordered input-sm flex-1"
                        value={edited.details}
                        oninput={field_input(|policy, value| policy.details = value)}
                    />
                    <input
                        class="input input-bordered input-sm"
                        value={edited.owner}
                        oninput={field_input(|policy, value| policy.owner = value)}
                    />
                    <button class="btn btn-primary btn-sm" type="submit" aria-label="Save">
                        <Icon icon_id={IconId::HeroiconsOutlineCheck} class="w-4 h-4" />
                    </button>
                    <button class="btn btn-ghost btn-sm" type="button" aria-label="Cancel" onclick={on_cancel}>
                        <Icon icon_id={IconId::HeroiconsOutlineXMark} class="w-4 h-4" />
                    </button>
                </form>
            </li>
        };
    }

    let policy = &props.policy;
    html! {
        <li class="py-3 flex items-center justify-between gap-4">
            <div>
                <div class="font-semibold">{policy.name.clone()}</div>
                <div class="text-sm">{policy.details.clone()}</div>
                <div class="text-xs text-base-content/60">{format!("Owner: {}", policy.owner)}</div>
            </div>
            if props.can_manage {
                <div class="flex gap-2">
                    <button class="btn btn-ghost btn-sm" type="button" onclick={on_edit} disabled={props.pending}>
                        <Icon icon_id={IconId::HeroiconsOutlinePencilSquare} class="w-4 h-4" />
                        {"Edit"}
                    </button>
                    <button class="btn btn-error btn-sm" type="button" onclick={on_delete} disabled={props.pending}>
                        <Icon icon_id={IconId::HeroiconsOutlineTrash} class="w-4 h-4" />
                        {"Delete"}
                    </button>
                </div>
            }
        </li>
    }
}

/// Changes made in an edit buffer, if it still belongs to `current`.
fn edit_patch(current: &Policy, edited: &Policy) -> Option<PolicyPatch> {
    if current.id != edited.id {
        return None;
    }
    let patch = PolicyPatch::diff(current, edited);
    (!patch.is_empty()).then_some(patch)
}
