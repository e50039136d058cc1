use yew::{Callback, Html, Properties, function_component, html};
use yew_icons::{Icon, IconId};

#[derive(Properties, PartialEq, Clone)]
pub struct ErrorBannerProps {
    pub message: String,
    #[prop_or_default]
    pub on_dismiss: Callback<()>,
}

/// The most recent failure, until dismissed or the next operation starts.
#[function_component(ErrorBanner)]
pub fn error_banner(props: &ErrorBannerProps) -> Html {
    let on_dismiss = {
        let on_dismiss = props.on_dismiss.clone();
        Callback::from(move |_| on_dismiss.emit(()))
    };

    html! {
        <div class="alert alert-error shadow-sm" role="alert">
            <span>{props.message.clone()}</span>
            <button class="btn btn-ghost btn-sm" type="button" aria-label="Dismiss" onclick={on_dismiss}>
                <Icon icon_id={IconId::HeroiconsOutlineXMark} class="w-4 h-4" />
            </button>
        </div>
    }
}
