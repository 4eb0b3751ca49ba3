use web_sys::FocusEvent;
use yew::prelude::*;

const HIDDEN_TOP: &str = "-100px";
const SHOWN_TOP: &str = "10px";

/// Off-screen "Skip to content" link that slides in for keyboard users.
#[function_component(SkipLink)]
pub fn skip_link() -> Html {
    let focused = use_state(|| false);

    let onfocus = {
        let focused = focused.clone();
        Callback::from(move |_: FocusEvent| focused.set(true))
    };
    let onblur = {
        let focused = focused.clone();
        Callback::from(move |_: FocusEvent| focused.set(false))
    };

    let top = if *focused { SHOWN_TOP } else { HIDDEN_TOP };
    let style = format!(
        "position: fixed; top: {}; left: 50%; transform: translateX(-50%); \
         background: var(--color-accent); color: var(--color-bg-primary); \
         padding: 10px 20px; z-index: 10000; transition: top 0.3s ease;",
        top
    );

    html! {
        <a href="#home" class="skip-link" style={style} {onfocus} {onblur}>
            {"Skip to content"}
        </a>
    }
}
