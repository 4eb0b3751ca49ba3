use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use web_sys::MouseEvent;
use yew::prelude::*;

use crate::config::FlashConfig;
use crate::dom::{self, Listener};
use crate::error::{self, FxError};
use crate::schedule::{self, Throttle};

pub fn should_flash(roll: f64, chance: f64) -> bool {
    roll < chance
}

fn attach_triggers(config: &FlashConfig, fire: Rc<dyn Fn()>) -> Result<Vec<Listener>, FxError> {
    let document = dom::document()?;
    let triggers = dom::query_all(&document, &config.trigger_selector);
    if triggers.is_empty() {
        return Err(FxError::MissingElement("camera flash triggers"));
    }

    let throttle = Rc::new(RefCell::new(Throttle::new(config.duration_ms as f64)));
    let mut listeners = Vec::with_capacity(triggers.len());
    for el in triggers {
        let fire = fire.clone();
        let throttle = throttle.clone();
        let chance = config.chance;
        listeners.push(dom::listen(&el, "mouseenter", move |_: MouseEvent| {
            let roll = web_sys::js_sys::Math::random();
            if should_flash(roll, chance) && throttle.borrow_mut().allow(schedule::now_ms()) {
                fire();
            }
        }));
    }
    Ok(listeners)
}

#[derive(Properties, PartialEq)]
pub struct CameraFlashProps {
    pub config: FlashConfig,
    /// Every increment fires one flash.
    pub pulse: u32,
}

#[function_component(CameraFlash)]
pub fn camera_flash(props: &CameraFlashProps) -> Html {
    let active = use_state(|| false);
    let pending = use_mut_ref(|| None::<Timeout>);

    let fire: Rc<dyn Fn()> = {
        let set_active = active.setter();
        let duration = props.config.duration_ms;
        Rc::new(move || {
            set_active.set(true);
            let set_active = set_active.clone();
            *pending.borrow_mut() = Some(Timeout::new(duration, move || set_active.set(false)));
        })
    };

    {
        let fire = fire.clone();
        let config = props.config.clone();
        use_effect_with_deps(
            move |_| {
                let listeners = error::optional("camera flash", attach_triggers(&config, fire));
                move || drop(listeners)
            },
            (),
        );
    }

    use_effect_with_deps(
        move |pulse: &u32| {
            if *pulse > 0 {
                fire();
            }
            || ()
        },
        props.pulse,
    );

    html! {
        <div class={classes!("camera-flash", (*active).then(|| "active"))} />
    }
}
