use web_sys::{Document, Event, KeyboardEvent, MouseEvent};

use crate::dom::{self, Listener};
use crate::error::FxError;

/// Focus rings only for keyboard users, and a `page-hidden` flag so CSS can
/// pause animations in background tabs.
pub fn attach(document: &Document) -> Result<Vec<Listener>, FxError> {
    let body = document.body().ok_or(FxError::MissingElement("body"))?;
    let mut listeners = Vec::new();

    {
        let target = body.clone();
        listeners.push(dom::listen(&body, "mousedown", move |_: MouseEvent| {
            let _ = target.class_list().add_1("using-mouse");
        }));
    }
    {
        let target = body.clone();
        listeners.push(dom::listen(&body, "keydown", move |e: KeyboardEvent| {
            if e.key() == "Tab" {
                let _ = target.class_list().remove_1("using-mouse");
            }
        }));
    }
    {
        let source = document.clone();
        listeners.push(dom::listen(document, "visibilitychange", move |_: Event| {
            dom::toggle_class(&body, "page-hidden", source.hidden());
        }));
    }

    Ok(listeners)
}
