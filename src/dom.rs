use gloo_events::EventListenerOptions;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, NodeList, Window};

use crate::error::FxError;

pub use gloo_events::EventListener as Listener;

pub fn window() -> Result<Window, FxError> {
    web_sys::window().ok_or(FxError::NoWindow)
}

pub fn document() -> Result<Document, FxError> {
    window()?.document().ok_or(FxError::NoWindow)
}

pub fn query(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).ok().flatten()
}

/// Like `query`, but a missing element is an error naming the selector.
pub fn require(document: &Document, selector: &'static str) -> Result<Element, FxError> {
    query(document, selector).ok_or(FxError::MissingElement(selector))
}

pub fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    document
        .query_selector_all(selector)
        .map(|list| elements(&list))
        .unwrap_or_default()
}

pub fn query_all_in(root: &Element, selector: &str) -> Vec<Element> {
    root.query_selector_all(selector)
        .map(|list| elements(&list))
        .unwrap_or_default()
}

fn elements(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn scroll_y(window: &Window) -> f64 {
    window.page_y_offset().unwrap_or(0.0)
}

pub fn viewport_width(window: &Window) -> f64 {
    window
        .inner_width()
        .ok()
        .and_then(|w| w.as_f64())
        .unwrap_or(0.0)
}

pub fn viewport_height(window: &Window) -> f64 {
    window
        .inner_height()
        .ok()
        .and_then(|h| h.as_f64())
        .unwrap_or(0.0)
}

pub fn set_style(el: &Element, property: &str, value: &str) {
    if let Some(html) = el.dyn_ref::<HtmlElement>() {
        let _ = html.style().set_property(property, value);
    }
}

pub fn toggle_class(el: &Element, class: &str, on: bool) {
    let _ = el.class_list().toggle_with_force(class, on);
}

/// Suspends or restores scrolling of the whole page.
pub fn set_scroll_locked(document: &Document, locked: bool) {
    if let Some(body) = document.body() {
        let _ = body
            .style()
            .set_property("overflow", if locked { "hidden" } else { "auto" });
    }
}

pub fn smooth_scroll_to(window: &Window, top: f64) {
    let options = web_sys::ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(web_sys::ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);
}

/// Passive listener whose callback only sees events of type `E`.
pub fn listen<E, F>(target: &EventTarget, event: &'static str, mut callback: F) -> Listener
where
    E: JsCast + Clone,
    F: FnMut(E) + 'static,
{
    Listener::new(target, event, move |e: &Event| {
        if let Some(e) = e.dyn_ref::<E>() {
            callback(e.clone());
        }
    })
}

/// Like `listen`, but the callback may call `prevent_default`.
pub fn listen_cancelable<E, F>(target: &EventTarget, event: &'static str, mut callback: F) -> Listener
where
    E: JsCast + Clone,
    F: FnMut(E) + 'static,
{
    Listener::new_with_options(target, event, EventListenerOptions::enable_prevent_default(), move |e: &Event| {
        if let Some(e) = e.dyn_ref::<E>() {
            callback(e.clone());
        }
    })
}
