use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsValue;
use web_sys::{Document, Element, HtmlElement, MouseEvent, Window};
use yew::prelude::*;

use crate::config::CursorConfig;
use crate::dom::{self, Listener};
use crate::error::{self, FxError};
use crate::schedule::AnimationLoop;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Exponential smoothing: closes `ease` of the remaining gap.
    pub fn ease_toward(&mut self, target: Point, ease: f64) {
        self.x += (target.x - self.x) * ease;
        self.y += (target.y - self.y) * ease;
    }
}

/// Custom cursor only on wide, mouse-driven screens.
pub fn cursor_supported(viewport_width: f64, touch: bool, config: &CursorConfig) -> bool {
    !touch && viewport_width > config.min_viewport_width
}

fn is_touch_device(window: &Window) -> bool {
    let has_touch_events = web_sys::js_sys::Reflect::has(window, &JsValue::from_str("ontouchstart")).unwrap_or(false);
    has_touch_events || window.navigator().max_touch_points() > 0
}

#[derive(Default, Debug)]
pub struct CursorMotion {
    pub pointer: Point,
    pub dot: Point,
    pub follower: Point,
}

impl CursorMotion {
    pub fn step(&mut self, config: &CursorConfig) {
        self.dot.ease_toward(self.pointer, config.dot_ease);
        self.follower.ease_toward(self.pointer, config.follower_ease);
    }
}

/// Body class that hides the native pointer while the custom one runs.
const BODY_CLASS: &str = "has-custom-cursor";

struct CursorHandle {
    body: Option<HtmlElement>,
    _animation: AnimationLoop,
    _listeners: Vec<Listener>,
}

impl Drop for CursorHandle {
    fn drop(&mut self) {
        if let Some(body) = &self.body {
            let _ = body.class_list().remove_1(BODY_CLASS);
        }
    }
}

fn place(el: &Element, at: Point, radius: f64) {
    dom::set_style(el, "left", &format!("{}px", at.x - radius));
    dom::set_style(el, "top", &format!("{}px", at.y - radius));
}

fn set_visible(dot: &Element, follower: &Element, visible: bool) {
    let opacity = if visible { "1" } else { "0" };
    dom::set_style(dot, "opacity", opacity);
    dom::set_style(follower, "opacity", opacity);
}

fn attach(
    document: &Document,
    dot: Element,
    follower: Element,
    config: CursorConfig,
) -> Result<CursorHandle, FxError> {
    let motion = Rc::new(RefCell::new(CursorMotion::default()));
    let mut listeners = Vec::new();

    {
        let motion = motion.clone();
        listeners.push(dom::listen(document, "mousemove", move |e: MouseEvent| {
            motion.borrow_mut().pointer = Point { x: e.client_x() as f64, y: e.client_y() as f64 };
        }));
    }

    for el in dom::query_all(document, &config.hover_selector) {
        let (d, f) = (dot.clone(), follower.clone());
        listeners.push(dom::listen(&el, "mouseenter", move |_: MouseEvent| {
            let _ = f.class_list().add_1("hovering");
            dom::set_style(&d, "transform", "scale(1.5)");
        }));
        let (d, f) = (dot.clone(), follower.clone());
        listeners.push(dom::listen(&el, "mouseleave", move |_: MouseEvent| {
            let _ = f.class_list().remove_1("hovering");
            dom::set_style(&d, "transform", "scale(1)");
        }));
    }

    let root = document.document_element().ok_or(FxError::MissingElement("html"))?;
    {
        let (d, f) = (dot.clone(), follower.clone());
        listeners.push(dom::listen(&root, "mouseleave", move |_: MouseEvent| set_visible(&d, &f, false)));
        let (d, f) = (dot.clone(), follower.clone());
        listeners.push(dom::listen(&root, "mouseenter", move |_: MouseEvent| set_visible(&d, &f, true)));
    }

    let animation = AnimationLoop::start(move |_| {
        let mut motion = motion.borrow_mut();
        motion.step(&config);
        place(&dot, motion.dot, config.dot_radius);
        place(&follower, motion.follower, config.follower_radius);
    });

    let body = document.body();
    if let Some(body) = &body {
        let _ = body.class_list().add_1(BODY_CLASS);
    }
    Ok(CursorHandle { body, _animation: animation, _listeners: listeners })
}

fn setup(dot_ref: &NodeRef, follower_ref: &NodeRef, config: CursorConfig) -> Result<CursorHandle, FxError> {
    let document = dom::document()?;
    let dot = dot_ref.cast::<Element>().ok_or(FxError::MissingElement(".custom-cursor"))?;
    let follower = follower_ref.cast::<Element>().ok_or(FxError::MissingElement(".cursor-follower"))?;
    attach(&document, dot, follower, config)
}

#[derive(Properties, PartialEq)]
pub struct CursorLayerProps {
    pub config: CursorConfig,
}

#[function_component(CursorLayer)]
pub fn cursor_layer(props: &CursorLayerProps) -> Html {
    let dot_ref = use_node_ref();
    let follower_ref = use_node_ref();

    // Decided once; resizing later does not bring the cursor back or take it away
    let enabled = {
        let config = props.config.clone();
        *use_state(move || {
            web_sys::window()
                .map(|w| cursor_supported(dom::viewport_width(&w), is_touch_device(&w), &config))
                .unwrap_or(false)
        })
    };

    {
        let dot_ref = dot_ref.clone();
        let follower_ref = follower_ref.clone();
        let config = props.config.clone();
        use_effect_with_deps(
            move |enabled: &bool| {
                let handle = if *enabled {
                    error::optional("custom cursor", setup(&dot_ref, &follower_ref, config))
                } else {
                    log::debug!("custom cursor disabled on this device");
                    None
                };
                move || drop(handle)
            },
            enabled,
        );
    }

    let style = if enabled { "" } else { "display: none;" };
    html! {
        <>
            <div ref={dot_ref} class="custom-cursor" style={style} />
            <div ref={follower_ref} class="cursor-follower" style={style} />
        </>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_closes_a_fixed_share_of_the_gap() {
        let mut p = Point::default();
        p.ease_toward(Point { x: 100.0, y: -50.0 }, 0.1);
        assert_eq!(p, Point { x: 10.0, y: -5.0 });
        p.ease_toward(Point { x: 100.0, y: -50.0 }, 0.1);
        assert!((p.x - 19.0).abs() < 1e-9);
    }

    #[test]
    fn follower_lags_behind_the_dot() {
        let config = CursorConfig::default();
        let mut motion = CursorMotion { pointer: Point { x: 400.0, y: 300.0 }, ..Default::default() };
        for _ in 0..5 {
            motion.step(&config);
            assert!(motion.dot.x > motion.follower.x);
            assert!(motion.dot.x <= 400.0);
        }
    }

    #[test]
    fn converges_on_a_still_pointer() {
        let config = CursorConfig::default();
        let mut motion = CursorMotion { pointer: Point { x: 250.0, y: 80.0 }, ..Default::default() };
        for _ in 0..400 {
            motion.step(&config);
        }
        assert!((motion.follower.x - 250.0).abs() < 0.01);
        assert!((motion.follower.y - 80.0).abs() < 0.01);
    }

    #[test]
    fn narrow_or_touch_screens_get_no_cursor() {
        let config = CursorConfig::default();
        assert!(!cursor_supported(768.0, false, &config));
        assert!(!cursor_supported(375.0, false, &config));
        assert!(!cursor_supported(1440.0, true, &config));
        assert!(cursor_supported(1440.0, false, &config));
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn native_pointer_comes_back_when_the_cursor_is_dropped() {
        let document = dom::document().unwrap();
        let body = document.body().unwrap();
        let dot = document.create_element("div").unwrap();
        let follower = document.create_element("div").unwrap();

        let handle = attach(&document, dot, follower, CursorConfig::default()).unwrap();
        assert!(body.class_list().contains(BODY_CLASS));

        drop(handle);
        assert!(!body.class_list().contains(BODY_CLASS));
    }
}
