use std::rc::Rc;

use web_sys::{Element, KeyboardEvent, MouseEvent};
use yew::prelude::*;
use yew_hooks::use_event_with_window;

use crate::dom::{self, Listener};
use crate::error::{self, FxError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LightboxImage {
    pub src: String,
    pub alt: String,
    pub caption: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum LightboxState {
    #[default]
    Closed,
    Open(LightboxImage),
}

pub enum LightboxAction {
    Show(LightboxImage),
    Close,
}

impl LightboxState {
    pub fn is_open(&self) -> bool {
        matches!(self, LightboxState::Open(_))
    }
}

impl Reducible for LightboxState {
    type Action = LightboxAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            // Showing while open swaps the picture in place
            LightboxAction::Show(image) => Rc::new(LightboxState::Open(image)),
            LightboxAction::Close if self.is_open() => Rc::new(LightboxState::Closed),
            LightboxAction::Close => self,
        }
    }
}

/// Only a click on the dimmed backdrop itself closes; clicks on the image or
/// caption bubble up with a different target.
pub fn backdrop_click_closes(target: Option<&Element>, overlay: Option<&Element>) -> bool {
    matches!((target, overlay), (Some(t), Some(o)) if t == o)
}

fn gallery_image(item: &Element) -> Option<LightboxImage> {
    let img = item.query_selector("img").ok().flatten()?;
    let caption = item
        .query_selector(".gallery-caption")
        .ok()
        .flatten()
        .and_then(|c| c.text_content())
        .unwrap_or_default();
    Some(LightboxImage {
        src: img.get_attribute("src").unwrap_or_default(),
        alt: img.get_attribute("alt").unwrap_or_default(),
        caption,
    })
}

fn attach_gallery(dispatcher: UseReducerDispatcher<LightboxState>) -> Result<Vec<Listener>, FxError> {
    let document = dom::document()?;
    let items = dom::query_all(&document, ".gallery-item");
    if items.is_empty() {
        return Err(FxError::MissingElement(".gallery-item"));
    }

    let mut listeners = Vec::with_capacity(items.len());
    for item in items {
        let dispatcher = dispatcher.clone();
        let source = item.clone();
        listeners.push(dom::listen(&item, "click", move |_: MouseEvent| {
            if let Some(image) = gallery_image(&source) {
                dispatcher.dispatch(LightboxAction::Show(image));
            }
        }));
    }
    Ok(listeners)
}

#[function_component(Lightbox)]
pub fn lightbox() -> Html {
    let state = use_reducer(LightboxState::default);
    let overlay_ref = use_node_ref();
    let was_open = use_mut_ref(|| false);

    {
        let dispatcher = state.dispatcher();
        use_effect_with_deps(
            move |_| {
                let listeners = error::optional("lightbox", attach_gallery(dispatcher));
                move || drop(listeners)
            },
            (),
        );
    }

    // Scroll follows the open/closed edge, never the initial render
    {
        let is_open = state.is_open();
        use_effect_with_deps(
            move |open: &bool| {
                let mut was_open = was_open.borrow_mut();
                if *was_open != *open {
                    if let Ok(document) = dom::document() {
                        dom::set_scroll_locked(&document, *open);
                    }
                    *was_open = *open;
                }
                || ()
            },
            is_open,
        );
    }

    {
        let dispatcher = state.dispatcher();
        use_event_with_window("keydown", move |e: KeyboardEvent| {
            if e.key() == "Escape" {
                dispatcher.dispatch(LightboxAction::Close);
            }
        });
    }

    let on_backdrop = {
        let dispatcher = state.dispatcher();
        let overlay_ref = overlay_ref.clone();
        Callback::from(move |e: MouseEvent| {
            let target = e.target_dyn_into::<Element>();
            if backdrop_click_closes(target.as_ref(), overlay_ref.cast::<Element>().as_ref()) {
                dispatcher.dispatch(LightboxAction::Close);
            }
        })
    };

    let on_close = {
        let dispatcher = state.dispatcher();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            dispatcher.dispatch(LightboxAction::Close);
        })
    };

    let (src, alt, caption) = match &*state {
        LightboxState::Open(image) => (image.src.clone(), image.alt.clone(), image.caption.clone()),
        LightboxState::Closed => (String::new(), String::new(), String::new()),
    };

    html! {
        <div
            id="lightbox"
            ref={overlay_ref}
            class={classes!("lightbox", state.is_open().then(|| "active"))}
            onclick={on_backdrop}
        >
            <button class="lightbox-close" aria-label="Close" onclick={on_close}>{"×"}</button>
            <img id="lightbox-image" src={src} alt={alt} />
            <p id="lightbox-caption">{caption}</p>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shot(src: &str, caption: &str) -> LightboxImage {
        LightboxImage { src: src.to_string(), alt: String::new(), caption: caption.to_string() }
    }

    fn reduce(state: LightboxState, action: LightboxAction) -> LightboxState {
        (*Rc::new(state).reduce(action)).clone()
    }

    #[test]
    fn activating_an_item_opens_with_its_payload() {
        let state = reduce(LightboxState::Closed, LightboxAction::Show(shot("a.jpg", "Shot 1")));
        assert_eq!(state, LightboxState::Open(shot("a.jpg", "Shot 1")));
        assert!(state.is_open());
    }

    #[test]
    fn escape_or_close_returns_to_closed() {
        let open = LightboxState::Open(shot("a.jpg", "Shot 1"));
        assert_eq!(reduce(open, LightboxAction::Close), LightboxState::Closed);
    }

    #[test]
    fn a_second_item_replaces_the_first_in_place() {
        let open = LightboxState::Open(shot("a.jpg", "Shot 1"));
        let state = reduce(open, LightboxAction::Show(shot("b.jpg", "Shot 2")));
        assert_eq!(state, LightboxState::Open(shot("b.jpg", "Shot 2")));
    }

    #[test]
    fn closing_when_closed_keeps_the_same_state() {
        let closed = Rc::new(LightboxState::Closed);
        let after = closed.clone().reduce(LightboxAction::Close);
        assert!(Rc::ptr_eq(&closed, &after));
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use gloo_timers::future::TimeoutFuture;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;
    use web_sys::{HtmlElement, KeyboardEventInit};

    fn body_overflow() -> String {
        let body = dom::document().unwrap().body().unwrap();
        body.style().get_property_value("overflow").unwrap()
    }

    #[wasm_bindgen_test]
    async fn gallery_click_locks_scroll_until_escape() {
        let document = dom::document().unwrap();
        let body = document.body().unwrap();
        let item = document.create_element("div").unwrap();
        item.set_class_name("gallery-item");
        item.set_inner_html(r#"<img src="a.jpg" alt=""><span class="gallery-caption">Shot 1</span>"#);
        body.append_child(&item).unwrap();
        let root = document.create_element("div").unwrap();
        body.append_child(&root).unwrap();

        let app = yew::Renderer::<Lightbox>::with_root(root.clone()).render();
        TimeoutFuture::new(20).await;

        item.unchecked_ref::<HtmlElement>().click();
        TimeoutFuture::new(20).await;
        assert_eq!(body_overflow(), "hidden");
        let overlay = document.get_element_by_id("lightbox").unwrap();
        assert!(overlay.class_list().contains("active"));
        let caption = document.get_element_by_id("lightbox-caption").unwrap();
        assert_eq!(caption.text_content().unwrap(), "Shot 1");

        let init = KeyboardEventInit::new();
        init.set_key("Escape");
        let escape = KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap();
        dom::window().unwrap().dispatch_event(&escape).unwrap();
        TimeoutFuture::new(20).await;
        assert_eq!(body_overflow(), "auto");
        assert!(!overlay.class_list().contains("active"));

        app.destroy();
        item.remove();
        root.remove();
    }

    #[wasm_bindgen_test]
    fn only_the_backdrop_itself_closes() {
        let document = dom::document().unwrap();
        let overlay = document.create_element("div").unwrap();
        let image = document.create_element("img").unwrap();
        overlay.append_child(&image).unwrap();

        assert!(backdrop_click_closes(Some(&overlay), Some(&overlay)));
        assert!(!backdrop_click_closes(Some(&image), Some(&overlay)));
        assert!(!backdrop_click_closes(None, Some(&overlay)));
    }

    #[wasm_bindgen_test]
    fn gallery_item_payload_comes_from_image_and_caption() {
        let document = dom::document().unwrap();
        let item = document.create_element("div").unwrap();
        item.set_inner_html(r#"<img src="a.jpg" alt="Rain"><span class="gallery-caption">Shot 1</span>"#);

        let image = gallery_image(&item).unwrap();
        assert_eq!(image.src, "a.jpg");
        assert_eq!(image.alt, "Rain");
        assert_eq!(image.caption, "Shot 1");
    }
}
