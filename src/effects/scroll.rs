use std::cell::RefCell;
use std::rc::Rc;

use web_sys::{Document, Element, Event, MouseEvent, Window};

use crate::config::{FxConfig, NavConfig};
use crate::dom::{self, Listener};
use crate::effects::nav::{self, ActiveLinkTracker, NavbarState};
use crate::effects::parallax::ParallaxScene;
use crate::error::{self, FxError};
use crate::schedule::{self, FrameCoalescer};

pub fn progress_percent(scroll_top: f64, scroll_height: f64, client_height: f64) -> f64 {
    let scrollable = scroll_height - client_height;
    if scrollable <= 0.0 {
        return 0.0;
    }
    (scroll_top / scrollable * 100.0).clamp(0.0, 100.0)
}

/// Everything that reacts to the scroll position, updated together once per frame.
pub struct ScrollScene {
    window: Window,
    document: Document,
    navbar: Option<Element>,
    navbar_state: NavbarState,
    progress_bar: Option<Element>,
    back_to_top: Option<Element>,
    links: Option<ActiveLinkTracker>,
    parallax: ParallaxScene,
    nav: NavConfig,
}

impl ScrollScene {
    pub fn collect(window: &Window, document: &Document, config: &FxConfig, progress_bar: Option<Element>) -> Self {
        Self {
            window: window.clone(),
            document: document.clone(),
            navbar: document.get_element_by_id("navbar"),
            navbar_state: NavbarState::default(),
            progress_bar,
            back_to_top: document.get_element_by_id("backToTop"),
            links: error::optional("active nav link", ActiveLinkTracker::collect(document, &config.nav)),
            parallax: ParallaxScene::collect(document, &config.parallax),
            nav: config.nav.clone(),
        }
    }

    fn max_scroll(&self) -> (f64, f64) {
        match self.document.document_element() {
            Some(root) => (root.scroll_height() as f64, root.client_height() as f64),
            None => (0.0, dom::viewport_height(&self.window)),
        }
    }

    pub fn update(&mut self) {
        let scroll = dom::scroll_y(&self.window);
        let (scroll_height, client_height) = self.max_scroll();

        if let Some(navbar) = &self.navbar {
            let view = self.navbar_state.update(scroll, &self.nav);
            nav::apply_navbar(navbar, view);
        }

        if let Some(bar) = &self.progress_bar {
            let percent = progress_percent(scroll, scroll_height, client_height);
            dom::set_style(bar, "width", &format!("{}%", percent));
        }

        if let Some(button) = &self.back_to_top {
            dom::toggle_class(button, "visible", scroll > self.nav.back_to_top_after_px);
        }

        if let Some(links) = &mut self.links {
            links.update(scroll);
        }

        if !self.parallax.is_empty() {
            let max_scroll = scroll_height - dom::viewport_height(&self.window);
            self.parallax.update(scroll, max_scroll, schedule::now_ms());
        }
    }
}

/// Keeps the single scroll listener alive.
pub struct ScrollHandle {
    _listeners: Vec<Listener>,
    _frames: Rc<FrameCoalescer>,
}

pub fn attach(window: &Window, scene: ScrollScene) -> Result<ScrollHandle, FxError> {
    let back_to_top = scene.back_to_top.clone();
    let scene = Rc::new(RefCell::new(scene));
    scene.borrow_mut().update();

    let frames = {
        let scene = scene.clone();
        Rc::new(FrameCoalescer::new(move || scene.borrow_mut().update()))
    };

    let mut listeners = Vec::new();
    {
        let frames = frames.clone();
        listeners.push(dom::listen(window, "scroll", move |_: Event| frames.request()));
    }

    if let Some(button) = back_to_top {
        let window = window.clone();
        listeners.push(dom::listen(&button, "click", move |_: MouseEvent| {
            dom::smooth_scroll_to(&window, 0.0);
        }));
    }

    Ok(ScrollHandle { _listeners: listeners, _frames: frames })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_spans_the_scrollable_height() {
        assert_eq!(progress_percent(0.0, 3000.0, 1000.0), 0.0);
        assert_eq!(progress_percent(1000.0, 3000.0, 1000.0), 50.0);
        assert_eq!(progress_percent(2000.0, 3000.0, 1000.0), 100.0);
    }

    #[test]
    fn short_pages_report_no_progress() {
        assert_eq!(progress_percent(0.0, 800.0, 1000.0), 0.0);
    }

    #[test]
    fn overscroll_is_clamped() {
        assert_eq!(progress_percent(2600.0, 3000.0, 1000.0), 100.0);
        assert_eq!(progress_percent(-40.0, 3000.0, 1000.0), 0.0);
    }
}
