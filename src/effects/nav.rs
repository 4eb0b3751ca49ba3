use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, KeyboardEvent, MouseEvent, Window};

use crate::config::NavConfig;
use crate::dom::{self, Listener};
use crate::error::FxError;

/// Vertical extent of a page section in document coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionBounds {
    pub top: f64,
    pub height: f64,
}

/// Index of the section containing `scroll + lookahead`.
pub fn section_at(sections: &[SectionBounds], scroll: f64, lookahead: f64) -> Option<usize> {
    let probe = scroll + lookahead;
    sections
        .iter()
        .position(|s| probe > s.top && probe <= s.top + s.height)
}

/// Which section's link is highlighted. Once a section has been chosen one
/// always stays chosen: gaps between sections keep the previous choice.
#[derive(Default, Debug)]
pub struct ActiveSection {
    current: Option<usize>,
}

impl ActiveSection {
    /// Returns the newly active index when it changed.
    pub fn update(&mut self, sections: &[SectionBounds], scroll: f64, lookahead: f64) -> Option<usize> {
        match section_at(sections, scroll, lookahead) {
            Some(index) if self.current != Some(index) => {
                self.current = Some(index);
                Some(index)
            }
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn current(&self) -> Option<usize> {
        self.current
    }
}

/// Where to scroll so that an anchor target sits just below the fixed header.
pub fn anchor_scroll_top(target_viewport_top: f64, page_offset: f64, header_offset: f64) -> f64 {
    target_viewport_top + page_offset - header_offset
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavbarView {
    pub scrolled: bool,
    pub hidden: bool,
}

/// Navbar tucks away while the visitor scrolls down past `hide_after_px` and
/// comes back on any upward scroll.
#[derive(Debug, Default)]
pub struct NavbarState {
    last_scroll: f64,
}

impl NavbarState {
    pub fn update(&mut self, scroll: f64, config: &NavConfig) -> NavbarView {
        let view = NavbarView {
            scrolled: scroll > config.scrolled_after_px,
            hidden: scroll > self.last_scroll && scroll > config.hide_after_px,
        };
        self.last_scroll = scroll;
        view
    }
}

pub fn apply_navbar(navbar: &Element, view: NavbarView) {
    dom::toggle_class(navbar, "scrolled", view.scrolled);
    let transform = if view.hidden { "translateY(-100%)" } else { "translateY(0)" };
    dom::set_style(navbar, "transform", transform);
}

/// Highlights the nav link of the section currently in view.
pub struct ActiveLinkTracker {
    sections: Vec<(HtmlElement, Element)>,
    all_links: Vec<Element>,
    active: ActiveSection,
    lookahead: f64,
}

impl ActiveLinkTracker {
    pub fn collect(document: &Document, config: &NavConfig) -> Result<Self, FxError> {
        let sections: Vec<(HtmlElement, Element)> = dom::query_all(document, "section[id]")
            .into_iter()
            .filter_map(|section| {
                let id = section.id();
                let link = dom::query(document, &format!(".nav-link[href=\"#{}\"]", id))?;
                let section = section.dyn_into::<HtmlElement>().ok()?;
                Some((section, link))
            })
            .collect();

        if sections.is_empty() {
            return Err(FxError::MissingElement("section[id] with a matching .nav-link"));
        }

        Ok(Self {
            sections,
            all_links: dom::query_all(document, ".nav-link"),
            active: ActiveSection::default(),
            lookahead: config.lookahead_px,
        })
    }

    pub fn update(&mut self, scroll: f64) {
        let bounds: Vec<SectionBounds> = self
            .sections
            .iter()
            .map(|(section, _)| SectionBounds {
                top: section.offset_top() as f64,
                height: section.offset_height() as f64,
            })
            .collect();

        if let Some(index) = self.active.update(&bounds, scroll, self.lookahead) {
            for link in &self.all_links {
                let _ = link.class_list().remove_1("active");
            }
            let _ = self.sections[index].1.class_list().add_1("active");
        }
    }
}

/// Open/closed state of the small-screen menu.
#[derive(Debug, Default)]
pub struct MobileMenu {
    open: bool,
}

impl MobileMenu {
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Returns whether the menu was open before closing it.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }

    #[cfg(test)]
    pub fn is_open(&self) -> bool {
        self.open
    }
}

struct MenuView {
    document: Document,
    toggle: Element,
    menu: Element,
}

impl MenuView {
    fn render(&self, open: bool) {
        dom::toggle_class(&self.toggle, "active", open);
        dom::toggle_class(&self.menu, "active", open);
        dom::set_scroll_locked(&self.document, open);
    }
}

/// Burger toggle, close-on-link and close-on-Escape for the mobile menu.
pub fn attach_menu(document: &Document) -> Result<Vec<Listener>, FxError> {
    let view = Rc::new(MenuView {
        document: document.clone(),
        toggle: dom::require(document, "#nav-toggle")?,
        menu: dom::require(document, "#nav-menu")?,
    });
    let state = Rc::new(RefCell::new(MobileMenu::default()));
    let mut listeners = Vec::new();

    {
        let toggle = view.toggle.clone();
        let (view, state) = (view.clone(), state.clone());
        listeners.push(dom::listen(&toggle, "click", move |_: MouseEvent| {
            let open = state.borrow_mut().toggle();
            view.render(open);
        }));
    }

    for link in dom::query_all(document, ".nav-link") {
        let (view, state) = (view.clone(), state.clone());
        listeners.push(dom::listen(&link, "click", move |_: MouseEvent| {
            state.borrow_mut().close();
            view.render(false);
        }));
    }

    listeners.push(dom::listen(document, "keydown", move |e: KeyboardEvent| {
        if e.key() == "Escape" && state.borrow_mut().close() {
            view.render(false);
        }
    }));

    Ok(listeners)
}

/// In-page anchors scroll smoothly and stop short of the fixed header.
pub fn attach_smooth_scroll(document: &Document, window: &Window, config: &NavConfig) -> Result<Vec<Listener>, FxError> {
    let mut listeners = Vec::new();
    for anchor in dom::query_all(document, "a[href^=\"#\"]") {
        let document = document.clone();
        let window = window.clone();
        let header_offset = config.header_offset_px;
        let href = anchor.get_attribute("href").unwrap_or_default();

        listeners.push(dom::listen_cancelable(&anchor, "click", move |e: MouseEvent| {
            e.prevent_default();
            if href == "#" {
                return;
            }
            if let Some(target) = dom::query(&document, &href) {
                let top = target.get_bounding_client_rect().top();
                let destination = anchor_scroll_top(top, dom::scroll_y(&window), header_offset);
                dom::smooth_scroll_to(&window, destination.max(0.0));
            }
        }));
    }
    Ok(listeners)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Vec<SectionBounds> {
        vec![
            SectionBounds { top: 0.0, height: 800.0 },
            SectionBounds { top: 800.0, height: 600.0 },
            SectionBounds { top: 1400.0, height: 1000.0 },
        ]
    }

    fn active_flags(count: usize, active: Option<usize>) -> Vec<bool> {
        (0..count).map(|i| Some(i) == active).collect()
    }

    #[test]
    fn probe_includes_the_lookahead() {
        let sections = page();
        assert_eq!(section_at(&sections, 0.0, 100.0), Some(0));
        assert_eq!(section_at(&sections, 699.0, 100.0), Some(0));
        assert_eq!(section_at(&sections, 700.0, 100.0), Some(0));
        assert_eq!(section_at(&sections, 701.0, 100.0), Some(1));
        assert_eq!(section_at(&sections, 1350.0, 100.0), Some(2));
    }

    #[test]
    fn exactly_one_link_is_active_across_the_page() {
        let sections = page();
        let mut active = ActiveSection::default();
        let mut scroll = 0.0;
        while scroll < 2300.0 {
            active.update(&sections, scroll, 100.0);
            let expected = section_at(&sections, scroll, 100.0).unwrap();
            let flags = active_flags(sections.len(), active.current());
            assert_eq!(flags.iter().filter(|f| **f).count(), 1, "scroll {}", scroll);
            assert!(flags[expected], "scroll {}", scroll);
            scroll += 37.0;
        }
    }

    #[test]
    fn update_reports_only_changes() {
        let sections = page();
        let mut active = ActiveSection::default();
        assert_eq!(active.update(&sections, 0.0, 100.0), Some(0));
        assert_eq!(active.update(&sections, 10.0, 100.0), None);
        assert_eq!(active.update(&sections, 900.0, 100.0), Some(1));
    }

    #[test]
    fn gaps_keep_the_previous_section() {
        let sections = vec![
            SectionBounds { top: 0.0, height: 500.0 },
            SectionBounds { top: 900.0, height: 500.0 },
        ];
        let mut active = ActiveSection::default();
        active.update(&sections, 100.0, 100.0);
        assert_eq!(active.update(&sections, 600.0, 100.0), None);
        assert_eq!(active.current(), Some(0));
    }

    #[test]
    fn anchor_lands_below_the_header() {
        assert_eq!(anchor_scroll_top(300.0, 1200.0, 80.0), 1420.0);
    }

    #[test]
    fn navbar_hides_only_when_scrolling_down_far() {
        let config = NavConfig::default();
        let mut navbar = NavbarState::default();
        assert_eq!(navbar.update(30.0, &config), NavbarView { scrolled: false, hidden: false });
        assert_eq!(navbar.update(400.0, &config), NavbarView { scrolled: true, hidden: false });
        assert_eq!(navbar.update(700.0, &config), NavbarView { scrolled: true, hidden: true });
        assert_eq!(navbar.update(650.0, &config), NavbarView { scrolled: true, hidden: false });
    }

    #[test]
    fn mobile_menu_toggles_and_closes() {
        let mut menu = MobileMenu::default();
        assert!(menu.toggle());
        assert!(menu.is_open());
        assert!(menu.close());
        assert!(!menu.close());
        assert!(!menu.is_open());
    }
}
