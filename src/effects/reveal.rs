use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Array;
use web_sys::{Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::config::{CounterConfig, RevealConfig};
use crate::dom;
use crate::effects::counter;
use crate::error::{self, FxError};

/// One flag per observed element. Flags only ever go from unset to set.
#[derive(Debug, Default, Clone)]
pub struct RevealLedger {
    revealed: Vec<bool>,
}

impl RevealLedger {
    pub fn new(len: usize) -> Self {
        Self { revealed: vec![false; len] }
    }

    /// True only the first time `index` is marked.
    pub fn mark(&mut self, index: usize) -> bool {
        match self.revealed.get_mut(index) {
            Some(flag) if !*flag => {
                *flag = true;
                true
            }
            _ => false,
        }
    }

    #[cfg(test)]
    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }
}

/// Position of each item among the earlier items that share its group.
pub fn group_positions<K: PartialEq>(groups: &[K]) -> Vec<usize> {
    groups
        .iter()
        .enumerate()
        .map(|(i, key)| groups[..i].iter().filter(|k| *k == key).count())
        .collect()
}

pub fn stagger_delay_ms(position: usize, stagger_ms: u32) -> u32 {
    u32::try_from(position).unwrap_or(u32::MAX).saturating_mul(stagger_ms)
}

pub struct ObserveOptions<'a> {
    pub threshold: f64,
    pub root_margin: Option<&'a str>,
}

/// Calls `on_reveal` once per target, the first time it intersects the
/// viewport, then stops watching that target. Disconnects when dropped.
pub struct OneShotObserver {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl OneShotObserver {
    pub fn new<F>(targets: Vec<Element>, options: ObserveOptions<'_>, mut on_reveal: F) -> Result<Self, FxError>
    where
        F: FnMut(&Element) + 'static,
    {
        let mut ledger = RevealLedger::new(targets.len());
        let watched = targets.clone();

        let callback = Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                if !entry.is_intersecting() {
                    continue;
                }
                let target = entry.target();
                observer.unobserve(&target);
                if let Some(index) = watched.iter().position(|el| *el == target) {
                    if ledger.mark(index) {
                        on_reveal(&target);
                    }
                }
            }
        }) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        if let Some(margin) = options.root_margin {
            init.set_root_margin(margin);
        }

        let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        for target in &targets {
            observer.observe(target);
        }

        Ok(Self { observer, _callback: callback })
    }
}

impl Drop for OneShotObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

fn observe_class(
    document: &Document,
    selector: &'static str,
    threshold: f64,
    class: &'static str,
) -> Result<OneShotObserver, FxError> {
    let targets = dom::query_all(document, selector);
    if targets.is_empty() {
        return Err(FxError::MissingElement(selector));
    }
    OneShotObserver::new(targets, ObserveOptions { threshold, root_margin: None }, move |el| {
        let _ = el.class_list().add_1(class);
    })
}

fn observe_reveal_elements(document: &Document, config: &RevealConfig) -> Result<OneShotObserver, FxError> {
    let targets = dom::query_all(document, &config.selector);
    if targets.is_empty() {
        return Err(FxError::MissingElement("reveal elements"));
    }

    let parents: Vec<Option<Element>> = targets.iter().map(|el| el.parent_element()).collect();
    for (el, position) in targets.iter().zip(group_positions(&parents)) {
        let _ = el.class_list().add_1("reveal");
        let delay = stagger_delay_ms(position, config.stagger_ms);
        if delay > 0 {
            dom::set_style(el, "transition-delay", &format!("{}ms", delay));
        }
    }

    let options = ObserveOptions { threshold: config.threshold, root_margin: Some(config.root_margin.as_str()) };
    OneShotObserver::new(targets, options, |el| {
        let _ = el.class_list().add_1("active");
    })
}

fn observe_about_image(document: &Document) -> Result<OneShotObserver, FxError> {
    let image = dom::require(document, ".about-image img")?;
    OneShotObserver::new(vec![image], ObserveOptions { threshold: 0.3, root_margin: None }, |el| {
        if let Some(parent) = el.parent_element() {
            let _ = parent.class_list().add_1("image-revealed");
        }
    })
}

fn observe_counters(document: &Document, config: &CounterConfig) -> Result<OneShotObserver, FxError> {
    let targets = dom::query_all(document, ".stat-number");
    if targets.is_empty() {
        return Err(FxError::MissingElement(".stat-number"));
    }
    let config = config.clone();
    OneShotObserver::new(targets, ObserveOptions { threshold: config.threshold, root_margin: None }, move |el| {
        counter::animate(el.clone(), &config);
    })
}

/// Every scroll-triggered one-way transition on the page. Groups whose
/// markup is missing are skipped.
pub fn attach(document: &Document, reveal: &RevealConfig, counters: &CounterConfig) -> Vec<OneShotObserver> {
    let groups = [
        ("reveal", observe_reveal_elements(document, reveal)),
        ("section reveal", observe_class(document, "section", 0.1, "section-visible")),
        ("quote reveal", observe_class(document, ".quote", 0.3, "quote-visible")),
        ("about image reveal", observe_about_image(document)),
        ("counters", observe_counters(document, counters)),
    ];

    groups
        .into_iter()
        .filter_map(|(feature, result)| error::optional(feature, result))
        .collect()
}

/// Swaps `data-src` into `src` shortly before an image scrolls into view.
pub fn attach_lazy_images(document: &Document) -> Result<OneShotObserver, FxError> {
    let images = dom::query_all(document, "img[data-src]");
    if images.is_empty() {
        return Err(FxError::MissingElement("img[data-src]"));
    }
    OneShotObserver::new(images, ObserveOptions { threshold: 0.0, root_margin: Some("50px 0px") }, |img| {
        if let Some(src) = img.get_attribute("data-src") {
            let _ = img.set_attribute("src", &src);
            let _ = img.remove_attribute("data-src");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_marks_each_element_once() {
        let mut ledger = RevealLedger::new(3);
        assert!(ledger.mark(1));
        assert!(!ledger.mark(1));
        assert!(ledger.is_revealed(1));
        assert!(!ledger.is_revealed(0));
    }

    #[test]
    fn revealed_flags_stay_set() {
        let mut ledger = RevealLedger::new(2);
        ledger.mark(0);
        for _ in 0..5 {
            ledger.mark(1);
            assert!(ledger.is_revealed(0));
            assert!(ledger.is_revealed(1));
        }
    }

    #[test]
    fn out_of_range_marks_are_ignored() {
        let mut ledger = RevealLedger::new(1);
        assert!(!ledger.mark(4));
        assert!(!ledger.is_revealed(4));
    }

    #[test]
    fn positions_count_within_each_group() {
        let groups = ["works", "works", "about", "works", "about"];
        assert_eq!(group_positions(&groups), vec![0, 1, 0, 2, 1]);
    }

    #[test]
    fn stagger_grows_with_position() {
        assert_eq!(stagger_delay_ms(0, 80), 0);
        assert_eq!(stagger_delay_ms(3, 80), 240);
    }

    #[test]
    fn stagger_saturates_instead_of_wrapping() {
        assert_eq!(stagger_delay_ms(100_000, u32::MAX), u32::MAX);
        assert_eq!(stagger_delay_ms(usize::MAX, 80), u32::MAX);
    }
}
