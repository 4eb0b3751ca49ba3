use web_sys::{Document, Element};

use crate::config::ParallaxConfig;
use crate::dom;
use crate::schedule::Throttle;

pub fn layer_offset(scroll: f64, speed: f64) -> f64 {
    -(scroll * speed)
}

pub fn layer_transform(scroll: f64, speed: f64) -> String {
    format!("translateY({}px)", layer_offset(scroll, speed))
}

pub fn hero_transform(scroll: f64, zoom: f64, speed: f64) -> String {
    format!("scale({}) translateY({}px)", 1.0 + scroll * zoom, scroll * speed)
}

/// Grain gets slightly stronger towards the bottom of the page.
pub fn grain_opacity(scroll: f64, max_scroll: f64, base: f64, extra: f64) -> f64 {
    let progress = if max_scroll > 0.0 { (scroll / max_scroll).clamp(0.0, 1.0) } else { 0.0 };
    base + progress * extra
}

struct Layer {
    el: Element,
    speed: f64,
}

/// Everything on the page that moves with scroll depth.
pub struct ParallaxScene {
    layers: Vec<Layer>,
    hero: Option<Element>,
    grain: Option<Element>,
    grain_throttle: Throttle,
    config: ParallaxConfig,
}

impl ParallaxScene {
    pub fn collect(document: &Document, config: &ParallaxConfig) -> Self {
        let layers = dom::query_all(document, &config.selector)
            .into_iter()
            .map(|el| {
                let speed = el
                    .get_attribute("data-speed")
                    .and_then(|s| s.trim().parse::<f64>().ok())
                    .unwrap_or(config.default_speed);
                Layer { el, speed }
            })
            .collect();

        Self {
            layers,
            hero: dom::query(document, ".hero-image-bg"),
            grain: dom::query(document, ".grain-overlay"),
            grain_throttle: Throttle::new(config.grain_interval_ms),
            config: config.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty() && self.hero.is_none() && self.grain.is_none()
    }

    pub fn update(&mut self, scroll: f64, max_scroll: f64, now_ms: f64) {
        for layer in &self.layers {
            dom::set_style(&layer.el, "transform", &layer_transform(scroll, layer.speed));
        }

        if let Some(hero) = &self.hero {
            let transform = hero_transform(scroll, self.config.hero_zoom, self.config.hero_speed);
            dom::set_style(hero, "transform", &transform);
        }

        if let Some(grain) = &self.grain {
            if self.grain_throttle.allow(now_ms) {
                let opacity = grain_opacity(
                    scroll,
                    max_scroll,
                    self.config.grain_base_opacity,
                    self.config.grain_extra_opacity,
                );
                dom::set_style(grain, "opacity", &opacity.to_string());
            }
        }
    }
}
