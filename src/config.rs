use serde::Deserialize;
use web_sys::Document;

use crate::error::FxError;

#[cfg(debug_assertions)]
pub fn log_level() -> log::Level {
    log::Level::Debug  // Verbose while developing locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> log::Level {
    log::Level::Info
}

/// Id of the optional `<script type="application/json">` block that tunes the effects.
pub const CONFIG_ELEMENT_ID: &str = "fx-config";

#[derive(Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub struct FxConfig {
    pub preloader: PreloaderConfig,
    pub cursor: CursorConfig,
    pub parallax: ParallaxConfig,
    pub hover: HoverConfig,
    pub reveal: RevealConfig,
    pub counter: CounterConfig,
    pub timecode: TimecodeConfig,
    pub flash: FlashConfig,
    pub nav: NavConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PreloaderConfig {
    pub start: u32,
    pub end: u32,
    pub step_ms: u32,
    pub hold_ms: u32,
}

impl Default for PreloaderConfig {
    fn default() -> Self {
        Self { start: 5, end: 1, step_ms: 900, hold_ms: 500 }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CursorConfig {
    pub dot_ease: f64,
    pub follower_ease: f64,
    pub dot_radius: f64,
    pub follower_radius: f64,
    /// Viewports this wide or narrower never get the custom cursor.
    pub min_viewport_width: f64,
    pub hover_selector: String,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            dot_ease: 0.2,
            follower_ease: 0.1,
            dot_radius: 6.0,
            follower_radius: 20.0,
            min_viewport_width: 768.0,
            hover_selector: "a, button, .work-card, .btn".to_string(),
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ParallaxConfig {
    pub selector: String,
    pub default_speed: f64,
    pub hero_speed: f64,
    pub hero_zoom: f64,
    pub grain_base_opacity: f64,
    pub grain_extra_opacity: f64,
    pub grain_interval_ms: f64,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            selector: ".about-bg-text, .works-bg-element, [data-parallax]".to_string(),
            default_speed: 0.5,
            hero_speed: 0.3,
            hero_zoom: 0.0002,
            grain_base_opacity: 0.03,
            grain_extra_opacity: 0.02,
            grain_interval_ms: 50.0,
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct HoverConfig {
    pub magnetic_strength: f64,
    pub tilt_max_deg: f64,
    pub tilt_perspective_px: f64,
    pub tilt_lift_px: f64,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self { magnetic_strength: 0.2, tilt_max_deg: 6.0, tilt_perspective_px: 1000.0, tilt_lift_px: 10.0 }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RevealConfig {
    pub selector: String,
    pub threshold: f64,
    pub root_margin: String,
    pub stagger_ms: u32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selector: ".section-header, .about-image-wrapper, .about-text, .work-card, \
                       .ongoing-content > *, .support-text, .cta-card, .stat-item"
                .to_string(),
            threshold: 0.1,
            root_margin: "0px 0px -100px 0px".to_string(),
            stagger_ms: 80,
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CounterConfig {
    pub steps: u32,
    pub tick_ms: u32,
    pub threshold: f64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self { steps: 30, tick_ms: 50, threshold: 0.5 }
    }
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimecodeMode {
    #[default]
    Elapsed,
    TimeOfDay,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TimecodeConfig {
    pub mode: TimecodeMode,
    pub fps: u32,
}

impl Default for TimecodeConfig {
    fn default() -> Self {
        Self { mode: TimecodeMode::Elapsed, fps: 24 }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct FlashConfig {
    pub chance: f64,
    pub duration_ms: u32,
    pub trigger_selector: String,
}

impl Default for FlashConfig {
    fn default() -> Self {
        Self { chance: 0.1, duration_ms: 500, trigger_selector: ".work-card, .stat-item".to_string() }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct NavConfig {
    pub lookahead_px: f64,
    pub header_offset_px: f64,
    pub scrolled_after_px: f64,
    pub hide_after_px: f64,
    pub back_to_top_after_px: f64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            lookahead_px: 100.0,
            header_offset_px: 80.0,
            scrolled_after_px: 50.0,
            hide_after_px: 500.0,
            back_to_top_after_px: 500.0,
        }
    }
}

impl FxConfig {
    pub fn from_json(raw: &str) -> Result<Self, FxError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads the page's config block. A page without one gets the defaults,
    /// and so does a page whose block does not parse.
    pub fn load(document: &Document) -> Self {
        let raw = document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content());

        match raw {
            Some(raw) if !raw.trim().is_empty() => match Self::from_json(&raw) {
                Ok(config) => config,
                Err(e) => {
                    e.log("fx-config");
                    Self::default()
                }
            },
            _ => Self::default(),
        }
    }
}
