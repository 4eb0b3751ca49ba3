use gloo_timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::config::CounterConfig;

/// What a stat readout counts up to: `"150+"` is 150 with suffix `"+"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CounterTarget {
    pub value: u64,
    pub suffix: String,
    pub original: String,
}

impl CounterTarget {
    /// Leading integer of the text, after optional whitespace. Text that does
    /// not start with a positive integer has nothing to animate.
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim_start();
        let digits_end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        let value: u64 = trimmed[..digits_end].parse().ok()?;
        if value == 0 {
            return None;
        }
        Some(Self {
            value,
            suffix: trimmed[digits_end..].to_string(),
            original: text.to_string(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CounterFrame {
    Intermediate(String),
    Final(String),
}

pub struct CounterAnimation {
    target: CounterTarget,
    steps: u32,
    step: u32,
}

impl CounterAnimation {
    pub fn new(target: CounterTarget, steps: u32) -> Self {
        Self { target, steps: steps.max(1), step: 0 }
    }

    pub fn tick(&mut self) -> CounterFrame {
        self.step = (self.step + 1).min(self.steps);
        let current = self.target.value as f64 * self.step as f64 / self.steps as f64;
        if self.step >= self.steps || current >= self.target.value as f64 {
            CounterFrame::Final(self.target.original.clone())
        } else {
            CounterFrame::Intermediate(format!("{}{}", current.floor() as u64, self.target.suffix))
        }
    }
}

/// Counts `el` up from zero to its current text, then puts the exact text back.
pub fn animate(el: Element, config: &CounterConfig) {
    let Some(target) = el.text_content().as_deref().and_then(CounterTarget::parse) else {
        log::debug!("counter skipped, no numeric target in {:?}", el.text_content());
        return;
    };

    let mut animation = CounterAnimation::new(target, config.steps);
    let tick_ms = config.tick_ms;
    spawn_local(async move {
        loop {
            TimeoutFuture::new(tick_ms).await;
            match animation.tick() {
                CounterFrame::Intermediate(text) => el.set_text_content(Some(&text)),
                CounterFrame::Final(text) => {
                    el.set_text_content(Some(&text));
                    break;
                }
            }
        }
    });
}
