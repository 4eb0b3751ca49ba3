use web_sys::{Document, DomRect, Element, MouseEvent};

use crate::config::HoverConfig;
use crate::dom::{self, Listener};
use crate::error::FxError;

/// Bounding box in client coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl From<DomRect> for Bounds {
    fn from(rect: DomRect) -> Self {
        Self { left: rect.left(), top: rect.top(), width: rect.width(), height: rect.height() }
    }
}

pub fn magnetic_offset(bounds: Bounds, x: f64, y: f64, strength: f64) -> (f64, f64) {
    let dx = x - bounds.left - bounds.width / 2.0;
    let dy = y - bounds.top - bounds.height / 2.0;
    (dx * strength, dy * strength)
}

/// Rotation in degrees as `(rotate_x, rotate_y)`. Zero at the center, `max_deg`
/// at the edges: the card leans towards the pointer.
pub fn tilt_angles(bounds: Bounds, x: f64, y: f64, max_deg: f64) -> (f64, f64) {
    if bounds.width <= 0.0 || bounds.height <= 0.0 {
        return (0.0, 0.0);
    }
    let nx = ((x - bounds.left) / bounds.width * 2.0 - 1.0).clamp(-1.0, 1.0);
    let ny = ((y - bounds.top) / bounds.height * 2.0 - 1.0).clamp(-1.0, 1.0);
    (ny * max_deg, -nx * max_deg)
}

pub fn tilt_transform(config: &HoverConfig, angles: Option<(f64, f64)>) -> String {
    match angles {
        Some((rx, ry)) => format!(
            "perspective({}px) rotateX({}deg) rotateY({}deg) translateY(-{}px)",
            config.tilt_perspective_px, rx, ry, config.tilt_lift_px
        ),
        None => format!(
            "perspective({}px) rotateX(0deg) rotateY(0deg) translateY(0px)",
            config.tilt_perspective_px
        ),
    }
}

fn bounds_of(el: &Element) -> Bounds {
    el.get_bounding_client_rect().into()
}

pub fn attach_magnetic(document: &Document, config: &HoverConfig) -> Result<Vec<Listener>, FxError> {
    let buttons = dom::query_all(document, ".btn-magnetic");
    if buttons.is_empty() {
        return Err(FxError::MissingElement(".btn-magnetic"));
    }

    let mut listeners = Vec::with_capacity(buttons.len() * 2);
    for button in buttons {
        let strength = config.magnetic_strength;
        let target = button.clone();
        listeners.push(dom::listen(&button, "mousemove", move |e: MouseEvent| {
            let (x, y) = magnetic_offset(bounds_of(&target), e.client_x() as f64, e.client_y() as f64, strength);
            dom::set_style(&target, "transform", &format!("translate({}px, {}px)", x, y));
        }));

        let target = button.clone();
        listeners.push(dom::listen(&button, "mouseleave", move |_: MouseEvent| {
            dom::set_style(&target, "transform", "translate(0px, 0px)");
        }));
    }
    Ok(listeners)
}

pub fn attach_tilt(document: &Document, config: &HoverConfig) -> Result<Vec<Listener>, FxError> {
    let cards = dom::query_all(document, ".work-card");
    if cards.is_empty() {
        return Err(FxError::MissingElement(".work-card"));
    }

    let mut listeners = Vec::with_capacity(cards.len() * 2);
    for card in cards {
        let target = card.clone();
        let move_config = config.clone();
        listeners.push(dom::listen(&card, "mousemove", move |e: MouseEvent| {
            let angles = tilt_angles(
                bounds_of(&target),
                e.client_x() as f64,
                e.client_y() as f64,
                move_config.tilt_max_deg,
            );
            dom::set_style(&target, "transform", &tilt_transform(&move_config, Some(angles)));
        }));

        let target = card.clone();
        let leave_config = config.clone();
        listeners.push(dom::listen(&card, "mouseleave", move |_: MouseEvent| {
            dom::set_style(&target, "transform", &tilt_transform(&leave_config, None));
        }));
    }
    Ok(listeners)
}
