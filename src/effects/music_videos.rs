use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, MouseEvent};

use crate::dom::{self, Listener};
use crate::error::FxError;

/// A click on the card body follows the card's link; clicks on the link
/// itself, or anything inside it, already navigate.
pub fn forwards_click(target_tag: &str, inside_link: bool) -> bool {
    !target_tag.eq_ignore_ascii_case("a") && !inside_link
}

fn clicked_link(e: &MouseEvent) -> Option<(String, bool)> {
    let target = e.target()?.dyn_into::<Element>().ok()?;
    let inside_link = target.closest("a").ok().flatten().is_some();
    Some((target.tag_name(), inside_link))
}

/// Makes every `.mv-card` with a link clickable as a whole.
pub fn attach(document: &Document) -> Result<Vec<Listener>, FxError> {
    let cards = dom::query_all(document, ".mv-card");
    if cards.is_empty() {
        return Err(FxError::MissingElement(".mv-card"));
    }

    let mut listeners = Vec::with_capacity(cards.len());
    for card in cards {
        let link = card
            .query_selector("a")
            .ok()
            .flatten()
            .and_then(|a| a.dyn_into::<HtmlElement>().ok());
        let Some(link) = link else {
            continue;
        };
        listeners.push(dom::listen(&card, "click", move |e: MouseEvent| {
            if let Some((tag, inside_link)) = clicked_link(&e) {
                if forwards_click(&tag, inside_link) {
                    link.click();
                }
            }
        }));
    }
    Ok(listeners)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_body_clicks_follow_the_link() {
        assert!(forwards_click("DIV", false));
        assert!(forwards_click("IMG", false));
    }

    #[test]
    fn link_clicks_are_left_alone() {
        assert!(!forwards_click("A", true));
        assert!(!forwards_click("a", false));
        assert!(!forwards_click("SPAN", true));
    }
}
