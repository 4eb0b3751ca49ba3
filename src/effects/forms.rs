use once_cell::sync::Lazy;
use regex::Regex;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlInputElement, HtmlTextAreaElement};

use crate::dom::{self, Listener};
use crate::error::FxError;

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

pub fn is_valid_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

/// A required field is valid when it is not blank, and for email inputs
/// when it also looks like an address.
pub fn field_is_valid(input_type: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        return false;
    }
    input_type != "email" || is_valid_email(value)
}

fn field_value(field: &Element) -> Option<(String, String)> {
    if let Some(input) = field.dyn_ref::<HtmlInputElement>() {
        return Some((input.type_(), input.value()));
    }
    field
        .dyn_ref::<HtmlTextAreaElement>()
        .map(|area| ("textarea".to_string(), area.value()))
}

/// Flags invalid required fields with `error` and blocks the submit.
pub fn attach(document: &Document) -> Result<Vec<Listener>, FxError> {
    let forms = dom::query_all(document, "form[data-validate]");
    if forms.is_empty() {
        return Err(FxError::MissingElement("form[data-validate]"));
    }

    let mut listeners = Vec::with_capacity(forms.len());
    for form in forms {
        let target = form.clone();
        listeners.push(dom::listen_cancelable(&form, "submit", move |e: Event| {
            let mut all_valid = true;
            for field in dom::query_all_in(&target, "input[required], textarea[required]") {
                let Some((input_type, value)) = field_value(&field) else {
                    continue;
                };
                let valid = field_is_valid(&input_type, &value);
                dom::toggle_class(&field, "error", !valid);
                all_valid &= valid;
            }
            if !all_valid {
                e.prevent_default();
                log::debug!("form submission blocked by validation");
            }
        }));
    }
    Ok(listeners)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_required_fields_are_invalid() {
        assert!(!field_is_valid("text", ""));
        assert!(!field_is_valid("textarea", "   \n"));
        assert!(field_is_valid("text", "Aung"));
    }

    #[test]
    fn email_fields_need_an_address() {
        assert!(field_is_valid("email", "studio@example.com"));
        assert!(!field_is_valid("email", "studio@example"));
        assert!(!field_is_valid("email", "studio example.com"));
        assert!(!field_is_valid("email", "@example.com"));
    }

    #[test]
    fn other_types_skip_the_email_check() {
        assert!(field_is_valid("text", "not-an-email"));
    }
}
