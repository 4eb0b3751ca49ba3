use thiserror::Error;
use wasm_bindgen::JsValue;

/// Reasons a page feature could not be wired up. None of these reach the
/// visitor: the caller logs and leaves the feature off.
#[derive(Error, Debug)]
pub enum FxError {
    #[error("no browser window")]
    NoWindow,

    #[error("required element `{0}` is not on the page")]
    MissingElement(&'static str),

    #[error("javascript call failed: {0}")]
    Js(String),

    #[error("invalid fx-config: {0}")]
    Config(#[from] serde_json::Error),
}

impl From<JsValue> for FxError {
    fn from(value: JsValue) -> Self {
        FxError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

impl FxError {
    /// Missing markup is an expected way for a feature to be off; everything
    /// else deserves a warning.
    pub fn log(&self, feature: &str) {
        match self {
            FxError::MissingElement(_) => log::debug!("{} disabled: {}", feature, self),
            _ => log::warn!("{} disabled: {}", feature, self),
        }
    }
}

/// Turns a failed setup into a disabled feature.
pub fn optional<T>(feature: &str, result: Result<T, FxError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            e.log(feature);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_element_names_the_selector() {
        let err = FxError::MissingElement("#lightbox");
        assert!(err.to_string().contains("#lightbox"));
    }

    #[test]
    fn config_errors_convert_from_serde() {
        let parse = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let err: FxError = parse.into();
        assert!(matches!(err, FxError::Config(_)));
    }
}
