use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewerError {
    #[error("no browser window is available")]
    NoWindow,
    #[error("no document is available")]
    NoDocument,
    #[error("DOM operation failed: {0}")]
    Dom(String),
    #[error("fragment url needs a numeric `{0}` query parameter")]
    MissingDimension(&'static str),
    #[error("could not load image {url}")]
    ImageLoad { url: String },
    #[error("could not fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
}

impl From<JsValue> for ViewerError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .or_else(|| {
                js_sys::Reflect::get(&value, &JsValue::from_str("message"))
                    .ok()
                    .and_then(|m| m.as_string())
            })
            .unwrap_or_else(|| format!("{value:?}"));
        ViewerError::Dom(message)
    }
}
