use crate::error::ViewerError;
use crate::state::Size;
use leptos::logging::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use wasm_bindgen::JsValue;

const CONFIG_GLOBAL: &str = "lightboxConfig";
const CONFIG_SCRIPT_ID: &str = "lightbox-config";

/// Tunables for the viewer. Every field has a default, so a page only needs
/// to override what it cares about.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
    pub trigger_selector: String,
    pub border: f64,
    pub horizontal_spacer: f64,
    pub vertical_spacer: f64,
    pub fragment_chrome_width: f64,
    pub fragment_chrome_height: f64,
    /// Height taken from the frame by the close bar above a fragment pane.
    pub fragment_pane_inset: f64,
    pub loading_image: String,
    pub reveal_ms: u32,
    pub dismiss_ms: u32,
    pub keyboard: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            trigger_selector: "a.thickbox".to_string(),
            border: 5.0,
            horizontal_spacer: 10.0,
            vertical_spacer: 10.0,
            fragment_chrome_width: 30.0,
            fragment_chrome_height: 40.0,
            fragment_pane_inset: 45.0,
            loading_image: "/images/circle_animation.gif".to_string(),
            reveal_ms: 400,
            dismiss_ms: 200,
            keyboard: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FragmentLayout {
    pub frame: Size,
    pub pane: Size,
}

impl ViewerConfig {
    /// Read the config from `window.lightboxConfig`, then from a
    /// `<script id="lightbox-config">` JSON block, else use the defaults.
    pub fn from_page() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::default();
        };

        if let Ok(value) = js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL)) {
            if !value.is_undefined() && !value.is_null() {
                match serde_wasm_bindgen::from_value::<ViewerConfig>(value) {
                    Ok(config) => return config,
                    Err(err) => warn!("ignoring window.{CONFIG_GLOBAL}: {err}"),
                }
            }
        }

        let script = window
            .document()
            .and_then(|d| d.get_element_by_id(CONFIG_SCRIPT_ID))
            .and_then(|el| el.text_content());
        if let Some(json) = script {
            match Self::from_json(&json) {
                Ok(config) => return config,
                Err(err) => warn!("ignoring #{CONFIG_SCRIPT_ID}: {err}"),
            }
        }

        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Largest image that fits in the viewport once border and spacing are
    /// taken off.
    pub fn image_bounds(&self, viewport: Size) -> Size {
        Size::new(
            viewport.width - self.border - 2.0 * self.horizontal_spacer,
            viewport.height - self.border - 2.0 * self.vertical_spacer,
        )
    }

    pub fn image_frame(&self, display: Size) -> Size {
        Size::new(
            display.width + self.horizontal_spacer,
            display.height + self.vertical_spacer,
        )
    }

    /// Frame and pane sizes for a fragment declaring `width`/`height` in its
    /// query string.
    pub fn fragment_layout(&self, params: &HashMap<String, String>) -> Result<FragmentLayout, ViewerError> {
        let width = dimension(params, "width")?;
        let height = dimension(params, "height")?;
        let frame = Size::new(
            width + self.fragment_chrome_width,
            height + self.fragment_chrome_height,
        );
        let pane = Size::new(
            frame.width - self.fragment_chrome_width,
            (frame.height - self.fragment_pane_inset).max(0.0),
        );
        Ok(FragmentLayout { frame, pane })
    }
}

fn dimension(params: &HashMap<String, String>, key: &'static str) -> Result<f64, ViewerError> {
    params
        .get(key)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or(ViewerError::MissingDimension(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::parse_query;

    #[test]
    fn defaults_match_classic_margins() {
        let config = ViewerConfig::default();
        assert_eq!(config.trigger_selector, "a.thickbox");
        assert_eq!(config.border, 5.0);
        assert_eq!(config.horizontal_spacer, 10.0);
        assert_eq!(config.vertical_spacer, 10.0);
        assert!(config.keyboard);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = ViewerConfig::from_json(r#"{"triggerSelector": "a.lightbox", "revealMs": 0}"#).unwrap();
        assert_eq!(config.trigger_selector, "a.lightbox");
        assert_eq!(config.reveal_ms, 0);
        assert_eq!(config.dismiss_ms, 200);
        assert_eq!(config.loading_image, "/images/circle_animation.gif");
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(ViewerConfig::from_json("{not json").is_err());
        assert!(ViewerConfig::from_json(r#"{"border": "wide"}"#).is_err());
    }

    #[test]
    fn image_bounds_subtract_margins() {
        let bounds = ViewerConfig::default().image_bounds(Size::new(1024.0, 768.0));
        assert_eq!(bounds, Size::new(999.0, 743.0));
    }

    #[test]
    fn image_frame_adds_spacers() {
        let frame = ViewerConfig::default().image_frame(Size::new(400.0, 300.0));
        assert_eq!(frame, Size::new(410.0, 310.0));
    }

    #[test]
    fn fragment_frame_adds_chrome() {
        let config = ViewerConfig::default();
        for (w, h) in [(300.0, 200.0), (0.0, 0.0), (640.5, 480.0)] {
            let params = parse_query(&format!("/p.html?width={w}&height={h}&modal=true"));
            let layout = config.fragment_layout(&params).unwrap();
            assert_eq!(layout.frame, Size::new(w + 30.0, h + 40.0));
        }
    }

    #[test]
    fn fragment_pane_is_inset_under_close_bar() {
        let params = parse_query("/p.html?width=300&height=200");
        let layout = ViewerConfig::default().fragment_layout(&params).unwrap();
        assert_eq!(layout.pane, Size::new(300.0, 195.0));
    }

    #[test]
    fn fragment_needs_numeric_dimensions() {
        let config = ViewerConfig::default();
        let missing = parse_query("/p.html?width=300");
        assert_eq!(
            config.fragment_layout(&missing),
            Err(ViewerError::MissingDimension("height"))
        );

        let garbage = parse_query("/p.html?width=wide&height=10");
        assert_eq!(
            config.fragment_layout(&garbage),
            Err(ViewerError::MissingDimension("width"))
        );
    }
}
