use crate::error::ViewerError;
use crate::state::{PageMetrics, Size, Trigger};
use gloo_net::http::Request;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, Event, EventTarget, HtmlAnchorElement, HtmlElement, HtmlImageElement, Window};

pub fn window() -> Result<Window, ViewerError> {
    web_sys::window().ok_or(ViewerError::NoWindow)
}

pub fn document() -> Result<Document, ViewerError> {
    window()?.document().ok_or(ViewerError::NoDocument)
}

/// Collect every element matching `selector`, in document order, along with
/// the trigger it describes.
pub fn scan_triggers(document: &Document, selector: &str) -> Result<Vec<(Element, Trigger)>, ViewerError> {
    let nodes = document.query_selector_all(selector)?;
    let mut found = Vec::with_capacity(nodes.length() as usize);

    for i in 0..nodes.length() {
        let Some(element) = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        // Anchors report an absolute href, which is what navigation compares.
        let href = element
            .dyn_ref::<HtmlAnchorElement>()
            .map(|a| a.href())
            .or_else(|| element.get_attribute("href"));
        let Some(href) = href.filter(|h| !h.is_empty()) else {
            continue;
        };

        let trigger = Trigger::from_attributes(
            href,
            element.get_attribute("title"),
            element.text_content(),
            element.get_attribute("rel"),
            Some(element.id()),
            element.get_attribute("name"),
        );
        found.push((element, trigger));
    }

    Ok(found)
}

pub fn page_metrics() -> PageMetrics {
    let Ok(window) = window() else {
        return PageMetrics::default();
    };
    let read = |value: Result<JsValue, JsValue>| value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let viewport = Size::new(read(window.inner_width()), read(window.inner_height()));
    let scroll_y = window.scroll_y().unwrap_or(0.0);
    let document_height = window
        .document()
        .and_then(|d| d.body())
        .map(|body| body.scroll_height().max(body.offset_height()) as f64)
        .unwrap_or(viewport.height);

    PageMetrics {
        viewport,
        scroll_y,
        document_height,
    }
}

/// Load an image off-screen and report its natural size.
pub async fn preload_image(url: &str) -> Result<Size, ViewerError> {
    let img = HtmlImageElement::new()?;
    let loader = img.clone();
    let promise = js_sys::Promise::new(&mut |resolve, reject| {
        loader.set_onload(Some(&resolve));
        loader.set_onerror(Some(&reject));
    });
    img.set_src(url);

    let loaded = JsFuture::from(promise).await;
    img.set_onload(None);
    img.set_onerror(None);
    loaded.map_err(|_| ViewerError::ImageLoad { url: url.to_string() })?;

    Ok(Size::new(img.natural_width() as f64, img.natural_height() as f64))
}

pub async fn fetch_fragment(url: &str) -> Result<String, ViewerError> {
    let fetch_error = |reason: String| ViewerError::Fetch {
        url: url.to_string(),
        reason,
    };
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| fetch_error(e.to_string()))?;
    if !response.ok() {
        return Err(fetch_error(format!("status {}", response.status())));
    }
    response.text().await.map_err(|e| fetch_error(e.to_string()))
}

pub fn alert(message: &str) {
    if let Ok(window) = window() {
        let _ = window.alert_with_message(message);
    }
}

/// Bind `handler` to `event` on `target` for the lifetime of the page.
pub fn listen<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), ViewerError>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

pub fn blur_current_target(event: &Event) {
    if let Some(el) = event.current_target().and_then(|t| t.dyn_into::<HtmlElement>().ok()) {
        let _ = el.blur();
    }
}
