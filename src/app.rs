use crate::components::Lightbox;
use crate::config::ViewerConfig;
use crate::viewer::Viewer;
use leptos::logging::error;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    let viewer = Viewer::new(ViewerConfig::from_page());
    provide_context(viewer);

    // Triggers are static page markup, so one scan after mount is enough
    Effect::new(move || {
        if let Err(err) = viewer.attach() {
            error!("lightbox: could not attach triggers: {err}");
        }
        if let Err(err) = viewer.bind_window() {
            error!("lightbox: could not bind window events: {err}");
        }
        viewer.position();
    });

    view! { <Lightbox /> }
}
