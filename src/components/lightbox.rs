use leptos::prelude::*;
use crate::components::{FragmentFrame, ImageFrame, LoadingIndicator};
use crate::session::{Content, Phase};
use crate::state::{place_frame, PageMetrics};
use crate::viewer::Viewer;

const KEYFRAMES: &str = "\
@keyframes lightbox-reveal { from { opacity: 0; transform: translateY(-16px); } to { opacity: 1; transform: none; } }
@keyframes lightbox-dismiss { from { opacity: 1; } to { opacity: 0; } }";

fn backdrop_style(page: &PageMetrics) -> String {
    format!(
        "position: absolute; top: 0; left: 0; width: 100%; height: {}px; \
         background: #000; opacity: 0.6; z-index: 100; cursor: pointer;",
        page.backdrop_height()
    )
}

/// Backdrop, loading indicator and content frame for the live session.
/// Nothing is rendered while the viewer is closed.
#[component]
pub fn Lightbox() -> impl IntoView {
    let viewer = use_context::<Viewer>().unwrap();

    let overlay = move || {
        viewer.session.get().map(|session| {
            let config = viewer.config();

            let loading = session.shows_loading().then(|| {
                view! { <LoadingIndicator src=config.loading_image.clone() /> }
            });

            let body = match session.content.clone() {
                Content::Image(image) => image.display.map(|_| {
                    view! {
                        <ImageFrame caption=session.caption.clone() url=session.url.clone() image=image />
                    }
                    .into_any()
                }),
                Content::Fragment(fragment) => Some(view! { <FragmentFrame fragment=fragment /> }.into_any()),
                Content::Unrecognized => None,
            };

            let frame = body.zip(session.frame_size(&config)).map(|(body, size)| {
                let effect = match session.phase {
                    Phase::Opening | Phase::Rendering => "visibility: hidden;".to_string(),
                    Phase::Open => format!("animation: lightbox-reveal {}ms ease-out;", config.reveal_ms),
                    Phase::Closing => {
                        format!("animation: lightbox-dismiss {}ms ease-in forwards;", config.dismiss_ms)
                    }
                };
                let frame_style = move || {
                    let placement = place_frame(&viewer.page.get(), size);
                    format!(
                        "position: absolute; left: {}px; top: {}px; width: {}px; height: {}px; \
                         background: #fff; border: 4px solid #525252; z-index: 102; \
                         box-sizing: content-box; text-align: left; font: 12px Arial, sans-serif; {}",
                        placement.left, placement.top, placement.width, placement.height, effect
                    )
                };
                view! {
                    <div id="lightbox-window" style=frame_style>
                        {body}
                    </div>
                }
            });

            view! {
                <div
                    id="lightbox-overlay"
                    style=move || backdrop_style(&viewer.page.get())
                    on:click=move |_| {
                        viewer.remove();
                    }
                ></div>
                {loading}
                {frame}
            }
        })
    };

    view! {
        <style>{KEYFRAMES}</style>
        {overlay}
    }
}
