use leptos::prelude::*;
use crate::session::ImageContent;
use crate::state::Direction;
use crate::viewer::Viewer;

#[component]
pub fn ImageFrame(caption: String, url: String, image: ImageContent) -> impl IntoView {
    let viewer = use_context::<Viewer>().unwrap();
    let display = image.display.unwrap_or_default();
    let scan = image.scan;
    let alt = caption.clone();

    let close = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        viewer.remove();
    };
    let step = move |direction: Direction| {
        move |ev: web_sys::MouseEvent| {
            ev.prevent_default();
            viewer.navigate(direction);
        }
    };

    let printable = scan.printable.map(|href| {
        view! {
            <a href=href target="_blank">"full-size"</a>
            " "
        }
    });
    let previous = scan.previous.map(|_| {
        view! {
            <div id="lightbox-prev" style="float: left;">
                <a href="#" on:click=step(Direction::Previous)>"<< Prev"</a>
            </div>
        }
    });
    let next = scan.next.map(|_| {
        view! {
            <div id="lightbox-next" style="float: right;">
                <a href="#" on:click=step(Direction::Next)>"Next >>"</a>
            </div>
        }
    });

    view! {
        <div id="lightbox-caption" data-caption-id=scan.caption_id style="float: left; padding: 4px 0 0 5px;">
            {caption}
        </div>
        <div id="lightbox-close" style="float: right; padding: 4px 5px 0 0;">
            {printable}
            <a href="#" id="lightbox-close-button" on:click=close>"close"</a>
        </div>
        <div id="lightbox-nav" style="clear: both; padding: 0 5px;">
            {previous}
            {next}
        </div>
        <div id="lightbox-image-box" style="clear: both; text-align: center;">
            <a href="#" title="Close" on:click=close>
                <img
                    id="lightbox-image"
                    src=url
                    alt=alt
                    style=format!("width: {}px; height: {}px; border: none;", display.width, display.height)
                />
            </a>
        </div>
    }
}
