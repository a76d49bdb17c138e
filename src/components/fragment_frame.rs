use leptos::prelude::*;
use crate::session::FragmentContent;
use crate::viewer::Viewer;

#[component]
pub fn FragmentFrame(fragment: FragmentContent) -> impl IntoView {
    let viewer = use_context::<Viewer>().unwrap();
    let pane = fragment.layout.pane;
    let markup = fragment.markup.unwrap_or_default();

    view! {
        <div id="lightbox-close-ajax" style="text-align: right; padding: 4px 6px;">
            <a
                href="#"
                id="lightbox-close-button"
                on:click=move |ev: web_sys::MouseEvent| {
                    ev.prevent_default();
                    viewer.remove();
                }
            >
                "close"
            </a>
        </div>
        <div
            id="lightbox-ajax-content"
            style=format!(
                "width: {}px; height: {}px; overflow: auto; padding: 0 15px;",
                pane.width, pane.height
            )
            inner_html=markup
        />
    }
}
