use leptos::prelude::*;

#[component]
pub fn LoadingIndicator(src: String) -> impl IntoView {
    view! {
        <div
            id="lightbox-load"
            style="position: fixed; top: 50%; left: 50%; transform: translate(-50%, -50%); z-index: 103;"
        >
            <img src=src alt="Loading" />
        </div>
    }
}
