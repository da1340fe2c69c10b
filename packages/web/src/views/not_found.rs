use dioxus::prelude::*;

use crate::Route;

#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");
    rsx! {
        div {
            class: "page page-narrow",
            h2 { "Page not found" }
            p { class: "muted", "Nothing lives at /{path}." }
            Link { to: Route::Home {}, "Back to the start page" }
        }
    }
}
