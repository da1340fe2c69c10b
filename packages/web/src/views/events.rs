use api::{Difficulty, EventCategory, EventFilter};
use dioxus::prelude::*;
use ui::format;
use ui::{use_api, EventCard};

use super::Loading;

#[component]
pub fn Events() -> Element {
    let api = use_api();
    let mut category = use_signal(|| Option::<EventCategory>::None);
    let mut difficulty = use_signal(|| Option::<Difficulty>::None);
    let mut include_past = use_signal(|| false);

    let events = use_resource(move || {
        let api = api.clone();
        let filter = EventFilter {
            category: category(),
            difficulty: difficulty(),
            upcoming: !include_past(),
        };
        async move { api.events(&filter).await.map_err(|e| e.to_string()) }
    });

    let results = match events.cloned() {
        None => rsx! { Loading {} },
        Some(Err(e)) => rsx! { p { class: "muted", "Could not load events: {e}" } },
        Some(Ok(list)) if list.is_empty() => rsx! {
            p { class: "muted", "No events match these filters." }
        },
        Some(Ok(list)) => rsx! {
            div {
                class: "grid",
                for event in list {
                    EventCard { key: "{event.id}", event }
                }
            }
        },
    };

    rsx! {
        div {
            class: "page",
            h1 { "Events" }
            div {
                class: "filters",
                select {
                    onchange: move |e| category.set(e.value().parse().ok()),
                    option { value: "", "All categories" }
                    for c in EventCategory::ALL {
                        option { value: "{c}", "{format::label(c.as_str())}" }
                    }
                }
                select {
                    onchange: move |e| difficulty.set(e.value().parse().ok()),
                    option { value: "", "Any difficulty" }
                    for d in Difficulty::ALL {
                        option { value: "{d}", "{format::label(d.as_str())}" }
                    }
                }
                label {
                    class: "field-check",
                    input {
                        r#type: "checkbox",
                        checked: include_past(),
                        onchange: move |e| include_past.set(e.checked()),
                    }
                    " Include past events"
                }
            }
            {results}
        }
    }
}
