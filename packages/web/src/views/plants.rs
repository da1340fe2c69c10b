use api::{CareLevel, PlantFilter, Season};
use dioxus::prelude::*;
use ui::format;
use ui::{use_api, PlantCard};

use super::Loading;

#[component]
pub fn Plants() -> Element {
    let api = use_api();
    let mut search = use_signal(String::new);
    let mut care_level = use_signal(|| Option::<CareLevel>::None);
    let mut season = use_signal(|| Option::<Season>::None);
    let mut edible_only = use_signal(|| false);

    let plants = use_resource(move || {
        let api = api.clone();
        let filter = PlantFilter {
            search: Some(search()),
            care_level: care_level(),
            season: season(),
            edible: edible_only().then_some(true),
        };
        async move { api.plants(&filter).await.map_err(|e| e.to_string()) }
    });

    let results = match plants.cloned() {
        None => rsx! { Loading {} },
        Some(Err(e)) => rsx! { p { class: "muted", "Could not load plants: {e}" } },
        Some(Ok(list)) if list.is_empty() => rsx! {
            p { class: "muted", "No plants match these filters." }
        },
        Some(Ok(list)) => rsx! {
            div {
                class: "grid",
                for plant in list {
                    PlantCard { key: "{plant.id}", plant }
                }
            }
        },
    };

    rsx! {
        div {
            class: "page",
            h1 { "Plant library" }
            div {
                class: "filters",
                input {
                    r#type: "search",
                    placeholder: "Search by name or family",
                    value: "{search}",
                    oninput: move |e| search.set(e.value()),
                }
                select {
                    onchange: move |e| care_level.set(e.value().parse().ok()),
                    option { value: "", "Any care level" }
                    for level in CareLevel::ALL {
                        option { value: "{level}", "{format::label(level.as_str())}" }
                    }
                }
                select {
                    onchange: move |e| season.set(e.value().parse().ok()),
                    option { value: "", "Any season" }
                    for s in Season::ALL {
                        option { value: "{s}", "{format::label(s.as_str())}" }
                    }
                }
                label {
                    class: "field-check",
                    input {
                        r#type: "checkbox",
                        checked: edible_only(),
                        onchange: move |e| edible_only.set(e.checked()),
                    }
                    " Edible only"
                }
            }
            {results}
        }
    }
}
