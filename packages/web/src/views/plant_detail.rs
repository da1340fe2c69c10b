use dioxus::prelude::*;
use ui::format;
use ui::{use_api, Markdown};
use uuid::Uuid;

use super::Loading;
use crate::Route;

#[component]
pub fn PlantDetail(id: Uuid) -> Element {
    let api = use_api();
    let plant = use_resource(use_reactive!(|id| {
        let api = api.clone();
        async move { api.plant(id).await.map_err(|e| e.to_string()) }
    }));

    let body = match plant.cloned() {
        None => rsx! { Loading {} },
        Some(Err(e)) => rsx! { p { class: "muted", "{e}" } },
        Some(Ok(plant)) => {
            let facts = [
                ("Family", plant.family.clone()),
                ("Care level", Some(format::label(plant.care_level.as_str()))),
                ("Sunlight", plant.sunlight.clone()),
                ("Watering", plant.watering.clone()),
                ("Blooms", plant.bloom_season.map(|s| format::label(s.as_str()))),
                ("Planting", plant.planting_season.map(|s| format::label(s.as_str()))),
                ("Harvest", plant.harvest_season.map(|s| format::label(s.as_str()))),
                ("Native to", plant.native_region.clone()),
                ("Edible", Some(if plant.is_edible { "Yes" } else { "No" }.to_string())),
            ];
            rsx! {
                article {
                    class: "detail",
                    if let Some(image) = &plant.image_url {
                        img { class: "detail-image", src: "{image}", alt: "{plant.common_name}" }
                    }
                    h1 { "{plant.common_name}" }
                    if let Some(scientific) = &plant.scientific_name {
                        p { class: "card-subtitle", em { "{scientific}" } }
                    }
                    dl {
                        class: "facts",
                        for (name, value) in facts {
                            if let Some(value) = value {
                                dt { "{name}" }
                                dd { "{value}" }
                            }
                        }
                    }
                    if let Some(description) = &plant.description {
                        Markdown { source: description.clone() }
                    }
                }
            }
        }
    };

    rsx! {
        div {
            class: "page page-narrow",
            Link { to: Route::Plants {}, class: "back-link", "← All plants" }
            {body}
        }
    }
}
