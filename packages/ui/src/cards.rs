use api::{Event, Plant};
use dioxus::prelude::*;

use crate::format;
use crate::icons::{FaCalendar, FaLeaf, FaLocationDot, FaUsers};
use crate::Icon;

/// Summary of a plant for the library grid. Links to `/plants/{id}`.
#[component]
pub fn PlantCard(plant: Plant) -> Element {
    let href = format!("/plants/{}", plant.id);
    let care = format::label(plant.care_level.as_str());

    rsx! {
        a {
            class: "card plant-card",
            href: "{href}",
            if let Some(image) = &plant.image_url {
                img { class: "card-image", src: "{image}", alt: "{plant.common_name}" }
            }
            div {
                class: "card-body",
                h3 { class: "card-title", "{plant.common_name}" }
                if let Some(scientific) = &plant.scientific_name {
                    p { class: "card-subtitle", em { "{scientific}" } }
                }
                div {
                    class: "card-tags",
                    span { class: "tag tag-care-{plant.care_level}", "{care}" }
                    if plant.is_edible {
                        span {
                            class: "tag tag-edible",
                            Icon { icon: FaLeaf, width: 10, height: 10 }
                            " Edible"
                        }
                    }
                }
            }
        }
    }
}

/// Summary of an event for the listing. Links to `/events/{id}`.
#[component]
pub fn EventCard(event: Event) -> Element {
    let href = format!("/events/{}", event.id);
    let when = format::short_datetime(&event.start_time);
    let category = format::label(event.category.as_str());
    let difficulty = format::label(event.difficulty.as_str());
    let spots = event.spots_left();

    rsx! {
        a {
            class: "card event-card",
            href: "{href}",
            if let Some(image) = &event.image_url {
                img { class: "card-image", src: "{image}", alt: "{event.title}" }
            }
            div {
                class: "card-body",
                h3 {
                    class: "card-title",
                    "{event.title}"
                    if !event.is_published {
                        span { class: "tag tag-draft", "Draft" }
                    }
                }
                p {
                    class: "card-meta",
                    Icon { icon: FaCalendar, width: 12, height: 12 }
                    " {when}"
                }
                if let Some(location) = &event.location {
                    p {
                        class: "card-meta",
                        Icon { icon: FaLocationDot, width: 12, height: 12 }
                        " {location}"
                    }
                }
                div {
                    class: "card-tags",
                    span { class: "tag", "{category}" }
                    span { class: "tag tag-{event.difficulty}", "{difficulty}" }
                    if event.is_full() {
                        span { class: "tag tag-full", "Full" }
                    } else {
                        span {
                            class: "tag tag-spots",
                            Icon { icon: FaUsers, width: 10, height: 10 }
                            " {spots} spots left"
                        }
                    }
                }
            }
        }
    }
}
