//! Admin forms for plants and events.
//!
//! Fields are kept as strings while editing and turned into the input type on
//! submit, where the same checks the server runs (`api::validate`) are applied
//! first so most mistakes never leave the browser.

use api::validate;
use api::{CareLevel, Difficulty, EventCategory, EventInput, PlantInput, Season};
use chrono::{Duration, Timelike, Utc};
use dioxus::prelude::*;

use crate::format::{self, non_empty};
use crate::ErrorBanner;

fn opt_text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn opt_season(value: Option<Season>) -> String {
    value.map(|s| s.to_string()).unwrap_or_default()
}

#[component]
fn TextField(label: String, mut value: Signal<String>, #[props(default)] required: bool) -> Element {
    rsx! {
        label {
            class: "field",
            span { "{label}" }
            input {
                r#type: "text",
                required: required,
                value: "{value}",
                oninput: move |e| value.set(e.value()),
            }
        }
    }
}

#[component]
fn SeasonSelect(label: String, mut value: Signal<String>) -> Element {
    rsx! {
        label {
            class: "field",
            span { "{label}" }
            select {
                onchange: move |e| value.set(e.value()),
                option { value: "", selected: value().is_empty(), "Not set" }
                for season in Season::ALL {
                    option {
                        value: "{season}",
                        selected: value() == season.as_str(),
                        "{format::label(season.as_str())}"
                    }
                }
            }
        }
    }
}

/// Create or edit a plant. `initial` seeds the fields.
#[component]
pub fn PlantForm(
    initial: PlantInput,
    on_submit: EventHandler<PlantInput>,
    on_cancel: EventHandler<()>,
    #[props(default)] submitting: bool,
) -> Element {
    let common_name = use_signal(|| initial.common_name.clone());
    let scientific_name = use_signal(|| opt_text(&initial.scientific_name));
    let family = use_signal(|| opt_text(&initial.family));
    let mut description = use_signal(|| opt_text(&initial.description));
    let mut care_level = use_signal(|| initial.care_level);
    let sunlight = use_signal(|| opt_text(&initial.sunlight));
    let watering = use_signal(|| opt_text(&initial.watering));
    let bloom_season = use_signal(|| opt_season(initial.bloom_season));
    let planting_season = use_signal(|| opt_season(initial.planting_season));
    let harvest_season = use_signal(|| opt_season(initial.harvest_season));
    let native_region = use_signal(|| opt_text(&initial.native_region));
    let image_url = use_signal(|| opt_text(&initial.image_url));
    let mut is_edible = use_signal(|| initial.is_edible);
    let mut error = use_signal(|| Option::<String>::None);

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let input = PlantInput {
            common_name: common_name().trim().to_string(),
            scientific_name: non_empty(&scientific_name()),
            family: non_empty(&family()),
            description: non_empty(&description()),
            care_level: care_level(),
            sunlight: non_empty(&sunlight()),
            watering: non_empty(&watering()),
            bloom_season: bloom_season().parse().ok(),
            planting_season: planting_season().parse().ok(),
            harvest_season: harvest_season().parse().ok(),
            native_region: non_empty(&native_region()),
            image_url: non_empty(&image_url()),
            is_edible: is_edible(),
        };
        match validate::plant(&input) {
            Ok(()) => {
                error.set(None);
                on_submit.call(input);
            }
            Err(message) => error.set(Some(message)),
        }
    };

    rsx! {
        form {
            class: "form",
            onsubmit: handle_submit,
            ErrorBanner { message: error(), on_dismiss: move |_| error.set(None) }
            TextField { label: "Common name", value: common_name, required: true }
            TextField { label: "Scientific name", value: scientific_name }
            TextField { label: "Family", value: family }
            label {
                class: "field",
                span { "Care level" }
                select {
                    onchange: move |e| {
                        if let Ok(level) = e.value().parse() {
                            care_level.set(level);
                        }
                    },
                    for level in CareLevel::ALL {
                        option {
                            value: "{level}",
                            selected: care_level() == *level,
                            "{format::label(level.as_str())}"
                        }
                    }
                }
            }
            TextField { label: "Sunlight", value: sunlight }
            TextField { label: "Watering", value: watering }
            div {
                class: "field-row",
                SeasonSelect { label: "Bloom season", value: bloom_season }
                SeasonSelect { label: "Planting season", value: planting_season }
                SeasonSelect { label: "Harvest season", value: harvest_season }
            }
            TextField { label: "Native region", value: native_region }
            TextField { label: "Image URL", value: image_url }
            label {
                class: "field field-check",
                input {
                    r#type: "checkbox",
                    checked: is_edible(),
                    onchange: move |e| is_edible.set(e.checked()),
                }
                span { "Edible" }
            }
            label {
                class: "field",
                span { "Description (Markdown)" }
                textarea {
                    rows: 6,
                    value: "{description}",
                    oninput: move |e| description.set(e.value()),
                }
            }
            div {
                class: "form-actions",
                button {
                    r#type: "button",
                    class: "btn",
                    onclick: move |_| on_cancel.call(()),
                    "Cancel"
                }
                button {
                    r#type: "submit",
                    class: "btn btn-primary",
                    disabled: submitting,
                    if submitting { "Saving..." } else { "Save" }
                }
            }
        }
    }
}

/// A blank event starting tomorrow at the top of the hour, two hours long.
pub fn blank_event() -> EventInput {
    let now = Utc::now();
    let start = (now + Duration::days(1))
        .with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now);
    EventInput {
        title: String::new(),
        description: None,
        location: None,
        category: EventCategory::Workshop,
        difficulty: Difficulty::Beginner,
        start_time: start,
        end_time: start + Duration::hours(2),
        capacity: 20,
        image_url: None,
        is_published: false,
    }
}

/// Create or edit an event. Times are entered and shown in UTC.
#[component]
pub fn EventForm(
    initial: EventInput,
    on_submit: EventHandler<EventInput>,
    on_cancel: EventHandler<()>,
    #[props(default)] submitting: bool,
) -> Element {
    let title = use_signal(|| initial.title.clone());
    let mut description = use_signal(|| opt_text(&initial.description));
    let location = use_signal(|| opt_text(&initial.location));
    let mut category = use_signal(|| initial.category);
    let mut difficulty = use_signal(|| initial.difficulty);
    let mut start = use_signal(|| format::to_input(&initial.start_time));
    let mut end = use_signal(|| format::to_input(&initial.end_time));
    let mut capacity = use_signal(|| initial.capacity.to_string());
    let image_url = use_signal(|| opt_text(&initial.image_url));
    let mut is_published = use_signal(|| initial.is_published);
    let mut error = use_signal(|| Option::<String>::None);

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let (Some(start_time), Some(end_time)) = (format::from_input(&start()), format::from_input(&end())) else {
            error.set(Some("Start and end time are required".to_string()));
            return;
        };
        let Ok(capacity) = capacity().trim().parse::<i32>() else {
            error.set(Some("Capacity must be a whole number".to_string()));
            return;
        };
        let input = EventInput {
            title: title().trim().to_string(),
            description: non_empty(&description()),
            location: non_empty(&location()),
            category: category(),
            difficulty: difficulty(),
            start_time,
            end_time,
            capacity,
            image_url: non_empty(&image_url()),
            is_published: is_published(),
        };
        match validate::event(&input) {
            Ok(()) => {
                error.set(None);
                on_submit.call(input);
            }
            Err(message) => error.set(Some(message)),
        }
    };

    rsx! {
        form {
            class: "form",
            onsubmit: handle_submit,
            ErrorBanner { message: error(), on_dismiss: move |_| error.set(None) }
            TextField { label: "Title", value: title, required: true }
            TextField { label: "Location", value: location }
            div {
                class: "field-row",
                label {
                    class: "field",
                    span { "Category" }
                    select {
                        onchange: move |e| {
                            if let Ok(c) = e.value().parse() {
                                category.set(c);
                            }
                        },
                        for c in EventCategory::ALL {
                            option {
                                value: "{c}",
                                selected: category() == *c,
                                "{format::label(c.as_str())}"
                            }
                        }
                    }
                }
                label {
                    class: "field",
                    span { "Difficulty" }
                    select {
                        onchange: move |e| {
                            if let Ok(d) = e.value().parse() {
                                difficulty.set(d);
                            }
                        },
                        for d in Difficulty::ALL {
                            option {
                                value: "{d}",
                                selected: difficulty() == *d,
                                "{format::label(d.as_str())}"
                            }
                        }
                    }
                }
            }
            div {
                class: "field-row",
                label {
                    class: "field",
                    span { "Starts (UTC)" }
                    input {
                        r#type: "datetime-local",
                        value: "{start}",
                        oninput: move |e| start.set(e.value()),
                    }
                }
                label {
                    class: "field",
                    span { "Ends (UTC)" }
                    input {
                        r#type: "datetime-local",
                        value: "{end}",
                        oninput: move |e| end.set(e.value()),
                    }
                }
                label {
                    class: "field",
                    span { "Capacity" }
                    input {
                        r#type: "number",
                        min: "1",
                        value: "{capacity}",
                        oninput: move |e| capacity.set(e.value()),
                    }
                }
            }
            TextField { label: "Image URL", value: image_url }
            label {
                class: "field",
                span { "Description (Markdown)" }
                textarea {
                    rows: 6,
                    value: "{description}",
                    oninput: move |e| description.set(e.value()),
                }
            }
            label {
                class: "field field-check",
                input {
                    r#type: "checkbox",
                    checked: is_published(),
                    onchange: move |e| is_published.set(e.checked()),
                }
                span { "Published" }
            }
            div {
                class: "form-actions",
                button {
                    r#type: "button",
                    class: "btn",
                    onclick: move |_| on_cancel.call(()),
                    "Cancel"
                }
                button {
                    r#type: "submit",
                    class: "btn btn-primary",
                    disabled: submitting,
                    if submitting { "Saving..." } else { "Save" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_event_passes_validation_once_titled() {
        let mut input = blank_event();
        assert!(validate::event(&input).is_err());
        input.title = "Compost workshop".into();
        assert_eq!(validate::event(&input), Ok(()));
        assert_eq!(input.start_time.minute(), 0);
    }
}
