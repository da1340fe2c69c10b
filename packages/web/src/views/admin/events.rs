use api::{Event, EventFilter, EventInput};
use dioxus::prelude::*;
use ui::format;
use ui::{blank_event, use_api, ErrorBanner, EventForm};
use uuid::Uuid;

use crate::views::Loading;

#[derive(Debug, Clone, PartialEq)]
enum Editing {
    Closed,
    New,
    Existing(Event),
}

#[component]
pub fn AdminEvents() -> Element {
    let api = use_api();
    let mut editing = use_signal(|| Editing::Closed);
    let mut submitting = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);
    let mut notice = use_signal(|| Option::<String>::None);
    let mut viewing = use_signal(|| Option::<Event>::None);

    // Admins get unpublished events too.
    let mut events = use_resource({
        let api = api.clone();
        move || {
            let api = api.clone();
            let filter = EventFilter {
                upcoming: false,
                ..Default::default()
            };
            async move { api.events(&filter).await.map_err(|e| e.to_string()) }
        }
    });

    let save = {
        let api = api.clone();
        move |input: EventInput| {
            let api = api.clone();
            let target = editing();
            spawn(async move {
                submitting.set(true);
                let result = match target {
                    Editing::Existing(event) => api.update_event(event.id, &input).await,
                    _ => api.create_event(&input).await,
                };
                match result {
                    Ok(event) => {
                        notice.set(Some(format!("Saved \"{}\"", event.title)));
                        editing.set(Editing::Closed);
                        error.set(None);
                        events.restart();
                    }
                    Err(e) => error.set(Some(e.to_string())),
                }
                submitting.set(false);
            });
        }
    };

    let delete = {
        let api = api.clone();
        move |id: Uuid| {
            let api = api.clone();
            spawn(async move {
                match api.delete_event(id).await {
                    Ok(()) => {
                        notice.set(Some("Event deleted and registrants notified".to_string()));
                        events.restart();
                    }
                    Err(e) => error.set(Some(e.to_string())),
                }
            });
        }
    };

    let editor = match editing() {
        Editing::Closed => rsx! {},
        Editing::New => rsx! {
            h2 { "New event" }
            EventForm {
                initial: blank_event(),
                on_submit: save.clone(),
                on_cancel: move |_| editing.set(Editing::Closed),
                submitting: submitting(),
            }
        },
        Editing::Existing(event) => rsx! {
            h2 { "Edit {event.title}" }
            EventForm {
                key: "{event.id}",
                initial: event.to_input(),
                on_submit: save.clone(),
                on_cancel: move |_| editing.set(Editing::Closed),
                submitting: submitting(),
            }
        },
    };

    let table = match events.cloned() {
        None => rsx! { Loading {} },
        Some(Err(e)) => rsx! { p { class: "muted", "Could not load events: {e}" } },
        Some(Ok(list)) => rsx! {
            table {
                class: "table",
                thead {
                    tr {
                        th { "Title" }
                        th { "Starts" }
                        th { "Places" }
                        th { "Status" }
                        th {}
                    }
                }
                tbody {
                    for event in list {
                        tr {
                            key: "{event.id}",
                            td { "{event.title}" }
                            td { "{format::short_datetime(&event.start_time)}" }
                            td { "{event.registered_count} / {event.capacity}" }
                            td { if event.is_published { "Published" } else { "Draft" } }
                            td {
                                class: "row-actions",
                                button {
                                    class: "btn btn-link",
                                    onclick: {
                                        let event = event.clone();
                                        move |_| viewing.set(Some(event.clone()))
                                    },
                                    "Registrants"
                                }
                                button {
                                    class: "btn btn-link",
                                    onclick: {
                                        let event = event.clone();
                                        move |_| editing.set(Editing::Existing(event.clone()))
                                    },
                                    "Edit"
                                }
                                button {
                                    class: "btn btn-link btn-danger",
                                    onclick: {
                                        let delete = delete.clone();
                                        let id = event.id;
                                        move |_| delete(id)
                                    },
                                    "Delete"
                                }
                            }
                        }
                    }
                }
            }
        },
    };

    rsx! {
        div {
            class: "page-header",
            h1 { "Events" }
            button {
                class: "btn btn-primary",
                onclick: move |_| editing.set(Editing::New),
                "Add event"
            }
        }
        ErrorBanner { message: error(), on_dismiss: move |_| error.set(None) }
        if let Some(text) = notice() {
            p { class: "notice", "{text}" }
        }
        {editor}
        if let Some(event) = viewing() {
            Registrants { key: "{event.id}", event, on_close: move |_| viewing.set(None) }
        }
        {table}
    }
}

#[component]
fn Registrants(event: Event, on_close: EventHandler<()>) -> Element {
    let api = use_api();
    let event_id = event.id;
    let registrants = use_resource(move || {
        let api = api.clone();
        async move { api.registrants(event_id).await.map_err(|e| e.to_string()) }
    });

    let body = match registrants.cloned() {
        None => rsx! { Loading {} },
        Some(Err(e)) => rsx! { p { class: "muted", "{e}" } },
        Some(Ok(list)) if list.is_empty() => rsx! { p { class: "muted", "Nobody has registered yet." } },
        Some(Ok(list)) => rsx! {
            table {
                class: "table",
                thead {
                    tr {
                        th { "Name" }
                        th { "Email" }
                        th { "Student ID" }
                        th { "Status" }
                        th { "Registered" }
                    }
                }
                tbody {
                    for r in list {
                        tr {
                            key: "{r.user_id}",
                            td { "{r.full_name.clone().unwrap_or_default()}" }
                            td { "{r.email}" }
                            td { "{r.student_id.clone().unwrap_or_default()}" }
                            td { "{format::label(r.status.as_str())}" }
                            td { "{format::short_datetime(&r.registered_at)}" }
                        }
                    }
                }
            }
        },
    };

    rsx! {
        section {
            class: "panel",
            div {
                class: "page-header",
                h2 { "Registrants: {event.title}" }
                button { class: "btn", onclick: move |_| on_close.call(()), "Close" }
            }
            {body}
        }
    }
}
