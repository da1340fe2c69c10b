use api::RegistrationStatus;
use chrono::Utc;
use dioxus::prelude::*;
use ui::format;
use ui::{use_api, use_auth, ErrorBanner, Markdown};
use uuid::Uuid;

use super::Loading;
use crate::Route;

#[component]
pub fn EventDetail(id: Uuid) -> Element {
    let api = use_api();
    let auth = use_auth();
    let mut error = use_signal(|| Option::<String>::None);
    let mut busy = use_signal(|| false);

    let mut event = use_resource({
        let api = api.clone();
        use_reactive!(|id| {
            let api = api.clone();
            async move { api.event(id).await.map_err(|e| e.to_string()) }
        })
    });

    // Whether the signed-in member holds an active registration.
    let mut registered = use_resource({
        let api = api.clone();
        use_reactive!(|id| {
            let api = api.clone();
            let signed_in = auth().user.is_some();
            async move {
                if !signed_in {
                    return false;
                }
                match api.my_registrations().await {
                    Ok(list) => list
                        .iter()
                        .any(|r| r.event.id == id && r.status == RegistrationStatus::Registered),
                    Err(e) => {
                        tracing::warn!("Failed to load registrations: {}", e);
                        false
                    }
                }
            }
        })
    });

    let register = {
        let api = api.clone();
        move |_| {
            let api = api.clone();
            async move {
                busy.set(true);
                error.set(None);
                if let Err(e) = api.register(id).await {
                    error.set(Some(e.to_string()));
                }
                event.restart();
                registered.restart();
                busy.set(false);
            }
        }
    };

    let cancel = {
        let api = api.clone();
        move |_| {
            let api = api.clone();
            async move {
                busy.set(true);
                error.set(None);
                if let Err(e) = api.cancel_registration(id).await {
                    error.set(Some(e.to_string()));
                }
                event.restart();
                registered.restart();
                busy.set(false);
            }
        }
    };

    let signed_in = auth().user.is_some();
    let is_registered = registered.cloned().unwrap_or(false);

    let body = match event.cloned() {
        None => rsx! { Loading {} },
        Some(Err(e)) => rsx! { p { class: "muted", "{e}" } },
        Some(Ok(event)) => {
            let started = event.has_started(Utc::now());
            let spots = event.spots_left();
            let action = if !signed_in {
                rsx! {
                    Link { to: Route::Login { error: String::new() }, class: "btn btn-primary", "Log in to register" }
                }
            } else if is_registered {
                rsx! {
                    p { class: "registered-note", "You are registered for this event." }
                    if !started {
                        button { class: "btn", disabled: busy(), onclick: cancel, "Cancel registration" }
                    }
                }
            } else if started {
                rsx! { p { class: "muted", "Registration is closed." } }
            } else if event.is_full() {
                rsx! { p { class: "muted", "This event is full." } }
            } else {
                rsx! {
                    button { class: "btn btn-primary", disabled: busy(), onclick: register, "Register" }
                }
            };

            rsx! {
                article {
                    class: "detail",
                    if let Some(image) = &event.image_url {
                        img { class: "detail-image", src: "{image}", alt: "{event.title}" }
                    }
                    h1 { "{event.title}" }
                    dl {
                        class: "facts",
                        dt { "Starts" }
                        dd { "{format::datetime(&event.start_time)}" }
                        dt { "Ends" }
                        dd { "{format::datetime(&event.end_time)}" }
                        if let Some(location) = &event.location {
                            dt { "Location" }
                            dd { "{location}" }
                        }
                        dt { "Category" }
                        dd { "{format::label(event.category.as_str())}" }
                        dt { "Difficulty" }
                        dd { "{format::label(event.difficulty.as_str())}" }
                        dt { "Places" }
                        dd { "{event.registered_count} / {event.capacity} taken, {spots} left" }
                    }
                    div { class: "detail-actions", {action} }
                    if let Some(description) = &event.description {
                        Markdown { source: description.clone() }
                    }
                }
            }
        }
    };

    rsx! {
        div {
            class: "page page-narrow",
            Link { to: Route::Events {}, class: "back-link", "← All events" }
            ErrorBanner { message: error(), on_dismiss: move |_| error.set(None) }
            {body}
        }
    }
}
