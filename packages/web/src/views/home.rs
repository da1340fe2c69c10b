use api::EventFilter;
use dioxus::prelude::*;
use ui::{use_api, use_auth, EventCard};

use super::Loading;
use crate::Route;

const HOME_EVENTS: usize = 3;

#[component]
pub fn Home() -> Element {
    let api = use_api();
    let auth = use_auth();

    let upcoming = use_resource(move || {
        let api = api.clone();
        async move {
            api.events(&EventFilter::default())
                .await
                .map_err(|e| e.to_string())
        }
    });

    let greeting = match &auth().user {
        Some(user) => format!("Welcome back, {}", user.display_name()),
        None => "Welcome to YTT".to_string(),
    };

    let events = match upcoming.cloned() {
        None => rsx! { Loading {} },
        Some(Err(e)) => rsx! { p { class: "muted", "Could not load events: {e}" } },
        Some(Ok(events)) if events.is_empty() => rsx! {
            p { class: "muted", "No upcoming events yet. Check back soon." }
        },
        Some(Ok(events)) => rsx! {
            div {
                class: "grid",
                for event in events.into_iter().take(HOME_EVENTS) {
                    EventCard { key: "{event.id}", event }
                }
            }
        },
    };

    rsx! {
        div {
            class: "page",
            section {
                class: "hero",
                h1 { "{greeting}" }
                p { "Browse the plant library, join upcoming events and keep up with club news." }
                div {
                    class: "hero-actions",
                    Link { to: Route::Events {}, class: "btn btn-primary", "Browse events" }
                    Link { to: Route::Plants {}, class: "btn", "Explore the plant library" }
                }
            }
            h2 { "Coming up" }
            {events}
        }
    }
}
