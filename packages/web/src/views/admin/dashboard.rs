use dioxus::prelude::*;
use ui::use_api;

use crate::views::Loading;

#[component]
pub fn AdminDashboard() -> Element {
    let api = use_api();
    let stats = use_resource(move || {
        let api = api.clone();
        async move { api.stats().await.map_err(|e| e.to_string()) }
    });

    let body = match stats.cloned() {
        None => rsx! { Loading {} },
        Some(Err(e)) => rsx! { p { class: "muted", "Could not load statistics: {e}" } },
        Some(Ok(stats)) => {
            let tiles = [
                ("Members", stats.users),
                ("Admins", stats.admins),
                ("Plants", stats.plants),
                ("Upcoming events", stats.upcoming_events),
                ("Active registrations", stats.active_registrations),
                ("Unread notifications", stats.unread_notifications),
            ];
            rsx! {
                div {
                    class: "stats",
                    for (label, value) in tiles {
                        div {
                            class: "stat",
                            span { class: "stat-value", "{value}" }
                            span { class: "stat-label", "{label}" }
                        }
                    }
                }
            }
        }
    };

    rsx! {
        h1 { "Overview" }
        {body}
    }
}
