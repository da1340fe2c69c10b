use api::{Audience, Broadcast, EventFilter, NotificationType};
use dioxus::prelude::*;
use ui::format;
use ui::{use_api, ErrorBanner};
use uuid::Uuid;

use crate::views::Loading;

#[component]
pub fn AdminNotifications() -> Element {
    let api = use_api();
    let mut audience = use_signal(|| "all".to_string());
    let mut target = use_signal(String::new);
    let mut kind = use_signal(|| NotificationType::Announcement);
    let mut title = use_signal(String::new);
    let mut message = use_signal(String::new);
    let mut scheduled = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut notice = use_signal(|| Option::<String>::None);
    let mut sending = use_signal(|| false);

    let mut recent = use_resource({
        let api = api.clone();
        move || {
            let api = api.clone();
            async move { api.recent_notifications().await.map_err(|e| e.to_string()) }
        }
    });

    // Choices for the event and user audiences.
    let events = use_resource({
        let api = api.clone();
        move || {
            let api = api.clone();
            async move { api.events(&EventFilter::default()).await.unwrap_or_default() }
        }
    });
    let members = use_resource({
        let api = api.clone();
        move || {
            let api = api.clone();
            async move { api.users(None).await.unwrap_or_default() }
        }
    });

    let send = move |evt: FormEvent| {
        evt.prevent_default();
        let api = api.clone();
        async move {
            notice.set(None);
            let audience = match (audience().as_str(), target().parse::<Uuid>()) {
                ("all", _) => Audience::All,
                ("event", Ok(id)) => Audience::Event(id),
                ("user", Ok(id)) => Audience::User(id),
                _ => {
                    error.set(Some("Pick who should receive the notification".to_string()));
                    return;
                }
            };
            let scheduled_for = match scheduled().trim() {
                "" => None,
                value => match format::from_input(value) {
                    Some(at) => Some(at),
                    None => {
                        error.set(Some("Invalid delivery time".to_string()));
                        return;
                    }
                },
            };
            let broadcast = Broadcast {
                audience,
                notification_type: kind(),
                title: title().trim().to_string(),
                message: message().trim().to_string(),
                scheduled_for,
            };
            if broadcast.title.is_empty() || broadcast.message.is_empty() {
                error.set(Some("Title and message are required".to_string()));
                return;
            }

            sending.set(true);
            match api.broadcast(&broadcast).await {
                Ok(result) => {
                    error.set(None);
                    notice.set(Some(format!("Queued {} notifications", result.created)));
                    title.set(String::new());
                    message.set(String::new());
                    scheduled.set(String::new());
                    recent.restart();
                }
                Err(e) => error.set(Some(e.to_string())),
            }
            sending.set(false);
        }
    };

    let target_picker = match audience().as_str() {
        "event" => rsx! {
            label {
                class: "field",
                span { "Event" }
                select {
                    onchange: move |e| target.set(e.value()),
                    option { value: "", "Choose an event" }
                    for event in events.cloned().unwrap_or_default() {
                        option { key: "{event.id}", value: "{event.id}", "{event.title}" }
                    }
                }
            }
        },
        "user" => rsx! {
            label {
                class: "field",
                span { "Member" }
                select {
                    onchange: move |e| target.set(e.value()),
                    option { value: "", "Choose a member" }
                    for user in members.cloned().unwrap_or_default() {
                        option { key: "{user.id}", value: "{user.id}", "{user.display_name()} ({user.email})" }
                    }
                }
            }
        },
        _ => rsx! {},
    };

    let table = match recent.cloned() {
        None => rsx! { Loading {} },
        Some(Err(e)) => rsx! { p { class: "muted", "Could not load notifications: {e}" } },
        Some(Ok(list)) if list.is_empty() => rsx! { p { class: "muted", "No notifications yet." } },
        Some(Ok(list)) => rsx! {
            table {
                class: "table",
                thead {
                    tr {
                        th { "Recipient" }
                        th { "Type" }
                        th { "Title" }
                        th { "Scheduled" }
                        th { "State" }
                    }
                }
                tbody {
                    for n in list {
                        tr {
                            key: "{n.id}",
                            td { "{n.recipient_email}" }
                            td { "{n.notification_type.label()}" }
                            td { "{n.title}" }
                            td { "{format::short_datetime(&n.scheduled_for)}" }
                            td {
                                if n.is_read { "Read" } else if n.is_sent { "Delivered" } else { "Pending" }
                            }
                        }
                    }
                }
            }
        },
    };

    rsx! {
        h1 { "Notifications" }
        section {
            h2 { "Send a notification" }
            ErrorBanner { message: error(), on_dismiss: move |_| error.set(None) }
            if let Some(text) = notice() {
                p { class: "notice", "{text}" }
            }
            form {
                class: "form",
                onsubmit: send,
                div {
                    class: "field-row",
                    label {
                        class: "field",
                        span { "Audience" }
                        select {
                            onchange: move |e| {
                                audience.set(e.value());
                                target.set(String::new());
                            },
                            option { value: "all", selected: audience() == "all", "Everyone" }
                            option { value: "event", selected: audience() == "event", "Registrants of an event" }
                            option { value: "user", selected: audience() == "user", "One member" }
                        }
                    }
                    {target_picker}
                    label {
                        class: "field",
                        span { "Type" }
                        select {
                            onchange: move |e| {
                                if let Ok(t) = e.value().parse() {
                                    kind.set(t);
                                }
                            },
                            for t in NotificationType::ALL {
                                option { value: "{t}", selected: kind() == *t, "{t.label()}" }
                            }
                        }
                    }
                }
                label {
                    class: "field",
                    span { "Title" }
                    input { value: "{title}", oninput: move |e| title.set(e.value()) }
                }
                label {
                    class: "field",
                    span { "Message" }
                    textarea { rows: 4, value: "{message}", oninput: move |e| message.set(e.value()) }
                }
                label {
                    class: "field",
                    span { "Deliver at (UTC, optional)" }
                    input {
                        r#type: "datetime-local",
                        value: "{scheduled}",
                        oninput: move |e| scheduled.set(e.value()),
                    }
                }
                div {
                    class: "form-actions",
                    button {
                        r#type: "submit",
                        class: "btn btn-primary",
                        disabled: sending(),
                        if sending() { "Sending..." } else { "Send" }
                    }
                }
            }
        }
        section {
            h2 { "Recent" }
            {table}
        }
    }
}
