use api::Notification;
use dioxus::prelude::*;
use uuid::Uuid;

use crate::format;
use crate::icons::{FaCheck, FaTrash};
use crate::Icon;

/// One inbox entry. Unread entries get a "mark read" action.
#[component]
pub fn NotificationItem(
    notification: Notification,
    on_read: EventHandler<Uuid>,
    on_delete: EventHandler<Uuid>,
) -> Element {
    let id = notification.id;
    let when = format::datetime(notification.sent_at.as_ref().unwrap_or(&notification.scheduled_for));
    let class = if notification.is_read {
        "notification"
    } else {
        "notification notification-unread"
    };

    rsx! {
        li {
            class: "{class}",
            div {
                class: "notification-head",
                span { class: "tag tag-{notification.notification_type}", "{notification.notification_type.label()}" }
                strong { "{notification.title}" }
                span { class: "muted notification-time", "{when}" }
            }
            p { class: "notification-message", "{notification.message}" }
            div {
                class: "notification-actions",
                if let Some(event_id) = notification.event_id {
                    a { href: "/events/{event_id}", class: "btn btn-link", "View event" }
                }
                if !notification.is_read {
                    button {
                        class: "btn btn-link",
                        title: "Mark as read",
                        onclick: move |_| on_read.call(id),
                        Icon { icon: FaCheck, width: 12, height: 12 }
                        " Mark read"
                    }
                }
                button {
                    class: "btn btn-link btn-danger",
                    title: "Delete",
                    onclick: move |_| on_delete.call(id),
                    Icon { icon: FaTrash, width: 12, height: 12 }
                }
            }
        }
    }
}
