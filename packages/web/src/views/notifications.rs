use dioxus::prelude::*;
use ui::{use_api, use_auth, ErrorBanner, NotificationItem};
use uuid::Uuid;

use super::{Loading, SignInRequired};

#[component]
pub fn Notifications() -> Element {
    let api = use_api();
    let auth = use_auth();
    let mut unread_only = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);

    let mut inbox = use_resource({
        let api = api.clone();
        move || {
            let api = api.clone();
            let unread_only = unread_only();
            let signed_in = auth().user.is_some();
            async move {
                if !signed_in {
                    return Ok(Vec::new());
                }
                api.notifications(unread_only).await.map_err(|e| e.to_string())
            }
        }
    });

    let mark_read = {
        let api = api.clone();
        move |id: Uuid| {
            let api = api.clone();
            spawn(async move {
                match api.mark_read(id).await {
                    Ok(()) => inbox.restart(),
                    Err(e) => error.set(Some(e.to_string())),
                }
            });
        }
    };

    let delete = {
        let api = api.clone();
        move |id: Uuid| {
            let api = api.clone();
            spawn(async move {
                match api.delete_notification(id).await {
                    Ok(()) => inbox.restart(),
                    Err(e) => error.set(Some(e.to_string())),
                }
            });
        }
    };

    let mark_all = {
        let api = api.clone();
        move |_| {
            let api = api.clone();
            async move {
                match api.mark_all_read().await {
                    Ok(changed) => {
                        tracing::debug!("Marked {} notifications read", changed);
                        inbox.restart();
                    }
                    Err(e) => error.set(Some(e.to_string())),
                }
            }
        }
    };

    let state = auth();
    if state.loading {
        return rsx! { Loading {} };
    }
    if state.user.is_none() {
        return rsx! { SignInRequired {} };
    }

    let list = match inbox.cloned() {
        None => rsx! { Loading {} },
        Some(Err(e)) => rsx! { p { class: "muted", "Could not load notifications: {e}" } },
        Some(Ok(items)) if items.is_empty() => rsx! {
            p { class: "muted", "Nothing here. You're all caught up." }
        },
        Some(Ok(items)) => rsx! {
            ul {
                class: "notification-list",
                for notification in items {
                    NotificationItem {
                        key: "{notification.id}",
                        notification,
                        on_read: mark_read.clone(),
                        on_delete: delete.clone(),
                    }
                }
            }
        },
    };

    rsx! {
        div {
            class: "page page-narrow",
            div {
                class: "page-header",
                h1 { "Notifications" }
                label {
                    class: "field-check",
                    input {
                        r#type: "checkbox",
                        checked: unread_only(),
                        onchange: move |e| unread_only.set(e.checked()),
                    }
                    " Unread only"
                }
                button { class: "btn", onclick: mark_all, "Mark all as read" }
            }
            ErrorBanner { message: error(), on_dismiss: move |_| error.set(None) }
            {list}
        }
    }
}
