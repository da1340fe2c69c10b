use dioxus::prelude::*;
use dioxus::core::Task;

use crate::icons::{FaBell, FaSeedling};
use crate::{use_api, use_auth, Icon, LogoutButton, UI_CSS};

/// How often the unread badge refreshes in the browser.
#[cfg(target_arch = "wasm32")]
const UNREAD_POLL_SECS: u64 = 60;

/// Top navigation bar. `children` are the page links; the right-hand side
/// shows the signed-in member or a login link.
#[component]
pub fn Navbar(children: Element) -> Element {
    let auth = use_auth();
    let state = auth();

    rsx! {
        document::Link { rel: "stylesheet", href: UI_CSS }
        nav {
            class: "navbar",
            span {
                class: "navbar-brand",
                Icon { icon: FaSeedling, width: 18, height: 18 }
                " YTT"
            }
            div {
                class: "navbar-links",
                {children}
            }
            div {
                class: "navbar-user",
                if state.loading {
                    span { class: "muted", "..." }
                } else if let Some(user) = &state.user {
                    span { class: "navbar-name", "{user.display_name()}" }
                    LogoutButton { class: "btn btn-link" }
                } else {
                    a { href: "/login", class: "btn btn-link", "Log in" }
                    a { href: "/signup", class: "btn btn-primary", "Sign up" }
                }
            }
        }
    }
}

/// Bell icon with the number of unread notifications. Renders nothing for
/// anonymous visitors.
#[component]
pub fn UnreadBadge() -> Element {
    let api = use_api();
    let auth = use_auth();
    let mut unread = use_signal(|| 0i64);
    let mut poller = use_signal(|| Option::<Task>::None);

    use_effect(move || {
        if let Some(task) = poller.write().take() {
            task.cancel();
        }
        if auth().user.is_none() {
            unread.set(0);
            return;
        }
        let api = api.clone();
        let task = spawn(async move {
            loop {
                match api.unread_count().await {
                    Ok(count) => unread.set(count),
                    Err(e) => tracing::debug!("Unread count failed: {}", e),
                }
                #[cfg(target_arch = "wasm32")]
                gloo_timers::future::sleep(std::time::Duration::from_secs(UNREAD_POLL_SECS)).await;
                #[cfg(not(target_arch = "wasm32"))]
                break;
            }
        });
        poller.set(Some(task));
    });

    if auth().user.is_none() {
        return rsx! {};
    }

    rsx! {
        span {
            class: "unread-badge",
            title: "Notifications",
            Icon { icon: FaBell, width: 14, height: 14 }
            if unread() > 0 {
                span { class: "unread-count", "{unread}" }
            }
        }
    }
}
