//! Admin panel. Every page sits under [`AdminLayout`], which turns away
//! anyone who is not an admin. The server enforces the same rule on
//! `/api/admin/*`; this only keeps the UI honest.

use dioxus::prelude::*;
use ui::use_auth;

use super::{Loading, SignInRequired};
use crate::Route;

mod dashboard;
pub use dashboard::AdminDashboard;

mod plants;
pub use plants::AdminPlants;

mod events;
pub use events::AdminEvents;

mod users;
pub use users::AdminUsers;

mod notifications;
pub use notifications::AdminNotifications;

#[component]
pub fn AdminLayout() -> Element {
    let auth = use_auth();
    let state = auth();

    if state.loading {
        return rsx! { Loading {} };
    }
    if state.user.is_none() {
        return rsx! { SignInRequired {} };
    }
    if !state.is_admin() {
        return rsx! {
            div {
                class: "page page-narrow",
                h2 { "Access denied" }
                p { class: "muted", "The admin panel is only available to administrators." }
            }
        };
    }

    rsx! {
        div {
            class: "admin",
            nav {
                class: "admin-nav",
                Link { to: Route::AdminDashboard {}, active_class: "active", "Overview" }
                Link { to: Route::AdminPlants {}, active_class: "active", "Plants" }
                Link { to: Route::AdminEvents {}, active_class: "active", "Events" }
                Link { to: Route::AdminUsers {}, active_class: "active", "Users" }
                Link { to: Route::AdminNotifications {}, active_class: "active", "Notifications" }
            }
            div {
                class: "admin-content",
                Outlet::<Route> {}
            }
        }
    }
}
