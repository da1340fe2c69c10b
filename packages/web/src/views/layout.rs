use dioxus::prelude::*;
use ui::{use_auth, Navbar, UnreadBadge};

use crate::Route;

/// Navbar on top of every page.
#[component]
pub fn AppLayout() -> Element {
    let auth = use_auth();
    let state = auth();

    rsx! {
        Navbar {
            Link { to: Route::Home {}, active_class: "active", "Home" }
            Link { to: Route::Plants {}, active_class: "active", "Plants" }
            Link { to: Route::Events {}, active_class: "active", "Events" }
            if state.user.is_some() {
                Link {
                    to: Route::Notifications {},
                    active_class: "active",
                    UnreadBadge {}
                }
                Link { to: Route::Profile {}, active_class: "active", "Profile" }
            }
            if state.is_admin() {
                Link { to: Route::AdminDashboard {}, active_class: "active", "Admin" }
            }
        }
        main {
            class: "content",
            Outlet::<Route> {}
        }
    }
}
