mod layout;
pub use layout::AppLayout;

mod home;
pub use home::Home;

mod plants;
pub use plants::Plants;

mod plant_detail;
pub use plant_detail::PlantDetail;

mod events;
pub use events::Events;

mod event_detail;
pub use event_detail::EventDetail;

mod login;
pub use login::Login;

mod signup;
pub use signup::Signup;

mod notifications;
pub use notifications::Notifications;

mod profile;
pub use profile::Profile;

mod not_found;
pub use not_found::NotFound;

pub mod admin;

use dioxus::prelude::*;

use crate::Route;

/// Shown instead of member pages when nobody is signed in.
#[component]
pub(crate) fn SignInRequired() -> Element {
    rsx! {
        div {
            class: "page page-narrow",
            h2 { "Sign in required" }
            p { class: "muted", "You need an account to see this page." }
            Link { to: Route::Login { error: String::new() }, class: "btn btn-primary", "Log in" }
        }
    }
}

#[component]
pub(crate) fn Loading() -> Element {
    rsx! {
        p { class: "muted loading", "Loading..." }
    }
}
