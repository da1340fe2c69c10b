//! This crate contains all shared UI for the workspace.

use dioxus::prelude::*;

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_brands_icons::{FaGithub, FaGoogle};
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

pub const UI_CSS: Asset = asset!("/assets/ui.css");

mod client;
pub use client::{api_base_url, use_api};

mod auth;
pub use auth::{use_auth, AuthProvider, AuthState, LoginButton, LogoutButton};

mod navbar;
pub use navbar::{Navbar, UnreadBadge};

mod cards;
pub use cards::{EventCard, PlantCard};

mod notification_item;
pub use notification_item::NotificationItem;

mod error_banner;
pub use error_banner::ErrorBanner;

mod forms;
pub use forms::{blank_event, EventForm, PlantForm};

mod markdown;
pub use markdown::{render_markdown, Markdown};

pub mod format;
