//! # API crate — domain model and backend for the YTT Platform
//!
//! This crate is shared by every part of the workspace. The client half (models,
//! envelope, validation and the REST client wrapper) compiles for any target,
//! including `wasm32`. The server half lives behind the `server` feature (on by
//! default) and contains everything that talks to Postgres or serves HTTP.
//!
//! ## Modules
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`models`] | — | Plants, events, registrations, notifications and user profiles, plus their request/response shapes |
//! | [`envelope`] | — | The `{ data, error }` JSON envelope every endpoint answers with |
//! | [`validate`] | — | Input checks shared by the UI forms and the handlers |
//! | [`client`] | — | [`ApiClient`], the typed REST wrapper used by the SPA |
//! | [`auth`] | `server` | Argon2 passwords, sealed session tokens, request extractors, GitHub/Google OAuth |
//! | [`config`] | `server` | Layered settings (defaults → `ytt.toml` → `YTT_*` env) |
//! | [`crypto`] | `server` | AES-256-GCM sealing used by session tokens |
//! | [`db`] | `server` | Postgres pool and embedded migrations |
//! | [`repo`] | `server` | Parameterized SQL, one submodule per table family |
//! | [`handlers`] | `server` | Thin axum handlers, one per concern |
//! | [`routes`] | `server` | The assembled axum [`Router`](axum::Router) |
//! | [`dispatch`] | `server` | Background task that releases scheduled notifications |

pub mod client;
pub mod envelope;
pub mod models;
pub mod validate;

#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "server")]
pub mod config;
#[cfg(feature = "server")]
pub mod crypto;
#[cfg(feature = "server")]
pub mod db;
#[cfg(feature = "server")]
pub mod dispatch;
#[cfg(feature = "server")]
pub mod error;
#[cfg(feature = "server")]
pub mod handlers;
#[cfg(feature = "server")]
pub mod repo;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod state;

pub use client::{ApiClient, ClientError};
pub use envelope::ApiResponse;
pub use models::*;

#[cfg(feature = "server")]
pub use config::Settings;
#[cfg(feature = "server")]
pub use error::ApiError;
#[cfg(feature = "server")]
pub use routes::router;
#[cfg(feature = "server")]
pub use state::AppState;
