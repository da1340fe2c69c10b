//! # Router
//!
//! | Prefix | Access |
//! |--------|--------|
//! | `/api/auth/*`, `/auth/{provider}/callback` | public |
//! | `GET /api/plants*`, `GET /api/events*` | public (admins also see unpublished events) |
//! | `/api/events/{id}/register`, `/api/me/*`, `/api/notifications*`, `/api/profile*` | logged in |
//! | `/api/admin/*` | admin |
//!
//! Access control lives in the extractors each handler takes, not in layers.

use axum::http::{header, HeaderValue, Method, Request};
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{admin, auth, events, notifications, plants, profile};
use crate::state::AppState;

/// All API routes, with request tracing and CORS for the public origin.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.settings.oauth.public_url);

    let router = Router::new()
        .merge(auth_routes())
        .merge(public_routes())
        .merge(member_routes())
        .nest("/api/admin", admin_routes())
        .with_state(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &Request<axum::body::Body>| {
                tracing::info_span!("http_request", method = %req.method(), path = %req.uri().path())
            }),
        );

    match cors {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/session", get(auth::session))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/oauth/{provider}", get(auth::oauth_url))
        .route("/auth/{provider}/callback", get(auth::oauth_callback))
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/plants", get(plants::list))
        .route("/api/plants/{id}", get(plants::get))
        .route("/api/events", get(events::list))
        .route("/api/events/{id}", get(events::get))
}

fn member_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/events/{id}/register",
            post(events::register).delete(events::cancel_registration),
        )
        .route("/api/me/registrations", get(events::my_registrations))
        .route("/api/notifications", get(notifications::list))
        .route("/api/notifications/unread-count", get(notifications::unread_count))
        .route("/api/notifications/read-all", post(notifications::mark_all_read))
        .route("/api/notifications/{id}/read", post(notifications::mark_read))
        .route("/api/notifications/{id}", axum::routing::delete(notifications::delete))
        .route("/api/profile", get(profile::get).put(profile::update))
        .route("/api/profile/password", put(profile::change_password))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/plants", post(plants::create))
        .route("/plants/{id}", put(plants::update).delete(plants::delete))
        .route("/events", post(events::create))
        .route("/events/{id}", put(events::update).delete(events::delete))
        .route("/events/{id}/registrations", get(events::registrants))
        .route("/notifications", get(notifications::recent).post(notifications::broadcast))
        .route("/users", get(admin::users))
        .route("/users/{id}/role", put(admin::set_role))
        .route("/users/{id}", axum::routing::delete(admin::delete_user))
        .route("/stats", get(admin::stats))
}

/// Credentialed CORS for the configured public origin.
fn cors_layer(public_url: &str) -> Option<CorsLayer> {
    let origin = match HeaderValue::from_str(public_url.trim_end_matches('/')) {
        Ok(origin) => origin,
        Err(e) => {
            tracing::warn!(%public_url, "CORS disabled, invalid public_url: {}", e);
            return None;
        }
    };
    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
    )
}
