//! Router behaviour that does not need a database: authentication and
//! authorization failures, input validation, and cookie handling. The pool is
//! lazily connected and never used by these requests.
#![cfg(feature = "server")]

use api::auth::SessionClaims;
use api::{router, AppState, Role, Settings};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

fn state() -> AppState {
    let settings = Settings::defaults().unwrap();
    let pool = api::db::connect_lazy(&settings).unwrap();
    AppState::new(pool, settings).unwrap()
}

fn app(state: &AppState) -> Router {
    router(state.clone())
}

fn token(state: &AppState, role: Role, exp_in: Duration) -> String {
    let now = Utc::now();
    state
        .sessions
        .encode(&SessionClaims {
            sub: Uuid::new_v4(),
            email: "member@ytt.org".to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + exp_in).timestamp(),
        })
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn set_cookie(response: &Response) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn member_routes_require_a_session() {
    let state = state();
    let response = app(&state)
        .oneshot(Request::get("/api/notifications").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await,
        json!({ "data": null, "error": "Not authenticated" })
    );
}

#[tokio::test]
async fn admin_routes_reject_members_without_touching_the_database() {
    let state = state();
    let token = token(&state, Role::User, Duration::hours(1));

    for (method, uri) in [
        ("GET", "/api/admin/stats"),
        ("GET", "/api/admin/users"),
        ("DELETE", "/api/admin/plants/7b0c1f4e-8a53-4f0e-9a59-0d9f1c2b3a4d"),
    ] {
        let response = app(&state)
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{method} {uri}");
        assert_eq!(body_json(response).await["error"], "Admin access required");
    }
}

#[tokio::test]
async fn expired_session_is_rejected() {
    let state = state();
    let token = token(&state, Role::User, Duration::hours(-1));
    let response = app(&state)
        .oneshot(
            Request::get("/api/profile")
                .header(header::COOKIE, format!("ytt_session={token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Session expired");
}

#[tokio::test]
async fn session_check_without_token_returns_null() {
    let state = state();
    let response = app(&state)
        .oneshot(Request::get("/api/auth/session").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "data": null, "error": null }));
}

#[tokio::test]
async fn session_check_with_bad_token_clears_cookie() {
    let state = state();
    let response = app(&state)
        .oneshot(
            Request::get("/api/auth/session")
                .header(header::COOKIE, "ytt_session=forged")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookie(&response).contains("Max-Age=0"));
    assert_eq!(body_json(response).await["error"], "Invalid session");
}

#[tokio::test]
async fn logout_clears_cookie() {
    let state = state();
    let response = app(&state)
        .oneshot(Request::post("/api/auth/logout").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = set_cookie(&response);
    assert!(cookie.starts_with("ytt_session=;"));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn signup_validates_before_anything_else() {
    let state = state();
    let cases = [
        (json!({ "email": "not-an-email", "password": "longenough", "full_name": "Ivy" }), "Invalid email address"),
        (json!({ "email": "ivy@ytt.org", "password": "short", "full_name": "Ivy" }), "Password must be at least 8 characters"),
        (json!({ "email": "ivy@ytt.org", "password": "longenough", "full_name": "  " }), "Name is required"),
    ];

    for (body, message) in cases {
        let response = app(&state)
            .oneshot(
                Request::post("/api/auth/signup")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], message);
    }
}

#[tokio::test]
async fn malformed_input_is_reported_in_the_envelope() {
    let state = state();

    let response = app(&state)
        .oneshot(
            Request::post("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"email\": 1"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["data"].is_null());
    assert!(body["error"].is_string());

    let response = app(&state)
        .oneshot(Request::get("/api/plants/not-a-uuid").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn unknown_or_unconfigured_oauth_provider_is_a_bad_request() {
    let state = state();

    let response = app(&state)
        .oneshot(Request::get("/api/auth/oauth/myspace").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Unknown provider: myspace");

    let response = app(&state)
        .oneshot(Request::get("/api/auth/oauth/github").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "github login is not configured");
}

#[tokio::test]
async fn oauth_callback_failures_redirect_to_login() {
    let state = state();

    for (uri, target) in [
        ("/auth/myspace/callback?code=x&state=y", "/login?error=unknown_provider"),
        ("/auth/github/callback?error=access_denied", "/login?error=oauth_denied"),
        ("/auth/google/callback?code=x", "/login?error=missing_code"),
    ] {
        let response = app(&state)
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.status().is_redirection(), "{uri}");
        assert_eq!(response.headers()[header::LOCATION], target);
    }
}
