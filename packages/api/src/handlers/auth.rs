//! Signup, login, session check, logout and the OAuth entry points.

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use super::{check, ok, ApiResult, Body, Path, Query};
use crate::auth::{
    self, clear_session_cookie, hash_password_async, session_cookie, session_token,
    verify_password_async, Provider,
};
use crate::envelope::ApiResponse;
use crate::error::ApiError;
use crate::models::{AuthSession, LoginRequest, Role, SignupRequest, UserInfo, UserProfile};
use crate::repo;
use crate::state::AppState;
use crate::validate;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Issue a token for `user` and answer with the session and its cookie.
fn start_session(state: &AppState, user: &UserProfile) -> Result<Response, ApiError> {
    let (token, expires_at) = state.sessions.issue(user, Utc::now())?;
    let cookie = session_cookie(
        &token,
        state.sessions.ttl().num_seconds(),
        state.settings.session.secure_cookie,
    );
    let session = AuthSession {
        token,
        expires_at,
        user: user.to_info(),
    };
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(ApiResponse::ok(session)),
    )
        .into_response())
}

pub async fn signup(
    State(state): State<AppState>,
    Body(req): Body<SignupRequest>,
) -> Result<Response, ApiError> {
    check(validate::signup(&req))?;
    let email = validate::normalize_email(&req.email);

    if repo::users::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(ApiError::Conflict(
            "An account with this email already exists".to_string(),
        ));
    }

    let hash = hash_password_async(req.password).await?;
    let role = if state.settings.admin.is_bootstrap(&email) {
        Role::Admin
    } else {
        Role::User
    };
    let user = repo::users::insert_local(&state.pool, &email, &hash, req.full_name.trim(), role).await?;
    tracing::info!(user_id = %user.id, role = %user.role, "account created");

    start_session(&state, &user)
}

pub async fn login(
    State(state): State<AppState>,
    Body(req): Body<LoginRequest>,
) -> Result<Response, ApiError> {
    let invalid = || ApiError::Unauthorized(INVALID_CREDENTIALS.to_string());
    let email = validate::normalize_email(&req.email);

    let user = repo::users::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(invalid)?;
    let hash = user.password_hash.clone().ok_or_else(invalid)?;
    if !verify_password_async(req.password, hash).await? {
        tracing::debug!(user_id = %user.id, "wrong password");
        return Err(invalid());
    }

    repo::users::touch_login(&state.pool, user.id).await?;
    start_session(&state, &user)
}

/// The current user, or `data: null` when no session token was sent.
pub async fn session(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, ApiError> {
    let Some(token) = session_token(&headers) else {
        return Ok(Json(ApiResponse::<UserInfo>::empty()).into_response());
    };

    let user = match state.sessions.verify(&token, Utc::now()) {
        Ok(claims) => repo::users::find_by_id(&state.pool, claims.sub).await?,
        Err(e) => return Ok(reject_session(e)),
    };

    match user {
        Some(user) => Ok(Json(ApiResponse::ok(user.to_info())).into_response()),
        None => Ok(reject_session(ApiError::Unauthorized(
            "Account no longer exists".to_string(),
        ))),
    }
}

/// A 401 that also drops the stale cookie.
fn reject_session(err: ApiError) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(ApiResponse::<()>::err(err.public_message())),
    )
        .into_response()
}

pub async fn logout() -> Response {
    (
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(ApiResponse::ok(())),
    )
        .into_response()
}

/// Authorization URL of an OAuth provider.
pub async fn oauth_url(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> ApiResult<String> {
    let provider: Provider = provider.parse()?;
    let url = auth::login_url(provider, &state.settings, &state.pool).await?;
    ok(url)
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// Where the provider sends the browser back. Always answers with a redirect.
pub async fn oauth_callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(params): Query<CallbackParams>,
) -> Response {
    let provider: Provider = match provider.parse() {
        Ok(p) => p,
        Err(_) => return Redirect::to("/login?error=unknown_provider").into_response(),
    };
    if let Some(error) = params.error {
        tracing::warn!(provider = provider.as_str(), %error, "OAuth provider returned an error");
        return Redirect::to("/login?error=oauth_denied").into_response();
    }
    let (Some(code), Some(csrf)) = (params.code, params.state) else {
        tracing::error!(provider = provider.as_str(), "OAuth callback missing code or state");
        return Redirect::to("/login?error=missing_code").into_response();
    };

    let user = match auth::complete_login(provider, &state.settings, &state.pool, &code, &csrf).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!(provider = provider.as_str(), "OAuth login failed: {}", e);
            return Redirect::to("/login?error=oauth_error").into_response();
        }
    };

    match state.sessions.issue(&user, Utc::now()) {
        Ok((token, _)) => {
            let cookie = session_cookie(
                &token,
                state.sessions.ttl().num_seconds(),
                state.settings.session.secure_cookie,
            );
            ([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to issue session: {}", e);
            Redirect::to("/login?error=session_error").into_response()
        }
    }
}
