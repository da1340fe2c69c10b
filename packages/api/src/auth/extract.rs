//! Request extractors that turn a session token into an authenticated caller.
//!
//! The token is taken from `Authorization: Bearer ...` first and from the
//! session cookie otherwise, so both the SPA (cookie) and scripted clients
//! (header) work against the same handlers.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header, request::Parts, HeaderMap};
use chrono::Utc;
use cookie::{time, Cookie, CookieBuilder, SameSite};

use super::session::{SessionClaims, SESSION_COOKIE};
use crate::error::ApiError;
use crate::models::Role;
use crate::repo;
use crate::state::AppState;

/// Extract the session token from the request headers.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(|cookie| cookie.ok())
        .find(|cookie| cookie.name() == SESSION_COOKIE && !cookie.value().is_empty())
        .map(|cookie| cookie.value().to_string())
}

fn base_cookie(value: &str, max_age_secs: i64) -> CookieBuilder<'_> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age_secs))
}

/// Create the session cookie.
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    base_cookie(token, max_age_secs).secure(secure).build().to_string()
}

/// Create a cookie that clears the session.
pub fn clear_session_cookie() -> String {
    base_cookie("", 0).build().to_string()
}

/// An authenticated caller.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub SessionClaims);

/// A caller who may or may not be logged in. A token that is present but
/// invalid still rejects the request.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<SessionClaims>);

/// An authenticated caller whose admin role was confirmed against the database.
#[derive(Debug, Clone)]
pub struct AdminUser(pub SessionClaims);

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        match session_token(&parts.headers) {
            None => Ok(MaybeUser(None)),
            Some(token) => state
                .sessions
                .verify(&token, Utc::now())
                .map(|claims| MaybeUser(Some(claims))),
        }
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match MaybeUser::from_request_parts(parts, state).await? {
            MaybeUser(Some(claims)) => Ok(CurrentUser(claims)),
            MaybeUser(None) => Err(ApiError::unauthorized()),
        }
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(claims) = CurrentUser::from_request_parts(parts, state).await?;
        if !claims.is_admin() {
            return Err(ApiError::forbidden());
        }

        // The token may predate a demotion or deletion.
        let state = AppState::from_ref(state);
        match repo::users::role_of(&state.pool, claims.sub).await? {
            Some(Role::Admin) => Ok(AdminUser(claims)),
            Some(_) => Err(ApiError::forbidden()),
            None => Err(ApiError::unauthorized()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(header::COOKIE, HeaderValue::from_static("ytt_session=def"));
        assert_eq!(session_token(&headers).as_deref(), Some("abc"));
    }

    #[test]
    fn cookie_is_found_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; ytt_session=tok123; lang=en"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("tok123"));
    }

    #[test]
    fn empty_or_missing_token_is_none() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_token(&headers), None);
        headers.insert(header::COOKIE, HeaderValue::from_static("ytt_session="));
        assert_eq!(session_token(&headers), None);
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic Zm9v"));
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn cookies_are_http_only() {
        let cookie = Cookie::parse(session_cookie("tok", 86400, true)).unwrap();
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(86400)));
        assert_eq!(cookie.secure(), Some(true));

        let plain = session_cookie("tok", 60, false);
        assert!(!plain.contains("Secure"));

        let cleared = clear_session_cookie();
        assert!(cleared.starts_with("ytt_session=;"));
        assert!(cleared.contains("Max-Age=0"));
    }

    #[test]
    fn malformed_cookie_pairs_are_skipped() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("garbage; ytt_session=tok456"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("tok456"));
    }
}
