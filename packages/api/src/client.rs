//! # REST client
//!
//! [`ApiClient`] is the typed wrapper the SPA uses to talk to the backend. It
//! compiles natively and for `wasm32` (where `reqwest` goes through `fetch`,
//! so the same-origin session cookie is sent automatically). Scripts and tests
//! can attach a bearer token instead with [`ApiClient::with_token`].
//!
//! Every method decodes the `{ data, error }` envelope: an `error` becomes
//! [`ClientError::Api`], a missing `data` where one is required becomes
//! [`ClientError::MissingData`].

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::envelope::ApiResponse;
use crate::models::{
    AdminNotification, AdminStats, AuthSession, Broadcast, BroadcastResult, Event, EventFilter,
    EventInput, LoginRequest, MyRegistration, Notification, PasswordChange, Plant, PlantFilter,
    PlantInput, ProfileUpdate, Registrant, Registration, Role, RoleUpdate, SignupRequest,
    UnreadCount, UserInfo,
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("The server returned no data")]
    MissingData,
}

impl ClientError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Api { status: 401, .. })
    }
}

/// Typed access to the platform's REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// `base_url` is the origin serving `/api`, e.g. `http://localhost:8080`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send and decode the envelope, allowing `data: null`.
    async fn send_optional<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<Option<T>, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        let body: ApiResponse<T> = match response.json().await {
            Ok(body) => body,
            // Non-envelope bodies (proxies, panics) still carry a useful status.
            Err(_) if !status.is_success() => {
                return Err(ClientError::Api {
                    status: status.as_u16(),
                    message: status
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        };
        decode(status, body)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        self.send_optional(builder)
            .await?
            .ok_or(ClientError::MissingData)
    }

    /// For endpoints whose `data` is always `null`.
    async fn send_unit(&self, builder: RequestBuilder) -> Result<(), ClientError> {
        self.send_optional::<serde_json::Value>(builder).await?;
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(self.request(Method::GET, path)).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ClientError> {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    async fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ClientError> {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.send_unit(self.request(Method::DELETE, path)).await
    }

    // auth

    pub async fn signup(&self, req: &SignupRequest) -> Result<AuthSession, ClientError> {
        self.post("/api/auth/signup", req).await
    }

    pub async fn login(&self, req: &LoginRequest) -> Result<AuthSession, ClientError> {
        self.post("/api/auth/login", req).await
    }

    /// The logged-in user, or `None` without a session.
    pub async fn session(&self) -> Result<Option<UserInfo>, ClientError> {
        self.send_optional(self.request(Method::GET, "/api/auth/session"))
            .await
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        self.send_unit(self.request(Method::POST, "/api/auth/logout"))
            .await
    }

    /// Authorization URL for `provider` (`github` or `google`).
    pub async fn oauth_url(&self, provider: &str) -> Result<String, ClientError> {
        self.get(&format!("/api/auth/oauth/{provider}")).await
    }

    // plants

    pub async fn plants(&self, filter: &PlantFilter) -> Result<Vec<Plant>, ClientError> {
        self.send(self.request(Method::GET, "/api/plants").query(&filter.to_query()))
            .await
    }

    pub async fn plant(&self, id: Uuid) -> Result<Plant, ClientError> {
        self.get(&format!("/api/plants/{id}")).await
    }

    pub async fn create_plant(&self, input: &PlantInput) -> Result<Plant, ClientError> {
        self.post("/api/admin/plants", input).await
    }

    pub async fn update_plant(&self, id: Uuid, input: &PlantInput) -> Result<Plant, ClientError> {
        self.put(&format!("/api/admin/plants/{id}"), input).await
    }

    pub async fn delete_plant(&self, id: Uuid) -> Result<(), ClientError> {
        self.delete(&format!("/api/admin/plants/{id}")).await
    }

    // events

    pub async fn events(&self, filter: &EventFilter) -> Result<Vec<Event>, ClientError> {
        self.send(self.request(Method::GET, "/api/events").query(&filter.to_query()))
            .await
    }

    pub async fn event(&self, id: Uuid) -> Result<Event, ClientError> {
        self.get(&format!("/api/events/{id}")).await
    }

    pub async fn register(&self, event_id: Uuid) -> Result<Registration, ClientError> {
        self.send(self.request(Method::POST, &format!("/api/events/{event_id}/register")))
            .await
    }

    pub async fn cancel_registration(&self, event_id: Uuid) -> Result<(), ClientError> {
        self.delete(&format!("/api/events/{event_id}/register")).await
    }

    pub async fn my_registrations(&self) -> Result<Vec<MyRegistration>, ClientError> {
        self.get("/api/me/registrations").await
    }

    pub async fn create_event(&self, input: &EventInput) -> Result<Event, ClientError> {
        self.post("/api/admin/events", input).await
    }

    pub async fn update_event(&self, id: Uuid, input: &EventInput) -> Result<Event, ClientError> {
        self.put(&format!("/api/admin/events/{id}"), input).await
    }

    pub async fn delete_event(&self, id: Uuid) -> Result<(), ClientError> {
        self.delete(&format!("/api/admin/events/{id}")).await
    }

    pub async fn registrants(&self, event_id: Uuid) -> Result<Vec<Registrant>, ClientError> {
        self.get(&format!("/api/admin/events/{event_id}/registrations"))
            .await
    }

    // notifications

    pub async fn notifications(&self, unread_only: bool) -> Result<Vec<Notification>, ClientError> {
        self.send(
            self.request(Method::GET, "/api/notifications")
                .query(&[("unread_only", unread_only)]),
        )
        .await
    }

    pub async fn unread_count(&self) -> Result<i64, ClientError> {
        let count: UnreadCount = self.get("/api/notifications/unread-count").await?;
        Ok(count.unread)
    }

    pub async fn mark_read(&self, id: Uuid) -> Result<(), ClientError> {
        self.send_unit(self.request(Method::POST, &format!("/api/notifications/{id}/read")))
            .await
    }

    /// Returns how many notifications changed.
    pub async fn mark_all_read(&self) -> Result<u64, ClientError> {
        self.send(self.request(Method::POST, "/api/notifications/read-all"))
            .await
    }

    pub async fn delete_notification(&self, id: Uuid) -> Result<(), ClientError> {
        self.delete(&format!("/api/notifications/{id}")).await
    }

    pub async fn broadcast(&self, broadcast: &Broadcast) -> Result<BroadcastResult, ClientError> {
        self.post("/api/admin/notifications", broadcast).await
    }

    pub async fn recent_notifications(&self) -> Result<Vec<AdminNotification>, ClientError> {
        self.get("/api/admin/notifications").await
    }

    // profile

    pub async fn profile(&self) -> Result<UserInfo, ClientError> {
        self.get("/api/profile").await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserInfo, ClientError> {
        self.put("/api/profile", update).await
    }

    pub async fn change_password(&self, change: &PasswordChange) -> Result<(), ClientError> {
        self.send_unit(self.request(Method::PUT, "/api/profile/password").json(change))
            .await
    }

    // admin

    pub async fn users(&self, search: Option<&str>) -> Result<Vec<UserInfo>, ClientError> {
        let mut builder = self.request(Method::GET, "/api/admin/users");
        if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
            builder = builder.query(&[("search", search)]);
        }
        self.send(builder).await
    }

    pub async fn set_role(&self, user_id: Uuid, role: Role) -> Result<UserInfo, ClientError> {
        self.put(&format!("/api/admin/users/{user_id}/role"), &RoleUpdate { role })
            .await
    }

    pub async fn delete_user(&self, user_id: Uuid) -> Result<(), ClientError> {
        self.delete(&format!("/api/admin/users/{user_id}")).await
    }

    pub async fn stats(&self) -> Result<AdminStats, ClientError> {
        self.get("/api/admin/stats").await
    }
}

fn decode<T>(status: StatusCode, body: ApiResponse<T>) -> Result<Option<T>, ClientError> {
    body.into_result().map_err(|message| ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_trimmed() {
        let client = ApiClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn envelope_error_becomes_api_error() {
        let err = decode::<u32>(StatusCode::UNAUTHORIZED, ApiResponse::err("Not authenticated"))
            .unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "Not authenticated");
    }

    #[test]
    fn null_data_is_not_an_error() {
        assert_eq!(decode::<u32>(StatusCode::OK, ApiResponse::empty()).unwrap(), None);
        assert_eq!(decode(StatusCode::OK, ApiResponse::ok(7)).unwrap(), Some(7));
    }
}
