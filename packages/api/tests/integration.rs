//! End-to-end flows against a live Postgres. Run with
//! `DATABASE_URL=... cargo test -p api --features integration`.
#![cfg(feature = "integration")]

use api::models::{
    Audience, Broadcast, CareLevel, Difficulty, EventCategory, EventInput, NotificationType,
    PlantFilter, PlantInput, ProfileUpdate, RegistrationStatus, Role, Season, UserProfile,
};
use api::{repo, AppState, Settings};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

async fn state() -> AppState {
    let settings = Settings::load().unwrap();
    let pool = api::db::connect(&settings).await.unwrap();
    api::db::migrate(&pool).await.unwrap();
    AppState::new(pool, settings).unwrap()
}

fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@ytt.test", Uuid::new_v4().simple())
}

async fn member(state: &AppState, prefix: &str, role: Role) -> UserProfile {
    repo::users::insert_local(&state.pool, &unique_email(prefix), "x", prefix, role)
        .await
        .unwrap()
}

/// Send `body` as JSON to the full router, signed in as `user` when given.
async fn call(
    state: &AppState,
    method: &str,
    uri: &str,
    user: Option<&UserProfile>,
    body: Value,
) -> Response {
    let mut request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(user) = user {
        let (token, _) = state.sessions.issue(user, Utc::now()).unwrap();
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    api::router(state.clone())
        .oneshot(request.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn reminder_times(state: &AppState, event_id: Uuid) -> Vec<DateTime<Utc>> {
    sqlx::query_scalar(
        r#"
        SELECT scheduled_for FROM notifications
        WHERE event_id = $1 AND notification_type = 'event_reminder' AND NOT is_sent
        "#,
    )
    .bind(event_id)
    .fetch_all(&state.pool)
    .await
    .unwrap()
}

fn event_input(capacity: i32) -> EventInput {
    let start = Utc::now() + Duration::days(3);
    EventInput {
        title: "Seed swap".to_string(),
        description: Some("Bring seeds, take seeds".to_string()),
        location: Some("Greenhouse B".to_string()),
        category: EventCategory::Social,
        difficulty: Difficulty::Beginner,
        start_time: start,
        end_time: start + Duration::hours(2),
        capacity,
        image_url: None,
        is_published: true,
    }
}

#[tokio::test]
async fn registration_respects_capacity_and_queues_notifications() {
    let state = state().await;
    let pool = &state.pool;
    let admin = repo::users::insert_local(pool, &unique_email("admin"), "x", "Admin", Role::Admin)
        .await
        .unwrap();
    let first = repo::users::insert_local(pool, &unique_email("first"), "x", "First", Role::User)
        .await
        .unwrap();
    let second = repo::users::insert_local(pool, &unique_email("second"), "x", "Second", Role::User)
        .await
        .unwrap();

    let event = repo::events::create(pool, &event_input(1), admin.id).await.unwrap();
    let lead = Duration::hours(24);

    repo::events::register(pool, event.id, first.id, lead, Utc::now())
        .await
        .unwrap();
    let full = repo::events::register(pool, event.id, second.id, lead, Utc::now()).await;
    assert!(matches!(full, Err(api::ApiError::EventFull)));
    let again = repo::events::register(pool, event.id, first.id, lead, Utc::now()).await;
    assert!(matches!(again, Err(api::ApiError::Conflict(_))));

    let stored = repo::events::get(pool, event.id).await.unwrap().unwrap();
    assert_eq!(stored.registered_count, 1);

    // confirmation is due now, the reminder two days from now
    api::dispatch::dispatch_due(pool, Utc::now()).await.unwrap();
    let inbox = repo::notifications::list_for_user(pool, first.id, false).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].notification_type, NotificationType::RegistrationConfirmed);

    repo::events::cancel(pool, event.id, first.id).await.unwrap();
    let stored = repo::events::get(pool, event.id).await.unwrap().unwrap();
    assert_eq!(stored.registered_count, 0);
    api::dispatch::dispatch_due(pool, Utc::now() + Duration::days(5)).await.unwrap();
    let inbox = repo::notifications::list_for_user(pool, first.id, false).await.unwrap();
    assert!(inbox
        .iter()
        .all(|n| n.notification_type != NotificationType::EventReminder));

    // the freed seat can be taken by someone else
    repo::events::register(pool, event.id, second.id, lead, Utc::now())
        .await
        .unwrap();
    let notified = repo::events::delete(pool, event.id).await.unwrap();
    assert_eq!(notified, 1);

    for user in [admin.id, first.id, second.id] {
        repo::users::delete(pool, user).await.unwrap();
    }
}

#[tokio::test]
async fn oauth_login_links_existing_local_account() {
    let state = state().await;
    let pool = &state.pool;
    let email = unique_email("linked");
    let local = repo::users::insert_local(pool, &email, "hash", "Local Name", Role::User)
        .await
        .unwrap();

    let identity = repo::users::OAuthIdentity {
        provider: "github",
        provider_id: Uuid::new_v4().to_string(),
        email: email.to_uppercase(),
        full_name: Some("GitHub Name".to_string()),
        avatar_url: Some("https://avatars.example/1.png".to_string()),
    };
    let linked = repo::users::upsert_oauth(pool, &identity, Role::User).await.unwrap();
    assert_eq!(linked.id, local.id);
    assert_eq!(linked.full_name.as_deref(), Some("Local Name"));
    assert_eq!(linked.password_hash.as_deref(), Some("hash"));

    let again = repo::users::upsert_oauth(pool, &identity, Role::User).await.unwrap();
    assert_eq!(again.id, local.id);

    repo::users::delete(pool, local.id).await.unwrap();
}

#[tokio::test]
async fn plant_filters_and_broadcasts() {
    let state = state().await;
    let pool = &state.pool;
    let marker = Uuid::new_v4().simple().to_string();

    let basil = repo::plants::create(
        pool,
        &PlantInput {
            common_name: format!("Basil {marker}"),
            care_level: CareLevel::Easy,
            harvest_season: Some(Season::Summer),
            is_edible: true,
            ..PlantInput::default()
        },
    )
    .await
    .unwrap();

    let found = repo::plants::list(
        pool,
        &PlantFilter {
            search: Some(marker.clone()),
            season: Some(Season::Summer),
            edible: Some(true),
            ..PlantFilter::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(found.len(), 1);

    let winter = repo::plants::list(
        pool,
        &PlantFilter {
            search: Some(marker),
            season: Some(Season::Winter),
            ..PlantFilter::default()
        },
    )
    .await
    .unwrap();
    assert!(winter.is_empty());
    repo::plants::delete(pool, basil.id).await.unwrap();

    let user = repo::users::insert_local(pool, &unique_email("news"), "x", "Reader", Role::User)
        .await
        .unwrap();
    let created = repo::notifications::broadcast(
        pool,
        &Broadcast {
            audience: Audience::User(user.id),
            notification_type: NotificationType::Announcement,
            title: "Garden day".to_string(),
            message: "Saturday at ten".to_string(),
            scheduled_for: None,
        },
        Utc::now(),
    )
    .await
    .unwrap();
    assert_eq!(created, 1);
    let missing = repo::notifications::broadcast(
        pool,
        &Broadcast {
            audience: Audience::User(Uuid::new_v4()),
            notification_type: NotificationType::Announcement,
            title: "t".to_string(),
            message: "m".to_string(),
            scheduled_for: None,
        },
        Utc::now(),
    )
    .await;
    assert!(matches!(missing, Err(api::ApiError::NotFound("User"))));

    api::dispatch::dispatch_due(pool, Utc::now()).await.unwrap();
    assert_eq!(repo::notifications::unread_count(pool, user.id).await.unwrap(), 1);
    assert_eq!(repo::notifications::mark_all_read(pool, user.id).await.unwrap(), 1);
    assert_eq!(repo::notifications::unread_count(pool, user.id).await.unwrap(), 0);

    repo::users::delete(pool, user.id).await.unwrap();
}

#[tokio::test]
async fn cancelled_registration_is_reactivated() {
    let state = state().await;
    let pool = &state.pool;
    let admin = member(&state, "admin", Role::Admin).await;
    let user = member(&state, "again", Role::User).await;
    let event = repo::events::create(pool, &event_input(1), admin.id).await.unwrap();
    let lead = Duration::hours(24);

    let first = repo::events::register(pool, event.id, user.id, lead, Utc::now())
        .await
        .unwrap();
    repo::events::cancel(pool, event.id, user.id).await.unwrap();
    let second = repo::events::register(pool, event.id, user.id, lead, Utc::now())
        .await
        .unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.status, RegistrationStatus::Registered);
    let stored = repo::events::get(pool, event.id).await.unwrap().unwrap();
    assert_eq!(stored.registered_count, 1);
    assert_eq!(reminder_times(&state, event.id).await.len(), 1);

    repo::events::delete(pool, event.id).await.unwrap();
    for id in [admin.id, user.id] {
        repo::users::delete(pool, id).await.unwrap();
    }
}

#[tokio::test]
async fn updating_an_event_moves_reminders_and_notifies() {
    let state = state().await;
    let pool = &state.pool;
    let admin = member(&state, "admin", Role::Admin).await;
    let first = member(&state, "first", Role::User).await;
    let second = member(&state, "second", Role::User).await;
    let event = repo::events::create(pool, &event_input(5), admin.id).await.unwrap();
    let lead = Duration::hours(24);
    for user in [&first, &second] {
        repo::events::register(pool, event.id, user.id, lead, Utc::now())
            .await
            .unwrap();
    }

    let mut shrunk = event_input(1);
    shrunk.start_time = event.start_time;
    shrunk.end_time = event.end_time;
    let floor = repo::events::update(pool, event.id, &shrunk, lead, Utc::now()).await;
    assert!(matches!(floor, Err(api::ApiError::Validation(_))));

    let mut moved = event_input(2);
    moved.start_time = event.start_time + Duration::days(30);
    moved.end_time = moved.start_time + Duration::hours(2);
    let (updated, notified) = repo::events::update(pool, event.id, &moved, lead, Utc::now())
        .await
        .unwrap();
    assert_eq!(notified, 2);
    assert_eq!(updated.capacity, 2);

    let expected = moved.start_time - lead;
    let reminders = reminder_times(&state, event.id).await;
    assert_eq!(reminders.len(), 2);
    for at in reminders {
        assert!((at - expected).num_seconds().abs() < 1, "reminder at {at}, wanted {expected}");
    }

    // a start inside the lead window schedules the reminder immediately
    let mut soon = event_input(2);
    soon.start_time = Utc::now() + Duration::hours(2);
    soon.end_time = soon.start_time + Duration::hours(1);
    let now = Utc::now();
    repo::events::update(pool, event.id, &soon, lead, now).await.unwrap();
    for at in reminder_times(&state, event.id).await {
        assert!((at - now).num_seconds().abs() < 1);
    }

    api::dispatch::dispatch_due(pool, Utc::now()).await.unwrap();
    for user in [&first, &second] {
        let inbox = repo::notifications::list_for_user(pool, user.id, false).await.unwrap();
        let updates = inbox
            .iter()
            .filter(|n| n.notification_type == NotificationType::EventUpdated)
            .count();
        assert_eq!(updates, 2);
    }

    repo::events::delete(pool, event.id).await.unwrap();
    for id in [admin.id, first.id, second.id] {
        repo::users::delete(pool, id).await.unwrap();
    }
}

#[tokio::test]
async fn deleting_an_event_keeps_cancellation_notices() {
    let state = state().await;
    let pool = &state.pool;
    let admin = member(&state, "admin", Role::Admin).await;
    let user = member(&state, "notice", Role::User).await;
    let event = repo::events::create(pool, &event_input(3), admin.id).await.unwrap();
    repo::events::register(pool, event.id, user.id, Duration::hours(24), Utc::now())
        .await
        .unwrap();

    assert_eq!(repo::events::delete(pool, event.id).await.unwrap(), 1);
    assert!(repo::events::get(pool, event.id).await.unwrap().is_none());

    api::dispatch::dispatch_due(pool, Utc::now()).await.unwrap();
    let inbox = repo::notifications::list_for_user(pool, user.id, false).await.unwrap();
    let cancelled: Vec<_> = inbox
        .iter()
        .filter(|n| n.notification_type == NotificationType::EventCancelled)
        .collect();
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].event_id, None);
    assert!(inbox.iter().all(|n| n.event_id.is_none()));

    for id in [admin.id, user.id] {
        repo::users::delete(pool, id).await.unwrap();
    }
}

#[tokio::test]
async fn deleting_a_user_releases_their_seats() {
    let state = state().await;
    let pool = &state.pool;
    let admin = member(&state, "admin", Role::Admin).await;
    let leaving = member(&state, "leaving", Role::User).await;
    let staying = member(&state, "staying", Role::User).await;
    let event = repo::events::create(pool, &event_input(2), admin.id).await.unwrap();
    for user in [&leaving, &staying] {
        repo::events::register(pool, event.id, user.id, Duration::hours(24), Utc::now())
            .await
            .unwrap();
    }

    assert!(repo::users::delete(pool, leaving.id).await.unwrap());
    let stored = repo::events::get(pool, event.id).await.unwrap().unwrap();
    assert_eq!(stored.registered_count, 1);
    assert!(!repo::users::delete(pool, leaving.id).await.unwrap());

    repo::events::delete(pool, event.id).await.unwrap();
    for id in [admin.id, staying.id] {
        repo::users::delete(pool, id).await.unwrap();
    }
}

#[tokio::test]
async fn seasonless_plants_are_not_year_round() {
    let state = state().await;
    let pool = &state.pool;
    let marker = Uuid::new_v4().simple().to_string();

    let moss = repo::plants::create(
        pool,
        &PlantInput {
            common_name: format!("Moss {marker}"),
            care_level: CareLevel::Easy,
            ..PlantInput::default()
        },
    )
    .await
    .unwrap();
    let tulip = repo::plants::create(
        pool,
        &PlantInput {
            common_name: format!("Tulip {marker}"),
            care_level: CareLevel::Moderate,
            bloom_season: Some(Season::Spring),
            ..PlantInput::default()
        },
    )
    .await
    .unwrap();

    let found = repo::plants::list(
        pool,
        &PlantFilter {
            search: Some(marker),
            season: Some(Season::YearRound),
            ..PlantFilter::default()
        },
    )
    .await
    .unwrap();
    let ids: Vec<Uuid> = found.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![tulip.id]);
    assert!(found.iter().all(|p| p.in_season(Season::YearRound)));
    assert!(!moss.in_season(Season::YearRound));

    for id in [moss.id, tulip.id] {
        repo::plants::delete(pool, id).await.unwrap();
    }
}

#[tokio::test]
async fn admins_cannot_demote_or_delete_themselves() {
    let state = state().await;
    let admin = member(&state, "self", Role::Admin).await;
    let uri = format!("/api/admin/users/{}", admin.id);

    let demote = call(&state, "PUT", &format!("{uri}/role"), Some(&admin), json!({ "role": "user" })).await;
    assert_eq!(demote.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(demote).await,
        json!({ "data": null, "error": "You cannot remove your own admin role" })
    );

    let delete = call(&state, "DELETE", &uri, Some(&admin), Value::Null).await;
    assert_eq!(delete.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(delete).await,
        json!({ "data": null, "error": "You cannot delete your own account" })
    );

    let stored = repo::users::find_by_id(&state.pool, admin.id).await.unwrap().unwrap();
    assert_eq!(stored.role, Role::Admin);
    repo::users::delete(&state.pool, admin.id).await.unwrap();
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let state = state().await;
    let pool = &state.pool;
    let local_email = unique_email("local");
    let hash = api::auth::hash_password("correct horse battery").unwrap();
    let local = repo::users::insert_local(pool, &local_email, &hash, "Local", Role::User)
        .await
        .unwrap();
    let oauth_email = unique_email("oauth");
    let oauth = repo::users::upsert_oauth(
        pool,
        &repo::users::OAuthIdentity {
            provider: "google",
            provider_id: Uuid::new_v4().to_string(),
            email: oauth_email.clone(),
            full_name: None,
            avatar_url: None,
        },
        Role::User,
    )
    .await
    .unwrap();

    for (email, password) in [
        (unique_email("nobody"), "correct horse battery"),
        (oauth_email, "correct horse battery"),
        (local_email.clone(), "wrong horse battery"),
    ] {
        let response = call(
            &state,
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": email, "password": password }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            json!({ "data": null, "error": "Invalid email or password" })
        );
    }

    let ok = call(
        &state,
        "POST",
        "/api/auth/login",
        None,
        json!({ "email": local_email, "password": "correct horse battery" }),
    )
    .await;
    assert_eq!(ok.status(), StatusCode::OK);

    for id in [local.id, oauth.id] {
        repo::users::delete(pool, id).await.unwrap();
    }
}

#[tokio::test]
async fn password_change_checks_the_current_password() {
    let state = state().await;
    let pool = &state.pool;
    let hash = api::auth::hash_password("correct horse battery").unwrap();
    let user = repo::users::insert_local(pool, &unique_email("pw"), &hash, "Pw", Role::User)
        .await
        .unwrap();

    let response = call(
        &state,
        "PUT",
        "/api/profile/password",
        Some(&user),
        json!({ "current_password": "not it at all", "new_password": "brand new secret" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await,
        json!({ "data": null, "error": "Current password is incorrect" })
    );
    let stored = repo::users::find_by_id(pool, user.id).await.unwrap().unwrap();
    assert_eq!(stored.password_hash.as_deref(), Some(hash.as_str()));

    repo::users::delete(pool, user.id).await.unwrap();
}

#[tokio::test]
async fn blank_profile_fields_are_cleared() {
    let state = state().await;
    let pool = &state.pool;
    let user = member(&state, "profile", Role::User).await;
    repo::users::update_profile(
        pool,
        user.id,
        &ProfileUpdate {
            phone: Some("555-0100".to_string()),
            bio: Some("Grows tomatoes".to_string()),
            ..ProfileUpdate::default()
        },
    )
    .await
    .unwrap();

    let response = call(
        &state,
        "PUT",
        "/api/profile",
        Some(&user),
        json!({ "phone": "", "bio": "" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["phone"], Value::Null);
    assert_eq!(body["data"]["bio"], Value::Null);
    assert_eq!(body["data"]["full_name"], json!("profile"));

    repo::users::delete(pool, user.id).await.unwrap();
}
