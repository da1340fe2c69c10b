//! Profile page: personal details, password and the member's registrations.

use api::{validate, PasswordChange, ProfileUpdate, RegistrationStatus, UserInfo};
use dioxus::prelude::*;
use ui::format;
use ui::{use_api, use_auth, AuthState, ErrorBanner};

use super::{Loading, SignInRequired};
use crate::Route;

#[component]
pub fn Profile() -> Element {
    let auth = use_auth();
    let state = auth();

    if state.loading {
        return rsx! { Loading {} };
    }
    let Some(user) = state.user else {
        return rsx! { SignInRequired {} };
    };

    rsx! {
        div {
            class: "page page-narrow",
            h1 { "Your profile" }
            p { class: "muted", "{user.email} · member since {user.created_at.format(\"%B %Y\")}" }
            ProfileForm { key: "{user.id}", user: user.clone() }
            if user.has_password {
                PasswordForm {}
            } else {
                p { class: "muted", "You sign in with {format::label(&user.provider)}, so there is no password to change." }
            }
            MyRegistrations {}
        }
    }
}

#[component]
fn ProfileForm(user: UserInfo) -> Element {
    let api = use_api();
    let mut auth = use_auth();
    let mut full_name = use_signal(|| user.full_name.clone().unwrap_or_default());
    let mut phone = use_signal(|| user.phone.clone().unwrap_or_default());
    let mut student_id = use_signal(|| user.student_id.clone().unwrap_or_default());
    let mut bio = use_signal(|| user.bio.clone().unwrap_or_default());
    let mut avatar_url = use_signal(|| user.avatar_url.clone().unwrap_or_default());
    let mut error = use_signal(|| Option::<String>::None);
    let mut saved = use_signal(|| false);

    let handle_save = move |evt: FormEvent| {
        evt.prevent_default();
        let api = api.clone();
        async move {
            saved.set(false);
            // Empty strings clear a field on the server.
            let update = ProfileUpdate {
                full_name: Some(full_name().trim().to_string()),
                phone: Some(phone().trim().to_string()),
                student_id: Some(student_id().trim().to_string()),
                bio: Some(bio()),
                avatar_url: Some(avatar_url().trim().to_string()),
            };
            if let Err(message) = validate::profile(&update) {
                error.set(Some(message));
                return;
            }
            match api.update_profile(&update).await {
                Ok(user) => {
                    error.set(None);
                    saved.set(true);
                    auth.set(AuthState::signed_in(user));
                }
                Err(e) => error.set(Some(e.to_string())),
            }
        }
    };

    rsx! {
        section {
            h2 { "Details" }
            ErrorBanner { message: error(), on_dismiss: move |_| error.set(None) }
            form {
                class: "form",
                onsubmit: handle_save,
                label {
                    class: "field",
                    span { "Full name" }
                    input { value: "{full_name}", oninput: move |e| full_name.set(e.value()) }
                }
                div {
                    class: "field-row",
                    label {
                        class: "field",
                        span { "Phone" }
                        input { r#type: "tel", value: "{phone}", oninput: move |e| phone.set(e.value()) }
                    }
                    label {
                        class: "field",
                        span { "Student ID" }
                        input { value: "{student_id}", oninput: move |e| student_id.set(e.value()) }
                    }
                }
                label {
                    class: "field",
                    span { "Avatar URL" }
                    input { r#type: "url", value: "{avatar_url}", oninput: move |e| avatar_url.set(e.value()) }
                }
                label {
                    class: "field",
                    span { "About you" }
                    textarea { rows: 4, value: "{bio}", oninput: move |e| bio.set(e.value()) }
                }
                div {
                    class: "form-actions",
                    if saved() {
                        span { class: "muted", "Saved" }
                    }
                    button { r#type: "submit", class: "btn btn-primary", "Save profile" }
                }
            }
        }
    }
}

#[component]
fn PasswordForm() -> Element {
    let api = use_api();
    let mut current = use_signal(String::new);
    let mut new_password = use_signal(String::new);
    let mut confirm = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut changed = use_signal(|| false);

    let handle_change = move |evt: FormEvent| {
        evt.prevent_default();
        let api = api.clone();
        async move {
            changed.set(false);
            if let Err(message) = validate::password(&new_password()) {
                error.set(Some(message));
                return;
            }
            if new_password() != confirm() {
                error.set(Some("Passwords do not match".to_string()));
                return;
            }
            let change = PasswordChange {
                current_password: current(),
                new_password: new_password(),
            };
            match api.change_password(&change).await {
                Ok(()) => {
                    error.set(None);
                    changed.set(true);
                    current.set(String::new());
                    new_password.set(String::new());
                    confirm.set(String::new());
                }
                Err(e) => error.set(Some(e.to_string())),
            }
        }
    };

    rsx! {
        section {
            h2 { "Password" }
            ErrorBanner { message: error(), on_dismiss: move |_| error.set(None) }
            form {
                class: "form",
                onsubmit: handle_change,
                label {
                    class: "field",
                    span { "Current password" }
                    input {
                        r#type: "password",
                        autocomplete: "current-password",
                        value: "{current}",
                        oninput: move |e| current.set(e.value()),
                    }
                }
                div {
                    class: "field-row",
                    label {
                        class: "field",
                        span { "New password" }
                        input {
                            r#type: "password",
                            autocomplete: "new-password",
                            value: "{new_password}",
                            oninput: move |e| new_password.set(e.value()),
                        }
                    }
                    label {
                        class: "field",
                        span { "Confirm" }
                        input {
                            r#type: "password",
                            autocomplete: "new-password",
                            value: "{confirm}",
                            oninput: move |e| confirm.set(e.value()),
                        }
                    }
                }
                div {
                    class: "form-actions",
                    if changed() {
                        span { class: "muted", "Password changed" }
                    }
                    button { r#type: "submit", class: "btn", "Change password" }
                }
            }
        }
    }
}

#[component]
fn MyRegistrations() -> Element {
    let api = use_api();
    let registrations = use_resource(move || {
        let api = api.clone();
        async move { api.my_registrations().await.map_err(|e| e.to_string()) }
    });

    let list = match registrations.cloned() {
        None => rsx! { Loading {} },
        Some(Err(e)) => rsx! { p { class: "muted", "Could not load registrations: {e}" } },
        Some(Ok(list)) if list.is_empty() => rsx! {
            p {
                class: "muted",
                "You have not signed up for anything yet. "
                Link { to: Route::Events {}, "Find an event" }
            }
        },
        Some(Ok(list)) => rsx! {
            table {
                class: "table",
                thead {
                    tr {
                        th { "Event" }
                        th { "When" }
                        th { "Status" }
                    }
                }
                tbody {
                    for reg in list {
                        tr {
                            key: "{reg.event.id}",
                            class: if reg.status == RegistrationStatus::Cancelled { "row-muted" } else { "" },
                            td {
                                Link { to: Route::EventDetail { id: reg.event.id }, "{reg.event.title}" }
                            }
                            td { "{format::short_datetime(&reg.event.start_time)}" }
                            td { "{format::label(reg.status.as_str())}" }
                        }
                    }
                }
            }
        },
    };

    rsx! {
        section {
            h2 { "Your registrations" }
            {list}
        }
    }
}
