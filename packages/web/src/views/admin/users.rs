use api::Role;
use dioxus::prelude::*;
use ui::format;
use ui::{use_api, use_auth, ErrorBanner};
use uuid::Uuid;

use crate::views::Loading;

#[component]
pub fn AdminUsers() -> Element {
    let api = use_api();
    let auth = use_auth();
    let mut search = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);

    let mut users = use_resource({
        let api = api.clone();
        move || {
            let api = api.clone();
            let search = search();
            async move { api.users(Some(&search)).await.map_err(|e| e.to_string()) }
        }
    });

    let set_role = {
        let api = api.clone();
        move |(id, role): (Uuid, Role)| {
            let api = api.clone();
            spawn(async move {
                match api.set_role(id, role).await {
                    Ok(_) => users.restart(),
                    Err(e) => error.set(Some(e.to_string())),
                }
            });
        }
    };

    let delete = {
        let api = api.clone();
        move |id: Uuid| {
            let api = api.clone();
            spawn(async move {
                match api.delete_user(id).await {
                    Ok(()) => users.restart(),
                    Err(e) => error.set(Some(e.to_string())),
                }
            });
        }
    };

    let me = auth().user.map(|u| u.id);

    let table = match users.cloned() {
        None => rsx! { Loading {} },
        Some(Err(e)) => rsx! { p { class: "muted", "Could not load users: {e}" } },
        Some(Ok(list)) if list.is_empty() => rsx! { p { class: "muted", "No users found." } },
        Some(Ok(list)) => rsx! {
            table {
                class: "table",
                thead {
                    tr {
                        th { "Name" }
                        th { "Email" }
                        th { "Sign-in" }
                        th { "Role" }
                        th { "Last login" }
                        th {}
                    }
                }
                tbody {
                    for user in list {
                        tr {
                            key: "{user.id}",
                            td { "{user.display_name()}" }
                            td { "{user.email}" }
                            td { "{format::label(&user.provider)}" }
                            td { "{format::label(user.role.as_str())}" }
                            td {
                                {user.last_login_at.as_ref().map(format::short_datetime).unwrap_or_else(|| "Never".to_string())}
                            }
                            td {
                                class: "row-actions",
                                if Some(user.id) == me {
                                    span { class: "muted", "You" }
                                } else {
                                    button {
                                        class: "btn btn-link",
                                        onclick: {
                                            let set_role = set_role.clone();
                                            let target = (user.id, if user.is_admin() { Role::User } else { Role::Admin });
                                            move |_| set_role(target)
                                        },
                                        if user.is_admin() { "Make member" } else { "Make admin" }
                                    }
                                    button {
                                        class: "btn btn-link btn-danger",
                                        onclick: {
                                            let delete = delete.clone();
                                            let id = user.id;
                                            move |_| delete(id)
                                        },
                                        "Delete"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    };

    rsx! {
        h1 { "Users" }
        div {
            class: "filters",
            input {
                r#type: "search",
                placeholder: "Search by name or email",
                value: "{search}",
                oninput: move |e| search.set(e.value()),
            }
        }
        ErrorBanner { message: error(), on_dismiss: move |_| error.set(None) }
        {table}
    }
}
