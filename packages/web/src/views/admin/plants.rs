use api::{Plant, PlantFilter, PlantInput};
use dioxus::prelude::*;
use ui::format;
use ui::{use_api, ErrorBanner, PlantForm};
use uuid::Uuid;

use crate::views::Loading;

/// What the editor pane is showing.
#[derive(Debug, Clone, PartialEq)]
enum Editing {
    Closed,
    New,
    Existing(Plant),
}

#[component]
pub fn AdminPlants() -> Element {
    let api = use_api();
    let mut editing = use_signal(|| Editing::Closed);
    let mut submitting = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);

    let mut plants = use_resource({
        let api = api.clone();
        move || {
            let api = api.clone();
            async move {
                api.plants(&PlantFilter::default())
                    .await
                    .map_err(|e| e.to_string())
            }
        }
    });

    let save = {
        let api = api.clone();
        move |input: PlantInput| {
            let api = api.clone();
            let target = editing();
            spawn(async move {
                submitting.set(true);
                let result = match target {
                    Editing::Existing(plant) => api.update_plant(plant.id, &input).await,
                    _ => api.create_plant(&input).await,
                };
                match result {
                    Ok(plant) => {
                        tracing::info!("Saved plant {}", plant.id);
                        editing.set(Editing::Closed);
                        error.set(None);
                        plants.restart();
                    }
                    Err(e) => error.set(Some(e.to_string())),
                }
                submitting.set(false);
            });
        }
    };

    let delete = {
        let api = api.clone();
        move |id: Uuid| {
            let api = api.clone();
            spawn(async move {
                match api.delete_plant(id).await {
                    Ok(()) => plants.restart(),
                    Err(e) => error.set(Some(e.to_string())),
                }
            });
        }
    };

    let editor = match editing() {
        Editing::Closed => rsx! {},
        Editing::New => rsx! {
            h2 { "New plant" }
            PlantForm {
                initial: PlantInput::default(),
                on_submit: save.clone(),
                on_cancel: move |_| editing.set(Editing::Closed),
                submitting: submitting(),
            }
        },
        Editing::Existing(plant) => rsx! {
            h2 { "Edit {plant.common_name}" }
            PlantForm {
                key: "{plant.id}",
                initial: plant.to_input(),
                on_submit: save.clone(),
                on_cancel: move |_| editing.set(Editing::Closed),
                submitting: submitting(),
            }
        },
    };

    let table = match plants.cloned() {
        None => rsx! { Loading {} },
        Some(Err(e)) => rsx! { p { class: "muted", "Could not load plants: {e}" } },
        Some(Ok(list)) => rsx! {
            table {
                class: "table",
                thead {
                    tr {
                        th { "Name" }
                        th { "Care" }
                        th { "Edible" }
                        th {}
                    }
                }
                tbody {
                    for plant in list {
                        tr {
                            key: "{plant.id}",
                            td { "{plant.common_name}" }
                            td { "{format::label(plant.care_level.as_str())}" }
                            td { if plant.is_edible { "Yes" } else { "No" } }
                            td {
                                class: "row-actions",
                                button {
                                    class: "btn btn-link",
                                    onclick: {
                                        let plant = plant.clone();
                                        move |_| editing.set(Editing::Existing(plant.clone()))
                                    },
                                    "Edit"
                                }
                                button {
                                    class: "btn btn-link btn-danger",
                                    onclick: {
                                        let delete = delete.clone();
                                        let id = plant.id;
                                        move |_| delete(id)
                                    },
                                    "Delete"
                                }
                            }
                        }
                    }
                }
            }
        },
    };

    rsx! {
        div {
            class: "page-header",
            h1 { "Plants" }
            button {
                class: "btn btn-primary",
                onclick: move |_| editing.set(Editing::New),
                "Add plant"
            }
        }
        ErrorBanner { message: error(), on_dismiss: move |_| error.set(None) }
        {editor}
        {table}
    }
}
