use dioxus::prelude::*;
use uuid::Uuid;

use ui::AuthProvider;
use views::admin::{AdminDashboard, AdminEvents, AdminLayout, AdminNotifications, AdminPlants, AdminUsers};
use views::{
    AppLayout, EventDetail, Events, Home, Login, NotFound, Notifications, PlantDetail, Plants,
    Profile, Signup,
};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(AppLayout)]
        #[route("/")]
        Home {},
        #[route("/plants")]
        Plants {},
        #[route("/plants/:id")]
        PlantDetail { id: Uuid },
        #[route("/events")]
        Events {},
        #[route("/events/:id")]
        EventDetail { id: Uuid },
        #[route("/login?:error")]
        Login { error: String },
        #[route("/signup")]
        Signup {},
        #[route("/notifications")]
        Notifications {},
        #[route("/profile")]
        Profile {},
        #[nest("/admin")]
            #[layout(AdminLayout)]
                #[route("/")]
                AdminDashboard {},
                #[route("/plants")]
                AdminPlants {},
                #[route("/events")]
                AdminEvents {},
                #[route("/users")]
                AdminUsers {},
                #[route("/notifications")]
                AdminNotifications {},
            #[end_layout]
        #[end_nest]
        #[route("/:..segments")]
        NotFound { segments: Vec<String> },
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    #[cfg(feature = "server")]
    {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                eprintln!("Failed to start the async runtime: {e}");
                std::process::exit(1);
            }
        };
        if let Err(e) = runtime.block_on(launch_server()) {
            tracing::error!("Server stopped: {:#}", e);
            std::process::exit(1);
        }
    }

    #[cfg(not(feature = "server"))]
    {
        dioxus::launch(App);
    }
}

#[cfg(feature = "server")]
async fn launch_server() -> anyhow::Result<()> {
    use anyhow::Context as _;
    use dioxus::server::{DioxusRouterExt, ServeConfig};
    use std::time::Duration;
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let settings = api::Settings::load().context("Failed to load settings")?;

    let pool = api::db::connect(&settings)
        .await
        .context("Failed to connect to database")?;
    api::db::migrate(&pool)
        .await
        .context("Failed to run migrations")?;

    let dispatch_every = Duration::from_secs(settings.notifications.dispatch_interval_secs.max(1));
    let state = api::AppState::new(pool.clone(), settings).map_err(anyhow::Error::msg)?;
    api::dispatch::spawn_dispatcher(pool, dispatch_every);

    // API routes first, then the Dioxus application for everything else
    let router = api::router(state).serve_dioxus_application(ServeConfig::new(), App);

    // Use the address from dx serve or default to localhost:8080
    let addr = dioxus::cli_config::fullstack_address_or_localhost();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router.into_make_service())
        .await
        .context("Server error")
}

#[component]
fn App() -> Element {
    rsx! {
        // Global app resources
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        document::Title { "YTT" }

        AuthProvider {
            Router::<Route> {}
        }
    }
}
