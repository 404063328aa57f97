//! Recipe manager client demo.
//!
//! Wires the full stack against a running backend: session guard, router,
//! store, and event bus. Configuration comes from the environment:
//!
//! - `RECIPE_API_BASE_URL`: backend base URL (default `http://localhost:8080/api`)
//! - `RECIPE_USERNAME` / `RECIPE_PASSWORD`: credentials used when the guard
//!   redirects to login

use anyhow::Context;
use futures::StreamExt;
use recipe_client_api::{ApiClient, ApiConfig, Credentials};
use recipe_client_app::{
    Navigation, RECIPE_EVENTS_TOPIC, RecipeAction, RecipeEnvironment, RecipeReducer, RecipeState,
    Router, SessionGuard,
};
use recipe_client_core::event_bus::EventBus;
use recipe_client_runtime::{BroadcastEventBus, Store};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let base_url =
        std::env::var("RECIPE_API_BASE_URL").unwrap_or_else(|_| ApiConfig::default().base_url);
    tracing::info!(%base_url, "Starting recipe client");

    let api = Arc::new(
        ApiClient::new(ApiConfig::new(base_url)).context("building the backend client")?,
    );
    let bus = Arc::new(BroadcastEventBus::new(64));

    // Log every recipe notification as it is published
    let mut notifications = bus
        .subscribe(&[RECIPE_EVENTS_TOPIC])
        .await
        .context("subscribing to recipe notifications")?;
    tokio::spawn(async move {
        while let Some(item) = notifications.next().await {
            match item {
                Ok(n) => tracing::info!(topic = %n.topic, payload = %n.payload, "Notification"),
                Err(e) => tracing::warn!(error = %e, "Notification stream error"),
            }
        }
    });

    let store = Store::new(
        RecipeState::default(),
        RecipeReducer,
        RecipeEnvironment::new(
            Arc::clone(&api),
            Arc::clone(&bus) as Arc<dyn EventBus>,
        ),
    );

    let router = Router::with_default_routes(Arc::new(SessionGuard::new(Arc::clone(&api))));

    // Navigate to the home screen, logging in if the guard bounces us
    let mut target = "/".to_owned();
    for _ in 0..4 {
        match router.navigate(&target).await {
            Navigation::Proceed { path } if path == "/home" => break,
            Navigation::Proceed { path } => {
                tracing::info!(%path, "At login screen, opening a session");
                let credentials = Credentials::new(
                    std::env::var("RECIPE_USERNAME").unwrap_or_else(|_| "demo".to_owned()),
                    std::env::var("RECIPE_PASSWORD").unwrap_or_default(),
                );
                api.login(&credentials).await.context("logging in")?;
                target = "/home".to_owned();
            }
            Navigation::Redirect { from, to } => {
                tracing::info!(%from, %to, "Redirected");
                target = to;
            }
            Navigation::NotFound { path } => {
                anyhow::bail!("no route matches {path}");
            }
        }
    }

    // Load the collection and report what the backend served
    let outcome = store
        .send_and_wait_for(
            RecipeAction::FetchRecipes,
            |a| {
                matches!(
                    a,
                    RecipeAction::RecipesFetched(_) | RecipeAction::SyncFailed { .. }
                )
            },
            Duration::from_secs(10),
        )
        .await
        .context("fetching recipes")?;

    match outcome {
        RecipeAction::RecipesFetched(_) => {
            let count = store.state(|s| s.recipes.len()).await;
            tracing::info!(count, "Recipe cache loaded");
        }
        RecipeAction::SyncFailed { operation, reason } => {
            tracing::error!(%operation, %reason, "Initial fetch failed");
        }
        _ => {}
    }

    store
        .shutdown(Duration::from_secs(5))
        .await
        .context("shutting down the store")?;
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recipe_client_app=info,recipe_client_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
