// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Meal & Exercise Planner server
//!
//! Serves the planner pages, storing accounts and plan history in Supabase
//! or a local JSON file, and generating plans through the Gemini API.

use meal_planner::{
    config::Config,
    db,
    services::{AccountService, GeminiClient, PlanGenerator},
    session::SessionStore,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How long an idle session (and its cookie) stays valid.
const SESSION_TTL_HOURS: i64 = 24;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        storage = config.storage.kind(),
        model = %config.gemini_model,
        "Starting Meal & Exercise Planner"
    );

    let backend = db::connect(&config.storage)?;
    let accounts = AccountService::new(backend);

    let gemini = GeminiClient::from_config(&config)?;
    let planner = PlanGenerator::new(Arc::new(gemini));

    let sessions = SessionStore::new(chrono::Duration::hours(SESSION_TTL_HOURS));

    let state = Arc::new(AppState {
        config: config.clone(),
        accounts,
        planner,
        sessions,
    });

    let app = meal_planner::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, public_url = %config.public_url, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("meal_planner=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
