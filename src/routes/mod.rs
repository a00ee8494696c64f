// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.
//!
//! `GET /` renders whichever page the session is on. Every action is a form
//! POST that updates the session and answers with a 303 back to `/`.

pub mod auth;
pub mod history;
pub mod planner;
pub mod profile;

use crate::error::{AppError, Result};
use crate::middleware::load_session;
use crate::models::PlanFilter;
use crate::pages;
use crate::session::{FlashLevel, Page, Session};
use crate::AppState;
use axum::{
    extract::{Query, State},
    middleware,
    response::{Html, Redirect},
    routing::{get, post},
    Extension, Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub storage: String,
    pub build_id: String,
}

/// Health check response
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        storage: state.accounts.backend().kind().to_string(),
        build_id,
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct IndexParams {
    #[serde(default)]
    pub filter: PlanFilter,
}

/// One render cycle: resolve the page, drain flashes, render.
async fn index(
    State(state): State<Arc<AppState>>,
    Extension(mut session): Extension<Session>,
    Query(params): Query<IndexParams>,
) -> Html<String> {
    let page = session.resolve_page();
    let flashes = session.take_flashes();

    let html = match page {
        Page::Landing => pages::landing::render(&session, &flashes),
        Page::Auth => {
            pages::auth::render(&session, &flashes, state.accounts.backend().login_label())
        }
        Page::Planner => pages::planner::render(&session, &flashes),
        Page::History => pages::history::render(&session, &flashes, params.filter),
        Page::Profile => pages::profile::render(&session, &flashes),
    };

    state.sessions.save(session);
    Html(html)
}

#[derive(Debug, Deserialize)]
pub struct NavigateForm {
    pub page: Page,
}

async fn navigate(
    State(state): State<Arc<AppState>>,
    Extension(mut session): Extension<Session>,
    Form(form): Form<NavigateForm>,
) -> Redirect {
    if !session.navigate(form.page) {
        tracing::debug!(page = %form.page, "Refused navigation without sign-in");
        session.flash(FlashLevel::Info, "Please sign in to continue.");
    }
    redirect_home(&state, session)
}

/// Save the session and send the browser back to the render cycle.
pub(crate) fn redirect_home(state: &AppState, session: Session) -> Redirect {
    redirect_to(state, session, "/")
}

pub(crate) fn redirect_to(state: &AppState, session: Session, location: &str) -> Redirect {
    state.sessions.save(session);
    Redirect::to(location)
}

/// Show a user-facing failure as a flash message. Anything else propagates.
pub(crate) fn flash_failure(session: &mut Session, err: AppError) -> Result<()> {
    match err {
        AppError::Unauthorized => {
            session.navigate(Page::Landing);
            session.flash(FlashLevel::Info, "Please sign in to continue.");
            Ok(())
        }
        AppError::Backend(ref message) => {
            tracing::error!(error = %message, "Backend error");
            session.flash(FlashLevel::Error, err.to_string());
            Ok(())
        }
        err if err.is_user_facing() => {
            tracing::info!(error = %err, "Request rejected");
            session.flash(FlashLevel::Error, err.to_string());
            Ok(())
        }
        err => Err(err),
    }
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // Everything except the health check runs inside a session
    let app_routes = Router::new()
        .route("/", get(index))
        .route("/navigate", post(navigate))
        .merge(auth::routes())
        .merge(planner::routes())
        .merge(history::routes())
        .merge(profile::routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), load_session));

    Router::new()
        .route("/health", get(health_check))
        .merge(app_routes)
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
