// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plan history routes.

use axum::{extract::State, response::Redirect, routing::post, Extension, Form, Router};
use serde::Deserialize;
use std::sync::Arc;

use super::{flash_failure, redirect_home, redirect_to};
use crate::error::{AppError, Result};
use crate::models::PlanFilter;
use crate::session::{FlashLevel, Session};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/history/delete", post(delete_plan))
        .route("/history/clear", post(clear_history))
}

#[derive(Debug, Deserialize)]
pub struct DeletePlanForm {
    pub plan_id: String,
    /// Filter to return to after the delete
    #[serde(default)]
    pub filter: PlanFilter,
}

async fn delete_plan(
    State(state): State<Arc<AppState>>,
    Extension(mut session): Extension<Session>,
    Form(form): Form<DeletePlanForm>,
) -> Result<Redirect> {
    match state.accounts.delete_plan(&mut session, &form.plan_id).await {
        Ok(()) => session.flash(FlashLevel::Success, "Plan deleted!"),
        Err(e) => flash_failure(&mut session, e)?,
    }

    let location = match form.filter {
        PlanFilter::All => "/".to_string(),
        filter => format!("/?filter={}", filter.as_str()),
    };
    Ok(redirect_to(&state, session, &location))
}

/// First click arms the confirmation, the second one deletes everything.
async fn clear_history(
    State(state): State<Arc<AppState>>,
    Extension(mut session): Extension<Session>,
) -> Result<Redirect> {
    if !session.authenticated {
        flash_failure(&mut session, AppError::Unauthorized)?;
        return Ok(redirect_home(&state, session));
    }

    if !session.confirm_clear {
        session.confirm_clear = true;
        session.flash(
            FlashLevel::Warning,
            "⚠️ Click again to confirm deletion of all history",
        );
        return Ok(redirect_home(&state, session));
    }

    session.confirm_clear = false;
    match state.accounts.clear_all_plans(&mut session).await {
        Ok(()) => session.flash(FlashLevel::Success, "All history cleared!"),
        Err(e) => flash_failure(&mut session, e)?,
    }

    Ok(redirect_home(&state, session))
}
