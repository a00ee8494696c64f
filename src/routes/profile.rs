// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile preferences route.

use axum::{extract::State, response::Redirect, routing::post, Extension, Form, Router};
use std::sync::Arc;

use super::{flash_failure, redirect_home};
use crate::error::Result;
use crate::models::ProfileUpdate;
use crate::session::{FlashLevel, Session};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/profile", post(save_profile))
}

async fn save_profile(
    State(state): State<Arc<AppState>>,
    Extension(mut session): Extension<Session>,
    Form(update): Form<ProfileUpdate>,
) -> Result<Redirect> {
    match state.accounts.update_profile(&mut session, &update).await {
        Ok(()) => session.flash(FlashLevel::Success, "✅ Profile updated successfully!"),
        Err(e) => flash_failure(&mut session, e)?,
    }

    Ok(redirect_home(&state, session))
}
