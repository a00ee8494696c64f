// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-in, sign-up and sign-out routes.

use axum::{extract::State, response::Redirect, routing::post, Extension, Form, Router};
use serde::Deserialize;
use std::sync::Arc;

use super::{flash_failure, redirect_home};
use crate::error::Result;
use crate::services::SignUpForm;
use crate::session::{FlashLevel, Page, Session};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/sign-in", post(sign_in))
        .route("/auth/sign-up", post(sign_up))
        .route("/auth/sign-out", post(sign_out))
}

/// Sign-in form. `login` is an email, or a username for the file backend.
#[derive(Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    login: String,
    #[serde(default)]
    password: String,
}

async fn sign_in(
    State(state): State<Arc<AppState>>,
    Extension(mut session): Extension<Session>,
    Form(form): Form<SignInForm>,
) -> Result<Redirect> {
    match state
        .accounts
        .authenticate(&mut session, &form.login, &form.password)
        .await
    {
        Ok(message) => {
            session.navigate(Page::Planner);
            session.flash(FlashLevel::Success, message);
        }
        Err(e) => flash_failure(&mut session, e)?,
    }

    Ok(redirect_home(&state, session))
}

async fn sign_up(
    State(state): State<Arc<AppState>>,
    Extension(mut session): Extension<Session>,
    Form(form): Form<SignUpForm>,
) -> Result<Redirect> {
    match state.accounts.register(&form).await {
        Ok(message) => {
            tracing::info!(backend = state.accounts.backend().kind(), "Account registered");
            session.flash(FlashLevel::Success, message);
            if let Some(notice) = state.accounts.backend().sign_up_notice() {
                session.flash(FlashLevel::Info, notice);
            }
        }
        Err(e) => flash_failure(&mut session, e)?,
    }

    Ok(redirect_home(&state, session))
}

async fn sign_out(
    State(state): State<Arc<AppState>>,
    Extension(mut session): Extension<Session>,
) -> Redirect {
    state.accounts.sign_out(&mut session).await;
    session.flash(FlashLevel::Info, "You have been signed out.");
    redirect_home(&state, session)
}
