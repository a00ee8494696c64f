// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account operations on top of the storage backend.
//!
//! Every operation takes the caller's [`Session`] explicitly and keeps its
//! cached profile and plan list in step with the backend.

use serde::Deserialize;
use std::sync::Arc;
use validator::{Validate, ValidationErrors};

use crate::db::{Backend, Principal, Registration, SignUpOutcome, PLAN_HISTORY_LIMIT};
use crate::error::AppError;
use crate::models::profile::display_name;
use crate::models::{NewPlan, Plan, PlanType, Profile, ProfileUpdate};
use crate::session::Session;
use crate::time_utils::now_rfc3339;

/// Sign-up form submission.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignUpForm {
    #[validate(length(min = 1, message = "All fields are required"))]
    pub username: String,
    #[validate(
        length(min = 1, message = "All fields are required"),
        email(message = "Please enter a valid email address")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "All fields are required"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

impl SignUpForm {
    fn trimmed(&self) -> Self {
        Self {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            confirm_password: self.confirm_password.clone(),
        }
    }
}

/// First validation message, checking fields in form order.
fn first_message(errors: &ValidationErrors) -> String {
    let fields = errors.field_errors();
    ["username", "email", "password", "confirm_password"]
        .iter()
        .filter_map(|name| fields.get(*name))
        .flat_map(|errs| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Please check the form and try again".to_string())
}

/// Registration, sign-in and plan bookkeeping.
#[derive(Clone)]
pub struct AccountService {
    backend: Arc<dyn Backend>,
}

impl AccountService {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    /// Register a new account. Returns the message to show on success.
    pub async fn register(&self, form: &SignUpForm) -> Result<String, AppError> {
        let form = form.trimmed();
        form.validate()
            .map_err(|errors| AppError::Validation(first_message(&errors)))?;

        let registration = Registration {
            username: form.username,
            email: form.email,
            password: form.password,
        };

        match self.backend.sign_up(&registration).await? {
            SignUpOutcome::Created => Ok("Account created. Please sign in to continue.".to_string()),
            SignUpOutcome::Pending => {
                Ok("Sign-up initiated. Please sign in to continue.".to_string())
            }
        }
    }

    /// Sign in and load the profile and recent plans into the session.
    pub async fn authenticate(
        &self,
        session: &mut Session,
        login: &str,
        password: &str,
    ) -> Result<String, AppError> {
        let login = login.trim();
        if login.is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let principal = self.backend.sign_in(login, password).await?;
        let profile = self.ensure_profile(&principal).await?;
        let plans = self
            .backend
            .list_plans(&principal, PLAN_HISTORY_LIMIT)
            .await?;

        tracing::info!(
            user_id = %principal.user_id,
            backend = self.backend.kind(),
            plans = plans.len(),
            "User signed in"
        );

        session.authenticated = true;
        session.username = Some(display_name(&profile, login));
        session.profile = Some(profile);
        session.plans = plans;
        session.principal = Some(principal);

        Ok("Successfully logged in!".to_string())
    }

    /// Fetch the profile, creating a default one on first sign-in.
    async fn ensure_profile(&self, principal: &Principal) -> Result<Profile, AppError> {
        if let Some(profile) = self.backend.get_profile(principal).await? {
            return Ok(profile);
        }

        let profile = Profile::new(
            principal.user_id.clone(),
            principal.username.clone(),
            principal.email.clone(),
            now_rfc3339(),
        );
        self.backend.upsert_profile(principal, &profile).await?;
        tracing::info!(user_id = %principal.user_id, "Created default profile");
        Ok(profile)
    }

    /// Sign out and reset the session. Provider errors are logged and ignored.
    pub async fn sign_out(&self, session: &mut Session) {
        if let Some(principal) = session.principal.as_ref() {
            if let Err(e) = self.backend.sign_out(principal).await {
                tracing::warn!(error = %e, "Provider sign-out failed, clearing session anyway");
            }
            tracing::info!(user_id = %principal.user_id, "User signed out");
        }
        session.reset();
    }

    /// Merge profile-form fields into the stored profile and the session cache.
    pub async fn update_profile(
        &self,
        session: &mut Session,
        update: &ProfileUpdate,
    ) -> Result<(), AppError> {
        let principal = require_principal(session)?;
        let mut profile = session.profile.clone().unwrap_or_else(|| {
            Profile::new(
                principal.user_id.clone(),
                principal.username.clone(),
                principal.email.clone(),
                now_rfc3339(),
            )
        });
        profile.apply(update);

        self.backend.upsert_profile(principal, &profile).await?;
        session.profile = Some(profile);
        Ok(())
    }

    /// Store a freshly generated plan and refresh the cached list.
    pub async fn record_plan(
        &self,
        session: &mut Session,
        plan_type: PlanType,
        content: &str,
        goal: &str,
    ) -> Result<(), AppError> {
        let principal = require_principal(session)?;
        let plan = NewPlan {
            user_id: principal.user_id.clone(),
            plan_type,
            content: content.to_string(),
            goal: goal.to_string(),
            created_at: now_rfc3339(),
        };

        self.backend.insert_plan(principal, &plan).await?;
        tracing::debug!(user_id = %principal.user_id, plan_type = %plan_type, "Plan recorded");
        self.refresh_plans(session).await
    }

    /// Delete one of the user's plans and refresh the cached list.
    pub async fn delete_plan(&self, session: &mut Session, plan_id: &str) -> Result<(), AppError> {
        let principal = require_principal(session)?;
        self.backend.delete_plan(principal, plan_id).await?;
        tracing::debug!(user_id = %principal.user_id, plan_id, "Plan deleted");
        self.refresh_plans(session).await
    }

    /// Delete all of the user's plans.
    pub async fn clear_all_plans(&self, session: &mut Session) -> Result<(), AppError> {
        let principal = require_principal(session)?;
        self.backend.delete_all_plans(principal).await?;
        tracing::info!(user_id = %principal.user_id, "Plan history cleared");
        session.plans.clear();
        Ok(())
    }

    async fn refresh_plans(&self, session: &mut Session) -> Result<(), AppError> {
        let principal = require_principal(session)?;
        let plans: Vec<Plan> = self
            .backend
            .list_plans(principal, PLAN_HISTORY_LIMIT)
            .await?;
        session.plans = plans;
        Ok(())
    }
}

fn require_principal(session: &Session) -> Result<&Principal, AppError> {
    if !session.authenticated {
        return Err(AppError::Unauthorized);
    }
    session.principal.as_ref().ok_or(AppError::Unauthorized)
}
