// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Storage and identity layer.
//!
//! [`Backend`] is the single interface the rest of the app talks to. Exactly
//! one implementation is chosen at startup from [`crate::config::StorageConfig`].

pub mod file;
pub mod supabase;

pub use file::JsonFileDb;
pub use supabase::SupabaseDb;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::StorageConfig;
use crate::error::AppError;
use crate::models::{NewPlan, Plan, Profile};

/// Number of plans cached in the session after every refresh.
pub const PLAN_HISTORY_LIMIT: usize = 20;

/// Table names as constants.
pub mod tables {
    pub const PROFILES: &str = "profiles";
    pub const PLANS: &str = "plans";
}

/// Identity of a signed-in user as issued by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: String,
    pub email: Option<String>,
    /// Username known to the identity provider, if any
    pub username: Option<String>,
    /// Bearer token for row-level-security backends
    pub access_token: Option<String>,
}

/// Validated sign-up request.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// How the provider answered a sign-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// Account exists and can sign in right away.
    Created,
    /// Provider accepted the request but may require confirmation first.
    Pending,
}

/// Identity plus profile/plan storage, one implementation per deployment.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Short name used in logs and the health check.
    fn kind(&self) -> &'static str;

    /// Label for the sign-in field ("Email Address", "Username or Email").
    fn login_label(&self) -> &'static str;

    /// Extra notice shown after a successful sign-up.
    fn sign_up_notice(&self) -> Option<&'static str> {
        None
    }

    // ─── Identity ────────────────────────────────────────────────

    async fn sign_up(&self, registration: &Registration) -> Result<SignUpOutcome, AppError>;

    async fn sign_in(&self, login: &str, password: &str) -> Result<Principal, AppError>;

    async fn sign_out(&self, principal: &Principal) -> Result<(), AppError>;

    // ─── Profiles ────────────────────────────────────────────────

    async fn get_profile(&self, principal: &Principal) -> Result<Option<Profile>, AppError>;

    async fn upsert_profile(&self, principal: &Principal, profile: &Profile)
        -> Result<(), AppError>;

    // ─── Plans ───────────────────────────────────────────────────

    /// Newest-first plans of the user, at most `limit`.
    async fn list_plans(&self, principal: &Principal, limit: usize)
        -> Result<Vec<Plan>, AppError>;

    async fn insert_plan(&self, principal: &Principal, plan: &NewPlan) -> Result<(), AppError>;

    /// Delete one plan, only if it belongs to the user.
    async fn delete_plan(&self, principal: &Principal, plan_id: &str) -> Result<(), AppError>;

    async fn delete_all_plans(&self, principal: &Principal) -> Result<(), AppError>;
}

/// Build the backend selected by configuration.
pub fn connect(storage: &StorageConfig) -> Result<Arc<dyn Backend>, AppError> {
    match storage {
        StorageConfig::Supabase { url, anon_key } => {
            tracing::info!(url = %url, "Using Supabase backend");
            Ok(Arc::new(SupabaseDb::new(url.clone(), anon_key.clone())?))
        }
        StorageConfig::File { path } => {
            tracing::info!(path = %path.display(), "Using JSON file backend");
            Ok(Arc::new(JsonFileDb::new(path.clone())))
        }
    }
}
