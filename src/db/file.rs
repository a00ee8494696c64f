// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local JSON file backend.
//!
//! The whole store is one JSON object mapping username to a user record with
//! an embedded plan history. It is read and rewritten wholesale on every
//! mutation. Reads and writes from this process are serialized, and each
//! write replaces the file atomically through a rename. Other processes
//! writing the same file are not coordinated with.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::db::{Backend, Principal, Registration, SignUpOutcome};
use crate::error::AppError;
use crate::models::{FitnessGoal, FitnessLevel, NewPlan, Plan, Profile};
use crate::time_utils::now_rfc3339;

/// One user's record in the users file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileUser {
    /// bcrypt hash of the password. Empty for records written before hashing,
    /// which cannot be signed into.
    #[serde(default)]
    pub password_hash: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub fitness_goal: FitnessGoal,
    #[serde(default)]
    pub fitness_level: FitnessLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_ingredients: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_equipment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_preferences: Option<String>,
    /// Plans in insertion order (oldest first)
    #[serde(default)]
    pub plan_history: Vec<Plan>,
}

impl FileUser {
    fn profile(&self, username: &str) -> Profile {
        Profile {
            id: username.to_string(),
            username: Some(username.to_string()),
            email: self.email.clone(),
            fitness_goal: self.fitness_goal,
            fitness_level: self.fitness_level,
            default_ingredients: self.default_ingredients.clone(),
            default_equipment: self.default_equipment.clone(),
            dietary_preferences: self.dietary_preferences.clone(),
            created_at: self.created_at.clone(),
        }
    }

    fn apply_profile(&mut self, profile: &Profile) {
        if profile.email.is_some() {
            self.email = profile.email.clone();
        }
        self.fitness_goal = profile.fitness_goal;
        self.fitness_level = profile.fitness_level;
        self.default_ingredients = profile.default_ingredients.clone();
        self.default_equipment = profile.default_equipment.clone();
        self.dietary_preferences = profile.dietary_preferences.clone();
    }
}

type UserTable = BTreeMap<String, FileUser>;

/// JSON file database client.
pub struct JsonFileDb {
    path: PathBuf,
    /// Serializes reads and read-modify-write cycles within this process.
    lock: Mutex<()>,
    bcrypt_cost: u32,
}

impl JsonFileDb {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Lower hashing cost for tests.
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of the table for read-only operations.
    async fn load_table(&self) -> Result<UserTable, AppError> {
        let _guard = self.lock.lock().await;
        self.read_table().await
    }

    async fn read_table(&self) -> Result<UserTable, AppError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(|b| b.is_ascii_whitespace()) => Ok(UserTable::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                AppError::Backend(format!(
                    "Users file {} is corrupt: {}",
                    self.path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(UserTable::new()),
            Err(e) => Err(AppError::Backend(format!(
                "Failed to read users file {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn write_table(&self, table: &UserTable) -> Result<(), AppError> {
        let bytes = serde_json::to_vec_pretty(table)
            .map_err(|e| AppError::Backend(format!("Failed to encode users file: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Backend(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let mut tmp_name = self.path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);

        tokio::fs::write(&tmp_path, bytes).await.map_err(|e| {
            AppError::Backend(format!(
                "Failed to write users file {}: {}",
                tmp_path.display(),
                e
            ))
        })?;
        tokio::fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            AppError::Backend(format!(
                "Failed to replace users file {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Apply `f` to the principal's record and persist the result.
    async fn modify_user<F>(&self, principal: &Principal, f: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut FileUser),
    {
        let _guard = self.lock.lock().await;
        let mut table = self.read_table().await?;
        let user = table
            .get_mut(&principal.user_id)
            .ok_or_else(|| AppError::NotFound(format!("User {}", principal.user_id)))?;
        f(user);
        self.write_table(&table).await
    }
}

fn find_by_login<'a>(table: &'a UserTable, login: &str) -> Option<(&'a String, &'a FileUser)> {
    table.get_key_value(login).or_else(|| {
        table.iter().find(|(_, user)| {
            user.email
                .as_deref()
                .is_some_and(|email| email.eq_ignore_ascii_case(login))
        })
    })
}

#[async_trait]
impl Backend for JsonFileDb {
    fn kind(&self) -> &'static str {
        "file"
    }

    fn login_label(&self) -> &'static str {
        "Username or Email"
    }

    // ─── Identity ────────────────────────────────────────────────

    async fn sign_up(&self, registration: &Registration) -> Result<SignUpOutcome, AppError> {
        let _guard = self.lock.lock().await;
        let mut table = self.read_table().await?;

        if table.contains_key(&registration.username) {
            return Err(AppError::Auth("Username already exists".to_string()));
        }
        if find_by_login(&table, &registration.email).is_some() {
            return Err(AppError::Auth("Email already registered".to_string()));
        }

        let password_hash = bcrypt::hash(&registration.password, self.bcrypt_cost)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?;

        table.insert(
            registration.username.clone(),
            FileUser {
                password_hash,
                email: Some(registration.email.clone()),
                created_at: now_rfc3339(),
                fitness_goal: FitnessGoal::default(),
                fitness_level: FitnessLevel::default(),
                default_ingredients: None,
                default_equipment: None,
                dietary_preferences: None,
                plan_history: Vec::new(),
            },
        );
        self.write_table(&table).await?;

        tracing::info!(username = %registration.username, "User registered");
        Ok(SignUpOutcome::Created)
    }

    async fn sign_in(&self, login: &str, password: &str) -> Result<Principal, AppError> {
        let table = self.load_table().await?;
        let (username, user) = find_by_login(&table, login)
            .ok_or_else(|| AppError::Auth("Username not found".to_string()))?;

        let valid = match bcrypt::verify(password, &user.password_hash) {
            Ok(valid) => valid,
            Err(e) => {
                tracing::warn!(
                    username = %username,
                    error = %e,
                    "Stored password hash is unusable"
                );
                false
            }
        };
        if !valid {
            return Err(AppError::Auth("Incorrect password".to_string()));
        }

        Ok(Principal {
            user_id: username.clone(),
            email: user.email.clone(),
            username: Some(username.clone()),
            access_token: None,
        })
    }

    async fn sign_out(&self, _principal: &Principal) -> Result<(), AppError> {
        Ok(())
    }

    // ─── Profiles ────────────────────────────────────────────────

    async fn get_profile(&self, principal: &Principal) -> Result<Option<Profile>, AppError> {
        let table = self.load_table().await?;
        Ok(table
            .get(&principal.user_id)
            .map(|user| user.profile(&principal.user_id)))
    }

    async fn upsert_profile(
        &self,
        principal: &Principal,
        profile: &Profile,
    ) -> Result<(), AppError> {
        self.modify_user(principal, |user| user.apply_profile(profile))
            .await
    }

    // ─── Plans ───────────────────────────────────────────────────

    async fn list_plans(
        &self,
        principal: &Principal,
        limit: usize,
    ) -> Result<Vec<Plan>, AppError> {
        let table = self.load_table().await?;
        let Some(user) = table.get(&principal.user_id) else {
            return Ok(Vec::new());
        };

        let mut plans: Vec<Plan> = user
            .plan_history
            .iter()
            .cloned()
            .map(|mut plan| {
                plan.user_id = principal.user_id.clone();
                plan
            })
            .collect();
        // Stable sort keeps insertion order for equal timestamps; reverse gives newest first.
        plans.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        plans.reverse();
        plans.truncate(limit);
        Ok(plans)
    }

    async fn insert_plan(&self, principal: &Principal, plan: &NewPlan) -> Result<(), AppError> {
        let stored = plan.clone().into_plan(uuid::Uuid::new_v4().to_string());
        self.modify_user(principal, move |user| user.plan_history.push(stored))
            .await
    }

    async fn delete_plan(&self, principal: &Principal, plan_id: &str) -> Result<(), AppError> {
        self.modify_user(principal, |user| {
            user.plan_history
                .retain(|plan| plan.id.as_deref() != Some(plan_id));
        })
        .await
    }

    async fn delete_all_plans(&self, principal: &Principal) -> Result<(), AppError> {
        self.modify_user(principal, |user| user.plan_history.clear())
            .await
    }
}
