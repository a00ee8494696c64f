// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Supabase backend: GoTrue for identity, PostgREST for the
//! `profiles` and `plans` tables.
//!
//! Table requests carry the anon key as `apikey` and the signed-in user's
//! access token as the bearer, so row-level security policies on the
//! project decide what each user may read or write.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use crate::db::{tables, Backend, Principal, Registration, SignUpOutcome};
use crate::error::AppError;
use crate::models::{NewPlan, Plan, Profile};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Supabase client.
#[derive(Clone)]
pub struct SupabaseDb {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

/// User object returned by GoTrue.
#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: serde_json::Value,
    /// Empty when the email is already registered and confirmations are on.
    #[serde(default)]
    identities: Option<Vec<serde_json::Value>>,
}

impl AuthUser {
    fn username(&self) -> Option<String> {
        self.user_metadata
            .get("username")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

/// Password-grant token response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: AuthUser,
}

impl SupabaseDb {
    /// Create a new Supabase client for a project URL and anon key.
    pub fn new(base_url: String, anon_key: String) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client init failed: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
        })
    }

    fn auth_request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}/auth/v1/{}", self.base_url, path))
            .header("apikey", &self.anon_key)
    }

    /// Table request authorized as the signed-in user.
    fn table_request(&self, method: Method, table: &str, principal: &Principal) -> RequestBuilder {
        let bearer = principal
            .access_token
            .as_deref()
            .unwrap_or(&self.anon_key);

        self.http
            .request(method, format!("{}/rest/v1/{}", self.base_url, table))
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, AppError> {
        request
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("Supabase request failed: {}", e)))
    }

    /// Check response status and return error if not successful.
    async fn check_response(&self, response: reqwest::Response) -> Result<(), AppError> {
        if response.status().is_success() {
            return Ok(());
        }
        Err(error_from(response).await)
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Backend(format!("Unexpected Supabase response: {}", e)))
    }
}

async fn error_from(response: reqwest::Response) -> AppError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    AppError::Backend(format!(
        "Supabase error (HTTP {}): {}",
        status.as_u16(),
        provider_message(&body)
    ))
}

/// Pull the human-readable part out of a GoTrue/PostgREST error body.
fn provider_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            ["msg", "error_description", "message", "error"]
                .iter()
                .find_map(|key| v.get(*key).and_then(|m| m.as_str()))
        })
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl Backend for SupabaseDb {
    fn kind(&self) -> &'static str {
        "supabase"
    }

    fn login_label(&self) -> &'static str {
        "Email Address"
    }

    fn sign_up_notice(&self) -> Option<&'static str> {
        Some("If email confirmation is enabled, check your inbox to confirm before signing in.")
    }

    // ─── Identity ────────────────────────────────────────────────

    async fn sign_up(&self, registration: &Registration) -> Result<SignUpOutcome, AppError> {
        let body = serde_json::json!({
            "email": registration.email,
            "password": registration.password,
            "data": { "username": registration.username },
        });

        let response = self
            .auth_request(Method::POST, "signup")
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("Sign-up failed: {}", e)))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            let message = provider_message(&text);
            return Err(if status.is_client_error() {
                AppError::Auth(format!("Sign-up failed: {}", message))
            } else {
                AppError::Backend(format!("Sign-up failed: {}", message))
            });
        }

        // Autoconfirm projects wrap the user next to a session; others return it bare.
        let value: serde_json::Value = serde_json::from_str(&text).unwrap_or_default();
        let user_value = value.get("user").cloned().unwrap_or(value);
        let user: Option<AuthUser> = serde_json::from_value(user_value).ok();

        match user {
            Some(user) if user.identities.as_ref().is_some_and(|ids| ids.is_empty()) => Err(
                AppError::Auth("Sign-up failed: User already registered".to_string()),
            ),
            Some(user) => {
                tracing::info!(user_id = %user.id, "Supabase sign-up accepted");
                Ok(SignUpOutcome::Created)
            }
            None => Ok(SignUpOutcome::Pending),
        }
    }

    async fn sign_in(&self, login: &str, password: &str) -> Result<Principal, AppError> {
        let response = self
            .auth_request(Method::POST, "token")
            .query(&[("grant_type", "password")])
            .json(&serde_json::json!({ "email": login, "password": password }))
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("Login failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Auth(format!(
                "Login failed: {}",
                provider_message(&body)
            )));
        }

        let token: TokenResponse = self.check_response_json(response).await?;
        let username = token.user.username();

        Ok(Principal {
            user_id: token.user.id,
            email: token.user.email.or_else(|| Some(login.to_string())),
            username,
            access_token: Some(token.access_token),
        })
    }

    async fn sign_out(&self, principal: &Principal) -> Result<(), AppError> {
        let Some(token) = principal.access_token.as_deref() else {
            return Ok(());
        };

        let response = self
            .send(self.auth_request(Method::POST, "logout").bearer_auth(token))
            .await?;
        self.check_response(response).await
    }

    // ─── Profiles ────────────────────────────────────────────────

    async fn get_profile(&self, principal: &Principal) -> Result<Option<Profile>, AppError> {
        let request = self
            .table_request(Method::GET, tables::PROFILES, principal)
            .query(&[
                ("id", format!("eq.{}", principal.user_id)),
                ("select", "*".to_string()),
            ]);

        let rows: Vec<Profile> = self.check_response_json(self.send(request).await?).await?;
        Ok(rows.into_iter().next())
    }

    async fn upsert_profile(
        &self,
        principal: &Principal,
        profile: &Profile,
    ) -> Result<(), AppError> {
        let request = self
            .table_request(Method::POST, tables::PROFILES, principal)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(profile);

        self.check_response(self.send(request).await?).await
    }

    // ─── Plans ───────────────────────────────────────────────────

    async fn list_plans(
        &self,
        principal: &Principal,
        limit: usize,
    ) -> Result<Vec<Plan>, AppError> {
        let request = self
            .table_request(Method::GET, tables::PLANS, principal)
            .query(&[
                ("user_id", format!("eq.{}", principal.user_id)),
                ("select", "*".to_string()),
                ("order", "created_at.desc".to_string()),
                ("limit", limit.to_string()),
            ]);

        self.check_response_json(self.send(request).await?).await
    }

    async fn insert_plan(&self, principal: &Principal, plan: &NewPlan) -> Result<(), AppError> {
        let request = self
            .table_request(Method::POST, tables::PLANS, principal)
            .header("Prefer", "return=minimal")
            .json(plan);

        self.check_response(self.send(request).await?).await
    }

    async fn delete_plan(&self, principal: &Principal, plan_id: &str) -> Result<(), AppError> {
        let request = self
            .table_request(Method::DELETE, tables::PLANS, principal)
            .query(&[
                ("id", format!("eq.{}", plan_id)),
                ("user_id", format!("eq.{}", principal.user_id)),
            ]);

        self.check_response(self.send(request).await?).await
    }

    async fn delete_all_plans(&self, principal: &Principal) -> Result<(), AppError> {
        let request = self
            .table_request(Method::DELETE, tables::PLANS, principal)
            .query(&[("user_id", format!("eq.{}", principal.user_id))]);

        self.check_response(self.send(request).await?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_message_variants() {
        assert_eq!(
            provider_message(r#"{"code":400,"error_code":"invalid_credentials","msg":"Invalid login credentials"}"#),
            "Invalid login credentials"
        );
        assert_eq!(
            provider_message(r#"{"error":"invalid_grant","error_description":"Email not confirmed"}"#),
            "Email not confirmed"
        );
        assert_eq!(
            provider_message(r#"{"message":"permission denied for table plans"}"#),
            "permission denied for table plans"
        );
        assert_eq!(provider_message("Bad Gateway\n"), "Bad Gateway");
    }

    #[test]
    fn test_auth_user_username_from_metadata() {
        let user: AuthUser = serde_json::from_str(
            r#"{"id":"u1","email":"alex@x.com","user_metadata":{"username":"alex"}}"#,
        )
        .unwrap();
        assert_eq!(user.username().as_deref(), Some("alex"));

        let bare: AuthUser = serde_json::from_str(r#"{"id":"u2"}"#).unwrap();
        assert_eq!(bare.username(), None);
    }
}
