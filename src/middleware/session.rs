// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session cookie middleware.
//!
//! The browser holds an HS256 JWT whose subject is the session ID. The
//! middleware resolves it to a [`crate::session::Session`] (starting a new one when the
//! cookie is missing, invalid or stale) and inserts that session into the
//! request extensions for the handler.

use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const SESSION_COOKIE: &str = "planner_session";

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (session ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Middleware that attaches the caller's session to the request.
pub async fn load_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let existing = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| verify_session_claims(cookie.value(), &state.config.session_signing_key))
        .and_then(|claims| {
            state
                .sessions
                .load(&claims.sub)
                .map(|session| (session, claims.exp))
        });

    let (session, renew) = match existing {
        Some((session, exp)) => (session, needs_renewal(exp, &state)),
        None => (state.sessions.create(), true),
    };

    let jar = if renew {
        match create_session_token(&session.id, &state) {
            Ok(token) => jar.add(session_cookie(token, &state)),
            Err(e) => {
                tracing::error!(error = %e, "Failed to sign session cookie");
                return crate::error::AppError::Internal(e).into_response();
            }
        }
    } else {
        jar
    };

    request.extensions_mut().insert(session);
    let response = next.run(request).await;
    (jar, response).into_response()
}

fn session_cookie(token: String, state: &AppState) -> Cookie<'static> {
    let max_age = time::Duration::seconds(state.sessions.ttl().num_seconds());
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.secure_cookies())
        .max_age(max_age)
        .build()
}

/// Create the signed cookie value for a session.
pub fn create_session_token(session_id: &str, state: &AppState) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;
    let ttl = state.sessions.ttl().num_seconds().max(0) as usize;

    let claims = Claims {
        sub: session_id.to_string(),
        iat: now,
        exp: now + ttl,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(&state.config.session_signing_key),
    )?)
}

/// Return the session ID of a valid cookie value.
pub fn verify_session_token(token: &str, signing_key: &[u8]) -> Option<String> {
    verify_session_claims(token, signing_key).map(|claims| claims.sub)
}

fn verify_session_claims(token: &str, signing_key: &[u8]) -> Option<Claims> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .ok()
}

/// An active session gets a fresh cookie once half of the current one's lifetime is used up.
fn needs_renewal(exp: usize, state: &AppState) -> bool {
    let now = chrono::Utc::now().timestamp().max(0) as usize;
    let half_ttl = (state.sessions.ttl().num_seconds().max(0) as usize) / 2;
    exp.saturating_sub(now) < half_ttl
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    #[test]
    fn test_verify_round_trip_and_tamper() {
        let key = b"test_session_key_32_bytes_min!!!";
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs() as usize;
        let claims = Claims {
            sub: "session-1".into(),
            iat: now,
            exp: now + 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(key),
        )
        .unwrap();

        assert_eq!(verify_session_token(&token, key).as_deref(), Some("session-1"));
        assert_eq!(verify_session_token(&token, b"another_key"), None);
        assert_eq!(verify_session_token("not.a.jwt", key), None);
    }

    #[test]
    fn test_expired_token_rejected() {
        let key = b"test_session_key_32_bytes_min!!!";
        let claims = Claims {
            sub: "session-1".into(),
            iat: 1_000,
            exp: 2_000,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(key),
        )
        .unwrap();

        assert_eq!(verify_session_token(&token, key), None);
    }
}
