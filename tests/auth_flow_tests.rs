// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-up, sign-in, sign-out and navigation through the HTTP surface.

use axum::http::StatusCode;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use meal_planner::middleware::session::{verify_session_token, Claims, SESSION_COOKIE};

mod common;

#[tokio::test]
async fn test_first_visit_shows_landing_and_sets_cookie() {
    let app = common::create_test_app();
    let mut client = app.client();

    let response = client.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Your AI-Powered Personal Health Assistant"));

    let cookie = response.set_cookie.expect("session cookie");
    assert!(cookie.starts_with(&format!("{SESSION_COOKIE}=")));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));
    assert!(!cookie.contains("Secure"));
    assert_eq!(app.state.sessions.len(), 1);
}

#[tokio::test]
async fn test_session_survives_between_requests() {
    let app = common::create_test_app();
    let mut client = app.client();

    client.get("/").await;
    let page = client.navigate("auth").await;
    assert!(page.contains("Sign In to Your Account"));

    // Same cookie, same session: still on the auth page
    let response = client.get("/").await;
    assert!(response.set_cookie.is_none());
    assert!(response.body.contains("Sign In to Your Account"));
    assert_eq!(app.state.sessions.len(), 1);
}

#[tokio::test]
async fn test_separate_browsers_get_separate_sessions() {
    let app = common::create_test_app();
    let mut client = app.client();
    client.get("/").await;
    client.navigate("auth").await;

    let mut stranger = app.client();
    let response = stranger.get("/").await;
    assert!(response.body.contains("Your AI-Powered Personal Health Assistant"));
    assert_eq!(app.state.sessions.len(), 2);
}

#[tokio::test]
async fn test_tampered_cookie_starts_new_session() {
    let app = common::create_test_app();
    let mut client = app.client();
    client.get("/").await;
    client.navigate("auth").await;

    let tampered = format!("{}x", client.cookie().unwrap());
    client.set_cookie(tampered);

    let response = client.get("/").await;
    assert!(response.set_cookie.is_some());
    assert!(response.body.contains("Your AI-Powered Personal Health Assistant"));
    assert_eq!(app.state.sessions.len(), 2);
}

#[tokio::test]
async fn test_active_session_cookie_is_renewed_before_expiry() {
    let app = common::create_test_app();
    let mut client = app.client();
    client.get("/").await;
    client.navigate("auth").await;

    let key = &app.state.config.session_signing_key;
    let token = client
        .cookie()
        .and_then(|c| c.strip_prefix(&format!("{SESSION_COOKIE}=")))
        .unwrap()
        .to_string();
    let session_id = verify_session_token(&token, key).unwrap();

    // A cookie issued 59 minutes ago with a one hour lifetime
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: session_id.clone(),
        iat: now - 59 * 60,
        exp: now + 60,
    };
    let old = encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(key)).unwrap();
    client.set_cookie(format!("{SESSION_COOKIE}={old}"));

    let response = client.get("/").await;
    assert!(response.body.contains("Sign In to Your Account"));
    let renewed = response.set_cookie.expect("renewed cookie");
    let renewed_token = renewed
        .split(';')
        .next()
        .and_then(|pair| pair.strip_prefix(&format!("{SESSION_COOKIE}=")))
        .unwrap();
    assert_ne!(renewed_token, old);
    assert_eq!(verify_session_token(renewed_token, key).as_deref(), Some(session_id.as_str()));
    assert_eq!(app.state.sessions.len(), 1);
}

#[tokio::test]
async fn test_pages_carry_security_headers() {
    let app = common::create_test_app();
    let mut client = app.client();

    let response = client.get("/").await;
    let headers = &response.headers;
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["cache-control"], "no-store");
    assert!(headers["content-security-policy"]
        .to_str()
        .unwrap()
        .starts_with("default-src 'none'"));
    assert!(headers["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let response = client.post_form("/navigate", &[("page", "auth")]).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/"));
    assert_eq!(response.headers["x-frame-options"], "DENY");
}

#[tokio::test]
async fn test_auth_page_uses_file_backend_login_label() {
    let app = common::create_test_app();
    let mut client = app.client();

    let page = client.navigate("auth").await;
    assert!(page.contains(r#"<label for="login">Username or Email</label>"#));
}

#[tokio::test]
async fn test_protected_page_without_sign_in_stays_on_landing() {
    let app = common::create_test_app();
    let mut client = app.client();

    for page in ["planner", "history", "profile"] {
        let body = client.navigate(page).await;
        assert!(
            body.contains("Your AI-Powered Personal Health Assistant"),
            "{page} should fall back to landing"
        );
        assert!(body.contains("Please sign in to continue."));
    }
}

#[tokio::test]
async fn test_register_then_sign_in() {
    let app = common::create_test_app();
    let mut client = app.client();

    let page = client.sign_up("alex", "alex@x.com", "pw123").await;
    assert!(page.contains("Account created. Please sign in to continue."));
    assert!(!page.contains("check your inbox"));

    let page = client.sign_in("alex", "pw123").await;
    assert!(page.contains("Successfully logged in!"));
    assert!(page.contains("🏋️ Create Your Weekly Plan"));
    assert!(page.contains("👋 Welcome, alex!"));

    // The password never reaches the users file in plaintext
    let raw = std::fs::read_to_string(app.users_file()).unwrap();
    assert!(raw.contains("alex@x.com"));
    assert!(!raw.contains("pw123"));
}

#[tokio::test]
async fn test_sign_in_by_email() {
    let app = common::create_test_app();
    let mut client = app.client();

    client.sign_up("alex", "alex@x.com", "pw123").await;
    let page = client.sign_in("ALEX@x.com", "pw123").await;
    assert!(page.contains("👋 Welcome, alex!"));
}

#[tokio::test]
async fn test_duplicate_sign_up_is_rejected() {
    let app = common::create_test_app();
    let mut client = app.client();

    client.sign_up("alex", "alex@x.com", "pw123").await;
    let page = client.sign_up("alex", "other@x.com", "pw456").await;
    assert!(page.contains("Username already exists"));

    let page = client.sign_up("sam", "alex@x.com", "pw456").await;
    assert!(page.contains("Email already registered"));

    // The original account is untouched
    let page = client.sign_in("alex", "pw123").await;
    assert!(page.contains("Successfully logged in!"));
}

#[tokio::test]
async fn test_sign_up_validation() {
    let app = common::create_test_app();
    let mut client = app.client();

    let page = client
        .submit(
            "/auth/sign-up",
            &[
                ("username", "alex"),
                ("email", "alex@x.com"),
                ("password", "pw123"),
                ("confirm_password", "pw124"),
            ],
        )
        .await;
    assert!(page.contains("Passwords do not match"));

    let page = client.sign_up("", "alex@x.com", "pw123").await;
    assert!(page.contains("All fields are required"));

    assert!(!app.users_file().exists());
}

#[tokio::test]
async fn test_bad_credentials() {
    let app = common::create_test_app();
    let mut client = app.client();
    client.sign_up("alex", "alex@x.com", "pw123").await;

    let page = client.sign_in("alex", "wrong").await;
    assert!(page.contains("Incorrect password"));
    assert!(!page.contains("Welcome, alex"));

    let page = client.sign_in("nobody", "pw123").await;
    assert!(page.contains("Username not found"));

    let page = client.sign_in("", "").await;
    assert!(page.contains("Email and password are required"));
}

#[tokio::test]
async fn test_sign_out_returns_to_landing() {
    let app = common::create_test_app();
    let mut client = app.client();
    client.sign_up("alex", "alex@x.com", "pw123").await;
    client.sign_in("alex", "pw123").await;

    let page = client.submit("/auth/sign-out", &[]).await;
    assert!(page.contains("You have been signed out."));
    assert!(page.contains("Your AI-Powered Personal Health Assistant"));
    assert!(!page.contains("Welcome, alex"));

    let page = client.navigate("history").await;
    assert!(!page.contains("Your Plan History"));
}

#[tokio::test]
async fn test_sidebar_highlights_current_page() {
    let app = common::create_test_app();
    let mut client = app.client();
    client.sign_up("alex", "alex@x.com", "pw123").await;
    client.sign_in("alex", "pw123").await;

    let page = client.navigate("profile").await;
    assert!(page.contains(
        r#"value="profile"><button type="submit" class="primary">⚙️ Profile &amp; Settings"#
    ));
    assert!(page.contains(r#"value="planner"><button type="submit" class="">🏠 Home"#));
}

#[tokio::test]
async fn test_health_reports_storage() {
    let app = common::create_test_app();
    let mut client = app.client();

    let response = client.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.set_cookie.is_none());

    let json: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["storage"], "file");
    assert!(json["build_id"].is_string());
}
