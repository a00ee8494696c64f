// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use meal_planner::config::{Config, StorageConfig};
use meal_planner::db::JsonFileDb;
use meal_planner::routes::create_router;
use meal_planner::services::{AccountService, GenerationError, PlanGenerator, TextGenerator};
use meal_planner::session::SessionStore;
use meal_planner::AppState;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::ServiceExt;

/// Text generator that records prompts and answers with canned Markdown.
#[derive(Default)]
pub struct StubGenerator {
    fail: AtomicBool,
    prompts: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl StubGenerator {
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail.load(Ordering::SeqCst) {
            return Err(GenerationError::Provider {
                status: 503,
                message: "model overloaded".to_string(),
            });
        }
        if prompt.starts_with("You are a professional nutritionist") {
            Ok("**Day 1:**\n- **Breakfast:** Oats - 350 calories, 12g protein".to_string())
        } else {
            Ok("**Day 1: Full Body**\n- **Focus:** Strength".to_string())
        }
    }
}

/// Test app backed by a users file in a temporary directory.
#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub generator: Arc<StubGenerator>,
    pub backend: Arc<JsonFileDb>,
    dir: TempDir,
}

#[allow(dead_code)]
impl TestApp {
    pub fn users_file(&self) -> std::path::PathBuf {
        self.dir.path().join("users.json")
    }

    /// A fresh browser with no cookies.
    pub fn client(&self) -> TestClient {
        TestClient::new(self.router.clone())
    }
}

/// Create a test app with the file backend and a stub generator.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.json");

    let mut config = Config::test_default();
    config.storage = StorageConfig::File { path: path.clone() };

    let backend = Arc::new(JsonFileDb::new(path).with_bcrypt_cost(4));
    let generator = Arc::new(StubGenerator::default());

    let state = Arc::new(AppState {
        config,
        accounts: AccountService::new(backend.clone()),
        planner: PlanGenerator::new(generator.clone()),
        sessions: SessionStore::new(chrono::Duration::hours(1)),
    });

    TestApp {
        router: create_router(state.clone()),
        state,
        generator,
        backend,
        dir,
    }
}

/// Result of one request.
#[allow(dead_code)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub location: Option<String>,
    pub set_cookie: Option<String>,
    pub body: String,
}

/// Carries the session cookie between requests like a browser.
pub struct TestClient {
    router: Router,
    cookie: Option<String>,
}

#[allow(dead_code)]
impl TestClient {
    pub fn new(router: Router) -> Self {
        Self {
            router,
            cookie: None,
        }
    }

    /// Raw `name=value` cookie the client sends.
    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    pub fn set_cookie(&mut self, cookie: impl Into<String>) {
        self.cookie = Some(cookie.into());
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = self.builder("GET", uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let request = self
            .builder("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Post a form, check for the redirect, and return the page it leads to.
    pub async fn submit(&mut self, uri: &str, fields: &[(&str, &str)]) -> String {
        let response = self.post_form(uri, fields).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "POST {uri}");
        let location = response.location.unwrap_or_else(|| "/".to_string());
        self.get(&location).await.body
    }

    pub async fn sign_up(&mut self, username: &str, email: &str, password: &str) -> String {
        self.submit(
            "/auth/sign-up",
            &[
                ("username", username),
                ("email", email),
                ("password", password),
                ("confirm_password", password),
            ],
        )
        .await
    }

    pub async fn sign_in(&mut self, login: &str, password: &str) -> String {
        self.submit("/auth/sign-in", &[("login", login), ("password", password)])
            .await
    }

    pub async fn navigate(&mut self, page: &str) -> String {
        self.submit("/navigate", &[("page", page)]).await
    }

    fn builder(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let header_str = |name: header::HeaderName| {
            headers.get(name).map(|v| v.to_str().unwrap().to_string())
        };
        let location = header_str(header::LOCATION);
        let set_cookie = header_str(header::SET_COOKIE);

        if let Some(cookie) = &set_cookie {
            let pair = cookie.split(';').next().unwrap().to_string();
            self.cookie = Some(pair);
        }

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            headers,
            location,
            set_cookie,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }
}
