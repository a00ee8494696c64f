// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user session context and the process-local session store.
//!
//! A `Session` is loaded by the session middleware at the start of every
//! request, handed to the handler by value, and written back with
//! [`SessionStore::save`] once the handler is done with it.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::Deserialize;
use std::fmt;

use crate::db::Principal;
use crate::models::{FitnessGoal, FitnessLevel, Plan, Profile};

/// Which page the render cycle shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    #[default]
    Landing,
    Auth,
    Planner,
    History,
    Profile,
}

impl Page {
    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Landing => "landing",
            Page::Auth => "auth",
            Page::Planner => "planner",
            Page::History => "history",
            Page::Profile => "profile",
        }
    }

    /// Pages only reachable with a signed-in session.
    pub fn requires_auth(&self) -> bool {
        matches!(self, Page::Planner | Page::History | Page::Profile)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl FlashLevel {
    pub fn css_class(&self) -> &'static str {
        match self {
            FlashLevel::Success => "flash-success",
            FlashLevel::Info => "flash-info",
            FlashLevel::Warning => "flash-warning",
            FlashLevel::Error => "flash-error",
        }
    }
}

/// One-shot message shown on the next render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

/// Outcome of one half of a planner submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanOutcome {
    Generated(String),
    Failed(String),
}

/// What the last planner submission produced, kept until the user navigates away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub goal: String,
    pub meal: PlanOutcome,
    pub exercise: PlanOutcome,
}

/// Planner form values kept across a failed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlannerDraft {
    pub fitness_goal: FitnessGoal,
    pub fitness_level: FitnessLevel,
    pub ingredients: String,
    pub equipment: String,
    pub dietary_preferences: String,
}

/// Everything the app remembers about one browser session.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub authenticated: bool,
    pub principal: Option<Principal>,
    pub username: Option<String>,
    pub profile: Option<Profile>,
    /// Most recent plans, newest first
    pub plans: Vec<Plan>,
    pub current_page: Page,
    /// First click of "Clear All History" arms this; the second one clears.
    pub confirm_clear: bool,
    pub flashes: Vec<Flash>,
    pub last_generation: Option<GenerationResult>,
    pub planner_draft: Option<PlannerDraft>,
    pub last_seen: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            authenticated: false,
            principal: None,
            username: None,
            profile: None,
            plans: Vec::new(),
            current_page: Page::Landing,
            confirm_clear: false,
            flashes: Vec::new(),
            last_generation: None,
            planner_draft: None,
            last_seen: Utc::now(),
        }
    }

    /// Drop everything except the session ID.
    pub fn reset(&mut self) {
        *self = Session::new(std::mem::take(&mut self.id));
    }

    /// Move to another page. Protected pages are refused without sign-in.
    pub fn navigate(&mut self, page: Page) -> bool {
        if page.requires_auth() && !self.authenticated {
            self.current_page = Page::Landing;
            return false;
        }
        if page != self.current_page {
            self.last_generation = None;
            self.planner_draft = None;
            self.confirm_clear = false;
        }
        self.current_page = page;
        true
    }

    /// The page this render cycle should show.
    pub fn resolve_page(&mut self) -> Page {
        if self.current_page.requires_auth() && !self.authenticated {
            self.current_page = Page::Landing;
        }
        self.current_page
    }

    pub fn flash(&mut self, level: FlashLevel, message: impl Into<String>) {
        self.flashes.push(Flash {
            level,
            message: message.into(),
        });
    }

    pub fn take_flashes(&mut self) -> Vec<Flash> {
        std::mem::take(&mut self.flashes)
    }
}

/// Process-local map of live sessions.
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fetch a live session by ID.
    pub fn load(&self, id: &str) -> Option<Session> {
        let session = self.sessions.get(id)?.clone();
        if Utc::now() - session.last_seen > self.ttl {
            drop(self.sessions.remove(id));
            return None;
        }
        Some(session)
    }

    /// Start a new, empty session with a random ID.
    pub fn create(&self) -> Session {
        self.purge_expired();
        let session = Session::new(uuid::Uuid::new_v4().to_string());
        self.sessions.insert(session.id.clone(), session.clone());
        tracing::debug!(session_id = %session.id, "Session created");
        session
    }

    /// Persist a session after the handler changed it.
    pub fn save(&self, mut session: Session) {
        session.last_seen = Utc::now();
        self.sessions.insert(session.id.clone(), session);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn purge_expired(&self) {
        let cutoff = Utc::now() - self.ttl;
        self.sessions.retain(|_, session| session.last_seen > cutoff);
    }
}
