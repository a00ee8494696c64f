// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Meal & Exercise Planner: AI-generated weekly meal and workout plans
//!
//! This crate serves the planner web app. Users sign in, describe their
//! pantry and equipment, and get 7-day plans from a generative text API,
//! which are kept in a per-user history.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod pages;
pub mod routes;
pub mod services;
pub mod session;
pub mod time_utils;

use config::Config;
use services::{AccountService, PlanGenerator};
use session::SessionStore;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub accounts: AccountService,
    pub planner: PlanGenerator,
    pub sessions: SessionStore,
}
