// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod account;
pub mod gemini;
pub mod planner;

pub use account::{AccountService, SignUpForm};
pub use gemini::{GeminiClient, GenerationError, TextGenerator};
pub use planner::{PlanGenerationError, PlanGenerator};
