// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod plan;
pub mod profile;

pub use plan::{NewPlan, Plan, PlanCounts, PlanFilter, PlanType};
pub use profile::{FitnessGoal, FitnessLevel, Profile, ProfileUpdate};
