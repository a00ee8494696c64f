// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plan generation route.

use axum::{extract::State, response::Redirect, routing::post, Extension, Form, Router};
use serde::Deserialize;
use std::sync::Arc;

use super::{flash_failure, redirect_home};
use crate::error::{AppError, Result};
use crate::models::{FitnessGoal, FitnessLevel, PlanType};
use crate::session::{
    FlashLevel, GenerationResult, Page, PlanOutcome, PlannerDraft, Session, SessionStore,
};
use crate::AppState;

const MISSING_INGREDIENTS: &str = "⚠️ Please enter at least some ingredients from your pantry!";
const MISSING_EQUIPMENT: &str =
    "⚠️ Please enter your available exercise equipment (or 'bodyweight' if none)!";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/planner/generate", post(generate))
}

#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    pub fitness_goal: FitnessGoal,
    pub fitness_level: FitnessLevel,
    #[serde(default)]
    pub ingredients: String,
    #[serde(default)]
    pub equipment: String,
    #[serde(default)]
    pub dietary_preferences: String,
}

impl GenerateForm {
    fn draft(&self) -> PlannerDraft {
        PlannerDraft {
            fitness_goal: self.fitness_goal,
            fitness_level: self.fitness_level,
            ingredients: self.ingredients.clone(),
            equipment: self.equipment.clone(),
            dietary_preferences: self.dietary_preferences.clone(),
        }
    }

    fn missing_field_message(&self) -> Option<&'static str> {
        if self.ingredients.trim().is_empty() {
            Some(MISSING_INGREDIENTS)
        } else if self.equipment.trim().is_empty() {
            Some(MISSING_EQUIPMENT)
        } else {
            None
        }
    }
}

/// Generate the meal plan, then the exercise plan, saving each one that succeeds.
async fn generate(
    State(state): State<Arc<AppState>>,
    Extension(mut session): Extension<Session>,
    Form(form): Form<GenerateForm>,
) -> Result<Redirect> {
    if !session.authenticated {
        flash_failure(&mut session, AppError::Unauthorized)?;
        return Ok(redirect_home(&state, session));
    }

    session.navigate(Page::Planner);
    session.last_generation = None;
    session.planner_draft = Some(form.draft());

    if let Some(message) = form.missing_field_message() {
        session.flash(FlashLevel::Error, message);
        return Ok(redirect_home(&state, session));
    }

    let goal = form.fitness_goal;
    tracing::info!(goal = %goal, level = %form.fitness_level, "Generating weekly plans");

    let meal = match state
        .planner
        .generate_meal_plan(goal, &form.ingredients, form.dietary_preferences.trim())
        .await
    {
        Ok(content) => {
            save_plan(&state, &mut session, PlanType::Meal, &content, goal).await?;
            PlanOutcome::Generated(content)
        }
        Err(e) => PlanOutcome::Failed(e.to_string()),
    };

    let exercise = match state
        .planner
        .generate_exercise_plan(goal, &form.equipment, form.fitness_level)
        .await
    {
        Ok(content) => {
            save_plan(&state, &mut session, PlanType::Exercise, &content, goal).await?;
            PlanOutcome::Generated(content)
        }
        Err(e) => PlanOutcome::Failed(e.to_string()),
    };

    session.last_generation = Some(GenerationResult {
        goal: goal.label().to_string(),
        meal,
        exercise,
    });

    let session = merge_into_stored(&state.sessions, session);
    Ok(redirect_home(&state, session))
}

/// Fold this submission's results into the stored session, which other
/// requests may have changed while the models were running. Results for a
/// user who has since signed out are dropped.
fn merge_into_stored(sessions: &SessionStore, session: Session) -> Session {
    let Some(mut stored) = sessions.load(&session.id) else {
        return session;
    };

    let same_user = stored.authenticated
        && stored.principal.as_ref().map(|p| &p.user_id)
            == session.principal.as_ref().map(|p| &p.user_id);
    if !same_user {
        tracing::info!(
            session_id = %session.id,
            "Session signed out during generation, dropping results"
        );
        return stored;
    }

    stored.navigate(Page::Planner);
    stored.plans = session.plans;
    stored.planner_draft = session.planner_draft;
    stored.last_generation = session.last_generation;
    stored.flashes = session.flashes;
    stored
}

/// Store a generated plan. A storage failure is shown but keeps the plan on screen.
async fn save_plan(
    state: &AppState,
    session: &mut Session,
    plan_type: PlanType,
    content: &str,
    goal: FitnessGoal,
) -> Result<()> {
    match state
        .accounts
        .record_plan(session, plan_type, content, goal.label())
        .await
    {
        Ok(()) => Ok(()),
        Err(e) => flash_failure(session, e),
    }
}
