// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Prompt templates and the meal/exercise plan generation calls.
//!
//! User text is interpolated verbatim into fixed instructional scaffolding.
//! Goal-specific calorie and rep targets live in the prompt text; nothing
//! here computes them.

use std::sync::Arc;

use crate::models::{FitnessGoal, FitnessLevel, PlanType};
use crate::services::gemini::{GenerationError, TextGenerator};

/// A failed generation, tagged with the plan kind it was for.
#[derive(Debug, thiserror::Error)]
#[error("Error generating {plan_type} plan: {source}")]
pub struct PlanGenerationError {
    pub plan_type: PlanType,
    #[source]
    pub source: GenerationError,
}

/// Build the 7-day meal plan prompt.
pub fn meal_prompt(goal: FitnessGoal, ingredients: &str, dietary_preferences: &str) -> String {
    let dietary_line = if dietary_preferences.is_empty() {
        String::new()
    } else {
        format!("DIETARY PREFERENCES: {}", dietary_preferences)
    };

    format!(
        "You are a professional nutritionist and meal planner. Create a detailed 7-day meal plan based on the following:

GOAL: {goal}
AVAILABLE INGREDIENTS: {ingredients}
{dietary_line}

Please provide a comprehensive weekly meal plan with the following structure for EACH DAY (Day 1 through Day 7):

**Day X:**
- **Breakfast:** [Meal name] - [Brief description, calories, protein in grams]
- **Lunch:** [Meal name] - [Brief description, calories, protein in grams]
- **Dinner:** [Meal name] - [Brief description, calories, protein in grams]
- **Snacks:** [Snack items] - [Brief description, calories, protein in grams]
- **Daily Total:** [Total calories] calories, [Total protein]g protein

Guidelines:
1. For WEIGHT LOSS: Focus on calorie deficit (1500-1800 calories/day), high protein (100-120g), moderate carbs
2. For WEIGHT GAIN: Focus on calorie surplus (2500-3000 calories/day), high protein (140-180g), balanced macros
3. For MAINTENANCE: Balanced nutrition (2000-2200 calories/day), adequate protein (100-130g)
4. Use ONLY the ingredients provided or common staples (salt, pepper, oil, water)
5. Ensure variety across the week
6. Include realistic portion sizes and simple recipes
7. Make meals practical and easy to prepare

Provide the meal plan in a clear, organized format."
    )
}

/// Build the 7-day workout plan prompt.
pub fn exercise_prompt(goal: FitnessGoal, equipment: &str, fitness_level: FitnessLevel) -> String {
    let level = fitness_level.as_prompt_str();

    format!(
        "You are a certified personal trainer. Create a detailed 7-day workout plan based on the following:

GOAL: {goal}
AVAILABLE EQUIPMENT: {equipment}
FITNESS LEVEL: {level}

Please provide a comprehensive weekly exercise plan with the following structure for EACH DAY (Day 1 through Day 7):

**Day X: [Workout Type]**
- **Focus:** [Muscle group or cardio type]
- **Duration:** [Total workout time]
- **Exercises:**
  1. [Exercise name] - [Sets] sets x [Reps] reps - [Rest time between sets]
  2. [Exercise name] - [Sets] sets x [Reps] reps - [Rest time between sets]
  3. [Continue for all exercises]
- **Cooldown:** [Stretching/cooldown routine]
- **Notes:** [Any important tips or modifications]

Guidelines:
1. For WEIGHT LOSS: Focus on cardio, HIIT, circuit training (5-6 days/week), higher reps (12-15)
2. For WEIGHT GAIN: Focus on strength training, muscle building (4-5 days/week), lower reps (6-10), progressive overload
3. For MAINTENANCE: Balanced mix of cardio and strength (4-5 days/week), moderate intensity
4. Use ONLY the equipment provided or bodyweight exercises
5. Include proper rest days (1-2 per week)
6. Provide warm-up recommendations
7. Include exercise progressions and modifications
8. Ensure balanced muscle group coverage throughout the week

Provide the exercise plan in a clear, organized format with specific sets, reps, and rest periods."
    )
}

/// Generates weekly plans through a [`TextGenerator`].
#[derive(Clone)]
pub struct PlanGenerator {
    generator: Arc<dyn TextGenerator>,
}

impl PlanGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn generate_meal_plan(
        &self,
        goal: FitnessGoal,
        ingredients: &str,
        dietary_preferences: &str,
    ) -> Result<String, PlanGenerationError> {
        let prompt = meal_prompt(goal, ingredients, dietary_preferences);
        self.run(PlanType::Meal, &prompt).await
    }

    pub async fn generate_exercise_plan(
        &self,
        goal: FitnessGoal,
        equipment: &str,
        fitness_level: FitnessLevel,
    ) -> Result<String, PlanGenerationError> {
        let prompt = exercise_prompt(goal, equipment, fitness_level);
        self.run(PlanType::Exercise, &prompt).await
    }

    async fn run(&self, plan_type: PlanType, prompt: &str) -> Result<String, PlanGenerationError> {
        match self.generator.generate(prompt).await {
            Ok(text) => {
                tracing::info!(plan_type = %plan_type, chars = text.len(), "Plan generated");
                Ok(text)
            }
            Err(source) => {
                tracing::warn!(plan_type = %plan_type, error = %source, "Plan generation failed");
                Err(PlanGenerationError { plan_type, source })
            }
        }
    }
}
