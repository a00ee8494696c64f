// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weekly plan request form and the results of the last submission.

use super::{escape_html, layout, options, render_markdown};
use crate::models::{FitnessGoal, FitnessLevel, PlanType};
use crate::session::{Flash, GenerationResult, PlanOutcome, Session};

/// Values the form starts with: the last rejected draft, else profile defaults.
struct FormValues<'a> {
    goal: FitnessGoal,
    level: FitnessLevel,
    ingredients: &'a str,
    equipment: &'a str,
    dietary_preferences: &'a str,
}

impl<'a> FormValues<'a> {
    fn from_session(session: &'a Session) -> Self {
        let profile = session.profile.as_ref();
        let goal = profile.map(|p| p.fitness_goal).unwrap_or_default();
        let level = profile.map(|p| p.fitness_level).unwrap_or_default();

        if let Some(draft) = session.planner_draft.as_ref() {
            return Self {
                goal: draft.fitness_goal,
                level: draft.fitness_level,
                ingredients: &draft.ingredients,
                equipment: &draft.equipment,
                dietary_preferences: &draft.dietary_preferences,
            };
        }

        Self {
            goal,
            level,
            ingredients: profile
                .and_then(|p| p.default_ingredients.as_deref())
                .unwrap_or(""),
            equipment: profile
                .and_then(|p| p.default_equipment.as_deref())
                .unwrap_or(""),
            dietary_preferences: profile
                .and_then(|p| p.dietary_preferences.as_deref())
                .unwrap_or(""),
        }
    }
}

fn render_outcome(plan_type: PlanType, goal: &str, outcome: &PlanOutcome) -> String {
    let heading = match plan_type {
        PlanType::Meal => format!("Your Weekly Meal Plan for {}", escape_html(goal)),
        PlanType::Exercise => format!("Your Weekly Exercise Plan for {}", escape_html(goal)),
    };

    match outcome {
        PlanOutcome::Generated(content) => format!(
            r#"<section class="result"><h3>{} {}</h3>{}<div class="flash flash-success">✅ {} generated successfully!</div></section>"#,
            plan_type.icon(),
            heading,
            render_markdown(content),
            plan_type.display_name()
        ),
        PlanOutcome::Failed(message) => format!(
            r#"<section class="result"><h3>{} {}</h3><div class="flash flash-error">{}</div></section>"#,
            plan_type.icon(),
            heading,
            escape_html(message)
        ),
    }
}

fn render_results(result: &GenerationResult) -> String {
    let mut out = String::from("<hr>");
    out.push_str(&render_outcome(PlanType::Meal, &result.goal, &result.meal));
    out.push_str(&render_outcome(
        PlanType::Exercise,
        &result.goal,
        &result.exercise,
    ));
    out.push_str(
        r#"<div class="flash flash-info">💡 <strong>Tips:</strong> Your plans are saved in your history. Check the History page to view all your previous plans!</div>"#,
    );
    out
}

pub fn render(session: &Session, flashes: &[Flash]) -> String {
    let values = FormValues::from_session(session);

    let mut body = format!(
        r#"<h1>🏋️ Create Your Weekly Plan</h1>
<p>Generate personalized meal and exercise plans tailored to your goals!</p>
<hr>
<form method="post" action="/planner/generate">
<div class="columns">
<div>
<h3>📊 Your Fitness Goal</h3>
<label for="fitness_goal">What is your primary fitness goal?</label>
<select id="fitness_goal" name="fitness_goal">{goals}</select>
</div>
<div>
<h3>💪 Fitness Level</h3>
<label for="fitness_level">What is your current fitness level?</label>
<select id="fitness_level" name="fitness_level">{levels}</select>
<p class="help">This helps customize your exercise intensity</p>
</div>
</div>
<hr>
<div class="columns">
<div>
<h3>🥗 Pantry Ingredients</h3>
<label for="ingredients">List the ingredients you have available:</label>
<textarea id="ingredients" name="ingredients" placeholder="e.g., chicken breast, rice, eggs, spinach, oats, bananas, almonds, olive oil...">{ingredients}</textarea>
<p class="help">Enter ingredients separated by commas or on new lines</p>
<label for="dietary_preferences">Dietary preferences or restrictions (optional):</label>
<input id="dietary_preferences" name="dietary_preferences" type="text" placeholder="e.g., vegetarian, no dairy, low carb..." value="{dietary}">
</div>
<div>
<h3>🏋️ Exercise Equipment</h3>
<label for="equipment">List the exercise equipment you have at home:</label>
<textarea id="equipment" name="equipment" placeholder="e.g., dumbbells, resistance bands, yoga mat, pull-up bar, kettlebell...">{equipment}</textarea>
<p class="help">Enter equipment separated by commas or on new lines. Include 'bodyweight' if you have no equipment.</p>
</div>
</div>
<hr>
<button type="submit" class="primary">🚀 Generate My Weekly Plan</button>
</form>"#,
        goals = options(FitnessGoal::ALL.iter().map(|g| g.label()), values.goal.label()),
        levels = options(
            FitnessLevel::ALL.iter().map(|l| l.label()),
            values.level.label()
        ),
        ingredients = escape_html(values.ingredients),
        equipment = escape_html(values.equipment),
        dietary = escape_html(values.dietary_preferences),
    );

    if let Some(result) = session.last_generation.as_ref() {
        body.push_str(&render_results(result));
    }

    layout("Planner", session, flashes, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Profile;
    use crate::session::{Page, PlannerDraft};

    fn signed_in() -> Session {
        let mut session = Session::new("s1");
        session.authenticated = true;
        session.current_page = Page::Planner;
        let mut profile = Profile::new("alex", Some("alex".into()), None, String::new());
        profile.fitness_goal = FitnessGoal::WeightLoss;
        profile.fitness_level = FitnessLevel::Advanced;
        profile.default_ingredients = Some("rice & beans".into());
        session.profile = Some(profile);
        session
    }

    #[test]
    fn test_form_prefilled_from_profile() {
        let html = render(&signed_in(), &[]);
        assert!(html.contains(r#"<option value="Weight Loss" selected>"#));
        assert!(html.contains(r#"<option value="Advanced" selected>"#));
        assert!(html.contains(">rice &amp; beans</textarea>"));
    }

    #[test]
    fn test_draft_overrides_profile_defaults() {
        let mut session = signed_in();
        session.planner_draft = Some(PlannerDraft {
            fitness_goal: FitnessGoal::WeightGain,
            fitness_level: FitnessLevel::Beginner,
            ingredients: String::new(),
            equipment: "kettlebell".into(),
            dietary_preferences: String::new(),
        });

        let html = render(&session, &[]);
        assert!(html.contains(r#"name="ingredients" placeholder="#));
        assert!(!html.contains("rice &amp; beans"));
        assert!(html.contains(">kettlebell</textarea>"));
        assert!(html.contains(r#"<option value="Weight Gain" selected>"#));
        assert!(html.contains(r#"<option value="Beginner" selected>"#));
        assert!(!html.contains(r#"<option value="Advanced" selected>"#));
    }

    #[test]
    fn test_results_render_markdown_and_errors() {
        let mut session = signed_in();
        session.last_generation = Some(GenerationResult {
            goal: "Weight Loss".into(),
            meal: PlanOutcome::Generated("**Day 1:** oats".into()),
            exercise: PlanOutcome::Failed(
                "Error generating exercise plan: request timed out".into(),
            ),
        });

        let html = render(&session, &[]);
        assert!(html.contains("Your Weekly Meal Plan for Weight Loss"));
        assert!(html.contains("<strong>Day 1:</strong>"));
        assert!(html.contains("Meal Plan generated successfully!"));
        assert!(html.contains("Error generating exercise plan: request timed out"));
    }
}
