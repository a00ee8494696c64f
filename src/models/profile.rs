//! User profile model for storage and page rendering.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Primary fitness objective. Stored and submitted as its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FitnessGoal {
    #[serde(rename = "Weight Loss")]
    WeightLoss,
    #[serde(rename = "Weight Gain")]
    WeightGain,
    #[default]
    #[serde(rename = "Maintenance")]
    Maintenance,
}

impl FitnessGoal {
    pub const ALL: [FitnessGoal; 3] = [
        FitnessGoal::WeightLoss,
        FitnessGoal::WeightGain,
        FitnessGoal::Maintenance,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FitnessGoal::WeightLoss => "Weight Loss",
            FitnessGoal::WeightGain => "Weight Gain",
            FitnessGoal::Maintenance => "Maintenance",
        }
    }
}

impl fmt::Display for FitnessGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FitnessGoal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|goal| goal.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown fitness goal: {}", s))
    }
}

/// Self-assessed training experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FitnessLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl FitnessLevel {
    pub const ALL: [FitnessLevel; 3] = [
        FitnessLevel::Beginner,
        FitnessLevel::Intermediate,
        FitnessLevel::Advanced,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FitnessLevel::Beginner => "Beginner",
            FitnessLevel::Intermediate => "Intermediate",
            FitnessLevel::Advanced => "Advanced",
        }
    }

    /// Lower-case form used inside prompts.
    pub fn as_prompt_str(&self) -> &'static str {
        match self {
            FitnessLevel::Beginner => "beginner",
            FitnessLevel::Intermediate => "intermediate",
            FitnessLevel::Advanced => "advanced",
        }
    }
}

impl fmt::Display for FitnessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Profile row (`profiles` table, or the per-user record of the users file).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// User ID (provider-issued, or the username for the file backend)
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub fitness_goal: FitnessGoal,
    #[serde(default)]
    pub fitness_level: FitnessLevel,
    #[serde(default)]
    pub default_ingredients: Option<String>,
    #[serde(default)]
    pub default_equipment: Option<String>,
    #[serde(default)]
    pub dietary_preferences: Option<String>,
    /// When the profile was created (RFC3339)
    #[serde(default)]
    pub created_at: String,
}

impl Profile {
    /// A fresh profile with the default goal and level.
    pub fn new(
        id: impl Into<String>,
        username: Option<String>,
        email: Option<String>,
        created_at: String,
    ) -> Self {
        Self {
            id: id.into(),
            username,
            email,
            fitness_goal: FitnessGoal::default(),
            fitness_level: FitnessLevel::default(),
            default_ingredients: None,
            default_equipment: None,
            dietary_preferences: None,
            created_at,
        }
    }

    /// Merge a profile-form submission into this profile.
    pub fn apply(&mut self, update: &ProfileUpdate) {
        self.fitness_goal = update.fitness_goal;
        self.fitness_level = update.fitness_level;
        self.default_ingredients = non_empty(&update.default_ingredients);
        self.default_equipment = non_empty(&update.default_equipment);
        self.dietary_preferences = non_empty(&update.dietary_preferences);
    }
}

/// Fields editable from the profile page.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileUpdate {
    pub fitness_goal: FitnessGoal,
    pub fitness_level: FitnessLevel,
    #[serde(default)]
    pub default_ingredients: String,
    #[serde(default)]
    pub default_equipment: String,
    #[serde(default)]
    pub dietary_preferences: String,
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Name shown in the sidebar: explicit username, else the email local part, else the login.
pub fn display_name(profile: &Profile, login: &str) -> String {
    if let Some(name) = profile.username.as_deref().filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    let email = profile.email.as_deref().unwrap_or(login);
    email.split('@').next().unwrap_or(email).to_string()
}
