//! Saved plan model and history filtering.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Kind of generated plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    Meal,
    Exercise,
}

impl PlanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Meal => "meal",
            PlanType::Exercise => "exercise",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PlanType::Meal => "Meal Plan",
            PlanType::Exercise => "Exercise Plan",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            PlanType::Meal => "🍽️",
            PlanType::Exercise => "💪",
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored plan (`plans` table, or an entry of a user's `plan_history`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Server-assigned ID. Numeric IDs are normalised to strings.
    #[serde(
        default,
        deserialize_with = "deserialize_optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default)]
    pub user_id: String,
    #[serde(rename = "type")]
    pub plan_type: PlanType,
    pub content: String,
    pub goal: String,
    pub created_at: String,
}

/// Row payload for inserting a plan.
#[derive(Debug, Clone, Serialize)]
pub struct NewPlan {
    pub user_id: String,
    #[serde(rename = "type")]
    pub plan_type: PlanType,
    pub content: String,
    pub goal: String,
    pub created_at: String,
}

impl NewPlan {
    /// Materialise the stored form with an assigned ID.
    pub fn into_plan(self, id: String) -> Plan {
        Plan {
            id: Some(id),
            user_id: self.user_id,
            plan_type: self.plan_type,
            content: self.content,
            goal: self.goal,
            created_at: self.created_at,
        }
    }
}

fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// History page type filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanFilter {
    #[default]
    All,
    Meal,
    Exercise,
}

impl PlanFilter {
    pub const ALL: [PlanFilter; 3] = [PlanFilter::All, PlanFilter::Meal, PlanFilter::Exercise];

    pub fn label(&self) -> &'static str {
        match self {
            PlanFilter::All => "All",
            PlanFilter::Meal => "Meal Plans",
            PlanFilter::Exercise => "Exercise Plans",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanFilter::All => "all",
            PlanFilter::Meal => "meal",
            PlanFilter::Exercise => "exercise",
        }
    }

    pub fn matches(&self, plan: &Plan) -> bool {
        match self {
            PlanFilter::All => true,
            PlanFilter::Meal => plan.plan_type == PlanType::Meal,
            PlanFilter::Exercise => plan.plan_type == PlanType::Exercise,
        }
    }

    /// Select matching plans, preserving order.
    pub fn apply<'a>(&self, plans: &'a [Plan]) -> Vec<&'a Plan> {
        plans.iter().filter(|plan| self.matches(plan)).collect()
    }
}

/// Per-type counts shown on the profile page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlanCounts {
    pub total: usize,
    pub meal: usize,
    pub exercise: usize,
}

impl PlanCounts {
    pub fn from_plans(plans: &[Plan]) -> Self {
        plans.iter().fold(Self::default(), |mut counts, plan| {
            counts.total += 1;
            match plan.plan_type {
                PlanType::Meal => counts.meal += 1,
                PlanType::Exercise => counts.exercise += 1,
            }
            counts
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(id: &str, plan_type: PlanType) -> Plan {
        Plan {
            id: Some(id.to_string()),
            user_id: "u1".to_string(),
            plan_type,
            content: format!("content {}", id),
            goal: "Maintenance".to_string(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_meal_filter_preserves_order() {
        let plans = vec![
            plan("1", PlanType::Exercise),
            plan("2", PlanType::Meal),
            plan("3", PlanType::Exercise),
            plan("4", PlanType::Meal),
        ];

        let ids: Vec<_> = PlanFilter::Meal
            .apply(&plans)
            .into_iter()
            .map(|p| p.id.clone().unwrap())
            .collect();
        assert_eq!(ids, vec!["2", "4"]);

        assert_eq!(PlanFilter::All.apply(&plans).len(), 4);
        assert_eq!(PlanFilter::Exercise.apply(&plans).len(), 2);
    }

    #[test]
    fn test_numeric_ids_are_normalised() {
        let parsed: Plan = serde_json::from_str(
            r#"{"id":42,"user_id":"u1","type":"meal","content":"x","goal":"Weight Loss","created_at":"2026-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(parsed.id.as_deref(), Some("42"));

        let without_id: Plan = serde_json::from_str(
            r#"{"type":"exercise","content":"x","goal":"Maintenance","created_at":"2026-01-01T00:00:00"}"#,
        )
        .unwrap();
        assert_eq!(without_id.id, None);
        assert_eq!(without_id.plan_type, PlanType::Exercise);
    }

    #[test]
    fn test_counts() {
        let plans = vec![
            plan("1", PlanType::Meal),
            plan("2", PlanType::Meal),
            plan("3", PlanType::Exercise),
        ];
        assert_eq!(
            PlanCounts::from_plans(&plans),
            PlanCounts {
                total: 3,
                meal: 2,
                exercise: 1
            }
        );
    }
}
