// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Saved plan history with filtering and deletion.

use super::{escape_html, layout, nav_button, render_markdown};
use crate::models::{Plan, PlanFilter};
use crate::session::{Flash, Page, Session};
use crate::time_utils::format_plan_timestamp;

fn filter_select(selected: PlanFilter) -> String {
    let options: String = PlanFilter::ALL
        .iter()
        .map(|filter| {
            let marker = if *filter == selected { " selected" } else { "" };
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                filter.as_str(),
                marker,
                filter.label()
            )
        })
        .collect();

    format!(
        r#"<form method="get" action="/" class="columns">
<div><label for="filter">Filter by type:</label><select id="filter" name="filter">{options}</select></div>
<div><label>&nbsp;</label><button type="submit">Apply</button></div>
</form>"#
    )
}

fn render_entry(plan: &Plan, open: bool, filter: PlanFilter) -> String {
    let summary = format!(
        "{} {} - {} ({})",
        plan.plan_type.icon(),
        plan.plan_type.display_name(),
        escape_html(&plan.goal),
        escape_html(&format_plan_timestamp(&plan.created_at))
    );

    let delete = match plan.id.as_deref() {
        Some(id) => format!(
            r#"<div class="plan-actions"><form method="post" action="/history/delete"><input type="hidden" name="plan_id" value="{}"><input type="hidden" name="filter" value="{}"><button type="submit" class="inline">🗑️ Delete</button></form></div>"#,
            escape_html(id),
            filter.as_str()
        ),
        None => String::new(),
    };

    format!(
        r#"<details class="plan"{}><summary>{}</summary>{}{}</details>"#,
        if open { " open" } else { "" },
        summary,
        render_markdown(&plan.content),
        delete
    )
}

pub fn render(session: &Session, flashes: &[Flash], filter: PlanFilter) -> String {
    let mut body = String::from(
        r#"<h1>📊 Your Plan History</h1>
<p>View and manage all your previously generated meal and exercise plans</p>
<hr>"#,
    );

    if session.plans.is_empty() {
        body.push_str(
            r#"<div class="flash flash-info">🌟 No plans yet! Head to the Planner page to create your first plan.</div>"#,
        );
        body.push_str(&nav_button(Page::Planner, "🚀 Create Your First Plan", true));
        return layout("History", session, flashes, &body);
    }

    body.push_str(&filter_select(filter));
    body.push_str(&format!(
        "<h3>Total Plans: {}</h3><hr>",
        session.plans.len()
    ));

    for (idx, plan) in filter.apply(&session.plans).into_iter().enumerate() {
        body.push_str(&render_entry(plan, idx == 0, filter));
    }

    let clear_label = if session.confirm_clear {
        "⚠️ Confirm: Clear All History"
    } else {
        "🗑️ Clear All History"
    };
    body.push_str(&format!(
        r#"<hr><form method="post" action="/history/clear"><button type="submit">{}</button></form>"#,
        clear_label
    ));

    layout("History", session, flashes, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlanType;

    fn plan(id: &str, plan_type: PlanType, created_at: &str) -> Plan {
        Plan {
            id: Some(id.into()),
            user_id: "alex".into(),
            plan_type,
            content: format!("{} <b>content</b>", id),
            goal: "Weight Loss".into(),
            created_at: created_at.into(),
        }
    }

    fn session_with_plans() -> Session {
        let mut session = Session::new("s1");
        session.authenticated = true;
        session.current_page = Page::History;
        session.plans = vec![
            plan("p2", PlanType::Exercise, "2026-03-05T18:30:00Z"),
            plan("p1", PlanType::Meal, "2026-03-04T09:15:00Z"),
        ];
        session
    }

    #[test]
    fn test_empty_history_offers_first_plan() {
        let mut session = Session::new("s1");
        session.authenticated = true;
        session.current_page = Page::History;

        let html = render(&session, &[], PlanFilter::All);
        assert!(html.contains("No plans yet!"));
        assert!(html.contains("Create Your First Plan"));
        assert!(!html.contains("Total Plans"));
    }

    #[test]
    fn test_entries_show_type_goal_and_date() {
        let html = render(&session_with_plans(), &[], PlanFilter::All);
        assert!(html.contains("Total Plans: 2"));
        assert!(html.contains("🍽️ Meal Plan - Weight Loss (March 04, 2026 at 09:15 AM)"));
        assert!(html.contains("💪 Exercise Plan - Weight Loss (March 05, 2026 at 06:30 PM)"));
        assert!(html.contains(r#"name="plan_id" value="p1""#));
        assert!(html.contains("&lt;b&gt;content&lt;/b&gt;"));
    }

    #[test]
    fn test_filter_hides_other_types_but_total_counts_all() {
        let html = render(&session_with_plans(), &[], PlanFilter::Meal);
        assert!(html.contains("Total Plans: 2"));
        assert!(html.contains(r#"value="p1""#));
        assert!(!html.contains(r#"value="p2""#));
        assert!(html.contains(r#"<option value="meal" selected>Meal Plans</option>"#));
    }

    #[test]
    fn test_clear_button_asks_for_confirmation() {
        let mut session = session_with_plans();
        assert!(render(&session, &[], PlanFilter::All).contains("🗑️ Clear All History"));

        session.confirm_clear = true;
        assert!(render(&session, &[], PlanFilter::All).contains("Confirm: Clear All History"));
    }
}
