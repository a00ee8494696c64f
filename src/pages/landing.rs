// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Landing page for signed-out visitors.

use super::{layout, nav_button};
use crate::session::{Flash, Page, Session};

const FEATURES: [(&str, &str, &str); 3] = [
    (
        "🍽️",
        "Smart Meal Planning",
        "Get personalized 7-day meal plans based on ingredients you have. No more wondering what to cook!",
    ),
    (
        "💪",
        "Custom Workouts",
        "Receive tailored exercise plans matching your equipment and fitness level. Train smarter, not harder!",
    ),
    (
        "🎯",
        "Goal-Oriented",
        "Whether you want to lose weight, gain muscle, or maintain, we create plans for your specific goals.",
    ),
];

const STEPS: &str = r#"<h2>How It Works</h2>
<div class="columns">
<div><h3>1️⃣ Sign Up</h3><p>Create your free account in seconds</p></div>
<div><h3>2️⃣ Set Goals</h3><p>Choose your fitness objective</p></div>
<div><h3>3️⃣ Input Resources</h3><p>Tell us what you have</p></div>
<div><h3>4️⃣ Get Plans</h3><p>Receive AI-powered personalized plans</p></div>
</div>"#;

pub fn render(session: &Session, flashes: &[Flash]) -> String {
    let mut body = String::from(
        r#"<div class="hero-section">
<div class="hero-title">🏋️ Meal &amp; Exercise Planner</div>
<div class="hero-subtitle">Your AI-Powered Personal Health Assistant</div>
<p>Transform your health journey with personalized meal plans and workout routines tailored to your goals, available ingredients, and equipment.</p>
</div>
<div class="columns">"#,
    );

    for (icon, title, description) in FEATURES {
        body.push_str(&format!(
            r#"<div class="feature-card"><div class="feature-icon">{icon}</div><div class="feature-title">{title}</div><div class="feature-description">{description}</div></div>"#
        ));
    }
    body.push_str("</div><hr>");
    body.push_str(STEPS);
    body.push_str(r#"<hr><div class="cta"><h2>Ready to Transform Your Health?</h2><p>Join now and get your first personalized plan in minutes!</p>"#);
    body.push_str(&nav_button(Page::Auth, "🚀 Get Started Now", true));
    body.push_str("</div>");

    layout("Welcome", session, flashes, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_has_get_started_button() {
        let html = render(&Session::new("s1"), &[]);
        assert!(html.contains("Your AI-Powered Personal Health Assistant"));
        assert!(html.contains(r#"name="page" value="auth""#));
        assert!(html.contains("Get Started Now"));
    }
}
