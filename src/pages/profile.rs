// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account details, preferences form and plan statistics.

use super::{escape_html, layout, options};
use crate::models::{FitnessGoal, FitnessLevel, PlanCounts};
use crate::session::{Flash, Session};
use crate::time_utils::date_prefix;

pub fn render(session: &Session, flashes: &[Flash]) -> String {
    let profile = session.profile.as_ref();
    let username = session.username.as_deref().unwrap_or("N/A");
    let email = profile.and_then(|p| p.email.as_deref()).unwrap_or("N/A");
    let member_since = profile
        .map(|p| p.created_at.as_str())
        .filter(|c| !c.is_empty())
        .map(date_prefix)
        .unwrap_or("N/A");
    let goal = profile.map(|p| p.fitness_goal).unwrap_or_default();
    let level = profile.map(|p| p.fitness_level).unwrap_or_default();
    let field = |value: Option<&String>| escape_html(value.map(String::as_str).unwrap_or(""));
    let counts = PlanCounts::from_plans(&session.plans);

    let body = format!(
        r#"<h1>⚙️ Profile &amp; Settings</h1>
<p>Manage your account and fitness preferences</p>
<hr>
<div class="columns">
<div>
<h3>👤 Account Information</h3>
<p><strong>Username:</strong> {username}</p>
<p><strong>Email:</strong> {email}</p>
<p><strong>Member since:</strong> {member_since}</p>
</div>
<div>
<form method="post" action="/auth/sign-out"><button type="submit">🚪 Sign Out</button></form>
</div>
</div>
<hr>
<h3>🎯 Fitness Goals &amp; Preferences</h3>
<form method="post" action="/profile">
<label for="fitness_goal">Primary Fitness Goal</label>
<select id="fitness_goal" name="fitness_goal">{goals}</select>
<label for="fitness_level">Fitness Level</label>
<select id="fitness_level" name="fitness_level">{levels}</select>
<hr>
<h3>📝 Default Preferences (Optional)</h3>
<p class="help">These will be pre-filled when creating new plans</p>
<label for="default_ingredients">Default Pantry Ingredients</label>
<textarea id="default_ingredients" name="default_ingredients" placeholder="e.g., chicken, rice, eggs, broccoli...">{ingredients}</textarea>
<label for="default_equipment">Default Exercise Equipment</label>
<textarea id="default_equipment" name="default_equipment" placeholder="e.g., dumbbells, resistance bands, yoga mat...">{equipment}</textarea>
<label for="dietary_preferences">Dietary Preferences/Restrictions</label>
<input id="dietary_preferences" name="dietary_preferences" type="text" placeholder="e.g., vegetarian, no dairy..." value="{dietary}">
<hr>
<button type="submit" class="primary">💾 Save Changes</button>
</form>
<hr>
<h3>📊 Statistics</h3>
<div class="columns">
<div><div class="metric-label">Total Plans</div><div class="metric">{total}</div></div>
<div><div class="metric-label">Meal Plans</div><div class="metric">{meal}</div></div>
<div><div class="metric-label">Exercise Plans</div><div class="metric">{exercise}</div></div>
</div>"#,
        username = escape_html(username),
        email = escape_html(email),
        member_since = escape_html(member_since),
        goals = options(FitnessGoal::ALL.iter().map(|g| g.label()), goal.label()),
        levels = options(FitnessLevel::ALL.iter().map(|l| l.label()), level.label()),
        ingredients = field(profile.and_then(|p| p.default_ingredients.as_ref())),
        equipment = field(profile.and_then(|p| p.default_equipment.as_ref())),
        dietary = field(profile.and_then(|p| p.dietary_preferences.as_ref())),
        total = counts.total,
        meal = counts.meal,
        exercise = counts.exercise,
    );

    layout("Profile", session, flashes, &body)
}
