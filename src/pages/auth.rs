// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-in and sign-up forms.

use super::{escape_html, layout, nav_button};
use crate::session::{Flash, Page, Session};

/// Render the auth page. `login_label` names what the sign-in field accepts.
pub fn render(session: &Session, flashes: &[Flash], login_label: &str) -> String {
    let login_label = escape_html(login_label);

    let mut body = format!(
        r#"<h1>🔐 Welcome to Meal &amp; Exercise Planner</h1>
<div class="columns">
<section>
<h3>Sign In to Your Account</h3>
<form method="post" action="/auth/sign-in">
<label for="login">{login_label}</label>
<input id="login" name="login" type="text" autocomplete="username">
<label for="password">Password</label>
<input id="password" name="password" type="password" autocomplete="current-password">
<p><button type="submit" class="primary">Sign In</button></p>
</form>
</section>
<section>
<h3>Create a New Account</h3>
<form method="post" action="/auth/sign-up">
<label for="username">Username</label>
<input id="username" name="username" type="text" autocomplete="username">
<label for="email">Email Address</label>
<input id="email" name="email" type="email" autocomplete="email">
<label for="new-password">Password</label>
<input id="new-password" name="password" type="password" autocomplete="new-password">
<label for="confirm-password">Confirm Password</label>
<input id="confirm-password" name="confirm_password" type="password" autocomplete="new-password">
<p><button type="submit" class="primary">Sign Up</button></p>
</form>
</section>
</div>
<hr>"#
    );
    body.push_str(&nav_button(Page::Landing, "← Back to Home", false));

    layout("Sign In", session, flashes, &body)
}
