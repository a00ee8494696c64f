// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Server-rendered pages.
//!
//! Each page is a plain function from session state to an HTML string.
//! User-supplied text always goes through [`escape_html`]; model output goes
//! through [`render_markdown`], which escapes any raw HTML it contains.

pub mod auth;
pub mod history;
pub mod landing;
pub mod planner;
pub mod profile;

use axum::http::StatusCode;
use pulldown_cmark::{Event, Options, Parser};
use std::fmt::Write;

use crate::session::{Flash, Page, Session};

const STYLESHEET: &str = r#"
* { box-sizing: border-box; }
body { margin: 0; font-family: -apple-system, "Segoe UI", Roboto, sans-serif; color: #262730; background: #fff; }
.app { display: flex; min-height: 100vh; }
.sidebar { width: 260px; background: #f0f2f6; padding: 1.5rem 1rem; }
.sidebar form { margin: 0 0 .5rem 0; }
.sidebar .footer { text-align: center; color: gray; font-size: .85em; padding: 1rem; }
main { flex: 1; padding: 2rem 3rem; max-width: 1100px; }
h1 { margin-top: 0; }
hr { border: none; border-top: 1px solid #e6e6e6; margin: 1.5rem 0; }
button { width: 100%; padding: .6rem 1rem; border-radius: 8px; border: 1px solid #d3d3d3; background: #fff; cursor: pointer; font-size: 1rem; }
button.primary { background: #ff4b4b; border-color: #ff4b4b; color: #fff; }
button.inline { width: auto; }
label { display: block; font-weight: 600; margin: .75rem 0 .25rem; }
input, select, textarea { width: 100%; padding: .5rem; border: 1px solid #d3d3d3; border-radius: 6px; font: inherit; }
textarea { min-height: 150px; }
.help { color: #808495; font-size: .85em; }
.columns { display: flex; gap: 2rem; }
.columns > * { flex: 1; }
.flash { padding: .75rem 1rem; border-radius: 6px; margin-bottom: 1rem; }
.flash-success { background: #dff5e3; color: #14532d; }
.flash-info { background: #e1effe; color: #1e3a8a; }
.flash-warning { background: #fff6d5; color: #713f12; }
.flash-error { background: #fde2e2; color: #7f1d1d; }
.hero-section { text-align: center; padding: 3rem 1rem; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); border-radius: 10px; color: #fff; margin-bottom: 2rem; }
.hero-title { font-size: 3rem; font-weight: bold; margin-bottom: 1rem; }
.hero-subtitle { font-size: 1.5rem; margin-bottom: 2rem; opacity: .9; }
.feature-card { background: #f8f9fa; padding: 2rem; border-radius: 10px; text-align: center; margin: 1rem 0; border: 1px solid #e9ecef; }
.feature-icon { font-size: 3rem; margin-bottom: 1rem; }
.feature-title { font-size: 1.5rem; font-weight: bold; margin-bottom: .5rem; color: #333; }
.feature-description { color: #666; }
.cta { text-align: center; padding: 2rem; background: #f8f9fa; border-radius: 10px; }
details.plan { border: 1px solid #e6e6e6; border-radius: 8px; padding: .75rem 1rem; margin-bottom: 1rem; }
details.plan summary { cursor: pointer; font-weight: 600; }
.plan-actions { display: flex; justify-content: flex-end; }
.metric { font-size: 2.25rem; }
.metric-label { color: #808495; }
.result { border: 1px solid #e6e6e6; border-radius: 8px; padding: 1rem 1.5rem; margin-bottom: 1.5rem; }
"#;

/// Escape text for inclusion in HTML content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render model output as Markdown. Embedded HTML is shown as text.
pub fn render_markdown(text: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(text, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::new();
    pulldown_cmark::html::push_html(&mut out, parser);
    out
}

/// A button that posts `page` to the navigation endpoint.
pub fn nav_button(page: Page, label: &str, primary: bool) -> String {
    let class = if primary { "primary" } else { "" };
    format!(
        r#"<form method="post" action="/navigate"><input type="hidden" name="page" value="{}"><button type="submit" class="{}">{}</button></form>"#,
        page.as_str(),
        class,
        escape_html(label)
    )
}

/// `<option>` list with `selected` on the matching value.
pub fn options<'a>(values: impl IntoIterator<Item = &'a str>, selected: &str) -> String {
    values
        .into_iter()
        .map(|value| {
            let marker = if value == selected { " selected" } else { "" };
            format!(
                r#"<option value="{v}"{marker}>{v}</option>"#,
                v = escape_html(value)
            )
        })
        .collect()
}

fn render_flashes(flashes: &[Flash]) -> String {
    flashes
        .iter()
        .map(|flash| {
            format!(
                r#"<div class="flash {}">{}</div>"#,
                flash.level.css_class(),
                escape_html(&flash.message)
            )
        })
        .collect()
}

fn render_sidebar(session: &Session) -> String {
    let username = session.username.as_deref().unwrap_or("there");
    let current = session.current_page;

    let mut out = String::new();
    let _ = write!(
        out,
        r#"<aside class="sidebar"><h3>👋 Welcome, {}!</h3><hr>"#,
        escape_html(username)
    );
    out.push_str(&nav_button(Page::Planner, "🏠 Home", current == Page::Planner));
    out.push_str(&nav_button(Page::History, "📊 History", current == Page::History));
    out.push_str(&nav_button(
        Page::Profile,
        "⚙️ Profile & Settings",
        current == Page::Profile,
    ));
    out.push_str(
        r#"<hr><div class="footer"><p>🏋️ Meal &amp; Exercise Planner</p><p>Powered by Gemini AI</p></div></aside>"#,
    );
    out
}

/// Wrap a page body in the document shell, with the sidebar on signed-in pages.
pub fn layout(title: &str, session: &Session, flashes: &[Flash], body: &str) -> String {
    let sidebar = if session.authenticated && session.current_page.requires_auth() {
        render_sidebar(session)
    } else {
        String::new()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · Meal &amp; Exercise Planner</title>
<style>{css}</style>
</head>
<body>
<div class="app">{sidebar}<main>{flashes}{body}</main></div>
</body>
</html>"#,
        title = escape_html(title),
        css = STYLESHEET,
        sidebar = sidebar,
        flashes = render_flashes(flashes),
        body = body,
    )
}

/// Standalone page for errors that escape a handler.
pub fn error_page(status: StatusCode, message: &str) -> String {
    let session = Session::new(String::new());
    let body = format!(
        r#"<h1>{} {}</h1><p>{}</p><p><a href="/">← Back to the planner</a></p>"#,
        status.as_u16(),
        escape_html(status.canonical_reason().unwrap_or("Error")),
        escape_html(message)
    );
    layout("Error", &session, &[], &body)
}
