use std::fmt::Write as _;

use client_sdk::{DashboardSnapshot, LogEntry, UserPanel};
use common::User;

const STYLE: &str = r#"
        body { font-family: system-ui, sans-serif; margin: 1.5rem; background: #fafafa; }
        main { max-width: 960px; margin: 0 auto; }
        section { background: #fff; border: 1px solid #ddd; border-radius: 8px; padding: 1rem; margin-bottom: 1rem; }
        h1, h2 { margin-top: 0; }
        label { display: block; margin: 0.4rem 0 0.2rem; font-weight: 600; }
        input, button { font: inherit; }
        input { width: 100%; padding: 0.5rem; border: 1px solid #ccc; border-radius: 6px; box-sizing: border-box; }
        .row { display: grid; grid-template-columns: 1fr 1fr; gap: 0.75rem; }
        .actions { margin-top: 0.6rem; display: flex; gap: 0.5rem; flex-wrap: wrap; }
        .actions form { margin: 0; }
        button { padding: 0.5rem 0.8rem; border: 1px solid #888; border-radius: 6px; background: #f5f5f5; cursor: pointer; }
        button.danger { border-color: #b00020; color: #b00020; }
        .status-indicator { display: inline-block; padding: 0.3rem 0.7rem; border-radius: 999px; font-weight: 600; }
        .status-indicator.unknown { background: #eee; }
        .status-indicator.healthy { background: #e3f6e8; color: #137333; }
        .status-indicator.unhealthy { background: #fde7e9; color: #b00020; }
        .users { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 0.75rem; }
        .user-card { border: 1px solid #ddd; border-radius: 6px; padding: 0.6rem 0.8rem; }
        .user-card h3 { margin: 0 0 0.3rem; }
        .user-card p { margin: 0.15rem 0; }
        #response-log { background: #111; color: #f2f2f2; padding: 0.8rem; border-radius: 6px; max-height: 360px; overflow: auto; }
        .log-entry { margin: 0.2rem 0; font-family: monospace; }
        .log-entry.success { color: #7ee787; }
        .log-entry.error { color: #ff7b72; }
        .timestamp { color: #8b949e; margin-right: 0.4rem; }
"#;

/// Renders the whole dashboard page for `snapshot`. Every form posts to an
/// `/actions/...` route that redirects back here.
pub fn render_dashboard(snapshot: &DashboardSnapshot) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <meta http-equiv="refresh" content="30" />
    <title>faultline dashboard</title>
    <style>{style}</style>
</head>
<body>
    <main>
        <h1>faultline dashboard</h1>

        <section>
            <h2>Backend Status</h2>
            <span id="backend-status" class="{status_class}">{status_label}</span>
            <div class="actions">
                <form method="post" action="/actions/health"><button>Check Health</button></form>
            </div>
        </section>

        <section>
            <h2>Add User</h2>
            <form method="post" action="/actions/users">
                <div class="row">
                    <div>
                        <label for="user-name">Name</label>
                        <input id="user-name" name="name" placeholder="Jane Doe" value="{form_name}" />
                    </div>
                    <div>
                        <label for="user-email">Email</label>
                        <input id="user-email" name="email" placeholder="jane@example.com" value="{form_email}" />
                    </div>
                </div>
                <div class="actions"><button>Add User</button></div>
            </form>
        </section>

        <section>
            <h2>Users</h2>
            <div class="actions">
                <form method="post" action="/actions/users/reload"><button>Reload Users</button></form>
            </div>
            <div id="users-container" class="users">{users}</div>
        </section>

        <section>
            <h2>Crash Demo</h2>
            <div class="actions">
                <form method="post" action="/actions/crash"><button class="danger">Trigger Crash (value=0)</button></form>
                <form method="post" action="/actions/calculate"><button>Safe Calculation (value=5)</button></form>
            </div>
        </section>

        <section>
            <h2>Response Log</h2>
            <div id="response-log">{log}</div>
        </section>
    </main>
</body>
</html>
"#,
        style = STYLE,
        status_class = snapshot.health.css_class(),
        status_label = escape_html(snapshot.health.label()),
        form_name = escape_html(&snapshot.form.name),
        form_email = escape_html(&snapshot.form.email),
        users = render_users(&snapshot.users),
        log = render_log(snapshot.log.entries(), snapshot.log.placeholder()),
    )
}

pub fn render_users(panel: &UserPanel) -> String {
    if let Some(placeholder) = panel.placeholder() {
        return format!("<p>{}</p>", escape_html(placeholder));
    }

    panel.cards().iter().map(render_user_card).collect()
}

pub fn render_user_card(user: &User) -> String {
    format!(
        r#"
                <div class="user-card">
                    <h3>{}</h3>
                    <p>📧 {}</p>
                    <p>🆔 ID: {}</p>
                </div>"#,
        escape_html(&user.name),
        escape_html(&user.email),
        user.id,
    )
}

fn render_log<'a>(
    entries: impl Iterator<Item = &'a LogEntry>,
    placeholder: Option<&str>,
) -> String {
    if let Some(placeholder) = placeholder {
        return format!(r#"<p class="log-entry info">{}</p>"#, escape_html(placeholder));
    }

    let mut html = String::new();
    for entry in entries {
        let _ = write!(
            html,
            r#"<p class="log-entry {}"><span class="timestamp">[{}]</span>{}</p>"#,
            entry.severity.as_str(),
            escape_html(&entry.timestamp),
            escape_html(&entry.message),
        );
    }
    html
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
