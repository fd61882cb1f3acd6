//! HTML pages. Every interpolated value goes through `html_escape`.

use axum::response::Html;
use html_escape::encode_text;
use std::fmt::Write;

use crate::services::LandingView;

fn layout(title: &str, flash: Option<&str>, body: &str) -> Html<String> {
    let flash = flash.map_or_else(String::new, |message| {
        format!(r#"<p class="flash">{}</p>"#, encode_text(message))
    });

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="/styles.css">
</head>
<body>
<main>
{flash}
{body}
</main>
</body>
</html>
"#,
        title = encode_text(title),
    ))
}

fn error_block(error: Option<&str>) -> String {
    error.map_or_else(String::new, |message| {
        format!(r#"<p class="error">{}</p>"#, encode_text(message))
    })
}

#[must_use]
pub fn index(flash: Option<&str>) -> Html<String> {
    layout(
        "Welcome",
        flash,
        r#"<h1>Welcome</h1>
<p>Please log in or create an account to continue.</p>
<nav>
<a href="/login">Log in</a>
<a href="/signup">Sign up</a>
</nav>"#,
    )
}

#[must_use]
pub fn signup(flash: Option<&str>, error: Option<&str>) -> Html<String> {
    let body = format!(
        r#"<h1>Sign up</h1>
{error}
<form method="post" action="/signup">
<label>Username <input type="text" name="username" required></label>
<label>Email <input type="email" name="email" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Create account</button>
</form>
<p>Already registered? <a href="/login">Log in</a></p>"#,
        error = error_block(error),
    );

    layout("Sign up", flash, &body)
}

#[must_use]
pub fn login(flash: Option<&str>, error: Option<&str>) -> Html<String> {
    let body = format!(
        r#"<h1>Log in</h1>
{error}
<form method="post" action="/login">
<label>Email <input type="email" name="email" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Log in</button>
</form>
<p>No account yet? <a href="/signup">Sign up</a></p>"#,
        error = error_block(error),
    );

    layout("Log in", flash, &body)
}

#[must_use]
pub fn landing(flash: Option<&str>, view: &LandingView) -> Html<String> {
    let mut body = format!(
        r#"<h1>Welcome, {username}</h1>
<p>Signed in as {email} ({role}).</p>
"#,
        username = encode_text(&view.user.username),
        email = encode_text(&view.user.email),
        role = view.user.role,
    );

    if view.user.role.is_admin() {
        body.push_str(
            "<h2>All users</h2>\n<table>\n<thead><tr><th>ID</th><th>Username</th><th>Email</th><th>Role</th></tr></thead>\n<tbody>\n",
        );
        for user in &view.users {
            let _ = writeln!(
                body,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                user.id,
                encode_text(&user.username),
                encode_text(&user.email),
                user.role,
            );
        }
        body.push_str("</tbody>\n</table>\n");
    } else {
        body.push_str("<p>You have standard user access.</p>\n");
    }

    body.push_str(r#"<a href="/logout">Log out</a>"#);

    layout("Dashboard", flash, &body)
}

#[must_use]
pub fn not_found(title: &str) -> Html<String> {
    let body = format!(
        r#"<h1>{}</h1>
<p>The page you are looking for does not exist.</p>
<a href="/">Back to home</a>"#,
        encode_text(title),
    );

    layout(title, None, &body)
}

#[must_use]
pub fn error_page(message: &str) -> Html<String> {
    let body = format!(
        r#"<h1>Error</h1>
<p class="error">{}</p>
<a href="/">Back to home</a>"#,
        encode_text(message),
    );

    layout("Error", None, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, SessionPrincipal, UserRecord};

    fn principal(role: Role) -> SessionPrincipal {
        SessionPrincipal {
            id: 1,
            username: "<script>alert(1)</script>".to_string(),
            email: "admin@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_values_are_escaped() {
        let view = LandingView {
            user: principal(Role::User),
            users: Vec::new(),
        };

        let Html(html) = landing(None, &view);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_admin_landing_lists_users_without_hashes() {
        let view = LandingView {
            user: principal(Role::Admin),
            users: vec![UserRecord {
                id: 2,
                username: "RegularUser".to_string(),
                email: "user@example.com".to_string(),
                password_hash: "$argon2id$secret".to_string(),
                role: Role::User,
            }],
        };

        let Html(html) = landing(None, &view);
        assert!(html.contains("user@example.com"));
        assert!(html.contains("All users"));
        assert!(!html.contains("$argon2id$"));
    }

    #[test]
    fn test_forms_show_error_and_flash() {
        let Html(html) = login(Some("Successfully logged out."), Some("Invalid email or password."));
        assert!(html.contains(r#"class="flash""#));
        assert!(html.contains("Invalid email or password."));

        let Html(html) = signup(None, None);
        assert!(!html.contains(r#"class="error""#));
        assert!(!html.contains(r#"class="flash""#));
    }
}
