//! Server-rendered HTML pages for foyer.
//!
//! Plain string rendering with a small escaping helper; the pages are
//! deliberately minimal form/profile markup.

use axum::http::StatusCode;

use crate::db::Account;
use crate::web::flash::Flash;

/// Escape a string for safe inclusion in HTML text or attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

/// Wrap page content in the shared layout, rendering any pending flash.
fn layout(title: &str, flash: Option<&Flash>, body: &str) -> String {
    let flash_html = match flash {
        Some(f) => format!(
            r#"<div class="flash {}">{}</div>"#,
            f.level.css_class(),
            escape(&f.message)
        ),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - foyer</title>
</head>
<body>
<nav><a href="/profile">Profile</a> <a href="/edit_profile">Edit profile</a> <a href="/logout">Logout</a></nav>
{flash_html}
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
    )
}

/// Render the login page.
pub fn login_page(flash: Option<&Flash>) -> String {
    let body = r#"<h1>Login</h1>
<form method="post" action="/login">
  <label>Username <input type="text" name="username" required></label>
  <label>Password <input type="password" name="password" required></label>
  <button type="submit">Login</button>
</form>
<p>No account yet? <a href="/register">Register</a></p>"#;

    layout("Login", flash, body)
}

/// Render the registration page.
pub fn register_page(flash: Option<&Flash>) -> String {
    let body = r#"<h1>Register</h1>
<form method="post" action="/register" enctype="multipart/form-data">
  <label>Name <input type="text" name="name" required></label>
  <label>Username <input type="text" name="username" required></label>
  <label>Address <input type="text" name="address"></label>
  <label>Password <input type="password" name="password" required></label>
  <label>Birthday <input type="date" name="birthday"></label>
  <label>Profile image <input type="file" name="image" accept="image/*"></label>
  <button type="submit">Register</button>
</form>
<p>Already registered? <a href="/login">Login</a></p>"#;

    layout("Register", flash, body)
}

/// Render the profile page for the given account.
pub fn profile_page(flash: Option<&Flash>, account: &Account, age: Option<i32>) -> String {
    let avatar_html = match account.avatar.filename() {
        Some(filename) => format!(
            r#"<img src="/uploads/{}" alt="avatar" width="128">"#,
            escape(filename)
        ),
        None => r#"<p class="no-avatar">No custom avatar</p>"#.to_string(),
    };

    let address_html = match &account.address {
        Some(address) if !address.is_empty() => {
            format!("<dt>Address</dt><dd>{}</dd>", escape(address))
        }
        _ => String::new(),
    };

    let birthday_html = match account.birthday {
        Some(birthday) => format!("<dt>Birthday</dt><dd>{birthday}</dd>"),
        None => String::new(),
    };

    let age_html = match age {
        Some(age) => format!("<dt>Age</dt><dd>{age}</dd>"),
        None => String::new(),
    };

    let body = format!(
        r#"<h1>Welcome, {name}!</h1>
{avatar_html}
<dl>
<dt>Username</dt><dd>{username}</dd>
{address_html}
{birthday_html}
{age_html}
</dl>
<p><a href="/edit_profile">Edit profile</a></p>"#,
        name = escape(&account.name),
        username = escape(&account.username),
    );

    layout("Profile", flash, &body)
}

/// Render the profile edit page, pre-filled from the account.
pub fn edit_profile_page(flash: Option<&Flash>, account: &Account) -> String {
    let birthday_value = account
        .birthday
        .map(|d| d.to_string())
        .unwrap_or_default();

    let body = format!(
        r#"<h1>Edit profile</h1>
<form method="post" action="/edit_profile" enctype="multipart/form-data">
  <label>Name <input type="text" name="name" value="{name}" required></label>
  <label>Address <input type="text" name="address" value="{address}"></label>
  <label>Birthday <input type="date" name="birthday" value="{birthday}"></label>
  <label>New password <input type="password" name="new_password" placeholder="Leave blank to keep current"></label>
  <label>Profile image <input type="file" name="image" accept="image/*"></label>
  <button type="submit">Save</button>
</form>
<p><a href="/profile">Back to profile</a></p>"#,
        name = escape(&account.name),
        address = escape(account.address.as_deref().unwrap_or("")),
        birthday = birthday_value,
    );

    layout("Edit profile", flash, &body)
}

/// Render an error status page.
pub fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        "<h1>{status}</h1>\n<p>{}</p>\n<p><a href=\"/\">Back</a></p>",
        escape(message)
    );

    layout(
        status.canonical_reason().unwrap_or("Error"),
        None,
        &body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Avatar;
    use chrono::NaiveDate;

    fn sample_account() -> Account {
        Account {
            id: 1,
            name: "Alice <script>".to_string(),
            username: "alice".to_string(),
            address: Some("1 Example & Street".to_string()),
            password: "hash".to_string(),
            birthday: NaiveDate::from_ymd_opt(1990, 6, 15),
            avatar: Avatar::Default,
            created_at: "2024-01-01 00:00:00".to_string(),
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(
            escape(r#"<b a="x">&'"#),
            "&lt;b a=&quot;x&quot;&gt;&amp;&#39;"
        );
    }

    #[test]
    fn test_profile_page_escapes_fields() {
        let account = sample_account();
        let html = profile_page(None, &account, Some(34));

        assert!(html.contains("Alice &lt;script&gt;"));
        assert!(html.contains("1 Example &amp; Street"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_profile_page_with_age() {
        let html = profile_page(None, &sample_account(), Some(34));

        assert!(html.contains("<dt>Age</dt><dd>34</dd>"));
        assert!(html.contains("1990-06-15"));
    }

    #[test]
    fn test_profile_page_without_age() {
        let mut account = sample_account();
        account.birthday = None;
        let html = profile_page(None, &account, None);

        assert!(!html.contains("<dt>Age</dt>"));
        assert!(!html.contains("<dt>Birthday</dt>"));
    }

    #[test]
    fn test_profile_page_default_avatar() {
        let html = profile_page(None, &sample_account(), None);
        assert!(html.contains("No custom avatar"));
        assert!(!html.contains("/uploads/"));
    }

    #[test]
    fn test_profile_page_custom_avatar() {
        let mut account = sample_account();
        account.avatar = Avatar::Custom("alice_20240101120000.png".to_string());
        let html = profile_page(None, &account, None);

        assert!(html.contains(r#"src="/uploads/alice_20240101120000.png""#));
    }

    #[test]
    fn test_layout_renders_flash() {
        let flash = Flash::danger("Login failed");
        let html = login_page(Some(&flash));

        assert!(html.contains("flash-danger"));
        assert!(html.contains("Login failed"));
    }

    #[test]
    fn test_edit_page_prefills_values() {
        let html = edit_profile_page(None, &sample_account());

        assert!(html.contains(r#"value="Alice &lt;script&gt;""#));
        assert!(html.contains(r#"value="1990-06-15""#));
        assert!(html.contains("new_password"));
    }

    #[test]
    fn test_error_page() {
        let html = error_page(StatusCode::BAD_REQUEST, "name is required");

        assert!(html.contains("400"));
        assert!(html.contains("name is required"));
    }
}
