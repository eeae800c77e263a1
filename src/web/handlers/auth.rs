//! Registration, login, and logout handlers.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use super::SignedCookieJar;
use serde::Deserialize;

use crate::auth::{hash_password, verify_password, Session};
use crate::db::{AccountRepository, Avatar, NewAccount};
use crate::web::error::PageError;
use crate::web::flash::Flash;
use crate::web::handlers::{parse_birthday, read_form, required, AppState};
use crate::web::pages;
use crate::FoyerError;

/// GET / - redirect to the profile when logged in, otherwise to login.
///
/// An active session slides its expiration window here like on any other
/// authenticated request.
pub async fn home(State(state): State<Arc<AppState>>, jar: SignedCookieJar) -> Response {
    match Session::load(&jar) {
        Some(session) => {
            let jar = refresh_session(&state, session, jar);
            (jar, Redirect::to("/profile")).into_response()
        }
        None => Redirect::to("/login").into_response(),
    }
}

/// Slide the session window forward and re-issue the cookie.
fn refresh_session(state: &AppState, mut session: Session, jar: SignedCookieJar) -> SignedCookieJar {
    session.refresh(state.session_ttl_minutes);
    session.store(jar)
}

/// GET /register - render the registration form.
pub async fn register_form(jar: SignedCookieJar) -> Response {
    let (jar, flash) = Flash::take(jar);
    (jar, Html(pages::register_page(flash.as_ref()))).into_response()
}

/// POST /register - create a new account.
///
/// Required fields missing from the form yield a 400 page. A taken username
/// flashes a warning and redirects back to the form. An uploaded image with
/// a disallowed extension is skipped without failing the registration.
pub async fn register(
    State(state): State<Arc<AppState>>,
    jar: SignedCookieJar,
    mut multipart: Multipart,
) -> Result<Response, PageError> {
    let form = read_form(&mut multipart).await?;

    let name = required(form.name, "name")?;
    let username = required(form.username, "username")?;
    let password = required(form.password, "password")?;

    let repo = AccountRepository::new(state.db.pool());

    // Friendly pre-check; the UNIQUE constraint still backstops races.
    if repo.get_by_username(&username).await?.is_some() {
        tracing::info!(username = %username, "Registration rejected: username taken");
        let jar = Flash::danger("Username already exists!").set(jar);
        return Ok((jar, Redirect::to("/register")).into_response());
    }

    // Hash before touching the filesystem so a hash failure can't leave
    // an orphaned upload behind.
    let password_hash = hash_password(&password).map_err(|e| {
        tracing::error!("Failed to hash password: {}", e);
        PageError::internal("An internal error occurred")
    })?;

    let mut avatar = Avatar::Default;
    let mut upload_skipped = false;
    if let Some((original_name, content)) = &form.image {
        match state.avatars.save(content, &username, original_name)? {
            Some(stored_name) => avatar = Avatar::Custom(stored_name),
            None => {
                tracing::info!(
                    username = %username,
                    original_name = %original_name,
                    "Skipping avatar upload: extension not allowed"
                );
                upload_skipped = true;
            }
        }
    }

    let mut new_account =
        NewAccount::new(name, username.as_str(), password_hash).with_avatar(avatar.clone());
    if let Some(address) = form.address.filter(|a| !a.trim().is_empty()) {
        new_account = new_account.with_address(address);
    }
    if let Some(birthday) = form.birthday.as_deref().and_then(parse_birthday) {
        new_account = new_account.with_birthday(birthday);
    }

    match repo.create(&new_account).await {
        Ok(account) => {
            tracing::info!(username = %account.username, id = account.id, "Account registered");
            let flash = if upload_skipped {
                Flash::warning(
                    "Registration successful, but the image was skipped (unsupported file type). Please login.",
                )
            } else {
                Flash::success("Registration successful! Please login.")
            };
            Ok((flash.set(jar), Redirect::to("/login")).into_response())
        }
        Err(FoyerError::DuplicateUsername(_)) => {
            // Lost the race after the pre-check; don't leave the file behind.
            remove_orphaned_upload(&state, &avatar);
            let jar = Flash::danger("Username already exists!").set(jar);
            Ok((jar, Redirect::to("/register")).into_response())
        }
        Err(e) => {
            remove_orphaned_upload(&state, &avatar);
            Err(e.into())
        }
    }
}

/// Delete an avatar file written for an account that was never created.
fn remove_orphaned_upload(state: &AppState, avatar: &Avatar) {
    if let Some(stored_name) = avatar.filename() {
        if let Err(e) = state.avatars.delete(stored_name) {
            tracing::warn!("Failed to remove orphaned avatar {}: {}", stored_name, e);
        }
    }
}

/// Login form fields. Optional so a partial submission renders a flash
/// instead of a bare extractor rejection.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// GET /login - render the login form.
///
/// An already-logged-in visitor is bounced to the profile with a refreshed
/// session.
pub async fn login_form(State(state): State<Arc<AppState>>, jar: SignedCookieJar) -> Response {
    if let Some(session) = Session::load(&jar) {
        let jar = refresh_session(&state, session, jar);
        return (jar, Redirect::to("/profile")).into_response();
    }
    let (jar, flash) = Flash::take(jar);
    (jar, Html(pages::login_page(flash.as_ref()))).into_response()
}

/// POST /login - authenticate and start a session.
///
/// The failure message never says whether the username or the password was
/// wrong.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, PageError> {
    if let Some(session) = Session::load(&jar) {
        let jar = refresh_session(&state, session, jar);
        return Ok((jar, Redirect::to("/profile")).into_response());
    }

    let (username, password) = match (form.username, form.password) {
        (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => (u, p),
        _ => return Ok(login_failed(jar)),
    };

    let repo = AccountRepository::new(state.db.pool());
    let account = match repo.get_by_username(&username).await? {
        Some(account) if verify_password(&password, &account.password).is_ok() => account,
        _ => {
            tracing::info!(username = %username, "Login failed");
            return Ok(login_failed(jar));
        }
    };

    tracing::info!(username = %account.username, id = account.id, "Login successful");

    let session = Session::new(&account, state.session_ttl_minutes);
    let jar = session.store(jar);
    let jar = Flash::success(format!("Welcome back, {}!", account.name)).set(jar);
    Ok((jar, Redirect::to("/profile")).into_response())
}

fn login_failed(jar: SignedCookieJar) -> Response {
    let jar = Flash::danger("Login failed. Please check your username and password.").set(jar);
    (jar, Redirect::to("/login")).into_response()
}

/// GET /logout - end the session.
///
/// Safe to call without an active session.
pub async fn logout(jar: SignedCookieJar) -> Response {
    let jar = Session::clear(jar);
    let jar = Flash::info("You have been logged out.").set(jar);
    (jar, Redirect::to("/login")).into_response()
}
