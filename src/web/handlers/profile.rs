//! Profile view and edit handlers.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use super::SignedCookieJar;

use crate::auth::{hash_password, Session};
use crate::db::{Account, AccountRepository, AccountUpdate, Avatar};
use crate::web::error::PageError;
use crate::web::flash::Flash;
use crate::web::handlers::{parse_birthday, read_form, required, AppState};
use crate::web::pages;

/// Resolve the session to its account, sliding the expiration window.
///
/// On failure (no session, expired, or the account no longer exists) the
/// caller gets a ready-made redirect to the login page.
async fn require_account(
    state: &AppState,
    jar: SignedCookieJar,
) -> Result<(Account, SignedCookieJar), Box<Response>> {
    let Some(mut session) = Session::load(&jar) else {
        let jar = Flash::danger("Please login to access this page.").set(jar);
        return Err(Box::new((jar, Redirect::to("/login")).into_response()));
    };

    let repo = AccountRepository::new(state.db.pool());
    let account = match repo.get_by_id(session.account_id).await {
        Ok(Some(account)) => account,
        Ok(None) => {
            // Stale session for a deleted account.
            tracing::warn!(account_id = session.account_id, "Session account not found");
            let jar = Session::clear(jar);
            let jar = Flash::danger("Account not found. Please login again.").set(jar);
            return Err(Box::new((jar, Redirect::to("/login")).into_response()));
        }
        Err(e) => return Err(Box::new(PageError::from(e).into_response())),
    };

    session.refresh(state.session_ttl_minutes);
    let jar = session.store(jar);

    Ok((account, jar))
}

/// GET /profile - show the logged-in account's profile.
pub async fn profile(State(state): State<Arc<AppState>>, jar: SignedCookieJar) -> Response {
    let (account, jar) = match require_account(&state, jar).await {
        Ok(ok) => ok,
        Err(resp) => return *resp,
    };

    let (jar, flash) = Flash::take(jar);
    let age = account.age();
    (jar, Html(pages::profile_page(flash.as_ref(), &account, age))).into_response()
}

/// GET /edit_profile - render the edit form pre-filled from the account.
pub async fn edit_profile_form(
    State(state): State<Arc<AppState>>,
    jar: SignedCookieJar,
) -> Response {
    let (account, jar) = match require_account(&state, jar).await {
        Ok(ok) => ok,
        Err(resp) => return *resp,
    };

    let (jar, flash) = Flash::take(jar);
    (jar, Html(pages::edit_profile_page(flash.as_ref(), &account))).into_response()
}

/// POST /edit_profile - apply profile changes.
///
/// Address and birthday are overwritten from the form (clearing a field
/// clears the stored value). The password only changes when a new one is
/// submitted. A new avatar replaces the old file on disk; an upload with a
/// disallowed extension is skipped and the prior avatar kept.
pub async fn edit_profile(
    State(state): State<Arc<AppState>>,
    jar: SignedCookieJar,
    mut multipart: Multipart,
) -> Response {
    let (account, jar) = match require_account(&state, jar).await {
        Ok(ok) => ok,
        Err(resp) => return *resp,
    };

    let form = match read_form(&mut multipart).await {
        Ok(form) => form,
        Err(e) => return e.into_response(),
    };

    let name = match required(form.name, "name") {
        Ok(name) => name,
        Err(e) => return e.into_response(),
    };

    let address = form.address.filter(|a| !a.trim().is_empty());
    let birthday = form.birthday.as_deref().and_then(parse_birthday);

    let mut update = AccountUpdate::new()
        .name(name)
        .address(address)
        .birthday(birthday);

    let mut upload_skipped = false;
    let mut new_avatar: Option<String> = None;
    if let Some((original_name, content)) = &form.image {
        match state.avatars.save(content, &account.username, original_name) {
            Ok(Some(stored_name)) => {
                update = update.avatar(Avatar::Custom(stored_name.clone()));
                new_avatar = Some(stored_name);
            }
            Ok(None) => {
                tracing::info!(
                    username = %account.username,
                    original_name = %original_name,
                    "Skipping avatar upload: extension not allowed"
                );
                upload_skipped = true;
            }
            Err(e) => return PageError::from(e).into_response(),
        }
    }

    if let Some(new_password) = form.new_password.filter(|p| !p.is_empty()) {
        match hash_password(&new_password) {
            Ok(hash) => update = update.password(hash),
            Err(e) => {
                tracing::error!("Failed to hash password: {}", e);
                cleanup_upload(&state, new_avatar.as_deref());
                return PageError::internal("An internal error occurred").into_response();
            }
        }
    }

    let repo = AccountRepository::new(state.db.pool());
    match repo.update(account.id, &update).await {
        Ok(Some(updated)) => {
            tracing::info!(username = %updated.username, id = updated.id, "Profile updated");

            // The old custom avatar file is orphaned once replaced.
            if let (Some(new), Some(old)) = (new_avatar.as_deref(), account.avatar.filename()) {
                if new != old {
                    if let Err(e) = state.avatars.delete(old) {
                        tracing::warn!("Failed to remove replaced avatar {}: {}", old, e);
                    }
                }
            }

            let flash = if upload_skipped {
                Flash::warning("Profile updated, but the image was skipped (unsupported file type).")
            } else {
                Flash::success("Profile updated successfully.")
            };
            (flash.set(jar), Redirect::to("/profile")).into_response()
        }
        Ok(None) => {
            // Account vanished between lookup and update.
            cleanup_upload(&state, new_avatar.as_deref());
            let jar = Session::clear(jar);
            let jar = Flash::danger("Account not found. Please login again.").set(jar);
            (jar, Redirect::to("/login")).into_response()
        }
        Err(e) => {
            cleanup_upload(&state, new_avatar.as_deref());
            PageError::from(e).into_response()
        }
    }
}

fn cleanup_upload(state: &AppState, stored_name: Option<&str>) {
    if let Some(stored_name) = stored_name {
        if let Err(e) = state.avatars.delete(stored_name) {
            tracing::warn!("Failed to remove avatar {}: {}", stored_name, e);
        }
    }
}
