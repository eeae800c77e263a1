//! Request handlers for the foyer web UI.

mod auth;
mod profile;

pub use auth::{home, login, login_form, logout, register, register_form};
pub use profile::{edit_profile, edit_profile_form, profile};

use std::sync::Arc;

use axum::extract::multipart::{Field, Multipart};
use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use chrono::NaiveDate;

use crate::avatar::AvatarStore;
use crate::db::Database;
use crate::web::error::PageError;

/// Application state shared across handlers.
pub struct AppState {
    /// Database handle.
    pub db: Database,
    /// Avatar file storage.
    pub avatars: AvatarStore,
    /// Session lifetime in minutes (sliding window).
    pub session_ttl_minutes: u64,
    /// Maximum request body size in bytes.
    pub max_upload_bytes: usize,
    /// Key for signing session and flash cookies.
    cookie_key: Key,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The session secret must be at least 32 bytes; `Config::validate`
    /// enforces this before the server is constructed.
    pub fn new(
        db: Database,
        avatars: AvatarStore,
        session_secret: &str,
        session_ttl_minutes: u64,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            db,
            avatars,
            session_ttl_minutes,
            max_upload_bytes,
            cookie_key: Key::derive_from(session_secret.as_bytes()),
        }
    }
}

/// Newtype over the cookie [`Key`].
///
/// `SignedCookieJar` extraction needs the key to implement
/// `FromRef<Arc<AppState>>`, but implementing that directly on the foreign
/// `Key` type violates the orphan rule; the jar is generic over any local
/// key type that converts `Into<Key>`.
#[derive(Clone)]
pub struct CookieKey(Key);

impl From<CookieKey> for Key {
    fn from(key: CookieKey) -> Key {
        key.0
    }
}

impl FromRef<Arc<AppState>> for CookieKey {
    fn from_ref(state: &Arc<AppState>) -> CookieKey {
        CookieKey(state.cookie_key.clone())
    }
}

/// Signed cookie jar keyed by the application state's [`CookieKey`].
pub type SignedCookieJar = axum_extra::extract::SignedCookieJar<CookieKey>;

/// Fields submitted by the register and edit-profile forms.
#[derive(Debug, Default)]
pub(crate) struct ProfileForm {
    pub name: Option<String>,
    pub username: Option<String>,
    pub address: Option<String>,
    pub password: Option<String>,
    pub new_password: Option<String>,
    pub birthday: Option<String>,
    /// Original filename and content of the uploaded image, if any.
    pub image: Option<(String, Vec<u8>)>,
}

/// Read the multipart register/edit form into a `ProfileForm`.
///
/// A file field without a filename (nothing selected in the browser) is
/// treated as no upload. Unknown fields are ignored.
pub(crate) async fn read_form(multipart: &mut Multipart) -> Result<ProfileForm, PageError> {
    let mut form = ProfileForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::debug!("Failed to read multipart field: {}", e);
        PageError::new(e.status(), "Invalid form submission")
    })? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "image" => {
                let filename = field.file_name().map(|s| s.to_string());
                let bytes = field.bytes().await.map_err(|e| {
                    tracing::debug!("Failed to read uploaded file: {}", e);
                    PageError::new(e.status(), "Failed to read uploaded file")
                })?;
                if let Some(filename) = filename.filter(|f| !f.is_empty()) {
                    form.image = Some((filename, bytes.to_vec()));
                }
            }
            "name" => form.name = Some(field_text(field).await?),
            "username" => form.username = Some(field_text(field).await?),
            "address" => form.address = Some(field_text(field).await?),
            "password" => form.password = Some(field_text(field).await?),
            "new_password" => form.new_password = Some(field_text(field).await?),
            "birthday" => form.birthday = Some(field_text(field).await?),
            _ => {}
        }
    }

    Ok(form)
}

async fn field_text(field: Field<'_>) -> Result<String, PageError> {
    field.text().await.map_err(|e| {
        tracing::debug!("Failed to read form field: {}", e);
        PageError::new(e.status(), "Invalid form submission")
    })
}

/// Require a non-empty form field, or fail with a 400 page.
pub(crate) fn required(value: Option<String>, field: &str) -> Result<String, PageError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(crate::FoyerError::Validation(format!("{field} is required")).into()),
    }
}

/// Parse a submitted birthday string.
///
/// A malformed or impossible date (e.g. "1990-02-30") yields None rather
/// than an error; the profile simply renders without an age.
pub(crate) fn parse_birthday(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}
