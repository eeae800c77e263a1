//! Cookie-backed sessions for foyer.
//!
//! The session is a small JSON payload (account id, username, display name,
//! expiry) carried in a signed cookie. The expiration window slides: every
//! authenticated request re-issues the cookie with a fresh expiry.

use axum_extra::extract::cookie::{Cookie, SameSite};

use crate::web::handlers::SignedCookieJar;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::db::Account;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "foyer_session";

/// Session state identifying the authenticated account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Account ID.
    pub account_id: i64,
    /// Username.
    pub username: String,
    /// Display name.
    pub name: String,
    /// Expiry as a Unix timestamp (seconds).
    pub expires_at: i64,
}

impl Session {
    /// Create a session for the given account with the given lifetime.
    pub fn new(account: &Account, ttl_minutes: u64) -> Self {
        Self {
            account_id: account.id,
            username: account.username.clone(),
            name: account.name.clone(),
            expires_at: expiry_from_now(ttl_minutes),
        }
    }

    /// Whether the session has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now().timestamp()
    }

    /// Slide the expiration window forward.
    pub fn refresh(&mut self, ttl_minutes: u64) {
        self.expires_at = expiry_from_now(ttl_minutes);
    }

    /// Load the session from the cookie jar.
    ///
    /// Returns None when there is no session cookie, the payload doesn't
    /// parse, or the session has expired.
    pub fn load(jar: &SignedCookieJar) -> Option<Self> {
        let cookie = jar.get(SESSION_COOKIE)?;
        let session: Session = serde_json::from_str(cookie.value()).ok()?;
        if session.is_expired() {
            return None;
        }
        Some(session)
    }

    /// Store the session in the cookie jar, replacing any existing one.
    pub fn store(&self, jar: SignedCookieJar) -> SignedCookieJar {
        let payload = serde_json::to_string(self).unwrap_or_default();
        let cookie = Cookie::build((SESSION_COOKIE, payload))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax);
        jar.add(cookie)
    }

    /// Remove the session cookie from the jar.
    pub fn clear(jar: SignedCookieJar) -> SignedCookieJar {
        jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/"))
    }
}

fn expiry_from_now(ttl_minutes: u64) -> i64 {
    (Utc::now() + Duration::minutes(ttl_minutes as i64)).timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Avatar;

    fn sample_account() -> Account {
        Account {
            id: 7,
            name: "Alice Example".to_string(),
            username: "alice".to_string(),
            address: None,
            password: "hash".to_string(),
            birthday: None,
            avatar: Avatar::Default,
            created_at: "2024-01-01 00:00:00".to_string(),
        }
    }

    #[test]
    fn test_session_new() {
        let session = Session::new(&sample_account(), 30);

        assert_eq!(session.account_id, 7);
        assert_eq!(session.username, "alice");
        assert_eq!(session.name, "Alice Example");
        assert!(!session.is_expired());
    }

    #[test]
    fn test_session_expiry() {
        let mut session = Session::new(&sample_account(), 30);
        session.expires_at = Utc::now().timestamp() - 1;

        assert!(session.is_expired());
    }

    #[test]
    fn test_session_refresh_slides_window() {
        let mut session = Session::new(&sample_account(), 30);
        session.expires_at = Utc::now().timestamp() + 10;

        session.refresh(30);

        let expected = (Utc::now() + Duration::minutes(30)).timestamp();
        assert!((session.expires_at - expected).abs() <= 1);
    }

    #[test]
    fn test_session_json_round_trip() {
        let session = Session::new(&sample_account(), 30);

        let json = serde_json::to_string(&session).unwrap();
        let parsed: Session = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.account_id, session.account_id);
        assert_eq!(parsed.username, session.username);
        assert_eq!(parsed.expires_at, session.expires_at);
    }
}
