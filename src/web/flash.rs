//! One-shot flash messages for the foyer web UI.
//!
//! A flash is written to a signed cookie on one response and consumed
//! (read + removed) by the next page render.

use axum_extra::extract::cookie::{Cookie, SameSite};

use crate::web::handlers::SignedCookieJar;
use serde::{Deserialize, Serialize};

/// Name of the flash cookie.
pub const FLASH_COOKIE: &str = "foyer_flash";

/// Flash message severity, mapped to a CSS class in the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Warning,
    Danger,
}

impl FlashLevel {
    /// CSS class used by the page layout.
    pub fn css_class(&self) -> &'static str {
        match self {
            FlashLevel::Success => "flash-success",
            FlashLevel::Info => "flash-info",
            FlashLevel::Warning => "flash-warning",
            FlashLevel::Danger => "flash-danger",
        }
    }
}

/// A one-shot message shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    /// Severity level.
    pub level: FlashLevel,
    /// Message text.
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Warning,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Danger,
            message: message.into(),
        }
    }

    /// Write this flash to the cookie jar.
    pub fn set(&self, jar: SignedCookieJar) -> SignedCookieJar {
        let payload = serde_json::to_string(self).unwrap_or_default();
        let cookie = Cookie::build((FLASH_COOKIE, payload))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax);
        jar.add(cookie)
    }

    /// Consume the pending flash, removing it from the jar.
    pub fn take(jar: SignedCookieJar) -> (SignedCookieJar, Option<Flash>) {
        let flash = jar
            .get(FLASH_COOKIE)
            .and_then(|cookie| serde_json::from_str(cookie.value()).ok());

        if flash.is_some() {
            let jar = jar.remove(Cookie::build((FLASH_COOKIE, "")).path("/"));
            return (jar, flash);
        }
        (jar, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_constructors() {
        assert_eq!(Flash::success("ok").level, FlashLevel::Success);
        assert_eq!(Flash::info("fyi").level, FlashLevel::Info);
        assert_eq!(Flash::warning("careful").level, FlashLevel::Warning);
        assert_eq!(Flash::danger("nope").level, FlashLevel::Danger);
    }

    #[test]
    fn test_css_classes() {
        assert_eq!(FlashLevel::Success.css_class(), "flash-success");
        assert_eq!(FlashLevel::Danger.css_class(), "flash-danger");
    }

    #[test]
    fn test_flash_json_round_trip() {
        let flash = Flash::danger("Username already exists!");

        let json = serde_json::to_string(&flash).unwrap();
        let parsed: Flash = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, flash);
    }
}
