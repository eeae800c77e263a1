//! Account model for foyer.
//!
//! This module defines the Account struct and the Avatar tagged state.

use chrono::{Datelike, NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

/// Avatar state for an account.
///
/// An account either has no custom avatar (the default placeholder is shown)
/// or references an uploaded file by its stored filename. Stored as a
/// nullable column; NULL means `Default`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Avatar {
    /// No custom avatar uploaded.
    #[default]
    Default,
    /// Custom avatar, referenced by stored filename.
    Custom(String),
}

impl Avatar {
    /// Build from the nullable database column.
    pub fn from_column(value: Option<String>) -> Self {
        match value {
            Some(filename) if !filename.is_empty() => Avatar::Custom(filename),
            _ => Avatar::Default,
        }
    }

    /// The value to store in the database column.
    pub fn as_column(&self) -> Option<&str> {
        match self {
            Avatar::Default => None,
            Avatar::Custom(filename) => Some(filename),
        }
    }

    /// The stored filename, if a custom avatar is set.
    pub fn filename(&self) -> Option<&str> {
        self.as_column()
    }

    /// Whether a custom avatar is set.
    pub fn is_custom(&self) -> bool {
        matches!(self, Avatar::Custom(_))
    }
}

/// Account entity representing a registered user.
#[derive(Debug, Clone)]
pub struct Account {
    /// Unique account ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Login username (unique).
    pub username: String,
    /// Postal address (optional).
    pub address: Option<String>,
    /// Password hash (Argon2).
    pub password: String,
    /// Birthday (optional).
    pub birthday: Option<NaiveDate>,
    /// Avatar state.
    pub avatar: Avatar,
    /// Account creation timestamp.
    pub created_at: String,
}

impl Account {
    /// Derive the account holder's age on the given date.
    ///
    /// Returns None if no birthday is set.
    pub fn age_on(&self, today: NaiveDate) -> Option<i32> {
        let birthday = self.birthday?;
        let mut age = today.year() - birthday.year();
        if (today.month(), today.day()) < (birthday.month(), birthday.day()) {
            age -= 1;
        }
        Some(age)
    }

    /// Derive the account holder's current age.
    pub fn age(&self) -> Option<i32> {
        self.age_on(Utc::now().date_naive())
    }
}

impl<'r> sqlx::FromRow<'r, SqliteRow> for Account {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            username: row.try_get("username")?,
            address: row.try_get("address")?,
            password: row.try_get("password")?,
            birthday: row.try_get("birthday")?,
            avatar: Avatar::from_column(row.try_get("avatar")?),
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Data for creating a new account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Display name.
    pub name: String,
    /// Login username.
    pub username: String,
    /// Postal address (optional).
    pub address: Option<String>,
    /// Password hash (should be pre-hashed with Argon2).
    pub password: String,
    /// Birthday (optional).
    pub birthday: Option<NaiveDate>,
    /// Avatar state (defaults to no custom avatar).
    pub avatar: Avatar,
}

impl NewAccount {
    /// Create a new account with minimal required fields.
    pub fn new(
        name: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            username: username.into(),
            address: None,
            password: password.into(),
            birthday: None,
            avatar: Avatar::Default,
        }
    }

    /// Set the postal address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Set the birthday.
    pub fn with_birthday(mut self, birthday: NaiveDate) -> Self {
        self.birthday = Some(birthday);
        self
    }

    /// Set the avatar state.
    pub fn with_avatar(mut self, avatar: Avatar) -> Self {
        self.avatar = avatar;
        self
    }
}

/// Data for updating an existing account.
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New postal address (outer None = unchanged, inner None = cleared).
    pub address: Option<Option<String>>,
    /// New password hash (if changing password).
    pub password: Option<String>,
    /// New birthday (outer None = unchanged, inner None = cleared).
    pub birthday: Option<Option<NaiveDate>>,
    /// New avatar state.
    pub avatar: Option<Avatar>,
}

impl AccountUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set new display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set new address.
    pub fn address(mut self, address: Option<String>) -> Self {
        self.address = Some(address);
        self
    }

    /// Set new password hash.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set new birthday.
    pub fn birthday(mut self, birthday: Option<NaiveDate>) -> Self {
        self.birthday = Some(birthday);
        self
    }

    /// Set new avatar state.
    pub fn avatar(mut self, avatar: Avatar) -> Self {
        self.avatar = Some(avatar);
        self
    }

    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.address.is_none()
            && self.password.is_none()
            && self.birthday.is_none()
            && self.avatar.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_account() -> Account {
        Account {
            id: 1,
            name: "Test User".to_string(),
            username: "test".to_string(),
            address: None,
            password: "hash".to_string(),
            birthday: None,
            avatar: Avatar::Default,
            created_at: "2024-01-01 00:00:00".to_string(),
        }
    }

    #[test]
    fn test_avatar_from_column() {
        assert_eq!(Avatar::from_column(None), Avatar::Default);
        assert_eq!(Avatar::from_column(Some(String::new())), Avatar::Default);
        assert_eq!(
            Avatar::from_column(Some("a_20240101.png".to_string())),
            Avatar::Custom("a_20240101.png".to_string())
        );
    }

    #[test]
    fn test_avatar_as_column() {
        assert_eq!(Avatar::Default.as_column(), None);
        assert_eq!(
            Avatar::Custom("x.png".to_string()).as_column(),
            Some("x.png")
        );
    }

    #[test]
    fn test_avatar_is_custom() {
        assert!(!Avatar::Default.is_custom());
        assert!(Avatar::Custom("x.png".to_string()).is_custom());
    }

    #[test]
    fn test_age_without_birthday() {
        let account = sample_account();
        assert_eq!(account.age(), None);
    }

    #[test]
    fn test_age_before_birthday_this_year() {
        let mut account = sample_account();
        account.birthday = NaiveDate::from_ymd_opt(1990, 6, 15);

        let today = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
        assert_eq!(account.age_on(today), Some(33));
    }

    #[test]
    fn test_age_on_birthday() {
        let mut account = sample_account();
        account.birthday = NaiveDate::from_ymd_opt(1990, 6, 15);

        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(account.age_on(today), Some(34));
    }

    #[test]
    fn test_age_after_birthday_this_year() {
        let mut account = sample_account();
        account.birthday = NaiveDate::from_ymd_opt(1990, 6, 15);

        let today = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        assert_eq!(account.age_on(today), Some(34));
    }

    #[test]
    fn test_new_account_builder() {
        let account = NewAccount::new("Test User", "testuser", "hash")
            .with_address("1 Example Street")
            .with_birthday(NaiveDate::from_ymd_opt(1990, 6, 15).unwrap())
            .with_avatar(Avatar::Custom("testuser_20240101120000.png".to_string()));

        assert_eq!(account.name, "Test User");
        assert_eq!(account.username, "testuser");
        assert_eq!(account.password, "hash");
        assert_eq!(account.address, Some("1 Example Street".to_string()));
        assert_eq!(account.birthday, NaiveDate::from_ymd_opt(1990, 6, 15));
        assert!(account.avatar.is_custom());
    }

    #[test]
    fn test_account_update_builder() {
        let update = AccountUpdate::new()
            .name("New Name")
            .address(Some("New Address".to_string()))
            .birthday(None);

        assert!(update.name.is_some());
        assert!(update.address.is_some());
        assert_eq!(update.birthday, Some(None));
        assert!(update.password.is_none());
        assert!(update.avatar.is_none());
        assert!(!update.is_empty());
    }

    #[test]
    fn test_account_update_empty() {
        let update = AccountUpdate::new();
        assert!(update.is_empty());
    }
}
