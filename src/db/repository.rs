//! Account repository for foyer.
//!
//! This module provides CRUD operations for accounts in the database.

use sqlx::{QueryBuilder, SqlitePool};

use super::account::{Account, AccountUpdate, NewAccount};
use crate::{FoyerError, Result};

const SELECT_COLUMNS: &str =
    "SELECT id, name, username, address, password, birthday, avatar, created_at FROM accounts";

/// Repository for account CRUD operations.
pub struct AccountRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new AccountRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new account in the database.
    ///
    /// Returns the created account with the assigned ID. A violation of the
    /// username uniqueness constraint surfaces as `DuplicateUsername`.
    pub async fn create(&self, new_account: &NewAccount) -> Result<Account> {
        let result = sqlx::query(
            "INSERT INTO accounts (name, username, address, password, birthday, avatar)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&new_account.name)
        .bind(&new_account.username)
        .bind(&new_account.address)
        .bind(&new_account.password)
        .bind(new_account.birthday)
        .bind(new_account.avatar.as_column())
        .execute(self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db_err| db_err.is_unique_violation())
            {
                FoyerError::DuplicateUsername(new_account.username.clone())
            } else {
                FoyerError::Database(e.to_string())
            }
        })?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| FoyerError::NotFound("account".to_string()))
    }

    /// Get an account by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Account>> {
        let result = sqlx::query_as::<_, Account>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| FoyerError::Database(e.to_string()))?;

        Ok(result)
    }

    /// Get an account by username.
    pub async fn get_by_username(&self, username: &str) -> Result<Option<Account>> {
        let result = sqlx::query_as::<_, Account>(&format!("{SELECT_COLUMNS} WHERE username = ?"))
            .bind(username)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| FoyerError::Database(e.to_string()))?;

        Ok(result)
    }

    /// Update an account by ID.
    ///
    /// Only fields that are set in the update will be modified.
    /// Returns the updated account, or None if not found.
    pub async fn update(&self, id: i64, update: &AccountUpdate) -> Result<Option<Account>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE accounts SET ");
        let mut separated = query.separated(", ");

        if let Some(ref name) = update.name {
            separated.push("name = ");
            separated.push_bind_unseparated(name);
        }
        if let Some(ref address) = update.address {
            separated.push("address = ");
            separated.push_bind_unseparated(address.clone());
        }
        if let Some(ref password) = update.password {
            separated.push("password = ");
            separated.push_bind_unseparated(password);
        }
        if let Some(ref birthday) = update.birthday {
            separated.push("birthday = ");
            separated.push_bind_unseparated(*birthday);
        }
        if let Some(ref avatar) = update.avatar {
            separated.push("avatar = ");
            separated.push_bind_unseparated(avatar.as_column().map(|s| s.to_string()));
        }

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query
            .build()
            .execute(self.pool)
            .await
            .map_err(|e| FoyerError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Avatar, Database};
    use chrono::NaiveDate;

    async fn setup() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_account() {
        let db = setup().await;
        let repo = AccountRepository::new(db.pool());

        let new_account = NewAccount::new("Alice Example", "alice", "hash")
            .with_address("1 Example Street")
            .with_birthday(NaiveDate::from_ymd_opt(1990, 6, 15).unwrap());

        let created = repo.create(&new_account).await.unwrap();
        assert!(created.id > 0);
        assert_eq!(created.name, "Alice Example");
        assert_eq!(created.username, "alice");
        assert_eq!(created.address, Some("1 Example Street".to_string()));
        assert_eq!(created.birthday, NaiveDate::from_ymd_opt(1990, 6, 15));
        assert_eq!(created.avatar, Avatar::Default);

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.username, "alice");

        let by_username = repo.get_by_username("alice").await.unwrap().unwrap();
        assert_eq!(by_username.id, created.id);
    }

    #[tokio::test]
    async fn test_get_missing_account() {
        let db = setup().await;
        let repo = AccountRepository::new(db.pool());

        assert!(repo.get_by_id(999).await.unwrap().is_none());
        assert!(repo.get_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let db = setup().await;
        let repo = AccountRepository::new(db.pool());

        repo.create(&NewAccount::new("First", "taken", "hash1"))
            .await
            .unwrap();

        let result = repo.create(&NewAccount::new("Second", "taken", "hash2")).await;

        assert!(matches!(result, Err(FoyerError::DuplicateUsername(u)) if u == "taken"));

        // No second record was created
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE username = ?")
            .bind("taken")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_update_partial_fields() {
        let db = setup().await;
        let repo = AccountRepository::new(db.pool());

        let created = repo
            .create(&NewAccount::new("Old Name", "updater", "oldhash"))
            .await
            .unwrap();

        let update = AccountUpdate::new()
            .name("New Name")
            .address(Some("New Address".to_string()));
        let updated = repo.update(created.id, &update).await.unwrap().unwrap();

        assert_eq!(updated.name, "New Name");
        assert_eq!(updated.address, Some("New Address".to_string()));
        // Unchanged fields
        assert_eq!(updated.password, "oldhash");
        assert_eq!(updated.avatar, Avatar::Default);
    }

    #[tokio::test]
    async fn test_update_password_only() {
        let db = setup().await;
        let repo = AccountRepository::new(db.pool());

        let created = repo
            .create(&NewAccount::new("User", "pwchanger", "oldhash"))
            .await
            .unwrap();

        let update = AccountUpdate::new().password("newhash");
        let updated = repo.update(created.id, &update).await.unwrap().unwrap();

        assert_eq!(updated.password, "newhash");
        assert_eq!(updated.name, "User");
    }

    #[tokio::test]
    async fn test_update_avatar_and_clear_birthday() {
        let db = setup().await;
        let repo = AccountRepository::new(db.pool());

        let created = repo
            .create(
                &NewAccount::new("User", "avatars", "hash")
                    .with_birthday(NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()),
            )
            .await
            .unwrap();

        let update = AccountUpdate::new()
            .avatar(Avatar::Custom("avatars_20240101120000.png".to_string()))
            .birthday(None);
        let updated = repo.update(created.id, &update).await.unwrap().unwrap();

        assert_eq!(
            updated.avatar,
            Avatar::Custom("avatars_20240101120000.png".to_string())
        );
        assert_eq!(updated.birthday, None);
    }

    #[tokio::test]
    async fn test_update_empty_is_noop() {
        let db = setup().await;
        let repo = AccountRepository::new(db.pool());

        let created = repo
            .create(&NewAccount::new("User", "noop", "hash"))
            .await
            .unwrap();

        let updated = repo
            .update(created.id, &AccountUpdate::new())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "User");
    }

    #[tokio::test]
    async fn test_update_missing_account() {
        let db = setup().await;
        let repo = AccountRepository::new(db.pool());

        let update = AccountUpdate::new().name("Ghost");
        assert!(repo.update(999, &update).await.unwrap().is_none());
    }
}
