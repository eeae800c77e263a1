//! Avatar file storage for foyer.
//!
//! Uploaded avatar images live in a flat directory. Stored names are built
//! from the sanitized owner username plus a UTC timestamp at second
//! precision, keeping the original file extension:
//!
//! ```text
//! {base_path}/alice_20240615093000.png
//! ```
//!
//! Only whitelisted extensions are accepted; anything else is reported as
//! rejected so the caller can keep the prior avatar.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::{FoyerError, Result};

/// Storage service for avatar image files.
#[derive(Debug, Clone)]
pub struct AvatarStore {
    /// Base directory for uploads.
    base_path: PathBuf,
    /// Allowed file extensions (lowercase, without the dot).
    allowed_extensions: Vec<String>,
}

impl AvatarStore {
    /// Create a new AvatarStore with the given base path.
    ///
    /// The base directory will be created if it doesn't exist.
    pub fn new(base_path: impl Into<PathBuf>, allowed_extensions: Vec<String>) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;

        Ok(Self {
            base_path,
            allowed_extensions,
        })
    }

    /// Get the base path of this storage.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Check whether the original filename carries an allowed extension.
    ///
    /// Returns the lowercase extension when allowed.
    pub fn allowed_extension(&self, original_name: &str) -> Option<String> {
        let ext = extension_of(original_name)?;
        if self.allowed_extensions.iter().any(|a| *a == ext) {
            Some(ext)
        } else {
            None
        }
    }

    /// Save an uploaded avatar for the given username.
    ///
    /// Returns `Ok(Some(stored_name))` when the file was written, or
    /// `Ok(None)` when the extension is not allowed and the upload was
    /// skipped.
    pub fn save(&self, content: &[u8], username: &str, original_name: &str) -> Result<Option<String>> {
        let Some(ext) = self.allowed_extension(original_name) else {
            return Ok(None);
        };

        let stored_name = format!(
            "{}_{}.{ext}",
            sanitize_username(username),
            Utc::now().format("%Y%m%d%H%M%S")
        );

        fs::write(self.path_for(&stored_name), content)?;
        Ok(Some(stored_name))
    }

    /// Load a stored avatar's content.
    pub fn load(&self, stored_name: &str) -> Result<Vec<u8>> {
        match fs::read(self.path_for(stored_name)) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(FoyerError::NotFound(format!("avatar {stored_name}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a stored avatar file.
    ///
    /// Returns `true` if the file was deleted, `false` if it didn't exist.
    pub fn delete(&self, stored_name: &str) -> Result<bool> {
        match fs::remove_file(self.path_for(stored_name)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Check if a stored avatar exists.
    pub fn exists(&self, stored_name: &str) -> bool {
        self.path_for(stored_name).exists()
    }

    /// Get the full path for a stored name.
    pub fn path_for(&self, stored_name: &str) -> PathBuf {
        self.base_path.join(stored_name)
    }
}

/// Reduce a username to filesystem-safe characters.
///
/// Anything outside `[A-Za-z0-9._-]` is replaced with `_`.
fn sanitize_username(username: &str) -> String {
    username
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Extract the lowercase extension from a filename.
fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn default_extensions() -> Vec<String> {
        ["png", "jpg", "jpeg", "gif"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn setup_store() -> (TempDir, AvatarStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = AvatarStore::new(temp_dir.path(), default_extensions()).unwrap();
        (temp_dir, store)
    }

    #[test]
    fn test_new_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store_path = temp_dir.path().join("uploads");

        assert!(!store_path.exists());

        let store = AvatarStore::new(&store_path, default_extensions()).unwrap();

        assert!(store_path.exists());
        assert_eq!(store.base_path(), store_path);
    }

    #[test]
    fn test_allowed_extension_whitelist() {
        let (_temp_dir, store) = setup_store();

        assert_eq!(store.allowed_extension("photo.png"), Some("png".to_string()));
        assert_eq!(store.allowed_extension("photo.JPG"), Some("jpg".to_string()));
        assert_eq!(store.allowed_extension("a.b.jpeg"), Some("jpeg".to_string()));
        assert_eq!(store.allowed_extension("malware.exe"), None);
        assert_eq!(store.allowed_extension("noextension"), None);
    }

    #[test]
    fn test_save_and_load() {
        let (_temp_dir, store) = setup_store();
        let content = b"fake image bytes";

        let stored_name = store.save(content, "alice", "photo.png").unwrap().unwrap();

        assert!(stored_name.starts_with("alice_"));
        assert!(stored_name.ends_with(".png"));
        assert!(store.exists(&stored_name));

        let loaded = store.load(&stored_name).unwrap();
        assert_eq!(loaded, content);
    }

    #[test]
    fn test_save_lowercases_extension() {
        let (_temp_dir, store) = setup_store();

        let stored_name = store.save(b"data", "bob", "selfie.GIF").unwrap().unwrap();
        assert!(stored_name.ends_with(".gif"));
    }

    #[test]
    fn test_save_rejects_disallowed_extension() {
        let (_temp_dir, store) = setup_store();

        let result = store.save(b"MZ...", "alice", "malware.exe").unwrap();
        assert_eq!(result, None);

        // Nothing was written
        let entries = fs::read_dir(store.base_path()).unwrap().count();
        assert_eq!(entries, 0);
    }

    #[test]
    fn test_save_sanitizes_username() {
        let (_temp_dir, store) = setup_store();

        let stored_name = store
            .save(b"data", "../evil user", "photo.png")
            .unwrap()
            .unwrap();

        assert!(stored_name.starts_with(".._evil_user_"));
        assert!(!stored_name.contains('/'));
        assert!(store.exists(&stored_name));
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, store) = setup_store();

        let stored_name = store.save(b"data", "alice", "photo.png").unwrap().unwrap();
        assert!(store.delete(&stored_name).unwrap());
        assert!(!store.exists(&stored_name));

        // Deleting again reports false, not an error
        assert!(!store.delete(&stored_name).unwrap());
    }

    #[test]
    fn test_load_missing() {
        let (_temp_dir, store) = setup_store();

        let result = store.load("nobody_20240101000000.png");
        assert!(matches!(result, Err(FoyerError::NotFound(_))));
    }

    #[test]
    fn test_sanitize_username() {
        assert_eq!(sanitize_username("alice"), "alice");
        assert_eq!(sanitize_username("alice.b-c_d"), "alice.b-c_d");
        assert_eq!(sanitize_username("a b/c\\d"), "a_b_c_d");
        assert_eq!(sanitize_username("日本語"), "___");
    }
}
