//! Bearer token persistence.
//!
//! The token returned by login or OTP verification outlives the process, so it
//! is written to a small JSON file and read back before each request. Tests
//! and embedders that do not want files use [`MemoryTokenStore`].

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur reading or writing a token.
#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt token file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("token store lock poisoned")]
    Poisoned,
}

/// Where the bearer token lives between requests.
pub trait TokenStore: Send + Sync {
    /// Read the current token, if one is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn load(&self) -> Result<Option<SecretString>, TokenStoreError>;

    /// Replace the stored token.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn save(&self, token: &SecretString) -> Result<(), TokenStoreError>;

    /// Remove the stored token. Clearing an empty store is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be modified.
    fn clear(&self) -> Result<(), TokenStoreError>;
}

/// On-disk token file layout.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenFile {
    token: String,
    saved_at: DateTime<Utc>,
}

/// Token persisted as JSON at a fixed path.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> TokenStoreError {
        TokenStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<SecretString>, TokenStoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        let file: TokenFile =
            serde_json::from_str(&raw).map_err(|source| TokenStoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        if file.token.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(SecretString::from(file.token)))
    }

    fn save(&self, token: &SecretString) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let file = TokenFile {
            token: token.expose_secret().to_string(),
            saved_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|source| {
            TokenStoreError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;

        let mut out = open_private(&self.path).map_err(|e| self.io_error(e))?;
        out.write_all(json.as_bytes()).map_err(|e| self.io_error(e))?;
        tracing::debug!(path = %self.path.display(), "Saved bearer token");
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// Open `path` for writing, readable by the owner only.
///
/// New files are created with mode `0600`; an existing file is narrowed to
/// `0600` before it is truncated and rewritten.
#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .mode(0o600)
        .open(path)?;
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.set_len(0)?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

/// Token held in memory only.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<SecretString>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that starts out holding `token`.
    #[must_use]
    pub fn with_token(token: SecretString) -> Self {
        Self {
            token: RwLock::new(Some(token)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<SecretString>, TokenStoreError> {
        let guard = self.token.read().map_err(|_| TokenStoreError::Poisoned)?;
        Ok(guard.clone())
    }

    fn save(&self, token: &SecretString) -> Result<(), TokenStoreError> {
        let mut guard = self.token.write().map_err(|_| TokenStoreError::Poisoned)?;
        *guard = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        let mut guard = self.token.write().map_err(|_| TokenStoreError::Poisoned)?;
        *guard = None;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("dokan-token-{}", uuid::Uuid::new_v4()))
            .join("token.json")
    }

    #[test]
    fn test_file_store_save_load_clear() {
        let store = FileTokenStore::new(temp_path());
        assert!(store.load().unwrap().is_none());

        store.save(&SecretString::from("eyJhbGciOi.jwt")).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.expose_secret(), "eyJhbGciOi.jwt");

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        // Clearing twice is fine.
        store.clear().unwrap();

        let _ = fs::remove_dir_all(store.path().parent().unwrap());
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let store = FileTokenStore::new(temp_path());
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "not json").unwrap();

        assert!(matches!(
            store.load(),
            Err(TokenStoreError::Corrupt { .. })
        ));

        let _ = fs::remove_dir_all(store.path().parent().unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let store = FileTokenStore::new(temp_path());
        store.save(&SecretString::from("token")).unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        let _ = fs::remove_dir_all(store.path().parent().unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_narrows_existing_file() {
        use std::os::unix::fs::PermissionsExt;

        let store = FileTokenStore::new(temp_path());
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "x".repeat(512)).unwrap();
        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644)).unwrap();

        store.save(&SecretString::from("short")).unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.load().unwrap().unwrap().expose_secret(), "short");

        let _ = fs::remove_dir_all(store.path().parent().unwrap());
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryTokenStore::with_token(SecretString::from("abc"));
        assert_eq!(store.load().unwrap().unwrap().expose_secret(), "abc");
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
