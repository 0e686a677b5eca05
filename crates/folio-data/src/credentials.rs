//! Bearer token storage.
//!
//! The storefront reads the bearer token from local persistent storage
//! before every request. [`StoreApi::login`](crate::StoreApi::login) only
//! returns a token; the caller decides where to save it.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

/// Errors from a token store.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// Reading or writing the backing file failed.
    #[error("Token file error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not valid JSON.
    #[error("Token file is corrupt: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A writer panicked while holding the lock.
    #[error("Token store lock poisoned")]
    Poisoned,
}

/// Where the bearer token lives between runs.
pub trait TokenStore: Send + Sync {
    /// Read the current token, if any.
    fn load(&self) -> Result<Option<String>, CredentialError>;

    /// Replace the stored token.
    fn save(&self, token: &str) -> Result<(), CredentialError>;

    /// Forget the stored token.
    fn clear(&self) -> Result<(), CredentialError>;
}

/// Token kept in process memory only.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, CredentialError> {
        let token = self.token.read().map_err(|_| CredentialError::Poisoned)?;
        Ok(token.clone())
    }

    fn save(&self, token: &str) -> Result<(), CredentialError> {
        let mut slot = self.token.write().map_err(|_| CredentialError::Poisoned)?;
        *slot = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        let mut slot = self.token.write().map_err(|_| CredentialError::Poisoned)?;
        *slot = None;
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct TokenFile {
    token: String,
}

/// Token persisted as a small JSON file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, CredentialError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let file: TokenFile = serde_json::from_slice(&bytes)?;
        let token = file.token.trim();
        Ok((!token.is_empty()).then(|| token.to_string()))
    }

    fn save(&self, token: &str) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(&TokenFile {
            token: token.to_string(),
        })?;
        fs::write(&self.path, bytes)?;
        restrict_permissions(&self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.load().unwrap(), None);

        store.save("abc").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("abc"));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("token.json"));

        assert_eq!(store.load().unwrap(), None);
        store.save("jwt-value").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("jwt-value"));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        fs::write(&path, b"not json").unwrap();

        let store = FileTokenStore::new(&path);
        assert!(matches!(store.load(), Err(CredentialError::Serialize(_))));
    }
}
