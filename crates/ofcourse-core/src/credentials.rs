//! Cached platform token.
//!
//! A single opaque string, stored as plain text and replaced wholesale on
//! every save. Filesystem permissions are the only protection.

use crate::error::Result;
use crate::io;
use crate::paths;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use tracing::debug;

pub trait CredentialStore {
    /// The stored token, or `None` if nothing has been saved yet.
    fn load(&self) -> Result<Option<String>>;

    fn save(&self, token: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// FileCredentialStore
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `~/.ofcourse.token`.
    pub fn in_home() -> Result<Self> {
        Ok(Self::new(paths::default_token_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(data) => {
                let token = data.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token.to_string()))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, token: &str) -> Result<()> {
        debug!(path = %self.path.display(), "saving platform token");
        io::atomic_write(&self.path, token.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// MemoryCredentialStore
// ---------------------------------------------------------------------------

/// In-process store; keeps a history of saved tokens.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: RefCell<Option<String>>,
    saved: RefCell<Vec<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RefCell::new(Some(token.into())),
            saved: RefCell::new(Vec::new()),
        }
    }

    /// Every token passed to `save`, oldest first.
    pub fn saved(&self) -> Vec<String> {
        self.saved.borrow().clone()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.token.borrow().clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.token.borrow_mut() = Some(token.to_string());
        self.saved.borrow_mut().push(token.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
