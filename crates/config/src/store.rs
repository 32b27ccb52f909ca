//! Live configuration guarded by a read/write lock.
//!
//! All mutation goes through [`ConfigStore::update`], which writes the file
//! before releasing the lock whenever the closure reports a change.

use std::{
    path::{Path, PathBuf},
    sync::RwLock,
};

use tracing::{info, warn};

use crate::{error::Error, loader, schema::UploaderConfig};

/// Result of a [`ConfigStore::update`] call.
#[must_use]
#[derive(Debug)]
pub struct UpdateOutcome<R> {
    /// Whatever the update closure returned.
    pub response: R,
    /// Whether the closure reported a change.
    pub changed: bool,
    /// Set when the change is live in memory but could not be written to disk.
    pub persist_error: Option<Error>,
}

impl<R> UpdateOutcome<R> {
    /// The mutation is applied and durable (or nothing changed).
    pub fn is_durable(&self) -> bool {
        self.persist_error.is_none()
    }
}

/// Owner of the running configuration and its backing file.
pub struct ConfigStore {
    path: PathBuf,
    config: RwLock<UploaderConfig>,
}

impl ConfigStore {
    pub fn new(config: UploaderConfig, path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: RwLock::new(config),
        }
    }

    /// Load the file at `path` and wrap it in a store.
    pub fn open(path: impl Into<PathBuf>) -> crate::Result<Self> {
        let path = path.into();
        let config = loader::load_config(&path)?;
        Ok(Self::new(config, path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Consistent snapshot of the current configuration.
    pub fn read(&self) -> UploaderConfig {
        self.config
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Run `f` against the live configuration under the exclusive lock.
    ///
    /// `f` returns its response and whether it changed anything. A change is
    /// persisted before the lock is released. A failed write does not roll
    /// the in-memory change back; it is reported in
    /// [`UpdateOutcome::persist_error`].
    pub fn update<R, F>(&self, f: F) -> UpdateOutcome<R>
    where
        F: FnOnce(&mut UploaderConfig) -> (R, bool),
    {
        let mut config = self.config.write().unwrap_or_else(|e| e.into_inner());
        let (response, changed) = f(&mut config);
        if !changed {
            return UpdateOutcome {
                response,
                changed,
                persist_error: None,
            };
        }
        let persist_error = match loader::save_config(&self.path, &config) {
            Ok(()) => {
                info!(path = %self.path.display(), "config persisted");
                None
            },
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "config changed but not persisted");
                Some(e)
            },
        };
        UpdateOutcome {
            response,
            changed,
            persist_error,
        }
    }
}
