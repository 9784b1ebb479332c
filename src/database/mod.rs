use crate::models::UserRecord;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

#[derive(Debug)]
pub enum StoreError {
    Read(std::io::Error),
    Parse(serde_json::Error),
    Write(std::io::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Read(e) => write!(f, "failed to read users file: {}", e),
            StoreError::Parse(e) => write!(f, "failed to parse users file: {}", e),
            StoreError::Write(e) => write!(f, "failed to write users file: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Read(e) | StoreError::Write(e) => Some(e),
            StoreError::Parse(e) => Some(e),
        }
    }
}

/// The users collection, backed by a single JSON array file.
///
/// Nothing is cached: `load` reads the whole file and `save` rewrites it.
/// Unless built with `serialize_writes`, a load/save pair is not atomic
/// and concurrent mutations are last-writer-wins.
#[derive(Clone)]
pub struct UserStore {
    path: PathBuf,
    write_lock: Option<Arc<Mutex<()>>>,
    #[cfg(test)]
    reject_writes: bool,
}

impl UserStore {
    pub fn new(path: impl Into<PathBuf>, serialize_writes: bool) -> Self {
        Self {
            path: path.into(),
            write_lock: serialize_writes.then(|| Arc::new(Mutex::new(()))),
            #[cfg(test)]
            reject_writes: false,
        }
    }

    /// Store whose reads work but every save fails with `PermissionDenied`.
    #[cfg(test)]
    pub fn read_only(path: impl Into<PathBuf>) -> Self {
        Self {
            reject_writes: true,
            ..Self::new(path, false)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn serializes_writes(&self) -> bool {
        self.write_lock.is_some()
    }

    /// Hold the returned guard across a read-modify-write cycle.
    /// Returns `None` when writes are not serialized.
    pub async fn write_guard(&self) -> Option<MutexGuard<'_, ()>> {
        match &self.write_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        }
    }

    pub async fn load(&self) -> Result<Vec<UserRecord>, StoreError> {
        let data = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(StoreError::Read)?;
        serde_json::from_str(&data).map_err(StoreError::Parse)
    }

    /// Rewrite the whole file, pretty-printed with 2-space indentation.
    pub async fn save(&self, users: &[UserRecord]) -> Result<(), StoreError> {
        #[cfg(test)]
        {
            if self.reject_writes {
                return Err(StoreError::Write(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "users file is read-only",
                )));
            }
        }

        let data = serde_json::to_string_pretty(users).map_err(StoreError::Parse)?;
        tokio::fs::write(&self.path, data)
            .await
            .map_err(StoreError::Write)?;
        log::debug!("💾 Wrote {} users to {}", users.len(), self.path.display());
        Ok(())
    }
}
