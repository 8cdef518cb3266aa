use std::{
    fs::{self, File, OpenOptions},
    path::{Path, PathBuf},
};

use fs2::FileExt;
use jiff::Timestamp;
use log::debug;
use uuid::Uuid;

use crate::{
    models::State,
    storage::{Storage, StorageError, decode_state, encode_state},
};

const BACKUPS_TO_KEEP: usize = 5;

/// Keeps the state as one pretty-printed JSON file, with rolling backups of
/// previous versions in a `backups/` directory beside it.
pub struct JsonFileStorage {
    path: PathBuf,
}

/// Exclusive lock on the store's `.lock` sibling, released on drop.
struct SaveLock {
    file: File,
}

impl Drop for SaveLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

impl JsonFileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn backup_dir(&self) -> PathBuf {
        self.path
            .parent()
            .unwrap_or(Path::new("."))
            .join("backups")
    }

    fn lock(&self) -> Result<SaveLock, StorageError> {
        let lock_path = self.path.with_extension("lock");
        let save_failed = |source| StorageError::SaveFailed {
            path: lock_path.clone(),
            source,
        };

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(save_failed)?;
        file.lock_exclusive().map_err(save_failed)?;

        Ok(SaveLock { file })
    }

    /// Copies the current file into the backup directory. Nothing to do
    /// before the first save.
    fn back_up_current(&self) -> Result<(), StorageError> {
        if !self.path.is_file() {
            return Ok(());
        }

        let backup_dir = self.backup_dir();
        fs::create_dir_all(&backup_dir).map_err(|source| StorageError::BackupFailed {
            path: backup_dir.clone(),
            source,
        })?;

        let backup_path = self.backup_path(Timestamp::now());

        fs::copy(&self.path, &backup_path).map_err(|source| StorageError::BackupFailed {
            path: backup_path,
            source,
        })?;
        Ok(())
    }

    /// Backup file for `stamp`. The stamp is zero-padded nanoseconds, so
    /// lexical order of the names is age order.
    fn backup_path(&self, stamp: Timestamp) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("state.json"));
        self.backup_dir()
            .join(format!("{file_name}-{:020}", stamp.as_nanosecond()))
    }

    fn prune_backups(&self) -> Result<(), StorageError> {
        let backup_dir = self.backup_dir();
        let cleanup_failed = |source| StorageError::CleanupFailed {
            dir: backup_dir.clone(),
            source,
        };

        let entries = match fs::read_dir(&backup_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(cleanup_failed(e)),
        };

        let mut backups: Vec<PathBuf> = entries
            .flatten()
            .filter(|entry| entry.metadata().is_ok_and(|m| m.is_file()))
            .map(|entry| entry.path())
            .collect();
        backups.sort();

        let excess = backups.len().saturating_sub(BACKUPS_TO_KEEP);
        for backup in &backups[..excess] {
            fs::remove_file(backup).map_err(cleanup_failed)?;
        }

        if excess > 0 {
            debug!(
                "event=backup_cleanup removed={} dir={}",
                excess,
                backup_dir.display()
            );
        }
        Ok(())
    }
}

impl Storage for JsonFileStorage {
    fn load(&self) -> Result<Option<State>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => decode_state(&content, self.path.clone()).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::LoadFailed {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    /// Writes to a temporary sibling first and renames it over the store, so
    /// readers never see a half-written file.
    fn save(&self, state: &State) -> Result<(), StorageError> {
        let json = encode_state(state)?;

        let _lock = self.lock()?;
        self.back_up_current()?;
        self.prune_backups()?;

        let temp_path = PathBuf::from(format!("{}.tmp.{}", self.path.display(), Uuid::new_v4()));
        let written = fs::write(&temp_path, json).and_then(|()| fs::rename(&temp_path, &self.path));
        if let Err(source) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(StorageError::SaveFailed {
                path: self.path.clone(),
                source,
            });
        }
        Ok(())
    }
}
