use std::path::PathBuf;

use thiserror::Error;

use crate::models::State;

pub mod json;
pub mod memory;
pub mod migrations;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to load state from '{path}': {source}")]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON from '{path}': {source}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Stored state in '{path}' is malformed: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("Failed to save state to '{path}': {source}")]
    SaveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize state to JSON: {source}")]
    SerializeFailed {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to create backup at '{path}': {source}")]
    BackupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to cleanup old backups in '{dir}': {source}")]
    CleanupFailed {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "State was saved by a newer version of taskdeck (version {0}). Please upgrade taskdeck to open it."
    )]
    FutureVersion(u32),

    #[error("Stored state has unsupported version {0}. This version of taskdeck cannot read it.")]
    UnsupportedVersion(u32),
}

/// Durable home of the application state.
///
/// `load` returns `Ok(None)` when nothing has been saved yet.
pub trait Storage {
    fn load(&self) -> Result<Option<State>, StorageError>;
    fn save(&self, state: &State) -> Result<(), StorageError>;
}

/// Parses a serialized state blob, upgrading older schema versions.
///
/// `origin` only labels errors.
pub fn decode_state(content: &str, origin: PathBuf) -> Result<State, StorageError> {
    use crate::models::CURRENT_VERSION;
    use migrations::{apply_migrations, detect_version};

    let mut data: serde_json::Value =
        serde_json::from_str(content).map_err(|e| StorageError::ParseFailed {
            path: origin.clone(),
            source: e,
        })?;

    let file_version = detect_version(&data).map_err(|reason| StorageError::Malformed {
        path: origin.clone(),
        reason,
    })?;

    if file_version > CURRENT_VERSION {
        return Err(StorageError::FutureVersion(file_version));
    }

    if file_version < CURRENT_VERSION {
        data = apply_migrations(data, file_version, CURRENT_VERSION)?;
    }

    if let Some(obj) = data.as_object_mut() {
        obj.insert("version".to_string(), serde_json::json!(CURRENT_VERSION));
    }

    serde_json::from_value(data).map_err(|e| StorageError::ParseFailed {
        path: origin,
        source: e,
    })
}

pub fn encode_state(state: &State) -> Result<String, StorageError> {
    serde_json::to_string_pretty(state).map_err(|e| StorageError::SerializeFailed { source: e })
}
