use std::{cell::RefCell, path::PathBuf};

use crate::{
    models::State,
    storage::{Storage, StorageError, decode_state, encode_state},
};

/// Keeps the serialized state in a single in-process slot, the way a
/// key-value store entry would.
#[derive(Default)]
pub struct MemoryStorage {
    slot: RefCell<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with a raw blob already stored, valid or not.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            slot: RefCell::new(Some(blob.into())),
        }
    }

    /// The raw blob currently stored.
    pub fn blob(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Option<State>, StorageError> {
        self.slot
            .borrow()
            .as_deref()
            .map(|blob| decode_state(blob, PathBuf::from("<memory>")))
            .transpose()
    }

    fn save(&self, state: &State) -> Result<(), StorageError> {
        let blob = encode_state(state)?;
        *self.slot.borrow_mut() = Some(blob);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::{civil::date, tz::TimeZone};

    use crate::{reducer::reduce, actions::Action, models::View, seed::seed_state};

    #[test]
    fn test_empty_slot_loads_nothing() {
        assert!(MemoryStorage::new().load().unwrap().is_none());
    }

    #[test]
    fn test_round_trip_preserves_dates_and_view() {
        let now = date(2024, 5, 20).at(17, 45, 12, 250_000_000).to_zoned(TimeZone::UTC).unwrap();
        let state = reduce(&seed_state(&now), Action::SetCurrentView(View::Upcoming));
        let storage = MemoryStorage::new();

        storage.save(&state).unwrap();

        assert_eq!(storage.load().unwrap(), Some(state));
        assert!(storage.blob().unwrap().contains("\"currentView\""));
    }

    #[test]
    fn test_corrupt_blob_is_an_error() {
        let storage = MemoryStorage::with_blob("not json");
        assert!(matches!(
            storage.load(),
            Err(StorageError::ParseFailed { .. })
        ));
    }
}
