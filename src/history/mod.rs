//! Newest-first note history persisted wholesale into a single storage slot.

mod storage;

pub use storage::{FileStorage, MemoryStorage, StorageBackend};

use std::collections::HashSet;

use log::{debug, warn};

use crate::error::PersistenceError;
use crate::model::Note;

/// Slot holding the serialized history
pub const STORAGE_KEY: &str = "shortNotes";

/// Notes ordered most recent first
pub type NoteHistory = Vec<Note>;

/// Read the persisted history.
///
/// A missing slot, an unreadable slot or malformed JSON all yield an empty
/// history.
///
/// # Arguments
/// * `storage` - Backend holding the `shortNotes` slot
///
/// # Returns
/// The stored notes, most recent first
pub fn load(storage: &dyn StorageBackend) -> NoteHistory {
    let data = match storage.read(STORAGE_KEY) {
        Ok(Some(data)) => data,
        Ok(None) => return NoteHistory::new(),
        Err(e) => {
            warn!("Failed to read note history: {}", e);
            return NoteHistory::new();
        }
    };

    match serde_json::from_str::<NoteHistory>(&data) {
        Ok(notes) => notes,
        Err(e) => {
            warn!("Discarding malformed note history: {}", e);
            NoteHistory::new()
        }
    }
}

/// Serialize `notes` and overwrite the slot
pub fn persist(storage: &mut dyn StorageBackend, notes: &[Note]) -> Result<(), PersistenceError> {
    let data = serde_json::to_string(notes)?;
    storage.write(STORAGE_KEY, &data)
}

/// The note history together with the backend it is persisted to
pub struct NoteHistoryStore {
    storage: Box<dyn StorageBackend>,
    notes: NoteHistory,
    last_id: i64,
}

impl NoteHistoryStore {
    /// Load the history from `storage`
    pub fn load(storage: Box<dyn StorageBackend>) -> Self {
        let notes = load(storage.as_ref());
        let last_id = notes.iter().map(|n| n.id).max().unwrap_or(0);
        debug!("Loaded {} notes from storage", notes.len());

        NoteHistoryStore {
            storage,
            notes,
            last_id,
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Insert a new note at the head and persist the whole history
    ///
    /// # Arguments
    /// * `text` - The note text, stored as given
    ///
    /// # Returns
    /// The updated history, with the new note first
    pub fn prepend(&mut self, text: impl Into<String>) -> &[Note] {
        let note = Note {
            id: self.next_id(),
            text: text.into(),
        };
        debug!("Prepending note {}", note.id);
        self.notes.insert(0, note);
        self.persist();
        &self.notes
    }

    /// Write the history back; failures are logged and dropped
    pub fn persist(&mut self) {
        if let Err(e) = persist(self.storage.as_mut(), &self.notes) {
            warn!("Failed to persist note history: {}", e);
        }
    }

    /// Millisecond timestamp, bumped past every id already handed out.
    ///
    /// Once `i64::MAX` is taken ids can no longer grow, so the first unused
    /// id from the current timestamp onwards is taken instead.
    fn next_id(&mut self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        if let Some(next) = self.last_id.checked_add(1) {
            self.last_id = now.max(next);
            return self.last_id;
        }

        warn!("Note ids exhausted, reusing a free id");
        let used: HashSet<i64> = self.notes.iter().map(|n| n.id).collect();
        (now..=i64::MAX)
            .chain(i64::MIN..now)
            .find(|id| !used.contains(id))
            .unwrap_or(now)
    }
}
