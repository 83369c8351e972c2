//! Durable storage for annotations
//!
//! Notes live in a plain key-value string store, the whole log serialized as
//! one JSON array under [`NOTES_KEY`]. The log is append-only and is read in
//! full at startup.

use bevy::log::warn;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::annotation::AnnotationRecord;
use crate::config::storage::NOTES_KEY;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("could not encode the note log: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("store lock poisoned")]
    Poisoned,
}

/// A string key-value store
pub trait KeyValueStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

// =============================================================================
// File Store
// =============================================================================

/// Store keeping one `<key>.json` file per key in a directory
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) the store directory
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        // Write-then-rename: readers never see a partial log
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;
        Ok(())
    }
}

// =============================================================================
// Memory Store
// =============================================================================

/// In-memory store; clones share the same entries
#[derive(Clone, Default)]
pub struct MemoryStore(pub Arc<Mutex<HashMap<String, String>>>);

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let guard = self.0.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut guard = self.0.lock().map_err(|_| StoreError::Poisoned)?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// =============================================================================
// Annotation Log
// =============================================================================

/// Append-only log of annotation records on top of a key-value store
pub struct AnnotationLog {
    store: Box<dyn KeyValueStore>,
}

impl AnnotationLog {
    pub fn new(store: impl KeyValueStore) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Open the file-backed log, falling back to memory if the directory is unusable
    pub fn open_default() -> Self {
        let dir = crate::config::storage::data_dir();
        match FileStore::open(&dir) {
            Ok(store) => Self::new(store),
            Err(err) => {
                warn!(
                    "[Storage] Cannot use {}: {err}; notes will not survive a restart",
                    dir.display()
                );
                Self::new(MemoryStore::default())
            }
        }
    }

    /// Raw entries in insertion order; missing or unparseable data reads as empty
    fn entries(&self) -> Vec<Value> {
        let raw = match self.store.get(NOTES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!("[Storage] Reading notes failed: {err}");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(entries)) => entries,
            Ok(_) | Err(_) => {
                warn!("[Storage] Stored notes are not a JSON array, starting empty");
                Vec::new()
            }
        }
    }

    /// Every record that still parses, in insertion order
    pub fn read_all(&self) -> Vec<AnnotationRecord> {
        self.entries()
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!("[Storage] Skipping malformed note #{index}: {err}");
                    None
                }
            })
            .collect()
    }

    /// Append one record, keeping any entries already present
    pub fn append_one(&mut self, record: &AnnotationRecord) -> Result<(), StoreError> {
        let mut entries = self.entries();
        entries.push(serde_json::to_value(record)?);
        let encoded = serde_json::to_string(&entries)?;
        self.store.set(NOTES_KEY, &encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(note: &str) -> AnnotationRecord {
        AnnotationRecord {
            note: note.into(),
            add_to: "earth".into(),
            x: 0.0,
            y: 0.0,
            z: 0.0,
            color: "#ffffff".into(),
            size: 5.0,
            height: 1.0,
        }
    }

    #[test]
    fn appends_preserve_order() {
        let mut log = AnnotationLog::new(MemoryStore::default());
        assert!(log.read_all().is_empty());

        log.append_one(&record("first")).expect("append");
        log.append_one(&record("second")).expect("append");

        let notes: Vec<_> = log.read_all().into_iter().map(|r| r.note).collect();
        assert_eq!(notes, ["first", "second"]);
    }

    #[test]
    fn corrupt_log_reads_as_empty_and_is_replaced_on_append() {
        let store = MemoryStore::default();
        store
            .0
            .lock()
            .expect("lock")
            .insert(NOTES_KEY.into(), "{not json".into());

        let mut log = AnnotationLog::new(store.clone());
        assert!(log.read_all().is_empty());

        log.append_one(&record("fresh")).expect("append");
        assert_eq!(log.read_all().len(), 1);
    }

    #[test]
    fn malformed_entries_are_skipped_individually() {
        let store = MemoryStore::default();
        let raw = r##"[{"note":"ok","addTo":"sun","x":0,"y":0,"z":0,"color":"#fff","size":5,"height":1},
                      {"note":"broken"},
                      {"note":"also ok","addTo":"mars","color":"#fff","size":"3","height":"2"}]"##;
        store
            .0
            .lock()
            .expect("lock")
            .insert(NOTES_KEY.into(), raw.into());

        let notes: Vec<_> = AnnotationLog::new(store)
            .read_all()
            .into_iter()
            .map(|r| r.note)
            .collect();
        assert_eq!(notes, ["ok", "also ok"]);
    }

    #[test]
    fn file_store_round_trips_through_disk() {
        let dir = std::env::temp_dir().join(format!("solar-notes-test-{}", std::process::id()));
        let mut store = FileStore::open(&dir).expect("open");
        assert_eq!(store.get("notes").expect("get"), None);

        store.set("notes", "[]").expect("set");
        assert_eq!(store.get("notes").expect("get").as_deref(), Some("[]"));

        let _ = fs::remove_dir_all(&dir);
    }
}
