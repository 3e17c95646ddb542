//! Durable, append-only workout history.
//!
//! The history lives in a single slot holding the JSON array of workouts.
//! Every commit or replace rewrites the whole slot. Where the slot lives is
//! decided by a [`Persistence`] backend handed to [`HistoryStore::load`], so
//! tests and the desktop app can use different storage.

use crate::error::{Error, Result};
use crate::model::Workout;
use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};

/// A single named slot that holds the serialized history.
pub trait Persistence {
    /// Read the slot. `Ok(None)` means nothing has been stored yet.
    fn load(&self) -> io::Result<Option<String>>;

    /// Overwrite the slot. Must be durable once this returns.
    fn save(&self, data: &str) -> io::Result<()>;
}

/// Stores the history as a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Persistence for FileStore {
    fn load(&self) -> io::Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Write to a sibling temp file and rename it over the target so a crash
    /// mid-write never leaves a truncated history behind.
    fn save(&self, data: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, data)?;
        std::fs::rename(&tmp, &self.path).inspect_err(|_| {
            let _ = std::fs::remove_file(&tmp);
        })
    }
}

/// In-memory slot, used by tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(data: impl Into<String>) -> Self {
        Self {
            slot: RefCell::new(Some(data.into())),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl Persistence for MemoryStore {
    fn load(&self) -> io::Result<Option<String>> {
        Ok(self.slot.borrow().clone())
    }

    fn save(&self, data: &str) -> io::Result<()> {
        *self.slot.borrow_mut() = Some(data.to_string());
        Ok(())
    }
}

impl<P: Persistence + ?Sized> Persistence for &P {
    fn load(&self) -> io::Result<Option<String>> {
        (**self).load()
    }

    fn save(&self, data: &str) -> io::Result<()> {
        (**self).save(data)
    }
}

impl<P: Persistence + ?Sized> Persistence for Box<P> {
    fn load(&self) -> io::Result<Option<String>> {
        (**self).load()
    }

    fn save(&self, data: &str) -> io::Result<()> {
        (**self).save(data)
    }
}

/// Parse a serialized history. Any shape mismatch rejects the whole document.
pub fn parse_history(data: &str) -> Result<Vec<Workout>> {
    serde_json::from_str(data).map_err(|e| Error::Parse(e.to_string()))
}

/// The session log and the backend it is persisted to.
pub struct HistoryStore<P: Persistence> {
    backend: P,
    workouts: Vec<Workout>,
}

impl<P: Persistence> HistoryStore<P> {
    /// Read the persisted history.
    ///
    /// A missing slot, an unreadable slot, or data that does not parse as a
    /// list of workouts all yield an empty history. Nothing is salvaged from
    /// partially valid data.
    pub fn load(backend: P) -> Self {
        let workouts = match backend.load() {
            Ok(Some(data)) => match parse_history(&data) {
                Ok(w) => w,
                Err(e) => {
                    log::warn!("Discarding unreadable workout history: {e}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("Failed to read workout history: {e}");
                Vec::new()
            }
        };
        log::info!("Loaded {} workouts", workouts.len());
        Self { backend, workouts }
    }

    pub fn history(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn backend(&self) -> &P {
        &self.backend
    }

    /// Append `workout` and persist the full history.
    ///
    /// The in-memory history only grows once the write succeeded, so memory
    /// and storage never disagree.
    pub fn commit(&mut self, workout: Workout) -> Result<&[Workout]> {
        let mut next = self.workouts.clone();
        next.push(workout);
        self.persist(&next)?;
        self.workouts = next;
        log::info!("Committed workout, history now has {} entries", self.workouts.len());
        Ok(&self.workouts)
    }

    /// Discard the current history and persist `entries` in its place.
    pub fn replace(&mut self, entries: Vec<Workout>) -> Result<&[Workout]> {
        self.persist(&entries)?;
        log::info!(
            "Replaced history of {} workouts with {} imported workouts",
            self.workouts.len(),
            entries.len()
        );
        self.workouts = entries;
        Ok(&self.workouts)
    }

    fn persist(&self, workouts: &[Workout]) -> Result<()> {
        let data = serde_json::to_string(workouts)?;
        self.backend.save(&data)?;
        Ok(())
    }
}
