//! Core of the gym tracker: workout records, the persisted session history,
//! volume analytics and the spreadsheet import/export format.
//!
//! The desktop front-end in `main.rs` only talks to the history through
//! [`storage::HistoryStore`] and derives everything else with the pure
//! functions in [`analysis`] and [`tabular`].

pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod plotting;
pub mod report;
pub mod session;
pub mod storage;
pub mod tabular;
pub mod xlsx;

pub use error::{Error, Result};
pub use model::{Exercise, SetEntry, SetField, Workout, WorkoutField};
pub use storage::{FileStore, HistoryStore, MemoryStore, Persistence};
