//! Flat table form of the workout history, used for spreadsheet export and
//! import.
//!
//! Each row holds one exercise of one workout. Workout level columns repeat
//! for every exercise of the same session, and only the first
//! [`SETS_PER_EXERCISE`] sets of an exercise have columns. Decoding turns
//! every row back into its own single-exercise workout.

use crate::analysis::numeric_prefix;
use crate::model::{Exercise, SETS_PER_EXERCISE, SetEntry, Workout};
use serde::Serialize;

pub const HEADER: [&str; 11] = [
    "Date",
    "Condition",
    "Workout Type",
    "Exercise",
    "Set 1",
    "Comment 1",
    "Set 2",
    "Comment 2",
    "Set 3",
    "Comment 3",
    "Overall Comment",
];

/// Separator between weight and reps inside a set cell.
pub const SET_SEPARATOR: char = 'x';

const COL_DATE: usize = 0;
const COL_CONDITION: usize = 1;
const COL_WORKOUT_TYPE: usize = 2;
const COL_EXERCISE: usize = 3;
const COL_FIRST_SET: usize = 4;
const COL_OVERALL_COMMENT: usize = 10;

/// A set cell that did not look like `<weight>x<reps>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatIssue {
    /// Row index in the table, header included.
    pub row: usize,
    pub column: usize,
    pub cell: String,
}

impl std::fmt::Display for FormatIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = HEADER.get(self.column).copied().unwrap_or("?");
        write!(
            f,
            "row {}, column {name}: expected <weight>x<reps>, got {:?}",
            self.row, self.cell
        )
    }
}

/// Result of decoding a table: the workouts plus every cell that had to be
/// patched up along the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decoded {
    pub history: Vec<Workout>,
    pub issues: Vec<FormatIssue>,
}

/// Format one set as a `<weight>x<reps>` cell.
pub fn encode_set(set: &SetEntry) -> String {
    format!("{}{}{}", set.weight, SET_SEPARATOR, set.reps)
}

/// Flatten the history into a table, header row first.
pub fn encode(history: &[Workout]) -> Vec<Vec<String>> {
    let mut rows = vec![HEADER.iter().map(|h| h.to_string()).collect()];
    for workout in history {
        for ex in &workout.exercises {
            let mut row = Vec::with_capacity(HEADER.len());
            row.push(workout.date.clone());
            row.push(workout.condition.clone());
            row.push(workout.workout_type.clone());
            row.push(ex.name.clone());
            for i in 0..SETS_PER_EXERCISE {
                match ex.sets.get(i) {
                    Some(set) => {
                        row.push(encode_set(set));
                        row.push(set.comment.clone());
                    }
                    None => {
                        row.push(SET_SEPARATOR.to_string());
                        row.push(String::new());
                    }
                }
            }
            row.push(workout.overall_comment.clone());
            rows.push(row);
        }
    }
    rows
}

fn canonical(part: &str) -> String {
    numeric_prefix(part)
        .unwrap_or_else(|| part.trim())
        .to_string()
}

/// Split a `<weight>x<reps>` cell on its first separator.
///
/// Weight and reps keep only their numeric prefix when they have one. A
/// non-empty cell without a separator becomes the weight and the returned
/// flag is `false` so the caller can record the issue.
pub fn decode_set(cell: &str) -> (SetEntry, bool) {
    match cell.split_once(SET_SEPARATOR) {
        Some((weight, reps)) => (SetEntry::new(canonical(weight), canonical(reps)), true),
        None => (SetEntry::new(canonical(cell), ""), cell.trim().is_empty()),
    }
}

/// Rebuild workouts from a table. Row 0 is always treated as the header.
///
/// Missing cells read as empty text and blank rows are skipped. Never fails:
/// set cells that do not parse are kept as best as possible and listed in
/// [`Decoded::issues`].
pub fn decode<R, C>(rows: &[R]) -> Decoded
where
    R: AsRef<[C]>,
    C: AsRef<str>,
{
    let mut decoded = Decoded::default();
    for (row_idx, row) in rows.iter().enumerate().skip(1) {
        let row = row.as_ref();
        if row.iter().all(|c| c.as_ref().trim().is_empty()) {
            continue;
        }
        let cell = |i: usize| row.get(i).map(|c| c.as_ref().to_string()).unwrap_or_default();

        let mut sets = Vec::with_capacity(SETS_PER_EXERCISE);
        for i in 0..SETS_PER_EXERCISE {
            let column = COL_FIRST_SET + i * 2;
            let raw = cell(column);
            let (mut set, ok) = decode_set(&raw);
            if !ok {
                decoded.issues.push(FormatIssue {
                    row: row_idx,
                    column,
                    cell: raw,
                });
            }
            set.comment = cell(column + 1);
            sets.push(set);
        }

        decoded.history.push(Workout {
            date: cell(COL_DATE),
            condition: cell(COL_CONDITION),
            workout_type: cell(COL_WORKOUT_TYPE),
            exercises: vec![Exercise {
                name: cell(COL_EXERCISE),
                sets,
            }],
            overall_comment: cell(COL_OVERALL_COMMENT),
        });
    }
    if !decoded.issues.is_empty() {
        log::warn!("{} malformed set cells while decoding table", decoded.issues.len());
    }
    decoded
}
