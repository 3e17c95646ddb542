//! Workout records and the copy-on-write edits the tracker form applies to them.

use crate::error::{Error, IndexKind, Result};
use serde::{Deserialize, Serialize};

/// Number of sets every new exercise starts with. The spreadsheet layout
/// reserves exactly this many set columns.
pub const SETS_PER_EXERCISE: usize = 3;

/// One set as typed by the user. Weight and reps stay text so half-filled
/// entries survive; they are only read as numbers when computing volume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetEntry {
    pub weight: String,
    pub reps: String,
    pub comment: String,
}

impl SetEntry {
    pub fn new(weight: impl Into<String>, reps: impl Into<String>) -> Self {
        Self {
            weight: weight.into(),
            reps: reps.into(),
            comment: String::new(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Exercise {
    pub name: String,
    pub sets: Vec<SetEntry>,
}

impl Default for Exercise {
    /// An unnamed exercise with [`SETS_PER_EXERCISE`] empty sets.
    fn default() -> Self {
        Self {
            name: String::new(),
            sets: vec![SetEntry::default(); SETS_PER_EXERCISE],
        }
    }
}

impl Exercise {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// One recorded training session.
///
/// Field names serialize in camelCase (`workoutType`, `overallComment`) so
/// history files written by earlier versions of the tracker load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Workout {
    /// Free-form label. Never parsed; also used as the x-axis key in graphs.
    pub date: String,
    pub condition: String,
    pub workout_type: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    pub overall_comment: String,
}

impl Default for Workout {
    /// The blank form: empty fields and a single empty exercise.
    fn default() -> Self {
        Self {
            date: String::new(),
            condition: String::new(),
            workout_type: String::new(),
            exercises: vec![Exercise::default()],
            overall_comment: String::new(),
        }
    }
}

/// Top level text fields of a [`Workout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkoutField {
    Date,
    Condition,
    WorkoutType,
    OverallComment,
}

/// Text fields of a [`SetEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetField {
    Weight,
    Reps,
    Comment,
}

impl Workout {
    pub fn field(&self, key: WorkoutField) -> &str {
        match key {
            WorkoutField::Date => &self.date,
            WorkoutField::Condition => &self.condition,
            WorkoutField::WorkoutType => &self.workout_type,
            WorkoutField::OverallComment => &self.overall_comment,
        }
    }
}

impl SetEntry {
    pub fn field(&self, key: SetField) -> &str {
        match key {
            SetField::Weight => &self.weight,
            SetField::Reps => &self.reps,
            SetField::Comment => &self.comment,
        }
    }

    fn field_mut(&mut self, key: SetField) -> &mut String {
        match key {
            SetField::Weight => &mut self.weight,
            SetField::Reps => &mut self.reps,
            SetField::Comment => &mut self.comment,
        }
    }
}

/// Return a copy of `workout` with one top level field replaced.
pub fn set_field(workout: &Workout, key: WorkoutField, value: impl Into<String>) -> Workout {
    let mut next = workout.clone();
    let slot = match key {
        WorkoutField::Date => &mut next.date,
        WorkoutField::Condition => &mut next.condition,
        WorkoutField::WorkoutType => &mut next.workout_type,
        WorkoutField::OverallComment => &mut next.overall_comment,
    };
    *slot = value.into();
    next
}

/// Return a copy of `workout` with the exercise at `exercise_index` renamed.
pub fn set_exercise_name(
    workout: &Workout,
    exercise_index: usize,
    value: impl Into<String>,
) -> Result<Workout> {
    let mut next = workout.clone();
    let len = next.exercises.len();
    let exercise = next
        .exercises
        .get_mut(exercise_index)
        .ok_or(Error::Index {
            kind: IndexKind::Exercise,
            index: exercise_index,
            len,
        })?;
    exercise.name = value.into();
    Ok(next)
}

/// Return a copy of `workout` with one field of one set replaced.
pub fn set_set_field(
    workout: &Workout,
    exercise_index: usize,
    set_index: usize,
    key: SetField,
    value: impl Into<String>,
) -> Result<Workout> {
    let mut next = workout.clone();
    let len = next.exercises.len();
    let exercise = next
        .exercises
        .get_mut(exercise_index)
        .ok_or(Error::Index {
            kind: IndexKind::Exercise,
            index: exercise_index,
            len,
        })?;
    let len = exercise.sets.len();
    let set = exercise.sets.get_mut(set_index).ok_or(Error::Index {
        kind: IndexKind::Set,
        index: set_index,
        len,
    })?;
    *set.field_mut(key) = value.into();
    Ok(next)
}

/// Return a copy of `workout` with a new unnamed exercise appended.
pub fn add_exercise(workout: &Workout) -> Workout {
    let mut next = workout.clone();
    next.exercises.push(Exercise::default());
    next
}
