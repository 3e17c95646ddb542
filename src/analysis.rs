// Module for analyzing workout history
use crate::model::{Exercise, SetEntry, Workout};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

static NUMERIC_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?")
        .expect("numeric prefix pattern is valid")
});

/// Return the leading numeric part of `text`, trimmed, if there is one.
///
/// `"62.5kg"` yields `"62.5"`, `"bw"` yields `None`.
pub fn numeric_prefix(text: &str) -> Option<&str> {
    NUMERIC_PREFIX.find(text).map(|m| m.as_str().trim_start())
}

/// Read the leading number of a free-form field, or `0.0` when there is none.
pub fn numeric_or_zero(text: &str) -> f64 {
    numeric_prefix(text)
        .and_then(|p| p.parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Training volume of a single set (`weight * reps`).
pub fn set_volume(set: &SetEntry) -> f64 {
    numeric_or_zero(&set.weight) * numeric_or_zero(&set.reps)
}

/// Training volume of one exercise instance: the sum over its sets.
pub fn exercise_volume(exercise: &Exercise) -> f64 {
    exercise.sets.iter().map(set_volume).sum()
}

/// Volume of one exercise instance, labelled with its workout date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumePoint {
    pub date: String,
    pub volume: f64,
}

/// All volume points recorded for one exercise name, in history order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSeries {
    pub name: String,
    pub points: Vec<VolumePoint>,
}

/// Best and worst session for one exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseRecord {
    pub name: String,
    pub best: VolumePoint,
    pub worst: VolumePoint,
}

/// Group every exercise instance in `history` by exact name.
///
/// Groups appear in the order their name is first seen and keep history order
/// within a group. Duplicate names inside one workout contribute one point per
/// instance.
pub fn exercise_time_series(history: &[Workout]) -> Vec<ExerciseSeries> {
    let mut series: Vec<ExerciseSeries> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for workout in history {
        for ex in &workout.exercises {
            let slot = *index.entry(ex.name.as_str()).or_insert_with(|| {
                series.push(ExerciseSeries {
                    name: ex.name.clone(),
                    points: Vec::new(),
                });
                series.len() - 1
            });
            series[slot].points.push(VolumePoint {
                date: workout.date.clone(),
                volume: exercise_volume(ex),
            });
        }
    }
    series
}

/// Pick the best and worst session for every exercise.
///
/// Both picks scan left to right and keep the first point on ties.
pub fn best_worst(history: &[Workout]) -> Vec<ExerciseRecord> {
    exercise_time_series(history)
        .into_iter()
        .filter_map(|s| {
            let mut points = s.points.iter();
            let first = points.next()?;
            let (mut best, mut worst) = (first, first);
            for p in points {
                if p.volume > best.volume {
                    best = p;
                }
                if p.volume < worst.volume {
                    worst = p;
                }
            }
            Some(ExerciseRecord {
                best: best.clone(),
                worst: worst.clone(),
                name: s.name,
            })
        })
        .collect()
}

/// Volume over time for a single exercise, computed lazily from the history.
///
/// The view can be iterated any number of times; each pass rescans the
/// snapshot it borrows. Workouts without the exercise produce no point.
#[derive(Debug, Clone, Copy)]
pub struct VolumeSeries<'a> {
    history: &'a [Workout],
    name: &'a str,
}

impl<'a> VolumeSeries<'a> {
    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn iter(self) -> impl Iterator<Item = VolumePoint> + 'a {
        let name = self.name;
        self.history.iter().flat_map(move |w| {
            w.exercises
                .iter()
                .filter(move |ex| ex.name == name)
                .map(move |ex| VolumePoint {
                    date: w.date.clone(),
                    volume: exercise_volume(ex),
                })
        })
    }

    pub fn is_empty(self) -> bool {
        self.iter().next().is_none()
    }
}

impl<'a> IntoIterator for VolumeSeries<'a> {
    type Item = VolumePoint;
    type IntoIter = Box<dyn Iterator<Item = VolumePoint> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Graph series for the exercise called `name`.
pub fn time_series<'a>(history: &'a [Workout], name: &'a str) -> VolumeSeries<'a> {
    VolumeSeries { history, name }
}

/// Every exercise name in the history, in first-seen order.
pub fn distinct_exercise_names(history: &[Workout]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    history
        .iter()
        .flat_map(|w| w.exercises.iter())
        .filter(|ex| seen.insert(ex.name.as_str()))
        .map(|ex| ex.name.clone())
        .collect()
}

/// Summary statistics about the workout history.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub total_workouts: usize,
    pub total_exercises: usize,
    pub total_volume: f64,
    pub most_common_exercise: Option<String>,
}

/// Compute overall statistics for the history.
///
/// The most common exercise is the name with the most instances; the name
/// seen first wins a tie.
pub fn compute_summary(history: &[Workout]) -> HistorySummary {
    if history.is_empty() {
        return HistorySummary::default();
    }

    log::info!("Computing summary for {} workouts", history.len());

    let series = exercise_time_series(history);
    let total_exercises: usize = series.iter().map(|s| s.points.len()).sum();
    let total_volume: f64 = series
        .iter()
        .flat_map(|s| s.points.iter())
        .map(|p| p.volume)
        .sum();

    let mut most_common: Option<&ExerciseSeries> = None;
    for s in &series {
        if most_common.map_or(true, |m| s.points.len() > m.points.len()) {
            most_common = Some(s);
        }
    }

    HistorySummary {
        total_workouts: history.len(),
        total_exercises,
        total_volume,
        most_common_exercise: most_common.map(|s| s.name.clone()),
    }
}

/// Format a user facing message after an import finished.
///
/// Malformed cells are mentioned explicitly so a partially broken sheet is
/// not reported as a clean import.
pub fn format_import_message(workouts: usize, malformed: usize, filename: &str) -> String {
    if malformed == 0 {
        format!("Imported {} workouts from {}", workouts, filename)
    } else {
        format!(
            "Imported {} workouts from {} ({} malformed cells)",
            workouts, filename, malformed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workout(date: &str, exercises: Vec<Exercise>) -> Workout {
        Workout {
            date: date.into(),
            exercises,
            ..Default::default()
        }
    }

    fn exercise(name: &str, sets: &[(&str, &str)]) -> Exercise {
        Exercise {
            name: name.into(),
            sets: sets.iter().map(|(w, r)| SetEntry::new(*w, *r)).collect(),
        }
    }

    fn sample_history() -> Vec<Workout> {
        vec![
            workout(
                "2024-01-01",
                vec![
                    exercise("Squat", &[("100", "5"), ("100", "5")]),
                    exercise("Bench", &[("60", "10")]),
                ],
            ),
            workout("2024-01-03", vec![exercise("Bench", &[("65", "8")])]),
            workout("2024-01-05", vec![exercise("Squat", &[("105", "5")])]),
        ]
    }

    #[test]
    fn test_numeric_or_zero() {
        assert_eq!(numeric_or_zero("60"), 60.0);
        assert_eq!(numeric_or_zero("62.5kg"), 62.5);
        assert_eq!(numeric_or_zero("  -3"), -3.0);
        assert_eq!(numeric_or_zero(".5"), 0.5);
        assert_eq!(numeric_or_zero("1e2"), 100.0);
        assert_eq!(numeric_or_zero("bw"), 0.0);
        assert_eq!(numeric_or_zero(""), 0.0);
        assert_eq!(numeric_or_zero("x10"), 0.0);
    }

    #[test]
    fn test_numeric_prefix() {
        assert_eq!(numeric_prefix("60kg"), Some("60"));
        assert_eq!(numeric_prefix(" 8 reps"), Some("8"));
        assert_eq!(numeric_prefix("bw"), None);
    }

    #[test]
    fn bodyweight_set_has_no_volume() {
        assert_eq!(set_volume(&SetEntry::new("bw", "10")), 0.0);
        let ex = exercise("Pull Up", &[("bw", "10"), ("10", "5")]);
        assert_eq!(exercise_volume(&ex), 50.0);
    }

    #[test]
    fn test_exercise_time_series() {
        let series = exercise_time_series(&sample_history());
        let names: Vec<&str> = series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Squat", "Bench"]);
        assert_eq!(
            series[0].points,
            vec![
                VolumePoint {
                    date: "2024-01-01".into(),
                    volume: 1000.0
                },
                VolumePoint {
                    date: "2024-01-05".into(),
                    volume: 525.0
                },
            ]
        );
        assert_eq!(series[1].points.len(), 2);
    }

    #[test]
    fn best_worst_keeps_first_on_ties() {
        let history = vec![
            workout("d1", vec![exercise("Squat", &[("10", "1")])]),
            workout("d2", vec![exercise("Squat", &[("5", "2")])]),
            workout("d3", vec![exercise("Squat", &[("5", "1")])]),
        ];
        let records = best_worst(&history);
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].best,
            VolumePoint {
                date: "d1".into(),
                volume: 10.0
            }
        );
        assert_eq!(
            records[0].worst,
            VolumePoint {
                date: "d3".into(),
                volume: 5.0
            }
        );

        let flat = vec![
            workout("a", vec![exercise("Row", &[("1", "1")])]),
            workout("b", vec![exercise("Row", &[("1", "1")])]),
        ];
        let records = best_worst(&flat);
        assert_eq!(records[0].best.date, "a");
        assert_eq!(records[0].worst.date, "a");
    }

    #[test]
    fn time_series_skips_workouts_without_exercise() {
        let history = vec![
            workout("d1", vec![exercise("Squat", &[("100", "5")])]),
            workout("d2", vec![exercise("Bench", &[("60", "10")])]),
        ];
        let series = time_series(&history, "Squat");
        let points: Vec<VolumePoint> = series.iter().collect();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].date, "d1");

        // A zero-volume session is still a point.
        let history = vec![workout("d1", vec![exercise("Squat", &[("", "")])])];
        let points: Vec<VolumePoint> = time_series(&history, "Squat").into_iter().collect();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].volume, 0.0);
    }

    #[test]
    fn time_series_is_restartable_and_case_sensitive() {
        let history = sample_history();
        let series = time_series(&history, "Bench");
        assert_eq!(series.iter().count(), 2);
        assert_eq!(series.iter().count(), 2);
        assert!(time_series(&history, "bench").is_empty());
    }

    #[test]
    fn duplicate_names_are_aggregated() {
        let history = vec![workout(
            "d1",
            vec![
                exercise("Curl", &[("10", "10")]),
                exercise("Curl", &[("12", "10")]),
            ],
        )];
        assert_eq!(time_series(&history, "Curl").iter().count(), 2);
        let records = best_worst(&history);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].best.volume, 120.0);
        assert_eq!(records[0].worst.volume, 100.0);
    }

    #[test]
    fn test_distinct_exercise_names() {
        let names = distinct_exercise_names(&sample_history());
        assert_eq!(names, ["Squat", "Bench"]);
        assert!(distinct_exercise_names(&[]).is_empty());
    }

    #[test]
    fn test_compute_summary() {
        let summary = compute_summary(&sample_history());
        assert_eq!(summary.total_workouts, 3);
        assert_eq!(summary.total_exercises, 4);
        assert!((summary.total_volume - (1000.0 + 600.0 + 520.0 + 525.0)).abs() < 1e-9);
        assert_eq!(summary.most_common_exercise.as_deref(), Some("Squat"));
        assert_eq!(compute_summary(&[]), HistorySummary::default());
    }

    #[test]
    fn test_format_import_message() {
        assert_eq!(
            format_import_message(3, 0, "log.xlsx"),
            "Imported 3 workouts from log.xlsx"
        );
        assert_eq!(
            format_import_message(3, 2, "log.xlsx"),
            "Imported 3 workouts from log.xlsx (2 malformed cells)"
        );
    }
}
