use egui_plot::{Line, PlotPoints};
use serde::{Deserialize, Serialize};

use crate::analysis::VolumeSeries;

/// Methods available for smoothing plot data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SmoothingMethod {
    /// Simple moving average using a fixed window size.
    #[default]
    SimpleMA,
    /// Exponential moving average controlled by an alpha value.
    EMA,
}

/// Result of generating a plot line with an optional marker for the best value.
pub struct LineWithMarker {
    pub line: Line,
    pub points: Vec<[f64; 2]>,
    /// Workout date of each point; the x value is the index into this list.
    pub labels: Vec<String>,
    pub max_point: Option<[f64; 2]>,
}

/// Raw `[x, volume]` pairs for a series plus the date label of each point.
///
/// Dates are free-form text, so points are spaced by their position in the
/// history rather than by calendar distance.
pub fn volume_points(series: VolumeSeries<'_>) -> (Vec<[f64; 2]>, Vec<String>) {
    let mut points = Vec::new();
    let mut labels = Vec::new();
    for (idx, p) in series.iter().enumerate() {
        points.push([idx as f64, p.volume]);
        labels.push(p.date);
    }
    (points, labels)
}

/// Generate the volume line for the selected exercise.
///
/// The first point holding the highest volume is returned as `max_point` so the
/// UI can mark the best session.
pub fn volume_line(series: VolumeSeries<'_>) -> LineWithMarker {
    let (points, labels) = volume_points(series);
    let mut max_point: Option<[f64; 2]> = None;
    for p in &points {
        if max_point.map_or(true, |m| p[1] > m[1]) {
            max_point = Some(*p);
        }
    }
    LineWithMarker {
        line: Line::new(PlotPoints::from(points.clone())).name(series.name()),
        points,
        labels,
        max_point,
    }
}

/// Smoothed companion line for `points`, or `None` when there is nothing to
/// smooth.
pub fn smoothed_line(
    name: &str,
    points: &[[f64; 2]],
    window: usize,
    method: SmoothingMethod,
) -> Option<Line> {
    if window <= 1 || points.len() <= 1 {
        return None;
    }
    let smooth = match method {
        SmoothingMethod::SimpleMA => moving_average_points(points, window),
        SmoothingMethod::EMA => {
            let alpha = 2.0 / (window as f64 + 1.0);
            ema_points(points, alpha)
        }
    };
    Some(Line::new(PlotPoints::from(smooth)).name(format!("{name} MA")))
}

/// Date label for a value on the x-axis, empty between points.
pub fn x_label(labels: &[String], x: f64) -> String {
    let rounded = x.round();
    if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

/// Calculate a simple moving average of the y-values in `points`.
fn moving_average_points(points: &[[f64; 2]], window: usize) -> Vec<[f64; 2]> {
    if window == 0 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(points.len());
    let mut sum = 0.0;
    for i in 0..points.len() {
        sum += points[i][1];
        if i >= window {
            sum -= points[i - window][1];
        }
        let count = window.min(i + 1) as f64;
        out.push([points[i][0], sum / count]);
    }
    out
}

/// Calculate an exponential moving average of the y-values in `points`.
fn ema_points(points: &[[f64; 2]], alpha: f64) -> Vec<[f64; 2]> {
    if points.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(points.len());
    let mut ema = points[0][1];
    out.push([points[0][0], ema]);
    for p in &points[1..] {
        ema = alpha * p[1] + (1.0 - alpha) * ema;
        out.push([p[0], ema]);
    }
    out
}
