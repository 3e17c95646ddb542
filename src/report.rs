use crate::{
    analysis::{
        ExerciseRecord, HistorySummary, best_worst, compute_summary, distinct_exercise_names,
        time_series,
    },
    model::Workout,
};
use maud::{DOCTYPE, Markup, html};
use plotters::prelude::*;
use std::path::Path;

trait FormatVolume {
    fn fmt_vol(self) -> String;
}

impl FormatVolume for f64 {
    fn fmt_vol(self) -> String {
        format!("{:.1}", self)
    }
}

/// Write an HTML progress report to `path` with a volume chart next to it.
///
/// The chart is saved as a PNG with the same file stem. If the chart cannot be
/// drawn the report is still written, with a placeholder in its place.
pub fn export_html_report<P: AsRef<Path>>(path: P, history: &[Workout]) -> std::io::Result<()> {
    let path = path.as_ref();
    let chart_path = path.with_extension("png");
    let chart_file = match generate_volume_chart(history, &chart_path) {
        Ok(_) => chart_path
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("")),
        Err(e) => {
            log::error!("Failed to generate chart: {}", e);
            std::ffi::OsStr::new("")
        }
    };
    let summary = compute_summary(history);
    let records = best_worst(history);
    let markup = build_html(&summary, &records, chart_file);
    std::fs::write(path, markup.into_string())?;
    log::info!("Wrote progress report to {}", path.display());
    Ok(())
}

/// One line per exercise, x = occurrence index, y = session volume.
fn generate_volume_chart(
    history: &[Workout],
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, (800, 400)).into_drawing_area();
    root.fill(&WHITE)?;

    let names = distinct_exercise_names(history);
    let series: Vec<(String, Vec<(usize, f64)>)> = names
        .into_iter()
        .map(|name| {
            let points: Vec<(usize, f64)> = time_series(history, &name)
                .iter()
                .enumerate()
                .map(|(i, p)| (i, p.volume))
                .collect();
            (name, points)
        })
        .collect();

    let max_len = series.iter().map(|(_, p)| p.len()).max().unwrap_or(0);
    if max_len == 0 {
        root.present()?;
        return Ok(());
    }
    let max_vol = series
        .iter()
        .flat_map(|(_, p)| p.iter().map(|(_, v)| *v))
        .fold(0.0_f64, f64::max)
        .max(1.0);

    let mut chart = ChartBuilder::on(&root)
        .caption("Volume per Session", ("sans-serif", 25))
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(0..max_len.max(2) - 1, 0f64..max_vol * 1.05)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Session")
        .y_desc("Volume")
        .draw()?;
    for (idx, (name, points)) in series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color))?
            .label(name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

fn build_html(
    summary: &HistorySummary,
    records: &[ExerciseRecord],
    chart_file: &std::ffi::OsStr,
) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head { meta charset="utf-8"; title { "Workout Progress" } }
            body {
                h1 { "Summary" }
                table border="1" {
                    tr { th { "Total Workouts" } td { (summary.total_workouts) } }
                    tr { th { "Exercises Logged" } td { (summary.total_exercises) } }
                    tr { th { "Total Volume" } td { (summary.total_volume.fmt_vol()) } }
                    tr { th { "Most Common Exercise" } td { (summary.most_common_exercise.clone().unwrap_or_default()) } }
                }
                h1 { "Best & Worst" }
                table border="1" {
                    tr { th { "Exercise" } th { "Best" } th { "Best Date" } th { "Worst" } th { "Worst Date" } }
                    @for rec in records {
                        tr {
                            td { (rec.name) }
                            td { (rec.best.volume.fmt_vol()) }
                            td { (rec.best.date) }
                            td { (rec.worst.volume.fmt_vol()) }
                            td { (rec.worst.date) }
                        }
                    }
                }
                h1 { "Volume" }
                @if chart_file.is_empty() {
                    p { "Chart unavailable" }
                } @else {
                    img src=(chart_file.to_string_lossy());
                }
            }
        }
    }
}
