use crate::{
    analysis::{ExerciseRecord, HistorySummary},
    error::Result,
    model::Workout,
    tabular::{self, Decoded},
};
use serde::Serialize;
use std::io::{Read, Write};
use std::path::Path;

pub fn write_json<T: Serialize + ?Sized, P: AsRef<Path>>(
    value: &T,
    path: P,
) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, value)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
}

pub fn write_csv<T: Serialize>(writer: impl Write, records: &[T]) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for r in records {
        wtr.serialize(r)?;
    }
    wtr.flush().map_err(Into::into)
}

/// Write the spreadsheet table (header included) as CSV.
pub fn write_table_csv(writer: impl Write, history: &[Workout]) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in tabular::encode(history) {
        wtr.write_record(&row)?;
    }
    wtr.flush().map_err(Into::into)
}

/// Read a CSV table written by [`write_table_csv`] (or edited by hand).
///
/// Rows may have any number of fields; the first row is the header.
pub fn read_table_csv(reader: impl Read) -> Result<Decoded> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(tabular::decode(&rows))
}

pub fn save_table_csv<P: AsRef<Path>>(path: P, history: &[Workout]) -> Result<()> {
    write_table_csv(std::fs::File::create(path)?, history)?;
    Ok(())
}

pub fn load_table_csv<P: AsRef<Path>>(path: P) -> Result<Decoded> {
    read_table_csv(std::fs::File::open(path)?)
}

pub fn save_history_json<P: AsRef<Path>>(path: P, history: &[Workout]) -> std::io::Result<()> {
    write_json(history, path)
}

pub fn save_records_csv<P: AsRef<Path>>(path: P, records: &[ExerciseRecord]) -> csv::Result<()> {
    #[derive(Serialize)]
    struct Row<'a> {
        exercise: &'a str,
        best_date: &'a str,
        best_volume: f64,
        worst_date: &'a str,
        worst_volume: f64,
    }
    let rows: Vec<Row> = records
        .iter()
        .map(|r| Row {
            exercise: &r.name,
            best_date: &r.best.date,
            best_volume: r.best.volume,
            worst_date: &r.worst.date,
            worst_volume: r.worst.volume,
        })
        .collect();
    write_csv(std::fs::File::create(path)?, &rows)
}

pub fn save_records_json<P: AsRef<Path>>(
    path: P,
    records: &[ExerciseRecord],
) -> std::io::Result<()> {
    write_json(records, path)
}

#[derive(Serialize)]
pub struct StatsExport<'a> {
    pub summary: &'a HistorySummary,
    pub records: &'a [ExerciseRecord],
}

pub fn save_stats_json<P: AsRef<Path>>(
    path: P,
    summary: &HistorySummary,
    records: &[ExerciseRecord],
) -> std::io::Result<()> {
    let export = StatsExport { summary, records };
    write_json(&export, path)
}
