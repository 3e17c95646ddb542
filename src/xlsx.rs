//! Spreadsheet container for the workout table.

use crate::error::{Error, Result};
use crate::model::Workout;
use crate::tabular::{self, Decoded};
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use rust_xlsxwriter::{Format, Workbook};
use std::io::Cursor;
use std::path::Path;

pub const EXPORT_FILE_NAME: &str = "Workout_History.xlsx";
pub const SHEET_NAME: &str = "Workout Log";

/// Render the history as an xlsx document, one row per exercise.
pub fn write_workbook(history: &[Workout]) -> Result<Vec<u8>> {
    let rows = tabular::encode(history);
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            if r == 0 {
                sheet.write_string_with_format(r as u32, c as u16, cell, &header)?;
            } else {
                sheet.write_string(r as u32, c as u16, cell)?;
            }
        }
    }
    let bytes = workbook.save_to_buffer()?;
    log::info!("Encoded {} rows into {}", rows.len() - 1, SHEET_NAME);
    Ok(bytes)
}

/// Write the history to an xlsx file at `path`.
pub fn save_workbook<P: AsRef<Path>>(path: P, history: &[Workout]) -> Result<()> {
    let bytes = write_workbook(history)?;
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Text shown for a cell, the way a spreadsheet would display it.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Read the first sheet of a workbook into rows of display text.
pub fn read_rows(bytes: &[u8]) -> Result<Vec<Vec<String>>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::Workbook("workbook has no sheets".into()))??;
    // The range starts at the first used cell, not at A1.
    let (row_offset, col_offset) = range.start().unwrap_or((0, 0));
    let mut rows: Vec<Vec<String>> = vec![Vec::new(); row_offset as usize];
    for row in range.rows() {
        let mut cells = vec![String::new(); col_offset as usize];
        cells.extend(row.iter().map(cell_text));
        rows.push(cells);
    }
    Ok(rows)
}

/// Decode the workouts stored in the first sheet of an xlsx, xls or ods file.
pub fn read_workbook(bytes: &[u8]) -> Result<Decoded> {
    let rows = read_rows(bytes)?;
    let decoded = tabular::decode(&rows);
    log::info!(
        "Decoded {} workouts from {} rows",
        decoded.history.len(),
        rows.len().saturating_sub(1)
    );
    Ok(decoded)
}

pub fn load_workbook<P: AsRef<Path>>(path: P) -> Result<Decoded> {
    let bytes = std::fs::read(path)?;
    read_workbook(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Exercise, SetEntry};

    fn history() -> Vec<Workout> {
        vec![
            Workout {
                date: "2024-01-01".into(),
                condition: "good".into(),
                workout_type: "Push".into(),
                exercises: vec![
                    Exercise {
                        name: "Bench".into(),
                        sets: vec![
                            SetEntry::new("60", "10"),
                            SetEntry::new("65", "8"),
                            SetEntry::new("70", "6").with_comment("grind"),
                        ],
                    },
                    Exercise::named("Dip"),
                ],
                overall_comment: "felt strong".into(),
            },
            Workout {
                date: "2024-01-03".into(),
                exercises: vec![Exercise::named("Squat")],
                ..Default::default()
            },
        ]
    }

    #[test]
    fn workbook_contains_header_and_rows() {
        let bytes = write_workbook(&history()).unwrap();
        let rows = read_rows(&bytes).unwrap();
        assert_eq!(rows[0], tabular::HEADER);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1][4], "60x10");
        assert_eq!(rows[1][9], "grind");
        assert_eq!(rows[2][3], "Dip");
        assert_eq!(rows[3][0], "2024-01-03");
    }

    #[test]
    fn workbook_roundtrip_splits_exercises() {
        let bytes = write_workbook(&history()).unwrap();
        let decoded = read_workbook(&bytes).unwrap();
        assert!(decoded.issues.is_empty());
        assert_eq!(decoded.history.len(), 3);
        assert_eq!(decoded.history[0].exercises[0].sets[2].weight, "70");
        assert_eq!(decoded.history[1].exercises[0].name, "Dip");
        assert_eq!(decoded.history[1].overall_comment, "felt strong");
        assert_eq!(decoded.history[2].exercises[0].sets[0], SetEntry::default());
    }

    #[test]
    fn numeric_cells_read_as_plain_text() {
        assert_eq!(cell_text(&Data::Float(60.0)), "60");
        assert_eq!(cell_text(&Data::Float(62.5)), "62.5");
        assert_eq!(cell_text(&Data::Int(8)), "8");
        assert_eq!(cell_text(&Data::Empty), "");
    }

    #[test]
    fn only_first_sheet_is_imported() {
        let mut workbook = Workbook::new();
        let log = workbook.add_worksheet();
        for (c, name) in tabular::HEADER.iter().enumerate() {
            log.write_string(0, c as u16, *name).unwrap();
        }
        log.write_string(1, 0, "2024-02-01").unwrap();
        log.write_string(1, 3, "Bench").unwrap();
        log.write_string(1, 4, "60x10").unwrap();

        let notes = workbook.add_worksheet();
        for r in 0..3 {
            notes.write_string(r, 0, "2024-03-01").unwrap();
            notes.write_string(r, 3, "Deadlift").unwrap();
            notes.write_string(r, 4, "140x5").unwrap();
        }
        let bytes = workbook.save_to_buffer().unwrap();

        let decoded = read_workbook(&bytes).unwrap();
        assert_eq!(decoded.history.len(), 1);
        assert_eq!(decoded.history[0].date, "2024-02-01");
        assert_eq!(decoded.history[0].exercises[0].name, "Bench");
    }

    #[test]
    fn garbage_bytes_are_an_error() {
        assert!(read_workbook(b"definitely not a spreadsheet").is_err());
    }

    #[test]
    fn save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EXPORT_FILE_NAME);
        save_workbook(&path, &history()).unwrap();
        let decoded = load_workbook(&path).unwrap();
        assert_eq!(decoded.history.len(), 3);
    }
}
