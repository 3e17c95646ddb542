//! Desktop front-end: record a session, save it, and review progress.

use eframe::{App, Frame, NativeOptions, egui};
use egui_plot::{Legend, MarkerShape, Plot, Points};
use rfd::FileDialog;
use std::path::Path;
use std::time::{Duration, Instant};

use log::info;

use gym_tracker::analysis::{
    best_worst, compute_summary, distinct_exercise_names, format_import_message, time_series,
};
use gym_tracker::config::Settings;
use gym_tracker::export::{load_table_csv, save_records_csv, save_table_csv};
use gym_tracker::model::{self, SetField, Workout, WorkoutField};
use gym_tracker::plotting::{SmoothingMethod, smoothed_line, volume_line, x_label};
use gym_tracker::report::export_html_report;
use gym_tracker::session::{SessionClock, format_time};
use gym_tracker::storage::{FileStore, HistoryStore, Persistence};
use gym_tracker::tabular::Decoded;
use gym_tracker::xlsx::{EXPORT_FILE_NAME, load_workbook, save_workbook};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Home,
    Tracker,
    Progress,
}

/// A single change made in the tracker form during one frame.
#[derive(Debug, Clone, PartialEq)]
enum Edit {
    Field(WorkoutField, String),
    Name(usize, String),
    Set(usize, usize, SetField, String),
    AddExercise,
}

struct GymApp {
    store: HistoryStore<Box<dyn Persistence>>,
    settings: Settings,
    settings_dirty: bool,
    page: Page,
    workout: Workout,
    clock: SessionClock,
    selected_exercise: String,
    status: Option<String>,
    status_start: Option<Instant>,
}

impl GymApp {
    fn new(settings: Settings) -> Self {
        let path = settings.history_path();
        info!("Using workout history at {}", path.display());
        let backend: Box<dyn Persistence> = Box::new(FileStore::new(path));
        Self::with_store(backend, settings)
    }

    fn with_store(backend: Box<dyn Persistence>, settings: Settings) -> Self {
        let store = HistoryStore::load(backend);
        let selected_exercise = settings.selected_exercise.clone().unwrap_or_default();
        Self {
            store,
            settings,
            settings_dirty: false,
            page: Page::Home,
            workout: Workout::default(),
            clock: SessionClock::default(),
            selected_exercise,
            status: None,
            status_start: None,
        }
    }

    fn set_status(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        info!("{msg}");
        self.status = Some(msg);
        self.status_start = Some(Instant::now());
    }

    fn apply_edits(&mut self, edits: Vec<Edit>) {
        for edit in edits {
            let next = match edit {
                Edit::Field(key, value) => Ok(model::set_field(&self.workout, key, value)),
                Edit::Name(ex, value) => model::set_exercise_name(&self.workout, ex, value),
                Edit::Set(ex, set, key, value) => {
                    model::set_set_field(&self.workout, ex, set, key, value)
                }
                Edit::AddExercise => Ok(model::add_exercise(&self.workout)),
            };
            match next {
                Ok(w) => self.workout = w,
                Err(e) => log::error!("Rejected form edit: {e}"),
            }
        }
    }

    /// Commit the form to the history and start a fresh one.
    fn save_workout(&mut self) {
        match self.store.commit(self.workout.clone()).map(|_| ()) {
            Ok(_) => {
                self.workout = Workout::default();
                self.clock.reset();
                self.set_status("Workout saved!");
            }
            Err(e) => {
                log::error!("Failed to save workout: {e}");
                self.set_status(format!("Saving failed: {e}"));
            }
        }
    }

    fn remember_dir(&mut self, path: &Path) {
        if let Some(dir) = path.parent() {
            self.settings.last_dir = Some(dir.display().to_string());
            self.settings_dirty = true;
        }
    }

    fn file_dialog(&self) -> FileDialog {
        let dialog = FileDialog::new();
        match &self.settings.last_dir {
            Some(dir) => dialog.set_directory(dir),
            None => dialog,
        }
    }

    fn import_path(&mut self, path: &Path) {
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        let result = if is_csv {
            load_table_csv(path)
        } else {
            load_workbook(path)
        };
        let filename = path
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        match result {
            Ok(decoded) => self.apply_import(decoded, &filename),
            Err(e) => {
                log::error!("Failed to import {filename}: {e}");
                self.set_status(format!("Import failed: {e}"));
            }
        }
        self.remember_dir(path);
    }

    fn apply_import(&mut self, decoded: Decoded, filename: &str) {
        for issue in &decoded.issues {
            log::warn!("{filename}: {issue}");
        }
        let issues = decoded.issues.len();
        let count = decoded.history.len();
        match self.store.replace(decoded.history).map(|_| ()) {
            Ok(_) => self.set_status(format_import_message(count, issues, filename)),
            Err(e) => self.set_status(format!("Import failed: {e}")),
        }
    }

    fn export_xlsx(&mut self) {
        let Some(path) = self
            .file_dialog()
            .set_file_name(EXPORT_FILE_NAME)
            .add_filter("Excel", &["xlsx"])
            .save_file()
        else {
            return;
        };
        match save_workbook(&path, self.store.history()) {
            Ok(()) => self.set_status(format!("Exported to {}", path.display())),
            Err(e) => self.set_status(format!("Export failed: {e}")),
        }
        self.remember_dir(&path);
    }

    fn export_csv(&mut self) {
        let Some(path) = self
            .file_dialog()
            .set_file_name("Workout_History.csv")
            .add_filter("CSV", &["csv"])
            .save_file()
        else {
            return;
        };
        match save_table_csv(&path, self.store.history()) {
            Ok(()) => self.set_status(format!("Exported to {}", path.display())),
            Err(e) => self.set_status(format!("Export failed: {e}")),
        }
        self.remember_dir(&path);
    }

    fn export_records(&mut self) {
        let Some(path) = self
            .file_dialog()
            .set_file_name("Best_Worst.csv")
            .add_filter("CSV", &["csv"])
            .save_file()
        else {
            return;
        };
        match save_records_csv(&path, &best_worst(self.store.history())) {
            Ok(()) => self.set_status(format!("Exported to {}", path.display())),
            Err(e) => self.set_status(format!("Export failed: {e}")),
        }
        self.remember_dir(&path);
    }

    fn export_report(&mut self) {
        let Some(path) = self
            .file_dialog()
            .set_file_name("Workout_Report.html")
            .add_filter("HTML", &["html"])
            .save_file()
        else {
            return;
        };
        match export_html_report(&path, self.store.history()) {
            Ok(()) => {
                self.set_status(format!("Report written to {}", path.display()));
                if self.settings.open_report {
                    if let Err(e) = open::that(&path) {
                        log::error!("Failed to open report: {e}");
                    }
                }
            }
            Err(e) => self.set_status(format!("Report failed: {e}")),
        }
        self.remember_dir(&path);
    }

    fn tracker_page(&mut self, ui: &mut egui::Ui) {
        if ui.link("← Back").clicked() {
            self.page = Page::Home;
        }
        ui.heading("Workout Tracker");
        ui.add_space(8.0);

        let mut edits = Vec::new();
        let w = &self.workout;
        for (key, hint) in [
            (WorkoutField::Date, "Date"),
            (WorkoutField::Condition, "Condition"),
            (WorkoutField::WorkoutType, "Workout Type"),
        ] {
            let mut value = w.field(key).to_string();
            if ui
                .add(egui::TextEdit::singleline(&mut value).hint_text(hint))
                .changed()
            {
                edits.push(Edit::Field(key, value));
            }
        }

        for (ex_idx, ex) in w.exercises.iter().enumerate() {
            ui.group(|ui| {
                let mut name = ex.name.clone();
                if ui
                    .add(egui::TextEdit::singleline(&mut name).hint_text("Exercise"))
                    .changed()
                {
                    edits.push(Edit::Name(ex_idx, name));
                }
                for (set_idx, set) in ex.sets.iter().enumerate() {
                    ui.horizontal(|ui| {
                        for (key, hint, width) in [
                            (SetField::Weight, "W", 60.0),
                            (SetField::Reps, "R", 60.0),
                            (SetField::Comment, "Comment", 200.0),
                        ] {
                            let mut value = set.field(key).to_string();
                            let edit = egui::TextEdit::singleline(&mut value)
                                .hint_text(hint)
                                .desired_width(width);
                            if ui.add(edit).changed() {
                                edits.push(Edit::Set(ex_idx, set_idx, key, value));
                            }
                        }
                    });
                }
            });
        }

        if ui.button("➕ Add Exercise").clicked() {
            edits.push(Edit::AddExercise);
        }

        let mut comment = w.overall_comment.clone();
        if ui
            .add(egui::TextEdit::multiline(&mut comment).hint_text("Overall Comments"))
            .changed()
        {
            edits.push(Edit::Field(WorkoutField::OverallComment, comment));
        }
        self.apply_edits(edits);

        ui.horizontal(|ui| {
            if ui.button("▶ Start").clicked() {
                self.clock.start();
            }
            if ui.button("⏹ End").clicked() {
                self.clock.end();
            }
        });
        if let Some(start) = self.clock.started() {
            ui.label(format!("Start: {}", format_time(start)));
        }
        if let Some(end) = self.clock.ended() {
            ui.label(format!("End: {}", format_time(end)));
        }
        if let Some(mins) = self.clock.duration_minutes() {
            ui.label(format!("🕒 {mins} mins"));
        }

        ui.add_space(8.0);
        if ui.button("💾 Save Workout").clicked() {
            self.save_workout();
        }
    }

    fn progress_page(&mut self, ui: &mut egui::Ui) {
        if ui.link("← Back").clicked() {
            self.page = Page::Home;
        }
        ui.heading("Progress");

        let names = distinct_exercise_names(self.store.history());
        let prev = self.selected_exercise.clone();
        egui::ComboBox::from_label("Exercise for Graph")
            .selected_text(if self.selected_exercise.is_empty() {
                "All"
            } else {
                self.selected_exercise.as_str()
            })
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut self.selected_exercise, String::new(), "All");
                for name in &names {
                    ui.selectable_value(&mut self.selected_exercise, name.clone(), name);
                }
            });
        if self.selected_exercise != prev {
            self.settings.selected_exercise =
                Some(self.selected_exercise.clone()).filter(|s| !s.is_empty());
            self.settings_dirty = true;
        }

        ui.horizontal(|ui| {
            if ui
                .checkbox(&mut self.settings.show_smoothed, "Smoothed")
                .changed()
            {
                self.settings_dirty = true;
            }
            egui::ComboBox::from_id_source("smoothing_method_combo")
                .selected_text(format!("{:?}", self.settings.smoothing_method))
                .show_ui(ui, |ui| {
                    for m in [SmoothingMethod::SimpleMA, SmoothingMethod::EMA] {
                        if ui
                            .selectable_value(&mut self.settings.smoothing_method, m, format!("{m:?}"))
                            .changed()
                        {
                            self.settings_dirty = true;
                        }
                    }
                });
            if ui
                .add(egui::DragValue::new(&mut self.settings.ma_window).clamp_range(1..=20))
                .changed()
            {
                self.settings_dirty = true;
            }
        });

        if !self.selected_exercise.is_empty() {
            let history = self.store.history();
            let lw = volume_line(time_series(history, &self.selected_exercise));
            let smooth = if self.settings.show_smoothed {
                smoothed_line(
                    &self.selected_exercise,
                    &lw.points,
                    self.settings.ma_window,
                    self.settings.smoothing_method,
                )
            } else {
                None
            };
            let labels = lw.labels.clone();
            Plot::new("volume_plot")
                .height(250.0)
                .legend(Legend::default())
                .x_axis_formatter(move |mark, _chars, _| x_label(&labels, mark.value))
                .show(ui, |plot_ui| {
                    plot_ui.line(lw.line);
                    if let Some(line) = smooth {
                        plot_ui.line(line);
                    }
                    if let Some(p) = lw.max_point {
                        plot_ui.points(
                            Points::new(vec![p])
                                .shape(MarkerShape::Circle)
                                .radius(5.0)
                                .name("Best"),
                        );
                    }
                });
        }

        ui.separator();
        let summary = compute_summary(self.store.history());
        ui.label(format!(
            "{} workouts, {} exercises, total volume {:.1}",
            summary.total_workouts, summary.total_exercises, summary.total_volume
        ));
        if let Some(ex) = &summary.most_common_exercise {
            ui.label(format!("Most common exercise: {ex}"));
        }

        ui.heading("🏆 Best & 😞 Worst");
        egui::ScrollArea::vertical()
            .max_height(200.0)
            .show(ui, |ui| {
                for rec in best_worst(self.store.history()) {
                    ui.strong(&rec.name);
                    ui.label(format!("Best: {} ({})", rec.best.volume, rec.best.date));
                    ui.label(format!("Worst: {} ({})", rec.worst.volume, rec.worst.date));
                    ui.add_space(4.0);
                }
            });

        ui.separator();
        ui.horizontal(|ui| {
            if ui.button("📤 Export").clicked() {
                self.export_xlsx();
            }
            if ui.button("Export CSV").clicked() {
                self.export_csv();
            }
            if ui.button("Best/Worst CSV").clicked() {
                self.export_records();
            }
            if ui.button("HTML Report").clicked() {
                self.export_report();
            }
            if ui.button("📥 Import").clicked() {
                if let Some(path) = self
                    .file_dialog()
                    .add_filter("Spreadsheet", &["xlsx", "xls", "ods", "csv"])
                    .pick_file()
                {
                    self.import_path(&path);
                }
            }
        });
    }
}

impl App for GymApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        // Handle spreadsheet drag-and-drop
        for file in ctx.input(|i| i.raw.dropped_files.clone()) {
            if let Some(path) = file.path.clone() {
                let ext_ok = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| {
                        ["xlsx", "xls", "ods", "csv"]
                            .iter()
                            .any(|x| e.eq_ignore_ascii_case(x))
                    })
                    .unwrap_or(false);
                if ext_ok {
                    self.import_path(&path);
                }
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| match self.page {
            Page::Home => {
                ui.vertical_centered(|ui| {
                    ui.add_space(ui.available_height() / 3.0);
                    ui.heading("🏋 Gym Tracker");
                    ui.add_space(16.0);
                    if ui.button("▶ Start Workout").clicked() {
                        self.page = Page::Tracker;
                    }
                    if ui.button("📈 Progress").clicked() {
                        self.page = Page::Progress;
                    }
                });
            }
            Page::Tracker => {
                egui::ScrollArea::vertical().show(ui, |ui| self.tracker_page(ui));
            }
            Page::Progress => {
                egui::ScrollArea::vertical().show(ui, |ui| self.progress_page(ui));
            }
        });

        if let Some(start) = self.status_start {
            if start.elapsed() < Duration::from_secs(3) {
                if let Some(ref msg) = self.status {
                    egui::Area::new(egui::Id::new("status_toast"))
                        .anchor(egui::Align2::RIGHT_TOP, [-10.0, 10.0])
                        .show(ctx, |ui| {
                            ui.label(msg);
                        });
                }
                ctx.request_repaint_after(Duration::from_millis(250));
            } else {
                self.status_start = None;
            }
        }

        if self.settings_dirty {
            self.settings.save();
            self.settings_dirty = false;
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.settings.save();
    }
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let settings = Settings::load();
    let options = NativeOptions::default();
    eframe::run_native(
        "Gym Tracker",
        options,
        Box::new(|_cc| Box::new(GymApp::new(settings))),
    )
}
