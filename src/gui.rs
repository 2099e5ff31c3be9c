//! The desktop shell — an `eframe`/`egui` window around the speed transform.
//!
//! The window gathers a source file (typed path or drag-and-drop), a speed
//! multiplier from the fixed menu, and a destination path, then runs one
//! conversion at a time on a background thread. The worker owns all
//! decoder/encoder state; it communicates with the UI thread exclusively
//! through [`WorkerEvent`] messages on an `std::sync::mpsc` channel, which
//! the UI drains at the top of each frame. Widgets are never touched from
//! the worker.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;

use eframe::egui;

use crate::estimate::{ADVISORY_BITRATE_MBPS, duration_label, duration_seconds, estimated_size_mb};
use crate::progress::ProgressCallback;
use crate::reveal::reveal_containing_folder;
use crate::source::SourceInfo;
use crate::speed::{SPEED_CHOICES, SpeedFactor};
use crate::transform::{SpeedTransform, TransformReport};

/// Messages sent from the conversion thread to the UI thread.
///
/// The UI applies them in order; for terminal states the last message wins.
#[derive(Debug)]
pub enum WorkerEvent {
    /// Conversion progress in percent, 0–100.
    Progress(u8),
    /// Conversion finished; the output file is complete.
    Finished {
        /// Path of the written file.
        output: PathBuf,
        /// Frame accounting from the transform.
        report: TransformReport,
    },
    /// Conversion failed. Carries a user-presentable message.
    Failed(String),
}

/// Forwards transform progress onto the UI channel and wakes the UI thread.
struct ChannelProgress {
    events: Sender<WorkerEvent>,
    ctx: egui::Context,
}

impl ProgressCallback for ChannelProgress {
    fn on_progress(&self, percent: u8) {
        // The receiver disappearing just means the window closed.
        let _ = self.events.send(WorkerEvent::Progress(percent));
        self.ctx.request_repaint();
    }
}

enum Status {
    Info(String),
    Success(String),
    Error(String),
}

/// Application state for the desktop shell.
///
/// All mutable UI state lives here and is only touched from `update`.
pub struct RetimeApp {
    input_field: String,
    output_field: String,
    source: Option<SourceInfo>,
    source_summary: Option<String>,
    speed: f64,
    running: bool,
    progress: u8,
    status: Option<Status>,
    events: Option<Receiver<WorkerEvent>>,
}

impl Default for RetimeApp {
    fn default() -> Self {
        Self {
            input_field: String::new(),
            output_field: String::new(),
            source: None,
            source_summary: None,
            speed: 2.0,
            running: false,
            progress: 0,
            status: None,
            events: None,
        }
    }
}

impl RetimeApp {
    /// Probe the typed/dropped path and refresh the file summary and the
    /// default destination.
    fn load_source(&mut self) {
        match SourceInfo::probe(&self.input_field) {
            Ok(source) => {
                let name = source
                    .path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| source.path.display().to_string());
                let duration = duration_label(source.total_frames, source.frame_rate);
                let size = duration_seconds(source.total_frames, source.frame_rate)
                    .map(|seconds| {
                        format!("~{} MB (estimate)", estimated_size_mb(seconds, ADVISORY_BITRATE_MBPS))
                    })
                    .unwrap_or_else(|| "size unknown".to_string());
                self.source_summary =
                    Some(format!("{name} — Duration: {duration} — {size}"));
                self.source = Some(source);
                self.status = None;
                self.refresh_output_path();
            }
            Err(error) => {
                self.source = None;
                self.source_summary = None;
                self.status = Some(Status::Error(error.to_string()));
            }
        }
    }

    fn refresh_output_path(&mut self) {
        if let (Some(source), Ok(factor)) = (&self.source, SpeedFactor::new(self.speed)) {
            self.output_field = source.default_output_path(factor).display().to_string();
        }
    }

    fn start_conversion(&mut self, ctx: &egui::Context) {
        if self.running {
            return;
        }

        let Some(source) = self.source.clone() else {
            self.status = Some(Status::Error("Please select a video file first.".to_string()));
            return;
        };

        let factor = match SpeedFactor::new(self.speed) {
            Ok(factor) => factor,
            Err(error) => {
                self.status = Some(Status::Error(error.to_string()));
                return;
            }
        };

        if self.output_field.trim().is_empty() {
            self.status = Some(Status::Error("Please choose a destination path.".to_string()));
            return;
        }
        let destination = PathBuf::from(self.output_field.trim());

        let (tx, rx) = channel();
        self.events = Some(rx);
        self.running = true;
        self.progress = 0;
        self.status = Some(Status::Info("Converting…".to_string()));

        let progress = Arc::new(ChannelProgress {
            events: tx.clone(),
            ctx: ctx.clone(),
        });
        let ctx = ctx.clone();

        thread::spawn(move || {
            let result = SpeedTransform::new(factor)
                .with_progress(progress)
                .run(&source.path, &destination);

            let event = match result {
                Ok(report) => WorkerEvent::Finished {
                    output: destination,
                    report,
                },
                Err(error) => WorkerEvent::Failed(error.to_string()),
            };
            let _ = tx.send(event);
            ctx.request_repaint();
        });
    }

    fn apply_events(&mut self) {
        let pending: Vec<WorkerEvent> = match &self.events {
            Some(events) => events.try_iter().collect(),
            None => return,
        };

        for event in pending {
            match event {
                WorkerEvent::Progress(percent) => {
                    // Monotonic by contract, but never let a late message
                    // move the bar backwards.
                    self.progress = self.progress.max(percent);
                }
                WorkerEvent::Finished { output, report } => {
                    self.running = false;
                    self.progress = 100;
                    self.status = Some(Status::Success(format!(
                        "Saved: {} ({} frames at {:.2} fps)",
                        output.display(),
                        report.frames_written,
                        report.output_rate,
                    )));
                    reveal_containing_folder(&output);
                }
                WorkerEvent::Failed(message) => {
                    self.running = false;
                    self.status = Some(Status::Error(message));
                }
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        if self.running {
            return;
        }
        let dropped = ctx.input(|input| input.raw.dropped_files.clone());
        if let Some(path) = dropped.into_iter().filter_map(|file| file.path).next() {
            self.input_field = path.display().to_string();
            self.load_source();
        }
    }
}

impl eframe::App for RetimeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_events();
        self.handle_dropped_files(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Video Speed Changer");
            ui.add_space(8.0);

            ui.label("Select a video file (or drop one onto this window):");
            ui.horizontal(|ui| {
                let field = ui.add_enabled(
                    !self.running,
                    egui::TextEdit::singleline(&mut self.input_field)
                        .hint_text("path/to/video.mp4"),
                );
                let load = ui.add_enabled(!self.running, egui::Button::new("Load"));
                let submitted =
                    field.lost_focus() && ui.input(|input| input.key_pressed(egui::Key::Enter));
                if (load.clicked() || submitted) && !self.input_field.trim().is_empty() {
                    self.input_field = self.input_field.trim().to_string();
                    self.load_source();
                }
            });

            match &self.source_summary {
                Some(summary) => ui.label(summary.clone()),
                None => ui.weak("No file selected"),
            };

            ui.add_space(12.0);
            ui.label("Speed multiplier:");

            // The selector is locked while a conversion is in flight; so is
            // the start button below.
            let mut speed_changed = false;
            ui.add_enabled_ui(!self.running, |ui| {
                egui::ComboBox::from_id_salt("speed_multiplier")
                    .selected_text(format!("{}x", self.speed))
                    .show_ui(ui, |ui| {
                        for &choice in &SPEED_CHOICES {
                            if ui
                                .selectable_value(&mut self.speed, choice, format!("{choice}x"))
                                .changed()
                            {
                                speed_changed = true;
                            }
                        }
                    });
            });
            if speed_changed {
                self.refresh_output_path();
            }

            ui.add_space(8.0);
            ui.label("Save as:");
            ui.add_enabled(
                !self.running,
                egui::TextEdit::singleline(&mut self.output_field)
                    .hint_text("path/to/output.mp4")
                    .desired_width(f32::INFINITY),
            );

            ui.add_space(12.0);
            let convert_enabled = !self.running && self.source.is_some();
            if ui
                .add_enabled(convert_enabled, egui::Button::new("Convert and Save"))
                .clicked()
            {
                self.start_conversion(ctx);
            }

            ui.add_space(8.0);
            ui.add(
                egui::ProgressBar::new(f32::from(self.progress) / 100.0)
                    .text(format!("Conversion: {}%", self.progress)),
            );

            if let Some(status) = &self.status {
                ui.add_space(8.0);
                match status {
                    Status::Info(message) => ui.label(message.clone()),
                    Status::Success(message) => {
                        ui.colored_label(egui::Color32::DARK_GREEN, message.clone())
                    }
                    Status::Error(message) => {
                        ui.colored_label(egui::Color32::RED, message.clone())
                    }
                };
            }
        });
    }
}
