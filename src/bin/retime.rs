//! Desktop GUI entry point.

use eframe::egui;
use retime::{FfmpegLogLevel, RetimeApp, set_ffmpeg_log_level};

fn main() -> eframe::Result {
    env_logger::init();

    // Keep libavcodec/libavformat chatter out of the terminal.
    set_ffmpeg_log_level(FfmpegLogLevel::Error);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([480.0, 380.0])
            .with_min_inner_size([420.0, 320.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Video Speed Changer",
        options,
        Box::new(|_cc| Ok(Box::<RetimeApp>::default())),
    )
}
