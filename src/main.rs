mod app;
mod core;
mod settings;
mod tools;
mod ui;

use app::RhythmHelperApp;
use eframe::egui;

fn main() -> Result<(), eframe::Error> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([640.0, 480.0])
            .with_title("Rhythm Helper - Rust Edition"),
        ..Default::default()
    };

    eframe::run_native(
        "Rhythm Helper",
        options,
        Box::new(|_cc| Box::new(RhythmHelperApp::new())),
    )
}
