use crate::core::hotkey::binding_label;
use crate::settings::AppSettings;
use eframe::egui;

pub fn render_help(ui: &mut egui::Ui, settings: &AppSettings) {
    ui.heading("Quick start");
    ui.label("- Open Channels and place one marker per lane on the note line.");
    ui.label("- Grab each lane's note color while a note sits on the marker.");
    ui.label("- Pick a play mode, then press Start.");
    ui.label(format!(
        "- Press {} to start/stop while the game has focus.",
        binding_label(&settings.toggle_hotkey)
    ));

    ui.add_space(10.0);
    ui.heading("Channel settings");
    ui.label("- Capture region: the screen rectangle that is watched.");
    ui.label("- Coordinates are relative to the capture region, not the screen.");
    ui.label("- The preview shows the region with markers; Refresh re-captures.");
    ui.label("- Layouts can be exported and imported as JSON files.");

    ui.add_space(10.0);
    ui.heading("Play modes");
    ui.label("- Normal: regular hold time, humanizer available.");
    ui.label("- Rapid: shorter hold time, humanizer off.");

    ui.add_space(10.0);
    ui.heading("Humanizer");
    ui.label("- Adds reaction delay, random delay and early/late timing errors.");
    ui.label("- Miss chance skips entire notes; hold variation jitters releases.");
    ui.label("- Presets set every slider; moving a slider makes it Custom.");

    ui.add_space(10.0);
    ui.heading("Notes");
    ui.label("- The game window must be visible; capture reads the screen.");
    ui.label("- Re-place markers if the game window moves or is resized.");
    ui.label("- The Events panel shows every press, release and miss.");
    ui.label("- Settings save automatically.");
}
