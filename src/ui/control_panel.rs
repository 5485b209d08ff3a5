use eframe::egui;

use crate::core::engine::SessionStats;
use crate::core::hotkey::{binding_label, key_label};
use crate::settings::{AppSettings, HotkeyKey, PlayMode};

#[derive(Debug)]
pub enum PlayerUiAction {
    Start,
    Stop,
    OpenChannelSettings,
    OpenHumanizerSettings,
    None,
}

/// Render the main control panel
pub fn render_control_panel(
    ui: &mut egui::Ui,
    settings: &mut AppSettings,
    is_running: bool,
    stats: SessionStats,
) -> PlayerUiAction {
    let mut action = PlayerUiAction::None;

    ui.heading("Auto Player");
    ui.separator();

    // Mode and humanizer toggle; locked while the engine runs
    ui.add_enabled_ui(!is_running, |ui| {
        ui.horizontal(|ui| {
            ui.label("Play mode:");
            egui::ComboBox::from_id_source("play_mode")
                .selected_text(settings.mode.display_name())
                .show_ui(ui, |ui| {
                    for mode in PlayMode::all() {
                        ui.selectable_value(&mut settings.mode, *mode, mode.display_name());
                    }
                });

            if settings.mode == PlayMode::Rapid {
                // Rapid mode trades realism for speed
                let mut off = false;
                ui.add_enabled(false, egui::Checkbox::new(&mut off, "Humanizer"));
            } else {
                ui.checkbox(&mut settings.humanizer.enabled, "Humanizer");
            }
        });
    });

    ui.separator();

    ui.horizontal(|ui| {
        if ui
            .add_enabled(!is_running, egui::Button::new("Channels..."))
            .clicked()
        {
            action = PlayerUiAction::OpenChannelSettings;
        }
        if ui.button("Humanizer...").clicked() {
            action = PlayerUiAction::OpenHumanizerSettings;
        }
    });

    ui.separator();

    // Start/Stop
    ui.horizontal(|ui| {
        if !is_running {
            if ui
                .add_sized([100.0, 30.0], egui::Button::new("Start"))
                .clicked()
            {
                action = PlayerUiAction::Start;
            }
        } else if ui
            .add_sized([100.0, 30.0], egui::Button::new("Stop"))
            .clicked()
        {
            action = PlayerUiAction::Stop;
        }
        ui.label(
            egui::RichText::new(format!("or press {}", binding_label(&settings.toggle_hotkey)))
                .small()
                .color(egui::Color32::GRAY),
        );
    });

    ui.separator();

    // Session counters
    ui.horizontal(|ui| {
        ui.label(format!("Presses: {}", stats.presses));
        ui.label(format!("Releases: {}", stats.releases));
        ui.label(format!("Missed: {}", stats.missed));
        if stats.dropped > 0 {
            ui.colored_label(
                egui::Color32::from_rgb(255, 180, 0),
                format!("Dropped: {}", stats.dropped),
            );
        }
    });

    ui.separator();

    // Toggle hotkey binding
    ui.add_enabled_ui(!is_running, |ui| {
        ui.horizontal(|ui| {
            ui.label("Toggle hotkey:");
            let selected = match settings.toggle_hotkey.key {
                Some(key) => key_label(key),
                None => "Disabled",
            };
            egui::ComboBox::from_id_source("toggle_hotkey")
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut settings.toggle_hotkey.key, None, "Disabled");
                    for key in HotkeyKey::all() {
                        ui.selectable_value(
                            &mut settings.toggle_hotkey.key,
                            Some(*key),
                            key_label(*key),
                        );
                    }
                });
            ui.checkbox(&mut settings.toggle_hotkey.modifiers.ctrl, "Ctrl");
            ui.checkbox(&mut settings.toggle_hotkey.modifiers.alt, "Alt");
            ui.checkbox(&mut settings.toggle_hotkey.modifiers.shift, "Shift");
        });
    });

    action
}
