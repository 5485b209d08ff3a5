use eframe::egui;

use crate::settings::{HumanizerPreset, HumanizerSettings};

/// Humanizer tuning window. Presets overwrite every slider; touching any
/// slider flips the combo back to Custom.
pub fn render_humanizer_settings(
    ctx: &egui::Context,
    open: &mut bool,
    settings: &mut HumanizerSettings,
    is_running: bool,
) {
    egui::Window::new("Humanizer Settings")
        .open(open)
        .default_width(360.0)
        .show(ctx, |ui| {
            ui.add_enabled_ui(!is_running, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Preset:");
                    egui::ComboBox::from_id_source("humanizer_preset")
                        .selected_text(settings.preset.display_name())
                        .show_ui(ui, |ui| {
                            for preset in HumanizerPreset::all() {
                                if ui
                                    .selectable_label(
                                        settings.preset == *preset,
                                        preset.display_name(),
                                    )
                                    .clicked()
                                {
                                    settings.apply_preset(*preset);
                                }
                            }
                        });
                });

                ui.separator();

                let mut touched = false;
                touched |= ui
                    .add(
                        egui::Slider::new(&mut settings.reaction_time_ms, 0..=300)
                            .text("Reaction time (ms)"),
                    )
                    .changed();
                touched |= ui
                    .add(
                        egui::Slider::new(&mut settings.random_delay_ms, 0..=100)
                            .text("Random delay (ms)"),
                    )
                    .changed();
                touched |= ui
                    .add(
                        egui::Slider::new(&mut settings.miss_chance_pct, 0.0..=20.0)
                            .text("Miss chance (%)"),
                    )
                    .changed();
                touched |= ui
                    .add(
                        egui::Slider::new(&mut settings.hold_variation_ms, 0..=60)
                            .text("Hold variation (ms)"),
                    )
                    .changed();
                touched |= ui
                    .add(
                        egui::Slider::new(&mut settings.timing_error_ms, 0..=60)
                            .text("Timing error (ms)"),
                    )
                    .changed();
                touched |= ui
                    .add(
                        egui::Slider::new(&mut settings.early_chance_pct, 0..=50)
                            .text("Early hit chance (%)"),
                    )
                    .changed();
                touched |= ui
                    .add(
                        egui::Slider::new(&mut settings.late_chance_pct, 0..=50)
                            .text("Late hit chance (%)"),
                    )
                    .changed();

                if touched {
                    settings.preset = HumanizerPreset::Custom;
                }
            });
        });
}
