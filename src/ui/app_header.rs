use eframe::egui;

use crate::ui::status::render_status;

pub enum HeaderAction {
    ToggleLog,
    Help,
    None,
}

/// App title, colored status line and the utility buttons.
pub fn render_header(
    ui: &mut egui::Ui,
    status: &str,
    hotkey_error: Option<&str>,
) -> HeaderAction {
    let mut action = HeaderAction::None;

    ui.horizontal(|ui| {
        ui.vertical(|ui| {
            ui.label(
                egui::RichText::new("Rhythm Helper")
                    .strong()
                    .size(18.0)
                    .color(egui::Color32::from_rgb(220, 220, 220)),
            );
            render_status(ui, status, hotkey_error);
        });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
            ui.spacing_mut().item_spacing = egui::vec2(6.0, 0.0);
            let button_size = egui::vec2(66.0, 26.0);
            let help_size = egui::vec2(26.0, 26.0);

            if ui
                .add_sized(
                    help_size,
                    egui::Button::new(egui::RichText::new("?").strong())
                        .rounding(egui::Rounding::same(13.0)),
                )
                .clicked()
            {
                action = HeaderAction::Help;
            }

            if ui
                .add_sized(button_size, egui::Button::new("Log"))
                .clicked()
            {
                action = HeaderAction::ToggleLog;
            }
        });
    });

    action
}
