use eframe::egui;

use crate::core::keys::{ScanKey, ALL_SCAN_KEYS};
use crate::settings::{region_size, AppSettings, ChannelConfig};

#[derive(Debug)]
pub enum ChannelUiAction {
    RefreshPreview,
    GrabColor(usize),
    ImportLayout,
    ExportLayout,
    None,
}

/// Channel layout editor window. Everything but the preview is disabled
/// while the engine runs; the channel snapshot it took at start would not
/// see the edits anyway.
pub fn render_channel_settings(
    ctx: &egui::Context,
    open: &mut bool,
    settings: &mut AppSettings,
    preview: Option<&egui::TextureHandle>,
    preview_note: Option<&str>,
    is_running: bool,
) -> ChannelUiAction {
    let mut action = ChannelUiAction::None;

    egui::Window::new("Channel Settings")
        .open(open)
        .default_width(460.0)
        .show(ctx, |ui| {
            ui.add_enabled_ui(!is_running, |ui| {
                render_region_row(ui, settings);
                ui.separator();
                render_channel_rows(ui, settings, &mut action);
                ui.separator();

                ui.horizontal(|ui| {
                    if ui.button("Add channel").clicked() {
                        let index = settings.channels.len() + 1;
                        settings.channels.push(ChannelConfig::new(
                            &format!("Lane {}", index),
                            ScanKey::Space,
                            (0, 0),
                            (255, 255, 255),
                        ));
                    }
                    if ui.button("Import layout...").clicked() {
                        action = ChannelUiAction::ImportLayout;
                    }
                    if ui.button("Export layout...").clicked() {
                        action = ChannelUiAction::ExportLayout;
                    }
                });
            });

            ui.separator();
            render_preview(ui, settings, preview, preview_note, &mut action);
        });

    action
}

fn render_region_row(ui: &mut egui::Ui, settings: &mut AppSettings) {
    ui.label(egui::RichText::new("Capture region (screen pixels)").strong());
    ui.horizontal(|ui| {
        let (left, top, right, bottom) = &mut settings.capture_region;
        ui.label("Left:");
        ui.add(egui::DragValue::new(left));
        ui.label("Top:");
        ui.add(egui::DragValue::new(top));
        ui.label("Right:");
        ui.add(egui::DragValue::new(right));
        ui.label("Bottom:");
        ui.add(egui::DragValue::new(bottom));
    });
    let (left, top, right, bottom) = settings.capture_region;
    if right <= left || bottom <= top {
        ui.colored_label(
            egui::Color32::from_rgb(255, 100, 100),
            "Region is empty: right must exceed left and bottom must exceed top",
        );
    } else {
        let (width, height) = region_size(settings.capture_region);
        ui.label(
            egui::RichText::new(format!("{}x{} pixels", width, height))
                .small()
                .color(egui::Color32::GRAY),
        );
    }
}

fn render_channel_rows(
    ui: &mut egui::Ui,
    settings: &mut AppSettings,
    action: &mut ChannelUiAction,
) {
    let (width, height) = region_size(settings.capture_region);
    let max_x = width.saturating_sub(1);
    let max_y = height.saturating_sub(1);
    let removable = settings.channels.len() > 1;
    let mut remove: Option<usize> = None;

    for (index, channel) in settings.channels.iter_mut().enumerate() {
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut channel.label).desired_width(70.0),
            );

            egui::ComboBox::from_id_source(("channel_key", index))
                .selected_text(channel.key.label())
                .width(70.0)
                .show_ui(ui, |ui| {
                    for key in ALL_SCAN_KEYS {
                        ui.selectable_value(&mut channel.key, *key, key.label());
                    }
                });

            ui.label("at");
            ui.add(egui::DragValue::new(&mut channel.pos.0).clamp_range(0..=max_x));
            ui.add(egui::DragValue::new(&mut channel.pos.1).clamp_range(0..=max_y));

            let mut rgb = [channel.color.0, channel.color.1, channel.color.2];
            if ui.color_edit_button_srgb(&mut rgb).changed() {
                channel.color = (rgb[0], rgb[1], rgb[2]);
            }
            if ui
                .button("Grab")
                .on_hover_text("Read the current screen color at this coordinate")
                .clicked()
            {
                *action = ChannelUiAction::GrabColor(index);
            }

            if removable && ui.button("✖").clicked() {
                remove = Some(index);
            }
        });
    }

    if let Some(index) = remove {
        settings.channels.remove(index);
    }
}

fn render_preview(
    ui: &mut egui::Ui,
    settings: &AppSettings,
    preview: Option<&egui::TextureHandle>,
    preview_note: Option<&str>,
    action: &mut ChannelUiAction,
) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("Region preview").strong());
        if ui.button("Refresh").clicked() {
            *action = ChannelUiAction::RefreshPreview;
        }
    });

    if let Some(note) = preview_note {
        ui.colored_label(egui::Color32::from_rgb(200, 160, 100), note);
    }

    let Some(texture) = preview else {
        ui.label(
            egui::RichText::new("No preview captured yet.")
                .italics()
                .color(egui::Color32::DARK_GRAY),
        );
        return;
    };

    let tex_size = texture.size_vec2();
    let scale = (ui.available_width() / tex_size.x).min(1.0);
    let response = ui.add(
        egui::Image::from_texture(texture).fit_to_exact_size(tex_size * scale),
    );

    // Channel markers on top of the screenshot
    let painter = ui.painter_at(response.rect);
    for channel in &settings.channels {
        let center = response.rect.min
            + egui::vec2(channel.pos.0 as f32 * scale, channel.pos.1 as f32 * scale);
        let fill = egui::Color32::from_rgb(channel.color.0, channel.color.1, channel.color.2);
        painter.circle(center, 4.0, fill, egui::Stroke::new(1.5, egui::Color32::WHITE));
        painter.text(
            center + egui::vec2(6.0, -6.0),
            egui::Align2::LEFT_BOTTOM,
            &channel.label,
            egui::FontId::proportional(11.0),
            egui::Color32::WHITE,
        );
    }
}
