use eframe::egui;

/// Event feed side panel, latest line on top. Returns true when the user
/// asked to clear the feed.
pub fn render_log_panel(ctx: &egui::Context, events: &[String], is_running: bool) -> bool {
    const RUNNING_LOG_LINES: usize = 8;

    let mut clear_clicked = false;

    egui::SidePanel::right("log_panel")
        .resizable(true)
        .default_width(280.0)
        .min_width(200.0)
        .show(ctx, |ui| {
            egui::Frame::none()
                .fill(egui::Color32::from_rgb(12, 12, 12))
                .inner_margin(egui::Margin::same(8.0))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(
                            egui::RichText::new("Events")
                                .strong()
                                .color(egui::Color32::LIGHT_GRAY),
                        );
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.small_button("Clear").clicked() {
                                clear_clicked = true;
                            }
                            ui.label(
                                egui::RichText::new(format!("{} lines", events.len()))
                                    .small()
                                    .color(egui::Color32::DARK_GRAY),
                            );
                        });
                    });

                    ui.add_space(6.0);
                    egui::ScrollArea::vertical()
                        .auto_shrink([false, false])
                        .show(ui, |ui| {
                            if events.is_empty() {
                                ui.label(
                                    egui::RichText::new("No events yet.")
                                        .italics()
                                        .color(egui::Color32::DARK_GRAY),
                                );
                            } else {
                                // While running, only the tail stays readable
                                let shown = if is_running {
                                    events.len().min(RUNNING_LOG_LINES)
                                } else {
                                    events.len()
                                };
                                for line in events.iter().rev().take(shown) {
                                    ui.label(
                                        egui::RichText::new(line)
                                            .monospace()
                                            .color(egui::Color32::from_rgb(200, 200, 200)),
                                    );
                                }
                            }
                        });
                });
        });

    clear_clicked
}
