use eframe::egui;

pub fn render_status(ui: &mut egui::Ui, status: &str, hotkey_error: Option<&str>) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("Status:").strong());

        let status_color = if status.contains("Running") {
            egui::Color32::from_rgb(100, 255, 100)
        } else if status.contains("Error") || status.contains("Failed") {
            egui::Color32::from_rgb(255, 100, 100)
        } else {
            egui::Color32::GRAY
        };

        ui.label(egui::RichText::new(status).color(status_color));
    });

    if let Some(err) = hotkey_error {
        let full = format!("Hotkey warning: {}", err);
        let shortened = shortened_label(&full);
        let label = egui::RichText::new(&shortened).color(egui::Color32::from_rgb(200, 120, 120));
        let response = ui.label(label);
        if shortened != full {
            response.on_hover_text(full);
        }
    }
}

/// Cap the warning at 80 characters so it cannot blow up the header.
/// Counts characters, not bytes; OS error text is not always ASCII.
fn shortened_label(full: &str) -> String {
    if full.chars().count() <= 80 {
        return full.to_string();
    }
    let head: String = full.chars().take(77).collect();
    format!("{}...", head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_warning_untouched() {
        assert_eq!(shortened_label("Hotkey warning: busy"), "Hotkey warning: busy");
        let exactly_80: String = "x".repeat(80);
        assert_eq!(shortened_label(&exactly_80), exactly_80);
    }

    #[test]
    fn test_long_warning_truncated_to_80_chars() {
        let long: String = "x".repeat(120);
        let shortened = shortened_label(&long);
        assert_eq!(shortened.chars().count(), 80);
        assert!(shortened.ends_with("..."));
    }

    #[test]
    fn test_truncation_survives_multibyte_text() {
        // Localized OS errors are not ASCII; byte-indexed slicing would
        // panic mid-character here
        let long =
            "Hotkey warning: ".to_string() + &"Tastenkürzel ist bereits belegt; ".repeat(4);
        let shortened = shortened_label(&long);
        assert_eq!(shortened.chars().count(), 80);
        assert!(shortened.ends_with("..."));
    }
}
