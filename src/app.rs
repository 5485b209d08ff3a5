use std::time::Duration;

use eframe::egui;
use global_hotkey::{hotkey::HotKey, GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};

use crate::core::hotkey::hotkey_from_binding;
use crate::settings::{AppSettings, ChannelLayout};
use crate::tools::auto_player::AutoPlayerTool;
use crate::ui::app_header::{render_header, HeaderAction};
use crate::ui::channel_settings::{render_channel_settings, ChannelUiAction};
use crate::ui::control_panel::{render_control_panel, PlayerUiAction};
use crate::ui::help::render_help;
use crate::ui::humanizer_settings::render_humanizer_settings;
use crate::ui::log_panel::render_log_panel;

pub struct RhythmHelperApp {
    settings: AppSettings,
    player: AutoPlayerTool,

    // Global toggle hotkey
    hotkey_manager: Option<GlobalHotKeyManager>,
    registered_hotkey: Option<HotKey>,
    hotkey_error: Option<String>,

    // Window state
    show_channel_settings: bool,
    show_humanizer_settings: bool,
    show_help: bool,
    show_log: bool,

    // Channel-window preview
    preview: Option<egui::TextureHandle>,
    layout_note: Option<String>,
}

impl RhythmHelperApp {
    pub fn new() -> Self {
        let mut app = Self {
            settings: AppSettings::load(),
            player: AutoPlayerTool::default(),
            hotkey_manager: None,
            registered_hotkey: None,
            hotkey_error: None,
            show_channel_settings: false,
            show_humanizer_settings: false,
            show_help: false,
            show_log: true,
            preview: None,
            layout_note: None,
        };
        app.register_toggle_hotkey();
        app
    }

    /// Swap the registered global hotkey for the configured one. A failed
    /// registration is shown as a warning; everything else keeps working.
    fn register_toggle_hotkey(&mut self) {
        if let (Some(manager), Some(old)) = (&self.hotkey_manager, self.registered_hotkey.take()) {
            let _ = manager.unregister(old);
        }
        self.hotkey_error = None;

        let Some(hotkey) = hotkey_from_binding(&self.settings.toggle_hotkey) else {
            return;
        };
        if self.hotkey_manager.is_none() {
            match GlobalHotKeyManager::new() {
                Ok(manager) => self.hotkey_manager = Some(manager),
                Err(e) => {
                    self.hotkey_error = Some(e.to_string());
                    return;
                }
            }
        }
        if let Some(manager) = &self.hotkey_manager {
            match manager.register(hotkey) {
                Ok(()) => self.registered_hotkey = Some(hotkey),
                Err(e) => self.hotkey_error = Some(e.to_string()),
            }
        }
    }

    fn pump_hotkey_events(&mut self) {
        let Some(registered) = self.registered_hotkey else {
            return;
        };
        while let Ok(event) = GlobalHotKeyEvent::receiver().try_recv() {
            if event.id == registered.id() && event.state == HotKeyState::Pressed {
                self.player.toggle(&self.settings);
            }
        }
    }

    #[cfg(windows)]
    fn refresh_preview(&mut self, ctx: &egui::Context) {
        match crate::core::capture::grab_region(self.settings.capture_region) {
            Ok(frame) => {
                let size = [frame.width() as usize, frame.height() as usize];
                let image = egui::ColorImage::from_rgb(size, frame.as_raw());
                self.preview =
                    Some(ctx.load_texture("region_preview", image, egui::TextureOptions::NEAREST));
                self.layout_note = None;
            }
            Err(e) => self.layout_note = Some(e),
        }
    }

    #[cfg(not(windows))]
    fn refresh_preview(&mut self, _ctx: &egui::Context) {
        self.layout_note = Some("Screen preview is only available on Windows.".to_string());
    }

    #[cfg(windows)]
    fn grab_color(&mut self, index: usize) {
        let Some(pos) = self.settings.channels.get(index).map(|c| c.pos) else {
            return;
        };
        match crate::core::capture::grab_region(self.settings.capture_region) {
            Ok(frame) => {
                if pos.0 < frame.width() && pos.1 < frame.height() {
                    let pixel = frame.get_pixel(pos.0, pos.1).0;
                    self.settings.channels[index].color = (pixel[0], pixel[1], pixel[2]);
                } else {
                    self.layout_note =
                        Some("Channel coordinate lies outside the capture region.".to_string());
                }
            }
            Err(e) => self.layout_note = Some(e),
        }
    }

    #[cfg(not(windows))]
    fn grab_color(&mut self, _index: usize) {
        self.layout_note = Some("Color grabbing is only available on Windows.".to_string());
    }

    fn import_layout(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .pick_file()
        else {
            return;
        };
        match ChannelLayout::load_from(&path) {
            Ok(layout) => {
                self.settings.capture_region = layout.capture_region;
                self.settings.channels = layout.channels;
                self.layout_note =
                    Some(format!("Imported {} channels", self.settings.channels.len()));
            }
            Err(e) => self.layout_note = Some(e),
        }
    }

    fn export_layout(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name("rhythmhelper_layout.json")
            .save_file()
        else {
            return;
        };
        let layout = ChannelLayout {
            capture_region: self.settings.capture_region,
            channels: self.settings.channels.clone(),
        };
        self.layout_note = match layout.save_to(&path) {
            Ok(()) => Some("Layout exported".to_string()),
            Err(e) => Some(e),
        };
    }
}

impl Default for RhythmHelperApp {
    fn default() -> Self {
        Self::new()
    }
}

impl eframe::App for RhythmHelperApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.pump_hotkey_events();

        let settings_before = self.settings.clone();
        let is_running = self.player.is_running();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(4.0);
            let action = render_header(ui, &self.player.status(), self.hotkey_error.as_deref());
            match action {
                HeaderAction::ToggleLog => self.show_log = !self.show_log,
                HeaderAction::Help => self.show_help = !self.show_help,
                HeaderAction::None => {}
            }
            ui.add_space(4.0);
        });

        if self.show_log {
            if render_log_panel(ctx, &self.player.events(), is_running) {
                self.player.clear_events();
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let action =
                render_control_panel(ui, &mut self.settings, is_running, self.player.stats());
            match action {
                PlayerUiAction::Start => self.player.start(&self.settings),
                PlayerUiAction::Stop => self.player.stop(),
                PlayerUiAction::OpenChannelSettings => self.show_channel_settings = true,
                PlayerUiAction::OpenHumanizerSettings => self.show_humanizer_settings = true,
                PlayerUiAction::None => {}
            }
        });

        if self.show_channel_settings {
            let mut open = self.show_channel_settings;
            let action = render_channel_settings(
                ctx,
                &mut open,
                &mut self.settings,
                self.preview.as_ref(),
                self.layout_note.as_deref(),
                is_running,
            );
            self.show_channel_settings = open;
            match action {
                ChannelUiAction::RefreshPreview => self.refresh_preview(ctx),
                ChannelUiAction::GrabColor(index) => self.grab_color(index),
                ChannelUiAction::ImportLayout => self.import_layout(),
                ChannelUiAction::ExportLayout => self.export_layout(),
                ChannelUiAction::None => {}
            }
        }

        if self.show_humanizer_settings {
            let mut open = self.show_humanizer_settings;
            render_humanizer_settings(ctx, &mut open, &mut self.settings.humanizer, is_running);
            self.show_humanizer_settings = open;
        }

        if self.show_help {
            let mut open = self.show_help;
            egui::Window::new("Help")
                .open(&mut open)
                .default_width(420.0)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        render_help(ui, &self.settings);
                    });
                });
            self.show_help = open;
        }

        if self.settings != settings_before {
            if self.settings.toggle_hotkey != settings_before.toggle_hotkey {
                self.register_toggle_hotkey();
            }
            self.settings.auto_save();
        }

        // Keep status, counters and the event feed live while playing
        if is_running {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
