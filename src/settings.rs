use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::keys::ScanKey;

pub type Rgb8 = (u8, u8, u8);
/// Desktop rectangle as (left, top, right, bottom) in screen pixels.
pub type ScreenRect = (i32, i32, i32, i32);

/// Size of a (left, top, right, bottom) rectangle; zero if degenerate.
pub fn region_size(region: ScreenRect) -> (u32, u32) {
    let (left, top, right, bottom) = region;
    let width = (right - left).max(0) as u32;
    let height = (bottom - top).max(0) as u32;
    (width, height)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_channels")]
    pub channels: Vec<ChannelConfig>,

    /// Desktop region the frame source watches.
    #[serde(default = "default_capture_region")]
    pub capture_region: ScreenRect,

    #[serde(default)]
    pub mode: PlayMode,

    #[serde(default)]
    pub timing: TimingSettings,

    #[serde(default)]
    pub humanizer: HumanizerSettings,

    #[serde(default)]
    pub toggle_hotkey: HotkeyBinding,

    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            channels: default_channels(),
            capture_region: default_capture_region(),
            mode: PlayMode::default(),
            timing: TimingSettings::default(),
            humanizer: HumanizerSettings::default(),
            toggle_hotkey: HotkeyBinding::default(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

/// One watched point bound to one key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub label: String,
    pub key: ScanKey,
    /// Sample coordinate, local to the capture region.
    pub pos: (u32, u32),
    /// Exact note color at the sample coordinate.
    pub color: Rgb8,
}

impl ChannelConfig {
    pub fn new(label: &str, key: ScanKey, pos: (u32, u32), color: Rgb8) -> Self {
        Self {
            label: label.to_string(),
            key,
            pos,
            color,
        }
    }
}

fn default_channels() -> Vec<ChannelConfig> {
    vec![
        ChannelConfig::new("Lane 1", ScanKey::A, (75, 31), (217, 0, 255)),
        ChannelConfig::new("Lane 2", ScanKey::S, (228, 31), (255, 0, 4)),
        ChannelConfig::new("Lane 3", ScanKey::D, (384, 31), (255, 0, 4)),
        ChannelConfig::new("Lane 4", ScanKey::F, (537, 31), (217, 0, 255)),
    ]
}

fn default_capture_region() -> ScreenRect {
    (376, 630, 990, 768)
}

fn default_queue_capacity() -> usize {
    64
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlayMode {
    Normal,
    Rapid,
}

impl Default for PlayMode {
    fn default() -> Self {
        PlayMode::Normal
    }
}

impl PlayMode {
    pub fn all() -> &'static [PlayMode] {
        &[PlayMode::Normal, PlayMode::Rapid]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PlayMode::Normal => "Normal",
            PlayMode::Rapid => "Rapid",
        }
    }
}

/// Debounce thresholds, tunable per mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingSettings {
    #[serde(default = "default_normal_hold_ms")]
    pub normal_hold_ms: u64,
    #[serde(default = "default_rapid_hold_ms")]
    pub rapid_hold_ms: u64,
    #[serde(default = "default_min_release_ms")]
    pub min_release_ms: u64,
    #[serde(default = "default_double_note_ms")]
    pub double_note_ms: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            normal_hold_ms: default_normal_hold_ms(),
            rapid_hold_ms: default_rapid_hold_ms(),
            min_release_ms: default_min_release_ms(),
            double_note_ms: default_double_note_ms(),
        }
    }
}

impl TimingSettings {
    pub fn hold_ms(&self, mode: PlayMode) -> u64 {
        match mode {
            PlayMode::Normal => self.normal_hold_ms,
            PlayMode::Rapid => self.rapid_hold_ms,
        }
    }
}

fn default_normal_hold_ms() -> u64 {
    40
}

fn default_rapid_hold_ms() -> u64 {
    30
}

fn default_min_release_ms() -> u64 {
    20
}

fn default_double_note_ms() -> u64 {
    40
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanizerSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub preset: HumanizerPreset,
    /// Upper bound of the extra random delay before a press, in ms.
    #[serde(default = "default_random_delay_ms")]
    pub random_delay_ms: u64,
    /// Chance to skip a note entirely, in percent.
    #[serde(default = "default_miss_chance")]
    pub miss_chance_pct: f32,
    /// Hold duration jitter bound, in ms.
    #[serde(default = "default_hold_variation_ms")]
    pub hold_variation_ms: u64,
    /// Fixed delay before every press, in ms.
    #[serde(default = "default_reaction_time_ms")]
    pub reaction_time_ms: u64,
    /// Extra delay budget for early/late hits, in ms.
    #[serde(default = "default_timing_error_ms")]
    pub timing_error_ms: u64,
    #[serde(default = "default_window_chance")]
    pub early_chance_pct: u32,
    #[serde(default = "default_window_chance")]
    pub late_chance_pct: u32,
}

impl Default for HumanizerSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            preset: HumanizerPreset::default(),
            random_delay_ms: default_random_delay_ms(),
            miss_chance_pct: default_miss_chance(),
            hold_variation_ms: default_hold_variation_ms(),
            reaction_time_ms: default_reaction_time_ms(),
            timing_error_ms: default_timing_error_ms(),
            early_chance_pct: default_window_chance(),
            late_chance_pct: default_window_chance(),
        }
    }
}

impl HumanizerSettings {
    /// Overwrite the tunables with a preset's values.
    pub fn apply_preset(&mut self, preset: HumanizerPreset) {
        self.preset = preset;
        let values = match preset {
            HumanizerPreset::Beginner => (30, 5.0, 25, 120, 25, 30),
            HumanizerPreset::Intermediate => (20, 3.0, 20, 90, 20, 20),
            HumanizerPreset::Experienced => (15, 2.0, 15, 70, 15, 15),
            HumanizerPreset::Good => (10, 1.0, 10, 50, 10, 10),
            HumanizerPreset::FramePerfect => (0, 0.0, 0, 0, 0, 0),
            HumanizerPreset::Custom => return,
        };
        self.random_delay_ms = values.0;
        self.miss_chance_pct = values.1;
        self.hold_variation_ms = values.2;
        self.reaction_time_ms = values.3;
        self.timing_error_ms = values.4;
        self.early_chance_pct = values.5;
        self.late_chance_pct = values.5;
    }
}

fn default_random_delay_ms() -> u64 {
    15
}

fn default_miss_chance() -> f32 {
    2.0
}

fn default_hold_variation_ms() -> u64 {
    15
}

fn default_reaction_time_ms() -> u64 {
    70
}

fn default_timing_error_ms() -> u64 {
    15
}

fn default_window_chance() -> u32 {
    15
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HumanizerPreset {
    Beginner,
    Intermediate,
    Experienced,
    Good,
    FramePerfect,
    Custom,
}

impl Default for HumanizerPreset {
    fn default() -> Self {
        HumanizerPreset::Experienced
    }
}

impl HumanizerPreset {
    pub fn all() -> &'static [HumanizerPreset] {
        &[
            HumanizerPreset::Beginner,
            HumanizerPreset::Intermediate,
            HumanizerPreset::Experienced,
            HumanizerPreset::Good,
            HumanizerPreset::FramePerfect,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            HumanizerPreset::Beginner => "Beginner",
            HumanizerPreset::Intermediate => "Intermediate",
            HumanizerPreset::Experienced => "Experienced",
            HumanizerPreset::Good => "Good",
            HumanizerPreset::FramePerfect => "Frame perfect",
            HumanizerPreset::Custom => "Custom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HotkeyBinding {
    pub key: Option<HotkeyKey>,
    #[serde(default)]
    pub modifiers: HotkeyModifiers,
}

impl Default for HotkeyBinding {
    fn default() -> Self {
        Self {
            key: Some(HotkeyKey::F8),
            modifiers: HotkeyModifiers::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HotkeyModifiers {
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub shift: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HotkeyKey {
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
}

impl HotkeyKey {
    pub fn all() -> &'static [HotkeyKey] {
        &[
            HotkeyKey::F1,
            HotkeyKey::F2,
            HotkeyKey::F3,
            HotkeyKey::F4,
            HotkeyKey::F5,
            HotkeyKey::F6,
            HotkeyKey::F7,
            HotkeyKey::F8,
            HotkeyKey::F9,
            HotkeyKey::F10,
            HotkeyKey::F11,
            HotkeyKey::F12,
        ]
    }
}

/// Just the channel layout, for sharing between machines or songs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelLayout {
    pub capture_region: ScreenRect,
    pub channels: Vec<ChannelConfig>,
}

impl ChannelLayout {
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize layout: {}", e))?;
        fs::write(path, json).map_err(|e| format!("Failed to write layout file: {}", e))?;
        Ok(())
    }

    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents =
            fs::read_to_string(path).map_err(|e| format!("Failed to read layout file: {}", e))?;
        let layout: ChannelLayout = serde_json::from_str(&contents)
            .map_err(|e| format!("Layout file is not valid JSON: {}", e))?;
        if layout.channels.is_empty() {
            return Err("Layout file contains no channels".to_string());
        }
        Ok(layout)
    }
}

impl AppSettings {
    const SETTINGS_FILE: &'static str = "rhythmhelper_settings.json";

    /// Load settings from file, or create default if doesn't exist
    pub fn load() -> Self {
        match fs::read_to_string(Self::SETTINGS_FILE) {
            Ok(contents) => match serde_json::from_str::<AppSettings>(&contents) {
                Ok(mut settings) => {
                    // Ensure we have at least one channel
                    if settings.channels.is_empty() {
                        settings.channels = default_channels();
                    }
                    settings
                }
                Err(_) => Self::default(),
            },
            Err(_) => Self::default(),
        }
    }

    /// Save settings to file (auto-save)
    pub fn save(&self) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize: {}", e))?;

        fs::write(Self::SETTINGS_FILE, json).map_err(|e| format!("Failed to write file: {}", e))?;

        Ok(())
    }

    /// Auto-save (ignores errors)
    pub fn auto_save(&self) {
        let _ = self.save();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_channels_inside_region() {
        let settings = AppSettings::default();
        let (width, height) = region_size(settings.capture_region);
        for channel in &settings.channels {
            assert!(channel.pos.0 < width, "{} x out of region", channel.label);
            assert!(channel.pos.1 < height, "{} y out of region", channel.label);
        }
    }

    #[test]
    fn test_region_size_degenerate() {
        assert_eq!(region_size((100, 100, 100, 100)), (0, 0));
        assert_eq!(region_size((100, 100, 40, 120)), (0, 20));
    }

    #[test]
    fn test_apply_preset_sets_all_fields() {
        let mut settings = HumanizerSettings::default();
        settings.apply_preset(HumanizerPreset::Beginner);
        assert_eq!(settings.random_delay_ms, 30);
        assert_eq!(settings.miss_chance_pct, 5.0);
        assert_eq!(settings.hold_variation_ms, 25);
        assert_eq!(settings.reaction_time_ms, 120);
        assert_eq!(settings.timing_error_ms, 25);
        assert_eq!(settings.early_chance_pct, 30);
        assert_eq!(settings.late_chance_pct, 30);

        settings.apply_preset(HumanizerPreset::FramePerfect);
        assert_eq!(settings.random_delay_ms, 0);
        assert_eq!(settings.miss_chance_pct, 0.0);
    }

    #[test]
    fn test_apply_custom_preset_keeps_values() {
        let mut settings = HumanizerSettings::default();
        settings.random_delay_ms = 99;
        settings.apply_preset(HumanizerPreset::Custom);
        assert_eq!(settings.random_delay_ms, 99);
    }

    #[test]
    fn test_settings_round_trip() {
        let settings = AppSettings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let back: AppSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_settings_tolerate_missing_fields() {
        let parsed: AppSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, AppSettings::default());
    }
}
