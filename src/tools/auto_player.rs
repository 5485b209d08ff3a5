use crate::core::engine::{EngineConfig, PlayerEngine, SessionStats};
use crate::settings::{AppSettings, PlayMode};

/// The one tool this app ships: owns the player engine and translates
/// between UI actions and engine lifecycle.
pub struct AutoPlayerTool {
    engine: PlayerEngine,
    mode: PlayMode,
    error: Option<String>,
}

impl Default for AutoPlayerTool {
    fn default() -> Self {
        Self {
            engine: PlayerEngine::new(),
            mode: PlayMode::default(),
            error: None,
        }
    }
}

impl AutoPlayerTool {
    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    pub fn stats(&self) -> SessionStats {
        self.engine.stats()
    }

    pub fn events(&self) -> Vec<String> {
        self.engine.events()
    }

    pub fn clear_events(&self) {
        self.engine.clear_events();
    }

    /// Status line for the header: engine lifecycle, or the last start
    /// error until the next successful start.
    pub fn status(&self) -> String {
        if let Some(err) = &self.error {
            return format!("Error: {}", err);
        }
        match self.engine.status().as_str() {
            "Idle" => "Ready".to_string(),
            "Running" => format!("Running ({})", self.mode.display_name()),
            other => other.to_string(),
        }
    }

    pub fn toggle(&mut self, settings: &AppSettings) {
        if self.is_running() {
            self.stop();
        } else {
            self.start(settings);
        }
    }

    /// Build the live capture/injection backends and launch the engine.
    /// Failures land in the status line instead of propagating; the app
    /// keeps running either way.
    #[cfg(windows)]
    pub fn start(&mut self, settings: &AppSettings) {
        use crate::core::capture::ScreenRegionSource;
        use crate::core::input::SendInputActuator;

        if self.is_running() {
            return;
        }
        let source = match ScreenRegionSource::new(settings.capture_region) {
            Ok(source) => source,
            Err(e) => {
                self.error = Some(e);
                return;
            }
        };
        let config = EngineConfig::from_settings(settings);
        match self.engine.start(config, source, SendInputActuator) {
            Ok(()) => {
                self.mode = settings.mode;
                self.error = None;
            }
            Err(e) => self.error = Some(e),
        }
    }

    #[cfg(not(windows))]
    pub fn start(&mut self, settings: &AppSettings) {
        // The pipeline itself is portable; only the live backends are not.
        let _ = EngineConfig::from_settings(settings);
        self.error = Some("Live capture and key injection require Windows".to_string());
    }

    pub fn stop(&mut self) {
        self.engine.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_tool_is_ready() {
        let tool = AutoPlayerTool::default();
        assert!(!tool.is_running());
        assert_eq!(tool.status(), "Ready");
    }

    #[test]
    fn test_stop_without_start_is_harmless() {
        let mut tool = AutoPlayerTool::default();
        tool.stop();
        tool.stop();
        assert!(!tool.is_running());
    }

    #[cfg(not(windows))]
    #[test]
    fn test_start_off_windows_reports_error() {
        let mut tool = AutoPlayerTool::default();
        tool.start(&AppSettings::default());
        assert!(!tool.is_running());
        assert!(tool.status().starts_with("Error:"), "{}", tool.status());
    }
}
