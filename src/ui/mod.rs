pub mod app_header;
pub mod channel_settings;
pub mod control_panel;
pub mod help;
pub mod humanizer_settings;
pub mod log_panel;
pub mod status;
