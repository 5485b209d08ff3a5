#[cfg(windows)]
pub mod capture;
pub mod dispatcher;
pub mod engine;
pub mod frame;
pub mod hotkey;
pub mod humanizer;
pub mod input;
pub mod keys;
pub mod note_state;
pub mod sampler;
