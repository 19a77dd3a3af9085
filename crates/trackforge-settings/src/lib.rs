//! Trackforge Settings Crate
//!
//! Loads, validates, and saves the settings a board build runs with.

pub mod config;
pub mod error;

pub use config::{ExportSettings, Settings, SETTINGS_FILE_NAME};
pub use error::{SettingsError, SettingsResult};
