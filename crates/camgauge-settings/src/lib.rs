//! CamGauge Settings Crate
//!
//! Typed detection and display settings, persisted as JSON or TOML, and
//! exposed to the detection stage through the key-based
//! [`camgauge_core::ParameterSource`] seam.

pub mod config;
pub mod error;

pub use config::{CircleDetectionSettings, Config, LineDetectionSettings, UiSettings};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
