//! Configuration and settings management for CamGauge
//!
//! Configuration is organized into sections:
//! - Line detection (Canny thresholds, Hough voting and segment limits)
//! - Circle detection (Canny thresholds, center votes, radius range)
//! - UI preferences (label font size, default stroke style)
//!
//! Files are JSON or TOML, chosen by extension. A JSON file may also use the
//! flat key/value layout (`{"CannyLineLow": 50, ...}`) written by earlier
//! releases; it is recognised on load and merged over the defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use camgauge_core::params::{
    ParameterSource, CANNY_CIRCLE_HIGH, CANNY_CIRCLE_LOW, CANNY_LINE_HIGH, CANNY_LINE_LOW,
    CIRCLE_DET_MAX_RADIUS, CIRCLE_DET_MIN_DIST, CIRCLE_DET_MIN_RADIUS, CIRCLE_DET_PARAM2,
    DETECTION_KEYS, LINE_DET_MAX_GAP, LINE_DET_MIN_LENGTH, LINE_DET_THRESHOLD,
};

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

/// Amount a Canny high threshold is raised above the low one when repaired.
const CANNY_GAP: i64 = 50;

/// Accepted `(min, max)` range of each detection key.
fn range_of(key: &str) -> Option<(i64, i64)> {
    let range = match key {
        CANNY_LINE_LOW | CANNY_CIRCLE_LOW => (0, 255),
        // A repaired high threshold may sit above 255.
        CANNY_LINE_HIGH | CANNY_CIRCLE_HIGH => (0, 255 + CANNY_GAP),
        LINE_DET_THRESHOLD | LINE_DET_MIN_LENGTH => (1, 1000),
        LINE_DET_MAX_GAP => (0, 100),
        CIRCLE_DET_PARAM2 => (1, 200),
        CIRCLE_DET_MIN_DIST | CIRCLE_DET_MIN_RADIUS | CIRCLE_DET_MAX_RADIUS => (1, 4000),
        _ => return None,
    };
    Some(range)
}

/// Line detection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineDetectionSettings {
    /// Canny hysteresis low threshold
    pub canny_low: u32,
    /// Canny hysteresis high threshold
    pub canny_high: u32,
    /// Minimum Hough accumulator votes
    pub threshold: u32,
    /// Shortest accepted segment in pixels
    pub min_length: u32,
    /// Largest gap bridged inside one segment
    pub max_gap: u32,
}

impl Default for LineDetectionSettings {
    fn default() -> Self {
        Self {
            canny_low: 50,
            canny_high: 150,
            threshold: 50,
            min_length: 100,
            max_gap: 10,
        }
    }
}

/// Circle detection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircleDetectionSettings {
    /// Canny hysteresis low threshold
    pub canny_low: u32,
    /// Canny hysteresis high threshold
    pub canny_high: u32,
    /// Minimum center accumulator votes
    pub param2: u32,
    /// Minimum distance between detected centers
    pub min_dist: u32,
    /// Smallest radius searched
    pub min_radius: u32,
    /// Largest radius searched
    pub max_radius: u32,
}

impl Default for CircleDetectionSettings {
    fn default() -> Self {
        Self {
            canny_low: 50,
            canny_high: 150,
            param2: 30,
            min_dist: 20,
            min_radius: 10,
            max_radius: 100,
        }
    }
}

/// UI preference settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Label font size in pixels
    pub label_font_size: f32,
    /// Installed font family for labels; the bundled font when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_font_family: Option<String>,
    /// RGB color of new drawings
    pub default_color: [u8; 3],
    /// Stroke width of new drawings
    pub default_thickness: u32,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            label_font_size: 24.0,
            label_font_family: None,
            default_color: [0, 255, 0],
            default_thickness: 2,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Line detection parameters
    pub line_detection: LineDetectionSettings,
    /// Circle detection parameters
    pub circle_detection: CircleDetectionSettings,
    /// UI preferences
    pub ui: UiSettings,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> ConfigResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config location, e.g. `~/.config/camgauge/config.toml`.
    pub fn default_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| {
            SettingsError::ConfigDirectory("no configuration directory on this platform".into())
        })?;
        Ok(dir.join("camgauge").join("config.toml"))
    }

    /// Load config from file (JSON or TOML)
    ///
    /// JSON files in the flat key/value layout are accepted as well.
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)?;

        let config = match format {
            Format::Toml => toml::from_str(&content)?,
            Format::Json => {
                let value: Value = serde_json::from_str(&content)?;
                match value.as_object() {
                    Some(map) if Self::is_flat_layout(map) => {
                        tracing::debug!("Reading flat settings layout from {}", path.display());
                        let mut config = Self::default();
                        config.apply_key_values(map);
                        config
                    }
                    _ => serde_json::from_value(value)?,
                }
            }
        };

        config.validate()?;
        tracing::info!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Loads `path`, falling back to defaults when it is missing or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Using default settings ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to file (JSON or TOML), creating the parent directory.
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, content)?;
        tracing::info!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        for key in DETECTION_KEYS {
            let (min, max) = range_of(key).unwrap_or((i64::MIN, i64::MAX));
            if let Some(value) = self.get_int(key) {
                if value < min || value > max {
                    return Err(ConfigError::ValueOutOfRange {
                        key: key.to_string(),
                        value: value.to_string(),
                    });
                }
            }
        }

        let ordered = [
            (CANNY_LINE_LOW, CANNY_LINE_HIGH),
            (CANNY_CIRCLE_LOW, CANNY_CIRCLE_HIGH),
        ];
        for (low_key, high_key) in ordered {
            if self.get_int(low_key) >= self.get_int(high_key) {
                return Err(ConfigError::InvertedRange {
                    low_key: low_key.to_string(),
                    high_key: high_key.to_string(),
                });
            }
        }
        if self.circle_detection.min_radius > self.circle_detection.max_radius {
            return Err(ConfigError::InvertedRange {
                low_key: CIRCLE_DET_MIN_RADIUS.to_string(),
                high_key: CIRCLE_DET_MAX_RADIUS.to_string(),
            });
        }

        if !(self.ui.label_font_size.is_finite() && self.ui.label_font_size > 0.0) {
            return Err(ConfigError::ValueOutOfRange {
                key: "ui.label_font_size".to_string(),
                value: self.ui.label_font_size.to_string(),
            });
        }
        if self.ui.default_thickness == 0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "ui.default_thickness".to_string(),
                value: "0".to_string(),
            });
        }

        Ok(())
    }

    /// Clamps every detection value into its range and repairs inverted
    /// pairs: a Canny high threshold not above the low one becomes
    /// `low + 50`, a maximum radius below the minimum becomes the minimum.
    pub fn sanitize(&mut self) {
        for key in DETECTION_KEYS {
            if let Some(value) = self.get_int(key) {
                self.set_int(key, value);
            }
        }
        let line = &mut self.line_detection;
        if line.canny_high <= line.canny_low {
            line.canny_high = line.canny_low + CANNY_GAP as u32;
        }
        let circle = &mut self.circle_detection;
        if circle.canny_high <= circle.canny_low {
            circle.canny_high = circle.canny_low + CANNY_GAP as u32;
        }
        if circle.max_radius < circle.min_radius {
            circle.max_radius = circle.min_radius;
        }
        if !(self.ui.label_font_size.is_finite() && self.ui.label_font_size > 0.0) {
            self.ui.label_font_size = UiSettings::default().label_font_size;
        }
        self.ui.default_thickness = self.ui.default_thickness.max(1);
    }

    /// Stores `value` under a detection key, clamped into the key's range.
    ///
    /// # Returns
    ///
    /// `false` for keys that are not detection keys.
    pub fn set_int(&mut self, key: &str, value: i64) -> bool {
        let Some((min, max)) = range_of(key) else {
            return false;
        };
        let value = value.clamp(min, max) as u32;
        let slot = match key {
            CANNY_LINE_LOW => &mut self.line_detection.canny_low,
            CANNY_LINE_HIGH => &mut self.line_detection.canny_high,
            LINE_DET_THRESHOLD => &mut self.line_detection.threshold,
            LINE_DET_MIN_LENGTH => &mut self.line_detection.min_length,
            LINE_DET_MAX_GAP => &mut self.line_detection.max_gap,
            CANNY_CIRCLE_LOW => &mut self.circle_detection.canny_low,
            CANNY_CIRCLE_HIGH => &mut self.circle_detection.canny_high,
            CIRCLE_DET_PARAM2 => &mut self.circle_detection.param2,
            CIRCLE_DET_MIN_DIST => &mut self.circle_detection.min_dist,
            CIRCLE_DET_MIN_RADIUS => &mut self.circle_detection.min_radius,
            CIRCLE_DET_MAX_RADIUS => &mut self.circle_detection.max_radius,
            _ => return false,
        };
        *slot = value;
        true
    }

    fn is_flat_layout(map: &Map<String, Value>) -> bool {
        DETECTION_KEYS.iter().any(|key| map.contains_key(*key))
    }

    /// Merges a flat key/value map over this config, then sanitizes it.
    ///
    /// Keys that are not detection keys (camera serials, window sizes,
    /// calibration blocks) are skipped. Returns how many keys were applied.
    pub fn apply_key_values(&mut self, values: &Map<String, Value>) -> usize {
        let mut applied = 0;
        for (key, value) in values {
            if range_of(key).is_none() {
                tracing::debug!("Skipping setting '{}'", key);
                continue;
            }
            match value.as_i64() {
                Some(n) => {
                    self.set_int(key, n);
                    applied += 1;
                }
                None => tracing::warn!("Setting '{}' is not an integer: {}", key, value),
            }
        }
        self.sanitize();
        applied
    }

    /// Detection settings as a flat key/value map.
    pub fn to_key_values(&self) -> Map<String, Value> {
        DETECTION_KEYS
            .iter()
            .filter_map(|key| Some((key.to_string(), Value::from(self.get_int(key)?))))
            .collect()
    }
}

impl ParameterSource for Config {
    fn get_int(&self, key: &str) -> Option<i64> {
        let value = match key {
            CANNY_LINE_LOW => self.line_detection.canny_low,
            CANNY_LINE_HIGH => self.line_detection.canny_high,
            LINE_DET_THRESHOLD => self.line_detection.threshold,
            LINE_DET_MIN_LENGTH => self.line_detection.min_length,
            LINE_DET_MAX_GAP => self.line_detection.max_gap,
            CANNY_CIRCLE_LOW => self.circle_detection.canny_low,
            CANNY_CIRCLE_HIGH => self.circle_detection.canny_high,
            CIRCLE_DET_PARAM2 => self.circle_detection.param2,
            CIRCLE_DET_MIN_DIST => self.circle_detection.min_dist,
            CIRCLE_DET_MIN_RADIUS => self.circle_detection.min_radius,
            CIRCLE_DET_MAX_RADIUS => self.circle_detection.max_radius,
            _ => return None,
        };
        Some(i64::from(value))
    }
}
