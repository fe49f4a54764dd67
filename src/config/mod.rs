//! Configuration file support for formink.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/formink/config.toml`. Settings include tool defaults, stroke
//! smoothing thresholds, history limits, export layout, and the form catalog.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

pub use enums::ColorSpec;
pub use types::{
    CatalogConfig, DrawingConfig, ExportConfig, FormEntry, HistoryConfig, StrokeConfig,
};

use crate::draw::FontDescriptor;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// # Example TOML
/// ```toml
/// [drawing]
/// default_color = "#ff0000"
/// default_width = 3.0
///
/// [stroke]
/// throttle_ms = 6
///
/// [export]
/// page_width_mm = 210.0
///
/// [[catalog.forms]]
/// name = "NURSES NOTES"
/// url = "NURSES NOTES.jpg"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Initial tool, color, width, and text font
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Stroke throttling, smoothing, and tap detection
    #[serde(default)]
    pub stroke: StrokeConfig,

    /// Undo history limits
    #[serde(default)]
    pub history: HistoryConfig,

    /// Export, print, and message settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Form templates available to the session
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value (or replaced by
    /// the default) and a warning is logged.
    ///
    /// Validated ranges:
    /// - `default_width`: 1.0 - 50.0
    /// - `text_size_multiplier`: 1.0 - 20.0
    /// - `throttle_ms`: 0 - 100
    /// - `min_move_px`: 0.0 - 20.0
    /// - `dot_max_duration_ms`: 0 - 2000
    /// - `page_width_mm`: 50.0 - 1000.0
    /// - `footer_font_size`: 4.0 - 48.0
    pub fn validate_and_clamp(&mut self) {
        clamp_f64("default_width", &mut self.drawing.default_width, 1.0, 50.0);
        clamp_f64(
            "text_size_multiplier",
            &mut self.drawing.text_size_multiplier,
            1.0,
            20.0,
        );
        clamp_f64("min_move_px", &mut self.stroke.min_move_px, 0.0, 20.0);
        clamp_f64("page_width_mm", &mut self.export.page_width_mm, 50.0, 1000.0);
        clamp_f64("footer_font_size", &mut self.export.footer_font_size, 4.0, 48.0);

        if self.stroke.throttle_ms > 100 {
            warn!(
                "Invalid throttle_ms {}, clamping to 0-100 range",
                self.stroke.throttle_ms
            );
            self.stroke.throttle_ms = 100;
        }

        if self.stroke.dot_max_duration_ms > 2000 {
            warn!(
                "Invalid dot_max_duration_ms {}, clamping to 0-2000 range",
                self.stroke.dot_max_duration_ms
            );
            self.stroke.dot_max_duration_ms = 2000;
        }

        let valid_weight = matches!(
            self.drawing.font_weight.to_lowercase().as_str(),
            "normal" | "bold" | "light" | "ultralight" | "heavy" | "ultrabold"
        ) || self
            .drawing
            .font_weight
            .parse::<u32>()
            .is_ok_and(|w| (100..=900).contains(&w));

        if !valid_weight {
            warn!(
                "Invalid font_weight '{}', falling back to 'normal'",
                self.drawing.font_weight
            );
            self.drawing.font_weight = "normal".to_string();
        }

        if !matches!(
            self.drawing.font_style.to_lowercase().as_str(),
            "normal" | "italic" | "oblique"
        ) {
            warn!(
                "Invalid font_style '{}', falling back to 'normal'",
                self.drawing.font_style
            );
            self.drawing.font_style = "normal".to_string();
        }

        if url::Url::parse(&self.export.handoff_base_url).is_err() {
            warn!(
                "Invalid handoff_base_url '{}', falling back to the default",
                self.export.handoff_base_url
            );
            self.export.handoff_base_url = ExportConfig::default().handoff_base_url;
        }
    }

    /// Font descriptor for text overlays and footers.
    pub fn font_descriptor(&self) -> FontDescriptor {
        FontDescriptor::new(
            self.drawing.font_family.clone(),
            self.drawing.font_weight.clone(),
            self.drawing.font_style.clone(),
        )
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/formink/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("formink");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from `config_path`, or returns defaults if the file is missing.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or contains invalid TOML.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let config = Self::from_toml_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(config_str)?;
        config.validate_and_clamp();
        Ok(config)
    }

    /// Writes the documented example config to `config_path`.
    ///
    /// # Errors
    /// Returns an error if a file already exists there or it cannot be written.
    pub fn create_default_file(config_path: &Path) -> Result<()> {
        if config_path.exists() {
            return Err(anyhow::anyhow!(
                "Config file already exists at {}",
                config_path.display()
            ));
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(config_path, EXAMPLE_CONFIG)?;

        info!("Created default config at {}", config_path.display());
        Ok(())
    }

    /// JSON schema describing the config file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}

/// Documented example configuration shipped with the crate.
pub const EXAMPLE_CONFIG: &str = include_str!("../../config.example.toml");

fn clamp_f64(name: &str, value: &mut f64, min: f64, max: f64) {
    if !value.is_finite() {
        warn!("Invalid {} {}, using {:.1}", name, value, min);
        *value = min;
    } else if !(min..=max).contains(value) {
        warn!(
            "Invalid {} {:.1}, clamping to {:.1}-{:.1} range",
            name, value, min, max
        );
        *value = value.clamp(min, max);
    }
}
