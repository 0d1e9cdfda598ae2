//! Engine configuration.
//!
//! Viewport, timing and simulation settings plus the `[popups]` table.
//! Configuration can be loaded from and saved to a TOML file.

use ember_kernel::PopupSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "ember.toml";

/// Errors reading or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("config I/O error: {0}")]
    Io(#[from] io::Error),
    /// File is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    /// Configuration could not be serialized
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Engine configuration parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Viewport ===
    /// Viewport width in pixels
    pub viewport_width: u32,
    /// Viewport height in pixels
    pub viewport_height: u32,
    /// UI scale multiplier (screen pixels per overlay unit)
    pub ui_scale: f32,

    // === Timing ===
    /// Simulated frames per second
    pub target_fps: u32,
    /// Fixed simulation step in seconds
    pub fixed_dt: f32,

    // === Simulation ===
    /// Seconds of simulated play
    pub sim_seconds: f32,
    /// RNG seed for combat rolls and popup jitter (None = random)
    pub seed: Option<u64>,

    // === Output ===
    /// Use the JSON log formatter
    pub log_json: bool,
    /// Print the run summary as JSON on stdout
    pub print_summary: bool,

    /// Popup tuning
    pub popups: PopupSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280,
            viewport_height: 720,
            ui_scale: 1.0,

            target_fps: 60,
            fixed_dt: 1.0 / 60.0,

            sim_seconds: 8.0,
            seed: None,

            log_json: false,
            print_summary: true,

            popups: PopupSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a specific path.
    /// Returns default config if the file doesn't exist or is invalid.
    #[must_use]
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match Self::try_load_from(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to load config file: {e}");
                Self::default()
            },
        }
    }

    /// Load configuration from a specific path, reporting failures.
    pub fn try_load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&contents)?;
        config.validate();
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.viewport_width = self.viewport_width.clamp(320, 7680);
        self.viewport_height = self.viewport_height.clamp(240, 4320);
        self.ui_scale = if self.ui_scale.is_finite() {
            self.ui_scale.clamp(0.5, 3.0)
        } else {
            1.0
        };

        self.target_fps = self.target_fps.clamp(30, 240);
        self.fixed_dt = if self.fixed_dt.is_finite() {
            self.fixed_dt.clamp(0.001, 0.1)
        } else {
            1.0 / 60.0
        };

        self.sim_seconds = if self.sim_seconds.is_finite() {
            self.sim_seconds.clamp(0.0, 600.0)
        } else {
            0.0
        };

        if let Err(e) = self.popups.validate() {
            warn!("{e}; using default popup settings");
            self.popups = PopupSettings::default();
        }
    }
}
