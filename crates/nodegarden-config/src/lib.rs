//! Configuration file handling for nodegarden.
//!
//! The config lives in `config.toml` under the platform config directory.
//! A missing file, or missing keys inside it, fall back to defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use nodegarden_core::{BackgroundStyle, GardenParams, Theme};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const CONFIG_FILE: &str = "config.toml";
const LOG_FILE: &str = "nodegarden.log";

/// Errors raised while reading or writing the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config directory available on this platform")]
    NoConfigDir,

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Background animation shown at startup.
    pub style: BackgroundStyle,
    /// Day or night palette.
    pub theme: Theme,
    /// Surface pixels per braille dot.
    pub pixel_ratio: f64,
    /// Fixed RNG seed; random when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Node garden tunables.
    pub garden: GardenParams,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            style: BackgroundStyle::default(),
            theme: Theme::default(),
            pixel_ratio: 4.0,
            seed: None,
            garden: GardenParams::default(),
        }
    }
}

fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from("", "", "nodegarden").ok_or(ConfigError::NoConfigDir)
}

/// Path of the config file.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(project_dirs()?.config_dir().join(CONFIG_FILE))
}

/// Path of the log file written when logging is enabled.
pub fn log_path() -> Result<PathBuf, ConfigError> {
    Ok(project_dirs()?.data_local_dir().join(LOG_FILE))
}

impl Config {
    /// Load the config from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_path()?)
    }

    /// Load the config from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save the config to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_path()?)
    }

    /// Save the config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).map_err(io_err)?;
        tracing::debug!(path = %path.display(), "config saved");
        Ok(())
    }

    /// Reject values the simulation cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("pixel_ratio", self.pixel_ratio)?;
        positive("garden.density_divisor", self.garden.density_divisor)?;
        positive("garden.mass_min", self.garden.mass_min)?;
        positive("garden.anchor_mass", self.garden.anchor_mass)?;

        let finite = [
            ("garden.force_gain", self.garden.force_gain),
            ("garden.opacity_scale", self.garden.opacity_scale),
            ("garden.visibility_threshold", self.garden.visibility_threshold),
            ("garden.edge_margin", self.garden.edge_margin),
            ("garden.mass_max", self.garden.mass_max),
            ("garden.max_speed", self.garden.max_speed),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{value} is not a finite number"),
                });
            }
        }

        if self.garden.mass_max < self.garden.mass_min {
            return Err(ConfigError::Invalid {
                field: "garden.mass_max",
                reason: format!(
                    "{} is below mass_min {}",
                    self.garden.mass_max, self.garden.mass_min
                ),
            });
        }
        if self.garden.max_speed < 0.0 {
            return Err(ConfigError::Invalid {
                field: "garden.max_speed",
                reason: "must not be negative".to_string(),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} must be a positive number"),
        })
    }
}
