//! Configuration file support for Ironlog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/ironlog/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub recommendation: RecommendationConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Tunables for the load-suggestion engine.
///
/// Defaults reproduce the stock progression rules; overriding them changes
/// how aggressively weights are adjusted, not the decision structure.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecommendationConfig {
    /// Multiplier applied to the last weight on an INCREASE (then ceiled)
    #[serde(default = "default_increase_factor")]
    pub increase_factor: f64,

    /// Multiplier applied to the last weight on a DECREASE (then floored)
    #[serde(default = "default_decrease_factor")]
    pub decrease_factor: f64,

    /// Added when percentage rounding would produce a no-op increase
    #[serde(default = "default_min_increase_kg")]
    pub min_increase_kg: f64,

    /// Extra rest suggested while an exercise is stagnating
    #[serde(default = "default_stagnation_rest_bonus")]
    pub stagnation_rest_bonus_seconds: u32,

    /// How many recent sessions to scan for stagnation data points
    #[serde(default = "default_stagnation_window")]
    pub stagnation_window: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            increase_factor: default_increase_factor(),
            decrease_factor: default_decrease_factor(),
            min_increase_kg: default_min_increase_kg(),
            stagnation_rest_bonus_seconds: default_stagnation_rest_bonus(),
            stagnation_window: default_stagnation_window(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("ironlog")
}

fn default_increase_factor() -> f64 {
    1.05
}

fn default_decrease_factor() -> f64 {
    0.95
}

fn default_min_increase_kg() -> f64 {
    2.0
}

fn default_stagnation_rest_bonus() -> u32 {
    30
}

fn default_stagnation_window() -> usize {
    4
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("ironlog").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Reject values that would break the suggestion arithmetic
    fn validate(&self) -> Result<()> {
        let rec = &self.recommendation;
        if rec.increase_factor < 1.0 {
            return Err(Error::Config(format!(
                "increase_factor must be >= 1.0, got {}",
                rec.increase_factor
            )));
        }
        if rec.decrease_factor <= 0.0 || rec.decrease_factor > 1.0 {
            return Err(Error::Config(format!(
                "decrease_factor must be in (0, 1], got {}",
                rec.decrease_factor
            )));
        }
        if rec.stagnation_window < 3 {
            return Err(Error::Config(
                "stagnation_window must be at least 3 (detection needs 3 data points)".into(),
            ));
        }
        Ok(())
    }
}
