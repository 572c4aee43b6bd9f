//! Engine configuration
//!
//! Built-in interval defaults overridden field-by-field by an optional
//! config file and `ENGINE_*` environment variables.

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

/// Default oil-change distance interval in kilometers.
pub const DEFAULT_OIL_CHANGE_KM: u32 = 10_000;

/// Default period between general checks in days.
pub const DEFAULT_GENERAL_CHECK_DAYS: i64 = 180;

/// Engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Directory holding predictor artifacts
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,

    /// Default oil-change interval in km
    #[serde(default = "default_oil_change_km")]
    pub oil_change_km: u32,

    /// Days between general checks
    #[serde(default = "default_general_check_days")]
    pub general_check_days: i64,
}

fn default_model_dir() -> PathBuf {
    PathBuf::from("models")
}

fn default_oil_change_km() -> u32 {
    DEFAULT_OIL_CHANGE_KM
}

fn default_general_check_days() -> i64 {
    DEFAULT_GENERAL_CHECK_DAYS
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model_dir: default_model_dir(),
            oil_change_km: default_oil_change_km(),
            general_check_days: default_general_check_days(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from the default file location and environment.
    pub fn load() -> Result<Self> {
        Self::load_from("engine")
    }

    /// Load configuration from a named file source (extension optional,
    /// missing file is not an error) with `ENGINE_*` environment overrides.
    pub fn load_from(file: &str) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(file).required(false))
            .add_source(config::Environment::with_prefix("ENGINE"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_default())
    }
}
