//! Server configuration
//!
//! Read once from environment variables at startup. Unset variables fall back
//! to defaults; set-but-invalid values are a startup error.

use std::{env, fmt::Display, fs::read_to_string, path::PathBuf, str::FromStr};

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::validation::{Range, ValidationBounds};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATA_DIR: &str = "data";

const SECRETS_DIR: &str = "/run/secrets";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub model_path: PathBuf,
    pub min_max_scaler_path: PathBuf,
    pub standard_scaler_path: PathBuf,
    pub rotation_data_path: PathBuf,
    /// Shared bearer secret; `None` rejects every protected request
    pub api_token: Option<String>,
    pub bounds: ValidationBounds,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::from_lookup(|key| env::var(key).ok())?;
        if config.api_token.is_none() {
            config.api_token = read_secret("API_TOKEN");
        }
        Ok(config)
    }

    /// Build from an arbitrary key lookup (environment, test map, ...)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = PathBuf::from(
            lookup("DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
        );
        let path_or = |key: &str, file: &str| {
            lookup(key)
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir.join(file))
        };

        let defaults = ValidationBounds::default();
        let humidity = Range::new(
            try_load(&lookup, "HUMIDITY_MIN", defaults.humidity.min)?,
            try_load(&lookup, "HUMIDITY_MAX", defaults.humidity.max)?,
        );
        if humidity.min > humidity.max {
            bail!(
                "HUMIDITY_MIN ({}) is greater than HUMIDITY_MAX ({})",
                humidity.min,
                humidity.max
            );
        }

        Ok(Self {
            port: try_load(&lookup, "PORT", DEFAULT_PORT)?,
            model_path: path_or("MODEL_PATH", "model.json"),
            min_max_scaler_path: path_or("MINMAX_SCALER_PATH", "minmaxscaler.json"),
            standard_scaler_path: path_or("STANDARD_SCALER_PATH", "standscaler.json"),
            rotation_data_path: path_or("ROTATION_DATA_PATH", "crop_rotation.csv"),
            api_token: lookup("API_TOKEN")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            bounds: ValidationBounds { humidity, ..defaults },
        })
    }
}

fn try_load<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {} value: {:?}", key, raw)),
        None => {
            info!("{} not set, using default: {}", key, default);
            Ok(default)
        }
    }
}

fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("{}/{}", SECRETS_DIR, secret_name);

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            warn!("Failed to read {} from file: {}", secret_name, e);
        })
        .ok()
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.model_path, PathBuf::from("data/model.json"));
        assert_eq!(config.rotation_data_path, PathBuf::from("data/crop_rotation.csv"));
        assert_eq!(config.api_token, None);
        assert_eq!(config.bounds, ValidationBounds::default());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("DATA_DIR", "/srv/crops"),
            ("MODEL_PATH", "/models/forest.json"),
            ("API_TOKEN", " s3cret \n"),
            ("HUMIDITY_MIN", "20"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.model_path, PathBuf::from("/models/forest.json"));
        assert_eq!(config.standard_scaler_path, PathBuf::from("/srv/crops/standscaler.json"));
        assert_eq!(config.api_token.as_deref(), Some("s3cret"));
        assert_eq!(config.bounds.humidity, Range::new(20.0, 95.0));
        assert_eq!(config.bounds.rainfall, ValidationBounds::default().rainfall);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Config::from_lookup(lookup_from(&[("PORT", "not-a-port")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("HUMIDITY_MIN", "high")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("HUMIDITY_MIN", "96")])).is_err());
    }

    #[test]
    fn test_blank_token_is_unset() {
        let config = Config::from_lookup(lookup_from(&[("API_TOKEN", "   ")])).unwrap();
        assert_eq!(config.api_token, None);
    }
}
