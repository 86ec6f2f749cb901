//! Configuration for applications embedding the geometry engine.
//!
//! Supports TOML files and environment variables, with defaults matching
//! the Google Maps JavaScript API.

use crate::{GeoError, Result, Sphere, DEFAULT_TOLERANCE, EARTH_RADIUS_M};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use tracing::instrument;

/// Environment variable overriding the sphere radius in meters.
pub const RADIUS_ENV: &str = "ORBIS_EARTH_RADIUS_M";

/// Environment variable overriding the proximity tolerance in meters.
pub const TOLERANCE_ENV: &str = "ORBIS_TOLERANCE_M";

/// Geometry configuration.
///
/// ```toml
/// radius_m = 6371008.8
/// tolerance_m = 0.5
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoConfig {
    /// Sphere radius in meters
    pub radius_m: f64,
    /// Tolerance for the on-edge / on-path predicates, in meters
    pub tolerance_m: f64,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            radius_m: EARTH_RADIUS_M,
            tolerance_m: DEFAULT_TOLERANCE,
        }
    }
}

impl GeoConfig {
    /// Parse configuration from a TOML string. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| GeoError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content).map_err(|e| match e {
            GeoError::Config(msg) => {
                GeoError::Config(format!("{} ({})", msg, path.display()))
            }
            other => other,
        })?;
        tracing::debug!(
            radius_m = config.radius_m,
            tolerance_m = config.tolerance_m,
            "Config loaded"
        );
        Ok(config)
    }

    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `ORBIS_EARTH_RADIUS_M`: sphere radius in meters
    /// - `ORBIS_TOLERANCE_M`: proximity tolerance in meters
    ///
    /// Unset or unparseable values fall back to the defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Like [`GeoConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let parse = |name: &str| lookup(name).and_then(|s| s.trim().parse::<f64>().ok());
        let config = Self {
            radius_m: parse(RADIUS_ENV).unwrap_or(defaults.radius_m),
            tolerance_m: parse(TOLERANCE_ENV).unwrap_or(defaults.tolerance_m),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.radius_m.is_finite() && self.radius_m > 0.0) {
            return Err(GeoError::InvalidRadius(self.radius_m));
        }
        if !(self.tolerance_m.is_finite() && self.tolerance_m >= 0.0) {
            return Err(GeoError::InvalidTolerance(self.tolerance_m));
        }
        Ok(())
    }

    /// The sphere described by this configuration.
    pub fn sphere(&self) -> Result<Sphere> {
        Sphere::new(self.radius_m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = GeoConfig::default();
        assert_eq!(config.radius_m, 6_378_137.0);
        assert_eq!(config.tolerance_m, 0.1);
        assert_eq!(config.sphere().unwrap(), Sphere::EARTH);
    }

    #[test]
    fn test_from_toml_partial() {
        let config = GeoConfig::from_toml_str("radius_m = 1737400.0").unwrap();
        assert_eq!(config.radius_m, 1_737_400.0);
        assert_eq!(config.tolerance_m, DEFAULT_TOLERANCE);
    }

    #[test]
    fn test_from_toml_rejects_invalid() {
        assert!(matches!(
            GeoConfig::from_toml_str("radius_m = -1.0"),
            Err(GeoError::InvalidRadius(_))
        ));
        assert!(matches!(
            GeoConfig::from_toml_str("tolerance_m = -0.5"),
            Err(GeoError::InvalidTolerance(_))
        ));
        assert!(matches!(
            GeoConfig::from_toml_str("radius_m = \"big\""),
            Err(GeoError::Config(_))
        ));
    }

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn test_from_lookup_defaults_when_unset() {
        let config = GeoConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, GeoConfig::default());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let vars = [(RADIUS_ENV, " 1737400 "), (TOLERANCE_ENV, "2.5")];
        let config = GeoConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.radius_m, 1_737_400.0);
        assert_eq!(config.tolerance_m, 2.5);
    }

    #[test]
    fn test_from_lookup_unparseable_falls_back() {
        let vars = [(RADIUS_ENV, "six million"), (TOLERANCE_ENV, "")];
        let config = GeoConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config, GeoConfig::default());
    }

    #[test]
    fn test_from_lookup_rejects_invalid_values() {
        assert!(matches!(
            GeoConfig::from_lookup(lookup(&[(RADIUS_ENV, "0")])),
            Err(GeoError::InvalidRadius(_))
        ));
        assert!(matches!(
            GeoConfig::from_lookup(lookup(&[(TOLERANCE_ENV, "-1")])),
            Err(GeoError::InvalidTolerance(_))
        ));
        assert!(matches!(
            GeoConfig::from_lookup(lookup(&[(RADIUS_ENV, "inf")])),
            Err(GeoError::InvalidRadius(_))
        ));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "radius_m = 6371008.8\ntolerance_m = 0.5").unwrap();

        let config = GeoConfig::load(file.path()).unwrap();
        assert_eq!(config.radius_m, 6_371_008.8);
        assert_eq!(config.tolerance_m, 0.5);
        assert_eq!(config.sphere().unwrap().radius(), 6_371_008.8);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = GeoConfig::load(dir.path().join("missing.toml"));
        assert!(matches!(result, Err(GeoError::Io(_))));
    }

    #[test]
    fn test_config_serializes_to_toml() {
        let config = GeoConfig { radius_m: 1.0, tolerance_m: 0.0 };
        let text = toml::to_string(&config).unwrap();
        assert_eq!(GeoConfig::from_toml_str(&text).unwrap(), config);
    }
}
