//! Engine configuration
//!
//! Holds the investment catalog, milestone thresholds and the few tunable
//! horizons of the engine. Scoring weights and allocation fractions are
//! constants in their modules and are not configurable.
//!
//! ## Configuration Resolution
//!
//! 1. Explicit path from the caller (`--config`, `GOALPATH_CONFIG`), if it exists
//! 2. Override in the data dir (~/.local/share/goalpath/config/engine.toml)
//! 3. Embedded defaults (compiled into binary)

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::milestones::{Milestone, MilestoneSet};
use crate::models::{Catalog, InvestmentOption};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/engine.toml");

/// Environment variable the server reads for an explicit config path
pub const CONFIG_PATH_ENV: &str = "GOALPATH_CONFIG";

/// Horizon settings for deterministic projections
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionSettings {
    /// Cutoff after which a scenario is reported as unreachable
    pub max_horizon_months: u32,
    /// Annual inflation used for the inflation-adjusted target
    pub inflation_rate: f64,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            max_horizon_months: 600,
            inflation_rate: 0.06,
        }
    }
}

/// Defaults and limits for the seeded simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationSettings {
    pub default_iterations: u32,
    pub max_iterations: u32,
    pub default_seed: u64,
    /// Annualised standard deviation of sampled returns
    pub return_volatility: f64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            default_iterations: 1000,
            max_iterations: 10_000,
            default_seed: 42,
            return_volatility: 0.15,
        }
    }
}

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Embedded,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Embedded => write!(f, "embedded defaults"),
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub catalog: Catalog,
    pub milestones: MilestoneSet,
    pub projection: ProjectionSettings,
    pub simulation: SimulationSettings,
    pub source: ConfigSource,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            milestones: MilestoneSet::default(),
            projection: ProjectionSettings::default(),
            simulation: SimulationSettings::default(),
            source: ConfigSource::Embedded,
        }
    }
}

impl EngineConfig {
    /// Resolve configuration (explicit path, then user override, then embedded)
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let candidate = match explicit {
            Some(path) if path.exists() => Some(path.to_path_buf()),
            Some(path) => {
                debug!(path = %path.display(), "Config path does not exist, falling back");
                default_config_path().filter(|p| p.exists())
            }
            None => default_config_path().filter(|p| p.exists()),
        };

        let config = match candidate {
            Some(path) => {
                let content = fs::read_to_string(&path).map_err(|e| {
                    Error::Config(format!("Failed to read {}: {}", path.display(), e))
                })?;
                let mut config = parse_config(&content)?;
                config.source = ConfigSource::File(path);
                config
            }
            None => parse_config(DEFAULT_CONFIG)?,
        };

        info!(
            source = %config.source,
            options = config.catalog.len(),
            milestones = config.milestones.len(),
            "Engine configuration loaded"
        );
        Ok(config)
    }

    /// Parse configuration from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }

    pub fn option_by_name(&self, name: &str) -> Option<&InvestmentOption> {
        self.catalog
            .iter()
            .find(|o| o.name().eq_ignore_ascii_case(name))
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("goalpath").join("config").join("engine.toml"))
}

/// The six-option reference catalog, in tie-break order
pub fn default_catalog() -> Catalog {
    Arc::from(vec![
        InvestmentOption::builtin("Savings Account", 0.04, 0.1, 1.0),
        InvestmentOption::builtin("Fixed Deposits", 0.06, 0.2, 0.8),
        InvestmentOption::builtin("Mutual Funds", 0.12, 0.5, 0.6),
        InvestmentOption::builtin("Stock Market", 0.15, 0.8, 0.4),
        InvestmentOption::builtin("Real Estate", 0.10, 0.6, 0.2),
        InvestmentOption::builtin("Cryptocurrency", 0.25, 0.9, 0.3),
    ])
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    projection: Option<RawProjection>,
    simulation: Option<RawSimulation>,
    milestones: Option<Vec<Milestone>>,
    catalog: Option<Vec<InvestmentOption>>,
}

#[derive(Debug, Deserialize)]
struct RawProjection {
    max_horizon_months: Option<u32>,
    inflation_rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawSimulation {
    default_iterations: Option<u32>,
    max_iterations: Option<u32>,
    default_seed: Option<u64>,
    return_volatility: Option<f64>,
}

/// Parse config from TOML content, layering it over the defaults
fn parse_config(content: &str) -> Result<EngineConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = EngineConfig::default();

    if let Some(projection) = raw.projection {
        if let Some(months) = projection.max_horizon_months {
            if months == 0 {
                return Err(Error::Config("max_horizon_months must be > 0".into()));
            }
            config.projection.max_horizon_months = months;
        }
        if let Some(rate) = projection.inflation_rate {
            if !rate.is_finite() || rate < 0.0 {
                return Err(Error::Config("inflation_rate must be >= 0".into()));
            }
            config.projection.inflation_rate = rate;
        }
    }

    if let Some(simulation) = raw.simulation {
        if let Some(iterations) = simulation.default_iterations {
            config.simulation.default_iterations = iterations;
        }
        if let Some(max) = simulation.max_iterations {
            config.simulation.max_iterations = max;
        }
        if let Some(seed) = simulation.default_seed {
            config.simulation.default_seed = seed;
        }
        if let Some(vol) = simulation.return_volatility {
            if !vol.is_finite() || vol < 0.0 {
                return Err(Error::Config("return_volatility must be >= 0".into()));
            }
            config.simulation.return_volatility = vol;
        }
        if config.simulation.default_iterations == 0
            || config.simulation.default_iterations > config.simulation.max_iterations
        {
            return Err(Error::Config(
                "default_iterations must be within 1..=max_iterations".into(),
            ));
        }
    }

    if let Some(milestones) = raw.milestones {
        config.milestones =
            MilestoneSet::new(milestones).map_err(|e| Error::Config(e.to_string()))?;
    }

    if let Some(catalog) = raw.catalog {
        if catalog.is_empty() {
            return Err(Error::Config("catalog must contain at least one option".into()));
        }
        config.catalog = Arc::from(catalog);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_config_matches_builtin_defaults() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        let builtin = EngineConfig::default();

        assert_eq!(&config.catalog[..], &builtin.catalog[..]);
        assert_eq!(config.milestones, builtin.milestones);
        assert_eq!(config.projection, builtin.projection);
        assert_eq!(config.simulation, builtin.simulation);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_config(
            r#"
            [projection]
            inflation_rate = 0.04
            "#,
        )
        .unwrap();
        assert_eq!(config.projection.inflation_rate, 0.04);
        assert_eq!(config.projection.max_horizon_months, 600);
        assert_eq!(config.catalog.len(), 6);
        assert_eq!(config.milestones.len(), 3);
    }

    #[test]
    fn test_custom_catalog_and_milestones() {
        let config = parse_config(
            r#"
            [[catalog]]
            name = "Index Fund"
            expected_annual_return = 0.08
            risk_level = 0.4
            liquidity_score = 0.9

            [[milestones]]
            percentage = 90
            message = "Nearly done"

            [[milestones]]
            percentage = 10
            message = "Off to a start"
            "#,
        )
        .unwrap();

        assert_eq!(config.catalog.len(), 1);
        assert_eq!(config.catalog[0].name(), "Index Fund");
        assert_eq!(config.milestones.as_slice()[0].percentage, 10);
        assert!(config.option_by_name("index fund").is_some());
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(parse_config("[[catalog]]\nname = \"x\"\nexpected_annual_return = 3.0\nrisk_level = 0.1\nliquidity_score = 0.1").is_err());
        assert!(parse_config("catalog = []").is_err());
        assert!(parse_config("[projection]\nmax_horizon_months = 0").is_err());
        assert!(parse_config("[simulation]\ndefault_iterations = 50000").is_err());
        assert!(parse_config("not toml at all [").is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[projection]\nmax_horizon_months = 120").unwrap();

        let config = EngineConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.projection.max_horizon_months, 120);
        assert_eq!(config.source, ConfigSource::File(file.path().to_path_buf()));
    }

    #[test]
    fn test_catalog_is_shared() {
        let config = EngineConfig::default();
        let copy = config.clone();
        assert!(Arc::ptr_eq(&config.catalog, &copy.catalog));
    }
}
