//! Configuration system with YAML schema and validation.
//!
//! Mirrors the physical setup of the panel: a fixed grid reference, a
//! governed generator, the animation tick cadence, and the breaker
//! closing-time control. Mistakes are caught at load time through schema
//! validation plus a semantic pass.

use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::error::{SyncError, SyncResult};

/// Top-level synchroscope configuration.
///
/// Loaded from YAML files with full schema validation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ScopeConfig {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Grid reference settings.
    #[validate(nested)]
    #[serde(default)]
    pub grid: GridConfig,

    /// Generator settings and slider limits.
    #[validate(nested)]
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Tick cadence of the simulation driver.
    #[validate(nested)]
    #[serde(default)]
    pub tick: TickConfig,

    /// Breaker closing-time control settings.
    #[validate(nested)]
    #[serde(default)]
    pub breaker: BreakerConfig,

    /// How many rotation timestamps a snapshot exposes.
    #[validate(range(min = 1))]
    #[serde(default = "default_rotation_tail")]
    pub rotation_tail: usize,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

const fn default_rotation_tail() -> usize {
    5
}

impl ScopeConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> SyncResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> SyncResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;

        config.validate()?;
        config.validate_semantic()?;

        Ok(config)
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> ScopeConfigBuilder {
        ScopeConfigBuilder::default()
    }

    /// Validate semantic constraints beyond schema.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when cross-field constraints fail.
    pub fn validate_semantic(&self) -> SyncResult<()> {
        if self.generator.min_hz >= self.generator.max_hz {
            return Err(SyncError::config(format!(
                "generator frequency range is empty: [{}, {}]",
                self.generator.min_hz, self.generator.max_hz
            )));
        }

        if self.generator.initial_hz < self.generator.min_hz
            || self.generator.initial_hz > self.generator.max_hz
        {
            return Err(SyncError::config(format!(
                "initial generator frequency {} outside [{}, {}]",
                self.generator.initial_hz, self.generator.min_hz, self.generator.max_hz
            )));
        }

        if self.tick.interval_ms <= 0.0 || !self.tick.interval_ms.is_finite() {
            return Err(SyncError::config("tick interval must be positive"));
        }
        if self.tick.interval_ms > 1000.0 {
            return Err(SyncError::config(
                "tick interval above 1 s makes rotation detection unreliable",
            ));
        }

        if !(0.0..=100.0).contains(&self.breaker.initial_percent) {
            return Err(SyncError::config(
                "initial closing percent must be in [0, 100]",
            ));
        }

        Ok(())
    }
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            grid: GridConfig::default(),
            generator: GeneratorConfig::default(),
            tick: TickConfig::default(),
            breaker: BreakerConfig::default(),
            rotation_tail: default_rotation_tail(),
        }
    }
}

/// Grid reference settings.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GridConfig {
    /// Nominal grid frequency in Hz.
    #[validate(range(min = 1.0))]
    pub frequency_hz: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { frequency_hz: 50.0 }
    }
}

/// Generator settings and slider limits.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GeneratorConfig {
    /// Generator frequency at startup and after reset, in Hz.
    pub initial_hz: f64,
    /// Lower slider limit in Hz.
    #[validate(range(min = 1.0))]
    pub min_hz: f64,
    /// Upper slider limit in Hz.
    #[validate(range(min = 1.0))]
    pub max_hz: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            initial_hz: 50.1,
            min_hz: 49.0,
            max_hz: 51.0,
        }
    }
}

/// Tick cadence of the simulation driver.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TickConfig {
    /// Interval between animation frames in milliseconds.
    pub interval_ms: f64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self { interval_ms: 50.0 }
    }
}

/// Breaker closing-time control settings.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BreakerConfig {
    /// Slider percent at startup and after reset.
    pub initial_percent: f64,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            initial_percent: 50.0,
        }
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct ScopeConfigBuilder {
    grid_frequency_hz: Option<f64>,
    generator_initial_hz: Option<f64>,
    tick_interval_ms: Option<f64>,
    initial_percent: Option<f64>,
    rotation_tail: Option<usize>,
}

impl ScopeConfigBuilder {
    /// Set the grid frequency in Hz.
    #[must_use]
    pub const fn grid_frequency(mut self, hz: f64) -> Self {
        self.grid_frequency_hz = Some(hz);
        self
    }

    /// Set the initial generator frequency in Hz.
    #[must_use]
    pub const fn generator_frequency(mut self, hz: f64) -> Self {
        self.generator_initial_hz = Some(hz);
        self
    }

    /// Set the tick interval in milliseconds.
    #[must_use]
    pub const fn tick_interval_ms(mut self, ms: f64) -> Self {
        self.tick_interval_ms = Some(ms);
        self
    }

    /// Set the initial closing-time slider percent.
    #[must_use]
    pub const fn closing_percent(mut self, percent: f64) -> Self {
        self.initial_percent = Some(percent);
        self
    }

    /// Set the rotation-log tail length exposed in snapshots.
    #[must_use]
    pub const fn rotation_tail(mut self, n: usize) -> Self {
        self.rotation_tail = Some(n);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> ScopeConfig {
        let mut config = ScopeConfig::default();

        if let Some(hz) = self.grid_frequency_hz {
            config.grid.frequency_hz = hz;
        }
        if let Some(hz) = self.generator_initial_hz {
            config.generator.initial_hz = hz;
        }
        if let Some(ms) = self.tick_interval_ms {
            config.tick.interval_ms = ms;
        }
        if let Some(percent) = self.initial_percent {
            config.breaker.initial_percent = percent;
        }
        if let Some(n) = self.rotation_tail {
            config.rotation_tail = n;
        }

        config
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = ScopeConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.validate_semantic().is_ok());
        assert!((config.grid.frequency_hz - 50.0).abs() < f64::EPSILON);
        assert!((config.generator.initial_hz - 50.1).abs() < f64::EPSILON);
        assert!((config.tick.interval_ms - 50.0).abs() < f64::EPSILON);
        assert_eq!(config.rotation_tail, 5);
    }

    #[test]
    fn test_from_yaml_minimal() {
        let config = ScopeConfig::from_yaml("schema_version: \"1.0\"\n").unwrap();
        assert!((config.generator.initial_hz - 50.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_yaml_full() {
        let yaml = r"
schema_version: '1.0'
grid:
  frequency_hz: 60.0
generator:
  initial_hz: 60.2
  min_hz: 59.0
  max_hz: 61.0
tick:
  interval_ms: 25.0
breaker:
  initial_percent: 30.0
rotation_tail: 3
";
        let config = ScopeConfig::from_yaml(yaml).unwrap();
        assert!((config.grid.frequency_hz - 60.0).abs() < f64::EPSILON);
        assert!((config.generator.max_hz - 61.0).abs() < f64::EPSILON);
        assert!((config.tick.interval_ms - 25.0).abs() < f64::EPSILON);
        assert_eq!(config.rotation_tail, 3);
    }

    #[test]
    fn test_from_yaml_unknown_field_rejected() {
        let result = ScopeConfig::from_yaml("unknown_field: 1\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_semantic_empty_frequency_range() {
        let yaml = r"
generator:
  initial_hz: 50.0
  min_hz: 51.0
  max_hz: 49.0
";
        let err = ScopeConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("range is empty"));
    }

    #[test]
    fn test_semantic_initial_outside_range() {
        let yaml = r"
generator:
  initial_hz: 48.0
  min_hz: 49.0
  max_hz: 51.0
";
        let err = ScopeConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("outside"));
    }

    #[test]
    fn test_semantic_bad_tick_interval() {
        let yaml = "tick:\n  interval_ms: 0.0\n";
        assert!(ScopeConfig::from_yaml(yaml).is_err());

        let yaml = "tick:\n  interval_ms: 5000.0\n";
        assert!(ScopeConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_semantic_bad_initial_percent() {
        let yaml = "breaker:\n  initial_percent: 120.0\n";
        assert!(ScopeConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_builder() {
        let config = ScopeConfig::builder()
            .grid_frequency(60.0)
            .generator_frequency(60.3)
            .tick_interval_ms(20.0)
            .closing_percent(25.0)
            .rotation_tail(8)
            .build();

        assert!((config.grid.frequency_hz - 60.0).abs() < f64::EPSILON);
        assert!((config.generator.initial_hz - 60.3).abs() < f64::EPSILON);
        assert!((config.tick.interval_ms - 20.0).abs() < f64::EPSILON);
        assert!((config.breaker.initial_percent - 25.0).abs() < f64::EPSILON);
        assert_eq!(config.rotation_tail, 8);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = ScopeConfig::builder().generator_frequency(50.5).build();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let back = ScopeConfig::from_yaml(&yaml).unwrap();
        assert!((back.generator.initial_hz - 50.5).abs() < f64::EPSILON);
    }
}
