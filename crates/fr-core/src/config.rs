//! Engine configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::attitude::AngleUnit;
use crate::channels::RuleSet;
use crate::error::{Result, TelemetryError};

/// Recognised engine options, all overridable at construction time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Climb rate above which the vehicle is considered under power
    pub boost_threshold: f64,

    /// Sink rate below which the vehicle is considered descending
    pub descent_threshold: f64,

    /// Height above the lowest sample still counted as airborne
    pub landing_margin: f64,

    /// Playback tick period in milliseconds
    pub tick_interval_ms: u64,

    /// Unit of the roll/pitch/yaw columns in the loaded table
    pub angle_unit: AngleUnit,

    /// Column classification rules, in priority order
    pub rules: RuleSet,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            boost_threshold: 5.0,
            descent_threshold: -2.0,
            landing_margin: 2.0,
            tick_interval_ms: 33,
            angle_unit: AngleUnit::Degrees,
            rules: RuleSet::canonical(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration; missing fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| TelemetryError::invalid_config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that thresholds are usable
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("boost_threshold", self.boost_threshold),
            ("descent_threshold", self.descent_threshold),
            ("landing_margin", self.landing_margin),
        ] {
            if !value.is_finite() {
                return Err(TelemetryError::invalid_config(format!("{} must be finite", name)));
            }
        }

        if self.landing_margin <= 0.0 {
            return Err(TelemetryError::invalid_config("landing_margin must be positive"));
        }
        if self.boost_threshold <= self.descent_threshold {
            return Err(TelemetryError::invalid_config(
                "boost_threshold must be above descent_threshold",
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(TelemetryError::invalid_config("tick_interval_ms must be positive"));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn with_boost_threshold(mut self, threshold: f64) -> Self {
        self.boost_threshold = threshold;
        self
    }

    pub fn with_descent_threshold(mut self, threshold: f64) -> Self {
        self.descent_threshold = threshold;
        self
    }

    pub fn with_landing_margin(mut self, margin: f64) -> Self {
        self.landing_margin = margin;
        self
    }

    /// Set the tick period; sub-millisecond remainders round up
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        let millis = (interval.as_nanos() + 999_999) / 1_000_000;
        self.tick_interval_ms = u64::try_from(millis).unwrap_or(u64::MAX);
        self
    }

    pub fn with_angle_unit(mut self, unit: AngleUnit) -> Self {
        self.angle_unit = unit;
        self
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }
}
