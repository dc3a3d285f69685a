//! Tunables for the pull and load state machines
//!
//! Values come from:
//! 1. Explicit builder calls or component props (highest priority)
//! 2. TOML text handed to [`PullConfig::from_toml_str`]
//! 3. Default values (lowest priority)

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Display height assumed when the host cannot report one, in pixels
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 800.0;

/// Immutable per-mount tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullConfig {
    /// Duration of settling animations, in ms
    pub animation_duration_ms: u32,
    /// Delay before `complete` decays back to `normal`, in ms
    pub complete_delay_ms: u32,
    /// Height of the refresh head, in px
    pub head_height: f64,
    /// Damped distance before the percent starts counting, in px
    pub start_distance: f64,
    /// Stiffness multiplier in (0, 1]
    pub resistance: f64,
    /// Damped distance past `start_distance` that arms a refresh.
    /// `None` means `head_height`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    /// Distance from the bottom that triggers load more, in px
    pub load_more_threshold: f64,
    /// Normalization height for the resistance curve, in px
    pub viewport_height: f64,
}

impl Default for PullConfig {
    fn default() -> Self {
        Self {
            animation_duration_ms: 300,
            complete_delay_ms: 500,
            head_height: 50.0,
            start_distance: 30.0,
            resistance: 0.6,
            threshold: None,
            load_more_threshold: 50.0,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl PullConfig {
    /// Parse and validate TOML text; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Render the defaults as TOML
    pub fn generate_sample() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }

    /// Resolved refresh threshold
    pub fn threshold(&self) -> f64 {
        self.threshold.unwrap_or(self.head_height)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.resistance > 0.0 && self.resistance <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "resistance must be in (0, 1], got {}",
                self.resistance
            )));
        }

        if !(self.viewport_height > 0.0) || !self.viewport_height.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "viewport_height must be positive, got {}",
                self.viewport_height
            )));
        }

        let threshold = self.threshold();
        if !(threshold > 0.0) || !threshold.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "threshold must be positive, got {}",
                threshold
            )));
        }

        for (name, value) in [
            ("head_height", self.head_height),
            ("start_distance", self.start_distance),
            ("load_more_threshold", self.load_more_threshold),
        ] {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(Error::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }

    pub fn with_animation_duration_ms(mut self, ms: u32) -> Self {
        self.animation_duration_ms = ms;
        self
    }

    pub fn with_complete_delay_ms(mut self, ms: u32) -> Self {
        self.complete_delay_ms = ms;
        self
    }

    pub fn with_head_height(mut self, px: f64) -> Self {
        self.head_height = px;
        self
    }

    pub fn with_start_distance(mut self, px: f64) -> Self {
        self.start_distance = px;
        self
    }

    pub fn with_resistance(mut self, resistance: f64) -> Self {
        self.resistance = resistance;
        self
    }

    pub fn with_threshold(mut self, px: f64) -> Self {
        self.threshold = Some(px);
        self
    }

    pub fn with_load_more_threshold(mut self, px: f64) -> Self {
        self.load_more_threshold = px;
        self
    }

    pub fn with_viewport_height(mut self, px: f64) -> Self {
        self.viewport_height = px;
        self
    }
}
