//! Logging setup for native hosts
//!
//! The state machines only emit `tracing` events. Hosts that render with a
//! native toolkit (or tests) can install a subscriber with [`LoggingConfig`].

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::{Error, Result};

/// Environment variable consulted by [`LoggingConfig::from_env`]
pub const LOG_ENV: &str = "REFRESHIFY_LOG";

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,     // filter directive, e.g. "refreshify_core=debug"
    pub json_format: bool, // one JSON object per event
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            with_target: true,
        }
    }
}

impl LoggingConfig {
    /// Read the filter from `REFRESHIFY_LOG`, falling back to `info`
    pub fn from_env() -> Self {
        let level = std::env::var(LOG_ENV).unwrap_or_else(|_| "info".to_string());
        Self {
            level,
            ..Default::default()
        }
    }

    /// Install the global subscriber
    pub fn init(&self) -> Result<()> {
        let env_filter = EnvFilter::try_new(&self.level)
            .map_err(|e| Error::Logging(format!("bad filter {:?}: {}", self.level, e)))?;

        let layer = if self.json_format {
            fmt::layer()
                .with_target(self.with_target)
                .with_ansi(false)
                .json()
                .boxed()
        } else {
            fmt::layer()
                .with_target(self.with_target)
                .with_level(true)
                .boxed()
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer)
            .try_init()
            .map_err(|e| Error::Logging(e.to_string()))?;

        tracing::info!("Logging initialized - level: {}", self.level);
        Ok(())
    }
}
