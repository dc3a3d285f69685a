//! Interaction core for pull-to-refresh and scroll-triggered load more
//!
//! Converts raw drag and scroll samples into discrete pull and load states,
//! damps the visible pull distance with a resistance curve, and reports the
//! side effects a host must perform (invoke callbacks, schedule timers,
//! bind scroll listeners) as plain values. Nothing in this crate touches a
//! DOM or a clock, so every transition is testable on the host.

pub mod config;
pub mod controller;
pub mod effect;
pub mod load;
#[cfg(feature = "subscriber")]
pub mod logging;
pub mod pull;
pub mod resistance;
pub mod scroll;
pub mod status;
pub mod timer;

pub use config::PullConfig;
pub use controller::{Controller, Env, Inputs};
pub use effect::{Effect, Event, Step};
pub use load::LoadMachine;
pub use pull::{PullMachine, PullState};
pub use scroll::{BindingKey, ScrollMonitor, ScrollSample};
pub use status::{LoadStatus, PullStatus};
pub use timer::{TimerKind, TimerSlot, TimerToken};

/// Errors raised while building or validating a controller
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, Error>;
