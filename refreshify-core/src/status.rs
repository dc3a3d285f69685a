//! Pull and load status types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of the pull-to-refresh gesture
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum PullStatus {
    #[default]
    Normal,
    Pulling,
    CanRelease,
    Refreshing,
    Complete,
}

impl PullStatus {
    /// Pulling and CanRelease follow the finger with no transition
    pub fn is_tracking(self) -> bool {
        matches!(self, PullStatus::Pulling | PullStatus::CanRelease)
    }

    /// A refresh has been committed and drags are ignored until it settles
    pub fn is_settling(self) -> bool {
        matches!(self, PullStatus::Refreshing | PullStatus::Complete)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PullStatus::Normal => "normal",
            PullStatus::Pulling => "pulling",
            PullStatus::CanRelease => "canRelease",
            PullStatus::Refreshing => "refreshing",
            PullStatus::Complete => "complete",
        }
    }
}

impl fmt::Display for PullStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase of the scroll-triggered load more feature
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum LoadStatus {
    #[default]
    Normal,
    Loading,
    Complete,
    NoMore,
}

impl LoadStatus {
    /// Footer text used when the host supplies no renderer
    pub fn default_label(self) -> &'static str {
        match self {
            LoadStatus::Normal => "",
            LoadStatus::Loading => "Loading...",
            LoadStatus::Complete => "Loaded",
            LoadStatus::NoMore => "No more",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LoadStatus::Normal => "normal",
            LoadStatus::Loading => "loading",
            LoadStatus::Complete => "complete",
            LoadStatus::NoMore => "noMore",
        }
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
