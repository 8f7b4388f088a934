//! Probe targets and reachability states

use serde::{Deserialize, Serialize};
use std::fmt;

/// A deployed project whose URL is checked for reachability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeTarget {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
}

impl ProbeTarget {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            url: url.into(),
        }
    }
}

/// Reachability of a probe target within one page view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReachabilityState {
    Pending,
    Reachable,
    Unreachable,
}

impl ReachabilityState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, ReachabilityState::Pending)
    }
}

impl fmt::Display for ReachabilityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReachabilityState::Pending => write!(f, "Checking..."),
            ReachabilityState::Reachable => write!(f, "Online"),
            ReachabilityState::Unreachable => write!(f, "Offline"),
        }
    }
}

/// A target together with its current reachability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetStatus {
    #[serde(flatten)]
    pub target: ProbeTarget,
    pub state: ReachabilityState,
}

impl TargetStatus {
    pub fn pending(target: ProbeTarget) -> Self {
        Self {
            target,
            state: ReachabilityState::Pending,
        }
    }
}
