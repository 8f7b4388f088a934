//! Per-view state: target reachability and the activity lifecycle

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::activity::FetchLifecycle;
use crate::target::{ProbeTarget, TargetStatus};

/// Everything one page view renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedState {
    pub deployments: Vec<TargetStatus>,
    pub activity: FetchLifecycle,
    pub mounted_at_epoch_ms: u64,
}

impl SharedState {
    pub fn new(targets: &[ProbeTarget], mounted_at_epoch_ms: u64) -> Self {
        Self {
            deployments: targets.iter().cloned().map(TargetStatus::pending).collect(),
            activity: FetchLifecycle::Loading,
            mounted_at_epoch_ms,
        }
    }

    /// Replace the whole set of target statuses at once
    pub fn replace_deployments(&mut self, statuses: Vec<TargetStatus>) {
        self.deployments = statuses;
    }

    /// Apply the outcome of the activity fetch, returning true if it was applied
    pub fn settle_activity(&mut self, outcome: FetchLifecycle) -> bool {
        self.activity.settle(outcome)
    }

    /// True once every target is terminal and the activity fetch has settled
    pub fn is_settled(&self) -> bool {
        self.deployments.iter().all(|d| d.state.is_terminal()) && !self.activity.is_loading()
    }
}

/// Thread-safe shared state handle
pub type StateHandle = Arc<RwLock<SharedState>>;

pub fn new_state_handle(targets: &[ProbeTarget], mounted_at_epoch_ms: u64) -> StateHandle {
    Arc::new(RwLock::new(SharedState::new(targets, mounted_at_epoch_ms)))
}
