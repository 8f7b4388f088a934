//! Page view: one mount of the prober and the activity fetcher

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio_util::sync::CancellationToken;

use crate::activity::ActivityFetcher;
use crate::prober::Prober;
use crate::state::StateHandle;
use crate::target::ProbeTarget;

/// Runs both components for one mount and writes their results into the
/// view's state while the view is still active
pub struct PageView {
    targets: Vec<ProbeTarget>,
    prober: Arc<Prober>,
    fetcher: Arc<ActivityFetcher>,
    state: StateHandle,
    cancel: CancellationToken,
}

impl PageView {
    pub fn new(
        targets: Vec<ProbeTarget>,
        prober: Arc<Prober>,
        fetcher: Arc<ActivityFetcher>,
        state: StateHandle,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            targets,
            prober,
            fetcher,
            state,
            cancel,
        }
    }

    pub fn state(&self) -> &StateHandle {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Run the prober and the fetcher concurrently. Returns once both have
    /// settled or the view has been cancelled.
    pub async fn run(&self) {
        tokio::join!(self.check_deployments(), self.load_activity());
        tracing::debug!("Page view finished (active={})", self.is_active());
    }

    async fn check_deployments(&self) {
        let statuses = self.prober.probe_all(&self.targets, &self.cancel).await;

        // No write after cancellation, even one that lands during the lock wait
        let mut state = self.state.write().await;
        if !self.is_active() {
            tracing::debug!("View cancelled, discarding {} probe results", statuses.len());
            return;
        }

        state.replace_deployments(statuses);
        tracing::debug!("Published reachability for {} targets", self.targets.len());
    }

    async fn load_activity(&self) {
        let outcome = tokio::select! {
            outcome = self.fetcher.load() => outcome,
            () = self.cancel.cancelled() => {
                tracing::debug!("View cancelled before activity fetch settled");
                return;
            }
        };

        let mut state = self.state.write().await;
        if !self.is_active() {
            tracing::debug!("View cancelled, discarding activity result");
            return;
        }

        if !state.settle_activity(outcome) {
            tracing::warn!("Activity lifecycle already settled, ignoring late result");
        }
    }
}

pub(crate) fn current_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
