//! Reachability prober: concurrent HEAD probes joined into one result set

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::ProbeConfig;
use crate::io::HttpClient;
use crate::target::{ProbeTarget, ReachabilityState, TargetStatus};
use crate::ShowcaseError;

/// Issues one bounded probe per target and joins the outcomes
pub struct Prober {
    http: Arc<dyn HttpClient>,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for Prober {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Prober")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Prober {
    pub fn new(config: &ProbeConfig, http: Arc<dyn HttpClient>) -> Self {
        let timeout = config.timeout();
        tracing::debug!("Created Prober with timeout {:?}", timeout);
        Self { http, timeout }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Probe a single URL
    pub async fn probe(&self, url: &str, cancel: &CancellationToken) -> ReachabilityState {
        probe_url(self.http.as_ref(), url, self.timeout, cancel).await
    }

    /// Probe every target concurrently and wait for all of them to settle.
    ///
    /// The result keeps the order of `targets` and every entry is terminal.
    pub async fn probe_all(
        &self,
        targets: &[ProbeTarget],
        cancel: &CancellationToken,
    ) -> Vec<TargetStatus> {
        let handles: Vec<_> = targets
            .iter()
            .map(|target| {
                let http = Arc::clone(&self.http);
                let url = target.url.clone();
                let timeout = self.timeout;
                let cancel = cancel.clone();
                tokio::spawn(async move { probe_url(http.as_ref(), &url, timeout, &cancel).await })
            })
            .collect();

        let mut statuses = Vec::with_capacity(targets.len());
        for (target, handle) in targets.iter().zip(handles) {
            let state = match handle.await {
                Ok(state) => state,
                Err(e) => {
                    tracing::warn!("Probe task for '{}' did not complete: {}", target.id, e);
                    ReachabilityState::Unreachable
                }
            };
            tracing::debug!("Target '{}' is {}", target.id, state);
            statuses.push(TargetStatus {
                target: target.clone(),
                state,
            });
        }
        statuses
    }
}

/// Any completed response counts as reachable; the status code is opaque.
async fn probe_url(
    http: &dyn HttpClient,
    url: &str,
    timeout: Option<Duration>,
    cancel: &CancellationToken,
) -> ReachabilityState {
    let request = async {
        match timeout {
            Some(limit) => match tokio::time::timeout(limit, http.head(url)).await {
                Ok(result) => result,
                Err(_) => Err(ShowcaseError::Timeout(limit)),
            },
            None => http.head(url).await,
        }
    };

    let outcome = tokio::select! {
        result = request => result,
        () = cancel.cancelled() => Err(ShowcaseError::Cancelled),
    };

    match outcome {
        Ok(response) => {
            tracing::debug!("Probe {} settled (status {})", url, response.status);
            ReachabilityState::Reachable
        }
        Err(e) => {
            tracing::debug!("Probe {} failed: {}", url, e);
            ReachabilityState::Unreachable
        }
    }
}
