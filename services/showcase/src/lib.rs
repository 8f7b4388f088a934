//! Showcase - portfolio deployment reachability and GitHub activity
//!
//! Probes a fixed set of deployed projects, loads recent public push events
//! for one GitHub account, and presents both as text, JSON, or a dashboard.

pub mod activity;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod github;
pub mod io;
pub mod prober;
pub mod render;
pub mod state;
pub mod target;
pub mod view;

pub use config::{load_config, Config};
pub use error::{Result, ShowcaseError};

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::activity::ActivityFetcher;
use crate::io::{HttpClient, ReqwestHttpClient};
use crate::prober::Prober;
use crate::state::{SharedState, StateHandle};
use crate::target::ProbeTarget;
use crate::view::PageView;

/// How the binary presents its results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Mount once, print the rendered page, exit
    Text,
    /// Mount once, print the snapshot as JSON, exit
    Json,
    /// Mount once and serve the dashboard until shutdown
    Serve,
}

/// Shared components from which page views are mounted
pub struct Showcase {
    targets: Vec<ProbeTarget>,
    prober: Arc<Prober>,
    fetcher: Arc<ActivityFetcher>,
    shutdown: CancellationToken,
}

impl std::fmt::Debug for Showcase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Showcase")
            .field("targets", &self.targets.len())
            .field("prober", &self.prober)
            .field("fetcher", &self.fetcher)
            .finish()
    }
}

impl Showcase {
    pub fn new(config: &Config, http: Arc<dyn HttpClient>, shutdown: CancellationToken) -> Self {
        Self {
            targets: config.targets.clone(),
            prober: Arc::new(Prober::new(&config.probe, Arc::clone(&http))),
            fetcher: Arc::new(ActivityFetcher::new(&config.activity, http)),
            shutdown,
        }
    }

    /// Start a new page view with fresh state
    pub fn mount(&self) -> MountedView {
        let state = state::new_state_handle(&self.targets, view::current_epoch_ms());
        let cancel = self.shutdown.child_token();
        let page = PageView::new(
            self.targets.clone(),
            Arc::clone(&self.prober),
            Arc::clone(&self.fetcher),
            Arc::clone(&state),
            cancel.clone(),
        );

        tracing::debug!("Mounting page view for {} targets", self.targets.len());
        let task = tokio::spawn(async move { page.run().await });

        MountedView {
            state,
            cancel,
            task: Some(task),
        }
    }

    /// Mount once and return the state after both components settled
    pub async fn snapshot_once(&self) -> SharedState {
        let mut view = self.mount();
        view.wait().await;
        let state = view.state();
        let snapshot = state.read().await.clone();
        snapshot
    }
}

/// Handle to a running or finished page view
#[derive(Debug)]
pub struct MountedView {
    state: StateHandle,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl MountedView {
    pub fn state(&self) -> StateHandle {
        Arc::clone(&self.state)
    }

    /// Deactivate the view; pending results are discarded
    pub fn unmount(&self) {
        self.cancel.cancel();
    }

    pub fn is_active(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Wait for the view task to finish
    pub async fn wait(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!("Page view task failed: {}", e);
            }
        }
    }
}

/// Run the showcase service with the given configuration
pub async fn run(config: Config, mode: Mode) -> Result<()> {
    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new(&config.activity.user_agent)?);
    let shutdown = CancellationToken::new();
    let showcase = Arc::new(Showcase::new(&config, http, shutdown.clone()));

    let cancel_for_signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown signal received");
                cancel_for_signal.cancel();
            }
            Err(e) => tracing::error!("Failed to listen for ctrl-c: {}", e),
        }
    });

    match mode {
        Mode::Text => {
            let snapshot = showcase.snapshot_once().await;
            print!("{}", render::render_page(&snapshot, chrono::Utc::now()));
        }
        Mode::Json => {
            let snapshot = showcase.snapshot_once().await;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Mode::Serve => {
            let view = showcase.mount();
            tracing::info!("Showcase dashboard starting");
            dashboard::serve(
                Arc::clone(&showcase),
                view,
                config.dashboard.port,
                shutdown.clone(),
            )
            .await?;
        }
    }

    tracing::info!("Showcase stopped");
    Ok(())
}
