//! Recent-activity fetcher for one GitHub account

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ActivityConfig;
use crate::github::{self, Commit, EventKind, GitHubEvent};
use crate::io::HttpClient;

/// Reason used when a failure carries no message of its own
pub const DEFAULT_FAILURE_REASON: &str = "Failed to fetch commits";

const GITHUB_HEADERS: &[(&str, &str)] = &[
    ("Accept", "application/vnd.github+json"),
    ("X-GitHub-Api-Version", "2022-11-28"),
];

/// A push event that survived filtering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub id: String,
    pub actor_name: String,
    pub repository_name: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub commits: Vec<Commit>,
}

impl ActivityEvent {
    pub fn commit_messages(&self) -> impl Iterator<Item = &str> {
        self.commits.iter().map(|c| c.message.as_str())
    }

    pub fn repository_url(&self) -> String {
        format!("https://github.com/{}", self.repository_name)
    }
}

/// Load state of one activity fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum FetchLifecycle {
    Loading,
    Ready(Vec<ActivityEvent>),
    Failed(String),
}

impl FetchLifecycle {
    /// A failed lifecycle; blank reasons fall back to a generic message
    pub fn failed(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        if reason.trim().is_empty() {
            FetchLifecycle::Failed(DEFAULT_FAILURE_REASON.to_string())
        } else {
            FetchLifecycle::Failed(reason)
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchLifecycle::Loading)
    }

    /// Move from `Loading` to a terminal state. Returns false, leaving the
    /// lifecycle untouched, when it has already settled or `outcome` is
    /// itself `Loading`.
    pub fn settle(&mut self, outcome: FetchLifecycle) -> bool {
        if !self.is_loading() || outcome.is_loading() {
            return false;
        }
        *self = outcome;
        true
    }
}

/// Keep push events with at least one commit, in feed order, up to `cap`
pub fn recent_pushes(events: Vec<GitHubEvent>, cap: usize) -> Vec<ActivityEvent> {
    events
        .into_iter()
        .filter_map(|event| match event.kind {
            EventKind::Push(payload) if !payload.commits.is_empty() => Some(ActivityEvent {
                id: event.id,
                actor_name: event.actor,
                repository_name: event.repo,
                timestamp: event.created_at,
                commits: payload.commits,
            }),
            _ => None,
        })
        .take(cap)
        .collect()
}

/// Fetches the public events feed once per call
pub struct ActivityFetcher {
    events_url: String,
    max_events: usize,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for ActivityFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityFetcher")
            .field("events_url", &self.events_url)
            .field("max_events", &self.max_events)
            .finish()
    }
}

impl ActivityFetcher {
    pub fn new(config: &ActivityConfig, http: Arc<dyn HttpClient>) -> Self {
        let events_url = format!(
            "{}/users/{}/events/public?per_page={}",
            config.api_base_url.trim_end_matches('/'),
            config.account,
            config.per_page
        );

        tracing::debug!("Created ActivityFetcher for {}", events_url);

        Self {
            events_url,
            max_events: config.max_events,
            http,
        }
    }

    pub fn events_url(&self) -> &str {
        &self.events_url
    }

    /// Request, parse, filter and truncate the feed
    pub async fn fetch(&self) -> crate::Result<Vec<ActivityEvent>> {
        let response = self.http.get(&self.events_url, GITHUB_HEADERS).await?;

        if !response.is_success() {
            tracing::debug!(
                "Non-success response from events feed: status={}",
                response.status
            );
            return Err(crate::ShowcaseError::Status(response.status));
        }

        let events = github::parse_events(&response.body)?;
        let pushes = recent_pushes(events, self.max_events);
        tracing::debug!("Events feed yielded {} push events", pushes.len());
        Ok(pushes)
    }

    /// Run one fetch and map the outcome to a terminal lifecycle
    pub async fn load(&self) -> FetchLifecycle {
        match self.fetch().await {
            Ok(events) => FetchLifecycle::Ready(events),
            Err(e) => {
                tracing::warn!("Error fetching GitHub events: {}", e);
                FetchLifecycle::failed(e.to_string())
            }
        }
    }
}
