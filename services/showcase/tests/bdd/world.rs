//! BDD test world for the showcase service

use std::collections::HashMap;
use std::sync::Arc;

use cucumber::World;
use showcase::activity::{ActivityFetcher, FetchLifecycle};
use showcase::config::{ActivityConfig, ProbeConfig};
use showcase::io::{HttpClient, HttpResponse};
use showcase::prober::Prober;
use showcase::target::{ProbeTarget, TargetStatus};
use showcase::ShowcaseError;

/// How the stub network answers a HEAD request
#[derive(Debug, Clone, Copy)]
pub enum HeadBehavior {
    Respond(u16),
    Reject,
    Hang,
}

/// A stub network layer keyed by URL. Unknown URLs are rejected.
#[derive(Debug, Clone, Default)]
pub struct StubNetwork {
    pub heads: HashMap<String, HeadBehavior>,
    pub feed: Option<Result<HttpResponse, String>>,
}

#[async_trait::async_trait]
impl HttpClient for StubNetwork {
    async fn head(&self, url: &str) -> showcase::Result<HttpResponse> {
        match self.heads.get(url).copied() {
            Some(HeadBehavior::Respond(status)) => Ok(HttpResponse {
                status,
                body: String::new(),
            }),
            Some(HeadBehavior::Hang) => std::future::pending().await,
            Some(HeadBehavior::Reject) | None => {
                Err(ShowcaseError::Http(format!("HEAD {} failed: connection refused", url)))
            }
        }
    }

    async fn get(&self, url: &str, _headers: &[(&str, &str)]) -> showcase::Result<HttpResponse> {
        match &self.feed {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(msg)) => Err(ShowcaseError::Http(msg.clone())),
            None => Err(ShowcaseError::Http(format!("GET {} failed: no route", url))),
        }
    }
}

#[derive(Debug, Default, World)]
pub struct ShowcaseWorld {
    pub network: StubNetwork,

    // Reachability testing
    pub targets: Vec<ProbeTarget>,
    pub probe_timeout_ms: Option<u64>,
    pub statuses: Option<Vec<TargetStatus>>,

    // Activity testing
    pub feed_events: Vec<serde_json::Value>,
    pub loads: Vec<FetchLifecycle>,
}

impl ShowcaseWorld {
    pub fn prober(&self) -> Prober {
        let config = ProbeConfig {
            timeout_ms: self.probe_timeout_ms.or(Some(5000)),
        };
        Prober::new(&config, Arc::new(self.network.clone()))
    }

    pub fn fetcher(&self) -> ActivityFetcher {
        ActivityFetcher::new(&ActivityConfig::default(), Arc::new(self.network.clone()))
    }

    /// Serve the accumulated feed events as a successful response
    pub fn publish_feed(&mut self) {
        self.network.feed = Some(Ok(HttpResponse {
            status: 200,
            body: serde_json::Value::Array(self.feed_events.clone()).to_string(),
        }));
    }
}
