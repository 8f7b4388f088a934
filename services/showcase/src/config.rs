//! Configuration types for the showcase service

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::target::ProbeTarget;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_targets")]
    pub targets: Vec<ProbeTarget>,
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub activity: ActivityConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            targets: default_targets(),
            probe: ProbeConfig::default(),
            activity: ActivityConfig::default(),
            dashboard: DashboardConfig::default(),
        }
    }
}

impl Config {
    /// Check the invariants the prober and fetcher rely on
    pub fn validate(&self) -> crate::Result<()> {
        if self.targets.is_empty() {
            return Err(crate::ShowcaseError::Config(
                "At least one probe target is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for target in &self.targets {
            if !seen.insert(target.id.as_str()) {
                return Err(crate::ShowcaseError::Config(format!(
                    "Duplicate target id '{}'",
                    target.id
                )));
            }
            let url = reqwest::Url::parse(&target.url).map_err(|e| {
                crate::ShowcaseError::Config(format!(
                    "Target '{}' has an invalid URL {:?}: {}",
                    target.id, target.url, e
                ))
            })?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(crate::ShowcaseError::Config(format!(
                    "Target '{}' must use http or https, got '{}'",
                    target.id,
                    url.scheme()
                )));
            }
        }

        if self.probe.timeout_ms == Some(0) {
            return Err(crate::ShowcaseError::Config(
                "Probe timeout_ms must be positive, use null for no bound".to_string(),
            ));
        }

        if self.activity.account.trim().is_empty() {
            return Err(crate::ShowcaseError::Config(
                "Activity account must not be empty".to_string(),
            ));
        }
        if self.activity.max_events == 0 {
            return Err(crate::ShowcaseError::Config(
                "Activity max_events must be at least 1".to_string(),
            ));
        }
        if !(1..=100).contains(&self.activity.per_page) {
            return Err(crate::ShowcaseError::Config(format!(
                "Activity per_page must be between 1 and 100, got {}",
                self.activity.per_page
            )));
        }

        Ok(())
    }
}

/// Reachability probe settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Upper bound on a single probe. `null` leaves probes unbounded.
    #[serde(default = "default_probe_timeout_ms")]
    pub timeout_ms: Option<u64>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_probe_timeout_ms(),
        }
    }
}

impl ProbeConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// GitHub activity feed settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityConfig {
    #[serde(default = "default_account")]
    pub account: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default = "default_max_events")]
    pub max_events: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            account: default_account(),
            api_base_url: default_api_base_url(),
            per_page: default_per_page(),
            max_events: default_max_events(),
            user_agent: default_user_agent(),
        }
    }
}

/// Dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_dashboard_port")]
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            port: default_dashboard_port(),
        }
    }
}

fn default_targets() -> Vec<ProbeTarget> {
    vec![
        ProbeTarget::new(
            "dep_001",
            "Portfolio Website",
            "Personal portfolio built with React and TypeScript",
            "https://myportfolio.com",
        ),
        ProbeTarget::new(
            "dep_002",
            "E-commerce Platform",
            "Full-stack e-commerce application with payment integration",
            "https://axel.dadawd",
        ),
        ProbeTarget::new(
            "dep_003",
            "Task Manager",
            "Collaborative task management tool with real-time updates",
            "https://taskmanager.com",
        ),
        ProbeTarget::new(
            "dep_004",
            "Weather Dashboard",
            "Real-time weather application with geolocation support",
            "https://weatherapp.com",
        ),
    ]
}

fn default_probe_timeout_ms() -> Option<u64> {
    Some(5000)
}

fn default_account() -> String {
    "LMSAIH".to_string()
}

fn default_api_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_per_page() -> u32 {
    50
}

fn default_max_events() -> usize {
    10
}

fn default_user_agent() -> String {
    concat!("showcase/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_dashboard_port() -> u16 {
    11116
}

/// Load and validate configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::ShowcaseError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}
