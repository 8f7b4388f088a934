//! GitHub public events feed parsing
//!
//! The feed is read leniently: a field that is missing, `null` or of the
//! wrong type takes its default, and a commit that is not an object is
//! dropped without affecting its siblings.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single commit carried by a push event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    #[serde(default, deserialize_with = "string_or_default")]
    pub sha: String,
    #[serde(default, deserialize_with = "string_or_default")]
    pub message: String,
    #[serde(default, deserialize_with = "or_default")]
    pub url: Option<String>,
}

/// Payload of a `PushEvent`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushPayload {
    #[serde(default, rename = "ref")]
    pub git_ref: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub commits: Vec<Commit>,
}

/// The kinds of feed entries this service distinguishes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Push(PushPayload),
    Other(String),
}

/// A parsed entry of the public events feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubEvent {
    pub id: String,
    pub actor: String,
    pub repo: String,
    pub created_at: Option<DateTime<Utc>>,
    pub kind: EventKind,
}

impl GitHubEvent {
    /// Commits of a push event, or `None` for any other event kind
    pub fn push_commits(&self) -> Option<&[Commit]> {
        match &self.kind {
            EventKind::Push(payload) => Some(&payload.commits),
            EventKind::Other(_) => None,
        }
    }
}

/// Strings pass through, numbers are rendered, anything else is empty
fn string_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

#[derive(Debug, Default, Deserialize)]
struct RawActor {
    #[serde(default, deserialize_with = "string_or_default")]
    login: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawRepo {
    #[serde(default, deserialize_with = "string_or_default")]
    name: String,
}

/// Feed entry as it arrives; every field is optional
#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(default, deserialize_with = "string_or_default")]
    id: String,
    #[serde(default, rename = "type", deserialize_with = "string_or_default")]
    event_type: String,
    #[serde(default, deserialize_with = "or_default")]
    actor: RawActor,
    #[serde(default, deserialize_with = "or_default")]
    repo: RawRepo,
    #[serde(default)]
    payload: Value,
    #[serde(default, deserialize_with = "or_default")]
    created_at: Option<String>,
}

const PUSH_EVENT: &str = "PushEvent";

impl PushPayload {
    fn from_value(event_id: &str, payload: &Value) -> Self {
        let commits = match payload.get("commits") {
            Some(Value::Array(entries)) => entries
                .iter()
                .enumerate()
                .filter_map(|(index, entry)| match Commit::deserialize(entry) {
                    Ok(commit) => Some(commit),
                    Err(e) => {
                        tracing::debug!(
                            "Skipping commit {} of event '{}': {}",
                            index,
                            event_id,
                            e
                        );
                        None
                    }
                })
                .collect(),
            None | Some(Value::Null) => Vec::new(),
            Some(other) => {
                tracing::debug!(
                    "Ignoring non-array commits in event '{}': {}",
                    event_id,
                    other
                );
                Vec::new()
            }
        };

        Self {
            git_ref: payload.get("ref").and_then(Value::as_str).map(str::to_owned),
            size: payload.get("size").and_then(Value::as_u64),
            commits,
        }
    }
}

impl GitHubEvent {
    fn from_raw(raw: RawEvent) -> Self {
        let kind = if raw.event_type == PUSH_EVENT {
            EventKind::Push(PushPayload::from_value(&raw.id, &raw.payload))
        } else {
            EventKind::Other(raw.event_type)
        };

        let created_at = raw.created_at.as_deref().and_then(|ts| {
            DateTime::parse_from_rfc3339(ts)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| tracing::debug!("Ignoring timestamp {:?}: {}", ts, e))
                .ok()
        });

        Self {
            id: raw.id,
            actor: raw.actor.login,
            repo: raw.repo.name,
            created_at,
            kind,
        }
    }
}

/// Parse a feed response body.
///
/// The body must be a JSON array. Entries that are not objects are skipped.
pub fn parse_events(body: &str) -> crate::Result<Vec<GitHubEvent>> {
    let entries: Vec<Value> = serde_json::from_str(body)?;
    let total = entries.len();

    let events: Vec<GitHubEvent> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<RawEvent>(entry) {
            Ok(raw) => Some(GitHubEvent::from_raw(raw)),
            Err(e) => {
                tracing::debug!("Skipping feed entry {}: {}", index, e);
                None
            }
        })
        .collect();

    tracing::debug!("Parsed {} of {} feed entries", events.len(), total);
    Ok(events)
}
