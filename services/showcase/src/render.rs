//! Plain-text presentation of a page view

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::activity::{ActivityEvent, FetchLifecycle};
use crate::state::SharedState;
use crate::target::TargetStatus;

/// Commit messages longer than this are cut and suffixed with `...`
pub const MESSAGE_BUDGET: usize = 100;

/// Commit messages shown per event before collapsing into a "+N more" line
pub const COMMITS_SHOWN: usize = 2;

const SKELETON_ROWS: usize = 6;

/// Cut `message` to `max_chars` characters, trim, and append an ellipsis
pub fn truncate_message(message: &str, max_chars: usize) -> String {
    if message.chars().count() <= max_chars {
        return message.to_string();
    }
    let cut: String = message.chars().take(max_chars).collect();
    format!("{}...", cut.trim())
}

/// Relative age of `timestamp` as seen at `now`
pub fn format_relative(timestamp: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(timestamp) = timestamp else {
        return "unknown".to_string();
    };

    let seconds = (now - timestamp).num_seconds().max(0);
    match seconds {
        0..=59 => format!("{}s ago", seconds),
        60..=3599 => format!("{}m ago", seconds / 60),
        3600..=86_399 => format!("{}h ago", seconds / 3600),
        86_400..=2_591_999 => format!("{}d ago", seconds / 86_400),
        _ => timestamp.format("%-m/%-d/%Y").to_string(),
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

pub fn commit_count_label(count: usize) -> String {
    format!("{} commit{}", count, plural(count))
}

/// The "+N more commits" line, if any commits are hidden
pub fn more_commits_label(total: usize) -> Option<String> {
    let hidden = total.checked_sub(COMMITS_SHOWN).filter(|n| *n > 0)?;
    Some(format!("+{} more commit{}", hidden, plural(hidden)))
}

pub fn render_deployments(deployments: &[TargetStatus]) -> String {
    let mut out = String::from("Deployments\n");
    if deployments.is_empty() {
        out.push_str("  No results.\n");
        return out;
    }

    let name_width = deployments
        .iter()
        .map(|d| d.target.name.chars().count())
        .max()
        .unwrap_or(0);

    for deployment in deployments {
        let _ = writeln!(
            out,
            "  {:<width$}  [{}]  {}",
            deployment.target.name,
            deployment.state,
            deployment.target.url,
            width = name_width
        );
        if !deployment.target.description.is_empty() {
            let _ = writeln!(out, "  {:<width$}  {}", "", deployment.target.description, width = name_width);
        }
    }
    out
}

fn render_event(out: &mut String, event: &ActivityEvent, now: DateTime<Utc>) {
    let _ = writeln!(
        out,
        "  {} · {} · {}",
        event.repository_name,
        event.actor_name,
        format_relative(event.timestamp, now)
    );
    for message in event.commit_messages().take(COMMITS_SHOWN) {
        let _ = writeln!(out, "    • {}", truncate_message(message, MESSAGE_BUDGET));
    }
    if let Some(more) = more_commits_label(event.commits.len()) {
        let _ = writeln!(out, "    {}", more);
    }
    let _ = writeln!(
        out,
        "    {} · {}",
        commit_count_label(event.commits.len()),
        event.repository_url()
    );
}

pub fn render_activity(activity: &FetchLifecycle, now: DateTime<Utc>) -> String {
    let mut out = String::from("Recent Contributions\n");
    match activity {
        FetchLifecycle::Loading => {
            for _ in 0..SKELETON_ROWS {
                out.push_str("  ░░░░░░░░░░░░░░░░░░░░\n");
            }
        }
        FetchLifecycle::Failed(reason) => {
            let _ = writeln!(out, "  Failed to load commits: {}", reason);
        }
        FetchLifecycle::Ready(events) if events.is_empty() => {
            out.push_str("  No recent commits found\n");
        }
        FetchLifecycle::Ready(events) => {
            for event in events {
                render_event(&mut out, event, now);
            }
        }
    }
    out
}

/// Render the whole page as seen at `now`
pub fn render_page(state: &SharedState, now: DateTime<Utc>) -> String {
    format!(
        "{}\n{}",
        render_deployments(&state.deployments),
        render_activity(&state.activity, now)
    )
}
