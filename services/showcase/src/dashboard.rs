//! Web dashboard with JSON API endpoints and a server-rendered page

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect};
use axum::routing::{get, post};
use axum::Router;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::activity::FetchLifecycle;
use crate::render::{
    commit_count_label, format_relative, more_commits_label, truncate_message, COMMITS_SHOWN,
    MESSAGE_BUDGET,
};
use crate::target::ReachabilityState;
use crate::{MountedView, Showcase};

/// Dashboard application state
#[derive(Clone)]
pub struct DashboardState {
    pub showcase: Arc<Showcase>,
    pub current: Arc<RwLock<MountedView>>,
}

/// Build the dashboard axum router around an already mounted view
pub fn build_router(showcase: Arc<Showcase>, view: MountedView) -> Router {
    let dashboard_state = DashboardState {
        showcase,
        current: Arc::new(RwLock::new(view)),
    };

    Router::new()
        .route("/", get(index_handler))
        .route("/api/deployments", get(deployments_handler))
        .route("/api/activity", get(activity_handler))
        .route("/refresh", post(refresh_page_handler))
        .route("/api/refresh", post(refresh_handler))
        .route("/health", get(health_handler))
        .with_state(dashboard_state)
}

/// Serve the dashboard until `shutdown` is cancelled
pub async fn serve(
    showcase: Arc<Showcase>,
    view: MountedView,
    port: u16,
    shutdown: CancellationToken,
) -> crate::Result<()> {
    let router = build_router(showcase, view);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        crate::ShowcaseError::Dashboard(format!("Failed to bind port {}: {}", port, e))
    })?;
    tracing::info!("Dashboard listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
        })
        .await?;

    tracing::debug!("Dashboard stopped");
    Ok(())
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn badge_colors(state: ReachabilityState) -> (&'static str, &'static str) {
    match state {
        ReachabilityState::Reachable => ("#166534", "#dcfce7"),
        ReachabilityState::Unreachable => ("#991b1b", "#fee2e2"),
        ReachabilityState::Pending => ("#1e40af", "#dbeafe"),
    }
}

fn activity_html(activity: &FetchLifecycle) -> String {
    let now = chrono::Utc::now();
    match activity {
        FetchLifecycle::Loading => {
            r#"<div class="skeleton"></div>"#.repeat(6)
        }
        FetchLifecycle::Failed(reason) => format!(
            r#"<div style="color: #dc2626; border: 1px solid #fecaca; padding: 1rem; border-radius: 0.5rem;">Failed to load commits: {}</div>"#,
            escape_html(reason)
        ),
        FetchLifecycle::Ready(events) if events.is_empty() => {
            r#"<div style="text-align: center; color: #6b7280; padding: 1rem;">No recent commits found</div>"#
                .to_string()
        }
        FetchLifecycle::Ready(events) => events
            .iter()
            .map(|event| {
                let messages: String = event
                    .commit_messages()
                    .take(COMMITS_SHOWN)
                    .map(|m| {
                        format!(
                            "<p style=\"margin: 0.25rem 0;\">• {}</p>",
                            escape_html(&truncate_message(m, MESSAGE_BUDGET))
                        )
                    })
                    .collect();
                let more = more_commits_label(event.commits.len())
                    .map(|label| format!("<p style=\"font-size: 0.8em; color: #6b7280;\">{}</p>", label))
                    .unwrap_or_default();
                format!(
                    r#"<a href="{url}" style="display: block; padding: 1rem; margin-bottom: 0.75rem; border: 1px solid #e5e7eb; border-radius: 0.5rem; color: inherit; text-decoration: none;">
                    <div style="font-size: 0.8em; color: #6b7280;">{actor} • {when}</div>
                    <h4 style="margin: 0.5rem 0;">{repo}</h4>
                    {messages}{more}
                    <div style="font-size: 0.8em;">{count}</div>
                </a>"#,
                    url = escape_html(&event.repository_url()),
                    actor = escape_html(&event.actor_name),
                    when = format_relative(event.timestamp, now),
                    repo = escape_html(&event.repository_name),
                    messages = messages,
                    more = more,
                    count = commit_count_label(event.commits.len()),
                )
            })
            .collect(),
    }
}

async fn index_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let state = dashboard.current.read().await.state();
    let state = state.read().await;

    let deployment_rows: String = state
        .deployments
        .iter()
        .map(|d| {
            let (color, bg) = badge_colors(d.state);
            format!(
                r#"<tr style="border-bottom: 1px solid #dee2e6;">
                    <td style="padding: 0.5rem; font-weight: 500;">{}</td>
                    <td style="padding: 0.5rem; color: #6b7280;">{}</td>
                    <td style="padding: 0.5rem;"><a href="{}" target="_blank" rel="noopener noreferrer">Visit</a></td>
                    <td style="padding: 0.5rem;">
                        <span style="display: inline-block; padding: 0.25em 0.6em; border-radius: 0.25rem; font-size: 0.85em; font-weight: 600; color: {}; background-color: {};">{}</span>
                    </td>
                </tr>"#,
                escape_html(&d.target.name),
                escape_html(&d.target.description),
                escape_html(&d.target.url),
                color,
                bg,
                d.state
            )
        })
        .collect();

    let refresh = if state.is_settled() {
        ""
    } else {
        r#"<meta http-equiv="refresh" content="2">"#
    };

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    {refresh}
    <title>Showcase</title>
    <style>
        .skeleton {{ height: 4rem; margin-bottom: 0.75rem; border-radius: 0.5rem; background: #f3f4f6; }}
    </style>
</head>
<body style="font-family: system-ui, sans-serif; max-width: 960px; margin: 0 auto; padding: 1rem;">
    <h1>Showcase</h1>
    <section>
        <h2>Deployments</h2>
        <table style="width: 100%; border-collapse: collapse;">
            <thead>
                <tr style="border-bottom: 2px solid #dee2e6;">
                    <th style="padding: 0.5rem; text-align: left;">Name</th>
                    <th style="padding: 0.5rem; text-align: left;">Description</th>
                    <th style="padding: 0.5rem; text-align: left;">URL</th>
                    <th style="padding: 0.5rem; text-align: left;">Status</th>
                </tr>
            </thead>
            <tbody>{deployment_rows}</tbody>
        </table>
        <form method="post" action="/refresh"><button type="submit">Refresh</button></form>
    </section>
    <section>
        <h2>Recent Contributions</h2>
        {activity}
    </section>
</body>
</html>"#,
        refresh = refresh,
        deployment_rows = deployment_rows,
        activity = activity_html(&state.activity),
    );

    Html(html)
}

async fn deployments_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let state = dashboard.current.read().await.state();
    let deployments = state.read().await.deployments.clone();
    axum::Json(deployments)
}

async fn activity_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let state = dashboard.current.read().await.state();
    let activity = state.read().await.activity.clone();
    axum::Json(activity)
}

async fn remount(dashboard: &DashboardState) {
    let mut current = dashboard.current.write().await;
    current.unmount();
    *current = dashboard.showcase.mount();
    tracing::info!("Page view remounted");
}

async fn refresh_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    remount(&dashboard).await;
    StatusCode::ACCEPTED
}

/// Form target of the page's Refresh button; sends the browser back to `/`
async fn refresh_page_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    remount(&dashboard).await;
    Redirect::to("/")
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}
