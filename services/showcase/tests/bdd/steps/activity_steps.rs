//! BDD step definitions for the recent activity feature

use cucumber::{given, then, when};
use serde_json::json;

use showcase::activity::FetchLifecycle;
use showcase::io::HttpResponse;

use crate::world::ShowcaseWorld;

fn push_event(id: usize, commits: usize) -> serde_json::Value {
    let commits: Vec<_> = (0..commits)
        .map(|n| json!({"sha": format!("abc{id}{n}"), "message": format!("commit {n} of event {id}")}))
        .collect();
    json!({
        "id": id.to_string(),
        "type": "PushEvent",
        "actor": {"login": "LMSAIH"},
        "repo": {"name": format!("LMSAIH/project{id}")},
        "payload": {"commits": commits},
        "created_at": "2026-10-15T12:00:00Z"
    })
}

#[given(expr = "the events feed contains {int} push event(s)")]
fn feed_with_pushes(world: &mut ShowcaseWorld, count: usize) {
    let start = world.feed_events.len();
    for id in start..start + count {
        world.feed_events.push(push_event(id, 1));
    }
    world.publish_feed();
}

#[given(expr = "the events feed contains {int} issues event(s)")]
fn feed_with_issues(world: &mut ShowcaseWorld, count: usize) {
    for _ in 0..count {
        world.feed_events.push(json!({
            "id": "issue",
            "type": "IssuesEvent",
            "payload": {"action": "opened"}
        }));
    }
    world.publish_feed();
}

#[given("the events feed contains a push event without commits")]
fn feed_with_empty_push(world: &mut ShowcaseWorld) {
    world.feed_events.push(push_event(999, 0));
    world.publish_feed();
}

#[given(expr = "the events feed responds with status {int}")]
fn feed_status(world: &mut ShowcaseWorld, status: u16) {
    world.network.feed = Some(Ok(HttpResponse {
        status,
        body: r#"{"message": "API rate limit exceeded"}"#.to_string(),
    }));
}

#[given("the events feed is unreachable")]
fn feed_unreachable(world: &mut ShowcaseWorld) {
    world.network.feed = Some(Err("connection refused".to_string()));
}

#[given("the events feed returns malformed data")]
fn feed_malformed(world: &mut ShowcaseWorld) {
    world.network.feed = Some(Ok(HttpResponse {
        status: 200,
        body: "<html>oops</html>".to_string(),
    }));
}

#[when("the activity is loaded")]
async fn load_activity(world: &mut ShowcaseWorld) {
    let lifecycle = world.fetcher().load().await;
    world.loads.push(lifecycle);
}

#[when("the activity is loaded twice")]
async fn load_activity_twice(world: &mut ShowcaseWorld) {
    let fetcher = world.fetcher();
    let first = fetcher.load().await;
    let second = fetcher.load().await;
    world.loads.push(first);
    world.loads.push(second);
}

fn last_load(world: &ShowcaseWorld) -> &FetchLifecycle {
    world.loads.last().expect("activity not loaded")
}

#[then(expr = "the activity should be ready with {int} event(s)")]
fn ready_with(world: &mut ShowcaseWorld, count: usize) {
    match last_load(world) {
        FetchLifecycle::Ready(events) => assert_eq!(events.len(), count),
        other => panic!("expected ready, got {:?}", other),
    }
}

#[then("the events should be in feed order")]
fn in_feed_order(world: &mut ShowcaseWorld) {
    let FetchLifecycle::Ready(events) = last_load(world) else {
        panic!("expected ready");
    };
    let ids: Vec<usize> = events.iter().map(|e| e.id.parse().unwrap()).collect();
    let expected: Vec<usize> = (0..events.len()).collect();
    assert_eq!(ids, expected);
}

#[then("only push events should be listed")]
fn only_push_events(world: &mut ShowcaseWorld) {
    let FetchLifecycle::Ready(events) = last_load(world) else {
        panic!("expected ready");
    };
    assert!(events.iter().all(|e| !e.commits.is_empty()));
    assert!(events.iter().all(|e| e.repository_name.starts_with("LMSAIH/")));
}

#[then(expr = "the activity should have failed with a reason containing {string}")]
fn failed_with(world: &mut ShowcaseWorld, fragment: String) {
    match last_load(world) {
        FetchLifecycle::Failed(reason) => {
            assert!(!reason.is_empty());
            assert!(reason.contains(&fragment), "{reason}");
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[then("the activity should have failed")]
fn failed(world: &mut ShowcaseWorld) {
    match last_load(world) {
        FetchLifecycle::Failed(reason) => assert!(!reason.is_empty()),
        other => panic!("expected failure, got {:?}", other),
    }
}

#[then("both loads should be identical")]
fn loads_identical(world: &mut ShowcaseWorld) {
    assert_eq!(world.loads.len(), 2);
    assert_eq!(world.loads[0], world.loads[1]);
}
