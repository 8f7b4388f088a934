//! BDD step definitions for the deployment reachability feature

use cucumber::{given, then, when};
use tokio_util::sync::CancellationToken;

use showcase::target::{ProbeTarget, ReachabilityState};

use crate::world::{HeadBehavior, ShowcaseWorld};

#[given(expr = "a deployment {string} at {string}")]
fn deployment_at(world: &mut ShowcaseWorld, id: String, url: String) {
    let name = format!("Deployment {}", id);
    world.targets.push(ProbeTarget::new(id, name, "", url));
}

#[given(expr = "the network answers {string} with status {int}")]
fn network_answers(world: &mut ShowcaseWorld, url: String, status: u16) {
    world
        .network
        .heads
        .insert(url, HeadBehavior::Respond(status));
}

#[given(expr = "the network rejects {string}")]
fn network_rejects(world: &mut ShowcaseWorld, url: String) {
    world.network.heads.insert(url, HeadBehavior::Reject);
}

#[given(expr = "the network never answers {string}")]
fn network_hangs(world: &mut ShowcaseWorld, url: String) {
    world.network.heads.insert(url, HeadBehavior::Hang);
}

#[given(expr = "a probe timeout of {int} milliseconds")]
fn probe_timeout(world: &mut ShowcaseWorld, ms: u64) {
    world.probe_timeout_ms = Some(ms);
}

#[when("the deployments are probed")]
async fn probe_deployments(world: &mut ShowcaseWorld) {
    let prober = world.prober();
    let statuses = prober
        .probe_all(&world.targets, &CancellationToken::new())
        .await;
    world.statuses = Some(statuses);
}

#[then(expr = "deployment {string} should be {string}")]
fn deployment_should_be(world: &mut ShowcaseWorld, id: String, expected: String) {
    let statuses = world.statuses.as_ref().expect("deployments not probed");
    let status = statuses
        .iter()
        .find(|s| s.target.id == id)
        .unwrap_or_else(|| panic!("no status for deployment {}", id));
    let expected_state = match expected.as_str() {
        "reachable" => ReachabilityState::Reachable,
        "unreachable" => ReachabilityState::Unreachable,
        "pending" => ReachabilityState::Pending,
        other => panic!("Unknown state: {}", other),
    };
    assert_eq!(status.state, expected_state);
}

#[then("every deployment should be settled")]
fn every_deployment_settled(world: &mut ShowcaseWorld) {
    let statuses = world.statuses.as_ref().expect("deployments not probed");
    assert_eq!(statuses.len(), world.targets.len());
    assert!(statuses.iter().all(|s| s.state.is_terminal()));
}

#[then(expr = "the deployments should be listed as {string}")]
fn deployments_listed_as(world: &mut ShowcaseWorld, order: String) {
    let statuses = world.statuses.as_ref().expect("deployments not probed");
    let ids: Vec<&str> = statuses.iter().map(|s| s.target.id.as_str()).collect();
    let expected: Vec<&str> = order.split(',').map(str::trim).collect();
    assert_eq!(ids, expected);
}
