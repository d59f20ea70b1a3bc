//! Network path transitions: immediate teardown on loss, replay on
//! recovery, and respect for a manual stop.

use std::time::Duration;

use aulos::prelude::*;
use aulos_session::mock::{MediaScript, MockMediaBridge};
use aulos_tests::{settle, wait_for_status, Harness};

#[tokio::test(start_paused = true)]
async fn losing_the_network_tears_down_without_waiting_for_the_bridge() {
    let harness = Harness::builder(MockMediaBridge::new(MediaScript::Ready)).build();

    harness.client.play();
    wait_for_status(&harness.client, PlayerStatus::Playing).await;

    // The scripted session emits nothing on link loss; only the path
    // observer drives the teardown.
    harness.monitor.set_path(NetworkPath::unsatisfied());
    wait_for_status(&harness.client, PlayerStatus::NoConnection).await;
    settle().await;

    assert_eq!(harness.bridge.live_sessions(), 0);
    assert!(!harness.client.status().is_playing);
}

#[tokio::test(start_paused = true)]
async fn recovery_replays_automatically() {
    let harness = Harness::builder(MockMediaBridge::new(MediaScript::Ready)).build();

    harness.client.play();
    wait_for_status(&harness.client, PlayerStatus::Playing).await;

    harness.monitor.set_path(NetworkPath::unsatisfied());
    wait_for_status(&harness.client, PlayerStatus::NoConnection).await;

    harness
        .monitor
        .set_path(NetworkPath::satisfied(InterfaceKind::Wifi));
    wait_for_status(&harness.client, PlayerStatus::Playing).await;
    settle().await;

    assert_eq!(harness.bridge.open_count(), 2);
    assert_eq!(harness.bridge.live_sessions(), 1);
    assert_eq!(harness.bridge.max_live_sessions(), 1);
}

#[tokio::test(start_paused = true)]
async fn manual_stop_suppresses_replay_on_recovery() {
    let harness = Harness::builder(MockMediaBridge::new(MediaScript::Ready)).build();

    harness.client.play();
    wait_for_status(&harness.client, PlayerStatus::Playing).await;
    harness.client.stop();
    wait_for_status(&harness.client, PlayerStatus::Stopped).await;

    harness.monitor.set_path(NetworkPath::unsatisfied());
    settle().await;
    harness
        .monitor
        .set_path(NetworkPath::satisfied(InterfaceKind::Wifi));
    tokio::time::sleep(Duration::from_secs(30)).await;
    settle().await;

    assert_eq!(harness.client.status().status, PlayerStatus::Stopped);
    assert_eq!(harness.bridge.open_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn loss_while_idle_is_quiet() {
    let harness = Harness::builder(MockMediaBridge::new(MediaScript::Ready)).build();

    harness.monitor.set_path(NetworkPath::unsatisfied());
    settle().await;

    // Nothing was requested, so nothing is reported and nothing replays.
    assert_eq!(harness.client.status().status, PlayerStatus::Idle);
    harness
        .monitor
        .set_path(NetworkPath::satisfied(InterfaceKind::Wifi));
    tokio::time::sleep(Duration::from_secs(30)).await;
    settle().await;
    assert_eq!(harness.bridge.open_count(), 0);
}
