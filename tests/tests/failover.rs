//! Candidate fallback: handshake timeouts, media failures and exhaustion.

use std::time::Duration;

use aulos::prelude::*;
use aulos_session::mock::{MediaScript, MockMediaBridge};
use aulos_tests::{settle, statuses_until, wait_for_status, Harness};

#[tokio::test(start_paused = true)]
async fn media_failure_falls_back_to_the_next_candidate() {
    let bridge = MockMediaBridge::new(MediaScript::Ready);
    // EU fails after the protection window; US delivers.
    bridge.script_host("-eu.", MediaScript::FailAfter(Duration::from_secs(2), "bad stream"));
    let harness = Harness::builder(bridge).build();
    let mut events = harness.client.subscribe();

    harness.client.play();
    let statuses = statuses_until(&mut events, PlayerStatus::Playing).await;

    assert!(statuses.contains(&PlayerStatus::Reconnecting));
    let opened = harness.bridge.opened();
    assert_eq!(opened.len(), 2);
    assert_eq!(opened[0].host_str(), Some("german-eu.radio.example.org"));
    assert_eq!(opened[1].host_str(), Some("german-us.radio.example.org"));
}

#[tokio::test(start_paused = true)]
async fn silent_handshake_times_out_and_fails_over() {
    let bridge = MockMediaBridge::new(MediaScript::Ready);
    bridge.script_host("-eu.", MediaScript::Silent);
    let harness = Harness::builder(bridge).build();

    let started = tokio::time::Instant::now();
    harness.client.play();
    wait_for_status(&harness.client, PlayerStatus::Playing).await;

    // The EU candidate had to run out its adaptive deadline first.
    assert!(started.elapsed() >= Duration::from_secs(4));
    assert_eq!(harness.bridge.open_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn exhausting_every_candidate_reports_stream_unavailable() {
    let bridge = MockMediaBridge::new(MediaScript::FailAfter(
        Duration::from_secs(2),
        "bad stream",
    ));
    let harness = Harness::builder(bridge).build();

    harness.client.play();
    wait_for_status(&harness.client, PlayerStatus::StreamUnavailable).await;
    settle().await;

    assert_eq!(harness.bridge.open_count(), 2);
    assert_eq!(harness.bridge.live_sessions(), 0);
    assert!(!harness.client.status().is_playing);
}

#[tokio::test(start_paused = true)]
async fn refused_open_counts_as_candidate_failure() {
    let bridge = MockMediaBridge::new(MediaScript::Ready);
    bridge.script_host("-eu.", MediaScript::RefuseOpen);
    let harness = Harness::builder(bridge).build();

    harness.client.play();
    wait_for_status(&harness.client, PlayerStatus::Playing).await;

    let opened = harness.bridge.opened();
    assert_eq!(opened.len(), 2);
    assert_eq!(opened[1].host_str(), Some("german-us.radio.example.org"));
}

#[tokio::test(start_paused = true)]
async fn early_failure_inside_protection_window_can_be_rescued() {
    // A spurious failure 100 ms in, then ready well inside the protection
    // window: the failure must be deferred and the ready honored.
    let bridge = MockMediaBridge::new(MediaScript::Sequence(vec![
        (
            Duration::from_millis(100),
            MediaEvent::Failed {
                reason: "handshake hiccup".into(),
            },
        ),
        (Duration::from_millis(500), MediaEvent::Ready),
    ]));
    let harness = Harness::builder(bridge).build();
    let mut events = harness.client.subscribe();

    harness.client.play();
    let statuses = statuses_until(&mut events, PlayerStatus::Playing).await;

    assert!(!statuses.contains(&PlayerStatus::Reconnecting));
    assert_eq!(harness.bridge.open_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn early_failure_without_rescue_fails_the_candidate() {
    let bridge = MockMediaBridge::new(MediaScript::Ready);
    // Fails 100 ms in and never recovers; once the protection window
    // elapses the candidate is done.
    bridge.script_host(
        "-eu.",
        MediaScript::Sequence(vec![(
            Duration::from_millis(100),
            MediaEvent::Failed {
                reason: "dead stream".into(),
            },
        )]),
    );
    let harness = Harness::builder(bridge).build();

    harness.client.play();
    wait_for_status(&harness.client, PlayerStatus::Playing).await;

    assert_eq!(harness.bridge.open_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn failure_after_playing_triggers_failover() {
    let bridge = MockMediaBridge::new(MediaScript::Ready);
    // EU comes up fine, then dies mid-playback.
    bridge.script_host(
        "-eu.",
        MediaScript::Sequence(vec![
            (Duration::ZERO, MediaEvent::Ready),
            (
                Duration::from_secs(60),
                MediaEvent::Failed {
                    reason: "stream died".into(),
                },
            ),
        ]),
    );
    let harness = Harness::builder(bridge).build();
    let mut events = harness.client.subscribe();

    harness.client.play();
    wait_for_status(&harness.client, PlayerStatus::Playing).await;

    // The mid-playback failure walks to the US candidate.
    let statuses = statuses_until(&mut events, PlayerStatus::Reconnecting).await;
    assert!(statuses.contains(&PlayerStatus::Reconnecting));
    wait_for_status(&harness.client, PlayerStatus::Playing).await;
    settle().await;

    assert_eq!(harness.bridge.open_count(), 2);
    assert_eq!(harness.bridge.live_sessions(), 1);
    assert_eq!(harness.bridge.max_live_sessions(), 1);
}
