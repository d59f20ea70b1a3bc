//! End-to-end controller sequencing against fully mocked collaborators.

use std::time::Duration;

use aulos::prelude::*;
use aulos_session::mock::{MediaScript, MockMediaBridge};
use aulos_tests::{settle, statuses_until, wait_for_status, Harness};

#[tokio::test(start_paused = true)]
async fn play_walks_the_full_sequence() {
    let harness = Harness::builder(MockMediaBridge::new(MediaScript::Ready)).build();
    let mut events = harness.client.subscribe();

    harness.client.play();
    let statuses = statuses_until(&mut events, PlayerStatus::Playing).await;

    assert_eq!(
        statuses,
        vec![
            PlayerStatus::Authorizing,
            PlayerStatus::SelectingServer,
            PlayerStatus::ValidatingTrust,
            PlayerStatus::Connecting,
            PlayerStatus::Playing,
        ]
    );
    assert!(harness.client.status().is_playing);

    // One candidate, one session: german on the EU origin with the
    // security model threaded through.
    let opened = harness.bridge.opened();
    assert_eq!(opened.len(), 1);
    assert_eq!(
        opened[0].as_str(),
        "https://german-eu.radio.example.org/stream.aac?security_model=atlanta"
    );
}

#[tokio::test(start_paused = true)]
async fn chaotic_inputs_never_double_open() {
    let harness = Harness::builder(MockMediaBridge::new(MediaScript::Ready)).build();

    harness.client.play();
    wait_for_status(&harness.client, PlayerStatus::Playing).await;

    // Restart on top of a live session, then switch, then stop.
    harness.client.play();
    wait_for_status(&harness.client, PlayerStatus::Playing).await;
    harness.client.set_stream(StreamSelector::new("english"));
    wait_for_status(&harness.client, PlayerStatus::Playing).await;
    harness.client.stop();
    wait_for_status(&harness.client, PlayerStatus::Stopped).await;
    settle().await;

    assert_eq!(harness.bridge.max_live_sessions(), 1);
    assert_eq!(harness.bridge.live_sessions(), 0);
}

#[tokio::test(start_paused = true)]
async fn stream_switch_replaces_the_session() {
    let harness = Harness::builder(MockMediaBridge::new(MediaScript::Ready)).build();

    harness.client.play();
    wait_for_status(&harness.client, PlayerStatus::Playing).await;

    let mut events = harness.client.subscribe();
    harness.client.set_stream(StreamSelector::new("english"));
    statuses_until(&mut events, PlayerStatus::Playing).await;
    settle().await;

    let opened = harness.bridge.opened();
    assert_eq!(opened.len(), 2);
    assert_eq!(
        opened[1].host_str(),
        Some("english-eu.radio.example.org")
    );
    assert_eq!(harness.bridge.live_sessions(), 1);
}

#[tokio::test(start_paused = true)]
async fn concurrent_switches_do_not_interleave() {
    let bridge = MockMediaBridge::new(MediaScript::Ready);
    // The switch target connects slowly, leaving the switch "in progress"
    // when the second switch arrives.
    bridge.script_host(
        "english-",
        MediaScript::Sequence(vec![(Duration::from_millis(200), MediaEvent::Ready)]),
    );
    let harness = Harness::builder(bridge).build();

    harness.client.play();
    wait_for_status(&harness.client, PlayerStatus::Playing).await;

    let mut events = harness.client.subscribe();
    harness.client.set_stream(StreamSelector::new("english"));
    // Still connecting to english: this one must be a no-op.
    harness.client.set_stream(StreamSelector::new("french"));
    statuses_until(&mut events, PlayerStatus::Playing).await;
    settle().await;

    let opened = harness.bridge.opened();
    assert_eq!(opened.len(), 2);
    assert_eq!(
        opened[1].host_str(),
        Some("english-eu.radio.example.org"),
        "the second switch should have been rejected"
    );
}

#[tokio::test(start_paused = true)]
async fn buffer_events_surface_as_buffering() {
    let bridge = MockMediaBridge::new(MediaScript::Sequence(vec![
        (Duration::ZERO, MediaEvent::Ready),
        (Duration::from_secs(30), MediaEvent::BufferLow),
        (Duration::from_secs(5), MediaEvent::BufferRecovered),
    ]));
    let harness = Harness::builder(bridge).build();
    let mut events = harness.client.subscribe();

    harness.client.play();
    wait_for_status(&harness.client, PlayerStatus::Playing).await;

    let statuses = statuses_until(&mut events, PlayerStatus::Buffering).await;
    assert_eq!(statuses.last(), Some(&PlayerStatus::Buffering));
    // Still a live session while buffering.
    assert!(harness.client.status().is_playing);

    wait_for_status(&harness.client, PlayerStatus::Playing).await;
    assert_eq!(harness.bridge.open_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn close_tears_everything_down() {
    let harness = Harness::builder(MockMediaBridge::new(MediaScript::Ready)).build();
    harness.client.play();
    wait_for_status(&harness.client, PlayerStatus::Playing).await;

    harness.client.close();
    settle().await;
    assert_eq!(harness.bridge.live_sessions(), 0);
}
