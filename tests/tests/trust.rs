//! Pin validation as seen through the full client: strict outside the
//! rotation window, lenient inside it.

use aulos::prelude::*;
use aulos_session::mock::{MediaScript, MockMediaBridge};
use aulos_tests::{
    config_with, pinned_trust_lenient, rotated_chain_fetcher, wait_for_status, Harness,
};

#[tokio::test(start_paused = true)]
async fn pin_mismatch_outside_the_window_is_security_failed() {
    let harness = Harness::builder(MockMediaBridge::new(MediaScript::Ready))
        .chain_fetcher(rotated_chain_fetcher())
        .build();

    harness.client.play();
    wait_for_status(&harness.client, PlayerStatus::SecurityFailed).await;

    // Permanent: no fallback walk, no media session.
    assert_eq!(harness.bridge.open_count(), 0);
    assert!(harness.client.status().status.is_permanent_failure());
}

#[tokio::test(start_paused = true)]
async fn pin_mismatch_inside_the_window_is_tolerated() {
    // Same rotated chain, but the build's transition window covers now:
    // chain trust carries the day and playback proceeds.
    let harness = Harness::builder(MockMediaBridge::new(MediaScript::Ready))
        .config(config_with(pinned_trust_lenient()))
        .chain_fetcher(rotated_chain_fetcher())
        .build();

    harness.client.play();
    wait_for_status(&harness.client, PlayerStatus::Playing).await;
    assert_eq!(harness.bridge.open_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn matching_pin_plays_in_strict_mode() {
    let harness = Harness::builder(MockMediaBridge::new(MediaScript::Ready)).build();

    harness.client.play();
    wait_for_status(&harness.client, PlayerStatus::Playing).await;
    assert_eq!(harness.bridge.open_count(), 1);
}
