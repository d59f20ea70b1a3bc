//! Authorization outcomes as seen through the full client surface.

use std::sync::Arc;

use aulos::prelude::*;
use aulos_net::{NetError, TxtResolverMock};
use aulos_session::mock::{MediaScript, MockMediaBridge};
use aulos_tests::{allow_resolver, settle, wait_for_status, Harness};
use unimock::{matching, MockFn, Unimock};

#[tokio::test(start_paused = true)]
async fn denied_build_surfaces_security_status_and_stays_offline() {
    // Allow-list without this build. The prober has no clauses at all: any
    // probe would panic the mock, proving denial halts before selection.
    let resolver = Unimock::new(
        TxtResolverMock::lookup_txt
            .some_call(matching!(_))
            .returns(Ok(vec!["dc,florida".to_string()])),
    );
    let harness = Harness::builder(MockMediaBridge::new(MediaScript::Ready))
        .resolver(Arc::new(resolver))
        .prober(Arc::new(Unimock::new(())))
        .build();

    harness.client.play();
    wait_for_status(&harness.client, PlayerStatus::AuthorizationDenied).await;
    assert_eq!(harness.bridge.open_count(), 0);

    // A second play must not re-query the allow-list (the single-call
    // resolver mock would panic) and must surface the same denial.
    harness.client.play();
    settle().await;
    assert_eq!(
        harness.client.status().status,
        PlayerStatus::AuthorizationDenied
    );
    assert_eq!(harness.bridge.open_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn empty_allow_list_is_a_deny_all() {
    let resolver = Unimock::new(
        TxtResolverMock::lookup_txt
            .some_call(matching!(_))
            .returns(Ok(Vec::new())),
    );
    let harness = Harness::builder(MockMediaBridge::new(MediaScript::Ready))
        .resolver(Arc::new(resolver))
        .build();

    harness.client.play();
    wait_for_status(&harness.client, PlayerStatus::AuthorizationDenied).await;
    assert_eq!(harness.bridge.open_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn dns_failure_is_transient_and_clears_on_reconnect() {
    let resolver = Unimock::new((
        TxtResolverMock::lookup_txt
            .next_call(matching!(_))
            .returns(Err(NetError::dns("servfail"))),
        TxtResolverMock::lookup_txt
            .next_call(matching!(_))
            .returns(Ok(vec!["dc,atlanta".to_string()])),
    ));
    let harness = Harness::builder(MockMediaBridge::new(MediaScript::Ready))
        .resolver(Arc::new(resolver))
        .build();

    harness.client.play();
    wait_for_status(&harness.client, PlayerStatus::NoConnection).await;
    assert_eq!(harness.bridge.open_count(), 0);

    // A network blip clears the transient failure and replays.
    harness.monitor.set_path(NetworkPath::unsatisfied());
    settle().await;
    harness
        .monitor
        .set_path(NetworkPath::satisfied(InterfaceKind::Wifi));
    wait_for_status(&harness.client, PlayerStatus::Playing).await;
    assert_eq!(harness.bridge.open_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn authorized_build_plays() {
    let harness = Harness::builder(MockMediaBridge::new(MediaScript::Ready))
        .resolver(allow_resolver(" DC , Atlanta , florida "))
        .build();

    harness.client.play();
    wait_for_status(&harness.client, PlayerStatus::Playing).await;
    assert_eq!(harness.bridge.open_count(), 1);
}
