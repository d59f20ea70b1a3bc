//! One play attempt: authorization → selection → trust → connect, with
//! fallback across the remaining candidates.
//!
//! The attempt runs on its own task and owns no shared state. Everything it
//! learns goes back to the controller as generation-tagged messages; when
//! the controller has moved on, those messages fall on the floor there.
//! Cancellation is checked at every suspension point.

use std::sync::Arc;

use aulos_auth::{AuthorizationGate, AuthorizationState};
use aulos_events::{MediaEvent, PlayerStatus};
use aulos_net::NetworkPath;
use aulos_select::{ServerCandidate, ServerHealth, ServerSelector};
use aulos_trust::TrustValidator;
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{sleep_until, Instant},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{
    controller::{AttemptEvent, AttemptMsg, Cmd},
    error::Fault,
    media::MediaBridge,
    types::{ControllerConfig, StreamSelector},
};

pub(crate) struct AttemptContext {
    pub generation: u64,
    pub token: CancellationToken,
    pub gate: Arc<AuthorizationGate>,
    pub selector: Arc<ServerSelector>,
    pub trust: Arc<TrustValidator>,
    pub bridge: Arc<dyn MediaBridge>,
    pub health: ServerHealth,
    pub stream: StreamSelector,
    pub config: ControllerConfig,
    /// Path snapshot at attempt start; feeds the adaptive deadline.
    pub path: NetworkPath,
    pub tx: mpsc::UnboundedSender<Cmd>,
}

impl AttemptContext {
    fn send(&self, event: AttemptEvent) {
        let _ = self.tx.send(Cmd::Attempt(AttemptMsg {
            generation: self.generation,
            event,
        }));
    }

    fn status(&self, status: PlayerStatus) {
        self.send(AttemptEvent::Status(status));
    }
}

/// How one candidate's connect attempt ended. There is no success exit: a
/// healthy session runs until cancellation or a failure.
enum CandidateRun {
    Cancelled,
    Failed(Fault),
}

pub(crate) async fn run_attempt(ctx: AttemptContext, predecessor: Option<JoinHandle<()>>) {
    // The superseded attempt owns the live media session. Wait for its
    // teardown to finish so two sessions never overlap, not even for a
    // scheduler tick.
    if let Some(task) = predecessor {
        let _ = task.await;
    }
    if let Some(fault) = drive(&ctx).await {
        ctx.send(AttemptEvent::Finished { fault });
    }
}

async fn drive(ctx: &AttemptContext) -> Option<Fault> {
    ctx.status(PlayerStatus::Authorizing);
    let auth = tokio::select! {
        biased;
        _ = ctx.token.cancelled() => return None,
        state = ctx.gate.check() => state,
    };
    match auth {
        AuthorizationState::Authorized => {}
        AuthorizationState::FailedPermanent => return Some(Fault::AuthorizationDenied),
        AuthorizationState::Pending | AuthorizationState::FailedTransient => {
            return Some(Fault::AuthorizationIndeterminate);
        }
    }

    ctx.status(PlayerStatus::SelectingServer);
    let primary = tokio::select! {
        biased;
        _ = ctx.token.cancelled() => return None,
        candidate = ctx.selector.select() => candidate,
    };

    // The selected server first, then every untried candidate in
    // declaration order as fallback.
    let mut order: Vec<ServerCandidate> = vec![primary.clone()];
    order.extend(
        ctx.selector
            .candidates()
            .iter()
            .filter(|candidate| **candidate != primary)
            .cloned(),
    );

    for (index, candidate) in order.into_iter().enumerate() {
        if index > 0 {
            ctx.status(PlayerStatus::Reconnecting);
        }
        match run_candidate(ctx, &candidate).await {
            CandidateRun::Cancelled => return None,
            CandidateRun::Failed(fault) if fault.is_permanent() => return Some(fault),
            CandidateRun::Failed(fault) => {
                warn!(server = %candidate.name, %fault, "candidate failed, trying next");
                ctx.send(AttemptEvent::ServerFailed {
                    name: candidate.name.clone(),
                });
            }
        }
    }

    Some(Fault::AllServersExhausted)
}

async fn run_candidate(ctx: &AttemptContext, candidate: &ServerCandidate) -> CandidateRun {
    ctx.status(PlayerStatus::ValidatingTrust);

    let url = match candidate.stream_url(
        ctx.stream.language(),
        &ctx.config.resource_path,
        &ctx.config.security_model,
    ) {
        Ok(url) => url,
        Err(e) => {
            warn!(server = %candidate.name, error = %e, "stream URL construction failed");
            return CandidateRun::Failed(Fault::ServerUnreachable(candidate.name.clone()));
        }
    };
    let Some(host) = url.host_str().map(str::to_owned) else {
        return CandidateRun::Failed(Fault::ServerUnreachable(candidate.name.clone()));
    };

    let verdict = tokio::select! {
        biased;
        _ = ctx.token.cancelled() => return CandidateRun::Cancelled,
        verdict = ctx.trust.ensure_valid(&host) => verdict,
    };
    match verdict {
        Ok(true) => {}
        Ok(false) => return CandidateRun::Failed(Fault::TrustFailure),
        Err(e) => {
            // No handshake, no verdict: a reachability problem, not a pin
            // decision. The next candidate gets its chance.
            debug!(server = %candidate.name, error = %e, "trust chain fetch failed");
            return CandidateRun::Failed(Fault::ServerUnreachable(candidate.name.clone()));
        }
    }

    ctx.status(PlayerStatus::Connecting);
    let budget = ctx.config.timing.deadline(
        ctx.path.interface,
        ctx.config.client_region,
        candidate.region,
        ctx.health.consecutive_failures(&candidate.name),
    );
    let deadline = Instant::now() + budget;
    debug!(server = %candidate.name, ?budget, url = %url, "opening media session");

    let opened = tokio::select! {
        biased;
        _ = ctx.token.cancelled() => return CandidateRun::Cancelled,
        opened = ctx.bridge.open(url) => opened,
    };
    let mut handle = match opened {
        Ok(handle) => handle,
        Err(e) => {
            warn!(server = %candidate.name, error = %e, "media session open failed");
            return CandidateRun::Failed(Fault::ServerUnreachable(candidate.name.clone()));
        }
    };

    // Handshake phase: wait for the first terminal signal, bounded by the
    // adaptive deadline. A failure arriving inside the protection window is
    // deferred, since slow TLS handshakes produce spurious failures that a later
    // ready supersedes. The window clears on any definitive signal.
    let protection_until = Instant::now() + ctx.config.timing.protection_window;
    let mut deferred: Option<String> = None;
    let mut events_open = true;
    loop {
        tokio::select! {
            biased;
            _ = ctx.token.cancelled() => {
                handle.close();
                return CandidateRun::Cancelled;
            }
            _ = sleep_until(deadline) => {
                warn!(server = %candidate.name, "handshake deadline exceeded");
                handle.close();
                return CandidateRun::Failed(Fault::HandshakeTimeout);
            }
            _ = sleep_until(protection_until), if deferred.is_some() => {
                // Window elapsed with a failure on record; now it counts.
                handle.close();
                return CandidateRun::Failed(Fault::MediaDecodeFailure);
            }
            event = handle.next_event(), if events_open => match event {
                Some(MediaEvent::Ready) => break,
                Some(MediaEvent::Failed { reason }) => {
                    if Instant::now() < protection_until {
                        debug!(server = %candidate.name, reason = %reason,
                            "early failure deferred inside protection window");
                        deferred = Some(reason);
                    } else {
                        warn!(server = %candidate.name, reason = %reason, "media session failed");
                        handle.close();
                        return CandidateRun::Failed(Fault::MediaDecodeFailure);
                    }
                }
                Some(_) => {}
                None => {
                    if deferred.is_some() {
                        // Engine side is gone but the window may still be
                        // rescinded by the deadline arms; stop polling.
                        events_open = false;
                    } else {
                        handle.close();
                        return CandidateRun::Failed(Fault::MediaDecodeFailure);
                    }
                }
            }
        }
    }

    ctx.send(AttemptEvent::Media(MediaEvent::Ready));
    ctx.send(AttemptEvent::ServerSucceeded {
        name: candidate.name.clone(),
    });
    ctx.status(PlayerStatus::Playing);

    // Steady state: watch for stalls and terminal failure until cancelled.
    loop {
        tokio::select! {
            biased;
            _ = ctx.token.cancelled() => {
                handle.close();
                return CandidateRun::Cancelled;
            }
            event = handle.next_event() => match event {
                Some(MediaEvent::BufferLow) => {
                    ctx.send(AttemptEvent::Media(MediaEvent::BufferLow));
                    ctx.status(PlayerStatus::Buffering);
                }
                Some(MediaEvent::BufferRecovered) => {
                    ctx.send(AttemptEvent::Media(MediaEvent::BufferRecovered));
                    ctx.status(PlayerStatus::Playing);
                }
                Some(MediaEvent::Failed { reason }) => {
                    warn!(server = %candidate.name, reason = %reason, "media session failed during playback");
                    ctx.send(AttemptEvent::Media(MediaEvent::Failed { reason }));
                    handle.close();
                    return CandidateRun::Failed(Fault::MediaDecodeFailure);
                }
                Some(MediaEvent::Ready) => {}
                None => {
                    handle.close();
                    return CandidateRun::Failed(Fault::MediaDecodeFailure);
                }
            }
        }
    }
}
