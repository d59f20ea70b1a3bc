use std::sync::Arc;

use aulos_auth::AuthorizationGate;
use aulos_events::{ClientEvent, EventBus, MediaEvent, PlayerStatus, StatusUpdate};
use aulos_net::{NetworkPath, PathMonitor};
use aulos_select::{ServerHealth, ServerSelector};
use aulos_trust::TrustValidator;
use tokio::{
    sync::{broadcast, mpsc, watch},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::{
    attempt::{run_attempt, AttemptContext},
    error::Fault,
    media::MediaBridge,
    types::{ControllerConfig, StreamSelector},
};

pub(crate) enum Cmd {
    Play,
    Stop,
    SetStream(StreamSelector),
    Attempt(AttemptMsg),
}

pub(crate) struct AttemptMsg {
    pub generation: u64,
    pub event: AttemptEvent,
}

pub(crate) enum AttemptEvent {
    Status(PlayerStatus),
    Media(MediaEvent),
    ServerFailed { name: String },
    ServerSucceeded { name: String },
    Finished { fault: Fault },
}

/// Handle to a running session controller.
///
/// An explicit service object: construct one per consumer and inject it;
/// there is no process-wide instance. Commands are fire-and-forget sends to
/// the owner task, so every method here is synchronous and safe to call
/// from teardown paths; dropping the handle cancels the owner task and any
/// live attempt without dispatching.
pub struct SessionController {
    cmd_tx: mpsc::UnboundedSender<Cmd>,
    status_rx: watch::Receiver<StatusUpdate>,
    bus: EventBus,
    cancel: CancellationToken,
}

impl SessionController {
    /// Spawn the owner task and return its handle.
    #[must_use]
    pub fn spawn(
        config: ControllerConfig,
        gate: Arc<AuthorizationGate>,
        selector: Arc<ServerSelector>,
        trust: Arc<TrustValidator>,
        bridge: Arc<dyn MediaBridge>,
        monitor: &PathMonitor,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(StatusUpdate::default());
        let bus = EventBus::default();
        let cancel = CancellationToken::new();

        let actor = ControllerActor {
            health: selector.health().clone(),
            stream: config.default_stream.clone(),
            last_path: monitor.current(),
            path_rx: monitor.subscribe(),
            path_watch_alive: true,
            config,
            gate,
            selector,
            trust,
            bridge,
            cmd_rx,
            cmd_tx: cmd_tx.clone(),
            bus: bus.clone(),
            status_tx,
            cancel: cancel.clone(),
            current: None,
            draining: None,
            generation: 0,
            manual_stop: true,
            switch_pending: false,
        };
        tokio::spawn(actor.run());

        Self {
            cmd_tx,
            status_rx,
            bus,
            cancel,
        }
    }

    /// Request playback of the current stream.
    pub fn play(&self) {
        let _ = self.cmd_tx.send(Cmd::Play);
    }

    /// Stop playback. Idempotent; always safe, even with nothing playing.
    pub fn stop(&self) {
        let _ = self.cmd_tx.send(Cmd::Stop);
    }

    /// Switch to another stream. A no-op while a previous switch is still
    /// settling; switches never interleave.
    pub fn set_stream(&self, stream: StreamSelector) {
        let _ = self.cmd_tx.send(Cmd::SetStream(stream));
    }

    /// Latest status pair.
    #[must_use]
    pub fn status(&self) -> StatusUpdate {
        *self.status_rx.borrow()
    }

    /// Watch status transitions.
    #[must_use]
    pub fn watch_status(&self) -> watch::Receiver<StatusUpdate> {
        self.status_rx.clone()
    }

    /// Subscribe to the full event stream (status + media signals).
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.bus.subscribe()
    }

    /// Synchronous teardown: cancels the owner task and any live attempt.
    pub fn close(&self) {
        self.cancel.cancel();
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct ActiveAttempt {
    generation: u64,
    token: CancellationToken,
    task: JoinHandle<()>,
}

struct ControllerActor {
    config: ControllerConfig,
    gate: Arc<AuthorizationGate>,
    selector: Arc<ServerSelector>,
    trust: Arc<TrustValidator>,
    bridge: Arc<dyn MediaBridge>,
    health: ServerHealth,
    stream: StreamSelector,
    path_rx: watch::Receiver<NetworkPath>,
    last_path: NetworkPath,
    path_watch_alive: bool,
    cmd_rx: mpsc::UnboundedReceiver<Cmd>,
    cmd_tx: mpsc::UnboundedSender<Cmd>,
    bus: EventBus,
    status_tx: watch::Sender<StatusUpdate>,
    cancel: CancellationToken,
    current: Option<ActiveAttempt>,
    /// Cancelled attempt still draining its media session; the next attempt
    /// waits for it before opening a new one.
    draining: Option<JoinHandle<()>>,
    generation: u64,
    /// The last explicit action was a stop (or nothing was ever requested);
    /// suppresses auto-replay on network recovery.
    manual_stop: bool,
    /// A stream switch is settling; further switches are rejected until it
    /// reaches ready or a terminal state.
    switch_pending: bool,
}

impl ControllerActor {
    async fn run(mut self) {
        debug!("session controller started");
        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                cmd = self.cmd_rx.recv() => match cmd {
                    Some(cmd) => self.handle_cmd(cmd),
                    None => break,
                },
                changed = self.path_rx.changed(), if self.path_watch_alive => match changed {
                    Ok(()) => {
                        let path = *self.path_rx.borrow_and_update();
                        self.handle_path_change(path);
                    }
                    // Monitor dropped; keep running on commands alone.
                    Err(_) => self.path_watch_alive = false,
                },
            }
        }
        self.cancel_attempt();
        debug!("session controller stopped");
    }

    fn handle_cmd(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::Play => {
                self.manual_stop = false;
                self.start_attempt();
            }
            Cmd::Stop => {
                self.manual_stop = true;
                self.switch_pending = false;
                self.cancel_attempt();
                self.publish(PlayerStatus::Stopped);
            }
            Cmd::SetStream(stream) => {
                if self.switch_pending {
                    debug!(%stream, "stream switch already in progress, ignoring");
                    return;
                }
                debug!(from = %self.stream, to = %stream, "switching stream");
                self.switch_pending = true;
                self.manual_stop = false;
                self.stream = stream;
                self.start_attempt();
            }
            Cmd::Attempt(msg) => self.handle_attempt_msg(msg),
        }
    }

    fn handle_attempt_msg(&mut self, msg: AttemptMsg) {
        // The generation check is the attempt-token pattern: a superseded
        // attempt's callbacks arrive here and die here.
        if self.current.as_ref().map(|attempt| attempt.generation) != Some(msg.generation) {
            trace!(generation = msg.generation, "discarding event from superseded attempt");
            return;
        }
        match msg.event {
            AttemptEvent::Status(status) => self.publish(status),
            AttemptEvent::Media(event) => self.bus.publish(event),
            AttemptEvent::ServerFailed { name } => {
                self.health.record_failure(&name);
            }
            AttemptEvent::ServerSucceeded { name } => {
                self.health.record_success(&name);
                self.switch_pending = false;
            }
            AttemptEvent::Finished { fault } => {
                warn!(%fault, "play attempt ended");
                self.current = None;
                self.switch_pending = false;
                self.publish(fault.status());
            }
        }
    }

    fn handle_path_change(&mut self, path: NetworkPath) {
        let was_satisfied = self.last_path.is_satisfied();
        self.last_path = path;

        if was_satisfied && !path.is_satisfied() {
            debug!(state = ?path.state, "network path lost");
            if self.current.is_some() {
                // Report immediately; never wait for the media bridge to
                // notice the dead link on its own.
                self.cancel_attempt();
                self.publish(PlayerStatus::NoConnection);
            }
        } else if !was_satisfied && path.is_satisfied() {
            debug!("network path recovered");
            self.selector.invalidate();
            self.gate.reset_transient();
            if !self.manual_stop {
                self.publish(PlayerStatus::Reconnecting);
                self.start_attempt();
            }
        }
    }

    fn start_attempt(&mut self) {
        self.cancel_attempt();
        let predecessor = self.draining.take();
        self.generation += 1;
        let token = self.cancel.child_token();
        let ctx = AttemptContext {
            generation: self.generation,
            token: token.clone(),
            gate: Arc::clone(&self.gate),
            selector: Arc::clone(&self.selector),
            trust: Arc::clone(&self.trust),
            bridge: Arc::clone(&self.bridge),
            health: self.health.clone(),
            stream: self.stream.clone(),
            config: self.config.clone(),
            path: self.last_path,
            tx: self.cmd_tx.clone(),
        };
        let task = tokio::spawn(run_attempt(ctx, predecessor));
        self.current = Some(ActiveAttempt {
            generation: self.generation,
            token,
            task,
        });
        debug!(generation = self.generation, stream = %self.stream, "play attempt started");
    }

    fn cancel_attempt(&mut self) {
        if let Some(attempt) = self.current.take() {
            attempt.token.cancel();
            self.draining = Some(attempt.task);
            trace!(generation = attempt.generation, "attempt cancelled");
        }
    }

    fn publish(&self, status: PlayerStatus) {
        let update = StatusUpdate::from(status);
        let changed = self.status_tx.send_if_modified(|current| {
            if *current == update {
                false
            } else {
                *current = update;
                true
            }
        });
        if changed {
            self.bus.publish(update);
            debug!(?status, is_playing = update.is_playing, "status transition");
        }
    }
}
