//! Scripted media bridge for tests.

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use aulos_events::MediaEvent;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::media::{MediaBridge, MediaError, MediaHandle};

/// What a scripted session does after `open`.
#[derive(Clone, Debug)]
pub enum MediaScript {
    /// Emit ready immediately, then stay alive and silent.
    Ready,
    /// Never emit anything; the handshake deadline decides.
    Silent,
    /// Refuse the open call itself.
    RefuseOpen,
    /// Fail after a delay.
    FailAfter(Duration, &'static str),
    /// Emit each event after its delay (delays are relative to the
    /// previous event), then stay alive and silent.
    Sequence(Vec<(Duration, MediaEvent)>),
}

#[derive(Default)]
struct MockInner {
    /// Per-host script queues; the key matches as a substring of the URL
    /// host, so "-eu." targets every EU stream hostname.
    scripts: parking_lot::Mutex<HashMap<String, VecDeque<MediaScript>>>,
    default: parking_lot::Mutex<Option<MediaScript>>,
    opened: parking_lot::Mutex<Vec<Url>>,
    /// One token per opened session; a session is live until its token is
    /// cancelled, which `MediaHandle::close`/drop does synchronously.
    sessions: parking_lot::Mutex<Vec<CancellationToken>>,
    max_live: AtomicUsize,
}

impl MockInner {
    fn live(&self) -> usize {
        self.sessions
            .lock()
            .iter()
            .filter(|token| !token.is_cancelled())
            .count()
    }
}

/// Media bridge double driven by per-host scripts.
///
/// Also counts live sessions, so tests can assert the controller never has
/// two media sessions open at once.
#[derive(Clone, Default)]
pub struct MockMediaBridge {
    inner: Arc<MockInner>,
}

impl MockMediaBridge {
    #[must_use]
    pub fn new(default: MediaScript) -> Self {
        let bridge = Self::default();
        *bridge.inner.default.lock() = Some(default);
        bridge
    }

    /// Queue a script for URLs whose host contains `host_fragment`. Queued
    /// scripts are consumed in order; when the queue is empty the default
    /// script applies.
    pub fn script_host(&self, host_fragment: impl Into<String>, script: MediaScript) {
        self.inner
            .scripts
            .lock()
            .entry(host_fragment.into())
            .or_default()
            .push_back(script);
    }

    /// Every URL passed to `open`, in order.
    #[must_use]
    pub fn opened(&self) -> Vec<Url> {
        self.inner.opened.lock().clone()
    }

    #[must_use]
    pub fn open_count(&self) -> usize {
        self.inner.opened.lock().len()
    }

    /// Sessions currently open.
    #[must_use]
    pub fn live_sessions(&self) -> usize {
        self.inner.live()
    }

    /// High-water mark of concurrently open sessions.
    #[must_use]
    pub fn max_live_sessions(&self) -> usize {
        self.inner.max_live.load(Ordering::SeqCst)
    }

    fn next_script(&self, host: &str) -> MediaScript {
        let mut scripts = self.inner.scripts.lock();
        for (fragment, queue) in scripts.iter_mut() {
            if host.contains(fragment.as_str()) {
                if let Some(script) = queue.pop_front() {
                    return script;
                }
            }
        }
        self.inner
            .default
            .lock()
            .clone()
            .unwrap_or(MediaScript::Silent)
    }
}

async fn play_script(script: MediaScript, tx: mpsc::Sender<MediaEvent>) {
    match script {
        MediaScript::Ready => {
            let _ = tx.send(MediaEvent::Ready).await;
        }
        MediaScript::Silent | MediaScript::RefuseOpen => {}
        MediaScript::FailAfter(delay, reason) => {
            tokio::time::sleep(delay).await;
            let _ = tx
                .send(MediaEvent::Failed {
                    reason: reason.to_string(),
                })
                .await;
        }
        MediaScript::Sequence(events) => {
            for (delay, event) in events {
                tokio::time::sleep(delay).await;
                if tx.send(event).await.is_err() {
                    break;
                }
            }
        }
    }
    // Keep the sender alive until the session is closed; a dropped channel
    // reads as an engine crash on the consumer side.
    std::future::pending::<()>().await;
}

#[async_trait]
impl MediaBridge for MockMediaBridge {
    async fn open(&self, url: Url) -> Result<MediaHandle, MediaError> {
        let host = url.host_str().unwrap_or_default().to_string();
        self.inner.opened.lock().push(url);

        let script = self.next_script(&host);
        if matches!(script, MediaScript::RefuseOpen) {
            return Err(MediaError::Open(format!("refused by script for {host}")));
        }

        let (tx, rx) = mpsc::channel(8);
        let token = CancellationToken::new();
        let live = {
            let mut sessions = self.inner.sessions.lock();
            sessions.push(token.clone());
            sessions.iter().filter(|t| !t.is_cancelled()).count()
        };
        self.inner.max_live.fetch_max(live, Ordering::SeqCst);

        let session_token = token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = session_token.cancelled() => {}
                () = play_script(script, tx) => {}
            }
        });

        Ok(MediaHandle::new(rx, token))
    }
}
