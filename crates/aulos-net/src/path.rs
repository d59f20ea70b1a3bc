use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

/// Whether the network can carry traffic right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetworkPathState {
    /// Traffic flows.
    Satisfied,
    /// No usable route.
    Unsatisfied,
    /// A route exists but needs user action first (captive portal, VPN).
    RequiresConnection,
}

/// Interface class behind the current path. Feeds the cellular handshake
/// penalty; `Unknown` is treated like wired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterfaceKind {
    Wifi,
    Cellular,
    Wired,
    Unknown,
}

/// Snapshot of the platform's view of the network.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NetworkPath {
    pub state: NetworkPathState,
    pub interface: InterfaceKind,
}

impl NetworkPath {
    #[must_use]
    pub fn satisfied(interface: InterfaceKind) -> Self {
        Self {
            state: NetworkPathState::Satisfied,
            interface,
        }
    }

    #[must_use]
    pub fn unsatisfied() -> Self {
        Self {
            state: NetworkPathState::Unsatisfied,
            interface: InterfaceKind::Unknown,
        }
    }

    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        self.state == NetworkPathState::Satisfied
    }
}

impl Default for NetworkPath {
    // Until a platform driver reports otherwise, assume the network is up;
    // a wrong guess here costs one failed probe, not a stuck client.
    fn default() -> Self {
        Self::satisfied(InterfaceKind::Unknown)
    }
}

/// Synchronous reachability check, the authorization gate's pre-flight.
#[cfg_attr(any(test, feature = "mocks"), unimock::unimock(api = ReachabilityMock))]
pub trait Reachability: Send + Sync {
    fn is_reachable(&self) -> bool;
}

/// Edge-triggered network path observer.
///
/// A platform driver (or a test) pushes snapshots with [`set_path`];
/// subscribers only wake on actual changes; publishing the same path twice
/// is a no-op. The monitor is cheap to clone and all clones share state.
///
/// [`set_path`]: PathMonitor::set_path
#[derive(Clone, Debug)]
pub struct PathMonitor {
    tx: Arc<watch::Sender<NetworkPath>>,
}

impl PathMonitor {
    #[must_use]
    pub fn new(initial: NetworkPath) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Push a new snapshot. Subscribers are only notified on change.
    pub fn set_path(&self, path: NetworkPath) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == path {
                false
            } else {
                *current = path;
                true
            }
        });
        if changed {
            debug!(state = ?path.state, interface = ?path.interface, "network path changed");
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn current(&self) -> NetworkPath {
        *self.tx.borrow()
    }

    /// Watch for path changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<NetworkPath> {
        self.tx.subscribe()
    }
}

impl Default for PathMonitor {
    fn default() -> Self {
        Self::new(NetworkPath::default())
    }
}

impl Reachability for PathMonitor {
    fn is_reachable(&self) -> bool {
        self.current().is_satisfied()
    }
}
