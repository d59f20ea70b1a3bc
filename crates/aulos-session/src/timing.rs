use std::time::Duration;

use aulos_net::InterfaceKind;
use aulos_select::Region;

/// Adaptive handshake deadline.
///
/// The deadline starts from a base and grows for conditions that slow a
/// TLS handshake down without meaning the server is dead: cellular links,
/// a cross-continental server, and a history of recent failures (a loaded
/// server answers slowly before it answers not at all). The cap keeps a
/// pathological combination from stalling failover. Constants are
/// heuristics and deliberately tunable, not load-bearing.
#[derive(Clone, Copy, Debug)]
pub struct HandshakeTiming {
    pub base: Duration,
    pub cellular_penalty: Duration,
    pub cross_continent_penalty: Duration,
    /// Added once per recent consecutive failure of the candidate.
    pub failure_penalty: Duration,
    /// Failure history beyond this many failures stops adding time.
    pub max_failure_penalties: u32,
    pub cap: Duration,
    /// Grace period after connect during which an early failure signal is
    /// treated as still-connecting rather than fatal.
    pub protection_window: Duration,
}

impl Default for HandshakeTiming {
    fn default() -> Self {
        Self {
            base: Duration::from_secs(4),
            cellular_penalty: Duration::from_secs(2),
            cross_continent_penalty: Duration::from_secs(3),
            failure_penalty: Duration::from_secs(1),
            max_failure_penalties: 3,
            cap: Duration::from_secs(10),
            protection_window: Duration::from_millis(1500),
        }
    }
}

impl HandshakeTiming {
    /// Deadline for one connect attempt under the given conditions.
    #[must_use]
    pub fn deadline(
        &self,
        interface: InterfaceKind,
        client_region: Option<Region>,
        server_region: Region,
        recent_failures: u32,
    ) -> Duration {
        let mut deadline = self.base;
        if interface == InterfaceKind::Cellular {
            deadline += self.cellular_penalty;
        }
        if client_region.is_some_and(|region| region != server_region) {
            deadline += self.cross_continent_penalty;
        }
        deadline += self.failure_penalty * recent_failures.min(self.max_failure_penalties);
        deadline.min(self.cap)
    }
}
