//! Per-node path length budgets.
//!
//! Each node's filesystem has a maximum usable path length. Discovering it
//! means running a probe on the node, which for workers is a remote call, so
//! the result is cached keyed by node name for as long as the node identity
//! holds. The host reports identity changes (disconnect, reconnect after a
//! restart) through [`PathLengthProber::invalidate`]; a budget probed from a
//! previous OS image must never outlive the node that produced it.
//!
//! Probe failures are not errors from the caller's point of view. The lookup
//! that hit the failure gets [`NEVER_INTERCEPT`] back, nothing is cached, and
//! the next lookup probes again.

use crate::config::PathLimits;
use crate::node::Node;
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;
use tracing::debug;

/// Sentinel usable length returned when the budget is unknowable for this
/// lookup. Larger than any real budget, so callers that compare against a
/// threshold naturally leave the workspace untouched.
pub const NEVER_INTERCEPT: i64 = i64::MAX;

/// Probes and caches per-node path length budgets.
#[derive(Debug)]
pub struct PathLengthProber {
    limits: PathLimits,
    budgets: RwLock<HashMap<String, u32>>,
}

impl PathLengthProber {
    pub fn new(limits: PathLimits) -> Self {
        Self {
            limits,
            budgets: RwLock::new(HashMap::new()),
        }
    }

    /// Characters left on `node` before `default_path` overruns the node's
    /// path length budget. Negative when the default path already exceeds
    /// the budget, [`NEVER_INTERCEPT`] when the probe fails.
    pub fn usable_length(&self, default_path: &Path, node: &dyn Node) -> i64 {
        let Some(budget) = self.budget_for(node) else {
            return NEVER_INTERCEPT;
        };
        let path_chars = default_path.to_string_lossy().chars().count() as i64;
        i64::from(budget) - path_chars
    }

    /// Drop the cached budget for a node.
    ///
    /// Call when the host observes the node disconnecting or reconnecting,
    /// so the next lookup probes the node's current image.
    pub fn invalidate(&self, node_name: &str) {
        self.budgets
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(node_name);
    }

    fn budget_for(&self, node: &dyn Node) -> Option<u32> {
        if let Some(budget) = self
            .budgets
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(node.name())
        {
            return Some(*budget);
        }

        // Probe outside the lock. Concurrent lookups for the same node may
        // both probe; they compute the same value and the first write wins.
        match node.probe_platform() {
            Ok(family) => {
                let budget = self.limits.for_family(family);
                debug!(
                    node = node.name(),
                    family = %family,
                    budget,
                    "Probed node path length budget"
                );
                let mut budgets = self.budgets.write().unwrap_or_else(|e| e.into_inner());
                Some(*budgets.entry(node.name().to_string()).or_insert(budget))
            }
            Err(err) => {
                debug!(
                    node = node.name(),
                    error = %err,
                    "Platform probe failed, leaving this lookup untouched"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProbeError;
    use crate::testing::MockNode;
    use crate::types::PlatformFamily;
    use std::path::Path;

    #[test]
    fn test_probe_runs_once_then_cached() {
        let prober = PathLengthProber::new(PathLimits::default());
        let node = MockNode::worker("agent-1", "/w");
        let path = Path::new("/w/job");

        for _ in 0..3 {
            assert_eq!(prober.usable_length(path, &node), 4096 - 6);
        }
        assert_eq!(node.probe_calls(), 1);
    }

    #[test]
    fn test_windows_budget_math() {
        let prober = PathLengthProber::new(PathLimits::default());
        let node = MockNode::builder()
            .name("win-agent")
            .workspace_root("C:/ws")
            .platform(PlatformFamily::Windows)
            .build();

        // "C:/ws/job" is 9 characters.
        assert_eq!(prober.usable_length(Path::new("C:/ws/job"), &node), 260 - 9);
    }

    #[test]
    fn test_usable_length_can_go_negative() {
        let prober = PathLengthProber::new(PathLimits {
            windows: 260,
            unix: 10,
        });
        let node = MockNode::worker("tiny", "/w");

        // "/w/0123456789abcdef" is 19 characters against a budget of 10.
        let long_path = Path::new("/w/0123456789abcdef");
        assert_eq!(prober.usable_length(long_path, &node), 10 - 19);
    }

    #[test]
    fn test_failed_probe_returns_sentinel_and_is_not_cached() {
        let prober = PathLengthProber::new(PathLimits::default());
        let node = MockNode::worker("flaky", "/w");
        node.push_probe_result(Err(ProbeError::Offline));
        node.push_probe_result(Err(ProbeError::from(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "reset",
        ))));

        let path = Path::new("/w/p");
        assert_eq!(prober.usable_length(path, &node), NEVER_INTERCEPT);
        assert_eq!(prober.usable_length(path, &node), NEVER_INTERCEPT);
        assert_eq!(node.probe_calls(), 2);

        // Scripted failures consumed; the steady result now succeeds and
        // the budget finally lands in the cache.
        assert_eq!(prober.usable_length(path, &node), 4096 - 4);
        assert_eq!(prober.usable_length(path, &node), 4096 - 4);
        assert_eq!(node.probe_calls(), 3);
    }

    #[test]
    fn test_invalidate_forces_reprobe() {
        let prober = PathLengthProber::new(PathLimits::default());
        let node = MockNode::worker("agent-1", "/w");
        let path = Path::new("/w/p");

        assert_eq!(prober.usable_length(path, &node), 4096 - 4);
        assert_eq!(node.probe_calls(), 1);

        // Simulated reconnect: same name, new identity, new platform.
        prober.invalidate(node.name());
        node.push_probe_result(Ok(PlatformFamily::Windows));

        assert_eq!(prober.usable_length(path, &node), 260 - 4);
        assert_eq!(node.probe_calls(), 2);
    }

    #[test]
    fn test_invalidate_unknown_node_is_harmless() {
        let prober = PathLengthProber::new(PathLimits::default());
        prober.invalidate("never-seen");
    }

    #[test]
    fn test_nodes_are_cached_independently() {
        let prober = PathLengthProber::new(PathLimits::default());
        let unix = MockNode::worker("unix-agent", "/w");
        let windows = MockNode::builder()
            .name("win-agent")
            .workspace_root("C:/ws")
            .platform(PlatformFamily::Windows)
            .build();
        let path = Path::new("/w/p");

        assert_eq!(prober.usable_length(path, &unix), 4096 - 4);
        assert_eq!(prober.usable_length(path, &windows), 260 - 4);

        prober.invalidate("win-agent");
        assert_eq!(prober.usable_length(path, &unix), 4096 - 4);
        assert_eq!(unix.probe_calls(), 1);
        assert_eq!(windows.probe_calls(), 1);
    }

    #[test]
    fn test_concurrent_lookups_agree() {
        let prober = PathLengthProber::new(PathLimits::default());
        let node = MockNode::worker("busy", "/w");
        let path = Path::new("/w/p");

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| prober.usable_length(path, &node)))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), 4096 - 4);
            }
        });

        // Racing lookups may each have probed, but exactly one budget is
        // cached afterwards and later lookups stop probing.
        let calls_after_race = node.probe_calls();
        assert!(calls_after_race >= 1);
        assert_eq!(prober.usable_length(path, &node), 4096 - 4);
        assert_eq!(node.probe_calls(), calls_after_race);
    }
}
