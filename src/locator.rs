//! Workspace override decision.
//!
//! This is the extension point the host calls whenever it needs a workspace
//! path for a job on a node. The answer is either a shortened path to use
//! instead of the default, or `None` for "keep your own default". Nothing in
//! here fails the host operation: every problem along the way degrades to
//! `None`, and the reason is left in the logs.
//!
//! A lookup walks a single linear decision path:
//!
//! 1. controller excluded by configuration, stop;
//! 2. default path unknowable (node offline), stop;
//! 3. enough room below the configured threshold and shortening not forced,
//!    stop;
//! 4. candidate unbuildable (node dropped offline mid-lookup), stop;
//! 5. candidate shorter than the default, or shortening forced, substitute;
//! 6. otherwise keep the default.

use crate::config::{ConfigError, LocatorConfig};
use crate::node::Node;
use crate::prober::PathLengthProber;
use crate::types::{JobRef, NodeKind};
use crate::{resolve, shorten};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Decides, per (job, node) lookup, whether to substitute a shortened
/// workspace path.
///
/// Construct one at startup and share it by reference; the only state it
/// carries across lookups is the per-node budget cache.
#[derive(Debug)]
pub struct ShortWorkspaceLocator {
    config: LocatorConfig,
    prober: PathLengthProber,
}

impl ShortWorkspaceLocator {
    pub fn new(config: LocatorConfig) -> Self {
        let prober = PathLengthProber::new(config.limits.clone());
        Self { config, prober }
    }

    /// Build a locator from `SHORTWS_` environment variables, failing fast
    /// on malformed configuration.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(LocatorConfig::from_env()?))
    }

    /// Effective configuration.
    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Workspace path override for `job` on `node`.
    ///
    /// `None` means the host should fall back to its own default. Safe to
    /// call concurrently from the host's scheduling threads.
    pub fn locate(&self, job: &JobRef, node: &dyn Node) -> Option<PathBuf> {
        if node.kind() == NodeKind::Controller && !self.config.force_apply_to_controller {
            debug!(
                job = %job,
                node = node.name(),
                "Controller workspaces excluded by configuration"
            );
            return None;
        }

        let Some(default) = resolve::default_path(job, node) else {
            debug!(
                job = %job,
                node = node.name(),
                "Default workspace unknown, not intervening"
            );
            return None;
        };

        // The probe runs even when shortening is forced so the budget cache
        // still warms up.
        let usable = self.prober.usable_length(&default, node);
        if usable > i64::from(self.config.build_path_length) && !self.config.force_short_workspace
        {
            debug!(
                job = %job,
                node = node.name(),
                usable,
                threshold = self.config.build_path_length,
                "Ample path headroom, keeping default workspace"
            );
            return None;
        }

        let Some(candidate) = shorten::candidate(job, node) else {
            debug!(
                job = %job,
                node = node.name(),
                "Node went offline mid-lookup, keeping default workspace"
            );
            return None;
        };

        if path_chars(&candidate) < path_chars(&default) || self.config.force_short_workspace {
            debug!(
                job = %job,
                node = node.name(),
                usable,
                candidate = %candidate.display(),
                default = %default.display(),
                "Substituting shortened workspace"
            );
            return Some(candidate);
        }

        debug!(
            job = %job,
            node = node.name(),
            candidate = %candidate.display(),
            default = %default.display(),
            "Shortened path would not be shorter, keeping default workspace"
        );
        None
    }

    /// Forget the cached path length budget for a node.
    ///
    /// Hosts call this from their node connect/disconnect listeners so a
    /// reconnected node (possibly a different OS image under the same name)
    /// gets probed again.
    pub fn invalidate_node(&self, node_name: &str) {
        self.prober.invalidate(node_name);
    }
}

fn path_chars(path: &Path) -> usize {
    path.to_string_lossy().chars().count()
}
