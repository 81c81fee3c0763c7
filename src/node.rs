//! Host node abstraction.
//!
//! The host owns its nodes; this crate only needs a narrow read-only view of
//! them plus the ability to run the platform probe. The trait is the seam
//! that gets mocked in deterministic tests ([`crate::testing::MockNode`]).

use crate::error::ProbeError;
use crate::types::{JobRef, NodeKind, PlatformFamily};
use std::path::PathBuf;

/// Read-only view of a host compute node.
///
/// Implementations are provided by the host integration layer. All methods
/// must be callable concurrently; the locator shares nodes across lookups.
pub trait Node: Send + Sync {
    /// Stable node identifier. Budget cache entries are keyed by this, so it
    /// must change when the node's identity changes (reconnect after a
    /// restart counts as a new identity only if the host also invalidates,
    /// see [`crate::ShortWorkspaceLocator::invalidate_node`]).
    fn name(&self) -> &str;

    /// Which resolution rules apply to this node.
    fn kind(&self) -> NodeKind;

    /// Base directory under which this node's job workspaces live.
    ///
    /// `None` means the root cannot be determined right now, typically
    /// because the node is offline. Callers treat that as "do not intervene".
    fn workspace_root(&self) -> Option<PathBuf>;

    /// The host's own default workspace for `job` on this node.
    ///
    /// Only consulted for [`NodeKind::Other`], where the host is treated as
    /// the authoritative oracle. `None` when unavailable.
    fn workspace_for(&self, job: &JobRef) -> Option<PathBuf>;

    /// Run the platform probe on the node.
    ///
    /// For workers this executes remotely on the node's filesystem. One call
    /// per budget-cache miss; failures are recoverable and must not panic.
    fn probe_platform(&self) -> Result<PlatformFamily, ProbeError>;
}
