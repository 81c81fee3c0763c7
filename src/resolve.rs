//! Default workspace path mimicry.
//!
//! The shortening decision only makes sense when it is made against the same
//! path the host would otherwise pick, so these functions reproduce the
//! host's own composition rules per node kind. Composition only; nothing
//! here touches the filesystem or panics on offline nodes.

use crate::node::Node;
use crate::types::{JobRef, NodeKind};
use std::path::PathBuf;

/// The path the host would assign to `job` on `node` if nobody intervened.
///
/// `None` means the default cannot be determined (node offline, oracle
/// unavailable) and the caller must not intervene.
pub fn default_path(job: &JobRef, node: &dyn Node) -> Option<PathBuf> {
    match node.kind() {
        // The controller flattens the job hierarchy into a single directory
        // name directly under its workspace root.
        NodeKind::Controller => node
            .workspace_root()
            .map(|root| root.join(flatten_full_name(job))),
        // Workers nest the full hierarchy under their workspace root.
        NodeKind::Worker => node.workspace_root().map(|root| root.join(job.full_name())),
        NodeKind::Other => node.workspace_for(job),
    }
}

/// The directory a shortened candidate is created under.
///
/// Controller and worker candidates sit directly under the node's workspace
/// root. For other node kinds the host's own default workspace is the only
/// root this crate can know about, so the candidate nests under it.
pub fn candidate_root(job: &JobRef, node: &dyn Node) -> Option<PathBuf> {
    match node.kind() {
        NodeKind::Controller | NodeKind::Worker => node.workspace_root(),
        NodeKind::Other => node.workspace_for(job),
    }
}

fn flatten_full_name(job: &JobRef) -> String {
    job.full_name().replace('/', "_")
}
