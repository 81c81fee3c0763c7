//! Shortened path candidate construction.
//!
//! A candidate directory name is the job's display name cut to at most
//! [`MAX_NAME_CHARS`] characters plus the first [`DIGEST_CHARS`] hex
//! characters of the full name's BLAKE3 digest. The digest keeps names
//! collision-free across folders once the display name alone stops being
//! unique, and makes the candidate a pure function of job identity so an
//! existing on-disk workspace is reused across builds.

use crate::node::Node;
use crate::resolve;
use crate::types::JobRef;
use std::path::PathBuf;

/// Maximum characters of the display name kept in a candidate directory name.
pub const MAX_NAME_CHARS: usize = 16;
/// Hex characters of the full-name digest appended after the name.
pub const DIGEST_CHARS: usize = 8;

/// Directory name for a job's shortened workspace.
///
/// Deterministic for a given job identity. The final component is never
/// longer than `MAX_NAME_CHARS + DIGEST_CHARS` characters.
pub fn short_dir_name(job: &JobRef) -> String {
    let truncated: String = job.name().chars().take(MAX_NAME_CHARS).collect();
    // Old msbuild path normalization rejects "..." as a path segment.
    let safe = truncated.replace("...", "_");
    format!("{}{}", safe, digest_fragment(job.full_name()))
}

/// Compute the short hash of the full name to give candidates a stable
/// identity independent of the display name.
pub fn digest_fragment(full_name: &str) -> String {
    let hash = blake3::hash(full_name.as_bytes()).to_hex();
    hash[..DIGEST_CHARS].to_string()
}

/// Candidate path for `job` on `node`, or `None` when the workspace root
/// cannot be determined (node offline mid-lookup).
pub fn candidate(job: &JobRef, node: &dyn Node) -> Option<PathBuf> {
    resolve::candidate_root(job, node).map(|root| root.join(short_dir_name(job)))
}
