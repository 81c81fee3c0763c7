//! Error types for the probe seam.
//!
//! Nothing in this crate is fatal to the host. A probe failure only means the
//! current lookup leaves the workspace untouched; the error type exists so
//! the failure can be logged with a reason and so host `Node` implementations
//! have something concrete to return.

use thiserror::Error;

/// Why a platform probe on a node did not produce an answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// I/O failure while talking to the node.
    #[error("I/O failure while probing node: {0}")]
    Io(String),

    /// The probe was interrupted before completion.
    #[error("Probe interrupted before completion")]
    Interrupted,

    /// The node dropped offline during the probe.
    #[error("Node went offline during probe")]
    Offline,
}

impl From<std::io::Error> for ProbeError {
    fn from(err: std::io::Error) -> Self {
        ProbeError::Io(err.to_string())
    }
}
