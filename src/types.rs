//! Core identity types shared across the crate.
//!
//! These mirror the host's own job and node identities. The crate only ever
//! reads them; ownership of the underlying objects stays with the host.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Job identity as presented by the host.
///
/// A job carries a hierarchical full name (slash-separated folder path) and a
/// short display name. For most hosts the display name is the last segment of
/// the full name, which is what [`JobRef::new`] derives. Hosts where the two
/// diverge can use [`JobRef::with_name`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobRef {
    full_name: String,
    name: String,
}

impl JobRef {
    /// Create a job reference, deriving the display name from the last
    /// slash-separated segment of the full name.
    pub fn new(full_name: impl Into<String>) -> Self {
        let full_name = full_name.into();
        let name = full_name
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        Self { full_name, name }
    }

    /// Create a job reference with an explicit display name.
    pub fn with_name(full_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            name: name.into(),
        }
    }

    /// Hierarchical full name, unique within the host.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Short display name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for JobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name)
    }
}

/// Closed classification of host nodes.
///
/// The locator special-cases the controller and ordinary workers; anything
/// else (cloud agents, one-shot provisioned nodes) falls under `Other` and is
/// resolved through the host's own workspace oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Controller,
    Worker,
    Other,
}

/// Platform family reported by a node's filesystem probe.
///
/// Only the distinction that changes the default path-length limit is
/// modeled. Anything that is not Windows-family counts as `Unix`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformFamily {
    Windows,
    Unix,
}

impl fmt::Display for PlatformFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformFamily::Windows => write!(f, "windows"),
            PlatformFamily::Unix => write!(f, "unix"),
        }
    }
}
