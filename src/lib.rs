//! Short workspace paths for build agents.
//!
//! Deeply nested job names produce workspace paths that overrun filesystem
//! limits, most famously the 260-character MAX_PATH on Windows agents. This
//! crate is the decision core of a host plugin that intercepts workspace
//! path assignment: when the default path for a (job, node) pair looks too
//! long for the node's filesystem, it substitutes a short, deterministic
//! directory built from a truncated job name plus a BLAKE3 digest fragment.
//!
//! # How it plugs in
//!
//! The host implements [`Node`] for its compute nodes and calls
//! [`ShortWorkspaceLocator::locate`] from its workspace-assignment path.
//! `None` means "use your own default"; the host loses nothing when this
//! crate declines or fails. Node connect/disconnect listeners should call
//! [`ShortWorkspaceLocator::invalidate_node`] so path-length budgets probed
//! from a previous OS image are forgotten.
//!
//! ```ignore
//! let locator = ShortWorkspaceLocator::from_env()?;
//!
//! // In the host's workspace-assignment hook:
//! if let Some(short) = locator.locate(&job, &node) {
//!     return short;
//! }
//! ```
//!
//! # Decision outline
//!
//! A lookup resolves the host's own default path, asks the per-node
//! [`PathLengthProber`] how much room the node has left, and substitutes the
//! shortened candidate only when the room falls under the configured
//! threshold and the candidate actually is shorter (both checks can be
//! overridden through [`LocatorConfig`]). Every early exit is logged at
//! debug level with the lookup context.
//!
//! Configuration comes from `SHORTWS_` environment variables read once at
//! startup; see [`LocatorConfig::from_env`].

pub mod config;
pub mod error;
pub mod locator;
pub mod node;
pub mod prober;
pub mod resolve;
pub mod shorten;
pub mod testing;
pub mod types;

pub use config::{ConfigError, LocatorConfig, PathLimits};
pub use error::ProbeError;
pub use locator::ShortWorkspaceLocator;
pub use node::Node;
pub use prober::{NEVER_INTERCEPT, PathLengthProber};
pub use types::{JobRef, NodeKind, PlatformFamily};
