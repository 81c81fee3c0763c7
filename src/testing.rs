//! Test doubles for exercising the locator without a live host.
//!
//! [`MockNode`] stands in for the host's node objects. Probe outcomes can be
//! scripted FIFO (consumed one per call, falling back to a steady platform
//! answer once drained) and every probe call is counted, so tests can assert
//! caching behavior precisely. [`init_test_logging`] wires tracing output
//! into the test harness; call it from a `#[ctor::ctor]` function in
//! integration test binaries.

use crate::error::ProbeError;
use crate::node::Node;
use crate::types::{JobRef, NodeKind, PlatformFamily};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, Once};

static MOCK_NODE_COUNTER: AtomicUsize = AtomicUsize::new(0);
static LOGGING_INIT: Once = Once::new();

/// Initialize tracing output for tests.
///
/// Events go to the test writer so `cargo test` captures them per test.
/// The level defaults to `debug` and can be overridden with
/// `SHORTWS_TEST_LOG_LEVEL`. Safe to call multiple times, initialization
/// only happens once.
pub fn init_test_logging() {
    LOGGING_INIT.call_once(|| {
        let level =
            std::env::var("SHORTWS_TEST_LOG_LEVEL").unwrap_or_else(|_| "debug".to_string());
        let filter = tracing_subscriber::EnvFilter::try_new(format!("shortws={level}"))
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .compact()
            .finish();

        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

/// Scriptable [`Node`] implementation.
#[derive(Debug)]
pub struct MockNode {
    name: String,
    kind: NodeKind,
    workspace_root: Option<PathBuf>,
    host_workspace: Option<PathBuf>,
    platform: PlatformFamily,
    scripted_probes: Mutex<Vec<Result<PlatformFamily, ProbeError>>>,
    probe_calls: AtomicUsize,
}

impl MockNode {
    pub fn builder() -> MockNodeBuilder {
        MockNodeBuilder::default()
    }

    /// Online worker with the given workspace root, probing as Unix.
    pub fn worker(name: impl Into<String>, workspace_root: impl Into<PathBuf>) -> Self {
        Self::builder()
            .name(name)
            .workspace_root(workspace_root)
            .build()
    }

    /// Append a scripted probe result. Results are consumed FIFO; once the
    /// script is drained, probes return the steady platform answer.
    pub fn push_probe_result(&self, result: Result<PlatformFamily, ProbeError>) {
        self.scripted_probes
            .lock()
            .expect("scripted_probes mutex poisoned")
            .push(result);
    }

    /// How many times the platform probe ran against this node.
    pub fn probe_calls(&self) -> usize {
        self.probe_calls.load(Ordering::SeqCst)
    }
}

impl Node for MockNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NodeKind {
        self.kind
    }

    fn workspace_root(&self) -> Option<PathBuf> {
        self.workspace_root.clone()
    }

    fn workspace_for(&self, _job: &JobRef) -> Option<PathBuf> {
        self.host_workspace.clone()
    }

    fn probe_platform(&self) -> Result<PlatformFamily, ProbeError> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        let mut scripted = self
            .scripted_probes
            .lock()
            .expect("scripted_probes mutex poisoned");
        if scripted.is_empty() {
            Ok(self.platform)
        } else {
            scripted.remove(0)
        }
    }
}

#[derive(Debug, Clone)]
pub struct MockNodeBuilder {
    name: Option<String>,
    kind: NodeKind,
    workspace_root: Option<PathBuf>,
    host_workspace: Option<PathBuf>,
    platform: PlatformFamily,
}

impl Default for MockNodeBuilder {
    fn default() -> Self {
        Self {
            name: None,
            kind: NodeKind::Worker,
            workspace_root: None,
            host_workspace: None,
            platform: PlatformFamily::Unix,
        }
    }
}

impl MockNodeBuilder {
    /// Set the node name. Unset names become unique `node-N` identifiers.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the workspace root. Leaving it unset models an offline node.
    pub fn workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = Some(root.into());
        self
    }

    /// Set the host's own default workspace answer, used for
    /// [`NodeKind::Other`] nodes.
    pub fn host_workspace(mut self, path: impl Into<PathBuf>) -> Self {
        self.host_workspace = Some(path.into());
        self
    }

    /// Steady platform answer for probes once the script is drained.
    pub fn platform(mut self, platform: PlatformFamily) -> Self {
        self.platform = platform;
        self
    }

    pub fn build(self) -> MockNode {
        MockNode {
            name: self.name.unwrap_or_else(default_name),
            kind: self.kind,
            workspace_root: self.workspace_root,
            host_workspace: self.host_workspace,
            platform: self.platform,
            scripted_probes: Mutex::new(Vec::new()),
            probe_calls: AtomicUsize::new(0),
        }
    }
}

fn default_name() -> String {
    let id = MOCK_NODE_COUNTER.fetch_add(1, Ordering::SeqCst) + 1;
    format!("node-{}", id)
}
