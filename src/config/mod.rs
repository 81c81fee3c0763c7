//! Locator configuration.
//!
//! Configuration is process-wide, read once at startup from `SHORTWS_`
//! environment variables, and then carried by value inside the locator.
//! There is no file format and no reload; the host restarts to reconfigure.
//! Malformed variables fail startup with every problem listed, rather than
//! silently falling back to defaults.

pub mod env;

pub use env::{ConfigSource, EnvError, EnvParser, Sourced};

use crate::types::PlatformFamily;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const DEFAULT_BUILD_PATH_LENGTH: u32 = 512;
const DEFAULT_FORCE_SHORT_WORKSPACE: bool = true;
const DEFAULT_FORCE_APPLY_TO_CONTROLLER: bool = true;
const DEFAULT_WINDOWS_PATH_MAX: u32 = 260;
const DEFAULT_UNIX_PATH_MAX: u32 = 4096;

/// Upper bound accepted for any configured length.
const MAX_CONFIGURED_LENGTH: u32 = 1_048_576;

/// Startup configuration failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more environment variables could not be parsed.
    #[error("Invalid environment configuration: {}", format_env_errors(.0))]
    Env(Vec<EnvError>),
}

fn format_env_errors(errors: &[EnvError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Maximum path lengths per platform family.
///
/// The classic constants (260 for Windows MAX_PATH, 4096 for Unix PATH_MAX)
/// are defaults, not truths. Long-path-aware Windows images or constrained
/// network filesystems can override them without a code change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathLimits {
    pub windows: u32,
    pub unix: u32,
}

impl Default for PathLimits {
    fn default() -> Self {
        Self {
            windows: DEFAULT_WINDOWS_PATH_MAX,
            unix: DEFAULT_UNIX_PATH_MAX,
        }
    }
}

impl PathLimits {
    /// Budget for a probed platform family.
    pub fn for_family(&self, family: PlatformFamily) -> u32 {
        match family {
            PlatformFamily::Windows => self.windows,
            PlatformFamily::Unix => self.unix,
        }
    }
}

/// Options recognized by the locator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Usable-length threshold below which shortening is attempted.
    pub build_path_length: u32,
    /// Always substitute the shortened candidate once computed, skipping the
    /// length-improvement check.
    pub force_short_workspace: bool,
    /// When false, controller workspaces are never touched.
    pub force_apply_to_controller: bool,
    /// Per-family path length budgets used by the prober.
    pub limits: PathLimits,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            build_path_length: DEFAULT_BUILD_PATH_LENGTH,
            force_short_workspace: DEFAULT_FORCE_SHORT_WORKSPACE,
            force_apply_to_controller: DEFAULT_FORCE_APPLY_TO_CONTROLLER,
            limits: PathLimits::default(),
        }
    }
}

impl LocatorConfig {
    /// Read the configuration from `SHORTWS_` environment variables.
    ///
    /// Unset variables take their defaults. Any malformed variable fails the
    /// whole load; the error lists every offending variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut parser = EnvParser::new();

        let build_path_length = parser.get_u32_range(
            "BUILD_PATH_LENGTH",
            DEFAULT_BUILD_PATH_LENGTH,
            0,
            MAX_CONFIGURED_LENGTH,
        );
        let force_short_workspace =
            parser.get_bool("FORCE_SHORT_WS", DEFAULT_FORCE_SHORT_WORKSPACE);
        let force_apply_to_controller =
            parser.get_bool("FORCE_MASTER", DEFAULT_FORCE_APPLY_TO_CONTROLLER);
        let windows = parser.get_u32_range(
            "WINDOWS_PATH_MAX",
            DEFAULT_WINDOWS_PATH_MAX,
            1,
            MAX_CONFIGURED_LENGTH,
        );
        let unix = parser.get_u32_range(
            "UNIX_PATH_MAX",
            DEFAULT_UNIX_PATH_MAX,
            1,
            MAX_CONFIGURED_LENGTH,
        );

        if parser.has_errors() {
            return Err(ConfigError::Env(parser.take_errors()));
        }

        let config = Self {
            build_path_length: build_path_length.value,
            force_short_workspace: force_short_workspace.value,
            force_apply_to_controller: force_apply_to_controller.value,
            limits: PathLimits {
                windows: windows.value,
                unix: unix.value,
            },
        };
        debug!(
            build_path_length = config.build_path_length,
            force_short_workspace = config.force_short_workspace,
            force_apply_to_controller = config.force_apply_to_controller,
            windows_path_max = config.limits.windows,
            unix_path_max = config.limits.unix,
            from_env = build_path_length.source == ConfigSource::Environment
                || force_short_workspace.source == ConfigSource::Environment
                || force_apply_to_controller.source == ConfigSource::Environment
                || windows.source == ConfigSource::Environment
                || unix.source == ConfigSource::Environment,
            "Locator configuration loaded"
        );
        Ok(config)
    }
}

#[cfg(test)]
pub(crate) fn env_test_lock() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, OnceLock};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}
