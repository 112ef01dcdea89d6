//! Controller configuration, validation, and error types.

use std::error::Error;
use std::fmt;
use std::time::Duration;

/// Batch size used when the caller does not pick one.
pub const DEFAULT_BATCH_SIZE: u32 = 100;

// ── ControllerConfig ────────────────────────────────────────────

/// Configuration for a [`SimulationController`](crate::SimulationController).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Firings per `simulate_start`/`simulate_continue` batch when running
    /// from the editor. Default: 100.
    pub batch_size: u32,
    /// Deadline for each engine call. `None` waits indefinitely.
    /// Default: `None`.
    pub rpc_timeout: Option<Duration>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            rpc_timeout: None,
        }
    }
}

impl ControllerConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        if self.rpc_timeout == Some(Duration::ZERO) {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

// ── ConfigError ─────────────────────────────────────────────────

/// Errors detected during controller configuration validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `batch_size` must be at least 1.
    ZeroBatchSize,
    /// `rpc_timeout`, when set, must be non-zero.
    ZeroTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroBatchSize => write!(f, "batch_size must be at least 1"),
            Self::ZeroTimeout => write!(f, "rpc_timeout must be non-zero when set"),
        }
    }
}

impl Error for ConfigError {}
