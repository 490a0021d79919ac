//! Global type definitions
//!
//! Stores type aliases, constants and configuration shared by the buffer,
//! provider and handle layers.

use serde::{Deserialize, Serialize};

use crate::error::{FsError, FsResult};

/// Descriptor type handed out by a provider
pub type Descriptor = i32;

/// Sentinel a provider returns instead of a descriptor or count on failure
pub const FAILURE_SENTINEL: i32 = -1;

/// Default capacity for reads when the caller has no better estimate (4KB)
pub const DEFAULT_READ_SIZE: usize = 4096;

/// What a handle does when `close` is called on it a second time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosePolicy {
    /// Second close fails with `ClosedFile`
    #[default]
    Reject,
    /// Second close is a no-op
    Idempotent,
}

/// Handle layer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FsConfig {
    /// Policy applied to every handle opened through the factory
    pub close_policy: ClosePolicy,
    /// Capacity used by `File::async_read_default`
    pub default_read_size: usize,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            close_policy: ClosePolicy::Reject,
            default_read_size: DEFAULT_READ_SIZE,
        }
    }
}

impl FsConfig {
    /// Parse a configuration from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> FsResult<Self> {
        serde_json::from_str(json).map_err(|err| FsError::Config(err.to_string()))
    }
}
