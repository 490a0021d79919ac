//! Provider error definitions

use std::error::Error;
use std::fmt;
use std::io;

use crate::types::Descriptor;

/// Failures reported by a provider
#[derive(Debug)]
pub enum VfsError {
    /// Path exists but may not be opened
    PermissionDenied(String),
    /// Path does not exist
    NotFound(String),
    /// Argument rejected before reaching the OS
    InvalidArgument(String),
    /// Descriptor is not open at the provider
    BadDescriptor(Descriptor),
    /// OS failure not covered above
    Os { op: &'static str, source: io::Error },
}

impl VfsError {
    /// Wraps a raw errno returned by `op`
    pub fn os(op: &'static str, errno: i32) -> Self {
        VfsError::Os {
            op,
            source: io::Error::from_raw_os_error(errno),
        }
    }

    /// The errno behind this failure, when there is one
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            VfsError::Os { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }
}

impl fmt::Display for VfsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VfsError::PermissionDenied(path) => write!(f, "Permission denied: {}", path),
            VfsError::NotFound(path) => write!(f, "File not found: {}", path),
            VfsError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            VfsError::BadDescriptor(fd) => write!(f, "Bad descriptor: {}", fd),
            VfsError::Os { op, source } => write!(f, "{} failed: {}", op, source),
        }
    }
}

impl Error for VfsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            VfsError::Os { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::ffi::NulError> for VfsError {
    fn from(err: std::ffi::NulError) -> Self {
        VfsError::InvalidArgument(err.to_string())
    }
}

/// Result type for provider operations
pub type VfsResult<T> = Result<T, VfsError>;
