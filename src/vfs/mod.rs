//! VFS (Virtual File System) module
//!
//! This module defines the provider capability the handle layer is built on,
//! with a local provider that wraps glibc system calls and an in-memory one.

// Re-export error types and result type
pub mod error;
pub use error::{VfsError, VfsResult};

// Re-export interface traits
pub mod interface;
pub use interface::{LowLevelFileSystem, ReadCompletion, SharedFs, WriteCompletion, window_range};

#[cfg(test)]
pub use interface::MockLowLevelFileSystem;

// Re-export provider implementations
pub mod local_fs;
pub use local_fs::{LocalFs, LocalFsConfig};

pub mod mem_fs;
pub use mem_fs::{CompletionMode, MemFs};
