//! hlfs: windowed buffers and lifecycle-checked file handles over a
//! descriptor-based storage provider

// Global type definitions
pub mod types;
pub mod error;

// Import various modules
pub mod buffer;
pub mod fs;
pub mod vfs;

// Re-export the handle layer for easier access
pub use buffer::Buffer;
pub use error::{AsyncWriteError, FsError, FsResult};
pub use fs::{File, HighLevelFileSystem};
pub use types::{ClosePolicy, Descriptor, FsConfig};

// Re-export vfs items for easier access
pub use vfs::{LocalFs, LocalFsConfig, LowLevelFileSystem, MemFs, SharedFs, VfsError};
