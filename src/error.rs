//! Handle layer error definitions

use std::error::Error;
use std::fmt;

use crate::buffer::Buffer;
use crate::types::Descriptor;
use crate::vfs::VfsError;

/// Errors raised by buffers, handles and the file system factory
#[derive(Debug)]
pub enum FsError {
    /// Buffer constructed with zero capacity
    InvalidCapacity(usize),
    /// Window narrowed beyond the buffer's capacity
    InvalidLimit { limit: usize, capacity: usize },
    /// Provider refused to open the path
    CanNotOpen { path: String, descriptor: Descriptor },
    /// Operation attempted on a closed handle
    ClosedFile(Descriptor),
    /// Provider reported a failed read
    CanNotRead { descriptor: Descriptor, count: isize },
    /// Provider-defined failure
    Provider(VfsError),
    /// Configuration could not be parsed
    Config(String),
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsError::InvalidCapacity(capacity) => {
                write!(f, "Invalid buffer capacity: {}", capacity)
            }
            FsError::InvalidLimit { limit, capacity } => {
                write!(f, "Invalid limit {} for buffer of capacity {}", limit, capacity)
            }
            FsError::CanNotOpen { path, descriptor } => {
                write!(f, "Can not open file '{}', fd: {}", path, descriptor)
            }
            FsError::ClosedFile(fd) => write!(f, "File is closed, fd: {}", fd),
            FsError::CanNotRead { descriptor, count } => {
                write!(f, "Can not read file, fd: {}, count: {}", descriptor, count)
            }
            FsError::Provider(err) => write!(f, "Provider error: {}", err),
            FsError::Config(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl Error for FsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FsError::Provider(err) => Some(err),
            _ => None,
        }
    }
}

impl From<VfsError> for FsError {
    fn from(err: VfsError) -> Self {
        FsError::Provider(err)
    }
}

/// Result type for handle layer operations
pub type FsResult<T> = Result<T, FsError>;

/// Rejected `File::async_write`, carrying the buffer the caller handed over
#[derive(Debug)]
pub struct AsyncWriteError {
    error: FsError,
    buffer: Buffer,
}

impl AsyncWriteError {
    pub(crate) fn new(error: FsError, buffer: Buffer) -> Self {
        Self { error, buffer }
    }

    pub fn error(&self) -> &FsError {
        &self.error
    }

    /// Takes back the buffer that was never sent to the provider
    pub fn into_buffer(self) -> Buffer {
        self.buffer
    }

    pub fn into_parts(self) -> (FsError, Buffer) {
        (self.error, self.buffer)
    }
}

impl fmt::Display for AsyncWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Async write rejected: {}", self.error)
    }
}

impl Error for AsyncWriteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}

impl From<AsyncWriteError> for FsError {
    fn from(err: AsyncWriteError) -> Self {
        err.error
    }
}
