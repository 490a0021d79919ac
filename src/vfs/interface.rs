//! Provider interface definitions

use std::ops::Range;
use std::sync::Arc;

use crate::types::Descriptor;
use crate::vfs::error::{VfsError, VfsResult};

/// Completion for an asynchronous read: the storage handed out, and the byte
/// count (negative on failure)
pub type ReadCompletion = Box<dyn FnOnce(Box<[u8]>, isize) + Send>;

/// Completion for an asynchronous write: the storage handed out
pub type WriteCompletion = Box<dyn FnOnce(Box<[u8]>) + Send>;

/// Provider shared by every handle opened through it
pub type SharedFs = Arc<dyn LowLevelFileSystem + Send + Sync>;

/// Low level file system trait
///
/// Resolves paths to descriptors and moves bytes between descriptors and
/// caller storage. Every range is inclusive (`start ..= end`); `end == start - 1`
/// denotes an empty window.
#[cfg_attr(test, mockall::automock)]
pub trait LowLevelFileSystem {
    /// Open `path`, returning a descriptor or a negative sentinel
    fn open_file(&self, path: &str) -> Descriptor;

    /// Release a descriptor
    fn close_file(&self, fd: Descriptor);

    /// Read into `bytes[start ..= end]`, returning the byte count or a
    /// negative sentinel
    fn sync_read_file(&self, fd: Descriptor, bytes: &mut [u8], start: usize, end: isize) -> isize;

    /// Write all of `bytes[start ..= end]`
    fn sync_write_file(
        &self,
        fd: Descriptor,
        bytes: &[u8],
        start: usize,
        end: isize,
    ) -> VfsResult<()>;

    /// Start a read into `bytes[start ..= end]`; `on_complete` receives the
    /// storage back together with the byte count
    ///
    /// `on_complete` runs at most once. A request the provider cannot run is
    /// dropped along with it.
    fn async_read_file(
        &self,
        fd: Descriptor,
        bytes: Box<[u8]>,
        start: usize,
        end: isize,
        on_complete: ReadCompletion,
    );

    /// Start a write of `bytes[start ..= end]`; `on_complete` receives the
    /// storage back once the write finished, at most once
    fn async_write_file(
        &self,
        fd: Descriptor,
        bytes: Box<[u8]>,
        start: usize,
        end: isize,
        on_complete: WriteCompletion,
    );
}

/// Converts an inclusive window into a slice range of storage with length `capacity`
pub fn window_range(start: usize, end: isize, capacity: usize) -> VfsResult<Range<usize>> {
    let start_signed = start as isize;
    if end < start_signed - 1 || end >= capacity as isize || start > capacity {
        return Err(VfsError::InvalidArgument(format!(
            "window {}..={} does not fit storage of {} bytes",
            start, end, capacity
        )));
    }

    Ok(start..(end + 1) as usize)
}
