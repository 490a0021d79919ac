//! Windowed I/O buffer
//!
//! A `Buffer` owns a fixed-capacity byte region and a window marking how much
//! of it holds valid data. The window always starts at the base of the region;
//! reads narrow it with `limit` instead of reallocating or copying.
//!
//! ```text
//! +---------------------------+-------------------------+
//! |  valid (start ..= end)    |  stale / undefined      |
//! +---------------------------+-------------------------+
//!  0                     end                     capacity - 1
//! ```

use crate::error::{FsError, FsResult};
use crate::vfs::window_range;
use log::warn;

/// Fixed-capacity byte region with a movable valid-length marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    /// Backing storage, never reallocated
    bytes: Box<[u8]>,
    /// First valid byte, always 0
    start: usize,
    /// Last valid byte (inclusive), `start - 1` when empty
    end: isize,
}

impl Buffer {
    /// Creates a zeroed buffer whose whole capacity is valid
    pub fn new(capacity: usize) -> FsResult<Self> {
        if capacity == 0 {
            return Err(FsError::InvalidCapacity(capacity));
        }

        Ok(Self {
            bytes: vec![0u8; capacity].into_boxed_slice(),
            start: 0,
            end: capacity as isize - 1,
        })
    }

    /// Creates a buffer that takes ownership of `bytes`, all of them valid
    pub fn from_bytes(bytes: impl Into<Box<[u8]>>) -> FsResult<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(FsError::InvalidCapacity(0));
        }

        let end = bytes.len() as isize - 1;
        Ok(Self {
            bytes,
            start: 0,
            end,
        })
    }

    /// Rebuilds a buffer around storage handed back by a provider
    ///
    /// A window that no longer fits the storage is clamped to it.
    pub(crate) fn from_parts(bytes: Box<[u8]>, start: usize, end: isize) -> Self {
        if let Err(err) = window_range(start, end, bytes.len()) {
            warn!("provider returned storage that does not fit the window: {}", err);
            let start = start.min(bytes.len());
            let end = end.clamp(start as isize - 1, bytes.len() as isize - 1);
            return Self { bytes, start, end };
        }

        Self { bytes, start, end }
    }

    /// Splits the buffer into its storage and window so the storage can travel
    /// to a provider and back
    pub(crate) fn into_parts(self) -> (Box<[u8]>, usize, isize) {
        (self.bytes, self.start, self.end)
    }

    /// Marks only the first `n` bytes as valid
    pub fn limit(&mut self, n: usize) -> FsResult<()> {
        if n > self.bytes.len() {
            return Err(FsError::InvalidLimit {
                limit: n,
                capacity: self.bytes.len(),
            });
        }

        self.end = self.start as isize + n as isize - 1;
        Ok(())
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Returns the valid window
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.bytes[self.start..self.start + self.current_size()]
    }

    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    #[inline]
    pub fn end(&self) -> isize {
        self.end
    }

    /// Number of valid bytes
    #[inline]
    pub fn current_size(&self) -> usize {
        (self.end - self.start as isize + 1) as usize
    }

    #[inline]
    pub fn max_size(&self) -> usize {
        self.bytes.len()
    }
}
