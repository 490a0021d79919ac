//! File handle over a provider descriptor

use crate::buffer::Buffer;
use crate::error::{AsyncWriteError, FsError, FsResult};
use crate::types::{ClosePolicy, Descriptor, FsConfig};
use crate::vfs::SharedFs;
use log::debug;

/// Handle wrapping one open descriptor
///
/// A handle is `Open` until `close` is called and `Closed` afterwards; no I/O
/// reaches the provider once it is closed. Dropping an open handle does not
/// release the descriptor.
pub struct File {
    fs: SharedFs,
    fd: Descriptor,
    closed: bool,
    close_policy: ClosePolicy,
    default_read_size: usize,
}

impl File {
    pub(crate) fn new(fs: SharedFs, fd: Descriptor, config: &FsConfig) -> Self {
        Self {
            fs,
            fd,
            closed: false,
            close_policy: config.close_policy,
            default_read_size: config.default_read_size,
        }
    }

    #[inline]
    pub fn descriptor(&self) -> Descriptor {
        self.fd
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Releases the descriptor at the provider and marks the handle closed
    pub fn close(&mut self) -> FsResult<()> {
        if self.closed {
            return match self.close_policy {
                ClosePolicy::Reject => Err(FsError::ClosedFile(self.fd)),
                ClosePolicy::Idempotent => Ok(()),
            };
        }

        self.fs.close_file(self.fd);
        self.closed = true;
        debug!("file fd {} closed", self.fd);
        Ok(())
    }

    /// Blocking read into the buffer's window, narrowing it to the bytes read
    pub fn sync_read(&self, buffer: &mut Buffer) -> FsResult<usize> {
        self.check_closed()?;

        let (start, end) = (buffer.start(), buffer.end());
        let count = self.fs.sync_read_file(self.fd, buffer.bytes_mut(), start, end);
        if count < 0 {
            return Err(FsError::CanNotRead {
                descriptor: self.fd,
                count,
            });
        }

        buffer.limit(count as usize)?;
        Ok(count as usize)
    }

    /// Blocking write of the buffer's valid window
    pub fn sync_write(&self, buffer: &Buffer) -> FsResult<()> {
        self.check_closed()?;

        self.fs
            .sync_write_file(self.fd, buffer.bytes(), buffer.start(), buffer.end())?;
        Ok(())
    }

    /// Starts a read of up to `max_length` bytes into a fresh buffer
    ///
    /// Returns as soon as the provider accepted the request. `callback` runs on
    /// the provider's context, at most once, with the narrowed buffer or the
    /// read failure. It runs exactly once unless the provider never completes
    /// the request (`LocalFs` drops requests whose worker thread fails to start).
    pub fn async_read<F>(&self, callback: F, max_length: usize) -> FsResult<()>
    where
        F: FnOnce(FsResult<Buffer>) + Send + 'static,
    {
        self.check_closed()?;

        let fd = self.fd;
        let (bytes, start, end) = Buffer::new(max_length)?.into_parts();
        self.fs.async_read_file(
            fd,
            bytes,
            start,
            end,
            Box::new(move |bytes, count| {
                let mut buffer = Buffer::from_parts(bytes, start, end);
                let result = if count < 0 {
                    Err(FsError::CanNotRead {
                        descriptor: fd,
                        count,
                    })
                } else {
                    buffer.limit(count as usize).map(|()| buffer)
                };
                callback(result);
            }),
        );
        Ok(())
    }

    /// `async_read` with the capacity configured on the factory
    pub fn async_read_default<F>(&self, callback: F) -> FsResult<()>
    where
        F: FnOnce(FsResult<Buffer>) + Send + 'static,
    {
        self.async_read(callback, self.default_read_size)
    }

    /// Starts a write of the buffer's valid window
    ///
    /// `callback` receives the buffer back, same storage and window, once the
    /// provider signals completion. Same delivery rules as `async_read`. On a
    /// closed handle the buffer comes back inside the error.
    pub fn async_write<F>(&self, callback: F, buffer: Buffer) -> Result<(), AsyncWriteError>
    where
        F: FnOnce(Buffer) + Send + 'static,
    {
        if let Err(error) = self.check_closed() {
            return Err(AsyncWriteError::new(error, buffer));
        }

        let (bytes, start, end) = buffer.into_parts();
        self.fs.async_write_file(
            self.fd,
            bytes,
            start,
            end,
            Box::new(move |bytes| callback(Buffer::from_parts(bytes, start, end))),
        );
        Ok(())
    }

    fn check_closed(&self) -> FsResult<()> {
        if self.closed {
            Err(FsError::ClosedFile(self.fd))
        } else {
            Ok(())
        }
    }
}

impl std::fmt::Debug for File {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("File")
            .field("fd", &self.fd)
            .field("closed", &self.closed)
            .field("close_policy", &self.close_policy)
            .finish()
    }
}
