//! Local file system provider using glibc system calls

use crate::types::{Descriptor, FAILURE_SENTINEL};
use crate::vfs::error::{VfsError, VfsResult};
use crate::vfs::interface::{LowLevelFileSystem, ReadCompletion, WriteCompletion, window_range};
use libc::{self, c_int, c_uint, c_void, size_t};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::thread;

/// Flags applied by `LocalFs` when opening a path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalFsConfig {
    /// Create the file when it does not exist (`O_CREAT`)
    pub create: bool,
    /// Truncate the file on open (`O_TRUNC`)
    pub truncate: bool,
    /// Open read only (`O_RDONLY`) instead of read-write
    pub read_only: bool,
    /// Permission bits for created files
    pub mode: u32,
}

impl Default for LocalFsConfig {
    fn default() -> Self {
        Self {
            create: false,
            truncate: false,
            read_only: false,
            mode: 0o644,
        }
    }
}

impl LocalFsConfig {
    /// Parse a configuration from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> VfsResult<Self> {
        serde_json::from_str(json).map_err(|err| VfsError::InvalidArgument(err.to_string()))
    }

    fn open_flags(&self) -> c_int {
        let mut flags = if self.read_only {
            libc::O_RDONLY
        } else {
            libc::O_RDWR
        };
        if self.create {
            flags |= libc::O_CREAT;
        }
        if self.truncate {
            flags |= libc::O_TRUNC;
        }
        flags | libc::O_CLOEXEC
    }
}

/// Local file system provider
///
/// Descriptors are real OS descriptors. Asynchronous requests each run on a
/// dedicated worker thread, which also invokes the completion.
#[derive(Debug, Clone, Default)]
pub struct LocalFs {
    config: LocalFsConfig,
}

impl LocalFs {
    /// Create a new LocalFs instance with default flags
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LocalFsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LocalFsConfig {
        &self.config
    }

    /// Open a path with the configured flags and mode
    pub(crate) fn try_open(&self, path: &str) -> VfsResult<c_int> {
        // Create CString in scope so it lives during the system call
        let c_path = std::ffi::CString::new(path)?;

        let result = unsafe {
            libc::open(
                c_path.as_ptr(),
                self.config.open_flags(),
                self.config.mode as c_uint,
            )
        };

        if result < 0 {
            let errno = last_errno();
            match errno {
                libc::ENOENT => Err(VfsError::NotFound(path.to_string())),
                libc::EACCES | libc::EPERM => Err(VfsError::PermissionDenied(path.to_string())),
                _ => Err(VfsError::os("open", errno)),
            }
        } else {
            Ok(result)
        }
    }
}

fn last_errno() -> c_int {
    unsafe { *libc::__errno_location() }
}

fn errno_to_error(fd: Descriptor, errno: c_int, op: &'static str) -> VfsError {
    match errno {
        libc::EBADF => VfsError::BadDescriptor(fd),
        _ => VfsError::os(op, errno),
    }
}

/// Read once into `buf`, retrying on `EINTR`
fn read_window(fd: Descriptor, buf: &mut [u8]) -> VfsResult<usize> {
    loop {
        let result = unsafe { libc::read(fd, buf.as_mut_ptr() as *mut c_void, buf.len() as size_t) };

        if result >= 0 {
            return Ok(result as usize);
        }
        let errno = last_errno();
        if errno != libc::EINTR {
            return Err(errno_to_error(fd, errno, "read"));
        }
    }
}

/// Write all of `buf`, resuming after short writes and `EINTR`
fn write_window(fd: Descriptor, buf: &[u8]) -> VfsResult<()> {
    let mut written = 0;
    while written < buf.len() {
        let rest = &buf[written..];
        let result = unsafe { libc::write(fd, rest.as_ptr() as *const c_void, rest.len() as size_t) };

        if result < 0 {
            let errno = last_errno();
            if errno == libc::EINTR {
                continue;
            }
            return Err(errno_to_error(fd, errno, "write"));
        }
        if result == 0 {
            return Err(VfsError::Os {
                op: "write",
                source: std::io::ErrorKind::WriteZero.into(),
            });
        }
        written += result as usize;
    }

    Ok(())
}

fn read_into(fd: Descriptor, bytes: &mut [u8], start: usize, end: isize) -> isize {
    let result = window_range(start, end, bytes.len()).and_then(|range| read_window(fd, &mut bytes[range]));

    match result {
        Ok(count) => count as isize,
        Err(err) => {
            warn!("read on fd {} failed: {}", fd, err);
            FAILURE_SENTINEL as isize
        }
    }
}

fn write_from(fd: Descriptor, bytes: &[u8], start: usize, end: isize) -> VfsResult<()> {
    let range = window_range(start, end, bytes.len())?;
    write_window(fd, &bytes[range])
}

fn spawn_io(fd: Descriptor, op: &str, job: impl FnOnce() + Send + 'static) {
    let spawned = thread::Builder::new()
        .name(format!("hlfs-{}-{}", op, fd))
        .spawn(job);

    if let Err(err) = spawned {
        // The job, and with it the completion, is dropped
        warn!("failed to start async {} on fd {}: {}", op, fd, err);
    }
}

impl LowLevelFileSystem for LocalFs {
    fn open_file(&self, path: &str) -> Descriptor {
        match self.try_open(path) {
            Ok(fd) => {
                debug!("opened '{}' as fd {}", path, fd);
                fd
            }
            Err(err) => {
                warn!("open of '{}' failed: {}", path, err);
                FAILURE_SENTINEL
            }
        }
    }

    fn close_file(&self, fd: Descriptor) {
        let result = unsafe { libc::close(fd) };

        if result < 0 {
            let errno = last_errno();
            warn!("close of fd {} failed: {}", fd, errno_to_error(fd, errno, "close"));
        } else {
            debug!("closed fd {}", fd);
        }
    }

    fn sync_read_file(&self, fd: Descriptor, bytes: &mut [u8], start: usize, end: isize) -> isize {
        read_into(fd, bytes, start, end)
    }

    fn sync_write_file(
        &self,
        fd: Descriptor,
        bytes: &[u8],
        start: usize,
        end: isize,
    ) -> VfsResult<()> {
        write_from(fd, bytes, start, end)
    }

    fn async_read_file(
        &self,
        fd: Descriptor,
        mut bytes: Box<[u8]>,
        start: usize,
        end: isize,
        on_complete: ReadCompletion,
    ) {
        spawn_io(fd, "read", move || {
            let count = read_into(fd, &mut bytes, start, end);
            on_complete(bytes, count);
        });
    }

    fn async_write_file(
        &self,
        fd: Descriptor,
        bytes: Box<[u8]>,
        start: usize,
        end: isize,
        on_complete: WriteCompletion,
    ) {
        spawn_io(fd, "write", move || {
            if let Err(err) = write_from(fd, &bytes, start, end) {
                warn!("async write on fd {} failed: {}", fd, err);
            }
            on_complete(bytes);
        });
    }
}
