//! In-memory provider
//!
//! Files are byte vectors keyed by path. Each descriptor carries its own
//! cursor that reads and writes advance. Asynchronous requests either complete
//! inline or wait in a FIFO queue until `run_pending` drains it.

use crate::types::{Descriptor, FAILURE_SENTINEL};
use crate::vfs::error::{VfsError, VfsResult};
use crate::vfs::interface::{LowLevelFileSystem, ReadCompletion, WriteCompletion, window_range};
use log::{debug, warn};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};

/// When asynchronous completions are delivered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompletionMode {
    /// Before the async call returns, on the calling thread
    #[default]
    Immediate,
    /// On the next `run_pending` call
    Deferred,
}

struct OpenEntry {
    path: String,
    cursor: usize,
}

#[derive(Default)]
struct MemFsInner {
    files: HashMap<String, Vec<u8>>,
    open: HashMap<Descriptor, OpenEntry>,
    next_fd: Descriptor,
}

impl MemFsInner {
    fn entry_file(&mut self, fd: Descriptor) -> VfsResult<(&mut OpenEntry, &mut Vec<u8>)> {
        let entry = self.open.get_mut(&fd).ok_or(VfsError::BadDescriptor(fd))?;
        let file = self
            .files
            .get_mut(&entry.path)
            .ok_or_else(|| VfsError::NotFound(entry.path.clone()))?;
        Ok((entry, file))
    }

    fn read(&mut self, fd: Descriptor, buf: &mut [u8]) -> VfsResult<usize> {
        let (entry, file) = self.entry_file(fd)?;
        let available = file.len().saturating_sub(entry.cursor);
        let count = available.min(buf.len());
        if count == 0 {
            return Ok(0);
        }
        buf[..count].copy_from_slice(&file[entry.cursor..entry.cursor + count]);
        entry.cursor += count;
        Ok(count)
    }

    fn write(&mut self, fd: Descriptor, buf: &[u8]) -> VfsResult<()> {
        let (entry, file) = self.entry_file(fd)?;
        let end = entry.cursor + buf.len();
        if file.len() < end {
            file.resize(end, 0);
        }
        file[entry.cursor..end].copy_from_slice(buf);
        entry.cursor = end;
        Ok(())
    }
}

type PendingCompletion = Box<dyn FnOnce() + Send>;

/// In-memory provider
pub struct MemFs {
    inner: Mutex<MemFsInner>,
    pending: Mutex<VecDeque<PendingCompletion>>,
    mode: CompletionMode,
}

impl MemFs {
    /// Create an empty file system with immediate completions
    pub fn new() -> Self {
        Self::with_mode(CompletionMode::Immediate)
    }

    pub fn with_mode(mode: CompletionMode) -> Self {
        Self {
            inner: Mutex::new(MemFsInner::default()),
            pending: Mutex::new(VecDeque::new()),
            mode,
        }
    }

    /// Create or replace the file at `path`
    pub fn insert_file(&self, path: &str, contents: impl Into<Vec<u8>>) {
        self.inner.lock().files.insert(path.to_string(), contents.into());
    }

    /// Create an empty file at `path` unless one exists
    pub fn create_file(&self, path: &str) {
        self.inner.lock().files.entry(path.to_string()).or_default();
    }

    /// Current contents of the file at `path`
    pub fn contents(&self, path: &str) -> Option<Vec<u8>> {
        self.inner.lock().files.get(path).cloned()
    }

    /// Number of descriptors currently open
    pub fn open_count(&self) -> usize {
        self.inner.lock().open.len()
    }

    /// Number of completions waiting for `run_pending`
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    /// Deliver every queued completion in FIFO order, returning how many ran
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        // Completions may queue new work, so pop one at a time without holding the lock
        loop {
            let next = self.pending.lock().pop_front();
            match next {
                Some(completion) => {
                    completion();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }

    fn complete(&self, completion: PendingCompletion) {
        match self.mode {
            CompletionMode::Immediate => completion(),
            CompletionMode::Deferred => self.pending.lock().push_back(completion),
        }
    }

    fn read_into(&self, fd: Descriptor, bytes: &mut [u8], start: usize, end: isize) -> isize {
        let result = window_range(start, end, bytes.len())
            .and_then(|range| self.inner.lock().read(fd, &mut bytes[range]));

        match result {
            Ok(count) => count as isize,
            Err(err) => {
                warn!("read on fd {} failed: {}", fd, err);
                FAILURE_SENTINEL as isize
            }
        }
    }

    fn write_from(&self, fd: Descriptor, bytes: &[u8], start: usize, end: isize) -> VfsResult<()> {
        let range = window_range(start, end, bytes.len())?;
        self.inner.lock().write(fd, &bytes[range])
    }
}

impl Default for MemFs {
    fn default() -> Self {
        Self::new()
    }
}

impl LowLevelFileSystem for MemFs {
    fn open_file(&self, path: &str) -> Descriptor {
        let mut inner = self.inner.lock();
        if !inner.files.contains_key(path) {
            warn!("open of '{}' failed: not found", path);
            return FAILURE_SENTINEL;
        }

        let fd = inner.next_fd;
        inner.next_fd += 1;
        inner.open.insert(
            fd,
            OpenEntry {
                path: path.to_string(),
                cursor: 0,
            },
        );
        debug!("opened '{}' as fd {}", path, fd);
        fd
    }

    fn close_file(&self, fd: Descriptor) {
        if self.inner.lock().open.remove(&fd).is_none() {
            warn!("close of unknown fd {}", fd);
        } else {
            debug!("closed fd {}", fd);
        }
    }

    fn sync_read_file(&self, fd: Descriptor, bytes: &mut [u8], start: usize, end: isize) -> isize {
        self.read_into(fd, bytes, start, end)
    }

    fn sync_write_file(
        &self,
        fd: Descriptor,
        bytes: &[u8],
        start: usize,
        end: isize,
    ) -> VfsResult<()> {
        self.write_from(fd, bytes, start, end)
    }

    fn async_read_file(
        &self,
        fd: Descriptor,
        mut bytes: Box<[u8]>,
        start: usize,
        end: isize,
        on_complete: ReadCompletion,
    ) {
        // Data moves at request time; only the notification is deferred
        let count = self.read_into(fd, &mut bytes, start, end);
        self.complete(Box::new(move || on_complete(bytes, count)));
    }

    fn async_write_file(
        &self,
        fd: Descriptor,
        bytes: Box<[u8]>,
        start: usize,
        end: isize,
        on_complete: WriteCompletion,
    ) {
        if let Err(err) = self.write_from(fd, &bytes, start, end) {
            warn!("async write on fd {} failed: {}", fd, err);
        }
        self.complete(Box::new(move || on_complete(bytes)));
    }
}
