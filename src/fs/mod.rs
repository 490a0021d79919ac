//! High level file system
//!
//! Opens paths through a provider and hands out validated `File` handles.

pub mod file;
pub use file::File;

use crate::error::{FsError, FsResult};
use crate::types::FsConfig;
use crate::vfs::SharedFs;
use log::{debug, warn};

/// Factory turning paths into open handles
#[derive(Clone)]
pub struct HighLevelFileSystem {
    fs: SharedFs,
    config: FsConfig,
}

impl HighLevelFileSystem {
    pub fn new(fs: SharedFs) -> Self {
        Self::with_config(fs, FsConfig::default())
    }

    pub fn with_config(fs: SharedFs, config: FsConfig) -> Self {
        Self { fs, config }
    }

    pub fn config(&self) -> &FsConfig {
        &self.config
    }

    /// Opens `path`, failing with `CanNotOpen` when the provider refuses it
    pub fn open_file(&self, path: &str) -> FsResult<File> {
        let fd = self.fs.open_file(path);
        if fd < 0 {
            warn!("provider refused to open '{}', fd: {}", path, fd);
            return Err(FsError::CanNotOpen {
                path: path.to_string(),
                descriptor: fd,
            });
        }

        debug!("file '{}' opened as fd {}", path, fd);
        Ok(File::new(self.fs.clone(), fd, &self.config))
    }
}

impl std::fmt::Debug for HighLevelFileSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighLevelFileSystem")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
