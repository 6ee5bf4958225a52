//! Where channel-list lines come from.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::SelectionError;

/// Supplier of raw channel-list lines.
///
/// Only consulted in explicit-list mode.
pub trait ChannelSource {
    /// Read every line of the list.
    fn read_lines(&self) -> Result<Vec<String>, SelectionError>;
}

/// Channel list stored in a text file, one channel per line.
#[derive(Debug, Clone)]
pub struct FileChannelSource {
    path: PathBuf,
}

impl FileChannelSource {
    /// Create a source for the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the channel file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChannelSource for FileChannelSource {
    fn read_lines(&self) -> Result<Vec<String>, SelectionError> {
        let contents =
            std::fs::read_to_string(&self.path).map_err(|source| SelectionError::ChannelSource {
                path: self.path.clone(),
                source,
            })?;
        let lines: Vec<String> = contents.lines().map(str::to_owned).collect();
        debug!(path = %self.path.display(), lines = lines.len(), "Read channel file");
        Ok(lines)
    }
}

impl<S: AsRef<str>> ChannelSource for [S] {
    fn read_lines(&self) -> Result<Vec<String>, SelectionError> {
        Ok(self.iter().map(|s| s.as_ref().to_owned()).collect())
    }
}

impl<S: AsRef<str>> ChannelSource for Vec<S> {
    fn read_lines(&self) -> Result<Vec<String>, SelectionError> {
        self.as_slice().read_lines()
    }
}
