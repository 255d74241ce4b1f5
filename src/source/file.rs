use std::path::PathBuf;

use anyhow::Context;

use crate::error::{ModtreeError, Result};
use crate::source::traits::EdgeSource;

pub struct FileSource {
    pub path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EdgeSource for FileSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    fn read(&mut self) -> Result<Vec<u8>> {
        std::fs::read(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))
            .map_err(ModtreeError::Other)
    }
}

/// In-memory edge list.
pub struct BytesSource(pub Vec<u8>);

impl EdgeSource for BytesSource {
    fn describe(&self) -> String {
        format!("{} bytes in memory", self.0.len())
    }

    fn read(&mut self) -> Result<Vec<u8>> {
        Ok(self.0.clone())
    }
}
