use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::error::Result;

/// Default name of the generated document.
pub const DEFAULT_FILENAME: &str = "invoice.pdf";

/// Hands finished document bytes to the user.
pub trait Download {
    /// Deliver `bytes` under `filename` and report where they ended up.
    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Writes documents into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectoryDownload {
    dir: PathBuf,
}

impl DirectoryDownload {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Download for DirectoryDownload {
    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        fs::write(&path, bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "document delivered");
        Ok(path)
    }
}
