use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use tracing::debug;

const FLAG_PREFIX: &str = "noticed:";
const FLAG_OFFSET: usize = FLAG_PREFIX.len();
const ACKNOWLEDGED_LINE: &str = "noticed:1\n";

/// Durable "do not show onboarding again" flag.
pub trait NoticeStore {
    /// Missing or unreadable storage counts as not acknowledged.
    fn is_acknowledged(&self) -> bool;
    fn acknowledge(&self) -> anyhow::Result<()>;
}

/// One-line flag file: `noticed:1` once acknowledged. Only the byte at offset 8 is
/// inspected when reading.
#[derive(Debug, Clone)]
pub struct NoticeFile {
    path: PathBuf,
}

impl NoticeFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub fn decode(bytes: &[u8]) -> bool {
    bytes.get(FLAG_OFFSET) == Some(&b'1')
}

impl NoticeStore for NoticeFile {
    fn is_acknowledged(&self) -> bool {
        match fs::read(&self.path) {
            Ok(bytes) => decode(&bytes),
            Err(err) => {
                debug!("No onboarding flag at {}: {err}", self.path.display());
                false
            }
        }
    }

    fn acknowledge(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory: {}", parent.display())
                })?;
            }
        }
        fs::write(&self.path, ACKNOWLEDGED_LINE)
            .with_context(|| format!("Failed to write flag file: {}", self.path.display()))
    }
}
