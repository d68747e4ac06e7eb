use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::{info, instrument};
use uuid::Uuid;

/// Writes invocation results into a fixed staging directory under fresh
/// uuid names. Cleanup is the host's job; this side never deletes.
#[derive(Debug, Clone)]
pub struct TempFileSink {
    dir: PathBuf,
}

impl TempFileSink {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[instrument(skip(self, payload), fields(dir = %self.dir.display(), bytes = payload.len()))]
    pub fn write(&self, payload: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("failed to create staging directory: {}", self.dir.display())
        })?;

        let path = self.dir.join(format!(".{}", Uuid::new_v4()));
        fs::write(&path, payload)
            .with_context(|| format!("failed to stage result: {}", path.display()))?;
        info!(path = %path.display(), "result staged");
        Ok(path)
    }
}
