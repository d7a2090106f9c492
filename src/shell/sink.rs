//! Delivery of finished output files

use std::path::{Component, Path, PathBuf};
use std::time::Instant;
use crate::error::{Error, Result};

/// Receives finished artifacts, one call per output file
pub trait ArtifactSink {
    fn deliver(&mut self, filename: &str, bytes: Vec<u8>) -> Result<()>;
}

/// Writes artifacts into a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    /// Create the sink, creating `dir` if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            written: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

/// True if `filename` is one ordinary path component
fn is_plain_filename(filename: &str) -> bool {
    let mut components = Path::new(filename).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(name)), None) if name == filename
    )
}

impl ArtifactSink for DirectorySink {
    fn deliver(&mut self, filename: &str, bytes: Vec<u8>) -> Result<()> {
        if !is_plain_filename(filename) {
            return Err(Error::InputRejected(format!(
                "{} is not a plain file name",
                filename
            )));
        }
        let path = self.dir.join(filename);
        std::fs::write(&path, bytes)?;
        log::info!("Wrote {}", path.display());
        self.written.push(path);
        Ok(())
    }
}

/// A delivered artifact kept in memory
#[derive(Debug, Clone)]
pub struct Delivered {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub at: Instant,
}

/// Keeps artifacts in memory, recording when each arrived
#[derive(Debug, Default)]
pub struct MemorySink {
    pub delivered: Vec<Delivered>,
}

impl ArtifactSink for MemorySink {
    fn deliver(&mut self, filename: &str, bytes: Vec<u8>) -> Result<()> {
        self.delivered.push(Delivered {
            filename: filename.to_string(),
            bytes,
            at: Instant::now(),
        });
        Ok(())
    }
}
