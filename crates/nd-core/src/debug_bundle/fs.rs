//! Filesystem abstraction used to resolve and create the output archive.

use std::io::{self, Seek, Write};
use std::path::{Path, PathBuf};

/// A writable, seekable sink (ZIP output needs both).
pub trait WriteSeek: Write + Seek {}

impl<T: Write + Seek> WriteSeek for T {}

/// The subset of filesystem operations the collector needs for its output.
pub trait Filesystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn current_dir(&self) -> io::Result<PathBuf>;

    /// Create a new file, failing if it already exists.
    fn create_file(&self, path: &Path) -> io::Result<Box<dyn WriteSeek>>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;
}

/// The real operating-system filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFs;

impl Filesystem for OsFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }

    fn create_file(&self, path: &Path) -> io::Result<Box<dyn WriteSeek>> {
        let file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)?;
        Ok(Box::new(file))
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}
