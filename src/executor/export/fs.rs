//! Filesystem access for export output
//!
//! The exporter only needs two operations: make sure the output directory
//! exists and open the destination file for a fresh write.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::debug;

/// Write buffer size for output files
const WRITE_BUFFER_CAPACITY: usize = 64 * 1024;

/// Filesystem operations used by the exporter
pub trait ExportFs {
    /// Create `dir` and its parents if missing; an existing directory is success
    fn ensure_dir(&self, dir: &Path) -> io::Result<()>;

    /// Create or truncate `path` for writing
    fn create(&self, path: &Path) -> io::Result<Box<dyn Write>>;
}

/// Local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl ExportFs for LocalFs {
    fn ensure_dir(&self, dir: &Path) -> io::Result<()> {
        if dir.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(dir)?;
        debug!("Created output directory: {}", dir.display());
        Ok(())
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn Write>> {
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::with_capacity(WRITE_BUFFER_CAPACITY, file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_dir_creates_and_accepts_existing() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("a").join("b");

        LocalFs.ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());
        LocalFs.ensure_dir(&dir).unwrap();
    }

    #[test]
    fn test_create_truncates() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("out");
        fs::write(&path, "previous content that is long").unwrap();

        let mut sink = LocalFs.create(&path).unwrap();
        sink.write_all(b"new").unwrap();
        sink.flush().unwrap();
        drop(sink);

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_create_in_missing_directory_fails() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("missing").join("out");
        let err = LocalFs.create(&path).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
