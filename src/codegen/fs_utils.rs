//! Filesystem utilities for code generation

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::codegen::target::GeneratedFile;
use crate::error::GenerationError;

/// Write content to a file, creating parent directories if needed
pub fn write_file<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> io::Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, contents)
}

/// Destination for emitted files.
///
/// Emitters never touch the filesystem themselves; the orchestrator hands
/// every [`GeneratedFile`] to a sink rooted at the output directory.
pub trait FileSink {
    /// Create a directory (and its parents) relative to the sink root
    fn create_dir(&mut self, relative: &Path) -> Result<(), GenerationError>;

    /// Write one file relative to the sink root
    fn write(&mut self, file: &GeneratedFile) -> Result<(), GenerationError>;
}

/// Sink writing into a directory on disk
#[derive(Debug, Clone)]
pub struct FsSink {
    root: PathBuf,
    written: usize,
}

impl FsSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            written: 0,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of files written so far
    pub fn written(&self) -> usize {
        self.written
    }
}

impl FileSink for FsSink {
    fn create_dir(&mut self, relative: &Path) -> Result<(), GenerationError> {
        let path = self.root.join(relative);
        fs::create_dir_all(&path).map_err(|e| GenerationError::emission(&path, e))
    }

    fn write(&mut self, file: &GeneratedFile) -> Result<(), GenerationError> {
        let path = self.root.join(&file.path);
        write_file(&path, &file.contents).map_err(|e| GenerationError::emission(&path, e))?;
        tracing::debug!("Wrote {}", path.display());
        self.written += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fs_sink_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FsSink::new(dir.path());

        sink.write(&GeneratedFile::new("a/b/c.txt", "hello".to_string()))
            .unwrap();

        let written = fs::read_to_string(dir.path().join("a/b/c.txt")).unwrap();
        assert_eq!(written, "hello");
        assert_eq!(sink.written(), 1);
    }

    #[test]
    fn test_fs_sink_reports_failing_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("blocker"), "file, not a dir").unwrap();
        let mut sink = FsSink::new(dir.path());

        let err = sink
            .write(&GeneratedFile::new("blocker/inner.txt", String::new()))
            .unwrap_err();
        match err {
            GenerationError::Emission { path, .. } => assert!(path.ends_with("blocker/inner.txt")),
            other => panic!("unexpected error: {}", other),
        }
    }
}
