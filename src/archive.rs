//! Archive packaging and scratch-space cleanup.
//!
//! A generation works inside its own scratch directory and produces one zip
//! file. Both are held by [`ScratchPath`] guards, so they are removed when the
//! request finishes, whether it succeeded, failed, or panicked.

use std::fs::{self, File};
use std::io::{self, Cursor, Read, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::GenerationError;

/// RAII guard: deletes the path (file or directory tree) on drop
#[derive(Debug)]
pub struct ScratchPath {
    path: PathBuf,
}

impl ScratchPath {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchPath {
    fn drop(&mut self) {
        let result = if self.path.is_dir() {
            fs::remove_dir_all(&self.path)
        } else {
            fs::remove_file(&self.path)
        };

        match result {
            Ok(()) => tracing::debug!("Removed {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Could not remove {}: {}", self.path.display(), e),
        }
    }
}

pub(crate) fn packaging(context: &str, e: impl std::fmt::Display) -> GenerationError {
    GenerationError::Packaging(format!("{}: {}", context, e))
}

/// Every directory and file under `root`, relative to it, sorted so that
/// archives are reproducible
fn walk(root: &Path) -> io::Result<Vec<(PathBuf, bool)>> {
    let mut entries = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut children: Vec<_> = fs::read_dir(&dir)?.collect::<Result<_, _>>()?;
        children.sort_by_key(|entry| entry.file_name());

        for child in children {
            let path = child.path();
            let is_dir = child.file_type()?.is_dir();
            if let Ok(relative) = path.strip_prefix(root) {
                entries.push((relative.to_path_buf(), is_dir));
            }
            if is_dir {
                pending.push(path);
            }
        }
    }

    entries.sort();
    Ok(entries)
}

/// Zip entry name: relative path with `/` separators
fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Pack the contents of `source` into a deflated zip at `destination`.
///
/// Entry names are relative to `source`, so the archive unpacks to the
/// project layout directly. Returns the number of files written.
pub fn zip_directory(source: &Path, destination: &Path) -> Result<usize, GenerationError> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| packaging(&format!("creating {}", parent.display()), e))?;
    }

    let entries = walk(source).map_err(|e| packaging("reading generated tree", e))?;
    let file = File::create(destination)
        .map_err(|e| packaging(&format!("creating {}", destination.display()), e))?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut files = 0;
    for (relative, is_dir) in entries {
        let name = entry_name(&relative);
        if is_dir {
            writer
                .add_directory(format!("{}/", name), options)
                .map_err(|e| packaging(&name, e))?;
            continue;
        }

        let contents = fs::read(source.join(&relative)).map_err(|e| packaging(&name, e))?;
        writer.start_file(name.clone(), options).map_err(|e| packaging(&name, e))?;
        writer.write_all(&contents).map_err(|e| packaging(&name, e))?;
        files += 1;
    }

    writer.finish().map_err(|e| packaging("finishing archive", e))?;
    tracing::debug!("Packed {} files into {}", files, destination.display());
    Ok(files)
}

/// File entries of an in-memory zip, in archive order
pub fn list_entries(bytes: &[u8]) -> Result<Vec<String>, GenerationError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| packaging("opening archive", e))?;
    let mut names = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let entry = archive.by_index(index).map_err(|e| packaging("reading entry", e))?;
        if entry.is_file() {
            names.push(entry.name().to_string());
        }
    }
    Ok(names)
}

/// Contents of one entry of an in-memory zip
pub fn read_entry(bytes: &[u8], name: &str) -> Result<String, GenerationError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| packaging("opening archive", e))?;
    let mut entry = archive.by_name(name).map_err(|e| packaging(name, e))?;
    let mut contents = String::new();
    entry.read_to_string(&mut contents).map_err(|e| packaging(name, e))?;
    Ok(contents)
}
