//! Scratch directories must not outlive a request, whether it succeeds or fails

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use umlforge::codegen::{generate_archive_with, FileSink, FsSink, GeneratedFile};
use umlforge::{generate_archive, load_diagram, normalize, GenerationError, GeneratorConfig, Target};

/// Disk sink that fails once `limit` files have been written
struct FailAfter {
    inner: FsSink,
    limit: usize,
}

impl FileSink for FailAfter {
    fn create_dir(&mut self, relative: &Path) -> Result<(), GenerationError> {
        self.inner.create_dir(relative)
    }

    fn write(&mut self, file: &GeneratedFile) -> Result<(), GenerationError> {
        if self.inner.written() >= self.limit {
            let path = self.inner.root().join(&file.path);
            return Err(GenerationError::emission(
                path,
                std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            ));
        }
        self.inner.write(file)
    }
}

/// Disk sink that occupies the archive directory with a plain file, so
/// the tree is emitted but cannot be zipped
struct BlockArchiveDir {
    inner: FsSink,
}

impl BlockArchiveDir {
    fn new(root: PathBuf) -> Self {
        // Scratch tree: <temp_root>/gen_<request>_<millis>; archive dir: <temp_root>/<request>
        let temp_root = root.parent().unwrap().to_path_buf();
        let scratch = root.file_name().unwrap().to_string_lossy().into_owned();
        let request = scratch.trim_start_matches("gen_").split('_').next().unwrap().to_string();
        std::fs::create_dir_all(&temp_root).unwrap();
        std::fs::write(temp_root.join(request), "in the way").unwrap();
        Self {
            inner: FsSink::new(root),
        }
    }
}

impl FileSink for BlockArchiveDir {
    fn create_dir(&mut self, relative: &Path) -> Result<(), GenerationError> {
        self.inner.create_dir(relative)
    }

    fn write(&mut self, file: &GeneratedFile) -> Result<(), GenerationError> {
        self.inner.write(file)
    }
}

fn scratch_config(temp: &TempDir) -> GeneratorConfig {
    GeneratorConfig {
        temp_root: temp.path().to_path_buf(),
        ..GeneratorConfig::default()
    }
}

fn leftovers(root: &Path) -> Vec<String> {
    match std::fs::read_dir(root) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    }
}

#[test]
fn test_success_leaves_no_scratch() {
    let temp = TempDir::new().unwrap();
    let diagram = load_diagram("config/examples/blog.json").unwrap();

    generate_archive(&diagram, Target::SpringBoot, Some("blog"), &scratch_config(&temp)).unwrap();
    generate_archive(&diagram, Target::Flutter, Some("blog"), &scratch_config(&temp)).unwrap();

    assert!(leftovers(temp.path()).is_empty(), "left behind: {:?}", leftovers(temp.path()));
}

#[test]
fn test_failed_emission_is_cleaned_up() {
    let temp = TempDir::new().unwrap();
    let diagram = load_diagram("config/examples/blog.json").unwrap();

    let result = generate_archive_with(
        &diagram,
        Target::SpringBoot,
        Some("blog"),
        &scratch_config(&temp),
        |root| FailAfter {
            inner: FsSink::new(root),
            limit: 3,
        },
    );

    match result {
        Err(GenerationError::Emission { path, .. }) => {
            assert!(path.starts_with(temp.path()));
        }
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("generation should have failed"),
    }
    assert!(leftovers(temp.path()).is_empty(), "left behind: {:?}", leftovers(temp.path()));
}

#[test]
fn test_failed_packaging_is_cleaned_up() {
    let temp = TempDir::new().unwrap();
    let diagram = load_diagram("config/examples/blog.json").unwrap();

    let result = generate_archive_with(
        &diagram,
        Target::Flutter,
        Some("blog"),
        &scratch_config(&temp),
        BlockArchiveDir::new,
    );

    match result {
        Err(err @ GenerationError::Packaging(_)) => {
            assert!(!err.is_client_error());
            assert!(err.to_string().starts_with("Could not package the generated project"));
        }
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("packaging should have failed"),
    }
    assert!(leftovers(temp.path()).is_empty(), "left behind: {:?}", leftovers(temp.path()));
}

#[test]
fn test_empty_diagram_touches_nothing() {
    let temp = TempDir::new().unwrap();
    let diagram = normalize(&serde_json::json!({ "tables": [], "relationships": [] })).unwrap();

    let err = generate_archive(&diagram, Target::Flutter, None, &scratch_config(&temp)).unwrap_err();

    assert!(matches!(err, GenerationError::EmptyDiagram));
    assert!(err.is_client_error());
    assert!(leftovers(temp.path()).is_empty());
}

#[test]
fn test_concurrent_requests_do_not_collide() {
    let temp = TempDir::new().unwrap();
    let config = scratch_config(&temp);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let config = &config;
                scope.spawn(move || {
                    let diagram = load_diagram("config/examples/blog.json").unwrap();
                    let target = if i % 2 == 0 { Target::SpringBoot } else { Target::Flutter };
                    generate_archive(&diagram, target, Some("blog"), config).unwrap()
                })
            })
            .collect();
        for handle in handles {
            let archive = handle.join().unwrap();
            assert_eq!(archive.file_name, "blog.zip");
            assert!(!archive.bytes.is_empty());
        }
    });

    assert!(leftovers(temp.path()).is_empty());
}
