//! High-level orchestration API for code generation.
//!
//! One request runs the pipeline Validate -> Resolve -> Emit -> Package:
//! the diagram must have tables, the resolver builds every descriptor, the
//! chosen emitter writes its directory tree, per-table files in two phases
//! and the project boilerplate, and the tree is zipped. Scratch space is
//! scoped to the request and removed whatever the outcome.

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::archive::{packaging, zip_directory, ScratchPath};
use crate::codegen::descriptor::Diagnostic;
use crate::codegen::fs_utils::{FileSink, FsSink};
use crate::codegen::resolver::resolve;
use crate::codegen::target::{ProjectContext, Target};
use crate::codegen::utils::sanitize_project_name;
use crate::config::GeneratorConfig;
use crate::diagram::Diagram;
use crate::error::GenerationError;

/// Files written by one generation, relative to the project root
#[derive(Debug, Clone)]
pub struct GenerationSummary {
    pub project_name: String,
    pub files: Vec<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Packaged project ready to be handed to the caller
#[derive(Debug, Clone)]
pub struct GeneratedArchive {
    /// `<project>.zip`
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub files: Vec<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Sanitized project name, falling back to the configured default
pub fn project_name(requested: Option<&str>, config: &GeneratorConfig) -> String {
    let sanitized = requested.map(sanitize_project_name).unwrap_or_default();
    if sanitized.is_empty() {
        sanitize_project_name(&config.default_project_name)
    } else {
        sanitized
    }
}

/// Emit the whole project for `target` into `sink`.
///
/// Directories are created before the first file; phase-1 files of every
/// table are written before any phase-2 file.
pub fn generate_into(
    sink: &mut dyn FileSink,
    diagram: &Diagram,
    target: Target,
    project: &ProjectContext,
) -> Result<GenerationSummary, GenerationError> {
    if diagram.is_empty() {
        return Err(GenerationError::EmptyDiagram);
    }

    let model = resolve(diagram);
    tracing::info!(
        "Resolved {} entities ({} diagnostics) for {}",
        model.len(),
        model.diagnostics.len(),
        project.name
    );

    let emitter = target.emitter();
    for dir in emitter.directories(project) {
        sink.create_dir(&dir)?;
    }

    let mut files = Vec::new();
    for entity in model.iter() {
        for file in emitter.emit_entity_files(entity, &model, project)? {
            sink.write(&file)?;
            files.push(file.path);
        }
    }
    for entity in model.iter() {
        for file in emitter.emit_table_files(entity, &model, project)? {
            sink.write(&file)?;
            files.push(file.path);
        }
    }
    for file in emitter.emit_boilerplate(&model, project)? {
        sink.write(&file)?;
        files.push(file.path);
    }

    tracing::info!("Emitted {} files with the {} emitter", files.len(), emitter.name());

    Ok(GenerationSummary {
        project_name: project.name.clone(),
        files,
        diagnostics: model.diagnostics,
    })
}

/// Generate the project into `output_dir` on disk, without packaging
pub fn generate_to_dir(
    output_dir: &Path,
    diagram: &Diagram,
    target: Target,
    requested_name: Option<&str>,
    config: &GeneratorConfig,
) -> Result<GenerationSummary, GenerationError> {
    let project = ProjectContext::new(&project_name(requested_name, config), config);
    let mut sink = FsSink::new(output_dir);
    generate_into(&mut sink, diagram, target, &project)
}

/// Generate and package a project using an on-disk scratch directory
pub fn generate_archive(
    diagram: &Diagram,
    target: Target,
    requested_name: Option<&str>,
    config: &GeneratorConfig,
) -> Result<GeneratedArchive, GenerationError> {
    generate_archive_with(diagram, target, requested_name, config, |root| FsSink::new(root))
}

/// [`generate_archive`] with a caller-supplied sink rooted at the scratch
/// directory. The sink must write below that root for the files to be
/// packaged.
pub fn generate_archive_with<S, F>(
    diagram: &Diagram,
    target: Target,
    requested_name: Option<&str>,
    config: &GeneratorConfig,
    make_sink: F,
) -> Result<GeneratedArchive, GenerationError>
where
    S: FileSink,
    F: FnOnce(PathBuf) -> S,
{
    if diagram.is_empty() {
        return Err(GenerationError::EmptyDiagram);
    }

    let name = project_name(requested_name, config);
    let project = ProjectContext::new(&name, config);
    let request_id = Uuid::new_v4().simple().to_string();
    let millis = chrono::Utc::now().timestamp_millis();

    let scratch = ScratchPath::new(
        config
            .temp_root
            .join(format!("gen_{}_{}", request_id, millis)),
    );
    let zip_dir = ScratchPath::new(config.temp_root.join(&request_id));

    tracing::info!(
        "Generating {} project '{}' in {}",
        target,
        name,
        scratch.path().display()
    );

    let mut sink = make_sink(scratch.path().to_path_buf());
    let summary = generate_into(&mut sink, diagram, target, &project)?;

    let file_name = format!("{}.zip", name);
    let zip_path = zip_dir.path().join(&file_name);
    zip_directory(scratch.path(), &zip_path)?;
    let bytes = fs::read(&zip_path)
        .map_err(|e| packaging(&format!("reading {}", zip_path.display()), e))?;

    tracing::info!("Archived {} ({} bytes)", file_name, bytes.len());

    Ok(GeneratedArchive {
        file_name,
        bytes,
        files: summary.files,
        diagnostics: summary.diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::target::GeneratedFile;
    use crate::diagram::normalize;
    use serde_json::json;

    /// Records writes without touching disk
    #[derive(Default)]
    struct MemorySink {
        dirs: Vec<PathBuf>,
        files: Vec<GeneratedFile>,
    }

    impl FileSink for MemorySink {
        fn create_dir(&mut self, relative: &Path) -> Result<(), GenerationError> {
            self.dirs.push(relative.to_path_buf());
            Ok(())
        }

        fn write(&mut self, file: &GeneratedFile) -> Result<(), GenerationError> {
            self.files.push(file.clone());
            Ok(())
        }
    }

    fn blog() -> Diagram {
        normalize(&json!({
            "tables": [
                { "id": "u", "name": "Usuario", "columns": [{ "name": "id", "type": "INT", "constraints": ["PK"] }] },
                { "id": "p", "name": "Post", "columns": [{ "name": "id", "type": "INT", "constraints": ["PK"] }] }
            ],
            "relationships": [
                { "id": "r", "type": "one-to-many", "fromTableId": "u", "toTableId": "p" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_project_name_fallback() {
        let config = GeneratorConfig::default();
        assert_eq!(project_name(Some("mi blog!"), &config), "miblog");
        assert_eq!(project_name(Some("  "), &config), "demo");
        assert_eq!(project_name(None, &config), "demo");
    }

    #[test]
    fn test_entities_written_before_dependents() {
        let project = ProjectContext::new("Blog", &GeneratorConfig::default());
        let mut sink = MemorySink::default();
        let summary = generate_into(&mut sink, &blog(), Target::SpringBoot, &project).unwrap();

        assert_eq!(sink.dirs.len(), 6);
        let paths: Vec<String> = sink
            .files
            .iter()
            .map(|f| f.path.to_string_lossy().replace('\\', "/"))
            .collect();
        let last_entity = paths.iter().rposition(|p| p.contains("/entities/")).unwrap();
        let first_repository = paths.iter().position(|p| p.contains("/repositories/")).unwrap();
        assert!(last_entity < first_repository);
        assert_eq!(summary.files.len(), sink.files.len());
        assert!(paths.contains(&"pom.xml".to_string()));
    }

    #[test]
    fn test_empty_diagram_writes_nothing() {
        let project = ProjectContext::new("Blog", &GeneratorConfig::default());
        let mut sink = MemorySink::default();
        let empty = normalize(&json!({ "tables": [], "relationships": [] })).unwrap();

        let err = generate_into(&mut sink, &empty, Target::Flutter, &project).unwrap_err();
        assert!(matches!(err, GenerationError::EmptyDiagram));
        assert!(sink.dirs.is_empty());
        assert!(sink.files.is_empty());
    }

    #[test]
    fn test_flutter_file_set() {
        let project = ProjectContext::new("Blog", &GeneratorConfig::default());
        let mut sink = MemorySink::default();
        let summary = generate_into(&mut sink, &blog(), Target::Flutter, &project).unwrap();

        // model, service, three pages per table + five shell files
        assert_eq!(summary.files.len(), 2 * 5 + 5);
        assert_eq!(summary.files[0], PathBuf::from("lib/models/usuario.dart"));
        assert_eq!(summary.files[1], PathBuf::from("lib/models/post.dart"));
    }
}
