//! Code generation from ER/UML diagrams.
//!
//! The resolver turns a normalized [`Diagram`](crate::diagram::Diagram) into
//! per-table [`EntityDescriptor`]s; a [`Target`] picks the emitter strategy
//! (Spring Boot backend or Flutter client) that renders them into files.

pub mod descriptor;
pub mod flutter;
pub mod fs_utils;
pub mod orchestration;
pub mod resolver;
pub mod spring;
pub mod target;
pub mod types;
pub mod utils;

// Re-export key types
pub use descriptor::{Diagnostic, EntityDescriptor, ResolvedModel};
pub use fs_utils::{FileSink, FsSink};
pub use orchestration::{
    generate_archive, generate_archive_with, generate_into, generate_to_dir, project_name,
    GeneratedArchive, GenerationSummary,
};
pub use resolver::resolve;
pub use target::{GeneratedFile, ProjectContext, ProjectEmitter, Target};
pub use types::{map_type, ColumnType, Ecosystem};
