//! # Umlforge: project generation from ER/UML diagrams
//!
//! Umlforge takes the diagram document produced by a collaborative diagram
//! editor (tables, columns with constraints, typed relationships) and
//! generates a runnable project from it:
//!
//! - **Spring Boot backend**: JPA entities, repositories, services and REST
//!   controllers, with a Maven build and an in-memory H2 database
//! - **Flutter client**: models, HTTP services and list/detail/form pages
//!   wired to the backend's endpoints
//!
//! The generated tree is returned as a zip archive.
//!
//! ## Example
//!
//! ```rust,no_run
//! use umlforge::{generate_archive, normalize, GeneratorConfig, Target};
//!
//! let raw = serde_json::json!({
//!     "tables": [{ "id": "t1", "name": "Cliente", "columns": [
//!         { "name": "id", "type": "INT", "constraints": ["PK"] },
//!         { "name": "nombre", "type": "VARCHAR(100)" }
//!     ]}],
//!     "relationships": []
//! });
//! let diagram = normalize(&raw)?;
//! let archive = generate_archive(&diagram, Target::SpringBoot, Some("tienda"), &GeneratorConfig::default())?;
//! std::fs::write(&archive.file_name, &archive.bytes)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod archive;
pub mod codegen;
pub mod config;
pub mod diagram;
pub mod error;

pub use codegen::{
    generate_archive, generate_into, generate_to_dir, resolve, Diagnostic, GeneratedArchive,
    GenerationSummary, Target,
};
pub use config::GeneratorConfig;
pub use diagram::{load_diagram, normalize, parse_diagram_text, Diagram};
pub use error::{ErrorPayload, GenerationError};
