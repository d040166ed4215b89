//! Error types for diagram validation, code emission and packaging.

use serde::Serialize;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Error type for a single generation request
#[derive(Debug)]
pub enum GenerationError {
    /// Diagram is structurally unusable (no tables/relationships shape at all)
    Validation(String),
    /// Diagram is well-formed but has zero tables
    EmptyDiagram,
    /// A directory or file could not be written
    Emission {
        path: PathBuf,
        source: io::Error,
    },
    /// A template failed to render
    Render(String),
    /// Archiving failed after successful emission
    Packaging(String),
}

impl GenerationError {
    pub fn emission(path: impl Into<PathBuf>, source: io::Error) -> Self {
        GenerationError::Emission {
            path: path.into(),
            source,
        }
    }

    /// True for errors caused by the input diagram (4xx-equivalent)
    pub fn is_client_error(&self) -> bool {
        matches!(self, GenerationError::Validation(_) | GenerationError::EmptyDiagram)
    }

    /// Structured payload returned to callers on failure
    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload {
            ok: false,
            message: self.to_string(),
        }
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::Validation(msg) => write!(f, "Invalid diagram: {}", msg),
            GenerationError::EmptyDiagram => {
                write!(f, "The diagram has no tables to generate code from")
            }
            GenerationError::Emission { path, source } => {
                write!(f, "Generation failed writing {}: {}", path.display(), source)
            }
            GenerationError::Render(msg) => write!(f, "Generation failed: {}", msg),
            GenerationError::Packaging(msg) => {
                write!(f, "Could not package the generated project: {}", msg)
            }
        }
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenerationError::Emission { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<fmt::Error> for GenerationError {
    fn from(e: fmt::Error) -> Self {
        GenerationError::Render(e.to_string())
    }
}

/// `{ ok: false, message }` body sent back to callers
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorPayload {
    pub ok: bool,
    pub message: String,
}
