//! Emitter strategies.
//!
//! Both generation paths consume the same [`ResolvedModel`]. A target is a
//! [`ProjectEmitter`]: it names its directory tree, renders the files of each
//! entity in two phases, and finally renders the per-project boilerplate.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::codegen::descriptor::{EntityDescriptor, ResolvedModel};
use crate::codegen::flutter::FlutterEmitter;
use crate::codegen::spring::SpringBootEmitter;
use crate::codegen::utils::{package_segment, to_type_name};
use crate::config::GeneratorConfig;
use crate::error::GenerationError;

/// One rendered file, relative to the project root
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

impl GeneratedFile {
    pub fn new(path: impl Into<PathBuf>, contents: String) -> Self {
        Self {
            path: path.into(),
            contents,
        }
    }
}

/// Project-wide values every emitter needs
#[derive(Debug, Clone)]
pub struct ProjectContext {
    /// Sanitized project name (archive and directory name)
    pub name: String,
    /// Java package (`com.example.blog`)
    pub package: String,
    /// Application entry-point class (`BlogApplication`)
    pub application_class: String,
    pub spring_boot_version: String,
    pub java_version: String,
    pub api_base_url: String,
}

impl ProjectContext {
    pub fn new(project_name: &str, config: &GeneratorConfig) -> Self {
        let type_name = to_type_name(project_name);
        let application_class = if type_name.is_empty() {
            "Application".to_string()
        } else {
            format!("{}Application", type_name)
        };

        Self {
            name: project_name.to_string(),
            package: format!("{}.{}", config.base_package, package_segment(project_name)),
            application_class,
            spring_boot_version: config.spring_boot_version.clone(),
            java_version: config.java_version.clone(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Package as a relative directory (`com/example/blog`)
    pub fn package_dir(&self) -> PathBuf {
        self.package.split('.').collect()
    }

    /// Dart package name (`blog`)
    pub fn dart_package(&self) -> String {
        package_segment(&self.name)
    }
}

/// Strategy for one generation path
pub trait ProjectEmitter: Send + Sync {
    /// Human-readable target name used in logs
    fn name(&self) -> &'static str;

    /// Every directory the project needs, created before any file is written
    fn directories(&self, project: &ProjectContext) -> Vec<PathBuf>;

    /// Phase 1: files other files depend on (entities, models)
    fn emit_entity_files(
        &self,
        entity: &EntityDescriptor,
        model: &ResolvedModel,
        project: &ProjectContext,
    ) -> Result<Vec<GeneratedFile>, GenerationError>;

    /// Phase 2: files built on top of the phase-1 types
    fn emit_table_files(
        &self,
        entity: &EntityDescriptor,
        model: &ResolvedModel,
        project: &ProjectContext,
    ) -> Result<Vec<GeneratedFile>, GenerationError>;

    /// Build descriptor, runtime config and entry point, once per project
    fn emit_boilerplate(
        &self,
        model: &ResolvedModel,
        project: &ProjectContext,
    ) -> Result<Vec<GeneratedFile>, GenerationError>;
}

/// Selectable generation path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    SpringBoot,
    Flutter,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::SpringBoot => "spring-boot",
            Target::Flutter => "flutter",
        }
    }

    pub fn emitter(&self) -> Box<dyn ProjectEmitter> {
        match self {
            Target::SpringBoot => Box::new(SpringBootEmitter),
            Target::Flutter => Box::new(FlutterEmitter),
        }
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "backend" | "server" | "spring" | "spring-boot" | "springboot" => Ok(Target::SpringBoot),
            "mobile" | "flutter" => Ok(Target::Flutter),
            other => Err(format!(
                "Unknown target '{}' (expected backend|spring or mobile|flutter)",
                other
            )),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
