//! Spring Boot backend generation.
//!
//! Produces a Maven project with one JPA entity, repository, service and REST
//! controller per table, plus `pom.xml`, `application.properties` and the
//! `@SpringBootApplication` entry point.

use std::path::PathBuf;

use crate::codegen::descriptor::{EntityDescriptor, ResolvedModel};
use crate::codegen::target::{GeneratedFile, ProjectContext, ProjectEmitter};
use crate::codegen::utils::upper_first;
use crate::error::GenerationError;

mod application;
mod controller_java;
mod entity_java;
mod pom_xml;
mod readme;
mod repository_java;
mod service_java;

pub use application::{generate_application_java, generate_application_properties};
pub use controller_java::generate_controller_java;
pub use entity_java::generate_entity_java;
pub use pom_xml::generate_pom_xml;
pub use readme::generate_readme;
pub use repository_java::generate_repository_java;
pub use service_java::generate_service_java;

/// Java packages below the project package, one per layer
pub const LAYERS: &[&str] = &["entities", "repositories", "services", "controllers"];

/// Typed field of a generated class; declarations and accessors both come from it
#[derive(Debug, Clone, PartialEq)]
pub struct JavaField {
    pub java_type: String,
    pub name: String,
}

impl JavaField {
    pub fn new(java_type: &str, name: &str) -> Self {
        Self {
            java_type: java_type.to_string(),
            name: name.to_string(),
        }
    }

    pub fn getter(&self) -> String {
        format!("get{}", upper_first(&self.name))
    }

    pub fn setter(&self) -> String {
        format!("set{}", upper_first(&self.name))
    }
}

/// `javax.persistence` before Spring Boot 3, `jakarta.persistence` from 3 on
pub fn persistence_package(spring_boot_version: &str) -> &'static str {
    let major = spring_boot_version
        .split('.')
        .next()
        .and_then(|m| m.trim().parse::<u32>().ok())
        .unwrap_or(2);
    if major >= 3 {
        "jakarta.persistence"
    } else {
        "javax.persistence"
    }
}

fn java_root(project: &ProjectContext) -> PathBuf {
    PathBuf::from("src/main/java").join(project.package_dir())
}

/// `src/main/java/<package>/<layer>/<class>.java`
fn java_file(project: &ProjectContext, layer: &str, class: &str, contents: String) -> GeneratedFile {
    let path = java_root(project).join(layer).join(format!("{}.java", class));
    GeneratedFile::new(path, contents)
}

/// Repository method for one lookup edge: `findByUsuario_Id`
pub(crate) fn repository_finder(property: &str, parent_key: &str) -> String {
    format!("findBy{}_{}", upper_first(property), upper_first(parent_key))
}

/// Service method for one lookup edge: `findByUsuarioId`
pub(crate) fn service_finder(parent_field: &str) -> String {
    format!("findBy{}Id", upper_first(parent_field))
}

pub struct SpringBootEmitter;

impl ProjectEmitter for SpringBootEmitter {
    fn name(&self) -> &'static str {
        "Spring Boot backend"
    }

    fn directories(&self, project: &ProjectContext) -> Vec<PathBuf> {
        let root = java_root(project);
        let mut dirs = vec![root.clone()];
        dirs.extend(LAYERS.iter().map(|layer| root.join(layer)));
        dirs.push(PathBuf::from("src/main/resources"));
        dirs
    }

    fn emit_entity_files(
        &self,
        entity: &EntityDescriptor,
        _model: &ResolvedModel,
        project: &ProjectContext,
    ) -> Result<Vec<GeneratedFile>, GenerationError> {
        Ok(vec![generate_entity_java(entity, project)?])
    }

    fn emit_table_files(
        &self,
        entity: &EntityDescriptor,
        _model: &ResolvedModel,
        project: &ProjectContext,
    ) -> Result<Vec<GeneratedFile>, GenerationError> {
        Ok(vec![
            generate_repository_java(entity, project)?,
            generate_service_java(entity, project)?,
            generate_controller_java(entity, project)?,
        ])
    }

    fn emit_boilerplate(
        &self,
        model: &ResolvedModel,
        project: &ProjectContext,
    ) -> Result<Vec<GeneratedFile>, GenerationError> {
        Ok(vec![
            generate_pom_xml(project)?,
            generate_application_properties(project)?,
            generate_application_java(project)?,
            generate_readme(model, project)?,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;

    #[test]
    fn test_accessor_names() {
        let field = JavaField::new("List<Post>", "postList");
        assert_eq!(field.getter(), "getPostList");
        assert_eq!(field.setter(), "setPostList");
    }

    #[test]
    fn test_persistence_namespace() {
        assert_eq!(persistence_package("2.7.5"), "javax.persistence");
        assert_eq!(persistence_package("3.1.4"), "jakarta.persistence");
        assert_eq!(persistence_package("garbage"), "javax.persistence");
    }

    #[test]
    fn test_directories_cover_every_layer() {
        let project = ProjectContext::new("Blog", &GeneratorConfig::default());
        let dirs = SpringBootEmitter.directories(&project);
        assert!(dirs.contains(&PathBuf::from("src/main/java/com/example/blog/controllers")));
        assert!(dirs.contains(&PathBuf::from("src/main/resources")));
        assert_eq!(dirs.len(), LAYERS.len() + 2);
    }

    #[test]
    fn test_finder_names() {
        assert_eq!(repository_finder("usuario", "id"), "findByUsuario_Id");
        assert_eq!(repository_finder("categoriaList", "codigo"), "findByCategoriaList_Codigo");
        assert_eq!(service_finder("usuario"), "findByUsuarioId");
    }
}
