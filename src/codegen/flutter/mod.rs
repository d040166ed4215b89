//! Flutter mobile client generation.
//!
//! Produces a Flutter app whose screens talk to the REST endpoints of the
//! generated backend: per table a model, a service, and list, detail and
//! form pages, plus a navigation shell listing every table.

use std::path::PathBuf;

use crate::codegen::descriptor::{EntityDescriptor, ResolvedModel};
use crate::codegen::target::{GeneratedFile, ProjectContext, ProjectEmitter};
use crate::error::GenerationError;

mod detail_page_dart;
mod form_page_dart;
mod list_page_dart;
mod model_dart;
mod scaffold;
mod service_dart;

pub use detail_page_dart::generate_detail_page_dart;
pub use form_page_dart::generate_form_page_dart;
pub use list_page_dart::generate_list_page_dart;
pub use model_dart::generate_model_dart;
pub use scaffold::{
    generate_config_dart, generate_home_page_dart, generate_main_dart, generate_pubspec_yaml,
    generate_readme,
};
pub use service_dart::generate_service_dart;

/// `lib/<dir>/<file>.dart`
fn dart_file(dir: &str, file: &str, contents: String) -> GeneratedFile {
    GeneratedFile::new(PathBuf::from("lib").join(dir).join(format!("{}.dart", file)), contents)
}

/// Plural used in titles and method names (`Posts`, `fetchAllPosts`)
fn plural(entity_name: &str) -> String {
    format!("{}s", entity_name)
}

pub struct FlutterEmitter;

impl ProjectEmitter for FlutterEmitter {
    fn name(&self) -> &'static str {
        "Flutter mobile client"
    }

    fn directories(&self, _project: &ProjectContext) -> Vec<PathBuf> {
        vec![
            PathBuf::from("lib"),
            PathBuf::from("lib/models"),
            PathBuf::from("lib/services"),
            PathBuf::from("lib/pages"),
        ]
    }

    fn emit_entity_files(
        &self,
        entity: &EntityDescriptor,
        _model: &ResolvedModel,
        _project: &ProjectContext,
    ) -> Result<Vec<GeneratedFile>, GenerationError> {
        Ok(vec![generate_model_dart(entity)?])
    }

    fn emit_table_files(
        &self,
        entity: &EntityDescriptor,
        model: &ResolvedModel,
        project: &ProjectContext,
    ) -> Result<Vec<GeneratedFile>, GenerationError> {
        Ok(vec![
            generate_service_dart(entity, project)?,
            generate_list_page_dart(entity, project)?,
            generate_detail_page_dart(entity, model, project)?,
            generate_form_page_dart(entity, model, project)?,
        ])
    }

    fn emit_boilerplate(
        &self,
        model: &ResolvedModel,
        project: &ProjectContext,
    ) -> Result<Vec<GeneratedFile>, GenerationError> {
        Ok(vec![
            generate_pubspec_yaml(project)?,
            generate_config_dart(project)?,
            generate_main_dart(project)?,
            generate_home_page_dart(model, project)?,
            generate_readme(model, project)?,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dart_paths() {
        let file = dart_file("models", "order_item", String::new());
        assert_eq!(file.path, PathBuf::from("lib/models/order_item.dart"));
        assert_eq!(plural("Post"), "Posts");
    }
}
