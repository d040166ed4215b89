/// Generate `repositories/<Entity>Repository.java`

use std::fmt::Write;

use super::{java_file, repository_finder};
use crate::codegen::descriptor::EntityDescriptor;
use crate::codegen::target::{GeneratedFile, ProjectContext};
use crate::error::GenerationError;

pub fn generate_repository_java(
    entity: &EntityDescriptor,
    project: &ProjectContext,
) -> Result<GeneratedFile, GenerationError> {
    let name = &entity.entity_name;
    let has_lookups = entity.parent_edges().next().is_some();

    let mut output = String::new();
    writeln!(output, "package {}.repositories;", project.package)?;
    writeln!(output)?;
    writeln!(output, "import {}.entities.{};", project.package, name)?;
    writeln!(output, "import org.springframework.data.jpa.repository.JpaRepository;")?;
    writeln!(output, "import org.springframework.stereotype.Repository;")?;
    if has_lookups {
        writeln!(output, "import java.util.List;")?;
    }
    writeln!(output)?;
    writeln!(output, "@Repository")?;
    writeln!(
        output,
        "public interface {}Repository extends JpaRepository<{}, Long> {{",
        name, name
    )?;

    for edge in entity.parent_edges() {
        writeln!(output)?;
        writeln!(
            output,
            "    List<{}> {}(Long {}Id);",
            name,
            repository_finder(&edge.property, &edge.parent_key),
            edge.parent_field
        )?;
    }

    writeln!(output, "}}")?;

    Ok(java_file(project, "repositories", &format!("{}Repository", name), output))
}
