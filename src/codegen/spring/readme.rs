/// Generate README.md listing the REST endpoints

use std::fmt::Write;

use crate::codegen::descriptor::ResolvedModel;
use crate::codegen::target::{GeneratedFile, ProjectContext};
use crate::error::GenerationError;

pub fn generate_readme(
    model: &ResolvedModel,
    project: &ProjectContext,
) -> Result<GeneratedFile, GenerationError> {
    let mut output = String::new();
    writeln!(output, "# {}", project.name)?;
    writeln!(output)?;
    writeln!(
        output,
        "Spring Boot {} backend (Java {}) with an in-memory H2 database.",
        project.spring_boot_version, project.java_version
    )?;
    writeln!(output)?;
    writeln!(output, "```bash")?;
    writeln!(output, "mvn spring-boot:run")?;
    writeln!(output, "```")?;
    writeln!(output)?;
    writeln!(output, "## Endpoints")?;

    for entity in model.iter() {
        let base = format!("/api/{}", entity.route());
        writeln!(output)?;
        writeln!(output, "### {}", entity.entity_name)?;
        writeln!(output)?;
        writeln!(output, "| Method | Path |")?;
        writeln!(output, "|--------|------|")?;
        writeln!(output, "| GET | `{}` |", base)?;
        writeln!(output, "| GET | `{}/{{id}}` |", base)?;
        writeln!(output, "| POST | `{}` |", base)?;
        writeln!(output, "| PUT | `{}/{{id}}` |", base)?;
        writeln!(output, "| DELETE | `{}/{{id}}` |", base)?;
        for edge in entity.parent_edges() {
            writeln!(
                output,
                "| GET | `{}/by-{}/{{{}Id}}` |",
                base, edge.parent_field, edge.parent_field
            )?;
        }
    }

    Ok(GeneratedFile::new("README.md", output))
}
