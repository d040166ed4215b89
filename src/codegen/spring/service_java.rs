/// Generate `services/<Entity>Service.java`

use std::fmt::Write;

use super::{java_file, repository_finder, service_finder, JavaField};
use crate::codegen::descriptor::EntityDescriptor;
use crate::codegen::target::{GeneratedFile, ProjectContext};
use crate::error::GenerationError;

pub fn generate_service_java(
    entity: &EntityDescriptor,
    project: &ProjectContext,
) -> Result<GeneratedFile, GenerationError> {
    let name = &entity.entity_name;
    let key_setter = JavaField::new("Long", &entity.key.name).setter();

    let mut output = String::new();
    writeln!(output, "package {}.services;", project.package)?;
    writeln!(output)?;
    writeln!(output, "import {}.entities.{};", project.package, name)?;
    writeln!(output, "import {}.repositories.{}Repository;", project.package, name)?;
    writeln!(output, "import org.springframework.beans.factory.annotation.Autowired;")?;
    writeln!(output, "import org.springframework.stereotype.Service;")?;
    writeln!(output, "import java.util.List;")?;
    writeln!(output, "import java.util.Optional;")?;
    writeln!(output)?;
    writeln!(output, "@Service")?;
    writeln!(output, "public class {}Service {{", name)?;
    writeln!(output)?;
    writeln!(output, "    @Autowired")?;
    writeln!(output, "    private {}Repository repository;", name)?;
    writeln!(output)?;

    writeln!(output, "    public List<{}> findAll() {{", name)?;
    writeln!(output, "        return repository.findAll();")?;
    writeln!(output, "    }}")?;
    writeln!(output)?;

    writeln!(output, "    public Optional<{}> findById(Long id) {{", name)?;
    writeln!(output, "        return repository.findById(id);")?;
    writeln!(output, "    }}")?;
    writeln!(output)?;

    writeln!(output, "    public {} save({} entity) {{", name, name)?;
    writeln!(output, "        return repository.save(entity);")?;
    writeln!(output, "    }}")?;
    writeln!(output)?;

    writeln!(output, "    public Optional<{}> update(Long id, {} entity) {{", name, name)?;
    writeln!(output, "        if (!repository.existsById(id)) {{")?;
    writeln!(output, "            return Optional.empty();")?;
    writeln!(output, "        }}")?;
    writeln!(output, "        entity.{}(id);", key_setter)?;
    writeln!(output, "        return Optional.of(repository.save(entity));")?;
    writeln!(output, "    }}")?;
    writeln!(output)?;

    writeln!(output, "    public boolean deleteById(Long id) {{")?;
    writeln!(output, "        if (!repository.existsById(id)) {{")?;
    writeln!(output, "            return false;")?;
    writeln!(output, "        }}")?;
    writeln!(output, "        repository.deleteById(id);")?;
    writeln!(output, "        return true;")?;
    writeln!(output, "    }}")?;

    for edge in entity.parent_edges() {
        writeln!(output)?;
        writeln!(
            output,
            "    public List<{}> {}(Long {}Id) {{",
            name,
            service_finder(&edge.parent_field),
            edge.parent_field
        )?;
        writeln!(
            output,
            "        return repository.{}({}Id);",
            repository_finder(&edge.property, &edge.parent_key),
            edge.parent_field
        )?;
        writeln!(output, "    }}")?;
    }

    writeln!(output, "}}")?;

    Ok(java_file(project, "services", &format!("{}Service", name), output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::resolver::resolve;
    use crate::config::GeneratorConfig;
    use crate::diagram::normalize;
    use serde_json::json;

    #[test]
    fn test_service_crud_and_lookup() {
        let model = resolve(
            &normalize(&json!({
                "tables": [
                    { "id": "u", "name": "Usuario" },
                    { "id": "p", "name": "Post", "columns": [
                        { "name": "codigo", "type": "INT", "constraints": ["PK"] }
                    ]}
                ],
                "relationships": [
                    { "id": "r", "type": "one-to-many", "fromTableId": "u", "toTableId": "p" }
                ]
            }))
            .unwrap(),
        );
        let project = ProjectContext::new("Blog", &GeneratorConfig::default());
        let service = generate_service_java(model.entity("p").unwrap(), &project).unwrap();
        let java = &service.contents;

        assert!(service.path.ends_with("services/PostService.java"));
        assert!(java.contains("public class PostService {"));
        assert!(java.contains("entity.setCodigo(id);"));
        assert!(java.contains("public boolean deleteById(Long id) {"));
        assert!(java.contains("public List<Post> findByUsuarioId(Long usuarioId) {"));
        assert!(java.contains("return repository.findByUsuario_Id(usuarioId);"));
    }
}
