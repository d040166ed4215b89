/// Generate `controllers/<Entity>Controller.java`

use std::fmt::Write;

use super::{java_file, service_finder};
use crate::codegen::descriptor::EntityDescriptor;
use crate::codegen::target::{GeneratedFile, ProjectContext};
use crate::codegen::utils::upper_first;
use crate::error::GenerationError;

pub fn generate_controller_java(
    entity: &EntityDescriptor,
    project: &ProjectContext,
) -> Result<GeneratedFile, GenerationError> {
    let name = &entity.entity_name;

    let mut output = String::new();
    writeln!(output, "package {}.controllers;", project.package)?;
    writeln!(output)?;
    writeln!(output, "import {}.entities.{};", project.package, name)?;
    writeln!(output, "import {}.services.{}Service;", project.package, name)?;
    writeln!(output, "import org.springframework.beans.factory.annotation.Autowired;")?;
    writeln!(output, "import org.springframework.http.ResponseEntity;")?;
    writeln!(output, "import org.springframework.web.bind.annotation.*;")?;
    writeln!(output, "import java.util.List;")?;
    writeln!(output)?;
    writeln!(output, "@RestController")?;
    writeln!(output, "@RequestMapping(\"/api/{}\")", entity.route())?;
    writeln!(output, "@CrossOrigin(origins = \"*\")")?;
    writeln!(output, "public class {}Controller {{", name)?;
    writeln!(output)?;
    writeln!(output, "    @Autowired")?;
    writeln!(output, "    private {}Service service;", name)?;
    writeln!(output)?;

    writeln!(output, "    @GetMapping")?;
    writeln!(output, "    public List<{}> getAll() {{", name)?;
    writeln!(output, "        return service.findAll();")?;
    writeln!(output, "    }}")?;
    writeln!(output)?;

    writeln!(output, "    @GetMapping(\"/{{id}}\")")?;
    writeln!(output, "    public ResponseEntity<{}> getById(@PathVariable Long id) {{", name)?;
    writeln!(output, "        return service.findById(id)")?;
    writeln!(output, "                .map(ResponseEntity::ok)")?;
    writeln!(output, "                .orElse(ResponseEntity.notFound().build());")?;
    writeln!(output, "    }}")?;
    writeln!(output)?;

    writeln!(output, "    @PostMapping")?;
    writeln!(output, "    public {} create(@RequestBody {} entity) {{", name, name)?;
    writeln!(output, "        return service.save(entity);")?;
    writeln!(output, "    }}")?;
    writeln!(output)?;

    writeln!(output, "    @PutMapping(\"/{{id}}\")")?;
    writeln!(
        output,
        "    public ResponseEntity<{}> update(@PathVariable Long id, @RequestBody {} entity) {{",
        name, name
    )?;
    writeln!(output, "        return service.update(id, entity)")?;
    writeln!(output, "                .map(ResponseEntity::ok)")?;
    writeln!(output, "                .orElse(ResponseEntity.notFound().build());")?;
    writeln!(output, "    }}")?;
    writeln!(output)?;

    writeln!(output, "    @DeleteMapping(\"/{{id}}\")")?;
    writeln!(output, "    public ResponseEntity<Void> delete(@PathVariable Long id) {{")?;
    writeln!(output, "        if (service.deleteById(id)) {{")?;
    writeln!(output, "            return ResponseEntity.noContent().build();")?;
    writeln!(output, "        }}")?;
    writeln!(output, "        return ResponseEntity.notFound().build();")?;
    writeln!(output, "    }}")?;

    for edge in entity.parent_edges() {
        let param = format!("{}Id", edge.parent_field);
        writeln!(output)?;
        writeln!(
            output,
            "    @GetMapping(\"/by-{}/{{{}}}\")",
            edge.parent_field, param
        )?;
        writeln!(
            output,
            "    public List<{}> getBy{}(@PathVariable Long {}) {{",
            name,
            upper_first(&edge.parent_field),
            param
        )?;
        writeln!(
            output,
            "        return service.{}({});",
            service_finder(&edge.parent_field),
            param
        )?;
        writeln!(output, "    }}")?;
    }

    writeln!(output, "}}")?;

    Ok(java_file(project, "controllers", &format!("{}Controller", name), output))
}
