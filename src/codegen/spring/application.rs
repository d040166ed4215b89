/// Generate the entry-point class and `application.properties`

use std::fmt::Write;
use std::path::PathBuf;

use super::java_root;
use crate::codegen::target::{GeneratedFile, ProjectContext};
use crate::error::GenerationError;

pub fn generate_application_java(project: &ProjectContext) -> Result<GeneratedFile, GenerationError> {
    let class = &project.application_class;

    let mut output = String::new();
    writeln!(output, "package {};", project.package)?;
    writeln!(output)?;
    writeln!(output, "import org.springframework.boot.SpringApplication;")?;
    writeln!(output, "import org.springframework.boot.autoconfigure.SpringBootApplication;")?;
    writeln!(output)?;
    writeln!(output, "@SpringBootApplication")?;
    writeln!(output, "public class {} {{", class)?;
    writeln!(output)?;
    writeln!(output, "    public static void main(String[] args) {{")?;
    writeln!(output, "        SpringApplication.run({}.class, args);", class)?;
    writeln!(output, "    }}")?;
    writeln!(output, "}}")?;

    let path = java_root(project).join(format!("{}.java", class));
    Ok(GeneratedFile::new(path, output))
}

pub fn generate_application_properties(
    project: &ProjectContext,
) -> Result<GeneratedFile, GenerationError> {
    let mut output = String::new();
    writeln!(output, "spring.application.name={}", project.name)?;
    writeln!(output, "spring.datasource.url=jdbc:h2:mem:{}", project.dart_package())?;
    writeln!(output, "spring.datasource.driverClassName=org.h2.Driver")?;
    writeln!(output, "spring.datasource.username=sa")?;
    writeln!(output, "spring.datasource.password=")?;
    writeln!(output, "spring.h2.console.enabled=true")?;
    writeln!(output, "spring.jpa.database-platform=org.hibernate.dialect.H2Dialect")?;
    writeln!(output, "spring.jpa.hibernate.ddl-auto=create-drop")?;
    writeln!(output, "spring.jpa.properties.hibernate.globally_quoted_identifiers=true")?;
    writeln!(output, "spring.jpa.show-sql=true")?;

    Ok(GeneratedFile::new(
        PathBuf::from("src/main/resources/application.properties"),
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;

    #[test]
    fn test_application_class_follows_project_name() {
        let project = ProjectContext::new("mi tienda", &GeneratorConfig::default());
        let main = generate_application_java(&project).unwrap();
        assert_eq!(
            main.path,
            PathBuf::from("src/main/java/com/example/mitienda/MiTiendaApplication.java")
        );
        assert!(main.contents.contains("package com.example.mitienda;"));
        assert!(main.contents.contains("SpringApplication.run(MiTiendaApplication.class, args);"));
    }

    #[test]
    fn test_properties_use_h2() {
        let project = ProjectContext::new("Blog", &GeneratorConfig::default());
        let props = generate_application_properties(&project).unwrap().contents;
        assert!(props.contains("spring.datasource.url=jdbc:h2:mem:blog"));
        assert!(props.contains("spring.jpa.hibernate.ddl-auto=create-drop"));
    }
}
