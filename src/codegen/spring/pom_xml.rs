/// Generate the Maven build descriptor

use std::fmt::Write;

use crate::codegen::target::{GeneratedFile, ProjectContext};
use crate::error::GenerationError;

pub fn generate_pom_xml(project: &ProjectContext) -> Result<GeneratedFile, GenerationError> {
    let group_id = project
        .package
        .rsplit_once('.')
        .map(|(group, _)| group)
        .unwrap_or(project.package.as_str());

    let mut output = String::new();
    writeln!(output, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    writeln!(output, "<project xmlns=\"http://maven.apache.org/POM/4.0.0\"")?;
    writeln!(output, "         xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\"")?;
    writeln!(output, "         xsi:schemaLocation=\"http://maven.apache.org/POM/4.0.0 http://maven.apache.org/xsd/maven-4.0.0.xsd\">")?;
    writeln!(output, "    <modelVersion>4.0.0</modelVersion>")?;
    writeln!(output, "    <parent>")?;
    writeln!(output, "        <groupId>org.springframework.boot</groupId>")?;
    writeln!(output, "        <artifactId>spring-boot-starter-parent</artifactId>")?;
    writeln!(output, "        <version>{}</version>", project.spring_boot_version)?;
    writeln!(output, "        <relativePath/>")?;
    writeln!(output, "    </parent>")?;
    writeln!(output, "    <groupId>{}</groupId>", group_id)?;
    writeln!(output, "    <artifactId>{}</artifactId>", project.name)?;
    writeln!(output, "    <version>0.0.1-SNAPSHOT</version>")?;
    writeln!(output, "    <name>{}</name>", project.name)?;
    writeln!(output, "    <description>Generated Spring Boot project</description>")?;
    writeln!(output, "    <properties>")?;
    writeln!(output, "        <java.version>{}</java.version>", project.java_version)?;
    writeln!(output, "    </properties>")?;
    writeln!(output, "    <dependencies>")?;
    write_dependency(&mut output, "org.springframework.boot", "spring-boot-starter-data-jpa", None)?;
    write_dependency(&mut output, "org.springframework.boot", "spring-boot-starter-web", None)?;
    write_dependency(&mut output, "com.h2database", "h2", Some("runtime"))?;
    write_dependency(&mut output, "org.springframework.boot", "spring-boot-starter-test", Some("test"))?;
    writeln!(output, "    </dependencies>")?;
    writeln!(output, "    <build>")?;
    writeln!(output, "        <plugins>")?;
    writeln!(output, "            <plugin>")?;
    writeln!(output, "                <groupId>org.springframework.boot</groupId>")?;
    writeln!(output, "                <artifactId>spring-boot-maven-plugin</artifactId>")?;
    writeln!(output, "            </plugin>")?;
    writeln!(output, "        </plugins>")?;
    writeln!(output, "    </build>")?;
    writeln!(output, "</project>")?;

    Ok(GeneratedFile::new("pom.xml", output))
}

fn write_dependency(
    output: &mut String,
    group_id: &str,
    artifact_id: &str,
    scope: Option<&str>,
) -> Result<(), GenerationError> {
    writeln!(output, "        <dependency>")?;
    writeln!(output, "            <groupId>{}</groupId>", group_id)?;
    writeln!(output, "            <artifactId>{}</artifactId>", artifact_id)?;
    if let Some(scope) = scope {
        writeln!(output, "            <scope>{}</scope>", scope)?;
    }
    writeln!(output, "        </dependency>")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;

    #[test]
    fn test_pom_uses_configured_versions() {
        let config = GeneratorConfig {
            java_version: "17".to_string(),
            ..GeneratorConfig::default()
        };
        let pom = generate_pom_xml(&ProjectContext::new("MiTienda", &config)).unwrap();
        let xml = &pom.contents;

        assert_eq!(pom.path, std::path::PathBuf::from("pom.xml"));
        assert!(xml.contains("<version>2.7.5</version>"));
        assert!(xml.contains("<java.version>17</java.version>"));
        assert!(xml.contains("<groupId>com.example</groupId>"));
        assert!(xml.contains("<artifactId>MiTienda</artifactId>"));
        assert!(xml.contains("<artifactId>spring-boot-starter-data-jpa</artifactId>"));
        assert!(xml.contains("<artifactId>h2</artifactId>\n            <scope>runtime</scope>"));
    }
}
