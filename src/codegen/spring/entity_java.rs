/// Generate `entities/<Entity>.java`

use indexmap::IndexSet;
use std::fmt::Write;

use super::{java_file, persistence_package, JavaField};
use crate::codegen::descriptor::{EntityDescriptor, RelationField, RelationFieldKind, ScalarField};
use crate::codegen::target::{GeneratedFile, ProjectContext};
use crate::codegen::types::{server_import, Ecosystem};
use crate::error::GenerationError;

pub fn generate_entity_java(
    entity: &EntityDescriptor,
    project: &ProjectContext,
) -> Result<GeneratedFile, GenerationError> {
    let persistence = persistence_package(&project.spring_boot_version);
    let fields = entity_fields(entity);

    let mut imports: IndexSet<String> = IndexSet::new();
    imports.insert(format!("{}.*", persistence));
    for scalar in &entity.scalar_fields {
        if let Some(import) = server_import(scalar.column_type) {
            imports.insert(import.to_string());
        }
    }
    if entity.relation_fields.iter().any(|r| r.is_collection()) {
        imports.insert("java.util.ArrayList".to_string());
        imports.insert("java.util.List".to_string());
    }
    if entity.relation_fields.iter().any(|r| r.is_back_reference()) {
        imports.insert("com.fasterxml.jackson.annotation.JsonIgnore".to_string());
    }

    let mut output = String::new();
    writeln!(output, "package {}.entities;", project.package)?;
    writeln!(output)?;
    for import in &imports {
        writeln!(output, "import {};", import)?;
    }
    writeln!(output)?;

    writeln!(output, "@Entity")?;
    writeln!(output, "@Table(name = \"{}\")", entity.file_name)?;
    if entity.is_inheritance_root() {
        writeln!(output, "@Inheritance(strategy = InheritanceType.JOINED)")?;
    }
    match &entity.extends {
        Some(parent) => writeln!(output, "public class {} extends {} {{", entity.entity_name, parent)?,
        None => writeln!(output, "public class {} {{", entity.entity_name)?,
    }
    writeln!(output)?;

    if entity.declares_key() {
        writeln!(output, "    @Id")?;
        writeln!(output, "    @GeneratedValue(strategy = GenerationType.IDENTITY)")?;
        writeln!(output, "    private Long {};", entity.key.name)?;
        writeln!(output)?;
    }

    for scalar in &entity.scalar_fields {
        write_scalar(&mut output, scalar)?;
    }

    for relation in &entity.relation_fields {
        write_relation(&mut output, relation)?;
    }

    writeln!(output, "    public {}() {{", entity.entity_name)?;
    writeln!(output, "    }}")?;

    for field in &fields {
        writeln!(output)?;
        writeln!(output, "    public {} {}() {{", field.java_type, field.getter())?;
        writeln!(output, "        return {};", field.name)?;
        writeln!(output, "    }}")?;
        writeln!(output)?;
        writeln!(output, "    public void {}({} {}) {{", field.setter(), field.java_type, field.name)?;
        writeln!(output, "        this.{} = {};", field.name, field.name)?;
        writeln!(output, "    }}")?;
    }

    writeln!(output, "}}")?;

    Ok(java_file(project, "entities", &entity.entity_name, output))
}

/// Fields declared by this class, in declaration order
pub(super) fn entity_fields(entity: &EntityDescriptor) -> Vec<JavaField> {
    let mut fields = Vec::new();
    if entity.declares_key() {
        fields.push(JavaField::new("Long", &entity.key.name));
    }
    for scalar in &entity.scalar_fields {
        fields.push(JavaField::new(scalar.type_name(Ecosystem::Server), &scalar.name));
    }
    for relation in &entity.relation_fields {
        fields.push(JavaField::new(&relation.server_type(), &relation.name));
    }
    fields
}

fn write_scalar(output: &mut String, scalar: &ScalarField) -> Result<(), GenerationError> {
    let mut attributes = vec![format!("name = \"{}\"", scalar.column_name)];
    if let Some(length) = scalar.length {
        attributes.push(format!("length = {}", length));
    }
    if scalar.not_null {
        attributes.push("nullable = false".to_string());
    }
    if scalar.unique {
        attributes.push("unique = true".to_string());
    }

    writeln!(output, "    @Column({})", attributes.join(", "))?;
    writeln!(
        output,
        "    private {} {};",
        scalar.type_name(Ecosystem::Server),
        scalar.name
    )?;
    writeln!(output)?;
    Ok(())
}

fn write_relation(output: &mut String, relation: &RelationField) -> Result<(), GenerationError> {
    match &relation.kind {
        RelationFieldKind::Reference { join_column, one_to_one } => {
            if *one_to_one {
                writeln!(output, "    @OneToOne")?;
            } else {
                writeln!(output, "    @ManyToOne")?;
            }
            writeln!(output, "    @JoinColumn(name = \"{}\")", join_column)?;
        }
        RelationFieldKind::MappedCollection { mapped_by } => {
            writeln!(output, "    @OneToMany(mappedBy = \"{}\")", mapped_by)?;
        }
        RelationFieldKind::JoinTableCollection {
            join_table,
            join_column,
            inverse_join_column,
        }
        | RelationFieldKind::SharedCollection {
            join_table,
            join_column,
            inverse_join_column,
        } => {
            writeln!(output, "    @ManyToMany")?;
            writeln!(output, "    @JoinTable(")?;
            writeln!(output, "        name = \"{}\",", join_table)?;
            writeln!(output, "        joinColumns = @JoinColumn(name = \"{}\"),", join_column)?;
            writeln!(
                output,
                "        inverseJoinColumns = @JoinColumn(name = \"{}\"))",
                inverse_join_column
            )?;
        }
        RelationFieldKind::InverseManyToMany { mapped_by } => {
            writeln!(output, "    @ManyToMany(mappedBy = \"{}\")", mapped_by)?;
        }
        RelationFieldKind::OwnedCollection { join_column } => {
            writeln!(output, "    @OneToMany(cascade = CascadeType.ALL, orphanRemoval = true)")?;
            writeln!(output, "    @JoinColumn(name = \"{}\")", join_column)?;
        }
    }

    if relation.is_back_reference() {
        writeln!(output, "    @JsonIgnore")?;
    }

    if relation.is_collection() {
        writeln!(
            output,
            "    private {} {} = new ArrayList<>();",
            relation.server_type(),
            relation.name
        )?;
    } else {
        writeln!(output, "    private {} {};", relation.server_type(), relation.name)?;
    }
    writeln!(output)?;
    Ok(())
}
