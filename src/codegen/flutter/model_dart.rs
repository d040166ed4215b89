/// Generate `lib/models/<file>.dart`

use indexmap::IndexSet;
use std::fmt::Write;

use super::dart_file;
use crate::codegen::descriptor::{EntityDescriptor, FormRelation, ScalarField};
use crate::codegen::target::GeneratedFile;
use crate::codegen::types::{ColumnType, Ecosystem};
use crate::error::GenerationError;

pub fn generate_model_dart(entity: &EntityDescriptor) -> Result<GeneratedFile, GenerationError> {
    let name = &entity.entity_name;
    let key = &entity.key.name;
    let scalars: Vec<&ScalarField> = entity.all_scalar_fields().collect();

    let mut imports: IndexSet<String> = IndexSet::new();
    for relation in entity.all_form_relations() {
        if relation.target_file != entity.file_name {
            imports.insert(format!("import '{}.dart';", relation.target_file));
        }
    }

    let mut output = String::new();
    for import in &imports {
        writeln!(output, "{}", import)?;
    }
    if !imports.is_empty() {
        writeln!(output)?;
    }

    writeln!(output, "class {} {{", name)?;
    writeln!(output, "  final int? {};", key)?;
    for scalar in &scalars {
        writeln!(output, "  final {}? {};", scalar.type_name(Ecosystem::Client), scalar.name)?;
    }
    for relation in entity.all_form_relations() {
        writeln!(output, "  final {}? {};", relation.target_entity, relation.field_name)?;
    }
    writeln!(output)?;

    writeln!(output, "  {}({{", name)?;
    writeln!(output, "    this.{},", key)?;
    for scalar in &scalars {
        writeln!(output, "    this.{},", scalar.name)?;
    }
    for relation in entity.all_form_relations() {
        writeln!(output, "    this.{},", relation.field_name)?;
    }
    writeln!(output, "  }});")?;
    writeln!(output)?;

    writeln!(output, "  factory {}.fromJson(Map<String, dynamic> json) {{", name)?;
    writeln!(output, "    return {}(", name)?;
    writeln!(output, "      {}: (json['{}'] as num?)?.toInt(),", key, key)?;
    for scalar in &scalars {
        writeln!(output, "      {}: {},", scalar.name, from_json_expr(scalar))?;
    }
    for relation in entity.all_form_relations() {
        writeln!(output, "      {}: {},", relation.field_name, nested_from_json(relation))?;
    }
    writeln!(output, "    );")?;
    writeln!(output, "  }}")?;
    writeln!(output)?;

    writeln!(output, "  Map<String, dynamic> toJson() {{")?;
    writeln!(output, "    return {{")?;
    writeln!(output, "      '{}': {},", key, key)?;
    for scalar in &scalars {
        writeln!(output, "      '{}': {},", scalar.name, to_json_expr(scalar))?;
    }
    for relation in entity.all_form_relations() {
        writeln!(output, "      '{}': {}?.toJson(),", relation.field_name, relation.field_name)?;
    }
    writeln!(output, "    }};")?;
    writeln!(output, "  }}")?;
    writeln!(output, "}}")?;

    Ok(dart_file("models", &entity.file_name, output))
}

fn from_json_expr(scalar: &ScalarField) -> String {
    let json = format!("json['{}']", scalar.name);
    match scalar.column_type {
        ColumnType::Integer => format!("({} as num?)?.toInt()", json),
        ColumnType::Decimal => format!("({} as num?)?.toDouble()", json),
        ColumnType::Boolean => format!("{} as bool?", json),
        ColumnType::Date | ColumnType::DateTime => {
            format!("{} != null ? DateTime.parse({}) : null", json, json)
        }
        ColumnType::Text => format!("{}?.toString()", json),
    }
}

fn to_json_expr(scalar: &ScalarField) -> String {
    match scalar.column_type {
        // The server expects a plain `yyyy-MM-dd` for dates
        ColumnType::Date => format!("{}?.toIso8601String().split('T').first", scalar.name),
        ColumnType::DateTime => format!("{}?.toIso8601String()", scalar.name),
        _ => scalar.name.clone(),
    }
}

fn nested_from_json(relation: &FormRelation) -> String {
    format!(
        "json['{}'] != null ? {}.fromJson(json['{}']) : null",
        relation.field_name, relation.target_entity, relation.field_name
    )
}
