/// Generate `lib/pages/<file>_form_page.dart`

use indexmap::IndexSet;
use std::fmt::Write;

use super::{dart_file, plural};
use crate::codegen::descriptor::{EntityDescriptor, FormRelation, ResolvedModel, ScalarField};
use crate::codegen::target::{GeneratedFile, ProjectContext};
use crate::codegen::types::ColumnType;
use crate::codegen::utils::upper_first;
use crate::error::GenerationError;

fn controller(field: &ScalarField) -> String {
    format!("_{}Controller", field.name)
}

fn selected(relation: &FormRelation) -> String {
    format!("_selected{}Id", upper_first(&relation.field_name))
}

/// Value read back from the form when building the item
fn parse_expr(field: &ScalarField) -> String {
    let text = format!("{}.text", controller(field));
    match field.column_type {
        ColumnType::Integer => format!("int.tryParse({})", text),
        ColumnType::Decimal => format!("double.tryParse({})", text),
        ColumnType::Date | ColumnType::DateTime => format!("DateTime.tryParse({})", text),
        ColumnType::Boolean => format!("_{}", field.name),
        ColumnType::Text => format!("{}.isEmpty ? null : {}", text, text),
    }
}

/// Text put into the controller when editing an existing item
fn load_expr(field: &ScalarField) -> String {
    match field.column_type {
        ColumnType::Date => format!("item.{}?.toIso8601String().split('T').first ?? ''", field.name),
        ColumnType::DateTime => format!("item.{}?.toIso8601String() ?? ''", field.name),
        _ => format!("item.{}?.toString() ?? ''", field.name),
    }
}

fn keyboard(column_type: ColumnType) -> Option<&'static str> {
    match column_type {
        ColumnType::Integer => Some("TextInputType.number"),
        ColumnType::Decimal => Some("const TextInputType.numberWithOptions(decimal: true)"),
        ColumnType::Date | ColumnType::DateTime => Some("TextInputType.datetime"),
        _ => None,
    }
}

fn write_validator(output: &mut String, field: &ScalarField) -> Result<(), GenerationError> {
    let check = match field.column_type {
        ColumnType::Integer => Some(("int.tryParse(value) == null", "Enter a whole number")),
        ColumnType::Decimal => Some(("double.tryParse(value) == null", "Enter a number")),
        ColumnType::Date | ColumnType::DateTime => {
            Some(("DateTime.tryParse(value) == null", "Use YYYY-MM-DD"))
        }
        _ => None,
    };
    if !field.not_null && check.is_none() {
        return Ok(());
    }

    writeln!(output, "                validator: (value) {{")?;
    writeln!(output, "                  if (value == null || value.isEmpty) {{")?;
    if field.not_null {
        writeln!(output, "                    return 'Required';")?;
    } else {
        writeln!(output, "                    return null;")?;
    }
    writeln!(output, "                  }}")?;
    if let Some((condition, message)) = check {
        writeln!(output, "                  if ({}) {{", condition)?;
        writeln!(output, "                    return '{}';", message)?;
        writeln!(output, "                  }}")?;
    }
    writeln!(output, "                  return null;")?;
    writeln!(output, "                }},")?;
    Ok(())
}

pub fn generate_form_page_dart(
    entity: &EntityDescriptor,
    model: &ResolvedModel,
    project: &ProjectContext,
) -> Result<GeneratedFile, GenerationError> {
    let name = &entity.entity_name;
    let file = &entity.file_name;
    let key = &entity.key.name;
    let package = project.dart_package();
    let scalars: Vec<&ScalarField> = entity.all_scalar_fields().collect();
    let text_fields: Vec<&ScalarField> = scalars
        .iter()
        .copied()
        .filter(|f| f.column_type != ColumnType::Boolean)
        .collect();

    let mut imports: IndexSet<String> = IndexSet::new();
    imports.insert(format!("package:{}/models/{}.dart", package, file));
    imports.insert(format!("package:{}/services/{}_service.dart", package, file));
    for relation in entity.all_form_relations() {
        imports.insert(format!("package:{}/models/{}.dart", package, relation.target_file));
        imports.insert(format!(
            "package:{}/services/{}_service.dart",
            package, relation.target_file
        ));
    }

    let mut output = String::new();
    writeln!(output, "import 'package:flutter/material.dart';")?;
    writeln!(output)?;
    for import in &imports {
        writeln!(output, "import '{}';", import)?;
    }
    writeln!(output)?;

    writeln!(output, "class {}FormPage extends StatefulWidget {{", name)?;
    writeln!(output, "  final int? id;")?;
    writeln!(output)?;
    writeln!(output, "  const {}FormPage({{super.key, this.id}});", name)?;
    writeln!(output)?;
    writeln!(output, "  @override")?;
    writeln!(output, "  State<{}FormPage> createState() => _{}FormPageState();", name, name)?;
    writeln!(output, "}}")?;
    writeln!(output)?;

    // State
    writeln!(output, "class _{}FormPageState extends State<{}FormPage> {{", name, name)?;
    writeln!(output, "  final _formKey = GlobalKey<FormState>();")?;
    writeln!(output, "  final {}Service _service = {}Service();", name, name)?;
    for relation in entity.all_form_relations() {
        writeln!(
            output,
            "  final {}Service _{}Service = {}Service();",
            relation.target_entity, relation.field_name, relation.target_entity
        )?;
    }
    for field in &text_fields {
        writeln!(output, "  final {} = TextEditingController();", controller(field))?;
    }
    for field in scalars.iter().filter(|f| f.column_type == ColumnType::Boolean) {
        writeln!(output, "  bool _{} = false;", field.name)?;
    }
    for relation in entity.all_form_relations() {
        writeln!(output, "  int? {};", selected(relation))?;
        writeln!(
            output,
            "  late Future<List<{}>> _{}Options;",
            relation.target_entity, relation.field_name
        )?;
    }
    writeln!(output, "  bool _saving = false;")?;
    writeln!(output)?;
    writeln!(output, "  bool get _isEditing => widget.id != null;")?;
    writeln!(output)?;

    writeln!(output, "  @override")?;
    writeln!(output, "  void initState() {{")?;
    writeln!(output, "    super.initState();")?;
    for relation in entity.all_form_relations() {
        writeln!(
            output,
            "    _{}Options = _{}Service.fetchAll{}();",
            relation.field_name,
            relation.field_name,
            plural(&relation.target_entity)
        )?;
    }
    writeln!(output, "    if (_isEditing) {{")?;
    writeln!(output, "      _loadExisting();")?;
    writeln!(output, "    }}")?;
    writeln!(output, "  }}")?;
    writeln!(output)?;

    writeln!(output, "  @override")?;
    writeln!(output, "  void dispose() {{")?;
    for field in &text_fields {
        writeln!(output, "    {}.dispose();", controller(field))?;
    }
    writeln!(output, "    super.dispose();")?;
    writeln!(output, "  }}")?;
    writeln!(output)?;

    writeln!(output, "  Future<void> _loadExisting() async {{")?;
    writeln!(output, "    final item = await _service.fetch{}ById(widget.id!);", name)?;
    writeln!(output, "    if (!mounted) return;")?;
    writeln!(output, "    setState(() {{")?;
    for field in &scalars {
        if field.column_type == ColumnType::Boolean {
            writeln!(output, "      _{} = item.{} ?? false;", field.name, field.name)?;
        } else {
            writeln!(output, "      {}.text = {};", controller(field), load_expr(field))?;
        }
    }
    for relation in entity.all_form_relations() {
        writeln!(
            output,
            "      {} = item.{}?.{};",
            selected(relation),
            relation.field_name,
            relation.target_key
        )?;
    }
    writeln!(output, "    }});")?;
    writeln!(output, "  }}")?;
    writeln!(output)?;

    writeln!(output, "  Future<void> _save() async {{")?;
    writeln!(output, "    if (!_formKey.currentState!.validate()) return;")?;
    writeln!(output, "    setState(() => _saving = true);")?;
    writeln!(output, "    final item = {}(", name)?;
    writeln!(output, "      {}: widget.id,", key)?;
    for field in &scalars {
        writeln!(output, "      {}: {},", field.name, parse_expr(field))?;
    }
    for relation in entity.all_form_relations() {
        let id = selected(relation);
        writeln!(
            output,
            "      {}: {} != null ? {}({}: {}) : null,",
            relation.field_name, id, relation.target_entity, relation.target_key, id
        )?;
    }
    writeln!(output, "    );")?;
    writeln!(output, "    try {{")?;
    writeln!(output, "      if (_isEditing) {{")?;
    writeln!(output, "        await _service.update{}(widget.id!, item);", name)?;
    writeln!(output, "      }} else {{")?;
    writeln!(output, "        await _service.create{}(item);", name)?;
    writeln!(output, "      }}")?;
    writeln!(output, "      if (!mounted) return;")?;
    writeln!(output, "      Navigator.pop(context, true);")?;
    writeln!(output, "    }} catch (e) {{")?;
    writeln!(output, "      if (!mounted) return;")?;
    writeln!(output, "      setState(() => _saving = false);")?;
    writeln!(output, "      ScaffoldMessenger.of(context).showSnackBar(")?;
    writeln!(output, "        SnackBar(content: Text('Error: $e')),")?;
    writeln!(output, "      );")?;
    writeln!(output, "    }}")?;
    writeln!(output, "  }}")?;
    writeln!(output)?;

    // Widgets
    writeln!(output, "  @override")?;
    writeln!(output, "  Widget build(BuildContext context) {{")?;
    writeln!(output, "    return Scaffold(")?;
    writeln!(output, "      appBar: AppBar(")?;
    writeln!(
        output,
        "        title: Text(_isEditing ? 'Edit {}' : 'New {}'),",
        name, name
    )?;
    writeln!(output, "      ),")?;
    writeln!(output, "      body: Form(")?;
    writeln!(output, "        key: _formKey,")?;
    writeln!(output, "        child: ListView(")?;
    writeln!(output, "          padding: const EdgeInsets.all(16),")?;
    writeln!(output, "          children: [")?;
    for field in &scalars {
        if field.column_type == ColumnType::Boolean {
            writeln!(output, "            SwitchListTile(")?;
            writeln!(output, "              title: const Text('{}'),", field.name)?;
            writeln!(output, "              value: _{},", field.name)?;
            writeln!(
                output,
                "              onChanged: (value) => setState(() => _{} = value),",
                field.name
            )?;
            writeln!(output, "            ),")?;
            continue;
        }
        writeln!(output, "            Padding(")?;
        writeln!(output, "              padding: const EdgeInsets.only(bottom: 12),")?;
        writeln!(output, "              child: TextFormField(")?;
        writeln!(output, "                controller: {},", controller(field))?;
        writeln!(
            output,
            "                decoration: const InputDecoration(labelText: '{}'),",
            field.name
        )?;
        if let Some(keyboard) = keyboard(field.column_type) {
            writeln!(output, "                keyboardType: {},", keyboard)?;
        }
        if let Some(length) = field.length {
            writeln!(output, "                maxLength: {},", length)?;
        }
        write_validator(&mut output, field)?;
        writeln!(output, "              ),")?;
        writeln!(output, "            ),")?;
    }
    for relation in entity.all_form_relations() {
        let label = model
            .entity(&relation.target_table_id)
            .map(|target| target.display_field())
            .unwrap_or_else(|| relation.target_key.clone());
        let option_text = if label == relation.target_key {
            format!("'${{o.{}}}'", relation.target_key)
        } else {
            format!("'${{o.{} ?? o.{}}}'", label, relation.target_key)
        };
        let id = selected(relation);

        writeln!(output, "            FutureBuilder<List<{}>>(", relation.target_entity)?;
        writeln!(output, "              future: _{}Options,", relation.field_name)?;
        writeln!(output, "              builder: (context, snapshot) {{")?;
        writeln!(output, "                final options = snapshot.data ?? [];")?;
        writeln!(output, "                return DropdownButtonFormField<int>(")?;
        writeln!(
            output,
            "                  value: options.any((o) => o.{} == {}) ? {} : null,",
            relation.target_key, id, id
        )?;
        writeln!(
            output,
            "                  decoration: const InputDecoration(labelText: '{}'),",
            relation.field_name
        )?;
        writeln!(output, "                  items: options")?;
        writeln!(output, "                      .map((o) => DropdownMenuItem<int>(")?;
        writeln!(output, "                            value: o.{},", relation.target_key)?;
        writeln!(output, "                            child: Text({}),", option_text)?;
        writeln!(output, "                          ))")?;
        writeln!(output, "                      .toList(),")?;
        writeln!(
            output,
            "                  onChanged: (value) => setState(() => {} = value),",
            id
        )?;
        writeln!(output, "                );")?;
        writeln!(output, "              }},")?;
        writeln!(output, "            ),")?;
    }
    writeln!(output, "            const SizedBox(height: 24),")?;
    writeln!(output, "            ElevatedButton(")?;
    writeln!(output, "              onPressed: _saving ? null : _save,")?;
    writeln!(output, "              child: Text(_isEditing ? 'Update' : 'Create'),")?;
    writeln!(output, "            ),")?;
    writeln!(output, "          ],")?;
    writeln!(output, "        ),")?;
    writeln!(output, "      ),")?;
    writeln!(output, "    );")?;
    writeln!(output, "  }}")?;
    writeln!(output, "}}")?;

    Ok(dart_file("pages", &format!("{}_form_page", file), output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::resolver::resolve;
    use crate::config::GeneratorConfig;
    use crate::diagram::normalize;
    use serde_json::json;

    fn model() -> ResolvedModel {
        resolve(
            &normalize(&json!({
                "tables": [
                    { "id": "u", "name": "Usuario", "columns": [
                        { "name": "id", "type": "INT", "constraints": ["PK"] },
                        { "name": "nombre", "type": "VARCHAR(100)", "constraints": ["NOT NULL"] }
                    ]},
                    { "id": "p", "name": "Post", "columns": [
                        { "name": "id", "type": "INT", "constraints": ["PK"] },
                        { "name": "titulo", "type": "VARCHAR(100)" },
                        { "name": "visitas", "type": "INT" },
                        { "name": "publicado", "type": "DATE" },
                        { "name": "activo", "type": "BOOLEAN" }
                    ]}
                ],
                "relationships": [
                    { "id": "r", "type": "one-to-many", "fromTableId": "u", "toTableId": "p" }
                ]
            }))
            .unwrap(),
        )
    }

    #[test]
    fn test_form_has_dropdown_per_reference() {
        let model = model();
        let project = ProjectContext::new("Blog", &GeneratorConfig::default());
        let file = generate_form_page_dart(model.entity("p").unwrap(), &model, &project).unwrap();
        let dart = &file.contents;

        assert_eq!(file.path, std::path::PathBuf::from("lib/pages/post_form_page.dart"));
        assert!(dart.contains("import 'package:blog/services/usuario_service.dart';"));
        assert!(dart.contains("final UsuarioService _usuarioService = UsuarioService();"));
        assert!(dart.contains("_usuarioOptions = _usuarioService.fetchAllUsuarios();"));
        assert!(dart.contains("int? _selectedUsuarioId;"));
        assert!(dart.contains("_selectedUsuarioId = item.usuario?.id;"));
        assert!(dart.contains(
            "usuario: _selectedUsuarioId != null ? Usuario(id: _selectedUsuarioId) : null,"
        ));
        assert!(dart.contains("child: Text('${o.nombre ?? o.id}'),"));
    }

    #[test]
    fn test_form_parses_fields_by_type() {
        let model = model();
        let project = ProjectContext::new("Blog", &GeneratorConfig::default());
        let dart = generate_form_page_dart(model.entity("p").unwrap(), &model, &project)
            .unwrap()
            .contents;

        assert!(dart.contains("visitas: int.tryParse(_visitasController.text),"));
        assert!(dart.contains("publicado: DateTime.tryParse(_publicadoController.text),"));
        assert!(dart.contains("titulo: _tituloController.text.isEmpty ? null : _tituloController.text,"));
        assert!(dart.contains("activo: _activo,"));
        assert!(dart.contains("bool _activo = false;"));
        assert!(!dart.contains("_activoController"));
        assert!(dart.contains("_publicadoController.text = item.publicado?.toIso8601String().split('T').first ?? '';"));
        assert!(dart.contains("keyboardType: TextInputType.number,"));
        assert!(dart.contains("maxLength: 100,"));
    }

    #[test]
    fn test_required_fields_are_validated() {
        let model = model();
        let project = ProjectContext::new("Blog", &GeneratorConfig::default());
        let dart = generate_form_page_dart(model.entity("u").unwrap(), &model, &project)
            .unwrap()
            .contents;
        assert!(dart.contains("return 'Required';"));
        assert!(!dart.contains("DropdownButtonFormField"));
        assert!(dart.contains("await _service.createUsuario(item);"));
    }
}
