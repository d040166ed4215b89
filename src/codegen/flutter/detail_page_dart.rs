/// Generate `lib/pages/<file>_detail_page.dart`

use indexmap::IndexSet;
use std::fmt::Write;

use super::dart_file;
use super::service_dart::lookup_method;
use crate::codegen::descriptor::{EntityDescriptor, ResolvedModel};
use crate::codegen::target::{GeneratedFile, ProjectContext};
use crate::error::GenerationError;

pub fn generate_detail_page_dart(
    entity: &EntityDescriptor,
    model: &ResolvedModel,
    project: &ProjectContext,
) -> Result<GeneratedFile, GenerationError> {
    let name = &entity.entity_name;
    let file = &entity.file_name;
    let package = project.dart_package();

    let mut imports: IndexSet<String> = IndexSet::new();
    imports.insert(format!("package:{}/models/{}.dart", package, file));
    imports.insert(format!("package:{}/services/{}_service.dart", package, file));
    imports.insert(format!("package:{}/pages/{}_form_page.dart", package, file));
    for sub in &entity.detail_sub_lists {
        imports.insert(format!("package:{}/models/{}.dart", package, sub.target_file));
        imports.insert(format!("package:{}/services/{}_service.dart", package, sub.target_file));
    }

    let mut output = String::new();
    writeln!(output, "import 'package:flutter/material.dart';")?;
    writeln!(output)?;
    for import in &imports {
        writeln!(output, "import '{}';", import)?;
    }
    writeln!(output)?;

    writeln!(output, "class {}DetailPage extends StatefulWidget {{", name)?;
    writeln!(output, "  final int id;")?;
    writeln!(output)?;
    writeln!(output, "  const {}DetailPage({{super.key, required this.id}});", name)?;
    writeln!(output)?;
    writeln!(output, "  @override")?;
    writeln!(output, "  State<{}DetailPage> createState() => _{}DetailPageState();", name, name)?;
    writeln!(output, "}}")?;
    writeln!(output)?;

    writeln!(output, "class _{}DetailPageState extends State<{}DetailPage> {{", name, name)?;
    writeln!(output, "  final {}Service _service = {}Service();", name, name)?;
    for sub in &entity.detail_sub_lists {
        writeln!(
            output,
            "  final {}Service _{}Service = {}Service();",
            sub.target_entity, sub.label, sub.target_entity
        )?;
    }
    writeln!(output, "  late Future<{}> _future;", name)?;
    for sub in &entity.detail_sub_lists {
        writeln!(output, "  late Future<List<{}>> _{}Future;", sub.target_entity, sub.label)?;
    }
    writeln!(output)?;

    writeln!(output, "  @override")?;
    writeln!(output, "  void initState() {{")?;
    writeln!(output, "    super.initState();")?;
    writeln!(output, "    _load();")?;
    writeln!(output, "  }}")?;
    writeln!(output)?;
    writeln!(output, "  void _load() {{")?;
    writeln!(output, "    _future = _service.fetch{}ById(widget.id);", name)?;
    for sub in &entity.detail_sub_lists {
        writeln!(
            output,
            "    _{}Future = _{}Service.{}(widget.id);",
            sub.label,
            sub.label,
            lookup_method(&sub.target_entity, &sub.lookup_field)
        )?;
    }
    writeln!(output, "  }}")?;
    writeln!(output)?;

    writeln!(output, "  Future<void> _edit() async {{")?;
    writeln!(output, "    await Navigator.push(")?;
    writeln!(output, "      context,")?;
    writeln!(output, "      MaterialPageRoute(builder: (_) => {}FormPage(id: widget.id)),", name)?;
    writeln!(output, "    );")?;
    writeln!(output, "    setState(_load);")?;
    writeln!(output, "  }}")?;
    writeln!(output)?;

    writeln!(output, "  Future<void> _confirmDelete() async {{")?;
    writeln!(output, "    final confirmed = await showDialog<bool>(")?;
    writeln!(output, "      context: context,")?;
    writeln!(output, "      builder: (context) => AlertDialog(")?;
    writeln!(output, "        title: const Text('Delete {}'),", name)?;
    writeln!(output, "        content: const Text('This cannot be undone.'),")?;
    writeln!(output, "        actions: [")?;
    writeln!(output, "          TextButton(")?;
    writeln!(output, "            onPressed: () => Navigator.pop(context, false),")?;
    writeln!(output, "            child: const Text('Cancel'),")?;
    writeln!(output, "          ),")?;
    writeln!(output, "          TextButton(")?;
    writeln!(output, "            onPressed: () => Navigator.pop(context, true),")?;
    writeln!(output, "            child: const Text('Delete'),")?;
    writeln!(output, "          ),")?;
    writeln!(output, "        ],")?;
    writeln!(output, "      ),")?;
    writeln!(output, "    );")?;
    writeln!(output, "    if (confirmed != true) return;")?;
    writeln!(output, "    await _service.delete{}(widget.id);", name)?;
    writeln!(output, "    if (!mounted) return;")?;
    writeln!(output, "    Navigator.pop(context);")?;
    writeln!(output, "  }}")?;
    writeln!(output)?;

    writeln!(output, "  Widget _field(String label, Object? value) {{")?;
    writeln!(output, "    return Padding(")?;
    writeln!(output, "      padding: const EdgeInsets.symmetric(vertical: 4),")?;
    writeln!(output, "      child: Row(")?;
    writeln!(output, "        crossAxisAlignment: CrossAxisAlignment.start,")?;
    writeln!(output, "        children: [")?;
    writeln!(output, "          SizedBox(")?;
    writeln!(output, "            width: 120,")?;
    writeln!(output, "            child: Text(label, style: const TextStyle(fontWeight: FontWeight.bold)),")?;
    writeln!(output, "          ),")?;
    writeln!(output, "          Expanded(child: Text(value?.toString() ?? '-')),")?;
    writeln!(output, "        ],")?;
    writeln!(output, "      ),")?;
    writeln!(output, "    );")?;
    writeln!(output, "  }}")?;

    if !entity.detail_sub_lists.is_empty() {
        writeln!(output)?;
        writeln!(
            output,
            "  Widget _subList<T>(String title, Future<List<T>> future, String Function(T) label) {{"
        )?;
        writeln!(output, "    return Column(")?;
        writeln!(output, "      crossAxisAlignment: CrossAxisAlignment.start,")?;
        writeln!(output, "      children: [")?;
        writeln!(output, "        const Divider(),")?;
        writeln!(output, "        Text(title, style: Theme.of(context).textTheme.titleMedium),")?;
        writeln!(output, "        FutureBuilder<List<T>>(")?;
        writeln!(output, "          future: future,")?;
        writeln!(output, "          builder: (context, snapshot) {{")?;
        writeln!(output, "            if (snapshot.connectionState == ConnectionState.waiting) {{")?;
        writeln!(output, "              return const LinearProgressIndicator();")?;
        writeln!(output, "            }}")?;
        writeln!(output, "            if (snapshot.hasError) {{")?;
        writeln!(output, "              return Text('Error: ${{snapshot.error}}');")?;
        writeln!(output, "            }}")?;
        writeln!(output, "            final items = snapshot.data ?? [];")?;
        writeln!(output, "            if (items.isEmpty) {{")?;
        writeln!(output, "              return const Text('None');")?;
        writeln!(output, "            }}")?;
        writeln!(output, "            return Column(")?;
        writeln!(output, "              children: items")?;
        writeln!(output, "                  .map((item) => ListTile(dense: true, title: Text(label(item))))")?;
        writeln!(output, "                  .toList(),")?;
        writeln!(output, "            );")?;
        writeln!(output, "          }},")?;
        writeln!(output, "        ),")?;
        writeln!(output, "      ],")?;
        writeln!(output, "    );")?;
        writeln!(output, "  }}")?;
    }
    writeln!(output)?;

    writeln!(output, "  @override")?;
    writeln!(output, "  Widget build(BuildContext context) {{")?;
    writeln!(output, "    return Scaffold(")?;
    writeln!(output, "      appBar: AppBar(")?;
    writeln!(output, "        title: const Text('{}'),", name)?;
    writeln!(output, "        actions: [")?;
    writeln!(output, "          IconButton(icon: const Icon(Icons.edit), onPressed: _edit),")?;
    writeln!(output, "          IconButton(icon: const Icon(Icons.delete), onPressed: _confirmDelete),")?;
    writeln!(output, "        ],")?;
    writeln!(output, "      ),")?;
    writeln!(output, "      body: FutureBuilder<{}>(", name)?;
    writeln!(output, "        future: _future,")?;
    writeln!(output, "        builder: (context, snapshot) {{")?;
    writeln!(output, "          if (snapshot.connectionState == ConnectionState.waiting) {{")?;
    writeln!(output, "            return const Center(child: CircularProgressIndicator());")?;
    writeln!(output, "          }}")?;
    writeln!(output, "          if (snapshot.hasError || !snapshot.hasData) {{")?;
    writeln!(output, "            return Center(child: Text('Error: ${{snapshot.error}}'));")?;
    writeln!(output, "          }}")?;
    writeln!(output, "          final item = snapshot.data!;")?;
    writeln!(output, "          return ListView(")?;
    writeln!(output, "            padding: const EdgeInsets.all(16),")?;
    writeln!(output, "            children: [")?;
    writeln!(output, "              _field('{}', item.{}),", entity.key.name, entity.key.name)?;
    for scalar in entity.all_scalar_fields() {
        writeln!(output, "              _field('{}', item.{}),", scalar.name, scalar.name)?;
    }
    for relation in entity.all_form_relations() {
        let label = model
            .entity(&relation.target_table_id)
            .map(|target| target.display_field())
            .unwrap_or_else(|| relation.target_key.clone());
        writeln!(
            output,
            "              _field('{}', item.{}?.{}),",
            relation.field_name, relation.field_name, label
        )?;
    }
    for sub in &entity.detail_sub_lists {
        let label = model
            .entity(&sub.target_table_id)
            .map(|target| target.display_field())
            .unwrap_or_else(|| "id".to_string());
        writeln!(
            output,
            "              _subList<{}>('{}', _{}Future, (e) => '${{e.{} ?? ''}}'),",
            sub.target_entity, sub.label, sub.label, label
        )?;
    }
    writeln!(output, "            ],")?;
    writeln!(output, "          );")?;
    writeln!(output, "        }},")?;
    writeln!(output, "      ),")?;
    writeln!(output, "    );")?;
    writeln!(output, "  }}")?;
    writeln!(output, "}}")?;

    Ok(dart_file("pages", &format!("{}_detail_page", file), output))
}
