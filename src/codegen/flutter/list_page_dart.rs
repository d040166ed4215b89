/// Generate `lib/pages/<file>_list_page.dart`

use std::fmt::Write;

use super::{dart_file, plural};
use crate::codegen::descriptor::EntityDescriptor;
use crate::codegen::target::{GeneratedFile, ProjectContext};
use crate::error::GenerationError;

pub fn generate_list_page_dart(
    entity: &EntityDescriptor,
    project: &ProjectContext,
) -> Result<GeneratedFile, GenerationError> {
    let name = &entity.entity_name;
    let file = &entity.file_name;
    let key = &entity.key.name;
    let plural_name = plural(name);
    let package = project.dart_package();
    let display = entity.display_field();

    let mut output = String::new();
    writeln!(output, "import 'package:flutter/material.dart';")?;
    writeln!(output)?;
    writeln!(output, "import 'package:{}/models/{}.dart';", package, file)?;
    writeln!(output, "import 'package:{}/services/{}_service.dart';", package, file)?;
    writeln!(output, "import 'package:{}/pages/{}_detail_page.dart';", package, file)?;
    writeln!(output, "import 'package:{}/pages/{}_form_page.dart';", package, file)?;
    writeln!(output)?;

    writeln!(output, "class {}ListPage extends StatefulWidget {{", name)?;
    writeln!(output, "  const {}ListPage({{super.key}});", name)?;
    writeln!(output)?;
    writeln!(output, "  @override")?;
    writeln!(output, "  State<{}ListPage> createState() => _{}ListPageState();", name, name)?;
    writeln!(output, "}}")?;
    writeln!(output)?;

    writeln!(output, "class _{}ListPageState extends State<{}ListPage> {{", name, name)?;
    writeln!(output, "  final {}Service _service = {}Service();", name, name)?;
    writeln!(output, "  late Future<List<{}>> _future;", name)?;
    writeln!(output)?;
    writeln!(output, "  @override")?;
    writeln!(output, "  void initState() {{")?;
    writeln!(output, "    super.initState();")?;
    writeln!(output, "    _future = _service.fetchAll{}();", plural_name)?;
    writeln!(output, "  }}")?;
    writeln!(output)?;
    writeln!(output, "  void _refresh() {{")?;
    writeln!(output, "    setState(() {{")?;
    writeln!(output, "      _future = _service.fetchAll{}();", plural_name)?;
    writeln!(output, "    }});")?;
    writeln!(output, "  }}")?;
    writeln!(output)?;
    writeln!(output, "  Future<void> _openForm([int? id]) async {{")?;
    writeln!(output, "    await Navigator.push(")?;
    writeln!(output, "      context,")?;
    writeln!(output, "      MaterialPageRoute(builder: (_) => {}FormPage(id: id)),", name)?;
    writeln!(output, "    );")?;
    writeln!(output, "    _refresh();")?;
    writeln!(output, "  }}")?;
    writeln!(output)?;
    writeln!(output, "  Future<void> _openDetail(int id) async {{")?;
    writeln!(output, "    await Navigator.push(")?;
    writeln!(output, "      context,")?;
    writeln!(output, "      MaterialPageRoute(builder: (_) => {}DetailPage(id: id)),", name)?;
    writeln!(output, "    );")?;
    writeln!(output, "    _refresh();")?;
    writeln!(output, "  }}")?;
    writeln!(output)?;

    writeln!(output, "  @override")?;
    writeln!(output, "  Widget build(BuildContext context) {{")?;
    writeln!(output, "    return Scaffold(")?;
    writeln!(output, "      appBar: AppBar(title: const Text('{}')),", plural_name)?;
    writeln!(output, "      body: FutureBuilder<List<{}>>(", name)?;
    writeln!(output, "        future: _future,")?;
    writeln!(output, "        builder: (context, snapshot) {{")?;
    writeln!(output, "          if (snapshot.connectionState == ConnectionState.waiting) {{")?;
    writeln!(output, "            return const Center(child: CircularProgressIndicator());")?;
    writeln!(output, "          }}")?;
    writeln!(output, "          if (snapshot.hasError) {{")?;
    writeln!(output, "            return Center(child: Text('Error: ${{snapshot.error}}'));")?;
    writeln!(output, "          }}")?;
    writeln!(output, "          final items = snapshot.data ?? [];")?;
    writeln!(output, "          if (items.isEmpty) {{")?;
    writeln!(output, "            return const Center(child: Text('No {} yet'));", plural_name)?;
    writeln!(output, "          }}")?;
    writeln!(output, "          return ListView.builder(")?;
    writeln!(output, "            itemCount: items.length,")?;
    writeln!(output, "            itemBuilder: (context, index) {{")?;
    writeln!(output, "              final item = items[index];")?;
    writeln!(output, "              return ListTile(")?;
    if display == *key {
        writeln!(output, "                title: Text('{} ${{item.{}}}'),", name, key)?;
    } else {
        writeln!(output, "                title: Text('${{item.{} ?? ''}}'),", display)?;
        writeln!(output, "                subtitle: Text('{}: ${{item.{}}}'),", key, key)?;
    }
    writeln!(output, "                onTap: () => _openDetail(item.{}!),", key)?;
    writeln!(output, "                trailing: IconButton(")?;
    writeln!(output, "                  icon: const Icon(Icons.edit),")?;
    writeln!(output, "                  onPressed: () => _openForm(item.{}),", key)?;
    writeln!(output, "                ),")?;
    writeln!(output, "              );")?;
    writeln!(output, "            }},")?;
    writeln!(output, "          );")?;
    writeln!(output, "        }},")?;
    writeln!(output, "      ),")?;
    writeln!(output, "      floatingActionButton: FloatingActionButton(")?;
    writeln!(output, "        onPressed: () => _openForm(),")?;
    writeln!(output, "        child: const Icon(Icons.add),")?;
    writeln!(output, "      ),")?;
    writeln!(output, "    );")?;
    writeln!(output, "  }}")?;
    writeln!(output, "}}")?;

    Ok(dart_file("pages", &format!("{}_list_page", file), output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::resolver::resolve;
    use crate::config::GeneratorConfig;
    use crate::diagram::normalize;
    use serde_json::json;

    #[test]
    fn test_list_page_labels_items_with_display_field() {
        let model = resolve(
            &normalize(&json!({
                "tables": [
                    { "id": "c", "name": "OrderItem", "columns": [
                        { "name": "id", "type": "INT", "constraints": ["PK"] },
                        { "name": "cantidad", "type": "INT" },
                        { "name": "titulo", "type": "VARCHAR(80)" }
                    ]}
                ],
                "relationships": []
            }))
            .unwrap(),
        );
        let project = ProjectContext::new("Shop", &GeneratorConfig::default());
        let file = generate_list_page_dart(model.entity("c").unwrap(), &project).unwrap();

        assert_eq!(
            file.path,
            std::path::PathBuf::from("lib/pages/order_item_list_page.dart")
        );
        let dart = &file.contents;
        assert!(dart.contains("import 'package:shop/pages/order_item_form_page.dart';"));
        assert!(dart.contains("class OrderItemListPage extends StatefulWidget {"));
        assert!(dart.contains("_future = _service.fetchAllOrderItems();"));
        assert!(dart.contains("title: Text('${item.titulo ?? ''}'),"));
        assert!(dart.contains("onTap: () => _openDetail(item.id!),"));
    }

    #[test]
    fn test_list_page_falls_back_to_key() {
        let model = resolve(
            &normalize(&json!({
                "tables": [
                    { "id": "n", "name": "Nota", "columns": [{ "name": "puntos", "type": "INT" }] }
                ],
                "relationships": []
            }))
            .unwrap(),
        );
        let project = ProjectContext::new("Shop", &GeneratorConfig::default());
        let dart = generate_list_page_dart(model.entity("n").unwrap(), &project).unwrap().contents;
        assert!(dart.contains("title: Text('Nota ${item.id}'),"));
    }
}
