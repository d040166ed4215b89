/// Generate `lib/services/<file>_service.dart`

use std::fmt::Write;

use super::{dart_file, plural};
use crate::codegen::descriptor::EntityDescriptor;
use crate::codegen::target::{GeneratedFile, ProjectContext};
use crate::codegen::utils::upper_first;
use crate::error::GenerationError;

/// `fetchPostsByUsuarioId`
pub(crate) fn lookup_method(entity_name: &str, parent_field: &str) -> String {
    format!("fetch{}By{}Id", plural(entity_name), upper_first(parent_field))
}

pub fn generate_service_dart(
    entity: &EntityDescriptor,
    project: &ProjectContext,
) -> Result<GeneratedFile, GenerationError> {
    let name = &entity.entity_name;
    let plural_name = plural(name);
    let package = project.dart_package();

    let mut output = String::new();
    writeln!(output, "import 'dart:convert';")?;
    writeln!(output)?;
    writeln!(output, "import 'package:http/http.dart' as http;")?;
    writeln!(output)?;
    writeln!(output, "import 'package:{}/config.dart';", package)?;
    writeln!(output, "import 'package:{}/models/{}.dart';", package, entity.file_name)?;
    writeln!(output)?;
    writeln!(output, "class {}Service {{", name)?;
    writeln!(output, "  final String _baseUrl = '$apiBaseUrl/api/{}';", entity.route())?;
    writeln!(output, "  final Map<String, String> _headers = const {{")?;
    writeln!(output, "    'Content-Type': 'application/json',")?;
    writeln!(output, "  }};")?;
    writeln!(output)?;

    writeln!(output, "  List<{}> _decodeList(http.Response response) {{", name)?;
    writeln!(output, "    if (response.statusCode != 200) {{")?;
    writeln!(
        output,
        "      throw Exception('Failed to load {} (${{response.statusCode}})');",
        plural_name
    )?;
    writeln!(output, "    }}")?;
    writeln!(output, "    final List<dynamic> data = jsonDecode(response.body);")?;
    writeln!(output, "    return data.map((json) => {}.fromJson(json)).toList();", name)?;
    writeln!(output, "  }}")?;
    writeln!(output)?;

    writeln!(output, "  Future<List<{}>> fetchAll{}() async {{", name, plural_name)?;
    writeln!(output, "    final response = await http.get(Uri.parse(_baseUrl));")?;
    writeln!(output, "    return _decodeList(response);")?;
    writeln!(output, "  }}")?;
    writeln!(output)?;

    writeln!(output, "  Future<{}> fetch{}ById(int id) async {{", name, name)?;
    writeln!(output, "    final response = await http.get(Uri.parse('$_baseUrl/$id'));")?;
    writeln!(output, "    if (response.statusCode == 200) {{")?;
    writeln!(output, "      return {}.fromJson(jsonDecode(response.body));", name)?;
    writeln!(output, "    }}")?;
    writeln!(
        output,
        "    throw Exception('{} $id not found (${{response.statusCode}})');",
        name
    )?;
    writeln!(output, "  }}")?;
    writeln!(output)?;

    writeln!(output, "  Future<{}> create{}({} item) async {{", name, name, name)?;
    writeln!(output, "    final body = item.toJson();")?;
    writeln!(output, "    if (body['{}'] == null) {{", entity.key.name)?;
    writeln!(output, "      body.remove('{}');", entity.key.name)?;
    writeln!(output, "    }}")?;
    writeln!(output, "    final response = await http.post(")?;
    writeln!(output, "      Uri.parse(_baseUrl),")?;
    writeln!(output, "      headers: _headers,")?;
    writeln!(output, "      body: jsonEncode(body),")?;
    writeln!(output, "    );")?;
    writeln!(output, "    if (response.statusCode == 200 || response.statusCode == 201) {{")?;
    writeln!(output, "      return {}.fromJson(jsonDecode(response.body));", name)?;
    writeln!(output, "    }}")?;
    writeln!(
        output,
        "    throw Exception('Failed to create {} (${{response.statusCode}})');",
        name
    )?;
    writeln!(output, "  }}")?;
    writeln!(output)?;

    writeln!(output, "  Future<{}> update{}(int id, {} item) async {{", name, name, name)?;
    writeln!(output, "    final response = await http.put(")?;
    writeln!(output, "      Uri.parse('$_baseUrl/$id'),")?;
    writeln!(output, "      headers: _headers,")?;
    writeln!(output, "      body: jsonEncode(item.toJson()),")?;
    writeln!(output, "    );")?;
    writeln!(output, "    if (response.statusCode == 200) {{")?;
    writeln!(output, "      return {}.fromJson(jsonDecode(response.body));", name)?;
    writeln!(output, "    }}")?;
    writeln!(
        output,
        "    throw Exception('Failed to update {} $id (${{response.statusCode}})');",
        name
    )?;
    writeln!(output, "  }}")?;
    writeln!(output)?;

    writeln!(output, "  Future<void> delete{}(int id) async {{", name)?;
    writeln!(output, "    final response = await http.delete(Uri.parse('$_baseUrl/$id'));")?;
    writeln!(output, "    if (response.statusCode != 200 && response.statusCode != 204) {{")?;
    writeln!(
        output,
        "      throw Exception('Failed to delete {} $id (${{response.statusCode}})');",
        name
    )?;
    writeln!(output, "    }}")?;
    writeln!(output, "  }}")?;

    for edge in entity.parent_edges() {
        let param = format!("{}Id", edge.parent_field);
        writeln!(output)?;
        writeln!(
            output,
            "  Future<List<{}>> {}(int {}) async {{",
            name,
            lookup_method(name, &edge.parent_field),
            param
        )?;
        writeln!(
            output,
            "    final response = await http.get(Uri.parse('$_baseUrl/by-{}/${}'));",
            edge.parent_field, param
        )?;
        writeln!(output, "    return _decodeList(response);")?;
        writeln!(output, "  }}")?;
    }

    writeln!(output, "}}")?;

    Ok(dart_file("services", &format!("{}_service", entity.file_name), output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::resolver::resolve;
    use crate::config::GeneratorConfig;
    use crate::diagram::normalize;
    use serde_json::json;

    #[test]
    fn test_service_calls_rest_endpoints() {
        let model = resolve(
            &normalize(&json!({
                "tables": [
                    { "id": "u", "name": "Usuario", "columns": [{ "name": "id", "type": "INT", "constraints": ["PK"] }] },
                    { "id": "p", "name": "Post", "columns": [{ "name": "id", "type": "INT", "constraints": ["PK"] }] }
                ],
                "relationships": [
                    { "id": "r", "type": "many-to-one", "fromTableId": "p", "toTableId": "u" }
                ]
            }))
            .unwrap(),
        );
        let project = ProjectContext::new("Blog", &GeneratorConfig::default());

        let file = generate_service_dart(model.entity("p").unwrap(), &project).unwrap();
        assert_eq!(file.path, std::path::PathBuf::from("lib/services/post_service.dart"));
        let dart = &file.contents;
        assert!(dart.contains("import 'package:blog/models/post.dart';"));
        assert!(dart.contains("final String _baseUrl = '$apiBaseUrl/api/post';"));
        assert!(dart.contains("Future<List<Post>> fetchAllPosts() async {"));
        assert!(dart.contains("Future<Post> fetchPostById(int id) async {"));
        assert!(dart.contains("Future<void> deletePost(int id) async {"));
        assert!(dart.contains("Future<List<Post>> fetchPostsByUsuarioId(int usuarioId) async {"));
        assert!(dart.contains("Uri.parse('$_baseUrl/by-usuario/$usuarioId')"));
        assert!(dart.contains("throw Exception('Failed to load Posts (${response.statusCode})');"));

        let usuario = generate_service_dart(model.entity("u").unwrap(), &project).unwrap().contents;
        assert!(!usuario.contains("by-"));
    }
}
