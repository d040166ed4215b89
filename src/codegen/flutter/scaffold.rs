/// Generate the Flutter project shell: pubspec, config, entry point, home page and README

use std::fmt::Write;

use super::{dart_file, plural};
use crate::codegen::descriptor::ResolvedModel;
use crate::codegen::target::{GeneratedFile, ProjectContext};
use crate::error::GenerationError;

pub fn generate_pubspec_yaml(project: &ProjectContext) -> Result<GeneratedFile, GenerationError> {
    let mut output = String::new();
    writeln!(output, "name: {}", project.dart_package())?;
    writeln!(output, "description: Flutter client for the {} API.", project.name)?;
    writeln!(output, "publish_to: 'none'")?;
    writeln!(output, "version: 1.0.0+1")?;
    writeln!(output)?;
    writeln!(output, "environment:")?;
    writeln!(output, "  sdk: '>=2.19.0 <4.0.0'")?;
    writeln!(output)?;
    writeln!(output, "dependencies:")?;
    writeln!(output, "  flutter:")?;
    writeln!(output, "    sdk: flutter")?;
    writeln!(output, "  http: ^0.13.5")?;
    writeln!(output, "  provider: ^6.0.5")?;
    writeln!(output)?;
    writeln!(output, "dev_dependencies:")?;
    writeln!(output, "  flutter_test:")?;
    writeln!(output, "    sdk: flutter")?;
    writeln!(output, "  flutter_lints: ^2.0.0")?;
    writeln!(output)?;
    writeln!(output, "flutter:")?;
    writeln!(output, "  uses-material-design: true")?;

    Ok(GeneratedFile::new("pubspec.yaml", output))
}

/// `lib/config.dart`: the backend address every service builds on
pub fn generate_config_dart(project: &ProjectContext) -> Result<GeneratedFile, GenerationError> {
    let mut output = String::new();
    writeln!(output, "const String apiBaseUrl = '{}';", project.api_base_url)?;

    Ok(GeneratedFile::new("lib/config.dart", output))
}

pub fn generate_main_dart(project: &ProjectContext) -> Result<GeneratedFile, GenerationError> {
    let mut output = String::new();
    writeln!(output, "import 'package:flutter/material.dart';")?;
    writeln!(output)?;
    writeln!(output, "import 'package:{}/pages/home_page.dart';", project.dart_package())?;
    writeln!(output)?;
    writeln!(output, "void main() {{")?;
    writeln!(output, "  runApp(const MyApp());")?;
    writeln!(output, "}}")?;
    writeln!(output)?;
    writeln!(output, "class MyApp extends StatelessWidget {{")?;
    writeln!(output, "  const MyApp({{super.key}});")?;
    writeln!(output)?;
    writeln!(output, "  @override")?;
    writeln!(output, "  Widget build(BuildContext context) {{")?;
    writeln!(output, "    return MaterialApp(")?;
    writeln!(output, "      title: '{}',", project.name)?;
    writeln!(output, "      theme: ThemeData(")?;
    writeln!(output, "        colorScheme: ColorScheme.fromSeed(seedColor: Colors.indigo),")?;
    writeln!(output, "        useMaterial3: true,")?;
    writeln!(output, "      ),")?;
    writeln!(output, "      home: const HomePage(),")?;
    writeln!(output, "      debugShowCheckedModeBanner: false,")?;
    writeln!(output, "    );")?;
    writeln!(output, "  }}")?;
    writeln!(output, "}}")?;

    Ok(GeneratedFile::new("lib/main.dart", output))
}

/// Navigation shell with one drawer entry per table
pub fn generate_home_page_dart(
    model: &ResolvedModel,
    project: &ProjectContext,
) -> Result<GeneratedFile, GenerationError> {
    let package = project.dart_package();

    let mut output = String::new();
    writeln!(output, "import 'package:flutter/material.dart';")?;
    writeln!(output)?;
    for entity in model.iter() {
        writeln!(
            output,
            "import 'package:{}/pages/{}_list_page.dart';",
            package, entity.file_name
        )?;
    }
    writeln!(output)?;
    writeln!(output, "class HomePage extends StatelessWidget {{")?;
    writeln!(output, "  const HomePage({{super.key}});")?;
    writeln!(output)?;
    writeln!(output, "  void _open(BuildContext context, Widget page) {{")?;
    writeln!(output, "    Navigator.pop(context);")?;
    writeln!(
        output,
        "    Navigator.push(context, MaterialPageRoute(builder: (_) => page));"
    )?;
    writeln!(output, "  }}")?;
    writeln!(output)?;
    writeln!(output, "  @override")?;
    writeln!(output, "  Widget build(BuildContext context) {{")?;
    writeln!(output, "    return Scaffold(")?;
    writeln!(output, "      appBar: AppBar(title: const Text('{}')),", project.name)?;
    writeln!(output, "      drawer: Drawer(")?;
    writeln!(output, "        child: ListView(")?;
    writeln!(output, "          padding: EdgeInsets.zero,")?;
    writeln!(output, "          children: [")?;
    writeln!(output, "            DrawerHeader(")?;
    writeln!(
        output,
        "              decoration: BoxDecoration(color: Theme.of(context).colorScheme.primary),"
    )?;
    writeln!(output, "              child: const Text(")?;
    writeln!(output, "                '{}',", project.name)?;
    writeln!(output, "                style: TextStyle(color: Colors.white, fontSize: 24),")?;
    writeln!(output, "              ),")?;
    writeln!(output, "            ),")?;
    for entity in model.iter() {
        writeln!(output, "            ListTile(")?;
        writeln!(output, "              leading: const Icon(Icons.list),")?;
        writeln!(output, "              title: const Text('{}'),", plural(&entity.entity_name))?;
        writeln!(
            output,
            "              onTap: () => _open(context, const {}ListPage()),",
            entity.entity_name
        )?;
        writeln!(output, "            ),")?;
    }
    writeln!(output, "          ],")?;
    writeln!(output, "        ),")?;
    writeln!(output, "      ),")?;
    writeln!(output, "      body: const Center(")?;
    writeln!(output, "        child: Text('Open the menu to browse your data'),")?;
    writeln!(output, "      ),")?;
    writeln!(output, "    );")?;
    writeln!(output, "  }}")?;
    writeln!(output, "}}")?;

    Ok(dart_file("pages", "home_page", output))
}

pub fn generate_readme(
    model: &ResolvedModel,
    project: &ProjectContext,
) -> Result<GeneratedFile, GenerationError> {
    let mut output = String::new();
    writeln!(output, "# {}", project.name)?;
    writeln!(output)?;
    writeln!(
        output,
        "Flutter client for the REST API at `{}`. Change `lib/config.dart` to point elsewhere",
        project.api_base_url
    )?;
    writeln!(output, "(`http://10.0.2.2:8080` reaches the host from the Android emulator).")?;
    writeln!(output)?;
    writeln!(output, "```bash")?;
    writeln!(output, "flutter pub get")?;
    writeln!(output, "flutter run")?;
    writeln!(output, "```")?;
    writeln!(output)?;
    writeln!(output, "## Screens")?;
    writeln!(output)?;
    for entity in model.iter() {
        writeln!(
            output,
            "- **{}**: `lib/pages/{}_list_page.dart`, detail and form pages, `lib/services/{}_service.dart`",
            entity.entity_name, entity.file_name, entity.file_name
        )?;
    }

    Ok(GeneratedFile::new("README.md", output))
}
