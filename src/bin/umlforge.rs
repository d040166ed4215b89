//! umlforge CLI - generate Spring Boot or Flutter projects from ER/UML diagrams
//!
//! Reads a diagram (JSON, YAML, or an assistant reply embedding the JSON) and
//! writes the generated project as a zip archive or an unpacked tree.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;

use umlforge::codegen::descriptor::RelationFieldKind;
use umlforge::{load_diagram, resolve, GeneratorConfig, Target};

#[derive(Parser)]
#[command(name = "umlforge")]
#[command(version, about = "Generate CRUD projects from ER/UML diagrams", long_about = None)]
struct Cli {
    /// Path to umlforge.yaml (default: ./umlforge.yaml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a project from a diagram
    Generate {
        /// Target: backend|spring or mobile|flutter
        target: String,

        /// Diagram file (JSON, YAML, or text embedding the JSON)
        diagram: PathBuf,

        /// Project name (sanitized; defaults to default_project_name)
        #[arg(short, long)]
        project: Option<String>,

        /// Directory the archive (or unpacked project) is written to
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Write the project tree instead of a zip archive
        #[arg(short, long)]
        unpacked: bool,

        /// Java base package, overrides the config file
        #[arg(long)]
        base_package: Option<String>,

        /// Backend URL the Flutter services call, overrides the config file
        #[arg(long)]
        api_base_url: Option<String>,
    },

    /// Validate a diagram and report resolver diagnostics
    Validate {
        /// Diagram file
        diagram: PathBuf,
    },

    /// Print the resolved entities of a diagram
    Inspect {
        /// Diagram file
        diagram: PathBuf,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            target,
            diagram,
            project,
            output,
            unpacked,
            base_package,
            api_base_url,
        } => load_config(cli.config.as_deref(), base_package, api_base_url).and_then(|config| {
            generate(&target, &diagram, project.as_deref(), &output, unpacked, &config)
        }),
        Commands::Validate { diagram } => validate(&diagram),
        Commands::Inspect { diagram } => inspect(&diagram),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// File, then environment, then CLI flags
fn load_config(
    path: Option<&Path>,
    base_package: Option<String>,
    api_base_url: Option<String>,
) -> Result<GeneratorConfig, String> {
    let mut config = GeneratorConfig::load(path)?;
    if let Some(base_package) = base_package {
        config.base_package = base_package;
    }
    if let Some(api_base_url) = api_base_url {
        config.api_base_url = api_base_url;
    }
    config.validate()?;
    Ok(config)
}

fn generate(
    target: &str,
    diagram_path: &Path,
    project: Option<&str>,
    output: &Path,
    unpacked: bool,
    config: &GeneratorConfig,
) -> Result<(), String> {
    let target: Target = target.parse()?;
    println!("🔧 Generating {} project from {}...", target, diagram_path.display());

    let diagram = load_diagram(diagram_path).map_err(|e| e.to_string())?;
    println!(
        "  ✓ Loaded {} tables, {} relationships",
        diagram.tables.len(),
        diagram.relationships.len()
    );

    let (files, diagnostics, destination) = if unpacked {
        let name = umlforge::codegen::project_name(project, config);
        let destination = output.join(&name);
        let summary = umlforge::generate_to_dir(&destination, &diagram, target, Some(name.as_str()), config)
            .map_err(|e| e.to_string())?;
        (summary.files.len(), summary.diagnostics, destination)
    } else {
        let archive = umlforge::generate_archive(&diagram, target, project, config)
            .map_err(|e| e.to_string())?;
        std::fs::create_dir_all(output)
            .map_err(|e| format!("Failed to create {}: {}", output.display(), e))?;
        let destination = output.join(&archive.file_name);
        std::fs::write(&destination, &archive.bytes)
            .map_err(|e| format!("Failed to write {}: {}", destination.display(), e))?;
        (archive.files.len(), archive.diagnostics, destination)
    };

    println!("  ✓ Generated {} files", files);
    for diagnostic in &diagnostics {
        println!("  ⚠ {}", diagnostic);
    }
    println!("✨ Project written to {}", destination.display());

    Ok(())
}

fn validate(diagram_path: &Path) -> Result<(), String> {
    println!("🔍 Validating {}...", diagram_path.display());

    let diagram = load_diagram(diagram_path).map_err(|e| e.to_string())?;
    if diagram.is_empty() {
        return Err("The diagram has no tables to generate code from".to_string());
    }

    let model = resolve(&diagram);
    println!(
        "  ✓ {} tables, {} relationships",
        diagram.tables.len(),
        diagram.relationships.len()
    );

    if model.diagnostics.is_empty() {
        println!("✨ No problems found");
    } else {
        for diagnostic in &model.diagnostics {
            println!("  ⚠ {}", diagnostic);
        }
        println!("⚠ {} warnings", model.diagnostics.len());
    }

    Ok(())
}

fn inspect(diagram_path: &Path) -> Result<(), String> {
    let diagram = load_diagram(diagram_path).map_err(|e| e.to_string())?;
    let model = resolve(&diagram);

    for entity in model.iter() {
        match &entity.extends {
            Some(parent) => println!("{} extends {} ({})", entity.entity_name, parent, entity.file_name),
            None => println!("{} ({})", entity.entity_name, entity.file_name),
        }

        let origin = if entity.key.inherited {
            "inherited"
        } else if entity.key.declared {
            "declared"
        } else {
            "generated"
        };
        println!("  key  {} [{}]", entity.key.name, origin);

        for field in entity.all_scalar_fields() {
            println!("  col  {}: {:?} ({})", field.name, field.column_type, field.raw_type);
        }

        for relation in &entity.relation_fields {
            let mapping = match &relation.kind {
                RelationFieldKind::Reference { join_column, .. } => format!("join column {}", join_column),
                RelationFieldKind::MappedCollection { mapped_by }
                | RelationFieldKind::InverseManyToMany { mapped_by } => format!("mapped by {}", mapped_by),
                RelationFieldKind::JoinTableCollection { join_table, .. }
                | RelationFieldKind::SharedCollection { join_table, .. } => format!("join table {}", join_table),
                RelationFieldKind::OwnedCollection { join_column } => format!("owned via {}", join_column),
            };
            println!("  rel  {}: {} ({})", relation.name, relation.server_type(), mapping);
        }

        for edge in entity.parent_edges() {
            println!("  find by-{} -> {}", edge.parent_field, edge.parent_entity);
        }
    }

    for diagnostic in &model.diagnostics {
        println!("⚠ {}", diagnostic);
    }

    Ok(())
}
