//! Integration tests for Spring Boot project generation

use tempfile::TempDir;
use umlforge::archive::{list_entries, read_entry};
use umlforge::{generate_archive, generate_to_dir, load_diagram, GeneratorConfig, Target};

fn config(temp: &TempDir) -> GeneratorConfig {
    GeneratorConfig {
        temp_root: temp.path().join("scratch"),
        ..GeneratorConfig::default()
    }
}

const JAVA_ROOT: &str = "src/main/java/com/example/blog";

#[test]
fn test_blog_backend_archive() {
    let temp = TempDir::new().unwrap();
    let diagram = load_diagram("config/examples/blog.json").expect("Failed to load diagram");

    let archive = generate_archive(&diagram, Target::SpringBoot, Some("Blog"), &config(&temp))
        .expect("Generation failed");

    println!("\n📦 {} ({} files)", archive.file_name, archive.files.len());
    assert_eq!(archive.file_name, "Blog.zip");
    assert!(archive.diagnostics.is_empty(), "{:?}", archive.diagnostics);

    let entries = list_entries(&archive.bytes).unwrap();
    // 5 tables x (entity, repository, service, controller) + pom, properties, main class, README
    assert_eq!(entries.len(), 5 * 4 + 4);
    for expected in [
        "pom.xml".to_string(),
        "README.md".to_string(),
        "src/main/resources/application.properties".to_string(),
        format!("{}/BlogApplication.java", JAVA_ROOT),
        format!("{}/entities/Usuario.java", JAVA_ROOT),
        format!("{}/repositories/PostRepository.java", JAVA_ROOT),
        format!("{}/services/ComentarioService.java", JAVA_ROOT),
        format!("{}/controllers/CategoriaController.java", JAVA_ROOT),
    ] {
        assert!(entries.contains(&expected), "missing {}", expected);
    }
    assert!(entries.iter().all(|e| !e.starts_with("Blog/")));
}

#[test]
fn test_one_to_many_is_wired_on_both_sides() {
    let temp = TempDir::new().unwrap();
    let diagram = load_diagram("config/examples/blog.json").unwrap();
    let archive = generate_archive(&diagram, Target::SpringBoot, Some("Blog"), &config(&temp)).unwrap();

    let post = read_entry(&archive.bytes, &format!("{}/entities/Post.java", JAVA_ROOT)).unwrap();
    assert!(post.contains("    @ManyToOne\n    @JoinColumn(name = \"usuario_id\")\n    private Usuario usuario;"));
    assert!(post.contains("@JoinTable(\n        name = \"post_categoria\","));
    assert!(post.contains("@OneToMany(cascade = CascadeType.ALL, orphanRemoval = true)\n    @JoinColumn(name = \"post_id\")"));
    assert!(post.contains("@Column(name = \"titulo\", length = 200, nullable = false)"));

    let usuario = read_entry(&archive.bytes, &format!("{}/entities/Usuario.java", JAVA_ROOT)).unwrap();
    assert!(usuario.contains("@Inheritance(strategy = InheritanceType.JOINED)"));
    assert!(usuario.contains("@OneToMany(mappedBy = \"usuario\")\n    @JsonIgnore\n    private List<Post> postList = new ArrayList<>();"));
    assert!(usuario.contains("import java.time.LocalDate;"));

    let repository = read_entry(
        &archive.bytes,
        &format!("{}/repositories/PostRepository.java", JAVA_ROOT),
    )
    .unwrap();
    assert!(repository.contains("List<Post> findByUsuario_Id(Long usuarioId);"));
    assert!(repository.contains("List<Post> findByCategoriaList_Id(Long categoriaId);"));

    let controller = read_entry(
        &archive.bytes,
        &format!("{}/controllers/PostController.java", JAVA_ROOT),
    )
    .unwrap();
    assert!(controller.contains("@RequestMapping(\"/api/post\")"));
    assert!(controller.contains("@GetMapping(\"/by-usuario/{usuarioId}\")"));
    assert!(controller.contains("return service.findByUsuarioId(usuarioId);"));
}

#[test]
fn test_subtype_inherits_key() {
    let temp = TempDir::new().unwrap();
    let diagram = load_diagram("config/examples/blog.json").unwrap();
    let archive = generate_archive(&diagram, Target::SpringBoot, Some("Blog"), &config(&temp)).unwrap();

    let admin = read_entry(&archive.bytes, &format!("{}/entities/Admin.java", JAVA_ROOT)).unwrap();
    assert!(admin.contains("public class Admin extends Usuario {"));
    assert!(!admin.contains("@Id"));
    assert!(admin.contains("private Long nivel;"));

    let service = read_entry(&archive.bytes, &format!("{}/services/AdminService.java", JAVA_ROOT)).unwrap();
    assert!(service.contains("entity.setId(id);"));
}

#[test]
fn test_unpacked_generation_writes_tree() {
    let temp = TempDir::new().unwrap();
    let diagram = load_diagram("config/examples/blog.json").unwrap();
    let output = temp.path().join("out");

    let summary = generate_to_dir(&output, &diagram, Target::SpringBoot, Some("mi blog"), &config(&temp))
        .expect("Generation failed");

    assert_eq!(summary.project_name, "miblog");
    assert!(output.join("pom.xml").exists());
    assert!(output
        .join("src/main/java/com/example/miblog/MiblogApplication.java")
        .exists());
    let pom = std::fs::read_to_string(output.join("pom.xml")).unwrap();
    assert!(pom.contains("<artifactId>miblog</artifactId>"));
}
