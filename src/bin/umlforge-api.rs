/// umlforge HTTP API - stateless project generation endpoint
///
/// Accepts a diagram document and answers with the generated project as a
/// zip download. Every request works in its own scratch directory, which is
/// removed before the response is sent.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use umlforge::{
    generate_archive, normalize, parse_diagram_text, resolve, Diagram, GenerationError,
    GeneratorConfig, Target,
};

#[derive(Clone)]
struct AppState {
    config: Arc<GeneratorConfig>,
}

#[tokio::main]
async fn main() {
    // Load environment variables before reading config overrides
    dotenv::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config_path = std::env::var("UMLFORGE_CONFIG").ok().map(std::path::PathBuf::from);
    let config = match GeneratorConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let state = Arc::new(AppState {
        config: Arc::new(config),
    });

    let app = Router::new()
        .route("/api/generate/:target", post(generate))
        .route("/api/validate", post(validate))
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive())
        .with_state(state.clone());

    tracing::info!("umlforge API listening on {}", addr);
    tracing::info!("Scratch directory: {}", state.config.temp_root.display());

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("Error: cannot bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Error: server stopped: {}", e);
        std::process::exit(1);
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    #[serde(default)]
    project_name: Option<String>,
    diagram: Value,
}

/// The diagram may be sent as an object or as text embedding one
fn read_diagram(value: &Value) -> Result<Diagram, GenerationError> {
    match value {
        Value::String(text) => parse_diagram_text(text),
        other => normalize(other),
    }
}

/// Generate a project and stream it back as a zip
async fn generate(
    State(state): State<Arc<AppState>>,
    Path(target): Path<String>,
    body: String,
) -> Result<Response, AppError> {
    let target: Target = target.parse().map_err(AppError::NotFound)?;

    let request: GenerateRequest = serde_json::from_str(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))?;
    let diagram = read_diagram(&request.diagram)?;

    let config = state.config.clone();
    let archive = tokio::task::spawn_blocking(move || {
        generate_archive(&diagram, target, request.project_name.as_deref(), &config)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Generation task failed: {}", e)))??;

    tracing::info!(
        "Sending {} ({} files, {} diagnostics)",
        archive.file_name,
        archive.files.len(),
        archive.diagnostics.len()
    );

    let headers = [
        (header::CONTENT_TYPE, "application/zip".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", archive.file_name),
        ),
    ];
    Ok((headers, archive.bytes).into_response())
}

/// Normalize and resolve a diagram without generating anything
async fn validate(body: String) -> Result<Json<Value>, AppError> {
    let value: Value = serde_json::from_str(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON: {}", e)))?;
    let diagram = read_diagram(&value)?;
    if diagram.is_empty() {
        return Err(GenerationError::EmptyDiagram.into());
    }

    let model = resolve(&diagram);
    let diagnostics: Vec<String> = model.diagnostics.iter().map(|d| d.to_string()).collect();

    Ok(Json(serde_json::json!({
        "ok": true,
        "tables": diagram.tables.len(),
        "relationships": diagram.relationships.len(),
        "diagnostics": diagnostics,
    })))
}

/// Health check endpoint (liveness)
async fn health_check() -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "umlforge-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// Error handling

#[derive(Debug)]
enum AppError {
    Generation(GenerationError),
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<GenerationError> for AppError {
    fn from(e: GenerationError) -> Self {
        AppError::Generation(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Generation(e) => {
                let status = if e.is_client_error() {
                    StatusCode::BAD_REQUEST
                } else {
                    tracing::error!("Generation failed: {}", e);
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                (status, e.payload().message)
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => {
                tracing::error!("{}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (
            status,
            Json(serde_json::json!({
                "ok": false,
                "message": message,
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let empty = AppError::from(GenerationError::EmptyDiagram).into_response();
        assert_eq!(empty.status(), StatusCode::BAD_REQUEST);

        let packaging = AppError::from(GenerationError::Packaging("zip".to_string())).into_response();
        assert_eq!(packaging.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let unknown = AppError::NotFound("Unknown target 'desktop'".to_string()).into_response();
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_diagram_may_arrive_as_text() {
        let text = Value::String(
            "Here you go:\n```json\n{\"tables\":[{\"id\":\"a\",\"name\":\"Cliente\",\"columns\":[]}],\"relationships\":[]}\n```"
                .to_string(),
        );
        let diagram = read_diagram(&text).unwrap();
        assert_eq!(diagram.tables.len(), 1);
    }
}
