//! Reading diagrams out of files and free text.
//!
//! Diagram sources are JSON documents, YAML documents, or assistant replies
//! that embed the JSON object in prose (usually inside a fenced ```json block).

use regex::Regex;
use serde_json::Value;
use std::path::Path;
use std::sync::OnceLock;

use crate::diagram::{normalize, Diagram};
use crate::error::GenerationError;

fn fenced_block() -> &'static Regex {
    static FENCED: OnceLock<Regex> = OnceLock::new();
    FENCED.get_or_init(|| {
        Regex::new(r"(?is)```(?:json)?\s*(.*?)```").expect("fenced block pattern is valid")
    })
}

/// Locate the JSON payload inside free text.
///
/// Precedence: a fenced code block, then text that already starts with
/// `{` or `[`, then the span between the first `{` and the last `}`.
pub fn extract_json_payload(text: &str) -> Option<&str> {
    let trimmed = text.trim();

    if let Some(captures) = fenced_block().captures(trimmed) {
        if let Some(body) = captures.get(1) {
            let body = body.as_str().trim();
            if !body.is_empty() {
                return Some(body);
            }
        }
    }

    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return Some(trimmed);
    }

    let first = trimmed.find('{')?;
    let last = trimmed.rfind('}')?;
    if last > first {
        Some(&trimmed[first..=last])
    } else {
        None
    }
}

/// Parse a diagram from JSON, YAML, or text embedding a JSON object
pub fn parse_diagram_text(text: &str) -> Result<Diagram, GenerationError> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return normalize(&value);
    }

    if let Some(payload) = extract_json_payload(text) {
        if let Ok(value) = serde_json::from_str::<Value>(payload) {
            return normalize(&value);
        }
    }

    let value: Value = serde_yaml::from_str(text).map_err(|e| {
        GenerationError::Validation(format!("no JSON or YAML diagram found in input: {}", e))
    })?;
    normalize(&value)
}

/// Load a diagram from a file on disk
pub fn load_diagram<P: AsRef<Path>>(path: P) -> Result<Diagram, GenerationError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| {
        GenerationError::Validation(format!("failed to read {}: {}", path.display(), e))
    })?;
    parse_diagram_text(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_fenced_block() {
        let reply = "Aquí está el diagrama:\n```json\n{\"tables\": []}\n```\nSaludos";
        assert_eq!(extract_json_payload(reply), Some("{\"tables\": []}"));
    }

    #[test]
    fn test_extracts_brace_span() {
        let reply = "Sure! {\"tables\": [], \"relationships\": []} hope it helps";
        assert_eq!(
            extract_json_payload(reply),
            Some("{\"tables\": [], \"relationships\": []}")
        );
    }

    #[test]
    fn test_no_payload_in_plain_text() {
        assert_eq!(extract_json_payload("nothing to see here"), None);
    }

    #[test]
    fn test_parse_diagram_from_yaml() {
        let yaml = r#"
tables:
  - id: t1
    name: Usuario
    columns:
      - name: id
        type: INT
        constraints: [PK]
relationships: []
"#;
        let diagram = parse_diagram_text(yaml).unwrap();
        assert_eq!(diagram.tables[0].name, "Usuario");
        assert!(diagram.tables[0].columns[0].is_primary_key());
    }

    #[test]
    fn test_parse_diagram_from_assistant_reply() {
        let reply = "```\n{\"tables\": [{\"id\": \"a\", \"name\": \"A\"}], \"relationships\": []}\n```";
        let diagram = parse_diagram_text(reply).unwrap();
        assert_eq!(diagram.tables.len(), 1);
    }

    #[test]
    fn test_parse_rejects_prose() {
        assert!(matches!(
            parse_diagram_text("just some words"),
            Err(GenerationError::Validation(_))
        ));
    }
}
