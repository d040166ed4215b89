//! Diagram validation and normalization.
//!
//! Repairs rather than rejects: missing ids are synthesized, missing
//! collections become empty, endpoint aliases collapse into one field.
//! Only a value with no diagram shape at all is refused.

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::diagram::{Column, Diagram, Relationship, RelationshipKind, Table};
use crate::error::GenerationError;

/// Keys that may hold the table list, in lookup order
const TABLE_KEYS: &[&str] = &["tables", "components"];

/// Keys that may wrap the whole diagram (persisted group documents)
const WRAPPER_KEYS: &[&str] = &["contenidoCanvas", "diagram"];

const FROM_KEYS: &[&str] = &["fromTableId", "fromComponentId"];
const TO_KEYS: &[&str] = &["toTableId", "endComponentId", "toComponentId"];

/// Normalize a raw diagram-shaped value into a canonical [`Diagram`].
///
/// # Errors
///
/// Returns [`GenerationError::Validation`] when the value is not an object,
/// has neither a table list nor a relationship list, or when the table list
/// is not an array.
pub fn normalize(raw: &Value) -> Result<Diagram, GenerationError> {
    let root = unwrap_root(raw)?;

    let tables_value = TABLE_KEYS.iter().find_map(|key| root.get(*key));
    let relationships_value = root.get("relationships");

    if tables_value.is_none() && relationships_value.is_none() {
        return Err(GenerationError::Validation(
            "expected an object with 'tables' and 'relationships'".to_string(),
        ));
    }

    let tables = match tables_value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| normalize_table(index, item))
            .collect(),
        Some(other) => {
            return Err(GenerationError::Validation(format!(
                "'tables' must be a list, found {}",
                json_kind(other)
            )));
        }
    };

    let relationships = match relationships_value {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| normalize_relationship(index, item))
            .collect(),
        None | Some(Value::Null) => Vec::new(),
        Some(other) => {
            tracing::warn!(
                "Ignoring 'relationships': expected a list, found {}",
                json_kind(other)
            );
            Vec::new()
        }
    };

    Ok(Diagram {
        tables,
        relationships,
    })
}

fn unwrap_root(raw: &Value) -> Result<&Map<String, Value>, GenerationError> {
    let object = raw.as_object().ok_or_else(|| {
        GenerationError::Validation(format!("expected a diagram object, found {}", json_kind(raw)))
    })?;

    let has_diagram_keys =
        TABLE_KEYS.iter().any(|k| object.contains_key(*k)) || object.contains_key("relationships");
    if has_diagram_keys {
        return Ok(object);
    }

    for key in WRAPPER_KEYS {
        if let Some(Value::Object(inner)) = object.get(*key) {
            return Ok(inner);
        }
    }

    Ok(object)
}

fn normalize_table(index: usize, value: &Value) -> Option<Table> {
    let Some(object) = value.as_object() else {
        tracing::warn!("Skipping table #{}: expected an object, found {}", index, json_kind(value));
        return None;
    };

    let id = string_field(object, "id").unwrap_or_else(|| synthetic_id("table"));
    let name = string_field(object, "name").unwrap_or_default();

    let columns = match object.get("columns") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| normalize_column(&id, item))
            .collect(),
        _ => Vec::new(),
    };

    Some(Table { id, name, columns })
}

fn normalize_column(table_id: &str, value: &Value) -> Option<Column> {
    let Some(object) = value.as_object() else {
        tracing::warn!("Skipping column of table '{}': not an object", table_id);
        return None;
    };

    let constraints = match object.get("constraints") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|c| c.as_str())
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect(),
        Some(Value::String(single)) if !single.trim().is_empty() => vec![single.trim().to_string()],
        _ => Vec::new(),
    };

    Some(Column {
        id: string_field(object, "id").unwrap_or_else(|| synthetic_id("col")),
        name: string_field(object, "name").unwrap_or_default(),
        column_type: string_field(object, "type").unwrap_or_default(),
        constraints,
    })
}

fn normalize_relationship(index: usize, value: &Value) -> Option<Relationship> {
    let Some(object) = value.as_object() else {
        tracing::warn!(
            "Skipping relationship #{}: expected an object, found {}",
            index,
            json_kind(value)
        );
        return None;
    };

    let from_table_id = first_string_field(object, FROM_KEYS).unwrap_or_default();
    let to_table_id = first_string_field(object, TO_KEYS).unwrap_or_default();
    let kind = string_field(object, "type")
        .map(|raw| RelationshipKind::parse(&raw))
        .unwrap_or_else(|| RelationshipKind::Unknown(String::new()));

    Some(Relationship {
        id: string_field(object, "id").unwrap_or_else(|| synthetic_id("rel")),
        kind,
        from_table_id,
        to_table_id,
    })
}

/// Read a string-ish field; numbers are stringified, blanks count as missing
fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_string_field(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| string_field(object, key))
}

fn synthetic_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_fills_missing_ids_and_collections() {
        let diagram = normalize(&json!({
            "tables": [
                { "name": "Usuario", "columns": [{ "name": "id", "type": "INT" }] },
                { "id": "t2", "name": "Post" }
            ]
        }))
        .unwrap();

        assert_eq!(diagram.tables.len(), 2);
        assert!(diagram.tables[0].id.starts_with("table-"));
        assert!(diagram.tables[0].columns[0].id.starts_with("col-"));
        assert!(diagram.tables[0].columns[0].constraints.is_empty());
        assert!(diagram.tables[1].columns.is_empty());
        assert!(diagram.relationships.is_empty());
    }

    #[test]
    fn test_synthesized_ids_are_unique() {
        let diagram = normalize(&json!({
            "tables": [{ "name": "A" }, { "name": "B" }],
            "relationships": []
        }))
        .unwrap();
        assert_ne!(diagram.tables[0].id, diagram.tables[1].id);
    }

    #[test]
    fn test_normalize_accepts_legacy_aliases() {
        let diagram = normalize(&json!({
            "components": [{ "id": "a", "name": "A" }, { "id": "b", "name": "B" }],
            "relationships": [
                { "type": "one-to-many", "fromComponentId": "a", "endComponentId": "b" }
            ]
        }))
        .unwrap();

        assert_eq!(diagram.tables.len(), 2);
        let rel = &diagram.relationships[0];
        assert_eq!(rel.from_table_id, "a");
        assert_eq!(rel.to_table_id, "b");
        assert!(rel.id.starts_with("rel-"));
    }

    #[test]
    fn test_normalize_unwraps_persisted_group_document() {
        let diagram = normalize(&json!({
            "contenidoCanvas": {
                "tables": [{ "id": 7, "name": "Producto", "top": 50, "left": 80 }],
                "relationships": [],
                "canvasWidth": 1000
            }
        }))
        .unwrap();

        assert_eq!(diagram.tables[0].id, "7");
        assert_eq!(diagram.tables[0].name, "Producto");
    }

    #[test]
    fn test_single_string_constraint_is_accepted() {
        let diagram = normalize(&json!({
            "tables": [{ "id": "t", "name": "T", "columns": [
                { "name": "code", "type": "VARCHAR", "constraints": "PK" },
                { "name": "other", "type": "INT", "constraints": ["UNIQUE", 3, null] }
            ]}]
        }))
        .unwrap();

        let columns = &diagram.tables[0].columns;
        assert!(columns[0].is_primary_key());
        assert_eq!(columns[1].constraints, vec!["UNIQUE".to_string()]);
    }

    #[test]
    fn test_rejects_values_without_diagram_shape() {
        assert!(matches!(normalize(&json!([1, 2])), Err(GenerationError::Validation(_))));
        assert!(matches!(
            normalize(&json!({ "nodes": [] })),
            Err(GenerationError::Validation(_))
        ));
        assert!(matches!(
            normalize(&json!({ "tables": "Usuario" })),
            Err(GenerationError::Validation(_))
        ));
    }

    #[test]
    fn test_relationships_only_is_not_a_validation_error() {
        let diagram = normalize(&json!({ "relationships": [] })).unwrap();
        assert!(diagram.is_empty());
    }

    #[test]
    fn test_non_list_relationships_are_repaired() {
        let diagram = normalize(&json!({
            "tables": [{ "id": "t", "name": "T" }],
            "relationships": { "oops": true }
        }))
        .unwrap();
        assert!(diagram.relationships.is_empty());
    }

    #[test]
    fn test_missing_relationship_type_is_kept_as_unknown() {
        let diagram = normalize(&json!({
            "tables": [],
            "relationships": [{ "id": "r", "fromTableId": "a", "toTableId": "b" }]
        }))
        .unwrap();
        assert!(matches!(diagram.relationships[0].kind, RelationshipKind::Unknown(_)));
    }
}
