//! Diagram model consumed by the generator.
//!
//! A diagram arrives from loosely-typed producers (the canvas editor, the AI
//! assistant, previously persisted group documents). [`normalize`] turns any
//! of those shapes into the canonical [`Diagram`] below; nothing downstream
//! special-cases legacy field names again.

pub mod extract;
pub mod normalize;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use extract::{extract_json_payload, load_diagram, parse_diagram_text};
pub use normalize::normalize;

/// Root value: tables plus typed relationships
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    pub tables: Vec<Table>,
    pub relationships: Vec<Relationship>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub id: String,
    pub name: String,
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    pub constraints: Vec<String>,
}

impl Column {
    /// Case-insensitive constraint lookup ("PK", "NOT NULL", "UNIQUE", ...)
    pub fn has_constraint(&self, constraint: &str) -> bool {
        self.constraints
            .iter()
            .any(|c| c.trim().eq_ignore_ascii_case(constraint))
    }

    pub fn is_primary_key(&self) -> bool {
        self.has_constraint("PK") || self.has_constraint("PRIMARY KEY")
    }

    pub fn is_not_null(&self) -> bool {
        self.has_constraint("NOT NULL")
    }

    pub fn is_unique(&self) -> bool {
        self.has_constraint("UNIQUE")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RelationshipKind,
    pub from_table_id: String,
    pub to_table_id: String,
}

/// Relationship type as drawn on the canvas
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RelationshipKind {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
    Inheritance,
    Composition,
    Aggregation,
    Association,
    /// Anything else; kept so the resolver can report it
    Unknown(String),
}

impl RelationshipKind {
    /// Parse a relationship type string.
    ///
    /// Matching is case-insensitive and treats `_` and spaces like `-`,
    /// so `"One_To_Many"` and `"one to many"` both mean one-to-many.
    pub fn parse(raw: &str) -> Self {
        let normalized: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '_' || c == ' ' { '-' } else { c })
            .collect();

        match normalized.as_str() {
            "one-to-one" => RelationshipKind::OneToOne,
            "one-to-many" => RelationshipKind::OneToMany,
            "many-to-one" => RelationshipKind::ManyToOne,
            "many-to-many" => RelationshipKind::ManyToMany,
            "inheritance" | "generalization" => RelationshipKind::Inheritance,
            "composition" => RelationshipKind::Composition,
            "aggregation" => RelationshipKind::Aggregation,
            "association" => RelationshipKind::Association,
            _ => RelationshipKind::Unknown(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RelationshipKind::OneToOne => "one-to-one",
            RelationshipKind::OneToMany => "one-to-many",
            RelationshipKind::ManyToOne => "many-to-one",
            RelationshipKind::ManyToMany => "many-to-many",
            RelationshipKind::Inheritance => "inheritance",
            RelationshipKind::Composition => "composition",
            RelationshipKind::Aggregation => "aggregation",
            RelationshipKind::Association => "association",
            RelationshipKind::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for RelationshipKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RelationshipKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(RelationshipKind::parse(&raw))
    }
}

impl Diagram {
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_kind_parsing() {
        assert_eq!(RelationshipKind::parse("one-to-many"), RelationshipKind::OneToMany);
        assert_eq!(RelationshipKind::parse("Many_To_One"), RelationshipKind::ManyToOne);
        assert_eq!(RelationshipKind::parse(" many to many "), RelationshipKind::ManyToMany);
        assert_eq!(RelationshipKind::parse("generalization"), RelationshipKind::Inheritance);
        assert_eq!(
            RelationshipKind::parse("orbits"),
            RelationshipKind::Unknown("orbits".to_string())
        );
    }

    #[test]
    fn test_relationship_kind_serde() {
        let rel: Relationship = serde_json::from_value(serde_json::json!({
            "id": "r1",
            "type": "composition",
            "fromTableId": "a",
            "toTableId": "b"
        }))
        .unwrap();
        assert_eq!(rel.kind, RelationshipKind::Composition);

        let back = serde_json::to_value(&rel).unwrap();
        assert_eq!(back["type"], "composition");
        assert_eq!(back["fromTableId"], "a");
    }

    #[test]
    fn test_constraints_are_case_insensitive() {
        let column = Column {
            id: "c1".to_string(),
            name: "email".to_string(),
            column_type: "VARCHAR(100)".to_string(),
            constraints: vec!["pk".to_string(), "Not Null".to_string()],
        };
        assert!(column.is_primary_key());
        assert!(column.is_not_null());
        assert!(!column.is_unique());
    }
}
