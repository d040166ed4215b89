//! Column type mapping.
//!
//! Diagram column types are free-form SQL-ish strings ("VARCHAR(255)",
//! "int", "DECIMAL(10,2)"). They are classified once into a [`ColumnType`]
//! and each target ecosystem names that class its own way.

use regex::Regex;
use std::sync::OnceLock;

/// Target ecosystem whose type names are wanted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ecosystem {
    /// Server entities (Java / JPA)
    Server,
    /// Mobile client models (Dart)
    Client,
}

/// Abstract column class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Text,
    Decimal,
    Boolean,
    Date,
    DateTime,
}

impl ColumnType {
    /// Classify a raw type string.
    ///
    /// Case-insensitive substring checks, first match wins:
    /// INT, VARCHAR/TEXT/CHAR, DECIMAL/FLOAT/DOUBLE, BOOLEAN/BOOL,
    /// DATE without TIME, TIMESTAMP/DATETIME. Everything else is text.
    pub fn classify(raw: &str) -> Self {
        let upper = raw.to_uppercase();

        if upper.contains("INT") {
            ColumnType::Integer
        } else if upper.contains("VARCHAR") || upper.contains("TEXT") || upper.contains("CHAR") {
            ColumnType::Text
        } else if upper.contains("DECIMAL") || upper.contains("FLOAT") || upper.contains("DOUBLE") {
            ColumnType::Decimal
        } else if upper.contains("BOOL") {
            ColumnType::Boolean
        } else if upper.contains("DATE") && !upper.contains("TIME") {
            ColumnType::Date
        } else if upper.contains("TIMESTAMP") || upper.contains("DATETIME") {
            ColumnType::DateTime
        } else {
            ColumnType::Text
        }
    }

    pub fn type_name(&self, ecosystem: Ecosystem) -> &'static str {
        match ecosystem {
            Ecosystem::Server => match self {
                ColumnType::Integer => "Long",
                ColumnType::Text => "String",
                ColumnType::Decimal => "Double",
                ColumnType::Boolean => "Boolean",
                ColumnType::Date => "LocalDate",
                ColumnType::DateTime => "LocalDateTime",
            },
            Ecosystem::Client => match self {
                ColumnType::Integer => "int",
                ColumnType::Text => "String",
                ColumnType::Decimal => "double",
                ColumnType::Boolean => "bool",
                ColumnType::Date | ColumnType::DateTime => "DateTime",
            },
        }
    }
}

/// Map a raw column type to a target type name. Never returns an empty string.
pub fn map_type(raw: Option<&str>, ecosystem: Ecosystem) -> &'static str {
    ColumnType::classify(raw.unwrap_or_default()).type_name(ecosystem)
}

/// Import a server type needs, if any
pub fn server_import(column_type: ColumnType) -> Option<&'static str> {
    match column_type {
        ColumnType::Date => Some("java.time.LocalDate"),
        ColumnType::DateTime => Some("java.time.LocalDateTime"),
        _ => None,
    }
}

fn length_pattern() -> &'static Regex {
    static LENGTH: OnceLock<Regex> = OnceLock::new();
    LENGTH.get_or_init(|| Regex::new(r"(?i)CHAR\s*\(\s*(\d+)\s*\)").expect("length pattern is valid"))
}

/// Declared length of a character type: `VARCHAR(120)` -> `Some(120)`
pub fn declared_length(raw: &str) -> Option<u32> {
    length_pattern()
        .captures(raw)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence() {
        assert_eq!(ColumnType::classify("INT"), ColumnType::Integer);
        assert_eq!(ColumnType::classify("bigint"), ColumnType::Integer);
        assert_eq!(ColumnType::classify("VARCHAR(255)"), ColumnType::Text);
        assert_eq!(ColumnType::classify("char(2)"), ColumnType::Text);
        assert_eq!(ColumnType::classify("DECIMAL(10,2)"), ColumnType::Decimal);
        assert_eq!(ColumnType::classify("double precision"), ColumnType::Decimal);
        assert_eq!(ColumnType::classify("BOOLEAN"), ColumnType::Boolean);
        assert_eq!(ColumnType::classify("Date"), ColumnType::Date);
        assert_eq!(ColumnType::classify("DATETIME"), ColumnType::DateTime);
        assert_eq!(ColumnType::classify("timestamp"), ColumnType::DateTime);
        assert_eq!(ColumnType::classify("UUID"), ColumnType::Text);
    }

    #[test]
    fn test_ecosystems_differ_in_names_only() {
        assert_eq!(map_type(Some("INT"), Ecosystem::Server), "Long");
        assert_eq!(map_type(Some("INT"), Ecosystem::Client), "int");
        assert_eq!(map_type(Some("DATE"), Ecosystem::Server), "LocalDate");
        assert_eq!(map_type(Some("DATE"), Ecosystem::Client), "DateTime");
        assert_eq!(map_type(Some("float"), Ecosystem::Client), "double");
    }

    #[test]
    fn test_mapping_is_total() {
        for raw in [None, Some(""), Some("   "), Some("geometry"), Some("¿?")] {
            for ecosystem in [Ecosystem::Server, Ecosystem::Client] {
                let mapped = map_type(raw, ecosystem);
                assert!(!mapped.is_empty());
                assert_eq!(mapped, "String");
            }
        }
    }

    #[test]
    fn test_declared_length() {
        assert_eq!(declared_length("VARCHAR(255)"), Some(255));
        assert_eq!(declared_length("varchar ( 40 )"), Some(40));
        assert_eq!(declared_length("TEXT"), None);
        assert_eq!(declared_length("DECIMAL(10,2)"), None);
    }

    #[test]
    fn test_server_imports() {
        assert_eq!(server_import(ColumnType::Date), Some("java.time.LocalDate"));
        assert_eq!(server_import(ColumnType::Integer), None);
    }
}
