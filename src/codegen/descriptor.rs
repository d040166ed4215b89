//! Per-table entity descriptors produced by the relationship resolver.
//!
//! A descriptor is the structured, target-neutral view of one table: its key,
//! scalar fields, relationship fields and the lookup edges that downstream
//! emitters turn into "find by parent" operations. Every field carries its
//! type and name, so declarations and accessors are rendered from the same
//! source.

use indexmap::IndexMap;
use std::fmt;

use crate::codegen::types::{ColumnType, Ecosystem};

/// Primary key of an entity
#[derive(Debug, Clone, PartialEq)]
pub struct KeyField {
    /// Member name (`id`, `codigo`, ...)
    pub name: String,
    /// False when no column was marked `PK` and `id` was synthesized
    pub declared: bool,
    /// True when the key comes from a parent entity via inheritance
    pub inherited: bool,
}

/// A plain column rendered as a field
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    /// Member name used in code and JSON
    pub name: String,
    /// Database column name
    pub column_name: String,
    pub raw_type: String,
    pub column_type: ColumnType,
    pub not_null: bool,
    pub unique: bool,
    pub length: Option<u32>,
}

impl ScalarField {
    pub fn type_name(&self, ecosystem: Ecosystem) -> &'static str {
        self.column_type.type_name(ecosystem)
    }
}

/// How a relationship field is mapped
#[derive(Debug, Clone, PartialEq)]
pub enum RelationFieldKind {
    /// Single reference; the join column lives on this entity's table
    Reference { join_column: String, one_to_one: bool },
    /// Inverse side of a bidirectional one-to-many
    MappedCollection { mapped_by: String },
    /// Owning side of a many-to-many
    JoinTableCollection {
        join_table: String,
        join_column: String,
        inverse_join_column: String,
    },
    /// Inverse side of a many-to-many
    InverseManyToMany { mapped_by: String },
    /// Composition: children live and die with this entity
    OwnedCollection { join_column: String },
    /// Aggregation / association: non-owning collection
    SharedCollection {
        join_table: String,
        join_column: String,
        inverse_join_column: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelationField {
    pub name: String,
    pub target_table_id: String,
    pub target_entity: String,
    pub kind: RelationFieldKind,
}

impl RelationField {
    pub fn is_collection(&self) -> bool {
        !matches!(self.kind, RelationFieldKind::Reference { .. })
    }

    /// Collections whose other side points back here; they are left out of
    /// JSON so entity documents stay acyclic.
    pub fn is_back_reference(&self) -> bool {
        matches!(
            self.kind,
            RelationFieldKind::MappedCollection { .. }
                | RelationFieldKind::JoinTableCollection { .. }
                | RelationFieldKind::InverseManyToMany { .. }
        )
    }

    /// Type of the field on the server side
    pub fn server_type(&self) -> String {
        if self.is_collection() {
            format!("List<{}>", self.target_entity)
        } else {
            self.target_entity.clone()
        }
    }
}

/// "Find all children by parent id" edge recorded on the child entity
#[derive(Debug, Clone, PartialEq)]
pub struct ParentEdge {
    pub parent_table_id: String,
    pub parent_entity: String,
    /// Name used in routes, parameters and method names (`usuario`)
    pub parent_field: String,
    /// Property on the child that reaches the parent (`usuario`, `categoriaList`)
    pub property: String,
    /// Key member of the parent entity
    pub parent_key: String,
}

/// Dropdown on the create/edit form for a single reference
#[derive(Debug, Clone, PartialEq)]
pub struct FormRelation {
    /// Reference field on this entity
    pub field_name: String,
    pub target_table_id: String,
    pub target_entity: String,
    pub target_file: String,
    pub target_key: String,
}

/// Related records listed on the detail page
#[derive(Debug, Clone, PartialEq)]
pub struct DetailSubList {
    pub target_table_id: String,
    pub target_entity: String,
    pub target_file: String,
    /// Section label and state-variable stem (`postList`)
    pub label: String,
    /// `parent_field` of the matching edge on the target entity
    pub lookup_field: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityDescriptor {
    pub table_id: String,
    /// Type-name form (`OrderItem`)
    pub entity_name: String,
    /// Member-name form (`orderItem`)
    pub member_name: String,
    /// File-name form (`order_item`)
    pub file_name: String,
    pub key: KeyField,
    pub scalar_fields: Vec<ScalarField>,
    /// Scalar fields declared by ancestors, root first
    pub inherited_fields: Vec<ScalarField>,
    pub relation_fields: Vec<RelationField>,
    /// Entity name of the parent type, if this entity extends one
    pub extends: Option<String>,
    pub extends_table_id: Option<String>,
    pub has_subtypes: bool,
    pub many_to_one_edges: Vec<ParentEdge>,
    pub many_to_many_edges: Vec<ParentEdge>,
    pub form_relations: Vec<FormRelation>,
    /// Dropdowns declared by ancestors, root first
    pub inherited_form_relations: Vec<FormRelation>,
    pub detail_sub_lists: Vec<DetailSubList>,
}

impl EntityDescriptor {
    /// REST path segment (`/api/<route>`)
    pub fn route(&self) -> String {
        self.entity_name.to_lowercase()
    }

    /// Every lookup edge, many-to-one first
    pub fn parent_edges(&self) -> impl Iterator<Item = &ParentEdge> {
        self.many_to_one_edges.iter().chain(self.many_to_many_edges.iter())
    }

    /// Inherited and own scalar fields, in declaration order
    pub fn all_scalar_fields(&self) -> impl Iterator<Item = &ScalarField> {
        self.inherited_fields.iter().chain(self.scalar_fields.iter())
    }

    /// Inherited and own single references
    pub fn all_form_relations(&self) -> impl Iterator<Item = &FormRelation> {
        self.inherited_form_relations
            .iter()
            .chain(self.form_relations.iter())
    }

    /// Field a list item is labelled with: `nombre`/`name`/`titulo`/`title`
    /// if present, else the first text field, else the key.
    pub fn display_field(&self) -> String {
        const PREFERRED: &[&str] = &["nombre", "name", "titulo", "title", "descripcion", "description"];

        for preferred in PREFERRED {
            if let Some(field) = self.all_scalar_fields().find(|f| f.name.eq_ignore_ascii_case(preferred)) {
                return field.name.clone();
            }
        }
        self.all_scalar_fields()
            .find(|f| f.column_type == ColumnType::Text)
            .map(|f| f.name.clone())
            .unwrap_or_else(|| self.key.name.clone())
    }

    /// Whether the entity carries its own `@Id` (not inherited)
    pub fn declares_key(&self) -> bool {
        !self.key.inherited
    }

    pub fn is_inheritance_root(&self) -> bool {
        self.has_subtypes && self.extends.is_none()
    }
}

/// Non-fatal problems found while resolving a diagram
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    DanglingEndpoint {
        relationship_id: String,
        missing_table_id: String,
    },
    UnknownRelationshipType {
        relationship_id: String,
        kind: String,
    },
    NameCollision {
        entity: String,
        requested: String,
        assigned: String,
    },
    DuplicatePrimaryKey {
        entity: String,
        column: String,
    },
    DuplicateTableId {
        table_id: String,
    },
    UnnamedTable {
        table_id: String,
        assigned: String,
    },
    InheritanceRejected {
        relationship_id: String,
        reason: String,
    },
    /// A declared column duplicated a synthesized join column and was dropped
    JoinColumnReplaced {
        entity: String,
        column: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DanglingEndpoint { relationship_id, missing_table_id } => write!(
                f,
                "Relationship '{}' skipped: table '{}' not found",
                relationship_id, missing_table_id
            ),
            Diagnostic::UnknownRelationshipType { relationship_id, kind } => write!(
                f,
                "Relationship '{}' skipped: unknown type '{}'",
                relationship_id, kind
            ),
            Diagnostic::NameCollision { entity, requested, assigned } => write!(
                f,
                "Name '{}' already used on {}; renamed to '{}'",
                requested, entity, assigned
            ),
            Diagnostic::DuplicatePrimaryKey { entity, column } => write!(
                f,
                "{} has more than one PK column; '{}' is generated as a plain field",
                entity, column
            ),
            Diagnostic::DuplicateTableId { table_id } => {
                write!(f, "Table id '{}' appears more than once; later copies skipped", table_id)
            }
            Diagnostic::UnnamedTable { table_id, assigned } => {
                write!(f, "Table '{}' has no name; generated as '{}'", table_id, assigned)
            }
            Diagnostic::InheritanceRejected { relationship_id, reason } => {
                write!(f, "Inheritance '{}' skipped: {}", relationship_id, reason)
            }
            Diagnostic::JoinColumnReplaced { entity, column } => write!(
                f,
                "{}.{} is mapped by a relationship; the plain column is dropped",
                entity, column
            ),
        }
    }
}

/// Result of resolving one diagram: descriptors keyed by table id, in
/// diagram order, plus every diagnostic raised on the way
#[derive(Debug, Clone, Default)]
pub struct ResolvedModel {
    pub entities: IndexMap<String, EntityDescriptor>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ResolvedModel {
    pub fn entity(&self, table_id: &str) -> Option<&EntityDescriptor> {
        self.entities.get(table_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityDescriptor> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
