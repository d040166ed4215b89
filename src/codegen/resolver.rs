//! Relationship resolution.
//!
//! Turns a normalized [`Diagram`] into one [`EntityDescriptor`] per table.
//! Each relationship contributes fields to both endpoints at once, so the
//! emitters never have to look at the raw relationship list. All naming
//! state lives in the builders of a single call; nothing leaks between
//! requests.

use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

use crate::codegen::descriptor::{
    DetailSubList, Diagnostic, EntityDescriptor, FormRelation, KeyField, ParentEdge,
    RelationField, RelationFieldKind, ResolvedModel, ScalarField,
};
use crate::codegen::types::{declared_length, ColumnType};
use crate::codegen::utils::{to_file_name, to_member_name, to_type_name};
use crate::diagram::{Column, Diagram, Relationship, RelationshipKind, Table};

/// Identifiers that cannot be used as member names in either target language
const RESERVED_WORDS: &[&str] = &[
    "abstract", "as", "assert", "boolean", "break", "byte", "case", "catch", "char", "class",
    "const", "continue", "default", "do", "double", "dynamic", "else", "enum", "extends",
    "false", "final", "finally", "float", "for", "goto", "if", "implements", "import", "in",
    "instanceof", "int", "interface", "is", "late", "long", "native", "new", "null", "package",
    "private", "protected", "public", "required", "return", "short", "static", "super",
    "switch", "synchronized", "this", "throw", "throws", "transient", "true", "try", "var",
    "void", "volatile", "while", "with",
];

/// Resolve every relationship of `diagram` into per-entity descriptors.
///
/// Never fails: dangling endpoints, unknown relationship types, name
/// collisions and rejected inheritance edges become [`Diagnostic`]s.
pub fn resolve(diagram: &Diagram) -> ResolvedModel {
    let mut diagnostics = Vec::new();
    let mut builders: IndexMap<String, EntityBuilder> = IndexMap::new();
    let mut entity_names: HashSet<String> = HashSet::new();

    for table in &diagram.tables {
        if builders.contains_key(&table.id) {
            report(
                &mut diagnostics,
                Diagnostic::DuplicateTableId {
                    table_id: table.id.clone(),
                },
            );
            continue;
        }
        let builder = EntityBuilder::from_table(table, &mut entity_names, &mut diagnostics);
        builders.insert(table.id.clone(), builder);
    }

    // Type hierarchies first, so every member name claimed afterwards is
    // checked against the whole family
    let (inheritance, others): (Vec<&Relationship>, Vec<&Relationship>) = diagram
        .relationships
        .iter()
        .partition(|r| r.kind == RelationshipKind::Inheritance);
    for relationship in inheritance {
        apply_relationship(relationship, &mut builders, &mut diagnostics);
    }
    reconcile_inherited_members(&mut builders, &mut diagnostics);
    for relationship in others {
        apply_relationship(relationship, &mut builders, &mut diagnostics);
    }

    let entities = finalize(builders);
    tracing::debug!(
        "Resolved {} entities ({} diagnostics)",
        entities.len(),
        diagnostics.len()
    );

    ResolvedModel {
        entities,
        diagnostics,
    }
}

fn report(diagnostics: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
    tracing::warn!("{}", diagnostic);
    diagnostics.push(diagnostic);
}

/// Names of a table captured before its builder is mutably borrowed
#[derive(Debug, Clone)]
struct Endpoint {
    table_id: String,
    entity_name: String,
    member_name: String,
    file_name: String,
}

struct EntityBuilder {
    descriptor: EntityDescriptor,
    /// Member names taken on this entity (key, columns, relation fields)
    members: HashSet<String>,
    /// `parent_field` names taken by lookup edges
    lookups: HashSet<String>,
}

impl EntityBuilder {
    fn from_table(
        table: &Table,
        entity_names: &mut HashSet<String>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Self {
        let mut requested = to_type_name(&table.name);
        if requested.is_empty() {
            requested = fallback_entity_name(&table.id);
            report(
                diagnostics,
                Diagnostic::UnnamedTable {
                    table_id: table.id.clone(),
                    assigned: requested.clone(),
                },
            );
        }

        // Routes and file names are case-insensitive, so entity names are too
        let mut entity_name = requested.clone();
        let mut n = 2;
        while entity_names.contains(&entity_name.to_lowercase()) {
            entity_name = format!("{}{}", requested, n);
            n += 1;
        }
        entity_names.insert(entity_name.to_lowercase());
        if entity_name != requested {
            report(
                diagnostics,
                Diagnostic::NameCollision {
                    entity: "the diagram".to_string(),
                    requested,
                    assigned: entity_name.clone(),
                },
            );
        }

        let mut builder = EntityBuilder {
            descriptor: EntityDescriptor {
                table_id: table.id.clone(),
                member_name: escape_reserved(to_member_name(&entity_name)),
                file_name: to_file_name(&entity_name),
                entity_name,
                key: KeyField {
                    name: "id".to_string(),
                    declared: false,
                    inherited: false,
                },
                scalar_fields: Vec::new(),
                inherited_fields: Vec::new(),
                relation_fields: Vec::new(),
                extends: None,
                extends_table_id: None,
                has_subtypes: false,
                many_to_one_edges: Vec::new(),
                many_to_many_edges: Vec::new(),
                form_relations: Vec::new(),
                inherited_form_relations: Vec::new(),
                detail_sub_lists: Vec::new(),
            },
            members: HashSet::new(),
            lookups: HashSet::new(),
        };

        let pk_index = table.columns.iter().position(|c| c.is_primary_key());
        if let Some(index) = pk_index {
            builder.descriptor.key.name = column_member(&table.columns[index], index);
            builder.descriptor.key.declared = true;
        }
        builder.members.insert(builder.descriptor.key.name.clone());

        for (index, column) in table.columns.iter().enumerate() {
            if Some(index) == pk_index {
                continue;
            }
            if column.is_primary_key() {
                report(
                    diagnostics,
                    Diagnostic::DuplicatePrimaryKey {
                        entity: builder.descriptor.entity_name.clone(),
                        column: column.name.clone(),
                    },
                );
            }

            let name = builder.claim(&column_member(column, index), diagnostics);
            builder.descriptor.scalar_fields.push(ScalarField {
                column_name: to_file_name(&name),
                name,
                raw_type: column.column_type.clone(),
                column_type: ColumnType::classify(&column.column_type),
                not_null: column.is_not_null(),
                unique: column.is_unique(),
                length: declared_length(&column.column_type),
            });
        }

        builder
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint {
            table_id: self.descriptor.table_id.clone(),
            entity_name: self.descriptor.entity_name.clone(),
            member_name: self.descriptor.member_name.clone(),
            file_name: self.descriptor.file_name.clone(),
        }
    }

    /// Reserve a member name, suffixing `2`, `3`, ... on collision
    fn claim(&mut self, requested: &str, diagnostics: &mut Vec<Diagnostic>) -> String {
        self.claim_avoiding(requested, &HashSet::new(), diagnostics)
    }

    /// [`claim`](Self::claim), also treating `reserved` as taken
    fn claim_avoiding(
        &mut self,
        requested: &str,
        reserved: &HashSet<String>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> String {
        let taken: HashSet<String> = self.members.union(reserved).cloned().collect();
        let assigned = unique_name(requested, &taken);
        if assigned != requested {
            report(
                diagnostics,
                Diagnostic::NameCollision {
                    entity: self.descriptor.entity_name.clone(),
                    requested: requested.to_string(),
                    assigned: assigned.clone(),
                },
            );
        }
        self.members.insert(assigned.clone());
        assigned
    }

    /// Reserve a lookup route name (`/by-<name>/{id}`)
    fn claim_lookup(&mut self, requested: &str, diagnostics: &mut Vec<Diagnostic>) -> String {
        let assigned = unique_name(requested, &self.lookups);
        if assigned != requested {
            report(
                diagnostics,
                Diagnostic::NameCollision {
                    entity: self.descriptor.entity_name.clone(),
                    requested: format!("by-{}", requested),
                    assigned: format!("by-{}", assigned),
                },
            );
        }
        self.lookups.insert(assigned.clone());
        assigned
    }
}

/// Ancestor table ids, nearest first
fn ancestor_chain<F>(table_id: &str, parent_of: F) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut ancestors = Vec::new();
    let mut cursor = parent_of(table_id);
    while let Some(id) = cursor {
        cursor = parent_of(&id);
        ancestors.push(id);
    }
    ancestors
}

fn builder_ancestors(builders: &IndexMap<String, EntityBuilder>, table_id: &str) -> Vec<String> {
    ancestor_chain(table_id, |id| {
        builders
            .get(id)
            .and_then(|b| b.descriptor.extends_table_id.clone())
    })
}

/// Member names used by the ancestors and descendants of `table_id`
fn family_members(builders: &IndexMap<String, EntityBuilder>, table_id: &str) -> HashSet<String> {
    let mut family = builder_ancestors(builders, table_id);
    family.extend(
        builders
            .keys()
            .filter(|id| builder_ancestors(builders, id.as_str()).iter().any(|a| a == table_id))
            .cloned(),
    );
    family
        .iter()
        .flat_map(|id| builders[id.as_str()].members.iter().cloned())
        .collect()
}

/// Reserve a member name on `table_id` that is also free across its type family
fn claim_member(
    builders: &mut IndexMap<String, EntityBuilder>,
    table_id: &str,
    requested: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> String {
    let reserved = family_members(builders, table_id);
    builders[table_id].claim_avoiding(requested, &reserved, diagnostics)
}

/// Rename subtype columns that reuse a member name of an ancestor.
///
/// Subtypes are visited root-most first, so a renamed field is already in
/// place when its own descendants are checked.
fn reconcile_inherited_members(
    builders: &mut IndexMap<String, EntityBuilder>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let mut subtypes: Vec<(usize, String)> = builders
        .keys()
        .map(|id| (builder_ancestors(builders, id.as_str()).len(), id.clone()))
        .filter(|(depth, _)| *depth > 0)
        .collect();
    subtypes.sort_by_key(|(depth, _)| *depth);

    for (_, id) in subtypes {
        let inherited: HashSet<String> = builder_ancestors(builders, &id)
            .iter()
            .flat_map(|ancestor| builders[ancestor.as_str()].members.iter().cloned())
            .collect();

        let builder = &mut builders[id.as_str()];
        for index in 0..builder.descriptor.scalar_fields.len() {
            let requested = builder.descriptor.scalar_fields[index].name.clone();
            if !inherited.contains(&requested) {
                continue;
            }
            builder.members.remove(&requested);
            let assigned = builder.claim_avoiding(&requested, &inherited, diagnostics);

            let field = &mut builder.descriptor.scalar_fields[index];
            field.column_name = to_file_name(&assigned);
            field.name = assigned;
        }
    }
}

/// Drop an own column that a relationship now maps as its join column
fn replace_declared_join_column(
    builder: &mut EntityBuilder,
    join_column: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let Some(index) = builder
        .descriptor
        .scalar_fields
        .iter()
        .position(|f| f.column_name == join_column)
    else {
        return;
    };

    let field = builder.descriptor.scalar_fields.remove(index);
    builder.members.remove(&field.name);
    report(
        diagnostics,
        Diagnostic::JoinColumnReplaced {
            entity: builder.descriptor.entity_name.clone(),
            column: field.column_name,
        },
    );
}

fn unique_name(requested: &str, used: &HashSet<String>) -> String {
    if !used.contains(requested) {
        return requested.to_string();
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}{}", requested, n);
        if !used.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn escape_reserved(name: String) -> String {
    if RESERVED_WORDS.contains(&name.as_str()) {
        format!("{}Value", name)
    } else {
        name
    }
}

fn column_member(column: &Column, index: usize) -> String {
    let name = to_member_name(&column.name);
    if name.is_empty() {
        format!("column{}", index + 1)
    } else {
        escape_reserved(name)
    }
}

/// `Table` followed by the last four alphanumerics of the table id
fn fallback_entity_name(table_id: &str) -> String {
    let chars: Vec<char> = table_id.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    to_type_name(&format!("Table{}", tail))
}

fn apply_relationship(
    relationship: &Relationship,
    builders: &mut IndexMap<String, EntityBuilder>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if let RelationshipKind::Unknown(raw) = &relationship.kind {
        report(
            diagnostics,
            Diagnostic::UnknownRelationshipType {
                relationship_id: relationship.id.clone(),
                kind: raw.clone(),
            },
        );
        return;
    }

    let mut endpoints = Vec::with_capacity(2);
    for table_id in [&relationship.from_table_id, &relationship.to_table_id] {
        match builders.get(table_id) {
            Some(builder) => endpoints.push(builder.endpoint()),
            None => {
                report(
                    diagnostics,
                    Diagnostic::DanglingEndpoint {
                        relationship_id: relationship.id.clone(),
                        missing_table_id: table_id.clone(),
                    },
                );
                return;
            }
        }
    }
    let (from, to) = (&endpoints[0], &endpoints[1]);

    match relationship.kind {
        RelationshipKind::OneToOne => link_one_to_one(from, to, builders, diagnostics),
        RelationshipKind::OneToMany => link_parent_child(from, to, builders, diagnostics),
        RelationshipKind::ManyToOne => link_parent_child(to, from, builders, diagnostics),
        RelationshipKind::ManyToMany => link_many_to_many(from, to, builders, diagnostics),
        RelationshipKind::Inheritance => {
            link_inheritance(&relationship.id, from, to, builders, diagnostics)
        }
        RelationshipKind::Composition => link_composition(from, to, builders, diagnostics),
        RelationshipKind::Aggregation | RelationshipKind::Association => {
            link_shared(from, to, builders, diagnostics)
        }
        RelationshipKind::Unknown(_) => {}
    }
}

fn join_column(field: &str) -> String {
    format!("{}_id", to_file_name(field))
}

/// Join-table columns for `owner` -> `target`; self links get a distinct inverse column
fn join_table_columns(owner: &Endpoint, target: &Endpoint) -> (String, String) {
    let join = format!("{}_id", owner.file_name);
    let inverse = format!("{}_id", target.file_name);
    if join == inverse {
        (join, format!("related_{}_id", target.file_name))
    } else {
        (join, inverse)
    }
}

/// `from` holds a single reference to `to`
fn link_one_to_one(
    from: &Endpoint,
    to: &Endpoint,
    builders: &mut IndexMap<String, EntityBuilder>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let field = claim_member(builders, &from.table_id, &to.member_name, diagnostics);
    let owner = &mut builders[from.table_id.as_str()];
    let column = join_column(&field);
    replace_declared_join_column(owner, &column, diagnostics);

    owner.descriptor.relation_fields.push(RelationField {
        name: field.clone(),
        target_table_id: to.table_id.clone(),
        target_entity: to.entity_name.clone(),
        kind: RelationFieldKind::Reference {
            join_column: column,
            one_to_one: true,
        },
    });
    owner.descriptor.form_relations.push(FormRelation {
        field_name: field,
        target_table_id: to.table_id.clone(),
        target_entity: to.entity_name.clone(),
        target_file: to.file_name.clone(),
        target_key: String::new(),
    });
}

/// One `parent` has many `child` records; the join column lives on the child
fn link_parent_child(
    parent: &Endpoint,
    child: &Endpoint,
    builders: &mut IndexMap<String, EntityBuilder>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let reference = claim_member(builders, &child.table_id, &parent.member_name, diagnostics);
    let child_builder = &mut builders[child.table_id.as_str()];
    let lookup = child_builder.claim_lookup(&reference, diagnostics);
    let column = join_column(&reference);
    replace_declared_join_column(child_builder, &column, diagnostics);

    child_builder.descriptor.relation_fields.push(RelationField {
        name: reference.clone(),
        target_table_id: parent.table_id.clone(),
        target_entity: parent.entity_name.clone(),
        kind: RelationFieldKind::Reference {
            join_column: column,
            one_to_one: false,
        },
    });
    child_builder.descriptor.many_to_one_edges.push(ParentEdge {
        parent_table_id: parent.table_id.clone(),
        parent_entity: parent.entity_name.clone(),
        parent_field: lookup.clone(),
        property: reference.clone(),
        parent_key: String::new(),
    });
    child_builder.descriptor.form_relations.push(FormRelation {
        field_name: reference.clone(),
        target_table_id: parent.table_id.clone(),
        target_entity: parent.entity_name.clone(),
        target_file: parent.file_name.clone(),
        target_key: String::new(),
    });

    let collection = claim_member(
        builders,
        &parent.table_id,
        &format!("{}List", child.member_name),
        diagnostics,
    );
    let parent_builder = &mut builders[parent.table_id.as_str()];

    parent_builder.descriptor.relation_fields.push(RelationField {
        name: collection.clone(),
        target_table_id: child.table_id.clone(),
        target_entity: child.entity_name.clone(),
        kind: RelationFieldKind::MappedCollection {
            mapped_by: reference,
        },
    });
    parent_builder.descriptor.detail_sub_lists.push(DetailSubList {
        target_table_id: child.table_id.clone(),
        target_entity: child.entity_name.clone(),
        target_file: child.file_name.clone(),
        label: collection,
        lookup_field: lookup,
    });
}

/// `from` owns the join table; both sides can list the other by id
fn link_many_to_many(
    from: &Endpoint,
    to: &Endpoint,
    builders: &mut IndexMap<String, EntityBuilder>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let requested = format!("{}List", to.member_name);
    let owner_collection = claim_member(builders, &from.table_id, &requested, diagnostics);
    let join_table = if owner_collection == requested {
        format!("{}_{}", from.file_name, to.file_name)
    } else {
        format!("{}_{}", from.file_name, to_file_name(&owner_collection))
    };
    let (join, inverse) = join_table_columns(from, to);

    let inverse_collection = claim_member(
        builders,
        &to.table_id,
        &format!("{}List", from.member_name),
        diagnostics,
    );
    let target_builder = &mut builders[to.table_id.as_str()];
    let target_lookup = target_builder.claim_lookup(&from.member_name, diagnostics);

    target_builder.descriptor.relation_fields.push(RelationField {
        name: inverse_collection.clone(),
        target_table_id: from.table_id.clone(),
        target_entity: from.entity_name.clone(),
        kind: RelationFieldKind::InverseManyToMany {
            mapped_by: owner_collection.clone(),
        },
    });
    target_builder.descriptor.many_to_many_edges.push(ParentEdge {
        parent_table_id: from.table_id.clone(),
        parent_entity: from.entity_name.clone(),
        parent_field: target_lookup.clone(),
        property: inverse_collection.clone(),
        parent_key: String::new(),
    });

    let owner_builder = &mut builders[from.table_id.as_str()];
    let owner_lookup = owner_builder.claim_lookup(&to.member_name, diagnostics);

    owner_builder.descriptor.relation_fields.push(RelationField {
        name: owner_collection.clone(),
        target_table_id: to.table_id.clone(),
        target_entity: to.entity_name.clone(),
        kind: RelationFieldKind::JoinTableCollection {
            join_table,
            join_column: join,
            inverse_join_column: inverse,
        },
    });
    owner_builder.descriptor.many_to_many_edges.push(ParentEdge {
        parent_table_id: to.table_id.clone(),
        parent_entity: to.entity_name.clone(),
        parent_field: owner_lookup.clone(),
        property: owner_collection.clone(),
        parent_key: String::new(),
    });
    owner_builder.descriptor.detail_sub_lists.push(DetailSubList {
        target_table_id: to.table_id.clone(),
        target_entity: to.entity_name.clone(),
        target_file: to.file_name.clone(),
        label: owner_collection,
        lookup_field: target_lookup,
    });

    builders[to.table_id.as_str()]
        .descriptor
        .detail_sub_lists
        .push(DetailSubList {
            target_table_id: from.table_id.clone(),
            target_entity: from.entity_name.clone(),
            target_file: from.file_name.clone(),
            label: inverse_collection,
            lookup_field: owner_lookup,
        });
}

/// `from` (the whole) owns its `to` parts
fn link_composition(
    from: &Endpoint,
    to: &Endpoint,
    builders: &mut IndexMap<String, EntityBuilder>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let collection = claim_member(
        builders,
        &from.table_id,
        &format!("{}List", to.member_name),
        diagnostics,
    );
    let column = format!("{}_id", from.file_name);
    if from.table_id != to.table_id {
        replace_declared_join_column(&mut builders[to.table_id.as_str()], &column, diagnostics);
    }

    builders[from.table_id.as_str()]
        .descriptor
        .relation_fields
        .push(RelationField {
            name: collection,
            target_table_id: to.table_id.clone(),
            target_entity: to.entity_name.clone(),
            kind: RelationFieldKind::OwnedCollection { join_column: column },
        });
}

/// Aggregation and association: a non-owning collection through a join table
fn link_shared(
    from: &Endpoint,
    to: &Endpoint,
    builders: &mut IndexMap<String, EntityBuilder>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let (join, inverse) = join_table_columns(from, to);
    let collection = claim_member(
        builders,
        &from.table_id,
        &format!("{}List", to.member_name),
        diagnostics,
    );
    let aggregate = &mut builders[from.table_id.as_str()];

    aggregate.descriptor.relation_fields.push(RelationField {
        target_table_id: to.table_id.clone(),
        target_entity: to.entity_name.clone(),
        kind: RelationFieldKind::SharedCollection {
            join_table: format!("{}_{}", from.file_name, to_file_name(&collection)),
            join_column: join,
            inverse_join_column: inverse,
        },
        name: collection,
    });
}

/// `from` extends `to`
fn link_inheritance(
    relationship_id: &str,
    from: &Endpoint,
    to: &Endpoint,
    builders: &mut IndexMap<String, EntityBuilder>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let reject = |diagnostics: &mut Vec<Diagnostic>, reason: String| {
        report(
            diagnostics,
            Diagnostic::InheritanceRejected {
                relationship_id: relationship_id.to_string(),
                reason,
            },
        );
    };

    if from.table_id == to.table_id {
        reject(diagnostics, format!("{} cannot extend itself", from.entity_name));
        return;
    }

    if let Some(existing) = &builders[from.table_id.as_str()].descriptor.extends {
        reject(
            diagnostics,
            format!("{} already extends {}", from.entity_name, existing),
        );
        return;
    }

    let mut cursor = Some(to.table_id.clone());
    while let Some(id) = cursor {
        if id == from.table_id {
            reject(
                diagnostics,
                format!(
                    "{} extending {} would form a cycle",
                    from.entity_name, to.entity_name
                ),
            );
            return;
        }
        cursor = builders
            .get(&id)
            .and_then(|b| b.descriptor.extends_table_id.clone());
    }

    let child = &mut builders[from.table_id.as_str()].descriptor;
    child.extends = Some(to.entity_name.clone());
    child.extends_table_id = Some(to.table_id.clone());
    builders[to.table_id.as_str()].descriptor.has_subtypes = true;
}

/// Second pass: inherited keys and fields, then parent keys on edges and dropdowns
fn finalize(builders: IndexMap<String, EntityBuilder>) -> IndexMap<String, EntityDescriptor> {
    let mut entities: IndexMap<String, EntityDescriptor> = builders
        .into_iter()
        .map(|(id, builder)| (id, builder.descriptor))
        .collect();

    let ids: Vec<String> = entities.keys().cloned().collect();
    for id in &ids {
        let ancestors = ancestors_of(&entities, id);
        let Some(root) = ancestors.last() else {
            continue;
        };

        let root_key = entities[root.as_str()].key.clone();
        let inherited: Vec<ScalarField> = ancestors
            .iter()
            .rev()
            .flat_map(|ancestor| entities[ancestor.as_str()].scalar_fields.clone())
            .collect();

        let entity = &mut entities[id.as_str()];
        entity.key = KeyField {
            inherited: true,
            ..root_key
        };
        entity.inherited_fields = inherited;
    }

    let keys: HashMap<String, String> = entities
        .iter()
        .map(|(id, entity)| (id.clone(), entity.key.name.clone()))
        .collect();
    let key_of = |table_id: &str| keys.get(table_id).cloned().unwrap_or_else(|| "id".to_string());

    for entity in entities.values_mut() {
        for edge in entity
            .many_to_one_edges
            .iter_mut()
            .chain(entity.many_to_many_edges.iter_mut())
        {
            edge.parent_key = key_of(&edge.parent_table_id);
        }
        for form in entity.form_relations.iter_mut() {
            form.target_key = key_of(&form.target_table_id);
        }
    }

    for id in &ids {
        let inherited: Vec<FormRelation> = ancestors_of(&entities, id)
            .iter()
            .rev()
            .flat_map(|ancestor| entities[ancestor.as_str()].form_relations.clone())
            .collect();
        entities[id.as_str()].inherited_form_relations = inherited;
    }

    entities
}

fn ancestors_of(entities: &IndexMap<String, EntityDescriptor>, table_id: &str) -> Vec<String> {
    ancestor_chain(table_id, |id| {
        entities.get(id).and_then(|e| e.extends_table_id.clone())
    })
}
