//! `node-types.json` loader
//!
//! Tree-sitter grammars ship a JSON description of every node kind: its
//! fields, its unnamed children and, for supertypes, its subtypes. From it we
//! derive both the [`Metamodel`] callers see and the [`FieldTable`] concrete
//! nodes resolve names against, so the two always agree.
//!
//! Derivation rules:
//! - named, non-supertype kinds become entities
//! - a field whose possible types are all anonymous tokens is a property,
//!   any other field is a relation
//! - each named type listed under `children` is a relation named after the
//!   type (leading `_` stripped, `_children` appended when a field already
//!   has that name); a concrete kind belongs to one such relation only, and
//!   kinds listed directly win over the supertypes that also cover them
//! - kinds with neither fields nor children get a `text` property

use super::table::{FieldTable, Slot};
use crate::metamodel::{Entity, Metamodel, Multiplicity, Property, Relation};
use crate::Result;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Name of the property leaf kinds expose their text under
pub const TEXT_PROPERTY: &str = "text";

#[derive(Debug, Clone, Deserialize)]
pub struct TypeRef {
    #[serde(rename = "type")]
    pub kind: String,
    pub named: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChildInfo {
    pub multiple: bool,
    pub required: bool,
    pub types: Vec<TypeRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeTypeInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub named: bool,
    #[serde(default)]
    pub fields: BTreeMap<String, ChildInfo>,
    #[serde(default)]
    pub children: Option<ChildInfo>,
    #[serde(default)]
    pub subtypes: Option<Vec<TypeRef>>,
}

/// Parsed contents of a grammar's `node-types.json`
#[derive(Debug, Clone)]
pub struct NodeTypes {
    types: Vec<NodeTypeInfo>,
    supertypes: HashMap<String, Vec<String>>,
}

impl NodeTypes {
    pub fn parse(json: &str) -> Result<Self> {
        let types: Vec<NodeTypeInfo> = serde_json::from_str(json)?;
        let supertypes = types
            .iter()
            .filter_map(|info| {
                let subtypes = info.subtypes.as_ref()?;
                let kinds = subtypes.iter().filter(|t| t.named).map(|t| t.kind.clone()).collect();
                Some((info.kind.clone(), kinds))
            })
            .collect();
        Ok(Self { types, supertypes })
    }

    pub fn types(&self) -> &[NodeTypeInfo] {
        &self.types
    }

    pub fn is_supertype(&self, kind: &str) -> bool {
        self.supertypes.contains_key(kind)
    }

    /// Concrete kinds a (possibly super-) type stands for
    pub fn expand(&self, kind: &str) -> BTreeSet<String> {
        let mut concrete = BTreeSet::new();
        let mut seen = BTreeSet::new();
        let mut pending = vec![kind.to_string()];
        while let Some(kind) = pending.pop() {
            if !seen.insert(kind.clone()) {
                continue;
            }
            match self.supertypes.get(&kind) {
                Some(subtypes) => pending.extend(subtypes.iter().cloned()),
                None => {
                    concrete.insert(kind);
                }
            }
        }
        concrete
    }

    /// Build the metamodel and the matching field table
    pub fn derive(&self) -> (Metamodel, FieldTable) {
        let mut metamodel = Metamodel::new();
        let mut table = FieldTable::new();

        for info in self.types.iter().filter(|t| t.named && !self.is_supertype(&t.kind)) {
            let entity = self.derive_entity(info, &mut table);
            metamodel.register(entity);
        }

        (metamodel, table)
    }

    fn derive_entity(&self, info: &NodeTypeInfo, table: &mut FieldTable) -> Entity {
        let mut entity = Entity::new(&info.kind);

        for (name, field) in &info.fields {
            let multiplicity = Multiplicity::from_multiple(field.multiple);
            let tokens = field.types.iter().all(|t| !t.named);
            table.insert_field(
                &info.kind,
                name,
                Slot::Field {
                    multiple: field.multiple,
                    tokens,
                },
            );
            entity = if tokens {
                entity.with_property(Property::new(name, multiplicity))
            } else {
                entity.with_relation(Relation::new(name, multiplicity).with_targets(named_kinds(&field.types)))
            };
        }

        if let Some(children) = &info.children {
            let multiplicity = Multiplicity::from_multiple(children.multiple);
            // Concrete kinds claim their nodes before any supertype does
            let mut types: Vec<_> = children.types.iter().filter(|t| t.named).collect();
            types.sort_by_key(|t| self.is_supertype(&t.kind));

            let mut claimed: BTreeSet<String> = BTreeSet::new();
            for child in types {
                let kinds: BTreeSet<String> = self
                    .expand(&child.kind)
                    .into_iter()
                    .filter(|kind| !claimed.contains(kind))
                    .collect();
                if kinds.is_empty() {
                    continue;
                }
                claimed.extend(kinds.iter().cloned());

                let name = unique_name(&entity, child.kind.trim_start_matches('_'));
                table.insert_accessor(
                    &info.kind,
                    &name,
                    Slot::Children {
                        kinds,
                        multiple: children.multiple,
                    },
                );
                entity = entity.with_relation(
                    Relation::new(name, multiplicity).with_targets(vec![child.kind.clone()]),
                );
            }
        }

        if info.fields.is_empty() && info.children.is_none() {
            table.insert_accessor(&info.kind, TEXT_PROPERTY, Slot::Text);
            entity = entity.with_property(Property::single(TEXT_PROPERTY));
        }

        entity
    }
}

/// `base`, or `base_children` (then numbered) when a field already took it
fn unique_name(entity: &Entity, base: &str) -> String {
    let taken = |name: &str| entity.relation(name).is_some() || entity.property(name).is_some();
    if !taken(base) {
        return base.to_string();
    }
    let renamed = format!("{}_children", base);
    if !taken(&renamed) {
        return renamed;
    }
    let mut n = 2;
    while taken(&format!("{}_{}", renamed, n)) {
        n += 1;
    }
    format!("{}_{}", renamed, n)
}

fn named_kinds(types: &[TypeRef]) -> Vec<String> {
    types.iter().filter(|t| t.named).map(|t| t.kind.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NODE_TYPES: &str = r#"[
        {
            "type": "_statement",
            "named": true,
            "subtypes": [
                {"type": "expression", "named": true},
                {"type": "return_statement", "named": true}
            ]
        },
        {
            "type": "expression",
            "named": true,
            "subtypes": [
                {"type": "identifier", "named": true},
                {"type": "binary", "named": true}
            ]
        },
        {
            "type": "binary",
            "named": true,
            "fields": {
                "left": {"multiple": false, "required": true, "types": [{"type": "expression", "named": true}]},
                "operator": {"multiple": false, "required": true, "types": [{"type": "+", "named": false}, {"type": "-", "named": false}]},
                "right": {"multiple": false, "required": true, "types": [{"type": "expression", "named": true}]}
            }
        },
        {
            "type": "block",
            "named": true,
            "root": true,
            "fields": {
                "statement": {"multiple": false, "required": false, "types": [{"type": "identifier", "named": true}]}
            },
            "children": {
                "multiple": true,
                "required": false,
                "types": [
                    {"type": "_statement", "named": true},
                    {"type": "identifier", "named": true},
                    {"type": "comment", "named": true}
                ]
            }
        },
        {
            "type": "paren",
            "named": true,
            "children": {
                "multiple": false,
                "required": true,
                "types": [
                    {"type": "expression", "named": true},
                    {"type": "binary", "named": true},
                    {"type": "identifier", "named": true}
                ]
            }
        },
        {"type": "return_statement", "named": true, "fields": {}},
        {"type": "identifier", "named": true},
        {"type": "comment", "named": true, "extra": true},
        {"type": "+", "named": false},
        {"type": "-", "named": false}
    ]"#;

    #[test]
    fn test_entities_skip_supertypes_and_tokens() {
        let (metamodel, _) = NodeTypes::parse(NODE_TYPES).unwrap().derive();
        let names: Vec<_> = metamodel.entities().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["binary", "block", "paren", "return_statement", "identifier", "comment"]);
    }

    #[test]
    fn test_token_only_fields_become_properties() {
        let (metamodel, table) = NodeTypes::parse(NODE_TYPES).unwrap().derive();
        let binary = metamodel.entity("binary").unwrap();

        assert!(binary.property("operator").unwrap().is_single());
        assert_eq!(binary.relation("left").unwrap().targets(), &["expression".to_string()]);
        assert!(binary.relation("operator").is_none());
        assert!(matches!(table.field("binary", "operator"), Some(Slot::Field { tokens: true, .. })));
        assert!(matches!(table.field("binary", "left"), Some(Slot::Field { tokens: false, .. })));
    }

    #[test]
    fn test_children_become_relations_with_expanded_kinds() {
        let types = NodeTypes::parse(NODE_TYPES).unwrap();
        let (metamodel, table) = types.derive();
        let block = metamodel.entity("block").unwrap();

        let names: Vec<_> = block.relations().iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["statement", "identifier", "comment", "statement_children"]);
        assert!(block.relation("statement").unwrap().is_single());
        assert!(!block.relation("statement_children").unwrap().is_single());

        match table.accessor("block", "comment") {
            Some(Slot::Children { kinds, multiple }) => {
                assert!(*multiple);
                assert_eq!(kinds.iter().collect::<Vec<_>>(), vec!["comment"]);
            }
            other => panic!("unexpected slot {:?}", other),
        }
        let expanded: Vec<_> = types.expand("_statement").into_iter().collect();
        assert_eq!(expanded, vec!["binary", "identifier", "return_statement"]);
    }

    #[test]
    fn test_each_child_kind_has_one_relation() {
        let (metamodel, table) = NodeTypes::parse(NODE_TYPES).unwrap().derive();

        // `identifier` is listed directly, so the supertype relation leaves it out
        match table.accessor("block", "statement_children") {
            Some(Slot::Children { kinds, .. }) => {
                assert_eq!(kinds.iter().collect::<Vec<_>>(), vec!["binary", "return_statement"]);
            }
            other => panic!("unexpected slot {:?}", other),
        }

        // every kind of `expression` is already claimed
        let paren = metamodel.entity("paren").unwrap();
        let names: Vec<_> = paren.relations().iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["binary", "identifier"]);
        assert!(table.accessor("paren", "expression").is_none());
    }

    #[test]
    fn test_leaf_kinds_expose_text() {
        let (metamodel, table) = NodeTypes::parse(NODE_TYPES).unwrap().derive();

        assert!(metamodel.entity("identifier").unwrap().property(TEXT_PROPERTY).is_some());
        assert!(matches!(table.accessor("identifier", TEXT_PROPERTY), Some(Slot::Text)));
        assert!(metamodel.entity("return_statement").unwrap().property(TEXT_PROPERTY).is_some());
        assert!(metamodel.entity("binary").unwrap().property(TEXT_PROPERTY).is_none());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(NodeTypes::parse("{not json").is_err());
    }
}
