//! Metamodel - grammar-independent description of node shapes
//!
//! Every grammar rule is described by an [`Entity`] carrying the
//! [`Property`] and [`Relation`] declarations its nodes answer to:
//! - `Property`: scalar values (tokens, text, numbers), single or multiple
//! - `Relation`: child nodes, single or an ordered list
//!
//! Four position properties are answered by every node whatever its entity,
//! see [`COMMON_PROPERTIES`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 1-based line of the node's first token
pub const START_LINE: &str = "start_line";
/// Line on which the node's last token ends
pub const END_LINE: &str = "end_line";
/// 0-based column of the node's first token
pub const START_COLUMN: &str = "start_column";
/// Column just past the node's last token
pub const END_COLUMN: &str = "end_column";

/// Reserved property names answered before any entity lookup
pub const COMMON_PROPERTIES: [&str; 4] = [START_LINE, END_LINE, START_COLUMN, END_COLUMN];

/// Whether a property or relation holds one value or an ordered list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Multiplicity {
    Single,
    Multiple,
}

impl Multiplicity {
    pub fn from_multiple(multiple: bool) -> Self {
        if multiple {
            Multiplicity::Multiple
        } else {
            Multiplicity::Single
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Multiplicity::Single => "single",
            Multiplicity::Multiple => "multiple",
        }
    }
}

impl std::fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A declared scalar attribute of an entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Property {
    name: String,
    multiplicity: Multiplicity,
}

impl Property {
    pub fn new(name: impl Into<String>, multiplicity: Multiplicity) -> Self {
        Self {
            name: name.into(),
            multiplicity,
        }
    }

    pub fn single(name: impl Into<String>) -> Self {
        Self::new(name, Multiplicity::Single)
    }

    pub fn multiple(name: impl Into<String>) -> Self {
        Self::new(name, Multiplicity::Multiple)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn multiplicity(&self) -> Multiplicity {
        self.multiplicity
    }

    pub fn is_single(&self) -> bool {
        self.multiplicity == Multiplicity::Single
    }
}

/// A declared reference from an entity to child nodes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    name: String,
    multiplicity: Multiplicity,
    /// Entities the relation may point at (informational)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    targets: Vec<String>,
}

impl Relation {
    pub fn new(name: impl Into<String>, multiplicity: Multiplicity) -> Self {
        Self {
            name: name.into(),
            multiplicity,
            targets: Vec::new(),
        }
    }

    pub fn single(name: impl Into<String>) -> Self {
        Self::new(name, Multiplicity::Single)
    }

    pub fn multiple(name: impl Into<String>) -> Self {
        Self::new(name, Multiplicity::Multiple)
    }

    pub fn with_targets(mut self, targets: Vec<String>) -> Self {
        self.targets = targets;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn multiplicity(&self) -> Multiplicity {
        self.multiplicity
    }

    pub fn is_single(&self) -> bool {
        self.multiplicity == Multiplicity::Single
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }
}

/// The shape of one grammar rule
///
/// Declaration order of properties and relations is preserved; it is the
/// order in which source-order reconstruction visits them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    name: String,
    #[serde(default)]
    properties: Vec<Property>,
    #[serde(default)]
    relations: Vec<Relation>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
            relations: Vec::new(),
        }
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_relation(mut self, relation: Relation) -> Self {
        self.relations.push(relation);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations.iter().find(|r| r.name == name)
    }
}

/// Registry of entities keyed by rule identifier
#[derive(Debug, Clone, Default)]
pub struct Metamodel {
    entities: Vec<Entity>,
    by_rule: HashMap<String, usize>,
}

impl Metamodel {
    /// Create a new empty metamodel
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity, replacing any earlier one for the same rule
    pub fn register(&mut self, entity: Entity) {
        if let Some(&idx) = self.by_rule.get(entity.name()) {
            self.entities[idx] = entity;
        } else {
            self.by_rule.insert(entity.name().to_string(), self.entities.len());
            self.entities.push(entity);
        }
    }

    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.register(entity);
        self
    }

    /// Find the entity describing a rule
    pub fn entity(&self, rule: &str) -> Option<&Entity> {
        self.by_rule.get(rule).map(|&idx| &self.entities[idx])
    }

    /// All entities in registration order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
