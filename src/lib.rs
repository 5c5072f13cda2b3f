//! # Treeplus - grammar-independent elements over parse trees
//!
//! Exposes concrete, grammar-specific parse-tree nodes through one uniform
//! [`Element`] interface described by an abstract metamodel of
//! entities, properties and relations.
//!
//! Treeplus provides:
//! - A metamodel (`Entity`, `Property`, `Relation`) derived from tree-sitter `node-types.json`
//! - A node adapter answering property, relation and position queries
//! - Source-order reconstruction of every value a node holds
//! - Tree-sitter grammars for Python, JavaScript, Rust and Go

pub mod metamodel;
pub mod node;
pub mod model;
pub mod adapter;
pub mod mapper;
pub mod language;
pub mod render;
pub mod scan;
pub mod output;
pub mod config;
pub mod ui;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for convenient access
pub use metamodel::{Entity, Metamodel, Multiplicity, Property, Relation};
pub use node::{ConcreteNode, Interval, Raw, Token};
pub use model::{Element, ElementRef, Feature, ParentRef, Resolved, TokenValue, Value, ValueReference};
pub use adapter::NodeElement;
pub use mapper::{Mapper, Translator};
pub use language::{Grammar, GrammarRegistry, ParsedSource, SitterNode};

/// Result type alias for Treeplus operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Treeplus operations
///
/// Everything except `Parse`, `Grammar`, `Io` and `Json` signals that a
/// metamodel and the concrete grammar disagree. Those are never retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Entity {entity} declares no property named '{name}'")]
    UnknownProperty { entity: String, name: String },

    #[error("Entity {entity} declares no relation named '{name}'")]
    UnknownRelation { entity: String, name: String },

    #[error("No entity registered for rule '{0}'")]
    UnknownEntity(String),

    #[error("Rule {rule} ({interval}) has no accessor or field named '{name}'")]
    Unresolvable {
        rule: String,
        name: String,
        interval: Interval,
    },

    #[error("'{name}' on rule {rule} ({interval}) is declared {declared} but was queried as {requested}")]
    Cardinality {
        rule: String,
        name: String,
        interval: Interval,
        declared: Multiplicity,
        requested: Multiplicity,
    },

    #[error("'{name}' on rule {rule} ({interval}) resolved to {found}, expected {expected}")]
    ShapeMismatch {
        rule: String,
        name: String,
        interval: Interval,
        expected: &'static str,
        found: &'static str,
    },

    #[error("The node has no stop token. Rule: {rule}. Source interval: {interval}. Text: '{text}'. Start token: {start}")]
    MissingStopToken {
        rule: String,
        interval: Interval,
        text: String,
        start: String,
    },

    #[error("The node has no start token. Rule: {rule}. Source interval: {interval}")]
    MissingStartToken { rule: String, interval: Interval },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Grammar error: {0}")]
    Grammar(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
