//! Tree-sitter grammars as metamodel sources
//!
//! Each built-in grammar derives its metamodel from `node-types.json` and
//! exposes parsed trees as [`ConcreteNode`](crate::node::ConcreteNode)s.

mod grammar;
pub mod node_types;
mod sitter;
mod table;

pub use grammar::{default_registry, Grammar, GrammarRegistry};
pub use node_types::NodeTypes;
pub use sitter::{ParsedSource, SitterNode};
pub use table::{FieldTable, Slot};
