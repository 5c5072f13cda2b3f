//! Per-rule field table
//!
//! Built once per grammar, keyed by rule identifier. Concrete nodes consult
//! it to know which names they answer to and what shape each name has.

use std::collections::{BTreeSet, HashMap};

/// How one name is resolved on a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// A grammar field; `tokens` when every possible value is an anonymous token
    Field { multiple: bool, tokens: bool },
    /// Named children outside any field whose kind is one of `kinds`
    Children { kinds: BTreeSet<String>, multiple: bool },
    /// The node's own text
    Text,
}

#[derive(Debug, Clone, Default)]
struct RuleSlots {
    fields: HashMap<String, Slot>,
    accessors: HashMap<String, Slot>,
}

/// Field and accessor slots of every rule of a grammar
#[derive(Debug, Clone, Default)]
pub struct FieldTable {
    rules: HashMap<String, RuleSlots>,
}

impl FieldTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_field(&mut self, rule: &str, name: &str, slot: Slot) {
        self.rules
            .entry(rule.to_string())
            .or_default()
            .fields
            .insert(name.to_string(), slot);
    }

    pub fn insert_accessor(&mut self, rule: &str, name: &str, slot: Slot) {
        self.rules
            .entry(rule.to_string())
            .or_default()
            .accessors
            .insert(name.to_string(), slot);
    }

    pub fn field(&self, rule: &str, name: &str) -> Option<&Slot> {
        self.rules.get(rule)?.fields.get(name)
    }

    pub fn accessor(&self, rule: &str, name: &str) -> Option<&Slot> {
        self.rules.get(rule)?.accessors.get(name)
    }

    /// Number of rules with at least one slot
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
