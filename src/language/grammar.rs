//! Grammar bundles
//!
//! A [`Grammar`] pairs a tree-sitter language with the metamodel and field
//! table derived from its `node-types.json`. The core adapter never sees
//! language-specific logic.

use super::node_types::NodeTypes;
use super::sitter::{ParsedSource, SitterNode};
use super::table::FieldTable;
use crate::mapper::Mapper;
use crate::metamodel::Metamodel;
use crate::{Error, Result};
use std::fmt;
use std::path::Path;
use tree_sitter::{Language, Parser};

/// A tree-sitter grammar with its derived metamodel
pub struct Grammar {
    name: String,
    extensions: Vec<String>,
    language: Language,
    metamodel: Metamodel,
    table: FieldTable,
}

impl Grammar {
    /// Create a grammar from a language and its `node-types.json` contents
    pub fn new(language: Language, name: &str, extensions: &[&str], node_types: &str) -> Result<Self> {
        let (metamodel, table) = NodeTypes::parse(node_types)
            .map_err(|e| Error::Grammar(format!("{}: invalid node types: {}", name, e)))?
            .derive();
        tracing::debug!(grammar = name, entities = metamodel.len(), "derived metamodel");

        Ok(Self {
            name: name.to_string(),
            extensions: extensions.iter().map(|s| s.to_string()).collect(),
            language,
            metamodel,
            table,
        })
    }

    pub fn python() -> Result<Self> {
        Self::new(
            tree_sitter_python::LANGUAGE.into(),
            "Python",
            &["py", "pyi"],
            tree_sitter_python::NODE_TYPES,
        )
    }

    pub fn javascript() -> Result<Self> {
        Self::new(
            tree_sitter_javascript::LANGUAGE.into(),
            "JavaScript",
            &["js", "jsx", "mjs", "cjs"],
            tree_sitter_javascript::NODE_TYPES,
        )
    }

    pub fn rust() -> Result<Self> {
        Self::new(
            tree_sitter_rust::LANGUAGE.into(),
            "Rust",
            &["rs"],
            tree_sitter_rust::NODE_TYPES,
        )
    }

    pub fn go() -> Result<Self> {
        Self::new(
            tree_sitter_go::LANGUAGE.into(),
            "Go",
            &["go"],
            tree_sitter_go::NODE_TYPES,
        )
    }

    /// Every built-in grammar
    pub fn all() -> Vec<Result<Self>> {
        vec![Self::python(), Self::javascript(), Self::rust(), Self::go()]
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn metamodel(&self) -> &Metamodel {
        &self.metamodel
    }

    pub fn table(&self) -> &FieldTable {
        &self.table
    }

    /// Check if this grammar can handle a file
    pub fn can_handle(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }

    pub fn parse(&self, content: impl Into<String>) -> Result<ParsedSource> {
        let content = content.into();
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| Error::Grammar(format!("Failed to set language {}: {}", self.name, e)))?;

        let tree = parser
            .parse(&content, None)
            .ok_or_else(|| Error::Parse(format!("{} parser produced no tree", self.name)))?;
        Ok(ParsedSource::new(tree, content))
    }

    /// Root node of a file parsed by this grammar
    pub fn root<'t>(&'t self, parsed: &'t ParsedSource) -> SitterNode<'t> {
        parsed.root(&self.table)
    }

    pub fn mapper(&self) -> Mapper<'_> {
        Mapper::new(&self.metamodel)
    }
}

impl fmt::Debug for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("name", &self.name)
            .field("extensions", &self.extensions)
            .field("entities", &self.metamodel.len())
            .finish()
    }
}

/// Registry of grammars
#[derive(Debug, Default)]
pub struct GrammarRegistry {
    grammars: Vec<Grammar>,
}

impl GrammarRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a grammar
    pub fn register(&mut self, grammar: Grammar) {
        self.grammars.push(grammar);
    }

    /// Find a grammar for a file
    pub fn find_for_path(&self, path: &Path) -> Option<&Grammar> {
        self.grammars.iter().find(|g| g.can_handle(path))
    }

    /// Find a grammar by name, ignoring case
    pub fn find_by_name(&self, name: &str) -> Option<&Grammar> {
        self.grammars.iter().find(|g| g.name.eq_ignore_ascii_case(name))
    }

    /// Get all registered grammars
    pub fn grammars(&self) -> &[Grammar] {
        &self.grammars
    }

    /// Keep only the grammars named in `names`
    pub fn retain_named(&mut self, names: &[String]) {
        self.grammars
            .retain(|g| names.iter().any(|n| g.name.eq_ignore_ascii_case(n)));
    }
}

/// Create a registry with all built-in grammars
pub fn default_registry() -> Result<GrammarRegistry> {
    let mut registry = GrammarRegistry::new();
    for grammar in Grammar::all() {
        registry.register(grammar?);
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_grammars_derive_metamodels() {
        for grammar in Grammar::all() {
            let grammar = grammar.unwrap();
            assert!(!grammar.metamodel().is_empty(), "{} has no entities", grammar.name());
            assert!(!grammar.table().is_empty());
        }
    }

    #[test]
    fn test_registry() {
        let registry = default_registry().unwrap();

        assert_eq!(registry.find_for_path(Path::new("src/app.py")).unwrap().name(), "Python");
        assert_eq!(registry.find_for_path(Path::new("main.go")).unwrap().name(), "Go");
        assert!(registry.find_for_path(Path::new("README.md")).is_none());
        assert!(registry.find_by_name("rust").is_some());
    }

    #[test]
    fn test_retain_named() {
        let mut registry = default_registry().unwrap();
        registry.retain_named(&["python".to_string(), "Go".to_string()]);

        let names: Vec<_> = registry.grammars().iter().map(|g| g.name()).collect();
        assert_eq!(names, vec!["Python", "Go"]);
    }

    #[test]
    fn test_every_root_entity_is_known() {
        let samples = [
            ("Python", "def f(a):\n    return a\n"),
            ("JavaScript", "function f(a) { return a; }\n"),
            ("Rust", "fn f(a: i32) -> i32 { a }\n"),
            ("Go", "package main\n\nfunc f(a int) int { return a }\n"),
        ];
        let registry = default_registry().unwrap();
        for (name, source) in samples {
            let grammar = registry.find_by_name(name).unwrap();
            let parsed = grammar.parse(source).unwrap();
            assert!(!parsed.has_errors(), "{} sample did not parse cleanly", name);
            let mapper = grammar.mapper();
            let root = mapper.root(grammar.root(&parsed)).unwrap();
            assert!(!root.values_order().unwrap().is_empty());
        }
    }
}
