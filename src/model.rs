//! Element model - the uniform view over any wrapped node
//!
//! Callers query an [`Element`] by metamodel declarations only. Values come
//! back as [`Value`], children as further elements behind [`ElementRef`].

use crate::metamodel::{Entity, Property, Relation};
use crate::node::Interval;
use crate::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::rc::{Rc, Weak};

/// Shared handle to a wrapped element
pub type ElementRef<'a> = Rc<dyn Element<'a> + 'a>;

/// Non-owning link from a child element back to its parent
pub type ParentRef<'a> = Weak<dyn Element<'a> + 'a>;

/// A token-shaped property value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TokenValue {
    pub kind: String,
    pub text: String,
    pub interval: Interval,
}

/// A resolved property value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Text(String),
    Token(TokenValue),
}

impl Value {
    /// Where the value sits in the source, if it came from the source at all
    pub fn interval(&self) -> Option<Interval> {
        match self {
            Value::Token(token) => Some(token.interval),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
            Value::Token(token) => write!(f, "{}", token.text),
        }
    }
}

/// A property or a relation of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature<'a> {
    Property(&'a Property),
    Relation(&'a Relation),
}

impl<'a> Feature<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Feature::Property(p) => p.name(),
            Feature::Relation(r) => r.name(),
        }
    }
}

/// Points at one resolved value of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueReference<'a> {
    pub feature: Feature<'a>,
    /// 0 for single-valued features
    pub index: usize,
}

impl<'a> ValueReference<'a> {
    pub fn property(property: &'a Property, index: usize) -> Self {
        Self {
            feature: Feature::Property(property),
            index,
        }
    }

    pub fn relation(relation: &'a Relation, index: usize) -> Self {
        Self {
            feature: Feature::Relation(relation),
            index,
        }
    }
}

impl fmt::Display for ValueReference<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.feature.name(), self.index)
    }
}

/// What a [`ValueReference`] resolves to
#[derive(Debug, Clone)]
pub enum Resolved<'a> {
    Value(Value),
    Element(ElementRef<'a>),
}

/// Uniform, grammar-independent view of one parse-tree node
pub trait Element<'a>: fmt::Debug {
    /// The entity describing this element's shape
    fn entity(&self) -> &'a Entity;

    /// The element this one was reached from, while it is still alive
    fn parent(&self) -> Option<ElementRef<'a>>;

    fn source_interval(&self) -> Interval;

    /// Resolve a property by name, answering the position properties first
    fn single_property_named(&self, name: &str) -> Result<Option<Value>>;

    fn single_property(&self, property: &Property) -> Result<Option<Value>>;

    fn multiple_property(&self, property: &Property) -> Result<Vec<Value>>;

    fn single_relation(&self, relation: &Relation) -> Result<Option<ElementRef<'a>>>;

    fn multiple_relation(&self, relation: &Relation) -> Result<Vec<ElementRef<'a>>>;

    /// References to every resolved value, in the order they appear in the source
    fn values_order(&self) -> Result<Vec<ValueReference<'a>>>;

    fn single_relation_named(&self, name: &str) -> Result<Option<ElementRef<'a>>> {
        let relation = self.relation_named(name)?;
        self.single_relation(relation)
    }

    fn multiple_relation_named(&self, name: &str) -> Result<Vec<ElementRef<'a>>> {
        let relation = self.relation_named(name)?;
        self.multiple_relation(relation)
    }

    fn relation_named(&self, name: &str) -> Result<&'a Relation> {
        let entity = self.entity();
        entity.relation(name).ok_or_else(|| Error::UnknownRelation {
            entity: entity.name().to_string(),
            name: name.to_string(),
        })
    }

    /// Resolve a reference produced by [`Element::values_order`]
    fn value_at(&self, reference: &ValueReference<'a>) -> Result<Option<Resolved<'a>>> {
        let index = reference.index;
        Ok(match reference.feature {
            Feature::Property(p) if p.is_single() => self
                .single_property(p)?
                .filter(|_| index == 0)
                .map(Resolved::Value),
            Feature::Property(p) => self
                .multiple_property(p)?
                .into_iter()
                .nth(index)
                .map(Resolved::Value),
            Feature::Relation(r) if r.is_single() => self
                .single_relation(r)?
                .filter(|_| index == 0)
                .map(Resolved::Element),
            Feature::Relation(r) => self
                .multiple_relation(r)?
                .into_iter()
                .nth(index)
                .map(Resolved::Element),
        })
    }
}
