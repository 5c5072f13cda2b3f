//! The node adapter element

use super::{common, order};
use crate::mapper::Translator;
use crate::metamodel::{Entity, Multiplicity, Property, Relation};
use crate::model::{Element, ElementRef, ParentRef, Value, ValueReference};
use crate::node::{ConcreteNode, Interval, Raw};
use crate::{Error, Result};
use std::fmt;
use std::rc::{Rc, Weak};

/// An [`Element`] backed by one concrete parse-tree node
///
/// Elements are created on demand by a [`Translator`] each time a relation
/// is traversed and never change afterwards. Children hold a weak link back
/// to the element they were reached from.
pub struct NodeElement<'a, N: ConcreteNode + 'a> {
    node: N,
    entity: &'a Entity,
    parent: Option<ParentRef<'a>>,
    translator: &'a dyn Translator<'a, N>,
    this: Weak<NodeElement<'a, N>>,
}

impl<'a, N: ConcreteNode + 'a> NodeElement<'a, N> {
    pub fn new(
        translator: &'a dyn Translator<'a, N>,
        node: N,
        entity: &'a Entity,
        parent: Option<ParentRef<'a>>,
    ) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            node,
            entity,
            parent,
            translator,
            this: this.clone(),
        })
    }

    fn as_parent(&self) -> ParentRef<'a> {
        let this: ParentRef<'a> = self.this.clone();
        this
    }

    fn wrap(&self, child: N) -> Result<ElementRef<'a>> {
        self.translator.to_element(child, Some(self.as_parent()))
    }

    /// Properties prefer a computed accessor over a stored field
    fn resolve_property(&self, name: &str) -> Result<Raw<N>> {
        self.node
            .accessor(name)
            .or_else(|| self.node.field(name))
            .ok_or_else(|| self.unresolvable(name))
    }

    /// Relations prefer a stored field over a computed accessor
    fn resolve_relation(&self, name: &str) -> Result<Raw<N>> {
        self.node
            .field(name)
            .or_else(|| self.node.accessor(name))
            .ok_or_else(|| self.unresolvable(name))
    }

    pub(crate) fn single_relation_raw(&self, relation: &Relation) -> Result<Option<N>> {
        self.expect_multiplicity(relation.name(), relation.multiplicity(), Multiplicity::Single)?;
        match self.resolve_relation(relation.name())? {
            Raw::Node(child) => Ok(child),
            other => Err(self.shape_mismatch(relation.name(), "a node", &other)),
        }
    }

    pub(crate) fn multiple_relation_raw(&self, relation: &Relation) -> Result<Vec<N>> {
        self.expect_multiplicity(relation.name(), relation.multiplicity(), Multiplicity::Multiple)?;
        match self.resolve_relation(relation.name())? {
            Raw::Nodes(children) => Ok(children),
            other => Err(self.shape_mismatch(relation.name(), "a list of nodes", &other)),
        }
    }

    fn expect_multiplicity(&self, name: &str, declared: Multiplicity, requested: Multiplicity) -> Result<()> {
        if declared == requested {
            return Ok(());
        }
        Err(Error::Cardinality {
            rule: self.node.rule().to_string(),
            name: name.to_string(),
            interval: self.node.source_interval(),
            declared,
            requested,
        })
    }

    fn unresolvable(&self, name: &str) -> Error {
        Error::Unresolvable {
            rule: self.node.rule().to_string(),
            name: name.to_string(),
            interval: self.node.source_interval(),
        }
    }

    fn shape_mismatch(&self, name: &str, expected: &'static str, found: &Raw<N>) -> Error {
        Error::ShapeMismatch {
            rule: self.node.rule().to_string(),
            name: name.to_string(),
            interval: self.node.source_interval(),
            expected,
            found: found.shape(),
        }
    }
}

impl<'a, N: ConcreteNode + 'a> Element<'a> for NodeElement<'a, N> {
    fn entity(&self) -> &'a Entity {
        self.entity
    }

    fn parent(&self) -> Option<ElementRef<'a>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    fn source_interval(&self) -> Interval {
        self.node.source_interval()
    }

    fn single_property_named(&self, name: &str) -> Result<Option<Value>> {
        if let Some(value) = common::common_property(&self.node, name)? {
            return Ok(Some(value));
        }
        let property = self.entity.property(name).ok_or_else(|| Error::UnknownProperty {
            entity: self.entity.name().to_string(),
            name: name.to_string(),
        })?;
        self.single_property(property)
    }

    fn single_property(&self, property: &Property) -> Result<Option<Value>> {
        if let Some(value) = common::common_property(&self.node, property.name())? {
            return Ok(Some(value));
        }
        self.expect_multiplicity(property.name(), property.multiplicity(), Multiplicity::Single)?;
        match self.resolve_property(property.name())? {
            Raw::Value(value) => Ok(value),
            Raw::Node(node) => Ok(node.map(|n| n.to_value())),
            other => Err(self.shape_mismatch(property.name(), "a value", &other)),
        }
    }

    fn multiple_property(&self, property: &Property) -> Result<Vec<Value>> {
        self.expect_multiplicity(property.name(), property.multiplicity(), Multiplicity::Multiple)?;
        match self.resolve_property(property.name())? {
            Raw::Values(values) => Ok(values),
            Raw::Nodes(nodes) => Ok(nodes.iter().map(ConcreteNode::to_value).collect()),
            other => Err(self.shape_mismatch(property.name(), "a list of values", &other)),
        }
    }

    fn single_relation(&self, relation: &Relation) -> Result<Option<ElementRef<'a>>> {
        self.single_relation_raw(relation)?
            .map(|child| self.wrap(child))
            .transpose()
    }

    fn multiple_relation(&self, relation: &Relation) -> Result<Vec<ElementRef<'a>>> {
        self.multiple_relation_raw(relation)?
            .into_iter()
            .map(|child| self.wrap(child))
            .collect()
    }

    fn values_order(&self) -> Result<Vec<ValueReference<'a>>> {
        order::values_order(self)
    }
}

impl<'a, N: ConcreteNode + 'a> fmt::Debug for NodeElement<'a, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeElement")
            .field("entity", &self.entity.name())
            .field("wrapped", &self.node)
            .finish()
    }
}
