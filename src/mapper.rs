//! Node to element translation
//!
//! The adapter never builds child elements itself: every resolved child node
//! goes through a [`Translator`], which picks the entity for the node's rule
//! and threads the parent link.

use crate::adapter::NodeElement;
use crate::metamodel::Metamodel;
use crate::model::{ElementRef, ParentRef};
use crate::node::ConcreteNode;
use crate::{Error, Result};

/// Turns concrete nodes into elements
pub trait Translator<'a, N: ConcreteNode + 'a> {
    fn to_element(&'a self, node: N, parent: Option<ParentRef<'a>>) -> Result<ElementRef<'a>>;
}

/// Translator resolving entities from a [`Metamodel`] by rule identifier
#[derive(Debug, Clone, Copy)]
pub struct Mapper<'a> {
    metamodel: &'a Metamodel,
}

impl<'a> Mapper<'a> {
    pub fn new(metamodel: &'a Metamodel) -> Self {
        Self { metamodel }
    }

    /// Wrap a traversal root, which has no parent
    pub fn root<N: ConcreteNode + 'a>(&'a self, node: N) -> Result<ElementRef<'a>> {
        <Self as Translator<'a, N>>::to_element(self, node, None)
    }
}

impl<'a, N: ConcreteNode + 'a> Translator<'a, N> for Mapper<'a> {
    fn to_element(&'a self, node: N, parent: Option<ParentRef<'a>>) -> Result<ElementRef<'a>> {
        let entity = self
            .metamodel
            .entity(node.rule())
            .ok_or_else(|| Error::UnknownEntity(node.rule().to_string()))?;
        tracing::trace!(rule = node.rule(), interval = %node.source_interval(), "wrapping node");
        let element: ElementRef<'a> = NodeElement::new(self, node, entity, parent);
        Ok(element)
    }
}
