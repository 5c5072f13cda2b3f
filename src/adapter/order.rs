//! Source-order reconstruction
//!
//! Neither the concrete node's layout nor the entity's declaration order
//! tells where a value sits in the text. Every resolved value is paired with
//! its source interval and the pairs are sorted by start offset.

use super::NodeElement;
use crate::model::{Element, ValueReference};
use crate::node::{ConcreteNode, Interval};
use crate::Result;

pub(crate) fn values_order<'a, N: ConcreteNode + 'a>(
    element: &NodeElement<'a, N>,
) -> Result<Vec<ValueReference<'a>>> {
    let entity = element.entity();
    let mut positions: Vec<(ValueReference<'a>, Option<Interval>)> = Vec::new();

    // Raw children only, wrapping them is not needed to learn their span
    for relation in entity.relations() {
        if relation.is_single() {
            if let Some(child) = element.single_relation_raw(relation)? {
                positions.push((ValueReference::relation(relation, 0), Some(child.source_interval())));
            }
        } else {
            for (idx, child) in element.multiple_relation_raw(relation)?.iter().enumerate() {
                positions.push((ValueReference::relation(relation, idx), Some(child.source_interval())));
            }
        }
    }

    for property in entity.properties() {
        if property.is_single() {
            if let Some(value) = element.single_property(property)? {
                positions.push((ValueReference::property(property, 0), value.interval()));
            }
        } else {
            for (idx, value) in element.multiple_property(property)?.iter().enumerate() {
                positions.push((ValueReference::property(property, idx), value.interval()));
            }
        }
    }

    sort_by_position(&mut positions);
    Ok(positions.into_iter().map(|(reference, _)| reference).collect())
}

/// Stable: values without an interval come first, ties keep emission order
fn sort_by_position<T>(positions: &mut [(T, Option<Interval>)]) {
    positions.sort_by_key(|(_, interval)| interval.map(|i| i.start));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::Mapper;
    use crate::metamodel::{Entity, Metamodel, Property, Relation};
    use crate::model::{Feature, Resolved, Value};
    use crate::node::Raw;
    use crate::testing::{FakeNode, token};

    fn child(start: usize, end: usize) -> FakeNode {
        FakeNode::new("child", Interval::new(start, end)).with_text("c")
    }

    #[test]
    fn test_interval_less_first_then_by_start() {
        let metamodel = Metamodel::new()
            .with_entity(
                Entity::new("parent")
                    .with_relation(Relation::single("r1"))
                    .with_relation(Relation::multiple("r2"))
                    .with_property(Property::single("p")),
            )
            .with_entity(Entity::new("child"));
        let node = FakeNode::new("parent", Interval::new(0, 30))
            .with_text("parent")
            .with_field("r1", Raw::Node(Some(child(10, 15))))
            .with_field("r2", Raw::Nodes(vec![child(0, 5), child(20, 25)]))
            .with_accessor("p", Raw::Value(Some(Value::Bool(true))));
        let mapper = Mapper::new(&metamodel);
        let element = mapper.root(node).unwrap();

        let entity = metamodel.entity("parent").unwrap();
        let r1 = entity.relation("r1").unwrap();
        let r2 = entity.relation("r2").unwrap();
        let p = entity.property("p").unwrap();

        assert_eq!(
            element.values_order().unwrap(),
            vec![
                ValueReference::property(p, 0),
                ValueReference::relation(r2, 0),
                ValueReference::relation(r1, 0),
                ValueReference::relation(r2, 1),
            ]
        );
    }

    #[test]
    fn test_token_properties_interleave_with_relations() {
        let metamodel = Metamodel::new()
            .with_entity(
                Entity::new("binary")
                    .with_relation(Relation::single("left"))
                    .with_relation(Relation::single("right"))
                    .with_property(Property::single("operator")),
            )
            .with_entity(Entity::new("child"));
        let node = FakeNode::new("binary", Interval::new(0, 5))
            .with_text("a + b")
            .with_field("left", Raw::Node(Some(child(0, 1))))
            .with_field("right", Raw::Node(Some(child(4, 5))))
            .with_field("operator", Raw::Value(Some(token("+", "+", 2))));
        let mapper = Mapper::new(&metamodel);
        let element = mapper.root(node).unwrap();

        let names: Vec<_> = element
            .values_order()
            .unwrap()
            .iter()
            .map(|r| r.feature.name())
            .collect();
        assert_eq!(names, vec!["left", "operator", "right"]);
    }

    #[test]
    fn test_absent_values_are_skipped() {
        let metamodel = Metamodel::new()
            .with_entity(
                Entity::new("parent")
                    .with_relation(Relation::single("r1"))
                    .with_relation(Relation::multiple("r2"))
                    .with_property(Property::single("p"))
                    .with_property(Property::multiple("ps")),
            )
            .with_entity(Entity::new("child"));
        let node = FakeNode::new("parent", Interval::new(0, 30))
            .with_text("parent")
            .with_field("r1", Raw::Node(None))
            .with_field("r2", Raw::Nodes(Vec::new()))
            .with_field("p", Raw::Value(None))
            .with_field("ps", Raw::Values(vec![token("x", "x", 3)]));
        let mapper = Mapper::new(&metamodel);
        let element = mapper.root(node).unwrap();

        let order = element.values_order().unwrap();
        assert_eq!(order.len(), 1);
        assert!(matches!(order[0].feature, Feature::Property(p) if p.name() == "ps"));
    }

    #[test]
    fn test_references_resolve_back_to_values() {
        let metamodel = Metamodel::new()
            .with_entity(
                Entity::new("parent")
                    .with_relation(Relation::multiple("r2"))
                    .with_property(Property::single("p")),
            )
            .with_entity(Entity::new("child"));
        let node = FakeNode::new("parent", Interval::new(0, 30))
            .with_text("parent")
            .with_field("r2", Raw::Nodes(vec![child(0, 5), child(20, 25)]))
            .with_field("p", Raw::Value(Some(Value::Int(7))));
        let mapper = Mapper::new(&metamodel);
        let element = mapper.root(node).unwrap();

        let order = element.values_order().unwrap();
        match element.value_at(&order[0]).unwrap() {
            Some(Resolved::Value(value)) => assert_eq!(value, Value::Int(7)),
            other => panic!("unexpected {:?}", other),
        }
        match element.value_at(&order[2]).unwrap() {
            Some(Resolved::Element(child)) => assert_eq!(child.source_interval().start, 20),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_equal_starts_keep_emission_order() {
        let mut positions = vec![
            ("a", Some(Interval::new(5, 6))),
            ("b", None),
            ("c", Some(Interval::new(5, 9))),
            ("d", None),
            ("e", Some(Interval::new(1, 2))),
        ];
        sort_by_position(&mut positions);
        let order: Vec<_> = positions.iter().map(|(name, _)| *name).collect();
        assert_eq!(order, vec!["b", "d", "e", "a", "c"]);
    }
}
