//! Source-order outline of an element tree
//!
//! Walks [`Element::values_order`] recursively and collects every value in
//! the order it appears in the source. The outline serializes to JSON and
//! prints as an indented tree.

use crate::metamodel::{END_COLUMN, END_LINE, START_COLUMN, START_LINE};
use crate::model::{Element, ElementRef, Feature, Resolved, Value, ValueReference};
use crate::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Position of an element, from the reserved position properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start_line: i64,
    pub start_column: i64,
    pub end_line: i64,
    pub end_column: i64,
}

impl Span {
    fn of<'a>(element: &dyn Element<'a>) -> Result<Option<Self>> {
        let position = |name: &str| -> Result<Option<i64>> {
            Ok(element.single_property_named(name)?.and_then(|v| v.as_int()))
        };
        let (Some(start_line), Some(start_column), Some(end_line), Some(end_column)) = (
            position(START_LINE)?,
            position(START_COLUMN)?,
            position(END_LINE)?,
            position(END_COLUMN)?,
        ) else {
            return Ok(None);
        };
        Ok(Some(Self {
            start_line,
            start_column,
            end_line,
            end_column,
        }))
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start_line, self.start_column, self.end_line, self.end_column
        )
    }
}

/// What one ordered value holds
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Content {
    Value(Value),
    Element(RenderedElement),
    /// A child below the depth limit, by entity name
    Elided(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderedValue {
    pub name: String,
    pub index: usize,
    pub content: Content,
}

/// One element of the outline with its values in source order
#[derive(Debug, Clone, Serialize)]
pub struct RenderedElement {
    pub entity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    pub values: Vec<RenderedValue>,
}

impl RenderedElement {
    /// Number of elements in the outline, this one included
    pub fn count(&self) -> usize {
        1 + self
            .values
            .iter()
            .map(|v| match &v.content {
                Content::Element(child) => child.count(),
                _ => 0,
            })
            .sum::<usize>()
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{}", self.entity)?;
        if let Some(span) = &self.span {
            write!(f, " [{}]", span)?;
        }
        writeln!(f)?;

        for value in &self.values {
            write!(f, "{:width$}{}#{}: ", "", value.name, value.index, width = (depth + 1) * 2)?;
            match &value.content {
                Content::Value(v) => writeln!(f, "{:?}", v.to_string())?,
                Content::Element(child) => child.write_indented(f, depth + 1)?,
                Content::Elided(entity) => writeln!(f, "{} ...", entity)?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for RenderedElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

/// Render an element and its descendants
///
/// With `max_depth`, children nested deeper than that many levels below
/// `root` are reported by entity name only.
pub fn render(root: &ElementRef<'_>, max_depth: Option<usize>) -> Result<RenderedElement> {
    render_at(root.as_ref(), 0, max_depth)
}

fn render_at<'a>(element: &dyn Element<'a>, depth: usize, max_depth: Option<usize>) -> Result<RenderedElement> {
    let span = Span::of(element)?;
    let mut lists = ResolvedLists::default();
    let mut values = Vec::new();

    for reference in element.values_order()? {
        let Some(resolved) = lists.resolve(element, &reference)? else {
            continue;
        };
        let content = match resolved {
            Resolved::Value(value) => Content::Value(value),
            Resolved::Element(child) if max_depth.is_some_and(|max| depth >= max) => {
                Content::Elided(child.entity().name().to_string())
            }
            Resolved::Element(child) => Content::Element(render_at(child.as_ref(), depth + 1, max_depth)?),
        };
        values.push(RenderedValue {
            name: reference.feature.name().to_string(),
            index: reference.index,
            content,
        });
    }

    Ok(RenderedElement {
        entity: element.entity().name().to_string(),
        span,
        values,
    })
}

/// Multiple-valued features resolved once per element instead of per index
#[derive(Default)]
struct ResolvedLists<'a> {
    lists: HashMap<(bool, &'a str), Vec<Resolved<'a>>>,
}

impl<'a> ResolvedLists<'a> {
    fn resolve(&mut self, element: &dyn Element<'a>, reference: &ValueReference<'a>) -> Result<Option<Resolved<'a>>> {
        let key = match reference.feature {
            Feature::Property(p) if !p.is_single() => (false, p.name()),
            Feature::Relation(r) if !r.is_single() => (true, r.name()),
            _ => return element.value_at(reference),
        };
        if !self.lists.contains_key(&key) {
            let list = match reference.feature {
                Feature::Property(p) => element
                    .multiple_property(p)?
                    .into_iter()
                    .map(Resolved::Value)
                    .collect(),
                Feature::Relation(r) => element
                    .multiple_relation(r)?
                    .into_iter()
                    .map(Resolved::Element)
                    .collect(),
            };
            self.lists.insert(key, list);
        }
        Ok(self.lists.get(&key).and_then(|list| list.get(reference.index)).cloned())
    }
}
