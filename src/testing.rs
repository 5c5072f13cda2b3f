//! Hand-built concrete nodes for unit tests

use crate::model::{TokenValue, Value};
use crate::node::{ConcreteNode, Interval, Raw, Token};
use std::borrow::Cow;

/// A concrete node whose tokens, accessors and fields are set explicitly
#[derive(Debug, Clone)]
pub(crate) struct FakeNode {
    rule: String,
    interval: Interval,
    text: String,
    start: Option<Token>,
    stop: Option<Token>,
    accessors: Vec<(String, Raw<FakeNode>)>,
    fields: Vec<(String, Raw<FakeNode>)>,
}

impl FakeNode {
    pub fn new(rule: &str, interval: Interval) -> Self {
        Self {
            rule: rule.to_string(),
            interval,
            text: String::new(),
            start: Some(Token::new(1, interval.start, "")),
            stop: None,
            accessors: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Set the text; start and stop become one single-line token on line 1
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        let token = Token::new(1, self.interval.start, text);
        self.start = Some(token.clone());
        self.stop = (!text.is_empty()).then_some(token);
        self
    }

    pub fn with_tokens(mut self, start: Option<Token>, stop: Option<Token>) -> Self {
        self.start = start;
        self.stop = stop;
        self
    }

    pub fn with_accessor(mut self, name: &str, raw: Raw<FakeNode>) -> Self {
        set(&mut self.accessors, name, raw);
        self
    }

    pub fn with_field(mut self, name: &str, raw: Raw<FakeNode>) -> Self {
        set(&mut self.fields, name, raw);
        self
    }
}

fn set(slots: &mut Vec<(String, Raw<FakeNode>)>, name: &str, raw: Raw<FakeNode>) {
    slots.retain(|(n, _)| n != name);
    slots.push((name.to_string(), raw));
}

fn get(slots: &[(String, Raw<FakeNode>)], name: &str) -> Option<Raw<FakeNode>> {
    slots.iter().find(|(n, _)| n == name).map(|(_, raw)| raw.clone())
}

/// A token value of `text` starting at byte `start`
pub(crate) fn token(kind: &str, text: &str, start: usize) -> Value {
    Value::Token(TokenValue {
        kind: kind.to_string(),
        text: text.to_string(),
        interval: Interval::new(start, start + text.len()),
    })
}

impl ConcreteNode for FakeNode {
    fn rule(&self) -> &str {
        &self.rule
    }

    fn start(&self) -> Option<Token> {
        self.start.clone()
    }

    fn stop(&self) -> Option<Token> {
        self.stop.clone()
    }

    fn text(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.text)
    }

    fn source_interval(&self) -> Interval {
        self.interval
    }

    fn accessor(&self, name: &str) -> Option<Raw<Self>> {
        get(&self.accessors, name)
    }

    fn field(&self, name: &str) -> Option<Raw<Self>> {
        get(&self.fields, name)
    }
}
