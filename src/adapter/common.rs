//! Position properties shared by every node
//!
//! `start_line`, `start_column`, `end_line` and `end_column` are answered from
//! the node's start and stop tokens before any entity lookup happens.

use crate::metamodel::{END_COLUMN, END_LINE, START_COLUMN, START_LINE};
use crate::model::Value;
use crate::node::{ConcreteNode, Token};
use crate::{Error, Result};

/// Where a node ends, as far as its tokens tell
enum Stop {
    Token(Token),
    /// Empty node without a stop token: the start column stands in for both
    /// end line and end column.
    Degenerate(usize),
}

/// Answer a reserved property, or `Ok(None)` when `name` is not reserved
pub(crate) fn common_property<N: ConcreteNode>(node: &N, name: &str) -> Result<Option<Value>> {
    let position = match name {
        START_LINE => start_line(node)?,
        START_COLUMN => start_column(node)?,
        END_LINE => end_line(node)?,
        END_COLUMN => end_column(node)?,
        _ => return Ok(None),
    };
    Ok(Some(Value::Int(position as i64)))
}

pub fn start_line<N: ConcreteNode>(node: &N) -> Result<usize> {
    Ok(start_token(node)?.line)
}

pub fn start_column<N: ConcreteNode>(node: &N) -> Result<usize> {
    Ok(start_token(node)?.column)
}

/// Line of the stop token, advanced past any newlines inside its text
pub fn end_line<N: ConcreteNode>(node: &N) -> Result<usize> {
    Ok(match stop(node)? {
        Stop::Degenerate(column) => column,
        Stop::Token(token) => token.line + token.text.split('\n').count() - 1,
    })
}

pub fn end_column<N: ConcreteNode>(node: &N) -> Result<usize> {
    Ok(match stop(node)? {
        Stop::Degenerate(column) => column,
        Stop::Token(token) if token.eof => token.column,
        Stop::Token(token) => match token.text.rsplit_once('\n') {
            None => token.column + token.text.chars().count(),
            Some((_, last)) => last.chars().count(),
        },
    })
}

fn start_token<N: ConcreteNode>(node: &N) -> Result<Token> {
    node.start().ok_or_else(|| Error::MissingStartToken {
        rule: node.rule().to_string(),
        interval: node.source_interval(),
    })
}

fn stop<N: ConcreteNode>(node: &N) -> Result<Stop> {
    if let Some(token) = node.stop() {
        return Ok(Stop::Token(token));
    }
    let start = node.start();
    let text = node.text();
    match start {
        Some(start) if text.is_empty() => Ok(Stop::Degenerate(start.column)),
        start => Err(Error::MissingStopToken {
            rule: node.rule().to_string(),
            interval: node.source_interval(),
            text: text.into_owned(),
            start: start.map_or_else(|| "null".to_string(), |t| t.to_string()),
        }),
    }
}
