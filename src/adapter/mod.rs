//! Node adapter
//!
//! [`NodeElement`] wraps one concrete node and answers every [`Element`]
//! query against it. Position properties are synthesized from token
//! metadata (`common`), source order is recovered from value intervals
//! (`order`).
//!
//! [`Element`]: crate::model::Element

mod common;
mod element;
mod order;

pub use common::{end_column, end_line, start_column, start_line};
pub use element::NodeElement;
