//! Page model: a mutable, observable element tree standing in for the
//! host page's DOM, with a selector subset and HTML ingestion.

pub mod document;
pub mod element;
pub mod parse;
pub mod select;

pub use document::Document;
pub use element::{ChildListMutation, Element};
pub use parse::{parse_document, parse_fragment};
pub use select::{Selector, SelectorError};

pub(crate) use select::selector;
