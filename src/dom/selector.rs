//! Element selectors
//!
//! A small subset of CSS selectors, enough for dropzone `accept` lists,
//! draggable ignore zones and the queries the overlay manager runs.

use super::{Document, NodeId};
use crate::constants::attrs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `#id`
    Id(String),
    /// `.class`
    Class(String),
    /// `tag`
    Tag(String),
    /// `[name]` or `[name=value]`
    Attr { name: String, value: Option<String> },
    /// Every selector matches (compound selector)
    All(Vec<Selector>),
    /// Any selector matches (selector list)
    Any(Vec<Selector>),
}

impl Selector {
    pub fn id(id: &str) -> Self {
        Selector::Id(id.to_string())
    }

    pub fn class(class: &str) -> Self {
        Selector::Class(class.to_string())
    }

    pub fn tag(tag: &str) -> Self {
        Selector::Tag(tag.to_string())
    }

    pub fn has_attr(name: &str) -> Self {
        Selector::Attr {
            name: name.to_string(),
            value: None,
        }
    }

    pub fn attr_eq(name: &str, value: &str) -> Self {
        Selector::Attr {
            name: name.to_string(),
            value: Some(value.to_string()),
        }
    }

    /// `input[type=<kind>]`
    pub fn input_type(kind: &str) -> Self {
        Selector::All(vec![Selector::tag("input"), Selector::attr_eq(attrs::TYPE, kind)])
    }

    pub fn any(selectors: impl IntoIterator<Item = Selector>) -> Self {
        Selector::Any(selectors.into_iter().collect())
    }

    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        match self {
            Selector::Id(id) => doc.attr(node, attrs::ID) == Some(id.as_str()),
            Selector::Class(class) => doc.has_class(node, class),
            Selector::Tag(tag) => doc.tag(node).eq_ignore_ascii_case(tag),
            Selector::Attr { name, value } => match (doc.attr(node, name), value) {
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == expected,
                (None, _) => false,
            },
            Selector::All(selectors) => selectors.iter().all(|s| s.matches(doc, node)),
            Selector::Any(selectors) => selectors.iter().any(|s| s.matches(doc, node)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_and_list_selectors() {
        let mut doc = Document::new();
        let radio = doc.create_element("input");
        doc.set_attr(radio, attrs::TYPE, "radio");
        doc.add_class(radio, "choice");
        let text = doc.create_element("INPUT");
        doc.set_attr(text, attrs::TYPE, "text");

        assert!(Selector::input_type("radio").matches(&doc, radio));
        assert!(!Selector::input_type("radio").matches(&doc, text));
        assert!(Selector::tag("input").matches(&doc, text));

        let list = Selector::any([Selector::class("choice"), Selector::attr_eq(attrs::TYPE, "text")]);
        assert!(list.matches(&doc, radio));
        assert!(list.matches(&doc, text));
        assert!(!Selector::has_attr(attrs::DATA_NAME).matches(&doc, text));
    }
}
