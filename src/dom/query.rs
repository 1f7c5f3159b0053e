use crate::dom::dom_model::{Document, Element, NodeId};
use crate::dom::error::DomError;

/// The small selector subset the controller needs: `.class`, `#id`, `tag`,
/// `tag.class` and `[name="value"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Class(String),
    Id(String),
    Tag(String),
    TagClass { tag: String, class: String },
    Name(String),
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, DomError> {
        let s = input.trim();
        let invalid = || DomError::InvalidSelector(input.to_string());

        if let Some(class) = s.strip_prefix('.') {
            return ident(class).map(|c| Selector::Class(c.into())).ok_or_else(invalid);
        }
        if let Some(id) = s.strip_prefix('#') {
            return ident(id).map(|i| Selector::Id(i.into())).ok_or_else(invalid);
        }
        if let Some(inner) = s.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
            let (key, value) = inner.split_once('=').ok_or_else(invalid)?;
            if key.trim() != "name" {
                return Err(invalid());
            }
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
            return ident(value).map(|v| Selector::Name(v.into())).ok_or_else(invalid);
        }
        if let Some((tag, class)) = s.split_once('.') {
            return match (ident(tag), ident(class)) {
                (Some(t), Some(c)) => Ok(Selector::TagClass {
                    tag: t.to_ascii_lowercase(),
                    class: c.into(),
                }),
                _ => Err(invalid()),
            };
        }
        ident(s)
            .map(|t| Selector::Tag(t.to_ascii_lowercase()))
            .ok_or_else(invalid)
    }

    pub fn matches(&self, element: &Element) -> bool {
        match self {
            Selector::Class(c) => element.has_class(c),
            Selector::Id(id) => element.attr("id") == Some(id.as_str()),
            Selector::Tag(tag) => element.tag == *tag,
            Selector::TagClass { tag, class } => element.tag == *tag && element.has_class(class),
            Selector::Name(name) => element.name() == Some(name.as_str()),
        }
    }
}

fn ident(s: &str) -> Option<&str> {
    let valid = !s.is_empty()
        && s.chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_');
    valid.then_some(s)
}

/// First descendant of `scope` matching `selector`, in document order.
pub fn query_selector(doc: &Document, scope: NodeId, selector: &Selector) -> Option<NodeId> {
    doc.descendants(scope)
        .into_iter()
        .find(|id| doc.element(*id).is_some_and(|e| selector.matches(e)))
}

pub fn query_selector_all(doc: &Document, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
    doc.descendants(scope)
        .into_iter()
        .filter(|id| doc.element(*id).is_some_and(|e| selector.matches(e)))
        .collect()
}

/// Document-wide lookup, like `document.querySelector`.
pub fn find(doc: &Document, selector: &str) -> Result<Option<NodeId>, DomError> {
    let selector = Selector::parse(selector)?;
    Ok(query_selector(doc, doc.root(), &selector))
}

/// First element named `name` inside `scope`.
pub fn field_by_name(doc: &Document, scope: NodeId, name: &str) -> Option<NodeId> {
    query_selector(doc, scope, &Selector::Name(name.to_string()))
}

/// All `input` and `textarea` elements inside `scope`.
pub fn text_entries(doc: &Document, scope: NodeId) -> Vec<NodeId> {
    doc.descendants(scope)
        .into_iter()
        .filter(|id| doc.element(*id).is_some_and(|e| e.is_text_entry()))
        .collect()
}
