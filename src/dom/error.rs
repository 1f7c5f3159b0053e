use std::fmt;

use crate::dom::dom_model::NodeId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// Node id does not belong to this document
    UnknownNode(NodeId),

    /// Node exists but is not attached under the document root
    Detached(NodeId),

    /// Insertion relative to a node that has no parent
    NoParent(NodeId),

    /// setSelectionRange on an element whose type does not support selection
    SelectionUnsupported { tag: String, input_type: Option<String> },

    /// Operation requires a form control (input, textarea, select)
    NotAFormControl(NodeId),

    /// Selector string could not be parsed
    InvalidSelector(String),

    /// No control carries this name
    NoSuchField(String),
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomError::UnknownNode(id) => write!(f, "Unknown node {}", id),
            DomError::Detached(id) => write!(f, "Node {} is not connected to the document", id),
            DomError::NoParent(id) => write!(f, "Node {} has no parent", id),
            DomError::SelectionUnsupported { tag, input_type } => match input_type {
                Some(t) => write!(f, "Selection is not supported on <{} type=\"{}\">", tag, t),
                None => write!(f, "Selection is not supported on <{}>", tag),
            },
            DomError::NotAFormControl(id) => write!(f, "Node {} is not a form control", id),
            DomError::InvalidSelector(s) => write!(f, "Invalid selector: '{}'", s),
            DomError::NoSuchField(name) => write!(f, "No field named '{}'", name),
        }
    }
}

impl std::error::Error for DomError {}
