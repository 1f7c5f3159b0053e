use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dom::dom_model::{Document, NodeId};
use crate::dom::error::DomError;
use crate::form::error::FormError;

/// A page fixture, usually read from YAML:
///
/// ```yaml
/// title: Partner with us
/// body:
///   - tag: form
///     class: partner-form
///     attrs: { action: /api/partners }
///     children:
///       - tag: input
///         attrs: { name: restaurantName, type: text }
///   - tag: div
///     id: partner-success-toast
///     text: Thanks! We'll be in touch.
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PageSpec {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub body: Vec<NodeSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NodeSpec {
    pub tag: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Space-separated class list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Initial value for form controls; also the value `reset` restores
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default)]
    pub checked: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.class = Some(class.to_string());
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    pub fn with_child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }
}

// ============================================================================
// Loading
// ============================================================================

pub fn parse_page(yaml: &str) -> Result<PageSpec, FormError> {
    serde_yaml::from_str(yaml).map_err(|e| FormError::YamlParse {
        context: "page fixture".into(),
        source: e,
    })
}

pub fn load_page(path: &str) -> Result<Document, FormError> {
    let content = std::fs::read_to_string(path).map_err(|e| FormError::Io {
        path: path.to_string(),
        source: e,
    })?;
    let spec = parse_page(&content)?;
    Ok(build_document(&spec)?)
}

pub fn build_document(spec: &PageSpec) -> Result<Document, DomError> {
    let mut doc = Document::new();
    doc.title = spec.title.clone();
    let root = doc.root();
    for node in &spec.body {
        build_node(&mut doc, root, node)?;
    }
    Ok(doc)
}

fn build_node(doc: &mut Document, parent: NodeId, spec: &NodeSpec) -> Result<NodeId, DomError> {
    let id = doc.create_element(&spec.tag);

    for (name, value) in &spec.attrs {
        doc.set_attr(id, name, value)?;
    }
    if let Some(dom_id) = &spec.id {
        doc.set_attr(id, "id", dom_id)?;
    }
    if let Some(class) = &spec.class {
        doc.set_attr(id, "class", class)?;
    }
    if let Some(text) = &spec.text {
        doc.set_text(id, text)?;
    }

    doc.append_child(parent, id)?;
    for child in &spec.children {
        build_node(doc, id, child)?;
    }

    let initial = initial_value(doc, id, spec);
    if let Some(element) = doc.element_mut(id) {
        if element.is_form_control() {
            element.value = initial.clone();
            element.default_value = initial;
        }
        if element.is_checkable() {
            element.checked = spec.checked;
            element.default_checked = spec.checked;
        }
    }

    Ok(id)
}

/// Checkables carry their `value` attribute (default "on"). Selects default to
/// the first option when no value is given.
fn initial_value(doc: &Document, id: NodeId, spec: &NodeSpec) -> String {
    if let Some(v) = &spec.value {
        return v.clone();
    }
    let Some(element) = doc.element(id) else {
        return String::new();
    };
    if element.is_checkable() {
        return element.attr("value").unwrap_or("on").to_string();
    }
    if element.tag == "select" {
        return doc
            .children(id)
            .iter()
            .filter_map(|c| doc.element(*c))
            .find(|c| c.tag == "option")
            .map(|opt| opt.attr("value").unwrap_or(opt.text.as_str()).to_string())
            .unwrap_or_default();
    }
    element.attr("value").unwrap_or_default().to_string()
}
