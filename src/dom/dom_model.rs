use std::collections::BTreeMap;
use std::fmt;

use crate::dom::error::DomError;

/// Index of an element inside a `Document` arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Input types that support `setSelectionRange`. Everything else throws in a
/// real browser, so the same error surfaces here.
const SELECTABLE_INPUT_TYPES: &[&str] = &["text", "search", "url", "tel", "password"];

#[derive(Debug, Clone, Default)]
pub struct Element {
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
    pub classes: Vec<String>,
    pub style: Vec<(String, String)>,
    pub text: String,

    // Form-control state
    pub value: String,
    pub default_value: String,
    pub checked: bool,
    pub default_checked: bool,
    pub validation_message: String,
    pub selection: Option<(usize, usize)>,

    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(|s| s.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn name(&self) -> Option<&str> {
        self.attr("name")
    }

    /// Lowercased `type` attribute. Inputs default to "text", buttons to "submit".
    pub fn input_type(&self) -> Option<String> {
        match self.tag.as_str() {
            "input" => Some(
                self.attr("type")
                    .map(|t| t.trim().to_ascii_lowercase())
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| "text".to_string()),
            ),
            "button" => Some(
                self.attr("type")
                    .map(|t| t.trim().to_ascii_lowercase())
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| "submit".to_string()),
            ),
            _ => None,
        }
    }

    pub fn is_form_control(&self) -> bool {
        matches!(self.tag.as_str(), "input" | "textarea" | "select")
    }

    pub fn is_text_entry(&self) -> bool {
        matches!(self.tag.as_str(), "input" | "textarea")
    }

    pub fn is_checkable(&self) -> bool {
        matches!(self.input_type().as_deref(), Some("checkbox") | Some("radio"))
    }

    pub fn is_submit_control(&self) -> bool {
        match self.tag.as_str() {
            "button" => self.input_type().as_deref() == Some("submit"),
            "input" => matches!(self.input_type().as_deref(), Some("submit") | Some("image")),
            _ => false,
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.attrs.contains_key("disabled")
    }

    fn supports_selection(&self) -> bool {
        match self.tag.as_str() {
            "textarea" => true,
            "input" => self
                .input_type()
                .is_some_and(|t| SELECTABLE_INPUT_TYPES.contains(&t.as_str())),
            _ => false,
        }
    }
}

/// In-memory document tree. Element 0 is the `body` root.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Element>,
    focused: Option<NodeId>,
    pub title: String,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Element::new("body")],
            focused: None,
            title: String::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(id.0)
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(id.0)
    }

    fn get(&self, id: NodeId) -> Result<&Element, DomError> {
        self.nodes.get(id.0).ok_or(DomError::UnknownNode(id))
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut Element, DomError> {
        self.nodes.get_mut(id.0).ok_or(DomError::UnknownNode(id))
    }

    // ------------------------------------------------------------------
    // Tree structure
    // ------------------------------------------------------------------

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.push(Element::new(tag));
        NodeId(self.nodes.len() - 1)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.element(id).and_then(|e| e.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.element(id).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    /// True when walking parents from `id` reaches the root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        let mut steps = 0;
        while let Some(node) = current {
            if node == self.root() {
                return true;
            }
            // Guards against a corrupted parent chain.
            steps += 1;
            if steps > self.nodes.len() {
                return false;
            }
            current = self.parent(node);
        }
        false
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.get(parent)?;
        self.detach(child)?;
        self.get_mut(child)?.parent = Some(parent);
        self.get_mut(parent)?.children.push(child);
        Ok(())
    }

    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.get(parent)?;
        self.detach(child)?;
        self.get_mut(child)?.parent = Some(parent);
        self.get_mut(parent)?.children.insert(0, child);
        Ok(())
    }

    /// Insert `node` as the next sibling of `reference` (insertAdjacentElement "afterend").
    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) -> Result<(), DomError> {
        let parent = self.get(reference)?.parent.ok_or(DomError::NoParent(reference))?;
        self.detach(node)?;
        let siblings = &self.get(parent)?.children;
        let index = siblings
            .iter()
            .position(|c| *c == reference)
            .ok_or(DomError::NoParent(reference))?;
        self.get_mut(node)?.parent = Some(parent);
        self.get_mut(parent)?.children.insert(index + 1, node);
        Ok(())
    }

    /// Remove `node` from its parent. Removing a detached node is a no-op.
    pub fn remove(&mut self, node: NodeId) -> Result<(), DomError> {
        self.detach(node)?;
        if self.focused.is_some_and(|f| !self.is_connected(f)) {
            self.focused = None;
        }
        Ok(())
    }

    fn detach(&mut self, node: NodeId) -> Result<(), DomError> {
        let parent = self.get(node)?.parent;
        if let Some(parent) = parent {
            self.get_mut(parent)?.children.retain(|c| *c != node);
            self.get_mut(node)?.parent = None;
        }
        Ok(())
    }

    /// Pre-order descendants of `scope`, excluding `scope` itself.
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|c| *c == id)?;
        siblings.get(index + 1).copied()
    }

    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = self.element(id).map(|e| e.text.clone()).unwrap_or_default();
        for child in self.descendants(id) {
            if let Some(e) = self.element(child) {
                out.push_str(&e.text);
            }
        }
        out
    }

    pub fn set_text(&mut self, id: NodeId, text: &str) -> Result<(), DomError> {
        self.get_mut(id)?.text = text.to_string();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Attributes and classes
    // ------------------------------------------------------------------

    /// Class names live in `Element::classes`, never in the attribute map.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.attr(name))
    }

    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let element = self.get_mut(id)?;
        if name == "class" {
            element.classes = value.split_whitespace().map(str::to_string).collect();
        } else {
            element.attrs.insert(name.to_string(), value.to_string());
        }
        Ok(())
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Result<(), DomError> {
        let element = self.get_mut(id)?;
        if name == "class" {
            element.classes.clear();
        } else {
            element.attrs.remove(name);
        }
        Ok(())
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|e| e.has_class(class))
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) -> Result<(), DomError> {
        let element = self.get_mut(id)?;
        if !element.has_class(class) {
            element.classes.push(class.to_string());
        }
        Ok(())
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) -> Result<(), DomError> {
        self.get_mut(id)?.classes.retain(|c| c != class);
        Ok(())
    }

    pub fn set_style(&mut self, id: NodeId, property: &str, value: &str) -> Result<(), DomError> {
        let element = self.get_mut(id)?;
        match element.style.iter_mut().find(|(p, _)| p == property) {
            Some(entry) => entry.1 = value.to_string(),
            None => element.style.push((property.to_string(), value.to_string())),
        }
        Ok(())
    }

    pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.element(id)?
            .style
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    // ------------------------------------------------------------------
    // Form-control state
    // ------------------------------------------------------------------

    pub fn value(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.value.as_str())
    }

    pub fn set_value(&mut self, id: NodeId, value: &str) -> Result<(), DomError> {
        let element = self.get_mut(id)?;
        if !element.is_form_control() {
            return Err(DomError::NotAFormControl(id));
        }
        element.value = value.to_string();
        element.selection = None;
        Ok(())
    }

    pub fn set_checked(&mut self, id: NodeId, checked: bool) -> Result<(), DomError> {
        let element = self.get_mut(id)?;
        if !element.is_checkable() {
            return Err(DomError::NotAFormControl(id));
        }
        element.checked = checked;
        Ok(())
    }

    pub fn validation_message(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.validation_message.as_str())
    }

    /// setCustomValidity: an empty message marks the control valid again.
    pub fn set_custom_validity(&mut self, id: NodeId, message: &str) -> Result<(), DomError> {
        self.get_mut(id)?.validation_message = message.to_string();
        Ok(())
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn focus(&mut self, id: NodeId) -> Result<(), DomError> {
        self.get(id)?;
        if !self.is_connected(id) {
            return Err(DomError::Detached(id));
        }
        self.focused = Some(id);
        Ok(())
    }

    pub fn selection(&self, id: NodeId) -> Option<(usize, usize)> {
        self.element(id).and_then(|e| e.selection)
    }

    /// Offsets are in characters and clamped to the value length.
    pub fn set_selection_range(
        &mut self,
        id: NodeId,
        start: usize,
        end: usize,
    ) -> Result<(), DomError> {
        let element = self.get_mut(id)?;
        if !element.supports_selection() {
            return Err(DomError::SelectionUnsupported {
                tag: element.tag.clone(),
                input_type: element.input_type(),
            });
        }
        let len = element.value.chars().count();
        let end = end.min(len);
        element.selection = Some((start.min(end), end));
        Ok(())
    }
}
