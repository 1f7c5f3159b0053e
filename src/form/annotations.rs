use crate::dom::dom_model::{Document, NodeId};
use crate::dom::error::DomError;
use crate::dom::query::{Selector, query_selector_all};

pub const FIELD_ERROR_CLASS: &str = "field-error";
pub const FORM_ERROR_CLASS: &str = "form-error";

/// Remove every inline error from the form and reset invalid markers.
///
/// Idempotent: on a form with no annotations this changes nothing.
pub fn clear_errors(doc: &mut Document, form: NodeId) -> Result<(), DomError> {
    for class in [FIELD_ERROR_CLASS, FORM_ERROR_CLASS] {
        for error in query_selector_all(doc, form, &Selector::Class(class.into())) {
            doc.remove(error)?;
        }
    }

    let invalid: Vec<NodeId> = doc
        .descendants(form)
        .into_iter()
        .filter(|id| doc.attr(*id, "aria-invalid") == Some("true"))
        .collect();

    for field in invalid {
        doc.remove_attr(field, "aria-invalid")?;
        doc.set_custom_validity(field, "")?;
    }
    Ok(())
}

/// Mark `field` invalid and insert a red error label right after it.
pub fn show_field_error(doc: &mut Document, field: NodeId, message: &str) -> Result<NodeId, DomError> {
    if doc.element(field).is_none() {
        return Err(DomError::UnknownNode(field));
    }
    if !doc.is_connected(field) {
        return Err(DomError::Detached(field));
    }

    doc.set_attr(field, "aria-invalid", "true")?;
    doc.set_custom_validity(field, message)?;

    let error = error_label(doc, FIELD_ERROR_CLASS, message)?;
    doc.insert_after(field, error)?;
    Ok(error)
}

/// Form-level error shown at the top of the form, for failures that cannot be
/// attributed to a single field.
pub fn show_form_error(doc: &mut Document, form: NodeId, message: &str) -> Result<NodeId, DomError> {
    if !doc.is_connected(form) {
        return Err(DomError::Detached(form));
    }
    let error = error_label(doc, FORM_ERROR_CLASS, message)?;
    doc.set_attr(error, "role", "alert")?;
    doc.prepend_child(form, error)?;
    Ok(error)
}

fn error_label(doc: &mut Document, class: &str, message: &str) -> Result<NodeId, DomError> {
    let error = doc.create_element("div");
    doc.set_attr(error, "class", class)?;
    doc.set_style(error, "color", "red")?;
    doc.set_style(error, "font-size", "13px")?;
    doc.set_style(error, "margin-top", "4px")?;
    doc.set_text(error, message)?;
    Ok(error)
}

/// `(field name, message)` for every field currently showing an inline error.
pub fn field_errors(doc: &Document, form: NodeId) -> Vec<(String, String)> {
    query_selector_all(doc, form, &Selector::Class(FIELD_ERROR_CLASS.into()))
        .into_iter()
        .map(|error| {
            let message = doc.text_content(error);
            let name = preceding_sibling(doc, error)
                .and_then(|field| doc.attr(field, "name"))
                .unwrap_or_default()
                .to_string();
            (name, message)
        })
        .collect()
}

pub fn form_errors(doc: &Document, form: NodeId) -> Vec<String> {
    query_selector_all(doc, form, &Selector::Class(FORM_ERROR_CLASS.into()))
        .into_iter()
        .map(|error| doc.text_content(error))
        .collect()
}

fn preceding_sibling(doc: &Document, id: NodeId) -> Option<NodeId> {
    let parent = doc.parent(id)?;
    let siblings = doc.children(parent);
    let index = siblings.iter().position(|c| *c == id)?;
    index.checked_sub(1).map(|i| siblings[i])
}
