use tracing::warn;

use crate::dom::dom_model::{Document, Element, NodeId};
use crate::form::form_model::TrimmedPayload;

/// Input types that never contribute a form-data entry on their own.
const SKIPPED_INPUT_TYPES: &[&str] = &["submit", "button", "reset", "image", "file"];

/// Collect the form's current entries and trim every value.
///
/// Controls without a name are dropped. When two controls share a name the
/// later one wins and a warning is logged.
pub fn get_trimmed_data(doc: &Document, form: NodeId) -> TrimmedPayload {
    let mut data = TrimmedPayload::new();

    for id in doc.descendants(form) {
        let Some(element) = doc.element(id) else {
            continue;
        };
        let Some(name) = entry_name(element) else {
            continue;
        };
        if !contributes_entry(element) {
            continue;
        }

        if let Some(previous) = data.insert(name, &element.value) {
            warn!(
                field = name,
                dropped = %previous,
                "duplicate field name in form; earlier value overwritten"
            );
        }
    }

    data
}

fn entry_name(element: &Element) -> Option<&str> {
    element.name().filter(|n| !n.is_empty())
}

fn contributes_entry(element: &Element) -> bool {
    if !element.is_form_control() || element.is_disabled() {
        return false;
    }
    if let Some(t) = element.input_type() {
        if SKIPPED_INPUT_TYPES.contains(&t.as_str()) {
            return false;
        }
    }
    if element.is_checkable() {
        return element.checked;
    }
    true
}
