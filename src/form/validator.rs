use tracing::warn;

use crate::dom::dom_model::{Document, NodeId};
use crate::dom::query::field_by_name;
use crate::form::annotations::show_field_error;
use crate::form::form_model::{TrimmedPayload, ValidationReport};

/// Required names whose value is absent or empty, in declared order.
pub fn missing_fields(data: &TrimmedPayload, required: &[String]) -> Vec<String> {
    required
        .iter()
        .filter(|name| data.get(name).is_none_or(|v| v.is_empty()))
        .cloned()
        .collect()
}

/// Annotate every missing required field and report the outcome.
///
/// All failures are annotated in one pass. A required field with no element in
/// the form still counts as missing; only its annotation is skipped.
pub fn check_form(
    doc: &mut Document,
    form: NodeId,
    data: &TrimmedPayload,
    required: &[String],
    message: &str,
) -> ValidationReport {
    let mut report = ValidationReport {
        missing: missing_fields(data, required),
        unannotated: Vec::new(),
    };

    for name in &report.missing {
        let annotated = field_by_name(doc, form, name)
            .map(|field| show_field_error(doc, field, message));

        match annotated {
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                warn!(field = %name, error = %e, "could not annotate required field");
                report.unannotated.push(name.clone());
            }
            None => {
                warn!(field = %name, "required field has no element in the form");
                report.unannotated.push(name.clone());
            }
        }
    }

    report
}

/// True iff every required field is present and non-empty.
pub fn validate_form(
    doc: &mut Document,
    form: NodeId,
    data: &TrimmedPayload,
    required: &[String],
    message: &str,
) -> bool {
    check_form(doc, form, data, required, message).is_valid()
}
