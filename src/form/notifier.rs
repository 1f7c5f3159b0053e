use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::{info, warn};

use crate::dom::dom_model::{Document, NodeId};
use crate::dom::error::DomError;
use crate::dom::query::field_by_name;
use crate::form::annotations::{show_field_error, show_form_error};
use crate::form::form_model::FormConfig;
use crate::form::gateway::SubmissionOutcome;
use crate::page::timers::{TimerQueue, TimerTask};

/// What the user was shown after a submission completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    /// Form reset and toast made visible
    Toast,

    /// Inline errors attached to these field names
    FieldErrors(Vec<String>),

    /// No field could be blamed; a form-level error was shown
    FormError(String),
}

/// Optional structured detail in a rejection body:
/// `{"errors": {"email": "Already registered"}}`
#[derive(Debug, Default, Deserialize)]
struct RejectionBody {
    #[serde(default)]
    errors: BTreeMap<String, String>,
}

/// Make the toast visible and schedule its hide.
pub fn show_toast(
    doc: &mut Document,
    timers: &mut TimerQueue,
    toast: NodeId,
    class: &str,
    duration_ms: u64,
) -> Result<(), DomError> {
    doc.add_class(toast, class)?;
    timers.schedule(
        duration_ms,
        TimerTask::HideToast {
            toast,
            class: class.to_string(),
        },
    );
    Ok(())
}

/// form.reset(): every control returns to its initial value.
pub fn reset_form(doc: &mut Document, form: NodeId) -> Result<(), DomError> {
    for id in doc.descendants(form) {
        let Some(element) = doc.element_mut(id) else {
            continue;
        };
        if !element.is_form_control() {
            continue;
        }
        element.value = element.default_value.clone();
        element.checked = element.default_checked;
        element.selection = None;
    }
    Ok(())
}

/// Turn a finished submission into user-visible feedback.
pub fn apply_outcome(
    doc: &mut Document,
    timers: &mut TimerQueue,
    form: NodeId,
    toast: NodeId,
    config: &FormConfig,
    outcome: &SubmissionOutcome,
) -> Result<Feedback, DomError> {
    match outcome {
        SubmissionOutcome::Accepted { status } => {
            info!(status, "submission accepted");
            reset_form(doc, form)?;
            show_toast(doc, timers, toast, &config.toast_class, config.toast_duration_ms)?;
            Ok(Feedback::Toast)
        }
        SubmissionOutcome::Rejected { status, body } => {
            warn!(status, "Server rejected submission: {}", status);
            let detail = parse_rejection(body);
            annotate_failure(doc, form, config, &detail)
        }
        SubmissionOutcome::TransportFailed { error } => {
            warn!(error = %error, "submission did not reach the server");
            annotate_failure(doc, form, config, &BTreeMap::new())
        }
    }
}

fn parse_rejection(body: &str) -> BTreeMap<String, String> {
    if body.trim().is_empty() {
        return BTreeMap::new();
    }
    serde_json::from_str::<RejectionBody>(body)
        .map(|b| b.errors)
        .unwrap_or_default()
}

/// Structured field errors first, then the configured fallback field, then a
/// form-level message.
fn annotate_failure(
    doc: &mut Document,
    form: NodeId,
    config: &FormConfig,
    detail: &BTreeMap<String, String>,
) -> Result<Feedback, DomError> {
    let mut annotated = Vec::new();
    for (name, message) in detail {
        match field_by_name(doc, form, name) {
            Some(field) => {
                show_field_error(doc, field, message)?;
                annotated.push(name.clone());
            }
            None => warn!(field = %name, "server reported an error for an unknown field"),
        }
    }
    if !annotated.is_empty() {
        return Ok(Feedback::FieldErrors(annotated));
    }

    if let Some(field) = field_by_name(doc, form, &config.failure_field) {
        show_field_error(doc, field, &config.failure_message)?;
        return Ok(Feedback::FieldErrors(vec![config.failure_field.clone()]));
    }

    warn!(field = %config.failure_field, "fallback error field missing; showing form-level error");
    show_form_error(doc, form, &config.failure_message)?;
    Ok(Feedback::FormError(config.failure_message.clone()))
}
