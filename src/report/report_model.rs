use serde::Serialize;

use crate::form::annotations::{field_errors, form_errors};
use crate::form::controller::SubmitResult;
use crate::form::gateway::SubmissionOutcome;
use crate::page::runtime::Page;

/// What the user would see after a submit, for printing by the CLI.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubmissionReport {
    pub outcome: String,
    pub accepted: bool,
    pub endpoint: Option<String>,
    pub status: Option<u16>,
    pub error: Option<String>,

    /// `(field, message)` for each inline annotation
    pub field_errors: Vec<(String, String)>,
    pub form_errors: Vec<String>,

    /// Toast visible right after the response was applied
    pub toast_shown: bool,
    /// Toast visible after the timers ran out
    pub toast_visible_at_end: bool,

    pub payload_fields: Vec<String>,
}

impl SubmissionReport {
    /// Snapshot of the page right after `submit` returned.
    pub fn capture(page: &Page, result: &SubmitResult) -> Self {
        let (form, toast, toast_class) = match page.controller() {
            Some(c) => (Some(c.form()), Some(c.toast()), c.config().toast_class.clone()),
            None => (None, None, String::new()),
        };

        let mut report = SubmissionReport {
            outcome: String::new(),
            accepted: result.is_accepted(),
            endpoint: None,
            status: None,
            error: None,
            field_errors: form.map(|f| field_errors(&page.document, f)).unwrap_or_default(),
            form_errors: form.map(|f| form_errors(&page.document, f)).unwrap_or_default(),
            toast_shown: toast.is_some_and(|t| page.document.has_class(t, &toast_class)),
            toast_visible_at_end: false,
            payload_fields: Vec::new(),
        };

        match result {
            SubmitResult::Invalid(_) => report.outcome = "invalid".into(),
            SubmitResult::AlreadyPending => report.outcome = "already_pending".into(),
            SubmitResult::NotPending => report.outcome = "not_pending".into(),
            SubmitResult::Completed {
                request, outcome, ..
            } => {
                report.outcome = outcome.label().into();
                report.endpoint = Some(request.endpoint.clone());
                report.status = outcome.status();
                if let SubmissionOutcome::TransportFailed { error } = outcome {
                    report.error = Some(error.to_string());
                }
                report.payload_fields = request.body.names().map(str::to_string).collect();
            }
        }

        report
    }

    /// Record toast visibility after the clock has been advanced.
    pub fn with_final_toast(mut self, page: &Page) -> Self {
        self.toast_visible_at_end = page
            .controller()
            .is_some_and(|c| page.document.has_class(c.toast(), &c.config().toast_class));
        self
    }
}

/// Result of `validate` (no network).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValidationSummary {
    pub valid: bool,
    pub missing: Vec<String>,
    pub field_errors: Vec<(String, String)>,
}
