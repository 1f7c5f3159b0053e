use serde::Serialize;
use sha1::{Digest, Sha1};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::form::controller::SubmitResult;
use crate::form::form_model::TrimmedPayload;
use crate::form::gateway::SubmissionOutcome;
use crate::form::notifier::Feedback;

/// One JSONL record per submit attempt. Field values never appear in the
/// trace, only their names and a fingerprint of the body.
#[derive(Debug, Serialize)]
pub struct SubmissionTraceEvent {
    pub timestamp_ms: u128,
    pub attempt: u64,

    pub outcome: String,

    pub endpoint: Option<String>,
    pub status: Option<u16>,
    pub error: Option<String>,

    pub fields: Vec<String>,
    pub payload_fingerprint: Option<String>,

    pub missing_fields: Vec<String>,
    pub feedback: Option<String>,
}

impl SubmissionTraceEvent {
    pub fn now(attempt: u64) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            attempt,
            outcome: String::new(),
            endpoint: None,
            status: None,
            error: None,
            fields: vec![],
            payload_fingerprint: None,
            missing_fields: vec![],
            feedback: None,
        }
    }

    pub fn with_result(mut self, result: &SubmitResult) -> Self {
        match result {
            SubmitResult::Invalid(report) => {
                self.outcome = "invalid".into();
                self.missing_fields = report.missing.clone();
            }
            SubmitResult::AlreadyPending => self.outcome = "already_pending".into(),
            SubmitResult::NotPending => self.outcome = "not_pending".into(),
            SubmitResult::Completed {
                request,
                outcome,
                feedback,
            } => {
                self.outcome = outcome.label().into();
                self.endpoint = Some(request.endpoint.clone());
                self.status = outcome.status();
                if let SubmissionOutcome::TransportFailed { error } = outcome {
                    self.error = Some(error.to_string());
                }
                self = self.with_payload(&request.body);
                self.feedback = Some(describe_feedback(feedback));
            }
        }
        self
    }

    pub fn with_payload(mut self, payload: &TrimmedPayload) -> Self {
        self.fields = payload.names().map(str::to_string).collect();
        self.payload_fingerprint = payload.to_json().ok().map(|json| payload_fingerprint(&json));
        self
    }
}

pub fn payload_fingerprint(body: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(body.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn describe_feedback(feedback: &Feedback) -> String {
    match feedback {
        Feedback::Toast => "toast".into(),
        Feedback::FieldErrors(fields) => format!("field_errors:{}", fields.join(",")),
        Feedback::FormError(_) => "form_error".into(),
    }
}
