use tracing::{debug, info, warn};

use crate::dom::dom_model::{Document, NodeId};
use crate::dom::error::DomError;
use crate::dom::query::{field_by_name, find};
use crate::form::annotations::clear_errors;
use crate::form::caret::{PointerDownEffect, handle_pointer_down};
use crate::form::collector::get_trimmed_data;
use crate::form::form_model::{FormConfig, ValidationReport};
use crate::form::gateway::{
    SubmissionOutcome, SubmissionRequest, Transport, resolve_endpoint, send_real_request,
};
use crate::form::notifier::{Feedback, apply_outcome};
use crate::form::validator::check_form;
use crate::page::timers::TimerQueue;

/// First half of a submit cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitStep {
    /// Required fields missing; annotated, nothing sent
    Invalid(ValidationReport),

    /// A previous submission has not finished yet
    AlreadyPending,

    /// Send this request, then call `finish_submit`
    Ready(SubmissionRequest),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitResult {
    Invalid(ValidationReport),
    AlreadyPending,
    /// `finish_submit` called with nothing in flight
    NotPending,
    Completed {
        request: SubmissionRequest,
        outcome: SubmissionOutcome,
        feedback: Feedback,
    },
}

impl SubmitResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitResult::Completed { outcome, .. } if outcome.is_accepted())
    }
}

/// Handle returned by `attach`. Owns the controller state for one form; the
/// document itself stays with the caller.
#[derive(Debug)]
pub struct FormController {
    form: NodeId,
    toast: NodeId,
    config: FormConfig,
    pending: Option<SubmissionRequest>,
    disabled_controls: Vec<NodeId>,
    added_novalidate: bool,
    missing_required: Vec<String>,
}

impl FormController {
    /// Locate the form and toast and take over submission.
    ///
    /// Returns `None` when either host element is absent; the page then keeps
    /// its native behavior.
    pub fn attach(doc: &mut Document, config: FormConfig) -> Option<Self> {
        let form = lookup(doc, &config.form_selector)?;
        let toast = lookup(doc, &config.toast_selector)?;

        // Native tooltips off; annotations replace them.
        let added_novalidate = !doc.has_attr(form, "novalidate");
        if added_novalidate {
            doc.set_attr(form, "novalidate", "").ok()?;
        }

        let missing_required: Vec<String> = config
            .required_fields
            .iter()
            .filter(|name| field_by_name(doc, form, name).is_none())
            .cloned()
            .collect();
        if !missing_required.is_empty() {
            warn!(fields = ?missing_required, "required fields absent from form markup");
        }

        info!(form = %form, toast = %toast, "form controller attached");
        Some(Self {
            form,
            toast,
            config,
            pending: None,
            disabled_controls: Vec::new(),
            added_novalidate,
            missing_required,
        })
    }

    pub fn form(&self) -> NodeId {
        self.form
    }

    pub fn toast(&self) -> NodeId {
        self.toast
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Required field names that had no element at attach time.
    pub fn missing_required_elements(&self) -> &[String] {
        &self.missing_required
    }

    /// Clear, collect, validate. On `Ready` the controller is pending until
    /// `finish_submit` runs.
    pub fn begin_submit(&mut self, doc: &mut Document) -> Result<SubmitStep, DomError> {
        if self.pending.is_some() {
            debug!("submit ignored; previous submission still in flight");
            return Ok(SubmitStep::AlreadyPending);
        }

        clear_errors(doc, self.form)?;
        let data = get_trimmed_data(doc, self.form);

        let report = check_form(
            doc,
            self.form,
            &data,
            &self.config.required_fields,
            &self.config.required_message,
        );
        if !report.is_valid() {
            info!(missing = ?report.missing, "submission blocked by validation");
            return Ok(SubmitStep::Invalid(report));
        }

        let endpoint = resolve_endpoint(doc, self.form, &self.config.default_endpoint);
        let request = SubmissionRequest::json(&endpoint, data);
        self.disable_submit_controls(doc)?;
        self.pending = Some(request.clone());
        Ok(SubmitStep::Ready(request))
    }

    /// Apply the response (or transport failure) of the pending submission.
    pub fn finish_submit(
        &mut self,
        doc: &mut Document,
        timers: &mut TimerQueue,
        outcome: SubmissionOutcome,
    ) -> Result<SubmitResult, DomError> {
        let Some(request) = self.pending.take() else {
            debug!("finish_submit without a pending submission");
            return Ok(SubmitResult::NotPending);
        };
        self.restore_submit_controls(doc)?;

        let feedback = apply_outcome(doc, timers, self.form, self.toast, &self.config, &outcome)?;
        Ok(SubmitResult::Completed {
            request,
            outcome,
            feedback,
        })
    }

    /// Full submit cycle with the transport call in between.
    pub fn submit(
        &mut self,
        doc: &mut Document,
        timers: &mut TimerQueue,
        transport: &dyn Transport,
    ) -> Result<SubmitResult, DomError> {
        match self.begin_submit(doc)? {
            SubmitStep::Invalid(report) => Ok(SubmitResult::Invalid(report)),
            SubmitStep::AlreadyPending => Ok(SubmitResult::AlreadyPending),
            SubmitStep::Ready(request) => {
                let outcome = send_real_request(transport, &request);
                self.finish_submit(doc, timers, outcome)
            }
        }
    }

    pub fn pointer_down(&self, doc: &mut Document, target: NodeId) -> PointerDownEffect {
        if target != self.form && !doc.descendants(self.form).contains(&target) {
            return PointerDownEffect::untouched();
        }
        handle_pointer_down(doc, target)
    }

    /// Undo what `attach` changed on the form. Returns `(form, toast)`.
    pub fn detach(mut self, doc: &mut Document) -> Result<(NodeId, NodeId), DomError> {
        self.restore_submit_controls(doc)?;
        if self.added_novalidate {
            doc.remove_attr(self.form, "novalidate")?;
        }
        info!(form = %self.form, "form controller detached");
        Ok((self.form, self.toast))
    }

    fn disable_submit_controls(&mut self, doc: &mut Document) -> Result<(), DomError> {
        let controls: Vec<NodeId> = doc
            .descendants(self.form)
            .into_iter()
            .filter(|id| {
                doc.element(*id)
                    .is_some_and(|e| e.is_submit_control() && !e.is_disabled())
            })
            .collect();
        for id in &controls {
            doc.set_attr(*id, "disabled", "")?;
        }
        self.disabled_controls = controls;
        Ok(())
    }

    fn restore_submit_controls(&mut self, doc: &mut Document) -> Result<(), DomError> {
        for id in self.disabled_controls.drain(..) {
            doc.remove_attr(id, "disabled")?;
        }
        Ok(())
    }
}

fn lookup(doc: &Document, selector: &str) -> Option<NodeId> {
    match find(doc, selector) {
        Ok(found) => {
            if found.is_none() {
                debug!(selector, "host element not found; controller stays inactive");
            }
            found
        }
        Err(e) => {
            debug!(selector, error = %e, "host selector unusable; controller stays inactive");
            None
        }
    }
}
