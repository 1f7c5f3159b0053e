use tracing::debug;

use crate::dom::dom_model::{Document, NodeId};
use crate::dom::error::DomError;
use crate::dom::query::field_by_name;
use crate::form::caret::PointerDownEffect;
use crate::form::controller::{FormController, SubmitResult};
use crate::form::form_model::FormConfig;
use crate::form::gateway::Transport;
use crate::page::timers::TimerQueue;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::SubmissionTraceEvent;

/// Events a host page delivers to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// DOMContentLoaded
    Loaded,
    Submit,
    PointerDown(NodeId),
    Input { target: NodeId, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// No controller attached, or the event does not concern it
    Ignored,
    Attached,
    Submitted(SubmitResult),
    PointerDown(PointerDownEffect),
    ValueChanged,
}

/// A loaded page: document, timers and the (optional) attached controller.
pub struct Page {
    pub document: Document,
    pub timers: TimerQueue,
    config: FormConfig,
    controller: Option<FormController>,
    loaded: bool,
    tracer: Option<TraceLogger>,
    attempts: u64,
}

impl Page {
    pub fn new(document: Document, config: FormConfig) -> Self {
        Self {
            document,
            timers: TimerQueue::new(),
            config,
            controller: None,
            loaded: false,
            tracer: None,
            attempts: 0,
        }
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = Some(tracer);
        self
    }

    pub fn controller(&self) -> Option<&FormController> {
        self.controller.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.controller.is_some()
    }

    pub fn dispatch(
        &mut self,
        event: PageEvent,
        transport: &dyn Transport,
    ) -> Result<EventOutcome, DomError> {
        match event {
            PageEvent::Loaded => Ok(if self.load() {
                EventOutcome::Attached
            } else {
                EventOutcome::Ignored
            }),
            PageEvent::Submit => Ok(match self.submit(transport)? {
                Some(result) => EventOutcome::Submitted(result),
                None => EventOutcome::Ignored,
            }),
            PageEvent::PointerDown(target) => Ok(match self.pointer_down(target) {
                Some(effect) => EventOutcome::PointerDown(effect),
                None => EventOutcome::Ignored,
            }),
            PageEvent::Input { target, value } => {
                self.document.set_value(target, &value)?;
                Ok(EventOutcome::ValueChanged)
            }
        }
    }

    /// Wire up the controller. Runs once; later calls report the current state.
    pub fn load(&mut self) -> bool {
        if !self.loaded {
            self.loaded = true;
            self.controller = FormController::attach(&mut self.document, self.config.clone());
        }
        self.controller.is_some()
    }

    /// Type `value` into the first control named `name` anywhere on the page.
    pub fn fill(&mut self, name: &str, value: &str) -> Result<(), DomError> {
        let root = self.document.root();
        let field = field_by_name(&self.document, root, name)
            .ok_or_else(|| DomError::NoSuchField(name.to_string()))?;
        self.document.set_value(field, value)
    }

    /// `None` when the controller is inactive (missing host elements).
    pub fn submit(&mut self, transport: &dyn Transport) -> Result<Option<SubmitResult>, DomError> {
        let Some(controller) = self.controller.as_mut() else {
            debug!("submit on a page without an active controller");
            return Ok(None);
        };
        let result = controller.submit(&mut self.document, &mut self.timers, transport)?;
        self.attempts += 1;
        if let Some(tracer) = &self.tracer {
            tracer.log(&SubmissionTraceEvent::now(self.attempts).with_result(&result));
        }
        Ok(Some(result))
    }

    pub fn pointer_down(&mut self, target: NodeId) -> Option<PointerDownEffect> {
        let controller = self.controller.as_ref()?;
        Some(controller.pointer_down(&mut self.document, target))
    }

    /// Advance the virtual clock, firing due timers. Returns how many ran.
    pub fn advance_time(&mut self, delta_ms: u64) -> usize {
        self.timers.advance_time(delta_ms, &mut self.document)
    }

    /// Detach the controller; subsequent events are ignored.
    pub fn unload(&mut self) -> Result<bool, DomError> {
        match self.controller.take() {
            Some(controller) => {
                controller.detach(&mut self.document)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
