pub mod cli;
pub mod dom;
pub mod form;
pub mod page;
pub mod report;
pub mod trace;

pub use dom::dom_model::{Document, NodeId};
pub use form::controller::{FormController, SubmitResult, SubmitStep};
pub use form::form_model::{FormConfig, TrimmedPayload};
pub use form::gateway::{HttpTransport, SubmissionOutcome, Transport};
pub use page::runtime::{Page, PageEvent};
