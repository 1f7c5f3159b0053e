use std::cell::RefCell;
use std::collections::VecDeque;

use partner_form::form::gateway::{SubmissionRequest, Transport, TransportError, TransportResponse};
use partner_form::page::page_model::load_page;
use partner_form::{FormConfig, Page};

pub fn fixture(name: &str) -> String {
    let base = std::env::current_dir().unwrap();
    let path = base.join("tests").join("fixtures").join(name);
    path.display().to_string()
}

/// The partner page, loaded and with the controller attached.
pub fn partner_page() -> Page {
    let document = load_page(&fixture("partner_page.yaml")).unwrap();
    let mut page = Page::new(document, FormConfig::default());
    assert!(page.load(), "controller should attach to the fixture page");
    page
}

pub fn fill_valid(page: &mut Page) {
    for (name, value) in valid_values() {
        page.fill(name, value).unwrap();
    }
}

pub fn valid_values() -> Vec<(&'static str, &'static str)> {
    vec![
        ("restaurantName", "Tasty Bites"),
        ("ownerName", "J. Doe"),
        ("email", "j@x.com"),
        ("phone", "555-1234"),
        ("city", "Metropolis"),
        ("cuisine", "Italian"),
    ]
}

/// Records every request and replays scripted responses in order.
pub struct ScriptedTransport {
    responses: RefCell<VecDeque<Result<TransportResponse, TransportError>>>,
    pub requests: RefCell<Vec<SubmissionRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(VecDeque::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn status(status: u16) -> Self {
        Self::new().then_status(status, "")
    }

    pub fn then_status(self, status: u16, body: &str) -> Self {
        self.responses.borrow_mut().push_back(Ok(TransportResponse {
            status,
            body: body.to_string(),
        }));
        self
    }

    pub fn failing(error: TransportError) -> Self {
        let transport = Self::new();
        transport.responses.borrow_mut().push_back(Err(error));
        transport
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> SubmissionRequest {
        self.requests.borrow().last().cloned().expect("no request sent")
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: &SubmissionRequest) -> Result<TransportResponse, TransportError> {
        self.requests.borrow_mut().push(request.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Connect("no scripted response".into())))
    }
}
