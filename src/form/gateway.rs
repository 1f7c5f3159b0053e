use std::fmt;
use std::time::Duration;

use reqwest::Url;
use reqwest::header::{CONTENT_TYPE, COOKIE};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dom::dom_model::{Document, NodeId};
use crate::form::form_model::TrimmedPayload;

pub const JSON_CONTENT_TYPE: &str = "application/json";

// ============================================================================
// Request / response model
// ============================================================================

/// fetch() credential policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CredentialsMode {
    Omit,
    SameOrigin,
    Include,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRequest {
    pub method: &'static str,
    pub endpoint: String,
    pub content_type: &'static str,
    pub credentials: CredentialsMode,
    pub body: TrimmedPayload,
}

impl SubmissionRequest {
    pub fn json(endpoint: &str, body: TrimmedPayload) -> Self {
        Self {
            method: "POST",
            endpoint: endpoint.to_string(),
            content_type: JSON_CONTENT_TYPE,
            credentials: CredentialsMode::SameOrigin,
            body,
        }
    }

    pub fn body_json(&self) -> Result<String, TransportError> {
        self.body
            .to_json()
            .map_err(|e| TransportError::Request(format!("payload serialization failed: {}", e)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Endpoint could not be resolved to an absolute URL
    InvalidUrl { endpoint: String, reason: String },

    /// Connection refused, DNS failure, reset, offline
    Connect(String),

    /// No response within the configured timeout
    Timeout(String),

    /// Request could not be built or its body could not be produced
    Request(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::InvalidUrl { endpoint, reason } => {
                write!(f, "Invalid endpoint '{}': {}", endpoint, reason)
            }
            TransportError::Connect(msg) => write!(f, "Connection failed: {}", msg),
            TransportError::Timeout(msg) => write!(f, "Request timed out: {}", msg),
            TransportError::Request(msg) => write!(f, "Request failed: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout(e.to_string())
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else {
            TransportError::Request(e.to_string())
        }
    }
}

/// How a submission attempt ended. Transport failures are values here, never
/// panics or propagated errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// 2xx response
    Accepted { status: u16 },

    /// Any other status; body kept for structured error detail
    Rejected { status: u16, body: String },

    /// No response at all
    TransportFailed { error: TransportError },
}

impl SubmissionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmissionOutcome::Accepted { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            SubmissionOutcome::Accepted { status } | SubmissionOutcome::Rejected { status, .. } => {
                Some(*status)
            }
            SubmissionOutcome::TransportFailed { .. } => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SubmissionOutcome::Accepted { .. } => "accepted",
            SubmissionOutcome::Rejected { .. } => "rejected",
            SubmissionOutcome::TransportFailed { .. } => "transport_failed",
        }
    }
}

// ============================================================================
// Transport seam
// ============================================================================

/// Performs the single network request of a submit cycle.
pub trait Transport {
    fn send(&self, request: &SubmissionRequest) -> Result<TransportResponse, TransportError>;
}

/// Form's trimmed `action` attribute, or `default` when missing or blank.
pub fn resolve_endpoint(doc: &Document, form: NodeId, default: &str) -> String {
    doc.attr(form, "action")
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(default)
        .to_string()
}

/// Issue the request and fold every result into a `SubmissionOutcome`.
pub fn send_real_request(transport: &dyn Transport, request: &SubmissionRequest) -> SubmissionOutcome {
    debug!(endpoint = %request.endpoint, fields = request.body.len(), "sending submission");
    match transport.send(request) {
        Ok(response) if response.ok() => SubmissionOutcome::Accepted {
            status: response.status,
        },
        Ok(response) => SubmissionOutcome::Rejected {
            status: response.status,
            body: response.body,
        },
        Err(error) => SubmissionOutcome::TransportFailed { error },
    }
}

// ============================================================================
// HTTP transport (reqwest blocking)
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HttpConfig {
    /// Origin the page is served from; relative endpoints resolve against it
    #[serde(default)]
    pub origin: Option<String>,

    /// Cookie header sent when credentials apply
    #[serde(default)]
    pub cookie: Option<String>,

    /// Overrides the client's default request timeout
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

pub struct HttpTransport {
    client: reqwest::blocking::Client,
    origin: Option<Url>,
    cookie: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &HttpConfig) -> Result<Self, TransportError> {
        let origin = match config.origin.as_deref() {
            Some(o) => Some(Url::parse(o).map_err(|e| TransportError::InvalidUrl {
                endpoint: o.to_string(),
                reason: e.to_string(),
            })?),
            None => None,
        };

        let mut builder = reqwest::blocking::Client::builder();
        if let Some(ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            origin,
            cookie: config.cookie.clone(),
        })
    }

    /// Absolute endpoints pass through; relative ones need a page origin.
    pub fn resolve_url(&self, endpoint: &str) -> Result<Url, TransportError> {
        let resolved = match &self.origin {
            Some(base) => base.join(endpoint),
            None => Url::parse(endpoint),
        };
        resolved.map_err(|e| TransportError::InvalidUrl {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
    }

    /// Whether the cookie header accompanies a request to `url`.
    pub fn sends_credentials(&self, url: &Url, mode: CredentialsMode) -> bool {
        match mode {
            CredentialsMode::Omit => false,
            CredentialsMode::Include => true,
            CredentialsMode::SameOrigin => self
                .origin
                .as_ref()
                .is_some_and(|o| o.origin() == url.origin()),
        }
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &SubmissionRequest) -> Result<TransportResponse, TransportError> {
        let url = self.resolve_url(&request.endpoint)?;
        let body = request.body_json()?;

        let mut builder = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, request.content_type)
            .body(body);

        if let Some(cookie) = &self.cookie {
            if self.sends_credentials(&url, request.credentials) {
                builder = builder.header(COOKIE, cookie.as_str());
            }
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        // Body is only read for structured error detail; an unreadable body is empty.
        let body = response.text().unwrap_or_default();
        info!(url = %url, status, "submission response");

        Ok(TransportResponse { status, body })
    }
}
