use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

pub const REQUIRED_FIELDS: &[&str] = &[
    "restaurantName",
    "ownerName",
    "email",
    "phone",
    "city",
    "cuisine",
];

pub const DEFAULT_ENDPOINT: &str = "/api/partners";
pub const TOAST_DURATION_MS: u64 = 2000;

// ============================================================================
// Controller configuration
// ============================================================================

/// Everything the controller needs to know about the host page and its
/// messages. Defaults match the partner-with-us markup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormConfig {
    #[serde(default = "default_form_selector")]
    pub form_selector: String,

    #[serde(default = "default_toast_selector")]
    pub toast_selector: String,

    /// Checked in declared order
    #[serde(default = "default_required_fields")]
    pub required_fields: Vec<String>,

    #[serde(default = "default_required_message")]
    pub required_message: String,

    /// Field annotated when a failure carries no field-level detail
    #[serde(default = "default_failure_field")]
    pub failure_field: String,

    #[serde(default = "default_failure_message")]
    pub failure_message: String,

    /// Used when the form's `action` attribute is missing or blank
    #[serde(default = "default_endpoint")]
    pub default_endpoint: String,

    #[serde(default = "default_toast_class")]
    pub toast_class: String,

    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u64,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            form_selector: default_form_selector(),
            toast_selector: default_toast_selector(),
            required_fields: default_required_fields(),
            required_message: default_required_message(),
            failure_field: default_failure_field(),
            failure_message: default_failure_message(),
            default_endpoint: default_endpoint(),
            toast_class: default_toast_class(),
            toast_duration_ms: default_toast_duration_ms(),
        }
    }
}

fn default_form_selector() -> String { ".partner-form".to_string() }
fn default_toast_selector() -> String { "#partner-success-toast".to_string() }
fn default_required_fields() -> Vec<String> { REQUIRED_FIELDS.iter().map(|s| s.to_string()).collect() }
fn default_required_message() -> String { "This field is required".to_string() }
fn default_failure_field() -> String { "email".to_string() }
fn default_failure_message() -> String { "Submission failed. Please try again.".to_string() }
fn default_endpoint() -> String { DEFAULT_ENDPOINT.to_string() }
fn default_toast_class() -> String { "show".to_string() }
fn default_toast_duration_ms() -> u64 { TOAST_DURATION_MS }

// ============================================================================
// Trimmed payload
// ============================================================================

/// Field name -> trimmed value, in the order names first appeared in the form.
///
/// Field names are expected to be unique. A repeated name overwrites the
/// earlier value in place (last write wins).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrimmedPayload {
    entries: Vec<(String, String)>,
}

impl TrimmedPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trims `value` and stores it. Returns the overwritten value, if any.
    pub fn insert(&mut self, name: &str, value: &str) -> Option<String> {
        let trimmed = value.trim().to_string();
        match self.entries.iter_mut().find(|(k, _)| k == name) {
            Some(entry) => Some(std::mem::replace(&mut entry.1, trimmed)),
            None => {
                self.entries.push((name.to_string(), trimmed));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Serialize for TrimmedPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

// ============================================================================
// Validation
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Required names that were absent or empty, in declared order
    pub missing: Vec<String>,

    /// Subset of `missing` whose element could not be found to annotate
    pub unannotated: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.missing.is_empty()
    }
}
