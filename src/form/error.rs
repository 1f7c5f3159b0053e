use std::fmt;

use crate::dom::error::DomError;
use crate::form::gateway::TransportError;

#[derive(Debug)]
pub enum FormError {
    /// Page fixture or config file could not be read
    Io { path: String, source: std::io::Error },

    /// YAML parsing failed (page fixture)
    YamlParse { context: String, source: serde_yaml::Error },

    /// Document operation failed
    Dom(DomError),

    /// HTTP transport could not be built
    Transport(TransportError),

    /// Form or toast element required by the command is absent
    MissingHost(String),
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::Io { path, source } => {
                write!(f, "Failed to read '{}': {}", path, source)
            }
            FormError::YamlParse { context, source } => {
                write!(f, "YAML parse error ({}): {}", context, source)
            }
            FormError::Dom(e) => write!(f, "DOM error: {}", e),
            FormError::Transport(e) => write!(f, "Transport error: {}", e),
            FormError::MissingHost(msg) => write!(f, "Missing host element: {}", msg),
        }
    }
}

impl std::error::Error for FormError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FormError::Io { source, .. } => Some(source),
            FormError::YamlParse { source, .. } => Some(source),
            FormError::Dom(e) => Some(e),
            FormError::Transport(e) => Some(e),
            FormError::MissingHost(_) => None,
        }
    }
}

impl From<DomError> for FormError {
    fn from(e: DomError) -> Self {
        FormError::Dom(e)
    }
}

impl From<TransportError> for FormError {
    fn from(e: TransportError) -> Self {
        FormError::Transport(e)
    }
}
