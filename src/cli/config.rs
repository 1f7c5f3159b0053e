use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::form::form_model::FormConfig;
use crate::form::gateway::HttpConfig;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "partner-form",
    version,
    about = "Headless driver for the partner-with-us form controller"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: partner-form.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fill the form from a page fixture and submit it to the backend
    Submit {
        /// Page fixture YAML
        #[arg(long)]
        page: String,

        /// Field value to type before submitting (repeatable): name=value
        #[arg(long = "set", value_parser = parse_assignment)]
        set: Vec<(String, String)>,

        /// Origin the page is served from; relative actions resolve against it
        #[arg(long)]
        origin: Option<String>,

        /// Cookie header sent with same-origin requests
        #[arg(long)]
        cookie: Option<String>,

        /// Request timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Append a JSONL trace record to this file
        #[arg(long)]
        trace: Option<String>,
    },

    /// Run validation only; nothing is sent
    Validate {
        /// Page fixture YAML
        #[arg(long)]
        page: String,

        /// Field value to type before validating (repeatable): name=value
        #[arg(long = "set", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },
}

/// Parse `name=value`. The value may be empty or contain further `=`.
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty field name in '{}'", raw));
    }
    Ok((name.to_string(), value.to_string()))
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `partner-form.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub trace: Option<String>,
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("partner-form.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = config_path, error = %e, "malformed config; using defaults");
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// CLI values override the config file's `http` section.
pub fn build_http_config(
    config: &HttpConfig,
    origin: Option<&str>,
    cookie: Option<&str>,
    timeout_ms: Option<u64>,
) -> HttpConfig {
    HttpConfig {
        origin: origin.map(str::to_string).or_else(|| config.origin.clone()),
        cookie: cookie.map(str::to_string).or_else(|| config.cookie.clone()),
        timeout_ms: timeout_ms.or(config.timeout_ms),
    }
}

/// Map `-v` count to a tracing filter directive. `RUST_LOG` wins when set.
pub fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
