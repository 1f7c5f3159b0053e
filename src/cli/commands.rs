use crate::cli::config::{AppConfig, build_http_config};
use crate::form::annotations::{clear_errors, field_errors};
use crate::form::collector::get_trimmed_data;
use crate::form::error::FormError;
use crate::form::gateway::HttpTransport;
use crate::form::validator::check_form;
use crate::page::page_model::load_page;
use crate::page::runtime::Page;
use crate::report::console::{format_submission_report, format_validation_summary};
use crate::report::report_model::{SubmissionReport, ValidationSummary};
use crate::trace::logger::TraceLogger;

// ============================================================================
// submit subcommand
// ============================================================================

/// Load the page, type the values, submit, and print what the user sees.
/// Returns whether the backend accepted the submission.
pub fn cmd_submit(
    config: &AppConfig,
    page_path: &str,
    values: &[(String, String)],
    origin: Option<&str>,
    cookie: Option<&str>,
    timeout_ms: Option<u64>,
    trace: Option<&str>,
    verbose: u8,
) -> Result<bool, Box<dyn std::error::Error>> {
    let http = build_http_config(&config.http, origin, cookie, timeout_ms);
    let transport = HttpTransport::new(&http).map_err(FormError::from)?;

    let mut page = open_page(config, page_path, values)?;
    if let Some(path) = trace.or(config.trace.as_deref()) {
        page = page.with_tracer(TraceLogger::new(path));
    }

    if verbose > 0 {
        eprintln!("Submitting {}...", page_path);
    }

    let result = page
        .submit(&transport)?
        .ok_or_else(|| FormError::MissingHost(host_description(config)))?;

    let report = SubmissionReport::capture(&page, &result);
    page.advance_time(config.form.toast_duration_ms);
    let report = report.with_final_toast(&page);

    print!("{}", format_submission_report(&report));
    Ok(report.accepted)
}

// ============================================================================
// validate subcommand
// ============================================================================

/// Validate only. Returns whether every required field is filled.
pub fn cmd_validate(
    config: &AppConfig,
    page_path: &str,
    values: &[(String, String)],
) -> Result<bool, Box<dyn std::error::Error>> {
    let mut page = open_page(config, page_path, values)?;
    let form = page
        .controller()
        .map(|c| c.form())
        .ok_or_else(|| FormError::MissingHost(host_description(config)))?;

    clear_errors(&mut page.document, form)?;
    let data = get_trimmed_data(&page.document, form);
    let report = check_form(
        &mut page.document,
        form,
        &data,
        &config.form.required_fields,
        &config.form.required_message,
    );

    let summary = ValidationSummary {
        valid: report.is_valid(),
        missing: report.missing,
        field_errors: field_errors(&page.document, form),
    };
    print!("{}", format_validation_summary(&summary));
    Ok(summary.valid)
}

// ============================================================================
// Helpers
// ============================================================================

fn open_page(
    config: &AppConfig,
    page_path: &str,
    values: &[(String, String)],
) -> Result<Page, FormError> {
    let document = load_page(page_path)?;
    let mut page = Page::new(document, config.form.clone());
    page.load();
    for (name, value) in values {
        page.fill(name, value)?;
    }
    Ok(page)
}

fn host_description(config: &AppConfig) -> String {
    format!(
        "page has no '{}' form or no '{}' toast",
        config.form.form_selector, config.form.toast_selector
    )
}
