use crate::report::report_model::{SubmissionReport, ValidationSummary};

// ============================================================================
// Console reporter: formatted terminal output
// ============================================================================

/// Format a submission report for terminal output.
///
/// Produces output like:
/// ```text
/// === Submission: rejected ===
/// endpoint: /api/partners (HTTP 422)
///
///   [ERROR] email: Submission failed. Please try again.
///
/// toast: not shown
/// ```
pub fn format_submission_report(report: &SubmissionReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Submission: {} ===\n", report.outcome));

    if let Some(endpoint) = &report.endpoint {
        match report.status {
            Some(status) => out.push_str(&format!("endpoint: {} (HTTP {})\n", endpoint, status)),
            None => out.push_str(&format!("endpoint: {}\n", endpoint)),
        }
    }
    if let Some(error) = &report.error {
        out.push_str(&format!("transport error: {}\n", error));
    }
    if !report.payload_fields.is_empty() {
        out.push_str(&format!("fields sent: {}\n", report.payload_fields.join(", ")));
    }

    push_errors(&mut out, &report.field_errors);
    for message in &report.form_errors {
        out.push_str(&format!("  [ERROR] (form): {}\n", message));
    }

    let toast = match (report.toast_shown, report.toast_visible_at_end) {
        (true, false) => "shown, then dismissed",
        (true, true) => "shown",
        (false, _) => "not shown",
    };
    out.push_str(&format!("\ntoast: {}\n", toast));

    out
}

pub fn format_validation_summary(summary: &ValidationSummary) -> String {
    let mut out = String::new();
    let marker = if summary.valid {
        "\u{2713} VALID"
    } else {
        "\u{2717} INVALID"
    };
    out.push_str(&format!("{}\n", marker));
    push_errors(&mut out, &summary.field_errors);

    // Missing fields with no element to carry an inline error
    for name in &summary.missing {
        if !summary.field_errors.iter().any(|(field, _)| field == name) {
            out.push_str(&format!("  [ERROR] {}: missing from form\n", name));
        }
    }
    out
}

fn push_errors(out: &mut String, errors: &[(String, String)]) {
    if errors.is_empty() {
        return;
    }
    out.push('\n');
    for (field, message) in errors {
        out.push_str(&format!("  [ERROR] {}: {}\n", field, message));
    }
}
