use partner_form::dom::dom_model::Document;
use partner_form::form::annotations::{clear_errors, field_errors, show_field_error, show_form_error};
use partner_form::form::collector::get_trimmed_data;
use partner_form::form::form_model::{FormConfig, TrimmedPayload};
use partner_form::form::gateway::resolve_endpoint;
use partner_form::form::notifier::reset_form;
use partner_form::form::validator::{missing_fields, validate_form};
use partner_form::page::page_model::{NodeSpec, PageSpec, build_document};
use partner_form::NodeId;

// =========================================================================
// Helpers
// =========================================================================

fn form_with(children: Vec<NodeSpec>) -> (Document, NodeId) {
    let mut form = NodeSpec::new("form").with_class("partner-form");
    form.children = children;
    let spec = PageSpec {
        title: String::new(),
        body: vec![form],
    };
    let doc = build_document(&spec).unwrap();
    let form = doc.children(doc.root())[0];
    (doc, form)
}

fn input(name: &str, value: &str) -> NodeSpec {
    NodeSpec::new("input")
        .with_attr("name", name)
        .with_attr("type", "text")
        .with_value(value)
}

fn required() -> Vec<String> {
    FormConfig::default().required_fields
}

fn snapshot(doc: &Document, form: NodeId) -> Vec<(String, Option<String>, String)> {
    doc.descendants(form)
        .into_iter()
        .map(|id| {
            let e = doc.element(id).unwrap();
            (
                e.tag.clone(),
                e.attr("aria-invalid").map(str::to_string),
                e.validation_message.clone(),
            )
        })
        .collect()
}

// =========================================================================
// TrimmedPayload
// =========================================================================

#[test]
fn payload_trims_and_keeps_first_position_on_overwrite() {
    let mut payload = TrimmedPayload::new();
    assert_eq!(payload.insert("a", "  one "), None);
    payload.insert("b", "two");
    assert_eq!(payload.insert("a", " three"), Some("one".to_string()));

    assert_eq!(payload.get("a"), Some("three"));
    assert_eq!(payload.names().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(payload.to_json().unwrap(), r#"{"a":"three","b":"two"}"#);
}

// =========================================================================
// Collector
// =========================================================================

#[test]
fn collector_trims_every_value() {
    let (doc, form) = form_with(vec![
        input("restaurantName", "  Tasty Bites  "),
        NodeSpec::new("textarea")
            .with_attr("name", "notes")
            .with_value("\tline one\n"),
    ]);

    let data = get_trimmed_data(&doc, form);

    assert_eq!(data.get("restaurantName"), Some("Tasty Bites"));
    assert_eq!(data.get("notes"), Some("line one"));
}

#[test]
fn collector_skips_unnamed_disabled_and_buttons() {
    let (doc, form) = form_with(vec![
        NodeSpec::new("input").with_value("no name"),
        input("", "empty name"),
        input("locked", "x").with_attr("disabled", ""),
        NodeSpec::new("input")
            .with_attr("name", "go")
            .with_attr("type", "submit")
            .with_value("Send"),
        NodeSpec::new("button").with_attr("name", "btn").with_text("Send"),
        input("city", "Metropolis"),
    ]);

    let data = get_trimmed_data(&doc, form);

    assert_eq!(data.names().collect::<Vec<_>>(), vec!["city"]);
}

#[test]
fn collector_includes_only_checked_checkables() {
    let (doc, form) = form_with(vec![
        NodeSpec {
            checked: true,
            ..NodeSpec::new("input")
                .with_attr("name", "delivery")
                .with_attr("type", "checkbox")
        },
        NodeSpec::new("input")
            .with_attr("name", "pickup")
            .with_attr("type", "checkbox"),
        NodeSpec {
            checked: true,
            ..NodeSpec::new("input")
                .with_attr("name", "size")
                .with_attr("type", "radio")
                .with_attr("value", "large")
        },
    ]);

    let data = get_trimmed_data(&doc, form);

    assert_eq!(data.get("delivery"), Some("on"));
    assert_eq!(data.get("pickup"), None);
    assert_eq!(data.get("size"), Some("large"));
}

#[test]
fn collector_duplicate_names_last_write_wins() {
    let (doc, form) = form_with(vec![input("email", "first@x.com"), input("email", "second@x.com")]);

    let data = get_trimmed_data(&doc, form);

    assert_eq!(data.len(), 1);
    assert_eq!(data.get("email"), Some("second@x.com"));
}

#[test]
fn collector_reflects_current_values_each_time() {
    let (mut doc, form) = form_with(vec![input("city", "Old")]);
    let city = doc.children(form)[0];

    let first = get_trimmed_data(&doc, form);
    doc.set_value(city, " New ").unwrap();
    let second = get_trimmed_data(&doc, form);

    assert_eq!(first.get("city"), Some("Old"));
    assert_eq!(second.get("city"), Some("New"));
}

#[test]
fn select_defaults_to_first_option() {
    let (doc, form) = form_with(vec![NodeSpec::new("select")
        .with_attr("name", "cuisine")
        .with_child(NodeSpec::new("option").with_attr("value", "Italian").with_text("Italian"))
        .with_child(NodeSpec::new("option").with_text("Thai"))]);

    let data = get_trimmed_data(&doc, form);

    assert_eq!(data.get("cuisine"), Some("Italian"));
}

// =========================================================================
// Validator
// =========================================================================

#[test]
fn missing_fields_respects_declared_order() {
    let mut data = TrimmedPayload::new();
    data.insert("email", "j@x.com");
    data.insert("city", "   ");

    let missing = missing_fields(&data, &required());

    assert_eq!(
        missing,
        vec!["restaurantName", "ownerName", "phone", "city", "cuisine"]
    );
}

#[test]
fn validate_form_annotates_without_short_circuit() {
    let (mut doc, form) = form_with(vec![
        input("restaurantName", ""),
        input("ownerName", "J. Doe"),
        input("email", ""),
    ]);
    let data = get_trimmed_data(&doc, form);
    let fields = vec!["restaurantName".to_string(), "ownerName".to_string(), "email".to_string()];

    let valid = validate_form(&mut doc, form, &data, &fields, "This field is required");

    assert!(!valid);
    let names: Vec<String> = field_errors(&doc, form).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["restaurantName", "email"]);
}

#[test]
fn validate_form_passes_when_everything_present() {
    let (mut doc, form) = form_with(vec![input("a", "1"), input("b", "2")]);
    let data = get_trimmed_data(&doc, form);
    let fields = vec!["a".to_string(), "b".to_string()];

    assert!(validate_form(&mut doc, form, &data, &fields, "required"));
    assert!(field_errors(&doc, form).is_empty());
}

// =========================================================================
// Annotations
// =========================================================================

#[test]
fn clear_errors_twice_equals_once() {
    let (mut doc, form) = form_with(vec![input("email", ""), input("city", "")]);
    let email = doc.children(form)[0];
    show_field_error(&mut doc, email, "bad").unwrap();
    show_form_error(&mut doc, form, "try again").unwrap();

    clear_errors(&mut doc, form).unwrap();
    let once = snapshot(&doc, form);
    clear_errors(&mut doc, form).unwrap();
    let twice = snapshot(&doc, form);

    assert_eq!(once, twice);
    assert_eq!(once.len(), 2, "only the two inputs remain");
    assert!(once.iter().all(|(_, invalid, msg)| invalid.is_none() && msg.is_empty()));
}

#[test]
fn clear_errors_on_clean_form_is_noop() {
    let (mut doc, form) = form_with(vec![input("email", "j@x.com")]);
    let before = snapshot(&doc, form);

    clear_errors(&mut doc, form).unwrap();

    assert_eq!(snapshot(&doc, form), before);
}

#[test]
fn show_field_error_on_detached_field_fails_cleanly() {
    let (mut doc, form) = form_with(vec![input("email", "")]);
    let orphan = doc.create_element("input");
    let before = snapshot(&doc, form);

    assert!(show_field_error(&mut doc, orphan, "bad").is_err());
    assert!(show_field_error(&mut doc, NodeId(999), "bad").is_err());
    assert_eq!(snapshot(&doc, form), before);
}

#[test]
fn form_error_is_first_child_with_alert_role() {
    let (mut doc, form) = form_with(vec![input("email", "")]);

    let error = show_form_error(&mut doc, form, "Submission failed").unwrap();

    assert_eq!(doc.children(form)[0], error);
    assert_eq!(doc.attr(error, "role"), Some("alert"));
}

// =========================================================================
// Reset and endpoint
// =========================================================================

#[test]
fn reset_restores_initial_values_and_checked_state() {
    let (mut doc, form) = form_with(vec![
        input("city", "Metropolis"),
        NodeSpec::new("input")
            .with_attr("name", "delivery")
            .with_attr("type", "checkbox"),
    ]);
    let city = doc.children(form)[0];
    let delivery = doc.children(form)[1];
    doc.set_value(city, "Gotham").unwrap();
    doc.set_checked(delivery, true).unwrap();

    reset_form(&mut doc, form).unwrap();

    assert_eq!(doc.value(city), Some("Metropolis"));
    assert!(!doc.element(delivery).unwrap().checked);
}

#[test]
fn endpoint_defaults_when_action_missing() {
    let (doc, form) = form_with(vec![]);

    assert_eq!(resolve_endpoint(&doc, form, "/api/partners"), "/api/partners");
}
