use partner_form::dom::dom_model::Document;
use partner_form::dom::error::DomError;
use partner_form::dom::query::{Selector, find, query_selector_all, text_entries};
use partner_form::page::page_model::{build_document, parse_page};
use partner_form::page::timers::{TimerQueue, TimerTask};

// =========================================================================
// Tree operations
// =========================================================================

#[test]
fn insert_after_places_node_as_next_sibling() {
    let mut doc = Document::new();
    let root = doc.root();
    let a = doc.create_element("input");
    let b = doc.create_element("input");
    doc.append_child(root, a).unwrap();
    doc.append_child(root, b).unwrap();

    let label = doc.create_element("div");
    doc.insert_after(a, label).unwrap();

    assert_eq!(doc.children(root), &[a, label, b]);
    assert_eq!(doc.next_sibling(a), Some(label));
}

#[test]
fn insert_after_requires_parent() {
    let mut doc = Document::new();
    let orphan = doc.create_element("input");
    let label = doc.create_element("div");

    assert_eq!(doc.insert_after(orphan, label), Err(DomError::NoParent(orphan)));
}

#[test]
fn remove_detaches_and_drops_focus() {
    let mut doc = Document::new();
    let root = doc.root();
    let input = doc.create_element("input");
    doc.append_child(root, input).unwrap();
    doc.focus(input).unwrap();

    doc.remove(input).unwrap();

    assert!(!doc.is_connected(input));
    assert_eq!(doc.focused(), None);
    assert!(doc.remove(input).is_ok(), "removing twice is harmless");
}

#[test]
fn focus_on_detached_node_fails() {
    let mut doc = Document::new();
    let input = doc.create_element("input");

    assert_eq!(doc.focus(input), Err(DomError::Detached(input)));
}

#[test]
fn set_value_rejects_non_controls() {
    let mut doc = Document::new();
    let div = doc.create_element("div");

    assert_eq!(doc.set_value(div, "x"), Err(DomError::NotAFormControl(div)));
}

#[test]
fn class_attribute_round_trips_into_class_list() {
    let mut doc = Document::new();
    let toast = doc.create_element("div");

    doc.set_attr(toast, "class", "toast  hidden").unwrap();
    doc.add_class(toast, "show").unwrap();
    doc.add_class(toast, "show").unwrap();
    doc.remove_class(toast, "hidden").unwrap();

    assert_eq!(doc.element(toast).unwrap().classes, vec!["toast", "show"]);
}

// =========================================================================
// Selection
// =========================================================================

#[test]
fn selection_supported_on_text_like_inputs_and_textarea() {
    let mut doc = Document::new();
    for (tag, ty) in [("input", Some("text")), ("input", None), ("input", Some("tel")), ("textarea", None)] {
        let id = doc.create_element(tag);
        if let Some(t) = ty {
            doc.set_attr(id, "type", t).unwrap();
        }
        doc.set_value(id, "hello").unwrap();
        doc.set_selection_range(id, 5, 5).unwrap();
        assert_eq!(doc.selection(id), Some((5, 5)));
    }
}

#[test]
fn selection_unsupported_on_email_and_number() {
    let mut doc = Document::new();
    for ty in ["email", "number", "checkbox"] {
        let id = doc.create_element("input");
        doc.set_attr(id, "type", ty).unwrap();
        let err = doc.set_selection_range(id, 0, 0).unwrap_err();
        assert!(matches!(err, DomError::SelectionUnsupported { .. }), "{}", ty);
    }
}

#[test]
fn selection_is_clamped_to_value_length() {
    let mut doc = Document::new();
    let id = doc.create_element("textarea");
    doc.set_value(id, "abc").unwrap();

    doc.set_selection_range(id, 10, 10).unwrap();

    assert_eq!(doc.selection(id), Some((3, 3)));
}

// =========================================================================
// Selectors
// =========================================================================

#[test]
fn selector_parsing() {
    assert_eq!(Selector::parse(".partner-form").unwrap(), Selector::Class("partner-form".into()));
    assert_eq!(
        Selector::parse("#partner-success-toast").unwrap(),
        Selector::Id("partner-success-toast".into())
    );
    assert_eq!(Selector::parse("[name='email']").unwrap(), Selector::Name("email".into()));
    assert_eq!(Selector::parse("[name=\"email\"]").unwrap(), Selector::Name("email".into()));
    assert_eq!(
        Selector::parse("FORM.partner-form").unwrap(),
        Selector::TagClass {
            tag: "form".into(),
            class: "partner-form".into()
        }
    );
    assert_eq!(Selector::parse("textarea").unwrap(), Selector::Tag("textarea".into()));

    for bad in ["", ".", "#", "[type=text]", "div > p", ".a b"] {
        assert!(Selector::parse(bad).is_err(), "'{}' should not parse", bad);
    }
}

#[test]
fn queries_run_in_document_order() {
    let page = parse_page(
        r#"
title: t
body:
  - tag: form
    class: partner-form
    children:
      - tag: input
        attrs: { name: a }
      - tag: fieldset
        children:
          - tag: textarea
            attrs: { name: b }
      - tag: input
        attrs: { name: c }
      - tag: select
        attrs: { name: d }
"#,
    )
    .unwrap();
    let doc = build_document(&page).unwrap();
    let form = find(&doc, ".partner-form").unwrap().unwrap();

    let names: Vec<&str> = text_entries(&doc, form)
        .into_iter()
        .filter_map(|id| doc.attr(id, "name"))
        .collect();
    assert_eq!(names, vec!["a", "b", "c"]);

    let inputs = query_selector_all(&doc, form, &Selector::Tag("input".into()));
    assert_eq!(inputs.len(), 2);
    assert_eq!(find(&doc, "#missing").unwrap(), None);
}

#[test]
fn page_fixture_yaml_errors_are_reported() {
    assert!(parse_page("body: [ { tag: ").is_err());
}

// =========================================================================
// Timers
// =========================================================================

#[test]
fn timers_fire_in_due_then_schedule_order() {
    let mut doc = Document::new();
    let root = doc.root();
    let a = doc.create_element("div");
    let b = doc.create_element("div");
    doc.append_child(root, a).unwrap();
    doc.append_child(root, b).unwrap();
    doc.add_class(a, "show").unwrap();
    doc.add_class(b, "show").unwrap();

    let mut timers = TimerQueue::new();
    timers.schedule(300, TimerTask::HideToast { toast: a, class: "show".into() });
    timers.schedule(100, TimerTask::HideToast { toast: b, class: "show".into() });

    let pending = timers.pending();
    assert_eq!(pending[0].due_at, 100);
    assert_eq!(pending[1].due_at, 300);

    assert_eq!(timers.advance_time(100, &mut doc), 1);
    assert!(!doc.has_class(b, "show"));
    assert!(doc.has_class(a, "show"));
    assert_eq!(timers.now_ms(), 100);

    assert_eq!(timers.flush(&mut doc), 1);
    assert!(!doc.has_class(a, "show"));
    assert_eq!(timers.now_ms(), 300);
}

#[test]
fn timer_on_removed_toast_is_harmless() {
    let mut doc = Document::new();
    let root = doc.root();
    let toast = doc.create_element("div");
    doc.append_child(root, toast).unwrap();
    let mut timers = TimerQueue::new();
    timers.schedule(10, TimerTask::HideToast { toast, class: "show".into() });

    doc.remove(toast).unwrap();

    assert_eq!(timers.advance_time(10, &mut doc), 1);
}
