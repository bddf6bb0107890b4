//! Label-set validation tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde_json::json;

use promgate_core::labels::{is_valid_label_set, parse_label_set};

#[test]
fn empty_array_is_valid() {
    assert!(is_valid_label_set(&json!([])));
    assert!(parse_label_set(&json!([])).unwrap().is_empty());
}

#[test]
fn well_formed_pairs_keep_caller_order() {
    let set = parse_label_set(&json!([
        { "name": "severity", "value": "high" },
        { "name": "app", "value": "api" }
    ]))
    .unwrap();

    assert_eq!(set.names(), vec!["severity".to_string(), "app".to_string()]);
    // series key is sorted by label name
    assert_eq!(
        set.key(),
        vec![
            ("app".to_string(), "api".to_string()),
            ("severity".to_string(), "high".to_string())
        ]
    );
}

#[test]
fn non_array_inputs_are_rejected() {
    for raw in [json!("invalid"), json!(3), json!({ "name": "a", "value": "b" }), json!(null)] {
        assert!(!is_valid_label_set(&raw), "{raw} must be rejected");
    }
}

#[test]
fn missing_fields_are_rejected() {
    assert!(!is_valid_label_set(&json!([{ "name": "severity" }, { "value": "high" }])));
    assert!(!is_valid_label_set(&json!([{ "name": "severity" }])));
    assert!(!is_valid_label_set(&json!([{ "value": "high" }])));
}

#[test]
fn non_string_or_empty_fields_are_rejected() {
    assert!(!is_valid_label_set(&json!([{ "name": 123, "value": "high" }])));
    assert!(!is_valid_label_set(&json!([{ "name": "severity", "value": 456 }])));
    assert!(!is_valid_label_set(&json!([{ "name": "", "value": "high" }])));
    assert!(!is_valid_label_set(&json!([{ "name": "severity", "value": "" }])));
}

#[test]
fn one_bad_element_rejects_the_set() {
    let err = parse_label_set(&json!([
        { "name": "severity", "value": "high" },
        { "name": "app", "value": false }
    ]))
    .expect_err("must fail");

    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
    assert!(err.to_string().contains("label 1"));
}

#[test]
fn names_outside_prometheus_grammar_are_rejected() {
    for bad in ["my-label", "1st", "has space", "dot.name", "ünicode"] {
        let err = parse_label_set(&json!([{ "name": bad, "value": "x" }])).expect_err(bad);
        assert!(err.to_string().contains("invalid label name"), "{bad}: {err}");
    }
    assert!(is_valid_label_set(&json!([{ "name": "_ok_Name9", "value": "x" }])));
}

#[test]
fn repeated_names_are_rejected() {
    let err = parse_label_set(&json!([
        { "name": "a", "value": "1" },
        { "name": "a", "value": "2" }
    ]))
    .expect_err("must fail");
    assert!(err.to_string().contains("duplicate label name: a"));
}
