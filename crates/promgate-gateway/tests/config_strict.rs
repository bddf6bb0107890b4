#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use promgate_gateway::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
gateway:
  listen: "0.0.0.0:8080"
metrics:
  summary:
    max_sample: 10 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.gateway.listen, "0.0.0.0:8080");
    assert_eq!(cfg.gateway.max_body_bytes, 64 * 1024);
    assert_eq!(cfg.metrics.default_help, "Help empty");
    assert_eq!(cfg.metrics.summary.window().max_samples, 1024);
    assert_eq!(cfg.metrics.summary.window().max_age, None);
}

#[test]
fn full_config() {
    let ok = r#"
version: 1
gateway:
  listen: "127.0.0.1:9100"
  max_body_bytes: 4096
metrics:
  default_help: "no help given"
  summary:
    max_samples: 50
    max_age_secs: 600
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.gateway.listen_addr().unwrap().port(), 9100);
    assert_eq!(cfg.metrics.default_help, "no help given");
    let w = cfg.metrics.summary.window();
    assert_eq!(w.max_samples, 50);
    assert_eq!(w.max_age, Some(Duration::from_secs(600)));
}

#[test]
fn wrong_version_is_rejected() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn out_of_range_values_are_rejected() {
    for bad in [
        "version: 1\ngateway:\n  listen: \"not-an-addr\"\n",
        "version: 1\ngateway:\n  max_body_bytes: 10\n",
        "version: 1\nmetrics:\n  default_help: \"  \"\n",
        "version: 1\nmetrics:\n  summary:\n    max_samples: 0\n",
        "version: 1\nmetrics:\n  summary:\n    max_age_secs: 100000\n",
    ] {
        let err = config::load_from_str(bad).expect_err(bad);
        assert_eq!(err.client_code().as_str(), "BAD_REQUEST", "{bad}");
    }
}
