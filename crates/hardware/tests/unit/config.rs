//! # Machine Parameter Tests
//!
//! Tests for parameter defaults, deserialization and validation.

use schedmodel_core::common::ModelError;
use schedmodel_core::config::MachineParameters;

#[test]
fn test_params_default() {
    let params = MachineParameters::default();
    assert_eq!(params.issue_width, 1);
    assert_eq!(params.load_latency, 4);
    assert_eq!(params.high_latency, 10);
    assert_eq!(params.mispredict_penalty, 10);
    assert_eq!(params.loop_micro_op_buffer_size, 0);
    assert_eq!(params.micro_op_buffer_size, 0);
    assert!(!params.post_ra_scheduler);
    assert!(params.complete_model);
    assert!(params.unsupported_features.is_empty());
}

#[test]
fn test_empty_json_matches_default() {
    let params: MachineParameters = serde_json::from_str("{}").unwrap();
    assert_eq!(params, MachineParameters::default());
}

#[test]
fn test_full_json() {
    let json = r#"{
        "issue_width": 8,
        "load_latency": 5,
        "high_latency": 26,
        "mispredict_penalty": 16,
        "loop_micro_op_buffer_size": 60,
        "micro_op_buffer_size": 44,
        "post_ra_scheduler": true,
        "complete_model": false,
        "unsupported_features": ["spe", "mma"]
    }"#;
    let params: MachineParameters = serde_json::from_str(json).unwrap();
    assert_eq!(params.issue_width, 8);
    assert_eq!(params.load_latency, 5);
    assert_eq!(params.high_latency, 26);
    assert_eq!(params.mispredict_penalty, 16);
    assert_eq!(params.loop_micro_op_buffer_size, 60);
    assert_eq!(params.micro_op_buffer_size, 44);
    assert!(params.post_ra_scheduler);
    assert!(!params.complete_model);
    assert!(params.is_unsupported("spe"));
    assert!(params.is_unsupported("mma"));
    assert!(!params.is_unsupported("vsx"));
}

#[test]
fn test_first_unsupported() {
    let params = MachineParameters {
        unsupported_features: ["mma".to_string()].into_iter().collect(),
        ..MachineParameters::default()
    };
    let tags = vec!["vsx".to_string(), "mma".to_string()];
    assert_eq!(params.first_unsupported(&tags), Some("mma"));
    let clean = vec!["vsx".to_string()];
    assert_eq!(params.first_unsupported(&clean), None);
}

#[test]
fn test_validate_rejects_zero_issue_width() {
    let params = MachineParameters {
        issue_width: 0,
        ..MachineParameters::default()
    };
    assert!(matches!(
        params.validate(),
        Err(ModelError::InvalidParameter {
            name: "issue_width",
            ..
        })
    ));
}

#[test]
fn test_validate_accepts_load_latency_above_high_latency() {
    let params = MachineParameters {
        load_latency: 12,
        ..MachineParameters::default()
    };
    assert!(params.high_latency < params.load_latency);
    assert!(params.validate().is_ok());
}

#[test]
fn test_validate_accepts_default() {
    assert!(MachineParameters::default().validate().is_ok());
}
