//! # Error Tests
//!
//! This module checks how errors are classified and reported.

use rstest::rstest;
use schedmodel_core::common::{ErrorKind, ModelError};

#[rstest]
#[case(ModelError::DuplicateId("ALU".into()), ErrorKind::Definition)]
#[case(ModelError::InvalidCapacity { id: "ALU".into(), capacity: 0 }, ErrorKind::Definition)]
#[case(
    ModelError::CapacityOverflow {
        superset: "ALU".into(),
        subset: "ALUX".into(),
        required: 5,
        available: 4,
    },
    ErrorKind::Definition
)]
#[case(ModelError::UnknownResource("FOO".into()), ErrorKind::Definition)]
#[case(ModelError::NegativeLatency { id: "D".into(), latency: -3 }, ErrorKind::Definition)]
#[case(
    ModelError::LatencyOutOfRange { id: "D".into(), latency: 1 << 40, max: u32::MAX },
    ErrorKind::Definition
)]
#[case(ModelError::EmptyComposition { id: "C".into(), stages: 0 }, ErrorKind::Definition)]
#[case(ModelError::UnknownDescriptor("D".into()), ErrorKind::Query)]
#[case(
    ModelError::UnsupportedFeature { id: "D".into(), feature: "qpx".into() },
    ErrorKind::Query
)]
fn test_error_kind(#[case] err: ModelError, #[case] kind: ErrorKind) {
    assert_eq!(err.kind(), kind);
    assert_eq!(err.is_recoverable(), kind == ErrorKind::Query);
}

#[test]
fn test_capacity_overflow_message_names_both_sides() {
    let err = ModelError::CapacityOverflow {
        superset: "ALU".into(),
        subset: "ALUX".into(),
        required: 5,
        available: 4,
    };
    let msg = err.to_string();
    assert!(msg.contains("ALU"));
    assert!(msg.contains("ALUX"));
    assert!(msg.contains('5'));
}

#[test]
fn test_unsupported_feature_message() {
    let err = ModelError::UnsupportedFeature {
        id: "QP_10C".into(),
        feature: "qpx".into(),
    };
    assert_eq!(
        err.to_string(),
        "descriptor `QP_10C` requires unsupported feature `qpx`"
    );
}

#[test]
fn test_parse_error_from_json() {
    let json_err = serde_json::from_str::<u32>("not a number").unwrap_err();
    let err = ModelError::from(json_err);
    assert!(matches!(err, ModelError::Parse(_)));
    assert_eq!(err.kind(), ErrorKind::Definition);
}
