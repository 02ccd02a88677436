//! # Reference Target Tests
//!
//! The built-in POWER9-class definition builds and behaves like the hardware it
//! describes.

use rstest::rstest;
use schedmodel_core::common::ModelError;
use schedmodel_core::targets::p9;

use crate::common::harness::init_tracing;

#[test]
fn test_params() {
    init_tracing();
    let model = p9::model().unwrap();
    let params = model.params();
    assert_eq!(params.issue_width, 8);
    assert_eq!(params.load_latency, 5);
    assert_eq!(params.mispredict_penalty, 16);
    assert_eq!(params.loop_micro_op_buffer_size, 60);
    assert!(params.is_unsupported("mma"));
}

#[rstest]
#[case("P9_ALU_2C", 2)]
#[case("P9_DIV_12C", 12)]
#[case("P9_LS_5C", 5)]
#[case("P9_DP_7C", 7)]
#[case("P9_BR_2C", 2)]
#[case("P9_LoadAndALUOp_6C", 6)]
#[case("P9_LoadAndALUOp_7C", 7)]
#[case("P9_LoadAndPMOp_8C", 8)]
#[case("P9_LoadAndDPOp_11C", 11)]
#[case("P9_LoadAndALU2Op_8C", 8)]
#[case("P9_IntDivAndALUOp_14C", 14)]
fn test_class_latency(#[case] class: &str, #[case] latency: u64) {
    let model = p9::model().unwrap();
    let plan = model.resolve(class, 100).unwrap();
    assert_eq!(plan.result_ready_cycle, 100 + latency);
}

#[test]
fn test_even_pipe_op_is_pinned() {
    let model = p9::model().unwrap();
    let alue = model.graph().symbol("ALUE").unwrap();
    let plan = model.resolve("P9_ALUE_2C", 0).unwrap();
    let pipe = plan.reservations.iter().find(|r| r.requested == alue).unwrap();
    assert!(pipe.is_fixed());
}

#[test]
fn test_even_pipe_op_charges_shared_resources() {
    let model = p9::model().unwrap();
    let plan = model.resolve("P9_ALUE_2C", 0).unwrap();
    let graph = model.graph();
    let charged: Vec<(&str, Vec<&str>)> = plan
        .reservations
        .iter()
        .map(|r| {
            let name = graph.name_of(r.requested).unwrap();
            let aggregates = r
                .also_consumes
                .iter()
                .map(|id| graph.resource(*id).unwrap().name.as_str())
                .collect();
            (name, aggregates)
        })
        .collect();
    assert_eq!(
        charged,
        vec![("DISP_EVEN", vec!["DISPATCH"]), ("ALUE", vec!["ALU"])]
    );
}

#[test]
fn test_dispatch_spare_slot_capacity() {
    let model = p9::model().unwrap();
    let graph = model.graph();
    let dispatch = graph.symbol("DISPATCH").unwrap();
    let spare: Vec<(&str, u32)> = model
        .expand(dispatch)
        .iter()
        .map(|id| (graph.resource(*id).unwrap().name.as_str(), graph.unit_capacity(*id)))
        .collect();
    assert_eq!(
        spare,
        vec![("DISP_EVEN", 2), ("DISP_ODD", 2), ("DISP_BR", 1), ("DISPATCH", 1)]
    );
    let total: u32 = spare.iter().map(|(_, cap)| cap).sum();
    assert_eq!(total, 6);
}

#[test]
fn test_cracked_load_alu_dispatches_twice() {
    let model = p9::model().unwrap();
    let plan = model.resolve("P9_LoadAndALUOp_6C", 0).unwrap();
    assert_eq!(plan.micro_ops, 2);
    // Each stage takes a dispatch slot and one pipeline.
    assert_eq!(plan.stage_reservations(0).count(), 2);
    assert!(plan.stage_reservations(1).all(|r| r.busy_from == 4));
}

#[test]
fn test_divide_holds_unit_for_full_latency() {
    let model = p9::model().unwrap();
    let div = model.graph().symbol("DIV").unwrap();
    let plan = model.resolve("P9_DIV_12C", 0).unwrap();
    let unit = plan.reservations.iter().find(|r| r.requested == div).unwrap();
    assert_eq!(unit.occupancy(), 12);
}

#[test]
fn test_mma_rejected() {
    let model = p9::model().unwrap();
    let err = model.resolve("P9_MMA_24C", 0).unwrap_err();
    assert_eq!(
        err,
        ModelError::UnsupportedFeature {
            id: "P9_MMA_24C".into(),
            feature: "mma".into()
        }
    );
}

#[test]
fn test_definition_survives_json() {
    let def = p9::definition();
    let json = def.to_json().unwrap();
    let model = schedmodel_core::ModelDefinition::from_json(&json)
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(
        model.resolve("P9_LoadAndDPOp_11C", 3).unwrap(),
        p9::model().unwrap().resolve("P9_LoadAndDPOp_11C", 3).unwrap()
    );
}
