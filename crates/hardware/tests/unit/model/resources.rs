//! # Resource Graph Tests
//!
//! Capacity invariants, containment, group expansion and namespace rules.

use proptest::prelude::*;
use rstest::rstest;
use schedmodel_core::common::{ModelError, ResourceRef};
use schedmodel_core::config::MachineParameters;
use schedmodel_core::model::ModelBuilder;

use crate::common::harness::TestContext;

#[test]
fn test_zero_capacity_rejected() {
    let mut b = ModelBuilder::new(MachineParameters::default());
    let err = b.define_resource("ALU", 0, None).unwrap_err();
    assert_eq!(
        err,
        ModelError::InvalidCapacity {
            id: "ALU".into(),
            capacity: 0
        }
    );
}

#[test]
fn test_third_subset_overflows_superset() {
    let mut b = ModelBuilder::new(MachineParameters::default());
    let sup = b.define_resource("SUP", 4, None).unwrap();
    let _ = b.define_resource("SUB_A", 2, Some(sup)).unwrap();
    let _ = b.define_resource("SUB_B", 2, Some(sup)).unwrap();
    let err = b.define_resource("SUB_C", 1, Some(sup)).unwrap_err();
    assert_eq!(
        err,
        ModelError::CapacityOverflow {
            superset: "SUP".into(),
            subset: "SUB_C".into(),
            required: 5,
            available: 4,
        }
    );
}

#[test]
fn test_failed_subset_does_not_claim_capacity() {
    let mut b = ModelBuilder::new(MachineParameters::default());
    let sup = b.define_resource("SUP", 4, None).unwrap();
    let _ = b.define_resource("SUB_A", 3, Some(sup)).unwrap();
    assert!(b.define_resource("SUB_B", 2, Some(sup)).is_err());
    assert!(b.define_resource("SUB_B", 1, Some(sup)).is_ok());
}

#[rstest]
#[case("ALU")]
#[case("ANY_INT")]
fn test_duplicate_id_rejected(#[case] name: &str) {
    let mut ctx = TestContext::new();
    let err = ctx.builder.define_resource(name, 1, None).unwrap_err();
    assert_eq!(err, ModelError::DuplicateId(name.to_string()));
}

#[test]
fn test_empty_group_rejected() {
    let mut b = ModelBuilder::new(MachineParameters::default());
    let err = b.define_group("NONE", &[]).unwrap_err();
    assert_eq!(err, ModelError::EmptyGroup("NONE".into()));
}

#[test]
fn test_superset_expands_to_both_halves() {
    let ctx = TestContext::new();
    let (alu, even, odd) = (ctx.alu, ctx.alu_even, ctx.alu_odd);
    let model = ctx.build();
    assert_eq!(model.expand(alu.into()), &[even, odd]);
    assert_eq!(model.expand(even.into()), &[even]);
    assert_eq!(model.graph().supersets(even), vec![alu]);
    assert_eq!(model.graph().subsets(alu), &[even, odd]);
}

#[test]
fn test_subset_charges_superset() {
    let ctx = TestContext::new();
    let (alu, even, ls) = (ctx.alu, ctx.alu_even, ctx.ls);
    let model = ctx.build();
    assert_eq!(model.charged(even.into()), &[alu]);
    assert!(model.charged(ls.into()).is_empty());
}

#[rstest]
#[case(&[2, 2, 1], 1)]
#[case(&[2, 2], 2)]
#[case(&[3, 3], 0)]
#[case(&[], 6)]
fn test_superset_unit_capacity_is_residual(#[case] subsets: &[u32], #[case] spare: u32) {
    let mut b = ModelBuilder::new(MachineParameters::default());
    let disp = b.define_resource("DISPATCH", 6, None).unwrap();
    for (i, cap) in subsets.iter().enumerate() {
        let _ = b.define_resource(&format!("DISP{i}"), *cap, Some(disp)).unwrap();
    }
    let model = b.build().unwrap();
    let graph = model.graph();
    assert_eq!(graph.unit_capacity(disp), spare);
    assert_eq!(graph.resource(disp).unwrap().capacity, 6);
    // The superset is a pickable unit exactly when it has spare instances.
    assert_eq!(model.expand(disp.into()).contains(&disp), spare > 0);
}

#[test]
fn test_group_expands_to_members() {
    let ctx = TestContext::new();
    let (even, odd) = (ctx.alu_even, ctx.alu_odd);
    let model = ctx.build();
    let group = model.graph().symbol("ANY_INT").unwrap();
    assert!(matches!(group, ResourceRef::Group(_)));
    assert_eq!(model.expand(group), &[even, odd]);
    assert_eq!(model.graph().name_of(group), Some("ANY_INT"));
}

#[test]
fn test_buffer_size_recorded() {
    let mut b = ModelBuilder::new(MachineParameters::default());
    let ls = b.define_buffered_resource("LS", 4, None, Some(64)).unwrap();
    let model = b.build().unwrap();
    let res = model.graph().resource(ls).unwrap();
    assert_eq!(res.buffer_size, Some(64));
    assert_eq!(res.capacity, 4);
}

proptest! {
    /// Whatever sequence of subset declarations is attempted, the accepted ones
    /// never exceed the superset, individually or in sum.
    #[test]
    fn prop_subsets_never_exceed_superset(
        sup_cap in 1u32..16,
        subs in prop::collection::vec(1u32..8, 0..10),
    ) {
        let mut b = ModelBuilder::new(MachineParameters::default());
        let sup = b.define_resource("SUP", sup_cap, None).unwrap();
        for (i, cap) in subs.iter().enumerate() {
            let _ = b.define_resource(&format!("SUB{i}"), *cap, Some(sup));
        }
        let model = b.build().unwrap();
        let graph = model.graph();
        let mut total = 0;
        for sub in graph.subsets(sup) {
            let cap = graph.resource(*sub).unwrap().capacity;
            prop_assert!(cap <= sup_cap);
            total += cap;
        }
        prop_assert!(total <= sup_cap);
        // Directly pickable units never push the superset past its capacity.
        prop_assert_eq!(total + graph.unit_capacity(sup), sup_cap);
    }
}
