//! # Concurrent Query Tests
//!
//! A frozen model is shared read-only across threads.

use std::sync::Arc;
use std::thread;

use schedmodel_core::model::SchedModel;

use crate::common::harness::TestContext;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_model_is_send_and_sync() {
    assert_send_sync::<SchedModel>();
}

#[test]
fn test_scoped_readers_see_identical_plans() {
    let model = TestContext::new().with_load_alu().build();
    let expected = model.resolve("LOAD_ALU_6C", 100).unwrap();

    thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| model.resolve("LOAD_ALU_6C", 100).unwrap()))
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_arc_shared_model() {
    let model = Arc::new(TestContext::new().with_load_alu().build());
    let handles: Vec<_> = (0..4u64)
        .map(|i| {
            let model = Arc::clone(&model);
            thread::spawn(move || model.resolve("ALU_2C", i).unwrap().result_ready_cycle)
        })
        .collect();
    let mut ready: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    ready.sort_unstable();
    assert_eq!(ready, vec![2, 3, 4, 5]);
}
