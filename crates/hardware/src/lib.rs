//! Scheduling model of a superscalar out-of-order pipeline.
//!
//! This crate describes execution resources, dispatch rules and operation
//! latencies in the form an instruction scheduler consumes:
//! 1. **Resources:** Dispatch ports, pipelines and queues, with superset/subset containment and groups.
//! 2. **Descriptors:** Per-class resource demand, result latency, occupancy and micro-op cost.
//! 3. **Composition:** Cracked operations as serial chains of descriptors.
//! 4. **Parameters:** Issue width, load latency, mispredict penalty, buffer sizes, unsupported features.
//! 5. **Resolution:** Reservation plans for a class issued at a given cycle.
//!
//! The model is built once and is read-only afterwards; tracking which unit is
//! busy through which cycle is left to the scheduler.

/// Common types (identifiers, errors).
pub mod common;
/// Machine parameter set.
pub mod config;
/// Resource graph, descriptor table, composition and resolution.
pub mod model;
/// Built-in target definitions.
pub mod targets;

/// Error type for every fallible operation in the crate.
pub use crate::common::{ModelError, ModelResult};
/// Global machine parameters; use `MachineParameters::default()` or deserialize from JSON.
pub use crate::config::MachineParameters;
/// Frozen model and its builder.
pub use crate::model::{ModelBuilder, ModelDefinition, ReservationPlan, SchedModel};
