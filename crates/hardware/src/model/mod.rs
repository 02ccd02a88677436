//! Resource, latency and dispatch model of an out-of-order pipeline.
//!
//! This module holds the scheduling model proper. It provides:
//! 1. **Resource Graph:** Execution resources, superset/subset containment and "any of" groups.
//! 2. **Descriptor Table:** Per-class resource demand, result latency, occupancy and micro-ops.
//! 3. **Composition:** Serial chaining of descriptors for cracked operations.
//! 4. **Resolution:** `resolve`/`lookup`, turning a class and an issue cycle into a reservation plan.
//!
//! A [`SchedModel`] is built once through [`ModelBuilder`] (or from a
//! [`ModelDefinition`]) and is immutable afterwards. It holds no interior
//! mutability, so it can be shared across threads by reference or `Arc`.

/// Construction-time builder.
pub mod builder;

/// Sequential composition of descriptors.
pub mod compose;

/// Declarative, serde-backed definition sets.
pub mod definition;

/// Latency descriptors and the descriptor table.
pub mod descriptor;

/// Reservation plans returned by `resolve`.
pub mod plan;

/// Resource graph: resources, supersets and groups.
pub mod resources;

use tracing::{trace, warn};

use crate::common::{DescriptorId, ModelError, ModelResult, ResourceId, ResourceRef};
use crate::config::MachineParameters;

pub use builder::ModelBuilder;
pub use definition::ModelDefinition;
pub use descriptor::{Demand, DescriptorSpec, DescriptorTable, LatencyDescriptor};
pub use plan::{Reservation, ReservationPlan};
pub use resources::{ExecutionResource, ResourceGraph, ResourceGroup};

/// Frozen scheduling model of one target.
#[derive(Debug, Clone)]
pub struct SchedModel {
    pub(crate) params: MachineParameters,
    pub(crate) graph: ResourceGraph,
    pub(crate) table: DescriptorTable,
}

impl SchedModel {
    /// Global machine parameters.
    pub const fn params(&self) -> &MachineParameters {
        &self.params
    }

    /// Resource graph.
    pub const fn graph(&self) -> &ResourceGraph {
        &self.graph
    }

    /// Descriptor table, compositions included.
    pub const fn descriptors(&self) -> &DescriptorTable {
        &self.table
    }

    /// Finds the descriptor or composition declared as `name`.
    pub fn lookup(&self, name: &str) -> ModelResult<DescriptorId> {
        self.table.lookup(name)
    }

    /// Descriptor record for `id`.
    pub fn descriptor(&self, id: DescriptorId) -> Option<&LatencyDescriptor> {
        self.table.get(id)
    }

    /// Concrete units `r` can resolve to.
    pub fn expand(&self, r: ResourceRef) -> &[ResourceId] {
        self.graph.expand(r)
    }

    /// Supersets a request on `r` also consumes one unit of.
    pub fn charged(&self, r: ResourceRef) -> &[ResourceId] {
        self.graph.charged(r)
    }

    /// Resolves operation class `name` issued at `issue_cycle` into a reservation plan.
    ///
    /// # Arguments
    ///
    /// * `name` - Descriptor or composition identifier.
    /// * `issue_cycle` - Cycle the operation starts consuming resources.
    ///
    /// # Returns
    ///
    /// A complete plan, or `UnknownDescriptor` / `UnsupportedFeature`.
    pub fn resolve(&self, name: &str, issue_cycle: u64) -> ModelResult<ReservationPlan> {
        let id = self.lookup(name)?;
        self.resolve_by_id(id, issue_cycle)
    }

    /// Resolves a descriptor handle issued at `issue_cycle`.
    pub fn resolve_by_id(&self, id: DescriptorId, issue_cycle: u64) -> ModelResult<ReservationPlan> {
        let desc = self
            .table
            .get(id)
            .ok_or_else(|| ModelError::UnknownDescriptor(format!("descriptor#{}", id.0)))?;

        if let Some(feature) = self.params.first_unsupported(&desc.features) {
            warn!(descriptor = %desc.name, feature, "rejected class with unsupported feature");
            return Err(ModelError::UnsupportedFeature {
                id: desc.name.clone(),
                feature: feature.to_string(),
            });
        }

        let reservations = desc
            .demands
            .iter()
            .map(|d| {
                let busy_from = issue_cycle.saturating_add(u64::from(d.offset));
                Reservation {
                    requested: d.resource,
                    eligible: self.graph.expand(d.resource).to_vec(),
                    also_consumes: self.graph.charged(d.resource).to_vec(),
                    stage: d.stage,
                    busy_from,
                    busy_until: busy_from.saturating_add(u64::from(d.occupancy)),
                }
            })
            .collect();

        let plan = ReservationPlan {
            descriptor: id,
            issue_cycle,
            reservations,
            result_ready_cycle: issue_cycle.saturating_add(u64::from(desc.result_latency)),
            micro_ops: desc.micro_ops,
        };
        trace!(
            descriptor = %desc.name,
            issue_cycle,
            ready = plan.result_ready_cycle,
            intervals = plan.reservations.len(),
            "resolved"
        );
        Ok(plan)
    }
}
