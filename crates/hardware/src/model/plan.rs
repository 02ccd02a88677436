//! Reservation plans returned to the scheduler.
//!
//! A plan lists every resource interval an operation needs when issued at a
//! given cycle, plus the cycle its result becomes available. Intervals are
//! half-open: a resource is busy on `busy_from..busy_until`.
//!
//! Holding a unit of a subset also holds one unit of every superset above it.
//! Those charges travel with the reservation in `also_consumes`; the unit a
//! superset offers directly is bounded by `ResourceGraph::unit_capacity`.

use std::ops::Range;

use crate::common::{DescriptorId, ResourceId, ResourceRef};

/// One resource interval of a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    /// Symbol the descriptor asked for.
    pub requested: ResourceRef,
    /// Concrete units any one of which satisfies the request. Picking one is
    /// the scheduler's job.
    pub eligible: Vec<ResourceId>,
    /// Supersets that also lose one unit over the same cycles, whichever
    /// eligible unit is picked. Nearest first.
    pub also_consumes: Vec<ResourceId>,
    /// Composition stage the interval belongs to.
    pub stage: usize,
    /// First busy cycle.
    pub busy_from: u64,
    /// First cycle the unit is free again.
    pub busy_until: u64,
}

impl Reservation {
    /// Busy cycles as a half-open range.
    pub const fn cycles(&self) -> Range<u64> {
        self.busy_from..self.busy_until
    }

    /// Number of busy cycles.
    pub const fn occupancy(&self) -> u64 {
        self.busy_until - self.busy_from
    }

    /// True if the request names exactly one concrete unit.
    pub fn is_fixed(&self) -> bool {
        self.eligible.len() == 1
    }

    /// True if both intervals share at least one cycle.
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.busy_from < other.busy_until && other.busy_from < self.busy_until
    }
}

/// Full answer to a resolve query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationPlan {
    /// Descriptor the plan was resolved from.
    pub descriptor: DescriptorId,
    /// Cycle the operation issues.
    pub issue_cycle: u64,
    /// Resource intervals, in demand order.
    pub reservations: Vec<Reservation>,
    /// Cycle the result is available to dependents.
    pub result_ready_cycle: u64,
    /// Dispatch slots consumed.
    pub micro_ops: u32,
}

impl ReservationPlan {
    /// Cycles from issue to result.
    pub const fn latency(&self) -> u64 {
        self.result_ready_cycle - self.issue_cycle
    }

    /// Latest cycle any reserved unit is still busy up to (exclusive). Equal to
    /// the issue cycle for a plan with no reservations.
    pub fn busy_through(&self) -> u64 {
        self.reservations
            .iter()
            .map(|r| r.busy_until)
            .max()
            .unwrap_or(self.issue_cycle)
    }

    /// Intervals that consume a unit of `resource`, either as the only
    /// eligible unit or through a superset charge.
    pub fn touching(&self, resource: ResourceId) -> impl Iterator<Item = &Reservation> {
        self.reservations.iter().filter(move |r| {
            r.also_consumes.contains(&resource) || r.eligible == [resource]
        })
    }

    /// Intervals belonging to composition stage `stage`.
    pub fn stage_reservations(&self, stage: usize) -> impl Iterator<Item = &Reservation> {
        self.reservations.iter().filter(move |r| r.stage == stage)
    }

    /// Number of stages represented in the plan.
    pub fn stage_count(&self) -> usize {
        self.reservations
            .iter()
            .map(|r| r.stage + 1)
            .max()
            .unwrap_or(1)
    }
}
