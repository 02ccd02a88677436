//! Latency descriptor table.
//!
//! A descriptor is the static cost model of one operation class: which resources
//! it holds on issue and for how long, when its result is ready, and how many
//! front-end dispatch slots it takes. Result latency and occupancy are separate
//! fields; a unit may free up before or after the result is available.

use std::collections::{BTreeSet, HashMap};

use crate::common::{DescriptorId, ModelError, ModelResult, ResourceRef};
use crate::model::resources::ResourceGraph;

/// One resource requirement of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Demand {
    /// Resource or group required.
    pub resource: ResourceRef,
    /// Cycles the unit stays unavailable to new issues. Always at least 1.
    pub occupancy: u32,
    /// Cycles after issue at which the demand starts. Non-zero only inside compositions.
    pub offset: u32,
    /// Index of the composition stage this demand came from (0 for plain descriptors).
    pub stage: usize,
}

/// Static cost model of one operation class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatencyDescriptor {
    /// Operation class identifier.
    pub name: String,
    /// Resources held, in declaration order.
    pub demands: Vec<Demand>,
    /// Cycles from issue until the result is available to dependents.
    pub result_latency: u32,
    /// Front-end dispatch slots consumed.
    pub micro_ops: u32,
    /// Feature tags; a tag the target does not support makes the class unresolvable.
    pub features: BTreeSet<String>,
    /// Stages this descriptor was composed from; empty for plain descriptors.
    pub stages: Vec<DescriptorId>,
}

impl LatencyDescriptor {
    /// True if this descriptor was produced by composition.
    pub fn is_composite(&self) -> bool {
        !self.stages.is_empty()
    }
}

/// Construction input for a [`LatencyDescriptor`].
///
/// Latency and occupancy are taken as signed values so that out-of-range input
/// from a definition set is reported instead of wrapped.
#[derive(Debug, Clone)]
pub struct DescriptorSpec {
    name: String,
    resources: Vec<(ResourceRef, Option<i64>)>,
    latency: i64,
    occupancy: i64,
    micro_ops: u32,
    features: BTreeSet<String>,
}

impl DescriptorSpec {
    /// Starts a descriptor with the given result latency, one micro-op and
    /// single-cycle occupancy.
    pub fn new(name: impl Into<String>, latency: i64) -> Self {
        Self {
            name: name.into(),
            resources: Vec::new(),
            latency,
            occupancy: 1,
            micro_ops: 1,
            features: BTreeSet::new(),
        }
    }

    /// Adds a resource held for the descriptor's default occupancy.
    #[must_use]
    pub fn uses(mut self, resource: impl Into<ResourceRef>) -> Self {
        self.resources.push((resource.into(), None));
        self
    }

    /// Adds a resource held for an explicit number of cycles.
    #[must_use]
    pub fn uses_for(mut self, resource: impl Into<ResourceRef>, cycles: i64) -> Self {
        self.resources.push((resource.into(), Some(cycles)));
        self
    }

    /// Sets the default occupancy of every resource without an explicit one.
    #[must_use]
    pub const fn occupancy(mut self, cycles: i64) -> Self {
        self.occupancy = cycles;
        self
    }

    /// Sets the number of dispatch slots consumed.
    #[must_use]
    pub const fn micro_ops(mut self, count: u32) -> Self {
        self.micro_ops = count;
        self
    }

    /// Tags the descriptor with a feature name.
    #[must_use]
    pub fn feature(mut self, feature: impl Into<String>) -> Self {
        let _ = self.features.insert(feature.into());
        self
    }

    /// Identifier of the descriptor being specified.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Table mapping operation-class identifiers to descriptors.
#[derive(Debug, Clone, Default)]
pub struct DescriptorTable {
    pub(crate) descriptors: Vec<LatencyDescriptor>,
    index: HashMap<String, DescriptorId>,
}

impl DescriptorTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `spec` against `graph` and adds it to the table.
    pub fn define(&mut self, spec: DescriptorSpec, graph: &ResourceGraph) -> ModelResult<DescriptorId> {
        if self.index.contains_key(&spec.name) {
            return Err(ModelError::DuplicateId(spec.name));
        }
        if spec.latency < 0 {
            return Err(ModelError::NegativeLatency {
                id: spec.name,
                latency: spec.latency,
            });
        }
        if spec.occupancy < 1 {
            return Err(ModelError::InvalidOccupancy {
                id: spec.name,
                occupancy: spec.occupancy,
            });
        }

        let mut demands = Vec::with_capacity(spec.resources.len());
        for (resource, explicit) in &spec.resources {
            if !graph.contains(*resource) {
                return Err(ModelError::UnknownResource(resource.to_string()));
            }
            let cycles = explicit.unwrap_or(spec.occupancy);
            let occupancy = u32::try_from(cycles)
                .ok()
                .filter(|c| *c >= 1)
                .ok_or_else(|| ModelError::InvalidOccupancy {
                    id: spec.name.clone(),
                    occupancy: cycles,
                })?;
            demands.push(Demand {
                resource: *resource,
                occupancy,
                offset: 0,
                stage: 0,
            });
        }
        let Ok(result_latency) = u32::try_from(spec.latency) else {
            return Err(ModelError::LatencyOutOfRange {
                id: spec.name,
                latency: spec.latency,
                max: u32::MAX,
            });
        };

        Ok(self.insert(LatencyDescriptor {
            name: spec.name,
            demands,
            result_latency,
            micro_ops: spec.micro_ops,
            features: spec.features,
            stages: Vec::new(),
        }))
    }

    pub(crate) fn insert(&mut self, descriptor: LatencyDescriptor) -> DescriptorId {
        let id = DescriptorId(self.descriptors.len() as u32);
        let _ = self.index.insert(descriptor.name.clone(), id);
        self.descriptors.push(descriptor);
        id
    }

    pub(crate) fn contains_name(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Finds the descriptor or composition declared as `name`.
    pub fn lookup(&self, name: &str) -> ModelResult<DescriptorId> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| ModelError::UnknownDescriptor(name.to_string()))
    }

    /// Descriptor record for `id`.
    pub fn get(&self, id: DescriptorId) -> Option<&LatencyDescriptor> {
        self.descriptors.get(id.index())
    }

    /// Number of descriptors, compositions included.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// True if nothing has been defined.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Iterates over all descriptors in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (DescriptorId, &LatencyDescriptor)> {
        self.descriptors
            .iter()
            .enumerate()
            .map(|(i, d)| (DescriptorId(i as u32), d))
    }
}
