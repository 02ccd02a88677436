//! Sequential composition of descriptors.
//!
//! A cracked operation runs its stages back to back. The composite descriptor:
//! 1. **Latency:** Sum of stage result latencies.
//! 2. **Demand:** Each stage's demands, shifted by the latency of the stages before it.
//! 3. **Front-end cost:** Sum of stage micro-ops; serialization does not elide dispatch slots.
//! 4. **Features:** Union of stage feature tags.
//!
//! A stage may itself be a composition. Its demands are already offset relative
//! to its own issue, so nesting just adds the outer offset.

use std::collections::BTreeSet;

use tracing::debug;

use crate::common::{DescriptorId, ModelError, ModelResult};
use crate::model::descriptor::{Demand, DescriptorTable, LatencyDescriptor};

/// Minimum number of stages in a composition.
pub const MIN_STAGES: usize = 2;

impl DescriptorTable {
    /// Composes the stages named in `stages` into a new descriptor `name`.
    ///
    /// # Arguments
    ///
    /// * `name` - Identifier of the composite, unique among descriptors.
    /// * `stages` - Stage identifiers in execution order; at least two.
    ///
    /// # Returns
    ///
    /// The handle of the synthetic descriptor.
    pub fn compose(&mut self, name: &str, stages: &[&str]) -> ModelResult<DescriptorId> {
        self.check_composition(name, stages.len())?;
        let ids = stages
            .iter()
            .map(|s| self.lookup(s))
            .collect::<ModelResult<Vec<_>>>()?;
        self.compose_ids(name, &ids)
    }

    /// Composes already-resolved stage handles into a new descriptor `name`.
    pub fn compose_ids(&mut self, name: &str, stages: &[DescriptorId]) -> ModelResult<DescriptorId> {
        self.check_composition(name, stages.len())?;

        let mut demands = Vec::new();
        let mut features = BTreeSet::new();
        let mut offset: u32 = 0;
        let mut micro_ops: u32 = 0;
        for (index, stage_id) in stages.iter().enumerate() {
            let stage = self
                .get(*stage_id)
                .ok_or_else(|| ModelError::UnknownDescriptor(format!("descriptor#{}", stage_id.0)))?;
            demands.extend(stage.demands.iter().map(|d| Demand {
                offset: offset.saturating_add(d.offset),
                stage: index,
                ..*d
            }));
            features.extend(stage.features.iter().cloned());
            offset = offset.saturating_add(stage.result_latency);
            micro_ops = micro_ops.saturating_add(stage.micro_ops);
        }

        debug!(
            composition = name,
            stages = stages.len(),
            latency = offset,
            micro_ops,
            "composed descriptor"
        );
        Ok(self.insert(LatencyDescriptor {
            name: name.to_string(),
            demands,
            result_latency: offset,
            micro_ops,
            features,
            stages: stages.to_vec(),
        }))
    }

    fn check_composition(&self, name: &str, stages: usize) -> ModelResult<()> {
        if self.contains_name(name) {
            return Err(ModelError::DuplicateId(name.to_string()));
        }
        if stages < MIN_STAGES {
            return Err(ModelError::EmptyComposition {
                id: name.to_string(),
                stages,
            });
        }
        Ok(())
    }
}
