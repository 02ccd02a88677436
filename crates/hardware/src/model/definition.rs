//! Declarative definition sets.
//!
//! A [`ModelDefinition`] is plain data: resources, groups, descriptors and
//! compositions referring to each other by name, plus the machine parameters.
//! It deserializes from JSON the same way the rest of the configuration does,
//! and [`ModelDefinition::build`] replays it through [`ModelBuilder`] so that
//! every invariant is checked exactly once.
//!
//! Within each list, a name must be declared before it is referenced.
//! Resources are processed first, then groups, descriptors and compositions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::common::{ModelError, ModelResult, ResourceRef};
use crate::config::MachineParameters;
use crate::model::SchedModel;
use crate::model::builder::ModelBuilder;
use crate::model::descriptor::DescriptorSpec;

/// Declaration of an execution resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDef {
    /// Identifier.
    pub id: String,
    /// Parallel instances.
    pub capacity: u32,
    /// Superset this resource is a subset of.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superset: Option<String>,
    /// In-flight queue depth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer_size: Option<u32>,
}

impl ResourceDef {
    /// Top-level resource with `capacity` units.
    pub fn new(id: &str, capacity: u32) -> Self {
        Self {
            id: id.to_string(),
            capacity,
            superset: None,
            buffer_size: None,
        }
    }

    /// Marks the resource as a subset of `superset`.
    #[must_use]
    pub fn within(mut self, superset: &str) -> Self {
        self.superset = Some(superset.to_string());
        self
    }

    /// Sets the queue depth.
    #[must_use]
    pub const fn buffered(mut self, size: u32) -> Self {
        self.buffer_size = Some(size);
        self
    }
}

/// Declaration of a resource group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDef {
    /// Identifier.
    pub id: String,
    /// Member resources.
    pub members: Vec<String>,
}

/// One demand of a descriptor: a bare name, or a name with explicit occupancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DemandDef {
    /// Held for the descriptor's default occupancy.
    Name(String),
    /// Held for `occupancy` cycles.
    Timed {
        /// Resource or group identifier.
        resource: String,
        /// Busy cycles.
        occupancy: i64,
    },
}

/// Declaration of a latency descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorDef {
    /// Operation class identifier.
    pub id: String,
    /// Demands in order.
    #[serde(default)]
    pub resources: Vec<DemandDef>,
    /// Result latency in cycles.
    pub latency: i64,
    /// Default occupancy in cycles.
    #[serde(default = "DescriptorDef::default_occupancy")]
    pub occupancy: i64,
    /// Dispatch slots consumed.
    #[serde(default = "DescriptorDef::default_micro_ops")]
    pub micro_ops: u32,
    /// Feature tags.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub features: BTreeSet<String>,
}

impl DescriptorDef {
    fn default_occupancy() -> i64 {
        1
    }

    fn default_micro_ops() -> u32 {
        1
    }

    /// Descriptor with `latency`, single-cycle occupancy and one micro-op.
    pub fn new(id: &str, latency: i64) -> Self {
        Self {
            id: id.to_string(),
            resources: Vec::new(),
            latency,
            occupancy: 1,
            micro_ops: 1,
            features: BTreeSet::new(),
        }
    }

    /// Adds a demand held for the default occupancy.
    #[must_use]
    pub fn uses(mut self, resource: &str) -> Self {
        self.resources.push(DemandDef::Name(resource.to_string()));
        self
    }

    /// Adds a demand held for `occupancy` cycles.
    #[must_use]
    pub fn uses_for(mut self, resource: &str, occupancy: i64) -> Self {
        self.resources.push(DemandDef::Timed {
            resource: resource.to_string(),
            occupancy,
        });
        self
    }

    /// Sets the dispatch slot count.
    #[must_use]
    pub const fn micro_ops(mut self, count: u32) -> Self {
        self.micro_ops = count;
        self
    }

    /// Tags the descriptor with a feature.
    #[must_use]
    pub fn feature(mut self, feature: &str) -> Self {
        let _ = self.features.insert(feature.to_string());
        self
    }
}

/// Declaration of a sequential composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionDef {
    /// Identifier.
    pub id: String,
    /// Stage identifiers in execution order.
    pub stages: Vec<String>,
}

impl CompositionDef {
    /// Composition of `stages`.
    pub fn new(id: &str, stages: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            stages: stages.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Complete declarative definition of a target.
///
/// # Examples
///
/// ```
/// use schedmodel_core::model::ModelDefinition;
///
/// let json = r#"{
///     "name": "toy",
///     "params": { "issue_width": 4 },
///     "resources": [ { "id": "ALU", "capacity": 4 } ],
///     "descriptors": [ { "id": "ALU_2C", "resources": ["ALU"], "latency": 2 } ]
/// }"#;
/// let model = ModelDefinition::from_json(json).unwrap().build().unwrap();
/// let plan = model.resolve("ALU_2C", 10).unwrap();
/// assert_eq!(plan.result_ready_cycle, 12);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDefinition {
    /// Target name, informational.
    #[serde(default)]
    pub name: String,
    /// Machine parameter record.
    #[serde(default)]
    pub params: MachineParameters,
    /// Resource declarations.
    #[serde(default)]
    pub resources: Vec<ResourceDef>,
    /// Group declarations.
    #[serde(default)]
    pub groups: Vec<GroupDef>,
    /// Descriptor declarations.
    #[serde(default)]
    pub descriptors: Vec<DescriptorDef>,
    /// Composition declarations.
    #[serde(default)]
    pub compositions: Vec<CompositionDef>,
}

impl ModelDefinition {
    /// Parses a definition set from JSON.
    pub fn from_json(json: &str) -> ModelResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the definition set to pretty-printed JSON.
    pub fn to_json(&self) -> ModelResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validates every declaration and freezes the model.
    pub fn build(&self) -> ModelResult<SchedModel> {
        let mut b = ModelBuilder::new(self.params.clone());

        for r in &self.resources {
            let superset = r
                .superset
                .as_deref()
                .map(|name| b.resource(name))
                .transpose()?;
            let _ = b.define_buffered_resource(&r.id, r.capacity, superset, r.buffer_size)?;
        }

        for g in &self.groups {
            let mut members = Vec::with_capacity(g.members.len());
            for name in &g.members {
                match b.symbol(name)? {
                    ResourceRef::Resource(id) => members.push(id),
                    ResourceRef::Group(_) => {
                        return Err(ModelError::NestedGroup {
                            group: g.id.clone(),
                            member: name.clone(),
                        });
                    }
                }
            }
            let _ = b.define_group(&g.id, &members)?;
        }

        for d in &self.descriptors {
            let mut spec = DescriptorSpec::new(d.id.as_str(), d.latency)
                .occupancy(d.occupancy)
                .micro_ops(d.micro_ops);
            for demand in &d.resources {
                spec = match demand {
                    DemandDef::Name(name) => spec.uses(b.symbol(name)?),
                    DemandDef::Timed {
                        resource,
                        occupancy,
                    } => spec.uses_for(b.symbol(resource)?, *occupancy),
                };
            }
            for feature in &d.features {
                spec = spec.feature(feature.as_str());
            }
            let _ = b.define_descriptor(spec)?;
        }

        for c in &self.compositions {
            let stages: Vec<&str> = c.stages.iter().map(String::as_str).collect();
            let _ = b.compose(&c.id, &stages)?;
        }

        b.build()
    }
}
