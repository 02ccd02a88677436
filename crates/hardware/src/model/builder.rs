//! Construction-time builder for a scheduling model.
//!
//! Every definition is validated when it is made, so a bad definition set fails
//! at build time rather than at the first query. `build` freezes the result into
//! an immutable [`SchedModel`].

use tracing::debug;

use crate::common::{DescriptorId, GroupId, ModelError, ModelResult, ResourceId, ResourceRef};
use crate::config::MachineParameters;
use crate::model::SchedModel;
use crate::model::descriptor::{DescriptorSpec, DescriptorTable};
use crate::model::resources::ResourceGraph;

/// Accumulates resources, groups, descriptors and compositions.
///
/// # Examples
///
/// ```
/// use schedmodel_core::config::MachineParameters;
/// use schedmodel_core::model::{DescriptorSpec, ModelBuilder};
///
/// let mut b = ModelBuilder::new(MachineParameters::default());
/// let ls = b.define_resource("LS", 4, None).unwrap();
/// let alu = b.define_resource("ALU", 4, None).unwrap();
/// let load = b.define_descriptor(DescriptorSpec::new("LOAD_4C", 4).uses(ls)).unwrap();
/// let op = b.define_descriptor(DescriptorSpec::new("ALU_2C", 2).uses(alu)).unwrap();
/// let cracked = b.compose("LOAD_ALU_6C", &["LOAD_4C", "ALU_2C"]).unwrap();
/// assert_ne!(load, op);
/// let model = b.build().unwrap();
///
/// let plan = model.resolve_by_id(cracked, 0).unwrap();
/// assert_eq!(plan.result_ready_cycle, 6);
/// ```
#[derive(Debug, Default)]
pub struct ModelBuilder {
    params: MachineParameters,
    graph: ResourceGraph,
    table: DescriptorTable,
}

impl ModelBuilder {
    /// Starts an empty model for a target with the given parameters.
    pub fn new(params: MachineParameters) -> Self {
        Self {
            params,
            graph: ResourceGraph::new(),
            table: DescriptorTable::new(),
        }
    }

    /// Declares an execution resource, optionally as a subset of `superset`.
    pub fn define_resource(
        &mut self,
        name: &str,
        capacity: u32,
        superset: Option<ResourceId>,
    ) -> ModelResult<ResourceId> {
        self.define_buffered_resource(name, capacity, superset, None)
    }

    /// Declares an execution resource that also queues up to `buffer_size` operations.
    pub fn define_buffered_resource(
        &mut self,
        name: &str,
        capacity: u32,
        superset: Option<ResourceId>,
        buffer_size: Option<u32>,
    ) -> ModelResult<ResourceId> {
        let id = self
            .graph
            .define_resource(name, capacity, superset, buffer_size)?;
        debug!(resource = name, capacity, ?superset, ?buffer_size, "defined resource");
        Ok(id)
    }

    /// Declares a group satisfied by any one of `members`.
    pub fn define_group(&mut self, name: &str, members: &[ResourceId]) -> ModelResult<GroupId> {
        let id = self.graph.define_group(name, members)?;
        debug!(group = name, members = members.len(), "defined group");
        Ok(id)
    }

    /// Adds a latency descriptor.
    pub fn define_descriptor(&mut self, spec: DescriptorSpec) -> ModelResult<DescriptorId> {
        let name = spec.name().to_string();
        let id = self.table.define(spec, &self.graph)?;
        debug!(descriptor = %name, "defined descriptor");
        Ok(id)
    }

    /// Adds a composition of previously defined descriptors.
    pub fn compose(&mut self, name: &str, stages: &[&str]) -> ModelResult<DescriptorId> {
        self.table.compose(name, stages)
    }

    /// Looks up a previously declared resource by name.
    pub fn resource(&self, name: &str) -> ModelResult<ResourceId> {
        match self.graph.symbol(name) {
            Some(ResourceRef::Resource(id)) => Ok(id),
            _ => Err(ModelError::UnknownResource(name.to_string())),
        }
    }

    /// Looks up a previously declared resource or group by name.
    pub fn symbol(&self, name: &str) -> ModelResult<ResourceRef> {
        self.graph
            .symbol(name)
            .ok_or_else(|| ModelError::UnknownResource(name.to_string()))
    }

    /// Validates the machine parameters and freezes the model.
    pub fn build(mut self) -> ModelResult<SchedModel> {
        self.params.validate()?;
        self.graph.seal();
        debug!(
            resources = self.graph.resources().len(),
            groups = self.graph.groups().len(),
            descriptors = self.table.len(),
            issue_width = self.params.issue_width,
            "scheduling model frozen"
        );
        Ok(SchedModel {
            params: self.params,
            graph: self.graph,
            table: self.table,
        })
    }
}
