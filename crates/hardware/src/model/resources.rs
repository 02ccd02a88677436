//! Resource graph: execution resources, supersets and groups.
//!
//! Resources form a forest. Each resource may name one parent superset it is a
//! physical subset of (e.g. the even half of the ALU pipelines). Groups are flat
//! "any one of" aliases over resources and never nest.
//!
//! Expansion of a symbol into the concrete units it can resolve to is computed
//! once, when the graph is sealed, and served from a table afterwards.

use std::collections::HashMap;

use crate::common::{GroupId, ModelError, ModelResult, ResourceId, ResourceRef};

/// An atomic hardware unit class with a fixed number of interchangeable instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResource {
    /// Declared identifier.
    pub name: String,
    /// Number of identical parallel instances, including those held by subsets.
    pub capacity: u32,
    /// Aggregate resource this one is a physical subset of.
    pub superset: Option<ResourceId>,
    /// In-flight queue depth, for resources that also buffer.
    pub buffer_size: Option<u32>,
}

/// A named alias for "any one of these resources".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceGroup {
    /// Declared identifier.
    pub name: String,
    /// Member resources, in declaration order.
    pub members: Vec<ResourceId>,
}

/// Containment graph over execution resources and groups.
#[derive(Debug, Clone, Default)]
pub struct ResourceGraph {
    resources: Vec<ExecutionResource>,
    groups: Vec<ResourceGroup>,
    symbols: HashMap<String, ResourceRef>,
    /// Direct subsets of each resource.
    subsets: Vec<Vec<ResourceId>>,
    /// Units claimed by direct subsets of each resource.
    claimed: Vec<u32>,
    /// Sealed expansion of each resource.
    resource_units: Vec<Vec<ResourceId>>,
    /// Sealed expansion of each group.
    group_units: Vec<Vec<ResourceId>>,
    /// Aggregates charged by each resource request, whatever unit is picked.
    resource_charges: Vec<Vec<ResourceId>>,
    /// Aggregates charged by each group request, whatever unit is picked.
    group_charges: Vec<Vec<ResourceId>>,
}

impl ResourceGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an execution resource.
    ///
    /// # Arguments
    ///
    /// * `name` - Identifier, unique across resources and groups.
    /// * `capacity` - Number of parallel instances; must be at least 1.
    /// * `superset` - Parent resource this one is a subset of.
    /// * `buffer_size` - Optional in-flight queue depth.
    ///
    /// # Returns
    ///
    /// The handle of the new resource, or the first invariant it violates.
    pub fn define_resource(
        &mut self,
        name: &str,
        capacity: u32,
        superset: Option<ResourceId>,
        buffer_size: Option<u32>,
    ) -> ModelResult<ResourceId> {
        if self.symbols.contains_key(name) {
            return Err(ModelError::DuplicateId(name.to_string()));
        }
        if capacity < 1 {
            return Err(ModelError::InvalidCapacity {
                id: name.to_string(),
                capacity,
            });
        }
        if let Some(parent) = superset {
            let parent_res = self
                .resources
                .get(parent.index())
                .ok_or_else(|| ModelError::UnknownResource(format!("resource#{}", parent.0)))?;
            let required = self.claimed[parent.index()].saturating_add(capacity);
            if required > parent_res.capacity {
                return Err(ModelError::CapacityOverflow {
                    superset: parent_res.name.clone(),
                    subset: name.to_string(),
                    required,
                    available: parent_res.capacity,
                });
            }
        }

        let id = ResourceId(self.resources.len() as u32);
        if let Some(parent) = superset {
            self.claimed[parent.index()] += capacity;
            self.subsets[parent.index()].push(id);
        }
        self.resources.push(ExecutionResource {
            name: name.to_string(),
            capacity,
            superset,
            buffer_size,
        });
        self.subsets.push(Vec::new());
        self.claimed.push(0);
        let _ = self.symbols.insert(name.to_string(), ResourceRef::Resource(id));
        Ok(id)
    }

    /// Declares a group of interchangeable resources.
    ///
    /// Members are resource handles, so a group can never contain another group.
    pub fn define_group(&mut self, name: &str, members: &[ResourceId]) -> ModelResult<GroupId> {
        if self.symbols.contains_key(name) {
            return Err(ModelError::DuplicateId(name.to_string()));
        }
        if members.is_empty() {
            return Err(ModelError::EmptyGroup(name.to_string()));
        }
        if let Some(bad) = members.iter().find(|m| m.index() >= self.resources.len()) {
            return Err(ModelError::UnknownResource(format!("resource#{}", bad.0)));
        }

        let id = GroupId(self.groups.len() as u32);
        self.groups.push(ResourceGroup {
            name: name.to_string(),
            members: members.to_vec(),
        });
        let _ = self.symbols.insert(name.to_string(), ResourceRef::Group(id));
        Ok(id)
    }

    /// Precomputes the expansion of every resource and group.
    ///
    /// Called once when the owning model is frozen.
    pub fn seal(&mut self) {
        self.resource_units = (0..self.resources.len())
            .map(|i| self.walk(ResourceId(i as u32)))
            .collect();
        self.group_units = self
            .groups
            .iter()
            .map(|g| {
                let mut units = Vec::new();
                for member in &g.members {
                    for unit in self.walk(*member) {
                        if !units.contains(&unit) {
                            units.push(unit);
                        }
                    }
                }
                units
            })
            .collect();
        self.resource_charges = self
            .resource_units
            .iter()
            .map(|units| self.common_aggregates(units))
            .collect();
        self.group_charges = self
            .group_units
            .iter()
            .map(|units| self.common_aggregates(units))
            .collect();
    }

    /// Supersets that lose one unit of aggregate capacity whichever of `units`
    /// is picked, nearest first.
    fn common_aggregates(&self, units: &[ResourceId]) -> Vec<ResourceId> {
        let Some((first, rest)) = units.split_first() else {
            return Vec::new();
        };
        self.aggregates_of(*first)
            .into_iter()
            .filter(|agg| rest.iter().all(|u| self.aggregates_of(*u).contains(agg)))
            .collect()
    }

    /// The unit itself when it is a superset, then its ancestors.
    fn aggregates_of(&self, unit: ResourceId) -> Vec<ResourceId> {
        let mut chain = Vec::new();
        if !self.subsets[unit.index()].is_empty() {
            chain.push(unit);
        }
        chain.extend(self.supersets(unit));
        chain
    }

    /// Leaf units under `id`. A superset whose subsets leave units unassigned is
    /// itself one of its own units.
    fn walk(&self, id: ResourceId) -> Vec<ResourceId> {
        let children = &self.subsets[id.index()];
        if children.is_empty() {
            return vec![id];
        }
        let mut units: Vec<ResourceId> = children.iter().flat_map(|c| self.walk(*c)).collect();
        if self.claimed[id.index()] < self.resources[id.index()].capacity {
            units.push(id);
        }
        units
    }

    /// Concrete units a resource, superset or group reference can resolve to.
    ///
    /// Returns an empty slice for a reference this graph never issued, or if the
    /// graph has not been sealed yet.
    pub fn expand(&self, r: ResourceRef) -> &[ResourceId] {
        let units = match r {
            ResourceRef::Resource(id) => self.resource_units.get(id.index()),
            ResourceRef::Group(id) => self.group_units.get(id.index()),
        };
        units.map(Vec::as_slice).unwrap_or_default()
    }

    /// Supersets whose aggregate capacity a request on `r` consumes one unit of,
    /// nearest first. Empty for a request on an unsplit top-level resource.
    ///
    /// Like [`expand`](Self::expand), this is served from the sealed tables.
    pub fn charged(&self, r: ResourceRef) -> &[ResourceId] {
        let charges = match r {
            ResourceRef::Resource(id) => self.resource_charges.get(id.index()),
            ResourceRef::Group(id) => self.group_charges.get(id.index()),
        };
        charges.map(Vec::as_slice).unwrap_or_default()
    }

    /// Instances of `id` that can be picked directly as a unit: the full
    /// capacity for a leaf, the units its subsets leave unassigned for a
    /// superset (zero when the subsets cover it).
    pub fn unit_capacity(&self, id: ResourceId) -> u32 {
        self.resources
            .get(id.index())
            .map_or(0, |r| r.capacity.saturating_sub(self.claimed[id.index()]))
    }

    /// Ancestor supersets of `id`, nearest first. Holding a unit of `id` also
    /// holds one unit of each of these.
    pub fn supersets(&self, id: ResourceId) -> Vec<ResourceId> {
        let mut chain = Vec::new();
        let mut cur = self.resources.get(id.index()).and_then(|r| r.superset);
        while let Some(parent) = cur {
            chain.push(parent);
            cur = self.resources[parent.index()].superset;
        }
        chain
    }

    /// Direct subsets of `id`.
    pub fn subsets(&self, id: ResourceId) -> &[ResourceId] {
        self.subsets.get(id.index()).map(Vec::as_slice).unwrap_or_default()
    }

    /// Looks up a resource or group by identifier.
    pub fn symbol(&self, name: &str) -> Option<ResourceRef> {
        self.symbols.get(name).copied()
    }

    /// True if `r` was issued by this graph.
    pub fn contains(&self, r: ResourceRef) -> bool {
        match r {
            ResourceRef::Resource(id) => id.index() < self.resources.len(),
            ResourceRef::Group(id) => id.index() < self.groups.len(),
        }
    }

    /// Resource record for `id`.
    pub fn resource(&self, id: ResourceId) -> Option<&ExecutionResource> {
        self.resources.get(id.index())
    }

    /// Group record for `id`.
    pub fn group(&self, id: GroupId) -> Option<&ResourceGroup> {
        self.groups.get(id.index())
    }

    /// All resources in declaration order.
    pub fn resources(&self) -> &[ExecutionResource] {
        &self.resources
    }

    /// All groups in declaration order.
    pub fn groups(&self) -> &[ResourceGroup] {
        &self.groups
    }

    /// Display name of a reference.
    pub fn name_of(&self, r: ResourceRef) -> Option<&str> {
        match r {
            ResourceRef::Resource(id) => self.resource(id).map(|res| res.name.as_str()),
            ResourceRef::Group(id) => self.group(id).map(|g| g.name.as_str()),
        }
    }
}
