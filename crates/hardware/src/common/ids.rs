//! Strongly typed handles into the model tables.
//!
//! Handles are dense indices assigned in declaration order. They are only
//! meaningful for the builder or model that issued them.

use std::fmt;

/// Handle to an atomic execution resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ResourceId(pub u32);

/// Handle to a resource group ("any one of these resources").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GroupId(pub u32);

/// Handle to a latency descriptor or a composition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct DescriptorId(pub u32);

impl ResourceId {
    /// Index into the resource table.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl GroupId {
    /// Index into the group table.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl DescriptorId {
    /// Index into the descriptor table.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A demand target: either one concrete resource (or superset) or a group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceRef {
    /// A declared execution resource.
    Resource(ResourceId),
    /// A declared resource group.
    Group(GroupId),
}

impl From<ResourceId> for ResourceRef {
    fn from(id: ResourceId) -> Self {
        Self::Resource(id)
    }
}

impl From<GroupId> for ResourceRef {
    fn from(id: GroupId) -> Self {
        Self::Group(id)
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resource(id) => write!(f, "resource#{}", id.0),
            Self::Group(id) => write!(f, "group#{}", id.0),
        }
    }
}
