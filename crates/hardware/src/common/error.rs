//! Model construction and query errors.
//!
//! This module defines the single error type returned by every fallible
//! operation in the crate. It provides:
//! 1. **Definition errors:** Raised while building the model; building aborts at the first one.
//! 2. **Query errors:** Raised by `lookup` and `resolve`; they leave the model untouched.
//! 3. **Classification:** [`ModelError::kind`] tells callers which family an error belongs to.

use thiserror::Error;

/// Family an error belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Raised while the definition set is being built. Fatal for that build.
    Definition,
    /// Raised per query. The model stays valid and the caller may fall back.
    Query,
}

/// Errors raised while defining or querying a scheduling model.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ModelError {
    /// An identifier was declared twice in the same namespace.
    #[error("duplicate identifier `{0}`")]
    DuplicateId(String),

    /// A resource was declared with fewer than one unit.
    #[error("resource `{id}` has invalid capacity {capacity}; capacity must be at least 1")]
    InvalidCapacity {
        /// Resource identifier.
        id: String,
        /// Declared capacity.
        capacity: u32,
    },

    /// Subsets declared under a superset need more units than the superset has.
    #[error(
        "subset `{subset}` overflows superset `{superset}`: subsets need {required} units, superset has {available}"
    )]
    CapacityOverflow {
        /// Superset identifier.
        superset: String,
        /// Subset whose declaration overflowed the superset.
        subset: String,
        /// Units claimed by subsets including the offending one.
        required: u32,
        /// Capacity of the superset.
        available: u32,
    },

    /// A definition references a resource or group that was never declared.
    #[error("unknown resource or group `{0}`")]
    UnknownResource(String),

    /// A group names another group as a member.
    #[error("group `{group}` names group `{member}` as a member; groups cannot nest")]
    NestedGroup {
        /// Group being declared.
        group: String,
        /// Offending member.
        member: String,
    },

    /// A group has no members.
    #[error("group `{0}` has no members")]
    EmptyGroup(String),

    /// A descriptor declares a result latency below zero.
    #[error("descriptor `{id}` has negative result latency {latency}")]
    NegativeLatency {
        /// Descriptor identifier.
        id: String,
        /// Declared latency.
        latency: i64,
    },

    /// A descriptor declares a result latency too large to represent.
    #[error("descriptor `{id}` has result latency {latency}; at most {max} cycles are supported")]
    LatencyOutOfRange {
        /// Descriptor identifier.
        id: String,
        /// Declared latency.
        latency: i64,
        /// Largest accepted latency.
        max: u32,
    },

    /// A descriptor declares a resource occupancy below one cycle.
    #[error("descriptor `{id}` has invalid occupancy {occupancy}; occupancy must be at least 1")]
    InvalidOccupancy {
        /// Descriptor identifier.
        id: String,
        /// Declared occupancy.
        occupancy: i64,
    },

    /// A composition lists fewer than two stages.
    #[error("composition `{id}` has {stages} stage(s); at least 2 are required")]
    EmptyComposition {
        /// Composition identifier.
        id: String,
        /// Number of stages supplied.
        stages: usize,
    },

    /// A machine parameter is out of range.
    #[error("invalid machine parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// A descriptor or composition identifier is not in the table.
    #[error("unknown descriptor `{0}`")]
    UnknownDescriptor(String),

    /// The operation class depends on a feature this target does not model.
    #[error("descriptor `{id}` requires unsupported feature `{feature}`")]
    UnsupportedFeature {
        /// Descriptor identifier.
        id: String,
        /// First unsupported feature found on the descriptor.
        feature: String,
    },

    /// A definition set could not be parsed.
    #[error("malformed model definition: {0}")]
    Parse(String),
}

impl ModelError {
    /// Returns the family this error belongs to.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownDescriptor(_) | Self::UnsupportedFeature { .. } => ErrorKind::Query,
            _ => ErrorKind::Definition,
        }
    }

    /// True for errors the caller can recover from by falling back to its own estimate.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Query)
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type ModelResult<T> = Result<T, ModelError>;
