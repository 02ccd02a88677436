//! Common types shared by every part of the scheduling model.
//!
//! This module provides:
//! 1. **Identifiers:** Typed handles for resources, groups and descriptors.
//! 2. **Error Handling:** The `ModelError` taxonomy and its result alias.

/// Error types for model construction and queries.
pub mod error;

/// Typed handles into the model tables.
pub mod ids;

pub use error::{ErrorKind, ModelError, ModelResult};
pub use ids::{DescriptorId, GroupId, ResourceId, ResourceRef};
