//! Machine parameter set for the scheduling model.
//!
//! This module defines the global, scheduler-visible constants of a target. It provides:
//! 1. **Defaults:** Baseline values used when a field is not supplied.
//! 2. **Structure:** The flat `MachineParameters` record, deserializable from JSON.
//! 3. **Validation:** Range checks applied before a model is frozen.
//!
//! Parameters are supplied as part of a `ModelDefinition` or built directly with
//! `MachineParameters::default()` and struct update syntax.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::common::{ModelError, ModelResult};

/// Default machine parameter constants.
///
/// These describe a conservative single-issue machine; real targets override them.
mod defaults {
    /// Operations issuable per cycle.
    pub const ISSUE_WIDTH: u32 = 1;

    /// Cache-hit load latency in cycles.
    pub const LOAD_LATENCY: u32 = 4;

    /// Latency assumed for long operations the target does not describe precisely.
    pub const HIGH_LATENCY: u32 = 10;

    /// Cycles lost on a branch misprediction.
    pub const MISPREDICT_PENALTY: u32 = 10;

    /// Front-end loop buffer capacity in micro-ops (0 = no loop buffer).
    pub const LOOP_MICRO_OP_BUFFER_SIZE: u32 = 0;

    /// Back-end in-flight micro-op capacity (0 = in-order issue).
    pub const MICRO_OP_BUFFER_SIZE: u32 = 0;
}

/// Global constants of a target, visible to the scheduler.
///
/// # Examples
///
/// ```
/// use schedmodel_core::config::MachineParameters;
///
/// let json = r#"{ "issue_width": 8, "unsupported_features": ["mma"] }"#;
/// let params: MachineParameters = serde_json::from_str(json).unwrap();
/// assert_eq!(params.issue_width, 8);
/// assert_eq!(params.load_latency, 4);
/// assert!(params.is_unsupported("mma"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineParameters {
    /// Maximum operations issued per cycle.
    #[serde(default = "MachineParameters::default_issue_width")]
    pub issue_width: u32,

    /// Default cache-hit load latency in cycles.
    #[serde(default = "MachineParameters::default_load_latency")]
    pub load_latency: u32,

    /// Conservative latency for long operations without a precise descriptor.
    #[serde(default = "MachineParameters::default_high_latency")]
    pub high_latency: u32,

    /// Branch misprediction recovery penalty in cycles.
    #[serde(default = "MachineParameters::default_mispredict_penalty")]
    pub mispredict_penalty: u32,

    /// Front-end micro-op buffering before the loop stream stalls.
    #[serde(default = "MachineParameters::default_loop_buffer")]
    pub loop_micro_op_buffer_size: u32,

    /// Back-end in-flight micro-op buffering capacity.
    #[serde(default = "MachineParameters::default_micro_op_buffer")]
    pub micro_op_buffer_size: u32,

    /// Whether the target also wants a post-register-allocation scheduling pass.
    #[serde(default)]
    pub post_ra_scheduler: bool,

    /// Whether every operation class of the target is expected to have a descriptor.
    #[serde(default = "MachineParameters::default_complete_model")]
    pub complete_model: bool,

    /// Features this model cannot describe; tagged classes are rejected at resolve time.
    #[serde(default)]
    pub unsupported_features: BTreeSet<String>,
}

impl MachineParameters {
    fn default_issue_width() -> u32 {
        defaults::ISSUE_WIDTH
    }

    fn default_load_latency() -> u32 {
        defaults::LOAD_LATENCY
    }

    fn default_high_latency() -> u32 {
        defaults::HIGH_LATENCY
    }

    fn default_mispredict_penalty() -> u32 {
        defaults::MISPREDICT_PENALTY
    }

    fn default_loop_buffer() -> u32 {
        defaults::LOOP_MICRO_OP_BUFFER_SIZE
    }

    fn default_micro_op_buffer() -> u32 {
        defaults::MICRO_OP_BUFFER_SIZE
    }

    fn default_complete_model() -> bool {
        true
    }

    /// True if `feature` is in the unsupported set.
    pub fn is_unsupported(&self, feature: &str) -> bool {
        self.unsupported_features.contains(feature)
    }

    /// Returns the first feature of `features` this target does not support.
    pub fn first_unsupported<'a, I>(&self, features: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a String>,
    {
        features
            .into_iter()
            .map(String::as_str)
            .find(|f| self.is_unsupported(f))
    }

    /// Checks that every parameter is in range.
    pub fn validate(&self) -> ModelResult<()> {
        if self.issue_width == 0 {
            return Err(ModelError::InvalidParameter {
                name: "issue_width",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for MachineParameters {
    fn default() -> Self {
        Self {
            issue_width: defaults::ISSUE_WIDTH,
            load_latency: defaults::LOAD_LATENCY,
            high_latency: defaults::HIGH_LATENCY,
            mispredict_penalty: defaults::MISPREDICT_PENALTY,
            loop_micro_op_buffer_size: defaults::LOOP_MICRO_OP_BUFFER_SIZE,
            micro_op_buffer_size: defaults::MICRO_OP_BUFFER_SIZE,
            post_ra_scheduler: false,
            complete_model: true,
            unsupported_features: BTreeSet::new(),
        }
    }
}
