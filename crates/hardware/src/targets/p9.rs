//! POWER9-class out-of-order core.
//!
//! The core dispatches up to six operations per cycle into two superslices.
//! Execution pipelines come in even/odd halves: an operation steered to one half
//! can only use that half's units, while an unsteered operation may take any.
//!
//! | Resource | Units | Subsets |
//! |----------|-------|---------|
//! | `DISPATCH` | 6 | `DISP_EVEN` (2), `DISP_ODD` (2), `DISP_BR` (1) |
//! | `ALU` | 4 | `ALUE` (2), `ALUO` (2) |
//! | `DP` | 4 | `DPE` (2), `DPO` (2) |
//! | `LS` | 4 | queues 64 |
//! | `PM` | 2 | |
//! | `DIV`, `DFU`, `BR`, `CY` | 1 each | |
//!
//! Loads feeding an arithmetic consumer are cracked into two serial stages.

use crate::common::ModelResult;
use crate::config::MachineParameters;
use crate::model::SchedModel;
use crate::model::definition::{
    CompositionDef, DescriptorDef, GroupDef, ModelDefinition, ResourceDef,
};

/// Machine parameters of the target.
mod params {
    pub const ISSUE_WIDTH: u32 = 8;
    pub const LOAD_LATENCY: u32 = 5;
    pub const HIGH_LATENCY: u32 = 26;
    pub const MISPREDICT_PENALTY: u32 = 16;
    /// Try to keep at least ten dispatch groups in a loop.
    pub const LOOP_MICRO_OP_BUFFER_SIZE: u32 = 60;
    pub const MICRO_OP_BUFFER_SIZE: u32 = 44;
    pub const UNSUPPORTED: [&str; 4] = ["spe", "prefix-instrs", "paired-vector-memops", "mma"];
}

/// Any dispatch slot that is not reserved for branches.
pub const DISP_ANY: &str = "DISP_ANY";

/// Returns the declarative definition of the target.
pub fn definition() -> ModelDefinition {
    let params = MachineParameters {
        issue_width: params::ISSUE_WIDTH,
        load_latency: params::LOAD_LATENCY,
        high_latency: params::HIGH_LATENCY,
        mispredict_penalty: params::MISPREDICT_PENALTY,
        loop_micro_op_buffer_size: params::LOOP_MICRO_OP_BUFFER_SIZE,
        micro_op_buffer_size: params::MICRO_OP_BUFFER_SIZE,
        post_ra_scheduler: false,
        complete_model: true,
        unsupported_features: params::UNSUPPORTED.iter().map(ToString::to_string).collect(),
    };

    let resources = vec![
        ResourceDef::new("DISPATCH", 6),
        ResourceDef::new("DISP_EVEN", 2).within("DISPATCH"),
        ResourceDef::new("DISP_ODD", 2).within("DISPATCH"),
        ResourceDef::new("DISP_BR", 1).within("DISPATCH"),
        ResourceDef::new("ALU", 4),
        ResourceDef::new("ALUE", 2).within("ALU"),
        ResourceDef::new("ALUO", 2).within("ALU"),
        ResourceDef::new("DP", 4),
        ResourceDef::new("DPE", 2).within("DP"),
        ResourceDef::new("DPO", 2).within("DP"),
        ResourceDef::new("LS", 4).buffered(64),
        ResourceDef::new("PM", 2),
        ResourceDef::new("DIV", 1),
        ResourceDef::new("DFU", 1),
        ResourceDef::new("BR", 1),
        ResourceDef::new("CY", 1),
    ];

    let groups = vec![GroupDef {
        id: DISP_ANY.to_string(),
        members: vec!["DISP_EVEN".to_string(), "DISP_ODD".to_string()],
    }];

    let descriptors = vec![
        // Fixed point.
        DescriptorDef::new("P9_ALU_2C", 2).uses(DISP_ANY).uses("ALU"),
        DescriptorDef::new("P9_ALU_3C", 3).uses(DISP_ANY).uses("ALU"),
        DescriptorDef::new("P9_ALUE_2C", 2).uses("DISP_EVEN").uses("ALUE"),
        DescriptorDef::new("P9_ALUO_2C", 2).uses("DISP_ODD").uses("ALUO"),
        DescriptorDef::new("P9_DIV_12C", 12).uses(DISP_ANY).uses_for("DIV", 12),
        DescriptorDef::new("P9_DIV_24C", 24).uses(DISP_ANY).uses_for("DIV", 20),
        // Load/store.
        DescriptorDef::new("P9_LS_4C", 4).uses(DISP_ANY).uses("LS"),
        DescriptorDef::new("P9_LS_5C", 5).uses(DISP_ANY).uses("LS"),
        DescriptorDef::new("P9_LS_1C", 1).uses(DISP_ANY).uses("LS"),
        // Floating point and vector.
        DescriptorDef::new("P9_DP_7C", 7).uses(DISP_ANY).uses("DP"),
        DescriptorDef::new("P9_DPE_7C", 7).uses("DISP_EVEN").uses("DPE"),
        DescriptorDef::new("P9_DPO_7C", 7).uses("DISP_ODD").uses("DPO"),
        DescriptorDef::new("P9_PM_3C", 3).uses(DISP_ANY).uses("PM"),
        DescriptorDef::new("P9_DFU_12C", 12).uses(DISP_ANY).uses_for("DFU", 12),
        DescriptorDef::new("P9_CY_6C", 6).uses(DISP_ANY).uses("CY"),
        // Branch.
        DescriptorDef::new("P9_BR_2C", 2).uses("DISP_BR").uses("BR"),
        // Front-end only.
        DescriptorDef::new("P9_DISP_ONLY", 0).uses(DISP_ANY).micro_ops(0),
        // Matrix accumulate is not modeled on this core.
        DescriptorDef::new("P9_MMA_24C", 24)
            .uses(DISP_ANY)
            .uses_for("DFU", 24)
            .feature("mma"),
    ];

    let compositions = vec![
        CompositionDef::new("P9_LoadAndALUOp_6C", &["P9_LS_4C", "P9_ALU_2C"]),
        CompositionDef::new("P9_LoadAndALUOp_7C", &["P9_LS_5C", "P9_ALU_2C"]),
        CompositionDef::new("P9_LoadAndPMOp_8C", &["P9_LS_5C", "P9_PM_3C"]),
        CompositionDef::new("P9_LoadAndDPOp_11C", &["P9_LS_4C", "P9_DP_7C"]),
        CompositionDef::new("P9_LoadAndALU2Op_8C", &["P9_LoadAndALUOp_6C", "P9_ALU_2C"]),
        CompositionDef::new("P9_IntDivAndALUOp_14C", &["P9_DIV_12C", "P9_ALU_2C"]),
    ];

    ModelDefinition {
        name: "power9".to_string(),
        params,
        resources,
        groups,
        descriptors,
        compositions,
    }
}

/// Builds the frozen model of the target.
pub fn model() -> ModelResult<SchedModel> {
    definition().build()
}
