//! Program tree produced by the tree builder.

use crate::block::{normalize_loop_count, BlockTag, PlacedBlock};
use serde::{Deserialize, Serialize};

/// One node of the program tree.
///
/// Leaves and empty scoped blocks have no children. The payload fields are
/// copied from the originating block; nothing refers back to the sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramNode {
    #[serde(rename = "type")]
    pub kind: BlockTag,
    #[serde(default)]
    pub children: Vec<ProgramNode>,
    #[serde(rename = "conditionId", default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<BlockTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_count: Option<f64>,
}

impl ProgramNode {
    /// A zero-child node.
    pub fn leaf(kind: impl Into<BlockTag>) -> Self {
        Self {
            kind: kind.into(),
            children: Vec::new(),
            condition: None,
            loop_count: None,
        }
    }

    /// A scoped node carrying the opener's payload and the given body.
    pub fn scoped(opener: &PlacedBlock, children: Vec<ProgramNode>) -> Self {
        Self {
            kind: opener.kind.clone(),
            children,
            condition: opener.condition.clone(),
            loop_count: opener.loop_count,
        }
    }

    /// Normalized loop count of a repeat node.
    pub fn loop_count(&self) -> u32 {
        normalize_loop_count(self.loop_count)
    }
}
