//! Interpreter configuration.

use serde::{Deserialize, Serialize};

/// `x` at or past which the goal counts as reached.
pub const GOAL_TARGET_X: i64 = 4;
/// How far a jump lifts the character before it lands again.
pub const JUMP_HEIGHT: i64 = 50;

/// Knobs of a single interpreter run.
///
/// Defaults are the lesson constants. Every field is optional when
/// deserializing, so hosts can send a partial JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InterpreterConfig {
    pub goal_x: i64,
    pub jump_height: i64,
    /// Record a state snapshot after every executed step.
    pub record_trace: bool,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            goal_x: GOAL_TARGET_X,
            jump_height: JUMP_HEIGHT,
            record_trace: false,
        }
    }
}

impl InterpreterConfig {
    pub fn with_goal_x(mut self, goal_x: i64) -> Self {
        self.goal_x = goal_x;
        self
    }

    pub fn with_jump_height(mut self, jump_height: i64) -> Self {
        self.jump_height = jump_height;
        self
    }

    pub fn with_trace(mut self, record_trace: bool) -> Self {
        self.record_trace = record_trace;
        self
    }
}
