use crate::BlockId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error category, determined by error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    /// Malformed nesting of scoped blocks, reported by the tree builder.
    Structure,
    /// A well-formed tree that breaks an execution rule.
    Runtime,
}

/// Numeric error code (E100–E299).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Structure errors (E100–E199) ──
    pub const UNCLOSED_SCOPE: Self = Self(100);
    pub const UNMATCHED_CLOSER: Self = Self(101);

    // ── Runtime errors (E200–E299) ──
    pub const MISSING_ENTRY: Self = Self(200);
    pub const DUPLICATE_ENTRY: Self = Self(201);
    pub const EMPTY_LOOP_BODY: Self = Self(202);
    pub const CONDITION_UNSET: Self = Self(203);
    pub const UNKNOWN_CONDITION: Self = Self(204);
    pub const UNSUPPORTED_BLOCK: Self = Self(205);
    pub const EMPTY_PROGRAM: Self = Self(206);

    /// Get the category for this error code.
    pub fn category(self) -> ErrorCategory {
        match self.0 {
            100..=199 => ErrorCategory::Structure,
            _ => ErrorCategory::Runtime,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structure => write!(f, "structure"),
            Self::Runtime => write!(f, "runtime"),
        }
    }
}

/// A structural error found while building the program tree.
///
/// `Display` yields the learner-facing message only; the code and the
/// offending block travel alongside for the editor to highlight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct BuildError {
    pub code: ErrorCode,
    pub category: ErrorCategory,
    pub message: String,
    /// The block the error points at, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_id: Option<BlockId>,
}

impl BuildError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            category: code.category(),
            message: message.into(),
            block_id: None,
        }
    }

    /// An opener whose body runs off the end of the sequence.
    pub fn unclosed_scope(label: &str, block_id: BlockId) -> Self {
        Self::new(
            ErrorCode::UNCLOSED_SCOPE,
            format!(
                "Close \"{label}\" with an end block! Check the order of your blocks once more."
            ),
        )
        .at(block_id)
    }

    /// A closer with nothing open at the top level.
    pub fn unmatched_closer(block_id: BlockId) -> Self {
        Self::new(
            ErrorCode::UNMATCHED_CLOSER,
            "The indentation doesn't line up. Check the order of your blocks.",
        )
        .at(block_id)
    }

    /// Attach the offending block.
    pub fn at(mut self, block_id: BlockId) -> Self {
        self.block_id = Some(block_id);
        self
    }
}

/// Result alias for tree building.
pub type BuildResult<T> = std::result::Result<T, BuildError>;
