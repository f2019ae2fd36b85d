//! Runtime error types for the blocklab interpreter.

use blocklab_types::{BlockTag, BuildError, ErrorCategory, ErrorCode};
use thiserror::Error;

/// Errors that abort a run.
///
/// `Display` yields the learner-facing message shown as the run's result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Nothing has been placed in the workspace.
    #[error("Place some blocks first!")]
    EmptyProgram,

    /// The tree is empty or does not start with the entry block.
    #[error("Start by placing \"when ⚑ clicked\" at the very top!")]
    MissingEntry,

    /// A second entry block, at any depth.
    #[error("Keep just one event block, at the very top!")]
    DuplicateEntry,

    /// A repeat block with nothing inside.
    #[error("Put the blocks you want to repeat inside the repeat block!")]
    EmptyLoopBody,

    /// An `if` block whose condition was never chosen.
    #[error("Choose a condition for the if block!")]
    ConditionUnset,

    /// An `if` block referring to something that is not a known condition.
    #[error("This program uses a condition that isn't supported yet.")]
    UnknownCondition(BlockTag),

    /// A block the interpreter cannot execute as a statement.
    #[error("This program contains a block that isn't supported yet.")]
    UnsupportedBlock(BlockTag),

    /// The sequence could not be turned into a tree.
    #[error(transparent)]
    Structure(#[from] BuildError),
}

impl EvalError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::EmptyProgram => ErrorCode::EMPTY_PROGRAM,
            Self::MissingEntry => ErrorCode::MISSING_ENTRY,
            Self::DuplicateEntry => ErrorCode::DUPLICATE_ENTRY,
            Self::EmptyLoopBody => ErrorCode::EMPTY_LOOP_BODY,
            Self::ConditionUnset => ErrorCode::CONDITION_UNSET,
            Self::UnknownCondition(_) => ErrorCode::UNKNOWN_CONDITION,
            Self::UnsupportedBlock(_) => ErrorCode::UNSUPPORTED_BLOCK,
            Self::Structure(err) => err.code,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        self.code().category()
    }
}

/// Result alias for interpreter operations.
pub type EvalResult<T> = Result<T, EvalError>;
