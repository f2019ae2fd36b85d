//! Shared types for blocklab.
//!
//! This crate defines the block catalog, the placed-block and program-tree
//! records, the simulated character state, challenge test cases and results,
//! and the structural error type shared by every pipeline stage.

pub mod block;
mod error;
pub mod outcome;
pub mod program;
pub mod state;

pub use block::{
    BlockCategory, BlockId, BlockIdGen, BlockInfo, BlockKind, BlockRole, BlockTag, PlacedBlock,
};
pub use error::{BuildError, BuildResult, ErrorCategory, ErrorCode};
pub use outcome::{
    Challenge, Expectation, RunReport, TestCase, TestCaseLabel, TestResult, TestStatus,
};
pub use program::ProgramNode;
pub use state::{CharacterState, StateOverrides};
