//! blocklab tree-walking interpreter.
//!
//! Executes program trees against a simulated character, records replay
//! traces, grades final states against declared expectations, and runs a
//! block sequence against every test case of a challenge.

pub mod checker;
mod config;
mod error;
mod interpreter;
pub mod test_runner;
mod trace;

pub use checker::{check_expectation, CheckOutcome};
pub use config::{InterpreterConfig, GOAL_TARGET_X, JUMP_HEIGHT};
pub use error::{EvalError, EvalResult};
pub use interpreter::{Execution, Interpreter};
pub use test_runner::{run_program, TestRunner};
pub use trace::{Replay, Trace};
