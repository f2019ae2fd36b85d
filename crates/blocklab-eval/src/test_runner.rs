//! blocklab test runner: runs a block sequence against a challenge's test cases.
//!
//! Each test case gets its own tree build and a fresh character state; the
//! runs share nothing.

use crate::checker::check_expectation;
use crate::config::InterpreterConfig;
use crate::error::{EvalError, EvalResult};
use crate::interpreter::{Execution, Interpreter};
use blocklab_parser::build_tree;
use blocklab_types::{
    Challenge, PlacedBlock, RunReport, StateOverrides, TestCase, TestCaseLabel, TestResult,
    TestStatus,
};

/// Message for a successful run of a challenge without test cases.
pub const FREE_RUN_MESSAGE: &str = "You moved it freely!";

/// Build the tree for `blocks` and interpret it once.
///
/// An empty workspace is reported before any structural check.
pub fn run_program(
    blocks: &[PlacedBlock],
    overrides: Option<&StateOverrides>,
    config: &InterpreterConfig,
) -> EvalResult<Execution> {
    if blocks.is_empty() {
        return Err(EvalError::EmptyProgram);
    }
    let nodes = build_tree(blocks)?;
    Interpreter::new(config.clone()).run(&nodes, overrides)
}

/// Runs block sequences against challenges.
#[derive(Debug, Clone)]
pub struct TestRunner {
    config: InterpreterConfig,
}

impl Default for TestRunner {
    /// Records traces, so every result can be replayed.
    fn default() -> Self {
        Self::new(InterpreterConfig::default().with_trace(true))
    }
}

impl TestRunner {
    pub fn new(config: InterpreterConfig) -> Self {
        Self { config }
    }

    /// Run every test case of `challenge`.
    pub fn run_challenge(&self, blocks: &[PlacedBlock], challenge: &Challenge) -> RunReport {
        let span = tracing::info_span!("challenge", id = %challenge.id);
        let _guard = span.enter();
        self.run_cases(blocks, &challenge.test_cases)
    }

    /// Run `blocks` once per test case, or once unconstrained if there are none.
    ///
    /// Results come back in test-case order; the first error becomes the
    /// report's banner but every case is still recorded.
    pub fn run_cases(&self, blocks: &[PlacedBlock], cases: &[TestCase]) -> RunReport {
        let results = if cases.is_empty() {
            vec![self.run_unconstrained(blocks)]
        } else {
            cases
                .iter()
                .enumerate()
                .map(|(i, case)| self.run_case(blocks, TestCaseLabel::Ordinal(i + 1), case))
                .collect()
        };

        let report = RunReport::from_results(results);
        tracing::info!(
            cases = report.results.len(),
            passed = report.passed(),
            errored = !report.error.is_empty(),
            "run finished"
        );
        report
    }

    fn run_unconstrained(&self, blocks: &[PlacedBlock]) -> TestResult {
        match run_program(blocks, None, &self.config) {
            Ok(execution) => TestResult {
                status: TestStatus::Success,
                message: FREE_RUN_MESSAGE.to_string(),
                test_case: TestCaseLabel::Unconstrained,
                state: Some(execution.state),
                trace: execution.trace.map(|t| t.into_frames()),
            },
            Err(err) => TestResult::error(TestCaseLabel::Unconstrained, err.to_string()),
        }
    }

    fn run_case(&self, blocks: &[PlacedBlock], label: TestCaseLabel, case: &TestCase) -> TestResult {
        let overrides = case.overrides();
        let execution = match run_program(blocks, overrides.as_ref(), &self.config) {
            Ok(execution) => execution,
            Err(err) => {
                tracing::debug!(case = %label, code = %err.code(), "test case errored");
                return TestResult::error(label, err.to_string());
            }
        };

        let expectation = case.expectation();
        let outcome = check_expectation(&execution.state, expectation.as_ref());
        TestResult {
            status: if outcome.passed() {
                TestStatus::Success
            } else {
                TestStatus::Failure
            },
            message: outcome.message(),
            test_case: label,
            state: Some(execution.state),
            trace: execution.trace.map(|t| t.into_frames()),
        }
    }
}
