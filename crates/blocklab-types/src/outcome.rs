//! Challenge test cases, expected outcomes and run results.

use crate::state::{CharacterState, StateOverrides};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Partial description of the required final state.
///
/// Every `None` field is "don't care". Numeric targets are kept as they were
/// authored; a fractional target can never match an integer state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Expectation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jump_count: Option<f64>,
    /// Highest `y` must reach at least this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_y: Option<f64>,
    /// Lowest `y` must reach at most this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_includes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
}

impl Expectation {
    /// Read an expectation from an untrusted JSON payload.
    ///
    /// Returns `None` when the payload is not an object, which callers treat
    /// as "no constraints". Fields of the wrong JSON type are ignored.
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            x: number_field(obj, "x"),
            y: number_field(obj, "y"),
            move_total: number_field(obj, "moveTotal"),
            jump_count: number_field(obj, "jumpCount"),
            max_y: number_field(obj, "maxY"),
            min_y: number_field(obj, "minY"),
            message_includes: string_field(obj, "messageIncludes"),
            last_message: string_field(obj, "lastMessage"),
        })
    }
}

fn number_field(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    obj.get(key).and_then(Value::as_f64)
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

/// One declared test case of a challenge.
///
/// Both halves stay raw JSON until used: challenge content is authored
/// outside this crate and is not trusted to be well-typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    #[serde(default)]
    pub input: Vec<Value>,
    #[serde(default)]
    pub expected: Value,
}

impl TestCase {
    pub fn new(overrides: Option<StateOverrides>, expected: Value) -> Self {
        let input = overrides
            .map(|o| vec![serde_json::to_value(o).unwrap_or(Value::Null)])
            .unwrap_or_default();
        Self { input, expected }
    }

    /// Initial-state overrides: the first `input` entry, if it is an object.
    pub fn overrides(&self) -> Option<StateOverrides> {
        self.input.first().and_then(StateOverrides::from_json)
    }

    pub fn expectation(&self) -> Option<Expectation> {
        Expectation::from_json(&self.expected)
    }
}

/// The parts of a lesson the engine needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

/// Outcome class of one test-case run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Success,
    Failure,
    Error,
}

/// Which test case a result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestCaseLabel {
    /// 1-based position in the challenge's test-case list.
    Ordinal(usize),
    /// The single run of a challenge without test cases.
    Unconstrained,
}

impl Serialize for TestCaseLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Ordinal(n) => serializer.serialize_u64(*n as u64),
            Self::Unconstrained => serializer.serialize_str("-"),
        }
    }
}

impl fmt::Display for TestCaseLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ordinal(n) => write!(f, "{n}"),
            Self::Unconstrained => write!(f, "-"),
        }
    }
}

/// Result of running one test case.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub status: TestStatus,
    /// Learner-facing message.
    pub message: String,
    pub test_case: TestCaseLabel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<CharacterState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Vec<CharacterState>>,
}

impl TestResult {
    pub fn error(test_case: TestCaseLabel, message: impl Into<String>) -> Self {
        Self {
            status: TestStatus::Error,
            message: message.into(),
            test_case,
            state: None,
            trace: None,
        }
    }

    pub fn passed(&self) -> bool {
        self.status == TestStatus::Success
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = match self.status {
            TestStatus::Success => "✓",
            TestStatus::Failure => "✗",
            TestStatus::Error => "!",
        };
        write!(f, "  {mark} #{} {}", self.test_case, self.message)
    }
}

/// Results of every test case plus the top-level error banner.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    pub results: Vec<TestResult>,
    /// Message of the first erroring case, or empty.
    pub error: String,
}

impl RunReport {
    pub fn from_results(results: Vec<TestResult>) -> Self {
        let error = results
            .iter()
            .find(|r| r.status == TestStatus::Error)
            .map(|r| r.message.clone())
            .unwrap_or_default();
        Self { results, error }
    }

    pub fn all_passed(&self) -> bool {
        !self.results.is_empty() && self.results.iter().all(TestResult::passed)
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in &self.results {
            writeln!(f, "{r}")?;
        }
        writeln!(
            f,
            "\n{} passed, {} not passed",
            self.passed(),
            self.results.len() - self.passed()
        )
    }
}
