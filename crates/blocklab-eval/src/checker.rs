//! Expectation checker: final state against a declared outcome.

use blocklab_types::{CharacterState, Expectation};

/// Message for a run that met every declared expectation.
pub const PASS_MESSAGE: &str = "Perfect! It moved exactly as expected.";
/// Message for a run with nothing to check against.
pub const UNCONSTRAINED_MESSAGE: &str = "It ran as expected!";

/// Result of comparing a state with an expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// No expectation was declared.
    Unconstrained,
    Passed,
    /// One learner-facing hint per failing criterion, in check order.
    Failed(Vec<String>),
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }

    pub fn issues(&self) -> &[String] {
        match self {
            Self::Failed(issues) => issues,
            _ => &[],
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Unconstrained => UNCONSTRAINED_MESSAGE.to_string(),
            Self::Passed => PASS_MESSAGE.to_string(),
            Self::Failed(issues) => issues.join(" "),
        }
    }
}

/// Compare `state` with `expected`.
///
/// Every declared criterion is checked; a failure never hides later ones.
/// `max_y`/`min_y` are thresholds, so overshooting them is fine.
pub fn check_expectation(state: &CharacterState, expected: Option<&Expectation>) -> CheckOutcome {
    let Some(exp) = expected else {
        return CheckOutcome::Unconstrained;
    };

    let mut issues = Vec::new();

    if let Some(target) = exp.x.filter(|t| !same(state.x, *t)) {
        issues.push(format!(
            "Make the number of moves right {target} (right now it's {}).",
            state.x
        ));
    }
    if let Some(target) = exp.y.filter(|t| !same(state.y, *t)) {
        issues.push(format!("Bring y back to {target} (right now it's {}).", state.y));
    }
    if let Some(target) = exp.jump_count.filter(|t| !same(state.jump_count, *t)) {
        issues.push(format!(
            "Make the number of jumps {target} (right now it's {}).",
            state.jump_count
        ));
    }
    if let Some(target) = exp.move_total.filter(|t| !same(state.move_total, *t)) {
        issues.push(format!(
            "Use \"move right\" {target} times in total (right now it's {}).",
            state.move_total
        ));
    }
    if let Some(target) = exp.max_y.filter(|t| (state.max_y as f64) < *t) {
        issues.push(format!(
            "Jump higher! (highest y is {} → target {target})",
            state.max_y
        ));
    }
    if let Some(target) = exp.min_y.filter(|t| (state.min_y as f64) > *t) {
        issues.push(format!(
            "Bring y down to {target} or lower (lowest is {}).",
            state.min_y
        ));
    }
    if let Some(target) = &exp.message_includes {
        if !state.messages.iter().any(|m| m == target) {
            issues.push(format!("Add a block that says \"{target}\"."));
        }
    }
    if let Some(target) = &exp.last_message {
        let last = state.last_message();
        if last != target {
            let shown = if last.is_empty() { "(nothing)" } else { last };
            issues.push(format!(
                "Finish by saying \"{target}\" (right now it's \"{shown}\")."
            ));
        }
    }

    if issues.is_empty() {
        CheckOutcome::Passed
    } else {
        CheckOutcome::Failed(issues)
    }
}

fn same(actual: i64, target: f64) -> bool {
    actual as f64 == target
}
