//! Tree-walking interpreter for block programs.

use crate::config::InterpreterConfig;
use crate::error::{EvalError, EvalResult};
use crate::trace::Trace;
use blocklab_types::block::{ARRIVED_MESSAGE, GOAL_MESSAGE, HELLO_MESSAGE, JUMP_MESSAGE};
use blocklab_types::{BlockKind, BlockTag, CharacterState, ProgramNode, StateOverrides};

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    /// State after the last block.
    pub state: CharacterState,
    /// Snapshots, when the run recorded them.
    pub trace: Option<Trace>,
}

/// Runs program trees against a fresh character state.
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    config: InterpreterConfig,
}

impl Interpreter {
    pub fn new(config: InterpreterConfig) -> Self {
        Self { config }
    }

    /// Execute `nodes` from a state seeded by `overrides`.
    ///
    /// Any rule violation aborts the whole run; no partial state escapes.
    pub fn run(
        &self,
        nodes: &[ProgramNode],
        overrides: Option<&StateOverrides>,
    ) -> EvalResult<Execution> {
        let span = tracing::debug_span!("interpret", roots = nodes.len());
        let _guard = span.enter();

        if !matches!(nodes.first(), Some(node) if node.kind == BlockKind::EventFlag) {
            tracing::debug!("program does not start with the entry block");
            return Err(EvalError::MissingEntry);
        }

        let mut ctx = ExecContext::new(CharacterState::from_overrides(overrides), &self.config);
        if let Err(err) = ctx.exec_nodes(nodes) {
            tracing::debug!(code = %err.code(), "run aborted");
            return Err(err);
        }
        if !ctx.event_seen {
            return Err(EvalError::MissingEntry);
        }

        Ok(ctx.finish())
    }
}

/// Everything a single run mutates, threaded through the walk.
struct ExecContext<'cfg> {
    state: CharacterState,
    trace: Option<Trace>,
    event_seen: bool,
    config: &'cfg InterpreterConfig,
}

impl<'cfg> ExecContext<'cfg> {
    fn new(state: CharacterState, config: &'cfg InterpreterConfig) -> Self {
        let trace = config.record_trace.then(|| {
            let mut trace = Trace::new();
            trace.record(&state);
            trace
        });
        Self {
            state,
            trace,
            event_seen: false,
            config,
        }
    }

    fn finish(self) -> Execution {
        Execution {
            state: self.state,
            trace: self.trace,
        }
    }

    fn snapshot(&mut self) {
        if let Some(trace) = &mut self.trace {
            trace.record(&self.state);
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Statements
    // ══════════════════════════════════════════════════════════════════════

    fn exec_nodes(&mut self, nodes: &[ProgramNode]) -> EvalResult<()> {
        for node in nodes {
            self.exec_node(node)?;
        }
        Ok(())
    }

    fn exec_node(&mut self, node: &ProgramNode) -> EvalResult<()> {
        let Some(kind) = node.kind.kind() else {
            return Err(EvalError::UnsupportedBlock(node.kind.clone()));
        };
        match kind {
            BlockKind::EventFlag => {
                if self.event_seen {
                    return Err(EvalError::DuplicateEntry);
                }
                self.event_seen = true;
                self.snapshot();
            }
            BlockKind::MotionMove => {
                self.state.x = self.state.x.saturating_add(1);
                self.state.move_total = self.state.move_total.saturating_add(1);
                self.snapshot();
            }
            BlockKind::MotionJump => self.jump(),
            BlockKind::LooksHello => self.say(HELLO_MESSAGE),
            BlockKind::LooksGoal => self.say(GOAL_MESSAGE),
            BlockKind::LooksJump => self.say(JUMP_MESSAGE),
            BlockKind::LooksArrived => self.say(ARRIVED_MESSAGE),
            BlockKind::ControlForLoop => self.exec_repeat(node)?,
            BlockKind::ControlIfGoal => self.exec_if(node)?,
            BlockKind::ControlEnd => {}
            BlockKind::ConditionGoalReached => {
                return Err(EvalError::UnsupportedBlock(node.kind.clone()));
            }
        }
        Ok(())
    }

    /// Up then straight back down: two observable states, no arc.
    fn jump(&mut self) {
        self.state.jump_count = self.state.jump_count.saturating_add(1);
        self.state.y = self.state.y.saturating_add(self.config.jump_height);
        self.state.update_vertical_extremes();
        self.snapshot();
        self.state.y = 0;
        self.state.update_vertical_extremes();
        self.snapshot();
    }

    fn say(&mut self, message: &str) {
        self.state.messages.push(message.to_string());
        self.snapshot();
    }

    // ── Control Flow ─────────────────────────────────────────────────────

    fn exec_repeat(&mut self, node: &ProgramNode) -> EvalResult<()> {
        if node.children.is_empty() {
            return Err(EvalError::EmptyLoopBody);
        }
        for _ in 0..node.loop_count() {
            self.exec_nodes(&node.children)?;
        }
        Ok(())
    }

    fn exec_if(&mut self, node: &ProgramNode) -> EvalResult<()> {
        if !self.eval_condition(node.condition.as_ref())? {
            return Ok(());
        }
        if node.children.is_empty() {
            self.say(ARRIVED_MESSAGE);
            Ok(())
        } else {
            self.exec_nodes(&node.children)
        }
    }

    fn eval_condition(&self, condition: Option<&BlockTag>) -> EvalResult<bool> {
        let Some(tag) = condition else {
            return Err(EvalError::ConditionUnset);
        };
        match tag.kind() {
            Some(BlockKind::ConditionGoalReached) => Ok(self.state.x >= self.config.goal_x),
            _ => Err(EvalError::UnknownCondition(tag.clone())),
        }
    }
}
