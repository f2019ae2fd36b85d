//! Integration tests for the blocklab interpreter.
//!
//! Tests key interpreter features:
//! - entry-block rules
//! - motion, jump and message semantics
//! - repeat normalization and empty bodies
//! - conditional evaluation and its default message
//! - trace recording
//! - idempotence over arbitrary programs

use blocklab_eval::{run_program, EvalError, Execution, Interpreter, InterpreterConfig};
use blocklab_types::block::{ARRIVED_MESSAGE, GOAL_MESSAGE, HELLO_MESSAGE, JUMP_MESSAGE};
use blocklab_types::{
    BlockId, BlockIdGen, BlockKind, BlockTag, CharacterState, ErrorCode, PlacedBlock, ProgramNode,
    StateOverrides,
};
use proptest::prelude::*;

use BlockKind::*;

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

/// Small builder for placed-block sequences.
struct Seq {
    ids: BlockIdGen,
    blocks: Vec<PlacedBlock>,
}

impl Seq {
    fn new() -> Self {
        Self {
            ids: BlockIdGen::new(),
            blocks: Vec::new(),
        }
    }

    fn push(mut self, kind: BlockKind) -> Self {
        let block = self.ids.block(kind);
        self.blocks.push(block);
        self
    }

    fn repeat(mut self, count: f64) -> Self {
        let block = self.ids.block(ControlForLoop).with_loop_count(count);
        self.blocks.push(block);
        self
    }

    fn repeat_default(self) -> Self {
        self.push(ControlForLoop)
    }

    fn if_goal(mut self) -> Self {
        let block = self.ids.block(ControlIfGoal).with_condition(ConditionGoalReached);
        self.blocks.push(block);
        self
    }

    fn if_with(mut self, condition: Option<BlockKind>) -> Self {
        let mut block = self.ids.block(ControlIfGoal);
        block.condition = condition.map(BlockTag::from);
        self.blocks.push(block);
        self
    }

    fn end(self) -> Self {
        self.push(ControlEnd)
    }

    /// A block whose wire tag this engine does not know.
    fn unknown(mut self, tag: &str) -> Self {
        let id = self.ids.next_id();
        self.blocks.push(PlacedBlock::new(id, BlockTag::from(tag)));
        self
    }

    fn if_tagged(mut self, condition: &str) -> Self {
        let block = self.ids.block(ControlIfGoal).with_condition(BlockTag::from(condition));
        self.blocks.push(block);
        self
    }

    fn moves(mut self, n: usize) -> Self {
        for _ in 0..n {
            self = self.push(MotionMove);
        }
        self
    }

    fn run(&self) -> Result<Execution, EvalError> {
        run_program(&self.blocks, None, &InterpreterConfig::default())
    }

    fn run_traced(&self) -> Result<Execution, EvalError> {
        run_program(&self.blocks, None, &InterpreterConfig::default().with_trace(true))
    }

    fn run_with(&self, overrides: StateOverrides) -> Result<Execution, EvalError> {
        run_program(&self.blocks, Some(&overrides), &InterpreterConfig::default())
    }
}

fn entry() -> Seq {
    Seq::new().push(EventFlag)
}

fn state(seq: &Seq) -> CharacterState {
    seq.run().expect("program should run").state
}

// ══════════════════════════════════════════════════════════════════════════════
// Scenarios
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn walk_three_then_announce() {
    let s = state(&entry().moves(3).push(LooksArrived));
    assert_eq!(s.x, 3);
    assert_eq!(s.move_total, 3);
    assert_eq!(s.last_message(), ARRIVED_MESSAGE);
}

#[test]
fn entry_only_program_is_valid() {
    let s = state(&entry());
    assert_eq!(s, CharacterState::default());
}

#[test]
fn loop_then_empty_if_says_arrived() {
    let s = state(&entry().repeat(4.0).push(MotionMove).end().if_goal().end());
    assert_eq!(s.x, 4);
    assert_eq!(s.messages, vec![ARRIVED_MESSAGE.to_string()]);
}

#[test]
fn empty_repeat_body_is_an_error() {
    let err = entry().repeat(3.0).end().run().unwrap_err();
    assert_eq!(err, EvalError::EmptyLoopBody);
    assert_eq!(err.code(), ErrorCode::EMPTY_LOOP_BODY);
    assert!(err.to_string().contains("repeat block"));
}

#[test]
fn unset_condition_is_an_error_before_the_body_runs() {
    let err = entry().if_with(None).push(MotionMove).end().run().unwrap_err();
    assert_eq!(err, EvalError::ConditionUnset);
}

// ══════════════════════════════════════════════════════════════════════════════
// Entry block
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn empty_workspace_asks_for_blocks() {
    let err = Seq::new().run().unwrap_err();
    assert_eq!(err, EvalError::EmptyProgram);
    assert_eq!(err.code(), ErrorCode::EMPTY_PROGRAM);
    assert_eq!(err.to_string(), "Place some blocks first!");
}

#[test]
fn program_must_start_with_entry() {
    let err = Seq::new().push(MotionMove).push(EventFlag).run().unwrap_err();
    assert_eq!(err, EvalError::MissingEntry);
    assert_eq!(err.code(), ErrorCode::MISSING_ENTRY);
}

#[test]
fn second_entry_at_top_level_is_an_error() {
    let err = entry().push(MotionMove).push(EventFlag).run().unwrap_err();
    assert_eq!(err, EvalError::DuplicateEntry);
}

#[test]
fn second_entry_inside_a_loop_is_an_error() {
    let err = entry().repeat(2.0).push(EventFlag).end().run().unwrap_err();
    assert_eq!(err, EvalError::DuplicateEntry);
}

#[test]
fn interpreter_rejects_empty_tree_directly() {
    let interp = Interpreter::default();
    assert_eq!(interp.run(&[], None).unwrap_err(), EvalError::MissingEntry);
}

// ══════════════════════════════════════════════════════════════════════════════
// Primitive blocks
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn messages_are_appended_in_order() {
    let s = state(
        &entry()
            .push(LooksHello)
            .push(LooksGoal)
            .push(LooksJump)
            .push(LooksArrived),
    );
    assert_eq!(
        s.messages,
        vec![HELLO_MESSAGE, GOAL_MESSAGE, JUMP_MESSAGE, ARRIVED_MESSAGE]
    );
}

#[test]
fn jump_goes_up_and_lands() {
    let s = state(&entry().push(MotionJump).push(MotionJump));
    assert_eq!(s.jump_count, 2);
    assert_eq!(s.y, 0);
    assert_eq!(s.max_y, 50);
    assert_eq!(s.min_y, 0);
}

#[test]
fn jump_lands_on_zero_from_any_height() {
    let s = entry()
        .push(MotionJump)
        .run_with(StateOverrides {
            y: Some(20),
            ..Default::default()
        })
        .unwrap()
        .state;
    assert_eq!(s.y, 0);
    assert_eq!(s.max_y, 70);
    assert_eq!(s.min_y, 0);
}

#[test]
fn jump_height_comes_from_config() {
    let seq = entry().push(MotionJump);
    let config = InterpreterConfig::default().with_jump_height(80);
    let s = run_program(&seq.blocks, None, &config).unwrap().state;
    assert_eq!(s.max_y, 80);
}

#[test]
fn overrides_seed_the_state() {
    let s = entry()
        .moves(1)
        .run_with(StateOverrides {
            x: Some(10),
            messages: Some(vec!["earlier".into()]),
            ..Default::default()
        })
        .unwrap()
        .state;
    assert_eq!(s.x, 11);
    assert_eq!(s.move_total, 1);
    assert_eq!(s.messages, vec!["earlier".to_string()]);
}

#[test]
fn condition_block_as_statement_is_unsupported() {
    let err = entry().push(ConditionGoalReached).run().unwrap_err();
    assert_eq!(err, EvalError::UnsupportedBlock(ConditionGoalReached.into()));
    assert_eq!(err.code(), ErrorCode::UNSUPPORTED_BLOCK);
}

#[test]
fn unknown_block_type_is_unsupported() {
    let err = entry().moves(1).unknown("motion_turn").run().unwrap_err();
    assert_eq!(err, EvalError::UnsupportedBlock(BlockTag::Unknown("motion_turn".into())));
    assert_eq!(err.code(), ErrorCode::UNSUPPORTED_BLOCK);
}

#[test]
fn unknown_block_type_read_from_json_is_unsupported() {
    let blocks: Vec<PlacedBlock> = serde_json::from_str(
        r#"[{ "id": "a", "type": "event_flag" }, { "id": "b", "type": "motion_turn" }]"#,
    )
    .unwrap();
    let err = run_program(&blocks, None, &InterpreterConfig::default()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::UNSUPPORTED_BLOCK);
    assert_eq!(blocks[1].id, BlockId::new("b"));
}

#[test]
fn moves_saturate_instead_of_overflowing() {
    let s = entry()
        .moves(2)
        .run_with(StateOverrides {
            x: Some(i64::MAX),
            move_total: Some(i64::MAX - 1),
            ..Default::default()
        })
        .unwrap()
        .state;
    assert_eq!(s.x, i64::MAX);
    assert_eq!(s.move_total, i64::MAX);
}

#[test]
fn jumps_saturate_instead_of_overflowing() {
    let s = entry()
        .push(MotionJump)
        .run_with(StateOverrides {
            y: Some(i64::MAX - 10),
            jump_count: Some(i64::MAX),
            ..Default::default()
        })
        .unwrap()
        .state;
    assert_eq!(s.max_y, i64::MAX);
    assert_eq!(s.jump_count, i64::MAX);
    assert_eq!(s.y, 0);
}

// ══════════════════════════════════════════════════════════════════════════════
// Repeat
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn repeat_count_is_normalized() {
    for (raw, expected) in [(0.0, 1), (15.0, 10), (2.6, 3), (2.4, 2), (-3.0, 1)] {
        let s = state(&entry().repeat(raw).push(MotionMove).end());
        assert_eq!(s.x, expected, "loopCount {raw}");
    }
}

#[test]
fn repeat_without_count_runs_four_times() {
    let s = state(&entry().repeat_default().push(MotionMove).end());
    assert_eq!(s.x, 4);
}

#[test]
fn nested_repeats_multiply() {
    let s = state(
        &entry()
            .repeat(3.0)
            .repeat(2.0)
            .push(MotionMove)
            .end()
            .push(MotionJump)
            .end(),
    );
    assert_eq!(s.x, 6);
    assert_eq!(s.jump_count, 3);
}

#[test]
fn error_inside_a_repeat_aborts_the_run() {
    let err = entry()
        .repeat(3.0)
        .moves(1)
        .if_with(Some(MotionMove))
        .end()
        .end()
        .run()
        .unwrap_err();
    assert_eq!(err, EvalError::UnknownCondition(MotionMove.into()));
}

// ══════════════════════════════════════════════════════════════════════════════
// Conditional
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn false_condition_skips_the_body() {
    let s = state(&entry().moves(3).if_goal().push(LooksHello).end());
    assert!(s.messages.is_empty());
    assert_eq!(s.x, 3);
}

#[test]
fn true_condition_runs_the_body_instead_of_the_default() {
    let s = state(&entry().moves(4).if_goal().push(LooksHello).end());
    assert_eq!(s.messages, vec![HELLO_MESSAGE.to_string()]);
}

#[test]
fn false_condition_with_empty_body_says_nothing() {
    let s = state(&entry().moves(2).if_goal().end());
    assert!(s.messages.is_empty());
}

#[test]
fn unknown_condition_is_an_error_even_when_false() {
    let err = entry().if_with(Some(LooksHello)).end().run().unwrap_err();
    assert_eq!(err, EvalError::UnknownCondition(LooksHello.into()));
    assert_eq!(err.code(), ErrorCode::UNKNOWN_CONDITION);
}

#[test]
fn unknown_condition_tag_is_an_error() {
    let err = entry().if_tagged("condition_touching_wall").push(MotionMove).end().run().unwrap_err();
    assert_eq!(
        err,
        EvalError::UnknownCondition(BlockTag::Unknown("condition_touching_wall".into()))
    );
    assert_eq!(err.code(), ErrorCode::UNKNOWN_CONDITION);
}

#[test]
fn unknown_condition_read_from_json_is_an_error() {
    let blocks: Vec<PlacedBlock> = serde_json::from_str(
        r#"[
            { "id": "a", "type": "event_flag" },
            { "id": "b", "type": "control_if_goal", "conditionId": "condition_touching_wall" },
            { "id": "c", "type": "control_end" }
        ]"#,
    )
    .unwrap();
    let err = run_program(&blocks, None, &InterpreterConfig::default()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::UNKNOWN_CONDITION);
}

#[test]
fn goal_threshold_comes_from_config() {
    let seq = entry().moves(2).if_goal().end();
    let config = InterpreterConfig::default().with_goal_x(2);
    let s = run_program(&seq.blocks, None, &config).unwrap().state;
    assert_eq!(s.last_message(), ARRIVED_MESSAGE);
}

// ══════════════════════════════════════════════════════════════════════════════
// Structure errors surface through run_program
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn unclosed_scope_is_reported_before_running() {
    let err = entry().repeat(2.0).push(MotionMove).run().unwrap_err();
    assert_eq!(err.code(), ErrorCode::UNCLOSED_SCOPE);
    assert!(matches!(err, EvalError::Structure(_)));
}

// ══════════════════════════════════════════════════════════════════════════════
// Trace
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn no_trace_unless_requested() {
    assert!(entry().moves(2).run().unwrap().trace.is_none());
}

#[test]
fn trace_has_initial_frame_and_one_per_step() {
    let trace = entry().moves(2).push(LooksHello).run_traced().unwrap().trace.unwrap();
    let xs: Vec<i64> = trace.frames().iter().map(|f| f.x).collect();
    assert_eq!(xs, vec![0, 0, 1, 2, 2]);
    assert_eq!(trace.last().unwrap().messages, vec![HELLO_MESSAGE.to_string()]);
    assert!(trace.frames()[3].messages.is_empty());
}

#[test]
fn jump_appends_exactly_two_frames() {
    let before = entry().run_traced().unwrap().trace.unwrap();
    let after = entry().push(MotionJump).run_traced().unwrap().trace.unwrap();
    assert_eq!(after.len(), before.len() + 2);

    let up = &after.frames()[before.len()];
    let down = &after.frames()[before.len() + 1];
    assert_eq!(up.y, 50);
    assert_eq!(down.y, 0);
    assert!(up.max_y >= 50);
    assert!(down.max_y >= 50);
}

#[test]
fn empty_if_default_message_is_traced() {
    let trace = entry().moves(4).if_goal().end().run_traced().unwrap().trace.unwrap();
    assert_eq!(trace.last().unwrap().last_message(), ARRIVED_MESSAGE);
    assert_eq!(trace.len(), 1 + 1 + 4 + 1);
}

#[test]
fn final_trace_frame_matches_final_state() {
    let run = entry()
        .repeat(3.0)
        .push(MotionMove)
        .push(MotionJump)
        .end()
        .run_traced()
        .unwrap();
    assert_eq!(run.trace.unwrap().last(), Some(&run.state));
}

// ══════════════════════════════════════════════════════════════════════════════
// Properties
// ══════════════════════════════════════════════════════════════════════════════

fn node() -> impl Strategy<Value = ProgramNode> {
    let leaf = prop::sample::select(vec![
        MotionMove,
        MotionJump,
        LooksHello,
        LooksGoal,
        LooksJump,
        LooksArrived,
        EventFlag,
    ])
    .prop_map(|kind| ProgramNode::leaf(kind));
    leaf.prop_recursive(3, 24, 4, |inner| {
        (
            prop::option::of(-2.0f64..14.0),
            prop::bool::ANY,
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(count, is_loop, children)| ProgramNode {
                kind: BlockTag::from(if is_loop { ControlForLoop } else { ControlIfGoal }),
                children,
                condition: (!is_loop).then_some(ConditionGoalReached.into()),
                loop_count: if is_loop { count } else { None },
            })
    })
}

proptest! {
    #[test]
    fn programs_not_starting_with_entry_always_fail(
        nodes in prop::collection::vec(node(), 1..6)
    ) {
        prop_assume!(nodes[0].kind != EventFlag);
        let err = Interpreter::default().run(&nodes, None).unwrap_err();
        prop_assert_eq!(err, EvalError::MissingEntry);
    }

    #[test]
    fn runs_are_idempotent(rest in prop::collection::vec(node(), 0..6)) {
        let mut nodes = vec![ProgramNode::leaf(EventFlag)];
        nodes.extend(rest);
        let interp = Interpreter::new(InterpreterConfig::default().with_trace(true));
        let first = interp.run(&nodes, None);
        let second = interp.run(&nodes, None);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn move_total_tracks_x_from_origin(rest in prop::collection::vec(node(), 0..6)) {
        let mut nodes = vec![ProgramNode::leaf(EventFlag)];
        nodes.extend(rest);
        if let Ok(run) = Interpreter::default().run(&nodes, None) {
            prop_assert_eq!(run.state.x, run.state.move_total);
            prop_assert_eq!(run.state.y, 0);
            prop_assert!(run.state.max_y >= 0);
        }
    }
}
