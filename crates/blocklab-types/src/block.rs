//! Block catalog and placed-block records.
//!
//! The block vocabulary is closed: every kind the editor can place is a
//! variant of [`BlockKind`]. The catalog maps each kind to its display
//! metadata and to the structural role the tree builder relies on.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// Lesson constants
// ══════════════════════════════════════════════════════════════════════════════

/// Loop count a repeat block uses when none (or a non-finite one) is set.
pub const DEFAULT_LOOP_COUNT: u32 = 4;
/// Smallest loop count a repeat block will ever run.
pub const MIN_LOOP_COUNT: u32 = 1;
/// Largest loop count a repeat block will ever run.
pub const MAX_LOOP_COUNT: u32 = 10;

/// Message appended by "say Hello!".
pub const HELLO_MESSAGE: &str = "Hello!";
/// Message appended by "say I made it!".
pub const GOAL_MESSAGE: &str = "I made it!";
/// Message appended by "say Jump success!".
pub const JUMP_MESSAGE: &str = "Jump success!";
/// Message appended by "say Goal reached!", and by a satisfied `if` with an empty body.
pub const ARRIVED_MESSAGE: &str = "Goal reached!";

/// Round, default and clamp a raw loop count.
///
/// Applied on every read: the stored value on a block may be anything the
/// editor or a generator put there.
pub fn normalize_loop_count(raw: Option<f64>) -> u32 {
    let parsed = match raw {
        Some(value) if value.is_finite() => value.round(),
        _ => f64::from(DEFAULT_LOOP_COUNT),
    };
    parsed.clamp(f64::from(MIN_LOOP_COUNT), f64::from(MAX_LOOP_COUNT)) as u32
}

/// Display label of a repeat block with the given (normalized) count.
pub fn format_loop_label(count: u32) -> String {
    format!("repeat ({count} times)")
}

// ══════════════════════════════════════════════════════════════════════════════
// Block kinds
// ══════════════════════════════════════════════════════════════════════════════

/// Every block kind the editor knows about.
///
/// The serde representation is the wire tag used by the editor and by the
/// workspace generator (e.g. `"motion_move"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// "when ⚑ clicked", the program entry point.
    EventFlag,
    MotionMove,
    MotionJump,
    LooksHello,
    LooksGoal,
    LooksJump,
    LooksArrived,
    /// Repeat opener.
    ControlForLoop,
    /// Conditional opener.
    ControlIfGoal,
    /// Closer shared by every scoped block.
    ControlEnd,
    /// "reached the goal?": only meaningful as the condition of an `if`.
    ConditionGoalReached,
}

/// Palette grouping of a block kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockCategory {
    Event,
    Motion,
    Looks,
    Control,
    Condition,
}

/// Structural role of a block kind inside a placed sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockRole {
    /// A leaf statement.
    Ordinary,
    /// Opens a scoped body that a [`BlockRole::ScopeCloser`] must close.
    ScopeOpener,
    ScopeCloser,
    /// Referenced by a conditional opener; not a statement of its own.
    Condition,
}

/// Catalog entry for a single kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockInfo {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub label: &'static str,
    pub category: BlockCategory,
    pub color: &'static str,
    pub role: BlockRole,
}

impl BlockKind {
    /// All kinds, in palette order.
    pub const ALL: [BlockKind; 11] = [
        BlockKind::EventFlag,
        BlockKind::MotionMove,
        BlockKind::MotionJump,
        BlockKind::LooksHello,
        BlockKind::LooksGoal,
        BlockKind::LooksJump,
        BlockKind::LooksArrived,
        BlockKind::ControlForLoop,
        BlockKind::ControlIfGoal,
        BlockKind::ControlEnd,
        BlockKind::ConditionGoalReached,
    ];

    /// Kinds offered by the default palette.
    pub const DEFAULT_PALETTE: [BlockKind; 8] = [
        BlockKind::EventFlag,
        BlockKind::MotionMove,
        BlockKind::MotionJump,
        BlockKind::LooksHello,
        BlockKind::LooksGoal,
        BlockKind::LooksJump,
        BlockKind::ControlForLoop,
        BlockKind::ControlIfGoal,
    ];

    /// Wire tag of this kind.
    pub fn tag(self) -> &'static str {
        match self {
            Self::EventFlag => "event_flag",
            Self::MotionMove => "motion_move",
            Self::MotionJump => "motion_jump",
            Self::LooksHello => "looks_hello",
            Self::LooksGoal => "looks_goal",
            Self::LooksJump => "looks_jump",
            Self::LooksArrived => "looks_arrived",
            Self::ControlForLoop => "control_for_loop",
            Self::ControlIfGoal => "control_if_goal",
            Self::ControlEnd => "control_end",
            Self::ConditionGoalReached => "condition_goal_reached",
        }
    }

    /// Look up a kind by wire tag. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::EventFlag => "when ⚑ clicked",
            Self::MotionMove => "move right",
            Self::MotionJump => "jump",
            Self::LooksHello => "say \"Hello!\"",
            Self::LooksGoal => "say \"I made it!\"",
            Self::LooksJump => "say \"Jump success!\"",
            Self::LooksArrived => "say \"Goal reached!\"",
            Self::ControlForLoop => "repeat (choose a count)",
            Self::ControlIfGoal => "if [condition] then",
            Self::ControlEnd => "end",
            Self::ConditionGoalReached => "reached the goal?",
        }
    }

    pub fn category(self) -> BlockCategory {
        match self {
            Self::EventFlag => BlockCategory::Event,
            Self::MotionMove | Self::MotionJump => BlockCategory::Motion,
            Self::LooksHello | Self::LooksGoal | Self::LooksJump | Self::LooksArrived => {
                BlockCategory::Looks
            }
            Self::ControlForLoop | Self::ControlIfGoal | Self::ControlEnd => BlockCategory::Control,
            Self::ConditionGoalReached => BlockCategory::Condition,
        }
    }

    pub fn color(self) -> &'static str {
        match self.category() {
            BlockCategory::Event => "#FFBF00",
            BlockCategory::Motion => "#4C97FF",
            BlockCategory::Looks => "#9966FF",
            BlockCategory::Control => "#FFAB19",
            BlockCategory::Condition => "#FACC15",
        }
    }

    pub fn role(self) -> BlockRole {
        match self {
            Self::ControlForLoop | Self::ControlIfGoal => BlockRole::ScopeOpener,
            Self::ControlEnd => BlockRole::ScopeCloser,
            Self::ConditionGoalReached => BlockRole::Condition,
            _ => BlockRole::Ordinary,
        }
    }

    pub fn is_scope_opener(self) -> bool {
        self.role() == BlockRole::ScopeOpener
    }

    pub fn is_scope_closer(self) -> bool {
        self.role() == BlockRole::ScopeCloser
    }

    pub fn is_condition(self) -> bool {
        self.role() == BlockRole::Condition
    }

    /// Full catalog entry for this kind.
    pub fn info(self) -> BlockInfo {
        BlockInfo {
            kind: self,
            label: self.label(),
            category: self.category(),
            color: self.color(),
            role: self.role(),
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// The whole catalog, in palette order.
pub fn catalog() -> Vec<BlockInfo> {
    BlockKind::ALL.into_iter().map(BlockKind::info).collect()
}

/// Catalog entries of the kinds offered by the default palette.
pub fn palette() -> Vec<BlockInfo> {
    BlockKind::DEFAULT_PALETTE.into_iter().map(BlockKind::info).collect()
}

// ══════════════════════════════════════════════════════════════════════════════
// Wire tags
// ══════════════════════════════════════════════════════════════════════════════

/// A block type as it appears on the wire.
///
/// Tags outside the catalog are kept verbatim: a workspace saved by a newer
/// editor still loads, and the interpreter reports the block as unsupported.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BlockTag {
    Known(BlockKind),
    Unknown(String),
}

impl BlockTag {
    pub fn kind(&self) -> Option<BlockKind> {
        match self {
            Self::Known(kind) => Some(*kind),
            Self::Unknown(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(kind) => kind.tag(),
            Self::Unknown(tag) => tag,
        }
    }

    /// Unknown tags are plain statements as far as nesting goes.
    pub fn role(&self) -> BlockRole {
        self.kind().map_or(BlockRole::Ordinary, BlockKind::role)
    }

    pub fn is_scope_opener(&self) -> bool {
        self.role() == BlockRole::ScopeOpener
    }

    pub fn is_scope_closer(&self) -> bool {
        self.role() == BlockRole::ScopeCloser
    }

    pub fn is_condition(&self) -> bool {
        self.role() == BlockRole::Condition
    }

    /// Display label; an unknown tag is shown as-is.
    pub fn label(&self) -> &str {
        match self {
            Self::Known(kind) => kind.label(),
            Self::Unknown(tag) => tag,
        }
    }
}

impl From<BlockKind> for BlockTag {
    fn from(kind: BlockKind) -> Self {
        Self::Known(kind)
    }
}

impl From<&str> for BlockTag {
    fn from(tag: &str) -> Self {
        BlockKind::from_tag(tag).map_or_else(|| Self::Unknown(tag.to_string()), Self::Known)
    }
}

impl PartialEq<BlockKind> for BlockTag {
    fn eq(&self, other: &BlockKind) -> bool {
        self.kind() == Some(*other)
    }
}

impl PartialEq<BlockTag> for BlockKind {
    fn eq(&self, other: &BlockTag) -> bool {
        other == self
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for BlockTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BlockTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from(tag.as_str()))
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Placed blocks
// ══════════════════════════════════════════════════════════════════════════════

/// Opaque identifier of a placed block.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sequential id source for newly constructed blocks.
///
/// Owned by whoever creates blocks and passed in explicitly; ids are never
/// observed by the tree builder or the interpreter.
#[derive(Debug, Clone, Default)]
pub struct BlockIdGen {
    issued: u64,
}

impl BlockIdGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue numbering after `issued` ids.
    pub fn starting_after(issued: u64) -> Self {
        Self { issued }
    }

    /// Issue the next id (`block-1`, `block-2`, …).
    pub fn next_id(&mut self) -> BlockId {
        self.issued += 1;
        BlockId(format!("block-{}", self.issued))
    }

    /// Construct a bare block of the given kind with a fresh id.
    pub fn block(&mut self, kind: BlockKind) -> PlacedBlock {
        PlacedBlock::new(self.next_id(), kind)
    }
}

/// One block instance in the flat workspace sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedBlock {
    pub id: BlockId,
    #[serde(rename = "type")]
    pub kind: BlockTag,
    /// Condition of a conditional opener; `None` means none chosen yet.
    #[serde(rename = "conditionId", default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<BlockTag>,
    /// Raw loop count of a repeat opener; read through [`PlacedBlock::loop_count`].
    #[serde(rename = "loopCount", default, skip_serializing_if = "Option::is_none")]
    pub loop_count: Option<f64>,
}

impl PlacedBlock {
    pub fn new(id: BlockId, kind: impl Into<BlockTag>) -> Self {
        Self {
            id,
            kind: kind.into(),
            condition: None,
            loop_count: None,
        }
    }

    pub fn with_condition(mut self, condition: impl Into<BlockTag>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn with_loop_count(mut self, count: f64) -> Self {
        self.loop_count = Some(count);
        self
    }

    /// Normalized loop count.
    pub fn loop_count(&self) -> u32 {
        normalize_loop_count(self.loop_count)
    }

    /// Label shown for this block in the workspace.
    pub fn label(&self) -> String {
        if self.kind == BlockKind::ControlForLoop {
            format_loop_label(self.loop_count())
        } else {
            self.kind.label().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_round_trip_for_every_kind() {
        for kind in BlockKind::ALL {
            assert_eq!(BlockKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(BlockKind::from_tag("motion_move_small"), None);
    }

    #[test]
    fn test_serde_tag_matches_catalog_tag() {
        for kind in BlockKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.tag()));
        }
    }

    #[test]
    fn test_roles() {
        assert!(BlockKind::ControlForLoop.is_scope_opener());
        assert!(BlockKind::ControlIfGoal.is_scope_opener());
        assert!(BlockKind::ControlEnd.is_scope_closer());
        assert!(BlockKind::ConditionGoalReached.is_condition());
        assert_eq!(BlockKind::MotionJump.role(), BlockRole::Ordinary);
    }

    #[test]
    fn test_normalize_loop_count() {
        assert_eq!(normalize_loop_count(None), DEFAULT_LOOP_COUNT);
        assert_eq!(normalize_loop_count(Some(0.0)), 1);
        assert_eq!(normalize_loop_count(Some(15.0)), 10);
        assert_eq!(normalize_loop_count(Some(2.6)), 3);
        assert_eq!(normalize_loop_count(Some(-7.0)), 1);
        assert_eq!(normalize_loop_count(Some(f64::NAN)), DEFAULT_LOOP_COUNT);
        assert_eq!(normalize_loop_count(Some(f64::INFINITY)), DEFAULT_LOOP_COUNT);
    }

    #[test]
    fn test_loop_label_uses_normalized_count() {
        let block = PlacedBlock::new(BlockId::new("b"), BlockKind::ControlForLoop).with_loop_count(42.0);
        assert_eq!(block.label(), "repeat (10 times)");
        let plain = PlacedBlock::new(BlockId::new("c"), BlockKind::MotionMove);
        assert_eq!(plain.label(), "move right");
    }

    #[test]
    fn test_id_gen_is_sequential() {
        let mut ids = BlockIdGen::new();
        assert_eq!(ids.next_id().as_str(), "block-1");
        assert_eq!(ids.next_id().as_str(), "block-2");
        let mut resumed = BlockIdGen::starting_after(7);
        assert_eq!(resumed.block(BlockKind::EventFlag).id.as_str(), "block-8");
    }

    #[test]
    fn test_palette_is_a_subset_of_the_catalog() {
        let palette = palette();
        assert_eq!(palette.len(), BlockKind::DEFAULT_PALETTE.len());
        assert!(palette.iter().all(|info| catalog().contains(info)));
        assert!(!palette.iter().any(|info| info.kind == BlockKind::ControlEnd));
    }

    #[test]
    fn test_unknown_tag_survives_the_wire() {
        let block: PlacedBlock = serde_json::from_str(
            r#"{ "id": "b1", "type": "motion_turn", "conditionId": "condition_touching_wall" }"#,
        )
        .unwrap();
        assert_eq!(block.kind, BlockTag::Unknown("motion_turn".into()));
        assert_eq!(block.kind.role(), BlockRole::Ordinary);
        assert_eq!(block.label(), "motion_turn");
        assert_eq!(
            block.condition,
            Some(BlockTag::Unknown("condition_touching_wall".into()))
        );
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["type"], "motion_turn");
    }

    #[test]
    fn test_known_tag_compares_with_kind() {
        let tag = BlockTag::from("control_end");
        assert_eq!(tag, BlockKind::ControlEnd);
        assert!(tag.is_scope_closer());
        assert_ne!(BlockTag::from("control_else"), BlockKind::ControlEnd);
    }

    #[test]
    fn test_placed_block_wire_shape() {
        let block = PlacedBlock::new(BlockId::new("block-3"), BlockKind::ControlIfGoal)
            .with_condition(BlockKind::ConditionGoalReached);
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["type"], "control_if_goal");
        assert_eq!(json["conditionId"], "condition_goal_reached");
        assert!(json.get("loopCount").is_none());
    }
}
