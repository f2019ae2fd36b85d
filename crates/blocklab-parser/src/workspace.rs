//! Editable placed-block sequence.
//!
//! The editor never touches the sequence directly: every edit goes through
//! [`Workspace`], which keeps scoped blocks paired with their closers and
//! owns the id generator for new blocks.

use crate::builder::build_tree;
use blocklab_types::block::{normalize_loop_count, DEFAULT_LOOP_COUNT};
use blocklab_types::{
    BlockId, BlockIdGen, BlockKind, BlockTag, BuildResult, PlacedBlock, ProgramNode,
};
use std::collections::HashMap;

/// Index of the closer matching the opener at `start`, if any.
pub fn find_matching_end(blocks: &[PlacedBlock], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, block) in blocks.iter().enumerate().skip(start + 1) {
        if block.kind.is_scope_opener() {
            depth += 1;
        } else if block.kind.is_scope_closer() {
            if depth == 0 {
                return Some(offset);
            }
            depth -= 1;
        }
    }
    None
}

/// Nesting depth of every block and every insertion slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndentGuides {
    /// Depth at which each block is drawn.
    pub block_depths: HashMap<BlockId, usize>,
    /// Depth of the slot before index `i`; has `len + 1` entries.
    pub slot_depths: Vec<usize>,
}

impl IndentGuides {
    pub fn depth_of(&self, id: &BlockId) -> Option<usize> {
        self.block_depths.get(id).copied()
    }
}

/// Compute indentation for a sequence.
///
/// Closers dedent before they are drawn; depth never goes negative, so a
/// malformed sequence still gets a layout.
pub fn indentation_guides(blocks: &[PlacedBlock]) -> IndentGuides {
    let mut block_depths = HashMap::with_capacity(blocks.len());
    let mut slot_depths = Vec::with_capacity(blocks.len() + 1);
    let mut depth = 0usize;
    slot_depths.push(depth);

    for block in blocks {
        if block.kind.is_scope_closer() {
            depth = depth.saturating_sub(1);
            block_depths.insert(block.id.clone(), depth);
        } else {
            block_depths.insert(block.id.clone(), depth);
            if block.kind.is_scope_opener() {
                depth += 1;
            }
        }
        slot_depths.push(depth);
    }

    IndentGuides {
        block_depths,
        slot_depths,
    }
}

/// The learner's block sequence and the id source for its new blocks.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    blocks: Vec<PlacedBlock>,
    ids: BlockIdGen,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing sequence, e.g. one produced by hydration.
    pub fn from_blocks(blocks: Vec<PlacedBlock>, ids: BlockIdGen) -> Self {
        Self { blocks, ids }
    }

    pub fn blocks(&self) -> &[PlacedBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn position(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|block| &block.id == id)
    }

    pub fn get(&self, id: &BlockId) -> Option<&PlacedBlock> {
        self.blocks.iter().find(|block| &block.id == id)
    }

    pub fn indentation(&self) -> IndentGuides {
        indentation_guides(&self.blocks)
    }

    pub fn build_tree(&self) -> BuildResult<Vec<ProgramNode>> {
        build_tree(&self.blocks)
    }

    // ── Edits ─────────────────────────────────────────────────────────────────

    /// Drop a palette block into slot `index` (clamped to the sequence).
    ///
    /// Openers get their closer right behind them; repeat blocks start at
    /// the default count. Returns the id of the inserted block.
    pub fn insert(&mut self, index: usize, kind: BlockKind) -> BlockId {
        let index = index.min(self.blocks.len());
        let mut block = self.ids.block(kind);
        if kind == BlockKind::ControlForLoop {
            block.loop_count = Some(f64::from(DEFAULT_LOOP_COUNT));
        }
        let id = block.id.clone();

        if kind.is_scope_opener() {
            let closer = self.ids.block(BlockKind::ControlEnd);
            self.blocks.splice(index..index, [block, closer]);
        } else {
            self.blocks.insert(index, block);
        }
        id
    }

    /// Move a block to slot `target`, carrying an opener's whole scope.
    ///
    /// Closers never move on their own, and a scope cannot be dropped
    /// inside itself. Returns whether the sequence changed.
    pub fn move_block(&mut self, id: &BlockId, target: usize) -> bool {
        let Some(from) = self.position(id) else {
            return false;
        };
        let moving = &self.blocks[from].kind;
        if moving.is_scope_closer() {
            return false;
        }

        let end = if moving.is_scope_opener() {
            match find_matching_end(&self.blocks, from) {
                Some(end) => end,
                None => return false,
            }
        } else {
            from
        };
        if target > from && target <= end {
            return false;
        }

        let span = end - from + 1;
        let target = target.min(self.blocks.len());
        let insert_at = if from < target { target - span } else { target };
        if insert_at == from {
            return false;
        }

        let moved: Vec<PlacedBlock> = self.blocks.drain(from..=end).collect();
        let insert_at = insert_at.min(self.blocks.len());
        self.blocks.splice(insert_at..insert_at, moved);
        true
    }

    /// Remove a block. Openers take their body and closer with them.
    ///
    /// Closers cannot be removed on their own. Returns whether anything
    /// was removed.
    pub fn remove(&mut self, id: &BlockId) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let removing = &self.blocks[index].kind;
        if removing.is_scope_closer() {
            return false;
        }
        let end = if removing.is_scope_opener() {
            find_matching_end(&self.blocks, index)
        } else {
            None
        };
        match end {
            Some(end) => {
                self.blocks.drain(index..=end);
            }
            None => {
                self.blocks.remove(index);
            }
        }
        true
    }

    /// Set a repeat block's count from the raw text of its count field.
    ///
    /// Blank input is ignored; unparseable input falls back to the default
    /// count. Returns whether the stored count changed.
    pub fn set_loop_count(&mut self, id: &BlockId, raw: &str) -> bool {
        let raw = raw.trim();
        if raw.is_empty() {
            return false;
        }
        let normalized = f64::from(normalize_loop_count(raw.parse::<f64>().ok()));
        match self.block_mut(id, BlockKind::ControlForLoop) {
            Some(block) if block.loop_count != Some(normalized) => {
                block.loop_count = Some(normalized);
                true
            }
            _ => false,
        }
    }

    /// Choose the condition of an `if` block. Only condition kinds are accepted.
    pub fn set_condition(&mut self, id: &BlockId, condition: BlockKind) -> bool {
        if !condition.is_condition() {
            return false;
        }
        let condition = BlockTag::from(condition);
        match self.block_mut(id, BlockKind::ControlIfGoal) {
            Some(block) if block.condition.as_ref() != Some(&condition) => {
                block.condition = Some(condition);
                true
            }
            _ => false,
        }
    }

    fn block_mut(&mut self, id: &BlockId, kind: BlockKind) -> Option<&mut PlacedBlock> {
        self.blocks
            .iter_mut()
            .find(|block| &block.id == id)
            .filter(|block| block.kind == kind)
    }
}
