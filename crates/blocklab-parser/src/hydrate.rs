//! Hydration of generated workspaces.
//!
//! The workspace generator returns loosely shaped JSON. Every candidate is
//! validated against the closed set of block tags; anything else is dropped.
//! The result is always bracket-matched and always starts with the entry
//! block, so it can go straight to the tree builder.

use blocklab_types::{BlockIdGen, BlockKind, BlockTag, PlacedBlock};
use serde_json::Value;

/// Hydrate a generator response.
///
/// Accepts either `{ "blocks": [...] }` or the bare array. The returned
/// sequence is balanced and begins with the entry block.
pub fn hydrate(payload: &Value, ids: &mut BlockIdGen) -> Vec<PlacedBlock> {
    let raw = match payload {
        Value::Object(obj) => obj.get("blocks").unwrap_or(&Value::Null),
        other => other,
    };
    ensure_entry(hydrate_blocks(raw, ids), ids)
}

/// Filter and balance a raw array of candidate blocks.
///
/// Stray closers are dropped; openers still open at the end get synthetic
/// closers. A non-array payload hydrates to nothing.
pub fn hydrate_blocks(raw: &Value, ids: &mut BlockIdGen) -> Vec<PlacedBlock> {
    let Some(entries) = raw.as_array() else {
        tracing::debug!("generated workspace is not an array");
        return Vec::new();
    };

    let mut result = Vec::with_capacity(entries.len());
    let mut open_scopes = 0usize;

    for (index, entry) in entries.iter().enumerate() {
        let Some(obj) = entry.as_object() else {
            tracing::debug!(index, "dropping non-object block candidate");
            continue;
        };
        let Some(tag) = obj.get("type").and_then(Value::as_str) else {
            tracing::debug!(index, "dropping block candidate without a type");
            continue;
        };
        let Some(kind) = BlockKind::from_tag(tag) else {
            tracing::debug!(index, tag, "dropping unknown block type");
            continue;
        };

        if kind.is_scope_closer() {
            if open_scopes > 0 {
                open_scopes -= 1;
                result.push(ids.block(kind));
            } else {
                tracing::debug!(index, "dropping closer with nothing open");
            }
            continue;
        }

        let mut block = ids.block(kind);
        match kind {
            BlockKind::ControlForLoop => {
                block.loop_count = obj.get("loopCount").and_then(Value::as_f64);
            }
            BlockKind::ControlIfGoal => {
                block.condition = obj
                    .get("conditionId")
                    .and_then(Value::as_str)
                    .and_then(BlockKind::from_tag)
                    .filter(|condition| condition.is_condition())
                    .map(BlockTag::from);
            }
            _ => {}
        }

        if kind.is_scope_opener() {
            open_scopes += 1;
        }
        result.push(block);
    }

    for _ in 0..open_scopes {
        result.push(ids.block(BlockKind::ControlEnd));
    }

    result
}

/// Make sure the sequence begins with the entry block.
pub fn ensure_entry(mut blocks: Vec<PlacedBlock>, ids: &mut BlockIdGen) -> Vec<PlacedBlock> {
    let starts_with_entry = blocks
        .first()
        .is_some_and(|block| block.kind == BlockKind::EventFlag);
    if !starts_with_entry {
        blocks.insert(0, ids.block(BlockKind::EventFlag));
    }
    blocks
}
