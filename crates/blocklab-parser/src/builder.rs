//! Tree builder: flat placed-block sequence to program tree.

use blocklab_types::{BlockRole, BuildError, BuildResult, PlacedBlock, ProgramNode};

/// Builds a program tree from a bracket-matched block sequence.
///
/// Recursive descent over the sequence: every opener starts a new frame
/// that must be ended by a closer before the input runs out. The first
/// structural error aborts the build.
pub struct TreeBuilder<'a> {
    /// The placed-block sequence.
    blocks: &'a [PlacedBlock],
    /// Current index into `blocks`.
    pos: usize,
    /// Number of openers currently awaiting a closer.
    depth: usize,
}

/// Nodes collected by one frame, and the closer that ended it (if any).
struct Frame<'a> {
    nodes: Vec<ProgramNode>,
    closed_by: Option<&'a PlacedBlock>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(blocks: &'a [PlacedBlock]) -> Self {
        Self {
            blocks,
            pos: 0,
            depth: 0,
        }
    }

    /// Build the root-level nodes.
    pub fn build(mut self) -> BuildResult<Vec<ProgramNode>> {
        let frame = self.parse_frame()?;
        if let Some(closer) = frame.closed_by {
            tracing::debug!(block = %closer.id, "closer at top level");
            return Err(BuildError::unmatched_closer(closer.id.clone()));
        }
        Ok(frame.nodes)
    }

    // ── Cursor ────────────────────────────────────────────────────────────────

    fn advance(&mut self) -> Option<&'a PlacedBlock> {
        let block = self.blocks.get(self.pos)?;
        self.pos += 1;
        Some(block)
    }

    // ── Frames ────────────────────────────────────────────────────────────────

    fn parse_frame(&mut self) -> BuildResult<Frame<'a>> {
        let mut nodes = Vec::new();

        while let Some(block) = self.advance() {
            match block.kind.role() {
                BlockRole::ScopeCloser => {
                    return Ok(Frame {
                        nodes,
                        closed_by: Some(block),
                    });
                }
                BlockRole::ScopeOpener => {
                    self.depth += 1;
                    let body = self.parse_frame()?;
                    self.depth -= 1;
                    if body.closed_by.is_none() {
                        tracing::debug!(
                            block = %block.id,
                            kind = %block.kind,
                            depth = self.depth,
                            "scoped block runs off the end of the sequence"
                        );
                        return Err(BuildError::unclosed_scope(
                            block.kind.label(),
                            block.id.clone(),
                        ));
                    }
                    nodes.push(ProgramNode::scoped(block, body.nodes));
                }
                BlockRole::Ordinary | BlockRole::Condition => {
                    nodes.push(ProgramNode::leaf(block.kind.clone()));
                }
            }
        }

        Ok(Frame {
            nodes,
            closed_by: None,
        })
    }
}

/// Build the program tree for `blocks`.
pub fn build_tree(blocks: &[PlacedBlock]) -> BuildResult<Vec<ProgramNode>> {
    TreeBuilder::new(blocks).build()
}
