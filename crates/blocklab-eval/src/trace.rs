//! Execution trace and replay cursor.

use blocklab_types::CharacterState;
use serde::Serialize;

/// Ordered state snapshots taken during a run.
///
/// Snapshots are deep clones: later mutation of the live state never
/// changes a recorded frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Trace {
    frames: Vec<CharacterState>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a snapshot of `state`.
    pub fn record(&mut self, state: &CharacterState) {
        tracing::trace!(frame = self.frames.len(), x = state.x, y = state.y, "snapshot");
        self.frames.push(state.clone());
    }

    pub fn frames(&self) -> &[CharacterState] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<CharacterState> {
        self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn last(&self) -> Option<&CharacterState> {
        self.frames.last()
    }

    /// A cursor for stepping through the frames, as an animation would.
    pub fn replay(&self) -> Replay<'_> {
        Replay::new(&self.frames)
    }
}

/// Playback position over a recorded trace.
#[derive(Debug, Clone)]
pub struct Replay<'a> {
    frames: &'a [CharacterState],
    index: usize,
}

impl<'a> Replay<'a> {
    pub fn new(frames: &'a [CharacterState]) -> Self {
        Self { frames, index: 0 }
    }

    /// Frame currently on screen, `None` for an empty trace.
    pub fn current(&self) -> Option<&'a CharacterState> {
        self.frames.get(self.index)
    }

    pub fn position(&self) -> usize {
        self.index
    }

    /// Step to the next frame. Returns `false` once the last frame is showing.
    pub fn step(&mut self) -> bool {
        if self.index + 1 < self.frames.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    pub fn is_finished(&self) -> bool {
        self.index + 1 >= self.frames.len()
    }

    pub fn rewind(&mut self) {
        self.index = 0;
    }
}
