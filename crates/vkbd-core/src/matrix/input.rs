// Vkbd Matrix Input
// Input collaborators that feed key closures into the matrix

use std::collections::VecDeque;

use super::KeyState;
use crate::layout::KeyPosition;

/// Key closure updates read during one scan cycle
pub type InputFrame = Vec<(KeyPosition, KeyState)>;

/// Source of raw key-closure state consumed by `VirtualMatrix::read_matrix`.
pub trait InputSource {
    /// Produce the updates for the next scan cycle.
    ///
    /// `anything_held` tells the source whether any unmasked key is currently
    /// down, so an interactive source can skip idle cycles.
    fn next_frame(&mut self, anything_held: bool) -> InputFrame;
}

/// Input source that replays a fixed queue of frames.
///
/// Once the queue is drained every further read is an empty frame, so the
/// matrix keeps its current state.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<InputFrame>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a source from a list of frames
    pub fn from_frames<I>(frames: I) -> Self
    where
        I: IntoIterator<Item = InputFrame>,
    {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// Append a frame to the end of the queue
    pub fn push_frame(&mut self, frame: InputFrame) {
        self.frames.push_back(frame);
    }

    /// Append a frame that sets a single key
    pub fn push(&mut self, position: KeyPosition, state: KeyState) {
        self.frames.push_back(vec![(position, state)]);
    }

    /// Number of frames not yet read
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn next_frame(&mut self, _anything_held: bool) -> InputFrame {
        self.frames.pop_front().unwrap_or_default()
    }
}
