use std::collections::VecDeque;

use crate::snake::Direction;

/// Directional commands in arrival order. Validity against the current
/// heading is decided when a command is drained, not when it is pushed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputQueue {
    pending: VecDeque<Direction>,
}

impl InputQueue {
    pub fn new() -> Self {
        InputQueue::default()
    }

    pub fn push(&mut self, direction: Direction) {
        self.pending.push_back(direction);
    }

    pub fn drain_one(&mut self) -> Option<Direction> {
        self.pending.pop_front()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
