use std::collections::VecDeque;

use crate::line_source::NumberedLine;

/// Most recent non-matching lines, oldest first, bounded by `capacity`.
#[derive(Debug)]
pub struct ContextRing {
    capacity: usize,
    lines: VecDeque<NumberedLine>,
}

impl ContextRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            lines: VecDeque::with_capacity(capacity.min(64)),
        }
    }

    /// Remember a line, dropping the oldest once over capacity. A zero
    /// capacity ring keeps nothing.
    pub fn push(&mut self, line: NumberedLine) {
        if self.capacity == 0 {
            return;
        }
        self.lines.push_back(line);
        while self.lines.len() > self.capacity {
            self.lines.pop_front();
        }
    }

    /// Remove and return every held line, oldest first.
    pub fn flush(&mut self) -> Vec<NumberedLine> {
        self.lines.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
