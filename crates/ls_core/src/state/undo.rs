use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::ScoringState;

/// Bounded stack of deep-copied scoring states.
///
/// A copy is pushed immediately before every accepted delivery command, so
/// popping one exactly reverses the most recent command. Rejected commands
/// never push. The state graph is a small struct of vecs, so plain `Clone`
/// per delivery is cheap enough.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UndoLog {
    stack: VecDeque<ScoringState>,
    depth: usize,
}

impl UndoLog {
    pub fn new(depth: usize) -> Self {
        Self { stack: VecDeque::with_capacity(depth), depth: depth.max(1) }
    }

    /// Push a snapshot, dropping the oldest entry once the ring is full.
    pub fn push(&mut self, state: &ScoringState) {
        if self.stack.len() == self.depth {
            self.stack.pop_front();
        }
        self.stack.push_back(state.clone());
    }

    /// Pop the most recent snapshot, or `None` when there is no history.
    pub fn pop(&mut self) -> Option<ScoringState> {
        self.stack.pop_back()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_runs(runs: u32) -> ScoringState {
        let mut state = ScoringState::new(20);
        state.scores[0].runs = runs;
        state
    }

    #[test]
    fn test_lifo_order() {
        let mut log = UndoLog::new(10);
        log.push(&state_with_runs(1));
        log.push(&state_with_runs(2));

        assert_eq!(log.pop().unwrap().scores[0].runs, 2);
        assert_eq!(log.pop().unwrap().scores[0].runs, 1);
        assert!(log.pop().is_none());
    }

    #[test]
    fn test_ring_drops_oldest_beyond_depth() {
        let mut log = UndoLog::new(10);
        for i in 0..15 {
            log.push(&state_with_runs(i));
        }
        assert_eq!(log.len(), 10);

        // Entries 0..=4 were evicted; the deepest remaining is 5.
        let mut last = 0;
        while let Some(state) = log.pop() {
            last = state.scores[0].runs;
        }
        assert_eq!(last, 5);
    }

    #[test]
    fn test_empty_log_has_no_history() {
        let mut log = UndoLog::new(10);
        assert!(log.is_empty());
        assert!(log.pop().is_none());
    }
}
