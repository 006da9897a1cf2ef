//! Chat turn history
//!
//! Bounded per-session transcript. Only the trailing turns ever matter for
//! intent detection, so old turns are dropped once capacity is reached.

use crate::models::{ChatTurn, TurnRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatHistory {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    turns: VecDeque<ChatTurn>,
    /// Next sequence position; keeps counting after old turns are dropped.
    next_position: u64,
    capacity: usize,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            created_at: Utc::now(),
            updated_at: Utc::now(),
            turns: VecDeque::with_capacity(capacity.min(64)),
            next_position: 0,
            capacity: capacity.max(1),
        }
    }

    /// Append a turn and return its sequence position.
    pub fn push(&mut self, role: TurnRole, content: impl Into<String>) -> u64 {
        let position = self.next_position;
        self.next_position += 1;

        self.turns.push_back(ChatTurn {
            role,
            content: content.into(),
            position,
        });

        while self.turns.len() > self.capacity {
            self.turns.pop_front();
        }

        self.updated_at = Utc::now();
        position
    }

    /// The last `count` turns, oldest first.
    pub fn recent(&self, count: usize) -> Vec<ChatTurn> {
        let start = self.turns.len().saturating_sub(count);
        self.turns.iter().skip(start).cloned().collect()
    }

    pub fn turns(&self) -> impl Iterator<Item = &ChatTurn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Start over, as for a new chat session.
    pub fn clear(&mut self) {
        self.turns.clear();
        self.next_position = 0;
        self.updated_at = Utc::now();
    }
}

impl Default for ChatHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_increase() {
        let mut history = ChatHistory::new();
        assert_eq!(history.push(TurnRole::User, "hi"), 0);
        assert_eq!(history.push(TurnRole::Assistant, "hello"), 1);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut history = ChatHistory::with_capacity(3);
        for i in 0..5 {
            history.push(TurnRole::User, format!("message {}", i));
        }

        assert_eq!(history.len(), 3);
        let positions: Vec<_> = history.turns().map(|t| t.position).collect();
        assert_eq!(positions, vec![2, 3, 4]);
    }

    #[test]
    fn test_recent_oldest_first() {
        let mut history = ChatHistory::new();
        for i in 0..8 {
            history.push(TurnRole::User, format!("m{}", i));
        }

        let recent: Vec<_> = history.recent(3).into_iter().map(|t| t.content).collect();
        assert_eq!(recent, vec!["m5", "m6", "m7"]);
        assert_eq!(history.recent(100).len(), 8);
    }

    #[test]
    fn test_clear() {
        let mut history = ChatHistory::new();
        history.push(TurnRole::User, "book a flight");
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.push(TurnRole::User, "again"), 0);
    }
}
