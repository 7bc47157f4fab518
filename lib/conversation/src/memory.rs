//! Bounded conversation memory.
//!
//! Memory is a sliding window over the most recent exchanges of a session.
//! Appending past the capacity evicts the oldest exchange, so the stored
//! history is always the last `min(n, capacity)` exchanges in order.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::collections::vec_deque;

/// Maximum number of exchanges retained per session.
pub const MEMORY_CAPACITY: usize = 10;

/// Number of exchanges rendered into the model prompt.
pub const RECENT_CONTEXT_LEN: usize = 3;

/// One learner message and the tutor's reply to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    /// What the learner wrote.
    pub user: String,
    /// What the tutor answered.
    pub reply: String,
}

impl Exchange {
    /// Creates a new exchange.
    #[must_use]
    pub fn new(user: impl Into<String>, reply: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            reply: reply.into(),
        }
    }
}

/// Ordered, bounded log of exchanges for one session.
///
/// Not synchronised; the session store serialises access per session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationMemory {
    exchanges: VecDeque<Exchange>,
}

impl ConversationMemory {
    /// Creates an empty memory holding up to [`MEMORY_CAPACITY`] exchanges.
    #[must_use]
    pub fn new() -> Self {
        Self {
            exchanges: VecDeque::with_capacity(MEMORY_CAPACITY + 1),
        }
    }

    /// Appends an exchange, evicting from the head while over capacity.
    pub fn append(&mut self, exchange: Exchange) {
        self.exchanges.push_back(exchange);
        while self.exchanges.len() > MEMORY_CAPACITY {
            self.exchanges.pop_front();
        }
    }

    /// Returns up to the last `n` exchanges, oldest first.
    pub fn recent(&self, n: usize) -> vec_deque::Iter<'_, Exchange> {
        let start = self.exchanges.len().saturating_sub(n);
        self.exchanges.range(start..)
    }

    /// Returns the exchanges used as prompt context.
    pub fn recent_context(&self) -> vec_deque::Iter<'_, Exchange> {
        self.recent(RECENT_CONTEXT_LEN)
    }

    /// Removes every exchange.
    pub fn clear(&mut self) {
        self.exchanges.clear();
    }

    /// Iterates over all retained exchanges, oldest first.
    pub fn iter(&self) -> vec_deque::Iter<'_, Exchange> {
        self.exchanges.iter()
    }

    /// Returns the number of retained exchanges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    /// Returns whether no exchanges are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(n: usize) -> ConversationMemory {
        let mut memory = ConversationMemory::new();
        for i in 0..n {
            memory.append(Exchange::new(format!("q{i}"), format!("a{i}")));
        }
        memory
    }

    #[test]
    fn length_is_min_of_appends_and_capacity() {
        for n in [0, 1, 9, 10, 11, 25] {
            let memory = filled(n);
            assert_eq!(memory.len(), n.min(MEMORY_CAPACITY), "after {n} appends");
        }
    }

    #[test]
    fn eviction_keeps_last_exchanges_in_order() {
        let memory = filled(14);
        let users: Vec<&str> = memory.iter().map(|e| e.user.as_str()).collect();
        let expected: Vec<String> = (4..14).map(|i| format!("q{i}")).collect();
        assert_eq!(users, expected);
    }

    #[test]
    fn recent_context_is_last_three_oldest_first() {
        let memory = filled(7);
        let users: Vec<&str> = memory.recent_context().map(|e| e.user.as_str()).collect();
        assert_eq!(users, vec!["q4", "q5", "q6"]);
    }

    #[test]
    fn recent_context_with_fewer_exchanges() {
        let memory = filled(2);
        assert_eq!(memory.recent_context().count(), 2);
        assert_eq!(ConversationMemory::new().recent_context().count(), 0);
    }

    #[test]
    fn recent_never_exceeds_request() {
        let memory = filled(10);
        assert_eq!(memory.recent(3).count(), 3);
        assert_eq!(memory.recent(0).count(), 0);
        assert_eq!(memory.recent(50).count(), 10);
    }

    #[test]
    fn clear_empties_memory() {
        let mut memory = filled(5);
        memory.clear();
        assert!(memory.is_empty());
        assert_eq!(memory.recent_context().count(), 0);
    }
}
