use crate::types::{EventCursor, ServerEvent};
use bastion_core::Tick;
use std::collections::VecDeque;

/// Bounded event history with cursor-based retrieval.
///
/// Oldest entries are dropped once the buffer is full; a cursor that points
/// before the oldest retained event resumes from the oldest instead.
pub struct EventBuffer<E> {
    entries: VecDeque<ServerEvent<E>>,
    capacity: usize,
    next_sequence: u64,
}

impl<E: Clone> EventBuffer<E> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            next_sequence: 0,
        }
    }

    pub fn push(&mut self, tick: Tick, event: E) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(ServerEvent {
            sequence: self.next_sequence,
            tick,
            event,
        });
        self.next_sequence += 1;
    }

    /// Events at or after the cursor, plus a new cursor pointing past the
    /// last buffered event.
    pub fn get_from_cursor(&self, cursor: EventCursor) -> (Vec<ServerEvent<E>>, EventCursor) {
        let events = self
            .entries
            .iter()
            .filter(|e| e.sequence >= cursor.0)
            .cloned()
            .collect();
        (events, EventCursor(self.next_sequence))
    }

    pub fn current_sequence(&self) -> u64 {
        self.next_sequence
    }
}
