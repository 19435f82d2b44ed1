//! Per-host table of scheduled callbacks.
//!
//! Every entry is tagged with the [`Generation`] of the module instance that
//! asked for it. A restart drops the old generation's entries, and the host
//! re-checks the tag when an entry fires.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Identity of one module instance within a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Generation(pub u64);

impl Generation {
    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

/// Module-chosen name for a one-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerKey(pub u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// The module's recurring tick.
    Tick,
    /// A one-shot timer requested through the game context.
    Module(TimerKey),
}

#[derive(Debug, Clone, Copy)]
pub struct TimerEntry {
    pub due_ms: u64,
    pub generation: Generation,
    pub kind: TimerKind,
    seq: u64,
}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.due_ms == other.due_ms && self.seq == other.seq
    }
}

impl Eq for TimerEntry {}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due_ms, self.seq).cmp(&(other.due_ms, other.seq))
    }
}

#[derive(Debug, Default)]
pub struct TimerTable {
    heap: BinaryHeap<Reverse<TimerEntry>>,
    next_seq: u64,
}

impl TimerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, generation: Generation, due_ms: u64, kind: TimerKind) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(TimerEntry {
            due_ms,
            generation,
            kind,
            seq,
        }));
    }

    /// Remove pending one-shots with this key for this generation.
    pub fn cancel(&mut self, generation: Generation, key: TimerKey) {
        self.heap.retain(|Reverse(e)| {
            !(e.generation == generation && e.kind == TimerKind::Module(key))
        });
    }

    /// Remove everything scheduled by a generation.
    pub fn cancel_generation(&mut self, generation: Generation) -> usize {
        let before = self.heap.len();
        self.heap.retain(|Reverse(e)| e.generation != generation);
        before - self.heap.len()
    }

    /// Pop the earliest entry due at or before `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<TimerEntry> {
        match self.heap.peek() {
            Some(Reverse(e)) if e.due_ms <= now_ms => self.heap.pop().map(|Reverse(e)| e),
            _ => None,
        }
    }

    pub fn pending(&self, generation: Generation) -> usize {
        self.heap
            .iter()
            .filter(|Reverse(e)| e.generation == generation)
            .count()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const G0: Generation = Generation(0);
    const G1: Generation = Generation(1);

    #[test]
    fn pops_in_due_order_then_insertion_order() {
        let mut table = TimerTable::new();
        table.schedule(G0, 30, TimerKind::Module(TimerKey(3)));
        table.schedule(G0, 10, TimerKind::Module(TimerKey(1)));
        table.schedule(G0, 10, TimerKind::Module(TimerKey(2)));

        let order: Vec<_> = std::iter::from_fn(|| table.pop_due(100))
            .map(|e| e.kind)
            .collect();
        assert_eq!(
            order,
            vec![
                TimerKind::Module(TimerKey(1)),
                TimerKind::Module(TimerKey(2)),
                TimerKind::Module(TimerKey(3)),
            ]
        );
    }

    #[test]
    fn nothing_fires_early() {
        let mut table = TimerTable::new();
        table.schedule(G0, 50, TimerKind::Tick);
        assert!(table.pop_due(49).is_none());
        assert!(table.pop_due(50).is_some());
        assert!(table.is_empty());
    }

    #[test]
    fn cancel_generation_leaves_other_generations() {
        let mut table = TimerTable::new();
        table.schedule(G0, 10, TimerKind::Tick);
        table.schedule(G0, 20, TimerKind::Module(TimerKey(7)));
        table.schedule(G1, 15, TimerKind::Tick);

        assert_eq!(table.cancel_generation(G0), 2);
        assert_eq!(table.pending(G0), 0);
        assert_eq!(table.pending(G1), 1);
        assert_eq!(table.pop_due(100).map(|e| e.generation), Some(G1));
    }

    #[test]
    fn cancel_key_is_scoped_to_generation() {
        let mut table = TimerTable::new();
        table.schedule(G0, 10, TimerKind::Module(TimerKey(1)));
        table.schedule(G1, 10, TimerKind::Module(TimerKey(1)));
        table.schedule(G1, 10, TimerKind::Tick);

        table.cancel(G1, TimerKey(1));
        assert_eq!(table.pending(G0), 1);
        assert_eq!(table.pending(G1), 1);
        assert_eq!(table.len(), 2);
    }
}
