//! Deadline scheduler for session activities.
//!
//! Every periodic or delayed effect (fall steps, machine decisions, the
//! slowdown reset, the rainbow toggle) is a deadline entry here rather than
//! an ad-hoc background timer. The owner advances the clock explicitly and
//! dispatches the returned deadlines one at a time, which makes pause (stop
//! advancing), cancellation, and deterministic tests trivial.

use arrayvec::ArrayVec;

use crate::types::Side;

/// One scheduled activity. At most one entry of each kind is pending at a
/// time; re-scheduling a kind replaces its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// One gravity step for a board.
    Fall(Side),
    /// Let the machine player search for a placement.
    MachineDecide,
    /// Execute the machine player's pending placement.
    MachineCommit,
    /// End of a board's slowdown window.
    SlowdownReset(Side),
    RainbowStart,
    RainbowEnd,
}

/// Upper bound on distinct pending entries (one per kind/side).
const MAX_ENTRIES: usize = 8;

#[derive(Debug, Clone, Copy)]
struct TimerEntry {
    due_at_ms: u64,
    kind: TimerKind,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now_ms: u64,
    entries: ArrayVec<TimerEntry, MAX_ENTRIES>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedule `kind` to fire `delay_ms` from now, replacing any pending
    /// entry of the same kind.
    pub fn schedule_in(&mut self, delay_ms: u64, kind: TimerKind) {
        self.cancel(kind);
        self.entries.push(TimerEntry {
            due_at_ms: self.now_ms + delay_ms,
            kind,
        });
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        self.entries.retain(|e| e.kind != kind);
    }

    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    /// Remaining delay for a pending entry, if any.
    pub fn remaining_ms(&self, kind: TimerKind) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| e.kind == kind)
            .map(|e| e.due_at_ms.saturating_sub(self.now_ms))
    }

    /// Advance the clock and return the deadlines that came due, ordered by
    /// due time. Entries are consumed; periodic activities re-schedule
    /// themselves from their handlers, so a single large advance yields each
    /// kind at most once - no backlog of missed ticks.
    pub fn advance(&mut self, elapsed_ms: u64) -> ArrayVec<TimerKind, MAX_ENTRIES> {
        self.now_ms += elapsed_ms;
        let now = self.now_ms;

        let mut due: ArrayVec<TimerEntry, MAX_ENTRIES> = ArrayVec::new();
        self.entries.retain(|e| {
            if e.due_at_ms <= now {
                due.push(*e);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|e| e.due_at_ms);
        due.iter().map(|e| e.kind).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_at_deadline_not_before() {
        let mut s = Scheduler::new();
        s.schedule_in(100, TimerKind::RainbowStart);

        assert!(s.advance(99).is_empty());
        let due = s.advance(1);
        assert_eq!(due.as_slice(), &[TimerKind::RainbowStart]);
        // Consumed: does not fire again
        assert!(s.advance(1000).is_empty());
    }

    #[test]
    fn test_schedule_replaces_same_kind() {
        let mut s = Scheduler::new();
        s.schedule_in(100, TimerKind::SlowdownReset(Side::Human));
        s.advance(50);
        // A second slowdown extends rather than stacks the reset
        s.schedule_in(100, TimerKind::SlowdownReset(Side::Human));

        assert!(s.advance(99).is_empty());
        let due = s.advance(1);
        assert_eq!(due.as_slice(), &[TimerKind::SlowdownReset(Side::Human)]);
    }

    #[test]
    fn test_due_entries_ordered_by_deadline() {
        let mut s = Scheduler::new();
        s.schedule_in(300, TimerKind::MachineDecide);
        s.schedule_in(100, TimerKind::Fall(Side::Machine));
        s.schedule_in(200, TimerKind::Fall(Side::Human));

        let due = s.advance(300);
        assert_eq!(
            due.as_slice(),
            &[
                TimerKind::Fall(Side::Machine),
                TimerKind::Fall(Side::Human),
                TimerKind::MachineDecide,
            ]
        );
    }

    #[test]
    fn test_cancel_and_remaining() {
        let mut s = Scheduler::new();
        s.schedule_in(500, TimerKind::MachineCommit);
        s.advance(200);
        assert_eq!(s.remaining_ms(TimerKind::MachineCommit), Some(300));

        s.cancel(TimerKind::MachineCommit);
        assert_eq!(s.remaining_ms(TimerKind::MachineCommit), None);
        assert!(s.advance(1000).is_empty());
    }

    #[test]
    fn test_frozen_clock_preserves_deadlines() {
        let mut s = Scheduler::new();
        s.schedule_in(100, TimerKind::RainbowEnd);
        // No advance: nothing fires, remaining time intact
        assert_eq!(s.remaining_ms(TimerKind::RainbowEnd), Some(100));
        assert_eq!(s.now_ms(), 0);
    }
}
