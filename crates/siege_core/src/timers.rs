//! Region timer queue driven by simulated game time.
//!
//! Recurring entries are keyed by `TimerKind`, which doubles as the liveness
//! guard: starting a timer whose kind is already alive is a no-op, so
//! repeated starts can never stack duplicate processes.

use crate::door::DoorId;
use crate::keep::KeepId;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimerKind {
    DoorRepair(DoorId),
    ClaimTick(KeepId),
}

#[derive(Copy, Clone, Debug)]
struct Entry {
    due_ms: u64,
    interval_ms: u64,
    kind: TimerKind,
}

#[derive(Default, Debug)]
pub struct RegionTimers {
    now_ms: u64,
    entries: Vec<Entry>,
}

impl RegionTimers {
    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedule a recurring timer. Returns false (leaving the existing entry
    /// untouched) when one of the same kind is already alive.
    pub fn start(&mut self, kind: TimerKind, interval_ms: u64) -> bool {
        if self.is_alive(kind) {
            return false;
        }
        let interval_ms = interval_ms.max(1);
        self.entries.push(Entry { due_ms: self.now_ms + interval_ms, interval_ms, kind });
        true
    }

    pub fn is_alive(&self, kind: TimerKind) -> bool {
        self.entries.iter().any(|e| e.kind == kind)
    }

    pub fn stop(&mut self, kind: TimerKind) {
        self.entries.retain(|e| e.kind != kind);
    }

    /// Advance the clock and collect every firing; recurring entries
    /// reschedule themselves, including catch-up firings on a large step.
    pub fn advance(&mut self, dt_ms: u64) -> Vec<TimerKind> {
        self.now_ms += dt_ms;
        let mut fired = Vec::new();
        for e in &mut self.entries {
            while e.due_ms <= self.now_ms {
                fired.push(e.kind);
                e.due_ms += e.interval_ms;
            }
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_on_interval_and_reschedules() {
        let mut t = RegionTimers::default();
        assert!(t.start(TimerKind::DoorRepair(DoorId(1)), 100));
        assert!(t.advance(99).is_empty());
        assert_eq!(t.advance(1).len(), 1);
        // still alive and fires again a full interval later
        assert!(t.is_alive(TimerKind::DoorRepair(DoorId(1))));
        assert_eq!(t.advance(100).len(), 1);
    }

    #[test]
    fn double_start_is_a_noop() {
        let mut t = RegionTimers::default();
        assert!(t.start(TimerKind::ClaimTick(KeepId(5)), 100));
        assert!(!t.start(TimerKind::ClaimTick(KeepId(5)), 100));
        assert_eq!(t.advance(100).len(), 1);
    }

    #[test]
    fn stop_removes_entry() {
        let mut t = RegionTimers::default();
        t.start(TimerKind::DoorRepair(DoorId(2)), 50);
        t.stop(TimerKind::DoorRepair(DoorId(2)));
        assert!(!t.is_alive(TimerKind::DoorRepair(DoorId(2))));
        assert!(t.advance(500).is_empty());
    }
}
