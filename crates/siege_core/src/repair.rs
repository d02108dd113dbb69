//! Recurring door repair driven by the region timer queue.
//!
//! One process per damaged door: every interval it restores a fixed slice of
//! max health unless the keep is contested, and the door's own repair
//! transition decides when the gate swings shut. The timer-kind liveness
//! guard makes repeated starts a no-op, so duplicate processes cannot
//! accumulate.

use crate::door::{self, DoorId};
use crate::timers::TimerKind;
use crate::SiegeState;

/// Start the repair process for a door. Idempotent: returns false and does
/// nothing when a process is already alive.
pub fn start(w: &mut SiegeState, id: DoorId) -> bool {
    if w.doors.get(id).is_none() {
        return false;
    }
    let interval = w.cfg.repair_interval_ms;
    w.timers.start(TimerKind::DoorRepair(id), interval)
}

pub fn is_running(w: &SiegeState, id: DoorId) -> bool {
    w.timers.is_alive(TimerKind::DoorRepair(id))
}

/// Stop the process; required when the door or its keep is destroyed so no
/// timer outlives its subject.
pub fn stop(w: &mut SiegeState, id: DoorId) {
    w.timers.stop(TimerKind::DoorRepair(id));
}

/// One timer firing for one door.
pub(crate) fn tick_door(w: &mut SiegeState, id: DoorId) {
    let now = w.timers.now_ms();
    let window = w.cfg.combat_window_ms;
    let Some((intact, keep_id, max)) = w.doors.get(id).map(|d| (d.is_intact(), d.keep, d.max_health))
    else {
        // Door is gone; drop the orphaned timer.
        w.timers.stop(TimerKind::DoorRepair(id));
        return;
    };
    if intact {
        // Healed up: the process ends with its job done.
        w.timers.stop(TimerKind::DoorRepair(id));
        return;
    }
    let contested = keep_id
        .and_then(|k| w.keep(k))
        .is_some_and(|k| k.in_combat(now, window));
    if contested {
        // Stays scheduled; tries again next interval.
        return;
    }
    let heal = (max / 100) * w.cfg.repair_percent;
    door::repair(w, id, heal.max(1));
}
