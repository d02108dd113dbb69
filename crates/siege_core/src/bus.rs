//! Region notification bus.
//!
//! Stand-in for the client packet channel: door state, object updates and
//! nearby text are pushed synchronously after each mutation and drained by
//! the replication layer. Notes are fire-and-forget; nothing here waits for
//! an acknowledgement.

use crate::banner::BannerId;
use crate::door::{DoorId, DoorState};
use crate::guard::GuardId;
use crate::keep::KeepId;
use crate::realm::Realm;
use crate::PlayerId;

#[derive(Debug, Clone, PartialEq)]
pub enum Note {
    DoorState { door: DoorId, state: DoorState },
    DoorHealth { door: DoorId, pct: u8 },
    BannerUpdate { banner: BannerId },
    BannerRemoved { banner: BannerId },
    GuardUpdate { guard: GuardId },
    PlayerMoved { player: PlayerId },
    /// Text for everyone within broadcast radius of the keep.
    Nearby { keep: KeepId, text: String },
    /// System-window feedback for one player.
    ToPlayer { player: PlayerId, text: String },
    GuildMessage { guild: String, text: String },
    Claimed { keep: KeepId, guild: String },
    Released { keep: KeepId },
    Captured { keep: KeepId, realm: Realm },
    LevelChanged { keep: KeepId, level: u8 },
    /// Hourly bookkeeping boundary for a claimed keep.
    ClaimTick { keep: KeepId, guild: String },
}

#[derive(Default, Debug)]
pub struct RegionBus {
    notes: Vec<Note>,
}

impl RegionBus {
    pub fn push(&mut self, note: Note) {
        self.notes.push(note);
    }

    /// Drain all queued notes in publish order.
    pub fn drain(&mut self) -> Vec<Note> {
        std::mem::take(&mut self.notes)
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}
