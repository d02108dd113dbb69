//! Keep door state machine.
//!
//! Doors are the damage surface of a siege: main and inner gates can be
//! battered open by melee and siege equipment, posterns and side doors are
//! cosmetic, and magic never moves a gate. A broken gate stands `Open` until
//! the repair process mends it past the close threshold or the keep changes
//! hands.

use glam::Vec3;
use std::collections::HashMap;

use crate::bus::Note;
use crate::component::ComponentRole;
use crate::ident::StructureIdent;
use crate::keep::{Keep, KeepId};
use crate::realm::{are_hostile, Realm};
use crate::repair;
use crate::{PlayerId, SiegeState};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DoorId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DoorState {
    Closed,
    Open,
}

/// How damage reached the door. Spell damage never affects doors.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DamageSource {
    Melee,
    Ranged,
    Siege,
    Spell,
}

// Walk-through offset for a main gate (sub index 1) vs a side door.
const MAIN_DOOR_OFFSET: f32 = 150.0;
const SIDE_DOOR_OFFSET: f32 = 100.0;
// Height corrections applied when stepping through.
const TOWER_ENTRY_RAISE: f32 = 83.0;
const TOWER_EXIT_DROP: f32 = 92.0;
const INNER_GATE_RAISE: f32 = 92.0;

#[derive(Debug, Clone)]
pub struct KeepDoor {
    pub id: DoorId,
    pub name: String,
    /// None for a legacy standalone door.
    pub keep: Option<KeepId>,
    pub state: DoorState,
    pub max_health: i32,
    pub attackable: bool,
    pub pos: Vec3,
    pub heading: f32,
    hp: i32,
    last_pct_sent: u8,
    /// Only read when no keep backs this door.
    standalone_realm: Realm,
}

impl KeepDoor {
    pub fn new(
        id: DoorId,
        name: &str,
        keep: Option<KeepId>,
        pos: Vec3,
        heading: f32,
        attackable: bool,
        max_health: i32,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            keep,
            state: DoorState::Closed,
            max_health,
            attackable,
            pos,
            heading,
            hp: max_health,
            last_pct_sent: 100,
            standalone_realm: Realm::None,
        }
    }

    /// Reported health: a cosmetic door always reads zero.
    #[inline]
    pub fn health(&self) -> i32 {
        if self.attackable { self.hp } else { 0 }
    }

    /// Rounded percent of the reported health.
    pub fn health_pct(&self) -> u8 {
        if !self.attackable || self.max_health <= 0 {
            return 0;
        }
        ((i64::from(self.hp) * 100 + i64::from(self.max_health) / 2) / i64::from(self.max_health))
            as u8
    }

    #[inline]
    pub fn is_intact(&self) -> bool {
        self.hp >= self.max_health
    }
}

/// Whether a door slot can be battered down: gates always, the keep or tower
/// building only through its first door, walls and posterns never.
pub fn attackable_slot(role: ComponentRole, sub_index: u8) -> bool {
    match role {
        ComponentRole::Gate => true,
        ComponentRole::Keep | ComponentRole::Tower => sub_index == 1,
        ComponentRole::Wall | ComponentRole::Postern => false,
    }
}

/// Door hit points at a given keep level.
pub fn max_health_for_level(level: u8) -> i32 {
    5_000 + i32::from(level) * 1_000
}

/// World-owned door lookup. Keep doors and legacy standalone doors register
/// here under the same id space.
#[derive(Default, Debug)]
pub struct DoorRegistry {
    doors: HashMap<u32, KeepDoor>,
}

impl DoorRegistry {
    /// Register a door; a second door under the same id is rejected.
    pub fn register(&mut self, door: KeepDoor) -> bool {
        if self.doors.contains_key(&door.id.0) {
            log::warn!("door {} already registered, ignoring duplicate", door.id.0);
            return false;
        }
        self.doors.insert(door.id.0, door);
        true
    }

    pub fn get(&self, id: DoorId) -> Option<&KeepDoor> {
        self.doors.get(&id.0)
    }

    pub fn get_mut(&mut self, id: DoorId) -> Option<&mut KeepDoor> {
        self.doors.get_mut(&id.0)
    }

    pub fn remove(&mut self, id: DoorId) -> Option<KeepDoor> {
        self.doors.remove(&id.0)
    }

    pub fn len(&self) -> usize {
        self.doors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeepDoor> {
        self.doors.values()
    }
}

/// Realm a door renders and defends as, read live through its keep.
pub fn realm_of(w: &SiegeState, id: DoorId) -> Realm {
    let Some(door) = w.doors.get(id) else {
        return Realm::None;
    };
    match door.keep.and_then(|k| w.keep(k)) {
        Some(keep) => keep.realm,
        None => door.standalone_realm,
    }
}

/// Apply damage. Returns the health actually removed.
///
/// Spell damage is rejected outright (the caster is told it had no effect);
/// cosmetic doors ignore everything. Health-percent updates go out only when
/// the rounded bucket changed since the last send.
pub fn change_health(
    w: &mut SiegeState,
    id: DoorId,
    source: DamageSource,
    attacker: Option<PlayerId>,
    amount: i32,
) -> i32 {
    if source == DamageSource::Spell {
        if let Some(p) = attacker {
            w.bus.push(Note::ToPlayer {
                player: p,
                text: "Your spell has no effect on the door!".to_string(),
            });
        }
        return 0;
    }
    let now = w.timers.now_ms();
    let applied;
    let keep_id;
    let mut broke = false;
    {
        let Some(door) = w.doors.get_mut(id) else {
            return 0;
        };
        if !door.attackable || door.hp <= 0 {
            return 0;
        }
        applied = amount.clamp(0, door.hp);
        if applied == 0 {
            return 0;
        }
        door.hp -= applied;
        keep_id = door.keep;
        let pct = door.health_pct();
        if pct != door.last_pct_sent {
            door.last_pct_sent = pct;
            w.bus.push(Note::DoorHealth { door: id, pct });
        }
        if door.hp == 0 && door.state == DoorState::Closed {
            broke = true;
        }
    }
    if let Some(kid) = keep_id
        && let Some(k) = w.keep_mut(kid)
    {
        k.last_attacked_ms = now;
    }
    // Regeneration runs from the first hit until the door is whole again.
    repair::start(w, id);
    if broke {
        die(w, id);
    }
    applied
}

/// Damage entry point for combat handlers.
pub fn take_damage(
    w: &mut SiegeState,
    id: DoorId,
    attacker: Option<PlayerId>,
    source: DamageSource,
    amount: i32,
) -> i32 {
    change_health(w, id, source, attacker, amount)
}

/// Break the gate: `Closed -> Open` with a region notice.
pub fn die(w: &mut SiegeState, id: DoorId) {
    let keep_id = {
        let Some(door) = w.doors.get_mut(id) else {
            return;
        };
        if door.state == DoorState::Open {
            return;
        }
        door.state = DoorState::Open;
        door.hp = 0;
        door.keep
    };
    if let Some(kid) = keep_id
        && let Some(k) = w.keep(kid)
    {
        let text = format!("The gates of {} have been broken!", k.name);
        w.bus.push(Note::Nearby { keep: kid, text });
    }
    w.bus.push(Note::DoorState { door: id, state: DoorState::Open });
}

/// Mend the door. An open gate swings shut again once repaired past the
/// close threshold.
pub fn repair(w: &mut SiegeState, id: DoorId, amount: i32) {
    let close_pct = w.cfg.repair_close_pct;
    let mut closed = false;
    {
        let Some(door) = w.doors.get_mut(id) else {
            return;
        };
        door.hp = (door.hp + amount.max(0)).min(door.max_health);
        let pct = door.health_pct();
        if pct != door.last_pct_sent {
            door.last_pct_sent = pct;
            w.bus.push(Note::DoorHealth { door: id, pct });
        }
        if door.state == DoorState::Open && pct > close_pct {
            door.state = DoorState::Closed;
            closed = true;
        }
    }
    if closed {
        w.bus.push(Note::DoorState { door: id, state: DoorState::Closed });
    }
}

/// Force a door back to pristine state under a new realm. Idempotent; used
/// only when the owning structure changes hands.
pub fn reset(w: &mut SiegeState, id: DoorId, new_realm: Realm) {
    {
        let Some(door) = w.doors.get_mut(id) else {
            return;
        };
        door.standalone_realm = new_realm;
        door.hp = door.max_health;
        door.state = DoorState::Closed;
        door.last_pct_sent = 100;
    }
    w.bus.push(Note::DoorState { door: id, state: DoorState::Closed });
    repair::stop(w, id);
}

/// Re-derive door hit points after the keep's level changed.
pub fn update_level(w: &mut SiegeState, id: DoorId) {
    let Some(keep_id) = w.doors.get(id).and_then(|d| d.keep) else {
        return;
    };
    let Some(level) = w.keep(keep_id).map(|k| k.level) else {
        return;
    };
    let Some(door) = w.doors.get_mut(id) else {
        return;
    };
    let was_full = door.is_intact();
    door.max_health = max_health_for_level(level);
    door.hp = if was_full { door.max_health } else { door.hp.min(door.max_health) };
}

/// Delete a door from the world, stopping any repair process bound to it.
pub fn remove(w: &mut SiegeState, id: DoorId) {
    repair::stop(w, id);
    if let Some(door) = w.doors.remove(id)
        && let Some(kid) = door.keep
        && let Some(keep) = w.keep_mut(kid)
    {
        keep.doors.retain(|d| *d != id);
    }
}

/// Door interaction: eligible actors step through to the far side.
pub fn interact(w: &mut SiegeState, id: DoorId, player: PlayerId) -> bool {
    let in_front = {
        let (Some(door), Some(p)) = (w.doors.get(id), w.player(player)) else {
            return false;
        };
        is_in_front(door, p.pos)
    };
    pass_through(w, id, player, in_front)
}

/// `enter` / `exit` whispers drive the same movement explicitly.
pub fn whisper(w: &mut SiegeState, id: DoorId, player: PlayerId, text: &str) -> bool {
    match text.trim().to_ascii_lowercase().as_str() {
        "enter" => pass_through(w, id, player, true),
        "exit" => pass_through(w, id, player, false),
        _ => false,
    }
}

fn pass_through(w: &mut SiegeState, id: DoorId, player: PlayerId, in_front: bool) -> bool {
    {
        let Some(p) = w.player(player) else {
            return false;
        };
        if p.mezzed {
            w.bus.push(Note::ToPlayer { player, text: "You are mesmerized!".to_string() });
            return false;
        }
        if p.stunned {
            w.bus.push(Note::ToPlayer { player, text: "You are stunned!".to_string() });
            return false;
        }
    }
    let door_realm = realm_of(w, id);
    let eligible = {
        let Some(p) = w.player(player) else {
            return false;
        };
        p.priv_level > 1 || are_hostile(p.realm, door_realm)
    };
    if !eligible {
        return false;
    }

    let (pos, heading, sub_index, keep_id) = {
        let Some(door) = w.doors.get(id) else {
            return false;
        };
        let ident = StructureIdent::decode(door.id.0);
        (door.pos, door.heading, ident.sub_index, door.keep)
    };
    let main_door = sub_index == 1;
    let dist = if main_door { MAIN_DOOR_OFFSET } else { SIDE_DOOR_OFFSET };
    // Step out of the opposite side.
    let target = point_from_heading(pos, heading, if in_front { -dist } else { dist });
    let mut y = pos.y;
    if let Some(kid) = keep_id
        && let Some(keep) = w.keep(kid)
    {
        if keep.is_tower() {
            if in_front {
                if main_door {
                    y += TOWER_ENTRY_RAISE;
                }
            } else {
                y -= TOWER_EXIT_DROP;
            }
        } else if in_front
            && nearest_role_dist(keep, pos, ComponentRole::Keep)
                < nearest_role_dist(keep, pos, ComponentRole::Gate)
        {
            // The keep building sits closer than the outer gate, so this is
            // the inner gate and stepping through lands on its platform.
            y += INNER_GATE_RAISE;
        }
    }
    if let Some(p) = w.player_mut(player) {
        p.pos = Vec3::new(target.x, y, target.z);
    }
    w.bus.push(Note::PlayerMoved { player });
    true
}

fn is_in_front(door: &KeepDoor, pos: Vec3) -> bool {
    let facing = Vec3::new(door.heading.sin(), 0.0, door.heading.cos());
    let to = Vec3::new(pos.x - door.pos.x, 0.0, pos.z - door.pos.z);
    facing.dot(to) >= 0.0
}

fn point_from_heading(pos: Vec3, heading: f32, dist: f32) -> Vec3 {
    pos + Vec3::new(heading.sin(), 0.0, heading.cos()) * dist
}

fn nearest_role_dist(keep: &Keep, from: Vec3, role: ComponentRole) -> f32 {
    keep.components
        .iter()
        .filter(|c| c.role == role)
        .map(|c| c.pos.distance(from))
        .fold(f32::INFINITY, f32::min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attackable_slots() {
        assert!(attackable_slot(ComponentRole::Gate, 2));
        assert!(attackable_slot(ComponentRole::Keep, 1));
        assert!(!attackable_slot(ComponentRole::Keep, 2));
        assert!(!attackable_slot(ComponentRole::Postern, 1));
        assert!(!attackable_slot(ComponentRole::Wall, 1));
    }

    #[test]
    fn cosmetic_door_reports_zero_health() {
        let d = KeepDoor::new(DoorId(1), "Postern Door", None, Vec3::ZERO, 0.0, false, 1000);
        assert_eq!(d.health(), 0);
        assert_eq!(d.health_pct(), 0);
    }

    #[test]
    fn percent_rounds() {
        let mut d = KeepDoor::new(DoorId(1), "Gate", None, Vec3::ZERO, 0.0, true, 1000);
        d.hp = 155;
        assert_eq!(d.health_pct(), 16);
        d.hp = 154;
        assert_eq!(d.health_pct(), 15);
    }
}
