//! The keep aggregate: ownership, claims, levels and capture.

use glam::Vec3;
use std::collections::HashMap;

use crate::banner::{self, BannerId};
use crate::bus::Note;
use crate::component::KeepComponent;
use crate::door::{self, DoorId};
use crate::guard::{self, GuardId};
use crate::realm::Realm;
use crate::timers::TimerKind;
use crate::{Guild, PlayerId, SiegeState};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeepId(pub u32);

/// Claimed defense flavor; decides which guard classes the keep fields.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum DefenseType {
    #[default]
    Generic,
    Melee,
    Magic,
    Stealth,
}

impl DefenseType {
    pub fn name(self) -> &'static str {
        match self {
            DefenseType::Generic => "generic",
            DefenseType::Melee => "melee",
            DefenseType::Magic => "caster",
            DefenseType::Stealth => "scout",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Keep {
    pub id: KeepId,
    pub name: String,
    pub realm: Realm,
    pub original_realm: Realm,
    pub guild: Option<Guild>,
    pub level: u8,
    pub base_level: u8,
    /// 0 for a keep proper; 1+ for satellite towers.
    pub tower_index: u8,
    pub defense_type: DefenseType,
    pub pos: Vec3,
    pub heading: f32,
    pub components: Vec<KeepComponent>,
    pub doors: Vec<DoorId>,
    /// Guards keyed by template id.
    pub guards: HashMap<String, GuardId>,
    /// Banners keyed by template id.
    pub banners: HashMap<String, BannerId>,
    pub lord: Option<GuardId>,
    pub last_attacked_ms: u64,
}

impl Keep {
    pub fn new(
        id: KeepId,
        name: &str,
        realm: Realm,
        base_level: u8,
        tower_index: u8,
        pos: Vec3,
        heading: f32,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            realm,
            original_realm: realm,
            guild: None,
            level: 0,
            base_level,
            tower_index,
            defense_type: DefenseType::Generic,
            pos,
            heading,
            components: Vec::new(),
            doors: Vec::new(),
            guards: HashMap::new(),
            banners: HashMap::new(),
            lord: None,
            last_attacked_ms: 0,
        }
    }

    #[inline]
    pub fn is_tower(&self) -> bool {
        self.tower_index > 0
    }

    /// Attacked by an enemy within the combat window.
    pub fn in_combat(&self, now_ms: u64, window_ms: u64) -> bool {
        self.last_attacked_ms != 0 && now_ms.saturating_sub(self.last_attacked_ms) < window_ms
    }
}

fn members(w: &SiegeState, keep_id: KeepId) -> (Vec<GuardId>, Vec<BannerId>, Vec<DoorId>) {
    match w.keep(keep_id) {
        Some(k) => (
            k.guards.values().copied().collect(),
            k.banners.values().copied().collect(),
            k.doors.clone(),
        ),
        None => (Vec::new(), Vec::new(), Vec::new()),
    }
}

/// All claim preconditions; every failure tells the player why.
pub fn check_for_claim(w: &mut SiegeState, keep_id: KeepId, player: PlayerId) -> bool {
    let Some((k_realm, k_base, k_claimed, k_pos, k_tower)) = w
        .keep(keep_id)
        .map(|k| (k.realm, k.base_level, k.guild.is_some(), k.pos, k.is_tower()))
    else {
        return false;
    };
    let Some(p) = w.player(player).cloned() else {
        return false;
    };
    if p.realm != k_realm {
        w.bus.push(Note::ToPlayer {
            player,
            text: "The keep is not owned by your realm.".to_string(),
        });
        return false;
    }
    if k_base != 50 {
        w.bus.push(Note::ToPlayer {
            player,
            text: "This keep is not able to be claimed.".to_string(),
        });
        return false;
    }
    let Some(p_guild) = p.guild.clone() else {
        w.bus.push(Note::ToPlayer {
            player,
            text: "You must be in a guild to claim a keep.".to_string(),
        });
        return false;
    };
    if !p.can_claim {
        w.bus.push(Note::ToPlayer {
            player,
            text: "You do not have permission to claim for your guild.".to_string(),
        });
        return false;
    }
    if k_claimed {
        w.bus.push(Note::ToPlayer {
            player,
            text: "The keep is already claimed.".to_string(),
        });
        return false;
    }
    let limit = w.cfg.guild_claim_limit;
    if limit == 0 {
        w.bus.push(Note::ToPlayer { player, text: "Keep claiming is disabled!".to_string() });
        return false;
    }
    let owned = w
        .keeps
        .iter()
        .filter(|k| k.guild.as_ref().is_some_and(|g| g.name == p_guild.name))
        .count() as u32;
    if owned >= limit {
        w.bus.push(Note::ToPlayer {
            player,
            text: format!("Your guild already owns the limit of keeps ({limit})."),
        });
        return false;
    }
    if let Some(group) = p.group {
        let mut needed = w.cfg.claim_group_needed;
        if k_tower {
            needed /= 2;
        }
        if p.priv_level > 1 {
            needed = 0;
        }
        let radius = w.cfg.broadcast_radius;
        let count = w
            .players
            .iter()
            .filter(|o| o.group == Some(group) && o.pos.distance(k_pos) <= radius)
            .count() as u32;
        if count < needed {
            w.bus.push(Note::ToPlayer {
                player,
                text: format!(
                    "Not enough group members are near the keep. You have {count}/{needed}."
                ),
            });
            return false;
        }
    }
    true
}

/// Assign the keep to the player's guild and spin up claim bookkeeping.
/// Callers run `check_for_claim` first.
pub fn claim(w: &mut SiegeState, keep_id: KeepId, player: PlayerId) {
    let Some(guild) = w.player(player).and_then(|p| p.guild.clone()) else {
        return;
    };
    {
        let Some(keep) = w.keep_mut(keep_id) else {
            return;
        };
        keep.guild = Some(guild.clone());
    }
    w.bus.push(Note::Claimed { keep: keep_id, guild: guild.name });
    change_level(w, keep_id, 1);
    let (_, banners, _) = members(w, keep_id);
    for b in banners {
        banner::change_guild(w, b);
    }
    let interval = w.cfg.claim_tick_ms;
    w.timers.start(TimerKind::ClaimTick(keep_id), interval);
}

/// Drop the guild claim.
pub fn release(w: &mut SiegeState, keep_id: KeepId) {
    {
        let Some(keep) = w.keep_mut(keep_id) else {
            return;
        };
        if keep.guild.is_none() {
            return;
        }
        keep.guild = None;
    }
    w.timers.stop(TimerKind::ClaimTick(keep_id));
    w.bus.push(Note::Released { keep: keep_id });
    change_level(w, keep_id, 0);
    let (_, banners, _) = members(w, keep_id);
    for b in banners {
        banner::change_guild(w, b);
    }
}

/// Set the keep level and re-derive everything that scales with it.
pub fn change_level(w: &mut SiegeState, keep_id: KeepId, target: u8) {
    {
        let Some(keep) = w.keep_mut(keep_id) else {
            return;
        };
        keep.level = target;
    }
    let (guards, _, doors) = members(w, keep_id);
    for g in guards {
        guard::refresh_template(w, g);
    }
    for d in doors {
        door::update_level(w, d);
    }
    w.bus.push(Note::LevelChanged { keep: keep_id, level: target });
}

pub fn set_defense_type(w: &mut SiegeState, keep_id: KeepId, defense: DefenseType) {
    {
        let Some(keep) = w.keep_mut(keep_id) else {
            return;
        };
        keep.defense_type = defense;
    }
    let (guards, _, _) = members(w, keep_id);
    for g in guards {
        guard::refresh_template(w, g);
    }
}

/// Capture path: flip the realm and restore the keep to a pristine state.
/// Idempotent — resetting twice to the same realm lands in the same state.
pub fn reset(w: &mut SiegeState, keep_id: KeepId, realm: Realm) {
    {
        let Some(keep) = w.keep_mut(keep_id) else {
            return;
        };
        keep.last_attacked_ms = 0;
        keep.realm = realm;
        keep.level = 0;
        keep.defense_type = DefenseType::Melee;
    }
    w.bus.push(Note::Captured { keep: keep_id, realm });
    release(w, keep_id);
    let (guards, banners, doors) = members(w, keep_id);
    for d in doors {
        door::reset(w, d, realm);
    }
    for g in guards {
        guard::revive(w, g);
        guard::refresh_template(w, g);
    }
    for b in banners {
        banner::change_realm(w, b);
    }
}

/// Tear a keep down: every bound object is removed, its timers stopped and
/// its subscriptions dropped, so nothing dangles after the keep is gone.
pub fn unload(w: &mut SiegeState, keep_id: KeepId) {
    let (guards, banners, doors) = members(w, keep_id);
    for g in guards {
        guard::remove(w, g);
    }
    for d in doors {
        door::remove(w, d);
    }
    for b in banners {
        let was_in_world = w.banner(b).map(|x| x.in_world).unwrap_or(false);
        w.banners.retain(|x| x.id != b);
        if was_in_world {
            w.bus.push(Note::BannerRemoved { banner: b });
        }
    }
    w.timers.stop(TimerKind::ClaimTick(keep_id));
    w.keeps.retain(|k| k.id != keep_id);
}

/// Hourly bookkeeping for a claimed keep; the economy side lives beyond the
/// bus boundary. The tick dies with the claim.
pub(crate) fn claim_tick(w: &mut SiegeState, keep_id: KeepId) {
    let guild = w.keep(keep_id).and_then(|k| k.guild.clone());
    match guild {
        Some(g) => w.bus.push(Note::ClaimTick { keep: keep_id, guild: g.name }),
        None => w.timers.stop(TimerKind::ClaimTick(keep_id)),
    }
}
