//! Keep guards and the Lord.
//!
//! Guards are AI-bound defenders registered into their keep's guard table.
//! The Lord is the distinguished guard whose death hands the keep to the
//! killer's realm and who is the sole claim/upgrade interaction point. A
//! keep accepts exactly one Lord; binding a second fails loudly and leaves
//! the first untouched.

use glam::Vec3;

use crate::bus::Note;
use crate::keep::{self, DefenseType, KeepId};
use crate::realm::{are_hostile, Realm};
use crate::{Player, PlayerId, SiegeState, SignalKind, Subscription};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GuardId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GuardClass {
    Fighter,
    Archer,
    Caster,
    Healer,
    Stealther,
    Lord,
}

impl GuardClass {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fighter" => Some(Self::Fighter),
            "archer" => Some(Self::Archer),
            "caster" => Some(Self::Caster),
            "healer" => Some(Self::Healer),
            "stealther" => Some(Self::Stealther),
            "lord" => Some(Self::Lord),
            _ => None,
        }
    }
}

/// Attachment point for the combat AI: the keep back-reference plus aggro
/// defaults. A bound guard is aggressive toward any non-allied realm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuardBrain {
    pub aggro_level: u8,
    pub aggro_range: f32,
    pub keep: Option<KeepId>,
}

impl Default for GuardBrain {
    fn default() -> Self {
        Self { aggro_level: 90, aggro_range: 1500.0, keep: None }
    }
}

#[derive(Debug, Clone)]
pub struct KeepGuard {
    pub id: GuardId,
    pub template_id: String,
    pub class: GuardClass,
    pub name: String,
    pub realm: Realm,
    pub guild_name: String,
    pub level: u8,
    pub hp: i32,
    pub max_hp: i32,
    pub is_male: bool,
    pub pos: Vec3,
    pub heading: f32,
    pub brain: GuardBrain,
    pub alive: bool,
}

impl KeepGuard {
    /// Whether the brain wants this player dead.
    pub fn is_aggressive_toward(&self, p: &Player) -> bool {
        self.brain.keep.is_some()
            && self.alive
            && self.brain.aggro_level > 0
            && are_hostile(self.realm, p.realm)
            && self.pos.distance(p.pos) <= self.brain.aggro_range
    }
}

/// Guard level scales from the keep's base level plus one and a half per
/// keep level; the lord carries a rank bonus on top (half of it in a tower).
pub fn guard_level(class: GuardClass, keep_base: u8, keep_level: u8, is_tower: bool) -> u8 {
    let base = if class == GuardClass::Lord {
        let step = keep_base / 10 + 1;
        if is_tower { keep_base.saturating_add(step) } else { keep_base.saturating_add(step * 2) }
    } else {
        keep_base
    };
    base.saturating_add(keep_level + keep_level / 2)
}

fn guard_max_hp(level: u8) -> i32 {
    200 + i32::from(level) * 20
}

fn guard_name(class: GuardClass, realm: Realm, is_male: bool, keep_name: &str, is_tower: bool) -> String {
    if class == GuardClass::Lord {
        if keep_name.is_empty() {
            return "Commander".to_string();
        }
        if is_tower {
            return "Tower Captain".to_string();
        }
        return if is_male { format!("{keep_name} Lord") } else { format!("{keep_name} Lady") };
    }
    let n = match (realm, class) {
        (Realm::Midgard, GuardClass::Fighter) => "Huscarl",
        (Realm::Midgard, GuardClass::Archer) => "Hunter",
        (Realm::Midgard, GuardClass::Caster) => "Runemaster",
        (Realm::Midgard, GuardClass::Healer) => "Healer",
        (Realm::Midgard, GuardClass::Stealther) => "Shadowblade",
        (Realm::Hibernia, GuardClass::Fighter) => "Guardian",
        (Realm::Hibernia, GuardClass::Archer) => "Ranger",
        (Realm::Hibernia, GuardClass::Caster) => "Eldritch",
        (Realm::Hibernia, GuardClass::Healer) => "Druid",
        (Realm::Hibernia, GuardClass::Stealther) => "Nightshade",
        // Albion titles double as the unowned fallback.
        (_, GuardClass::Fighter) => {
            if is_male { "Armsman" } else { "Armswoman" }
        }
        (_, GuardClass::Archer) => "Scout",
        (_, GuardClass::Caster) => "Wizard",
        (_, GuardClass::Healer) => "Cleric",
        (_, GuardClass::Stealther) => "Infiltrator",
        (_, GuardClass::Lord) => "Lord",
    };
    n.to_string()
}

/// Spawn an unbound guard (admin placement); binding happens in
/// `add_to_keep`.
pub fn spawn(w: &mut SiegeState, template_id: &str, class: GuardClass, pos: Vec3, heading: f32) -> GuardId {
    let id = w.alloc_guard_id();
    let is_male = rand::random::<bool>();
    let level = if class == GuardClass::Lord { 75 } else { 65 };
    let max_hp = guard_max_hp(level);
    let name = guard_name(class, Realm::None, is_male, "", false);
    w.guards.push(KeepGuard {
        id,
        template_id: template_id.to_string(),
        class,
        name,
        realm: Realm::None,
        guild_name: String::new(),
        level,
        hp: max_hp,
        max_hp,
        is_male,
        pos,
        heading,
        brain: GuardBrain::default(),
        alive: true,
    });
    id
}

/// Bind a guard to a keep. Ordinary guards always register; a keep accepts
/// only one Lord and rejects a second candidate without mutating anything.
pub fn add_to_keep(w: &mut SiegeState, id: GuardId, keep_id: KeepId) -> bool {
    let Some((class, template_id)) = w.guard(id).map(|g| (g.class, g.template_id.clone())) else {
        return false;
    };
    {
        let Some(keep) = w.keep_mut(keep_id) else {
            return false;
        };
        if class == GuardClass::Lord {
            if let Some(existing) = keep.lord {
                log::error!(
                    "keep '{}' already has a lord ({:?}); refusing to bind {:?}",
                    keep.name,
                    existing,
                    id
                );
                return false;
            }
            keep.lord = Some(id);
        }
        keep.guards.insert(template_id, id);
    }
    if let Some(g) = w.guard_mut(id) {
        g.brain.keep = Some(keep_id);
    }
    // Subscribe-on-bind; removal must drop these again.
    w.signals.subscribe(Subscription { kind: SignalKind::GuardAttacked, keep: keep_id, guard: id });
    if class == GuardClass::Lord {
        w.signals.subscribe(Subscription { kind: SignalKind::LordKilled, keep: keep_id, guard: id });
    }
    refresh_template(w, id);
    true
}

/// Delete a guard, dropping its keep registration and every signal
/// subscription taken at bind time.
pub fn remove(w: &mut SiegeState, id: GuardId) {
    w.signals.unsubscribe_guard(id);
    let keep_id = w.guard(id).and_then(|g| g.brain.keep);
    if let Some(kid) = keep_id
        && let Some(keep) = w.keep_mut(kid)
    {
        keep.guards.retain(|_, g| *g != id);
        if keep.lord == Some(id) {
            keep.lord = None;
        }
    }
    w.guards.retain(|g| g.id != id);
}

/// Re-derive a bound guard from its keep: realm, guild, level and name all
/// follow the keep's current state.
pub fn refresh_template(w: &mut SiegeState, id: GuardId) {
    let Some(keep_id) = w.guard(id).and_then(|g| g.brain.keep) else {
        return;
    };
    let Some((realm, guild_name, base, level, keep_name, is_tower)) = w.keep(keep_id).map(|k| {
        (
            k.realm,
            k.guild.as_ref().map(|g| g.name.clone()).unwrap_or_default(),
            k.base_level,
            k.level,
            k.name.clone(),
            k.is_tower(),
        )
    }) else {
        return;
    };
    {
        let Some(g) = w.guard_mut(id) else {
            return;
        };
        g.realm = realm;
        g.guild_name = guild_name;
        g.level = guard_level(g.class, base, level, is_tower);
        g.max_hp = guard_max_hp(g.level);
        g.hp = g.hp.min(g.max_hp);
        g.name = guard_name(g.class, realm, g.is_male, &keep_name, is_tower);
    }
    w.bus.push(Note::GuardUpdate { guard: id });
}

/// Bring a guard back whole (reset path — the respawn collapse).
pub fn revive(w: &mut SiegeState, id: GuardId) {
    if let Some(g) = w.guard_mut(id) {
        g.alive = true;
        g.hp = g.max_hp;
    }
}

/// Apply damage from an enemy. The attacked signal marks the keep contested;
/// a lord's death routes into the capture path.
pub fn take_damage(w: &mut SiegeState, id: GuardId, attacker_realm: Realm, amount: i32) {
    let now = w.timers.now_ms();
    let died = {
        let Some(g) = w.guard_mut(id) else {
            return;
        };
        if !g.alive {
            return;
        }
        g.hp = (g.hp - amount.max(0)).max(0);
        if g.hp == 0 {
            g.alive = false;
        }
        g.hp == 0
    };
    if let Some(kid) = w.signals.keep_for(SignalKind::GuardAttacked, id)
        && let Some(k) = w.keep_mut(kid)
    {
        k.last_attacked_ms = now;
    }
    if died {
        die(w, id, attacker_realm);
    }
}

fn die(w: &mut SiegeState, id: GuardId, killer_realm: Realm) {
    // Guild notice with the enemy head-count near the keep.
    let info = w
        .guard(id)
        .and_then(|g| g.brain.keep.map(|kid| (g.name.clone(), g.realm, kid)))
        .and_then(|(name, realm, kid)| {
            w.keep(kid).map(|k| (name, realm, k.name.clone(), k.guild.clone(), k.pos))
        });
    if let Some((guard_name, guard_realm, keep_name, Some(guild), keep_pos)) = info {
        let radius = w.cfg.broadcast_radius;
        let enemies = w
            .players_in_radius(keep_pos, radius)
            .filter(|p| are_hostile(p.realm, guard_realm))
            .count();
        w.bus.push(Note::GuildMessage {
            guild: guild.name,
            text: format!(
                "{guard_name} has been killed in {keep_name} with {enemies} enemy player(s) in the area!"
            ),
        });
    }
    if let Some(kid) = w.signals.keep_for(SignalKind::LordKilled, id) {
        keep::reset(w, kid, killer_realm);
    }
}

/// Lord dialogue menu; ordinary guards have nothing to say here.
pub fn interact(w: &mut SiegeState, id: GuardId, player: PlayerId) -> bool {
    let Some((class, keep_id)) = w.guard(id).map(|g| (g.class, g.brain.keep)) else {
        return false;
    };
    if class != GuardClass::Lord {
        return false;
    }
    let Some(kid) = keep_id else {
        return false;
    };
    let Some((name, level, claimed, is_tower)) =
        w.keep(kid).map(|k| (k.name.clone(), k.level, k.guild.is_some(), k.is_tower()))
    else {
        return false;
    };
    let text = if !claimed {
        format!("Would you like to [Claim] {name} for your guild?")
    } else if is_tower {
        format!("{name} stands at level {level}. Whisper a target level (1-10) to upgrade.")
    } else {
        format!(
            "{name} stands at level {level}. Whisper a target level (1-10) to upgrade, \
             or set the defenses to [melee], [scout] or [caster]."
        )
    };
    w.bus.push(Note::ToPlayer { player, text });
    true
}

/// Whisper keywords drive claim, upgrade and defense-type changes.
pub fn whisper(w: &mut SiegeState, id: GuardId, player: PlayerId, text: &str) -> bool {
    let Some((class, keep_id)) = w.guard(id).map(|g| (g.class, g.brain.keep)) else {
        return false;
    };
    if class != GuardClass::Lord {
        return false;
    }
    let Some(kid) = keep_id else {
        return false;
    };
    let word = text.trim();
    if word.eq_ignore_ascii_case("claim") {
        let claimed = w.keep(kid).map(|k| k.guild.is_some()).unwrap_or(true);
        if claimed {
            w.bus.push(Note::ToPlayer {
                player,
                text: "The keep is already claimed.".to_string(),
            });
            return false;
        }
        if !keep::check_for_claim(w, kid, player) {
            return false;
        }
        keep::claim(w, kid, player);
        return true;
    }
    if let Ok(target) = word.parse::<u8>() {
        return upgrade(w, kid, player, target);
    }
    let defense = match word.to_ascii_lowercase().as_str() {
        "melee" => Some(DefenseType::Melee),
        "scout" => Some(DefenseType::Stealth),
        "caster" => Some(DefenseType::Magic),
        _ => None,
    };
    match defense {
        Some(d) => set_defense(w, kid, player, d),
        None => false,
    }
}

fn upgrade(w: &mut SiegeState, kid: KeepId, player: PlayerId, target: u8) -> bool {
    let Some((level, claimed, name)) =
        w.keep(kid).map(|k| (k.level, k.guild.is_some(), k.name.clone()))
    else {
        return false;
    };
    if !claimed {
        w.bus.push(Note::ToPlayer {
            player,
            text: "The keep must be claimed before it can be upgraded.".to_string(),
        });
        return false;
    }
    if !(1..=10).contains(&target) {
        w.bus.push(Note::ToPlayer {
            player,
            text: "Target level must be between 1 and 10.".to_string(),
        });
        return false;
    }
    if target <= level {
        w.bus.push(Note::ToPlayer {
            player,
            text: format!("{name} is already level {level}."),
        });
        return false;
    }
    keep::change_level(w, kid, target);
    true
}

fn set_defense(w: &mut SiegeState, kid: KeepId, player: PlayerId, defense: DefenseType) -> bool {
    let Some((claimed, is_tower)) = w.keep(kid).map(|k| (k.guild.is_some(), k.is_tower())) else {
        return false;
    };
    if is_tower {
        w.bus.push(Note::ToPlayer {
            player,
            text: "Towers cannot change their defense type.".to_string(),
        });
        return false;
    }
    if !claimed {
        w.bus.push(Note::ToPlayer {
            player,
            text: "The keep must be claimed first.".to_string(),
        });
        return false;
    }
    keep::set_defense_type(w, kid, defense);
    w.bus.push(Note::ToPlayer {
        player,
        text: format!("The keep defenses have been set to {}.", defense.name()),
    });
    true
}
