//! Authoritative keep-siege control plane: who owns a fortified structure,
//! how it is damaged, repaired, claimed and captured.
//!
//! The simulation is single-owner: every operation takes `&mut SiegeState`,
//! so door health mutation and lord assignment are serialized by
//! construction, and notifications land on the region bus synchronously
//! after each mutation — observers never see a stale percent bucket.

use glam::Vec3;

pub mod banner;
pub mod bus;
pub mod component;
pub mod door;
pub mod guard;
pub mod ident;
pub mod keep;
pub mod realm;
pub mod repair;
pub mod scene;
pub mod timers;

pub use banner::{BannerId, BannerKind, KeepBanner};
pub use bus::{Note, RegionBus};
pub use component::{ComponentRole, KeepComponent};
pub use door::{DamageSource, DoorId, DoorRegistry, DoorState, KeepDoor};
pub use guard::{GuardBrain, GuardClass, GuardId, KeepGuard};
pub use ident::StructureIdent;
pub use keep::{DefenseType, Keep, KeepId};
pub use keep_data::configs::siege::SiegeConfigFile;
pub use realm::Realm;
pub use timers::{RegionTimers, TimerKind};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PlayerId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guild {
    pub name: String,
    pub emblem: u32,
}

/// Minimal observer/actor record: enough surface for interactions, claim
/// checks and radius broadcasts.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub realm: Realm,
    pub guild: Option<Guild>,
    /// Guild rank grants claim permission.
    pub can_claim: bool,
    pub group: Option<u32>,
    pub pos: Vec3,
    pub heading: f32,
    pub mezzed: bool,
    pub stunned: bool,
    /// 1 is a regular player; staff above that bypass realm gates.
    pub priv_level: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SignalKind {
    LordKilled,
    GuardAttacked,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Subscription {
    pub kind: SignalKind,
    pub keep: KeepId,
    pub guard: GuardId,
}

/// Explicit ledger of event subscriptions. Entries are taken when an entity
/// binds and must all be dropped when it is removed; a bind/destroy cycle
/// leaves the ledger exactly as it found it.
#[derive(Default, Debug)]
pub struct SignalLedger {
    subs: Vec<Subscription>,
}

impl SignalLedger {
    pub fn subscribe(&mut self, s: Subscription) {
        if !self.subs.contains(&s) {
            self.subs.push(s);
        }
    }

    pub fn unsubscribe_guard(&mut self, guard: GuardId) {
        self.subs.retain(|s| s.guard != guard);
    }

    /// The keep wired to a (kind, guard) subscription, if any.
    pub fn keep_for(&self, kind: SignalKind, guard: GuardId) -> Option<KeepId> {
        self.subs.iter().find(|s| s.kind == kind && s.guard == guard).map(|s| s.keep)
    }

    pub fn count_for(&self, guard: GuardId) -> usize {
        self.subs.iter().filter(|s| s.guard == guard).count()
    }

    pub fn len(&self) -> usize {
        self.subs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }
}

#[derive(Debug)]
pub struct SiegeState {
    pub cfg: SiegeConfigFile,
    pub keeps: Vec<Keep>,
    pub doors: DoorRegistry,
    pub guards: Vec<KeepGuard>,
    pub banners: Vec<KeepBanner>,
    pub players: Vec<Player>,
    pub signals: SignalLedger,
    pub bus: RegionBus,
    pub timers: RegionTimers,
    next_guard_id: u32,
    next_banner_id: u32,
    next_player_id: u32,
}

impl Default for SiegeState {
    fn default() -> Self {
        Self::new()
    }
}

impl SiegeState {
    pub fn new() -> Self {
        Self::with_config(SiegeConfigFile::default())
    }

    pub fn with_config(cfg: SiegeConfigFile) -> Self {
        Self {
            cfg,
            keeps: Vec::new(),
            doors: DoorRegistry::default(),
            guards: Vec::new(),
            banners: Vec::new(),
            players: Vec::new(),
            signals: SignalLedger::default(),
            bus: RegionBus::default(),
            timers: RegionTimers::default(),
            next_guard_id: 1,
            next_banner_id: 1,
            next_player_id: 1,
        }
    }

    #[inline]
    pub fn keep(&self, id: KeepId) -> Option<&Keep> {
        self.keeps.iter().find(|k| k.id == id)
    }

    #[inline]
    pub fn keep_mut(&mut self, id: KeepId) -> Option<&mut Keep> {
        self.keeps.iter_mut().find(|k| k.id == id)
    }

    #[inline]
    pub fn guard(&self, id: GuardId) -> Option<&KeepGuard> {
        self.guards.iter().find(|g| g.id == id)
    }

    #[inline]
    pub fn guard_mut(&mut self, id: GuardId) -> Option<&mut KeepGuard> {
        self.guards.iter_mut().find(|g| g.id == id)
    }

    #[inline]
    pub fn banner(&self, id: BannerId) -> Option<&KeepBanner> {
        self.banners.iter().find(|b| b.id == id)
    }

    #[inline]
    pub fn banner_mut(&mut self, id: BannerId) -> Option<&mut KeepBanner> {
        self.banners.iter_mut().find(|b| b.id == id)
    }

    #[inline]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    #[inline]
    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn spawn_player(&mut self, name: &str, realm: Realm, pos: Vec3) -> PlayerId {
        let id = PlayerId(self.next_player_id);
        self.next_player_id += 1;
        self.players.push(Player {
            id,
            name: name.to_string(),
            realm,
            guild: None,
            can_claim: false,
            group: None,
            pos,
            heading: 0.0,
            mezzed: false,
            stunned: false,
            priv_level: 1,
        });
        id
    }

    /// Players within `radius` of `pos` (the nearby-observer scope).
    pub fn players_in_radius(&self, pos: Vec3, radius: f32) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(move |p| p.pos.distance(pos) <= radius)
    }

    /// Advance game time and run every region timer that comes due.
    pub fn tick(&mut self, dt_ms: u64) {
        let due = self.timers.advance(dt_ms);
        for t in due {
            match t {
                TimerKind::DoorRepair(d) => repair::tick_door(self, d),
                TimerKind::ClaimTick(k) => keep::claim_tick(self, k),
            }
        }
    }

    pub(crate) fn alloc_guard_id(&mut self) -> GuardId {
        let id = GuardId(self.next_guard_id);
        self.next_guard_id += 1;
        id
    }

    pub(crate) fn alloc_banner_id(&mut self) -> BannerId {
        let id = BannerId(self.next_banner_id);
        self.next_banner_id += 1;
        id
    }
}
