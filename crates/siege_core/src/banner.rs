//! Keep banners: passive display of realm and guild ownership.
//!
//! A realm banner always shows the keep's realm colors. A guild banner only
//! exists while a guild holds the keep; unowned it is pulled from the world
//! rather than shown blank.

use glam::Vec3;

use crate::bus::Note;
use crate::keep::KeepId;
use crate::realm::Realm;
use crate::SiegeState;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BannerId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BannerKind {
    Realm,
    Guild,
}

// Unclaimed display models, one per realm.
pub const NO_REALM_MODEL: u16 = 555;
pub const ALBION_MODEL: u16 = 464;
pub const MIDGARD_MODEL: u16 = 465;
pub const HIBERNIA_MODEL: u16 = 466;
// Claimed (guild) model set.
pub const ALBION_GUILD_MODEL: u16 = 679;
pub const MIDGARD_GUILD_MODEL: u16 = 681;
pub const HIBERNIA_GUILD_MODEL: u16 = 680;

#[derive(Debug, Clone)]
pub struct KeepBanner {
    pub id: BannerId,
    pub template_id: String,
    pub kind: BannerKind,
    pub keep: KeepId,
    pub model: u16,
    /// Only meaningful on guild banners.
    pub emblem: u32,
    pub name: String,
    pub pos: Vec3,
    pub heading: f32,
    pub in_world: bool,
}

fn realm_model(realm: Realm) -> u16 {
    match realm {
        Realm::None => NO_REALM_MODEL,
        Realm::Albion => ALBION_MODEL,
        Realm::Midgard => MIDGARD_MODEL,
        Realm::Hibernia => HIBERNIA_MODEL,
    }
}

fn guild_model(realm: Realm) -> u16 {
    match realm {
        Realm::None => NO_REALM_MODEL,
        Realm::Albion => ALBION_GUILD_MODEL,
        Realm::Midgard => MIDGARD_GUILD_MODEL,
        Realm::Hibernia => HIBERNIA_GUILD_MODEL,
    }
}

/// Bind a banner to a keep. Two banners resolving to the same template key
/// on one keep is a data error: the second load is rejected, never silently
/// overwritten.
pub fn spawn(
    w: &mut SiegeState,
    keep_id: KeepId,
    template_id: &str,
    kind: BannerKind,
    pos: Vec3,
    heading: f32,
) -> Option<BannerId> {
    {
        let Some(keep) = w.keep(keep_id) else {
            return None;
        };
        if keep.banners.contains_key(template_id) {
            log::error!(
                "keep '{}' already has a banner for template '{template_id}'; refusing duplicate",
                keep.name
            );
            return None;
        }
    }
    let id = w.alloc_banner_id();
    w.banners.push(KeepBanner {
        id,
        template_id: template_id.to_string(),
        kind,
        keep: keep_id,
        model: NO_REALM_MODEL,
        emblem: 0,
        name: String::new(),
        pos,
        heading,
        in_world: true,
    });
    if let Some(keep) = w.keep_mut(keep_id) {
        keep.banners.insert(template_id.to_string(), id);
    }
    render(w, id);
    Some(id)
}

/// Re-render after the keep's realm changed.
pub fn change_realm(w: &mut SiegeState, id: BannerId) {
    render(w, id);
}

/// Re-render after the keep's guild changed.
pub fn change_guild(w: &mut SiegeState, id: BannerId) {
    render(w, id);
}

fn render(w: &mut SiegeState, id: BannerId) {
    let Some((keep_id, kind)) = w.banner(id).map(|b| (b.keep, b.kind)) else {
        return;
    };
    let Some((realm, guild)) = w.keep(keep_id).map(|k| (k.realm, k.guild.clone())) else {
        return;
    };
    let mut updated = false;
    let mut removed = false;
    {
        let Some(b) = w.banner_mut(id) else {
            return;
        };
        match kind {
            BannerKind::Realm => {
                b.model = realm_model(realm);
                b.name = if realm == Realm::None {
                    "Banner".to_string()
                } else {
                    format!("{} Banner", realm.name())
                };
                b.in_world = true;
                updated = true;
            }
            BannerKind::Guild => match guild {
                Some(g) => {
                    b.model = guild_model(realm);
                    b.emblem = g.emblem;
                    b.name = if realm == Realm::None {
                        "Guild Banner".to_string()
                    } else {
                        format!("{} Guild Banner", realm.name())
                    };
                    b.in_world = true;
                    updated = true;
                }
                None => {
                    if b.in_world {
                        b.in_world = false;
                        removed = true;
                    }
                }
            },
        }
    }
    if updated {
        w.bus.push(Note::BannerUpdate { banner: id });
    }
    if removed {
        w.bus.push(Note::BannerRemoved { banner: id });
    }
}
