//! Build siege state from keep templates and persisted door records.

use anyhow::{Context, Result};
use glam::Vec3;
use keep_data::door_record::DoorRecord;
use keep_data::position::{ComponentRole, KeepTemplate, PositionKind};

use crate::banner::{self, BannerKind};
use crate::component::KeepComponent;
use crate::door::{self, DoorId, KeepDoor};
use crate::guard::{self, GuardClass};
use crate::ident;
use crate::keep::{Keep, KeepId};
use crate::realm::Realm;
use crate::SiegeState;

/// Instantiate a keep and everything bound to it from a template.
pub fn load_keep(w: &mut SiegeState, tpl: &KeepTemplate) -> KeepId {
    let keep_id = KeepId(tpl.keep_id);
    if w.keep(keep_id).is_some() {
        log::warn!("keep {} already loaded; skipping template '{}'", tpl.keep_id, tpl.name);
        return keep_id;
    }
    let realm = Realm::parse(&tpl.realm);
    let origin = Vec3::new(tpl.x, tpl.y, tpl.z);
    let mut keep = Keep::new(keep_id, &tpl.name, realm, tpl.base_level, tpl.tower_index, origin, tpl.heading);
    for c in &tpl.components {
        keep.components.push(KeepComponent {
            id: c.id,
            role: c.role,
            pos: origin + Vec3::new(c.dx, c.dy, c.dz),
            heading: c.heading,
        });
    }
    w.keeps.push(keep);

    let mut doors = 0usize;
    let mut guards = 0usize;
    let mut banners = 0usize;
    for p in &tpl.positions {
        let pos = origin + Vec3::new(p.dx, p.dy, p.dz);
        match p.kind {
            PositionKind::Door => {
                let role = component_role(w, keep_id, p.component);
                let id = DoorId(ident::door_id(
                    tpl.keep_id,
                    u32::from(tpl.tower_index),
                    u32::from(p.component),
                    u32::from(p.sub_index),
                ));
                let attackable = door::attackable_slot(role, p.sub_index);
                let name = door_name(&tpl.name, role);
                let level = w.keep(keep_id).map(|k| k.level).unwrap_or(0);
                let d = KeepDoor::new(
                    id,
                    &name,
                    Some(keep_id),
                    pos,
                    p.heading,
                    attackable,
                    door::max_health_for_level(level),
                );
                if w.doors.register(d) {
                    if let Some(k) = w.keep_mut(keep_id) {
                        k.doors.push(id);
                    }
                    doors += 1;
                }
            }
            PositionKind::Guard => {
                let class = match p.class.as_deref() {
                    Some(s) => GuardClass::parse(s).unwrap_or_else(|| {
                        log::warn!(
                            "unknown guard class '{s}' for '{}'; using fighter",
                            p.template_id
                        );
                        GuardClass::Fighter
                    }),
                    None => GuardClass::Fighter,
                };
                let gid = guard::spawn(w, &p.template_id, class, pos, p.heading);
                if guard::add_to_keep(w, gid, keep_id) {
                    guards += 1;
                } else {
                    guard::remove(w, gid);
                }
            }
            PositionKind::Banner => {
                let kind = match p.banner.as_deref() {
                    Some("guild") => BannerKind::Guild,
                    Some("realm") | None => BannerKind::Realm,
                    Some(other) => {
                        log::warn!("unknown banner kind '{other}' for '{}'; using realm", p.template_id);
                        BannerKind::Realm
                    }
                };
                if banner::spawn(w, keep_id, &p.template_id, kind, pos, p.heading).is_some() {
                    banners += 1;
                }
            }
        }
    }
    log::info!(
        "loaded keep '{}' ({doors} doors, {guards} guards, {banners} banners)",
        tpl.name
    );
    keep_id
}

/// Load a keep template file from `data/` and instantiate it.
pub fn load_keep_file(w: &mut SiegeState, rel: &str) -> Result<KeepId> {
    let tpl = keep_data::loader::load_keep_template(rel)
        .with_context(|| format!("load keep template {rel}"))?;
    Ok(load_keep(w, &tpl))
}

/// Reconstruct a legacy standalone door from its persisted record. It joins
/// the same door lookup as keep doors.
pub fn load_door_record(w: &mut SiegeState, rec: &DoorRecord) -> DoorId {
    let id = DoorId(rec.internal_id);
    let d = KeepDoor::new(
        id,
        &rec.name,
        None,
        Vec3::new(rec.x, rec.y, rec.z),
        rec.heading,
        false,
        door::max_health_for_level(0),
    );
    w.doors.register(d);
    id
}

fn component_role(w: &SiegeState, keep_id: KeepId, component: u8) -> ComponentRole {
    w.keep(keep_id)
        .and_then(|k| k.components.iter().find(|c| c.id == component))
        .map(|c| c.role)
        .unwrap_or_else(|| {
            log::warn!("door position references unknown component {component}; treating as wall");
            ComponentRole::Wall
        })
}

fn door_name(keep_name: &str, role: ComponentRole) -> String {
    match role {
        ComponentRole::Gate => format!("{keep_name} Gate"),
        ComponentRole::Postern => "Postern Door".to_string(),
        _ => format!("{keep_name} Door"),
    }
}
