use glam::Vec3;
use siege_core::door::{self, DamageSource, DoorId, KeepDoor};
use siege_core::keep::{Keep, KeepId};
use siege_core::{Note, Realm, SiegeState, ident};

#[test]
fn health_updates_only_on_bucket_change() {
    let mut w = SiegeState::new();
    let kid = KeepId(12);
    w.keeps.push(Keep::new(kid, "Caer Benowyc", Realm::Albion, 50, 0, Vec3::ZERO, 0.0));
    let id = DoorId(ident::door_id(12, 0, 3, 1));
    w.doors.register(KeepDoor::new(id, "Caer Benowyc Gate", Some(kid), Vec3::ZERO, 0.0, true, 1000));
    w.keep_mut(kid).unwrap().doors.push(id);

    // 1000 -> 995 still rounds to 100%: no health note.
    door::take_damage(&mut w, id, None, DamageSource::Melee, 5);
    assert!(!w.bus.drain().iter().any(|n| matches!(n, Note::DoorHealth { .. })));

    // One more point drops the rounded bucket to 99%.
    door::take_damage(&mut w, id, None, DamageSource::Melee, 1);
    let notes = w.bus.drain();
    let pcts: Vec<u8> = notes
        .iter()
        .filter_map(|n| match n {
            Note::DoorHealth { pct, .. } => Some(*pct),
            _ => None,
        })
        .collect();
    assert_eq!(pcts, vec![99]);

    // Hammering away inside the same bucket stays quiet.
    door::take_damage(&mut w, id, None, DamageSource::Melee, 2);
    assert!(!w.bus.drain().iter().any(|n| matches!(n, Note::DoorHealth { .. })));
}
