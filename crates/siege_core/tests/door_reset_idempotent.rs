use glam::Vec3;
use siege_core::door::{self, DamageSource, DoorId, DoorState, KeepDoor};
use siege_core::{Realm, SiegeState};

#[test]
fn reset_twice_lands_in_the_same_state() {
    let mut w = SiegeState::new();
    // Standalone door so the forced realm is observable directly.
    let id = DoorId(42);
    w.doors.register(KeepDoor::new(id, "Outpost Gate", None, Vec3::ZERO, 0.0, true, 800));

    door::take_damage(&mut w, id, None, DamageSource::Melee, 800);
    assert_eq!(w.doors.get(id).unwrap().state, DoorState::Open);

    door::reset(&mut w, id, Realm::Hibernia);
    let first = {
        let d = w.doors.get(id).unwrap();
        (d.state, d.health(), door::realm_of(&w, id))
    };
    assert_eq!(first, (DoorState::Closed, 800, Realm::Hibernia));
    assert!(!siege_core::repair::is_running(&w, id), "reset ends the repair process");

    door::reset(&mut w, id, Realm::Hibernia);
    let second = {
        let d = w.doors.get(id).unwrap();
        (d.state, d.health(), door::realm_of(&w, id))
    };
    assert_eq!(second, first);
}
