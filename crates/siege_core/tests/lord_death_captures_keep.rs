use glam::Vec3;
use siege_core::banner::{self, BannerKind};
use siege_core::door::{self, DamageSource, DoorId, DoorState, KeepDoor};
use siege_core::guard::{self, GuardClass};
use siege_core::keep::{Keep, KeepId};
use siege_core::timers::TimerKind;
use siege_core::{Guild, Note, Realm, SiegeState, ident};

#[test]
fn killing_the_lord_hands_the_keep_to_the_killers_realm() {
    let mut w = SiegeState::new();
    let kid = KeepId(12);
    w.keeps.push(Keep::new(kid, "Caer Benowyc", Realm::Albion, 50, 0, Vec3::ZERO, 0.0));
    let gate = DoorId(ident::door_id(12, 0, 3, 1));
    w.doors.register(KeepDoor::new(gate, "Caer Benowyc Gate", Some(kid), Vec3::ZERO, 0.0, true, 5000));
    w.keep_mut(kid).unwrap().doors.push(gate);
    let lord = guard::spawn(&mut w, "benowyc_lord", GuardClass::Lord, Vec3::ZERO, 0.0);
    let fighter = guard::spawn(&mut w, "benowyc_fighter", GuardClass::Fighter, Vec3::ZERO, 0.0);
    assert!(guard::add_to_keep(&mut w, lord, kid));
    assert!(guard::add_to_keep(&mut w, fighter, kid));
    let realm_banner =
        banner::spawn(&mut w, kid, "benowyc_realm_banner", BannerKind::Realm, Vec3::ZERO, 0.0).unwrap();
    let guild_banner =
        banner::spawn(&mut w, kid, "benowyc_guild_banner", BannerKind::Guild, Vec3::ZERO, 0.0).unwrap();

    // Claim it so the capture also has a guild to evict.
    let claimer = w.spawn_player("Cedric", Realm::Albion, Vec3::ZERO);
    {
        let p = w.player_mut(claimer).unwrap();
        p.guild = Some(Guild { name: "Iron Wolves".to_string(), emblem: 77 });
        p.can_claim = true;
    }
    assert!(guard::whisper(&mut w, lord, claimer, "Claim"));
    assert!(w.banner(guild_banner).unwrap().in_world);

    // Siege: the gate falls, then the lord.
    w.tick(1000);
    door::take_damage(&mut w, gate, None, DamageSource::Siege, 10_000);
    assert_eq!(w.doors.get(gate).unwrap().state, DoorState::Open);
    w.bus.drain();

    let lord_hp = w.guard(lord).unwrap().hp;
    guard::take_damage(&mut w, lord, Realm::Midgard, lord_hp);

    // Realm flipped, claim evicted, level zeroed.
    let keep = w.keep(kid).unwrap();
    assert_eq!(keep.realm, Realm::Midgard);
    assert_eq!(keep.level, 0);
    assert!(keep.guild.is_none());
    assert_eq!(keep.last_attacked_ms, 0, "capture clears the combat window");
    assert!(!w.timers.is_alive(TimerKind::ClaimTick(kid)));

    // Doors pristine under the new realm, repair process gone.
    let d = w.doors.get(gate).unwrap();
    assert_eq!(d.state, DoorState::Closed);
    assert!(d.is_intact());
    assert!(!siege_core::repair::is_running(&w, gate));
    assert_eq!(door::realm_of(&w, gate), Realm::Midgard);

    // Guards re-derive from the new owner; the lord stands again.
    let g = w.guard(fighter).unwrap();
    assert_eq!(g.realm, Realm::Midgard);
    assert_eq!(g.name, "Huscarl");
    assert!(g.guild_name.is_empty());
    assert!(w.guard(lord).unwrap().alive);

    // Banners re-render: realm colors flip, the guild banner leaves the
    // world instead of hanging blank.
    assert_eq!(w.banner(realm_banner).unwrap().model, banner::MIDGARD_MODEL);
    assert!(!w.banner(guild_banner).unwrap().in_world);

    let notes = w.bus.drain();
    assert!(notes.iter().any(|n| matches!(n,
        Note::Captured { keep, realm: Realm::Midgard } if *keep == kid)));
}
