use glam::Vec3;
use siege_core::guard::{self, GuardClass};
use siege_core::keep::{DefenseType, Keep, KeepId};
use siege_core::timers::TimerKind;
use siege_core::{Guild, Note, Realm, SiegeState};

fn claimable_keep(tower_index: u8) -> (SiegeState, KeepId, siege_core::GuardId) {
    let mut w = SiegeState::new();
    let kid = KeepId(12);
    w.keeps.push(Keep::new(kid, "Caer Benowyc", Realm::Albion, 50, tower_index, Vec3::ZERO, 0.0));
    let lord = guard::spawn(&mut w, "benowyc_lord", GuardClass::Lord, Vec3::ZERO, 0.0);
    assert!(guard::add_to_keep(&mut w, lord, kid));
    (w, kid, lord)
}

fn claimant(w: &mut SiegeState, realm: Realm) -> siege_core::PlayerId {
    let p = w.spawn_player("Cedric", realm, Vec3::ZERO);
    let pl = w.player_mut(p).unwrap();
    pl.guild = Some(Guild { name: "Iron Wolves".to_string(), emblem: 77 });
    pl.can_claim = true;
    p
}

#[test]
fn claim_then_upgrade_then_switch_defenses() {
    let (mut w, kid, lord) = claimable_keep(0);
    let p = claimant(&mut w, Realm::Albion);

    // The menu offers Claim while unclaimed.
    assert!(guard::interact(&mut w, lord, p));
    assert!(w.bus.drain().iter().any(|n| matches!(n,
        Note::ToPlayer { text, .. } if text.contains("[Claim]"))));

    assert!(guard::whisper(&mut w, lord, p, "Claim"));
    let keep = w.keep(kid).unwrap();
    assert_eq!(keep.guild.as_ref().map(|g| g.name.as_str()), Some("Iron Wolves"));
    assert_eq!(keep.level, 1, "claiming raises the keep to level 1");
    assert!(w.timers.is_alive(TimerKind::ClaimTick(kid)));
    assert!(w.bus.drain().iter().any(|n| matches!(n, Note::Claimed { .. })));

    // Upgrades must exceed the current level and stay within 1-10.
    assert!(guard::whisper(&mut w, lord, p, "5"));
    assert_eq!(w.keep(kid).unwrap().level, 5);
    assert!(!guard::whisper(&mut w, lord, p, "3"));
    assert_eq!(w.keep(kid).unwrap().level, 5);
    assert!(!guard::whisper(&mut w, lord, p, "11"));

    // Defense switch maps the keywords onto keep types.
    assert!(guard::whisper(&mut w, lord, p, "scout"));
    assert_eq!(w.keep(kid).unwrap().defense_type, DefenseType::Stealth);
    assert!(guard::whisper(&mut w, lord, p, "caster"));
    assert_eq!(w.keep(kid).unwrap().defense_type, DefenseType::Magic);
    assert!(guard::whisper(&mut w, lord, p, "melee"));
    assert_eq!(w.keep(kid).unwrap().defense_type, DefenseType::Melee);
}

#[test]
fn claim_preconditions_are_enforced() {
    let (mut w, kid, lord) = claimable_keep(0);

    // Wrong realm.
    let invader = claimant(&mut w, Realm::Midgard);
    assert!(!guard::whisper(&mut w, lord, invader, "Claim"));
    assert!(w.keep(kid).unwrap().guild.is_none());

    // No guild.
    let loner = w.spawn_player("Aldis", Realm::Albion, Vec3::ZERO);
    assert!(!guard::whisper(&mut w, lord, loner, "Claim"));
    assert!(w.bus.drain().iter().any(|n| matches!(n,
        Note::ToPlayer { text, .. } if text.contains("guild"))));

    // Grouped claimant needs enough members near the keep.
    let p = claimant(&mut w, Realm::Albion);
    w.player_mut(p).unwrap().group = Some(9);
    assert!(!guard::whisper(&mut w, lord, p, "Claim"));
    assert!(w.bus.drain().iter().any(|n| matches!(n,
        Note::ToPlayer { text, .. } if text.contains("group members"))));

    // Ungrouped the proximity gate does not apply.
    w.player_mut(p).unwrap().group = None;
    assert!(guard::whisper(&mut w, lord, p, "Claim"));
    assert!(w.keep(kid).unwrap().guild.is_some());

    // And a claimed keep refuses another claim.
    let late = claimant(&mut w, Realm::Albion);
    assert!(!guard::whisper(&mut w, lord, late, "Claim"));
}

#[test]
fn towers_cannot_switch_defense_type() {
    let (mut w, kid, lord) = claimable_keep(1);
    let p = claimant(&mut w, Realm::Albion);
    // Towers need half the group count; ungrouped claims skip the check.
    assert!(guard::whisper(&mut w, lord, p, "Claim"));
    assert!(!guard::whisper(&mut w, lord, p, "scout"));
    assert_eq!(w.keep(kid).unwrap().defense_type, DefenseType::Generic);
    assert!(w.bus.drain().iter().any(|n| matches!(n,
        Note::ToPlayer { text, .. } if text.contains("Towers"))));
}
