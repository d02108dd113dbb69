use glam::Vec3;
use siege_core::guard::{self, GuardClass};
use siege_core::keep::{self, Keep, KeepId};
use siege_core::timers::TimerKind;
use siege_core::{Guild, Note, Realm, SiegeState};

#[test]
fn claimed_keep_emits_hourly_ticks_until_released() {
    let mut w = SiegeState::new();
    let kid = KeepId(12);
    w.keeps.push(Keep::new(kid, "Caer Benowyc", Realm::Albion, 50, 0, Vec3::ZERO, 0.0));
    let lord = guard::spawn(&mut w, "benowyc_lord", GuardClass::Lord, Vec3::ZERO, 0.0);
    guard::add_to_keep(&mut w, lord, kid);

    let p = w.spawn_player("Cedric", Realm::Albion, Vec3::ZERO);
    {
        let pl = w.player_mut(p).unwrap();
        pl.guild = Some(Guild { name: "Iron Wolves".to_string(), emblem: 77 });
        pl.can_claim = true;
    }
    assert!(guard::whisper(&mut w, lord, p, "Claim"));
    w.bus.drain();

    // One hour of game time: one bookkeeping tick for the owning guild.
    w.tick(60 * 60 * 1000);
    let ticks: Vec<String> = w
        .bus
        .drain()
        .into_iter()
        .filter_map(|n| match n {
            Note::ClaimTick { guild, .. } => Some(guild),
            _ => None,
        })
        .collect();
    assert_eq!(ticks, vec!["Iron Wolves".to_string()]);

    keep::release(&mut w, kid);
    assert!(!w.timers.is_alive(TimerKind::ClaimTick(kid)));
    w.bus.drain();
    w.tick(2 * 60 * 60 * 1000);
    assert!(
        !w.bus.drain().iter().any(|n| matches!(n, Note::ClaimTick { .. })),
        "released keeps stop ticking"
    );
}
