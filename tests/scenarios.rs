use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use meteor_dodger::consts::*;
use meteor_dodger::session::{DuelSession, DuoSession, Outcome, SoloSession};
use meteor_dodger::sim::{
    EntityManager, Field, GadgetKind, GameEvent, HitOutcome, HitScope, InputSnapshot, MeteoriteKind, PlayState,
    Projectile, Ship, Status, WeaponKind, apply_gadget, apply_hit, steer_ship,
};
use meteor_dodger::tuning::LevelPlan;
use meteor_dodger::{Settings, Tuning};

fn world() -> EntityManager {
    EntityManager::new(Field::new(800.0, 600.0), HitScope::Session, 42)
}

fn ship(weapon: WeaponKind) -> Ship {
    Ship::new(0, weapon, Vec2::new(400.0, 550.0), -FRAC_PI_2)
}

/// Put a projectile where the meteorite will be after its next move
fn aim_at_meteorite(world: &EntityManager, index: usize, ship: &mut Ship) {
    let m = &world.meteorites[index];
    ship.projectiles
        .push(Projectile::new(m.pos + m.vel, -FRAC_PI_2, PROJECTILE_SPEED));
}

fn quiet_tuning() -> Tuning {
    let mut tuning = Tuning {
        levels: vec![LevelPlan {
            duration_ms: 600_000,
            meteor_interval_ms: 1_000_000,
            gadget_interval_ms: 1_000_000,
            ramp_every_ms: 0,
            ..Default::default()
        }],
        ..Default::default()
    };
    tuning.duel_arena.meteor_interval_ms = 1_000_000;
    tuning.duel_arena.gadget_interval_ms = 1_000_000;
    tuning
}

#[test]
fn meteorite_on_ship_costs_one_health_and_pauses() {
    let mut solo = SoloSession::new(quiet_tuning(), Settings::default(), 0);
    let pos = solo.ship.pos;
    solo.world.spawn_meteorite(MeteoriteKind::Normal, pos, None);

    solo.update(&InputSnapshot::default(), FRAME_MS);

    assert_eq!(solo.ship.health, SHIP_HEALTH - 1);
    assert_eq!(solo.world.status.state, PlayState::HitPause);
    assert!(solo.world.meteorites.is_empty());

    // A second meteorite inside the pause window is harmless
    let pos = solo.ship.pos;
    solo.world.spawn_meteorite(MeteoriteKind::Normal, pos, None);
    solo.update(&InputSnapshot::default(), 2 * FRAME_MS);
    assert_eq!(solo.ship.health, SHIP_HEALTH - 1);
}

#[test]
fn duo_game_over_is_reported_exactly_once() {
    let mut duo = DuoSession::new(quiet_tuning(), Settings::default(), 0);
    for s in duo.ships.iter_mut() {
        s.health = 1;
    }
    let positions: Vec<Vec2> = duo.ships.iter().map(|s| s.pos).collect();
    for pos in positions {
        duo.world.spawn_meteorite(MeteoriteKind::Normal, pos, None);
    }
    duo.world
        .spawn_meteorite(MeteoriteKind::Normal, Vec2::new(400.0, 100.0), None);

    let idle = [InputSnapshot::default(); MAX_PLAYERS];
    assert_eq!(duo.update(&idle, FRAME_MS), Outcome::GameOver);
    let survivor = duo.world.meteorites[0].pos;

    for frame in 2..10 {
        assert_eq!(duo.update(&idle, frame * FRAME_MS), Outcome::GameOver);
    }
    assert_eq!(duo.world.meteorites[0].pos, survivor, "entities stop updating");

    let events = duo.drain_events();
    assert_eq!(events.iter().filter(|e| **e == GameEvent::GameOver).count(), 1);
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::ShipDestroyed { .. }))
            .count(),
        2
    );
}

#[test]
fn heal_at_full_health_is_consumed_without_effect() {
    let mut em = world();
    let mut ships = vec![ship(WeaponKind::Normal)];
    let pos = ships[0].pos;
    em.spawn_gadget(GadgetKind::Heal, pos);

    em.update_all(&mut ships, FRAME_MS);

    assert!(em.gadgets.is_empty());
    assert_eq!(ships[0].health, SHIP_HEALTH);
    assert!(em
        .events
        .contains(&GameEvent::GadgetCollected { kind: GadgetKind::Heal, player: 0 }));
}

#[test]
fn shards_meteorite_splits_into_two_final_children() {
    let mut em = world();
    let mut ships = vec![ship(WeaponKind::Normal)];
    em.spawn_meteorite(MeteoriteKind::Shards, Vec2::new(400.0, 200.0), None);
    let parent_id = em.meteorites[0].id;
    aim_at_meteorite(&em, 0, &mut ships[0]);

    em.update_all(&mut ships, FRAME_MS);

    assert_eq!(em.meteorites.len(), 2);
    assert!(em.meteorites.iter().all(|m| m.kind == MeteoriteKind::Shards && !m.can_split));
    assert!(em.meteorites.iter().all(|m| m.id != parent_id));
    assert_ne!(em.meteorites[0].id, em.meteorites[1].id);
    assert_eq!(em.tally.total_kills(), 0, "splitting is not a kill");

    // A child dies to a single hit instead of splitting again
    aim_at_meteorite(&em, 0, &mut ships[0]);
    em.update_all(&mut ships, 2 * FRAME_MS);
    assert_eq!(em.meteorites.len(), 1);
    assert_eq!(em.tally.gold[0], MeteoriteKind::Shards.gold());
}

#[test]
fn split_projectile_splits_only_once() {
    let mut em = world();
    let mut ships = vec![ship(WeaponKind::Split)];
    em.spawn_meteorite(MeteoriteKind::Normal, Vec2::new(400.0, 200.0), None);
    aim_at_meteorite(&em, 0, &mut ships[0]);

    em.update_all(&mut ships, FRAME_MS);
    assert_eq!(em.meteorites.len(), 1, "the splitting hit does no damage");
    assert_eq!(ships[0].projectiles.len(), 2);
    assert!(ships[0].projectiles.iter().all(|p| p.has_split));

    let m = &em.meteorites[0];
    let target = m.pos + m.vel;
    ships[0].projectiles[0].pos = target;
    ships[0].projectiles[1].pos = Vec2::new(50.0, 50.0);

    em.update_all(&mut ships, 2 * FRAME_MS);
    assert!(em.meteorites.is_empty());
    assert_eq!(ships[0].projectiles.len(), 1);
    assert_eq!(em.tally.kills[0], 1);
}

#[test]
fn pierce_projectile_survives_every_hit() {
    let mut em = world();
    let mut ships = vec![ship(WeaponKind::Pierce)];
    em.spawn_meteorite(MeteoriteKind::Normal, Vec2::new(400.0, 300.0), None);
    em.spawn_meteorite(MeteoriteKind::Tough, Vec2::new(400.0, 200.0), None);
    aim_at_meteorite(&em, 0, &mut ships[0]);

    em.update_all(&mut ships, FRAME_MS);
    assert_eq!(ships[0].projectiles.len(), 1);
    assert_eq!(em.meteorites.len(), 1);

    for frame in 2..7 {
        let tough = &em.meteorites[0];
        ships[0].projectiles[0].pos = tough.pos + tough.vel;
        em.update_all(&mut ships, frame * FRAME_MS);
        assert_eq!(ships[0].projectiles.len(), 1);
    }
    assert!(em.meteorites.is_empty());
    assert_eq!(em.tally.kills[0], 2);
}

#[test]
fn pierce_projectile_splits_shards_and_survives() {
    let mut em = world();
    let mut ships = vec![ship(WeaponKind::Pierce)];
    em.spawn_meteorite(MeteoriteKind::Shards, Vec2::new(400.0, 200.0), None);
    aim_at_meteorite(&em, 0, &mut ships[0]);

    em.update_all(&mut ships, FRAME_MS);

    assert_eq!(em.meteorites.len(), 2);
    assert!(em.meteorites.iter().all(|m| !m.can_split));
    assert_eq!(ships[0].projectiles.len(), 1);
    assert_eq!(em.tally.total_kills(), 0);
}

#[test]
fn dynamite_follows_the_clock_not_the_frame_count() {
    let mut em = world();
    let mut ships = vec![ship(WeaponKind::Normal)];
    em.spawn_meteorite(MeteoriteKind::Dynamite, Vec2::new(400.0, 500.0), None);
    em.meteorites[0].vel = Vec2::ZERO;

    // One frame late in wall time is still one update
    em.update_all(&mut ships, 4_000);
    assert!(!em.meteorites[0].shaking);
    em.update_all(&mut ships, 4_500);
    assert!(em.meteorites[0].shaking);
    em.update_all(&mut ships, 9_000);
    assert!(em.meteorites.is_empty());
    assert_eq!(ships[0].health, SHIP_HEALTH - 1);
}

#[test]
fn ship_on_its_last_dash_tick_ignores_a_blast() {
    let mut em = world();
    let mut ships = vec![ship(WeaponKind::Normal)];
    em.spawn_meteorite(MeteoriteKind::Dynamite, Vec2::new(400.0, 500.0), None);
    em.meteorites[0].vel = Vec2::ZERO;
    em.update_all(&mut ships, 4_500);
    assert!(em.meteorites[0].shaking);

    let dash = InputSnapshot {
        dash: true,
        left: true,
        ..Default::default()
    };
    let field = em.field;
    steer_ship(&mut ships[0], &dash, &field, 8_000, &mut em.events);
    for tick in 1..u64::from(DASH_TICKS) {
        steer_ship(&mut ships[0], &InputSnapshot::default(), &field, 8_000 + tick, &mut em.events);
    }
    assert!(ships[0].is_dashing());
    // Back inside the blast radius for the detonation frame
    ships[0].pos = Vec2::new(400.0, 550.0);

    em.update_all(&mut ships, 9_000);
    assert!(em.meteorites.is_empty(), "dynamite detonated");
    assert_eq!(ships[0].health, SHIP_HEALTH);

    em.begin_frame(&mut ships, 9_016);
    assert!(!ships[0].is_dashing());
}

#[test]
fn shield_absorbs_one_hit_per_charge() {
    let mut s = ship(WeaponKind::Normal);
    let mut status = Status::new(HitScope::Session);
    let mut events = Vec::new();
    let mut rng = Pcg32::seed_from_u64(1);
    apply_gadget(GadgetKind::Shield, &mut s, 0, &Field::default(), &mut rng, &mut events);

    for _ in 0..SHIELD_CHARGES {
        assert_eq!(apply_hit(&mut s, &mut status, 0, HIT_STUN_MS, &mut events), HitOutcome::Absorbed);
        assert_eq!(status.state, PlayState::Playing);
    }
    assert_eq!(s.health, SHIP_HEALTH);
    assert_eq!(apply_hit(&mut s, &mut status, 0, HIT_STUN_MS, &mut events), HitOutcome::Damaged);
    assert_eq!(s.health, SHIP_HEALTH - 1);
}

#[test]
fn timed_gadgets_restore_ship_afterwards() {
    let mut s = ship(WeaponKind::Normal);
    let mut events = Vec::new();
    let mut rng = Pcg32::seed_from_u64(1);
    let field = Field::default();

    apply_gadget(GadgetKind::RapidFire, &mut s, 0, &field, &mut rng, &mut events);
    apply_gadget(GadgetKind::SpeedBoost, &mut s, 0, &field, &mut rng, &mut events);
    assert_eq!(s.fire_cooldown_ms, RAPID_FIRE_COOLDOWN_MS);
    assert!(s.speed > SHIP_SPEED);

    s.expire_effects(BOOST_DURATION_MS);
    assert_eq!(s.fire_cooldown_ms, FIRE_COOLDOWN_MS);
    assert_eq!(s.speed, SHIP_SPEED);
}

#[test]
fn teleport_lands_inside_the_field() {
    let field = Field::new(300.0, 200.0);
    let mut rng = Pcg32::seed_from_u64(9);
    let mut events = Vec::new();
    for _ in 0..100 {
        let mut s = Ship::new(0, WeaponKind::Normal, Vec2::new(150.0, 100.0), 0.0);
        apply_gadget(GadgetKind::Teleport, &mut s, 0, &field, &mut rng, &mut events);
        assert!(s.pos.x >= s.size.x / 2.0 && s.pos.x <= field.width - s.size.x / 2.0);
        assert!(s.pos.y >= s.size.y / 2.0 && s.pos.y <= field.height - s.size.y / 2.0);
    }
}

#[test]
fn duel_is_won_by_shooting_the_opponent() {
    let mut duel = DuelSession::new(quiet_tuning(), Settings::default(), 0);
    let fire = InputSnapshot {
        shoot: true,
        ..Default::default()
    };

    let mut rounds = Vec::new();
    let mut now = 0;
    let outcome = loop {
        now += FRAME_MS;
        assert!(now < 120_000, "match should finish");
        match duel.update(&[fire, InputSnapshot::default()], now) {
            Outcome::RoundOver { winner } => rounds.push(winner),
            Outcome::MatchOver { winner } => break winner,
            _ => {}
        }
    };

    assert_eq!(outcome, 0);
    assert_eq!(rounds, vec![Some(0); usize::from(ROUNDS_TO_WIN) - 1]);
    assert_eq!(duel.wins, [ROUNDS_TO_WIN, 0]);
}

#[test]
fn same_seed_same_game() {
    let run = || {
        let mut solo = SoloSession::new(Tuning::default(), Settings::default(), 0);
        let input = InputSnapshot {
            shoot: true,
            ..Default::default()
        };
        for frame in 1..=1_000 {
            if solo.update(&input, frame * FRAME_MS) == Outcome::GameOver {
                break;
            }
        }
        let positions: Vec<(MeteoriteKind, Vec2)> = solo.world.meteorites.iter().map(|m| (m.kind, m.pos)).collect();
        (positions, solo.ship.health, solo.gold())
    };
    assert_eq!(run(), run());
}

#[test]
fn huge_spawn_weights_do_not_overflow() {
    let json = r#"{
        "levels": [{
            "meteor_interval_ms": 16,
            "min_meteor_interval_ms": 16,
            "meteorites": [
                {"kind": "normal", "weight": 4294967295},
                {"kind": "tough", "weight": 1}
            ]
        }]
    }"#;
    let tuning = Tuning::from_json(json).unwrap();
    let mut solo = SoloSession::new(tuning, Settings::default(), 0);
    for frame in 1..=20 {
        solo.update(&InputSnapshot::default(), frame * FRAME_MS);
    }
    assert!(!solo.world.meteorites.is_empty());
}

#[test]
fn particle_events_follow_the_setting() {
    let hit_events = |particles: bool| {
        let settings = Settings {
            particles,
            ..Default::default()
        };
        let mut solo = SoloSession::new(quiet_tuning(), settings, 0);
        let pos = solo.ship.pos;
        solo.world.spawn_meteorite(MeteoriteKind::Normal, pos, None);
        solo.update(&InputSnapshot::default(), FRAME_MS);
        solo.drain_events()
    };

    let with = hit_events(true);
    assert!(with.iter().any(GameEvent::is_particle));

    let without = hit_events(false);
    assert!(!without.iter().any(GameEvent::is_particle));
    assert!(without.iter().any(|e| matches!(e, GameEvent::ShipHit { player: 0, .. })));
}
