//! Damage and pickup resolution
//!
//! `apply_hit` is the only place a ship loses health. Shield charges are
//! always spent first, and the hit-stun window keeps a single impact from
//! being counted several frames in a row.

use glam::Vec2;
use rand::Rng;

use super::gadget::GadgetKind;
use super::ship::Ship;
use super::state::{Field, GameEvent, HitScope, Palette, PlayState, Status};
use crate::audio::SoundEffect;
use crate::consts::*;

/// What a hit did to a ship
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Not applied (stunned, paused, game over or already dead)
    Ignored,
    /// A shield charge absorbed it
    Absorbed,
    /// One health lost, still alive
    Damaged,
    /// Last health point lost
    Destroyed,
}

fn hit_gate_open(ship: &Ship, status: &Status, now: u64) -> bool {
    if !ship.is_alive() {
        return false;
    }
    match status.scope {
        HitScope::Session => status.state == PlayState::Playing,
        HitScope::PerShip => !status.is_game_over() && !ship.is_stunned(now),
    }
}

/// Apply one hit to `ship`
pub fn apply_hit(
    ship: &mut Ship,
    status: &mut Status,
    now: u64,
    stun_ms: u64,
    events: &mut Vec<GameEvent>,
) -> HitOutcome {
    if !hit_gate_open(ship, status, now) {
        return HitOutcome::Ignored;
    }

    if ship.shield_charges > 0 {
        ship.shield_charges -= 1;
        events.push(GameEvent::ShieldAbsorbed {
            player: ship.player,
            charges_left: ship.shield_charges,
        });
        events.push(GameEvent::Sound(SoundEffect::ShieldBlock));
        return HitOutcome::Absorbed;
    }

    let resume_at = now + stun_ms;
    status.state = PlayState::HitPause;
    status.resume_at = Some(status.resume_at.map_or(resume_at, |at| at.max(resume_at)));
    ship.stunned_until = Some(resume_at);

    let health_left = ship.take_damage();
    events.push(GameEvent::ShipHit {
        player: ship.player,
        health_left,
    });
    events.push(GameEvent::Sound(SoundEffect::Hit));

    if health_left > 0 {
        return HitOutcome::Damaged;
    }

    log::info!("Player {} ship destroyed", ship.player + 1);
    events.push(GameEvent::ShipDestroyed { player: ship.player });
    events.push(GameEvent::Explosion {
        pos: ship.pos,
        palette: Palette::Metal,
    });
    if status.scope == HitScope::Session {
        status.state = PlayState::GameOver;
        events.push(GameEvent::GameOver);
    }
    HitOutcome::Destroyed
}

/// Apply a collected gadget's effect to `ship`
pub fn apply_gadget<R: Rng + ?Sized>(
    kind: GadgetKind,
    ship: &mut Ship,
    now: u64,
    field: &Field,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) {
    match kind {
        GadgetKind::SpeedBoost => ship.apply_speed_boost(now, SPEED_BOOST_DELTA, BOOST_DURATION_MS),
        GadgetKind::Shield => ship.shield_charges = ship.shield_charges.saturating_add(SHIELD_CHARGES),
        GadgetKind::Teleport => {
            let half = ship.size * 0.5;
            let target = Vec2::new(
                rng.random_range(half.x..=(field.width - half.x).max(half.x)),
                rng.random_range(half.y..=(field.height - half.y).max(half.y)),
            );
            log::debug!("Player {} teleported to {:?}", ship.player + 1, target);
            ship.place(target, field);
        }
        GadgetKind::RapidFire => ship.apply_rapid_fire(now, RAPID_FIRE_COOLDOWN_MS, BOOST_DURATION_MS),
        GadgetKind::Heal => {
            ship.heal();
        }
    }
    events.push(GameEvent::GadgetCollected {
        kind,
        player: ship.player,
    });
    events.push(GameEvent::Sound(SoundEffect::Pickup));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ship::WeaponKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ship() -> Ship {
        Ship::new(0, WeaponKind::Normal, Vec2::new(100.0, 100.0), -std::f32::consts::FRAC_PI_2)
    }

    #[test]
    fn test_hit_enters_hit_pause() {
        let mut s = ship();
        let mut status = Status::new(HitScope::Session);
        let mut events = Vec::new();

        assert_eq!(apply_hit(&mut s, &mut status, 0, 600, &mut events), HitOutcome::Damaged);
        assert_eq!(s.health, SHIP_HEALTH - 1);
        assert_eq!(status.state, PlayState::HitPause);
        assert_eq!(status.resume_at, Some(600));
        assert!(s.is_stunned(0));

        // Invulnerable until the window closes
        assert_eq!(apply_hit(&mut s, &mut status, 300, 600, &mut events), HitOutcome::Ignored);
        assert_eq!(s.health, SHIP_HEALTH - 1);

        status.tick(600);
        s.expire_effects(600);
        assert_eq!(status.state, PlayState::Playing);
        assert!(!s.is_stunned(600));
    }

    #[test]
    fn test_shield_absorbs_without_stun() {
        let mut s = ship();
        s.shield_charges = 1;
        let mut status = Status::new(HitScope::Session);
        let mut events = Vec::new();

        assert_eq!(apply_hit(&mut s, &mut status, 0, 600, &mut events), HitOutcome::Absorbed);
        assert_eq!(s.health, SHIP_HEALTH);
        assert_eq!(s.shield_charges, 0);
        assert_eq!(status.state, PlayState::Playing);
        assert!(s.stunned_until.is_none());
    }

    #[test]
    fn test_solo_death_latches_game_over() {
        let mut s = ship().with_health(1);
        let mut status = Status::new(HitScope::Session);
        let mut events = Vec::new();

        assert_eq!(apply_hit(&mut s, &mut status, 0, 600, &mut events), HitOutcome::Destroyed);
        assert_eq!(status.state, PlayState::GameOver);
        assert!(events.contains(&GameEvent::GameOver));

        status.tick(1000);
        assert_eq!(status.state, PlayState::GameOver);
    }

    #[test]
    fn test_per_ship_scope_allows_both_ships_same_frame() {
        let mut a = ship().with_health(1);
        let mut b = ship().with_health(1);
        b.player = 1;
        let mut status = Status::new(HitScope::PerShip);
        let mut events = Vec::new();

        assert_eq!(apply_hit(&mut a, &mut status, 0, 600, &mut events), HitOutcome::Destroyed);
        assert_eq!(apply_hit(&mut b, &mut status, 0, 600, &mut events), HitOutcome::Destroyed);
        // The session decides game over in multi-ship modes
        assert_eq!(status.state, PlayState::HitPause);
    }

    #[test]
    fn test_heal_gadget_at_full_health() {
        let mut s = ship();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut events = Vec::new();
        apply_gadget(GadgetKind::Heal, &mut s, 0, &Field::default(), &mut rng, &mut events);
        assert_eq!(s.health, s.health_max);
        assert!(events.contains(&GameEvent::GadgetCollected {
            kind: GadgetKind::Heal,
            player: 0
        }));
    }

    #[test]
    fn test_shield_gadget_stacks() {
        let mut s = ship();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut events = Vec::new();
        apply_gadget(GadgetKind::Shield, &mut s, 0, &Field::default(), &mut rng, &mut events);
        apply_gadget(GadgetKind::Shield, &mut s, 0, &Field::default(), &mut rng, &mut events);
        assert_eq!(s.shield_charges, 2 * SHIELD_CHARGES);
    }

    #[test]
    fn test_teleport_stays_in_bounds() {
        let field = Field::new(300.0, 200.0);
        let mut rng = Pcg32::seed_from_u64(42);
        let mut events = Vec::new();
        for _ in 0..50 {
            let mut s = ship();
            apply_gadget(GadgetKind::Teleport, &mut s, 0, &field, &mut rng, &mut events);
            assert!(s.pos.x >= 20.0 && s.pos.x <= 280.0);
            assert!(s.pos.y >= 20.0 && s.pos.y <= 180.0);
        }
    }
}
