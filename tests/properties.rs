use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use meteor_dodger::consts::*;
use meteor_dodger::level::pick_weighted;
use meteor_dodger::sim::{
    Field, HitScope, InputSnapshot, Projectile, Ship, Status, WeaponKind, apply_hit, steer_ship,
};
use meteor_dodger::tuning::SpawnEntry;

fn ship() -> Ship {
    Ship::new(0, WeaponKind::Normal, Vec2::new(400.0, 300.0), -FRAC_PI_2)
}

proptest! {
    #[test]
    fn health_stays_within_bounds(ops in prop::collection::vec(any::<bool>(), 0..64)) {
        let mut s = ship();
        for hit in ops {
            if hit {
                s.take_damage();
            } else {
                s.heal();
            }
            prop_assert!(s.health <= s.health_max);
        }
    }

    #[test]
    fn zero_weight_entries_are_never_picked(
        weights in prop::collection::vec(0u32..5, 1..8),
        seed in any::<u64>(),
    ) {
        let table: Vec<SpawnEntry<usize>> = weights
            .iter()
            .enumerate()
            .map(|(i, &w)| SpawnEntry::new(i, w))
            .collect();
        let mut rng = Pcg32::seed_from_u64(seed);
        for _ in 0..32 {
            match pick_weighted(&table, &mut rng) {
                Some(i) => prop_assert!(weights[i] > 0),
                None => prop_assert!(weights.iter().all(|&w| w == 0)),
            }
        }
    }

    #[test]
    fn shields_absorb_before_health(charges in 0u8..6, hits in 0u8..10) {
        let mut s = ship().with_health(5);
        s.shield_charges = charges;
        let mut status = Status::new(HitScope::PerShip);
        let mut events = Vec::new();

        // Hits spaced past the stun window so none are gated
        for i in 0..u64::from(hits) {
            apply_hit(&mut s, &mut status, i * (HIT_STUN_MS + 1), HIT_STUN_MS, &mut events);
        }

        let absorbed = charges.min(hits);
        prop_assert_eq!(s.shield_charges, charges - absorbed);
        prop_assert_eq!(s.health, 5u8.saturating_sub(hits - absorbed));
    }

    #[test]
    fn ship_never_leaves_the_field(
        moves in prop::collection::vec((any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()), 0..200),
    ) {
        let field = Field::default();
        let mut s = ship();
        let mut events = Vec::new();
        for (i, (up, down, left, right, dash)) in moves.into_iter().enumerate() {
            let input = InputSnapshot { up, down, left, right, dash, shoot: false };
            steer_ship(&mut s, &input, &field, i as u64 * FRAME_MS, &mut events);
            let half = s.size / 2.0;
            prop_assert!(s.pos.x >= half.x && s.pos.x <= field.width - half.x);
            prop_assert!(s.pos.y >= half.y && s.pos.y <= field.height - half.y);
        }
    }

    #[test]
    fn ricochet_stays_in_field_until_spent(angle in -3.1f32..3.1, x in 1.0f32..799.0, y in 1.0f32..599.0) {
        let field = Field::default();
        let mut p = Projectile::new(Vec2::new(x, y), angle, PROJECTILE_SPEED).with_bounces(RICOCHET_BOUNCES);
        for _ in 0..1_000 {
            p.advance(&field);
            if p.dead {
                break;
            }
            prop_assert!(field.contains(p.pos));
        }
    }
}
