//! Player ships: movement, firing, timed effects and dash

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::projectile::Projectile;
use super::state::Field;
use crate::consts::*;
use crate::heading;

/// Firing behavior of a ship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeaponKind {
    #[default]
    Normal,
    /// Three shots in a fan
    Spread,
    /// Shots bounce off the field edges
    Ricochet,
    /// Shots split in two on their first meteorite hit
    Split,
    /// Shots pass through meteorites
    Pierce,
}

/// Active speed boost; `delta` is removed again on expiry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedBoost {
    pub delta: f32,
    pub expires_at: u64,
}

/// Active fire-rate boost; the previous cooldown is restored on expiry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RapidFire {
    pub previous_cooldown_ms: u64,
    pub expires_at: u64,
}

/// Dash in progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dash {
    pub dir: Vec2,
    pub ticks_left: u32,
}

/// A player-controlled ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    /// Player slot (0 or 1); kill credit goes here
    pub player: usize,
    pub weapon: WeaponKind,
    pub pos: Vec2,
    /// Firing direction (radians); -π/2 fires up the screen
    pub facing: f32,
    pub size: Vec2,
    pub health: u8,
    pub health_max: u8,
    pub speed: f32,
    pub fire_cooldown_ms: u64,
    pub last_shot_at: Option<u64>,
    pub projectiles: Vec<Projectile>,
    pub shield_charges: u8,
    pub speed_boost: Option<SpeedBoost>,
    pub rapid_fire: Option<RapidFire>,
    pub dash: Option<Dash>,
    pub dash_ready_at: u64,
    /// End of the hit-stun window; the ship shakes until then
    pub stunned_until: Option<u64>,
    /// Optional vertical confinement for the ship center (duel halves)
    pub lane: Option<(f32, f32)>,
}

impl Ship {
    pub fn new(player: usize, weapon: WeaponKind, pos: Vec2, facing: f32) -> Self {
        Self {
            player,
            weapon,
            pos,
            facing,
            size: Vec2::splat(SHIP_SIZE),
            health: SHIP_HEALTH,
            health_max: SHIP_HEALTH,
            speed: SHIP_SPEED,
            fire_cooldown_ms: FIRE_COOLDOWN_MS,
            last_shot_at: None,
            projectiles: Vec::new(),
            shield_charges: 0,
            speed_boost: None,
            rapid_fire: None,
            dash: None,
            dash_ready_at: 0,
            stunned_until: None,
            lane: None,
        }
    }

    /// Set current and maximum health
    pub fn with_health(mut self, health: u8) -> Self {
        self.health = health;
        self.health_max = health;
        self
    }

    pub fn with_lane(mut self, min_y: f32, max_y: f32) -> Self {
        self.lane = Some((min_y, max_y));
        self
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Collision radius when the ship is treated as a circle
    #[inline]
    pub fn radius(&self) -> f32 {
        self.size.x / 2.0
    }

    #[inline]
    pub fn is_dashing(&self) -> bool {
        self.dash.is_some()
    }

    #[inline]
    pub fn is_stunned(&self, now: u64) -> bool {
        self.stunned_until.is_some_and(|until| now < until)
    }

    /// Lose one health point; returns the remaining health
    pub fn take_damage(&mut self) -> u8 {
        self.health = self.health.saturating_sub(1);
        self.health
    }

    /// +1 health unless already full; returns whether anything changed
    pub fn heal(&mut self) -> bool {
        if self.health < self.health_max {
            self.health += 1;
            true
        } else {
            false
        }
    }

    /// Re-applying an active boost only extends it
    pub fn apply_speed_boost(&mut self, now: u64, delta: f32, duration_ms: u64) {
        let expires_at = now + duration_ms;
        match &mut self.speed_boost {
            Some(boost) => boost.expires_at = expires_at,
            None => {
                self.speed += delta;
                self.speed_boost = Some(SpeedBoost { delta, expires_at });
            }
        }
    }

    /// Re-applying an active boost only extends it, keeping the original
    /// cooldown to restore
    pub fn apply_rapid_fire(&mut self, now: u64, cooldown_ms: u64, duration_ms: u64) {
        let expires_at = now + duration_ms;
        match &mut self.rapid_fire {
            Some(rapid) => rapid.expires_at = expires_at,
            None => {
                self.rapid_fire = Some(RapidFire {
                    previous_cooldown_ms: self.fire_cooldown_ms,
                    expires_at,
                });
                self.fire_cooldown_ms = cooldown_ms;
            }
        }
    }

    /// Revert timed effects whose expiry has passed and end the stun window
    pub fn expire_effects(&mut self, now: u64) {
        if let Some(boost) = self.speed_boost {
            if now >= boost.expires_at {
                self.speed -= boost.delta;
                self.speed_boost = None;
            }
        }
        if let Some(rapid) = self.rapid_fire {
            if now >= rapid.expires_at {
                self.fire_cooldown_ms = rapid.previous_cooldown_ms;
                self.rapid_fire = None;
            }
        }
        if self.stunned_until.is_some_and(|until| now >= until) {
            self.stunned_until = None;
        }
        self.clear_spent_dash();
    }

    /// Drop a dash whose last step was taken on an earlier tick
    pub fn clear_spent_dash(&mut self) {
        if self.dash.is_some_and(|d| d.ticks_left == 0) {
            self.dash = None;
        }
    }

    fn confine(&mut self, field: &Field) {
        self.pos = field.clamp_box(self.pos, self.size);
        if let Some((min_y, max_y)) = self.lane {
            self.pos.y = self.pos.y.clamp(min_y, max_y);
        }
    }

    /// Move along `dir` (any length) at the current speed, staying in bounds
    pub fn move_by(&mut self, dir: Vec2, field: &Field) {
        if let Some(dir) = dir.try_normalize() {
            self.pos += dir * self.speed;
        }
        self.confine(field);
    }

    /// Relocate, staying in bounds
    pub fn place(&mut self, pos: Vec2, field: &Field) {
        self.pos = pos;
        self.confine(field);
    }

    /// Start a dash along `dir`; refused while dashing, on cooldown, or
    /// without a direction
    pub fn start_dash(&mut self, dir: Vec2, now: u64) -> bool {
        if self.dash.is_some_and(|d| d.ticks_left > 0) || now < self.dash_ready_at {
            return false;
        }
        let Some(dir) = dir.try_normalize() else {
            return false;
        };
        self.dash = Some(Dash {
            dir,
            ticks_left: DASH_TICKS,
        });
        self.dash_ready_at = now + DASH_COOLDOWN_MS;
        true
    }

    /// Apply one dash step. After the last step the dash stays spent (still
    /// blast-exempt) until the start of the next tick clears it.
    pub fn advance_dash(&mut self, field: &Field) {
        let Some(dash) = self.dash.as_mut() else {
            return;
        };
        if dash.ticks_left == 0 {
            return;
        }
        dash.ticks_left -= 1;
        let step = dash.dir * DASH_STEP;
        self.pos += step;
        self.confine(field);
    }

    pub fn can_fire(&self, now: u64) -> bool {
        self.is_alive()
            && self
                .last_shot_at
                .is_none_or(|last| now >= last + self.fire_cooldown_ms)
    }

    /// Fire according to the weapon kind; returns the number of projectiles
    /// spawned (0 while on cooldown)
    pub fn fire(&mut self, now: u64) -> usize {
        if !self.can_fire(now) {
            return 0;
        }
        self.last_shot_at = Some(now);

        let nose = self.pos + heading(self.facing) * (self.size.y / 2.0);
        let before = self.projectiles.len();
        match self.weapon {
            WeaponKind::Spread => {
                for delta in [-SPREAD_ANGLE, 0.0, SPREAD_ANGLE] {
                    self.projectiles
                        .push(Projectile::new(nose, self.facing + delta, PROJECTILE_SPEED));
                }
            }
            WeaponKind::Ricochet => {
                self.projectiles.push(
                    Projectile::new(nose, self.facing, PROJECTILE_SPEED)
                        .with_bounces(RICOCHET_BOUNCES),
                );
            }
            WeaponKind::Normal | WeaponKind::Split | WeaponKind::Pierce => {
                self.projectiles
                    .push(Projectile::new(nose, self.facing, PROJECTILE_SPEED));
            }
        }
        self.projectiles.len() - before
    }

    /// Move owned projectiles and drop the ones that left the field
    pub fn advance_projectiles(&mut self, field: &Field) {
        for p in self.projectiles.iter_mut() {
            p.advance(field);
        }
        self.projectiles.retain(|p| !p.dead);
    }
}
