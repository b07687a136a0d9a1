//! Patrolling enemy gunships

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::projectile::Projectile;
use super::state::Field;
use crate::angle_towards;
use crate::consts::*;

/// An enemy patrolling horizontally and shooting at its target ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    pub health: u8,
    /// +1 moving right, -1 moving left
    pub dir: f32,
    pub speed: f32,
    /// Facing toward the current target
    pub angle: f32,
    pub fire_cooldown_ms: u64,
    pub next_shot_at: u64,
    pub projectiles: Vec<Projectile>,
    pub shake_until: Option<u64>,
    pub dead: bool,
}

impl Enemy {
    pub fn new(id: u32, pos: Vec2, now: u64) -> Self {
        Self {
            id,
            pos,
            size: ENEMY_SIZE,
            health: ENEMY_HEALTH,
            dir: 1.0,
            speed: ENEMY_SPEED,
            angle: std::f32::consts::FRAC_PI_2,
            fire_cooldown_ms: ENEMY_FIRE_COOLDOWN_MS,
            next_shot_at: now + ENEMY_FIRE_COOLDOWN_MS,
            projectiles: Vec::new(),
            shake_until: None,
            dead: false,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    pub fn is_shaking(&self, now: u64) -> bool {
        self.shake_until.is_some_and(|until| now < until)
    }

    /// Move along the patrol axis, reversing at the field edges
    pub fn patrol(&mut self, field: &Field) {
        let half = self.radius();
        self.pos.x += self.dir * self.speed;
        if self.pos.x - half <= 0.0 {
            self.pos.x = half;
            self.dir = 1.0;
        } else if self.pos.x + half >= field.width {
            self.pos.x = field.width - half;
            self.dir = -1.0;
        }
    }

    pub fn aim_at(&mut self, target: Vec2) {
        self.angle = angle_towards(self.pos, target);
    }

    /// Fire along the current facing if the cooldown has elapsed
    pub fn try_fire(&mut self, now: u64) -> bool {
        if now < self.next_shot_at {
            return false;
        }
        self.next_shot_at = now + self.fire_cooldown_ms;
        self.projectiles
            .push(Projectile::new(self.pos, self.angle, ENEMY_PROJECTILE_SPEED));
        true
    }

    pub fn advance_projectiles(&mut self, field: &Field) {
        for p in self.projectiles.iter_mut() {
            p.advance(field);
        }
        self.projectiles.retain(|p| !p.dead);
    }

    /// Take one hit; returns true when this destroyed the enemy
    pub fn hit(&mut self, now: u64) -> bool {
        self.health = self.health.saturating_sub(1);
        self.shake_until = Some(now + ENEMY_SHAKE_MS);
        if self.health == 0 {
            self.dead = true;
        }
        self.dead
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patrol_reverses_at_edges() {
        let field = Field::new(200.0, 600.0);
        let mut e = Enemy::new(1, Vec2::new(175.0, 50.0), 0);
        e.patrol(&field);
        assert_eq!(e.dir, -1.0);
        assert_eq!(e.pos.x, 176.0);

        e.pos.x = 25.0;
        e.patrol(&field);
        assert_eq!(e.dir, 1.0);
        assert_eq!(e.pos.x, 24.0);
    }

    #[test]
    fn test_fire_cooldown() {
        let mut e = Enemy::new(1, Vec2::new(100.0, 50.0), 0);
        assert!(!e.try_fire(ENEMY_FIRE_COOLDOWN_MS - 1));
        assert!(e.try_fire(ENEMY_FIRE_COOLDOWN_MS));
        assert!(!e.try_fire(ENEMY_FIRE_COOLDOWN_MS + 1));
        assert_eq!(e.projectiles.len(), 1);
    }

    #[test]
    fn test_hits_until_destroyed() {
        let mut e = Enemy::new(1, Vec2::new(100.0, 50.0), 0);
        assert!(!e.hit(0));
        assert!(e.is_shaking(100));
        assert!(!e.hit(0));
        assert!(e.hit(0));
        assert!(e.dead);
    }
}
