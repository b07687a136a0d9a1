//! Projectiles fired by ships and enemies

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Field;
use crate::consts::*;
use crate::{heading, normalize_angle};

/// A projectile travelling in a straight line at constant speed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Travel direction (radians)
    pub angle: f32,
    pub speed: f32,
    /// 0 = despawn on leaving the field; >0 = reflect off the edges
    pub bounces_left: u8,
    /// Set on split products so they never split again
    pub has_split: bool,
    pub dead: bool,
}

impl Projectile {
    pub fn new(pos: Vec2, angle: f32, speed: f32) -> Self {
        Self {
            pos,
            angle,
            speed,
            bounces_left: 0,
            has_split: false,
            dead: false,
        }
    }

    pub fn with_bounces(mut self, bounces: u8) -> Self {
        self.bounces_left = bounces;
        self
    }

    /// Collision rectangle size
    #[inline]
    pub fn size() -> Vec2 {
        Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT)
    }

    /// Move one frame; reflect or despawn at the field edges
    pub fn advance(&mut self, field: &Field) {
        self.pos += heading(self.angle) * self.speed;
        if field.contains(self.pos) {
            return;
        }
        if self.bounces_left == 0 {
            self.dead = true;
            return;
        }

        if self.pos.x < 0.0 || self.pos.x > field.width {
            self.angle = normalize_angle(std::f32::consts::PI - self.angle);
        }
        if self.pos.y < 0.0 || self.pos.y > field.height {
            self.angle = normalize_angle(-self.angle);
        }
        self.pos = self.pos.clamp(Vec2::ZERO, Vec2::new(field.width, field.height));
        self.bounces_left -= 1;
    }

    /// The two diverging projectiles that replace this one on a split
    pub fn split(&self) -> [Projectile; 2] {
        let origin = self.pos + heading(self.angle) * SPLIT_SPAWN_DISTANCE;
        [-SPLIT_ANGLE, SPLIT_ANGLE].map(|delta| Projectile {
            pos: origin,
            angle: normalize_angle(self.angle + delta),
            speed: self.speed,
            bounces_left: self.bounces_left,
            has_split: true,
            dead: false,
        })
    }
}
