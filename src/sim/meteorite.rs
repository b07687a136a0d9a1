//! Meteorites: kinds, per-kind profiles and movement

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Field, Palette};
use crate::consts::*;

/// Meteorite types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MeteoriteKind {
    #[default]
    Normal,
    /// Timed explosive with a blast radius
    Dynamite,
    /// Breaks into two smaller shards on the first hit
    Shards,
    /// Launched at the last known ship position, no spin
    Homing,
    /// Several hit points
    Tough,
    /// Turns into a cloud zone when hit or when its timer runs out
    Cloud,
}

/// Per-kind spawn defaults
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeteoriteProfile {
    pub size: f32,
    pub speed: f32,
    pub hp: u8,
    pub spin: f32,
    /// Detonation delay after spawn
    pub fuse_ms: Option<u64>,
    pub blast_radius: Option<f32>,
    pub can_split: bool,
}

impl MeteoriteKind {
    pub const ALL: [MeteoriteKind; 6] = [
        MeteoriteKind::Normal,
        MeteoriteKind::Dynamite,
        MeteoriteKind::Shards,
        MeteoriteKind::Homing,
        MeteoriteKind::Tough,
        MeteoriteKind::Cloud,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MeteoriteKind::Normal => "normal",
            MeteoriteKind::Dynamite => "dynamite",
            MeteoriteKind::Shards => "shards",
            MeteoriteKind::Homing => "homing",
            MeteoriteKind::Tough => "tough",
            MeteoriteKind::Cloud => "cloud",
        }
    }

    /// Parse a kind name; unknown names fall back to `Normal`
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "normal" => MeteoriteKind::Normal,
            "dynamite" => MeteoriteKind::Dynamite,
            "shards" | "eclats" => MeteoriteKind::Shards,
            "homing" | "launched" => MeteoriteKind::Homing,
            "tough" => MeteoriteKind::Tough,
            "cloud" => MeteoriteKind::Cloud,
            other => {
                log::warn!("Unknown meteorite kind '{}', using normal", other);
                MeteoriteKind::Normal
            }
        }
    }

    pub fn profile(&self) -> MeteoriteProfile {
        match self {
            MeteoriteKind::Normal => MeteoriteProfile {
                size: 40.0,
                speed: 2.0,
                hp: 1,
                spin: 0.02,
                fuse_ms: None,
                blast_radius: None,
                can_split: false,
            },
            MeteoriteKind::Dynamite => MeteoriteProfile {
                size: 44.0,
                speed: 1.2,
                hp: 2,
                spin: 0.03,
                fuse_ms: Some(5000),
                blast_radius: Some(120.0),
                can_split: false,
            },
            MeteoriteKind::Shards => MeteoriteProfile {
                size: 50.0,
                speed: 1.8,
                hp: 1,
                spin: 0.025,
                fuse_ms: None,
                blast_radius: None,
                can_split: true,
            },
            MeteoriteKind::Homing => MeteoriteProfile {
                size: 34.0,
                speed: 3.0,
                hp: 1,
                spin: 0.0,
                fuse_ms: None,
                blast_radius: None,
                can_split: false,
            },
            MeteoriteKind::Tough => MeteoriteProfile {
                size: 64.0,
                speed: 1.0,
                hp: 5,
                spin: 0.01,
                fuse_ms: None,
                blast_radius: None,
                can_split: false,
            },
            MeteoriteKind::Cloud => MeteoriteProfile {
                size: 48.0,
                speed: 1.5,
                hp: 1,
                spin: 0.015,
                fuse_ms: Some(4000),
                blast_radius: None,
                can_split: false,
            },
        }
    }

    /// Gold awarded when a projectile destroys this kind outright
    pub fn gold(&self) -> u32 {
        match self {
            MeteoriteKind::Cloud => 5,
            MeteoriteKind::Shards => 10,
            MeteoriteKind::Normal => 15,
            MeteoriteKind::Tough => 30,
            MeteoriteKind::Dynamite | MeteoriteKind::Homing => 0,
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            MeteoriteKind::Normal | MeteoriteKind::Tough => Palette::Rock,
            MeteoriteKind::Dynamite | MeteoriteKind::Homing => Palette::Fire,
            MeteoriteKind::Shards => Palette::Crystal,
            MeteoriteKind::Cloud => Palette::Smoke,
        }
    }
}

/// A meteorite entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meteorite {
    pub id: u32,
    pub kind: MeteoriteKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f32,
    pub spin: f32,
    /// Width and height of the bounding box
    pub size: f32,
    pub hp: u8,
    pub detonate_at: Option<u64>,
    pub blast_radius: Option<f32>,
    pub can_split: bool,
    /// Visual shake before detonation
    pub shaking: bool,
    pub dead: bool,
}

impl Meteorite {
    /// Spawn a meteorite from its kind profile. Homing meteorites aim at
    /// `target`; everything else falls straight down.
    pub fn spawn(id: u32, kind: MeteoriteKind, pos: Vec2, target: Option<Vec2>, now: u64) -> Self {
        let profile = kind.profile();
        let dir = match (kind, target) {
            (MeteoriteKind::Homing, Some(target)) => (target - pos).try_normalize().unwrap_or(Vec2::Y),
            _ => Vec2::Y,
        };

        Self {
            id,
            kind,
            pos,
            vel: dir * profile.speed,
            angle: 0.0,
            spin: profile.spin,
            size: profile.size,
            hp: profile.hp,
            detonate_at: profile.fuse_ms.map(|fuse| now + fuse),
            blast_radius: profile.blast_radius,
            can_split: profile.can_split,
            shaking: false,
            dead: false,
        }
    }

    /// Collision radius
    #[inline]
    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    pub fn advance(&mut self) {
        self.pos += self.vel;
        self.angle += self.spin;
    }

    /// Past the far edge, or fully off either side
    pub fn is_out_of_field(&self, field: &Field) -> bool {
        let half = self.radius();
        self.pos.y + half > field.height || self.pos.x + half < 0.0 || self.pos.x - half > field.width
    }

    /// The two smaller, non-splittable shards that replace this one.
    /// Ids are assigned by the entity manager when they are committed.
    pub fn shard_children(&self) -> [Meteorite; 2] {
        [-1.0f32, 1.0].map(|side| Meteorite {
            id: 0,
            kind: MeteoriteKind::Shards,
            pos: self.pos + Vec2::new(side * SHARD_OFFSET * self.size, 0.0),
            vel: self.vel * SHARD_SPEEDUP + Vec2::new(side * SHARD_DRIFT, 0.0),
            angle: self.angle,
            spin: self.spin * side,
            size: self.size * SHARD_SCALE,
            hp: 1,
            detonate_at: None,
            blast_radius: None,
            can_split: false,
            shaking: false,
            dead: false,
        })
    }
}
