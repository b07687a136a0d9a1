//! Meteor Dodger - simulation core of a top-down meteorite shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, damage, entity manager)
//! - `level`: Wave scheduler feeding new entities into the simulation
//! - `session`: Solo / duo / duel game mode orchestration
//! - `tuning`: Data-driven game balance
//! - `settings`: Player-facing preferences (difficulty, audio toggle)
//! - `scores`: Per-level summaries handed to the host for persistence
//! - `audio`: Sound cue routing to a host-provided sink

pub mod audio;
pub mod level;
pub mod scores;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use scores::{LevelSummary, ScoreBoard};
pub use settings::{Difficulty, Settings};
pub use tuning::{ConfigError, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal animation frame length (~60 Hz)
    pub const FRAME_MS: u64 = 16;

    /// Default play field
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Hit-stun window after a ship takes damage; also the shake lead time
    /// before a timed meteorite detonates
    pub const HIT_STUN_MS: u64 = 600;

    /// Maximum number of simultaneously playing ships (kill credit is per slot)
    pub const MAX_PLAYERS: usize = 2;

    /// Projectiles collide as a small fixed rectangle
    pub const PROJECTILE_WIDTH: f32 = 10.0;
    pub const PROJECTILE_HEIGHT: f32 = 2.0;
    pub const PROJECTILE_SPEED: f32 = 8.0;
    /// Forward offset of the two projectiles produced by a split
    pub const SPLIT_SPAWN_DISTANCE: f32 = 12.0;
    /// Divergence of split projectiles (30 degrees)
    pub const SPLIT_ANGLE: f32 = std::f32::consts::FRAC_PI_6;
    /// Side shots of the spread weapon (15 degrees)
    pub const SPREAD_ANGLE: f32 = std::f32::consts::PI / 12.0;
    pub const RICOCHET_BOUNCES: u8 = 3;

    /// Ship defaults
    pub const SHIP_SIZE: f32 = 40.0;
    pub const SHIP_HEALTH: u8 = 3;
    pub const SHIP_SPEED: f32 = 5.0;
    pub const FIRE_COOLDOWN_MS: u64 = 250;

    /// Dash: fixed step per tick for a fixed number of ticks
    pub const DASH_TICKS: u32 = 8;
    pub const DASH_STEP: f32 = 12.0;
    pub const DASH_COOLDOWN_MS: u64 = 1500;

    /// Gadget effects
    pub const BOOST_DURATION_MS: u64 = 10_000;
    pub const SPEED_BOOST_DELTA: f32 = 3.0;
    pub const RAPID_FIRE_COOLDOWN_MS: u64 = 40;
    pub const SHIELD_CHARGES: u8 = 2;
    pub const GADGET_SIZE: f32 = 30.0;
    pub const GADGET_FALL_SPEED: f32 = 1.5;
    pub const GADGET_PICKUP_RADIUS: f32 = 22.0;

    /// Enemy defaults
    pub const ENEMY_SIZE: f32 = 48.0;
    pub const ENEMY_HEALTH: u8 = 3;
    pub const ENEMY_SPEED: f32 = 1.5;
    pub const ENEMY_FIRE_COOLDOWN_MS: u64 = 1500;
    pub const ENEMY_PROJECTILE_SPEED: f32 = 4.0;
    pub const ENEMY_SHAKE_MS: u64 = 200;
    pub const ENEMY_GOLD: u32 = 20;

    /// Shards children
    pub const SHARD_OFFSET: f32 = 0.4;
    pub const SHARD_SCALE: f32 = 0.6;
    pub const SHARD_SPEEDUP: f32 = 1.1;
    pub const SHARD_DRIFT: f32 = 0.6;

    /// Cloud zones left behind by cloud meteorites
    pub const CLOUD_ZONE_RADIUS: f32 = 90.0;
    pub const CLOUD_ZONE_LIFETIME_MS: u64 = 3000;

    /// Duel
    pub const ROUND_PAUSE_MS: u64 = 2000;
    pub const ROUNDS_TO_WIN: u8 = 3;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector pointing along `angle` (screen space, +y down)
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle of the vector from `from` to `to`
#[inline]
pub fn angle_towards(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}
