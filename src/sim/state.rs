//! Session-level simulation types
//!
//! Play state, the hit-pause window, score tallies, cloud zones and the event
//! queue the host drains every frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::gadget::GadgetKind;
use super::meteorite::MeteoriteKind;
use crate::audio::SoundEffect;
use crate::consts::*;

/// Play area in screen coordinates (+y points down, the far edge is `height`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Default for Field {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
        }
    }
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }

    /// Clamp a box center so the whole box stays inside the field
    pub fn clamp_box(&self, center: Vec2, size: Vec2) -> Vec2 {
        let half = size * 0.5;
        Vec2::new(
            center.x.clamp(half.x, (self.width - half.x).max(half.x)),
            center.y.clamp(half.y, (self.height - half.y).max(half.y)),
        )
    }
}

/// Current play state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayState {
    /// Normal play
    Playing,
    /// A ship was just hit; damage is suspended until the stun window ends
    HitPause,
    /// Terminal
    GameOver,
}

/// How the hit-pause window gates further damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitScope {
    /// Any hit pauses damage for the whole session; a dead ship ends the game
    Session,
    /// Each ship has its own stun window; the session decides when the game ends
    PerShip,
}

/// Play state plus the pending hit-pause resume time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Status {
    pub state: PlayState,
    pub scope: HitScope,
    /// When the hit-pause window ends
    pub resume_at: Option<u64>,
}

impl Status {
    pub fn new(scope: HitScope) -> Self {
        Self {
            state: PlayState::Playing,
            scope,
            resume_at: None,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.state == PlayState::GameOver
    }

    /// Close the hit-pause window once it has elapsed
    pub fn tick(&mut self, now: u64) {
        if self.resume_at.is_some_and(|at| now >= at) {
            self.resume_at = None;
            if self.state == PlayState::HitPause {
                self.state = PlayState::Playing;
            }
        }
    }
}

/// Per-player kill and gold counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub kills: [u32; MAX_PLAYERS],
    pub gold: [u32; MAX_PLAYERS],
}

impl Tally {
    /// Credit a kill to a player slot. Slots past the two-player limit share
    /// the last counter.
    pub fn credit(&mut self, player: usize, gold: u32) {
        let slot = player.min(MAX_PLAYERS - 1);
        self.kills[slot] += 1;
        self.gold[slot] += gold;
    }

    pub fn total_kills(&self) -> u32 {
        self.kills.iter().sum()
    }

    pub fn total_gold(&self) -> u32 {
        self.gold.iter().sum()
    }
}

/// Area marker left behind by a cloud meteorite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudZone {
    pub pos: Vec2,
    pub radius: f32,
    pub expires_at: u64,
}

impl CloudZone {
    pub fn new(pos: Vec2, now: u64) -> Self {
        Self {
            pos,
            radius: CLOUD_ZONE_RADIUS,
            expires_at: now + CLOUD_ZONE_LIFETIME_MS,
        }
    }
}

/// Color family for particle bursts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Palette {
    Rock,
    Fire,
    Crystal,
    Smoke,
    Metal,
    Spark,
}

/// Fire-and-forget notifications for the host (particles, audio, HUD)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Impact { pos: Vec2, palette: Palette },
    Explosion { pos: Vec2, palette: Palette },
    Sound(SoundEffect),
    MeteoriteDestroyed { kind: MeteoriteKind, player: usize, gold: u32 },
    EnemyDestroyed { player: usize },
    ShieldAbsorbed { player: usize, charges_left: u8 },
    ShipHit { player: usize, health_left: u8 },
    ShipDestroyed { player: usize },
    GadgetCollected { kind: GadgetKind, player: usize },
    GameOver,
}

impl GameEvent {
    /// Purely visual; dropped when the player turns particles off
    pub fn is_particle(&self) -> bool {
        matches!(self, GameEvent::Impact { .. } | GameEvent::Explosion { .. })
    }
}
