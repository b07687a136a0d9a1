//! Data-driven game balance
//!
//! Everything a designer would tweak: field size, stun length, weapons per
//! mode and the level plans that drive the scheduler. Spawn tables are keyed
//! by kind names so a plan can be edited as plain JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::{Field, WeaponKind};

/// Configuration loading failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("play field must have a positive size, got {width}x{height}")]
    InvalidField { width: f32, height: f32 },
    #[error("frame length must be at least 1 ms")]
    ZeroFrameLength,
    #[error("tuning defines no levels")]
    NoLevels,
    #[error("level {level} has an empty meteorite table")]
    EmptySpawnTable { level: u32 },
}

/// One weighted entry of a spawn table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnEntry<T> {
    pub kind: T,
    pub weight: u32,
}

impl<T> SpawnEntry<T> {
    pub fn new(kind: T, weight: u32) -> Self {
        Self { kind, weight }
    }
}

fn table(entries: &[(&str, u32)]) -> Vec<SpawnEntry<String>> {
    entries
        .iter()
        .map(|&(name, weight)| SpawnEntry::new(name.to_string(), weight))
        .collect()
}

/// Spawn schedule for one level
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelPlan {
    pub level: u32,
    /// Survive this long to clear the level
    pub duration_ms: u64,
    pub meteor_interval_ms: u64,
    pub min_meteor_interval_ms: u64,
    /// Every `ramp_every_ms` the meteorite interval is multiplied by `ramp_factor`
    pub ramp_every_ms: u64,
    pub ramp_factor: f32,
    pub meteorites: Vec<SpawnEntry<String>>,
    pub gadget_interval_ms: u64,
    pub gadgets: Vec<SpawnEntry<String>>,
    /// No enemies when unset
    pub enemy_interval_ms: Option<u64>,
    pub max_enemies: usize,
    /// Extra meteorites dropped at once, periodically
    pub burst_every_ms: Option<u64>,
    pub burst_size: u32,
}

impl Default for LevelPlan {
    fn default() -> Self {
        Self {
            level: 1,
            duration_ms: 60_000,
            meteor_interval_ms: 1200,
            min_meteor_interval_ms: 300,
            ramp_every_ms: 15_000,
            ramp_factor: 0.85,
            meteorites: table(&[("normal", 100)]),
            gadget_interval_ms: 12_000,
            gadgets: table(&[("heal", 30), ("shield", 30), ("speed", 20), ("rapid_fire", 20)]),
            enemy_interval_ms: None,
            max_enemies: 0,
            burst_every_ms: None,
            burst_size: 0,
        }
    }
}

impl LevelPlan {
    /// The built-in campaign
    pub fn campaign() -> Vec<LevelPlan> {
        vec![
            LevelPlan {
                level: 1,
                duration_ms: 45_000,
                meteorites: table(&[("normal", 80), ("tough", 20)]),
                ..Default::default()
            },
            LevelPlan {
                level: 2,
                duration_ms: 60_000,
                meteor_interval_ms: 1000,
                meteorites: table(&[("normal", 55), ("tough", 20), ("shards", 25)]),
                ..Default::default()
            },
            LevelPlan {
                level: 3,
                duration_ms: 60_000,
                meteor_interval_ms: 950,
                meteorites: table(&[("normal", 40), ("tough", 15), ("shards", 20), ("homing", 15), ("cloud", 10)]),
                enemy_interval_ms: Some(20_000),
                max_enemies: 1,
                ..Default::default()
            },
            LevelPlan {
                level: 4,
                duration_ms: 75_000,
                meteor_interval_ms: 900,
                meteorites: table(&[
                    ("normal", 35),
                    ("tough", 15),
                    ("shards", 15),
                    ("homing", 15),
                    ("cloud", 10),
                    ("dynamite", 10),
                ]),
                enemy_interval_ms: Some(15_000),
                max_enemies: 2,
                burst_every_ms: Some(20_000),
                burst_size: 3,
                ..Default::default()
            },
            LevelPlan {
                level: 5,
                duration_ms: 90_000,
                meteor_interval_ms: 800,
                min_meteor_interval_ms: 250,
                meteorites: table(&[
                    ("normal", 25),
                    ("tough", 20),
                    ("shards", 15),
                    ("homing", 15),
                    ("cloud", 10),
                    ("dynamite", 15),
                ]),
                gadget_interval_ms: 10_000,
                gadgets: table(&[("heal", 25), ("shield", 25), ("speed", 15), ("rapid_fire", 20), ("teleport", 15)]),
                enemy_interval_ms: Some(12_000),
                max_enemies: 3,
                burst_every_ms: Some(15_000),
                burst_size: 4,
                ..Default::default()
            },
        ]
    }

    /// Endless hazard pool shared by duelling ships
    pub fn duel_arena() -> LevelPlan {
        LevelPlan {
            level: 0,
            duration_ms: u64::MAX,
            meteor_interval_ms: 1800,
            ramp_every_ms: 0,
            meteorites: table(&[("normal", 60), ("shards", 20), ("dynamite", 20)]),
            gadget_interval_ms: 8_000,
            gadgets: table(&[("heal", 25), ("shield", 25), ("speed", 15), ("rapid_fire", 20), ("teleport", 15)]),
            ..Default::default()
        }
    }
}

/// Top-level balance configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub field: Field,
    pub hit_stun_ms: u64,
    /// Clock step hosts use between updates
    pub frame_ms: u64,
    pub seed: u64,
    pub ship_health: u8,
    pub solo_weapon: WeaponKind,
    pub duo_weapons: [WeaponKind; 2],
    pub duel_weapons: [WeaponKind; 2],
    pub levels: Vec<LevelPlan>,
    pub duel_arena: LevelPlan,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field: Field::default(),
            hit_stun_ms: HIT_STUN_MS,
            frame_ms: FRAME_MS,
            seed: 0x5EED,
            ship_health: SHIP_HEALTH,
            solo_weapon: WeaponKind::Normal,
            duo_weapons: [WeaponKind::Normal, WeaponKind::Spread],
            duel_weapons: [WeaponKind::Normal, WeaponKind::Normal],
            levels: LevelPlan::campaign(),
            duel_arena: LevelPlan::duel_arena(),
        }
    }
}

impl Tuning {
    /// Parse and validate tuning JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let Field { width, height } = self.field;
        if !(width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidField { width, height });
        }
        if self.frame_ms == 0 {
            return Err(ConfigError::ZeroFrameLength);
        }
        if self.levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        for plan in self.levels.iter().chain(std::iter::once(&self.duel_arena)) {
            if plan.meteorites.iter().all(|e| e.weight == 0) {
                return Err(ConfigError::EmptySpawnTable { level: plan.level });
            }
        }
        Ok(())
    }

    /// Plan for a 1-based level number; past the end the last plan repeats
    pub fn level(&self, level: u32) -> Option<&LevelPlan> {
        let index = (level.max(1) as usize - 1).min(self.levels.len().checked_sub(1)?);
        self.levels.get(index)
    }
}
