//! Level / wave scheduler
//!
//! Turns a `LevelPlan` into spawns over time: a meteorite on every interval
//! (shrinking with each ramp step), periodic gadgets, enemies up to a cap and
//! occasional bursts. All randomness comes from the entity manager's seeded
//! RNG.

use glam::Vec2;
use rand::Rng;

use crate::sim::{EntityManager, GadgetKind, MeteoriteKind, Ship};
use crate::tuning::{LevelPlan, SpawnEntry};

/// Roulette-wheel selection: draw in `[0, total)` and return the first entry
/// whose cumulative weight exceeds the draw. `None` when every weight is 0.
pub fn pick_weighted<T: Copy, R: Rng + ?Sized>(table: &[SpawnEntry<T>], rng: &mut R) -> Option<T> {
    // u32 weights may add up past u32::MAX
    let total: u64 = table.iter().map(|e| u64::from(e.weight)).sum();
    if total == 0 {
        return None;
    }
    let draw = rng.random_range(0..total);
    let mut cumulative = 0u64;
    for entry in table {
        cumulative += u64::from(entry.weight);
        if cumulative > draw {
            return Some(entry.kind);
        }
    }
    None
}

fn resolve<T>(entries: &[SpawnEntry<String>], parse: impl Fn(&str) -> T) -> Vec<SpawnEntry<T>> {
    entries
        .iter()
        .map(|e| SpawnEntry::new(parse(&e.kind), e.weight))
        .collect()
}

fn scaled(ms: u64, scale: f32) -> u64 {
    ((ms as f32) * scale).round().max(1.0) as u64
}

/// Time-driven spawner for one level
#[derive(Debug, Clone)]
pub struct LevelScheduler {
    pub level: u32,
    pub started_at: u64,
    duration_ms: u64,
    meteor_table: Vec<SpawnEntry<MeteoriteKind>>,
    gadget_table: Vec<SpawnEntry<GadgetKind>>,
    meteor_interval_ms: u64,
    min_meteor_interval_ms: u64,
    ramp_every_ms: u64,
    ramp_factor: f32,
    gadget_interval_ms: u64,
    enemy_interval_ms: Option<u64>,
    max_enemies: usize,
    burst_every_ms: Option<u64>,
    burst_size: u32,
    next_meteor_at: u64,
    next_ramp_at: Option<u64>,
    next_gadget_at: u64,
    next_enemy_at: Option<u64>,
    next_burst_at: Option<u64>,
}

impl LevelScheduler {
    /// `interval_scale` stretches (>1) or compresses (<1) every spawn interval
    pub fn new(plan: &LevelPlan, interval_scale: f32, now: u64) -> Self {
        let meteor_interval_ms = scaled(plan.meteor_interval_ms, interval_scale);
        let gadget_interval_ms = scaled(plan.gadget_interval_ms, interval_scale);
        let enemy_interval_ms = plan.enemy_interval_ms.map(|ms| scaled(ms, interval_scale));
        let burst_every_ms = plan.burst_every_ms.map(|ms| scaled(ms, interval_scale));

        log::info!(
            "Level {}: meteor every {}ms, {} meteorite kinds, enemies {:?}",
            plan.level,
            meteor_interval_ms,
            plan.meteorites.len(),
            enemy_interval_ms
        );

        Self {
            level: plan.level,
            started_at: now,
            duration_ms: plan.duration_ms,
            meteor_table: resolve(&plan.meteorites, MeteoriteKind::from_name),
            gadget_table: resolve(&plan.gadgets, GadgetKind::from_name),
            meteor_interval_ms,
            min_meteor_interval_ms: plan.min_meteor_interval_ms.min(meteor_interval_ms),
            ramp_every_ms: plan.ramp_every_ms,
            ramp_factor: plan.ramp_factor,
            gadget_interval_ms,
            enemy_interval_ms,
            max_enemies: plan.max_enemies,
            burst_every_ms,
            burst_size: plan.burst_size,
            next_meteor_at: now + meteor_interval_ms,
            next_ramp_at: (plan.ramp_every_ms > 0).then(|| now + plan.ramp_every_ms),
            next_gadget_at: now + gadget_interval_ms,
            next_enemy_at: enemy_interval_ms.map(|ms| now + ms),
            next_burst_at: burst_every_ms.map(|ms| now + ms),
        }
    }

    pub fn elapsed(&self, now: u64) -> u64 {
        now.saturating_sub(self.started_at)
    }

    pub fn is_complete(&self, now: u64) -> bool {
        self.elapsed(now) >= self.duration_ms
    }

    pub fn meteor_interval_ms(&self) -> u64 {
        self.meteor_interval_ms
    }

    /// Spawn whatever is due at `now`; returns the number of entities spawned
    pub fn poll(&mut self, world: &mut EntityManager, ships: &[Ship], now: u64) -> u32 {
        let mut spawned = 0;

        if let Some(at) = self.next_ramp_at {
            if now >= at {
                let ramped = (self.meteor_interval_ms as f32 * self.ramp_factor) as u64;
                self.meteor_interval_ms = ramped.max(self.min_meteor_interval_ms);
                self.next_ramp_at = Some(at + self.ramp_every_ms);
                log::debug!("Level {} ramp: meteor every {}ms", self.level, self.meteor_interval_ms);
            }
        }

        if now >= self.next_meteor_at {
            self.next_meteor_at = now + self.meteor_interval_ms;
            spawned += self.spawn_meteorites(world, ships, 1);
        }

        if let Some(at) = self.next_burst_at {
            if now >= at {
                self.next_burst_at = self.burst_every_ms.map(|ms| now + ms);
                log::debug!("Level {} burst of {}", self.level, self.burst_size);
                spawned += self.spawn_meteorites(world, ships, self.burst_size);
            }
        }

        if now >= self.next_gadget_at {
            self.next_gadget_at = now + self.gadget_interval_ms;
            if let Some(kind) = pick_weighted(&self.gadget_table, world.rng_mut()) {
                let x = random_x(world, crate::consts::GADGET_SIZE);
                world.spawn_gadget(kind, Vec2::new(x, -crate::consts::GADGET_SIZE / 2.0));
                spawned += 1;
            }
        }

        if let Some(at) = self.next_enemy_at {
            if now >= at {
                self.next_enemy_at = self.enemy_interval_ms.map(|ms| now + ms);
                if world.enemies.len() < self.max_enemies {
                    let x = random_x(world, crate::consts::ENEMY_SIZE);
                    let max_y = (world.field.height * 0.25).max(crate::consts::ENEMY_SIZE);
                    let y = world
                        .rng_mut()
                        .random_range(crate::consts::ENEMY_SIZE / 2.0..=max_y);
                    world.spawn_enemy(Vec2::new(x, y));
                    spawned += 1;
                }
            }
        }

        spawned
    }

    fn spawn_meteorites(&self, world: &mut EntityManager, ships: &[Ship], count: u32) -> u32 {
        let mut spawned = 0;
        for _ in 0..count {
            let Some(kind) = pick_weighted(&self.meteor_table, world.rng_mut()) else {
                break;
            };
            let size = kind.profile().size;
            let pos = Vec2::new(random_x(world, size), -size / 2.0);
            let target = if kind == MeteoriteKind::Homing {
                let alive: Vec<Vec2> = ships.iter().filter(|s| s.is_alive()).map(|s| s.pos).collect();
                if alive.is_empty() {
                    None
                } else {
                    Some(alive[world.rng_mut().random_range(0..alive.len())])
                }
            } else {
                None
            };
            world.spawn_meteorite(kind, pos, target);
            spawned += 1;
        }
        spawned
    }
}

fn random_x(world: &mut EntityManager, size: f32) -> f32 {
    let half = size / 2.0;
    let max_x = (world.field.width - half).max(half);
    world.rng_mut().random_range(half..=max_x)
}
