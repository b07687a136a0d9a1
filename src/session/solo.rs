//! Single-player campaign

use std::f32::consts::FRAC_PI_2;

use super::{Outcome, ScoreHook, bottom_spawn, kills_since, run_frame};
use crate::audio::SoundEffect;
use crate::level::LevelScheduler;
use crate::scores::LevelSummary;
use crate::settings::Settings;
use crate::sim::{EntityManager, GameEvent, HitScope, InputSnapshot, Ship};
use crate::tuning::Tuning;

/// One ship against the campaign; the game ends when it dies
pub struct SoloSession {
    pub world: EntityManager,
    pub ship: Ship,
    pub scheduler: LevelScheduler,
    tuning: Tuning,
    settings: Settings,
    kills_at_start: u32,
    cleared: Option<LevelSummary>,
    score_hook: Option<ScoreHook>,
}

impl SoloSession {
    /// Start at level 1
    pub fn new(tuning: Tuning, settings: Settings, now: u64) -> Self {
        let world = EntityManager::new(tuning.field, HitScope::Session, tuning.seed)
            .with_hit_stun(tuning.hit_stun_ms);
        let plan = tuning.level(1).cloned().unwrap_or_default();
        let scheduler = LevelScheduler::new(&plan, settings.difficulty.spawn_interval_scale(), now);

        let mut session = Self {
            ship: Ship::new(0, tuning.solo_weapon, bottom_spawn(&world, 0.5), -FRAC_PI_2),
            world,
            scheduler,
            tuning,
            settings,
            kills_at_start: 0,
            cleared: None,
            score_hook: None,
        };
        session.start_level(1, now);
        session
    }

    pub fn set_score_hook(&mut self, hook: ScoreHook) {
        self.score_hook = Some(hook);
    }

    pub fn level(&self) -> u32 {
        self.scheduler.level
    }

    /// Reset everything and begin `level` (1-based)
    pub fn start_level(&mut self, level: u32, now: u64) {
        let plan = self.tuning.level(level).cloned().unwrap_or_default();
        let mut scheduler = LevelScheduler::new(&plan, self.settings.difficulty.spawn_interval_scale(), now);
        scheduler.level = level;
        self.scheduler = scheduler;

        self.world.reset();
        self.world.now_ms = now;
        let health = self.settings.difficulty.ship_health(self.tuning.ship_health);
        self.ship = Ship::new(0, self.tuning.solo_weapon, bottom_spawn(&self.world, 0.5), -FRAC_PI_2)
            .with_health(health);
        self.kills_at_start = self.world.tally.kills[0];
        self.cleared = None;
        log::info!("Solo: level {} started", level);
    }

    /// Advance to the next level after a `LevelComplete`
    pub fn next_level(&mut self, now: u64) {
        self.start_level(self.level() + 1, now);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        super::drain_events(&mut self.world, &self.settings)
    }

    pub fn gold(&self) -> u32 {
        self.world.tally.gold[0]
    }

    pub fn update(&mut self, input: &InputSnapshot, now: u64) -> Outcome {
        if self.world.status.is_game_over() {
            return Outcome::GameOver;
        }
        if let Some(summary) = &self.cleared {
            return Outcome::LevelComplete(summary.clone());
        }

        run_frame(
            &mut self.world,
            std::slice::from_mut(&mut self.ship),
            std::slice::from_ref(input),
            now,
        );

        if self.world.status.is_game_over() {
            log::info!(
                "Solo: game over on level {} with {} gold",
                self.level(),
                self.gold()
            );
            self.world.events.push(GameEvent::Sound(SoundEffect::GameOver));
            return Outcome::GameOver;
        }

        if self.scheduler.is_complete(now) {
            let summary = LevelSummary {
                level: self.level(),
                elapsed_ms: self.scheduler.elapsed(now),
                kills: kills_since(&self.world, &[self.kills_at_start], 1),
            };
            log::info!("Solo: level {} cleared ({} kills)", summary.level, summary.total_kills());
            self.world.events.push(GameEvent::Sound(SoundEffect::Win));
            if let Some(hook) = self.score_hook.as_mut() {
                hook(&summary);
            }
            self.cleared = Some(summary.clone());
            return Outcome::LevelComplete(summary);
        }

        self.scheduler
            .poll(&mut self.world, std::slice::from_ref(&self.ship), now);
        Outcome::Running
    }
}
