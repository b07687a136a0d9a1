//! Two-player cooperative campaign

use std::f32::consts::FRAC_PI_2;

use super::{Outcome, ScoreHook, bottom_spawn, kills_since, run_frame};
use crate::audio::SoundEffect;
use crate::consts::MAX_PLAYERS;
use crate::level::LevelScheduler;
use crate::scores::LevelSummary;
use crate::settings::Settings;
use crate::sim::{EntityManager, GameEvent, HitScope, InputSnapshot, PlayState, Ship};
use crate::tuning::Tuning;

/// Two ships sharing one hazard pool. A dead ship leaves play; the game
/// ends once both are gone.
pub struct DuoSession {
    pub world: EntityManager,
    /// Live ships only
    pub ships: Vec<Ship>,
    pub scheduler: LevelScheduler,
    tuning: Tuning,
    settings: Settings,
    kills_at_start: [u32; MAX_PLAYERS],
    cleared: Option<LevelSummary>,
    score_hook: Option<ScoreHook>,
}

impl DuoSession {
    pub fn new(tuning: Tuning, settings: Settings, now: u64) -> Self {
        let world = EntityManager::new(tuning.field, HitScope::PerShip, tuning.seed)
            .with_hit_stun(tuning.hit_stun_ms);
        let plan = tuning.level(1).cloned().unwrap_or_default();
        let scheduler = LevelScheduler::new(&plan, settings.difficulty.spawn_interval_scale(), now);

        let mut session = Self {
            world,
            ships: Vec::with_capacity(MAX_PLAYERS),
            scheduler,
            tuning,
            settings,
            kills_at_start: [0; MAX_PLAYERS],
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

    /// Ship of `player`, if it is still in play
    pub fn ship(&self, player: usize) -> Option<&Ship> {
        self.ships.iter().find(|s| s.player == player)
    }

    /// Reset everything and begin `level`; both ships return, even one that died
    pub fn start_level(&mut self, level: u32, now: u64) {
        let plan = self.tuning.level(level).cloned().unwrap_or_default();
        let mut scheduler = LevelScheduler::new(&plan, self.settings.difficulty.spawn_interval_scale(), now);
        scheduler.level = level;
        self.scheduler = scheduler;

        self.world.reset();
        self.world.now_ms = now;
        let health = self.settings.difficulty.ship_health(self.tuning.ship_health);
        self.ships = (0..MAX_PLAYERS)
            .map(|player| {
                let fraction = (player + 1) as f32 / (MAX_PLAYERS + 1) as f32;
                Ship::new(
                    player,
                    self.tuning.duo_weapons[player],
                    bottom_spawn(&self.world, fraction),
                    -FRAC_PI_2,
                )
                .with_health(health)
            })
            .collect();
        self.kills_at_start = self.world.tally.kills;
        self.cleared = None;
        log::info!("Duo: level {} started", level);
    }

    pub fn next_level(&mut self, now: u64) {
        self.start_level(self.level() + 1, now);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        super::drain_events(&mut self.world, &self.settings)
    }

    /// `inputs[i]` steers player `i`
    pub fn update(&mut self, inputs: &[InputSnapshot; MAX_PLAYERS], now: u64) -> Outcome {
        if self.world.status.is_game_over() {
            return Outcome::GameOver;
        }
        if let Some(summary) = &self.cleared {
            return Outcome::LevelComplete(summary.clone());
        }

        run_frame(&mut self.world, &mut self.ships, inputs, now);

        let before = self.ships.len();
        self.ships.retain(|s| s.is_alive());
        if self.ships.len() < before {
            log::info!("Duo: {} ship(s) left", self.ships.len());
        }
        if self.ships.is_empty() {
            self.world.status.state = PlayState::GameOver;
            self.world.events.push(GameEvent::GameOver);
            self.world.events.push(GameEvent::Sound(SoundEffect::GameOver));
            log::info!(
                "Duo: game over on level {} with {} gold",
                self.level(),
                self.world.tally.total_gold()
            );
            return Outcome::GameOver;
        }

        if self.scheduler.is_complete(now) {
            let summary = LevelSummary {
                level: self.level(),
                elapsed_ms: self.scheduler.elapsed(now),
                kills: kills_since(&self.world, &self.kills_at_start, MAX_PLAYERS),
            };
            log::info!("Duo: level {} cleared ({} kills)", summary.level, summary.total_kills());
            self.world.events.push(GameEvent::Sound(SoundEffect::Win));
            if let Some(hook) = self.score_hook.as_mut() {
                hook(&summary);
            }
            self.cleared = Some(summary.clone());
            return Outcome::LevelComplete(summary);
        }

        self.scheduler.poll(&mut self.world, &self.ships, now);
        Outcome::Running
    }
}
