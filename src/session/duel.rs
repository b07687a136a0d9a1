//! Two-player duel
//!
//! Ships face each other from opposite halves of the field and can shoot
//! each other while the arena drops meteorites on both. First to
//! `ROUNDS_TO_WIN` rounds takes the match.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;

use super::{Outcome, run_frame};
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::level::LevelScheduler;
use crate::settings::Settings;
use crate::sim::{EntityManager, GameEvent, HitScope, InputSnapshot, Ship};
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuelPhase {
    Fighting,
    /// Round decided; the next one starts at `resume_at`
    Intermission { resume_at: u64 },
    MatchOver { winner: usize },
}

pub struct DuelSession {
    pub world: EntityManager,
    /// Player 0 holds the bottom half, player 1 the top half
    pub ships: [Ship; MAX_PLAYERS],
    pub scheduler: LevelScheduler,
    pub phase: DuelPhase,
    /// 1-based; a drawn round is replayed under the same number
    pub round: u32,
    pub wins: [u8; MAX_PLAYERS],
    tuning: Tuning,
    settings: Settings,
}

impl DuelSession {
    pub fn new(tuning: Tuning, settings: Settings, now: u64) -> Self {
        let world = EntityManager::new(tuning.field, HitScope::PerShip, tuning.seed)
            .with_hit_stun(tuning.hit_stun_ms);
        let scheduler = LevelScheduler::new(&tuning.duel_arena, settings.difficulty.spawn_interval_scale(), now);
        let ships = spawn_ships(&world, &tuning, &settings);

        let mut session = Self {
            world,
            ships,
            scheduler,
            phase: DuelPhase::Fighting,
            round: 1,
            wins: [0; MAX_PLAYERS],
            tuning,
            settings,
        };
        session.start_round(now);
        session
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        super::drain_events(&mut self.world, &self.settings)
    }

    fn start_round(&mut self, now: u64) {
        self.world.reset();
        self.world.now_ms = now;
        self.scheduler = LevelScheduler::new(
            &self.tuning.duel_arena,
            self.settings.difficulty.spawn_interval_scale(),
            now,
        );
        self.ships = spawn_ships(&self.world, &self.tuning, &self.settings);
        self.phase = DuelPhase::Fighting;
        log::info!("Duel: round {} ({}-{})", self.round, self.wins[0], self.wins[1]);
    }

    fn end_round(&mut self, winner: Option<usize>, now: u64) -> Outcome {
        self.world.reset();
        for ship in self.ships.iter_mut() {
            ship.projectiles.clear();
        }

        let Some(winner) = winner else {
            log::info!("Duel: round {} drawn, replaying", self.round);
            self.phase = DuelPhase::Intermission {
                resume_at: now + ROUND_PAUSE_MS,
            };
            return Outcome::RoundOver { winner: None };
        };

        self.wins[winner] += 1;
        log::info!("Duel: player {} takes round {}", winner + 1, self.round);
        if self.wins[winner] >= ROUNDS_TO_WIN {
            log::info!("Duel: player {} wins {}-{}", winner + 1, self.wins[winner], self.wins[1 - winner]);
            self.world.events.push(GameEvent::Sound(SoundEffect::Win));
            self.phase = DuelPhase::MatchOver { winner };
            return Outcome::MatchOver { winner };
        }

        self.round += 1;
        self.phase = DuelPhase::Intermission {
            resume_at: now + ROUND_PAUSE_MS,
        };
        Outcome::RoundOver { winner: Some(winner) }
    }

    /// `inputs[i]` steers player `i`
    pub fn update(&mut self, inputs: &[InputSnapshot; MAX_PLAYERS], now: u64) -> Outcome {
        match self.phase {
            DuelPhase::MatchOver { winner } => return Outcome::MatchOver { winner },
            DuelPhase::Intermission { resume_at } => {
                if now < resume_at {
                    return Outcome::Paused;
                }
                self.start_round(now);
            }
            DuelPhase::Fighting => {}
        }

        run_frame(&mut self.world, &mut self.ships, inputs, now);
        self.world.resolve_duel_hits(&mut self.ships, now);

        match (self.ships[0].is_alive(), self.ships[1].is_alive()) {
            (true, true) => {
                self.scheduler.poll(&mut self.world, &self.ships, now);
                Outcome::Running
            }
            (true, false) => self.end_round(Some(0), now),
            (false, true) => self.end_round(Some(1), now),
            (false, false) => self.end_round(None, now),
        }
    }
}

fn spawn_ships(world: &EntityManager, tuning: &Tuning, settings: &Settings) -> [Ship; MAX_PLAYERS] {
    let field = world.field;
    let half = SHIP_SIZE / 2.0;
    let mid = field.height / 2.0;
    let health = settings.difficulty.ship_health(tuning.ship_health);
    let x = field.width / 2.0;

    [
        Ship::new(0, tuning.duel_weapons[0], Vec2::new(x, field.height - SHIP_SIZE), -FRAC_PI_2)
            .with_health(health)
            .with_lane(mid + half, field.height - half),
        Ship::new(1, tuning.duel_weapons[1], Vec2::new(x, SHIP_SIZE), FRAC_PI_2)
            .with_health(health)
            .with_lane(half, mid - half),
    ]
}
