//! Game mode orchestration
//!
//! Each session owns one `EntityManager` plus its ships and drives a frame:
//! input -> ship movement/firing -> `update_all` -> projectile motion ->
//! mode-specific win/loss checks -> scheduler spawns.

pub mod duel;
pub mod duo;
pub mod solo;

pub use duel::{DuelPhase, DuelSession};
pub use duo::DuoSession;
pub use solo::SoloSession;

use glam::Vec2;

use crate::scores::LevelSummary;
use crate::settings::Settings;
use crate::sim::{EntityManager, GameEvent, InputSnapshot, Ship, steer_ship};

/// Called with the summary of every cleared level
pub type ScoreHook = Box<dyn FnMut(&LevelSummary)>;

/// Result of one session update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Frame simulated, nothing decided
    Running,
    /// Between duel rounds; nothing simulated
    Paused,
    /// Level survived; the host starts the next one
    LevelComplete(LevelSummary),
    /// Terminal
    GameOver,
    /// Duel round decided (`None` = both ships died in the same frame)
    RoundOver { winner: Option<usize> },
    /// Duel match decided
    MatchOver { winner: usize },
}

/// Shared frame body: effect expiry, steering, entity update, projectile motion
pub(crate) fn run_frame(world: &mut EntityManager, ships: &mut [Ship], inputs: &[InputSnapshot], now: u64) {
    world.begin_frame(ships, now);
    for ship in ships.iter_mut() {
        let input = inputs.get(ship.player).copied().unwrap_or_default();
        steer_ship(ship, &input, &world.field, now, &mut world.events);
    }
    world.update_all(ships, now);
    world.advance_ship_projectiles(ships);
}

/// Take the queued events, minus particle bursts if the player disabled them
pub(crate) fn drain_events(world: &mut EntityManager, settings: &Settings) -> Vec<GameEvent> {
    let mut events = world.drain_events();
    if !settings.particles {
        events.retain(|e| !e.is_particle());
    }
    events
}

/// Kill counts gained since `start`
pub(crate) fn kills_since(world: &EntityManager, start: &[u32], players: usize) -> Vec<u32> {
    (0..players)
        .map(|i| world.tally.kills[i].saturating_sub(start.get(i).copied().unwrap_or(0)))
        .collect()
}

/// Spawn point near the bottom edge, at `fraction` of the field width
pub(crate) fn bottom_spawn(world: &EntityManager, fraction: f32) -> Vec2 {
    Vec2::new(
        world.field.width * fraction,
        world.field.height - crate::consts::SHIP_SIZE,
    )
}
