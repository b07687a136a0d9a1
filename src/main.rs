//! Meteor Dodger headless runner
//!
//! Drives a session with a scripted autopilot on a fake clock and logs what
//! happens. Rendering and real input belong to a host; this binary exercises
//! the simulation end to end.
//!
//! Usage: `meteor-dodger [solo|duo|duel] [--tuning FILE] [--difficulty easy|normal|hard]`

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use clap::{Parser, ValueEnum};
use glam::Vec2;

use meteor_dodger::audio::{AudioSink, SoundEffect, play_cues};
use meteor_dodger::consts::*;
use meteor_dodger::session::{DuelSession, DuoSession, Outcome, SoloSession};
use meteor_dodger::sim::{EntityManager, GameEvent, InputSnapshot, Ship};
use meteor_dodger::{Difficulty, LevelSummary, ScoreBoard, Settings, Tuning};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Solo,
    Duo,
    Duel,
}

#[derive(Parser, Debug)]
#[command(name = "meteor-dodger")]
#[command(about = "Run a headless Meteor Dodger session with autopiloted ships")]
struct Cli {
    /// Game mode to simulate
    #[arg(value_enum, default_value_t = Mode::Solo)]
    mode: Mode,

    /// Tuning JSON replacing the built-in balance
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// easy, normal or hard
    #[arg(long, default_value = "normal", value_parser = parse_difficulty)]
    difficulty: Difficulty,
}

fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    Difficulty::from_str(s).ok_or_else(|| format!("expected easy, normal or hard, got '{s}'"))
}

fn load_tuning(path: &Path) -> Result<Tuning, String> {
    let json = std::fs::read_to_string(path).map_err(|err| format!("cannot read {}: {}", path.display(), err))?;
    Tuning::from_json(&json).map_err(|err| format!("{}: {}", path.display(), err))
}

/// Simulated time limit per run
const DEMO_LIMIT_MS: u64 = 10 * 60 * 1000;

/// Counts cues instead of playing them
#[derive(Default)]
struct CueCounter {
    played: usize,
}

impl AudioSink for CueCounter {
    fn play(&mut self, effect: SoundEffect) {
        self.played += 1;
        log::trace!("cue {:?}", effect);
    }
}

/// Keep out from under the nearest falling rock, dash when one is close,
/// fire constantly
fn autopilot(ship: &Ship, world: &EntityManager) -> InputSnapshot {
    let mut input = InputSnapshot {
        shoot: true,
        ..Default::default()
    };

    let threat = world
        .meteorites
        .iter()
        .filter(|m| (m.pos.x - ship.pos.x).abs() < m.radius() + ship.size.x)
        .min_by(|a, b| a.pos.distance_squared(ship.pos).total_cmp(&b.pos.distance_squared(ship.pos)));

    match threat {
        Some(m) => {
            let dodge_right = m.pos.x <= ship.pos.x;
            input.right = dodge_right;
            input.left = !dodge_right;
            input.dash = m.pos.distance(ship.pos) < m.radius() + ship.size.x;
        }
        None => {
            let centre = Vec2::new(world.field.width / 2.0, ship.pos.y);
            input.left = ship.pos.x > centre.x + SHIP_SPEED;
            input.right = ship.pos.x < centre.x - SHIP_SPEED;
        }
    }
    input
}

fn log_shaking_enemies(world: &EntityManager) {
    for enemy in world.enemies.iter().filter(|e| e.is_shaking(world.now_ms)) {
        log::trace!("enemy #{} shaking at {:?}", enemy.id, enemy.pos);
    }
}

fn log_events(events: &[GameEvent], settings: &Settings, audio: &mut CueCounter) {
    for event in events {
        match event {
            GameEvent::MeteoriteDestroyed { kind, player, gold } => {
                log::debug!("P{} destroyed a {} meteorite (+{} gold)", player + 1, kind.as_str(), gold)
            }
            GameEvent::ShipHit { player, health_left } => {
                log::info!("P{} hit, {} health left", player + 1, health_left)
            }
            GameEvent::GadgetCollected { kind, player } => {
                log::info!("P{} picked up {}", player + 1, kind.as_str())
            }
            _ => {}
        }
    }
    play_cues(events, settings, Some(audio as &mut dyn AudioSink));
}

fn run_solo(tuning: Tuning, settings: Settings) {
    let last_level = tuning.levels.len() as u32;
    let frame_ms = tuning.frame_ms;
    let board = Rc::new(RefCell::new(ScoreBoard::new()));
    let mut audio = CueCounter::default();
    let mut session = SoloSession::new(tuning, settings.clone(), 0);
    let hook_board = Rc::clone(&board);
    session.set_score_hook(Box::new(move |s: &LevelSummary| {
        hook_board.borrow_mut().record(s.clone());
    }));

    let mut now = 0;
    while now < DEMO_LIMIT_MS {
        now += frame_ms;
        let input = autopilot(&session.ship, &session.world);
        let outcome = session.update(&input, now);
        let events = session.drain_events();
        log_events(&events, &settings, &mut audio);
        log_shaking_enemies(&session.world);

        match outcome {
            Outcome::GameOver => break,
            Outcome::LevelComplete(_) if session.level() >= last_level => break,
            Outcome::LevelComplete(_) => session.next_level(now),
            _ => {}
        }
    }

    let board = board.borrow();
    println!(
        "solo: reached level {}, {} gold, {} cues",
        session.level(),
        session.gold(),
        audio.played
    );
    if board.is_empty() {
        println!("  no level cleared");
    }
    for entry in &board.entries {
        println!("  level {}: {} kills in {}s", entry.level, entry.total_kills(), entry.elapsed_ms / 1000);
    }
}

fn run_duo(tuning: Tuning, settings: Settings) {
    let last_level = tuning.levels.len() as u32;
    let frame_ms = tuning.frame_ms;
    let mut audio = CueCounter::default();
    let mut session = DuoSession::new(tuning, settings.clone(), 0);

    let mut now = 0;
    while now < DEMO_LIMIT_MS {
        now += frame_ms;
        let mut inputs = [InputSnapshot::default(); MAX_PLAYERS];
        for ship in &session.ships {
            inputs[ship.player] = autopilot(ship, &session.world);
        }
        let outcome = session.update(&inputs, now);
        let events = session.drain_events();
        log_events(&events, &settings, &mut audio);
        log_shaking_enemies(&session.world);

        match outcome {
            Outcome::GameOver => break,
            Outcome::LevelComplete(summary) => {
                println!("duo: level {} cleared, kills {:?}", summary.level, summary.kills);
                if session.level() >= last_level {
                    break;
                }
                session.next_level(now);
            }
            _ => {}
        }
    }

    println!(
        "duo: reached level {}, gold {:?}, {} cues",
        session.level(),
        session.world.tally.gold,
        audio.played
    );
}

fn run_duel(tuning: Tuning, settings: Settings) {
    let frame_ms = tuning.frame_ms;
    let mut audio = CueCounter::default();
    let mut session = DuelSession::new(tuning, settings.clone(), 0);

    let mut now = 0;
    while now < DEMO_LIMIT_MS {
        now += frame_ms;
        let inputs = [
            autopilot(&session.ships[0], &session.world),
            autopilot(&session.ships[1], &session.world),
        ];
        let outcome = session.update(&inputs, now);
        let events = session.drain_events();
        log_events(&events, &settings, &mut audio);
        log_shaking_enemies(&session.world);

        match outcome {
            Outcome::RoundOver { winner } => println!("duel: round over, winner {:?}", winner.map(|w| w + 1)),
            Outcome::MatchOver { winner } => {
                println!("duel: player {} wins {:?}", winner + 1, session.wins);
                return;
            }
            _ => {}
        }
    }
    println!("duel: undecided after {}s, {:?}", DEMO_LIMIT_MS / 1000, session.wins);
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let tuning = match &cli.tuning {
        Some(path) => match load_tuning(path) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::error!("{}", err);
                return ExitCode::FAILURE;
            }
        },
        None => Tuning::default(),
    };
    let settings = Settings {
        difficulty: cli.difficulty,
        ..Default::default()
    };

    log::info!(
        "Meteor Dodger ({:?}, {}) with seed {:#x}",
        cli.mode,
        settings.difficulty.as_str(),
        tuning.seed
    );

    match cli.mode {
        Mode::Solo => run_solo(tuning, settings),
        Mode::Duo => run_duo(tuning, settings),
        Mode::Duel => run_duel(tuning, settings),
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults_to_normal_solo() {
        let cli = Cli::try_parse_from(["meteor-dodger"]).unwrap();
        assert_eq!(cli.mode, Mode::Solo);
        assert_eq!(cli.difficulty, Difficulty::Normal);
        assert!(cli.tuning.is_none());
    }

    #[test]
    fn test_cli_parses_mode_and_options() {
        let cli = Cli::try_parse_from(["meteor-dodger", "duel", "--difficulty", "hard", "--tuning", "balance.json"])
            .unwrap();
        assert_eq!(cli.mode, Mode::Duel);
        assert_eq!(cli.difficulty, Difficulty::Hard);
        assert_eq!(cli.tuning, Some(PathBuf::from("balance.json")));
    }

    #[test]
    fn test_cli_rejects_unknown_values() {
        assert!(Cli::try_parse_from(["meteor-dodger", "coop"]).is_err());
        assert!(Cli::try_parse_from(["meteor-dodger", "--difficulty", "brutal"]).is_err());
    }
}
