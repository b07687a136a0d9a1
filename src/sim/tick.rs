//! Per-tick player input
//!
//! The host refreshes an `InputSnapshot` per player before every update;
//! `steer_ship` turns it into movement, dash and firing for one frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ship::Ship;
use super::state::{Field, GameEvent};
use crate::audio::SoundEffect;

/// Logical player actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Shoot,
    Dash,
}

/// Pressed state of every action for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub shoot: bool,
    pub dash: bool,
}

impl InputSnapshot {
    /// Snapshot with exactly the given actions pressed
    pub fn pressing(actions: &[Action]) -> Self {
        let mut input = Self::default();
        for &action in actions {
            input.set(action, true);
        }
        input
    }

    pub fn set(&mut self, action: Action, pressed: bool) {
        match action {
            Action::Up => self.up = pressed,
            Action::Down => self.down = pressed,
            Action::Left => self.left = pressed,
            Action::Right => self.right = pressed,
            Action::Shoot => self.shoot = pressed,
            Action::Dash => self.dash = pressed,
        }
    }

    pub fn pressed(&self, action: Action) -> bool {
        match action {
            Action::Up => self.up,
            Action::Down => self.down,
            Action::Left => self.left,
            Action::Right => self.right,
            Action::Shoot => self.shoot,
            Action::Dash => self.dash,
        }
    }

    /// Movement direction (not normalized; zero when idle or opposed)
    pub fn movement(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// Apply one tick of input to a live ship: dash or move, then fire
pub fn steer_ship(ship: &mut Ship, input: &InputSnapshot, field: &Field, now: u64, events: &mut Vec<GameEvent>) {
    if !ship.is_alive() {
        return;
    }

    ship.clear_spent_dash();
    let dir = input.movement();
    if input.dash && ship.start_dash(dir, now) {
        events.push(GameEvent::Sound(SoundEffect::Dash));
    }
    if ship.is_dashing() {
        ship.advance_dash(field);
    } else {
        ship.move_by(dir, field);
    }

    if input.shoot && ship.fire(now) > 0 {
        events.push(GameEvent::Sound(SoundEffect::Shot));
    }
}
