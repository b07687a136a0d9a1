//! Falling pickups

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Field;
use crate::consts::*;

/// Gadget types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GadgetKind {
    SpeedBoost,
    Shield,
    Teleport,
    RapidFire,
    Heal,
}

impl GadgetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GadgetKind::SpeedBoost => "speed",
            GadgetKind::Shield => "shield",
            GadgetKind::Teleport => "teleport",
            GadgetKind::RapidFire => "rapid_fire",
            GadgetKind::Heal => "heal",
        }
    }

    /// Parse a kind name; unknown names fall back to `Heal`
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "speed" | "speed_boost" => GadgetKind::SpeedBoost,
            "shield" => GadgetKind::Shield,
            "teleport" => GadgetKind::Teleport,
            "rapid_fire" | "rapidfire" => GadgetKind::RapidFire,
            "heal" => GadgetKind::Heal,
            other => {
                log::warn!("Unknown gadget kind '{}', using heal", other);
                GadgetKind::Heal
            }
        }
    }
}

/// A pickup falling through the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gadget {
    pub id: u32,
    pub kind: GadgetKind,
    pub pos: Vec2,
    pub fall_speed: f32,
    pub size: f32,
    pub pickup_radius: f32,
    pub consumed: bool,
}

impl Gadget {
    pub fn new(id: u32, kind: GadgetKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            fall_speed: GADGET_FALL_SPEED,
            size: GADGET_SIZE,
            pickup_radius: GADGET_PICKUP_RADIUS,
            consumed: false,
        }
    }

    pub fn fall(&mut self) {
        self.pos.y += self.fall_speed;
    }

    pub fn is_out_of_field(&self, field: &Field) -> bool {
        self.pos.y - self.size / 2.0 > field.height
    }
}
