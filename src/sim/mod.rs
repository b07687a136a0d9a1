//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Timestamps come from the caller (no wall clock)
//! - Seeded RNG only
//! - Stable iteration order
//! - No rendering or platform dependencies

pub mod collision;
pub mod damage;
pub mod enemy;
pub mod entity_manager;
pub mod gadget;
pub mod meteorite;
pub mod projectile;
pub mod ship;
pub mod state;
pub mod tick;

pub use collision::{rect_circle_overlap, within_radius};
pub use damage::{HitOutcome, apply_gadget, apply_hit};
pub use enemy::Enemy;
pub use entity_manager::EntityManager;
pub use gadget::{Gadget, GadgetKind};
pub use meteorite::{Meteorite, MeteoriteKind, MeteoriteProfile};
pub use projectile::Projectile;
pub use ship::{Ship, WeaponKind};
pub use state::{CloudZone, Field, GameEvent, HitScope, Palette, PlayState, Status, Tally};
pub use tick::{Action, InputSnapshot, steer_ship};
