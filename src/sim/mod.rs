//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through the `dt` handed to `tick`
//! - Seeded RNG only
//! - Fixed step order within a tick (flight, missile, collisions, outcome)
//! - No rendering or platform dependencies

pub mod collision;
pub mod flight;
pub mod missile;
pub mod state;
pub mod tick;

pub use collision::{Contacts, detect, jet_missile_collision, wall_contacts};
pub use flight::{Intents, advance};
pub use missile::{heading, homing_angles};
pub use state::{GameOutcome, GameState, JetState, MissileState, Status};
pub use tick::{DamageEvent, TickInput, TickReport, tick};
