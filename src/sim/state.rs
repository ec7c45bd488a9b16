//! Game state and core simulation types
//!
//! Everything a session mutates lives here and is owned by [`GameState`].

use glam::{Mat4, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Contacts;
use crate::consts::MISSILE_PARKED_Z;
use crate::transform;
use crate::tuning::Tuning;

/// Where the run stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameOutcome {
    /// Flying down the canyon
    #[default]
    Playing,
    /// Reached the uranium deposit
    Won,
    /// Out of health (walls, missile or water)
    Lost,
}

impl GameOutcome {
    /// Won and Lost freeze the simulation until a restart
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameOutcome::Playing)
    }
}

/// The player's jet
#[derive(Debug, Clone, PartialEq)]
pub struct JetState {
    pub transform: Mat4,
    pub speed: f32,
    pub health: f32,
}

impl JetState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            transform: Mat4::IDENTITY,
            speed: tuning.jet_speed,
            health: tuning.max_health,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        transform::position(&self.transform)
    }
}

/// The single homing missile (dormant while not shown)
#[derive(Debug, Clone, PartialEq)]
pub struct MissileState {
    pub transform: Mat4,
    pub speed: f32,
    /// Homing when true, dormant otherwise
    pub shown: bool,
    /// Simulation time after which the next spawn may happen
    pub next_spawn_time: f32,
    /// Chance per tick of spawning once eligible
    pub spawn_probability: f32,
}

impl MissileState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            transform: parked_transform(),
            speed: tuning.missile_speed,
            shown: false,
            next_spawn_time: tuning.first_spawn_time,
            spawn_probability: tuning.spawn_probability,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        transform::position(&self.transform)
    }

    /// Hide the missile and move it far behind the start line
    pub fn park(&mut self) {
        self.shown = false;
        self.transform = parked_transform();
    }
}

fn parked_transform() -> Mat4 {
    Mat4::from_translation(Vec3::new(0.0, 0.0, MISSILE_PARKED_Z))
}

/// Read-only snapshot for the HUD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Status {
    /// Remaining health, never below zero
    pub health: f32,
    /// Distance flown down the canyon (jet forward coordinate)
    pub distance: f32,
    pub outcome: GameOutcome,
    /// Damage was taken within the last hit cooldown
    pub hit: bool,
    pub missile_shown: bool,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Balance numbers, fixed for the session
    pub tuning: Tuning,
    /// Run seed for reproducibility
    pub seed: u64,
    /// Spawn RNG, re-seeded from `seed` on restart
    pub(crate) rng: Pcg32,
    /// Simulation seconds since session start (advances only while playing)
    pub time: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub outcome: GameOutcome,
    /// Seconds spent in the current terminal outcome (drives outcome animations)
    pub outcome_time: f32,
    pub jet: JetState,
    pub missile: MissileState,
    /// Collision flags from the latest tick
    pub contacts: Contacts,
    /// Remaining hit-flash time
    pub hit_timer: f32,
}

impl GameState {
    /// Create a new session with the given tuning and seed
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            seed,
            time: 0.0,
            time_ticks: 0,
            outcome: GameOutcome::Playing,
            outcome_time: 0.0,
            jet: JetState::new(&tuning),
            missile: MissileState::new(&tuning),
            contacts: Contacts::default(),
            hit_timer: 0.0,
            tuning,
        }
    }

    /// Reset every mutable field to its session default
    pub fn restart(&mut self) {
        *self = Self::new(self.tuning.clone(), self.seed);
    }

    /// Damage was taken recently
    #[inline]
    pub fn is_hit(&self) -> bool {
        self.hit_timer > 0.0
    }

    pub fn status(&self) -> Status {
        Status {
            health: self.jet.health.max(0.0),
            distance: self.jet.position().z,
            outcome: self.outcome,
            hit: self.is_hit(),
            missile_shown: self.missile.shown,
        }
    }
}
