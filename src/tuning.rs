//! Data-driven game balance
//!
//! Every number the simulation reads lives in [`Tuning`]. A partial JSON
//! document overrides only the fields it names; the rest keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Canyon dimensions, fixed for a whole session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanyonGeometry {
    /// Distance from the canyon axis to each wall face
    pub half_width: f32,
    /// Forward extent of the canyon; the deposit sits near the end
    pub length: f32,
    /// Thickness of the wall slabs beyond the wall face
    pub wall_displacement: f32,
    /// Ceiling: the jet cannot climb past this height
    pub max_height: f32,
    /// Height of the water surface at the canyon floor
    pub water_height: f32,
    /// How far before the end of the canyon the deposit counts as reached
    pub goal_margin: f32,
}

impl Default for CanyonGeometry {
    fn default() -> Self {
        Self {
            half_width: 20.0,
            length: 1000.0,
            wall_displacement: 1.0,
            max_height: 15.0,
            water_height: -15.0,
            goal_margin: 50.0,
        }
    }
}

impl CanyonGeometry {
    /// Forward position at which the run is won
    #[inline]
    pub fn goal_z(&self) -> f32 {
        self.length - self.goal_margin
    }
}

/// Gameplay balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Jet forward speed (units per tick before smoothing) and strafe speed (units/s)
    pub jet_speed: f32,
    /// Missile speed (units per tick before smoothing)
    pub missile_speed: f32,
    /// Share of the freshly computed transform kept each tick
    pub smoothing: f32,

    /// Simulation time of the first spawn opportunity (seconds)
    pub first_spawn_time: f32,
    /// Delay added to the spawn schedule after each spawn (seconds)
    pub spawn_interval: f32,
    /// Chance per tick that an eligible missile spawns
    pub spawn_probability: f32,
    /// How far ahead of the jet a missile appears
    pub spawn_distance: f32,
    /// Number of discrete steps across the spawn offset range
    pub spawn_offset_steps: u32,
    /// How far behind the jet a missile may fall before it is retired
    pub retire_margin: f32,

    pub max_health: f32,
    /// Health lost per tick while touching a wall
    pub wall_damage: f32,
    /// Health lost per missile impact
    pub missile_damage: f32,
    /// How long the hit flag stays up after damage (seconds)
    pub hit_cooldown: f32,

    /// Half-extent of the jet's hit box in its local frame
    pub leeway: f32,
    /// Half-extent of the cube sampled around the missile
    pub missile_half_extent: f32,
    /// Lateral distance from the jet axis to a wing tip
    pub wing_tip: f32,
    /// How far a wing tip may sink into a wall before it counts as contact
    pub wall_contact_inset: f32,

    pub canyon: CanyonGeometry,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            jet_speed: 20.0,
            missile_speed: 80.0,
            smoothing: 0.01,

            first_spawn_time: 2.0,
            spawn_interval: 2.0,
            spawn_probability: 0.25,
            spawn_distance: 120.0,
            spawn_offset_steps: 100,
            retire_margin: 20.0,

            max_health: 100.0,
            wall_damage: 0.25,
            missile_damage: 10.0,
            hit_cooldown: 0.5,

            leeway: crate::consts::JET_MODEL_SCALE,
            missile_half_extent: crate::consts::MISSILE_MODEL_SCALE,
            wing_tip: 8.5,
            wall_contact_inset: 2.0,

            canyon: CanyonGeometry::default(),
        }
    }
}

impl Tuning {
    /// Parse and validate a (possibly partial) JSON document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read a tuning file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Distance from the jet axis at which a wing touches a wall
    #[inline]
    pub fn wing_margin(&self) -> f32 {
        self.wing_tip - self.wall_contact_inset
    }

    /// Reject combinations the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
            TuningError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        let finite = [
            ("jet_speed", self.jet_speed),
            ("missile_speed", self.missile_speed),
            ("smoothing", self.smoothing),
            ("first_spawn_time", self.first_spawn_time),
            ("spawn_interval", self.spawn_interval),
            ("spawn_probability", self.spawn_probability),
            ("spawn_distance", self.spawn_distance),
            ("retire_margin", self.retire_margin),
            ("max_health", self.max_health),
            ("wall_damage", self.wall_damage),
            ("missile_damage", self.missile_damage),
            ("hit_cooldown", self.hit_cooldown),
            ("leeway", self.leeway),
            ("missile_half_extent", self.missile_half_extent),
            ("wing_tip", self.wing_tip),
            ("wall_contact_inset", self.wall_contact_inset),
            ("canyon.half_width", self.canyon.half_width),
            ("canyon.length", self.canyon.length),
            ("canyon.wall_displacement", self.canyon.wall_displacement),
            ("canyon.max_height", self.canyon.max_height),
            ("canyon.water_height", self.canyon.water_height),
            ("canyon.goal_margin", self.canyon.goal_margin),
        ];
        if let Some(&(field, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(field, "must be finite"));
        }

        if self.smoothing <= 0.0 || self.smoothing > 1.0 {
            return Err(invalid("smoothing", "must be in (0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.spawn_probability) {
            return Err(invalid("spawn_probability", "must be in [0, 1]"));
        }
        if self.spawn_offset_steps == 0 {
            return Err(invalid("spawn_offset_steps", "must be at least 1"));
        }
        if self.max_health <= 0.0 {
            return Err(invalid("max_health", "must be positive"));
        }
        if self.jet_speed < 0.0 || self.missile_speed < 0.0 {
            return Err(invalid("jet_speed", "speeds cannot be negative"));
        }
        if self.wall_damage < 0.0 || self.missile_damage < 0.0 {
            return Err(invalid("wall_damage", "damage cannot be negative"));
        }
        if self.leeway <= 0.0 || self.missile_half_extent <= 0.0 {
            return Err(invalid("leeway", "hit boxes must have positive size"));
        }
        if self.canyon.half_width <= self.wing_margin() {
            return Err(invalid(
                "canyon.half_width",
                format!(
                    "{} leaves no room for a wing margin of {}",
                    self.canyon.half_width,
                    self.wing_margin()
                ),
            ));
        }
        if self.canyon.water_height >= self.canyon.max_height {
            return Err(invalid("canyon.water_height", "must lie below max_height"));
        }
        if self.canyon.goal_z() <= 0.0 {
            return Err(invalid("canyon.goal_margin", "goal would be behind the start"));
        }
        Ok(())
    }
}
