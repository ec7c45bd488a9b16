//! Canyon Run - fly a jet down a canyon, outrun a homing missile
//!
//! Core modules:
//! - `sim`: Deterministic simulation (flight, missile, collisions, game state)
//! - `render`: Render frame description handed to the host renderer
//! - `transform`: Mat4 helpers shared by the simulation and the renderer
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences

pub mod render;
pub mod settings;
pub mod sim;
pub mod transform;
pub mod tuning;

pub use settings::Settings;
pub use tuning::{CanyonGeometry, Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Fixed simulation timestep (the game was tuned at 60 fps)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Uniform scale of the jet model around its transform
    pub const JET_MODEL_SCALE: f32 = 4.0;
    /// Uniform scale of the missile model around its transform
    pub const MISSILE_MODEL_SCALE: f32 = 2.0;

    /// Where the dormant missile is parked, far behind the start line
    pub const MISSILE_PARKED_Z: f32 = -1000.0;

    /// Chase camera eye, relative to the jet
    pub const CAMERA_EYE: Vec3 = Vec3::new(0.0, 12.0, -35.0);
    /// Vertical field of view (radians)
    pub const CAMERA_FOV: f32 = std::f32::consts::FRAC_PI_4;
    pub const CAMERA_NEAR: f32 = 0.1;
    pub const CAMERA_FAR: f32 = 1000.0;

    /// Seconds of the outcome animation before it holds its last pose
    pub const OUTCOME_ANIMATION_SECS: f32 = 3.0;
}

/// Clamp a ratio into the domain of `asin`/`acos`.
///
/// NaN maps to 0 so a degenerate ratio still yields a finite angle.
#[inline]
pub fn clamp_unit(ratio: f32) -> f32 {
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_unit() {
        assert_eq!(clamp_unit(0.5), 0.5);
        assert_eq!(clamp_unit(1.000_001), 1.0);
        assert_eq!(clamp_unit(-3.0), -1.0);
        assert_eq!(clamp_unit(f32::NAN), 0.0);
        assert_eq!(clamp_unit(f32::INFINITY), 1.0);
    }
}
