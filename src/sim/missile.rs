//! Homing missile model
//!
//! One missile at most. It spawns ahead of the jet at a random offset, turns
//! toward the jet every tick using two angles taken from the line of sight,
//! and flies down the canyon toward decreasing Z until it hits the jet or
//! overshoots it.

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Quat, Vec3};
use rand::Rng;

use super::state::MissileState;
use crate::clamp_unit;
use crate::transform::{position, smooth};
use crate::tuning::Tuning;

/// Line-of-sight angles from the missile to the jet.
///
/// Returns `(yaw, pitch)` where `yaw = asin(dx / d)` and
/// `pitch = acos(dy / d)`. Both ratios are clamped into [-1, 1], and a zero
/// separation yields `(0, π/2)` (straight ahead), so the result is always
/// finite for finite inputs.
pub fn homing_angles(missile: Vec3, jet: Vec3) -> (f32, f32) {
    let delta = jet - missile;
    let distance = delta.length();
    if !distance.is_normal() {
        return (0.0, FRAC_PI_2);
    }
    let yaw = clamp_unit(delta.x / distance).asin();
    let pitch = clamp_unit(delta.y / distance).acos();
    (yaw, pitch)
}

/// Orientation whose local -Z follows the line of sight.
///
/// Yaw turns about the vertical axis, the pitch complement (elevation)
/// about the horizontal one.
pub fn heading(yaw: f32, pitch: f32) -> Quat {
    Quat::from_rotation_y(-yaw) * Quat::from_rotation_x(FRAC_PI_2 - pitch)
}

/// Spawn a missile ahead of the jet if one is due.
///
/// Eligible once `time` is past the scheduled spawn time and no missile is
/// shown; then a draw below the spawn probability triggers it. Returns true
/// when a missile spawned.
pub fn try_spawn<R: Rng + ?Sized>(
    missile: &mut MissileState,
    jet: &Mat4,
    time: f32,
    tuning: &Tuning,
    rng: &mut R,
) -> bool {
    if missile.shown || time <= missile.next_spawn_time {
        return false;
    }
    if rng.random::<f32>() >= missile.spawn_probability {
        return false;
    }

    missile.next_spawn_time += tuning.spawn_interval;

    let offset_x = spawn_offset(tuning, rng);
    let offset_y = spawn_offset(tuning, rng);
    let start = position(jet) + Vec3::new(offset_x, offset_y, tuning.spawn_distance);
    missile.transform = Mat4::from_translation(start);
    missile.shown = true;

    log::debug!(
        "Missile spawned at ({:.1}, {:.1}, {:.1}), next spawn after t={:.1}",
        start.x,
        start.y,
        start.z,
        missile.next_spawn_time
    );
    true
}

/// One of `spawn_offset_steps` evenly spaced magnitudes across the canyon
/// half-width, with a random sign
fn spawn_offset<R: Rng + ?Sized>(tuning: &Tuning, rng: &mut R) -> f32 {
    let steps = tuning.spawn_offset_steps as f32;
    let magnitude = (rng.random::<f32>() * steps).floor() * (tuning.canyon.half_width / steps);
    let sign = if rng.random::<f32>() > 0.5 { 1.0 } else { -1.0 };
    magnitude * sign
}

/// Turn toward the jet, step forward, and blend into the current transform.
///
/// A candidate transform that is not finite is dropped and the missile keeps
/// its previous transform.
pub fn home(missile: &mut MissileState, jet: &Mat4, smoothing: f32) {
    let from = missile.position();
    let (yaw, pitch) = homing_angles(from, position(jet));
    let rotation = heading(yaw, pitch);

    let target = from + rotation * (Vec3::NEG_Z * missile.speed);
    let raw = Mat4::from_rotation_translation(rotation, target);
    let next = smooth(&missile.transform, &raw, smoothing);

    if next.is_finite() {
        missile.transform = next;
    } else {
        log::warn!("Rejected non-finite missile transform (yaw={yaw}, pitch={pitch})");
    }
}

/// The missile fell more than `margin` behind the jet
#[inline]
pub fn overshot(missile: &MissileState, jet: &Mat4, margin: f32) -> bool {
    missile.position().z < position(jet).z - margin
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn eager_tuning() -> Tuning {
        Tuning {
            spawn_probability: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_homing_angles_straight_ahead() {
        let (yaw, pitch) = homing_angles(Vec3::new(0.0, 0.0, 100.0), Vec3::ZERO);
        assert!(yaw.abs() < 1e-6);
        assert!((pitch - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_homing_angles_degenerate_distance() {
        let (yaw, pitch) = homing_angles(Vec3::ONE, Vec3::ONE);
        assert_eq!((yaw, pitch), (0.0, FRAC_PI_2));
    }

    #[test]
    fn test_homing_angles_pure_lateral() {
        // Jet directly to the +X side: the ratio is exactly 1
        let (yaw, pitch) = homing_angles(Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0));
        assert!((yaw - FRAC_PI_2).abs() < 1e-6);
        assert!(pitch.is_finite());
    }

    #[test]
    fn test_heading_points_at_target() {
        let missile = Vec3::new(0.0, 0.0, 50.0);
        let jet = Vec3::new(10.0, 5.0, 0.0);
        let (yaw, pitch) = homing_angles(missile, jet);
        let dir = heading(yaw, pitch) * Vec3::NEG_Z;
        let to_jet = (jet - missile).normalize();
        assert!(dir.x > 0.0 && dir.y > 0.0 && dir.z < 0.0);
        assert!(dir.dot(to_jet) > 0.95);
        assert!((dir.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_no_spawn_before_schedule() {
        let tuning = eager_tuning();
        let mut missile = MissileState::new(&tuning);
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(!try_spawn(&mut missile, &Mat4::IDENTITY, 1.9, &tuning, &mut rng));
        assert!(!try_spawn(&mut missile, &Mat4::IDENTITY, 2.0, &tuning, &mut rng));
        assert!(!missile.shown);
    }

    #[test]
    fn test_spawn_places_missile_ahead_of_jet() {
        let tuning = eager_tuning();
        let mut missile = MissileState::new(&tuning);
        let mut rng = Pcg32::seed_from_u64(1);
        let jet = Mat4::from_translation(Vec3::new(3.0, 1.0, 40.0));

        assert!(try_spawn(&mut missile, &jet, 2.5, &tuning, &mut rng));
        assert!(missile.shown);
        assert_eq!(missile.next_spawn_time, 4.0);

        let p = missile.position();
        assert_eq!(p.z, 160.0);
        assert!((p.x - 3.0).abs() < tuning.canyon.half_width);
        assert!((p.y - 1.0).abs() < tuning.canyon.half_width);
        // Offsets land on the discrete grid of half_width / steps
        let step = tuning.canyon.half_width / tuning.spawn_offset_steps as f32;
        let steps_x = (p.x - 3.0).abs() / step;
        assert!((steps_x - steps_x.round()).abs() < 1e-3);
    }

    #[test]
    fn test_single_missile_while_shown() {
        let tuning = eager_tuning();
        let mut missile = MissileState::new(&tuning);
        let mut rng = Pcg32::seed_from_u64(9);
        assert!(try_spawn(&mut missile, &Mat4::IDENTITY, 3.0, &tuning, &mut rng));
        let spawned_at = missile.transform;
        assert!(!try_spawn(&mut missile, &Mat4::IDENTITY, 10.0, &tuning, &mut rng));
        assert_eq!(missile.transform, spawned_at);
    }

    #[test]
    fn test_zero_probability_never_spawns() {
        let tuning = Tuning {
            spawn_probability: 0.0,
            ..Default::default()
        };
        let mut missile = MissileState::new(&tuning);
        let mut rng = Pcg32::seed_from_u64(3);
        for i in 0..1000 {
            assert!(!try_spawn(&mut missile, &Mat4::IDENTITY, 2.0 + i as f32, &tuning, &mut rng));
        }
    }

    #[test]
    fn test_home_moves_toward_jet() {
        let tuning = Tuning::default();
        let mut missile = MissileState::new(&tuning);
        missile.shown = true;
        missile.transform = Mat4::from_translation(Vec3::new(10.0, 0.0, 120.0));
        let jet = Mat4::IDENTITY;

        let before = missile.position().distance(Vec3::ZERO);
        home(&mut missile, &jet, tuning.smoothing);
        let after = missile.position().distance(Vec3::ZERO);
        assert!(after < before);
        // One percent of an 80 unit step
        assert!((before - after - 0.8).abs() < 0.05);
        assert!(missile.transform.is_finite());
    }

    #[test]
    fn test_home_on_top_of_jet_stays_finite() {
        let tuning = Tuning::default();
        let mut missile = MissileState::new(&tuning);
        missile.shown = true;
        missile.transform = Mat4::IDENTITY;
        home(&mut missile, &Mat4::IDENTITY, tuning.smoothing);
        assert!(missile.transform.is_finite());
        assert!(missile.position().z < 0.0);
    }

    #[test]
    fn test_overshot_margin() {
        let tuning = Tuning::default();
        let mut missile = MissileState::new(&tuning);
        let jet = Mat4::from_translation(Vec3::new(0.0, 0.0, 100.0));

        missile.transform = Mat4::from_translation(Vec3::new(0.0, 0.0, 81.0));
        assert!(!overshot(&missile, &jet, tuning.retire_margin));
        missile.transform = Mat4::from_translation(Vec3::new(0.0, 0.0, 79.0));
        assert!(overshot(&missile, &jet, tuning.retire_margin));
    }
}
