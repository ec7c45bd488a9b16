//! Jet flight model
//!
//! The jet always flies forward (+Z). The forward step is heavily smoothed,
//! so the jet eases up to speed; the strafe steps from the directional
//! intents are applied raw, after the smoothed step, in the jet's own frame.

use glam::{Mat4, Vec3};

use super::collision::Contacts;
use crate::transform::{smooth, translate_local};

/// Directional intents held this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intents {
    pub up: bool,
    pub down: bool,
    /// Toward the left wall (+X)
    pub left: bool,
    /// Toward the right wall (-X)
    pub right: bool,
}

/// Advance the jet transform by one tick.
///
/// `contacts` are the flags from the previous collision pass: climbing is
/// suppressed at the ceiling and strafing into a touched wall is ignored.
pub fn advance(
    jet: &Mat4,
    speed: f32,
    smoothing: f32,
    intents: Intents,
    dt: f32,
    contacts: &Contacts,
) -> Mat4 {
    let raw = translate_local(jet, Vec3::Z * speed);
    let mut next = smooth(jet, &raw, smoothing);

    let step = speed * dt;
    if intents.up && !contacts.ceiling {
        next = translate_local(&next, Vec3::Y * step);
    }
    if intents.down {
        next = translate_local(&next, Vec3::NEG_Y * step);
    }
    if intents.left && !contacts.left_wall {
        next = translate_local(&next, Vec3::X * step);
    }
    if intents.right && !contacts.right_wall {
        next = translate_local(&next, Vec3::NEG_X * step);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::position;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_forward_step_is_smoothed() {
        let next = advance(&Mat4::IDENTITY, 20.0, 0.01, Intents::default(), DT, &Contacts::default());
        let p = position(&next);
        assert!((p.z - 0.2).abs() < 1e-6);
        assert_eq!(p.x, 0.0);
        assert_eq!(p.y, 0.0);
    }

    #[test]
    fn test_strafe_steps_are_raw() {
        let intents = Intents {
            up: true,
            left: true,
            ..Default::default()
        };
        let next = advance(&Mat4::IDENTITY, 20.0, 0.01, intents, DT, &Contacts::default());
        let p = position(&next);
        assert!((p.y - 20.0 * DT).abs() < 1e-6);
        assert!((p.x - 20.0 * DT).abs() < 1e-6);
    }

    #[test]
    fn test_opposite_intents_cancel() {
        let intents = Intents {
            up: true,
            down: true,
            left: true,
            right: true,
        };
        let next = advance(&Mat4::IDENTITY, 20.0, 0.01, intents, DT, &Contacts::default());
        let p = position(&next);
        assert!(p.x.abs() < 1e-6);
        assert!(p.y.abs() < 1e-6);
    }

    #[test]
    fn test_ceiling_suppresses_climb_only() {
        let contacts = Contacts {
            ceiling: true,
            ..Default::default()
        };
        let up = Intents {
            up: true,
            ..Default::default()
        };
        let p = position(&advance(&Mat4::IDENTITY, 20.0, 0.01, up, DT, &contacts));
        assert_eq!(p.y, 0.0);

        let down = Intents {
            down: true,
            ..Default::default()
        };
        let p = position(&advance(&Mat4::IDENTITY, 20.0, 0.01, down, DT, &contacts));
        assert!(p.y < 0.0);
    }

    #[test]
    fn test_wall_contact_blocks_strafe_into_wall() {
        let contacts = Contacts {
            right_wall: true,
            ..Default::default()
        };
        let right = Intents {
            right: true,
            ..Default::default()
        };
        let p = position(&advance(&Mat4::IDENTITY, 20.0, 0.01, right, DT, &contacts));
        assert_eq!(p.x, 0.0);

        // Steering away from the wall still works
        let left = Intents {
            left: true,
            ..Default::default()
        };
        let p = position(&advance(&Mat4::IDENTITY, 20.0, 0.01, left, DT, &contacts));
        assert!(p.x > 0.0);
    }
}
