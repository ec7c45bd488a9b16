//! Collision detection for the jet
//!
//! All tests are pure and recomputed from scratch every tick, so a flag
//! clears as soon as its condition stops holding.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use super::state::{JetState, MissileState};
use crate::transform::relative;
use crate::tuning::{CanyonGeometry, Tuning};

/// Collision flags for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contacts {
    /// Wing touching the left wall (+X side)
    pub left_wall: bool,
    /// Wing touching the right wall (-X side)
    pub right_wall: bool,
    /// At or above the canyon ceiling
    pub ceiling: bool,
    /// Touching the water surface
    pub water: bool,
    /// Shown missile inside the jet's hit box
    pub missile: bool,
    /// Deposit reached
    pub goal: bool,
}

/// Corners of an axis-aligned cube centred on the origin
pub fn cube_corners(half_extent: f32) -> [Vec3; 8] {
    let h = half_extent;
    [
        Vec3::new(-h, -h, -h),
        Vec3::new(h, -h, -h),
        Vec3::new(-h, h, -h),
        Vec3::new(h, h, -h),
        Vec3::new(-h, -h, h),
        Vec3::new(h, -h, h),
        Vec3::new(-h, h, h),
        Vec3::new(h, h, h),
    ]
}

/// Point-sampled box test between the jet and the missile.
///
/// The corners of the missile's cube are carried into the jet's local frame;
/// the missile hits if any corner lies within `leeway` of the jet origin on
/// all three axes. Only corners are sampled, so a missile that crosses the
/// box between two ticks is missed.
pub fn jet_missile_collision(jet: &Mat4, missile: &Mat4, half_extent: f32, leeway: f32) -> bool {
    let to_jet = relative(jet, missile);
    cube_corners(half_extent).iter().any(|&corner| {
        let p = to_jet.transform_point3(corner);
        p.abs().cmple(Vec3::splat(leeway)).all()
    })
}

/// Wall contact as `(left, right)`.
///
/// `wing_margin` is the distance from the jet axis at which a wing counts as
/// touching; both bounds are inclusive.
pub fn wall_contacts(jet_x: f32, half_width: f32, wing_margin: f32) -> (bool, bool) {
    let left = jet_x + wing_margin >= half_width;
    let right = jet_x - wing_margin <= -half_width;
    (left, right)
}

/// The jet's belly (one unit below its origin) touches the water
#[inline]
pub fn water_contact(jet_y: f32, water_height: f32) -> bool {
    jet_y - 1.0 <= water_height
}

#[inline]
pub fn ceiling_contact(jet_y: f32, max_height: f32) -> bool {
    jet_y >= max_height
}

#[inline]
pub fn goal_reached(jet_z: f32, canyon: &CanyonGeometry) -> bool {
    jet_z >= canyon.goal_z()
}

/// Run every test for the current jet and missile transforms
pub fn detect(jet: &JetState, missile: &MissileState, tuning: &Tuning) -> Contacts {
    let p = jet.position();
    let canyon = &tuning.canyon;
    let (left_wall, right_wall) = wall_contacts(p.x, canyon.half_width, tuning.wing_margin());

    Contacts {
        left_wall,
        right_wall,
        ceiling: ceiling_contact(p.y, canyon.max_height),
        water: water_contact(p.y, canyon.water_height),
        missile: missile.shown
            && jet_missile_collision(
                &jet.transform,
                &missile.transform,
                tuning.missile_half_extent,
                tuning.leeway,
            ),
        goal: goal_reached(p.z, canyon),
    }
}
