//! Transform helpers over `glam::Mat4`
//!
//! Every object in the canyon is placed by a single affine matrix. The
//! translation lives in the last column (`w_axis`), so the world position of
//! an object is `w_axis.xyz`.

use glam::{Mat4, Vec3, Vec4};

/// World-space position of a transform
#[inline]
pub fn position(m: &Mat4) -> Vec3 {
    m.w_axis.truncate()
}

/// Blend `prev` toward `next`, column by column.
///
/// `weight` is the share of `next` in the result; the game uses 0.01, so each
/// tick only covers one percent of the gap. This is what gives the jet and
/// the missile their gradual acceleration.
pub fn smooth(prev: &Mat4, next: &Mat4, weight: f32) -> Mat4 {
    let mix = |a: Vec4, b: Vec4| a.lerp(b, weight);
    Mat4::from_cols(
        mix(prev.x_axis, next.x_axis),
        mix(prev.y_axis, next.y_axis),
        mix(prev.z_axis, next.z_axis),
        mix(prev.w_axis, next.w_axis),
    )
}

/// Translate in the object's own frame (right-multiplication)
#[inline]
pub fn translate_local(m: &Mat4, offset: Vec3) -> Mat4 {
    *m * Mat4::from_translation(offset)
}

/// Express `other` in the local frame of `frame`
#[inline]
pub fn relative(frame: &Mat4, other: &Mat4) -> Mat4 {
    frame.inverse() * *other
}
