//! Packed per-draw records for the host's instance buffer

use bytemuck::{Pod, Zeroable};

use super::frame::{DrawCommand, RenderFrame, ShapeId};

/// One draw command laid out for upload.
///
/// `texture` is 0 when the material is untextured.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// ambient, diffusivity, specularity, unused
    pub lighting: [f32; 4],
    pub shape: u32,
    pub shader: u32,
    pub texture: u32,
    pub _pad: u32,
}

fn shape_index(shape: ShapeId) -> u32 {
    match shape {
        ShapeId::Jet => 0,
        ShapeId::Missile => 1,
        ShapeId::CanyonWall => 2,
        ShapeId::Water => 3,
        ShapeId::Deposit => 4,
    }
}

impl InstanceRaw {
    pub fn from_draw(draw: &DrawCommand) -> Self {
        let m = &draw.material;
        Self {
            model: draw.transform.to_cols_array_2d(),
            color: m.color,
            lighting: [m.ambient, m.diffusivity, m.specularity, 0.0],
            shape: shape_index(draw.shape),
            shader: m.shader.index(),
            texture: m.texture.map_or(0, |t| t.index()),
            _pad: 0,
        }
    }
}

/// Pack every draw of a frame, in draw order
pub fn instances(frame: &RenderFrame) -> Vec<InstanceRaw> {
    frame.draws.iter().map(InstanceRaw::from_draw).collect()
}

#[inline]
pub fn as_bytes(instances: &[InstanceRaw]) -> &[u8] {
    bytemuck::cast_slice(instances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::frame::build_frame;
    use crate::settings::Settings;
    use crate::sim::GameState;
    use crate::tuning::Tuning;

    #[test]
    fn test_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 112);
        assert_eq!(std::mem::align_of::<InstanceRaw>(), 4);
    }

    #[test]
    fn test_instances_follow_draw_order() {
        let state = GameState::new(Tuning::default(), 1);
        let frame = build_frame(&state, &Settings::default(), 1.0);
        let packed = instances(&frame);

        assert_eq!(packed.len(), frame.draws.len());
        assert_eq!(packed[0].shape, 0);
        assert_eq!(packed[0].texture, 0);
        assert_eq!(packed[0].model, frame.draws[0].transform.to_cols_array_2d());
        assert_eq!(as_bytes(&packed).len(), packed.len() * 112);
    }

    #[test]
    fn test_textured_materials_carry_texture_index() {
        let state = GameState::new(Tuning::default(), 1);
        let frame = build_frame(&state, &Settings::default(), 1.0);
        let walls: Vec<_> = instances(&frame).into_iter().filter(|i| i.shape == 2).collect();
        assert_eq!(walls.len(), 2);
        assert!(walls.iter().all(|w| w.texture != 0 && w.shader == 1));
    }
}
