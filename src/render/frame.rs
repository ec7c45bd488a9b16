//! Render frame description
//!
//! The simulation never draws. Each frame it is turned into a [`RenderFrame`]:
//! camera, projection, lights and a flat draw list that the host renderer
//! replays as `draw(shape, transform, material)` calls.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{GameOutcome, GameState};

/// Meshes the host has loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeId {
    /// `assets/jet.obj`
    Jet,
    /// `assets/missile.obj`
    Missile,
    /// Unit cube stretched into a wall slab
    CanyonWall,
    /// Unit square on the XZ plane
    Water,
    /// Uranium deposit at the end of the canyon
    Deposit,
}

/// Shader programs, selected per material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShaderVariant {
    Phong,
    TexturedPhong,
    /// Textured Phong with the texture coordinates scrolling over time
    TextureScroll,
    /// Concentric rings around the object origin
    Ring,
    /// Lighting evaluated per vertex
    Gouraud,
}

impl ShaderVariant {
    pub fn index(self) -> u32 {
        match self {
            ShaderVariant::Phong => 0,
            ShaderVariant::TexturedPhong => 1,
            ShaderVariant::TextureScroll => 2,
            ShaderVariant::Ring => 3,
            ShaderVariant::Gouraud => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextureId {
    /// `assets/missile.jpg`
    Missile,
    /// `assets/canyon.jpeg`, mipmapped
    Canyon,
    Water,
}

impl TextureId {
    pub fn index(self) -> u32 {
        match self {
            TextureId::Missile => 1,
            TextureId::Canyon => 2,
            TextureId::Water => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub shader: ShaderVariant,
    pub color: [f32; 4],
    pub ambient: f32,
    pub diffusivity: f32,
    pub specularity: f32,
    pub texture: Option<TextureId>,
}

/// Point light (`position.w == 1`) or directional light (`position.w == 0`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub position: Vec4,
    pub color: [f32; 4],
    /// Falloff factor: intensity is `1 / (1 + attenuation * d²)`
    pub attenuation: f32,
}

impl Light {
    /// Point light whose brightness carries to roughly `size` units
    pub fn point(position: Vec3, color: [f32; 4], size: f32) -> Self {
        Self {
            position: position.extend(1.0),
            color,
            attenuation: 1.0 / size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Vertical field of view (radians)
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawCommand {
    pub shape: ShapeId,
    pub transform: Mat4,
    pub material: Material,
}

/// Everything the host needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    /// World-to-camera transform
    pub camera: Mat4,
    pub projection: Projection,
    pub lights: Vec<Light>,
    pub draws: Vec<DrawCommand>,
}

/// `#rrggbb` as linear-ish RGBA floats
pub fn hex_color(rgb: u32) -> [f32; 4] {
    let channel = |shift: u32| ((rgb >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0), 1.0]
}

fn jet_material(hit: bool) -> Material {
    Material {
        shader: ShaderVariant::Phong,
        color: if hit { hex_color(0xd02020) } else { hex_color(0x746e6b) },
        ambient: 0.5,
        diffusivity: 0.5,
        specularity: 0.5,
        texture: None,
    }
}

fn missile_material() -> Material {
    Material {
        shader: ShaderVariant::TexturedPhong,
        color: hex_color(0x830001),
        ambient: 0.5,
        diffusivity: 0.5,
        specularity: 0.5,
        texture: Some(TextureId::Missile),
    }
}

fn canyon_material() -> Material {
    Material {
        shader: ShaderVariant::TexturedPhong,
        color: hex_color(0x9a7b4f),
        ambient: 1.0,
        diffusivity: 1.0,
        specularity: 0.0,
        texture: Some(TextureId::Canyon),
    }
}

fn water_material() -> Material {
    Material {
        shader: ShaderVariant::TextureScroll,
        color: hex_color(0x1f4e79),
        ambient: 0.6,
        diffusivity: 0.8,
        specularity: 0.9,
        texture: Some(TextureId::Water),
    }
}

fn deposit_material() -> Material {
    Material {
        shader: ShaderVariant::Ring,
        color: hex_color(0x7cfc00),
        ambient: 1.0,
        diffusivity: 0.0,
        specularity: 0.0,
        texture: None,
    }
}

/// Orientation and scale of the jet mesh around the jet transform
pub fn jet_model_base() -> Mat4 {
    Mat4::from_scale(Vec3::splat(JET_MODEL_SCALE))
        * Mat4::from_rotation_x(-FRAC_PI_2)
        * Mat4::from_rotation_z(-FRAC_PI_2)
}

/// Orientation and scale of the missile mesh around the missile transform
pub fn missile_model_base() -> Mat4 {
    Mat4::from_rotation_y(-FRAC_PI_2) * Mat4::from_scale(Vec3::splat(MISSILE_MODEL_SCALE))
}

/// Passive pose change once the run is over: a victory roll, or a nose-down
/// sink toward the water
fn outcome_pose(outcome: GameOutcome, outcome_time: f32) -> Mat4 {
    let t = outcome_time.min(OUTCOME_ANIMATION_SECS);
    match outcome {
        GameOutcome::Playing => Mat4::IDENTITY,
        GameOutcome::Won => Mat4::from_rotation_z(t * TAU / OUTCOME_ANIMATION_SECS),
        GameOutcome::Lost => {
            Mat4::from_translation(Vec3::new(0.0, -2.0 * t, 0.0)) * Mat4::from_rotation_x(0.25 * t)
        }
    }
}

/// Build the frame for the current state
pub fn build_frame(state: &GameState, settings: &Settings, aspect: f32) -> RenderFrame {
    let canyon = &state.tuning.canyon;
    let jet_pos = state.jet.position();

    let camera = Mat4::look_at_rh(CAMERA_EYE, Vec3::ZERO, Vec3::Y) * state.jet.transform.inverse();
    let projection = Projection {
        fov: CAMERA_FOV,
        aspect,
        near: CAMERA_NEAR,
        far: CAMERA_FAR,
    };

    let deposit_pos = Vec3::new(0.0, canyon.water_height + 4.0, canyon.length - canyon.goal_margin / 2.0);
    let lights = vec![
        Light::point(jet_pos + Vec3::new(0.0, 5.0, 5.0), [1.0, 1.0, 1.0, 1.0], 100_000.0),
        Light::point(deposit_pos + Vec3::Y * 10.0, hex_color(0xffd27f), 1_000.0),
    ];

    let mut draws = Vec::with_capacity(6);

    let pose = if settings.effective_outcome_animation() {
        outcome_pose(state.outcome, state.outcome_time)
    } else {
        Mat4::IDENTITY
    };
    let hit = state.is_hit() && settings.effective_hit_flash();
    draws.push(DrawCommand {
        shape: ShapeId::Jet,
        transform: state.jet.transform * pose * jet_model_base(),
        material: jet_material(hit),
    });

    if state.missile.shown {
        draws.push(DrawCommand {
            shape: ShapeId::Missile,
            transform: state.missile.transform * missile_model_base(),
            material: missile_material(),
        });
    }

    // Wall slabs: inner faces at ±half_width, spanning water to ceiling
    let mid_height = (canyon.max_height + canyon.water_height) / 2.0;
    let half_height = (canyon.max_height - canyon.water_height) / 2.0;
    let wall_offset = canyon.half_width + canyon.wall_displacement;
    for side in [1.0, -1.0] {
        draws.push(DrawCommand {
            shape: ShapeId::CanyonWall,
            transform: Mat4::from_translation(Vec3::new(side * wall_offset, mid_height, 0.0))
                * Mat4::from_scale(Vec3::new(canyon.wall_displacement, half_height, canyon.length)),
            material: canyon_material(),
        });
    }

    draws.push(DrawCommand {
        shape: ShapeId::Water,
        transform: Mat4::from_translation(Vec3::new(0.0, canyon.water_height, 0.0))
            * Mat4::from_scale(Vec3::new(wall_offset, 1.0, canyon.length)),
        material: water_material(),
    });

    draws.push(DrawCommand {
        shape: ShapeId::Deposit,
        transform: Mat4::from_translation(deposit_pos) * Mat4::from_scale(Vec3::splat(6.0)),
        material: deposit_material(),
    });

    RenderFrame {
        camera,
        projection,
        lights,
        draws,
    }
}
