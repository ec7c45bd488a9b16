//! Render output
//!
//! Drawing itself happens in the host page. This module turns a game state
//! into a frame description and the packed instance records that go with it.

pub mod frame;
pub mod instance;

pub use frame::{
    DrawCommand, Light, Material, Projection, RenderFrame, ShaderVariant, ShapeId, TextureId,
    build_frame,
};
pub use instance::{InstanceRaw, as_bytes, instances};
