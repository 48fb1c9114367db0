//! `wgpu` implementation of [`GraphicsDevice`](crate::GraphicsDevice).

pub mod depth;
pub mod device;

pub use depth::DepthTarget;
pub use device::{WgpuDevice, WgpuProgram, WgpuVertexArray};
