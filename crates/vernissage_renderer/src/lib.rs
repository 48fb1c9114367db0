//! vernissage_renderer: imported meshes on the GPU.
//!
//! | Module          | Responsibility                                              |
//! |-----------------|-------------------------------------------------------------|
//! | `device`        | `GraphicsDevice` seam, cull modes, vertex layouts           |
//! | `geometry`      | `MeshVertex`, mesh packing, `GpuMesh` upload                |
//! | `shader`        | WGSL compile + uniform reflection, `ShaderProgram` activation |
//! | `render_state`  | Scoped cull override                                        |
//! | `renderable`    | `RenderableGeometry`                                        |
//! | `wgpu_backend`  | `WgpuDevice`, depth target                                  |

pub mod device;
pub mod error;
pub mod geometry;
pub mod render_state;
pub mod renderable;
pub mod shader;
pub mod wgpu_backend;

#[cfg(test)]
pub(crate) mod testing;

pub use device::{CullMode, GraphicsDevice, ProgramDescriptor, VertexAttribute, VertexLayout};
pub use error::{GeometryError, GpuResourceError, ShaderError, ShaderStage};
pub use geometry::{pack, GpuMesh, MeshVertex, PackedMesh};
pub use render_state::CullOverride;
pub use renderable::RenderableGeometry;
pub use shader::{ActiveProgram, CompiledShader, ShaderProgram, ShaderSource, UniformData};
pub use wgpu_backend::{DepthTarget, WgpuDevice};

// re-export wgpu so the app layer builds surfaces against the same version
pub use wgpu;
