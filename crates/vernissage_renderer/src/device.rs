//! The seam between the renderer's object model and a concrete graphics API.
//!
//! [`ShaderProgram`](crate::ShaderProgram), [`GpuMesh`](crate::GpuMesh) and
//! [`RenderableGeometry`](crate::RenderableGeometry) only ever talk to a
//! `GraphicsDevice`.  [`WgpuDevice`](crate::wgpu_backend::WgpuDevice) is the
//! real implementation.

use crate::error::{GpuResourceError, ShaderError};
use crate::shader::UniformBinding;

/// Which triangle faces the rasterizer discards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CullMode {
    None,
    Front,
    /// Scene default.
    #[default]
    Back,
}

impl CullMode {
    pub const ALL: [CullMode; 3] = [CullMode::None, CullMode::Front, CullMode::Back];
}

/// One float attribute inside an interleaved vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Shader `@location`.
    pub location: u32,
    /// Number of `f32` components (1 to 4).
    pub components: u32,
    /// Byte offset from the start of the vertex.
    pub offset: u64,
}

/// Interleaved vertex layout shared by the packer and the vertex stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout {
    /// Bytes per vertex.
    pub stride: u64,
    pub attributes: &'static [VertexAttribute],
}

/// Everything a device needs to create a program object.
#[derive(Debug, Clone, Copy)]
pub struct ProgramDescriptor<'a> {
    pub label: &'a str,
    /// WGSL text of the vertex stage (entry point `vs_main`).
    pub vertex_wgsl: &'a str,
    /// WGSL text of the fragment stage (entry point `fs_main`).
    pub fragment_wgsl: &'a str,
    pub vertex_layout: &'a VertexLayout,
    /// Uniform buffers of bind group 0, sorted by binding.
    pub uniforms: &'a [UniformBinding],
}

/// Operations the renderer needs from a graphics API.
///
/// Implementations own the actual GPU objects; the associated types are
/// opaque handles that release their resources when dropped.
pub trait GraphicsDevice {
    type Program;
    type VertexArray;

    /// Creates a program from already validated WGSL stages.
    fn link_program(&mut self, desc: &ProgramDescriptor<'_>) -> Result<Self::Program, ShaderError>;

    /// Uploads interleaved vertex bytes and a `u32` triangle-list index
    /// buffer.
    fn create_vertex_array(
        &mut self,
        vertex_bytes: &[u8],
        indices: &[u32],
        layout: &VertexLayout,
    ) -> Result<Self::VertexArray, GpuResourceError>;

    /// Makes `program` the target of following uniform writes and draws,
    /// or deactivates the current program when `None`.
    fn use_program(&mut self, program: Option<&Self::Program>);

    /// Writes raw bytes into the uniform buffer at `binding`.
    fn write_uniform(&mut self, program: &Self::Program, binding: u32, offset: u64, bytes: &[u8]);

    fn cull_mode(&self) -> CullMode;

    fn set_cull_mode(&mut self, mode: CullMode);

    /// Draws `index_count` indices of `vertex_array` as triangles with the
    /// current cull mode.
    fn draw_indexed(
        &mut self,
        program: &Self::Program,
        vertex_array: &Self::VertexArray,
        index_count: u32,
    ) -> Result<(), GpuResourceError>;
}
