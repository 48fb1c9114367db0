use vernissage_assets::Mesh;

use super::packer::{pack, PackedMesh};
use super::vertex::MeshVertex;
use crate::device::GraphicsDevice;
use crate::error::GpuResourceError;

/// A mesh living on the GPU: one interleaved vertex buffer and one `u32`
/// index buffer, bound together with [`MeshVertex::LAYOUT`].
///
/// Dropping a `GpuMesh` drops the device handle, which releases the buffers.
pub struct GpuMesh<D: GraphicsDevice> {
    raw: D::VertexArray,
    vertex_count: u32,
    index_count: u32,
}

impl<D: GraphicsDevice> GpuMesh<D> {
    pub fn upload(device: &mut D, packed: &PackedMesh) -> Result<Self, GpuResourceError> {
        if packed.vertices.is_empty() {
            return Err(GpuResourceError::EmptyBuffer("vertex"));
        }
        if packed.indices.is_empty() {
            return Err(GpuResourceError::EmptyBuffer("index"));
        }
        let raw = device.create_vertex_array(
            packed.vertex_bytes(),
            &packed.indices,
            &MeshVertex::LAYOUT,
        )?;
        Ok(Self {
            raw,
            vertex_count: packed.vertex_count() as u32,
            index_count: packed.index_count() as u32,
        })
    }

    /// Packs and uploads `mesh` in one go.
    pub fn from_mesh(device: &mut D, mesh: &Mesh) -> Result<Self, GpuResourceError> {
        Self::upload(device, &pack(mesh))
    }

    pub fn raw(&self) -> &D::VertexArray {
        &self.raw
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }
}
