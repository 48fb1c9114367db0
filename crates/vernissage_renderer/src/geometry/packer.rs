//! Mesh → interleaved vertex buffer + index buffer.

use vernissage_assets::Mesh;

use super::vertex::MeshVertex;

/// CPU copy of what gets uploaded: one [`MeshVertex`] per mesh vertex, in
/// the mesh's order, and the faces flattened into a `u32` list.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedMesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl PackedMesh {
    /// The vertex buffer seen as floats:
    /// `[px, py, pz, u, v, nx, ny, nz]` per vertex.
    pub fn floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}

/// Interleaves `mesh`.  No vertex is merged, dropped or reordered.
pub fn pack(mesh: &Mesh) -> PackedMesh {
    let vertices = mesh
        .vertices()
        .iter()
        .map(|v| MeshVertex {
            position: v.position.to_array(),
            uv: v.uv.to_array(),
            normal: v.normal.to_array(),
        })
        .collect();
    let indices = mesh.faces().iter().flatten().copied().collect();
    PackedMesh { vertices, indices }
}
