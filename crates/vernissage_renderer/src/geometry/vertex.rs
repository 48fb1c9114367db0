//! GPU vertex type for every imported or generated mesh.
//!
//! Eight contiguous floats: position, uv, normal.  The `@location`s come from
//! `vernissage_core::interface` and are repeated in every vertex shader under
//! `assets/shaders`.

use vernissage_core::interface::{NORMAL_LOCATION, UV_LOCATION, VERTEX_POSITION_LOCATION};

use crate::device::{VertexAttribute, VertexLayout};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Object-space position.
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub normal: [f32; 3],
}

impl MeshVertex {
    /// Floats per packed vertex.
    pub const FLOATS: usize = 8;

    pub const LAYOUT: VertexLayout = VertexLayout {
        stride: std::mem::size_of::<MeshVertex>() as u64,
        attributes: &[
            VertexAttribute {
                location: VERTEX_POSITION_LOCATION,
                components: 3,
                offset: 0,
            },
            VertexAttribute {
                location: UV_LOCATION,
                components: 2,
                offset: 12,
            },
            VertexAttribute {
                location: NORMAL_LOCATION,
                components: 3,
                offset: 20,
            },
        ],
    };
}
