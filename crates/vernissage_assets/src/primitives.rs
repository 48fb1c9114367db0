//! Procedurally built meshes.

use glam::{Vec2, Vec3};

use crate::mesh::{Mesh, Vertex};

/// Flat square in the XY plane facing +Z, spanning `-half_extent..half_extent`
/// on both axes.
///
/// Vertices run counter-clockwise from the bottom-left corner; the two faces
/// are `[0, 1, 2]` and `[0, 2, 3]`.
pub fn quad(half_extent: f32) -> Mesh {
    let s = half_extent;
    let corner = |x: f32, y: f32, u: f32, v: f32| {
        Vertex::new(Vec3::new(x * s, y * s, 0.0), Vec2::new(u, v), Vec3::Z)
    };
    let vertices = vec![
        corner(-1.0, -1.0, 0.0, 1.0),
        corner(1.0, -1.0, 1.0, 1.0),
        corner(1.0, 1.0, 1.0, 0.0),
        corner(-1.0, 1.0, 0.0, 0.0),
    ];
    Mesh {
        name: Some("quad".to_string()),
        vertices,
        faces: vec![[0, 1, 2], [0, 2, 3]],
    }
}
