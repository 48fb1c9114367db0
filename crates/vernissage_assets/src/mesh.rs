//! CPU-side mesh representation produced by the importer.

use glam::{Vec2, Vec3};

use crate::error::ImportError;

/// One vertex as the importer hands it over: position, one texture
/// coordinate and one normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub uv: Vec2,
    pub normal: Vec3,
}

impl Vertex {
    pub const fn new(position: Vec3, uv: Vec2, normal: Vec3) -> Self {
        Self {
            position,
            uv,
            normal,
        }
    }
}

/// Three indices into [`Mesh::vertices`].
pub type Face = [u32; 3];

/// Triangle mesh with exactly one uv and one normal per vertex.
///
/// Outside this crate a `Mesh` can only be obtained through [`Mesh::new`],
/// so every face index is known to be in range and neither list is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub(crate) name: Option<String>,
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) faces: Vec<Face>,
}

impl Mesh {
    /// Validates and assembles a mesh.
    ///
    /// Fails with [`ImportError::EmptyMesh`] when either list is empty and
    /// with [`ImportError::IndexOutOfRange`] for the first face that points
    /// past the vertex list.
    pub fn new(
        name: Option<String>,
        vertices: Vec<Vertex>,
        faces: Vec<Face>,
    ) -> Result<Self, ImportError> {
        if vertices.is_empty() || faces.is_empty() {
            return Err(ImportError::EmptyMesh);
        }
        let vertex_count = vertices.len();
        for (face, indices) in faces.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(ImportError::IndexOutOfRange {
                    face,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(Self {
            name,
            vertices,
            faces,
        })
    }

    /// Builds a mesh from the separate attribute streams that file readers
    /// produce, plus a flat triangle-list index buffer.
    pub(crate) fn from_streams(
        name: Option<String>,
        positions: Vec<[f32; 3]>,
        uvs: Option<Vec<[f32; 2]>>,
        normals: Option<Vec<[f32; 3]>>,
        indices: Vec<u32>,
    ) -> Result<Self, ImportError> {
        let uvs = uvs.filter(|c| !c.is_empty()).ok_or(ImportError::MissingUv)?;
        let normals = normals
            .filter(|c| !c.is_empty())
            .ok_or(ImportError::MissingNormals)?;
        check_stream("uv", positions.len(), uvs.len())?;
        check_stream("normal", positions.len(), normals.len())?;

        if indices.len() % 3 != 0 {
            // a dangling index means the last face is not a triangle
            return Err(ImportError::NonTriangular {
                face: indices.len() / 3,
                arity: (indices.len() % 3) as u32,
            });
        }

        let vertices = positions
            .into_iter()
            .zip(uvs)
            .zip(normals)
            .map(|((p, t), n)| Vertex::new(Vec3::from(p), Vec2::from(t), Vec3::from(n)))
            .collect();
        let faces = indices
            .chunks_exact(3)
            .map(|f| [f[0], f[1], f[2]])
            .collect();
        Self::new(name, vertices, faces)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}

fn check_stream(channel: &'static str, expected: usize, found: usize) -> Result<(), ImportError> {
    if expected == found {
        Ok(())
    } else {
        Err(ImportError::ChannelMismatch {
            channel,
            expected,
            found,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(x: f32) -> Vertex {
        Vertex::new(Vec3::new(x, 0.0, 0.0), Vec2::ZERO, Vec3::Z)
    }

    #[test]
    fn rejects_out_of_range_index() {
        let err = Mesh::new(None, vec![vertex(0.0), vertex(1.0), vertex(2.0)], vec![[0, 1, 3]])
            .unwrap_err();
        assert!(matches!(
            err,
            ImportError::IndexOutOfRange {
                face: 0,
                index: 3,
                vertex_count: 3
            }
        ));
    }

    #[test]
    fn rejects_empty_lists() {
        assert!(matches!(
            Mesh::new(None, Vec::new(), Vec::new()),
            Err(ImportError::EmptyMesh)
        ));
        assert!(matches!(
            Mesh::new(None, vec![vertex(0.0)], Vec::new()),
            Err(ImportError::EmptyMesh)
        ));
    }

    #[test]
    fn streams_require_uv_and_normals() {
        let positions = vec![[0.0; 3]; 3];
        let normals = Some(vec![[0.0; 3]; 3]);
        let err = Mesh::from_streams(None, positions.clone(), None, normals, vec![0, 1, 2])
            .unwrap_err();
        assert!(matches!(err, ImportError::MissingUv));

        let uvs = Some(vec![[0.0; 2]; 3]);
        let err = Mesh::from_streams(None, positions, uvs, Some(Vec::new()), vec![0, 1, 2])
            .unwrap_err();
        assert!(matches!(err, ImportError::MissingNormals));
    }

    #[test]
    fn streams_must_have_matching_lengths() {
        let err = Mesh::from_streams(
            None,
            vec![[0.0; 3]; 3],
            Some(vec![[0.0; 2]; 2]),
            Some(vec![[0.0; 3]; 3]),
            vec![0, 1, 2],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ImportError::ChannelMismatch {
                channel: "uv",
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn streams_keep_vertex_and_face_order() {
        let mesh = Mesh::from_streams(
            Some("tri".into()),
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            Some(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]),
            Some(vec![[0.0, 0.0, 1.0]; 3]),
            vec![2, 1, 0],
        )
        .unwrap();
        assert_eq!(mesh.name(), Some("tri"));
        assert_eq!(mesh.faces(), &[[2, 1, 0]]);
        assert_eq!(mesh.vertices()[1].position, Vec3::X);
        assert_eq!(mesh.vertices()[2].uv, Vec2::Y);
    }
}
