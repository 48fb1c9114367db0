use std::path::Path;

use gltf::mesh::Mode;

use super::{ImportOptions, ImportReport, MeshFormat};
use crate::error::ImportError;
use crate::mesh::Mesh;

pub(super) fn read_path(path: &Path, options: ImportOptions) -> Result<ImportReport, ImportError> {
    let (document, buffers, _images) = gltf::import(path).map_err(|e| match e {
        gltf::Error::Io(source) => ImportError::Read {
            path: path.to_path_buf(),
            source,
        },
        other => parse_error(other),
    })?;
    read_document(&document, &buffers, options)
}

pub(super) fn read_slice(bytes: &[u8], options: ImportOptions) -> Result<ImportReport, ImportError> {
    let (document, buffers, _images) = gltf::import_slice(bytes).map_err(parse_error)?;
    read_document(&document, &buffers, options)
}

fn parse_error(e: gltf::Error) -> ImportError {
    ImportError::Parse {
        format: MeshFormat::Gltf,
        message: e.to_string(),
    }
}

/// Imports the first primitive of the first mesh.  Every other primitive in
/// the document counts as an ignored mesh.
fn read_document(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
    options: ImportOptions,
) -> Result<ImportReport, ImportError> {
    let total: usize = document.meshes().map(|m| m.primitives().count()).sum();
    let mesh = document.meshes().next().ok_or(ImportError::NoMesh)?;
    let primitive = mesh.primitives().next().ok_or(ImportError::NoMesh)?;

    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| d.0.as_slice()));
    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .ok_or_else(|| ImportError::Parse {
            format: MeshFormat::Gltf,
            message: "primitive has no POSITION attribute".into(),
        })?
        .collect();
    let uvs = reader.read_tex_coords(0).map(|t| t.into_f32().collect());
    let normals = reader.read_normals().map(|n| n.collect());
    let indices = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };
    let indices = triangle_list(primitive.mode(), indices, options)?;

    let mesh = Mesh::from_streams(
        mesh.name().map(str::to_owned),
        positions,
        uvs,
        normals,
        indices,
    )?;
    Ok(ImportReport {
        mesh,
        ignored_meshes: total.saturating_sub(1),
    })
}

/// Rewrites the index buffer of a primitive as a plain triangle list.
fn triangle_list(
    mode: Mode,
    indices: Vec<u32>,
    options: ImportOptions,
) -> Result<Vec<u32>, ImportError> {
    match mode {
        Mode::Triangles => Ok(indices),
        Mode::TriangleStrip if options.triangulate => Ok(indices
            .windows(3)
            .enumerate()
            .flat_map(|(i, w)| {
                // keep the winding consistent on odd triangles
                if i % 2 == 0 {
                    [w[0], w[1], w[2]]
                } else {
                    [w[1], w[0], w[2]]
                }
            })
            .collect()),
        Mode::TriangleFan if options.triangulate => Ok(match indices.split_first() {
            Some((&hub, rest)) => rest
                .windows(2)
                .flat_map(|w| [hub, w[0], w[1]])
                .collect(),
            None => Vec::new(),
        }),
        Mode::TriangleStrip | Mode::TriangleFan => Err(ImportError::NonTriangular {
            face: 0,
            arity: indices.len() as u32,
        }),
        Mode::Points => Err(ImportError::NonTriangular { face: 0, arity: 1 }),
        Mode::Lines | Mode::LineLoop | Mode::LineStrip => {
            Err(ImportError::NonTriangular { face: 0, arity: 2 })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};

    /// One triangle: positions, normals, uvs and u16 indices packed into a
    /// single base64 buffer.
    const BUFFER_URI: &str = "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAAAAAAAAAAAAIA/AAAAAAAAAAAAAIA/AAAAAAAAAAAAAIA/AAAAAAAAAAAAAIA/AAAAAAAAAAAAAIA/AAABAAIAAAA=";

    /// Builds a one-triangle glTF document.  `attributes` is the JSON body
    /// of the primitive's attribute map.
    fn document(attributes: &str, mode: u32, extra_primitives: usize) -> String {
        let primitive = format!(r#"{{ "attributes": {{ {attributes} }}, "indices": 3, "mode": {mode} }}"#);
        let primitives = vec![primitive; 1 + extra_primitives].join(",");
        format!(
            r#"{{
  "asset": {{ "version": "2.0" }},
  "buffers": [ {{ "byteLength": 104, "uri": "{BUFFER_URI}" }} ],
  "bufferViews": [
    {{ "buffer": 0, "byteOffset": 0, "byteLength": 36 }},
    {{ "buffer": 0, "byteOffset": 36, "byteLength": 36 }},
    {{ "buffer": 0, "byteOffset": 72, "byteLength": 24 }},
    {{ "buffer": 0, "byteOffset": 96, "byteLength": 6 }}
  ],
  "accessors": [
    {{ "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
       "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] }},
    {{ "bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC3" }},
    {{ "bufferView": 2, "componentType": 5126, "count": 3, "type": "VEC2" }},
    {{ "bufferView": 3, "componentType": 5123, "count": 3, "type": "SCALAR" }}
  ],
  "meshes": [ {{ "name": "triangle", "primitives": [ {primitives} ] }} ]
}}"#
        )
    }

    const FULL: &str = r#""POSITION": 0, "NORMAL": 1, "TEXCOORD_0": 2"#;

    fn import(json: &str, options: ImportOptions) -> Result<ImportReport, ImportError> {
        read_slice(json.as_bytes(), options)
    }

    #[test]
    fn reads_first_primitive() {
        let report = import(&document(FULL, 4, 0), ImportOptions::default()).unwrap();
        assert_eq!(report.ignored_meshes, 0);
        let mesh = report.mesh;
        assert_eq!(mesh.name(), Some("triangle"));
        assert_eq!(mesh.faces(), &[[0, 1, 2]]);
        assert_eq!(mesh.vertices()[1].position, Vec3::X);
        assert_eq!(mesh.vertices()[2].uv, Vec2::Y);
        assert_eq!(mesh.vertices()[0].normal, Vec3::Z);
    }

    #[test]
    fn additional_primitives_are_reported() {
        let report = import(&document(FULL, 4, 2), ImportOptions::default()).unwrap();
        assert_eq!(report.ignored_meshes, 2);
    }

    #[test]
    fn missing_texcoords_are_fatal() {
        let attributes = r#""POSITION": 0, "NORMAL": 1"#;
        let err = import(&document(attributes, 4, 0), ImportOptions::default()).unwrap_err();
        assert!(matches!(err, ImportError::MissingUv));
    }

    #[test]
    fn missing_normals_are_fatal() {
        let attributes = r#""POSITION": 0, "TEXCOORD_0": 2"#;
        let err = import(&document(attributes, 4, 0), ImportOptions::default()).unwrap_err();
        assert!(matches!(err, ImportError::MissingNormals));
    }

    #[test]
    fn line_primitives_are_rejected() {
        // mode 1 = LINES
        let err = import(&document(FULL, 1, 0), ImportOptions::default()).unwrap_err();
        assert!(matches!(err, ImportError::NonTriangular { arity: 2, .. }));
    }

    #[test]
    fn document_without_meshes_has_no_mesh() {
        let json = r#"{ "asset": { "version": "2.0" } }"#;
        let err = import(json, ImportOptions::default()).unwrap_err();
        assert!(matches!(err, ImportError::NoMesh));
    }

    #[test]
    fn invalid_json_is_a_parse_failure() {
        let err = import("{ not gltf", ImportOptions::default()).unwrap_err();
        assert_eq!(err.reason(), "read/parse failure");
    }

    #[test]
    fn strips_and_fans_become_lists() {
        let opts = ImportOptions::default();
        assert_eq!(
            triangle_list(Mode::TriangleStrip, vec![0, 1, 2, 3], opts).unwrap(),
            vec![0, 1, 2, 2, 1, 3]
        );
        assert_eq!(
            triangle_list(Mode::TriangleFan, vec![0, 1, 2, 3], opts).unwrap(),
            vec![0, 1, 2, 0, 2, 3]
        );
    }

    #[test]
    fn strips_are_rejected_without_triangulation() {
        let err = triangle_list(
            Mode::TriangleStrip,
            vec![0, 1, 2, 3],
            ImportOptions { triangulate: false },
        )
        .unwrap_err();
        assert!(matches!(err, ImportError::NonTriangular { arity: 4, .. }));
    }
}
