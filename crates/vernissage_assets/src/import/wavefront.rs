use std::io::Cursor;

use super::{ImportOptions, ImportReport, MeshFormat};
use crate::error::ImportError;
use crate::mesh::Mesh;

/// Parses an OBJ file held in memory.
///
/// Material libraries are never opened; only geometry is of interest here.
pub(super) fn read(bytes: &[u8], options: ImportOptions) -> Result<ImportReport, ImportError> {
    let load_options = tobj::LoadOptions {
        single_index: true,
        triangulate: options.triangulate,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    };
    let (models, _materials) = tobj::load_obj_buf(&mut Cursor::new(bytes), &load_options, |_| {
        Err(tobj::LoadError::OpenFileFailed)
    })
    .map_err(|e| ImportError::Parse {
        format: MeshFormat::Obj,
        message: e.to_string(),
    })?;

    // objects made only of points or lines end up with no faces
    let mut models = models.into_iter().filter(|m| !m.mesh.indices.is_empty());
    let model = models.next().ok_or(ImportError::NoMesh)?;
    let ignored_meshes = models.count();

    let mesh = model.mesh;
    // `face_arities` is only filled when some face is not a triangle
    if let Some((face, &arity)) = mesh
        .face_arities
        .iter()
        .enumerate()
        .find(|(_, arity)| **arity != 3)
    {
        return Err(ImportError::NonTriangular { face, arity });
    }

    let positions = mesh
        .positions
        .chunks_exact(3)
        .map(|p| [p[0], p[1], p[2]])
        .collect();
    let uvs = mesh
        .texcoords
        .chunks_exact(2)
        .map(|t| [t[0], t[1]])
        .collect();
    let normals = mesh
        .normals
        .chunks_exact(3)
        .map(|n| [n[0], n[1], n[2]])
        .collect();
    let name = Some(model.name).filter(|n| !n.is_empty());

    let mesh = Mesh::from_streams(name, positions, Some(uvs), Some(normals), mesh.indices)?;
    Ok(ImportReport {
        mesh,
        ignored_meshes,
    })
}
