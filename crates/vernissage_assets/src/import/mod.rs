//! Mesh import: file → [`Mesh`].
//!
//! The importer consumes the first mesh of a scene file.  Wavefront OBJ goes
//! through `tobj`, glTF / GLB through the `gltf` crate.  Both readers request
//! triangulation (unless disabled in [`ImportOptions`]) and then check that
//! what came back really is a triangle list with one uv and one normal per
//! vertex.

mod gltf_scene;
mod wavefront;

use std::fmt;
use std::path::Path;

use log::{info, warn};

use crate::error::ImportError;
use crate::mesh::Mesh;

/// File formats the importer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Obj,
    /// JSON glTF or binary GLB; the `gltf` crate tells them apart itself.
    Gltf,
}

impl MeshFormat {
    /// Picks a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "obj" => Some(Self::Obj),
            "gltf" | "glb" => Some(Self::Gltf),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ImportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        Self::from_extension(ext).ok_or_else(|| ImportError::UnsupportedFormat(ext.to_string()))
    }
}

impl fmt::Display for MeshFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshFormat::Obj => f.write_str("OBJ"),
            MeshFormat::Gltf => f.write_str("glTF"),
        }
    }
}

/// Post-processing requested from the format readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Split polygons (OBJ) and strips/fans (glTF) into triangles.  When
    /// `false`, any face that is not already a triangle is rejected.
    ///
    /// Default: `true`
    pub triangulate: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self { triangulate: true }
    }
}

/// Successful import result.
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub mesh: Mesh,
    /// Meshes (or glTF primitives) present in the file after the first one.
    /// They are not imported.
    pub ignored_meshes: usize,
}

impl ImportReport {
    pub fn into_mesh(self) -> Mesh {
        self.mesh
    }
}

/// Reads mesh files into [`Mesh`] values.  Stateless apart from its options.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshImporter {
    options: ImportOptions,
}

impl MeshImporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ImportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ImportOptions {
        self.options
    }

    /// Imports the first mesh of the file at `path`, choosing the reader
    /// from the file extension.
    pub fn import(&self, path: impl AsRef<Path>) -> Result<ImportReport, ImportError> {
        let path = path.as_ref();
        let format = MeshFormat::from_path(path)?;
        let report = match format {
            MeshFormat::Obj => {
                let bytes = std::fs::read(path).map_err(|source| ImportError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                wavefront::read(&bytes, self.options)?
            }
            // glTF files may reference sibling .bin files, so let the crate
            // resolve them relative to the path
            MeshFormat::Gltf => gltf_scene::read_path(path, self.options)?,
        };
        log_report(&path.display().to_string(), &report);
        Ok(report)
    }

    /// Imports the first mesh from an in-memory file.
    ///
    /// glTF data must be self-contained (GLB or data URIs).
    pub fn import_bytes(
        &self,
        bytes: &[u8],
        format: MeshFormat,
    ) -> Result<ImportReport, ImportError> {
        let report = match format {
            MeshFormat::Obj => wavefront::read(bytes, self.options)?,
            MeshFormat::Gltf => gltf_scene::read_slice(bytes, self.options)?,
        };
        log_report("<memory>", &report);
        Ok(report)
    }
}

fn log_report(source: &str, report: &ImportReport) {
    info!(
        "imported mesh {:?} from {source}: {} vertices, {} faces",
        report.mesh.name().unwrap_or("<unnamed>"),
        report.mesh.vertex_count(),
        report.mesh.face_count()
    );
    if report.ignored_meshes > 0 {
        warn!(
            "{source} contains {} more mesh(es); only the first one is imported",
            report.ignored_meshes
        );
    }
}
