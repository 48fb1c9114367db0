use std::path::PathBuf;

use thiserror::Error;

use crate::import::MeshFormat;

/// Reasons a mesh file could not be turned into a [`Mesh`](crate::Mesh).
///
/// Every variant is fatal for the object being built from the file; nothing
/// in this crate substitutes a placeholder mesh.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read `{}`: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {format} data: {message}")]
    Parse { format: MeshFormat, message: String },

    #[error("unsupported mesh format `{0}`")]
    UnsupportedFormat(String),

    #[error("the imported scene contains no mesh")]
    NoMesh,

    #[error("face {face} has {arity} vertices; only triangles are supported")]
    NonTriangular { face: usize, arity: u32 },

    #[error("mesh has no texture-coordinate channel")]
    MissingUv,

    #[error("mesh has no normal channel")]
    MissingNormals,

    #[error("{channel} channel has {found} entries but the mesh has {expected} vertices")]
    ChannelMismatch {
        channel: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("face {face} references vertex {index} but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        face: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("mesh has no vertices or no faces")]
    EmptyMesh,
}

impl ImportError {
    /// Short category of the failure, suitable for a one-line status report.
    pub fn reason(&self) -> &'static str {
        match self {
            ImportError::Read { .. } | ImportError::Parse { .. } => "read/parse failure",
            ImportError::UnsupportedFormat(_) => "unsupported format",
            ImportError::NoMesh => "no mesh present",
            ImportError::NonTriangular { .. } => "non-triangular face",
            ImportError::MissingUv => "missing uv channel",
            ImportError::MissingNormals => "missing normal channel",
            ImportError::ChannelMismatch { .. } => "attribute count mismatch",
            ImportError::IndexOutOfRange { .. } => "face index out of range",
            ImportError::EmptyMesh => "empty mesh",
        }
    }
}
