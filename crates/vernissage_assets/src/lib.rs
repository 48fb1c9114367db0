//! vernissage_assets: mesh files into CPU-side [`Mesh`] values.
//!
//! Nothing here touches the GPU; packing and upload live in
//! `vernissage_renderer`.

pub mod error;
pub mod import;
pub mod mesh;
pub mod primitives;

pub use error::ImportError;
pub use import::{ImportOptions, ImportReport, MeshFormat, MeshImporter};
pub use mesh::{Face, Mesh, Vertex};
