pub mod gpu_mesh;
pub mod packer;
pub mod vertex;

pub use gpu_mesh::GpuMesh;
pub use packer::{pack, PackedMesh};
pub use vertex::MeshVertex;
