//! An imported mesh with its own shader program and placement.

use std::path::Path;

use glam::{Mat4, Vec3};
use log::info;
use vernissage_assets::{Mesh, MeshImporter};
use vernissage_core::interface::{MODEL_MATRIX, PROJECTION_MATRIX, VIEW_MATRIX};
use vernissage_core::{CameraHandle, Placement, Time};

use crate::device::{CullMode, GraphicsDevice};
use crate::error::{GeometryError, GpuResourceError};
use crate::geometry::{pack, GpuMesh, MeshVertex};
use crate::shader::{ShaderProgram, ShaderSource};

/// Mesh + program + placement, drawn with one indexed draw per
/// [`render`](Self::render).
///
/// The camera projection is written once at construction.  When the camera
/// projection changes later (window resize), the owner has to call
/// [`push_projection`](Self::push_projection); the view matrix is read from
/// the [`CameraHandle`] on every render.
///
/// Back-face culling is disabled for this object's draw only, because
/// imported meshes do not have reliable winding.
pub struct RenderableGeometry<D: GraphicsDevice> {
    program: ShaderProgram<D>,
    mesh: GpuMesh<D>,
    placement: Placement,
    camera: CameraHandle,
}

impl<D: GraphicsDevice> RenderableGeometry<D> {
    /// Imports `mesh_file`, uploads it and links the two shader files.
    ///
    /// Import and shader compilation both finish before anything is
    /// allocated on the device, so a bad file leaves the device untouched.
    pub fn construct(
        device: &mut D,
        mesh_file: impl AsRef<Path>,
        vertex_shader: impl AsRef<Path>,
        fragment_shader: impl AsRef<Path>,
        camera: CameraHandle,
    ) -> Result<Self, GeometryError> {
        let mesh = MeshImporter::new().import(mesh_file.as_ref())?.into_mesh();
        let source = ShaderSource::from_files(vertex_shader, fragment_shader)?;
        Self::from_mesh(device, &mesh, source, camera)
    }

    /// Same as [`construct`](Self::construct) for a mesh already in memory.
    pub fn from_mesh(
        device: &mut D,
        mesh: &Mesh,
        shader: ShaderSource,
        camera: CameraHandle,
    ) -> Result<Self, GeometryError> {
        let compiled = shader.compile()?;
        let packed = pack(mesh);
        let gpu_mesh = GpuMesh::upload(device, &packed)?;
        let program = compiled.link(device, &MeshVertex::LAYOUT)?;
        info!(
            "renderable `{}` ready: {} vertices, {} indices",
            mesh.name().unwrap_or(program.label()),
            gpu_mesh.vertex_count(),
            gpu_mesh.index_count()
        );

        let geometry = Self {
            program,
            mesh: gpu_mesh,
            placement: Placement::default(),
            camera,
        };
        geometry.push_projection(device);
        Ok(geometry)
    }

    /// Writes the camera's current projection into the program.
    pub fn push_projection(&self, device: &mut D) {
        self.program
            .begin(device)
            .set_uniform(PROJECTION_MATRIX, &self.camera.projection());
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.placement.position = position;
    }

    /// Yaw around +Y, in degrees.
    pub fn set_angle(&mut self, degrees: f32) {
        self.placement.angle_degrees = degrees;
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.placement.scale = scale;
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Model matrix for the current placement.
    pub fn model_matrix(&self) -> Mat4 {
        self.placement.model_matrix()
    }

    pub fn vertex_count(&self) -> u32 {
        self.mesh.vertex_count()
    }

    pub fn index_count(&self) -> u32 {
        self.mesh.index_count()
    }

    pub fn program(&self) -> &ShaderProgram<D> {
        &self.program
    }

    /// Draws the object once.
    ///
    /// Writes the view matrix, the elapsed time and the model matrix, then
    /// draws every face with culling disabled.  The program is deactivated
    /// and the previous cull mode restored before returning, error or not.
    pub fn render(&self, device: &mut D, time: &Time) -> Result<(), GpuResourceError> {
        let mut active = self.program.begin(device);
        active.set_uniform(VIEW_MATRIX, &self.camera.view());
        active.set_time(time.shader_seconds());
        active.set_uniform(MODEL_MATRIX, &self.model_matrix());

        let result = {
            let mut unculled = active.override_cull(CullMode::None);
            unculled.draw(&self.mesh)
        };
        active.end();
        result
    }
}
