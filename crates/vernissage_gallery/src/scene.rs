//! The gallery: a floor, a row of shader panels and the imported dome,
//! drawn in that order every frame.

use std::path::Path;

use glam::{Mat4, Vec3};
use vernissage_assets::primitives;
use vernissage_core::interface::{BASE_COLOR, MODEL_MATRIX, PROJECTION_MATRIX, VIEW_MATRIX};
use vernissage_core::{CameraHandle, Time};
use vernissage_renderer::{
    GeometryError, GpuMesh, GpuResourceError, GraphicsDevice, MeshVertex, RenderableGeometry,
    ShaderError, ShaderProgram, ShaderSource,
};

use crate::scene_config::{FloorConfig, PanelsConfig, SceneConfig};

/// Model matrix of the floor quad: tilted flat, then dropped to `height`.
pub fn floor_model(height: f32) -> Mat4 {
    Mat4::from_rotation_x((-90.0f32).to_radians()) * Mat4::from_translation(Vec3::new(0.0, 0.0, height))
}

/// Centres of the panel row.
pub fn panel_positions(panels: &PanelsConfig) -> Vec<Vec3> {
    let start = Vec3::from(panels.start);
    (0..panels.count)
        .map(|i| start + Vec3::X * (i as f32 * panels.spacing))
        .collect()
}

/// Fragment shader of panel `index`, cycling through the list.
pub fn panel_shader(panels: &PanelsConfig, index: usize) -> Option<&str> {
    if panels.fragment_shaders.is_empty() {
        return None;
    }
    Some(panels.fragment_shaders[index % panels.fragment_shaders.len()].as_str())
}

/// A flat-coloured quad with its own program.  The mesh is owned by the
/// scene so panels can share one.
struct FlatPiece<D: GraphicsDevice> {
    program: ShaderProgram<D>,
    model: Mat4,
}

impl<D: GraphicsDevice> FlatPiece<D> {
    fn link(
        device: &mut D,
        source: ShaderSource,
        model: Mat4,
        color: [f32; 3],
        camera: &CameraHandle,
    ) -> Result<Self, ShaderError> {
        let program = source.link(device, &MeshVertex::LAYOUT)?;
        {
            let mut active = program.begin(device);
            active.set_uniform(PROJECTION_MATRIX, &camera.projection());
            active.set_uniform(BASE_COLOR, &Vec3::from(color).extend(1.0));
        }
        Ok(Self { program, model })
    }

    fn push_projection(&self, device: &mut D, camera: &CameraHandle) {
        self.program
            .begin(device)
            .set_uniform(PROJECTION_MATRIX, &camera.projection());
    }

    fn render(
        &self,
        device: &mut D,
        mesh: &GpuMesh<D>,
        camera: &CameraHandle,
        time: &Time,
    ) -> Result<(), GpuResourceError> {
        let mut active = self.program.begin(device);
        active.set_uniform(VIEW_MATRIX, &camera.view());
        active.set_time(time.shader_seconds());
        active.set_uniform(MODEL_MATRIX, &self.model);
        active.draw(mesh)
    }
}

pub struct Scene<D: GraphicsDevice> {
    camera: CameraHandle,
    floor_mesh: GpuMesh<D>,
    floor: FlatPiece<D>,
    panel_mesh: GpuMesh<D>,
    panels: Vec<FlatPiece<D>>,
    dome: RenderableGeometry<D>,
}

impl<D: GraphicsDevice> Scene<D> {
    /// Builds every piece of the gallery.  Relative paths in `config` are
    /// resolved against `root`.
    ///
    /// Any failure aborts the whole build.
    pub fn build(
        device: &mut D,
        config: &SceneConfig,
        root: &Path,
        camera: CameraHandle,
    ) -> Result<Self, GeometryError> {
        let (floor_mesh, floor) = Self::build_floor(device, &config.floor, root, &camera)?;

        let panel_mesh = GpuMesh::from_mesh(device, &primitives::quad(config.panels.half_extent))?;
        let positions = panel_positions(&config.panels);
        if !positions.is_empty() && config.panels.fragment_shaders.is_empty() {
            log::warn!("no panel fragment shaders configured; the panel row is left empty");
        }
        let mut panels = Vec::with_capacity(positions.len());
        for (i, position) in positions.into_iter().enumerate() {
            let Some(fragment) = panel_shader(&config.panels, i) else {
                break;
            };
            let source =
                ShaderSource::from_files(root.join(&config.panels.vertex_shader), root.join(fragment))?;
            panels.push(FlatPiece::link(
                device,
                source,
                Mat4::from_translation(position),
                config.panels.color,
                &camera,
            )?);
        }

        let dome_config = &config.dome;
        let mut dome = RenderableGeometry::construct(
            device,
            root.join(&dome_config.mesh),
            root.join(&dome_config.vertex_shader),
            root.join(&dome_config.fragment_shader),
            camera.clone(),
        )?;
        dome.set_position(Vec3::from(dome_config.position));
        dome.set_angle(dome_config.angle);
        dome.set_scale(dome_config.scale);

        Ok(Self {
            camera,
            floor_mesh,
            floor,
            panel_mesh,
            panels,
            dome,
        })
    }

    fn build_floor(
        device: &mut D,
        floor: &FloorConfig,
        root: &Path,
        camera: &CameraHandle,
    ) -> Result<(GpuMesh<D>, FlatPiece<D>), GeometryError> {
        let source = ShaderSource::from_files(
            root.join(&floor.vertex_shader),
            root.join(&floor.fragment_shader),
        )?;
        let mesh = GpuMesh::from_mesh(device, &primitives::quad(floor.half_extent))?;
        let piece = FlatPiece::link(device, source, floor_model(floor.height), floor.color, camera)?;
        Ok((mesh, piece))
    }

    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    pub fn dome(&self) -> &RenderableGeometry<D> {
        &self.dome
    }

    /// Re-sends the camera projection to every program, after a resize.
    pub fn push_projection(&self, device: &mut D) {
        self.floor.push_projection(device, &self.camera);
        for panel in &self.panels {
            panel.push_projection(device, &self.camera);
        }
        self.dome.push_projection(device);
    }

    /// Floor, then the panels left to right, then the dome.
    pub fn render(&self, device: &mut D, time: &Time) -> Result<(), GpuResourceError> {
        self.floor
            .render(device, &self.floor_mesh, &self.camera, time)?;
        for panel in &self.panels {
            panel.render(device, &self.panel_mesh, &self.camera, time)?;
        }
        self.dome.render(device, time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use vernissage_core::CameraMatrices;
    use vernissage_renderer::{CullMode, ProgramDescriptor, VertexLayout};

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Draw {
        program: u32,
        vertex_array: u32,
        index_count: u32,
        cull: CullMode,
    }

    /// Hands out increasing ids and remembers draws and uniform writes.
    #[derive(Default)]
    struct TallyDevice {
        programs: u32,
        vertex_arrays: u32,
        cull: CullMode,
        active: Option<u32>,
        draws: Vec<Draw>,
        writes: Vec<(u32, u32, u64, Vec<u8>)>,
    }

    impl GraphicsDevice for TallyDevice {
        type Program = u32;
        type VertexArray = u32;

        fn link_program(&mut self, _desc: &ProgramDescriptor<'_>) -> Result<u32, ShaderError> {
            self.programs += 1;
            Ok(self.programs)
        }

        fn create_vertex_array(
            &mut self,
            _vertex_bytes: &[u8],
            _indices: &[u32],
            _layout: &VertexLayout,
        ) -> Result<u32, GpuResourceError> {
            self.vertex_arrays += 1;
            Ok(self.vertex_arrays)
        }

        fn use_program(&mut self, program: Option<&u32>) {
            self.active = program.copied();
        }

        fn write_uniform(&mut self, program: &u32, binding: u32, offset: u64, bytes: &[u8]) {
            self.writes.push((*program, binding, offset, bytes.to_vec()));
        }

        fn cull_mode(&self) -> CullMode {
            self.cull
        }

        fn set_cull_mode(&mut self, mode: CullMode) {
            self.cull = mode;
        }

        fn draw_indexed(
            &mut self,
            program: &u32,
            vertex_array: &u32,
            index_count: u32,
        ) -> Result<(), GpuResourceError> {
            assert_eq!(self.active, Some(*program));
            self.draws.push(Draw {
                program: *program,
                vertex_array: *vertex_array,
                index_count,
                cull: self.cull,
            });
            Ok(())
        }
    }

    fn root() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
    }

    fn camera() -> CameraHandle {
        CameraHandle::fixed(CameraMatrices {
            projection: Mat4::perspective_rh(0.8, 16.0 / 9.0, 0.1, 1000.0),
            view: Mat4::look_at_rh(Vec3::new(0.0, 15.0, 90.0), Vec3::ZERO, Vec3::Y),
        })
    }

    fn time() -> Time {
        Time {
            delta: 0.016,
            elapsed: 1.5,
            frame_count: 90,
        }
    }

    #[test]
    fn floor_sits_flat_at_its_height() {
        let model = floor_model(-10.0);
        let centre = model.transform_point3(Vec3::ZERO);
        assert!(centre.abs_diff_eq(Vec3::new(0.0, -10.0, 0.0), 1e-5));
        let normal = model.transform_vector3(Vec3::Z);
        assert!(normal.abs_diff_eq(Vec3::Y, 1e-5));
    }

    #[test]
    fn panels_are_spaced_along_x_and_cycle_shaders() {
        let panels = PanelsConfig::default();
        let positions = panel_positions(&panels);
        assert_eq!(positions.len(), 11);
        assert_eq!(positions[0], Vec3::new(-80.0, 10.0, -30.0));
        assert_eq!(positions[10], Vec3::new(320.0, 10.0, -30.0));
        assert_eq!(panel_shader(&panels, 0), panel_shader(&panels, 4));
        assert_ne!(panel_shader(&panels, 0), panel_shader(&panels, 1));

        let none = PanelsConfig {
            fragment_shaders: Vec::new(),
            ..PanelsConfig::default()
        };
        assert_eq!(panel_shader(&none, 0), None);
    }

    #[test]
    fn default_scene_draws_floor_panels_then_dome() {
        let mut device = TallyDevice::default();
        let scene = Scene::build(&mut device, &SceneConfig::default(), &root(), camera()).unwrap();
        assert_eq!(scene.panel_count(), 11);
        assert_eq!(device.programs, 13);
        assert_eq!(device.vertex_arrays, 3);

        scene.render(&mut device, &time()).unwrap();
        let draws = &device.draws;
        assert_eq!(draws.len(), 13);

        let floor = draws[0];
        assert_eq!((floor.program, floor.vertex_array, floor.index_count), (1, 1, 6));

        let panels = &draws[1..12];
        assert!(panels.iter().all(|d| d.vertex_array == 2 && d.index_count == 6));
        assert!(panels.iter().all(|d| d.cull == CullMode::Back));
        let programs: Vec<u32> = panels.iter().map(|d| d.program).collect();
        assert_eq!(programs, (2..13).collect::<Vec<_>>());

        let dome = draws[12];
        assert_eq!((dome.program, dome.vertex_array), (13, 3));
        assert_eq!(dome.cull, CullMode::None);
        assert_eq!(dome.index_count, scene.dome().index_count());
        assert_eq!(device.cull, CullMode::Back);
        assert_eq!(device.active, None);
    }

    #[test]
    fn projection_push_reaches_every_program() {
        let mut device = TallyDevice::default();
        let scene = Scene::build(&mut device, &SceneConfig::default(), &root(), camera()).unwrap();
        device.writes.clear();

        scene.push_projection(&mut device);
        let projection = bytemuck_bytes(&camera().projection());
        let targets: Vec<u32> = device
            .writes
            .iter()
            .filter(|(_, binding, offset, bytes)| *binding == 0 && *offset == 0 && *bytes == projection)
            .map(|(program, ..)| *program)
            .collect();
        assert_eq!(targets, (1..=13).collect::<Vec<_>>());
    }

    #[test]
    fn missing_dome_fails_the_whole_build() {
        let mut config = SceneConfig::default();
        config.dome.mesh = "assets/models/missing.obj".into();
        let mut device = TallyDevice::default();
        let result = Scene::build(&mut device, &config, &root(), camera());
        assert!(matches!(result, Err(GeometryError::Import(_))));
    }

    fn bytemuck_bytes(m: &Mat4) -> Vec<u8> {
        m.to_cols_array().iter().flat_map(|f| f.to_ne_bytes()).collect()
    }
}
