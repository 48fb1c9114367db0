use std::path::{Path, PathBuf};

use crate::device::{GraphicsDevice, ProgramDescriptor, VertexLayout};
use crate::error::{ShaderError, ShaderStage};

use super::program::ShaderProgram;
use super::reflect::UniformTable;

/// WGSL text of one stage, plus where it came from.
#[derive(Debug, Clone)]
struct StageSource {
    origin: Option<PathBuf>,
    wgsl: String,
}

/// A vertex/fragment pair that has not been compiled yet.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    label: String,
    vertex: StageSource,
    fragment: StageSource,
}

impl ShaderSource {
    /// Reads both stages from disk.  The program label is built from the two
    /// file stems.
    pub fn from_files(
        vertex: impl AsRef<Path>,
        fragment: impl AsRef<Path>,
    ) -> Result<Self, ShaderError> {
        let (vertex, fragment) = (vertex.as_ref(), fragment.as_ref());
        let read = |path: &Path| {
            std::fs::read_to_string(path)
                .map(|wgsl| StageSource {
                    origin: Some(path.to_path_buf()),
                    wgsl,
                })
                .map_err(|source| ShaderError::Read {
                    path: path.to_path_buf(),
                    source,
                })
        };
        let stem = |path: &Path| {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        };
        Ok(Self {
            label: format!("{}+{}", stem(vertex), stem(fragment)),
            vertex: read(vertex)?,
            fragment: read(fragment)?,
        })
    }

    pub fn from_wgsl(
        label: impl Into<String>,
        vertex: impl Into<String>,
        fragment: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            vertex: StageSource {
                origin: None,
                wgsl: vertex.into(),
            },
            fragment: StageSource {
                origin: None,
                wgsl: fragment.into(),
            },
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Parses and validates both stages and merges their uniform interfaces.
    pub fn compile(self) -> Result<CompiledShader, ShaderError> {
        let vertex = self.compile_stage(ShaderStage::Vertex, &self.vertex)?;
        let fragment = self.compile_stage(ShaderStage::Fragment, &self.fragment)?;
        let uniforms = vertex
            .merge(&fragment)
            .map_err(|message| ShaderError::Link {
                label: self.label.clone(),
                message,
            })?;
        Ok(CompiledShader {
            label: self.label,
            vertex_wgsl: self.vertex.wgsl,
            fragment_wgsl: self.fragment.wgsl,
            uniforms,
        })
    }

    /// Compiles and links in one step.
    pub fn link<D: GraphicsDevice>(
        self,
        device: &mut D,
        vertex_layout: &VertexLayout,
    ) -> Result<ShaderProgram<D>, ShaderError> {
        self.compile()?.link(device, vertex_layout)
    }

    fn compile_stage(
        &self,
        stage: ShaderStage,
        source: &StageSource,
    ) -> Result<UniformTable, ShaderError> {
        let fail = |message: String| ShaderError::Compile {
            label: match &source.origin {
                Some(path) => path.display().to_string(),
                None => self.label.clone(),
            },
            stage,
            message,
        };

        let module = naga::front::wgsl::parse_str(&source.wgsl)
            .map_err(|e| fail(e.emit_to_string(&source.wgsl)))?;
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(&module)
        .map_err(|e| fail(e.emit_to_string(&source.wgsl)))?;

        let entry = stage.entry_point();
        if !module
            .entry_points
            .iter()
            .any(|ep| ep.name == entry && ep.stage == stage.naga())
        {
            return Err(fail(format!("no `{entry}` entry point for the {stage} stage")));
        }

        UniformTable::reflect(&module).map_err(|name| {
            fail(format!(
                "uniform `{name}` must be declared in @group({})",
                vernissage_core::interface::UNIFORM_GROUP
            ))
        })
    }
}

/// Both stages validated, uniform interface known.
#[derive(Debug, Clone)]
pub struct CompiledShader {
    label: String,
    vertex_wgsl: String,
    fragment_wgsl: String,
    uniforms: UniformTable,
}

impl CompiledShader {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn uniforms(&self) -> &UniformTable {
        &self.uniforms
    }

    /// Creates the device program.
    pub fn link<D: GraphicsDevice>(
        self,
        device: &mut D,
        vertex_layout: &VertexLayout,
    ) -> Result<ShaderProgram<D>, ShaderError> {
        let bindings = self.uniforms.bindings();
        let raw = device.link_program(&ProgramDescriptor {
            label: &self.label,
            vertex_wgsl: &self.vertex_wgsl,
            fragment_wgsl: &self.fragment_wgsl,
            vertex_layout,
            uniforms: &bindings,
        })?;
        log::debug!(
            "linked shader program `{}` ({} uniforms)",
            self.label,
            self.uniforms.len()
        );
        Ok(ShaderProgram::new(self.label, raw, self.uniforms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::MeshVertex;
    use crate::shader::UniformKind;
    use crate::testing::RecordingDevice;

    fn shader(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../assets/shaders")
            .join(name)
    }

    #[test]
    fn scene_shaders_compile() {
        let compiled = ShaderSource::from_files(shader("basic.vert.wgsl"), shader("basic.frag.wgsl"))
            .unwrap()
            .compile()
            .unwrap();
        assert_eq!(compiled.label(), "basic.vert+basic.frag");
        let uniforms = compiled.uniforms();
        assert_eq!(uniforms.get("viewMatrix").map(|s| s.offset), Some(64));
        assert_eq!(uniforms.get("modelMatrix").map(|s| s.offset), Some(128));
        assert_eq!(uniforms.get("baseColor").map(|s| s.kind), Some(UniformKind::Vec4));
        assert!(uniforms.has_binding(vernissage_core::interface::TIME_BINDING));

        for frag in [
            "panel_circles.frag.wgsl",
            "panel_rings.frag.wgsl",
            "panel_waves.frag.wgsl",
            "panel_checker.frag.wgsl",
        ] {
            ShaderSource::from_files(shader("basic.vert.wgsl"), shader(frag))
                .unwrap()
                .compile()
                .unwrap();
        }
        ShaderSource::from_files(shader("dome.vert.wgsl"), shader("basic.frag.wgsl"))
            .unwrap()
            .compile()
            .unwrap();
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = ShaderSource::from_files(shader("nope.vert.wgsl"), shader("basic.frag.wgsl"))
            .unwrap_err();
        assert!(matches!(err, ShaderError::Read { .. }));
    }

    #[test]
    fn syntax_errors_name_the_stage() {
        let err = ShaderSource::from_wgsl("broken", "fn vs_main( {", "")
            .compile()
            .unwrap_err();
        assert!(matches!(
            err,
            ShaderError::Compile {
                stage: ShaderStage::Vertex,
                ..
            }
        ));
    }

    #[test]
    fn entry_points_are_required() {
        let vertex = "@vertex fn vs_main() -> @builtin(position) vec4<f32> { return vec4<f32>(0.0); }";
        let fragment = "@fragment fn main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }";
        let err = ShaderSource::from_wgsl("entry", vertex, fragment)
            .compile()
            .unwrap_err();
        assert!(matches!(
            err,
            ShaderError::Compile {
                stage: ShaderStage::Fragment,
                ..
            }
        ));
    }

    #[test]
    fn conflicting_stages_fail_to_link() {
        let vertex = "@group(0) @binding(0) var<uniform> tint: vec4<f32>;
@vertex fn vs_main() -> @builtin(position) vec4<f32> { return tint; }";
        let fragment = "@group(0) @binding(0) var<uniform> tint: vec2<f32>;
@fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(tint, 0.0, 1.0); }";
        let mut device = RecordingDevice::new();
        let err = ShaderSource::from_wgsl("clash", vertex, fragment)
            .link(&mut device, &MeshVertex::LAYOUT)
            .unwrap_err();
        assert!(matches!(err, ShaderError::Link { .. }));
        assert_eq!(device.programs_linked(), 0);
    }
}
