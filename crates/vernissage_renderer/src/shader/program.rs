use glam::{Mat4, Vec2, Vec3, Vec4};
use log::{debug, trace};
use vernissage_core::interface::TIME_BINDING;

use super::reflect::{BindingShape, UniformKind, UniformTable};
use crate::device::{CullMode, GraphicsDevice};
use crate::error::GpuResourceError;
use crate::geometry::GpuMesh;
use crate::render_state::CullOverride;

/// CPU values that can be written into a uniform slot.
pub trait UniformData {
    const KIND: UniformKind;

    fn bytes(&self) -> &[u8];
}

macro_rules! impl_uniform_data {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl UniformData for $ty {
                const KIND: UniformKind = UniformKind::$kind;

                fn bytes(&self) -> &[u8] {
                    bytemuck::bytes_of(self)
                }
            }
        )*
    };
}

impl_uniform_data! {
    Mat4 => Mat4,
    Vec4 => Vec4,
    Vec3 => Vec3,
    Vec2 => Vec2,
    f32 => F32,
}

/// A linked vertex/fragment program.
///
/// Uniforms can only be written through the [`ActiveProgram`] returned by
/// [`begin`](Self::begin), so a write to an inactive program does not
/// compile.
pub struct ShaderProgram<D: GraphicsDevice> {
    label: String,
    raw: D::Program,
    uniforms: UniformTable,
}

impl<D: GraphicsDevice> std::fmt::Debug for ShaderProgram<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("label", &self.label)
            .field("uniforms", &self.uniforms)
            .finish_non_exhaustive()
    }
}

impl<D: GraphicsDevice> ShaderProgram<D> {
    pub(crate) fn new(label: String, raw: D::Program, uniforms: UniformTable) -> Self {
        Self {
            label,
            raw,
            uniforms,
        }
    }

    /// Activates the program until the returned guard is dropped or
    /// [`ActiveProgram::end`] is called.
    pub fn begin<'a>(&'a self, device: &'a mut D) -> ActiveProgram<'a, D> {
        device.use_program(Some(&self.raw));
        ActiveProgram {
            program: self,
            device,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn uniforms(&self) -> &UniformTable {
        &self.uniforms
    }

    pub fn raw(&self) -> &D::Program {
        &self.raw
    }
}

/// A program between `begin()` and `end()`.
pub struct ActiveProgram<'a, D: GraphicsDevice> {
    program: &'a ShaderProgram<D>,
    pub(crate) device: &'a mut D,
}

impl<'a, D: GraphicsDevice> ActiveProgram<'a, D> {
    /// Writes `value` to the uniform called `name`.
    ///
    /// Names the program does not declare are ignored, as are values whose
    /// type does not match the declaration.
    pub fn set_uniform<U: UniformData>(&mut self, name: &str, value: &U) {
        let Some(slot) = self.program.uniforms.get(name) else {
            trace!("`{}` has no uniform `{name}`", self.program.label);
            return;
        };
        if slot.kind != U::KIND {
            debug!(
                "`{}`: uniform `{name}` is {:?}, ignoring a {:?} write",
                self.program.label,
                slot.kind,
                U::KIND
            );
            return;
        }
        self.device.write_uniform(
            &self.program.raw,
            slot.binding,
            slot.offset as u64,
            value.bytes(),
        );
    }

    /// Writes the elapsed time to the fixed time binding.  A no-op for
    /// programs that do not declare it or declare something other than an
    /// `f32` there.
    pub fn set_time(&mut self, seconds: f32) {
        match self.program.uniforms.shape(TIME_BINDING) {
            Some(BindingShape::Value(UniformKind::F32)) => {
                self.device
                    .write_uniform(&self.program.raw, TIME_BINDING, 0, seconds.bytes());
            }
            Some(shape) => debug!(
                "`{}`: binding {TIME_BINDING} is {shape:?}, not writing the time",
                self.program.label
            ),
            None => {}
        }
    }

    /// Switches the cull mode until the returned guard is dropped.
    pub fn override_cull(&mut self, mode: CullMode) -> CullOverride<'_, 'a, D> {
        CullOverride::new(self, mode)
    }

    pub fn draw(&mut self, mesh: &GpuMesh<D>) -> Result<(), GpuResourceError> {
        self.device
            .draw_indexed(&self.program.raw, mesh.raw(), mesh.index_count())
    }

    pub fn program(&self) -> &ShaderProgram<D> {
        self.program
    }

    /// Deactivates the program.  Same as dropping the guard.
    pub fn end(self) {}
}

impl<D: GraphicsDevice> Drop for ActiveProgram<'_, D> {
    fn drop(&mut self) {
        self.device.use_program(None);
    }
}
