//! Scoped render-state changes.

use std::ops::{Deref, DerefMut};

use crate::device::{CullMode, GraphicsDevice};
use crate::shader::ActiveProgram;

/// Cull mode override that lasts as long as the guard.
///
/// The previous mode is restored on drop, including when the scope is left
/// early through `?` or a panic.  The guard dereferences to the
/// [`ActiveProgram`] it was created from so draws can go through it.
pub struct CullOverride<'g, 'a, D: GraphicsDevice> {
    active: &'g mut ActiveProgram<'a, D>,
    previous: CullMode,
}

impl<'g, 'a, D: GraphicsDevice> CullOverride<'g, 'a, D> {
    pub(crate) fn new(active: &'g mut ActiveProgram<'a, D>, mode: CullMode) -> Self {
        let previous = active.device.cull_mode();
        active.device.set_cull_mode(mode);
        Self { active, previous }
    }

    /// Mode that will be restored.
    pub fn previous(&self) -> CullMode {
        self.previous
    }
}

impl<'a, D: GraphicsDevice> Deref for CullOverride<'_, 'a, D> {
    type Target = ActiveProgram<'a, D>;

    fn deref(&self) -> &Self::Target {
        &*self.active
    }
}

impl<D: GraphicsDevice> DerefMut for CullOverride<'_, '_, D> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.active
    }
}

impl<D: GraphicsDevice> Drop for CullOverride<'_, '_, D> {
    fn drop(&mut self) {
        self.active.device.set_cull_mode(self.previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{GpuMesh, MeshVertex};
    use crate::shader::ShaderSource;
    use crate::testing::{Command, RecordingDevice};
    use vernissage_assets::primitives;

    const VERTEX: &str = "@vertex fn vs_main(@location(0) p: vec3<f32>) -> @builtin(position) vec4<f32> { return vec4<f32>(p, 1.0); }";
    const FRAGMENT: &str = "@fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }";

    #[test]
    fn override_applies_to_draws_inside_and_is_restored() {
        let mut device = RecordingDevice::new();
        let program = ShaderSource::from_wgsl("cull", VERTEX, FRAGMENT)
            .link(&mut device, &MeshVertex::LAYOUT)
            .unwrap();
        let mesh = GpuMesh::from_mesh(&mut device, &primitives::quad(1.0)).unwrap();
        assert_eq!(device.cull_mode(), CullMode::Back);

        {
            let mut active = program.begin(&mut device);
            {
                let mut culled = active.override_cull(CullMode::None);
                assert_eq!(culled.previous(), CullMode::Back);
                culled.draw(&mesh).unwrap();
            }
            active.draw(&mesh).unwrap();
        }

        let culls: Vec<CullMode> = device
            .commands
            .iter()
            .filter_map(|c| match c {
                Command::Draw { cull, .. } => Some(*cull),
                _ => None,
            })
            .collect();
        assert_eq!(culls, vec![CullMode::None, CullMode::Back]);
        assert_eq!(device.cull_mode(), CullMode::Back);
    }

    #[test]
    fn restored_on_early_return() {
        fn failing_draw(
            program: &crate::ShaderProgram<RecordingDevice>,
            mesh: &GpuMesh<RecordingDevice>,
            device: &mut RecordingDevice,
        ) -> Result<(), crate::GpuResourceError> {
            let mut active = program.begin(device);
            let mut culled = active.override_cull(CullMode::Front);
            culled.draw(mesh)?;
            Ok(())
        }

        let mut device = RecordingDevice::new();
        let program = ShaderSource::from_wgsl("cull", VERTEX, FRAGMENT)
            .link(&mut device, &MeshVertex::LAYOUT)
            .unwrap();
        let mesh = GpuMesh::from_mesh(&mut device, &primitives::quad(1.0)).unwrap();
        device.fail_draws = true;

        assert!(failing_draw(&program, &mesh, &mut device).is_err());
        assert_eq!(device.cull_mode(), CullMode::Back);
        assert_eq!(device.commands.last(), Some(&Command::UseProgram(None)));
    }
}
