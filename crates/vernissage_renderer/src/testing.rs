//! In-memory [`GraphicsDevice`] that records every call, for tests.

use glam::Mat4;

use crate::device::{CullMode, GraphicsDevice, ProgramDescriptor, VertexLayout};
use crate::error::{GpuResourceError, ShaderError};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    UseProgram(Option<u32>),
    WriteUniform {
        program: u32,
        binding: u32,
        offset: u64,
        bytes: Vec<u8>,
    },
    SetCull(CullMode),
    Draw {
        program: u32,
        active: Option<u32>,
        vertex_array: u32,
        index_count: u32,
        cull: CullMode,
    },
}

#[derive(Debug)]
pub(crate) struct RecordedProgram {
    id: u32,
    /// Uniform buffers the program was linked with, as `(binding, size)`.
    pub uniforms: Vec<(u32, u64)>,
}

#[derive(Debug)]
pub(crate) struct RecordedArray {
    id: u32,
}

#[derive(Debug, Default)]
pub(crate) struct RecordingDevice {
    pub commands: Vec<Command>,
    /// Uploaded `(vertex bytes, indices)` pairs, in upload order.
    pub vertex_arrays: Vec<(Vec<u8>, Vec<u32>)>,
    pub fail_allocations: bool,
    pub fail_draws: bool,
    programs: u32,
    cull: CullMode,
    active: Option<u32>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn programs_linked(&self) -> u32 {
        self.programs
    }

    pub fn program_id(&self, program: &RecordedProgram) -> u32 {
        program.id
    }

    /// `(binding, offset, bytes)` of every uniform write.
    pub fn uniform_writes(&self) -> Vec<(u32, u64, Vec<u8>)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::WriteUniform {
                    binding,
                    offset,
                    bytes,
                    ..
                } => Some((*binding, *offset, bytes.clone())),
                _ => None,
            })
            .collect()
    }

    /// Every matrix written at `(binding, offset)`, oldest first.
    pub fn matrices_at(&self, binding: u32, offset: u64) -> Vec<Mat4> {
        self.uniform_writes()
            .into_iter()
            .filter(|(b, o, bytes)| *b == binding && *o == offset && bytes.len() == 64)
            .map(|(_, _, bytes)| bytemuck::pod_read_unaligned(&bytes))
            .collect()
    }

    pub fn draws(&self) -> Vec<&Command> {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::Draw { .. }))
            .collect()
    }
}

impl GraphicsDevice for RecordingDevice {
    type Program = RecordedProgram;
    type VertexArray = RecordedArray;

    fn link_program(&mut self, desc: &ProgramDescriptor<'_>) -> Result<RecordedProgram, ShaderError> {
        self.programs += 1;
        Ok(RecordedProgram {
            id: self.programs,
            uniforms: desc.uniforms.iter().map(|u| (u.binding, u.size)).collect(),
        })
    }

    fn create_vertex_array(
        &mut self,
        vertex_bytes: &[u8],
        indices: &[u32],
        _layout: &VertexLayout,
    ) -> Result<RecordedArray, GpuResourceError> {
        if self.fail_allocations {
            return Err(GpuResourceError::Allocation {
                what: "vertex buffer",
                message: "out of memory".into(),
            });
        }
        self.vertex_arrays
            .push((vertex_bytes.to_vec(), indices.to_vec()));
        Ok(RecordedArray {
            id: self.vertex_arrays.len() as u32,
        })
    }

    fn use_program(&mut self, program: Option<&RecordedProgram>) {
        self.active = program.map(|p| p.id);
        self.commands.push(Command::UseProgram(self.active));
    }

    fn write_uniform(&mut self, program: &RecordedProgram, binding: u32, offset: u64, bytes: &[u8]) {
        self.commands.push(Command::WriteUniform {
            program: program.id,
            binding,
            offset,
            bytes: bytes.to_vec(),
        });
    }

    fn cull_mode(&self) -> CullMode {
        self.cull
    }

    fn set_cull_mode(&mut self, mode: CullMode) {
        self.cull = mode;
        self.commands.push(Command::SetCull(mode));
    }

    fn draw_indexed(
        &mut self,
        program: &RecordedProgram,
        vertex_array: &RecordedArray,
        index_count: u32,
    ) -> Result<(), GpuResourceError> {
        if self.fail_draws {
            return Err(GpuResourceError::NoActiveFrame);
        }
        self.commands.push(Command::Draw {
            program: program.id,
            active: self.active,
            vertex_array: vertex_array.id,
            index_count,
            cull: self.cull,
        });
        Ok(())
    }
}
