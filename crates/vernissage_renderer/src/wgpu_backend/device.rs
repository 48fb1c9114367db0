//! [`GraphicsDevice`] on top of `wgpu`.
//!
//! A frame is one render pass: [`WgpuDevice::begin_frame`] clears the colour
//! and depth targets, every `draw_indexed` records into that pass, and
//! [`WgpuDevice::end_frame`] submits it.  Culling is pipeline state in wgpu,
//! so each program is linked into one pipeline per [`CullMode`] and the
//! current mode picks the variant at draw time.

use std::sync::Arc;

use log::{trace, warn};
use wgpu::util::DeviceExt;

use super::depth::DepthTarget;
use crate::device::{CullMode, GraphicsDevice, ProgramDescriptor, VertexLayout};
use crate::error::{GpuResourceError, ShaderError, ShaderStage};
use crate::shader::UniformBinding;

/// Linked program: three pipeline variants sharing one bind group.
pub struct WgpuProgram {
    id: u64,
    label: String,
    /// Indexed by [`cull_index`].
    pipelines: Vec<wgpu::RenderPipeline>,
    uniform_buffers: Vec<(u32, wgpu::Buffer)>,
    bind_group: wgpu::BindGroup,
    vertex_stride: u64,
}

impl WgpuProgram {
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Vertex + `u32` index buffer pair.
pub struct WgpuVertexArray {
    vertex: wgpu::Buffer,
    index: wgpu::Buffer,
    stride: u64,
}

struct Frame {
    encoder: wgpu::CommandEncoder,
    pass: wgpu::RenderPass<'static>,
}

pub struct WgpuDevice {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    color_format: wgpu::TextureFormat,
    cull_mode: CullMode,
    active: Option<u64>,
    next_program: u64,
    frame: Option<Frame>,
}

impl WgpuDevice {
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        color_format: wgpu::TextureFormat,
    ) -> Self {
        Self {
            device,
            queue,
            color_format,
            cull_mode: CullMode::default(),
            active: None,
            next_program: 0,
            frame: None,
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Opens the frame's render pass, clearing `color` to `clear` and the
    /// depth target to 1.0.  Resets culling to the scene default.
    ///
    /// A frame that was never ended is submitted first.
    pub fn begin_frame(&mut self, color: &wgpu::TextureView, depth: &DepthTarget, clear: wgpu::Color) {
        if self.frame.is_some() {
            warn!("begin_frame called twice; submitting the previous frame");
            self.end_frame();
        }
        self.cull_mode = CullMode::default();

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });
        let pass = encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            })
            .forget_lifetime();
        self.frame = Some(Frame { encoder, pass });
    }

    /// Closes the render pass and submits the frame.  No-op outside a frame.
    pub fn end_frame(&mut self) {
        if let Some(Frame { encoder, pass }) = self.frame.take() {
            drop(pass);
            self.queue.submit(Some(encoder.finish()));
        }
    }

    fn create_pipeline(
        &self,
        label: &str,
        layout: &wgpu::PipelineLayout,
        vertex: &wgpu::ShaderModule,
        fragment: &wgpu::ShaderModule,
        vertex_layout: &VertexLayout,
        cull: CullMode,
    ) -> wgpu::RenderPipeline {
        let attributes: Vec<wgpu::VertexAttribute> = vertex_layout
            .attributes
            .iter()
            .map(|a| wgpu::VertexAttribute {
                format: float_format(a.components),
                offset: a.offset,
                shader_location: a.location,
            })
            .collect();

        self.device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(&format!("{label} ({cull:?} cull)")),
                layout: Some(layout),
                vertex: wgpu::VertexState {
                    module: vertex,
                    entry_point: Some(ShaderStage::Vertex.entry_point()),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: vertex_layout.stride,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &attributes,
                    }],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: fragment,
                    entry_point: Some(ShaderStage::Fragment.entry_point()),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.color_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: wgpu_face(cull),
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DepthTarget::FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
    }
}

impl GraphicsDevice for WgpuDevice {
    type Program = WgpuProgram;
    type VertexArray = WgpuVertexArray;

    fn link_program(&mut self, desc: &ProgramDescriptor<'_>) -> Result<WgpuProgram, ShaderError> {
        let label = desc.label;
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let vertex = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&format!("{label} vertex")),
                source: wgpu::ShaderSource::Wgsl(desc.vertex_wgsl.into()),
            });
        let fragment = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&format!("{label} fragment")),
                source: wgpu::ShaderSource::Wgsl(desc.fragment_wgsl.into()),
            });

        let layout_entries: Vec<wgpu::BindGroupLayoutEntry> = desc
            .uniforms
            .iter()
            .map(|u| wgpu::BindGroupLayoutEntry {
                binding: u.binding,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            })
            .collect();
        let bind_group_layout = self
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(&format!("{label} uniforms layout")),
                entries: &layout_entries,
            });

        let uniform_buffers: Vec<(u32, wgpu::Buffer)> = desc
            .uniforms
            .iter()
            .map(|u| {
                let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(&format!("{label} uniforms @binding({})", u.binding)),
                    size: uniform_buffer_size(u),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });
                (u.binding, buffer)
            })
            .collect();
        let entries: Vec<wgpu::BindGroupEntry> = uniform_buffers
            .iter()
            .map(|(binding, buffer)| wgpu::BindGroupEntry {
                binding: *binding,
                resource: buffer.as_entire_binding(),
            })
            .collect();
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} uniforms")),
            layout: &bind_group_layout,
            entries: &entries,
        });

        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(&format!("{label} layout")),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });
        let pipelines = CullMode::ALL
            .iter()
            .map(|&cull| {
                self.create_pipeline(
                    label,
                    &pipeline_layout,
                    &vertex,
                    &fragment,
                    desc.vertex_layout,
                    cull,
                )
            })
            .collect();

        if let Some(err) = pollster::block_on(self.device.pop_error_scope()) {
            return Err(ShaderError::Link {
                label: label.to_string(),
                message: err.to_string(),
            });
        }

        self.next_program += 1;
        Ok(WgpuProgram {
            id: self.next_program,
            label: label.to_string(),
            pipelines,
            uniform_buffers,
            bind_group,
            vertex_stride: desc.vertex_layout.stride,
        })
    }

    fn create_vertex_array(
        &mut self,
        vertex_bytes: &[u8],
        indices: &[u32],
        layout: &VertexLayout,
    ) -> Result<WgpuVertexArray, GpuResourceError> {
        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let vertex = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: vertex_bytes,
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Index Buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        if let Some(err) = pollster::block_on(self.device.pop_error_scope()) {
            return Err(GpuResourceError::Allocation {
                what: "vertex array",
                message: err.to_string(),
            });
        }
        Ok(WgpuVertexArray {
            vertex,
            index,
            stride: layout.stride,
        })
    }

    fn use_program(&mut self, program: Option<&WgpuProgram>) {
        self.active = program.map(|p| p.id);
    }

    /// Uniform writes are queued and land before the frame is submitted, so
    /// a program drawn several times in one frame sees the values written
    /// last.
    fn write_uniform(&mut self, program: &WgpuProgram, binding: u32, offset: u64, bytes: &[u8]) {
        match program.uniform_buffers.iter().find(|(b, _)| *b == binding) {
            Some((_, buffer)) => self.queue.write_buffer(buffer, offset, bytes),
            None => trace!("`{}` has no uniform buffer at binding {binding}", program.label),
        }
    }

    fn cull_mode(&self) -> CullMode {
        self.cull_mode
    }

    fn set_cull_mode(&mut self, mode: CullMode) {
        self.cull_mode = mode;
    }

    fn draw_indexed(
        &mut self,
        program: &WgpuProgram,
        vertex_array: &WgpuVertexArray,
        index_count: u32,
    ) -> Result<(), GpuResourceError> {
        if self.active != Some(program.id) {
            warn!("drawing with `{}` while it is not the active program", program.label);
        }
        if vertex_array.stride != program.vertex_stride {
            warn!(
                "`{}` expects {}-byte vertices, buffer has {}",
                program.label, program.vertex_stride, vertex_array.stride
            );
        }
        let frame = self.frame.as_mut().ok_or(GpuResourceError::NoActiveFrame)?;
        let pass = &mut frame.pass;
        pass.set_pipeline(&program.pipelines[cull_index(self.cull_mode)]);
        pass.set_bind_group(0, &program.bind_group, &[]);
        pass.set_vertex_buffer(0, vertex_array.vertex.slice(..));
        pass.set_index_buffer(vertex_array.index.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..index_count, 0, 0..1);
        Ok(())
    }
}

/// Position of `mode` in [`CullMode::ALL`].
fn cull_index(mode: CullMode) -> usize {
    match mode {
        CullMode::None => 0,
        CullMode::Front => 1,
        CullMode::Back => 2,
    }
}

fn wgpu_face(mode: CullMode) -> Option<wgpu::Face> {
    match mode {
        CullMode::None => None,
        CullMode::Front => Some(wgpu::Face::Front),
        CullMode::Back => Some(wgpu::Face::Back),
    }
}

fn float_format(components: u32) -> wgpu::VertexFormat {
    match components {
        1 => wgpu::VertexFormat::Float32,
        2 => wgpu::VertexFormat::Float32x2,
        3 => wgpu::VertexFormat::Float32x3,
        _ => wgpu::VertexFormat::Float32x4,
    }
}

/// Uniform buffers are padded to 16 bytes.
fn uniform_buffer_size(binding: &UniformBinding) -> u64 {
    binding.size.max(16).next_multiple_of(16)
}
