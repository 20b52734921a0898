//! Walk Mesh Render Pass
//!
//! Draws the walkable geometry from the walking camera, lit by the scene's
//! ambient term and the camera flashlight.

use glam::Mat4;

use super::gpu_context::{DEPTH_FORMAT, GpuContext};
use crate::camera::CameraPose;
use crate::player::SceneLighting;
use crate::world::{Vertex, WalkableGeometry};

/// Shader source, embedded at compile time.
pub const WALK_MESH_SHADER: &str = include_str!("../../../shaders/walk_mesh.wgsl");

/// Uniform data for the walk mesh pass (matches `WalkUniforms` in the shader)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct WalkUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 3],
    pub ambient: f32,
    pub light_dir: [f32; 3],
    pub light_intensity: f32,
    pub light_color: [f32; 3],
    pub light_range: f32,
    pub cone_cos: f32,
    pub penumbra_cos: f32,
    pub decay: f32,
    pub _pad: f32,
}

static_assertions::assert_eq_size!(WalkUniforms, [u8; 128]);

impl Default for WalkUniforms {
    fn default() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            camera_pos: [0.0; 3],
            ambient: 1.0,
            light_dir: [0.0, 0.0, -1.0],
            light_intensity: 0.0,
            light_color: [1.0; 3],
            light_range: 1.0,
            cone_cos: 0.0,
            penumbra_cos: 0.0,
            decay: 1.0,
            _pad: 0.0,
        }
    }
}

impl WalkUniforms {
    /// Build the frame uniforms.
    ///
    /// # Arguments
    ///
    /// * `camera` - Pose to render from
    /// * `lighting` - Current light visibility
    /// * `ambient_level` - Ambient term used while scene lights are visible
    pub fn from_scene(camera: &CameraPose, lighting: &SceneLighting, ambient_level: f32) -> Self {
        let flashlight = &lighting.flashlight;
        let light_intensity = if flashlight.visible { flashlight.intensity } else { 0.0 };
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            camera_pos: camera.position.to_array(),
            ambient: if lighting.ambient_visible { ambient_level } else { 0.0 },
            light_dir: flashlight.direction(camera).to_array(),
            light_intensity,
            light_color: flashlight.color,
            light_range: flashlight.range.max(f32::EPSILON),
            cone_cos: flashlight.cone_cos(),
            penumbra_cos: flashlight.penumbra_cos(),
            decay: flashlight.decay,
            _pad: 0.0,
        }
    }
}

/// GPU buffers of one walkable mesh
pub struct MeshBuffer {
    pub label: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

/// Vertex layout of [`Vertex`]: position, normal, color.
const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 3] = [
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x3,
        offset: 0,
        shader_location: 0,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x3,
        offset: 12,
        shader_location: 1,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x4,
        offset: 24,
        shader_location: 2,
    },
];

/// Renders every collidable mesh of a [`WalkableGeometry`].
pub struct WalkMeshPass {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    meshes: Vec<MeshBuffer>,
    /// Background colour
    pub clear_color: wgpu::Color,
}

impl WalkMeshPass {
    pub fn new(ctx: &GpuContext) -> Self {
        let device = &ctx.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Walk Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(WALK_MESH_SHADER.into()),
        });

        let uniform_buffer = ctx.buffer_with(
            "Walk Uniform Buffer",
            &[WalkUniforms::default()],
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Walk Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Walk Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Walk Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Walk Mesh Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &VERTEX_ATTRIBUTES,
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.format(),
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Part floors may be double sided
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            bind_group,
            uniform_buffer,
            meshes: Vec::new(),
            clear_color: wgpu::Color {
                r: 0.02,
                g: 0.018,
                b: 0.015,
                a: 1.0,
            },
        }
    }

    /// Replace the uploaded meshes with the collidables of `geometry`.
    pub fn upload_geometry(&mut self, ctx: &GpuContext, geometry: &WalkableGeometry) {
        self.meshes = geometry
            .collidables()
            .filter(|mesh| !mesh.indices().is_empty())
            .map(|mesh| MeshBuffer {
                label: mesh.name.clone(),
                vertex_buffer: ctx.buffer_with(
                    &format!("{} Vertex Buffer", mesh.name),
                    mesh.vertices(),
                    wgpu::BufferUsages::VERTEX,
                ),
                index_buffer: ctx.buffer_with(
                    &format!("{} Index Buffer", mesh.name),
                    mesh.indices(),
                    wgpu::BufferUsages::INDEX,
                ),
                index_count: mesh.indices().len() as u32,
            })
            .collect();
        log::debug!("Uploaded {} walkable meshes to the GPU", self.meshes.len());
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Upload uniforms to GPU
    pub fn update_uniforms(&self, queue: &wgpu::Queue, uniforms: &WalkUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Draw one frame into the window surface.
    pub fn render(&self, ctx: &GpuContext) -> Result<(), wgpu::SurfaceError> {
        let output = ctx.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = ctx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Walk Frame Encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Walk Mesh Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.bind_group, &[]);
            for mesh in &self.meshes {
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}
