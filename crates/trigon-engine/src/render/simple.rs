use bytemuck::{Pod, Zeroable};

use crate::render::{RenderCtx, Vertex};
use crate::scene::GameObject;

/// Draws game objects one by one with a shared flat-color pipeline.
///
/// Per-object data lives in a single uniform buffer addressed with dynamic
/// offsets. The buffer is rewritten on every call, so call this at most once per
/// frame.
pub struct SimpleRenderSystem {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,

    object_ubo: Option<wgpu::Buffer>,
    bind_group: Option<wgpu::BindGroup>,
    capacity: usize,
    stride: u64,

    staging: Vec<u8>,
}

impl SimpleRenderSystem {
    /// Builds the pipeline against the chain's render-pass layout.
    pub fn new(ctx: &RenderCtx<'_>) -> Self {
        let format = ctx.format();

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("trigon simple shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/simple.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("trigon simple bgl"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: true,
                            min_binding_size: wgpu::BufferSize::new(ObjectUniform::SIZE),
                        },
                        count: None,
                    }],
                });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("trigon simple pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("trigon simple pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[Vertex::layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: format.color,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                // Everything sits at z = 0; LessEqual lets later objects draw over earlier ones.
                depth_stencil: format.depth.map(|depth| wgpu::DepthStencilState {
                    format: depth,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::LessEqual,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });

        let alignment = ctx.device.limits().min_uniform_buffer_offset_alignment as u64;

        Self {
            pipeline,
            bind_group_layout,
            object_ubo: None,
            bind_group: None,
            capacity: 0,
            stride: uniform_stride(alignment),
            staging: Vec::new(),
        }
    }

    /// Records one bind + draw per object, in slice order.
    ///
    /// Objects without a model are skipped.
    pub fn render_game_objects(
        &mut self,
        ctx: &RenderCtx<'_>,
        pass: &mut wgpu::RenderPass<'_>,
        objects: &[GameObject],
    ) {
        if objects.is_empty() {
            return;
        }

        self.ensure_capacity(ctx, objects.len());
        self.write_uniforms(ctx, objects);

        let Some(bind_group) = self.bind_group.as_ref() else {
            return;
        };

        pass.set_pipeline(&self.pipeline);
        for (i, obj) in objects.iter().enumerate() {
            let Some(model) = obj.model.as_ref() else {
                continue;
            };

            let offset = (i as u64 * self.stride) as u32;
            pass.set_bind_group(0, bind_group, &[offset]);
            model.bind(pass);
            model.draw(pass);
        }
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.capacity && self.object_ubo.is_some() {
            return;
        }

        let new_cap = required.next_power_of_two().max(16);
        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("trigon simple object ubo"),
            size: new_cap as u64 * self.stride,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("trigon simple bind group"),
            layout: &self.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &ubo,
                    offset: 0,
                    size: wgpu::BufferSize::new(ObjectUniform::SIZE),
                }),
            }],
        });

        log::debug!("object uniform buffer grown to {new_cap} entries");

        self.object_ubo = Some(ubo);
        self.bind_group = Some(bind_group);
        self.capacity = new_cap;
    }

    fn write_uniforms(&mut self, ctx: &RenderCtx<'_>, objects: &[GameObject]) {
        let Some(ubo) = self.object_ubo.as_ref() else {
            return;
        };

        let stride = self.stride as usize;
        self.staging.clear();
        self.staging.resize(objects.len() * stride, 0);

        for (i, obj) in objects.iter().enumerate() {
            let uniform = ObjectUniform::from_object(obj);
            let start = i * stride;
            self.staging[start..start + ObjectUniform::SIZE as usize]
                .copy_from_slice(bytemuck::bytes_of(&uniform));
        }

        ctx.queue.write_buffer(ubo, 0, &self.staging);
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Per-object uniform layout (48 bytes, WGSL uniform rules):
///
///  offset  0  transform [[f32; 2]; 2]   mat2x2, column-major
///  offset 16  offset    [f32; 2]
///  offset 24  _pad      [f32; 2]        vec3 aligns to 16
///  offset 32  color     [f32; 3]
///  offset 44  alpha     f32
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct ObjectUniform {
    transform: [[f32; 2]; 2],
    offset: [f32; 2],
    _pad: [f32; 2],
    color: [f32; 3],
    alpha: f32,
}

impl ObjectUniform {
    const SIZE: u64 = std::mem::size_of::<ObjectUniform>() as u64;

    fn from_object(obj: &GameObject) -> Self {
        Self {
            transform: obj.transform.mat2(),
            offset: obj.transform.translation,
            _pad: [0.0; 2],
            color: obj.color,
            alpha: obj.alpha,
        }
    }
}

/// Distance between consecutive uniforms; dynamic offsets must be multiples of
/// the device's alignment.
fn uniform_stride(alignment: u64) -> u64 {
    let alignment = alignment.max(1);
    ObjectUniform::SIZE.div_ceil(alignment) * alignment
}
