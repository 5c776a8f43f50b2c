use std::collections::HashMap;

use wgpu::util::DeviceExt;

use super::common::{
    copy_alpha_blend, straight_alpha_blend, DrawInstance, QuadVertex, QUAD_INDICES, QUAD_VERTICES,
};

/// Draw flavours; each maps to one fragment entry point and blend setup.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub(crate) enum PipelineKind {
    /// Solid color. `copy_alpha` replaces target alpha instead of leaving it untouched.
    Fill { copy_alpha: bool },
    /// Sampled texture with global alpha.
    Image,
    /// Mask-weighted two-color interpolation.
    Blend,
    /// Texture copied without blending (backbuffer presentation).
    Copy,
}

impl PipelineKind {
    fn textured(self) -> bool {
        !matches!(self, PipelineKind::Fill { .. })
    }

    fn entry_point(self) -> &'static str {
        match self {
            PipelineKind::Fill { .. } => "fs_fill",
            PipelineKind::Image | PipelineKind::Copy => "fs_image",
            PipelineKind::Blend => "fs_blend",
        }
    }

    fn blend(self) -> Option<wgpu::BlendState> {
        match self {
            PipelineKind::Fill { copy_alpha: true } => Some(copy_alpha_blend()),
            PipelineKind::Fill { copy_alpha: false } | PipelineKind::Image | PipelineKind::Blend => {
                Some(straight_alpha_blend())
            }
            PipelineKind::Copy => None,
        }
    }

    fn write_mask(self) -> wgpu::ColorWrites {
        match self {
            PipelineKind::Fill { copy_alpha: false } => wgpu::ColorWrites::COLOR,
            _ => wgpu::ColorWrites::ALL,
        }
    }
}

/// Shader, layouts, sampler, unit-quad buffers, and a pipeline cache keyed by
/// target format and [`PipelineKind`].
///
/// Pipelines are built lazily; the engine warms the formats it renders into
/// at construction so shader problems surface during initialization.
pub(crate) struct Pipelines {
    shader: wgpu::ShaderModule,
    texture_bgl: wgpu::BindGroupLayout,
    solid_layout: wgpu::PipelineLayout,
    textured_layout: wgpu::PipelineLayout,
    sampler: wgpu::Sampler,

    quad_vbo: wgpu::Buffer,
    quad_ibo: wgpu::Buffer,

    cache: HashMap<(wgpu::TextureFormat, PipelineKind), wgpu::RenderPipeline>,
}

impl Pipelines {
    pub(crate) fn new(device: &wgpu::Device) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("easel quad shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/quad.wgsl").into()),
        });

        let texture_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("easel texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let solid_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("easel solid pipeline layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let textured_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("easel textured pipeline layout"),
            bind_group_layouts: &[&texture_bgl],
            immediate_size: 0,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("easel sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let quad_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("easel quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let quad_ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("easel quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            shader,
            texture_bgl,
            solid_layout,
            textured_layout,
            sampler,
            quad_vbo,
            quad_ibo,
            cache: HashMap::new(),
        }
    }

    /// Builds every pipeline kind for `format` up front.
    pub(crate) fn warm(&mut self, device: &wgpu::Device, format: wgpu::TextureFormat) {
        for kind in [
            PipelineKind::Fill { copy_alpha: true },
            PipelineKind::Fill { copy_alpha: false },
            PipelineKind::Image,
            PipelineKind::Blend,
        ] {
            self.ensure(device, format, kind);
        }
    }

    /// Creates a bind group sampling `view` with the shared sampler.
    pub(crate) fn texture_bind_group(
        &self,
        device: &wgpu::Device,
        view: &wgpu::TextureView,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("easel texture bind group"),
            layout: &self.texture_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }

    pub(crate) fn ensure(
        &mut self,
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        kind: PipelineKind,
    ) {
        if self.cache.contains_key(&(format, kind)) {
            return;
        }

        log::debug!("building {kind:?} pipeline for {format:?}");

        let layout = if kind.textured() {
            &self.textured_layout
        } else {
            &self.solid_layout
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("easel quad pipeline"),
            layout: Some(layout),

            vertex: wgpu::VertexState {
                module: &self.shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), DrawInstance::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &self.shader,
                entry_point: Some(kind.entry_point()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: kind.blend(),
                    write_mask: kind.write_mask(),
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Transforms may mirror the quad.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.cache.insert((format, kind), pipeline);
    }

    /// Records one instanced quad draw into `pass`.
    ///
    /// The pipeline for `(format, kind)` must have been built with
    /// [`ensure`](Self::ensure); `texture` is required for textured kinds.
    pub(crate) fn draw(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        format: wgpu::TextureFormat,
        kind: PipelineKind,
        instance: &wgpu::Buffer,
        texture: Option<&wgpu::BindGroup>,
    ) {
        let Some(pipeline) = self.cache.get(&(format, kind)) else {
            log::warn!("{kind:?} pipeline for {format:?} missing; draw skipped");
            return;
        };

        pass.set_pipeline(pipeline);
        if let Some(bind_group) = texture {
            pass.set_bind_group(0, bind_group, &[]);
        }
        pass.set_vertex_buffer(0, self.quad_vbo.slice(..));
        pass.set_vertex_buffer(1, instance.slice(..));
        pass.set_index_buffer(self.quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
    }
}
