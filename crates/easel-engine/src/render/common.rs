//! GPU-side types shared by every draw.

use bytemuck::{Pod, Zeroable};

use crate::coords::{Color, Transform};

// ── blend ─────────────────────────────────────────────────────────────────

const OVER: wgpu::BlendComponent = wgpu::BlendComponent {
    src_factor: wgpu::BlendFactor::SrcAlpha,
    dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
    operation: wgpu::BlendOperation::Add,
};

/// Straight-alpha "over" for color; target alpha replaced by the source alpha.
pub(super) fn copy_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: OVER,
        alpha: wgpu::BlendComponent::REPLACE,
    }
}

/// Straight-alpha "over" for color, accumulated coverage for alpha.
pub(super) fn straight_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: OVER,
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── quad vertex ───────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct QuadVertex {
    pub pos: [f32; 2], // 0..1
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub(super) const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [0.0, 0.0] },
    QuadVertex { pos: [1.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [0.0, 1.0] },
];

pub(super) const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

// ── per-draw instance ─────────────────────────────────────────────────────

/// Instance data layout (96 bytes):
///
///  offset  0  dst      [[f32; 2]; 3]  loc 1..=3  (clip space)
///  offset 24  src      [[f32; 2]; 3]  loc 4..=6  (normalized uv)
///  offset 48  color0   [f32; 4]       loc 7
///  offset 64  color1   [f32; 4]       loc 8
///  offset 80  params   [f32; 4]       loc 9      (alpha, opaque, -, -)
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct DrawInstance {
    dst: [[f32; 2]; 3],
    src: [[f32; 2]; 3],
    color0: [f32; 4],
    color1: [f32; 4],
    params: [f32; 4],
}

impl DrawInstance {
    const ATTRS: [wgpu::VertexAttribute; 9] = wgpu::vertex_attr_array![
        1 => Float32x2, // dst c0
        2 => Float32x2, // dst c1
        3 => Float32x2, // dst c2
        4 => Float32x2, // src c0
        5 => Float32x2, // src c1
        6 => Float32x2, // src c2
        7 => Float32x4, // color0
        8 => Float32x4, // color1
        9 => Float32x4  // params
    ];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<DrawInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }

    /// Solid quad.
    pub(crate) fn fill(clip: Transform, color: Color) -> Self {
        let c = color.to_f32();
        Self {
            dst: clip.m,
            src: Transform::identity().m,
            color0: c,
            color1: c,
            params: [1.0, 0.0, 0.0, 0.0],
        }
    }

    /// Textured quad; `alpha` multiplies the sampled alpha.
    pub(crate) fn image(clip: Transform, uv: Transform, alpha: u8, opaque: bool) -> Self {
        Self {
            dst: clip.m,
            src: uv.m,
            color0: [1.0; 4],
            color1: [1.0; 4],
            params: [alpha as f32 / 255.0, if opaque { 1.0 } else { 0.0 }, 0.0, 0.0],
        }
    }

    /// Mask-weighted interpolation between `color1` and `color2`.
    pub(crate) fn blend(clip: Transform, uv: Transform, color1: Color, color2: Color) -> Self {
        Self {
            dst: clip.m,
            src: uv.m,
            color0: color1.to_f32(),
            color1: color2.to_f32(),
            params: [1.0, 0.0, 0.0, 0.0],
        }
    }
}
