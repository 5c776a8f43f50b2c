//! GPU pipelines behind the engine's draw calls.
//!
//! Every draw is one instanced unit quad. The engine composes the draw
//! transform with the bound target's projection on the CPU, so the shader
//! only evaluates two affine maps per vertex.

mod common;
mod pipelines;

pub(crate) use common::DrawInstance;
pub(crate) use pipelines::{PipelineKind, Pipelines};

/// Texture format of every engine-owned render target and image.
pub const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
