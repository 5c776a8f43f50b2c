/// A surface texture acquired for presentation.
///
/// Short-lived: the engine copies its window backbuffer into `view`, then the
/// frame is handed back to [`Gpu::present`](super::Gpu::present). Holding it
/// blocks acquisition of the next frame.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
}
