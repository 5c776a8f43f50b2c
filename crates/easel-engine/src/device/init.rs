use super::Backend;

/// Initialization parameters for a window-bound [`Gpu`](super::Gpu).
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Backend id; see [`Backend`].
    pub backend: Backend,

    /// Enables wgpu validation and debug labels on the instance.
    pub debug: bool,

    /// Prefer an sRGB surface format when available.
    ///
    /// The engine renders straight 8-bit values into `Rgba8Unorm` targets, so
    /// a non-sRGB surface reproduces colors byte for byte. Enable this only
    /// when the host wants gamma encoding on present.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior).
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Desired maximum frame latency for the surface.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backend: Backend::Auto,
            debug: false,
            prefer_srgb: false,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            desired_maximum_frame_latency: 2,
        }
    }
}

/// Instance flags for the requested debug level.
pub(crate) fn instance_flags(debug: bool) -> wgpu::InstanceFlags {
    if debug {
        wgpu::InstanceFlags::debugging()
    } else {
        wgpu::InstanceFlags::empty()
    }
}
