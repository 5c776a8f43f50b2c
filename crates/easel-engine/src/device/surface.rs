//! Surface format selection and error recovery for window presentation.
//!
//! The engine always renders into `Rgba8Unorm`; the surface only receives the
//! final backbuffer copy, so any 8-bit format works and non-sRGB ones keep
//! the bytes unchanged.

use winit::dpi::PhysicalSize;

/// What the host should do after `get_current_texture` fails.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; present again next frame.
    Reconfigured,
    /// Transient failure; drop this frame's presentation.
    SkipFrame,
    /// Unrecoverable (out of memory); shut down.
    Fatal,
}

impl SurfaceErrorAction {
    /// Whether the surface must be reconfigured before the next frame.
    pub(crate) fn classify(err: &wgpu::SurfaceError) -> Self {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Self::Reconfigured,
            wgpu::SurfaceError::OutOfMemory => Self::Fatal,
            wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => Self::SkipFrame,
        }
    }
}

pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let wanted: &[wgpu::TextureFormat] = if prefer_srgb {
        &[
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ]
    } else {
        &[wgpu::TextureFormat::Bgra8Unorm, wgpu::TextureFormat::Rgba8Unorm]
    };

    wanted
        .iter()
        .copied()
        .find(|f| caps.formats.contains(f))
        .or_else(|| caps.formats.first().copied())
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Records `new_size` and reconfigures when it is drawable.
pub(crate) fn apply_resize(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &mut wgpu::SurfaceConfiguration,
    size: &mut PhysicalSize<u32>,
    new_size: PhysicalSize<u32>,
) {
    *size = new_size;
    if new_size.width == 0 || new_size.height == 0 {
        log::debug!("surface minimized; configuration deferred");
        return;
    }

    config.width = new_size.width;
    config.height = new_size.height;
    surface.configure(device, config);
}

pub(crate) fn recover(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    err: wgpu::SurfaceError,
) -> SurfaceErrorAction {
    let action = SurfaceErrorAction::classify(&err);
    log::debug!("surface error {err:?}: {action:?}");
    if action == SurfaceErrorAction::Reconfigured && size.width > 0 && size.height > 0 {
        surface.configure(device, config);
    }
    action
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(formats: Vec<wgpu::TextureFormat>) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats,
            alpha_modes: vec![wgpu::CompositeAlphaMode::Opaque],
            ..Default::default()
        }
    }

    #[test]
    fn linear_format_preferred_by_default() {
        let c = caps(vec![
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Bgra8Unorm,
        ]);
        assert_eq!(choose_surface_format(&c, false), Some(wgpu::TextureFormat::Bgra8Unorm));
        assert_eq!(
            choose_surface_format(&c, true),
            Some(wgpu::TextureFormat::Bgra8UnormSrgb)
        );
    }

    #[test]
    fn falls_back_to_first_format() {
        let c = caps(vec![wgpu::TextureFormat::Rgb10a2Unorm]);
        assert_eq!(
            choose_surface_format(&c, false),
            Some(wgpu::TextureFormat::Rgb10a2Unorm)
        );
        assert_eq!(choose_surface_format(&caps(vec![]), false), None);
    }

    #[test]
    fn unsupported_alpha_mode_replaced() {
        let c = caps(vec![]);
        assert_eq!(
            choose_alpha_mode(&c, Some(wgpu::CompositeAlphaMode::PreMultiplied)),
            wgpu::CompositeAlphaMode::Opaque
        );
    }

    #[test]
    fn surface_errors_classified() {
        assert_eq!(
            SurfaceErrorAction::classify(&wgpu::SurfaceError::Outdated),
            SurfaceErrorAction::Reconfigured
        );
        assert_eq!(
            SurfaceErrorAction::classify(&wgpu::SurfaceError::Timeout),
            SurfaceErrorAction::SkipFrame
        );
        assert_eq!(
            SurfaceErrorAction::classify(&wgpu::SurfaceError::OutOfMemory),
            SurfaceErrorAction::Fatal
        );
    }
}
