use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// Graphics API binding requested at engine initialization.
///
/// The four GL variants all run on the wgpu GL backend and differ in the
/// limits requested from the adapter.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum Backend {
    /// Desktop OpenGL 3.2 core.
    Ogl32,
    /// Desktop OpenGL 4.3 core.
    Ogl43,
    /// OpenGL ES 2.0 / WebGL-class devices.
    Ogles20,
    /// OpenGL ES 3.1.
    Ogles31,
    /// Let wgpu choose the platform's preferred backend.
    #[default]
    Auto,
}

impl Backend {
    /// wgpu backends to enumerate adapters from.
    pub fn wgpu_backends(self) -> wgpu::Backends {
        match self {
            Backend::Auto => wgpu::Backends::all(),
            _ => wgpu::Backends::GL,
        }
    }

    /// Limits requested from the device.
    pub fn required_limits(self) -> wgpu::Limits {
        match self {
            Backend::Ogles20 => wgpu::Limits::downlevel_webgl2_defaults(),
            Backend::Ogl32 | Backend::Ogles31 => wgpu::Limits::downlevel_defaults(),
            Backend::Ogl43 | Backend::Auto => wgpu::Limits::default(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Ogl32 => "ogl32",
            Backend::Ogl43 => "ogl43",
            Backend::Ogles20 => "ogles20",
            Backend::Ogles31 => "ogles31",
            Backend::Auto => "auto",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ogl32" | "ogl_32" => Ok(Backend::Ogl32),
            "ogl43" | "ogl_43" => Ok(Backend::Ogl43),
            "ogles20" | "ogles_20" => Ok(Backend::Ogles20),
            "ogles31" | "ogles_31" => Ok(Backend::Ogles31),
            "auto" | "" => Ok(Backend::Auto),
            _ => Err(EngineError::UnknownBackend(s.to_string())),
        }
    }
}
