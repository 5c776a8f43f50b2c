//! Error type reported by engine operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::canvas::CanvasId;

/// Failures reported by [`Engine`](crate::engine::Engine) and
/// [`Canvas`](crate::canvas::Canvas) operations.
///
/// Geometry and transform operations never fail and do not use this type.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Adapter or device acquisition failed, or the device is unusable.
    #[error("GPU backend failure: {0}")]
    Backend(String),

    /// The device was lost; the engine cannot recover and must be rebuilt.
    #[error("GPU device lost: {0}")]
    DeviceLost(String),

    /// A texture or canvas size is zero or exceeds the device limit.
    #[error("invalid surface size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    /// Decoding or reading an image file failed.
    #[error("failed to load image {}", path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Pixel buffer length does not match `width * height * 4`.
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    PixelDataLength { expected: usize, actual: usize },

    /// The empty image sentinel was passed where a texture is required.
    #[error("image is empty")]
    EmptyImage,

    /// The image was released, or belonged to a canvas that was closed.
    #[error("image refers to a released texture")]
    StaleImage,

    /// The canvas was already finished or closed.
    #[error("canvas {0:?} is not active")]
    UnknownCanvas(CanvasId),

    /// A canvas was completed while another canvas created after it is still active.
    #[error("canvas {canvas:?} completed while {innermost:?} is still bound")]
    CanvasNotInnermost { canvas: CanvasId, innermost: CanvasId },

    /// Alignment constant outside the known range.
    #[error("invalid alignment constant {0}")]
    InvalidAlignment(i32),

    /// Backend name not recognized.
    #[error("unknown backend {0:?}")]
    UnknownBackend(String),

    /// Requested readback region is not fully inside the bound target.
    #[error("readback region is outside the bound target")]
    OutOfBounds,

    /// Mapping the readback buffer failed.
    #[error("pixel readback failed: {0}")]
    Readback(String),
}

impl From<anyhow::Error> for EngineError {
    fn from(err: anyhow::Error) -> Self {
        EngineError::Backend(format!("{err:#}"))
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
