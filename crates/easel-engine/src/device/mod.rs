//! GPU device acquisition.
//!
//! This module is responsible for:
//! - mapping a [`Backend`] id to wgpu backends and limits
//! - acquiring a surfaceless device for off-screen use ([`request_headless`])
//! - creating & configuring a window surface ([`Gpu`]) for hosts that present

mod backend;
mod frame;
mod gpu;
mod headless;
mod init;
mod surface;

pub use backend::Backend;
pub use surface::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use headless::{request_headless, HeadlessGpu};
pub use init::GpuInit;
