//! Graphics-device capability layer.
//!
//! The renderer strategies never talk to a graphics API directly; they
//! consume the narrow [`Device`] trait and thread an explicit device handle
//! through every call, so correctness never depends on ambient bind state.
//!
//! Two backends ship:
//! - [`TraceDevice`]: headless; records every call for tests and diagnostics
//! - [`GpuDevice`]: wgpu backend rendering into caller-provided views

mod api;
mod gpu;
mod ids;
mod trace;

pub use api::{
    AttrFormat, BufferInit, BufferKind, Device, DrawCall, DrawKind, IndexFormat, LayoutDesc,
    ShaderDesc, UniformDesc, UniformType, UniformValue, VertexBufferDesc, VertexStep,
};
pub use gpu::{GpuDevice, GpuInit};
pub use ids::{BufferId, LayoutId, ShaderId, TextureId};
pub use trace::{TraceCall, TraceDevice};
