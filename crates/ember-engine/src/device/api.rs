use anyhow::Result;

use crate::coords::Mat3;

use super::ids::{BufferId, LayoutId, ShaderId, TextureId};

// ── buffers ───────────────────────────────────────────────────────────────

/// What a buffer stores; backends map this to usage flags.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferKind {
    Vertex,
    Index,
}

/// Initial contents for [`Device::create_buffer`].
#[derive(Debug, Copy, Clone)]
pub enum BufferInit<'a> {
    /// Allocate `n` zeroed bytes, filled later via `update_buffer`.
    Sized(u64),
    /// Allocate exactly `data.len()` bytes with the given contents.
    Data(&'a [u8]),
}

// ── vertex layouts ────────────────────────────────────────────────────────

/// Vertex attribute formats understood by every backend.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AttrFormat {
    F32x2,
    F32x3,
    F32x4,
    /// 4 bytes, normalized to [0, 1] floats in the vertex stage.
    Unorm8x4,
    U32,
}

impl AttrFormat {
    #[inline]
    pub const fn byte_size(self) -> u64 {
        match self {
            AttrFormat::F32x2 => 8,
            AttrFormat::F32x3 => 12,
            AttrFormat::F32x4 => 16,
            AttrFormat::Unorm8x4 => 4,
            AttrFormat::U32 => 4,
        }
    }
}

/// Per-buffer stepping: advance once per vertex or once per instance.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum VertexStep {
    Vertex,
    Instance,
}

/// One vertex buffer inside a layout.
///
/// Attributes are tightly packed in declaration order; shader locations are
/// assigned sequentially across all buffers of the layout, first buffer
/// first. Shaders must declare their inputs in the same order.
#[derive(Debug, Copy, Clone)]
pub struct VertexBufferDesc<'a> {
    pub buffer: BufferId,
    pub step: VertexStep,
    pub attributes: &'a [AttrFormat],
}

/// Index element width.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum IndexFormat {
    U16,
    U32,
}

/// Complete vertex-fetch description: buffers, attributes, index buffer.
#[derive(Debug, Copy, Clone)]
pub struct LayoutDesc<'a> {
    pub label: &'a str,
    pub vertex_buffers: &'a [VertexBufferDesc<'a>],
    pub index_buffer: BufferId,
    pub index_format: IndexFormat,
}

// ── shaders & uniforms ────────────────────────────────────────────────────

/// Data type of one named uniform.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UniformType {
    Mat3,
    Vec4,
}

/// One named uniform slot in a shader's interface, declared at creation.
#[derive(Debug, Copy, Clone)]
pub struct UniformDesc {
    pub name: &'static str,
    pub ty: UniformType,
}

/// Shader creation parameters. `source` is WGSL.
#[derive(Debug, Copy, Clone)]
pub struct ShaderDesc<'a> {
    pub label: &'a str,
    pub source: &'a str,
    pub uniforms: &'a [UniformDesc],
}

/// A uniform value set before a draw.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    Mat3(Mat3),
    Vec4([f32; 4]),
}

// ── draws ─────────────────────────────────────────────────────────────────

/// Primitive count and replication mode of one draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DrawKind {
    Indexed { index_count: u32 },
    Instanced { index_count: u32, instance_count: u32 },
}

/// One draw submission: exactly one device draw call.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawCall {
    pub shader: ShaderId,
    pub layout: LayoutId,
    pub kind: DrawKind,
}

// ── the capability ────────────────────────────────────────────────────────

/// Narrow graphics-device capability consumed by the renderer strategies.
///
/// Resource creation is fallible and must be handled at renderer
/// construction; everything on the per-frame path (`update_buffer`,
/// `set_uniform`, `bind_texture`, `draw`) is infallible by contract: a
/// device error there leaves the process in an unrecoverable state and is a
/// backend concern, not a caller concern. Passing a handle the device never
/// created is a programmer error: backends assert in debug builds and
/// ignore the call in release builds, but never crash the batching logic.
pub trait Device {
    fn create_buffer(&mut self, kind: BufferKind, init: BufferInit<'_>) -> Result<BufferId>;

    /// Partial update; `bytes` replaces the range starting at `byte_offset`.
    fn update_buffer(&mut self, buffer: BufferId, byte_offset: u64, bytes: &[u8]);

    fn destroy_buffer(&mut self, buffer: BufferId);

    /// Compiles a shader. Compile failure is fatal for the renderer being
    /// constructed and must be propagated, never papered over.
    fn create_shader(&mut self, desc: &ShaderDesc<'_>) -> Result<ShaderId>;

    fn destroy_shader(&mut self, shader: ShaderId);

    fn create_layout(&mut self, desc: &LayoutDesc<'_>) -> Result<LayoutId>;

    fn destroy_layout(&mut self, layout: LayoutId);

    /// Sets a named uniform declared in the shader's [`ShaderDesc`].
    fn set_uniform(&mut self, shader: ShaderId, name: &str, value: UniformValue);

    /// Binds `texture` to the given texture unit for subsequent draws.
    /// Units map 1:1 to the slot indices assigned by the render core.
    fn bind_texture(&mut self, unit: u32, texture: TextureId);

    /// Issues exactly one draw call.
    fn draw(&mut self, call: &DrawCall);

    /// Maximum number of simultaneously bound textures.
    fn max_texture_units(&self) -> u32;
}
