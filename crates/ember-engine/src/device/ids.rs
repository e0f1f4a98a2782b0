//! Opaque device resource identifiers.
//!
//! Identifiers are plain integers handed out by a backend; the renderer
//! strategies store and pass them back but never interpret them. Texture
//! handles in particular are *not* owned by the render core; asset loading
//! lives outside it, and the core never validates handle provenance.

/// GPU buffer handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct BufferId(pub u64);

/// Texture handle, created and owned outside the render core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct TextureId(pub u64);

/// Compiled shader handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ShaderId(pub u64);

/// Vertex layout handle (vertex buffers + attributes + index buffer).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct LayoutId(pub u64);
