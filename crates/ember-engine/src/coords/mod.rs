//! Coordinate and geometry types shared across the renderer strategies.
//!
//! Canonical CPU space:
//! - World units, unbounded; the view-projection matrix supplied at
//!   `begin_scene` maps world space to NDC.
//! - Quads are canonical unit squares centered at the origin,
//!   (-0.5, -0.5)..(0.5, 0.5), before their model transform.
//! - Texture space is [0, 1] with a bottom-left origin.

mod mat3;
mod uv_rect;
mod vec2;

pub use mat3::Mat3;
pub use uv_rect::UvRect;
pub use vec2::Vec2;
