//! Tint model shared by the quad strategies.
//!
//! Scope:
//! - straight-alpha color representation
//! - packing to the 4-byte unorm form carried in vertex/instance records
//!
//! Geometry types remain in `coords`.

mod color;

pub use color::Color;
