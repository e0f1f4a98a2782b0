//! 2D quad rendering strategies.
//!
//! Data flows one direction per quad: request → texture-slot lookup →
//! geometry accumulation → (capacity/slot overflow check) → flush → device
//! draw. Overflow is normal control flow handled by an internal flush; the
//! caller never sees it.
//!
//! Three strategies implement the same [`Renderer2D`] contract and produce
//! identical world-space geometry and slot assignments:
//!
//! - [`ImmediateRenderer2D`] issues one draw call per quad with per-draw
//!   uniforms. Simplest, and the draw-call count scales with quad count.
//! - [`BatchedRenderer2D`] expands quads to 4 world-space vertices on the
//!   CPU. Cheapest possible vertex stage, 4x the per-quad data volume.
//! - [`InstancedRenderer2D`] emits one compact record per quad and lets the
//!   vertex stage apply the transform. Least bandwidth; needs per-instance
//!   attribute stepping support.

mod common;
mod slots;

pub mod batched;
pub mod immediate;
pub mod instanced;

pub use batched::BatchedRenderer2D;
pub use common::{QuadInstance, QuadVertex, UnitVertex};
pub use immediate::ImmediateRenderer2D;
pub use instanced::InstancedRenderer2D;

use anyhow::Result;

use crate::coords::{Mat3, UvRect};
use crate::device::{Device, TextureId};
use crate::paint::Color;

/// One textured-quad draw request: the unit of work passed into the core.
///
/// Short-lived: borrowed for the duration of one `draw_quad` call; the
/// texture handle is not owned or validated by the render core.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct QuadRequest {
    /// Model transform applied to the canonical unit quad.
    pub transform: Mat3,
    pub texture: TextureId,
    /// Sub-rectangle of the texture to map across the quad.
    pub uv: UvRect,
    pub tint: Color,
}

impl QuadRequest {
    /// A full-texture, untinted quad with the given transform.
    pub fn new(transform: Mat3, texture: TextureId) -> Self {
        Self {
            transform,
            texture,
            uv: UvRect::FULL,
            tint: Color::WHITE,
        }
    }
}

/// Per-scene submission statistics, reset at `begin_scene`.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct RenderStats {
    /// Device draw calls issued since the scene began.
    pub draw_calls: u32,
    /// Quads accepted since the scene began.
    pub quads: u32,
}

/// Which submission strategy a renderer uses.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Strategy {
    Immediate,
    Batched,
    Instanced,
}

/// Contract shared by the three quad submission strategies.
///
/// Lifecycle: construction acquires all device resources (fallible);
/// `begin_scene`/`end_scene` bracket one scene and must not nest;
/// `draw_quad` is valid only inside a scene. Violating the bracket is a
/// programmer error; strategies assert in debug builds and keep their
/// internal state consistent in release builds. `shutdown` releases exactly
/// the resources construction acquired; the renderer must not be used
/// afterwards.
///
/// The device handle is threaded through every call instead of being
/// captured, so a renderer never outlives or aliases its device.
pub trait Renderer2D {
    /// Opens a scene. Valid only when no scene is open.
    fn begin_scene(&mut self, device: &mut dyn Device, view_projection: Mat3);

    /// Submits one quad. Valid only inside an open scene. May flush
    /// internally when the batch or the texture table is full.
    fn draw_quad(&mut self, device: &mut dyn Device, quad: &QuadRequest);

    /// Flushes any accumulated work and closes the scene. Always safe with
    /// an empty batch.
    fn end_scene(&mut self, device: &mut dyn Device);

    /// Releases every device resource acquired at construction.
    fn shutdown(&mut self, device: &mut dyn Device);

    /// Statistics for the current (or just-ended) scene.
    fn stats(&self) -> RenderStats;

    fn strategy(&self) -> Strategy;
}

/// Constructs the given strategy behind the shared contract.
pub fn create_renderer(
    strategy: Strategy,
    device: &mut dyn Device,
) -> Result<Box<dyn Renderer2D>> {
    Ok(match strategy {
        Strategy::Immediate => Box::new(ImmediateRenderer2D::new(device)?),
        Strategy::Batched => Box::new(BatchedRenderer2D::new(device)?),
        Strategy::Instanced => Box::new(InstancedRenderer2D::new(device)?),
    })
}
