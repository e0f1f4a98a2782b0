//! Shared geometry constants and GPU-visible records for the quad strategies.

use bytemuck::{Pod, Zeroable};

use crate::coords::Vec2;

/// Ceiling on texture slots per batch regardless of what the device reports.
pub(super) const MAX_TEXTURE_SLOTS: u32 = 32;

/// Canonical unit-quad corners in fan order: bottom-left, bottom-right,
/// top-right, top-left. Every quad is this square times its model transform.
pub(super) const UNIT_QUAD_CORNERS: [Vec2; 4] = [
    Vec2::new(-0.5, -0.5),
    Vec2::new(0.5, -0.5),
    Vec2::new(0.5, 0.5),
    Vec2::new(-0.5, 0.5),
];

/// One shared index fan per quad.
pub(super) const UNIT_QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

// ── static unit-quad vertex (immediate + instanced) ───────────────────────

/// Corner record of the static unit-quad buffer, uploaded once at init.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct UnitVertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
}

pub(super) const UNIT_QUAD_VERTICES: [UnitVertex; 4] = [
    UnitVertex { pos: [-0.5, -0.5], uv: [0.0, 0.0] },
    UnitVertex { pos: [0.5, -0.5], uv: [1.0, 0.0] },
    UnitVertex { pos: [0.5, 0.5], uv: [1.0, 1.0] },
    UnitVertex { pos: [-0.5, 0.5], uv: [0.0, 1.0] },
];

// ── batched vertex record ─────────────────────────────────────────────────

/// One CPU-expanded vertex of the batched strategy.
///
/// Positions are world-space (the transform is baked on the CPU), the tint
/// is packed unorm, and `slot` indexes the batch's texture table. 24 bytes,
/// no padding.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
    pub tint: [u8; 4],
    pub slot: u32,
}

// ── instanced record ──────────────────────────────────────────────────────

/// One per-quad record of the instanced strategy.
///
/// Carries the two live rows of the affine transform (the third row is
/// constant) plus the UV map as scale/offset; the vertex stage replicates
/// the shared unit quad and evaluates both. 48 bytes, no padding.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct QuadInstance {
    pub row0: [f32; 3],
    pub row1: [f32; 3],
    pub uv_scale: [f32; 2],
    pub uv_offset: [f32; 2],
    pub tint: [u8; 4],
    pub slot: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_tightly_packed() {
        // The vertex layouts assume no implicit padding anywhere.
        assert_eq!(core::mem::size_of::<UnitVertex>(), 16);
        assert_eq!(core::mem::size_of::<QuadVertex>(), 24);
        assert_eq!(core::mem::size_of::<QuadInstance>(), 48);
    }

    #[test]
    fn index_fan_references_all_four_corners() {
        let mut seen = [false; 4];
        for i in UNIT_QUAD_INDICES {
            seen[i as usize] = true;
        }
        assert_eq!(seen, [true; 4]);
    }
}
