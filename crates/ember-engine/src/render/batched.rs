//! Vertex-batched strategy: CPU-expanded quads, one draw call per batch.
//!
//! Each quad becomes four vertices with world-space positions baked on the
//! CPU, so the vertex stage does no matrix math per vertex. The cost is 4×
//! the per-quad data volume and the CPU transform work.

use anyhow::{Context, Result};

use crate::coords::Mat3;
use crate::device::{
    AttrFormat, BufferId, BufferInit, BufferKind, Device, DrawCall, DrawKind, IndexFormat,
    LayoutDesc, LayoutId, ShaderDesc, ShaderId, TextureId, UniformDesc, UniformType,
    UniformValue, VertexBufferDesc, VertexStep,
};

use super::common::{MAX_TEXTURE_SLOTS, QuadVertex, UNIT_QUAD_CORNERS};
use super::slots::TextureSlots;
use super::{QuadRequest, RenderStats, Renderer2D, Strategy};

const SHADER_SOURCE: &str = include_str!("shaders/batch.wgsl");

/// Default batch capacity in quads.
pub const DEFAULT_MAX_QUADS: usize = 10_000;

pub struct BatchedRenderer2D {
    vertex_buffer: BufferId,
    index_buffer: BufferId,
    shader: ShaderId,
    layout: LayoutId,

    vertices: Vec<QuadVertex>,
    index_count: u32,
    slots: TextureSlots,
    max_vertices: usize,

    view_projection: Mat3,
    stats: RenderStats,
    in_scene: bool,
}

impl BatchedRenderer2D {
    pub fn new(device: &mut dyn Device) -> Result<Self> {
        Self::with_capacity(device, DEFAULT_MAX_QUADS)
    }

    /// Like [`new`](Self::new) with an explicit batch capacity in quads.
    /// Tests use small capacities to exercise the flush boundary.
    pub fn with_capacity(device: &mut dyn Device, max_quads: usize) -> Result<Self> {
        anyhow::ensure!(max_quads > 0, "batch capacity must be at least one quad");

        let max_vertices = max_quads * 4;
        let max_indices = max_quads * 6;

        let shader = device
            .create_shader(&ShaderDesc {
                label: "batched quad shader",
                source: SHADER_SOURCE,
                uniforms: &[UniformDesc { name: "ndc_matrix", ty: UniformType::Mat3 }],
            })
            .context("batched: shader creation failed")?;

        let vertex_buffer = match device.create_buffer(
            BufferKind::Vertex,
            BufferInit::Sized((max_vertices * size_of::<QuadVertex>()) as u64),
        ) {
            Ok(b) => b,
            Err(e) => {
                device.destroy_shader(shader);
                return Err(e).context("batched: vertex buffer");
            }
        };

        // The index pattern repeats per quad and never changes, so the whole
        // buffer is generated and uploaded once.
        let mut indices = Vec::with_capacity(max_indices);
        for quad in 0..max_quads as u32 {
            let base = quad * 4;
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        let index_buffer = match device.create_buffer(
            BufferKind::Index,
            BufferInit::Data(bytemuck::cast_slice(&indices)),
        ) {
            Ok(b) => b,
            Err(e) => {
                device.destroy_buffer(vertex_buffer);
                device.destroy_shader(shader);
                return Err(e).context("batched: index buffer");
            }
        };

        let layout = match device.create_layout(&LayoutDesc {
            label: "batched quad layout",
            vertex_buffers: &[VertexBufferDesc {
                buffer: vertex_buffer,
                step: VertexStep::Vertex,
                attributes: &[
                    AttrFormat::F32x2,
                    AttrFormat::F32x2,
                    AttrFormat::Unorm8x4,
                    AttrFormat::U32,
                ],
            }],
            index_buffer,
            // 4 vertices per quad exceeds u16 range well below the default
            // capacity, so indices are 32-bit.
            index_format: IndexFormat::U32,
        }) {
            Ok(l) => l,
            Err(e) => {
                device.destroy_buffer(index_buffer);
                device.destroy_buffer(vertex_buffer);
                device.destroy_shader(shader);
                return Err(e).context("batched: vertex layout");
            }
        };

        let slot_capacity = device.max_texture_units().min(MAX_TEXTURE_SLOTS) as usize;
        log::debug!("BatchedRenderer2D initialized: {max_quads} quads, {slot_capacity} slots");

        Ok(Self {
            vertex_buffer,
            index_buffer,
            shader,
            layout,
            vertices: Vec::with_capacity(max_vertices),
            index_count: 0,
            slots: TextureSlots::with_capacity(slot_capacity),
            max_vertices,
            view_projection: Mat3::IDENTITY,
            stats: RenderStats::default(),
            in_scene: false,
        })
    }

    fn start_batch(&mut self) {
        self.vertices.clear();
        self.index_count = 0;
        self.slots.clear();
    }

    /// Uploads the live vertex range, binds the batch's textures in slot
    /// order and issues one draw. Safe to call with an empty batch.
    fn flush(&mut self, device: &mut dyn Device) {
        if self.vertices.is_empty() {
            return;
        }

        device.update_buffer(self.vertex_buffer, 0, bytemuck::cast_slice(&self.vertices));

        for (unit, texture) in self.slots.iter().enumerate() {
            device.bind_texture(unit as u32, texture);
        }

        device.set_uniform(self.shader, "ndc_matrix", UniformValue::Mat3(self.view_projection));

        device.draw(&DrawCall {
            shader: self.shader,
            layout: self.layout,
            kind: DrawKind::Indexed { index_count: self.index_count },
        });

        self.stats.draw_calls += 1;
        self.start_batch();
    }

    /// Resolves the slot for `texture`, flushing first when the table is
    /// full so the handle lands in a fresh, empty table.
    fn slot_for(&mut self, device: &mut dyn Device, texture: TextureId) -> u32 {
        if let Some(slot) = self.slots.find(texture) {
            return slot;
        }
        if self.slots.is_full() {
            self.flush(device);
        }
        self.slots
            .insert(texture)
            .expect("slot table has room after flush")
    }
}

impl Renderer2D for BatchedRenderer2D {
    fn begin_scene(&mut self, device: &mut dyn Device, view_projection: Mat3) {
        debug_assert!(!self.in_scene, "begin_scene while a scene is open");
        let _ = device; // nothing to submit until the first flush
        self.view_projection = view_projection;
        self.stats = RenderStats::default();
        self.start_batch();
        self.in_scene = true;
    }

    fn draw_quad(&mut self, device: &mut dyn Device, quad: &QuadRequest) {
        debug_assert!(self.in_scene, "draw_quad outside begin_scene/end_scene");

        // Capacity check comes before slot assignment: a capacity flush also
        // clears the slot table, and the slot must be resolved against the
        // table this quad's vertices will be drawn with.
        if self.vertices.len() + 4 > self.max_vertices {
            self.flush(device);
        }

        let slot = self.slot_for(device, quad.texture);
        let tint = quad.tint.to_rgba8();

        for (corner, uv) in UNIT_QUAD_CORNERS.iter().zip(quad.uv.corners()) {
            let world = quad.transform.apply(*corner);
            self.vertices.push(QuadVertex {
                pos: [world.x, world.y],
                uv: [uv.x, uv.y],
                tint,
                slot,
            });
        }

        self.index_count += 6;
        self.stats.quads += 1;
    }

    fn end_scene(&mut self, device: &mut dyn Device) {
        debug_assert!(self.in_scene, "end_scene without begin_scene");
        self.flush(device);
        self.in_scene = false;
    }

    fn shutdown(&mut self, device: &mut dyn Device) {
        debug_assert!(!self.in_scene, "shutdown inside an open scene");
        device.destroy_layout(self.layout);
        device.destroy_buffer(self.index_buffer);
        device.destroy_buffer(self.vertex_buffer);
        device.destroy_shader(self.shader);
    }

    fn stats(&self) -> RenderStats {
        self.stats
    }

    fn strategy(&self) -> Strategy {
        Strategy::Batched
    }
}
