//! Instanced strategy: one compact record per quad, one draw call per batch.
//!
//! The device replicates a shared unit quad per instance and applies the
//! transform in the vertex stage. Minimal CPU work and bandwidth; requires
//! per-instance attribute stepping support.

use anyhow::{Context, Result};

use crate::coords::Mat3;
use crate::device::{
    AttrFormat, BufferId, BufferInit, BufferKind, Device, DrawCall, DrawKind, IndexFormat,
    LayoutDesc, LayoutId, ShaderDesc, ShaderId, TextureId, UniformDesc, UniformType,
    UniformValue, VertexBufferDesc, VertexStep,
};

use super::common::{MAX_TEXTURE_SLOTS, QuadInstance, UNIT_QUAD_INDICES, UNIT_QUAD_VERTICES};
use super::slots::TextureSlots;
use super::{QuadRequest, RenderStats, Renderer2D, Strategy};

const SHADER_SOURCE: &str = include_str!("shaders/instanced.wgsl");

/// Default batch capacity in instances.
pub const DEFAULT_MAX_INSTANCES: usize = 10_000;

pub struct InstancedRenderer2D {
    unit_quad_buffer: BufferId,
    instance_buffer: BufferId,
    index_buffer: BufferId,
    shader: ShaderId,
    layout: LayoutId,

    instances: Vec<QuadInstance>,
    slots: TextureSlots,
    max_instances: usize,

    view_projection: Mat3,
    stats: RenderStats,
    in_scene: bool,
}

impl InstancedRenderer2D {
    pub fn new(device: &mut dyn Device) -> Result<Self> {
        Self::with_capacity(device, DEFAULT_MAX_INSTANCES)
    }

    /// Like [`new`](Self::new) with an explicit batch capacity in instances.
    pub fn with_capacity(device: &mut dyn Device, max_instances: usize) -> Result<Self> {
        anyhow::ensure!(max_instances > 0, "batch capacity must be at least one instance");

        let shader = device
            .create_shader(&ShaderDesc {
                label: "instanced quad shader",
                source: SHADER_SOURCE,
                uniforms: &[UniformDesc { name: "ndc_matrix", ty: UniformType::Mat3 }],
            })
            .context("instanced: shader creation failed")?;

        let unit_quad_buffer = match device.create_buffer(
            BufferKind::Vertex,
            BufferInit::Data(bytemuck::cast_slice(&UNIT_QUAD_VERTICES)),
        ) {
            Ok(b) => b,
            Err(e) => {
                device.destroy_shader(shader);
                return Err(e).context("instanced: unit-quad buffer");
            }
        };

        let instance_buffer = match device.create_buffer(
            BufferKind::Vertex,
            BufferInit::Sized((max_instances * size_of::<QuadInstance>()) as u64),
        ) {
            Ok(b) => b,
            Err(e) => {
                device.destroy_buffer(unit_quad_buffer);
                device.destroy_shader(shader);
                return Err(e).context("instanced: instance buffer");
            }
        };

        let index_buffer = match device.create_buffer(
            BufferKind::Index,
            BufferInit::Data(bytemuck::cast_slice(&UNIT_QUAD_INDICES)),
        ) {
            Ok(b) => b,
            Err(e) => {
                device.destroy_buffer(instance_buffer);
                device.destroy_buffer(unit_quad_buffer);
                device.destroy_shader(shader);
                return Err(e).context("instanced: index buffer");
            }
        };

        let layout = match device.create_layout(&LayoutDesc {
            label: "instanced quad layout",
            vertex_buffers: &[
                VertexBufferDesc {
                    buffer: unit_quad_buffer,
                    step: VertexStep::Vertex,
                    attributes: &[AttrFormat::F32x2, AttrFormat::F32x2],
                },
                VertexBufferDesc {
                    buffer: instance_buffer,
                    step: VertexStep::Instance,
                    attributes: &[
                        AttrFormat::F32x3,
                        AttrFormat::F32x3,
                        AttrFormat::F32x2,
                        AttrFormat::F32x2,
                        AttrFormat::Unorm8x4,
                        AttrFormat::U32,
                    ],
                },
            ],
            index_buffer,
            index_format: IndexFormat::U16,
        }) {
            Ok(l) => l,
            Err(e) => {
                device.destroy_buffer(index_buffer);
                device.destroy_buffer(instance_buffer);
                device.destroy_buffer(unit_quad_buffer);
                device.destroy_shader(shader);
                return Err(e).context("instanced: vertex layout");
            }
        };

        let slot_capacity = device.max_texture_units().min(MAX_TEXTURE_SLOTS) as usize;
        log::debug!(
            "InstancedRenderer2D initialized: {max_instances} instances, {slot_capacity} slots"
        );

        Ok(Self {
            unit_quad_buffer,
            instance_buffer,
            index_buffer,
            shader,
            layout,
            instances: Vec::with_capacity(max_instances),
            slots: TextureSlots::with_capacity(slot_capacity),
            max_instances,
            view_projection: Mat3::IDENTITY,
            stats: RenderStats::default(),
            in_scene: false,
        })
    }

    fn start_batch(&mut self) {
        self.instances.clear();
        self.slots.clear();
    }

    /// Uploads the live instance range, binds the batch's textures in slot
    /// order and issues one instanced draw. Safe to call with an empty batch.
    fn flush(&mut self, device: &mut dyn Device) {
        if self.instances.is_empty() {
            return;
        }

        device.update_buffer(self.instance_buffer, 0, bytemuck::cast_slice(&self.instances));

        for (unit, texture) in self.slots.iter().enumerate() {
            device.bind_texture(unit as u32, texture);
        }

        device.set_uniform(self.shader, "ndc_matrix", UniformValue::Mat3(self.view_projection));

        device.draw(&DrawCall {
            shader: self.shader,
            layout: self.layout,
            kind: DrawKind::Instanced {
                index_count: 6,
                instance_count: self.instances.len() as u32,
            },
        });

        self.stats.draw_calls += 1;
        self.start_batch();
    }

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

impl Renderer2D for InstancedRenderer2D {
    fn begin_scene(&mut self, device: &mut dyn Device, view_projection: Mat3) {
        debug_assert!(!self.in_scene, "begin_scene while a scene is open");
        let _ = device;
        self.view_projection = view_projection;
        self.stats = RenderStats::default();
        self.start_batch();
        self.in_scene = true;
    }

    fn draw_quad(&mut self, device: &mut dyn Device, quad: &QuadRequest) {
        debug_assert!(self.in_scene, "draw_quad outside begin_scene/end_scene");

        if self.instances.len() + 1 > self.max_instances {
            self.flush(device);
        }

        let slot = self.slot_for(device, quad.texture);
        let scale = quad.uv.scale();
        let offset = quad.uv.offset();

        self.instances.push(QuadInstance {
            row0: quad.transform.row(0),
            row1: quad.transform.row(1),
            uv_scale: [scale.x, scale.y],
            uv_offset: [offset.x, offset.y],
            tint: quad.tint.to_rgba8(),
            slot,
        });

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
        device.destroy_buffer(self.instance_buffer);
        device.destroy_buffer(self.unit_quad_buffer);
        device.destroy_shader(self.shader);
    }

    fn stats(&self) -> RenderStats {
        self.stats
    }

    fn strategy(&self) -> Strategy {
        Strategy::Instanced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::TraceDevice;
    use crate::coords::{UvRect, Vec2};
    use crate::paint::Color;

    #[test]
    fn record_carries_transform_rows_and_uv_map() {
        let mut device = TraceDevice::new();
        let mut renderer = InstancedRenderer2D::with_capacity(&mut device, 8).unwrap();

        let transform = Mat3::translation(Vec2::new(3.0, 4.0)) * Mat3::scale(2.0, 2.0);
        renderer.begin_scene(&mut device, Mat3::IDENTITY);
        renderer.draw_quad(
            &mut device,
            &QuadRequest {
                transform,
                texture: TextureId(7),
                uv: UvRect::new(Vec2::new(0.25, 0.0), Vec2::new(0.75, 0.5)),
                tint: Color::WHITE,
            },
        );

        let record = renderer.instances[0];
        assert_eq!(record.row0, [2.0, 0.0, 3.0]);
        assert_eq!(record.row1, [0.0, 2.0, 4.0]);
        assert_eq!(record.uv_scale, [0.5, 0.5]);
        assert_eq!(record.uv_offset, [0.25, 0.0]);
        assert_eq!(record.tint, [255, 255, 255, 255]);
        assert_eq!(record.slot, 0);

        renderer.end_scene(&mut device);
    }
}
