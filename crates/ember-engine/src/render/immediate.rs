//! Immediate strategy: one draw call per quad.
//!
//! Nothing is accumulated. Each quad binds its texture to unit 0, ships the
//! model transform, UV map and tint as uniforms, and draws the shared unit
//! quad. Simplest possible path; draw-call count equals quad count.

use anyhow::{Context, Result};

use crate::coords::Mat3;
use crate::device::{
    AttrFormat, BufferId, BufferInit, BufferKind, Device, DrawCall, DrawKind, IndexFormat,
    LayoutDesc, LayoutId, ShaderDesc, ShaderId, UniformDesc, UniformType, UniformValue,
    VertexBufferDesc, VertexStep,
};

use super::common::{UNIT_QUAD_INDICES, UNIT_QUAD_VERTICES};
use super::{QuadRequest, RenderStats, Renderer2D, Strategy};

const SHADER_SOURCE: &str = include_str!("shaders/immediate.wgsl");

pub struct ImmediateRenderer2D {
    vertex_buffer: BufferId,
    index_buffer: BufferId,
    shader: ShaderId,
    layout: LayoutId,

    stats: RenderStats,
    in_scene: bool,
}

impl ImmediateRenderer2D {
    /// Creates the shared unit-quad geometry and the per-draw-uniform shader.
    pub fn new(device: &mut dyn Device) -> Result<Self> {
        let shader = device
            .create_shader(&ShaderDesc {
                label: "immediate quad shader",
                source: SHADER_SOURCE,
                uniforms: &[
                    UniformDesc { name: "ndc_matrix", ty: UniformType::Mat3 },
                    UniformDesc { name: "model_matrix", ty: UniformType::Mat3 },
                    UniformDesc { name: "uv_scale_offset", ty: UniformType::Vec4 },
                    UniformDesc { name: "tint", ty: UniformType::Vec4 },
                ],
            })
            .context("immediate: shader creation failed")?;

        let vertex_buffer = match device.create_buffer(
            BufferKind::Vertex,
            BufferInit::Data(bytemuck::cast_slice(&UNIT_QUAD_VERTICES)),
        ) {
            Ok(b) => b,
            Err(e) => {
                device.destroy_shader(shader);
                return Err(e).context("immediate: unit-quad vertex buffer");
            }
        };

        let index_buffer = match device.create_buffer(
            BufferKind::Index,
            BufferInit::Data(bytemuck::cast_slice(&UNIT_QUAD_INDICES)),
        ) {
            Ok(b) => b,
            Err(e) => {
                device.destroy_buffer(vertex_buffer);
                device.destroy_shader(shader);
                return Err(e).context("immediate: unit-quad index buffer");
            }
        };

        let layout = match device.create_layout(&LayoutDesc {
            label: "immediate quad layout",
            vertex_buffers: &[VertexBufferDesc {
                buffer: vertex_buffer,
                step: VertexStep::Vertex,
                attributes: &[AttrFormat::F32x2, AttrFormat::F32x2],
            }],
            index_buffer,
            index_format: IndexFormat::U16,
        }) {
            Ok(l) => l,
            Err(e) => {
                device.destroy_buffer(index_buffer);
                device.destroy_buffer(vertex_buffer);
                device.destroy_shader(shader);
                return Err(e).context("immediate: vertex layout");
            }
        };

        log::debug!("ImmediateRenderer2D initialized");

        Ok(Self {
            vertex_buffer,
            index_buffer,
            shader,
            layout,
            stats: RenderStats::default(),
            in_scene: false,
        })
    }
}

impl Renderer2D for ImmediateRenderer2D {
    fn begin_scene(&mut self, device: &mut dyn Device, view_projection: Mat3) {
        debug_assert!(!self.in_scene, "begin_scene while a scene is open");
        self.stats = RenderStats::default();
        self.in_scene = true;
        // Per-draw uniforms change every quad; the NDC matrix holds for the
        // whole scene and is set once here.
        device.set_uniform(self.shader, "ndc_matrix", UniformValue::Mat3(view_projection));
    }

    fn draw_quad(&mut self, device: &mut dyn Device, quad: &QuadRequest) {
        debug_assert!(self.in_scene, "draw_quad outside begin_scene/end_scene");

        device.bind_texture(0, quad.texture);

        device.set_uniform(self.shader, "model_matrix", UniformValue::Mat3(quad.transform));
        let scale = quad.uv.scale();
        let offset = quad.uv.offset();
        device.set_uniform(
            self.shader,
            "uv_scale_offset",
            UniformValue::Vec4([scale.x, scale.y, offset.x, offset.y]),
        );
        device.set_uniform(self.shader, "tint", UniformValue::Vec4(quad.tint.to_array()));

        device.draw(&DrawCall {
            shader: self.shader,
            layout: self.layout,
            kind: DrawKind::Indexed { index_count: 6 },
        });

        self.stats.draw_calls += 1;
        self.stats.quads += 1;
    }

    fn end_scene(&mut self, device: &mut dyn Device) {
        debug_assert!(self.in_scene, "end_scene without begin_scene");
        let _ = device; // nothing buffered; every quad already drew
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
        Strategy::Immediate
    }
}
