use std::collections::{HashMap, HashSet};

use anyhow::Result;

use super::api::{
    BufferInit, BufferKind, Device, DrawCall, LayoutDesc, ShaderDesc, UniformValue,
};
use super::ids::{BufferId, LayoutId, ShaderId, TextureId};

/// One recorded device call.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceCall {
    CreateBuffer { buffer: BufferId, kind: BufferKind, size: u64 },
    UpdateBuffer { buffer: BufferId, byte_offset: u64, len: u64 },
    DestroyBuffer { buffer: BufferId },
    CreateShader { shader: ShaderId, label: String },
    DestroyShader { shader: ShaderId },
    CreateLayout { layout: LayoutId, label: String },
    DestroyLayout { layout: LayoutId },
    SetUniform { shader: ShaderId, name: String, value: UniformValue },
    BindTexture { unit: u32, texture: TextureId },
    Draw(DrawCall),
}

/// Headless device that records every call instead of talking to a GPU.
///
/// Buffer contents are kept CPU-side so callers can decode what a renderer
/// actually uploaded. The test suite is the primary consumer; it also works
/// as a diagnostics tap when wired in place of a real backend.
#[derive(Debug)]
pub struct TraceDevice {
    next_id: u64,
    calls: Vec<TraceCall>,
    buffers: HashMap<u64, Vec<u8>>,
    shaders: HashSet<u64>,
    layouts: HashSet<u64>,
    max_texture_units: u32,
}

impl Default for TraceDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceDevice {
    pub fn new() -> Self {
        Self::with_max_texture_units(32)
    }

    /// A device reporting `units` texture units; tests use small values to
    /// exercise slot-table overflow without thousands of textures.
    pub fn with_max_texture_units(units: u32) -> Self {
        Self {
            next_id: 0,
            calls: Vec::new(),
            buffers: HashMap::new(),
            shaders: HashSet::new(),
            layouts: HashSet::new(),
            max_texture_units: units,
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Every call recorded so far, in submission order.
    pub fn calls(&self) -> &[TraceCall] {
        &self.calls
    }

    /// Number of draw calls recorded so far.
    pub fn draw_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, TraceCall::Draw(_)))
            .count()
    }

    /// The recorded draws, in order.
    pub fn draws(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls.iter().filter_map(|c| match c {
            TraceCall::Draw(call) => Some(call),
            _ => None,
        })
    }

    /// Current contents of a live buffer (creation data plus later updates).
    pub fn buffer_bytes(&self, buffer: BufferId) -> Option<&[u8]> {
        self.buffers.get(&buffer.0).map(Vec::as_slice)
    }

    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    pub fn live_shaders(&self) -> usize {
        self.shaders.len()
    }

    pub fn live_layouts(&self) -> usize {
        self.layouts.len()
    }

    /// Drops the recorded call list; live resources are unaffected.
    pub fn reset_trace(&mut self) {
        self.calls.clear();
    }
}

impl Device for TraceDevice {
    fn create_buffer(&mut self, kind: BufferKind, init: BufferInit<'_>) -> Result<BufferId> {
        let id = self.next_id();
        let contents = match init {
            BufferInit::Sized(n) => vec![0u8; n as usize],
            BufferInit::Data(data) => data.to_vec(),
        };
        let size = contents.len() as u64;
        self.buffers.insert(id, contents);
        self.calls.push(TraceCall::CreateBuffer {
            buffer: BufferId(id),
            kind,
            size,
        });
        Ok(BufferId(id))
    }

    fn update_buffer(&mut self, buffer: BufferId, byte_offset: u64, bytes: &[u8]) {
        let Some(contents) = self.buffers.get_mut(&buffer.0) else {
            debug_assert!(false, "update_buffer: unknown buffer {buffer:?}");
            return;
        };
        let start = byte_offset as usize;
        let end = start + bytes.len();
        debug_assert!(
            end <= contents.len(),
            "update_buffer: range {start}..{end} exceeds buffer size {}",
            contents.len()
        );
        if end <= contents.len() {
            contents[start..end].copy_from_slice(bytes);
        }
        self.calls.push(TraceCall::UpdateBuffer {
            buffer,
            byte_offset,
            len: bytes.len() as u64,
        });
    }

    fn destroy_buffer(&mut self, buffer: BufferId) {
        debug_assert!(
            self.buffers.contains_key(&buffer.0),
            "destroy_buffer: unknown buffer {buffer:?}"
        );
        self.buffers.remove(&buffer.0);
        self.calls.push(TraceCall::DestroyBuffer { buffer });
    }

    fn create_shader(&mut self, desc: &ShaderDesc<'_>) -> Result<ShaderId> {
        let id = self.next_id();
        self.shaders.insert(id);
        self.calls.push(TraceCall::CreateShader {
            shader: ShaderId(id),
            label: desc.label.to_owned(),
        });
        Ok(ShaderId(id))
    }

    fn destroy_shader(&mut self, shader: ShaderId) {
        debug_assert!(
            self.shaders.contains(&shader.0),
            "destroy_shader: unknown shader {shader:?}"
        );
        self.shaders.remove(&shader.0);
        self.calls.push(TraceCall::DestroyShader { shader });
    }

    fn create_layout(&mut self, desc: &LayoutDesc<'_>) -> Result<LayoutId> {
        let id = self.next_id();
        self.layouts.insert(id);
        self.calls.push(TraceCall::CreateLayout {
            layout: LayoutId(id),
            label: desc.label.to_owned(),
        });
        Ok(LayoutId(id))
    }

    fn destroy_layout(&mut self, layout: LayoutId) {
        debug_assert!(
            self.layouts.contains(&layout.0),
            "destroy_layout: unknown layout {layout:?}"
        );
        self.layouts.remove(&layout.0);
        self.calls.push(TraceCall::DestroyLayout { layout });
    }

    fn set_uniform(&mut self, shader: ShaderId, name: &str, value: UniformValue) {
        self.calls.push(TraceCall::SetUniform {
            shader,
            name: name.to_owned(),
            value,
        });
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureId) {
        self.calls.push(TraceCall::BindTexture { unit, texture });
    }

    fn draw(&mut self, call: &DrawCall) {
        self.calls.push(TraceCall::Draw(*call));
    }

    fn max_texture_units(&self) -> u32 {
        self.max_texture_units
    }
}
