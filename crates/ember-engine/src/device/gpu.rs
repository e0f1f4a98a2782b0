use std::collections::HashMap;
use std::num::NonZeroU32;

use anyhow::{Context, Result};

use super::api::{
    AttrFormat, BufferInit, BufferKind, Device, DrawCall, DrawKind, IndexFormat, LayoutDesc,
    ShaderDesc, UniformDesc, UniformType, UniformValue, VertexStep,
};
use super::ids::{BufferId, LayoutId, ShaderId, TextureId};

/// Initialization parameters for the wgpu backend.
///
/// Keep this structure stable and minimal. The defaults request the binding
/// array features the batching shaders rely on for per-fragment texture-slot
/// indexing.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Ceiling for the texture binding array; the effective unit count is
    /// this clamped by the adapter's sampled-texture limit.
    pub max_texture_slots: u32,

    /// Required wgpu features.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            max_texture_slots: 32,
            required_features: wgpu::Features::TEXTURE_BINDING_ARRAY
                | wgpu::Features::SAMPLED_TEXTURE_AND_STORAGE_BUFFER_ARRAY_NON_UNIFORM_INDEXING,
            required_limits: wgpu::Limits::default(),
        }
    }
}

struct ShaderRes {
    module: wgpu::ShaderModule,
    uniform_buffer: wgpu::Buffer,
    staging: Vec<u8>,
    /// name → (byte offset, type) inside the uniform block.
    offsets: HashMap<String, (usize, UniformType)>,
    dirty: bool,
}

struct VertexBufferRes {
    buffer: BufferId,
    step: wgpu::VertexStepMode,
    stride: u64,
    attributes: Vec<wgpu::VertexAttribute>,
}

struct LayoutRes {
    vertex_buffers: Vec<VertexBufferRes>,
    index_buffer: BufferId,
    index_format: wgpu::IndexFormat,
}

struct TargetRes {
    view: wgpu::TextureView,
    format: wgpu::TextureFormat,
}

/// wgpu implementation of the [`Device`] capability.
///
/// The backend is headless: it acquires an adapter without a surface and
/// renders into whatever texture view the caller installs via
/// [`set_render_target`](Self::set_render_target). Window and swapchain
/// management live outside the engine.
///
/// Textures bound per slot are gathered into one `binding_array`; unused
/// entries are padded with an internal 1×1 white texture so the bind group
/// is always complete.
pub struct GpuDevice {
    device: wgpu::Device,
    queue: wgpu::Queue,

    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    white_view: wgpu::TextureView,

    buffers: HashMap<u64, wgpu::Buffer>,
    textures: HashMap<u64, wgpu::TextureView>,
    shaders: HashMap<u64, ShaderRes>,
    layouts: HashMap<u64, LayoutRes>,
    pipelines: HashMap<(u64, u64, wgpu::TextureFormat), wgpu::RenderPipeline>,

    bound: Vec<Option<TextureId>>,
    target: Option<TargetRes>,

    max_slots: u32,
    next_id: u64,
    warned_no_target: bool,
}

impl GpuDevice {
    /// Creates a headless GPU context.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu; use
    /// [`new_blocking`](Self::new_blocking) outside async code.
    pub async fn new(init: GpuInit) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("ember-engine device"),
                required_features: init.required_features,
                required_limits: init.required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let max_slots = init
            .max_texture_slots
            .min(device.limits().max_sampled_textures_per_shader_stage)
            .max(1);

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("ember quad bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: NonZeroU32::new(max_slots),
                    },
                ],
            });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("ember quad sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let white_view = create_rgba8_texture_view(
            &device,
            &queue,
            "ember white 1x1",
            1,
            1,
            &[255, 255, 255, 255],
        );

        log::info!("GpuDevice ready: {max_slots} texture slots");

        Ok(Self {
            device,
            queue,
            bind_group_layout,
            sampler,
            white_view,
            buffers: HashMap::new(),
            textures: HashMap::new(),
            shaders: HashMap::new(),
            layouts: HashMap::new(),
            pipelines: HashMap::new(),
            bound: vec![None; max_slots as usize],
            target: None,
            max_slots,
            next_id: 0,
            warned_no_target: false,
        })
    }

    /// Blocking wrapper around [`new`](Self::new).
    pub fn new_blocking(init: GpuInit) -> Result<Self> {
        pollster::block_on(Self::new(init))
    }

    /// Installs the texture view that subsequent draws render into.
    ///
    /// Draws load the existing contents and store on top, so one target can
    /// accumulate any number of flushes per frame.
    pub fn set_render_target(&mut self, view: wgpu::TextureView, format: wgpu::TextureFormat) {
        self.target = Some(TargetRes { view, format });
        self.warned_no_target = false;
    }

    /// Removes the current render target; draws become no-ops until a new
    /// target is installed.
    pub fn clear_render_target(&mut self) {
        self.target = None;
    }

    /// Uploads RGBA8 pixels as a new filterable texture and returns a handle
    /// usable with `bind_texture`. A convenience for demos and tests; real
    /// asset pipelines own texture creation outside the engine.
    pub fn create_texture_rgba8(&mut self, width: u32, height: u32, pixels: &[u8]) -> Result<TextureId> {
        anyhow::ensure!(
            pixels.len() as u64 == u64::from(width) * u64::from(height) * 4,
            "pixel data is {} bytes, expected {}",
            pixels.len(),
            u64::from(width) * u64::from(height) * 4
        );

        let view = create_rgba8_texture_view(
            &self.device,
            &self.queue,
            "ember texture",
            width,
            height,
            pixels,
        );

        let id = self.next_id();
        self.textures.insert(id, view);
        Ok(TextureId(id))
    }

    pub fn destroy_texture(&mut self, texture: TextureId) {
        self.textures.remove(&texture.0);
    }

    pub fn wgpu_device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn wgpu_queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn ensure_pipeline(&mut self, shader_id: ShaderId, layout_id: LayoutId, format: wgpu::TextureFormat) {
        let key = (shader_id.0, layout_id.0, format);
        if self.pipelines.contains_key(&key) {
            return;
        }

        let (Some(shader), Some(layout)) = (
            self.shaders.get(&shader_id.0),
            self.layouts.get(&layout_id.0),
        ) else {
            debug_assert!(false, "draw with unknown shader/layout");
            return;
        };

        let buffers: Vec<wgpu::VertexBufferLayout<'_>> = layout
            .vertex_buffers
            .iter()
            .map(|vb| wgpu::VertexBufferLayout {
                array_stride: vb.stride,
                step_mode: vb.step,
                attributes: &vb.attributes,
            })
            .collect();

        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("ember quad pipeline layout"),
                bind_group_layouts: &[&self.bind_group_layout],
                immediate_size: 0,
            });

        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("ember quad pipeline"),
                layout: Some(&pipeline_layout),

                vertex: wgpu::VertexState {
                    module: &shader.module,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &buffers,
                },

                fragment: Some(wgpu::FragmentState {
                    module: &shader.module,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(straight_alpha_blend()),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),

                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });

        self.pipelines.insert(key, pipeline);
    }
}

impl Device for GpuDevice {
    fn create_buffer(&mut self, kind: BufferKind, init: BufferInit<'_>) -> Result<BufferId> {
        let usage = match kind {
            BufferKind::Vertex => wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            BufferKind::Index => wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        };

        let buffer = match init {
            BufferInit::Sized(size) => self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("ember buffer"),
                size,
                usage,
                mapped_at_creation: false,
            }),
            BufferInit::Data(data) => {
                use wgpu::util::DeviceExt;
                self.device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("ember buffer"),
                        contents: data,
                        usage,
                    })
            }
        };

        let id = self.next_id();
        self.buffers.insert(id, buffer);
        Ok(BufferId(id))
    }

    fn update_buffer(&mut self, buffer: BufferId, byte_offset: u64, bytes: &[u8]) {
        let Some(raw) = self.buffers.get(&buffer.0) else {
            debug_assert!(false, "update_buffer: unknown buffer {buffer:?}");
            return;
        };
        self.queue.write_buffer(raw, byte_offset, bytes);
    }

    fn destroy_buffer(&mut self, buffer: BufferId) {
        self.buffers.remove(&buffer.0);
    }

    fn create_shader(&mut self, desc: &ShaderDesc<'_>) -> Result<ShaderId> {
        // Capture compile failure instead of letting it surface later as an
        // uncaptured device error on the first draw.
        let error_scope = self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(desc.label),
                source: wgpu::ShaderSource::Wgsl(desc.source.into()),
            });
        if let Some(err) = pollster::block_on(error_scope.pop()) {
            anyhow::bail!("shader '{}' failed to compile: {err}", desc.label);
        }

        let (offsets, size) = uniform_block_layout(desc.uniforms);

        let uniform_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("ember uniform buffer"),
            size: size as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let id = self.next_id();
        self.shaders.insert(
            id,
            ShaderRes {
                module,
                uniform_buffer,
                staging: vec![0u8; size],
                offsets,
                dirty: false,
            },
        );
        Ok(ShaderId(id))
    }

    fn destroy_shader(&mut self, shader: ShaderId) {
        self.shaders.remove(&shader.0);
        self.pipelines.retain(|(s, _, _), _| *s != shader.0);
    }

    fn create_layout(&mut self, desc: &LayoutDesc<'_>) -> Result<LayoutId> {
        let mut location = 0u32;
        let mut vertex_buffers = Vec::with_capacity(desc.vertex_buffers.len());

        for vb in desc.vertex_buffers {
            anyhow::ensure!(
                self.buffers.contains_key(&vb.buffer.0),
                "layout '{}' references unknown buffer {:?}",
                desc.label,
                vb.buffer
            );

            let mut offset = 0u64;
            let mut attributes = Vec::with_capacity(vb.attributes.len());
            for attr in vb.attributes {
                attributes.push(wgpu::VertexAttribute {
                    format: vertex_format(*attr),
                    offset,
                    shader_location: location,
                });
                offset += attr.byte_size();
                location += 1;
            }

            vertex_buffers.push(VertexBufferRes {
                buffer: vb.buffer,
                step: match vb.step {
                    VertexStep::Vertex => wgpu::VertexStepMode::Vertex,
                    VertexStep::Instance => wgpu::VertexStepMode::Instance,
                },
                stride: offset,
                attributes,
            });
        }

        anyhow::ensure!(
            self.buffers.contains_key(&desc.index_buffer.0),
            "layout '{}' references unknown index buffer {:?}",
            desc.label,
            desc.index_buffer
        );

        let id = self.next_id();
        self.layouts.insert(
            id,
            LayoutRes {
                vertex_buffers,
                index_buffer: desc.index_buffer,
                index_format: match desc.index_format {
                    IndexFormat::U16 => wgpu::IndexFormat::Uint16,
                    IndexFormat::U32 => wgpu::IndexFormat::Uint32,
                },
            },
        );
        Ok(LayoutId(id))
    }

    fn destroy_layout(&mut self, layout: LayoutId) {
        self.layouts.remove(&layout.0);
        self.pipelines.retain(|(_, l, _), _| *l != layout.0);
    }

    fn set_uniform(&mut self, shader: ShaderId, name: &str, value: UniformValue) {
        let Some(res) = self.shaders.get_mut(&shader.0) else {
            debug_assert!(false, "set_uniform: unknown shader {shader:?}");
            return;
        };
        let Some(&(offset, ty)) = res.offsets.get(name) else {
            debug_assert!(false, "set_uniform: shader has no uniform '{name}'");
            return;
        };

        let bytes = encode_uniform(ty, value);
        let Some(bytes) = bytes else {
            debug_assert!(false, "set_uniform: '{name}' type mismatch");
            return;
        };
        res.staging[offset..offset + bytes.len()].copy_from_slice(&bytes);
        res.dirty = true;
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureId) {
        let Some(slot) = self.bound.get_mut(unit as usize) else {
            debug_assert!(false, "bind_texture: unit {unit} out of range");
            return;
        };
        *slot = Some(texture);
    }

    fn draw(&mut self, call: &DrawCall) {
        let Some(target_format) = self.target.as_ref().map(|t| t.format) else {
            if !self.warned_no_target {
                log::warn!("draw issued with no render target installed; skipping");
                self.warned_no_target = true;
            }
            return;
        };

        self.ensure_pipeline(call.shader, call.layout, target_format);

        // Flush pending uniform writes before recording the pass.
        if let Some(res) = self.shaders.get_mut(&call.shader.0)
            && res.dirty
        {
            self.queue.write_buffer(&res.uniform_buffer, 0, &res.staging);
            res.dirty = false;
        }

        let (Some(shader), Some(layout), Some(pipeline), Some(target)) = (
            self.shaders.get(&call.shader.0),
            self.layouts.get(&call.layout.0),
            self.pipelines
                .get(&(call.shader.0, call.layout.0, target_format)),
            self.target.as_ref(),
        ) else {
            debug_assert!(false, "draw with unknown shader/layout");
            return;
        };

        let views: Vec<&wgpu::TextureView> = (0..self.max_slots as usize)
            .map(|unit| {
                self.bound[unit]
                    .and_then(|id| self.textures.get(&id.0))
                    .unwrap_or(&self.white_view)
            })
            .collect();

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ember quad bind group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: shader.uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureViewArray(&views),
                },
            ],
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("ember draw encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("ember quad pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, &bind_group, &[]);

            for (slot, vb) in layout.vertex_buffers.iter().enumerate() {
                let Some(raw) = self.buffers.get(&vb.buffer.0) else {
                    debug_assert!(false, "draw references destroyed buffer {:?}", vb.buffer);
                    return;
                };
                rpass.set_vertex_buffer(slot as u32, raw.slice(..));
            }

            let Some(index_raw) = self.buffers.get(&layout.index_buffer.0) else {
                debug_assert!(false, "draw references destroyed index buffer");
                return;
            };
            rpass.set_index_buffer(index_raw.slice(..), layout.index_format);

            match call.kind {
                DrawKind::Indexed { index_count } => {
                    rpass.draw_indexed(0..index_count, 0, 0..1);
                }
                DrawKind::Instanced { index_count, instance_count } => {
                    rpass.draw_indexed(0..index_count, 0, 0..instance_count);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
    }

    fn max_texture_units(&self) -> u32 {
        self.max_slots
    }
}

// ── helpers ───────────────────────────────────────────────────────────────

fn vertex_format(attr: AttrFormat) -> wgpu::VertexFormat {
    match attr {
        AttrFormat::F32x2 => wgpu::VertexFormat::Float32x2,
        AttrFormat::F32x3 => wgpu::VertexFormat::Float32x3,
        AttrFormat::F32x4 => wgpu::VertexFormat::Float32x4,
        AttrFormat::Unorm8x4 => wgpu::VertexFormat::Unorm8x4,
        AttrFormat::U32 => wgpu::VertexFormat::Uint32,
    }
}

fn straight_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

/// Computes WGSL uniform-block offsets for the declared slots.
///
/// `mat3x3<f32>` occupies 48 bytes at 16-byte alignment (three padded
/// columns); `vec4<f32>` is 16 at 16. The block size is rounded up to 16.
fn uniform_block_layout(
    uniforms: &[UniformDesc],
) -> (HashMap<String, (usize, UniformType)>, usize) {
    let mut offsets = HashMap::with_capacity(uniforms.len());
    let mut cursor = 0usize;

    for u in uniforms {
        let (align, size) = match u.ty {
            UniformType::Mat3 => (16, 48),
            UniformType::Vec4 => (16, 16),
        };
        cursor = cursor.next_multiple_of(align);
        offsets.insert(u.name.to_owned(), (cursor, u.ty));
        cursor += size;
    }

    // Uniform bindings cannot be zero-sized; keep a minimal block even for
    // shaders that declare no uniforms.
    (offsets, cursor.next_multiple_of(16).max(16))
}

fn encode_uniform(ty: UniformType, value: UniformValue) -> Option<Vec<u8>> {
    match (ty, value) {
        (UniformType::Mat3, UniformValue::Mat3(m)) => {
            // Column-major, each column padded to a vec4.
            let mut bytes = Vec::with_capacity(48);
            for col in 0..3 {
                let column = [m.rows[0][col], m.rows[1][col], m.rows[2][col], 0.0f32];
                bytes.extend_from_slice(bytemuck::cast_slice(&column));
            }
            Some(bytes)
        }
        (UniformType::Vec4, UniformValue::Vec4(v)) => {
            Some(bytemuck::cast_slice(&v).to_vec())
        }
        _ => None,
    }
}

fn create_rgba8_texture_view(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    width: u32,
    height: u32,
    pixels: &[u8],
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );

    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_block_layout_packs_wgsl_offsets() {
        let (offsets, size) = uniform_block_layout(&[
            UniformDesc { name: "ndc_matrix", ty: UniformType::Mat3 },
            UniformDesc { name: "model_matrix", ty: UniformType::Mat3 },
            UniformDesc { name: "uv_scale_offset", ty: UniformType::Vec4 },
            UniformDesc { name: "tint", ty: UniformType::Vec4 },
        ]);

        assert_eq!(offsets["ndc_matrix"], (0, UniformType::Mat3));
        assert_eq!(offsets["model_matrix"], (48, UniformType::Mat3));
        assert_eq!(offsets["uv_scale_offset"], (96, UniformType::Vec4));
        assert_eq!(offsets["tint"], (112, UniformType::Vec4));
        assert_eq!(size, 128);
    }

    #[test]
    fn empty_uniform_block_keeps_minimal_size() {
        let (offsets, size) = uniform_block_layout(&[]);
        assert!(offsets.is_empty());
        assert_eq!(size, 16);
    }

    #[test]
    fn mat3_encodes_column_major_with_padding() {
        use crate::coords::Mat3;

        let m = Mat3::from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [0.0, 0.0, 1.0]]);
        let bytes = encode_uniform(UniformType::Mat3, UniformValue::Mat3(m)).unwrap();
        let floats: &[f32] = bytemuck::cast_slice(&bytes);

        assert_eq!(floats.len(), 12);
        assert_eq!(&floats[0..3], &[1.0, 4.0, 0.0]); // column 0
        assert_eq!(&floats[4..7], &[2.0, 5.0, 0.0]); // column 1
        assert_eq!(&floats[8..11], &[3.0, 6.0, 1.0]); // column 2
    }

    #[test]
    fn type_mismatch_is_rejected() {
        assert!(encode_uniform(UniformType::Mat3, UniformValue::Vec4([0.0; 4])).is_none());
    }
}
