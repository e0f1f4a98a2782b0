use approx::assert_relative_eq;

use ember_engine::coords::{Mat3, UvRect, Vec2};
use ember_engine::device::{DrawKind, TextureId, TraceCall, TraceDevice};
use ember_engine::paint::Color;
use ember_engine::render::{
    BatchedRenderer2D, ImmediateRenderer2D, InstancedRenderer2D, QuadInstance, QuadRequest,
    QuadVertex, Renderer2D,
};

fn last_upload<T: bytemuck::Pod>(device: &TraceDevice) -> Vec<T> {
    let (buffer, offset, len) = device
        .calls()
        .iter()
        .rev()
        .find_map(|c| match c {
            TraceCall::UpdateBuffer { buffer, byte_offset, len } => {
                Some((*buffer, *byte_offset, *len))
            }
            _ => None,
        })
        .expect("no buffer upload recorded");
    let bytes = &device.buffer_bytes(buffer).expect("buffer is live")
        [offset as usize..(offset + len) as usize];
    bytemuck::cast_slice(bytes).to_vec()
}

/// The canonical corners both strategies transform, in fan order.
const CORNERS: [Vec2; 4] = [
    Vec2::new(-0.5, -0.5),
    Vec2::new(0.5, -0.5),
    Vec2::new(0.5, 0.5),
    Vec2::new(-0.5, 0.5),
];

fn request_sequence() -> Vec<QuadRequest> {
    // Rotation combined with a UV sub-rectangle is the failure-prone case
    // for scale/offset UV math, so it leads the sequence.
    vec![
        QuadRequest {
            transform: Mat3::translation(Vec2::new(2.0, 3.0))
                * Mat3::rotation(0.7)
                * Mat3::scale(3.0, 1.5),
            texture: TextureId(1),
            uv: UvRect::new(Vec2::new(0.25, 0.5), Vec2::new(0.75, 1.0)),
            tint: Color::new(1.0, 0.5, 0.25, 1.0),
        },
        QuadRequest {
            transform: Mat3::rotation(-0.3),
            texture: TextureId(2),
            uv: UvRect::FULL,
            tint: Color::WHITE,
        },
        QuadRequest {
            transform: Mat3::translation(Vec2::new(-5.0, 1.0)),
            texture: TextureId(1),
            uv: UvRect::FULL,
            tint: Color::WHITE,
        },
    ]
}

#[test]
fn test_batched_and_instanced_emit_identical_geometry() {
    let requests = request_sequence();

    let mut batched_device = TraceDevice::new();
    let mut batched = BatchedRenderer2D::new(&mut batched_device).unwrap();
    batched.begin_scene(&mut batched_device, Mat3::IDENTITY);
    for r in &requests {
        batched.draw_quad(&mut batched_device, r);
    }
    batched.end_scene(&mut batched_device);

    let mut instanced_device = TraceDevice::new();
    let mut instanced = InstancedRenderer2D::new(&mut instanced_device).unwrap();
    instanced.begin_scene(&mut instanced_device, Mat3::IDENTITY);
    for r in &requests {
        instanced.draw_quad(&mut instanced_device, r);
    }
    instanced.end_scene(&mut instanced_device);

    let vertices: Vec<QuadVertex> = last_upload(&batched_device);
    let instances: Vec<QuadInstance> = last_upload(&instanced_device);
    assert_eq!(vertices.len(), requests.len() * 4);
    assert_eq!(instances.len(), requests.len());

    for (i, inst) in instances.iter().enumerate() {
        for (j, corner) in CORNERS.iter().enumerate() {
            let v = vertices[i * 4 + j];

            // Reference corner from the instance record: rows × (corner, 1).
            let rx = inst.row0[0] * corner.x + inst.row0[1] * corner.y + inst.row0[2];
            let ry = inst.row1[0] * corner.x + inst.row1[1] * corner.y + inst.row1[2];
            assert_relative_eq!(v.pos[0], rx, epsilon = 1e-5);
            assert_relative_eq!(v.pos[1], ry, epsilon = 1e-5);

            // The instanced UV map evaluated at the canonical corner UVs
            // must land on the tabulated per-corner UVs.
            let unit_uv = UvRect::FULL.corners()[j];
            let ux = unit_uv.x * inst.uv_scale[0] + inst.uv_offset[0];
            let uy = unit_uv.y * inst.uv_scale[1] + inst.uv_offset[1];
            assert_relative_eq!(v.uv[0], ux, epsilon = 1e-6);
            assert_relative_eq!(v.uv[1], uy, epsilon = 1e-6);

            assert_eq!(v.slot, inst.slot);
            assert_eq!(v.tint, inst.tint);
        }
    }

    // Same slot assignment order on both paths: tex 1 → 0, tex 2 → 1.
    let slots: Vec<u32> = instances.iter().map(|i| i.slot).collect();
    assert_eq!(slots, vec![0, 1, 0]);
}

#[test]
fn test_immediate_issues_one_draw_per_quad() {
    let requests = request_sequence();

    let mut device = TraceDevice::new();
    let mut renderer = ImmediateRenderer2D::new(&mut device).unwrap();

    renderer.begin_scene(&mut device, Mat3::IDENTITY);
    for r in &requests {
        renderer.draw_quad(&mut device, r);
    }
    renderer.end_scene(&mut device);

    assert_eq!(device.draw_count(), requests.len());
    assert_eq!(renderer.stats().draw_calls, requests.len() as u32);
    assert_eq!(renderer.stats().quads, requests.len() as u32);

    for draw in device.draws() {
        assert_eq!(draw.kind, DrawKind::Indexed { index_count: 6 });
    }

    // Every quad re-binds unit 0 and ships its own model matrix.
    let binds: Vec<TextureId> = device
        .calls()
        .iter()
        .filter_map(|c| match c {
            TraceCall::BindTexture { unit: 0, texture } => Some(*texture),
            _ => None,
        })
        .collect();
    assert_eq!(binds, vec![TextureId(1), TextureId(2), TextureId(1)]);

    let model_sets = device
        .calls()
        .iter()
        .filter(|c| matches!(c, TraceCall::SetUniform { name, .. } if name == "model_matrix"))
        .count();
    assert_eq!(model_sets, requests.len());
}
