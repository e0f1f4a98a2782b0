//! Headless walkthrough of the three quad strategies.
//!
//! Runs the same scene through each strategy on a recording device and
//! prints what reached the "GPU", so the batching behavior is visible
//! without a window or an adapter.

use ember_engine::coords::{Mat3, Vec2};
use ember_engine::device::{TextureId, TraceDevice};
use ember_engine::logging::{LoggingConfig, init_logging};
use ember_engine::render::{QuadRequest, Renderer2D as _, Strategy, create_renderer};

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let atlas = TextureId(1);
    let portrait = TextureId(2);

    for strategy in [Strategy::Immediate, Strategy::Batched, Strategy::Instanced] {
        let mut device = TraceDevice::new();
        let mut renderer = create_renderer(strategy, &mut device)?;

        renderer.begin_scene(&mut device, Mat3::IDENTITY);
        for i in 0..64 {
            let angle = i as f32 * 0.1;
            let transform = Mat3::translation(Vec2::new(angle.cos() * 5.0, angle.sin() * 5.0))
                * Mat3::rotation(angle)
                * Mat3::scale(0.5, 0.5);
            // Alternate between two textures so the slot table earns its keep.
            let texture = if i % 2 == 0 { atlas } else { portrait };
            renderer.draw_quad(&mut device, &QuadRequest::new(transform, texture));
        }
        renderer.end_scene(&mut device);

        let stats = renderer.stats();
        println!(
            "{strategy:?}: {} quads in {} draw call(s), {} device calls total",
            stats.quads,
            stats.draw_calls,
            device.calls().len(),
        );

        renderer.shutdown(&mut device);
    }

    Ok(())
}
