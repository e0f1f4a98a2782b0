use ember_engine::coords::Mat3;
use ember_engine::device::{TextureId, TraceDevice};
use ember_engine::render::{QuadRequest, Renderer2D, Strategy, create_renderer};

const ALL_STRATEGIES: [Strategy; 3] =
    [Strategy::Immediate, Strategy::Batched, Strategy::Instanced];

#[test]
fn test_empty_scene_issues_no_draw_calls() {
    for strategy in ALL_STRATEGIES {
        let mut device = TraceDevice::new();
        let mut renderer = create_renderer(strategy, &mut device).unwrap();

        renderer.begin_scene(&mut device, Mat3::IDENTITY);
        renderer.end_scene(&mut device);

        assert_eq!(device.draw_count(), 0, "{strategy:?} drew with an empty scene");
        assert_eq!(renderer.stats().draw_calls, 0);
    }
}

#[test]
fn test_repeated_empty_scenes_stay_silent() {
    // end_scene flushes unconditionally; the empty flush must be a no-op
    // every time, not just the first.
    let mut device = TraceDevice::new();
    let mut renderer = create_renderer(Strategy::Batched, &mut device).unwrap();

    for _ in 0..3 {
        renderer.begin_scene(&mut device, Mat3::IDENTITY);
        renderer.end_scene(&mut device);
    }

    assert_eq!(device.draw_count(), 0);
}

#[test]
fn test_stats_reset_each_scene() {
    let mut device = TraceDevice::new();
    let mut renderer = create_renderer(Strategy::Instanced, &mut device).unwrap();

    renderer.begin_scene(&mut device, Mat3::IDENTITY);
    renderer.draw_quad(&mut device, &QuadRequest::new(Mat3::IDENTITY, TextureId(1)));
    renderer.end_scene(&mut device);
    assert_eq!(renderer.stats().quads, 1);
    assert_eq!(renderer.stats().draw_calls, 1);

    renderer.begin_scene(&mut device, Mat3::IDENTITY);
    renderer.end_scene(&mut device);
    assert_eq!(renderer.stats().quads, 0);
    assert_eq!(renderer.stats().draw_calls, 0);
}

#[test]
fn test_shutdown_releases_everything_init_acquired() {
    for strategy in ALL_STRATEGIES {
        let mut device = TraceDevice::new();
        let mut renderer = create_renderer(strategy, &mut device).unwrap();

        // Use the renderer once so shutdown covers a post-scene state too.
        renderer.begin_scene(&mut device, Mat3::IDENTITY);
        renderer.draw_quad(&mut device, &QuadRequest::new(Mat3::IDENTITY, TextureId(9)));
        renderer.end_scene(&mut device);

        renderer.shutdown(&mut device);

        assert_eq!(device.live_buffers(), 0, "{strategy:?} leaked buffers");
        assert_eq!(device.live_shaders(), 0, "{strategy:?} leaked shaders");
        assert_eq!(device.live_layouts(), 0, "{strategy:?} leaked layouts");
    }
}

#[test]
fn test_unknown_texture_handles_pass_through() {
    // Handle provenance is not the core's business: an id no loader ever
    // produced must flow through batching untouched.
    let mut device = TraceDevice::new();
    let mut renderer = create_renderer(Strategy::Batched, &mut device).unwrap();

    renderer.begin_scene(&mut device, Mat3::IDENTITY);
    renderer.draw_quad(
        &mut device,
        &QuadRequest::new(Mat3::IDENTITY, TextureId(u64::MAX)),
    );
    renderer.end_scene(&mut device);

    assert_eq!(device.draw_count(), 1);
}
