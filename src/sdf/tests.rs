use super::{
    DistanceFieldMode, DoubleBuffer, FieldGenerator, MsdfGenerator, PreviewKind, SdfGenerator,
};
use crate::curve::{CurvePrimitive, Winding};
use crate::geometry::{PixelSize, Point};
use crate::gpu::{
    CombinePass, FIELD_CLEAR, RecordedCommand, RecordingBackend, RenderBackend, TargetId,
    TextureFilter,
};

/// A line whose padding doubles as an identifier.
fn tagged_curve(tag: usize) -> CurvePrimitive {
    CurvePrimitive::linear(
        Point::new(1.0, 1.0),
        Point::new(10.0, 5.0),
        Winding::Positive,
        tag as f32,
    )
}

fn tags(curves: &[CurvePrimitive]) -> Vec<usize> {
    curves.iter().map(|c| c.padding as usize).collect()
}

fn sdf(backend: &mut RecordingBackend) -> SdfGenerator {
    SdfGenerator::new(backend, PixelSize::square(16), 1.0, TextureFilter::Linear)
}

fn accumulate_targets(backend: &RecordingBackend) -> Vec<(TargetId, TargetId)> {
    backend
        .commands()
        .iter()
        .filter_map(|c| match c {
            RecordedCommand::Combine {
                pass: CombinePass::Accumulate { previous, .. },
                target,
            } => Some((*previous, *target)),
            _ => None,
        })
        .collect()
}

// Double buffer

#[test]
fn swap_exchanges_front_and_back() {
    let mut backend = RecordingBackend::new();
    let mut db = DoubleBuffer::new(&mut backend, PixelSize::square(8));
    let (back, front) = (db.back(), db.front());
    assert_ne!(back, front);
    db.swap();
    assert_eq!((db.back(), db.front()), (front, back));
}

#[test]
#[should_panic(expected = "without a swap")]
fn accumulate_twice_without_swap_panics() {
    let mut backend = RecordingBackend::new();
    let scratch = backend.create_target(&crate::gpu::TargetDesc::new(
        "scratch",
        PixelSize::square(8),
        TextureFilter::Linear,
    ));
    let mut db = DoubleBuffer::new(&mut backend, PixelSize::square(8));
    db.accumulate(&mut backend, scratch);
    db.accumulate(&mut backend, scratch);
}

// Single channel

#[test]
fn add_does_not_render() {
    let mut backend = RecordingBackend::new();
    let mut g = sdf(&mut backend);
    backend.take_commands();

    g.add(tagged_curve(1));
    g.add(tagged_curve(2));
    assert_eq!(g.queued().len(), 2);
    assert!(backend.commands().is_empty());
}

#[test]
fn render_draws_each_curve_alone_then_accumulates() {
    let mut backend = RecordingBackend::new();
    let mut g = sdf(&mut backend);
    backend.take_commands();
    for i in 1..=3 {
        g.add(tagged_curve(i));
    }
    g.render(&mut backend);

    let draws = backend.count(|c| matches!(c, RecordedCommand::DrawCurve { .. }));
    let combines = backend.count(|c| matches!(c, RecordedCommand::Combine { .. }));
    assert_eq!(draws, 3);
    assert_eq!(combines, 3);

    // Every draw lands on a freshly cleared scratch target.
    let cmds = backend.commands();
    for (i, cmd) in cmds.iter().enumerate() {
        if let RecordedCommand::DrawCurve { target, .. } = cmd {
            assert_eq!(
                cmds[i - 1],
                RecordedCommand::Clear {
                    target: *target,
                    color: FIELD_CLEAR,
                }
            );
            assert!(matches!(cmds[i + 1], RecordedCommand::Combine { .. }));
        }
    }
}

#[test]
fn accumulation_ping_pongs_and_ends_in_back_buffer() {
    let mut backend = RecordingBackend::new();
    let mut g = sdf(&mut backend);
    for i in 1..=4 {
        g.add(tagged_curve(i));
    }
    g.render(&mut backend);

    let passes = accumulate_targets(&backend);
    assert_eq!(passes.len(), 4);
    for pair in passes.windows(2) {
        // Each pass reads what the previous one wrote.
        assert_eq!(pair[1].0, pair[0].1);
        assert_ne!(pair[1].1, pair[0].1);
    }
    assert_eq!(g.texture(), passes[3].1);
}

#[test]
fn render_clears_both_buffers_first() {
    let mut backend = RecordingBackend::new();
    let mut g = sdf(&mut backend);
    backend.take_commands();
    g.add(tagged_curve(1));
    g.render(&mut backend);

    let cleared: Vec<TargetId> = backend
        .commands()
        .iter()
        .take_while(|c| !matches!(c, RecordedCommand::DrawCurve { .. }))
        .filter_map(|c| match c {
            RecordedCommand::Clear { target, .. } => Some(*target),
            _ => None,
        })
        .collect();
    // Two field buffers, then the scratch target.
    assert_eq!(cleared.len(), 3);
    assert!(cleared.contains(&g.texture()));
}

#[test]
fn render_restores_clear_color() {
    let mut backend = RecordingBackend::new();
    backend.set_clear_color([1.0, 1.0, 1.0, 1.0]);
    let mut g = sdf(&mut backend);
    g.add(tagged_curve(1));
    g.render(&mut backend);
    assert_eq!(backend.clear_color(), [1.0, 1.0, 1.0, 1.0]);
}

#[test]
fn empty_render_is_a_no_op() {
    let mut backend = RecordingBackend::new();
    let mut g = sdf(&mut backend);
    g.add(tagged_curve(1));
    g.render(&mut backend);
    let texture = g.texture();
    backend.take_commands();

    g.render(&mut backend);
    assert!(backend.commands().is_empty());
    assert_eq!(g.texture(), texture);
}

#[test]
fn curves_drawn_in_generator_pixel_space() {
    let mut backend = RecordingBackend::new();
    let mut g = sdf(&mut backend);
    g.add(tagged_curve(1));
    g.render(&mut backend);
    let camera = backend.commands().iter().find_map(|c| match c {
        RecordedCommand::DrawCurve { camera, .. } => Some(*camera),
        _ => None,
    });
    let camera = camera.unwrap();
    assert!((camera.width - 16.0).abs() < f32::EPSILON);
    assert!((camera.height - 16.0).abs() < f32::EPSILON);
}

#[test]
fn resize_to_same_size_is_a_no_op() {
    let mut backend = RecordingBackend::new();
    let mut g = sdf(&mut backend);
    backend.take_commands();
    assert!(!g.resize(&mut backend, PixelSize::square(16), 2.0));
    assert!(backend.commands().is_empty());
}

#[test]
fn resize_replaces_targets_and_previews_follow() {
    let mut backend = RecordingBackend::new();
    let mut g = sdf(&mut backend);
    let live = backend.live_targets();
    let old = g.texture();

    assert!(g.resize(&mut backend, PixelSize::new(20, 12), 2.0));
    assert_eq!(g.size(), PixelSize::new(20, 12));
    assert!((g.pixel_density() - 2.0).abs() < f32::EPSILON);
    assert_eq!(backend.live_targets(), live);
    assert_ne!(g.texture(), old);
    assert_eq!(backend.target_size(g.texture()), Some(PixelSize::new(20, 12)));
    assert_eq!(backend.target_size(old), None);
    assert_eq!(g.raw_preview().texture, g.texture());
}

#[test]
fn scratch_target_has_depth() {
    let mut backend = RecordingBackend::new();
    let mut g = sdf(&mut backend);
    g.add(tagged_curve(1));
    g.render(&mut backend);
    let scratch = backend.commands().iter().find_map(|c| match c {
        RecordedCommand::DrawCurve { target, .. } => Some(*target),
        _ => None,
    });
    assert!(backend.desc(scratch.unwrap()).unwrap().depth);
}

#[test]
fn channel_preview_stacks_three_targets() {
    let mut backend = RecordingBackend::new();
    let g = sdf(&mut backend);
    let quads = g.channels_preview();
    assert_eq!(quads.len(), 3);
    assert_eq!(quads[0].texture, g.texture());
    assert!(quads.iter().all(|q| q.kind == PreviewKind::Channel));
    assert!(quads[0].center.y < quads[1].center.y && quads[1].center.y < quads[2].center.y);
}

#[test]
fn release_frees_every_target() {
    let mut backend = RecordingBackend::new();
    let g = sdf(&mut backend);
    g.release(&mut backend);
    assert_eq!(backend.live_targets(), 0);
}

// Multi channel

fn msdf(backend: &mut RecordingBackend) -> MsdfGenerator {
    MsdfGenerator::new(backend, PixelSize::square(16), 1.0, TextureFilter::Linear)
}

#[test]
fn six_curves_land_on_skewed_channel_pairs() {
    let mut backend = RecordingBackend::new();
    let mut g = msdf(&mut backend);
    for i in 0..6 {
        g.add(tagged_curve(i));
    }

    for k in 0..3 {
        let expected: Vec<usize> = (0..6).filter(|i| i % 3 == k || (i + 1) % 3 == k).collect();
        assert_eq!(tags(g.channel(k).queued()), expected, "channel {k}");
    }
    assert_eq!(tags(g.channel(0).queued()), vec![0, 2, 3, 5]);
}

#[test]
fn every_curve_reaches_exactly_two_channels() {
    let mut backend = RecordingBackend::new();
    let mut g = msdf(&mut backend);
    for i in 0..7 {
        g.add(tagged_curve(i));
    }
    for i in 0..7 {
        let hits = (0..3)
            .filter(|&k| tags(g.channel(k).queued()).contains(&i))
            .count();
        assert_eq!(hits, 2, "curve {i}");
    }
}

#[test]
fn batch_counter_restarts_after_render() {
    let mut backend = RecordingBackend::new();
    let mut g = msdf(&mut backend);
    g.add(tagged_curve(0));
    g.add(tagged_curve(1));
    g.render(&mut backend);
    assert_eq!(g.queued(), 0);

    g.add(tagged_curve(9));
    assert_eq!(tags(g.channel(0).queued()), vec![9]);
    assert_eq!(tags(g.channel(1).queued()), vec![9]);
    assert!(g.channel(2).queued().is_empty());
}

#[test]
fn render_merges_channel_fields_in_order() {
    let mut backend = RecordingBackend::new();
    let mut g = msdf(&mut backend);
    for i in 0..3 {
        g.add(tagged_curve(i));
    }
    g.render(&mut backend);

    let expected = [
        g.channel(0).texture(),
        g.channel(1).texture(),
        g.channel(2).texture(),
    ];
    let last = backend.commands().iter().rev().find_map(|c| match c {
        RecordedCommand::Combine { pass, target } => Some((*pass, *target)),
        _ => None,
    });
    assert_eq!(
        last,
        Some((CombinePass::MergeChannels { channels: expected }, g.texture()))
    );
}

#[test]
fn idle_channel_is_cleared_not_stale() {
    let mut backend = RecordingBackend::new();
    let mut g = msdf(&mut backend);
    g.add(tagged_curve(0));
    backend.take_commands();
    g.render(&mut backend);

    let idle = g.channel(2).texture();
    assert!(backend.commands().contains(&RecordedCommand::Clear {
        target: idle,
        color: FIELD_CLEAR,
    }));
    // One curve, drawn by channels 0 and 1 only.
    assert_eq!(
        backend.count(|c| matches!(c, RecordedCommand::DrawCurve { .. })),
        2
    );
}

#[test]
fn msdf_empty_render_is_a_no_op() {
    let mut backend = RecordingBackend::new();
    let mut g = msdf(&mut backend);
    backend.take_commands();
    g.render(&mut backend);
    assert!(backend.commands().is_empty());
}

#[test]
fn msdf_resize_rounds_up_and_short_circuits() {
    let mut backend = RecordingBackend::new();
    let mut g = msdf(&mut backend);
    assert!(g.resize(&mut backend, 10.2, 7.0, 1.0));
    assert_eq!(g.size(), PixelSize::new(11, 7));
    assert_eq!(g.channel(1).size(), PixelSize::new(11, 7));
    assert_eq!(backend.target_size(g.texture()), Some(PixelSize::new(11, 7)));

    backend.take_commands();
    assert!(!g.resize(&mut backend, 10.9, 6.5, 1.0));
    assert!(backend.commands().is_empty());
}

#[test]
fn msdf_channel_previews_side_by_side() {
    let mut backend = RecordingBackend::new();
    let g = msdf(&mut backend);
    let quads = g.channels_preview();
    assert_eq!(quads.len(), 9);
    let xs: Vec<f32> = quads.iter().map(|q| q.center.x).collect();
    assert_eq!(xs, vec![-1.0, -1.0, -1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
}

// Generator enum

#[test]
fn field_generator_dispatches_by_mode() {
    let mut backend = RecordingBackend::new();
    for mode in [DistanceFieldMode::Sdf, DistanceFieldMode::Msdf] {
        let mut g = FieldGenerator::new(
            &mut backend,
            mode,
            PixelSize::square(8),
            1.0,
            TextureFilter::Nearest,
        );
        assert_eq!(g.mode(), mode);
        assert!(g.resize(&mut backend, PixelSize::new(12, 9), 1.0));
        assert_eq!(g.size(), PixelSize::new(12, 9));
        match g.distance_test_preview().kind {
            PreviewKind::DistanceTest { mode: m, .. } => assert_eq!(m, mode),
            other => panic!("unexpected preview {other:?}"),
        }
        g.release(&mut backend);
    }
    assert_eq!(backend.live_targets(), 0);
}
