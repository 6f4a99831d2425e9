use super::{Bounds, GlyphLayout, GlyphOutline, OutlineError, PathCommand, Segment, YDirection};
use crate::curve::{CurveKind, Winding};
use crate::geometry::{PixelSize, Point};

/// A 1024-unit square contour, closed implicitly by `Z`.
fn square() -> GlyphOutline {
    let mut o = GlyphOutline::new(1024);
    o.move_to(0.0, 0.0)
        .line_to(1024.0, 0.0)
        .line_to(1024.0, 1024.0)
        .line_to(0.0, 1024.0)
        .close();
    o
}

fn approx(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
}

// Decoding

#[test]
fn decode_each_tag() {
    assert_eq!(
        PathCommand::decode('M', &[1.0, 2.0]),
        Ok(PathCommand::MoveTo(Point::new(1.0, 2.0)))
    );
    assert_eq!(
        PathCommand::decode('Q', &[1.0, 2.0, 3.0, 4.0]),
        Ok(PathCommand::QuadTo {
            ctrl: Point::new(1.0, 2.0),
            to: Point::new(3.0, 4.0),
        })
    );
    assert_eq!(
        PathCommand::decode('C', &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
        Ok(PathCommand::CubicTo {
            ctrl1: Point::new(1.0, 2.0),
            ctrl2: Point::new(3.0, 4.0),
            to: Point::new(5.0, 6.0),
        })
    );
    assert_eq!(PathCommand::decode('Z', &[]), Ok(PathCommand::Close));
}

#[test]
fn decode_unknown_tag_fails() {
    assert_eq!(
        PathCommand::decode('A', &[1.0, 2.0]),
        Err(OutlineError::UnknownCommand('A'))
    );
}

#[test]
fn decode_wrong_argument_count_fails() {
    assert_eq!(
        PathCommand::decode('L', &[1.0]),
        Err(OutlineError::ArgumentCount {
            tag: 'L',
            expected: 2,
            found: 1,
        })
    );
}

#[test]
fn from_raw_stops_at_first_bad_command() {
    let raw: [(char, &[f32]); 3] = [('M', &[0.0, 0.0]), ('X', &[]), ('L', &[1.0, 1.0])];
    assert_eq!(
        GlyphOutline::from_raw(1000, raw),
        Err(OutlineError::UnknownCommand('X'))
    );
}

#[test]
fn from_raw_builds_commands() {
    let raw: [(char, &[f32]); 3] = [('M', &[0.0, 0.0]), ('L', &[1.0, 1.0]), ('Z', &[])];
    let outline = GlyphOutline::from_raw(1000, raw).unwrap();
    assert_eq!(outline.commands.len(), 3);
    assert_eq!(outline.units_per_em, 1000);
}

// Segment walk

#[test]
fn close_emits_line_back_to_start() {
    let segs = square().segments(YDirection::Up).unwrap();
    assert_eq!(segs.len(), 4);
    assert_eq!(
        segs[3],
        Segment::Line(Point::new(0.0, 1024.0), Point::new(0.0, 0.0))
    );
}

#[test]
fn close_at_start_emits_nothing() {
    let mut o = GlyphOutline::new(1000);
    o.move_to(0.0, 0.0)
        .line_to(10.0, 0.0)
        .line_to(0.0, 10.0)
        .line_to(0.0, 0.0)
        .close();
    assert_eq!(o.segments(YDirection::Up).unwrap().len(), 3);
}

#[test]
fn drawing_before_move_is_an_error() {
    let mut o = GlyphOutline::new(1000);
    o.line_to(1.0, 1.0);
    assert_eq!(
        o.segments(YDirection::Up),
        Err(OutlineError::MissingMoveTo { index: 0 })
    );
}

#[test]
fn non_finite_coordinate_is_an_error() {
    let mut o = GlyphOutline::new(1000);
    o.move_to(0.0, 0.0).quad_to(f32::NAN, 1.0, 2.0, 2.0);
    assert_eq!(
        o.segments(YDirection::Up),
        Err(OutlineError::NonFinite { index: 1 })
    );
}

#[test]
fn y_down_negates_coordinates() {
    let mut o = GlyphOutline::new(1000);
    o.move_to(1.0, 2.0).line_to(3.0, 4.0);
    assert_eq!(
        o.segments(YDirection::Down).unwrap(),
        vec![Segment::Line(Point::new(1.0, -2.0), Point::new(3.0, -4.0))]
    );
}

#[test]
fn move_only_outline_is_empty() {
    let mut o = GlyphOutline::new(1000);
    assert!(o.is_empty());
    o.move_to(5.0, 5.0).close();
    assert!(o.is_empty());
    assert!(!square().is_empty());
}

// Layout

#[test]
fn measure_adds_padding_on_every_side() {
    let layout = GlyphLayout::measure(&square(), 32.0, 2.0, 1.0, YDirection::Up)
        .unwrap()
        .unwrap();
    assert_eq!(layout.size, PixelSize::new(36, 36));
    assert!(approx(layout.offset, Point::new(2.0, 2.0)));
    assert!((layout.scale - 1.0 / 32.0).abs() < f32::EPSILON);
}

#[test]
fn measure_scales_with_pixel_density() {
    let layout = GlyphLayout::measure(&square(), 32.0, 2.0, 2.0, YDirection::Up)
        .unwrap()
        .unwrap();
    assert_eq!(layout.size, PixelSize::new(72, 72));
    assert!((layout.padding - 4.0).abs() < f32::EPSILON);
}

#[test]
fn measure_rounds_fractional_extents_up() {
    let mut o = GlyphOutline::new(1000);
    o.move_to(0.0, 0.0).line_to(150.0, 0.0).line_to(150.0, 410.0).close();
    // 10 px per em: 1.5 x 4.1 px of ink.
    let layout = GlyphLayout::measure(&o, 10.0, 0.0, 1.0, YDirection::Up)
        .unwrap()
        .unwrap();
    assert_eq!(layout.size, PixelSize::new(2, 5));
}

#[test]
fn measure_empty_outline_is_none() {
    let mut o = GlyphOutline::new(1000);
    o.move_to(0.0, 0.0);
    assert_eq!(GlyphLayout::measure(&o, 16.0, 2.0, 1.0, YDirection::Up), Ok(None));
}

#[test]
fn measure_rejects_zero_units_per_em() {
    let mut o = square();
    o.units_per_em = 0;
    assert_eq!(
        GlyphLayout::measure(&o, 16.0, 2.0, 1.0, YDirection::Up),
        Err(OutlineError::ZeroUnitsPerEm)
    );
}

#[test]
fn curves_fill_the_padded_box() {
    let o = square();
    let layout = GlyphLayout::measure(&o, 32.0, 2.0, 1.0, YDirection::Up)
        .unwrap()
        .unwrap();
    let curves = layout.curves(&o, Winding::Negative).unwrap();

    assert_eq!(curves.len(), 4);
    assert!(curves.iter().all(|c| c.kind == CurveKind::Linear));
    assert!(curves.iter().all(|c| c.winding == Winding::Negative));
    assert!(curves.iter().all(|c| (c.padding - 2.0).abs() < f32::EPSILON));
    assert!(approx(curves[0].anchor1, Point::new(2.0, 2.0)));
    assert!(approx(curves[1].anchor2, Point::new(34.0, 34.0)));
}

#[test]
fn y_down_layout_keeps_curves_inside_target() {
    let o = square();
    let layout = GlyphLayout::measure(&o, 32.0, 2.0, 1.0, YDirection::Down)
        .unwrap()
        .unwrap();
    assert_eq!(layout.size, PixelSize::new(36, 36));
    for c in layout.curves(&o, Winding::Positive).unwrap() {
        for p in c.points() {
            assert!((2.0 - 1e-4..=34.0 + 1e-4).contains(&p.y), "y {} outside", p.y);
        }
    }
}

#[test]
fn curve_kinds_follow_commands() {
    let mut o = GlyphOutline::new(1000);
    o.move_to(0.0, 0.0)
        .quad_to(500.0, 1000.0, 1000.0, 0.0)
        .cubic_to(800.0, -200.0, 200.0, -200.0, 0.0, 0.0)
        .close();
    let layout = GlyphLayout::measure(&o, 10.0, 1.0, 1.0, YDirection::Up)
        .unwrap()
        .unwrap();
    let kinds: Vec<_> = layout
        .curves(&o, Winding::Positive)
        .unwrap()
        .iter()
        .map(|c| c.kind)
        .collect();
    assert_eq!(kinds, vec![CurveKind::Quadratic, CurveKind::Cubic]);
}

#[test]
fn reported_bounds_skip_the_walk() {
    // Draws before any move-to, so walking it fails; measuring does not walk.
    let mut o = GlyphOutline::new(1024).with_bounds(Bounds {
        min: Point::new(0.0, 0.0),
        max: Point::new(1024.0, 512.0),
    });
    o.line_to(1024.0, 0.0).line_to(1024.0, 512.0).close();

    let layout = GlyphLayout::measure(&o, 32.0, 2.0, 1.0, YDirection::Up)
        .unwrap()
        .unwrap();
    assert_eq!(layout.size, PixelSize::new(36, 20));
    assert_eq!(
        layout.curves(&o, Winding::Positive),
        Err(OutlineError::MissingMoveTo { index: 0 })
    );
}

#[test]
fn reported_bounds_follow_y_direction() {
    let o = square().with_bounds(Bounds {
        min: Point::new(0.0, 0.0),
        max: Point::new(1024.0, 1024.0),
    });
    let up = GlyphLayout::measure(&o, 32.0, 2.0, 1.0, YDirection::Up)
        .unwrap()
        .unwrap();
    let down = GlyphLayout::measure(&o, 32.0, 2.0, 1.0, YDirection::Down)
        .unwrap()
        .unwrap();
    assert_eq!(up.size, down.size);
    assert!(approx(down.offset, Point::new(2.0, 34.0)));
}
