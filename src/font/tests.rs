use std::path::Path;

use rustybuzz::ttf_parser::OutlineBuilder;

use super::{FontError, FontFace, OutlineCollector, shape};
use crate::outline::{PathCommand, YDirection};

/// A font from the usual Linux locations, if this machine has one.
fn system_font() -> Option<FontFace> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
    ]
    .iter()
    .find_map(|p| FontFace::load(Path::new(p), 0).ok())
}

#[test]
fn collector_records_every_callback() {
    let mut c = OutlineCollector::new(2048);
    c.move_to(0.0, 0.0);
    c.line_to(10.0, 0.0);
    c.quad_to(15.0, 5.0, 10.0, 10.0);
    c.curve_to(8.0, 12.0, 2.0, 12.0, 0.0, 10.0);
    c.close();
    let outline = c.finish();

    assert_eq!(outline.units_per_em, 2048);
    assert_eq!(outline.commands.len(), 5);
    assert!(matches!(outline.commands[2], PathCommand::QuadTo { .. }));
    assert!(matches!(outline.commands[3], PathCommand::CubicTo { .. }));
    assert_eq!(outline.commands[4], PathCommand::Close);
    assert_eq!(outline.segments(YDirection::Up).unwrap().len(), 4);
}

#[test]
fn garbage_bytes_are_not_a_font() {
    let err = FontFace::from_bytes(vec![0u8; 64], 0).unwrap_err();
    assert!(matches!(err, FontError::Parse(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = FontFace::load(Path::new("/nonexistent/font.ttf"), 0).unwrap_err();
    assert!(matches!(err, FontError::Io { .. }));
}

#[test]
fn system_font_outlines_and_shapes() {
    let Some(face) = system_font() else {
        return;
    };
    let glyph_id = face.glyph_index('A').expect("'A' is mapped");
    let outline = face.outline(glyph_id);
    assert!(!outline.is_empty());
    assert!(outline.bounds.is_some());
    assert_eq!(outline.units_per_em, face.units_per_em());

    let space = face.outline(face.glyph_index(' ').expect("space is mapped"));
    assert!(space.is_empty());

    let shaped = shape(&face, "AV", 32.0);
    assert_eq!(shaped.len(), 2);
    assert!(shaped[1].x > shaped[0].x);
    assert_eq!(shaped[0].cluster, 0);
    assert_eq!(shaped[1].cluster, 1);
}
