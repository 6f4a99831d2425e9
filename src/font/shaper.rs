//! Text shaping via `rustybuzz`.

use super::FontFace;

/// A shaped glyph positioned along a single line, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapedGlyph {
    /// Glyph ID within the font face (not a Unicode codepoint).
    pub glyph_id: u16,
    /// Byte offset of the cluster this glyph came from.
    pub cluster: u32,
    /// Pen position of the glyph origin.
    pub x: f32,
    pub y: f32,
    pub x_advance: f32,
}

/// Shape `text` as one run at `font_size` pixels.
///
/// Script and direction are guessed from the text, so right-to-left runs
/// come back in visual order. Whitespace is shaped like anything else; its
/// outline is simply empty.
pub fn shape(face: &FontFace, text: &str, font_size: f32) -> Vec<ShapedGlyph> {
    let shaping_face = face.shaping_face();
    let mut buffer = rustybuzz::UnicodeBuffer::new();
    buffer.push_str(text);
    buffer.guess_segment_properties();

    let glyph_buffer = rustybuzz::shape(&shaping_face, &[], buffer);
    let scale = font_size / f32::from(face.units_per_em());

    let mut pen_x = 0.0;
    glyph_buffer
        .glyph_infos()
        .iter()
        .zip(glyph_buffer.glyph_positions())
        .map(|(info, pos)| {
            let glyph = ShapedGlyph {
                glyph_id: info.glyph_id as u16,
                cluster: info.cluster,
                x: pen_x + pos.x_offset as f32 * scale,
                y: pos.y_offset as f32 * scale,
                x_advance: pos.x_advance as f32 * scale,
            };
            pen_x += glyph.x_advance;
            glyph
        })
        .collect()
}
