//! Diagnostic quads for inspecting generator and atlas textures.
//!
//! A preview is a unit quad description: which texture to show, where the
//! quad's center sits on a plane measured in quad widths, and how to shade
//! it. Building the actual mesh is left to the presentation layer.

use crate::geometry::Point;
use crate::gpu::TargetId;

use super::DistanceFieldMode;

/// How a preview quad should shade its texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PreviewKind {
    /// Texture colors as stored.
    Raw,
    /// Field thresholded at `threshold` into a hard-edged glyph.
    DistanceTest {
        threshold: f32,
        mode: DistanceFieldMode,
    },
    /// One generator-internal target shown as grayscale.
    Channel,
}

/// One debug quad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewQuad {
    pub texture: TargetId,
    pub center: Point,
    /// Render targets are stored bottom-up; raw views flip to read upright.
    pub flip_y: bool,
    pub kind: PreviewKind,
}

impl PreviewQuad {
    pub const fn raw(texture: TargetId) -> Self {
        Self {
            texture,
            center: Point::ZERO,
            flip_y: true,
            kind: PreviewKind::Raw,
        }
    }

    pub const fn distance_test(texture: TargetId, mode: DistanceFieldMode) -> Self {
        Self {
            texture,
            center: Point::ZERO,
            flip_y: false,
            kind: PreviewKind::DistanceTest {
                threshold: 0.5,
                mode,
            },
        }
    }
}

/// Centers for `n` unit quads laid side by side along one axis, centered on
/// the origin.
pub(crate) fn stack_offsets(n: usize) -> impl Iterator<Item = f32> {
    let half = n as f32 * 0.5;
    (0..n).map(move |i| i as f32 + 0.5 - half)
}

/// One grayscale quad per target, stacked vertically in order.
pub(crate) fn channel_column(targets: &[TargetId]) -> Vec<PreviewQuad> {
    targets
        .iter()
        .zip(stack_offsets(targets.len()))
        .map(|(&texture, y)| PreviewQuad {
            texture,
            center: Point::new(0.0, y),
            flip_y: false,
            kind: PreviewKind::Channel,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{channel_column, stack_offsets};
    use crate::gpu::TargetId;

    #[test]
    fn three_quads_center_on_origin() {
        let offsets: Vec<f32> = stack_offsets(3).collect();
        assert_eq!(offsets, vec![-1.0, 0.0, 1.0]);
    }

    #[test]
    fn column_keeps_target_order() {
        let quads = channel_column(&[TargetId(4), TargetId(5)]);
        assert_eq!(quads[0].texture, TargetId(4));
        assert!((quads[0].center.y + 0.5).abs() < f32::EPSILON);
        assert!((quads[1].center.y - 0.5).abs() < f32::EPSILON);
    }
}
