//! Curve primitives: one line, quadratic or cubic segment ready to be drawn
//! as a distance ribbon.
//!
//! Every primitive carries four control points regardless of its kind so the
//! GPU side can treat them uniformly as a cubic Bézier. Lines put their
//! handles on the thirds of the segment and quadratics use the single control
//! point for both handles; the shader switches on [`CurveKind`] to pick the
//! matching evaluation.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Segment type, mirrored as an integer in the curve shader uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveKind {
    Linear,
    Quadratic,
    Cubic,
}

impl CurveKind {
    /// Value written into the shader's `kind` parameter.
    pub const fn shader_index(self) -> u32 {
        match self {
            Self::Linear => 0,
            Self::Quadratic => 1,
            Self::Cubic => 2,
        }
    }
}

/// Which side of a curve counts as inside.
///
/// Font formats disagree on contour orientation, so the sign is chosen per
/// font (or per configuration) and applied to every curve of a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winding {
    #[default]
    Positive,
    Negative,
}

impl Winding {
    pub const fn sign(self) -> f32 {
        match self {
            Self::Positive => 1.0,
            Self::Negative => -1.0,
        }
    }
}

/// One renderable segment in glyph pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePrimitive {
    pub kind: CurveKind,
    pub anchor1: Point,
    pub handle1: Point,
    pub handle2: Point,
    pub anchor2: Point,
    pub winding: Winding,
    /// Half-width of the ribbon, in the same units as the control points.
    pub padding: f32,
}

impl CurvePrimitive {
    pub fn linear(from: Point, to: Point, winding: Winding, padding: f32) -> Self {
        Self {
            kind: CurveKind::Linear,
            anchor1: from,
            handle1: from.lerp(to, 1.0 / 3.0),
            handle2: from.lerp(to, 2.0 / 3.0),
            anchor2: to,
            winding,
            padding,
        }
    }

    pub fn quadratic(from: Point, ctrl: Point, to: Point, winding: Winding, padding: f32) -> Self {
        Self {
            kind: CurveKind::Quadratic,
            anchor1: from,
            handle1: ctrl,
            handle2: ctrl,
            anchor2: to,
            winding,
            padding,
        }
    }

    pub fn cubic(
        from: Point,
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
        winding: Winding,
        padding: f32,
    ) -> Self {
        Self {
            kind: CurveKind::Cubic,
            anchor1: from,
            handle1: ctrl1,
            handle2: ctrl2,
            anchor2: to,
            winding,
            padding,
        }
    }

    /// The four control points in evaluation order.
    pub const fn points(&self) -> [Point; 4] {
        [self.anchor1, self.handle1, self.handle2, self.anchor2]
    }

    /// Map every control point through `p * scale + offset`.
    ///
    /// Padding is left alone; callers express it in target pixels already.
    pub fn transformed(self, scale: Point, offset: Point) -> Self {
        let map = |p: Point| Point::new(p.x * scale.x + offset.x, p.y * scale.y + offset.y);
        Self {
            anchor1: map(self.anchor1),
            handle1: map(self.handle1),
            handle2: map(self.handle2),
            anchor2: map(self.anchor2),
            ..self
        }
    }

    /// Evaluate the segment at `t` in `[0, 1]`.
    pub fn eval(&self, t: f32) -> Point {
        let [p0, p1, p2, p3] = self.points();
        match self.kind {
            CurveKind::Linear => p0.lerp(p3, t),
            CurveKind::Quadratic => {
                let a = p0.lerp(p1, t);
                let b = p1.lerp(p3, t);
                a.lerp(b, t)
            }
            CurveKind::Cubic => {
                let a = p0.lerp(p1, t);
                let b = p1.lerp(p2, t);
                let c = p2.lerp(p3, t);
                a.lerp(b, t).lerp(b.lerp(c, t), t)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CurveKind, CurvePrimitive, Winding};
    use crate::geometry::Point;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5
    }

    #[test]
    fn linear_handles_sit_on_thirds() {
        let c = CurvePrimitive::linear(
            Point::new(0.0, 0.0),
            Point::new(3.0, 6.0),
            Winding::Positive,
            2.0,
        );
        assert_eq!(c.kind, CurveKind::Linear);
        assert!(close(c.handle1, Point::new(1.0, 2.0)));
        assert!(close(c.handle2, Point::new(2.0, 4.0)));
    }

    #[test]
    fn quadratic_handles_collapse_to_control() {
        let ctrl = Point::new(5.0, 9.0);
        let c = CurvePrimitive::quadratic(
            Point::ZERO,
            ctrl,
            Point::new(10.0, 0.0),
            Winding::Negative,
            1.0,
        );
        assert_eq!(c.handle1, ctrl);
        assert_eq!(c.handle2, ctrl);
        assert!(close(c.eval(0.5), Point::new(5.0, 4.5)));
    }

    #[test]
    fn cubic_endpoints_and_midpoint() {
        let c = CurvePrimitive::cubic(
            Point::ZERO,
            Point::new(0.0, 4.0),
            Point::new(4.0, 4.0),
            Point::new(4.0, 0.0),
            Winding::Positive,
            1.0,
        );
        assert!(close(c.eval(0.0), Point::ZERO));
        assert!(close(c.eval(1.0), Point::new(4.0, 0.0)));
        assert!(close(c.eval(0.5), Point::new(2.0, 3.0)));
    }

    #[test]
    fn transform_maps_points_and_keeps_padding() {
        let c = CurvePrimitive::linear(
            Point::new(1.0, 1.0),
            Point::new(2.0, -1.0),
            Winding::Positive,
            6.0,
        )
        .transformed(Point::new(10.0, -10.0), Point::new(5.0, 5.0));
        assert!(close(c.anchor1, Point::new(15.0, -5.0)));
        assert!(close(c.anchor2, Point::new(25.0, 15.0)));
        assert!((c.padding - 6.0).abs() < f32::EPSILON);
    }

    #[test]
    fn winding_sign() {
        assert!((Winding::Positive.sign() - 1.0).abs() < f32::EPSILON);
        assert!((Winding::Negative.sign() + 1.0).abs() < f32::EPSILON);
    }
}
