//! Tight axis-aligned bounds of Bézier segments.

use crate::geometry::Point;

use super::Segment;

/// An axis-aligned box. Starts inverted (empty) and grows as points are
/// added.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Bounds {
    pub const EMPTY: Self = Self {
        min: Point::new(f32::INFINITY, f32::INFINITY),
        max: Point::new(f32::NEG_INFINITY, f32::NEG_INFINITY),
    };

    /// Tight bounds of a list of segments.
    pub fn of_segments(segments: &[Segment]) -> Self {
        let mut b = Self::EMPTY;
        for seg in segments {
            match *seg {
                Segment::Line(p0, p1) => {
                    b.add_point(p0);
                    b.add_point(p1);
                }
                Segment::Quad(p0, c, p1) => b.add_quadratic(p0, c, p1),
                Segment::Cubic(p0, c1, c2, p1) => b.add_cubic(p0, c1, c2, p1),
            }
        }
        b
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn width(&self) -> f32 {
        if self.is_empty() { 0.0 } else { self.max.x - self.min.x }
    }

    pub fn height(&self) -> f32 {
        if self.is_empty() { 0.0 } else { self.max.y - self.min.y }
    }

    pub fn add_point(&mut self, p: Point) {
        self.add_x(p.x);
        self.add_y(p.y);
    }

    fn add_x(&mut self, x: f32) {
        self.min.x = self.min.x.min(x);
        self.max.x = self.max.x.max(x);
    }

    fn add_y(&mut self, y: f32) {
        self.min.y = self.min.y.min(y);
        self.max.y = self.max.y.max(y);
    }

    /// Grow to cover a quadratic, via its degree-elevated cubic.
    pub fn add_quadratic(&mut self, p0: Point, ctrl: Point, p1: Point) {
        let c1 = p0 + (ctrl - p0) * (2.0 / 3.0);
        let c2 = c1 + (p1 - p0) * (1.0 / 3.0);
        self.add_cubic(p0, c1, c2, p1);
    }

    /// Grow to cover a cubic: both endpoints plus every interior extremum.
    ///
    /// Control points only count through the curve points they pull the
    /// extrema to, so the box hugs the drawn shape.
    pub fn add_cubic(&mut self, p0: Point, c1: Point, c2: Point, p1: Point) {
        self.add_point(p0);
        self.add_point(p1);
        for t in cubic_extrema(p0.x, c1.x, c2.x, p1.x) {
            self.add_x(cubic_at(p0.x, c1.x, c2.x, p1.x, t));
        }
        for t in cubic_extrema(p0.y, c1.y, c2.y, p1.y) {
            self.add_y(cubic_at(p0.y, c1.y, c2.y, p1.y, t));
        }
    }
}

fn cubic_at(v0: f32, v1: f32, v2: f32, v3: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    mt * mt * mt * v0 + 3.0 * mt * mt * t * v1 + 3.0 * mt * t * t * v2 + t * t * t * v3
}

/// Parameters in the open interval `(0, 1)` where the derivative of a 1D
/// cubic vanishes.
fn cubic_extrema(v0: f32, v1: f32, v2: f32, v3: f32) -> impl Iterator<Item = f32> {
    // Derivative / 3: a t² + b t + c.
    let a = -3.0 * v0 + 9.0 * v1 - 9.0 * v2 + 3.0 * v3;
    let b = 6.0 * v0 - 12.0 * v1 + 6.0 * v2;
    let c = 3.0 * v1 - 3.0 * v0;

    let roots: [Option<f32>; 2] = if a == 0.0 {
        if b == 0.0 { [None, None] } else { [Some(-c / b), None] }
    } else {
        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 {
            [None, None]
        } else {
            let sq = disc.sqrt();
            [Some((-b + sq) / (2.0 * a)), Some((-b - sq) / (2.0 * a))]
        }
    };

    roots.into_iter().flatten().filter(|t| *t > 0.0 && *t < 1.0)
}

#[cfg(test)]
mod tests {
    use super::Bounds;
    use crate::geometry::Point;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn empty_has_no_extent() {
        let b = Bounds::EMPTY;
        assert!(b.is_empty());
        assert!(approx(b.width(), 0.0));
    }

    #[test]
    fn cubic_arch_peaks_below_control_points() {
        let mut b = Bounds::EMPTY;
        b.add_cubic(
            Point::ZERO,
            Point::new(0.0, 4.0),
            Point::new(4.0, 4.0),
            Point::new(4.0, 0.0),
        );
        assert!(approx(b.min.x, 0.0) && approx(b.max.x, 4.0));
        assert!(approx(b.min.y, 0.0));
        // Apex of this arch is at t = 0.5, y = 3.
        assert!(approx(b.max.y, 3.0), "max y {}", b.max.y);
    }

    #[test]
    fn quadratic_apex_is_half_the_control_height() {
        let mut b = Bounds::EMPTY;
        b.add_quadratic(Point::ZERO, Point::new(5.0, 10.0), Point::new(10.0, 0.0));
        assert!(approx(b.max.y, 5.0), "max y {}", b.max.y);
        assert!(approx(b.width(), 10.0));
    }

    #[test]
    fn monotone_cubic_uses_endpoints_only() {
        let mut b = Bounds::EMPTY;
        b.add_cubic(
            Point::ZERO,
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
            Point::new(3.0, 3.0),
        );
        assert!(approx(b.max.x, 3.0) && approx(b.max.y, 3.0));
        assert!(approx(b.min.x, 0.0) && approx(b.min.y, 0.0));
    }
}
