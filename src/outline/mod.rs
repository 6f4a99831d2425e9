//! Glyph outlines as path commands, and their conversion into curve
//! primitives sized for a distance-field render.
//!
//! Outlines arrive in font design units. [`GlyphLayout::measure`] works out
//! the pixel footprint (tight bounds at the requested size plus padding) and
//! [`GlyphLayout::curves`] maps every segment into that footprint.

mod bounds;
mod layout;

pub use bounds::Bounds;
pub use layout::GlyphLayout;

use thiserror::Error;

use crate::geometry::Point;

/// Errors raised while decoding or walking an outline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OutlineError {
    #[error("unknown path command {0:?}")]
    UnknownCommand(char),
    #[error("path command {tag:?} takes {expected} arguments, got {found}")]
    ArgumentCount {
        tag: char,
        expected: usize,
        found: usize,
    },
    #[error("path command {index} draws before any move-to")]
    MissingMoveTo { index: usize },
    #[error("path command {index} has a non-finite coordinate")]
    NonFinite { index: usize },
    #[error("outline has zero units per em")]
    ZeroUnitsPerEm,
}

/// One outline command in design units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    QuadTo { ctrl: Point, to: Point },
    CubicTo { ctrl1: Point, ctrl2: Point, to: Point },
    Close,
}

impl PathCommand {
    /// Decode a raw tagged command (`M`, `L`, `Q`, `C`, `Z`) with its flat
    /// coordinate list.
    pub fn decode(tag: char, args: &[f32]) -> Result<Self, OutlineError> {
        let expected = match tag {
            'M' | 'L' => 2,
            'Q' => 4,
            'C' => 6,
            'Z' => 0,
            other => return Err(OutlineError::UnknownCommand(other)),
        };
        if args.len() != expected {
            return Err(OutlineError::ArgumentCount {
                tag,
                expected,
                found: args.len(),
            });
        }
        let pt = |i: usize| Point::new(args[i], args[i + 1]);
        Ok(match tag {
            'M' => Self::MoveTo(pt(0)),
            'L' => Self::LineTo(pt(0)),
            'Q' => Self::QuadTo {
                ctrl: pt(0),
                to: pt(2),
            },
            'C' => Self::CubicTo {
                ctrl1: pt(0),
                ctrl2: pt(2),
                to: pt(4),
            },
            _ => Self::Close,
        })
    }

    fn is_finite(&self) -> bool {
        match *self {
            Self::MoveTo(p) | Self::LineTo(p) => p.is_finite(),
            Self::QuadTo { ctrl, to } => ctrl.is_finite() && to.is_finite(),
            Self::CubicTo { ctrl1, ctrl2, to } => {
                ctrl1.is_finite() && ctrl2.is_finite() && to.is_finite()
            }
            Self::Close => true,
        }
    }
}

/// Which way the outline's y axis points relative to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum YDirection {
    /// Font convention: y grows upward. Coordinates are used as-is.
    #[default]
    Up,
    /// y grows downward; every y coordinate is negated.
    Down,
}

impl YDirection {
    pub const fn sign(self) -> f32 {
        match self {
            Self::Up => 1.0,
            Self::Down => -1.0,
        }
    }

    fn apply(self, p: Point) -> Point {
        Point::new(p.x, p.y * self.sign())
    }

    /// Bounds measured with y up, re-expressed in this direction.
    pub fn apply_bounds(self, b: Bounds) -> Bounds {
        match self {
            Self::Up => b,
            Self::Down => Bounds {
                min: Point::new(b.min.x, -b.max.y),
                max: Point::new(b.max.x, -b.min.y),
            },
        }
    }
}

/// A drawable segment with absolute endpoints, produced by walking the
/// commands with a cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line(Point, Point),
    Quad(Point, Point, Point),
    Cubic(Point, Point, Point, Point),
}

/// A glyph's outline in design units.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlyphOutline {
    pub commands: Vec<PathCommand>,
    pub units_per_em: u16,
    /// Bounds reported by the font, y up. When present, layout uses them
    /// instead of walking the commands.
    pub bounds: Option<Bounds>,
}

impl GlyphOutline {
    pub fn new(units_per_em: u16) -> Self {
        Self {
            commands: Vec::new(),
            units_per_em,
            bounds: None,
        }
    }

    #[must_use]
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Decode a sequence of raw tagged commands.
    pub fn from_raw<'a, I>(units_per_em: u16, raw: I) -> Result<Self, OutlineError>
    where
        I: IntoIterator<Item = (char, &'a [f32])>,
    {
        let commands = raw
            .into_iter()
            .map(|(tag, args)| PathCommand::decode(tag, args))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            commands,
            units_per_em,
            bounds: None,
        })
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(Point::new(x, y)));
        self
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.commands.push(PathCommand::LineTo(Point::new(x, y)));
        self
    }

    pub fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) -> &mut Self {
        self.commands.push(PathCommand::QuadTo {
            ctrl: Point::new(cx, cy),
            to: Point::new(x, y),
        });
        self
    }

    pub fn cubic_to(
        &mut self,
        c1x: f32,
        c1y: f32,
        c2x: f32,
        c2y: f32,
        x: f32,
        y: f32,
    ) -> &mut Self {
        self.commands.push(PathCommand::CubicTo {
            ctrl1: Point::new(c1x, c1y),
            ctrl2: Point::new(c2x, c2y),
            to: Point::new(x, y),
        });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self
    }

    /// Whether the outline draws nothing (no segments at all).
    pub fn is_empty(&self) -> bool {
        !self
            .commands
            .iter()
            .any(|c| !matches!(c, PathCommand::MoveTo(_) | PathCommand::Close))
    }

    /// Walk the commands, yielding absolute segments with `y_dir` applied.
    ///
    /// `Close` emits a line back to the contour start unless the cursor is
    /// already there.
    pub fn segments(&self, y_dir: YDirection) -> Result<Vec<Segment>, OutlineError> {
        let mut out = Vec::with_capacity(self.commands.len());
        let mut cursor: Option<Point> = None;
        let mut start = Point::ZERO;

        for (index, cmd) in self.commands.iter().enumerate() {
            if !cmd.is_finite() {
                return Err(OutlineError::NonFinite { index });
            }
            if let PathCommand::MoveTo(p) = *cmd {
                let p = y_dir.apply(p);
                cursor = Some(p);
                start = p;
                continue;
            }
            let Some(from) = cursor else {
                if *cmd == PathCommand::Close {
                    continue;
                }
                return Err(OutlineError::MissingMoveTo { index });
            };
            let to = match *cmd {
                PathCommand::LineTo(p) => {
                    let to = y_dir.apply(p);
                    out.push(Segment::Line(from, to));
                    to
                }
                PathCommand::QuadTo { ctrl, to } => {
                    let to = y_dir.apply(to);
                    out.push(Segment::Quad(from, y_dir.apply(ctrl), to));
                    to
                }
                PathCommand::CubicTo { ctrl1, ctrl2, to } => {
                    let to = y_dir.apply(to);
                    out.push(Segment::Cubic(
                        from,
                        y_dir.apply(ctrl1),
                        y_dir.apply(ctrl2),
                        to,
                    ));
                    to
                }
                PathCommand::Close => {
                    if from != start {
                        out.push(Segment::Line(from, start));
                    }
                    start
                }
                PathCommand::MoveTo(_) => unreachable!("handled above"),
            };
            cursor = Some(to);
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests;
