//! Corner-frontier rectangle bin packer.
//!
//! Free space is tracked as a staircase of inner corners running from the
//! top-left sentinel `(0, height)` down to the bottom-right sentinel
//! `(width, 0)`. Everything below-left of the staircase counts as used, so a
//! rectangle whose bottom-left sits on a corner can never overlap a previous
//! placement. Each placement picks the corner that traps the least area
//! between the new rectangle and the existing staircase ("waste"), then
//! replaces every corner the rectangle dominates with two new ones.
//!
//! The packer is greedy and online: nothing is ever freed or repacked, and
//! identical call sequences always produce identical placements.

use thiserror::Error;

use crate::geometry::PixelSize;
use crate::gpu::Viewport;

/// Errors returned by [`BinPacker::reserve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PackError {
    /// No corner can hold the rectangle in any allowed orientation.
    #[error("no space left for a {size} rectangle in a {bin} bin")]
    NoSpace { size: PixelSize, bin: PixelSize },
    /// Zero-width or zero-height requests have no footprint to place.
    #[error("cannot reserve an empty {0} rectangle")]
    EmptyRequest(PixelSize),
}

/// Orientation of a placed rectangle relative to the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    Upright,
    /// Rotated by 90°: the footprint has width and height swapped.
    Quarter,
}

impl Rotation {
    /// Rotation angle in radians (0 or π/2).
    pub fn angle(self) -> f32 {
        match self {
            Self::Upright => 0.0,
            Self::Quarter => std::f32::consts::FRAC_PI_2,
        }
    }
}

/// Where a rectangle landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedBin {
    /// Bottom-left corner the rectangle was placed on.
    pub x: u32,
    pub y: u32,
    /// Axis-aligned footprint after rotation.
    pub size: PixelSize,
    pub rotation: Rotation,
}

impl PackedBin {
    /// Exclusive right edge.
    pub const fn right(&self) -> u32 {
        self.x + self.size.width
    }

    /// Exclusive top edge.
    pub const fn top(&self) -> u32 {
        self.y + self.size.height
    }

    /// Whether two placements share any area.
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.top()
            && other.y < self.top()
    }

    /// The placement as a render viewport within the bin's target.
    pub const fn viewport(&self) -> Viewport {
        Viewport {
            x: self.x,
            y: self.y,
            width: self.size.width,
            height: self.size.height,
        }
    }
}

/// One inner corner of the free-space staircase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Corner {
    x: u32,
    y: u32,
}

/// Best corner found by one orientation's search.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    index: usize,
    waste: u64,
}

/// Rectangle packer over a fixed `width` x `height` bin.
#[derive(Debug, Clone)]
pub struct BinPacker {
    width: u32,
    height: u32,
    corners: Vec<Corner>,
}

impl BinPacker {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            corners: vec![
                Corner { x: 0, y: height },
                Corner { x: 0, y: 0 },
                Corner { x: width, y: 0 },
            ],
        }
    }

    pub const fn size(&self) -> PixelSize {
        PixelSize::new(self.width, self.height)
    }

    /// The current frontier as `(x, y)` pairs, sentinels included.
    pub fn frontier(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.corners.iter().map(|c| (c.x, c.y))
    }

    /// Place a rectangle, optionally allowing a 90° rotation.
    ///
    /// When both orientations fit, the one with less waste wins; on a tie
    /// the upright placement is kept.
    pub fn reserve(
        &mut self,
        size: PixelSize,
        allow_rotation: bool,
    ) -> Result<PackedBin, PackError> {
        if size.is_empty() {
            return Err(PackError::EmptyRequest(size));
        }

        let upright = self.best_corner(size);
        // A square looks the same either way; skip the second search.
        let rotated = if allow_rotation && size.width != size.height {
            self.best_corner(size.transposed())
        } else {
            None
        };

        let (candidate, rotation) = match (upright, rotated) {
            (Some(u), Some(r)) if r.waste < u.waste => (r, Rotation::Quarter),
            (Some(u), _) => (u, Rotation::Upright),
            (None, Some(r)) => (r, Rotation::Quarter),
            (None, None) => {
                return Err(PackError::NoSpace {
                    size,
                    bin: self.size(),
                });
            }
        };

        let footprint = match rotation {
            Rotation::Upright => size,
            Rotation::Quarter => size.transposed(),
        };
        let corner = self.corners[candidate.index];
        self.place(corner, footprint);

        Ok(PackedBin {
            x: corner.x,
            y: corner.y,
            size: footprint,
            rotation,
        })
    }

    /// Score every interior corner for a rectangle of `size`, returning the
    /// first one with minimal waste.
    fn best_corner(&self, size: PixelSize) -> Option<Candidate> {
        if size.width > self.width || size.height > self.height {
            return None;
        }

        let corners = &self.corners;
        let last = corners.len() - 1;
        let mut best: Option<Candidate> = None;

        for i in 1..last {
            let corner = corners[i];
            let (Some(right), Some(top)) = (
                corner.x.checked_add(size.width),
                corner.y.checked_add(size.height),
            ) else {
                continue;
            };
            if right > self.width || top > self.height {
                continue;
            }

            let mut waste = 0u64;

            // Area trapped to the left, under the new top edge.
            let mut l = i - 1;
            while l > 0 && corners[l].y < top {
                let step = u64::from(corners[l + 1].x - corners[l].x);
                waste += step * u64::from(top - corners[l].y);
                l -= 1;
            }

            // Area trapped to the right, left of the new right edge.
            let mut r = i + 1;
            while r < last && corners[r].x < right {
                let step = u64::from(corners[r - 1].y - corners[r].y);
                waste += step * u64::from(right - corners[r].x);
                r += 1;
            }

            if best.is_none_or(|b| waste < b.waste) {
                best = Some(Candidate { index: i, waste });
            }
        }

        best
    }

    /// Commit a placement at `corner` and rebuild the frontier around it.
    fn place(&mut self, corner: Corner, footprint: PixelSize) {
        let px = corner.x + footprint.width;
        let py = corner.y + footprint.height;
        let dominated = |c: &Corner| c.x <= px && c.y <= py;

        // x only grows and y only shrinks along the frontier, so the
        // dominated corners form one contiguous run containing `corner`.
        let first = self
            .corners
            .iter()
            .position(dominated)
            .expect("placement corner is always dominated by its own rectangle");
        let run = self.corners[first..].iter().take_while(|c| dominated(c)).count();
        let removed = &self.corners[first..first + run];

        let min_x = removed.iter().map(|c| c.x).min().unwrap_or(corner.x);
        let min_y = removed.iter().map(|c| c.y).min().unwrap_or(corner.y);

        self.corners.splice(
            first..first + run,
            [Corner { x: min_x, y: py }, Corner { x: px, y: min_y }],
        );

        assert!(
            self.frontier_is_valid(),
            "packer frontier invariant broken after placing {footprint} at ({}, {}): {:?}",
            corner.x,
            corner.y,
            self.corners,
        );
    }

    /// Sentinels pinned to the bin edges, x non-decreasing, y non-increasing.
    fn frontier_is_valid(&self) -> bool {
        let (Some(first), Some(last)) = (self.corners.first(), self.corners.last()) else {
            return false;
        };
        first.x == 0
            && first.y == self.height
            && last.x == self.width
            && last.y == 0
            && self
                .corners
                .windows(2)
                .all(|w| w[0].x <= w[1].x && w[0].y >= w[1].y)
    }
}
