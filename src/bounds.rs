use crate::error::{Result, VoronoiError};
use crate::geometry::Point;

/// Bounding box ID for the left side (x-min), it is negative to prevent conflicts with site IDs.
pub const BOX_ID_LEFT: i32 = -1;
/// Bounding box ID for the right side (x-max), it is negative to prevent conflicts with site IDs.
pub const BOX_ID_RIGHT: i32 = -2;
/// Bounding box ID for the top side (y-min), it is negative to prevent conflicts with site IDs.
pub const BOX_ID_TOP: i32 = -3;
/// Bounding box ID for the bottom side (y-max), it is negative to prevent conflicts with site IDs.
pub const BOX_ID_BOTTOM: i32 = -4;

/// Axis-aligned clipping rectangle of a diagram.
///
/// The y axis points down, as on a screen: `yt` (top) is the smaller y value and
/// `yb` (bottom) the larger one.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl BoundingBox {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Self { min, max }
    }

    /// Builds the box from its four sides.
    pub fn from_edges(xl: f64, xr: f64, yt: f64, yb: f64) -> Self {
        Self { min: [xl, yt], max: [xr, yb] }
    }

    #[inline]
    pub fn xl(&self) -> f64 {
        self.min[0]
    }

    #[inline]
    pub fn xr(&self) -> f64 {
        self.max[0]
    }

    #[inline]
    pub fn yt(&self) -> f64 {
        self.min[1]
    }

    #[inline]
    pub fn yb(&self) -> f64 {
        self.max[1]
    }

    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Checks that the box is finite and not degenerate.
    pub fn validate(&self) -> Result<()> {
        let finite = self.min.iter().chain(self.max.iter()).all(|v| v.is_finite());
        if !finite || self.xl() >= self.xr() || self.yt() >= self.yb() {
            return Err(VoronoiError::InvalidBounds {
                xl: self.xl(),
                xr: self.xr(),
                yt: self.yt(),
                yb: self.yb(),
            });
        }
        Ok(())
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.xl() && p.x <= self.xr() && p.y >= self.yt() && p.y <= self.yb()
    }

    /// The four corners in the order the cell closer walks the perimeter:
    /// top-left, bottom-left, bottom-right, top-right.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.xl(), self.yt()),
            Point::new(self.xl(), self.yb()),
            Point::new(self.xr(), self.yb()),
            Point::new(self.xr(), self.yt()),
        ]
    }
}

/// One side of the bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoxSide {
    Left,
    Bottom,
    Right,
    Top,
}

impl BoxSide {
    /// Negative neighbor ID used for half-edges lying on this side.
    pub fn id(self) -> i32 {
        match self {
            BoxSide::Left => box_side(0, false),
            BoxSide::Right => box_side(0, true),
            BoxSide::Top => box_side(1, false),
            BoxSide::Bottom => box_side(1, true),
        }
    }

    pub fn from_id(id: i32) -> Option<BoxSide> {
        match id {
            BOX_ID_LEFT => Some(BoxSide::Left),
            BOX_ID_RIGHT => Some(BoxSide::Right),
            BOX_ID_TOP => Some(BoxSide::Top),
            BOX_ID_BOTTOM => Some(BoxSide::Bottom),
            _ => None,
        }
    }
}

/// Calculates the ID for a bounding box side based on the axis and direction.
///
/// The IDs start at -1 and decrease.
/// - Axis 0 (X) Min: -1
/// - Axis 0 (X) Max: -2
/// - Axis 1 (Y) Min: -3
/// - Axis 1 (Y) Max: -4
pub fn box_side(axis: usize, is_max: bool) -> i32 {
    -1 - (axis * 2 + if is_max { 1 } else { 0 }) as i32
}
