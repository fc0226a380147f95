/// Tolerance for breakpoint, vertex and closure comparisons.
pub const EPSILON: f64 = 1e-9;

/// Orientation tolerance below which three beachline sites are not treated as converging.
/// Smaller values let near-collinear triples schedule circle events with huge radii.
pub(crate) const CIRCLE_EVENT_TOLERANCE: f64 = 2e-12;

/// A position in the plane.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Equality within [`EPSILON`] on both axes.
    pub fn approx_eq(&self, other: Point) -> bool {
        equal_with_epsilon(self.x, other.x) && equal_with_epsilon(self.y, other.y)
    }

    pub fn distance_sq(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl From<[f64; 2]> for Point {
    fn from(p: [f64; 2]) -> Self {
        Point::new(p[0], p[1])
    }
}

impl From<(f64, f64)> for Point {
    fn from(p: (f64, f64)) -> Self {
        Point::new(p.0, p.1)
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// A processed input point.
///
/// `id` is assigned sequentially while sweeping and doubles as the index of the
/// site's cell; `index` is the position of the point in the caller's input.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Site {
    pub id: usize,
    pub index: usize,
    pub x: f64,
    pub y: f64,
}

impl Site {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[inline]
pub(crate) fn equal_with_epsilon(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

#[inline]
pub(crate) fn greater_than_with_epsilon(a: f64, b: f64) -> bool {
    a - b > EPSILON
}

#[inline]
pub(crate) fn less_than_with_epsilon(a: f64, b: f64) -> bool {
    b - a > EPSILON
}
