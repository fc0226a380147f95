use crate::bounds::BoxSide;
use crate::geometry::{Point, Site};

/// One end of an edge while the sweep is running.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum Endpoint {
    /// Not reached yet; the edge is still traced by a beachline breakpoint.
    #[default]
    Open,
    Fixed(Point),
}

impl Endpoint {
    #[inline]
    pub fn point(self) -> Option<Point> {
        match self {
            Endpoint::Open => None,
            Endpoint::Fixed(p) => Some(p),
        }
    }

    #[inline]
    pub fn is_open(self) -> bool {
        matches!(self, Endpoint::Open)
    }
}

/// Edge under construction.
///
/// `left` and `right` are the two sites the edge separates. Border edges, created when
/// closing cells against the bounding box, have no right site and record the box side
/// instead. `va` is the start point relative to `left`, `vb` the end point.
#[derive(Clone, Debug)]
pub(crate) struct SweepEdge {
    pub left: Site,
    pub right: Option<Site>,
    pub va: Endpoint,
    pub vb: Endpoint,
    pub side: Option<BoxSide>,
}

impl SweepEdge {
    pub fn new(left: Site, right: Site) -> Self {
        SweepEdge {
            left,
            right: Some(right),
            va: Endpoint::Open,
            vb: Endpoint::Open,
            side: None,
        }
    }

    pub fn border(site: Site, va: Point, vb: Point, side: BoxSide) -> Self {
        SweepEdge {
            left: site,
            right: None,
            va: Endpoint::Fixed(va),
            vb: Endpoint::Fixed(vb),
            side: Some(side),
        }
    }

    /// Fixes the start point of the edge as seen from `l_site` looking at `r_site`.
    ///
    /// The first vertex placed on an edge also fixes its orientation: the edge's left
    /// site becomes `l_site`.
    pub fn set_start_point(&mut self, l_site: Site, r_site: Site, vertex: Point) {
        if self.va.is_open() && self.vb.is_open() {
            self.va = Endpoint::Fixed(vertex);
            self.left = l_site;
            self.right = Some(r_site);
        } else if self.left.id == r_site.id {
            self.vb = Endpoint::Fixed(vertex);
        } else {
            self.va = Endpoint::Fixed(vertex);
        }
    }

    pub fn set_end_point(&mut self, l_site: Site, r_site: Site, vertex: Point) {
        self.set_start_point(r_site, l_site, vertex);
    }

    pub fn is_complete(&self) -> bool {
        !self.va.is_open() && !self.vb.is_open()
    }

    /// Drops both endpoints so that every cell prunes its half-edges on this edge.
    pub fn discard(&mut self) {
        self.va = Endpoint::Open;
        self.vb = Endpoint::Open;
    }
}

/// Half-edge under construction: an edge seen from one of its sites.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SweepHalfedge {
    pub edge: usize,
    pub site: Site,
    pub angle: f64,
}

impl SweepHalfedge {
    /// Creates the half-edge of `edge` facing `l_site`.
    ///
    /// The angle sorts half-edges around the site: it is the direction from `l_site` to
    /// `r_site`, or for border edges (no right site) the direction perpendicular to the
    /// segment, which then needs both endpoints.
    pub fn new(edge_id: usize, edge: &SweepEdge, l_site: Site, r_site: Option<Site>) -> Self {
        let angle = match (r_site, edge.va.point(), edge.vb.point()) {
            (Some(r), _, _) => (r.y - l_site.y).atan2(r.x - l_site.x),
            (None, Some(va), Some(vb)) if edge.left.id == l_site.id => (vb.x - va.x).atan2(va.y - vb.y),
            (None, Some(va), Some(vb)) => (va.x - vb.x).atan2(vb.y - va.y),
            (None, _, _) => 0.0,
        };
        SweepHalfedge {
            edge: edge_id,
            site: l_site,
            angle,
        }
    }

    pub fn start_point(&self, edges: &[SweepEdge]) -> Endpoint {
        let edge = &edges[self.edge];
        if edge.left.id == self.site.id { edge.va } else { edge.vb }
    }

    pub fn end_point(&self, edges: &[SweepEdge]) -> Endpoint {
        let edge = &edges[self.edge];
        if edge.left.id == self.site.id { edge.vb } else { edge.va }
    }
}

/// A finished Voronoi edge, clipped to the bounding box.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub(crate) left: Site,
    pub(crate) right: Option<Site>,
    pub(crate) va: Point,
    pub(crate) vb: Point,
    pub(crate) side: Option<BoxSide>,
}

impl Edge {
    /// The site this edge's start point `va` is relative to.
    pub fn left_site(&self) -> Site {
        self.left
    }

    /// The other site, or `None` for border edges.
    pub fn right_site(&self) -> Option<Site> {
        self.right
    }

    pub fn va(&self) -> Point {
        self.va
    }

    pub fn vb(&self) -> Point {
        self.vb
    }

    /// Side of the bounding box a border edge lies on.
    pub fn border_side(&self) -> Option<BoxSide> {
        self.side
    }

    pub fn is_border(&self) -> bool {
        self.right.is_none()
    }

    pub fn length(&self) -> f64 {
        self.va.distance_sq(self.vb).sqrt()
    }
}

/// One side of an [`Edge`], oriented counterclockwise around its cell's site.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Halfedge {
    pub(crate) edge: usize,
    pub(crate) site: usize,
    pub(crate) neighbor: i32,
    pub(crate) angle: f64,
    pub(crate) start: Point,
    pub(crate) end: Point,
}

impl Halfedge {
    /// Index of the underlying edge in [`crate::Diagram::edges`].
    pub fn edge(&self) -> usize {
        self.edge
    }

    /// ID of the site (and cell) this half-edge bounds.
    pub fn site(&self) -> usize {
        self.site
    }

    /// ID of the site across this half-edge, or a negative `BOX_ID_*` for border edges.
    pub fn neighbor(&self) -> i32 {
        self.neighbor
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(id: usize, x: f64, y: f64) -> Site {
        Site { id, index: id, x, y }
    }

    #[test]
    fn test_set_start_point_orients_edge() {
        let a = site(0, 0.0, 0.0);
        let b = site(1, 10.0, 0.0);
        let mut edge = SweepEdge::new(a, b);

        // An end point on a fresh edge flips its orientation.
        edge.set_end_point(a, b, Point::new(5.0, 5.0));
        assert_eq!(edge.left.id, 1);
        assert_eq!(edge.va, Endpoint::Fixed(Point::new(5.0, 5.0)));
        assert!(edge.vb.is_open());

        // Start point relative to `a` is the end relative to `b`.
        edge.set_start_point(a, b, Point::new(5.0, -5.0));
        assert_eq!(edge.vb, Endpoint::Fixed(Point::new(5.0, -5.0)));
        assert!(edge.is_complete());
    }

    #[test]
    fn test_halfedge_endpoints_follow_site() {
        let a = site(0, 0.0, 0.0);
        let b = site(1, 10.0, 0.0);
        let mut edge = SweepEdge::new(a, b);
        edge.set_start_point(a, b, Point::new(5.0, -5.0));
        edge.set_end_point(a, b, Point::new(5.0, 5.0));
        let edges = vec![edge];

        let ha = SweepHalfedge::new(0, &edges[0], a, Some(b));
        let hb = SweepHalfedge::new(0, &edges[0], b, Some(a));
        assert_eq!(ha.start_point(&edges), hb.end_point(&edges));
        assert_eq!(ha.end_point(&edges), hb.start_point(&edges));
        assert!((ha.angle - 0.0).abs() < 1e-12);
        assert!((hb.angle - std::f64::consts::PI).abs() < 1e-12);
    }
}
