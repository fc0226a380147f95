use crate::bounds::{BoundingBox, BoxSide};
use crate::edge::{Halfedge, SweepEdge, SweepHalfedge};
use crate::geometry::{
    equal_with_epsilon, greater_than_with_epsilon, less_than_with_epsilon, Point, Site,
};
use tracing::warn;

/// Border segments a single gap can need: every side once, plus the side it started on.
const MAX_BORDER_STEPS: usize = 5;

/// A Voronoi cell: the polygon of points closer to its site than to any other,
/// clipped to the bounding box.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub(crate) site: Site,
    pub(crate) halfedges: Vec<Halfedge>,
}

impl Cell {
    pub fn id(&self) -> usize {
        self.site.id
    }

    pub fn site(&self) -> Site {
        self.site
    }

    /// Boundary half-edges in counterclockwise order (y pointing down).
    pub fn halfedges(&self) -> &[Halfedge] {
        &self.halfedges
    }

    /// Polygon corners, one per half-edge start point.
    pub fn points(&self) -> Vec<Point> {
        self.halfedges.iter().map(|h| h.start).collect()
    }

    /// Polygon corners as a flat array `[x, y, x, y, ...]`.
    pub fn vertices(&self) -> Vec<f64> {
        self.halfedges.iter().flat_map(|h| [h.start.x, h.start.y]).collect()
    }

    /// Neighbor ID for each half-edge: the adjacent site's ID, or a negative
    /// `BOX_ID_*` constant where the cell touches the bounding box.
    pub fn edge_neighbors(&self) -> Vec<i32> {
        self.halfedges.iter().map(|h| h.neighbor).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.halfedges.is_empty()
    }

    /// True if every half-edge ends where the next one starts, wrapping around.
    pub fn is_closed(&self) -> bool {
        let n = self.halfedges.len();
        n >= 3 && (0..n).all(|i| self.halfedges[i].end.approx_eq(self.halfedges[(i + 1) % n].start))
    }

    pub fn area(&self) -> f64 {
        let n = self.halfedges.len();
        if n < 3 {
            return 0.0;
        }

        let mut area = 0.0;
        for h in &self.halfedges {
            area += h.start.x * h.end.y - h.end.x * h.start.y;
        }
        (area * 0.5).abs()
    }

    /// Area centroid of the polygon; the site itself for degenerate cells.
    pub fn centroid(&self) -> [f64; 2] {
        let n = self.halfedges.len();
        if n < 3 {
            return [self.site.x, self.site.y];
        }

        let mut cx = 0.0;
        let mut cy = 0.0;
        let mut area = 0.0;

        for h in &self.halfedges {
            let (a, b) = (h.start, h.end);
            let cross = a.x * b.y - b.x * a.y;
            area += cross;
            cx += (a.x + b.x) * cross;
            cy += (a.y + b.y) * cross;
        }

        if area.abs() < 1e-9 {
            return [self.site.x, self.site.y];
        }

        let factor = 1.0 / (3.0 * area);
        [cx * factor, cy * factor]
    }
}

/// A cell while the sweep is running.
#[derive(Clone, Debug)]
pub(crate) struct SweepCell {
    pub site: Site,
    pub halfedges: Vec<SweepHalfedge>,
}

impl SweepCell {
    pub fn new(site: Site) -> Self {
        SweepCell {
            site,
            halfedges: Vec::new(),
        }
    }

    /// Drops half-edges on incomplete edges and sorts the rest by descending angle,
    /// i.e. counterclockwise. Returns the number of half-edges left.
    pub fn prepare(&mut self, edges: &[SweepEdge]) -> usize {
        self.halfedges.retain(|h| edges[h.edge].is_complete());
        self.halfedges.sort_by(|a, b| b.angle.total_cmp(&a.angle));
        self.halfedges.len()
    }

    fn push_border(&mut self, at: usize, edges: &mut Vec<SweepEdge>, va: Point, vb: Point, side: BoxSide) {
        let edge_id = edges.len();
        edges.push(SweepEdge::border(self.site, va, vb, side));
        let halfedge = SweepHalfedge::new(edge_id, &edges[edge_id], self.site, None);
        self.halfedges.insert(at, halfedge);
    }

    /// Turns a cell whose site sees no edge inside the box into the whole box.
    fn enclose(&mut self, edges: &mut Vec<SweepEdge>, bbox: &BoundingBox) {
        let [tl, bl, br, tr] = bbox.corners();
        let sides = [
            (tl, bl, BoxSide::Left),
            (bl, br, BoxSide::Bottom),
            (br, tr, BoxSide::Right),
            (tr, tl, BoxSide::Top),
        ];
        for (va, vb, side) in sides {
            let at = self.halfedges.len();
            self.push_border(at, edges, va, vb, side);
        }
    }

    /// Fills every gap between consecutive half-edges by walking the box perimeter
    /// counterclockwise (left, bottom, right, top) from the gap's start to its end.
    fn close(&mut self, edges: &mut Vec<SweepEdge>, bbox: &BoundingBox) {
        let (xl, xr, yt, yb) = (bbox.xl(), bbox.xr(), bbox.yt(), bbox.yb());
        let mut n = self.halfedges.len();
        let mut i_left = 0;
        let mut steps = 0;

        while i_left < n {
            let i_right = (i_left + 1) % n;
            let end = self.halfedges[i_left].end_point(edges).point();
            let start = self.halfedges[i_right].start_point(edges).point();
            let (Some(end), Some(start)) = (end, start) else {
                i_left += 1;
                continue;
            };

            if end.approx_eq(start) {
                steps = 0;
                i_left += 1;
                continue;
            }

            let step = if equal_with_epsilon(end.x, xl) && less_than_with_epsilon(end.y, yb) {
                let y = if equal_with_epsilon(start.x, xl) { start.y } else { yb };
                Some((Point::new(xl, y), BoxSide::Left))
            } else if equal_with_epsilon(end.y, yb) && less_than_with_epsilon(end.x, xr) {
                let x = if equal_with_epsilon(start.y, yb) { start.x } else { xr };
                Some((Point::new(x, yb), BoxSide::Bottom))
            } else if equal_with_epsilon(end.x, xr) && greater_than_with_epsilon(end.y, yt) {
                let y = if equal_with_epsilon(start.x, xr) { start.y } else { yt };
                Some((Point::new(xr, y), BoxSide::Right))
            } else if equal_with_epsilon(end.y, yt) && greater_than_with_epsilon(end.x, xl) {
                let x = if equal_with_epsilon(start.y, yt) { start.x } else { xl };
                Some((Point::new(x, yt), BoxSide::Top))
            } else {
                None
            };

            match step {
                Some(_) if steps >= MAX_BORDER_STEPS => {
                    warn!(site = self.site.id, "gave up closing cell along the bounding box");
                    return;
                }
                Some((vb, side)) => {
                    self.push_border(i_left + 1, edges, end, vb, side);
                    n += 1;
                    steps += 1;
                }
                None => {
                    warn!(site = self.site.id, x = end.x, y = end.y, "open cell boundary is not on the bounding box");
                }
            }
            i_left += 1;
        }
    }
}

/// Prepares every cell and closes it against the bounding box. Border edges created
/// on the way are appended to `edges`.
pub(crate) fn close_cells(cells: &mut [SweepCell], edges: &mut Vec<SweepEdge>, bbox: &BoundingBox) {
    for cell in cells.iter_mut().rev() {
        if cell.prepare(edges) == 0 {
            if bbox.contains(cell.site.point()) {
                cell.enclose(edges, bbox);
            }
            continue;
        }
        cell.close(edges, bbox);
    }
}
