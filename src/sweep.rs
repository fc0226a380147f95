//! Fortune's sweep over site and circle events.
//!
//! The sweep line moves from small to large y. The beachline is an [`RbTree`] of arcs
//! ordered left to right; pending circle events live in a second tree ordered by
//! `(y, x)`, with `first_circle_event` caching its head.

use crate::bounds::BoundingBox;
use crate::cell::{close_cells, SweepCell};
use crate::clip::clip_edges;
use crate::diagram::Diagram;
use crate::edge::{SweepEdge, SweepHalfedge};
use crate::error::{Result, VoronoiError};
use crate::geometry::{Point, Site, CIRCLE_EVENT_TOLERANCE, EPSILON};
use crate::tree::{NodeId, RbTree};
use std::collections::VecDeque;
use tracing::{debug, trace};

/// A visible parabola segment on the beachline.
#[derive(Clone, Debug)]
struct BeachArc {
    site: Site,
    /// Edge traced by the breakpoint on this arc's left.
    edge: Option<usize>,
    circle_event: Option<NodeId>,
}

/// Predicted collapse of `arc`: its neighbors' breakpoints meet at `(x, ycenter)`
/// when the sweep line reaches `y`, the bottom of their circumcircle.
#[derive(Clone, Debug)]
struct CircleEvent {
    arc: NodeId,
    site: Site,
    x: f64,
    y: f64,
    ycenter: f64,
}

/// State of one diagram computation.
///
/// An engine is consumed by [`SweepEngine::compute`]; run independent engines to build
/// several diagrams concurrently.
#[derive(Default)]
pub struct SweepEngine {
    beachline: RbTree<BeachArc>,
    circle_events: RbTree<CircleEvent>,
    first_circle_event: Option<NodeId>,
    edges: Vec<SweepEdge>,
    cells: Vec<SweepCell>,
}

impl SweepEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the diagram of `sites` clipped to `bbox`.
    ///
    /// Sites are processed in sweep order. A site equal to the site processed just
    /// before it is skipped and gets no cell; non-adjacent duplicates are not detected.
    pub fn compute(mut self, sites: &[Point], bbox: BoundingBox) -> Result<Diagram> {
        let stopwatch = Stopwatch::start();
        bbox.validate()?;
        if let Some((index, p)) = sites.iter().enumerate().find(|(_, p)| !p.is_finite()) {
            return Err(VoronoiError::NonFiniteSite { index, x: p.x, y: p.y });
        }

        let mut order: Vec<usize> = (0..sites.len()).collect();
        order.sort_by(|&a, &b| sites[a].y.total_cmp(&sites[b].y).then(sites[a].x.total_cmp(&sites[b].x)));

        // A beachline holds at most 2n - 1 arcs.
        self.beachline = RbTree::with_capacity(2 * sites.len());
        self.cells.reserve(sites.len());
        self.edges.reserve(sites.len() * 3);
        let mut site_ids = vec![None; sites.len()];
        let mut pending = order.into_iter().peekable();
        let mut last: Option<Point> = None;

        loop {
            let circle = self.first_circle_event.map(|id| self.circle_events.get(id));
            let site_first = match (pending.peek(), circle) {
                (Some(&i), Some(c)) => {
                    let p = sites[i];
                    p.y < c.y || (p.y == c.y && p.x < c.x)
                }
                (Some(_), None) => true,
                (None, _) => false,
            };

            if site_first {
                let Some(index) = pending.next() else {
                    break;
                };
                let p = sites[index];
                if last == Some(p) {
                    trace!(index, x = p.x, y = p.y, "skipping duplicate site");
                    continue;
                }
                let site = Site {
                    id: self.cells.len(),
                    index,
                    x: p.x,
                    y: p.y,
                };
                self.cells.push(SweepCell::new(site));
                site_ids[index] = Some(site.id);
                self.add_beachsection(site)?;
                last = Some(p);
            } else if let Some(first) = self.first_circle_event {
                let arc = self.circle_events.get(first).arc;
                self.remove_beachsection(arc)?;
            } else {
                break;
            }
        }

        trace!(arcs = self.beachline.len(), edges = self.edges.len(), "sweep finished");
        let discarded = clip_edges(&mut self.edges, &bbox);
        close_cells(&mut self.cells, &mut self.edges, &bbox);

        let diagram = Diagram::assemble(sites.to_vec(), site_ids, self.cells, self.edges, stopwatch.elapsed());
        debug!(
            sites = sites.len(),
            cells = diagram.cells.len(),
            edges = diagram.edges.len(),
            discarded,
            elapsed = ?diagram.exec_time,
            "computed voronoi diagram"
        );
        Ok(diagram)
    }

    fn create_edge(&mut self, l_site: Site, r_site: Site, va: Option<Point>, vb: Option<Point>) -> usize {
        let mut edge = SweepEdge::new(l_site, r_site);
        if let Some(va) = va {
            edge.set_start_point(l_site, r_site, va);
        }
        if let Some(vb) = vb {
            edge.set_end_point(l_site, r_site, vb);
        }
        let id = self.edges.len();
        let left = SweepHalfedge::new(id, &edge, l_site, Some(r_site));
        let right = SweepHalfedge::new(id, &edge, r_site, Some(l_site));
        self.edges.push(edge);
        self.cells[l_site.id].halfedges.push(left);
        self.cells[r_site.id].halfedges.push(right);
        id
    }

    fn create_beachsection(&mut self, site: Site) -> NodeId {
        self.beachline.alloc(BeachArc {
            site,
            edge: None,
            circle_event: None,
        })
    }

    /// x of the breakpoint between `arc` and its left neighbor for the given directrix.
    fn left_break_point(&self, arc: NodeId, directrix: f64) -> f64 {
        let site = self.beachline.get(arc).site;
        let (rfocx, rfocy) = (site.x, site.y);
        let pby2 = rfocy - directrix;
        // parabola degenerates into a vertical ray when the focus is on the directrix
        if pby2 == 0.0 {
            return rfocx;
        }

        let Some(l_arc) = self.beachline.previous(arc) else {
            return f64::NEG_INFINITY;
        };
        let site = self.beachline.get(l_arc).site;
        let (lfocx, lfocy) = (site.x, site.y);
        let plby2 = lfocy - directrix;
        if plby2 == 0.0 {
            return lfocx;
        }

        // Origin moved to the right focus to limit cancellation.
        let hl = lfocx - rfocx;
        let aby2 = 1.0 / pby2 - 1.0 / plby2;
        let b = hl / plby2;
        if aby2 != 0.0 {
            let disc = b * b - 2.0 * aby2 * (hl * hl / (-2.0 * plby2) - lfocy + plby2 / 2.0 + rfocy - pby2 / 2.0);
            return (-b + disc.sqrt()) / aby2 + rfocx;
        }
        // same distance to the directrix: breakpoint is midway
        (rfocx + lfocx) / 2.0
    }

    fn right_break_point(&self, arc: NodeId, directrix: f64) -> f64 {
        if let Some(r_arc) = self.beachline.next(arc) {
            return self.left_break_point(r_arc, directrix);
        }
        let site = self.beachline.get(arc).site;
        if site.y == directrix { site.x } else { f64::INFINITY }
    }

    fn detach_beachsection(&mut self, arc: NodeId) {
        self.detach_circle_event(arc);
        self.beachline.remove_node(arc);
        self.beachline.release(arc);
    }

    fn remove_beachsection(&mut self, arc: NodeId) -> Result<()> {
        let event = self
            .beachline
            .get(arc)
            .circle_event
            .ok_or(VoronoiError::BeachlineInvariant("collapsing arc has no circle event"))?;
        let (x, y) = {
            let e = self.circle_events.get(event);
            (e.x, e.ycenter)
        };
        let vertex = Point::new(x, y);
        let previous = self.beachline.previous(arc);
        let next = self.beachline.next(arc);

        // (site, edge) of every arc around the vertex, left to right. The first and
        // last entries are the surviving neighbors.
        let mut transitions = VecDeque::new();
        let snapshot = |tree: &RbTree<BeachArc>, id: NodeId| {
            let a = tree.get(id);
            (a.site, a.edge)
        };
        transitions.push_back(snapshot(&self.beachline, arc));
        self.detach_beachsection(arc);

        // More than three edges can meet at the vertex: collapse every neighbor whose
        // own circle event converges to the same point.
        let mut l_arc = previous.ok_or(VoronoiError::BeachlineInvariant("collapsing arc has no left neighbor"))?;
        while self.converges_at(l_arc, x, y) {
            let previous = self
                .beachline
                .previous(l_arc)
                .ok_or(VoronoiError::BeachlineInvariant("collapsing arc has no left neighbor"))?;
            transitions.push_front(snapshot(&self.beachline, l_arc));
            self.detach_beachsection(l_arc);
            l_arc = previous;
        }
        transitions.push_front(snapshot(&self.beachline, l_arc));
        self.detach_circle_event(l_arc);

        let mut r_arc = next.ok_or(VoronoiError::BeachlineInvariant("collapsing arc has no right neighbor"))?;
        while self.converges_at(r_arc, x, y) {
            let next = self
                .beachline
                .next(r_arc)
                .ok_or(VoronoiError::BeachlineInvariant("collapsing arc has no right neighbor"))?;
            transitions.push_back(snapshot(&self.beachline, r_arc));
            self.detach_beachsection(r_arc);
            r_arc = next;
        }
        transitions.push_back(snapshot(&self.beachline, r_arc));
        self.detach_circle_event(r_arc);

        // Every vanishing transition ends its edge at the vertex.
        for i in 1..transitions.len() {
            let (l_site, _) = transitions[i - 1];
            let (r_site, edge) = transitions[i];
            if let Some(edge) = edge {
                self.edges[edge].set_start_point(l_site, r_site, vertex);
            }
        }

        // The surviving neighbors are now adjacent: a new edge starts at the vertex.
        let (l_site, _) = transitions[0];
        let (r_site, _) = transitions[transitions.len() - 1];
        let edge = self.create_edge(l_site, r_site, None, Some(vertex));
        self.beachline.get_mut(r_arc).edge = Some(edge);

        self.attach_circle_event(l_arc);
        self.attach_circle_event(r_arc);
        Ok(())
    }

    fn converges_at(&self, arc: NodeId, x: f64, y: f64) -> bool {
        self.beachline.get(arc).circle_event.is_some_and(|id| {
            let e = self.circle_events.get(id);
            (x - e.x).abs() < EPSILON && (y - e.ycenter).abs() < EPSILON
        })
    }

    fn add_beachsection(&mut self, site: Site) -> Result<()> {
        let x = site.x;
        let directrix = site.y;

        // Find the arcs the new one falls between.
        let mut node = self.beachline.root();
        let mut l_arc = None;
        let mut r_arc = None;
        while let Some(n) = node {
            let dxl = self.left_break_point(n, directrix) - x;
            if dxl > EPSILON {
                // left of this arc's left breakpoint
                match self.beachline.left(n) {
                    Some(left) => node = Some(left),
                    None => {
                        r_arc = Some(n);
                        break;
                    }
                }
                continue;
            }
            let dxr = x - self.right_break_point(n, directrix);
            if dxr > EPSILON {
                // right of this arc's right breakpoint
                match self.beachline.right(n) {
                    Some(right) => node = Some(right),
                    None => {
                        l_arc = Some(n);
                        break;
                    }
                }
                continue;
            }
            if dxl > -EPSILON {
                // on the left breakpoint
                l_arc = self.beachline.previous(n);
                r_arc = Some(n);
            } else if dxr > -EPSILON {
                // on the right breakpoint
                l_arc = Some(n);
                r_arc = self.beachline.next(n);
            } else {
                // strictly inside
                l_arc = Some(n);
                r_arc = Some(n);
            }
            break;
        }

        match (l_arc, r_arc) {
            // First arc on the beachline.
            (None, None) => {
                let new_arc = self.create_beachsection(site);
                self.beachline.insert_successor(None, new_arc);
            }
            // Sweep order always leaves an arc to the left of a new site.
            (None, Some(_)) => {
                return Err(VoronoiError::BeachlineInvariant("new arc has a right neighbor but no left neighbor"));
            }
            // Split an existing arc in two around the new one.
            (Some(l), Some(r)) if l == r => {
                self.detach_circle_event(l);
                let l_site = self.beachline.get(l).site;

                let new_arc = self.create_beachsection(site);
                self.beachline.insert_successor(Some(l), new_arc);
                let r = self.create_beachsection(l_site);
                self.beachline.insert_successor(Some(new_arc), r);

                let edge = self.create_edge(l_site, site, None, None);
                self.beachline.get_mut(new_arc).edge = Some(edge);
                self.beachline.get_mut(r).edge = Some(edge);

                self.attach_circle_event(l);
                self.attach_circle_event(r);
            }
            // New rightmost arc: only happens while every arc so far shares the new
            // site's y.
            (Some(l), None) => {
                let l_site = self.beachline.get(l).site;
                let new_arc = self.create_beachsection(site);
                self.beachline.insert_successor(Some(l), new_arc);
                let edge = self.create_edge(l_site, site, None, None);
                self.beachline.get_mut(new_arc).edge = Some(edge);
            }
            // Exactly on the breakpoint of two arcs: that transition ends here, at the
            // circumcenter of the left, new and right sites.
            (Some(l), Some(r)) => {
                self.detach_circle_event(l);
                self.detach_circle_event(r);

                let new_arc = self.create_beachsection(site);
                self.beachline.insert_successor(Some(l), new_arc);

                let l_site = self.beachline.get(l).site;
                let r_site = self.beachline.get(r).site;
                let (ax, ay) = (l_site.x, l_site.y);
                let (bx, by) = (site.x - ax, site.y - ay);
                let (cx, cy) = (r_site.x - ax, r_site.y - ay);
                let d = 2.0 * (bx * cy - by * cx);
                let hb = bx * bx + by * by;
                let hc = cx * cx + cy * cy;
                let vertex = Point::new((cy * hb - by * hc) / d + ax, (bx * hc - cx * hb) / d + ay);

                if let Some(edge) = self.beachline.get(r).edge {
                    self.edges[edge].set_start_point(l_site, r_site, vertex);
                }

                let left_edge = self.create_edge(l_site, site, None, Some(vertex));
                self.beachline.get_mut(new_arc).edge = Some(left_edge);
                let right_edge = self.create_edge(site, r_site, None, Some(vertex));
                self.beachline.get_mut(r).edge = Some(right_edge);

                self.attach_circle_event(l);
                self.attach_circle_event(r);
            }
        }
        Ok(())
    }

    fn attach_circle_event(&mut self, arc: NodeId) {
        let (Some(l_arc), Some(r_arc)) = (self.beachline.previous(arc), self.beachline.next(arc)) else {
            return;
        };
        let l_site = self.beachline.get(l_arc).site;
        let c_site = self.beachline.get(arc).site;
        let r_site = self.beachline.get(r_arc).site;

        // Same site on both sides: the breakpoints diverge.
        if l_site.id == r_site.id {
            return;
        }

        // Circumcircle with the origin moved to the center site. Its bottom is the
        // event, its center a potential vertex.
        let (bx, by) = (c_site.x, c_site.y);
        let (ax, ay) = (l_site.x - bx, l_site.y - by);
        let (cx, cy) = (r_site.x - bx, r_site.y - by);

        // d is minus twice the signed area: only clockwise triples converge.
        let d = 2.0 * (ax * cy - ay * cx);
        if d >= -CIRCLE_EVENT_TOLERANCE {
            return;
        }

        let ha = ax * ax + ay * ay;
        let hc = cx * cx + cy * cy;
        let x = (cy * ha - ay * hc) / d;
        let y = (ax * hc - cx * ha) / d;
        let ycenter = y + by;

        let event = CircleEvent {
            arc,
            site: c_site,
            x: x + bx,
            y: ycenter + (x * x + y * y).sqrt(),
            ycenter,
        };

        // Insertion point: events are ordered by ascending (y, x).
        let mut predecessor = None;
        let mut node = self.circle_events.root();
        while let Some(n) = node {
            let other = self.circle_events.get(n);
            if event.y < other.y || (event.y == other.y && event.x <= other.x) {
                match self.circle_events.left(n) {
                    Some(left) => node = Some(left),
                    None => {
                        predecessor = self.circle_events.previous(n);
                        break;
                    }
                }
            } else {
                match self.circle_events.right(n) {
                    Some(right) => node = Some(right),
                    None => {
                        predecessor = Some(n);
                        break;
                    }
                }
            }
        }

        trace!(site = event.site.id, x = event.x, y = event.y, "scheduling circle event");
        let id = self.circle_events.alloc(event);
        self.circle_events.insert_successor(predecessor, id);
        if predecessor.is_none() {
            self.first_circle_event = Some(id);
        }
        self.beachline.get_mut(arc).circle_event = Some(id);
    }

    fn detach_circle_event(&mut self, arc: NodeId) {
        let Some(event) = self.beachline.get_mut(arc).circle_event.take() else {
            return;
        };
        if self.circle_events.previous(event).is_none() {
            self.first_circle_event = self.circle_events.next(event);
        }
        self.circle_events.remove_node(event);
        self.circle_events.release(event);
    }
}

/// Wall-clock timer; `Instant` is unavailable on wasm32.
struct Stopwatch {
    #[cfg(not(target_arch = "wasm32"))]
    start: std::time::Instant,
    #[cfg(target_arch = "wasm32")]
    start: f64,
}

impl Stopwatch {
    fn start() -> Self {
        Stopwatch {
            #[cfg(not(target_arch = "wasm32"))]
            start: std::time::Instant::now(),
            #[cfg(target_arch = "wasm32")]
            start: js_sys::Date::now(),
        }
    }

    fn elapsed(&self) -> std::time::Duration {
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.start.elapsed()
        }
        #[cfg(target_arch = "wasm32")]
        {
            std::time::Duration::from_secs_f64(((js_sys::Date::now() - self.start) / 1000.0).max(0.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox() -> BoundingBox {
        BoundingBox::from_edges(0.0, 400.0, 0.0, 400.0)
    }

    #[test]
    fn test_breakpoint_between_equal_height_sites() {
        let mut engine = SweepEngine::new();
        let a = Site { id: 0, index: 0, x: 100.0, y: 100.0 };
        let b = Site { id: 1, index: 1, x: 300.0, y: 100.0 };
        engine.cells.push(SweepCell::new(a));
        engine.cells.push(SweepCell::new(b));
        engine.add_beachsection(a).unwrap();
        engine.add_beachsection(b).unwrap();

        let arcs: Vec<usize> = engine.beachline.iter().map(|arc| arc.site.id).collect();
        assert_eq!(arcs, vec![0, 1]);
        let right = engine.beachline.next(engine.beachline.first(engine.beachline.root().unwrap())).unwrap();
        assert!((engine.left_break_point(right, 300.0) - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_split_arc_schedules_no_event_for_two_sites() {
        let mut engine = SweepEngine::new();
        let a = Site { id: 0, index: 0, x: 200.0, y: 100.0 };
        let b = Site { id: 1, index: 1, x: 150.0, y: 200.0 };
        engine.cells.push(SweepCell::new(a));
        engine.cells.push(SweepCell::new(b));
        engine.add_beachsection(a).unwrap();
        engine.add_beachsection(b).unwrap();

        let arcs: Vec<usize> = engine.beachline.iter().map(|arc| arc.site.id).collect();
        assert_eq!(arcs, vec![0, 1, 0]);
        assert_eq!(engine.edges.len(), 1);
        assert!(engine.circle_events.is_empty());
        assert_eq!(engine.first_circle_event, None);
    }

    #[test]
    fn test_site_on_breakpoint_starts_two_edges_at_circumcenter() {
        let mut engine = SweepEngine::new();
        let sites = [
            Site { id: 0, index: 0, x: 100.0, y: 100.0 },
            Site { id: 1, index: 1, x: 300.0, y: 100.0 },
            // straight below the breakpoint x = 200 of the first two arcs
            Site { id: 2, index: 2, x: 200.0, y: 300.0 },
        ];
        for s in sites {
            engine.cells.push(SweepCell::new(s));
            engine.add_beachsection(s).unwrap();
        }

        let arcs: Vec<usize> = engine.beachline.iter().map(|arc| arc.site.id).collect();
        assert_eq!(arcs, vec![0, 2, 1]);
        assert_eq!(engine.edges.len(), 3);

        let vertex = Point::new(200.0, 175.0);
        let transition = &engine.edges[0];
        assert_eq!((transition.left.id, transition.right.map(|s| s.id)), (0, Some(1)));
        assert!(transition.va.point().is_some_and(|p| p.approx_eq(vertex)));
        assert!(transition.vb.is_open());
        for edge in &engine.edges[1..] {
            assert!(edge.va.point().is_some_and(|p| p.approx_eq(vertex)));
            assert!(edge.vb.is_open());
        }
        assert_eq!(engine.edges[1].right.map(|s| s.id), Some(0));
        assert_eq!(engine.edges[2].right.map(|s| s.id), Some(2));
        assert_eq!(engine.cells[2].halfedges.len(), 2);
    }

    #[test]
    fn test_circle_event_queue_head_tracks_earliest() {
        let mut engine = SweepEngine::new();
        let sites = [
            Site { id: 0, index: 0, x: 200.0, y: 50.0 },
            Site { id: 1, index: 1, x: 100.0, y: 100.0 },
            Site { id: 2, index: 2, x: 300.0, y: 120.0 },
        ];
        for s in sites {
            engine.cells.push(SweepCell::new(s));
            engine.add_beachsection(s).unwrap();
        }
        let head = engine.first_circle_event.expect("a circle event is pending");
        let head_y = engine.circle_events.get(head).y;
        assert!(engine.circle_events.iter().all(|e| e.y >= head_y));
        assert!(engine.circle_events.previous(head).is_none());
    }

    #[test]
    fn test_rejects_non_finite_site() {
        let err = SweepEngine::new()
            .compute(&[Point::new(1.0, 1.0), Point::new(f64::NAN, 2.0)], bbox())
            .unwrap_err();
        assert!(matches!(err, VoronoiError::NonFiniteSite { index: 1, x, y } if x.is_nan() && y == 2.0));
    }

    #[test]
    fn test_rejects_invalid_bounds() {
        let err = SweepEngine::new()
            .compute(&[Point::new(1.0, 1.0)], BoundingBox::from_edges(5.0, 1.0, 0.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, VoronoiError::InvalidBounds { .. }));
    }

    #[test]
    fn test_empty_input() {
        let diagram = SweepEngine::new().compute(&[], bbox()).unwrap();
        assert!(diagram.cells().is_empty());
        assert!(diagram.edges().is_empty());
    }
}
