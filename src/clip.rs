//! Connecting dangling edges to the bounding box and clipping them against it.

use crate::bounds::{BoundingBox, BoxSide};
use crate::edge::{Endpoint, SweepEdge};
use crate::geometry::{Point, EPSILON};

/// Gives an edge with an open end point a finite segment reaching the bounding box.
///
/// The open end (and the start, if also open) is placed where the perpendicular
/// bisector of the edge's two sites leaves the box, on the side its direction points
/// to. Returns `false` when the edge cannot reach the box, in which case it is left
/// untouched.
pub(crate) fn connect_edge(edge: &mut SweepEdge, bbox: &BoundingBox) -> bool {
    if !edge.vb.is_open() {
        return true;
    }
    let Some(r_site) = edge.right else {
        return false;
    };

    let mut va = edge.va.point();
    let (xl, xr, yt, yb) = (bbox.xl(), bbox.xr(), bbox.yt(), bbox.yb());
    let (lx, ly) = (edge.left.x, edge.left.y);
    let (rx, ry) = (r_site.x, r_site.y);
    let fx = (lx + rx) / 2.0;
    let fy = (ly + ry) / 2.0;

    // Slope and intercept of the bisector, unless it is vertical.
    let line = (ry != ly).then(|| {
        let fm = (lx - rx) / (ry - ly);
        (fm, fy - fm * fx)
    });

    // Relative to the left site the bisector points
    //   downward when left.x > right.x, upward otherwise,
    //   rightward when left.y < right.y, leftward otherwise.
    let vb = match line {
        None => {
            if fx < xl || fx >= xr {
                return false;
            }
            if lx > rx {
                match va {
                    None => va = Some(Point::new(fx, yt)),
                    Some(a) if a.y >= yb => return false,
                    Some(_) => {}
                }
                Point::new(fx, yb)
            } else {
                match va {
                    None => va = Some(Point::new(fx, yb)),
                    Some(a) if a.y < yt => return false,
                    Some(_) => {}
                }
                Point::new(fx, yt)
            }
        }
        // Closer to vertical than horizontal: connect to the top or bottom side.
        Some((fm, fb)) if !(-1.0..=1.0).contains(&fm) => {
            if lx > rx {
                match va {
                    None => va = Some(Point::new((yt - fb) / fm, yt)),
                    Some(a) if a.y >= yb => return false,
                    Some(_) => {}
                }
                Point::new((yb - fb) / fm, yb)
            } else {
                match va {
                    None => va = Some(Point::new((yb - fb) / fm, yb)),
                    Some(a) if a.y < yt => return false,
                    Some(_) => {}
                }
                Point::new((yt - fb) / fm, yt)
            }
        }
        // Closer to horizontal than vertical: connect to the left or right side.
        Some((fm, fb)) => {
            if ly < ry {
                match va {
                    None => va = Some(Point::new(xl, fm * xl + fb)),
                    Some(a) if a.x >= xr => return false,
                    Some(_) => {}
                }
                Point::new(xr, fm * xr + fb)
            } else {
                match va {
                    None => va = Some(Point::new(xr, fm * xr + fb)),
                    Some(a) if a.x < xl => return false,
                    Some(_) => {}
                }
                Point::new(xl, fm * xl + fb)
            }
        }
    };

    if let Some(va) = va {
        edge.va = Endpoint::Fixed(va);
    }
    edge.vb = Endpoint::Fixed(vb);
    true
}

/// Liang-Barsky clip of a complete edge against the bounding box.
///
/// Returns `false` if the segment lies wholly outside. Clipped ends get fresh points
/// placed exactly on the side that cut them; the unclipped vertex may be shared with
/// other edges.
pub(crate) fn clip_edge(edge: &mut SweepEdge, bbox: &BoundingBox) -> bool {
    let (Some(a), Some(b)) = (edge.va.point(), edge.vb.point()) else {
        return false;
    };
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    let mut entry = None;
    let mut exit = None;

    // (p, q) per side: the segment is inside that side where p * t <= q.
    let sides = [
        (-dx, a.x - bbox.xl(), BoxSide::Left),
        (dx, bbox.xr() - a.x, BoxSide::Right),
        (-dy, a.y - bbox.yt(), BoxSide::Top),
        (dy, bbox.yb() - a.y, BoxSide::Bottom),
    ];
    for (p, q, side) in sides {
        if p == 0.0 {
            if q < 0.0 {
                return false;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            // entering
            if r > t1 {
                return false;
            }
            if r > t0 {
                t0 = r;
                entry = Some(side);
            }
        } else {
            // leaving
            if r < t0 {
                return false;
            }
            if r < t1 {
                t1 = r;
                exit = Some(side);
            }
        }
    }

    if let Some(side) = entry {
        edge.va = Endpoint::Fixed(snap_to_side(Point::new(a.x + t0 * dx, a.y + t0 * dy), side, bbox));
    }
    if let Some(side) = exit {
        edge.vb = Endpoint::Fixed(snap_to_side(Point::new(a.x + t1 * dx, a.y + t1 * dy), side, bbox));
    }
    true
}

/// Moves a clipped point onto `side`. Far-away vertices leave rounding error in
/// `a + t * d` well above `EPSILON`, which the cell closer would not recognize.
fn snap_to_side(p: Point, side: BoxSide, bbox: &BoundingBox) -> Point {
    let x = p.x.clamp(bbox.xl(), bbox.xr());
    let y = p.y.clamp(bbox.yt(), bbox.yb());
    match side {
        BoxSide::Left => Point::new(bbox.xl(), y),
        BoxSide::Right => Point::new(bbox.xr(), y),
        BoxSide::Top => Point::new(x, bbox.yt()),
        BoxSide::Bottom => Point::new(x, bbox.yb()),
    }
}

/// Connects and clips every edge, discarding the ones that end up outside the box or
/// collapse to a point. Discarded edges keep their slot but lose both end points.
pub(crate) fn clip_edges(edges: &mut [SweepEdge], bbox: &BoundingBox) -> usize {
    let mut discarded = 0;
    for edge in edges.iter_mut().rev() {
        let keep = connect_edge(edge, bbox)
            && clip_edge(edge, bbox)
            && match (edge.va.point(), edge.vb.point()) {
                (Some(a), Some(b)) => (a.x - b.x).abs() >= EPSILON || (a.y - b.y).abs() >= EPSILON,
                _ => false,
            };
        if !keep {
            edge.discard();
            discarded += 1;
        }
    }
    discarded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Site;

    fn bbox() -> BoundingBox {
        BoundingBox::from_edges(0.0, 400.0, 0.0, 400.0)
    }

    fn site(id: usize, x: f64, y: f64) -> Site {
        Site { id, index: id, x, y }
    }

    #[test]
    fn test_connect_vertical_bisector() {
        let mut edge = SweepEdge::new(site(0, 100.0, 200.0), site(1, 300.0, 200.0));
        assert!(connect_edge(&mut edge, &bbox()));
        assert_eq!(edge.va, Endpoint::Fixed(Point::new(200.0, 400.0)));
        assert_eq!(edge.vb, Endpoint::Fixed(Point::new(200.0, 0.0)));
    }

    #[test]
    fn test_connect_vertical_outside() {
        let mut edge = SweepEdge::new(site(0, 500.0, 200.0), site(1, 700.0, 200.0));
        assert!(!connect_edge(&mut edge, &bbox()));
        assert!(edge.va.is_open());
    }

    #[test]
    fn test_connect_shallow_keeps_start() {
        // Sites stacked vertically: horizontal bisector y = 200.
        let mut edge = SweepEdge::new(site(0, 200.0, 100.0), site(1, 200.0, 300.0));
        edge.va = Endpoint::Fixed(Point::new(150.0, 200.0));
        assert!(connect_edge(&mut edge, &bbox()));
        assert_eq!(edge.va, Endpoint::Fixed(Point::new(150.0, 200.0)));
        assert_eq!(edge.vb, Endpoint::Fixed(Point::new(400.0, 200.0)));
    }

    #[test]
    fn test_connect_steep_bisector() {
        // Bisector of (100, 100) and (300, 150) has slope -4.
        let mut edge = SweepEdge::new(site(0, 100.0, 100.0), site(1, 300.0, 150.0));
        assert!(connect_edge(&mut edge, &bbox()));
        let (va, vb) = (edge.va.point().unwrap(), edge.vb.point().unwrap());
        assert_eq!(va.y, 400.0);
        assert_eq!(vb.y, 0.0);
        // both ends lie on the bisector
        for p in [va, vb] {
            let d0 = p.distance_sq(Point::new(100.0, 100.0));
            let d1 = p.distance_sq(Point::new(300.0, 150.0));
            assert!((d0 - d1).abs() < 1e-6);
        }
    }

    #[test]
    fn test_clip_edge_cuts_both_ends() {
        let mut edge = SweepEdge::new(site(0, 0.0, 0.0), site(1, 1.0, 1.0));
        edge.va = Endpoint::Fixed(Point::new(-100.0, 200.0));
        edge.vb = Endpoint::Fixed(Point::new(500.0, 200.0));
        assert!(clip_edge(&mut edge, &bbox()));
        assert!(edge.va.point().unwrap().approx_eq(Point::new(0.0, 200.0)));
        assert!(edge.vb.point().unwrap().approx_eq(Point::new(400.0, 200.0)));
    }

    #[test]
    fn test_clip_edge_rejects_outside() {
        let mut edge = SweepEdge::new(site(0, 0.0, 0.0), site(1, 1.0, 1.0));
        edge.va = Endpoint::Fixed(Point::new(500.0, -10.0));
        edge.vb = Endpoint::Fixed(Point::new(600.0, 50.0));
        assert!(!clip_edge(&mut edge, &bbox()));
    }

    #[test]
    fn test_clip_edge_from_far_vertices_lands_on_the_sides() {
        // Circumcenters of nearly collinear sites: huge coordinates on both ends.
        let mut edge = SweepEdge::new(site(0, 0.0, 0.0), site(1, 1.0, 1.0));
        edge.va = Endpoint::Fixed(Point::new(-3.7e9 - 0.3, -1.85e9 + 100.1));
        edge.vb = Endpoint::Fixed(Point::new(2.9e9 + 0.7, 1.45e9 + 99.9));
        assert!(clip_edge(&mut edge, &bbox()));

        let (va, vb) = (edge.va.point().unwrap(), edge.vb.point().unwrap());
        assert_eq!(va.x, 0.0);
        assert_eq!(vb.x, 400.0);
        for p in [va, vb] {
            assert!(bbox().contains(p), "{:?} outside the box", p);
        }
    }

    #[test]
    fn test_clip_edge_near_corner_stays_in_box() {
        let mut edge = SweepEdge::new(site(0, 0.0, 0.0), site(1, 1.0, 1.0));
        edge.va = Endpoint::Fixed(Point::new(-1e9, -1e9 + 1e-7));
        edge.vb = Endpoint::Fixed(Point::new(200.0, 200.0));
        assert!(clip_edge(&mut edge, &bbox()));

        let va = edge.va.point().unwrap();
        assert!(va.x == 0.0 || va.y == 0.0);
        assert!(bbox().contains(va), "{:?} outside the box", va);
        assert_eq!(edge.vb, Endpoint::Fixed(Point::new(200.0, 200.0)));
    }

    #[test]
    fn test_clip_edges_discards_points() {
        let mut point_like = SweepEdge::new(site(0, 0.0, 0.0), site(1, 1.0, 1.0));
        point_like.va = Endpoint::Fixed(Point::new(10.0, 10.0));
        point_like.vb = Endpoint::Fixed(Point::new(10.0, 10.0 + 1e-12));
        let mut inside = SweepEdge::new(site(0, 0.0, 0.0), site(1, 1.0, 1.0));
        inside.va = Endpoint::Fixed(Point::new(10.0, 10.0));
        inside.vb = Endpoint::Fixed(Point::new(20.0, 20.0));

        let mut edges = vec![point_like, inside];
        assert_eq!(clip_edges(&mut edges, &bbox()), 1);
        assert!(!edges[0].is_complete());
        assert!(edges[1].is_complete());
    }
}
