use approx::{assert_abs_diff_eq, assert_relative_eq};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vorosweep::{compute, BoundingBox, Diagram, Point, EPSILON};

fn assert_partition(diagram: &Diagram, bounds: &BoundingBox) {
    for edge in diagram.edges() {
        for p in [edge.va(), edge.vb()] {
            assert!(p.x >= bounds.xl() - EPSILON && p.x <= bounds.xr() + EPSILON, "edge point {:?} outside box", p);
            assert!(p.y >= bounds.yt() - EPSILON && p.y <= bounds.yb() + EPSILON, "edge point {:?} outside box", p);
        }
    }
    for cell in diagram.cells() {
        assert!(cell.is_closed(), "cell {} is not closed: {:?}", cell.id(), cell.points());
    }
    let total: f64 = diagram.cells().iter().map(|c| c.area()).sum();
    assert_relative_eq!(total, bounds.area(), max_relative = 1e-6);
}

#[test]
fn test_horizontal_row() {
    // All sites on the first sweep line: every arc is appended on the right.
    let bounds = BoundingBox::from_edges(0.0, 400.0, 0.0, 400.0);
    let sites: Vec<Point> = (0..8).map(|i| Point::new(25.0 + 50.0 * i as f64, 200.0)).collect();
    let diagram = compute(&sites, bounds).unwrap();

    assert_eq!(diagram.cells().len(), 8);
    assert_partition(&diagram, &bounds);
    for cell in diagram.cells() {
        assert_abs_diff_eq!(cell.area(), 50.0 * 400.0, epsilon = 1e-6);
    }
}

#[test]
fn test_vertical_column() {
    let bounds = BoundingBox::from_edges(0.0, 400.0, 0.0, 400.0);
    let sites: Vec<Point> = (0..8).map(|i| Point::new(200.0, 25.0 + 50.0 * i as f64)).collect();
    let diagram = compute(&sites, bounds).unwrap();

    assert_eq!(diagram.cells().len(), 8);
    assert_partition(&diagram, &bounds);
    for cell in diagram.cells() {
        assert_abs_diff_eq!(cell.area(), 400.0 * 50.0, epsilon = 1e-6);
    }
}

#[test]
fn test_regular_grid() {
    // Four co-circular sites around every interior vertex.
    let bounds = BoundingBox::from_edges(0.0, 400.0, 0.0, 400.0);
    let mut sites = Vec::new();
    for i in 0..10 {
        for j in 0..10 {
            sites.push(Point::new(20.0 + 40.0 * i as f64, 20.0 + 40.0 * j as f64));
        }
    }
    let diagram = compute(&sites, bounds).unwrap();

    assert_eq!(diagram.cells().len(), 100);
    assert_partition(&diagram, &bounds);
    for cell in diagram.cells() {
        assert_abs_diff_eq!(cell.area(), 1600.0, epsilon = 1e-6);
    }
}

#[test]
fn test_scattered_duplicates() {
    // Apart in the input, adjacent in sweep order.
    let bounds = BoundingBox::from_edges(0.0, 400.0, 0.0, 400.0);
    let sites = [
        Point::new(100.0, 100.0),
        Point::new(300.0, 300.0),
        Point::new(100.0, 100.0),
        Point::new(100.0, 100.0),
    ];
    let diagram = compute(&sites, bounds).unwrap();
    assert_eq!(diagram.cells().len(), 2);
    assert_eq!(diagram.site_ids(), &[Some(0), Some(1), None, None]);
    assert_partition(&diagram, &bounds);
}

#[test]
fn test_sites_on_the_box_border() {
    let bounds = BoundingBox::from_edges(0.0, 100.0, 0.0, 100.0);
    let sites = [
        Point::new(0.0, 0.0),
        Point::new(100.0, 0.0),
        Point::new(0.0, 100.0),
        Point::new(100.0, 100.0),
        Point::new(50.0, 50.0),
    ];
    let diagram = compute(&sites, bounds).unwrap();
    assert_eq!(diagram.cells().len(), 5);
    assert_partition(&diagram, &bounds);
}

#[test]
fn test_near_collinear_sites_terminate() {
    let bounds = BoundingBox::from_edges(0.0, 400.0, 0.0, 400.0);
    let mut rng = StdRng::seed_from_u64(2024);
    let sites: Vec<Point> = (0..1000)
        .map(|i| {
            let t = 10.0 + 0.38 * i as f64;
            Point::new(t, t + rng.gen_range(-1e-4..1e-4))
        })
        .collect();
    let diagram = compute(&sites, bounds).unwrap();

    assert_eq!(diagram.cells().len(), 1000);
    assert_partition(&diagram, &bounds);
}

#[test]
fn test_nearly_collinear_sites_with_far_vertices() {
    // Jitter this small puts circumcenters billions of units away.
    let bounds = BoundingBox::from_edges(0.0, 400.0, 0.0, 400.0);
    let mut rng = StdRng::seed_from_u64(17);
    let sites: Vec<Point> = (0..300)
        .map(|i| {
            let t = 1.0 + 1.3 * i as f64;
            Point::new(t, t / 2.0 + rng.gen_range(-1e-7..1e-7))
        })
        .collect();
    let diagram = compute(&sites, bounds).unwrap();

    assert_eq!(diagram.cells().len(), 300);
    assert_partition(&diagram, &bounds);
}

#[test]
fn test_sites_outside_the_box_get_empty_cells() {
    let bounds = BoundingBox::from_edges(0.0, 100.0, 0.0, 100.0);
    let sites = [Point::new(50.0, 50.0), Point::new(500.0, 50.0)];
    let diagram = compute(&sites, bounds).unwrap();

    assert_eq!(diagram.cells().len(), 2);
    let outside = diagram.cell_of_input(1).unwrap();
    assert!(outside.is_empty());
    assert_abs_diff_eq!(diagram.cell_of_input(0).unwrap().area(), 10_000.0, epsilon = 1e-6);
}

#[cfg(feature = "serde")]
#[test]
fn test_diagram_serializes() {
    let bounds = BoundingBox::from_edges(0.0, 400.0, 0.0, 400.0);
    let diagram = compute(&[Point::new(100.0, 100.0), Point::new(300.0, 250.0)], bounds).unwrap();
    let json = serde_json::to_string(&diagram).unwrap();
    let back: Diagram = serde_json::from_str(&json).unwrap();
    assert_eq!(back.cells(), diagram.cells());
    assert_eq!(back.edges(), diagram.edges());
}
