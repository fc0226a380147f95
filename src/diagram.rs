use crate::cell::{Cell, SweepCell};
use crate::edge::{Edge, Halfedge, SweepEdge};
use crate::geometry::Point;
use std::time::Duration;

/// Result of one sweep: a cell per distinct site plus the shared edge list.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagram {
    pub(crate) sites: Vec<Point>,
    pub(crate) site_ids: Vec<Option<usize>>,
    pub(crate) cells: Vec<Cell>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) exec_time: Duration,
}

impl Diagram {
    /// Drops discarded edges and resolves every half-edge against the kept ones.
    pub(crate) fn assemble(
        sites: Vec<Point>,
        site_ids: Vec<Option<usize>>,
        sweep_cells: Vec<SweepCell>,
        sweep_edges: Vec<SweepEdge>,
        exec_time: Duration,
    ) -> Self {
        let mut remap = vec![None; sweep_edges.len()];
        let mut edges = Vec::with_capacity(sweep_edges.len());
        for (i, edge) in sweep_edges.iter().enumerate() {
            if let (Some(va), Some(vb)) = (edge.va.point(), edge.vb.point()) {
                remap[i] = Some(edges.len());
                edges.push(Edge {
                    left: edge.left,
                    right: edge.right,
                    va,
                    vb,
                    side: edge.side,
                });
            }
        }

        let cells = sweep_cells
            .into_iter()
            .map(|cell| {
                let site_id = cell.site.id;
                let halfedges = cell
                    .halfedges
                    .iter()
                    .filter_map(|h| {
                        let edge = &sweep_edges[h.edge];
                        let neighbor = match (edge.side, edge.right) {
                            (Some(side), _) => side.id(),
                            (None, Some(r)) if edge.left.id == site_id => r.id as i32,
                            (None, _) => edge.left.id as i32,
                        };
                        Some(Halfedge {
                            edge: remap[h.edge]?,
                            site: site_id,
                            neighbor,
                            angle: h.angle,
                            start: h.start_point(&sweep_edges).point()?,
                            end: h.end_point(&sweep_edges).point()?,
                        })
                    })
                    .collect();
                Cell {
                    site: cell.site,
                    halfedges,
                }
            })
            .collect();

        Diagram {
            sites,
            site_ids,
            cells,
            edges,
            exec_time,
        }
    }

    /// The input points, duplicates included.
    pub fn sites(&self) -> &[Point] {
        &self.sites
    }

    /// Cell ID assigned to each input point, `None` where the point was skipped as a
    /// duplicate.
    pub fn site_ids(&self) -> &[Option<usize>] {
        &self.site_ids
    }

    /// Cells indexed by site ID.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn cell(&self, id: usize) -> Option<&Cell> {
        self.cells.get(id)
    }

    /// The cell of the input point at `index`.
    pub fn cell_of_input(&self, index: usize) -> Option<&Cell> {
        self.site_ids.get(index).copied().flatten().and_then(|id| self.cells.get(id))
    }

    pub fn exec_time(&self) -> Duration {
        self.exec_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::BoxSide;
    use crate::edge::{Endpoint, SweepHalfedge};
    use crate::geometry::Site;

    #[test]
    fn test_assemble_drops_discarded_edges() {
        let a = Site { id: 0, index: 1, x: 100.0, y: 100.0 };
        let b = Site { id: 1, index: 0, x: 300.0, y: 100.0 };
        let mut dropped = SweepEdge::new(a, b);
        dropped.discard();
        let mut kept = SweepEdge::new(a, b);
        kept.va = Endpoint::Fixed(Point::new(200.0, 400.0));
        kept.vb = Endpoint::Fixed(Point::new(200.0, 0.0));
        let border = SweepEdge::border(a, Point::new(200.0, 0.0), Point::new(0.0, 0.0), BoxSide::Top);
        let edges = vec![dropped, kept, border];

        let mut cell_a = SweepCell::new(a);
        cell_a.halfedges.push(SweepHalfedge::new(1, &edges[1], a, Some(b)));
        cell_a.halfedges.push(SweepHalfedge::new(2, &edges[2], a, None));
        let mut cell_b = SweepCell::new(b);
        cell_b.halfedges.push(SweepHalfedge::new(1, &edges[1], b, Some(a)));

        let diagram = Diagram::assemble(
            vec![Point::new(300.0, 100.0), Point::new(100.0, 100.0)],
            vec![Some(1), Some(0)],
            vec![cell_a, cell_b],
            edges,
            Duration::ZERO,
        );

        assert_eq!(diagram.edges().len(), 2);
        let cell = diagram.cell(0).unwrap();
        assert_eq!(cell.edge_neighbors(), vec![1, BoxSide::Top.id()]);
        assert_eq!(cell.halfedges()[0].edge(), 0);
        assert_eq!(cell.halfedges()[1].edge(), 1);
        assert_eq!(diagram.cell(1).unwrap().edge_neighbors(), vec![0]);
        assert_eq!(diagram.cell_of_input(0).unwrap().id(), 1);
        assert_eq!(diagram.cell(1).unwrap().halfedges()[0].start(), Point::new(200.0, 0.0));
    }
}
