use crate::bounds::BoundingBox;
use crate::cell::Cell;
use crate::diagram::Diagram;
use crate::error::Result;
use crate::geometry::Point;
use crate::sweep::SweepEngine;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::debug;

/// A set of sites in a bounding box together with their most recent diagram.
///
/// Changing the sites drops the diagram; call [`Voronoi::calculate`] to rebuild it.
#[derive(Clone, Debug)]
pub struct Voronoi {
    pub bounds: BoundingBox,
    sites: Vec<Point>,
    diagram: Option<Diagram>,
}

impl Voronoi {
    pub fn new(bounds: BoundingBox) -> Self {
        Self {
            bounds,
            sites: Vec::new(),
            diagram: None,
        }
    }

    pub fn set_sites(&mut self, sites: Vec<Point>) {
        self.sites = sites;
        self.diagram = None;
    }

    /// Sets the sites from a flat `[x, y, x, y, ...]` array; a trailing odd value is ignored.
    pub fn set_sites_flat(&mut self, sites: &[f64]) {
        self.set_sites(sites.chunks_exact(2).map(|p| Point::new(p[0], p[1])).collect());
    }

    /// Moves a single site. Out-of-range indices are ignored.
    pub fn set_site(&mut self, index: usize, x: f64, y: f64) {
        if let Some(site) = self.sites.get_mut(index) {
            *site = Point::new(x, y);
            self.diagram = None;
        }
    }

    /// Replaces the sites with `count` points drawn uniformly from the bounds.
    pub fn random_sites(&mut self, count: usize, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let (w, h) = (self.bounds.width(), self.bounds.height());
        let points = (0..count)
            .map(|_| {
                let x = self.bounds.xl() + rng.r#gen::<f64>() * w;
                let y = self.bounds.yt() + rng.r#gen::<f64>() * h;
                Point::new(x, y)
            })
            .collect();
        self.set_sites(points);
    }

    pub fn calculate(&mut self) -> Result<&Diagram> {
        let diagram = SweepEngine::new().compute(&self.sites, self.bounds)?;
        Ok(self.diagram.insert(diagram))
    }

    /// One step of Lloyd relaxation: every site moves to the centroid of its cell.
    ///
    /// Computes the diagram first if needed. Sites without a cell (skipped duplicates)
    /// or with an empty cell keep their position. Returns the mean distance moved; the
    /// diagram is dropped afterwards.
    pub fn relax(&mut self) -> Result<f64> {
        let diagram = match self.diagram.take() {
            Some(diagram) => diagram,
            None => SweepEngine::new().compute(&self.sites, self.bounds)?,
        };

        let moved: Vec<Point> = self
            .sites
            .par_iter()
            .enumerate()
            .map(|(i, &site)| match diagram.cell_of_input(i) {
                Some(cell) if !cell.is_empty() => cell.centroid().into(),
                _ => site,
            })
            .collect();

        let displacement = if moved.is_empty() {
            0.0
        } else {
            let total: f64 = moved
                .par_iter()
                .zip(self.sites.par_iter())
                .map(|(a, b)| a.distance_sq(*b).sqrt())
                .sum();
            total / moved.len() as f64
        };
        debug!(sites = moved.len(), displacement, "relaxed sites");

        self.sites = moved;
        Ok(displacement)
    }

    pub fn diagram(&self) -> Option<&Diagram> {
        self.diagram.as_ref()
    }

    pub fn sites(&self) -> &[Point] {
        &self.sites
    }

    /// Sites as a flat `[x, y, x, y, ...]` array.
    pub fn sites_flat(&self) -> Vec<f64> {
        self.sites.iter().flat_map(|p| [p.x, p.y]).collect()
    }

    pub fn get_site(&self, index: usize) -> Option<Point> {
        self.sites.get(index).copied()
    }

    pub fn count_sites(&self) -> usize {
        self.sites.len()
    }

    /// Number of cells in the current diagram, 0 if none is computed.
    pub fn count_cells(&self) -> usize {
        self.diagram.as_ref().map_or(0, |d| d.cells().len())
    }

    /// The cell of the site at `index`.
    pub fn get_cell(&self, index: usize) -> Option<&Cell> {
        self.diagram.as_ref()?.cell_of_input(index)
    }
}
