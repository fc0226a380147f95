//! # vorosweep
//!
//! `vorosweep` computes planar Voronoi diagrams with Fortune's sweep-line algorithm, for use
//! in Rust as well as compiled to WebAssembly (WASM). Every distinct site gets a closed,
//! counterclockwise cell clipped to a bounding box, and cells share one edge list.
//!
//! ## Features
//!
//! - **Sweep-line**: `O(n log n)` construction over a red-black beachline and circle event queue.
//! - **Clipped output**: every edge has two finite end points inside the bounding box, and cells
//!   are closed along the box sides, which are tagged with negative `BOX_ID_*` neighbor IDs.
//! - **Lloyd relaxation**: parallel centroid updates with `rayon`.
//! - **WASM-first**: `wasm-bindgen` bindings with flat `f64` arrays across the boundary.
//!
//! ## Example
//!
//! ```
//! use vorosweep::{compute, BoundingBox, Point};
//!
//! let bbox = BoundingBox::from_edges(0.0, 400.0, 0.0, 400.0);
//! let sites = [Point::new(100.0, 100.0), Point::new(300.0, 100.0), Point::new(200.0, 300.0)];
//! let diagram = compute(&sites, bbox).unwrap();
//! assert_eq!(diagram.cells().len(), 3);
//! ```
//!
//! ## Main Interface
//!
//! [`compute`] and [`SweepEngine`] build a single [`Diagram`]; the [`Voronoi`] struct manages a
//! set of sites across repeated calculations and relaxation steps.

mod bounds;
mod cell;
mod clip;
mod diagram;
mod edge;
mod error;
mod geometry;
mod sweep;
mod tree;
mod voronoi;
pub mod wasm;

pub use bounds::box_side;
pub use bounds::BoundingBox;
pub use bounds::BoxSide;
pub use bounds::BOX_ID_BOTTOM;
pub use bounds::BOX_ID_LEFT;
pub use bounds::BOX_ID_RIGHT;
pub use bounds::BOX_ID_TOP;
pub use cell::Cell;
pub use diagram::Diagram;
pub use edge::Edge;
pub use edge::Halfedge;
pub use error::Result;
pub use error::VoronoiError;
pub use geometry::Point;
pub use geometry::Site;
pub use geometry::EPSILON;
pub use sweep::SweepEngine;
pub use voronoi::Voronoi;

/// Computes the Voronoi diagram of `sites` clipped to `bbox`.
///
/// Shorthand for `SweepEngine::new().compute(sites, bbox)`.
pub fn compute(sites: &[Point], bbox: BoundingBox) -> Result<Diagram> {
    SweepEngine::new().compute(sites, bbox)
}
