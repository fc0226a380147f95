use thiserror::Error;

/// Errors raised while building a diagram.
///
/// Duplicate sites and edges that fall outside the bounding box are not errors:
/// the former are skipped, the latter dropped from the output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VoronoiError {
    #[error("invalid bounding box: xl={xl}, xr={xr}, yt={yt}, yb={yb} (expected finite xl < xr and yt < yb)")]
    InvalidBounds { xl: f64, xr: f64, yt: f64, yb: f64 },

    #[error("site {index} has non-finite coordinates ({x}, {y})")]
    NonFiniteSite { index: usize, x: f64, y: f64 },

    /// The beachline reached a state the sweep order rules out. Not recoverable.
    #[error("beachline invariant violated: {0}")]
    BeachlineInvariant(&'static str),
}

pub type Result<T> = std::result::Result<T, VoronoiError>;
