//! Typed failures raised by the grid model and the search engine.

use crate::grid::{CellKind, Coord};

/// Errors local to a single grid construction, edit or search call.
///
/// None of these are retried inside the library. They convert into [`color_eyre::eyre::Report`]
/// through `?`, which is how the application layer surfaces them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// A grid was requested with a zero dimension, or with more cells than can be addressed.
    #[error("invalid grid dimensions {rows}x{cols}")]
    InvalidDimensions {
        /// Requested row count.
        rows: usize,
        /// Requested column count.
        cols: usize,
    },
    /// The grid does not hold exactly one cell of the given endpoint kind.
    #[error("expected exactly one {kind} cell, found {found}")]
    MissingEndpoint {
        /// Either [`CellKind::Source`] or [`CellKind::Target`].
        kind: CellKind,
        /// How many cells of that kind were found.
        found: usize,
    },
    /// A coordinate lies outside the grid.
    #[error("cell {coord} lies outside the {rows}x{cols} grid")]
    OutOfBounds {
        /// The offending coordinate.
        coord: Coord,
        /// Row count of the grid.
        rows: usize,
        /// Column count of the grid.
        cols: usize,
    },
}
