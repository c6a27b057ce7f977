//! Grid model module.
//!
//! This module holds the cell arena the search engine runs over. A [`Grid`] owns every [`Cell`]
//! in a flat, row-major vector; cells refer to each other only through [`Coord`] values resolved
//! against that owning grid, never through references.

use std::fmt;

use crate::error::GridError;

/// Distance sentinel for cells that no relaxation has reached yet.
///
/// It compares greater than every real distance, so it sorts after all reached cells in the
/// frontier.
pub const UNREACHED: usize = usize::MAX;

/// Position of a cell as a `(row, col)` pair.
///
/// The derived ordering is row-major, which is the tie-break order of the search frontier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    /// Zero-based row, growing downwards.
    pub row: usize,
    /// Zero-based column, growing rightwards.
    pub col: usize,
}

impl Coord {
    /// Builds a coordinate from its row and column.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Number of orthogonal steps between two coordinates.
    #[must_use]
    pub const fn manhattan(self, other: Self) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Whether the two coordinates share an edge.
    #[must_use]
    pub const fn is_adjacent(self, other: Self) -> bool {
        self.manhattan(other) == 1
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Static classification of a cell.
///
/// This is map data set by the caller before a search. The search reads it but never writes it;
/// visited and path status are reported separately as coordinate sequences.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// Traversable cell.
    #[default]
    Empty,
    /// Blocked cell. Walls are never settled and never relax their neighbours.
    Wall,
    /// The cell the search starts from.
    Source,
    /// The cell the search tries to reach.
    Target,
}

impl CellKind {
    /// Character used for this kind in `.gridmap` layouts.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Empty => '.',
            Self::Wall => '#',
            Self::Source => 'S',
            Self::Target => 'T',
        }
    }

    /// Inverse of [`CellKind::glyph`].
    #[must_use]
    pub const fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' => Some(Self::Empty),
            '#' => Some(Self::Wall),
            'S' => Some(Self::Source),
            'T' => Some(Self::Target),
            _ => None,
        }
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Empty => "empty",
            Self::Wall => "wall",
            Self::Source => "source",
            Self::Target => "target",
        })
    }
}

/// One grid position with its static kind and the search state attached to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    /// Where the cell sits in its grid.
    pub(crate) coord: Coord,
    /// Static classification.
    pub(crate) kind: CellKind,
    /// Tentative cost from the source, or [`UNREACHED`].
    pub(crate) distance: usize,
    /// Set once the cell has been settled; its distance and predecessor are then final.
    pub(crate) visited: bool,
    /// Cell this one's current distance was derived from.
    pub(crate) predecessor: Option<Coord>,
}

impl Cell {
    /// Creates an empty, unreached cell.
    const fn new(coord: Coord) -> Self {
        Self {
            coord,
            kind: CellKind::Empty,
            distance: UNREACHED,
            visited: false,
            predecessor: None,
        }
    }

    /// Position of the cell.
    #[must_use]
    pub const fn coord(&self) -> Coord {
        self.coord
    }

    /// Static classification of the cell.
    #[must_use]
    pub const fn kind(&self) -> CellKind {
        self.kind
    }

    /// Tentative or final distance from the source, [`UNREACHED`] if none.
    #[must_use]
    pub const fn distance(&self) -> usize {
        self.distance
    }

    /// Whether any relaxation has reached this cell.
    #[must_use]
    pub const fn is_reached(&self) -> bool {
        self.distance != UNREACHED
    }

    /// Whether the cell has been settled.
    #[must_use]
    pub const fn is_visited(&self) -> bool {
        self.visited
    }

    /// Back-reference to the cell this one was relaxed from.
    #[must_use]
    pub const fn predecessor(&self) -> Option<Coord> {
        self.predecessor
    }

    /// Drops the search state, keeping the kind.
    fn reset(&mut self) {
        self.distance = UNREACHED;
        self.visited = false;
        self.predecessor = None;
    }
}

/// Rectangular, fixed-size arena of cells.
///
/// The grid is the sole owner of its cell data. Orthogonal adjacency is implied by position, and
/// a search borrows the grid mutably for its whole run, so two searches can never share cell
/// state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    /// Number of rows.
    rows: usize,
    /// Number of columns.
    cols: usize,
    /// Row-major cell storage of length `rows * cols`.
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a `rows x cols` grid of empty, unreached cells.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimensions`] if either dimension is zero or the cell count
    /// overflows.
    pub fn new(rows: usize, cols: usize) -> Result<Self, GridError> {
        let invalid = GridError::InvalidDimensions { rows, cols };
        if rows == 0 || cols == 0 {
            return Err(invalid);
        }
        let len = rows.checked_mul(cols).ok_or(invalid)?;

        let cells = (0..len)
            .map(|idx| Cell::new(Coord::new(idx / cols, idx % cols)))
            .collect();

        Ok(Self { rows, cols, cells })
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, coord: Coord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    /// Flat index of a coordinate, if in bounds.
    pub(crate) const fn index(&self, coord: Coord) -> Option<usize> {
        if self.contains(coord) {
            Some(coord.row * self.cols + coord.col)
        } else {
            None
        }
    }

    /// Bounds error for a coordinate of this grid.
    const fn out_of_bounds(&self, coord: Coord) -> GridError {
        GridError::OutOfBounds {
            coord,
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// Cell at the coordinate, if in bounds.
    #[must_use]
    pub fn cell(&self, coord: Coord) -> Option<&Cell> {
        self.index(coord).and_then(|idx| self.cells.get(idx))
    }

    /// Mutable cell at the coordinate, if in bounds.
    pub(crate) fn cell_mut(&mut self, coord: Coord) -> Option<&mut Cell> {
        self.index(coord).and_then(|idx| self.cells.get_mut(idx))
    }

    /// Iterates over every cell in row-major order.
    pub fn cells(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }

    /// Kind of the cell at the coordinate, if in bounds.
    #[must_use]
    pub fn kind(&self, coord: Coord) -> Option<CellKind> {
        self.cell(coord).map(Cell::kind)
    }

    /// Overwrites the kind of one cell.
    ///
    /// No placement rule is enforced here: a grid may hold any number of endpoints until a search
    /// is started on it.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if the coordinate is outside the grid.
    pub fn set_kind(&mut self, coord: Coord, kind: CellKind) -> Result<(), GridError> {
        let bounds = self.out_of_bounds(coord);
        self.cell_mut(coord).ok_or(bounds)?.kind = kind;

        Ok(())
    }

    /// Flips an empty cell into a wall and a wall back into an empty cell.
    ///
    /// Endpoints are left untouched. Returns the kind the cell ends up with.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if the coordinate is outside the grid.
    pub fn toggle_wall(&mut self, coord: Coord) -> Result<CellKind, GridError> {
        let bounds = self.out_of_bounds(coord);
        let cell = self.cell_mut(coord).ok_or(bounds)?;
        cell.kind = match cell.kind {
            CellKind::Empty => CellKind::Wall,
            CellKind::Wall => CellKind::Empty,
            endpoint @ (CellKind::Source | CellKind::Target) => endpoint,
        };

        Ok(cell.kind)
    }

    /// Moves the source to the coordinate, emptying wherever it used to be.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if the coordinate is outside the grid.
    pub fn place_source(&mut self, coord: Coord) -> Result<(), GridError> {
        self.place_endpoint(coord, CellKind::Source)
    }

    /// Moves the target to the coordinate, emptying wherever it used to be.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if the coordinate is outside the grid.
    pub fn place_target(&mut self, coord: Coord) -> Result<(), GridError> {
        self.place_endpoint(coord, CellKind::Target)
    }

    /// Shared body of [`Grid::place_source`] and [`Grid::place_target`].
    fn place_endpoint(&mut self, coord: Coord, kind: CellKind) -> Result<(), GridError> {
        let idx = self.index(coord).ok_or(self.out_of_bounds(coord))?;
        for cell in self.cells.iter_mut().filter(|cell| cell.kind == kind) {
            cell.kind = CellKind::Empty;
        }
        if let Some(cell) = self.cells.get_mut(idx) {
            cell.kind = kind;
        }

        Ok(())
    }

    /// Turns every wall back into an empty cell.
    pub fn clear_walls(&mut self) {
        for cell in self.cells.iter_mut().filter(|cell| cell.kind == CellKind::Wall) {
            cell.kind = CellKind::Empty;
        }
    }

    /// Number of cells of the given kind.
    #[must_use]
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|cell| cell.kind == kind).count()
    }

    /// Coordinate of the single cell of the given kind.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::MissingEndpoint`] unless exactly one cell has that kind.
    pub fn find_unique(&self, kind: CellKind) -> Result<Coord, GridError> {
        let mut matches = self.cells.iter().filter(|cell| cell.kind == kind);
        match (matches.next(), matches.next()) {
            (Some(cell), None) => Ok(cell.coord),
            (None, _) => Err(GridError::MissingEndpoint { kind, found: 0 }),
            (Some(_), Some(_)) => Err(GridError::MissingEndpoint {
                kind,
                found: self.count(kind),
            }),
        }
    }

    /// Coordinates of the unique source and target, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::MissingEndpoint`] for the first endpoint kind that is absent or
    /// duplicated.
    pub fn endpoints(&self) -> Result<(Coord, Coord), GridError> {
        Ok((
            self.find_unique(CellKind::Source)?,
            self.find_unique(CellKind::Target)?,
        ))
    }

    /// Clears distance, visited flag and predecessor on every cell. Kinds are kept.
    pub fn reset_search_state(&mut self) {
        for cell in &mut self.cells {
            cell.reset();
        }
    }

    /// Orthogonal in-bounds neighbours that have not been settled yet.
    ///
    /// The order is fixed: up, down, left, right. Settled neighbours are left out since, with
    /// uniform step cost, their distance can no longer be improved.
    #[must_use]
    pub fn neighbors(&self, coord: Coord) -> Vec<Coord> {
        let Coord { row, col } = coord;
        [
            row.checked_sub(1).map(|up| Coord::new(up, col)),
            row.checked_add(1).map(|down| Coord::new(down, col)),
            col.checked_sub(1).map(|left| Coord::new(row, left)),
            col.checked_add(1).map(|right| Coord::new(row, right)),
        ]
        .into_iter()
        .flatten()
        .filter(|neighbor| self.cell(*neighbor).is_some_and(|cell| !cell.visited))
        .collect()
    }
}
