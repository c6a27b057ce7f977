//! Map data and management module.
//!
//! This module contains the `Map` struct and the `.gridmap` text layout: one line per grid row,
//! with `.` for empty cells, `#` for walls, `S` for the source and `T` for the target.

use std::ffi::OsString;

use color_eyre::eyre::{bail, ensure, eyre, OptionExt as _, Result, WrapErr as _};
use rand::{distr::Bernoulli, Rng};

use crate::grid::{CellKind, Coord, Grid};

/// File extension of map files.
pub(crate) const MAP_EXTENSION: &str = ".gridmap";

/// Rows of the built-in blank grid.
pub(crate) const DEFAULT_ROWS: usize = 20;

/// Columns of the built-in blank grid.
pub(crate) const DEFAULT_COLS: usize = 40;

/// Key of the built-in blank map.
pub(crate) const DEFAULT_KEY: &str = "Default";

/// Named grid layout.
///
/// This structure pairs a grid with the key it is listed under, which is the file name without
/// its extension for maps loaded from disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Map {
    /// Display name of the map.
    pub(crate) key: String,
    /// Pristine layout of the map. Editing happens on a copy.
    pub(crate) grid: Grid,
}

impl Map {
    /// Builds a map from a file name and its `.gridmap` contents.
    ///
    /// # Errors
    ///
    /// This function may return errors if:
    /// - The `OsString` cannot be converted to a string slice
    /// - The file name doesn't end with the ".gridmap" extension
    /// - The contents are not a valid layout, see [`parse_layout`]
    pub(crate) fn new(key: OsString, data: &str) -> Result<Self> {
        let file_name = key
            .to_str()
            .ok_or_eyre("failed to convert osstring to string slice")?;
        let key = file_name
            .strip_suffix(MAP_EXTENSION)
            .ok_or_eyre("failed to find extension in file name")?
            .to_owned();
        let grid = parse_layout(data).wrap_err_with(|| format!("invalid layout in map {key}"))?;

        Ok(Self { key, grid })
    }

    /// Builds a wall-free map with the endpoints on the middle row.
    ///
    /// The source sits a quarter of the way in and the target three quarters of the way, which
    /// puts them at `(9, 9)` and `(9, 29)` on the default 20 x 40 grid. Grids too narrow for that
    /// get the target in the bottom-right corner.
    ///
    /// # Errors
    ///
    /// This function returns an error if the dimensions are invalid or leave room for fewer than
    /// two cells.
    pub(crate) fn blank(rows: usize, cols: usize) -> Result<Self> {
        let mut grid = Grid::new(rows, cols)?;
        ensure!(
            grid.cell_count() >= 2,
            "a {rows}x{cols} grid cannot hold both a source and a target"
        );

        let middle = (rows - 1) / 2;
        let source = Coord::new(middle, (cols / 4).saturating_sub(1));
        let mut target = Coord::new(middle, (cols * 3 / 4).saturating_sub(1));
        if target == source {
            target = Coord::new(rows - 1, cols - 1);
        }
        grid.place_source(source)?;
        grid.place_target(target)?;

        Ok(Self {
            key: DEFAULT_KEY.to_owned(),
            grid,
        })
    }
}

/// Parses a `.gridmap` layout into a grid.
///
/// Leading and trailing blank lines are ignored. Every row must have the same length, only the
/// glyphs `.`, `#`, `S` and `T` are accepted, and there must be exactly one `S` and one `T`.
///
/// # Errors
///
/// This function returns an error describing the first rule the layout breaks.
pub(crate) fn parse_layout(input: &str) -> Result<Grid> {
    let lines: Vec<&str> = input.trim().lines().map(str::trim_end).collect();
    let width = lines.first().map_or(0, |line| line.chars().count());
    ensure!(width > 0, "layout is empty");

    let mut grid = Grid::new(lines.len(), width)?;
    for (row, line) in lines.iter().enumerate() {
        let length = line.chars().count();
        if length != width {
            bail!("row {row} has {length} cells, expected {width}");
        }
        for (col, glyph) in line.chars().enumerate() {
            let kind = CellKind::from_glyph(glyph)
                .ok_or_else(|| eyre!("unknown cell {glyph:?} at row {row}, column {col}"))?;
            grid.set_kind(Coord::new(row, col), kind)?;
        }
    }
    let _ = grid.endpoints()?;

    Ok(grid)
}

/// Writes a grid back out as a `.gridmap` layout, one newline-terminated line per row.
pub(crate) fn to_layout(grid: &Grid) -> String {
    let mut layout = String::with_capacity((grid.cols() + 1) * grid.rows());
    for cell in grid.cells() {
        layout.push(cell.kind().glyph());
        if cell.coord().col + 1 == grid.cols() {
            layout.push('\n');
        }
    }
    layout
}

/// Replaces the walls of a grid with fresh random ones.
///
/// Existing walls are cleared first, then every empty cell independently becomes a wall with
/// probability `density`. Endpoints are never covered. Returns the number of walls placed.
///
/// # Errors
///
/// This function returns an error if `density` is not a probability.
pub(crate) fn randomize_walls<R: Rng>(
    grid: &mut Grid,
    density: f64,
    rng: &mut R,
) -> Result<usize> {
    let coin = Bernoulli::new(density)
        .map_err(|err| eyre!("invalid wall density {density}: {err}"))?;

    grid.clear_walls();
    let empty: Vec<Coord> = grid
        .cells()
        .filter(|cell| cell.kind() == CellKind::Empty)
        .map(|cell| cell.coord())
        .collect();

    let mut placed = 0;
    for coord in empty {
        if rng.sample(coin) {
            grid.set_kind(coord, CellKind::Wall)?;
            placed += 1;
        }
    }
    log::debug!("placed {placed} random walls at density {density}");

    Ok(placed)
}
