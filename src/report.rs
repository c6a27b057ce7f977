//! Plain-text rendering of a finished search, used by the headless mode and the status line.

use std::collections::BTreeSet;

use color_eyre::eyre::Result;

use crate::{
    config::Config,
    file_loader,
    grid::{CellKind, Coord, Grid},
    search::{self, SearchOutcome},
};

/// Glyph for a settled cell that is not on the path.
const VISITED_GLYPH: char = 'o';

/// Glyph for a path cell.
const PATH_GLYPH: char = '*';

/// One-line description of a search result.
#[must_use]
pub fn summary(outcome: &SearchOutcome, path: &[Coord]) -> String {
    if outcome.is_reached() {
        format!(
            "reached {} from {} in {} steps, settling {} cells",
            outcome.target(),
            outcome.source(),
            path.len().saturating_sub(1),
            outcome.order().len()
        )
    } else {
        format!(
            "no path from {} to {}, settled {} cells",
            outcome.source(),
            outcome.target(),
            outcome.order().len()
        )
    }
}

/// Draws the grid with settled cells as `o` and the path as `*`, followed by the summary line.
///
/// Endpoints and walls keep their layout glyphs.
#[must_use]
pub fn render(grid: &Grid, outcome: &SearchOutcome, path: &[Coord]) -> String {
    let visited: BTreeSet<Coord> = outcome.order().iter().copied().collect();
    let on_path: BTreeSet<Coord> = path.iter().copied().collect();

    let mut text = String::with_capacity((grid.cols() + 1) * grid.rows());
    for cell in grid.cells() {
        let coord = cell.coord();
        let glyph = match cell.kind() {
            CellKind::Empty if on_path.contains(&coord) => PATH_GLYPH,
            CellKind::Empty if visited.contains(&coord) => VISITED_GLYPH,
            kind => kind.glyph(),
        };
        text.push(glyph);
        if coord.col + 1 == grid.cols() {
            text.push('\n');
        }
    }
    text.push_str(&summary(outcome, path));
    text.push('\n');

    text
}

/// Runs one search on the configured starting map and renders it.
///
/// # Errors
///
/// This function returns an error if the starting map cannot be loaded or lacks an endpoint.
pub fn headless(config: &Config) -> Result<String> {
    let mut map = file_loader::initial_map(config)?;
    let outcome = search::dijkstra(&mut map.grid)?;
    let path = outcome.path(&map.grid);
    log::info!("headless search on {}: {}", map.key, summary(&outcome, &path));

    Ok(render(&map.grid, &outcome, &path))
}
