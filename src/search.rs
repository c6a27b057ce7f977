//! Uniform-cost search module.
//!
//! This module runs Dijkstra's algorithm over a [`Grid`] where every orthogonal step costs one,
//! which makes it behave as a breadth-first search. It produces the order in which cells are
//! settled and leaves coordinate back-references in the grid from which the shortest path is
//! rebuilt.

use std::{cmp::Reverse, collections::BinaryHeap};

use crate::{
    error::GridError,
    grid::{Cell, CellKind, Coord, Grid},
};

/// Terminal state of a finished search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The target was settled; a shortest path exists.
    Reached,
    /// The frontier ran out of reachable cells before the target was settled.
    ///
    /// This is an expected result rather than a fault: the walls simply cut the target off.
    Unreachable,
}

/// What a single call to [`Search::step`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// The cell was settled and appended to the settlement order.
    Settled(Coord),
    /// A wall reached the front of the frontier and was discarded.
    SkippedWall(Coord),
}

/// Result of a completed search.
///
/// The settlement order is kept even when the target was not reached, so a front end can still
/// show how far the search got.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Cells in the order they were settled, source first.
    order: Vec<Coord>,
    /// How the search ended.
    outcome: Outcome,
    /// Start of the search.
    source: Coord,
    /// Goal of the search.
    target: Coord,
}

impl SearchOutcome {
    /// Cells in the order they were settled.
    #[must_use]
    pub fn order(&self) -> &[Coord] {
        &self.order
    }

    /// How the search ended.
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Whether the target was settled.
    #[must_use]
    pub fn is_reached(&self) -> bool {
        self.outcome == Outcome::Reached
    }

    /// Coordinate the search started from.
    #[must_use]
    pub const fn source(&self) -> Coord {
        self.source
    }

    /// Coordinate the search was looking for.
    #[must_use]
    pub const fn target(&self) -> Coord {
        self.target
    }

    /// Shortest path from source to target, or an empty vector when the target was not reached.
    ///
    /// The grid must be the one the search ran on and must not have been reset since.
    #[must_use]
    pub fn path(&self, grid: &Grid) -> Vec<Coord> {
        if self.is_reached() {
            reconstruct_path(grid, self.target)
        } else {
            Vec::new()
        }
    }
}

/// An in-progress search over an exclusively borrowed grid.
///
/// [`Search::run`] drives the search to completion in one go. Callers that want to interleave the
/// expansion with their own scheduling can call [`Search::step`] repeatedly instead and stop
/// whenever they like; the search holds no other resources.
#[derive(Debug)]
pub struct Search<'grid> {
    /// Grid being searched. Its search state is rewritten in place.
    grid: &'grid mut Grid,
    /// Start cell.
    source: Coord,
    /// Goal cell.
    target: Coord,
    /// Min-heap keyed by distance then row-major position, with lazily dropped stale entries.
    frontier: BinaryHeap<Reverse<(usize, Coord)>>,
    /// Flat-indexed flags of cells already taken off the frontier.
    removed: Vec<bool>,
    /// Settlement order so far.
    order: Vec<Coord>,
    /// Set once the search has terminated.
    outcome: Option<Outcome>,
}

impl<'grid> Search<'grid> {
    /// Prepares a search between the grid's unique source and target cells.
    ///
    /// The grid's search state is reset before the expansion starts.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::MissingEndpoint`] if the grid does not hold exactly one source and
    /// one target. The grid is not touched in that case.
    pub fn new(grid: &'grid mut Grid) -> Result<Self, GridError> {
        let (source, target) = grid.endpoints()?;

        Ok(Self::start(grid, source, target))
    }

    /// Prepares a search between two explicit coordinates, ignoring the endpoint kinds.
    ///
    /// Source and target may be the same cell, in which case the search settles that single cell
    /// and stops.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if either coordinate lies outside the grid.
    pub fn between(
        grid: &'grid mut Grid,
        source: Coord,
        target: Coord,
    ) -> Result<Self, GridError> {
        for coord in [source, target] {
            if !grid.contains(coord) {
                return Err(GridError::OutOfBounds {
                    coord,
                    rows: grid.rows(),
                    cols: grid.cols(),
                });
            }
        }

        Ok(Self::start(grid, source, target))
    }

    /// Resets the grid, seeds the source and fills the frontier with every cell.
    fn start(grid: &'grid mut Grid, source: Coord, target: Coord) -> Self {
        grid.reset_search_state();
        if let Some(cell) = grid.cell_mut(source) {
            cell.distance = 0;
        }

        let frontier = grid
            .cells()
            .map(|cell| Reverse((cell.distance, cell.coord)))
            .collect();
        let removed = vec![false; grid.cell_count()];

        log::debug!(
            "starting search on a {}x{} grid from {source} to {target}",
            grid.rows(),
            grid.cols()
        );

        Self {
            grid,
            source,
            target,
            frontier,
            removed,
            order: Vec::new(),
            outcome: None,
        }
    }

    /// Advances the expansion by one frontier selection.
    ///
    /// Returns `None` once the search has terminated, either because the target was settled on a
    /// previous step or because no reachable cell is left.
    pub fn step(&mut self) -> Option<Step> {
        if self.outcome.is_some() {
            return None;
        }

        let Some(current) = self.pop_min() else {
            self.finish(Outcome::Unreachable);
            return None;
        };
        let Some(cell) = self.grid.cell_mut(current) else {
            self.finish(Outcome::Unreachable);
            return None;
        };

        if cell.kind == CellKind::Wall {
            return Some(Step::SkippedWall(current));
        }
        if !cell.is_reached() {
            self.finish(Outcome::Unreachable);
            return None;
        }

        cell.visited = true;
        let distance = cell.distance;
        self.order.push(current);
        log::trace!("settled {current} at distance {distance}");

        if current == self.target {
            self.finish(Outcome::Reached);
        } else {
            self.relax(current, distance);
        }

        Some(Step::Settled(current))
    }

    /// Runs the expansion to completion.
    #[must_use]
    pub fn run(mut self) -> SearchOutcome {
        while self.step().is_some() {}

        SearchOutcome {
            order: self.order,
            outcome: self.outcome.unwrap_or(Outcome::Unreachable),
            source: self.source,
            target: self.target,
        }
    }

    /// Settlement order so far.
    #[must_use]
    pub fn order(&self) -> &[Coord] {
        &self.order
    }

    /// How the search ended, or `None` while it is still running.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Read access to the grid being searched.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        self.grid
    }

    /// Takes the frontier cell with the smallest `(distance, coord)` key off the frontier.
    ///
    /// Heap entries whose distance no longer matches the cell, or whose cell was already removed,
    /// are stale and dropped.
    fn pop_min(&mut self) -> Option<Coord> {
        while let Some(Reverse((distance, coord))) = self.frontier.pop() {
            let Some(idx) = self.grid.index(coord) else {
                continue;
            };
            let current = self.grid.cell(coord).map(Cell::distance);
            match self.removed.get_mut(idx) {
                Some(removed) if !*removed && current == Some(distance) => {
                    *removed = true;
                    return Some(coord);
                }
                _ => {}
            }
        }

        None
    }

    /// Points every unvisited neighbour of a freshly settled cell at it.
    ///
    /// The update is unconditional. On a grid every edge joins cells of opposite parity, so an
    /// unsettled traversable neighbour of a cell at distance `d` is at distance `d + 1` and the
    /// assignment never raises it. Walls are never settled and only carry scratch distances.
    fn relax(&mut self, from: Coord, distance: usize) {
        let next = distance + 1;
        for neighbor in self.grid.neighbors(from) {
            let Some(idx) = self.grid.index(neighbor) else {
                continue;
            };
            let removed = self.removed.get(idx).copied().unwrap_or(true);
            let Some(cell) = self.grid.cell_mut(neighbor) else {
                continue;
            };

            debug_assert!(
                cell.kind == CellKind::Wall || next <= cell.distance,
                "relaxing {neighbor} would raise its distance from {} to {next}",
                cell.distance
            );
            cell.distance = next;
            cell.predecessor = Some(from);

            if !removed {
                self.frontier.push(Reverse((next, neighbor)));
            }
        }
    }

    /// Records the terminal state.
    fn finish(&mut self, outcome: Outcome) {
        log::debug!(
            "search from {} to {} ended {outcome:?} after settling {} cells",
            self.source,
            self.target,
            self.order.len()
        );
        self.outcome = Some(outcome);
    }
}

/// Searches the grid between its unique source and target cells.
///
/// # Errors
///
/// Returns [`GridError::MissingEndpoint`] if the grid does not hold exactly one source and one
/// target.
pub fn dijkstra(grid: &mut Grid) -> Result<SearchOutcome, GridError> {
    Ok(Search::new(grid)?.run())
}

/// Walks predecessor links back from `target` and returns them in source-to-target order.
///
/// The walk stops at the first cell without a predecessor. It is only a shortest path if the
/// search actually settled `target`; otherwise it is whatever partial chain the grid holds, and
/// it is empty when `target` lies outside the grid.
#[must_use]
pub fn reconstruct_path(grid: &Grid, target: Coord) -> Vec<Coord> {
    let mut path = Vec::new();
    let mut current = grid.cell(target).map(Cell::coord);

    while let Some(coord) = current {
        if path.len() >= grid.cell_count() {
            log::warn!("predecessor chain from {target} is longer than the grid, truncating");
            break;
        }
        path.push(coord);
        current = grid.cell(coord).and_then(Cell::predecessor);
    }

    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use rand::{rngs::StdRng, Rng as _, SeedableRng as _};

    use super::*;

    /// Builds a grid from a `.gridmap`-style layout.
    fn grid_from(rows: &[&str]) -> Grid {
        let cols = rows.first().map_or(0, |row| row.len());
        let mut grid = Grid::new(rows.len(), cols).expect("failed to create grid");
        for (row, line) in rows.iter().enumerate() {
            for (col, glyph) in line.chars().enumerate() {
                let kind = CellKind::from_glyph(glyph).expect("unknown glyph in test layout");
                grid.set_kind(Coord::new(row, col), kind)
                    .expect("coordinate should be in bounds");
            }
        }
        grid
    }

    /// Random layout with the source and target at fixed corners.
    fn random_grid(rng: &mut StdRng, rows: usize, cols: usize, density: f64) -> Grid {
        let mut grid = Grid::new(rows, cols).expect("failed to create grid");
        for row in 0..rows {
            for col in 0..cols {
                if rng.random_bool(density) {
                    grid.set_kind(Coord::new(row, col), CellKind::Wall)
                        .expect("coordinate should be in bounds");
                }
            }
        }
        grid.place_source(Coord::new(0, 0))
            .expect("coordinate should be in bounds");
        grid.place_target(Coord::new(rows - 1, cols - 1))
            .expect("coordinate should be in bounds");
        grid
    }

    /// Independent breadth-first distance from the source to the target.
    fn bfs_distance(grid: &Grid) -> Option<usize> {
        let (source, target) = grid.endpoints().expect("grid should have endpoints");
        let mut seen = vec![false; grid.cell_count()];
        let mut queue = VecDeque::from([(source, 0)]);
        if let Some(flag) = grid.index(source).and_then(|idx| seen.get_mut(idx)) {
            *flag = true;
        }

        while let Some((coord, distance)) = queue.pop_front() {
            if coord == target {
                return Some(distance);
            }
            let Coord { row, col } = coord;
            let candidates = [
                row.checked_sub(1).map(|up| Coord::new(up, col)),
                Some(Coord::new(row + 1, col)),
                col.checked_sub(1).map(|left| Coord::new(row, left)),
                Some(Coord::new(row, col + 1)),
            ];
            for next in candidates.into_iter().flatten() {
                if matches!(grid.kind(next), None | Some(CellKind::Wall)) {
                    continue;
                }
                if let Some(flag) = grid.index(next).and_then(|idx| seen.get_mut(idx)) {
                    if !*flag {
                        *flag = true;
                        queue.push_back((next, distance + 1));
                    }
                }
            }
        }

        None
    }

    /// Checks the shape of a path between two endpoints.
    fn assert_valid_path(path: &[Coord], source: Coord, target: Coord) {
        assert_eq!(path.first(), Some(&source), "path should start at the source");
        assert_eq!(path.last(), Some(&target), "path should end at the target");
        for pair in path.windows(2) {
            if let [from, to] = pair {
                assert!(from.is_adjacent(*to), "{from} and {to} are not adjacent");
            }
        }
    }

    #[test]
    fn test_two_cell_grid() {
        let mut grid = grid_from(&["ST"]);
        let outcome = dijkstra(&mut grid).expect("search should start");

        assert_eq!(outcome.outcome(), Outcome::Reached);
        assert_eq!(outcome.order(), &[Coord::new(0, 0), Coord::new(0, 1)]);
        assert_eq!(
            outcome.path(&grid),
            vec![Coord::new(0, 0), Coord::new(0, 1)]
        );
    }

    #[test]
    fn test_wall_row_blocks_target() {
        let mut grid = grid_from(&["S..", "###", "..T"]);
        let outcome = dijkstra(&mut grid).expect("search should start");

        assert_eq!(outcome.outcome(), Outcome::Unreachable);
        assert_eq!(
            outcome.order(),
            &[Coord::new(0, 0), Coord::new(0, 1), Coord::new(0, 2)]
        );
        assert!(outcome.path(&grid).is_empty());
        assert!(!grid
            .cell(Coord::new(2, 2))
            .expect("target should exist")
            .is_visited());
    }

    #[test]
    fn test_wall_in_corridor_blocks_target() {
        let mut grid = grid_from(&["S.#.T"]);
        let outcome = dijkstra(&mut grid).expect("search should start");

        assert_eq!(outcome.outcome(), Outcome::Unreachable);
        assert_eq!(outcome.order(), &[Coord::new(0, 0), Coord::new(0, 1)]);
    }

    #[test]
    fn test_source_equal_to_target() {
        let mut grid = grid_from(&["...", ".S.", "..."]);
        let at = Coord::new(1, 1);
        let outcome = Search::between(&mut grid, at, at)
            .expect("search should start")
            .run();

        assert!(outcome.is_reached());
        assert_eq!(outcome.order(), &[at]);
        assert_eq!(outcome.path(&grid), vec![at]);
    }

    #[test]
    fn test_walled_target_exhausts_frontier() {
        let mut grid = grid_from(&["S.", ".#"]);
        let wall = Coord::new(1, 1);
        let mut search =
            Search::between(&mut grid, Coord::new(0, 0), wall).expect("search should start");

        let mut steps = Vec::new();
        while let Some(step) = search.step() {
            steps.push(step);
        }

        assert_eq!(
            steps,
            vec![
                Step::Settled(Coord::new(0, 0)),
                Step::Settled(Coord::new(0, 1)),
                Step::Settled(Coord::new(1, 0)),
                Step::SkippedWall(wall),
            ]
        );
        assert_eq!(search.outcome(), Some(Outcome::Unreachable));
        assert_eq!(
            search.order(),
            &[Coord::new(0, 0), Coord::new(0, 1), Coord::new(1, 0)]
        );
        assert!(search.grid().cells().all(|cell| cell.kind() == CellKind::Wall
            || cell.is_visited()));
    }

    #[test]
    fn test_between_rejects_out_of_bounds() {
        let mut grid = grid_from(&["S.T"]);
        let result = Search::between(&mut grid, Coord::new(0, 0), Coord::new(4, 0));

        assert_eq!(
            result.err(),
            Some(GridError::OutOfBounds {
                coord: Coord::new(4, 0),
                rows: 1,
                cols: 3,
            })
        );
    }

    #[test]
    fn test_missing_target_leaves_grid_untouched() {
        let mut grid = grid_from(&["S.."]);
        grid.cell_mut(Coord::new(0, 2))
            .expect("cell should exist")
            .distance = 7;
        let before = grid.clone();
        let result = dijkstra(&mut grid);

        assert_eq!(
            result,
            Err(GridError::MissingEndpoint {
                kind: CellKind::Target,
                found: 0,
            })
        );
        assert_eq!(grid, before);
    }

    #[test]
    fn test_duplicate_source_is_rejected() {
        let mut grid = grid_from(&["S.S", "..T"]);

        assert_eq!(
            dijkstra(&mut grid),
            Err(GridError::MissingEndpoint {
                kind: CellKind::Source,
                found: 2,
            })
        );
    }

    #[test]
    fn test_ties_break_row_major() {
        let mut grid = grid_from(&["...", ".S.", "..T"]);
        let outcome = dijkstra(&mut grid).expect("search should start");

        assert_eq!(
            outcome.order(),
            &[
                Coord::new(1, 1),
                Coord::new(0, 1),
                Coord::new(1, 0),
                Coord::new(1, 2),
                Coord::new(2, 1),
                Coord::new(0, 0),
                Coord::new(0, 2),
                Coord::new(2, 0),
                Coord::new(2, 2),
            ]
        );
    }

    #[test]
    fn test_path_detours_around_walls() {
        let mut grid = grid_from(&["S#...", ".#.#.", "...#T"]);
        let outcome = dijkstra(&mut grid).expect("search should start");
        let path = outcome.path(&grid);

        assert!(outcome.is_reached());
        assert_valid_path(&path, Coord::new(0, 0), Coord::new(2, 4));
        assert_eq!(path.len() - 1, 10);
    }

    #[test]
    fn test_step_reports_skipped_walls() {
        let mut grid = grid_from(&["S#", "T."]);
        let mut search = Search::new(&mut grid).expect("search should start");

        assert_eq!(search.step(), Some(Step::Settled(Coord::new(0, 0))));
        assert_eq!(search.step(), Some(Step::SkippedWall(Coord::new(0, 1))));
        assert_eq!(search.step(), Some(Step::Settled(Coord::new(1, 0))));
        assert_eq!(search.outcome(), Some(Outcome::Reached));
        assert_eq!(search.step(), None);
        assert_eq!(search.order(), &[Coord::new(0, 0), Coord::new(1, 0)]);
    }

    #[test]
    fn test_step_matches_run() {
        let mut stepped_grid = grid_from(&["S...", ".##.", "...T"]);
        let mut ran_grid = stepped_grid.clone();

        let mut search = Search::new(&mut stepped_grid).expect("search should start");
        let mut settled = Vec::new();
        while let Some(step) = search.step() {
            if let Step::Settled(coord) = step {
                settled.push(coord);
            }
        }
        let outcome = dijkstra(&mut ran_grid).expect("search should start");

        assert_eq!(settled, outcome.order());
    }

    #[test]
    fn test_search_resets_previous_state() {
        let mut grid = grid_from(&["S..", "...", "..T"]);
        let first = dijkstra(&mut grid).expect("search should start");
        let second = dijkstra(&mut grid).expect("search should start");

        assert_eq!(first, second);
    }

    #[test]
    fn test_search_never_changes_kinds() {
        let mut grid = grid_from(&["S.#", "..#", "#.T"]);
        let kinds: Vec<CellKind> = grid.cells().map(Cell::kind).collect();
        let _ = dijkstra(&mut grid).expect("search should start");

        assert_eq!(kinds, grid.cells().map(Cell::kind).collect::<Vec<_>>());
    }

    #[test]
    fn test_reconstruct_path_of_unreached_target() {
        let mut grid = grid_from(&["S#T"]);
        let _ = dijkstra(&mut grid).expect("search should start");

        assert_eq!(reconstruct_path(&grid, Coord::new(0, 2)), vec![Coord::new(0, 2)]);
        assert!(reconstruct_path(&grid, Coord::new(5, 5)).is_empty());
    }

    #[test]
    fn test_open_grid_path_matches_manhattan_distance() {
        let layouts: [(usize, usize, Coord, Coord); 4] = [
            (1, 6, Coord::new(0, 5), Coord::new(0, 0)),
            (5, 5, Coord::new(0, 0), Coord::new(4, 4)),
            (7, 3, Coord::new(6, 1), Coord::new(2, 0)),
            (20, 40, Coord::new(9, 9), Coord::new(9, 29)),
        ];

        for (rows, cols, source, target) in layouts {
            let mut grid = Grid::new(rows, cols).expect("failed to create grid");
            grid.place_source(source)
                .expect("coordinate should be in bounds");
            grid.place_target(target)
                .expect("coordinate should be in bounds");
            let outcome = dijkstra(&mut grid).expect("search should start");
            let path = outcome.path(&grid);

            assert_valid_path(&path, source, target);
            assert_eq!(path.len() - 1, source.manhattan(target));
        }
    }

    #[test]
    fn test_random_layouts_hold_search_properties() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..200 {
            let rows = rng.random_range(1..9);
            let cols = rng.random_range(2..9);
            let mut grid = random_grid(&mut rng, rows, cols, 0.3);
            let expected = bfs_distance(&grid);
            let outcome = dijkstra(&mut grid).expect("search should start");

            let distances: Vec<usize> = outcome
                .order()
                .iter()
                .map(|coord| grid.cell(*coord).expect("settled cell should exist").distance())
                .collect();
            assert!(
                distances.windows(2).all(|pair| pair.first() <= pair.last()),
                "settlement order should be non-decreasing in distance"
            );
            assert!(
                outcome
                    .order()
                    .iter()
                    .all(|coord| grid.kind(*coord) != Some(CellKind::Wall)),
                "walls should never be settled"
            );
            assert_eq!(outcome.order().first(), Some(&outcome.source()));

            match expected {
                Some(distance) => {
                    assert!(outcome.is_reached(), "target should be reachable");
                    let path = outcome.path(&grid);
                    assert_valid_path(&path, outcome.source(), outcome.target());
                    assert_eq!(path.len() - 1, distance);
                }
                None => {
                    assert_eq!(outcome.outcome(), Outcome::Unreachable);
                    assert!(!outcome.order().is_empty());
                }
            }
        }
    }

    #[test]
    fn test_identical_layouts_give_identical_results() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut first = random_grid(&mut rng, 12, 15, 0.25);
        let mut second = Grid::new(12, 15).expect("failed to create grid");
        for cell in first.cells() {
            second
                .set_kind(cell.coord(), cell.kind())
                .expect("coordinate should be in bounds");
        }

        let first_outcome = dijkstra(&mut first).expect("search should start");
        let second_outcome = dijkstra(&mut second).expect("search should start");

        assert_eq!(first_outcome, second_outcome);
        assert_eq!(first_outcome.path(&first), second_outcome.path(&second));
    }

    #[test]
    fn test_settled_cells_are_final() {
        let mut grid = grid_from(&["S...", ".#..", "...T"]);
        let outcome = dijkstra(&mut grid).expect("search should start");

        for coord in outcome.order() {
            let cell = grid.cell(*coord).expect("settled cell should exist");
            assert!(cell.is_visited());
            let chain = reconstruct_path(&grid, *coord);
            assert_eq!(chain.len() - 1, cell.distance());
            assert_eq!(chain.first(), Some(&outcome.source()));
        }
    }
}
