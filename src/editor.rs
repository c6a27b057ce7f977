//! Grid editor state behind the in-game screen.

use color_eyre::eyre::Result;
use rand::Rng;

use crate::{
    grid::{CellKind, Coord, Grid},
    map,
    replay::{self, Pacing, PaintState, ReplayManager},
    report, search,
    types::Direction,
};

/// Editable copy of a map, the cursor over it and the replay of the last search.
#[derive(Clone, Debug)]
pub(crate) struct Editor {
    /// Layout being edited. Searches run on this grid.
    pub(crate) grid: Grid,
    /// Cell the next edit applies to.
    pub(crate) cursor: Coord,
    /// Replay of the last search.
    pub(crate) replay: ReplayManager,
    /// Message describing the last search or failed action.
    pub(crate) status: Option<String>,
    /// Replay timing.
    pacing: Pacing,
    /// Wall probability used by [`Editor::randomize`].
    wall_density: f64,
}

impl Editor {
    /// Creates an editor over a grid with the cursor on the source, if there is one.
    pub(crate) fn new(grid: Grid, pacing: Pacing, wall_density: f64) -> Self {
        let mut editor = Self {
            grid,
            cursor: Coord::default(),
            replay: ReplayManager::new(),
            status: None,
            pacing,
            wall_density,
        };
        editor.focus_source();
        editor
    }

    /// Swaps in a new grid, dropping the replay and status of the previous one.
    pub(crate) fn load(&mut self, grid: Grid) {
        self.grid = grid;
        self.replay.clear();
        self.status = None;
        self.focus_source();
    }

    /// Puts the cursor on the source cell, or the top-left corner without one.
    fn focus_source(&mut self) {
        self.cursor = self.grid.find_unique(CellKind::Source).unwrap_or_default();
    }

    /// Whether a replay is still playing. Edits are ignored meanwhile.
    pub(crate) fn is_busy(&self) -> bool {
        self.replay.is_running()
    }

    /// Moves the cursor one cell, staying inside the grid.
    pub(crate) fn move_cursor(&mut self, direction: Direction) {
        self.cursor = direction.apply(self.cursor, self.grid.rows(), self.grid.cols());
    }

    /// Clears the previous result before an edit.
    fn begin_edit(&mut self) -> bool {
        if self.is_busy() {
            return false;
        }
        self.replay.clear();
        self.status = None;
        true
    }

    /// Toggles a wall under the cursor.
    ///
    /// # Errors
    ///
    /// This function returns an error if the cursor left the grid.
    pub(crate) fn toggle_wall(&mut self) -> Result<()> {
        if self.begin_edit() {
            let _ = self.grid.toggle_wall(self.cursor)?;
        }

        Ok(())
    }

    /// Moves the source under the cursor.
    ///
    /// # Errors
    ///
    /// This function returns an error if the cursor left the grid.
    pub(crate) fn place_source(&mut self) -> Result<()> {
        if self.begin_edit() {
            self.grid.place_source(self.cursor)?;
        }

        Ok(())
    }

    /// Moves the target under the cursor.
    ///
    /// # Errors
    ///
    /// This function returns an error if the cursor left the grid.
    pub(crate) fn place_target(&mut self) -> Result<()> {
        if self.begin_edit() {
            self.grid.place_target(self.cursor)?;
        }

        Ok(())
    }

    /// Replaces the walls with random ones.
    ///
    /// # Errors
    ///
    /// This function returns an error if the configured density is not a probability.
    pub(crate) fn randomize<R: Rng>(&mut self, rng: &mut R) -> Result<()> {
        if self.begin_edit() {
            let placed = map::randomize_walls(&mut self.grid, self.wall_density, rng)?;
            self.status = Some(format!("placed {placed} random walls"));
        }

        Ok(())
    }

    /// Restores the pristine layout of the current map.
    pub(crate) fn reset_to(&mut self, pristine: &Grid) {
        if self.begin_edit() {
            self.grid.clone_from(pristine);
        }
    }

    /// Runs the search on the current layout and starts its replay.
    ///
    /// A layout without exactly one source and one target is not an error here; the reason is
    /// shown in the status line instead.
    pub(crate) fn visualize(&mut self) {
        if self.is_busy() {
            return;
        }

        match search::dijkstra(&mut self.grid) {
            Ok(outcome) => {
                let path = outcome.path(&self.grid);
                let summary = report::summary(&outcome, &path);
                log::info!("{summary}");
                self.replay
                    .load(replay::schedule_replay(&outcome, &path, self.pacing));
                self.status = Some(summary);
            }
            Err(err) => {
                log::info!("search refused: {err}");
                self.replay.clear();
                self.status = Some(format!("cannot search: {err}"));
            }
        }
    }

    /// Advances the replay according to the wall clock.
    pub(crate) fn tick(&mut self) {
        let _ = self.replay.update();
    }

    /// Replay state painted on a cell.
    pub(crate) fn overlay(&self, coord: Coord) -> Option<PaintState> {
        self.replay.overlay(coord)
    }
}
