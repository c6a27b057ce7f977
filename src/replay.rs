//! Search replay module.
//!
//! A finished search is shown after the fact: [`schedule_replay`] turns the settlement order and
//! the shortest path into a list of timed paint events, and [`ReplayManager`] applies the events
//! that are due against a clock. Neither touches the search itself.

use std::{
    collections::BTreeMap,
    time::{Duration, Instant},
};

use crate::{grid::Coord, search::SearchOutcome};

/// Delay between two settled cells being painted, in milliseconds.
pub(crate) const VISITED_DELAY_MS: u64 = 20;

/// Delay between two path cells being painted, in milliseconds.
pub(crate) const PATH_DELAY_MS: u64 = 50;

/// Display state a replay paints a cell with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaintState {
    /// The cell was settled by the search.
    Visited,
    /// The cell lies on the shortest path.
    Path,
}

/// Paint one cell with a state at a given offset from the start of the replay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaintEvent {
    /// Position of the event in the replay.
    pub step: usize,
    /// Offset from the start of the replay at which the event is due.
    pub at: Duration,
    /// Cell to paint.
    pub coord: Coord,
    /// State to paint it with.
    pub state: PaintState,
}

/// Replay timing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pacing {
    /// Gap between consecutive settled cells.
    pub visited_delay: Duration,
    /// Gap between consecutive path cells.
    pub path_delay: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            visited_delay: Duration::from_millis(VISITED_DELAY_MS),
            path_delay: Duration::from_millis(PATH_DELAY_MS),
        }
    }
}

/// `delay * index`, saturating instead of overflowing.
fn offset(delay: Duration, index: usize) -> Duration {
    delay.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX))
}

/// Turns a finished search into paint events.
///
/// Every settled cell is painted [`PaintState::Visited`] at `i * visited_delay`, where `i` is its
/// position in the settlement order. Once the whole order has played, every path cell is painted
/// [`PaintState::Path`] at `i * path_delay` after that. The source and target are never painted,
/// though their positions still count toward the timing.
#[must_use]
pub fn schedule_replay(outcome: &SearchOutcome, path: &[Coord], pacing: Pacing) -> Vec<PaintEvent> {
    let is_endpoint = |coord: Coord| coord == outcome.source() || coord == outcome.target();
    let path_start = offset(pacing.visited_delay, outcome.order().len());

    let visited = outcome
        .order()
        .iter()
        .enumerate()
        .map(|(idx, coord)| (offset(pacing.visited_delay, idx), *coord, PaintState::Visited));
    let shortest = path.iter().enumerate().map(|(idx, coord)| {
        (
            path_start.saturating_add(offset(pacing.path_delay, idx)),
            *coord,
            PaintState::Path,
        )
    });

    visited
        .chain(shortest)
        .filter(|(_, coord, _)| !is_endpoint(*coord))
        .enumerate()
        .map(|(step, (at, coord, state))| PaintEvent {
            step,
            at,
            coord,
            state,
        })
        .collect()
}

/// Replay state manager.
///
/// This structure holds the scheduled events of the last search, how many of them have been
/// applied, and the resulting per-cell overlay the front end draws over the grid.
#[derive(Clone, Debug)]
pub struct ReplayManager {
    /// Scheduled events, sorted by their offset.
    events: Vec<PaintEvent>,
    /// Number of events already applied.
    cursor: usize,
    /// Instant the replay was (re)started at.
    started: Instant,
    /// State each painted cell currently shows.
    overlay: BTreeMap<Coord, PaintState>,
}

impl Default for ReplayManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplayManager {
    /// Creates an idle replay manager with no events.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            cursor: 0,
            started: Instant::now(),
            overlay: BTreeMap::new(),
        }
    }

    /// Replaces the events and restarts the replay from the beginning.
    pub fn load(&mut self, events: Vec<PaintEvent>) {
        self.events = events;
        self.reset();
    }

    /// Rewinds the replay to its beginning, keeping the events.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.overlay.clear();
        self.started = Instant::now();
    }

    /// Drops every event and the overlay.
    pub fn clear(&mut self) {
        self.events.clear();
        self.reset();
    }

    /// Applies every event due at `elapsed` since the start and returns how many were applied.
    pub fn advance_to(&mut self, elapsed: Duration) -> usize {
        let due = self
            .events
            .iter()
            .skip(self.cursor)
            .take_while(|event| event.at <= elapsed);

        let mut applied = 0;
        for event in due {
            let _ = self.overlay.insert(event.coord, event.state);
            applied += 1;
        }
        self.cursor += applied;

        applied
    }

    /// Applies the events that are due according to the wall clock.
    pub fn update(&mut self) -> usize {
        self.advance_to(self.started.elapsed())
    }

    /// Whether there are events and all of them have been applied.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        !self.events.is_empty() && self.cursor >= self.events.len()
    }

    /// Whether events are still pending.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.cursor < self.events.len()
    }

    /// State painted on the cell so far, if any.
    #[must_use]
    pub fn overlay(&self, coord: Coord) -> Option<PaintState> {
        self.overlay.get(&coord).copied()
    }

    /// Every painted cell with its state, in row-major order.
    pub fn painted(&self) -> impl Iterator<Item = (Coord, PaintState)> + '_ {
        self.overlay.iter().map(|(coord, state)| (*coord, *state))
    }

    /// Offset of the last event, or zero without events.
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.events.last().map_or(Duration::ZERO, |event| event.at)
    }

    /// Number of applied events and total number of events.
    #[must_use]
    pub fn progress(&self) -> (usize, usize) {
        (self.cursor, self.events.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        grid::{CellKind, Grid},
        search,
    };

    /// Runs a search over a single-row corridor of the given width with one optional wall.
    fn corridor(width: usize, wall: Option<usize>) -> (SearchOutcome, Vec<Coord>) {
        let mut grid = Grid::new(1, width).expect("failed to create grid");
        grid.place_source(Coord::new(0, 0))
            .expect("coordinate should be in bounds");
        grid.place_target(Coord::new(0, width - 1))
            .expect("coordinate should be in bounds");
        if let Some(col) = wall {
            grid.set_kind(Coord::new(0, col), CellKind::Wall)
                .expect("coordinate should be in bounds");
        }
        let outcome = search::dijkstra(&mut grid).expect("search should start");
        let path = outcome.path(&grid);
        (outcome, path)
    }

    /// Pacing with round numbers.
    const fn pacing() -> Pacing {
        Pacing {
            visited_delay: Duration::from_millis(10),
            path_delay: Duration::from_millis(100),
        }
    }

    #[test]
    fn test_schedule_skips_endpoints() {
        let (outcome, path) = corridor(4, None);
        let events = schedule_replay(&outcome, &path, pacing());

        assert!(events
            .iter()
            .all(|event| event.coord != Coord::new(0, 0) && event.coord != Coord::new(0, 3)));
        assert_eq!(events.len(), 4);
    }

    #[test]
    fn test_schedule_timing() {
        let (outcome, path) = corridor(4, None);
        let events = schedule_replay(&outcome, &path, pacing());

        assert_eq!(
            events,
            vec![
                PaintEvent {
                    step: 0,
                    at: Duration::from_millis(10),
                    coord: Coord::new(0, 1),
                    state: PaintState::Visited,
                },
                PaintEvent {
                    step: 1,
                    at: Duration::from_millis(20),
                    coord: Coord::new(0, 2),
                    state: PaintState::Visited,
                },
                PaintEvent {
                    step: 2,
                    at: Duration::from_millis(140),
                    coord: Coord::new(0, 1),
                    state: PaintState::Path,
                },
                PaintEvent {
                    step: 3,
                    at: Duration::from_millis(240),
                    coord: Coord::new(0, 2),
                    state: PaintState::Path,
                },
            ]
        );
    }

    #[test]
    fn test_schedule_unreachable_has_no_path_events() {
        let (outcome, path) = corridor(5, Some(2));
        let events = schedule_replay(&outcome, &path, pacing());

        assert!(path.is_empty());
        assert_eq!(events.len(), 1);
        assert!(events
            .iter()
            .all(|event| event.state == PaintState::Visited));
    }

    #[test]
    fn test_manager_advances_with_time() {
        let (outcome, path) = corridor(4, None);
        let mut manager = ReplayManager::new();
        manager.load(schedule_replay(&outcome, &path, pacing()));

        assert_eq!(manager.advance_to(Duration::from_millis(15)), 1);
        assert_eq!(manager.overlay(Coord::new(0, 1)), Some(PaintState::Visited));
        assert_eq!(manager.overlay(Coord::new(0, 2)), None);
        assert!(manager.is_running());

        assert_eq!(manager.advance_to(Duration::from_millis(150)), 2);
        assert_eq!(manager.overlay(Coord::new(0, 1)), Some(PaintState::Path));
        assert_eq!(manager.overlay(Coord::new(0, 2)), Some(PaintState::Visited));

        assert_eq!(manager.advance_to(Duration::from_secs(1)), 1);
        assert!(manager.is_finished());
        assert!(!manager.is_running());
        assert_eq!(manager.progress(), (4, 4));
        assert_eq!(manager.total_duration(), Duration::from_millis(240));
    }

    #[test]
    fn test_manager_advance_is_idempotent() {
        let (outcome, path) = corridor(4, None);
        let mut manager = ReplayManager::new();
        manager.load(schedule_replay(&outcome, &path, pacing()));

        assert_eq!(manager.advance_to(Duration::from_millis(20)), 2);
        assert_eq!(manager.advance_to(Duration::from_millis(20)), 0);
    }

    #[test]
    fn test_manager_reset_and_clear() {
        let (outcome, path) = corridor(3, None);
        let mut manager = ReplayManager::new();
        manager.load(schedule_replay(&outcome, &path, pacing()));
        let _ = manager.advance_to(Duration::from_secs(1));

        manager.reset();
        assert_eq!(manager.painted().count(), 0);
        assert_eq!(manager.progress(), (0, 2));

        manager.clear();
        assert_eq!(manager.progress(), (0, 0));
        assert!(!manager.is_finished());
        assert!(!manager.is_running());
    }

    #[test]
    fn test_idle_manager_update_applies_nothing() {
        let mut manager = ReplayManager::default();

        assert_eq!(manager.update(), 0);
        assert_eq!(manager.total_duration(), Duration::ZERO);
    }
}
