//! Type definitions and enums for the application state and navigation.

use crate::grid::Coord;

/// Enumeration of available application screens.
///
/// This is used to determine which screen to render and what the keys do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Screen {
    /// Main menu with the given entry highlighted.
    MainMenu(MainMenuItem),
    /// List of loadable maps.
    MapMenu,
    /// Grid editor and search replay.
    Editor,
}

/// Main menu entries, top to bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MainMenuItem {
    /// Opens the editor on the current map.
    EditGrid,
    /// Opens the map list.
    LoadMap,
    /// Leaves the application.
    Quit,
}

impl MainMenuItem {
    /// Every entry in display order.
    pub(crate) const ALL: [Self; 3] = [Self::EditGrid, Self::LoadMap, Self::Quit];

    /// Label shown in the menu.
    pub(crate) const fn label(self) -> &'static str {
        match self {
            Self::EditGrid => "Edit Grid",
            Self::LoadMap => "Load Map",
            Self::Quit => "Quit",
        }
    }

    /// Entry below this one, sticking at the bottom.
    pub(crate) const fn next(self) -> Self {
        match self {
            Self::EditGrid => Self::LoadMap,
            Self::LoadMap | Self::Quit => Self::Quit,
        }
    }

    /// Entry above this one, sticking at the top.
    pub(crate) const fn previous(self) -> Self {
        match self {
            Self::EditGrid | Self::LoadMap => Self::EditGrid,
            Self::Quit => Self::LoadMap,
        }
    }
}

/// Cursor movement in the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    /// One row up.
    Up,
    /// One row down.
    Down,
    /// One column left.
    Left,
    /// One column right.
    Right,
}

impl Direction {
    /// Moves `coord` one cell in this direction, staying inside a `rows x cols` grid.
    pub(crate) fn apply(self, coord: Coord, rows: usize, cols: usize) -> Coord {
        let Coord { row, col } = coord;
        match self {
            Self::Up => Coord::new(row.saturating_sub(1), col),
            Self::Down => Coord::new((row + 1).min(rows.saturating_sub(1)), col),
            Self::Left => Coord::new(row, col.saturating_sub(1)),
            Self::Right => Coord::new(row, (col + 1).min(cols.saturating_sub(1))),
        }
    }
}
