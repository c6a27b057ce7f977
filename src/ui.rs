//! User interface rendering functions for all application screens.

use std::rc::Rc;

use color_eyre::eyre::{OptionExt as _, Result};
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    symbols::{Marker, DOT},
    text::Line,
    widgets::{
        canvas::{Canvas, Points},
        Block, BorderType, Borders, Clear, Paragraph,
    },
    Frame,
};

use crate::{
    grid::{CellKind, Coord, Grid},
    replay::PaintState,
    types::{MainMenuItem, Screen},
    App,
};

/// Key hints shown above the editor status line.
const EDITOR_KEYS: &str = "(hjkl) move / (space) wall / (s) source / (t) target / (enter) search / (r) random / (c) reset / (w) save / (esc) menu";

/// Updates the application UI based on the persistent state.
///
/// This function renders different screens based on the current state stored in the [`App`]
/// structure, dispatching to the appropriate rendering function for each screen type.
///
/// # Errors
///
/// This function may return errors from layout lookups or coordinate conversion failures.
pub(crate) fn draw(app: &mut App, frame: &mut Frame) -> Result<()> {
    match app.screen {
        Screen::MainMenu(item) => main_menu(frame, item),
        Screen::MapMenu => map_menu(app, frame)?,
        Screen::Editor => editor(app, frame)?,
    }

    Ok(())
}

/// Clears the terminal screen by rendering a [`Clear`] widget.
fn clear(frame: &mut Frame) {
    frame.render_widget(Clear, frame.area());
}

/// Renders a centered, bordered menu box and returns one row per entry inside it.
#[expect(
    clippy::indexing_slicing,
    reason = "The collection is created in-place with few, known elements; there is no risk of bad indexing."
)]
fn init_menu(frame: &mut Frame, title: &str, entries: u16) -> Rc<[Rect]> {
    let space = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Percentage(20),
        Constraint::Percentage(40),
    ])
    .split(frame.area())[1];
    let space = Layout::horizontal([
        Constraint::Percentage(35),
        Constraint::Percentage(30),
        Constraint::Percentage(35),
    ])
    .split(space)[1];

    let layout = Layout::vertical([Constraint::Max(entries + 2)])
        .flex(Flex::Center)
        .split(space)[0];

    let block = Block::bordered()
        .title(title)
        .title_bottom("(j) down / (k) up / (l) select")
        .title_alignment(Alignment::Center)
        .style(Color::Green)
        .border_type(BorderType::Rounded);

    let inner_space = block.inner(layout);
    frame.render_widget(block, layout);

    Layout::vertical(vec![Constraint::Max(1); entries.into()]).split(inner_space)
}

/// Renders the main menu, highlighting the selected entry.
fn main_menu(frame: &mut Frame, item: MainMenuItem) {
    clear(frame);

    let entries = MainMenuItem::ALL;
    let rows = init_menu(frame, "Pathtuine", 3);

    let content_style = Style::default().fg(Color::Green);
    let active_content_style = Style::default().fg(Color::White).bg(Color::Green);

    for (entry, row) in entries.into_iter().zip(rows.iter()) {
        let style = if entry == item {
            active_content_style
        } else {
            content_style
        };
        frame.render_widget(Line::styled(entry.label(), style).centered(), *row);
    }
}

/// Renders the map selection menu with a scrollable list of available maps.
///
/// This function displays a viewport into [`App::maps`]. The row under the cursor is highlighted
/// and the map currently being edited carries a dot.
///
/// # Errors
///
/// This function may return errors if the layout does not have the expected areas.
fn map_menu(app: &mut App, frame: &mut Frame) -> Result<()> {
    clear(frame);

    let space = Layout::horizontal([
        Constraint::Percentage(30),
        Constraint::Fill(1),
        Constraint::Percentage(30),
    ])
    .split(frame.area())
    .get(1)
    .copied()
    .ok_or_eyre("failed to get map list column from layout")?;
    let space = Layout::vertical([
        Constraint::Percentage(30),
        Constraint::Fill(1),
        Constraint::Percentage(30),
    ])
    .split(space)
    .get(1)
    .copied()
    .ok_or_eyre("failed to get map list row from layout")?;

    let block = Block::bordered()
        .title_top("Map list")
        .title_bottom("(j) down / (k) up / (l) load / (h) return")
        .title_alignment(Alignment::Center)
        .style(Color::Green)
        .border_type(BorderType::Rounded);

    let inner_space = block.inner(space);
    frame.render_widget(block, space);

    app.viewport_height = inner_space.height.into();

    let [selector_column, list_column] =
        Layout::horizontal([Constraint::Length(3), Constraint::Fill(1)]).areas(inner_space);
    let rows = vec![Constraint::Length(1); app.viewport_height];
    let selectors = Layout::vertical(rows.clone()).split(selector_column);
    let entries = Layout::vertical(rows).split(list_column);

    let content_style = Style::default().fg(Color::Green);
    let active_content_style = Style::default().fg(Color::White).bg(Color::Green);

    let visible = app
        .maps
        .iter()
        .enumerate()
        .skip(app.viewport_offset)
        .take(app.viewport_height);
    for ((index, map), (selector_area, entry_area)) in
        visible.zip(selectors.iter().zip(entries.iter()))
    {
        let style = if index == app.viewport_index {
            active_content_style
        } else {
            content_style
        };
        let marker = if *map == app.map { DOT } else { " " };
        let label = format!("{} ({}x{})", map.key, map.grid.rows(), map.grid.cols());

        frame.render_widget(Line::styled(marker, style).centered(), *selector_area);
        frame.render_widget(Line::styled(label, style), *entry_area);
    }

    Ok(())
}

/// Half the extent of `cells` canvas points centered on zero.
///
/// Single-cell extents are widened so the canvas bounds never collapse.
fn half_extent(cells: usize) -> Result<f64> {
    Ok((f64::from(u16::try_from(cells)?) - 1.).max(1.) / 2.)
}

/// Maps grid coordinates onto canvas coordinates centered on zero.
///
/// Columns grow to the right as `col - (cols - 1) / 2` and rows grow downwards as
/// `(rows - 1) / 2 - row`, so every cell lands on its own canvas point when the canvas has one
/// terminal cell per grid cell.
fn to_screen_coords(coords: &[Coord], grid: &Grid) -> Result<Vec<(f64, f64)>> {
    let rows = f64::from(u16::try_from(grid.rows())?);
    let cols = f64::from(u16::try_from(grid.cols())?);

    coords
        .iter()
        .map(|coord| {
            let screen_x = f64::from(u16::try_from(coord.col)?) - (cols - 1.) / 2.;
            let screen_y = (rows - 1.) / 2. - f64::from(u16::try_from(coord.row)?);
            Ok((screen_x, screen_y))
        })
        .collect()
}

/// Cell coordinates grouped by how they are painted, bottom layer first.
#[derive(Debug, Default)]
struct Layers {
    /// Wall cells.
    walls: Vec<Coord>,
    /// Settled cells painted so far.
    visited: Vec<Coord>,
    /// Path cells painted so far.
    path: Vec<Coord>,
    /// Source cell, if any.
    sources: Vec<Coord>,
    /// Target cell, if any.
    targets: Vec<Coord>,
}

impl Layers {
    /// Sorts every non-empty cell of the edited grid into its layer.
    fn collect(app: &App) -> Self {
        let mut layers = Self::default();
        for cell in app.editor.grid.cells() {
            let coord = cell.coord();
            match (cell.kind(), app.editor.overlay(coord)) {
                (CellKind::Wall, _) => layers.walls.push(coord),
                (CellKind::Source, _) => layers.sources.push(coord),
                (CellKind::Target, _) => layers.targets.push(coord),
                (CellKind::Empty, Some(PaintState::Visited)) => layers.visited.push(coord),
                (CellKind::Empty, Some(PaintState::Path)) => layers.path.push(coord),
                (CellKind::Empty, None) => {}
            }
        }
        layers
    }
}

/// Renders the editor with the grid, the replay overlay and the status line.
///
/// The grid is drawn on a [`Canvas`] with one dot per cell. Walls, settled cells, the path and
/// the endpoints each get their own color and layer, and the cursor is drawn on top.
///
/// # Errors
///
/// This function may return errors from layout lookups or coordinate conversion operations.
fn editor(app: &mut App, frame: &mut Frame) -> Result<()> {
    clear(frame);

    let grid = &app.editor.grid;
    let grid_rows = u16::try_from(grid.rows())?;
    let grid_cols = u16::try_from(grid.cols())?;

    let [content_area, tooltip_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(3)]).areas(frame.area());

    let [_, board_area, _] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(grid_rows.saturating_add(2)),
        Constraint::Min(0),
    ])
    .areas(content_area);
    let [_, board_area, _] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(grid_cols.saturating_add(2)),
        Constraint::Min(0),
    ])
    .areas(board_area);

    let board = Block::bordered()
        .title(app.map.key.clone())
        .title_alignment(Alignment::Center)
        .style(Color::DarkGray)
        .border_type(BorderType::Rounded);
    let space = board.inner(board_area);
    frame.render_widget(board, board_area);

    let layers = Layers::collect(app);
    let walls = to_screen_coords(&layers.walls, grid)?;
    let visited = to_screen_coords(&layers.visited, grid)?;
    let path = to_screen_coords(&layers.path, grid)?;
    let sources = to_screen_coords(&layers.sources, grid)?;
    let targets = to_screen_coords(&layers.targets, grid)?;
    let cursor = to_screen_coords(&[app.editor.cursor], grid)?;

    let half_width = half_extent(grid.cols())?;
    let half_height = half_extent(grid.rows())?;

    let canvas = Canvas::default()
        .x_bounds([-half_width, half_width])
        .y_bounds([-half_height, half_height])
        .marker(Marker::Dot)
        .paint(|ctx| {
            for (coords, color) in [
                (&walls, Color::Green),
                (&visited, Color::Blue),
                (&path, Color::Yellow),
                (&sources, Color::Cyan),
                (&targets, Color::Red),
                (&cursor, Color::Magenta),
            ] {
                ctx.draw(&Points { coords, color });
                ctx.layer();
            }
        });
    frame.render_widget(canvas, space);

    let status = if app.editor.is_busy() {
        let (painted, total) = app.editor.replay.progress();
        format!("replaying {painted}/{total}")
    } else {
        app.editor
            .status
            .clone()
            .unwrap_or_else(|| format!("cursor at {}", app.editor.cursor))
    };

    let tooltip = Block::bordered()
        .title(EDITOR_KEYS)
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(Color::Green))
        .border_type(BorderType::Plain)
        .borders(Borders::TOP);
    let status_area = tooltip.inner(tooltip_area);
    frame.render_widget(tooltip, tooltip_area);
    frame.render_widget(Paragraph::new(Line::raw(status).centered()), status_area);

    Ok(())
}
