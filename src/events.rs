//! Event handling functions for user input and application state updates.

use std::time::Duration;

use color_eyre::eyre::Result;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEventKind};

use crate::{
    file_loader,
    types::{Direction, MainMenuItem, Screen},
    App,
};

/// How long to wait for input before advancing the replay.
const POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Suffix appended to a map key when saving an edited copy of it.
const EDITED_SUFFIX: &str = "-edited";

/// Handles input events and updates the application state accordingly.
///
/// This function polls for keyboard events and dispatches them to [`handle_key`]. The timeout is
/// short enough for the replay to advance smoothly while no key is pressed.
pub(crate) fn handle_events(app: &mut App) -> Result<()> {
    if event::poll(POLL_INTERVAL)? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                handle_key(app, key.code)?;
            }
        }
    }

    if app.screen == Screen::Editor {
        app.editor.tick();
    }

    Ok(())
}

/// Applies a single key press to the application state.
///
/// `q` quits from every screen; every other key depends on the screen being shown.
pub(crate) fn handle_key(app: &mut App, code: KeyCode) -> Result<()> {
    if code == KeyCode::Char('q') {
        app.exit = true;
        return Ok(());
    }

    match app.screen {
        Screen::MainMenu(item) => handle_main_menu(app, item, code),
        Screen::MapMenu => handle_map_menu(app, code),
        Screen::Editor => handle_editor(app, code),
    }
}

/// Handles navigation and selection in the main menu.
fn handle_main_menu(app: &mut App, item: MainMenuItem, code: KeyCode) -> Result<()> {
    match code {
        KeyCode::Char('j') | KeyCode::Down => app.screen = Screen::MainMenu(item.next()),
        KeyCode::Char('k') | KeyCode::Up => app.screen = Screen::MainMenu(item.previous()),
        KeyCode::Char('l') | KeyCode::Enter => match item {
            MainMenuItem::EditGrid => app.screen = Screen::Editor,
            MainMenuItem::LoadMap => {
                app.refresh_maps()?;
                app.screen = Screen::MapMenu;
            }
            MainMenuItem::Quit => app.exit = true,
        },
        _ => {}
    }

    Ok(())
}

/// Handles scrolling and selection in the map list.
///
/// The viewport follows the cursor: moving past its last row scrolls down by one, and moving
/// above its first row scrolls up by one.
fn handle_map_menu(app: &mut App, code: KeyCode) -> Result<()> {
    match code {
        KeyCode::Char('j') | KeyCode::Down => {
            if app.viewport_index + 1 < app.maps.len() {
                app.viewport_index += 1;
                if app.viewport_index >= app.viewport_offset + app.viewport_height.max(1) {
                    app.viewport_offset += 1;
                }
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.viewport_index = app.viewport_index.saturating_sub(1);
            app.viewport_offset = app.viewport_offset.min(app.viewport_index);
        }
        KeyCode::Char('l') | KeyCode::Enter => {
            app.select_map(app.viewport_index)?;
            app.screen = Screen::Editor;
        }
        KeyCode::Char('h') | KeyCode::Esc => app.screen = Screen::MainMenu(MainMenuItem::LoadMap),
        _ => {}
    }

    Ok(())
}

/// Handles cursor movement, edits and searches in the editor.
fn handle_editor(app: &mut App, code: KeyCode) -> Result<()> {
    let editor = &mut app.editor;
    match code {
        KeyCode::Char('k') | KeyCode::Up => editor.move_cursor(Direction::Up),
        KeyCode::Char('j') | KeyCode::Down => editor.move_cursor(Direction::Down),
        KeyCode::Char('h') | KeyCode::Left => editor.move_cursor(Direction::Left),
        KeyCode::Char('l') | KeyCode::Right => editor.move_cursor(Direction::Right),
        KeyCode::Char(' ') => editor.toggle_wall()?,
        KeyCode::Char('s') => editor.place_source()?,
        KeyCode::Char('t') => editor.place_target()?,
        KeyCode::Char('v') | KeyCode::Enter => editor.visualize(),
        KeyCode::Char('r') => editor.randomize(&mut rand::rng())?,
        KeyCode::Char('c') => editor.reset_to(&app.map.grid),
        KeyCode::Char('w') => {
            let key = format!("{}{EDITED_SUFFIX}", app.map.key);
            editor.status = Some(
                match file_loader::save_file(&app.config.maps_dir, &key, &editor.grid) {
                    Ok(path) => format!("saved {}", path.display()),
                    Err(err) => format!("cannot save: {err}"),
                },
            );
        }
        KeyCode::Esc => {
            editor.replay.clear();
            app.screen = Screen::MainMenu(MainMenuItem::EditGrid);
        }
        _ => {}
    }

    Ok(())
}
