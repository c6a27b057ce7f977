//! Core application state and logic for the visualizer.

use color_eyre::eyre::{OptionExt as _, Result};
use ratatui::DefaultTerminal;

use crate::{
    config::Config,
    editor::Editor,
    events, file_loader,
    map::Map,
    types::{MainMenuItem, Screen},
    ui,
};

/// Application state container for the visualizer.
///
/// This structure holds the state of the application, which is to say the structure from which
/// Ratatui renders the interface and which Crossterm events write to.
pub struct App {
    /// Application exit flag.
    ///
    /// This field is set to `true` when the user wants to quit, which ends the main loop.
    pub(crate) exit: bool,
    /// Current screen being displayed to the user.
    pub(crate) screen: Screen,
    /// Validated settings the application was started with.
    pub(crate) config: Config,
    /// Currently selected map.
    ///
    /// This field holds the pristine layout of the map being edited, either the blank grid or one
    /// loaded from a file. The editor works on a copy and can be reset to it.
    pub(crate) map: Map,
    /// Maps offered by the map list.
    ///
    /// This field is refilled every time the map list is opened: the blank grid first, then the
    /// `.gridmap` files of the maps directory.
    pub(crate) maps: Vec<Map>,
    /// Position of the cursor in the map list.
    pub(crate) viewport_index: usize,
    /// Scrolling offset for the map list viewport.
    ///
    /// This field holds the offset by which to scroll the sliding window into the
    /// [`maps`](App::maps) vector in the map list.
    pub(crate) viewport_offset: usize,
    /// Height of the map list rendering area.
    ///
    /// This field holds the number of rows available to the map list during the last redraw.
    pub(crate) viewport_height: usize,
    /// Grid editor and search replay.
    pub(crate) editor: Editor,
}

impl App {
    /// Creates the application state from a validated configuration.
    ///
    /// # Errors
    ///
    /// This function returns an error if the starting map cannot be loaded.
    pub fn new(config: Config) -> Result<Self> {
        let map = file_loader::initial_map(&config)?;
        let editor = Editor::new(map.grid.clone(), config.pacing, config.wall_density);

        Ok(Self {
            exit: false,
            screen: Screen::MainMenu(MainMenuItem::EditGrid),
            config,
            map,
            maps: Vec::new(),
            viewport_index: 0,
            viewport_offset: 0,
            viewport_height: 0,
            editor,
        })
    }

    /// Runs the main loop of the application.
    ///
    /// This function draws the current screen, handles user input and advances the replay. The
    /// loop continues until the exit flag is set, after which the function returns to the call
    /// site.
    ///
    /// # Errors
    ///
    /// - [`std::io::Error`]
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        while !self.exit {
            let _ = terminal.try_draw(|frame| ui::draw(self, frame).map_err(std::io::Error::other))?;
            events::handle_events(self)?;
        }

        Ok(())
    }

    /// Rebuilds the map list and puts the cursor on the selected map.
    ///
    /// # Errors
    ///
    /// This function returns an error if the maps directory cannot be read.
    pub(crate) fn refresh_maps(&mut self) -> Result<()> {
        let mut found = Vec::new();
        file_loader::fetch_files(&self.config.maps_dir, &mut found)?;

        let mut maps = vec![Map::blank(self.config.rows, self.config.cols)?];
        maps.append(&mut found);
        if !maps.contains(&self.map) {
            maps.insert(0, self.map.clone());
        }

        self.viewport_index = maps.iter().position(|map| *map == self.map).unwrap_or(0);
        self.viewport_offset = self
            .viewport_index
            .saturating_sub(self.viewport_height.saturating_sub(1));
        self.maps = maps;

        Ok(())
    }

    /// Makes the map at `index` in the list the current one and opens it in the editor.
    ///
    /// # Errors
    ///
    /// This function returns an error if there is no map at that index.
    pub(crate) fn select_map(&mut self, index: usize) -> Result<()> {
        let map = self
            .maps
            .get(index)
            .cloned()
            .ok_or_eyre("failed to retrieve cursor-selected map")?;
        log::info!("selected map {}", map.key);

        self.editor.load(map.grid.clone());
        self.map = map;

        Ok(())
    }
}
