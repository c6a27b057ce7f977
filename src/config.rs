//! Command-line arguments and the validated configuration built from them.

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use color_eyre::eyre::{ensure, Result};
use log::LevelFilter;

use crate::{
    map::{DEFAULT_COLS, DEFAULT_ROWS},
    replay::{Pacing, PATH_DELAY_MS, VISITED_DELAY_MS},
};

/// Default probability of an empty cell turning into a wall when walls are randomized.
pub(crate) const DEFAULT_WALL_DENSITY: f64 = 0.3;

/// Command-line interface of the visualizer.
#[derive(Clone, Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Rows of the built-in blank grid.
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    pub rows: usize,
    /// Columns of the built-in blank grid.
    #[arg(long, default_value_t = DEFAULT_COLS)]
    pub cols: usize,
    /// Start with this `.gridmap` file instead of the blank grid.
    #[arg(long)]
    pub map: Option<PathBuf>,
    /// Directory scanned for `.gridmap` files by the map list.
    #[arg(long, default_value = ".")]
    pub maps_dir: PathBuf,
    /// Milliseconds between two settled cells during the replay.
    #[arg(long, default_value_t = VISITED_DELAY_MS)]
    pub visited_delay_ms: u64,
    /// Milliseconds between two path cells during the replay.
    #[arg(long, default_value_t = PATH_DELAY_MS)]
    pub path_delay_ms: u64,
    /// Probability, between 0 and 1, of a cell becoming a wall when walls are randomized.
    #[arg(long, default_value_t = DEFAULT_WALL_DENSITY)]
    pub wall_density: f64,
    /// Run one search on the starting map and print the result instead of opening the UI.
    #[arg(long)]
    pub headless: bool,
    /// Append log records to this file. Nothing is logged without it.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
    /// Most verbose level written to the log file.
    #[arg(long, default_value_t = LevelFilter::Info)]
    pub log_level: LevelFilter,
}

/// Validated application settings.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Rows of the built-in blank grid.
    pub rows: usize,
    /// Columns of the built-in blank grid.
    pub cols: usize,
    /// Map file to start with, if any.
    pub map: Option<PathBuf>,
    /// Directory scanned for map files.
    pub maps_dir: PathBuf,
    /// Replay timing.
    pub pacing: Pacing,
    /// Wall probability used when randomizing.
    pub wall_density: f64,
    /// Whether to print a report instead of running the UI.
    pub headless: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            map: None,
            maps_dir: PathBuf::from("."),
            pacing: Pacing::default(),
            wall_density: DEFAULT_WALL_DENSITY,
            headless: false,
        }
    }
}

impl Config {
    /// Checks the parsed arguments and builds the configuration from them.
    ///
    /// # Errors
    ///
    /// This function returns an error if:
    /// - Either grid dimension is zero or larger than the terminal can address
    /// - The grid has fewer than two cells
    /// - The wall density is not a number between 0 and 1
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        ensure!(
            cli.rows > 0 && cli.cols > 0,
            "grid dimensions must be positive, got {}x{}",
            cli.rows,
            cli.cols
        );
        ensure!(
            u16::try_from(cli.rows).is_ok() && u16::try_from(cli.cols).is_ok(),
            "grid dimensions must not exceed {}, got {}x{}",
            u16::MAX,
            cli.rows,
            cli.cols
        );
        ensure!(
            cli.rows.saturating_mul(cli.cols) >= 2,
            "the grid needs at least two cells to hold a source and a target"
        );
        ensure!(
            (0.0..=1.0).contains(&cli.wall_density),
            "wall density must lie between 0 and 1, got {}",
            cli.wall_density
        );

        Ok(Self {
            rows: cli.rows,
            cols: cli.cols,
            map: cli.map.clone(),
            maps_dir: cli.maps_dir.clone(),
            pacing: Pacing {
                visited_delay: Duration::from_millis(cli.visited_delay_ms),
                path_delay: Duration::from_millis(cli.path_delay_ms),
            },
            wall_density: cli.wall_density,
            headless: cli.headless,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Parses an argument list as if it came from the shell.
    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pathtuine").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn test_defaults_match_default_config() {
        let config = Config::from_cli(&parse(&[])).expect("defaults should be valid");

        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_custom_arguments() {
        let cli = parse(&[
            "--rows",
            "5",
            "--cols",
            "7",
            "--visited-delay-ms",
            "1",
            "--path-delay-ms",
            "2",
            "--wall-density",
            "0.5",
            "--headless",
            "--map",
            "maze.gridmap",
            "--log-level",
            "trace",
        ]);
        let config = Config::from_cli(&cli).expect("arguments should be valid");

        assert_eq!(config.rows, 5);
        assert_eq!(config.cols, 7);
        assert_eq!(config.pacing.visited_delay, Duration::from_millis(1));
        assert_eq!(config.pacing.path_delay, Duration::from_millis(2));
        assert!(config.headless);
        assert_eq!(config.map, Some(PathBuf::from("maze.gridmap")));
        assert_eq!(cli.log_level, LevelFilter::Trace);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(Config::from_cli(&parse(&["--rows", "0"])).is_err());
    }

    #[test]
    fn test_oversized_dimension_rejected() {
        let too_wide = (u32::from(u16::MAX) + 1).to_string();

        assert!(Config::from_cli(&parse(&["--cols", &too_wide])).is_err());
        assert!(Config::from_cli(&parse(&["--rows", &too_wide])).is_err());
        assert!(Config::from_cli(&parse(&["--rows", "1", "--cols", "65535"])).is_ok());
    }

    #[test]
    fn test_single_cell_rejected() {
        assert!(Config::from_cli(&parse(&["--rows", "1", "--cols", "1"])).is_err());
    }

    #[test]
    fn test_wall_density_out_of_range_rejected() {
        assert!(Config::from_cli(&parse(&["--wall-density", "1.5"])).is_err());
    }

    #[test]
    fn test_malformed_number_rejected_by_parser() {
        let result = Cli::try_parse_from(["pathtuine", "--rows", "many"]);

        assert!(result.is_err());
    }
}
