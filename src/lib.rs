//! Grid pathfinding visualizer built around a uniform-cost search.
//!
//! The core of the crate is [`dijkstra`]: given a [`Grid`] with exactly one source and one target
//! cell, it settles cells in non-decreasing distance order, records that order, and leaves
//! predecessor links behind so [`reconstruct_path`] can walk back from the target. Walls are never
//! settled, and ties between equally distant cells are broken in row-major order.
//!
//! Around it sit a terminal front end ([`App`]), which lets the user edit a grid and replays the
//! search with [`ReplayManager`], and a headless mode ([`headless`]) which prints the result as
//! text.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]

mod app;
mod config;
mod editor;
mod error;
mod events;
mod file_loader;
mod grid;
mod logging;
mod map;
mod replay;
mod report;
mod search;
mod types;
mod ui;

pub use app::App;
pub use config::{Cli, Config};
pub use error::GridError;
pub use grid::{Cell, CellKind, Coord, Grid, UNREACHED};
pub use logging::init_file_logger;
pub use replay::{schedule_replay, Pacing, PaintEvent, PaintState, ReplayManager};
pub use report::{headless, render, summary};
pub use search::{dijkstra, reconstruct_path, Outcome, Search, SearchOutcome, Step};
