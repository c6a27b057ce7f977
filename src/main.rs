//! This crate contains the source code for the binary of the pathtuine visualizer.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]
#![expect(
    unused_crate_dependencies,
    reason = "The dependencies are used in the library crate."
)]

use clap::Parser as _;
use color_eyre::{eyre::Result, install};
use pathtuine::{headless, init_file_logger, App, Cli, Config};

fn main() -> Result<()> {
    install()?;

    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_file_logger(path, cli.log_level)?;
    }
    let config = Config::from_cli(&cli)?;

    if config.headless {
        print!("{}", headless(&config)?);
        return Ok(());
    }

    let mut app = App::new(config)?;
    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();

    result
}
