//! File sink for the `log` facade.
//!
//! The terminal belongs to the UI while it runs, so records go to a file chosen on the command
//! line instead of stderr.

use std::{
    fs::{File, OpenOptions},
    io::Write as _,
    path::Path,
};

use color_eyre::eyre::{eyre, Result, WrapErr as _};
use env_logger::{Builder, Target, WriteStyle};
use log::LevelFilter;

/// Logger builder writing one uncolored line per record to `file`.
fn file_builder(file: File, level: LevelFilter) -> Builder {
    let mut builder = Builder::new();
    let _ = builder
        .filter_level(level)
        .write_style(WriteStyle::Never)
        .format(|buf, record| {
            writeln!(
                buf,
                "{:<5} {}: {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(file)));
    builder
}

/// Installs a global logger appending to the file at `path`.
///
/// # Errors
///
/// This function returns an error if the file cannot be opened or a global logger is already
/// installed.
pub fn init_file_logger(path: &Path, level: LevelFilter) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .wrap_err_with(|| format!("failed to open log file {}", path.display()))?;

    file_builder(file, level)
        .try_init()
        .map_err(|err| eyre!("failed to install the file logger: {err}"))
}
