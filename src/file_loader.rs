//! Loading and saving of `.gridmap` files.

use std::{
    fs,
    path::{Path, PathBuf},
};

use color_eyre::eyre::{OptionExt as _, Result, WrapErr as _};

use crate::{
    config::Config,
    grid::Grid,
    map::{self, Map, MAP_EXTENSION},
};

/// Scans a directory for `.gridmap` files and loads them.
///
/// This function appends every valid map found in `dir` to `maps`, then sorts the maps by key.
/// Files that cannot be read or parsed are skipped with a warning so one broken map does not hide
/// the others.
///
/// # Errors
///
/// This function returns an error if the directory itself cannot be read.
pub(crate) fn fetch_files(dir: &Path, maps: &mut Vec<Map>) -> Result<()> {
    let entries =
        fs::read_dir(dir).wrap_err_with(|| format!("failed to read directory {}", dir.display()))?;

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("skipping unreadable entry in {}: {err}", dir.display());
                continue;
            }
        };
        let is_map = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(MAP_EXTENSION));
        let is_dir = entry.file_type().is_ok_and(|kind| kind.is_dir());
        if is_dir || !is_map {
            continue;
        }

        let loaded = fs::read_to_string(entry.path())
            .wrap_err("failed to read map file")
            .and_then(|contents| Map::new(entry.file_name(), &contents));
        match loaded {
            Ok(map) => maps.push(map),
            Err(err) => log::warn!("skipping {}: {err:#}", entry.path().display()),
        }
    }

    maps.sort_by(|left, right| left.key.cmp(&right.key));
    log::debug!("{} maps available after scanning {}", maps.len(), dir.display());

    Ok(())
}

/// Loads a single map file.
///
/// # Errors
///
/// This function returns an error if the file cannot be read or is not a valid `.gridmap` file.
pub(crate) fn load_file(path: &Path) -> Result<Map> {
    let file_name = path
        .file_name()
        .ok_or_eyre("failed to retrieve file name of map path")?;
    let contents = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read map file {}", path.display()))?;

    Map::new(file_name.to_os_string(), &contents)
}

/// Writes a grid layout to `<dir>/<key>.gridmap` and returns the path written.
///
/// # Errors
///
/// This function returns an error if the file cannot be written.
pub(crate) fn save_file(dir: &Path, key: &str, grid: &Grid) -> Result<PathBuf> {
    let path = dir.join(format!("{key}{MAP_EXTENSION}"));
    fs::write(&path, map::to_layout(grid))
        .wrap_err_with(|| format!("failed to write map file {}", path.display()))?;
    log::info!("saved map to {}", path.display());

    Ok(path)
}

/// Map the application starts with: the `--map` file if one was given, the blank grid otherwise.
///
/// # Errors
///
/// This function returns an error if the map file cannot be loaded or the blank grid dimensions
/// are invalid.
pub(crate) fn initial_map(config: &Config) -> Result<Map> {
    match &config.map {
        Some(path) => load_file(path),
        None => Map::blank(config.rows, config.cols),
    }
}
