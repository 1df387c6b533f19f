//! Command implementations for the trackbin CLI

pub mod query;
pub mod header;

use anyhow::{Context, Result};
use trackbin_core::TracksReader;

use crate::config::Config;
use crate::TrackArgs;

/// Build a reader from the configuration with command line overrides applied
pub(crate) fn open_reader(config: &Config, args: &TrackArgs) -> Result<TracksReader> {
    let tracks = config.tracks.with_overrides(args);
    log::info!(
        "Tracks: dir={}, genome={}, mode={}, bin_width={}",
        tracks.dir.display(),
        tracks.genome,
        tracks.mode,
        tracks.bin_width
    );

    let reader = TracksReader::new(&tracks.dir, &tracks.mode, tracks.bin_width, &tracks.genome)
        .with_context(|| format!("Failed to open tracks in {}", tracks.dir.display()))?;

    Ok(reader.with_validation(config.validation.clone()))
}
