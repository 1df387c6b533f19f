//! Query command implementation - decode the bins overlapping a location

use anyhow::{Result, Context};
use trackbin_core::{BinCounts, BinSize, Location, TracksReader};

use crate::config::Config;
use crate::{TrackArgs, WidthMode};

pub fn execute(
    config: &Config,
    location: &str,
    track: &TrackArgs,
    width: WidthMode,
    pretty: bool,
) -> Result<()> {
    let location: Location = location.parse()?;
    let reader = super::open_reader(config, track)?;

    let counts = decode(&reader, &location, width)?;
    log::info!(
        "Decoded {} bins for {} starting at {}",
        counts.len(),
        counts.location,
        counts.start
    );

    println!("{}", to_json(&counts, pretty || config.output.pretty)?);
    Ok(())
}

fn decode(reader: &TracksReader, location: &Location, width: WidthMode) -> Result<BinCounts> {
    let counts = match width {
        WidthMode::Auto => reader.decode_auto(location),
        WidthMode::U8 => reader.decode(location, BinSize::U8),
        WidthMode::U16 => reader.decode(location, BinSize::U16),
        WidthMode::U32 => reader.decode(location, BinSize::U32),
    };

    counts.with_context(|| format!("Failed to decode {}", location))
}

fn to_json(counts: &BinCounts, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(counts)
    } else {
        serde_json::to_string(counts)
    };
    json.context("Failed to serialize bin counts")
}
