//! Header command implementation - show the fixed header of a track file

use anyhow::{Result, Context};
use trackbin_core::{BinSize, TrackHeader, TracksReader};

use crate::config::Config;
use crate::TrackArgs;

pub fn execute(config: &Config, chr: &str, track: &TrackArgs) -> Result<()> {
    let tracks = config.tracks.with_overrides(track);

    // The header does not depend on the read count, so no reads file is needed
    let reader = TracksReader::with_total_reads(
        &tracks.dir,
        &tracks.mode,
        tracks.bin_width,
        &tracks.genome,
        0,
    )?;
    let path = reader.path(chr);
    log::info!("Reading header of {}", path.display());

    let header = reader
        .header(chr)
        .with_context(|| format!("Failed to read header of {}", path.display()))?;

    print!("{}", describe(&header));

    if header.bin_width as u64 != reader.bin_width() {
        log::warn!(
            "Header bin width {} differs from configured bin width {}",
            header.bin_width,
            reader.bin_width()
        );
    }

    Ok(())
}

fn describe(header: &TrackHeader) -> String {
    let bin_size = match BinSize::from_byte(header.bin_size_byte) {
        Some(bin_size) => bin_size.to_string(),
        None => format!("unrecognised, read as {}", header.bin_size()),
    };

    format!(
        "Magic: {:#010x}\n\
         Bin size: {} ({})\n\
         Bin width: {}\n\
         Bins: {}\n\
         Covered bases: {}\n\
         Expected file size: {}\n",
        header.magic,
        header.bin_size_byte,
        bin_size,
        header.bin_width,
        header.bin_count,
        header.bin_count as u64 * header.bin_width as u64,
        header.expected_file_size(),
    )
}
