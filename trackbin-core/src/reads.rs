//! Total read count sidecar (`reads_<genome>.txt`)

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::format::{TrackError, TrackResult};

/// Path of the total read count file for a genome
pub fn reads_path<P: AsRef<Path>>(dir: P, genome: &str) -> PathBuf {
    dir.as_ref().join(format!("reads_{}.txt", genome))
}

/// Load the total read count of a genome from the first line of its sidecar file
pub fn read_total_reads<P: AsRef<Path>>(dir: P, genome: &str) -> TrackResult<u64> {
    let path = reads_path(dir, genome);

    let file = File::open(&path).map_err(|source| TrackError::ReadsFile {
        path: path.clone(),
        source,
    })?;

    let mut line = String::new();
    BufReader::new(file)
        .read_line(&mut line)
        .map_err(|source| match source.kind() {
            io::ErrorKind::InvalidData => TrackError::ReadsParse {
                path: path.clone(),
                message: "first line is not valid UTF-8".to_string(),
            },
            _ => TrackError::ReadsFile {
                path: path.clone(),
                source,
            },
        })?;

    let line = line.trim();
    if line.is_empty() {
        return Err(TrackError::ReadsParse {
            path,
            message: "file is empty".to_string(),
        });
    }

    let count = line.parse::<u64>().map_err(|e| TrackError::ReadsParse {
        path: path.clone(),
        message: format!("'{}': {}", line, e),
    })?;

    log::debug!("Loaded {} total reads from {}", count, path.display());
    Ok(count)
}
