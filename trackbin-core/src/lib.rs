//! trackbin Core Library
//!
//! Decoding of binned read-coverage track files: file layout, counter
//! width dispatch and genomic range to bin mapping.

pub mod types;
pub mod format;
pub mod reads;
pub mod reader;

// Re-export commonly used types and functions
pub use types::{BinCounts, BinRange, GenomicPos, Location};
pub use format::{BinSize, BinValue, TrackError, TrackHeader, TrackResult, Validation};
pub use reads::read_total_reads;
pub use reader::TracksReader;

/// Version information for the trackbin core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
