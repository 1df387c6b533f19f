//! Track file (.trackbin) layout
//!
//! Every track file starts with a fixed 16 byte little-endian header:
//! - magic number (u32)
//! - declared bin size (u32, only the low byte is meaningful: 1, 2 or 4)
//! - bin width in base pairs (u32)
//! - number of bins (u32)
//!
//! followed by `bin count * bin size` bytes of unsigned counters, one per bin.

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Read};
use std::path::PathBuf;
use thiserror::Error;

pub const MAGIC_NUMBER_OFFSET_BYTES: u64 = 0;
pub const BIN_SIZE_OFFSET_BYTES: u64 = MAGIC_NUMBER_OFFSET_BYTES + 4;
pub const BIN_WIDTH_OFFSET_BYTES: u64 = BIN_SIZE_OFFSET_BYTES + 4;
pub const N_BINS_OFFSET_BYTES: u64 = BIN_WIDTH_OFFSET_BYTES + 4;
pub const BINS_OFFSET_BYTES: u64 = N_BINS_OFFSET_BYTES + 4;

/// The header always occupies the bytes before the bins, whatever the bin size
pub const HEADER_SIZE_BYTES: u64 = BINS_OFFSET_BYTES;

/// File extension of track files
pub const TRACK_EXTENSION: &str = "trackbin";

/// Errors that can occur while loading or decoding tracks
#[derive(Debug, Error)]
pub enum TrackError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Track file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read total read count from {}: {source}", path.display())]
    ReadsFile { path: PathBuf, source: io::Error },

    #[error("Invalid total read count in {}: {message}", path.display())]
    ReadsParse { path: PathBuf, message: String },

    #[error("Bins {first}..={last} are out of bounds: track holds {available} bins")]
    RangeOutOfBounds { first: u64, last: u64, available: u64 },

    #[error("Format mismatch: {0}")]
    FormatMismatch(String),

    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    #[error("Bin width must be greater than zero")]
    InvalidBinWidth,
}

pub type TrackResult<T> = Result<T, TrackError>;

/// Storage width of a single bin counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinSize {
    U8,
    U16,
    U32,
}

impl BinSize {
    /// Strict mapping of the declared bin size byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(BinSize::U8),
            2 => Some(BinSize::U16),
            4 => Some(BinSize::U32),
            _ => None,
        }
    }

    /// Dispatch used when probing files: anything that is not 1 or 2
    /// is read as 4 byte counters.
    pub fn from_declared(byte: u8) -> Self {
        match byte {
            1 => BinSize::U8,
            2 => BinSize::U16,
            _ => BinSize::U32,
        }
    }

    /// Bytes per counter
    pub fn width(self) -> u64 {
        match self {
            BinSize::U8 => 1,
            BinSize::U16 => 2,
            BinSize::U32 => 4,
        }
    }
}

impl fmt::Display for BinSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinSize::U8 => write!(f, "u8"),
            BinSize::U16 => write!(f, "u16"),
            BinSize::U32 => write!(f, "u32"),
        }
    }
}

/// Unsigned counter type stored in a track body.
///
/// Implemented for `u8`, `u16` and `u32`; all of them widen losslessly to `u32`.
pub trait BinValue: Copy + Into<u32> {
    const BIN_SIZE: BinSize;

    /// Decode one little-endian counter from exactly `BIN_SIZE.width()` bytes
    fn read_le(bytes: &[u8]) -> Self;
}

impl BinValue for u8 {
    const BIN_SIZE: BinSize = BinSize::U8;

    fn read_le(bytes: &[u8]) -> Self {
        bytes[0]
    }
}

impl BinValue for u16 {
    const BIN_SIZE: BinSize = BinSize::U16;

    fn read_le(bytes: &[u8]) -> Self {
        LittleEndian::read_u16(bytes)
    }
}

impl BinValue for u32 {
    const BIN_SIZE: BinSize = BinSize::U32;

    fn read_le(bytes: &[u8]) -> Self {
        LittleEndian::read_u32(bytes)
    }
}

/// Widen a raw little-endian body slice into `u32` counts
pub fn widen_bins<T: BinValue>(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks_exact(T::BIN_SIZE.width() as usize)
        .map(|chunk| T::read_le(chunk).into())
        .collect()
}

/// Opt-in checks applied to a track header before decoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    /// Reject files whose magic number differs from this value
    #[serde(default)]
    pub expected_magic: Option<u32>,

    /// Reject files whose header bin width differs from the reader's
    #[serde(default)]
    pub check_bin_width: bool,

    /// Reject requests reaching past the declared bin count
    #[serde(default = "default_true")]
    pub check_bounds: bool,

    /// Reject declared bin sizes other than 1, 2 or 4 instead of reading them as 4
    #[serde(default)]
    pub strict_bin_size: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Validation {
    fn default() -> Self {
        Self {
            expected_magic: None,
            check_bin_width: false,
            check_bounds: true,
            strict_bin_size: false,
        }
    }
}

impl Validation {
    /// No checks at all, matching files read with no header inspection
    pub fn none() -> Self {
        Self {
            check_bounds: false,
            ..Self::default()
        }
    }

    /// Whether the full header must be read before decoding
    pub fn needs_header(&self) -> bool {
        self.expected_magic.is_some()
            || self.check_bin_width
            || self.check_bounds
            || self.strict_bin_size
    }
}

/// Fixed header of a track file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackHeader {
    pub magic: u32,
    pub bin_size_byte: u8,
    pub bin_width: u32,
    pub bin_count: u32,
}

impl TrackHeader {
    /// Read the full 16 byte header from the start of a track file
    pub fn read<R: Read>(reader: &mut R) -> TrackResult<Self> {
        let mut buf = [0u8; HEADER_SIZE_BYTES as usize];
        read_header_bytes(reader, &mut buf)?;

        let mut cursor = &buf[..];
        let magic = cursor.read_u32::<LittleEndian>()?;
        let bin_size_field = cursor.read_u32::<LittleEndian>()?;
        let bin_width = cursor.read_u32::<LittleEndian>()?;
        let bin_count = cursor.read_u32::<LittleEndian>()?;

        Ok(Self {
            magic,
            bin_size_byte: (bin_size_field & 0xff) as u8,
            bin_width,
            bin_count,
        })
    }

    /// Read only the magic number and the bin size byte (the first 5 bytes)
    pub fn probe<R: Read>(reader: &mut R) -> TrackResult<(u32, u8)> {
        let mut buf = [0u8; BIN_SIZE_OFFSET_BYTES as usize + 1];
        read_header_bytes(reader, &mut buf)?;

        let magic = LittleEndian::read_u32(&buf[..4]);
        Ok((magic, buf[BIN_SIZE_OFFSET_BYTES as usize]))
    }

    /// Counter width used when decoding this file
    pub fn bin_size(&self) -> BinSize {
        BinSize::from_declared(self.bin_size_byte)
    }

    /// Total size the file should have according to the header
    pub fn expected_file_size(&self) -> u64 {
        HEADER_SIZE_BYTES + self.bin_count as u64 * self.bin_size().width()
    }

    /// Apply the enabled checks against the reader's configuration
    pub fn validate(&self, validation: &Validation, bin_width: u64) -> TrackResult<()> {
        if let Some(expected) = validation.expected_magic {
            if self.magic != expected {
                return Err(TrackError::FormatMismatch(format!(
                    "magic number {:#010x}, expected {:#010x}",
                    self.magic, expected
                )));
            }
        }

        if validation.check_bin_width && self.bin_width as u64 != bin_width {
            return Err(TrackError::FormatMismatch(format!(
                "header bin width {} does not match configured bin width {}",
                self.bin_width, bin_width
            )));
        }

        if validation.strict_bin_size && BinSize::from_byte(self.bin_size_byte).is_none() {
            return Err(TrackError::FormatMismatch(format!(
                "unsupported bin size {}",
                self.bin_size_byte
            )));
        }

        Ok(())
    }
}

fn read_header_bytes<R: Read>(reader: &mut R, buf: &mut [u8]) -> TrackResult<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => TrackError::FormatMismatch(format!(
            "file is shorter than its {} byte header",
            buf.len()
        )),
        _ => TrackError::Io(e),
    })
}
