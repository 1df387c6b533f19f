//! Range queries over a directory of track files

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::format::{
    widen_bins, BinSize, BinValue, TrackError, TrackHeader, TrackResult, Validation,
    HEADER_SIZE_BYTES, TRACK_EXTENSION,
};
use crate::reads::read_total_reads;
use crate::types::{BinCounts, BinRange, Location};

/// Decodes bin counts from the track files of one genome, mode and bin width.
///
/// The reader only holds configuration. Every query opens its own file
/// handle, so a single reader can be shared between threads.
#[derive(Debug, Clone)]
pub struct TracksReader {
    dir: PathBuf,
    mode: String,
    genome: String,
    bin_width: u64,
    total_reads: u64,
    validation: Validation,
}

impl TracksReader {
    /// Create a reader, loading the genome's total read count from
    /// `<dir>/reads_<genome>.txt`.
    pub fn new<P: AsRef<Path>>(
        dir: P,
        mode: &str,
        bin_width: u64,
        genome: &str,
    ) -> TrackResult<Self> {
        let total_reads = read_total_reads(dir.as_ref(), genome)?;
        Self::with_total_reads(dir, mode, bin_width, genome, total_reads)
    }

    /// Create a reader with a known total read count
    pub fn with_total_reads<P: AsRef<Path>>(
        dir: P,
        mode: &str,
        bin_width: u64,
        genome: &str,
        total_reads: u64,
    ) -> TrackResult<Self> {
        if bin_width == 0 {
            return Err(TrackError::InvalidBinWidth);
        }

        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
            mode: mode.to_string(),
            genome: genome.to_string(),
            bin_width,
            total_reads,
            validation: Validation::default(),
        })
    }

    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    pub fn genome(&self) -> &str {
        &self.genome
    }

    pub fn bin_width(&self) -> u64 {
        self.bin_width
    }

    pub fn total_reads(&self) -> u64 {
        self.total_reads
    }

    pub fn validation(&self) -> &Validation {
        &self.validation
    }

    /// Path of the track file holding a chromosome:
    /// `<dir>/<chr lowercased>_bw<bin width>_c<mode>_<genome>.trackbin`
    pub fn path(&self, chr: &str) -> PathBuf {
        self.dir.join(format!(
            "{}_bw{}_c{}_{}.{}",
            chr.to_lowercase(),
            self.bin_width,
            self.mode,
            self.genome,
            TRACK_EXTENSION
        ))
    }

    /// Read the header of a chromosome's track file
    pub fn header(&self, chr: &str) -> TrackResult<TrackHeader> {
        let mut file = self.open_track(&self.path(chr))?;
        TrackHeader::read(&mut file)
    }

    /// Decode using the counter width declared in the file header.
    ///
    /// Declared sizes of 1 and 2 select `u8` and `u16` counters. Anything
    /// else, 4 included, is read as `u32` unless strict bin size checking
    /// is enabled.
    pub fn decode_auto(&self, location: &Location) -> TrackResult<BinCounts> {
        BinRange::from_location(location, self.bin_width)?;

        let path = self.path(&location.chr);
        let (_, declared) = {
            let mut file = self.open_track(&path)?;
            TrackHeader::probe(&mut file)?
        };

        let bin_size = match BinSize::from_byte(declared) {
            Some(bin_size) => bin_size,
            None if self.validation.strict_bin_size => {
                return Err(TrackError::FormatMismatch(format!(
                    "unsupported bin size {} in {}",
                    declared,
                    path.display()
                )));
            }
            None => {
                log::warn!(
                    "Unrecognised bin size {} in {}, reading as 4 byte bins",
                    declared,
                    path.display()
                );
                BinSize::from_declared(declared)
            }
        };

        self.decode(location, bin_size)
    }

    /// Decode with an explicit counter width
    pub fn decode(&self, location: &Location, bin_size: BinSize) -> TrackResult<BinCounts> {
        match bin_size {
            BinSize::U8 => self.decode_with::<u8>(location),
            BinSize::U16 => self.decode_with::<u16>(location),
            BinSize::U32 => self.decode_with::<u32>(location),
        }
    }

    pub fn decode_u8(&self, location: &Location) -> TrackResult<BinCounts> {
        self.decode_with::<u8>(location)
    }

    pub fn decode_u16(&self, location: &Location) -> TrackResult<BinCounts> {
        self.decode_with::<u16>(location)
    }

    pub fn decode_u32(&self, location: &Location) -> TrackResult<BinCounts> {
        self.decode_with::<u32>(location)
    }

    /// Decode the bins overlapping `location`, reading counters of type `T`
    pub fn decode_with<T: BinValue>(&self, location: &Location) -> TrackResult<BinCounts> {
        let range = BinRange::from_location(location, self.bin_width)?;
        let width = T::BIN_SIZE.width();

        let path = self.path(&location.chr);
        let file = self.open_track(&path)?;
        let file_len = file.metadata()?.len();
        let mut reader = BufReader::new(file);

        if self.validation.needs_header() {
            let header = TrackHeader::read(&mut reader)?;
            header.validate(&self.validation, self.bin_width)?;

            if self.validation.check_bounds && range.last >= header.bin_count as u64 {
                return Err(TrackError::RangeOutOfBounds {
                    first: range.first,
                    last: range.last,
                    available: header.bin_count as u64,
                });
            }
        }

        // The body length bounds every read, whatever the header claims
        let available = file_len.saturating_sub(HEADER_SIZE_BYTES) / width;
        if range.last >= available {
            return Err(TrackError::RangeOutOfBounds {
                first: range.first,
                last: range.last,
                available,
            });
        }

        let offset = range.byte_offset(width);
        let n_bins = range.n_bins();
        log::debug!(
            "Reading {} {} bins at offset {} (bin {}) from {}",
            n_bins,
            T::BIN_SIZE,
            offset,
            range.first,
            path.display()
        );

        reader.seek(SeekFrom::Start(offset))?;

        let mut body = vec![0u8; (n_bins * width) as usize];
        reader.read_exact(&mut body).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => TrackError::RangeOutOfBounds {
                first: range.first,
                last: range.last,
                available,
            },
            _ => TrackError::Io(e),
        })?;

        let reads = widen_bins::<T>(&body);

        Ok(BinCounts::new(
            location.clone(),
            range,
            self.bin_width,
            reads,
            self.total_reads,
        ))
    }

    fn open_track(&self, path: &Path) -> TrackResult<File> {
        File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => TrackError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => TrackError::Io(e),
        })
    }
}
