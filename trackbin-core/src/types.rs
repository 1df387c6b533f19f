use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::format::{TrackError, TrackResult, BINS_OFFSET_BYTES};

pub type GenomicPos = u64;
pub type BinIndex = u64;

/// A genomic interval, 1-based with both ends inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub chr: String,
    pub start: GenomicPos,
    pub end: GenomicPos,
}

impl Location {
    pub fn new<S: Into<String>>(chr: S, start: GenomicPos, end: GenomicPos) -> Self {
        Self {
            chr: chr.into(),
            start,
            end,
        }
    }

    /// Number of bases covered by the interval
    pub fn len(&self) -> u64 {
        match self.end.checked_sub(self.start) {
            Some(span) => span.saturating_add(1),
            None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chr, self.start, self.end)
    }
}

impl FromStr for Location {
    type Err = TrackError;

    /// Parses `chr:start-end`. Commas are accepted as digit separators,
    /// so `chr1:1,000,000-2,000,000` works.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (chr, range) = s.rsplit_once(':').ok_or_else(|| {
            TrackError::InvalidLocation(format!("{s}: expected 'chr:start-end'"))
        })?;

        if chr.is_empty() {
            return Err(TrackError::InvalidLocation(format!("{s}: missing chromosome")));
        }

        let (start, end) = range.split_once('-').ok_or_else(|| {
            TrackError::InvalidLocation(format!("{s}: expected 'start-end' after ':'"))
        })?;

        let start = parse_position(start)
            .ok_or_else(|| TrackError::InvalidLocation(format!("{s}: invalid start '{start}'")))?;
        let end = parse_position(end)
            .ok_or_else(|| TrackError::InvalidLocation(format!("{s}: invalid end '{end}'")))?;

        Ok(Location::new(chr, start, end))
    }
}

fn parse_position(pos: &str) -> Option<GenomicPos> {
    let digits: String = pos.trim().chars().filter(|c| *c != ',').collect();
    digits.parse::<GenomicPos>().ok()
}

/// Inclusive range of bin indices covering a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinRange {
    pub first: BinIndex,
    pub last: BinIndex,
}

impl BinRange {
    /// Map a 1-based inclusive location onto 0-based bin indices.
    pub fn from_location(location: &Location, bin_width: u64) -> TrackResult<Self> {
        if bin_width == 0 {
            return Err(TrackError::InvalidBinWidth);
        }
        if location.start == 0 {
            return Err(TrackError::InvalidLocation(format!(
                "{location}: positions are 1-based, start must be >= 1"
            )));
        }
        if location.end < location.start {
            return Err(TrackError::InvalidLocation(format!(
                "{location}: end is before start"
            )));
        }

        let s = location.start - 1;
        let e = location.end - 1;

        Ok(Self {
            first: s / bin_width,
            last: e / bin_width,
        })
    }

    /// Number of bins in the range, always at least one
    pub fn n_bins(&self) -> u64 {
        self.last - self.first + 1
    }

    /// 1-based genomic coordinate where the first bin starts
    pub fn start_coordinate(&self, bin_width: u64) -> GenomicPos {
        self.first * bin_width + 1
    }

    /// Absolute file offset of the first bin for counters `width` bytes wide
    pub fn byte_offset(&self, width: u64) -> u64 {
        BINS_OFFSET_BYTES + self.first * width
    }
}

/// Coverage counts for every bin overlapped by a queried location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinCounts {
    pub location: Location,
    pub reads: Vec<u32>,
    pub start: GenomicPos,
    pub readn: u64,
}

impl BinCounts {
    pub fn new(
        location: Location,
        range: BinRange,
        bin_width: u64,
        reads: Vec<u32>,
        readn: u64,
    ) -> Self {
        Self {
            start: range.start_coordinate(bin_width),
            location,
            reads,
            readn,
        }
    }

    pub fn len(&self) -> usize {
        self.reads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reads.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_parse() -> TrackResult<()> {
        let loc: Location = "chr1:100-200".parse()?;
        assert_eq!(loc, Location::new("chr1", 100, 200));

        let loc: Location = "chrX:1,000,000-2,000,000".parse()?;
        assert_eq!(loc.start, 1_000_000);
        assert_eq!(loc.end, 2_000_000);
        assert_eq!(loc.to_string(), "chrX:1000000-2000000");

        Ok(())
    }

    #[test]
    fn test_location_parse_errors() {
        assert!("chr1".parse::<Location>().is_err());
        assert!(":1-2".parse::<Location>().is_err());
        assert!("chr1:100".parse::<Location>().is_err());
        assert!("chr1:a-200".parse::<Location>().is_err());
        assert!(matches!(
            "chr1:5-x".parse::<Location>(),
            Err(TrackError::InvalidLocation(_))
        ));
    }

    #[test]
    fn test_location_len() {
        assert_eq!(Location::new("chr1", 1, 100).len(), 100);
        assert_eq!(Location::new("chr1", 5, 5).len(), 1);
        assert!(Location::new("chr1", 6, 5).is_empty());
        assert_eq!(Location::new("chr1", 1, u64::MAX).len(), u64::MAX);
    }

    #[test]
    fn test_location_len_at_coordinate_limit() -> TrackResult<()> {
        let loc: Location = format!("chr1:2-{}", u64::MAX).parse()?;
        assert_eq!(loc.len(), u64::MAX - 1);
        Ok(())
    }

    #[test]
    fn test_bin_range_first_bins() -> TrackResult<()> {
        let range = BinRange::from_location(&Location::new("chr1", 1, 250), 100)?;
        assert_eq!(range, BinRange { first: 0, last: 2 });
        assert_eq!(range.n_bins(), 3);
        assert_eq!(range.start_coordinate(100), 1);
        assert_eq!(range.byte_offset(1), 16);

        let range = BinRange::from_location(&Location::new("chr1", 101, 200), 100)?;
        assert_eq!(range, BinRange { first: 1, last: 1 });
        assert_eq!(range.start_coordinate(100), 101);
        assert_eq!(range.byte_offset(2), 18);
        assert_eq!(range.byte_offset(4), 20);

        Ok(())
    }

    #[test]
    fn test_bin_range_edges() -> TrackResult<()> {
        // position 100 is the last base of bin 0, 101 the first of bin 1
        let range = BinRange::from_location(&Location::new("chr1", 100, 101), 100)?;
        assert_eq!(range, BinRange { first: 0, last: 1 });

        let range = BinRange::from_location(&Location::new("chr1", 7, 7), 1)?;
        assert_eq!(range, BinRange { first: 6, last: 6 });
        assert_eq!(range.start_coordinate(1), 7);

        Ok(())
    }

    #[test]
    fn test_bin_range_rejects_bad_input() {
        assert!(matches!(
            BinRange::from_location(&Location::new("chr1", 0, 10), 100),
            Err(TrackError::InvalidLocation(_))
        ));
        assert!(matches!(
            BinRange::from_location(&Location::new("chr1", 20, 10), 100),
            Err(TrackError::InvalidLocation(_))
        ));
        assert!(matches!(
            BinRange::from_location(&Location::new("chr1", 1, 10), 0),
            Err(TrackError::InvalidBinWidth)
        ));
    }

    #[test]
    fn test_bin_counts_json_field_names() {
        let location = Location::new("chr2", 101, 300);
        let range = BinRange { first: 1, last: 2 };
        let counts = BinCounts::new(location, range, 100, vec![3, 4], 1_000);

        let json = serde_json::to_value(&counts).unwrap();
        assert_eq!(json["start"], 101);
        assert_eq!(json["readn"], 1_000);
        assert_eq!(json["reads"], serde_json::json!([3, 4]));
        assert_eq!(json["location"]["chr"], "chr2");
    }
}
