use byteorder::{LittleEndian, WriteBytesExt};
use proptest::prelude::*;
use std::fs;
use tempfile::TempDir;
use trackbin_core::{BinRange, Location, TracksReader};

const BIN_WIDTH: u64 = 50;
const N_BINS: u64 = 2000;

fn bin_value(i: u64) -> u16 {
    ((i * 7919) % 65536) as u16
}

fn u16_track() -> (TempDir, TracksReader) {
    let dir = TempDir::new().expect("create temp dir");
    let reader = TracksReader::with_total_reads(dir.path(), "0", BIN_WIDTH, "mm10", 77)
        .expect("create reader");

    let mut bytes = Vec::new();
    bytes.write_u32::<LittleEndian>(1).unwrap();
    bytes.write_u32::<LittleEndian>(2).unwrap();
    bytes.write_u32::<LittleEndian>(BIN_WIDTH as u32).unwrap();
    bytes.write_u32::<LittleEndian>(N_BINS as u32).unwrap();
    for i in 0..N_BINS {
        bytes.write_u16::<LittleEndian>(bin_value(i)).unwrap();
    }
    fs::write(reader.path("chr5"), bytes).expect("write track file");

    (dir, reader)
}

proptest! {
    #[test]
    fn bin_range_covers_location(
        start in 1u64..10_000_000,
        len in 0u64..100_000,
        bin_width in 1u64..100_000,
    ) {
        let loc = Location::new("chr1", start, start + len);
        let range = BinRange::from_location(&loc, bin_width).unwrap();

        prop_assert!(range.first <= range.last);
        prop_assert_eq!(range.n_bins(), range.last - range.first + 1);

        // first bin contains start, last bin contains end
        let first_start = range.start_coordinate(bin_width);
        prop_assert!(first_start <= loc.start);
        prop_assert!(loc.start < first_start + bin_width);
        let last_start = range.last * bin_width + 1;
        prop_assert!(last_start <= loc.end);
        prop_assert!(loc.end < last_start + bin_width);
    }

    #[test]
    fn decoded_reads_match_body(first in 0u64..N_BINS, extra in 0u64..200, offset in 0u64..BIN_WIDTH) {
        let (_dir, reader) = u16_track();

        let start = first * BIN_WIDTH + 1 + offset;
        let end = (start + extra * BIN_WIDTH).min(N_BINS * BIN_WIDTH);
        let loc = Location::new("chr5", start, end);

        let counts = reader.decode_auto(&loc).unwrap();
        let range = BinRange::from_location(&loc, BIN_WIDTH).unwrap();

        prop_assert_eq!(counts.reads.len() as u64, range.n_bins());
        prop_assert_eq!(counts.start, range.first * BIN_WIDTH + 1);
        prop_assert_eq!(counts.readn, 77);

        let expected: Vec<u32> = (range.first..=range.last).map(|i| bin_value(i) as u32).collect();
        prop_assert_eq!(&counts.reads, &expected);

        let direct = reader.decode_u16(&loc).unwrap();
        prop_assert_eq!(direct, counts);
    }
}
