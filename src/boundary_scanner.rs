//! Record boundary detection for in-memory streams of concatenated records.
//!
//! Each MARC21 record starts with its own length as five ASCII digits, so a
//! buffer of concatenated records is split by following those prefixes.
//! When a prefix is unreadable the scanner resynchronises on the next 0x1D
//! record terminator, located with the SIMD-accelerated `memchr` crate.
//! Corrupt spans are still reported so the decoder can classify them and
//! record numbering stays aligned with the input.
//!
//! # Example
//!
//! ```
//! use marcdec::boundary_scanner::RecordBoundaryScanner;
//!
//! let buffer = b"...binary MARC data...";
//! let mut scanner = RecordBoundaryScanner::new();
//! for (offset, len) in scanner.scan(buffer) {
//!     println!("Record at offset {} with length {}", offset, len);
//! }
//! ```

use crate::decoder::RECORD_TERMINATOR;
use crate::leader::{parse_decimal, LEADER_LEN};

/// Width of the record-length prefix.
const LENGTH_PREFIX_LEN: usize = 5;

/// Record boundary scanner driven by leader length prefixes.
#[derive(Debug, Default)]
pub struct RecordBoundaryScanner {
    /// Pre-allocated buffer for reuse across scans
    boundaries: Vec<(usize, usize)>,
}

impl RecordBoundaryScanner {
    /// Create a new boundary scanner with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            boundaries: Vec::with_capacity(100),
        }
    }

    /// Scan a buffer for record boundaries.
    ///
    /// Returns `(offset, length)` pairs covering the whole buffer in order.
    /// A final record cut short by the end of the buffer is returned with
    /// the bytes that remain.
    ///
    /// # Examples
    ///
    /// ```
    /// use marcdec::boundary_scanner::RecordBoundaryScanner;
    ///
    /// let mut data = Vec::new();
    /// data.extend_from_slice(b"00026nam a2200025   4500\x1e\x1d");
    /// data.extend_from_slice(b"00026nam a2200025   4500\x1e\x1d");
    /// let mut scanner = RecordBoundaryScanner::new();
    /// assert_eq!(scanner.scan(&data), vec![(0, 26), (26, 26)]);
    /// ```
    pub fn scan(&mut self, buffer: &[u8]) -> Vec<(usize, usize)> {
        self.scan_limited(buffer, usize::MAX)
    }

    /// Scan a buffer and return boundaries up to a maximum limit.
    ///
    /// Useful for limiting the number of records returned in a single batch.
    pub fn scan_limited(&mut self, buffer: &[u8], limit: usize) -> Vec<(usize, usize)> {
        self.boundaries.clear();
        let mut offset = 0;

        while offset < buffer.len() && self.boundaries.len() < limit {
            let len = next_record_len(&buffer[offset..]);
            self.boundaries.push((offset, len));
            offset += len;
        }

        self.boundaries.clone()
    }

    /// Count records in a buffer without keeping the boundaries.
    #[must_use]
    pub fn count_records(buffer: &[u8]) -> usize {
        let mut offset = 0;
        let mut count = 0;
        while offset < buffer.len() {
            offset += next_record_len(&buffer[offset..]);
            count += 1;
        }
        count
    }
}

/// Length of the record at the start of `rest`, never zero for non-empty input.
fn next_record_len(rest: &[u8]) -> usize {
    let declared = rest.get(..LENGTH_PREFIX_LEN).and_then(parse_decimal);
    match declared {
        Some(len) if len >= LEADER_LEN => len.min(rest.len()),
        _ => {
            let len = memchr::memchr(RECORD_TERMINATOR, rest).map_or(rest.len(), |pos| pos + 1);
            tracing::debug!(
                skipped = len,
                "unreadable record length, resynchronised on record terminator"
            );
            len
        },
    }
}
