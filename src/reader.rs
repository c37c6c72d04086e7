//! Reading MARC records from binary streams.
//!
//! This module provides [`MarcReader`] for reading concatenated ISO 2709
//! records from any source that implements [`std::io::Read`]. Each record is
//! framed by its 5-digit length prefix, fully buffered, then handed to the
//! [`Decoder`]. A record that fails to decode is reported as
//! [`MarcError::Record`] and the reader moves on to the next one.
//!
//! # Examples
//!
//! Reading records from a file:
//!
//! ```no_run
//! use marcdec::{FieldResolver, MarcReader};
//! use std::fs::File;
//!
//! let file = File::open("records.mrc")?;
//! for result in MarcReader::new(file) {
//!     match result {
//!         Ok(record) => println!("Title: {:?}", record.title()),
//!         Err(e) => eprintln!("{e}"),
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::decoder::{Decoder, RECORD_TERMINATOR};
use crate::error::{MarcError, Result};
use crate::leader::{parse_decimal, LEADER_LEN};
use crate::record::Record;
use crate::recovery::RecoveryMode;
use std::io::{BufRead, BufReader, Read};

const LENGTH_PREFIX_LEN: u64 = 5;

/// Streaming reader for ISO 2709 binary MARC records.
///
/// # Examples
///
/// ```
/// use marcdec::MarcReader;
/// use std::io::Cursor;
///
/// let mut reader = MarcReader::new(Cursor::new(Vec::new()));
///
/// match reader.read_record() {
///     Ok(Some(record)) => println!("Record type: {}", record.leader.record_type),
///     Ok(None) => println!("End of file"),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
#[derive(Debug)]
pub struct MarcReader<R: Read> {
    reader: BufReader<R>,
    decoder: Decoder,
    records_read: usize,
    exhausted: bool,
}

impl<R: Read> MarcReader<R> {
    /// Create a new MARC reader with lenient decoding.
    pub fn new(reader: R) -> Self {
        MarcReader {
            reader: BufReader::new(reader),
            decoder: Decoder::new(),
            records_read: 0,
            exhausted: false,
        }
    }

    /// Set the recovery mode for handling malformed records.
    ///
    /// # Examples
    ///
    /// ```
    /// use marcdec::{MarcReader, RecoveryMode};
    /// use std::io::Cursor;
    ///
    /// let reader = MarcReader::new(Cursor::new(Vec::new()))
    ///     .with_recovery_mode(RecoveryMode::Strict);
    /// ```
    #[must_use]
    pub fn with_recovery_mode(mut self, mode: RecoveryMode) -> Self {
        self.decoder = self.decoder.with_recovery_mode(mode);
        self
    }

    /// Number of records framed so far, failed ones included.
    #[must_use]
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Read a single MARC record.
    ///
    /// Returns `Ok(Some(record))` if a record was decoded, `Ok(None)` at the
    /// end of the stream, or `Err` if the record could not be decoded or the
    /// source failed.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::Record`] when the framed record fails to decode;
    /// the next call continues with the following record. Returns
    /// [`MarcError::IoError`] when the source fails.
    pub fn read_record(&mut self) -> Result<Option<Record>> {
        let mut buffer = Vec::new();
        // Stops early at a record terminator so the next record stays unread
        let got = self
            .reader
            .by_ref()
            .take(LENGTH_PREFIX_LEN)
            .read_until(RECORD_TERMINATOR, &mut buffer)?;
        if got == 0 {
            return Ok(None);
        }

        self.records_read += 1;
        let number = self.records_read;

        match parse_decimal(&buffer).filter(|&len| len >= LEADER_LEN && got == 5) {
            Some(record_length) => {
                let remaining = (record_length - buffer.len()) as u64;
                buffer.reserve(record_length - buffer.len());
                self.reader.by_ref().take(remaining).read_to_end(&mut buffer)?;
            },
            None => {
                if buffer.last() != Some(&RECORD_TERMINATOR) {
                    self.reader.read_until(RECORD_TERMINATOR, &mut buffer)?;
                }
                tracing::debug!(
                    number,
                    skipped = buffer.len(),
                    "unreadable record length, skipped to next record terminator"
                );
            },
        }

        self.decoder
            .decode(&buffer)
            .map(Some)
            .map_err(|source| MarcError::Record { number, source })
    }
}

/// Iterates over decode results, continuing past records that fail to
/// decode and stopping after the end of the stream or an I/O error.
impl<R: Read> Iterator for MarcReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.exhausted = true;
                None
            },
            Err(err @ MarcError::IoError(_)) => {
                self.exhausted = true;
                Some(Err(err))
            },
            Err(err) => Some(Err(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::{FIELD_TERMINATOR, SUBFIELD_DELIMITER};
    use crate::error::DecodeError;
    use std::io::Cursor;

    fn title_record(title: &str) -> Vec<u8> {
        let mut field_245 = b"10".to_vec();
        field_245.push(SUBFIELD_DELIMITER);
        field_245.push(b'a');
        field_245.extend_from_slice(title.as_bytes());
        field_245.push(FIELD_TERMINATOR);

        let mut directory = b"245".to_vec();
        directory.extend_from_slice(format!("{:04}", field_245.len()).as_bytes());
        directory.extend_from_slice(b"00000");
        directory.push(FIELD_TERMINATOR);

        let base_address = 24 + directory.len();
        let record_length = base_address + field_245.len() + 1;

        let mut bytes = format!("{record_length:05}nam a22{base_address:05} i 4500").into_bytes();
        bytes.extend_from_slice(&directory);
        bytes.extend_from_slice(&field_245);
        bytes.push(RECORD_TERMINATOR);
        bytes
    }

    fn title_of(record: &Record) -> Option<&str> {
        record
            .data_fields_by_tag("245")
            .next()
            .and_then(|f| f.get_subfield('a'))
    }

    #[test]
    fn test_read_simple_record() {
        let mut reader = MarcReader::new(Cursor::new(title_record("Test title")));
        let record = reader.read_record().unwrap().unwrap();
        assert_eq!(record.leader.record_type, 'a');
        assert_eq!(title_of(&record), Some("Test title"));
        assert!(reader.read_record().unwrap().is_none());
        assert_eq!(reader.records_read(), 1);
    }

    #[test]
    fn test_eof_returns_none() {
        let mut reader = MarcReader::new(Cursor::new(Vec::new()));
        assert!(reader.read_record().unwrap().is_none());
        assert_eq!(reader.records_read(), 0);
    }

    #[test]
    fn test_read_multiple_records() {
        let data = [title_record("One"), title_record("Two")].concat();
        let titles: Vec<String> = MarcReader::new(Cursor::new(data))
            .map(|r| title_of(&r.unwrap()).unwrap().to_string())
            .collect();
        assert_eq!(titles, vec!["One", "Two"]);
    }

    #[test]
    fn test_bad_record_does_not_stop_stream() {
        let mut broken = title_record("Broken");
        // base address 00005
        broken[12..17].copy_from_slice(b"00005");
        let data = [title_record("One"), broken, title_record("Three")].concat();

        let results: Vec<Result<Record>> = MarcReader::new(Cursor::new(data)).collect();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        match &results[1] {
            Err(MarcError::Record { number, source }) => {
                assert_eq!(*number, 2);
                assert!(matches!(source, DecodeError::InvalidOffsets { .. }));
            },
            other => panic!("expected record error, got {other:?}"),
        }
        assert_eq!(title_of(results[2].as_ref().unwrap()), Some("Three"));
    }

    #[test]
    fn test_unreadable_length_resynchronises() {
        let data = [b"garbage bytes\x1d".to_vec(), title_record("After")].concat();
        let mut reader = MarcReader::new(Cursor::new(data));

        let err = reader.read_record().unwrap_err();
        assert!(matches!(
            err,
            MarcError::Record {
                number: 1,
                source: DecodeError::TruncatedLeader { len: 14 }
            }
        ));
        let record = reader.read_record().unwrap().unwrap();
        assert_eq!(title_of(&record), Some("After"));
    }

    #[test]
    fn test_terminator_inside_length_prefix() {
        let data = [b"abc\x1d".to_vec(), title_record("Next")].concat();
        let results: Vec<Result<Record>> = MarcReader::new(Cursor::new(data)).collect();
        assert_eq!(results.len(), 2);
        assert!(matches!(
            results[0],
            Err(MarcError::Record {
                source: DecodeError::TruncatedLeader { len: 4 },
                ..
            })
        ));
        assert_eq!(title_of(results[1].as_ref().unwrap()), Some("Next"));
    }

    #[test]
    fn test_resync_matches_boundary_scanner() {
        let data = [b"ab\x1d".to_vec(), title_record("Intact")].concat();

        let sequential: Vec<_> = MarcReader::new(Cursor::new(data.clone()))
            .map(|r| r.map_err(|e| e.to_string()))
            .collect();
        let parallel: Vec<_> = crate::parallel::decode_buffer_parallel(&data, Decoder::new())
            .into_iter()
            .map(|r| r.map_err(|e| e.to_string()))
            .collect();

        assert_eq!(sequential.len(), 2);
        assert_eq!(
            sequential[0],
            Err("could not parse record #1: truncated leader: need 24 bytes, got 3".to_string())
        );
        assert_eq!(title_of(sequential[1].as_ref().unwrap()), Some("Intact"));
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_truncated_final_record() {
        let mut data = title_record("Whole");
        let partial = title_record("Partial");
        data.extend_from_slice(&partial[..partial.len() - 4]);

        let results: Vec<Result<Record>> = MarcReader::new(Cursor::new(data)).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(
            results[1],
            Err(MarcError::Record {
                number: 2,
                source: DecodeError::InvalidOffsets { .. }
            })
        ));
    }

    #[test]
    fn test_strict_mode_is_forwarded() {
        let mut bytes = title_record("Strict");
        // Overwrite the directory terminator with a blank
        bytes[36] = b' ';
        let mut reader =
            MarcReader::new(Cursor::new(bytes)).with_recovery_mode(RecoveryMode::Strict);
        assert!(matches!(
            reader.read_record(),
            Err(MarcError::Record {
                source: DecodeError::MissingDirectoryTerminator,
                ..
            })
        ));
    }
}
