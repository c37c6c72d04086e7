//! Decoding ISO 2709 MARC21 record buffers.
//!
//! [`decode`] turns the bytes of exactly one record into a [`Record`]. It is a
//! pure function of its input: no I/O, no shared state, and identical input
//! always yields an identical record or an identical error.
//!
//! # Examples
//!
//! ```
//! use marcdec::{decode, DecodeError};
//!
//! let err = decode(b"0001").unwrap_err();
//! assert_eq!(err, DecodeError::TruncatedLeader { len: 4 });
//! ```
//!
//! Strict decoding escalates recoverable issues to errors:
//!
//! ```
//! use marcdec::{Decoder, RecoveryMode};
//!
//! let decoder = Decoder::new().with_recovery_mode(RecoveryMode::Strict);
//! # let _ = decoder;
//! ```

use crate::directory::parse_directory;
use crate::error::DecodeError;
use crate::leader::{Leader, LEADER_LEN};
use crate::record::{ControlField, DataField, Field, Record};
use crate::recovery::{RecoveryContext, RecoveryMode};

/// Byte ending each field and the directory.
pub const FIELD_TERMINATOR: u8 = 0x1E;
/// Byte introducing each subfield code.
pub const SUBFIELD_DELIMITER: u8 = 0x1F;
/// Byte ending each record.
pub const RECORD_TERMINATOR: u8 = 0x1D;

/// Decode one record buffer with lenient recovery.
///
/// # Errors
///
/// Returns the [`DecodeError`] classifying why the buffer is not a record.
pub fn decode(bytes: &[u8]) -> Result<Record, DecodeError> {
    Decoder::new().decode(bytes)
}

/// Configurable record decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    recovery_mode: RecoveryMode,
}

/// A decoded record together with the issues recovered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeReport {
    /// The decoded record
    pub record: Record,
    /// Recoverable issues met during decoding, empty for well-formed input
    pub warnings: Vec<DecodeError>,
}

impl Decoder {
    /// Create a lenient decoder
    #[must_use]
    pub fn new() -> Self {
        Decoder::default()
    }

    /// Set the recovery mode for recoverable issues.
    ///
    /// - `Lenient`: log and continue (default)
    /// - `Strict`: fail the record
    #[must_use]
    pub fn with_recovery_mode(mut self, mode: RecoveryMode) -> Self {
        self.recovery_mode = mode;
        self
    }

    /// The configured recovery mode
    #[must_use]
    pub fn recovery_mode(&self) -> RecoveryMode {
        self.recovery_mode
    }

    /// Decode one record buffer.
    ///
    /// # Errors
    ///
    /// See [`Decoder::decode_report`].
    pub fn decode(&self, bytes: &[u8]) -> Result<Record, DecodeError> {
        self.decode_report(bytes).map(|report| report.record)
    }

    /// Decode one record buffer, also returning recovered issues.
    ///
    /// Bytes past the leader's record length are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The buffer is shorter than a leader, or its numeric fields are not digits
    /// - The leader's offsets are out of order or exceed the buffer
    /// - The directory is not a whole number of well-formed entries
    /// - A field lies outside the record
    /// - A recoverable issue occurs in strict mode
    pub fn decode_report(&self, bytes: &[u8]) -> Result<DecodeReport, DecodeError> {
        let leader = Leader::from_bytes(bytes)?;
        leader.validate_offsets(bytes.len())?;

        let mut context = RecoveryContext::new(self.recovery_mode);
        let record_bytes = &bytes[..leader.record_length];
        let base_address = leader.data_base_address;
        let (length_width, start_width) = leader.directory_entry_widths();

        let directory = directory_entries(&record_bytes[LEADER_LEN..base_address], &mut context)?;
        let entries = parse_directory(directory, length_width, start_width)?;

        let mut record = Record::new(leader);
        record.fields.reserve(entries.len());

        for entry in &entries {
            let raw = entry
                .span(base_address)
                .filter(|span| span.end <= record_bytes.len())
                .map(|span| strip_terminator(&record_bytes[span]))
                .ok_or_else(|| DecodeError::FieldOutOfBounds {
                    tag: entry.tag.clone(),
                })?;

            let field = if entry.is_control_tag() {
                Field::Control(ControlField::new(entry.tag.clone(), decode_text(raw)))
            } else {
                Field::Data(parse_data_field(&entry.tag, raw, &mut context)?)
            };
            record.push_field(field);
        }

        tracing::debug!(
            fields = record.len(),
            warnings = context.warnings.len(),
            unicode = record.leader.is_unicode(),
            "decoded record"
        );

        Ok(DecodeReport {
            record,
            warnings: context.warnings,
        })
    }
}

/// Strip the directory terminator, recovering if it is missing.
fn directory_entries<'a>(
    region: &'a [u8],
    context: &mut RecoveryContext,
) -> Result<&'a [u8], DecodeError> {
    match region.split_last() {
        Some((&FIELD_TERMINATOR, entries)) => Ok(entries),
        _ => {
            context.recover(DecodeError::MissingDirectoryTerminator)?;
            Ok(region)
        },
    }
}

/// Parse the raw span of a data field, terminator already removed.
fn parse_data_field(
    tag: &str,
    raw: &[u8],
    context: &mut RecoveryContext,
) -> Result<DataField, DecodeError> {
    let [indicator1, indicator2, body @ ..] = raw else {
        context.recover(DecodeError::MissingIndicators {
            tag: tag.to_string(),
        })?;
        return Ok(DataField::new(tag, ' ', ' '));
    };

    let mut field = DataField::new(tag, *indicator1 as char, *indicator2 as char);
    let mut delimiters = memchr::memchr_iter(SUBFIELD_DELIMITER, body).peekable();

    if delimiters.peek().map_or(!body.is_empty(), |&first| first > 0) {
        tracing::debug!(tag, "ignoring bytes before the first subfield delimiter");
    }

    while let Some(start) = delimiters.next() {
        let end = delimiters.peek().copied().unwrap_or(body.len());
        match body[start + 1..end].split_first() {
            Some((&code, value)) if code != FIELD_TERMINATOR => {
                field.add_subfield(code as char, decode_text(value));
            },
            _ => {},
        }
    }

    Ok(field)
}

fn strip_terminator(raw: &[u8]) -> &[u8] {
    raw.strip_suffix(&[FIELD_TERMINATOR]).unwrap_or(raw)
}

fn decode_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
