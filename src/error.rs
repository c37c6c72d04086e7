//! Error types for MARC decoding.
//!
//! [`DecodeError`] classifies why a single record could not be decoded.
//! [`MarcError`] is the stream-level error returned by [`crate::MarcReader`],
//! carrying either an I/O failure or a per-record [`DecodeError`] tagged with
//! the record's position in the stream.

use thiserror::Error;

/// Classified failure for one record buffer.
///
/// Every variant describes structural corruption of the buffer. None of them
/// affect the decoding of other records in the same stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Fewer than 24 bytes were available for the leader.
    #[error("truncated leader: need 24 bytes, got {len}")]
    TruncatedLeader {
        /// Number of bytes actually available.
        len: usize,
    },

    /// A numeric leader field contains something other than ASCII digits.
    #[error("malformed leader: {field} is not a decimal number")]
    MalformedLeader {
        /// Name of the offending leader field.
        field: &'static str,
    },

    /// The leader's offsets are inconsistent with each other or the buffer.
    #[error(
        "invalid offsets: base address {base_address}, record length {record_length}, buffer length {buffer_len}"
    )]
    InvalidOffsets {
        /// Base address of field data from leader positions 12-16.
        base_address: usize,
        /// Total record length from leader positions 0-4.
        record_length: usize,
        /// Length of the buffer handed to the decoder.
        buffer_len: usize,
    },

    /// The byte before the base address is not a field terminator.
    #[error("directory is not terminated by a field terminator")]
    MissingDirectoryTerminator,

    /// The directory length is not a whole number of entries.
    #[error("malformed directory: {len} bytes is not a multiple of the {entry_width}-byte entry width")]
    MalformedDirectory {
        /// Directory length in bytes, excluding the terminator.
        len: usize,
        /// Width of one directory entry.
        entry_width: usize,
    },

    /// A directory entry has a non-numeric length or starting position.
    #[error("malformed directory entry #{index}")]
    MalformedDirectoryEntry {
        /// Zero-based index of the entry within the directory.
        index: usize,
    },

    /// A directory entry points outside the record.
    #[error("field {tag} lies outside the record")]
    FieldOutOfBounds {
        /// Tag of the offending field.
        tag: String,
    },

    /// A data field span is too short to hold its two indicators.
    #[error("data field {tag} is missing its indicators")]
    MissingIndicators {
        /// Tag of the offending field.
        tag: String,
    },
}

impl DecodeError {
    /// Whether lenient decoding may log this issue and keep going.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DecodeError::MissingDirectoryTerminator | DecodeError::MissingIndicators { .. }
        )
    }
}

/// Error type for stream-level MARC operations.
#[derive(Error, Debug)]
pub enum MarcError {
    /// A record inside a stream could not be decoded.
    ///
    /// The reader has already moved past this record; the next read
    /// continues with the following one.
    #[error("could not parse record #{number}: {source}")]
    Record {
        /// 1-based position of the record in the stream.
        number: usize,
        /// Why decoding failed.
        source: DecodeError,
    },

    /// A standalone buffer could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// IO error from the underlying source.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl MarcError {
    /// The decode classification, if this error came from a record.
    #[must_use]
    pub fn decode_error(&self) -> Option<&DecodeError> {
        match self {
            MarcError::Record { source, .. } | MarcError::Decode(source) => Some(source),
            MarcError::IoError(_) => None,
        }
    }
}

/// Convenience type alias for [`std::result::Result`] with [`MarcError`].
pub type Result<T> = std::result::Result<T, MarcError>;
