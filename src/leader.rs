//! MARC record leader parsing.
//!
//! The MARC leader is a 24-byte fixed-length header at the start of every record.
//! Only the two numeric offsets and the entry map drive decoding; the remaining
//! positions are preserved verbatim and not interpreted.
//!
//! # Structure
//!
//! - Positions 0-4: Record length (5 digits)
//! - Position 5: Record status
//! - Position 6: Record type (a = language material, c = music, etc.)
//! - Position 7: Bibliographic level (m = monograph, s = serial, etc.)
//! - Position 8: Control record type
//! - Position 9: Character coding (space = MARC-8, a = UTF-8)
//! - Position 10: Indicator count (usually 2)
//! - Position 11: Subfield code count (usually 2)
//! - Positions 12-16: Base address of data (5 digits)
//! - Positions 17-19: Encoding level, cataloging form, multipart level
//! - Positions 20-23: Entry map (usually "4500")

use crate::error::DecodeError;
use serde::{Deserialize, Serialize};

/// Size of the leader in bytes.
pub const LEADER_LEN: usize = 24;

/// MARC21 default width of the field-length part of a directory entry.
pub const DEFAULT_LENGTH_OF_FIELD_LENGTH: usize = 4;

/// MARC21 default width of the starting-position part of a directory entry.
pub const DEFAULT_LENGTH_OF_START: usize = 5;

/// MARC Leader - 24 bytes at the start of every MARC record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leader {
    /// Record length (5 digits) - positions 0-4
    pub record_length: usize,
    /// Record status (1 char) - position 5
    pub record_status: char,
    /// Type of record (1 char) - position 6
    pub record_type: char,
    /// Bibliographic level (1 char) - position 7
    pub bibliographic_level: char,
    /// Type of control record (1 char) - position 8
    pub control_record_type: char,
    /// Character coding scheme (1 char) - position 9
    pub character_coding: char,
    /// Indicator count (1 char) - position 10, kept uninterpreted
    pub indicator_count: char,
    /// Subfield code count (1 char) - position 11, kept uninterpreted
    pub subfield_code_count: char,
    /// Base address of data (5 digits) - positions 12-16
    pub data_base_address: usize,
    /// Encoding level (1 char) - position 17
    pub encoding_level: char,
    /// Cataloging form (1 char) - position 18
    pub cataloging_form: char,
    /// Multipart resource record level (1 char) - position 19
    pub multipart_level: char,
    /// Entry map (4 chars) - positions 20-23
    pub entry_map: String,
}

impl Default for Leader {
    fn default() -> Self {
        Leader {
            record_length: 0,
            record_status: 'n',
            record_type: 'a',
            bibliographic_level: 'm',
            control_record_type: ' ',
            character_coding: 'a',
            indicator_count: '2',
            subfield_code_count: '2',
            data_base_address: 0,
            encoding_level: ' ',
            cataloging_form: ' ',
            multipart_level: ' ',
            entry_map: "4500".to_string(),
        }
    }
}

impl Leader {
    /// Parse a leader from the first 24 bytes of a record buffer.
    ///
    /// Extra bytes after the leader are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::TruncatedLeader`] if fewer than 24 bytes are
    /// available, or [`DecodeError::MalformedLeader`] if the record length or
    /// base address is not a 5-digit decimal number.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() < LEADER_LEN {
            return Err(DecodeError::TruncatedLeader { len: bytes.len() });
        }

        let record_length = parse_decimal(&bytes[0..5]).ok_or(DecodeError::MalformedLeader {
            field: "record length",
        })?;
        let data_base_address =
            parse_decimal(&bytes[12..17]).ok_or(DecodeError::MalformedLeader {
                field: "base address of data",
            })?;

        Ok(Leader {
            record_length,
            record_status: bytes[5] as char,
            record_type: bytes[6] as char,
            bibliographic_level: bytes[7] as char,
            control_record_type: bytes[8] as char,
            character_coding: bytes[9] as char,
            indicator_count: bytes[10] as char,
            subfield_code_count: bytes[11] as char,
            data_base_address,
            encoding_level: bytes[17] as char,
            cataloging_form: bytes[18] as char,
            multipart_level: bytes[19] as char,
            entry_map: bytes[20..24].iter().map(|&b| b as char).collect(),
        })
    }

    /// Check the leader's offsets against each other and the buffer.
    ///
    /// Requires `24 <= base_address <= record_length <= buffer_len`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidOffsets`] when the ordering does not hold.
    pub fn validate_offsets(&self, buffer_len: usize) -> Result<(), DecodeError> {
        let ordered = LEADER_LEN <= self.data_base_address
            && self.data_base_address <= self.record_length
            && self.record_length <= buffer_len;
        if ordered {
            Ok(())
        } else {
            Err(DecodeError::InvalidOffsets {
                base_address: self.data_base_address,
                record_length: self.record_length,
                buffer_len,
            })
        }
    }

    /// Widths of the length and starting-position parts of a directory entry.
    ///
    /// Read from entry map positions 20 and 21; falls back to the MARC21
    /// defaults of 4 and 5 unless both are digits 1-9.
    #[must_use]
    pub fn directory_entry_widths(&self) -> (usize, usize) {
        let mut map = self.entry_map.chars().map(|c| c.to_digit(10));
        match (map.next().flatten(), map.next().flatten()) {
            (Some(length), Some(start)) if length > 0 && start > 0 => {
                (length as usize, start as usize)
            },
            _ => (DEFAULT_LENGTH_OF_FIELD_LENGTH, DEFAULT_LENGTH_OF_START),
        }
    }

    /// Whether position 9 declares UCS/Unicode character coding.
    #[must_use]
    pub fn is_unicode(&self) -> bool {
        self.character_coding == 'a'
    }
}

/// Parse an unsigned ASCII decimal number, rejecting any non-digit byte.
pub(crate) fn parse_decimal(bytes: &[u8]) -> Option<usize> {
    if bytes.is_empty() {
        return None;
    }
    bytes.iter().try_fold(0usize, |acc, &byte| {
        if byte.is_ascii_digit() {
            acc.checked_mul(10)?.checked_add(usize::from(byte - b'0'))
        } else {
            None
        }
    })
}
