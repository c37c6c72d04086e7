//! Record directory parsing.
//!
//! The directory sits between the leader and the base address of data. It is
//! a sequence of fixed-width entries, each holding a 3-character tag, the
//! field's length (terminator included) and its starting offset relative to
//! the base address. With the MARC21 entry map "4500" an entry is 12 bytes.

use crate::error::DecodeError;
use crate::leader::parse_decimal;
use nom::bytes::complete::take;
use nom::combinator::{map, map_opt};
use nom::sequence::tuple;
use nom::IResult;
use serde::{Deserialize, Serialize};

/// Width of the tag part of every directory entry.
pub const TAG_LEN: usize = 3;

/// One directory entry locating a field within the record body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Field tag, three characters, not necessarily numeric.
    pub tag: String,
    /// Field length in bytes, including its terminator.
    pub length: usize,
    /// Starting offset relative to the base address of data.
    pub start: usize,
}

impl DirectoryEntry {
    /// Absolute byte range of the field inside the record buffer.
    ///
    /// Returns `None` if the arithmetic overflows.
    #[must_use]
    pub fn span(&self, base_address: usize) -> Option<std::ops::Range<usize>> {
        let start = base_address.checked_add(self.start)?;
        let end = start.checked_add(self.length)?;
        Some(start..end)
    }

    /// Whether the tag denotes a control field: all digits and below "010".
    #[must_use]
    pub fn is_control_tag(&self) -> bool {
        is_control_tag(&self.tag)
    }
}

/// Whether `tag` is a purely numeric tag below "010".
#[must_use]
pub fn is_control_tag(tag: &str) -> bool {
    tag.len() == TAG_LEN && tag.bytes().all(|b| b.is_ascii_digit()) && tag < "010"
}

/// Parser for a fixed-width run of ASCII digits.
fn fixed_digits(width: usize) -> impl Fn(&[u8]) -> IResult<&[u8], usize> {
    move |input: &[u8]| map_opt(take(width), parse_decimal)(input)
}

/// Parser for one directory entry with the given part widths.
fn directory_entry(
    length_width: usize,
    start_width: usize,
) -> impl Fn(&[u8]) -> IResult<&[u8], DirectoryEntry> {
    move |input: &[u8]| {
        map(
            tuple((
                take(TAG_LEN),
                fixed_digits(length_width),
                fixed_digits(start_width),
            )),
            |(tag, length, start): (&[u8], usize, usize)| DirectoryEntry {
                tag: String::from_utf8_lossy(tag).into_owned(),
                length,
                start,
            },
        )(input)
    }
}

/// Parse the directory entries of a record.
///
/// `bytes` holds the entries only, without the trailing field terminator.
/// `length_width` and `start_width` come from the leader's entry map.
///
/// # Errors
///
/// Returns [`DecodeError::MalformedDirectory`] if `bytes` is not a whole
/// number of entries, or [`DecodeError::MalformedDirectoryEntry`] if an entry's
/// length or starting position is not numeric.
pub fn parse_directory(
    bytes: &[u8],
    length_width: usize,
    start_width: usize,
) -> Result<Vec<DirectoryEntry>, DecodeError> {
    let entry_width = TAG_LEN + length_width + start_width;
    if bytes.len() % entry_width != 0 {
        return Err(DecodeError::MalformedDirectory {
            len: bytes.len(),
            entry_width,
        });
    }

    let parse_entry = directory_entry(length_width, start_width);
    bytes
        .chunks_exact(entry_width)
        .enumerate()
        .map(|(index, chunk)| {
            parse_entry(chunk)
                .map(|(_, entry)| entry)
                .map_err(|_| DecodeError::MalformedDirectoryEntry { index })
        })
        .collect()
}
