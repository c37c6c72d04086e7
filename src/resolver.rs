//! Semantic field resolution over decoded records.
//!
//! Catalog facts often live in one of several tags: the author in 100 or 110,
//! the imprint in 260 or 264. This module answers named queries ("title",
//! "publisher", ...) from a fixed lookup table, trying each `(tag, code)` pair
//! in order and stopping at the first hit.
//!
//! Missing data is not an error. Every lookup returns `Option<String>` and
//! `None` is the absent sentinel, distinct from an empty string.
//!
//! # Examples
//!
//! ```
//! use marcdec::{DataField, FieldResolver, Leader, Record};
//!
//! let record = Record::builder(Leader::default())
//!     .field(
//!         DataField::builder("264", ' ', '1')
//!             .subfield_str('b', "Springer, :")
//!             .build(),
//!     )
//!     .build();
//!
//! assert_eq!(record.publisher().as_deref(), Some("Springer"));
//! assert_eq!(record.author(), None);
//! ```

use crate::record::{Field, Record};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Characters stripped from both ends of every subfield value.
pub const TRIM_CHARS: &[char] = &[' ', '/', ':', ';', ',', '.'];

/// Strip ISBD punctuation and spaces from both ends of a subfield value.
#[must_use]
pub fn trim_punctuation(value: &str) -> &str {
    value.trim_matches(TRIM_CHARS)
}

/// Look up `tag`, optionally narrowed to subfield `code`.
///
/// Rules, applied to the first field carrying `tag`:
/// - control field: its whitespace-trimmed text, `code` ignored
/// - data field with `code`: that subfield's first value, punctuation-trimmed;
///   absent if the field lacks the code, even when a later field has it
/// - data field without `code`: every subfield of every field with `tag`,
///   rendered `"$<code> <value>"` and joined by `"; "`
///
/// Returns `None` when nothing matches.
#[must_use]
pub fn get(record: &Record, tag: &str, code: Option<char>) -> Option<String> {
    match (record.first_field(tag)?, code) {
        (Field::Control(control), _) => {
            if control.value.is_empty() {
                None
            } else {
                Some(control.value.trim().to_string())
            }
        },
        (Field::Data(field), Some(code)) => field
            .get_subfield(code)
            .map(|value| trim_punctuation(value).to_string()),
        (Field::Data(_), None) => {
            let parts: Vec<String> = record
                .data_fields_by_tag(tag)
                .flat_map(|field| field.subfields())
                .map(|sf| format!("${} {}", sf.code, trim_punctuation(&sf.value)))
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join("; "))
            }
        },
    }
}

/// How a semantic field is found in a record.
#[derive(Debug, Clone, Copy)]
enum Lookup {
    /// First pair that resolves wins
    FirstOf(&'static [(&'static str, Option<char>)]),
    /// Subfield `code` of every field with `tag`, comma-joined
    AllOf { tag: &'static str, code: char },
}

/// The named fields a record resolves to, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticField {
    /// Control number (001)
    ControlNumber,
    /// Date and time of latest transaction (005)
    Timestamp,
    /// Fixed-length data elements (008)
    FixedLengthData,
    /// Title proper (245 $a)
    Title,
    /// Main entry, personal (100 $a) or corporate (110 $a)
    Author,
    /// First added personal name (700 $a)
    Contributor,
    /// Edition statement (250 $a)
    Edition,
    /// Publisher name (260 $b or 264 $b)
    Publisher,
    /// Place of publication (260 $a or 264 $a)
    Place,
    /// Date of publication (260 $c or 264 $c)
    Year,
    /// Physical extent (300 $a)
    Description,
    /// Series statement (490 $a)
    Series,
    /// Language code (041 $a)
    Language,
    /// ISBN (020 $a)
    Isbn,
    /// Topical subjects (every 650 $a)
    Subjects,
    /// General note (500 $a)
    Notes,
}

impl SemanticField {
    /// Every semantic field, in output order.
    pub const ALL: [SemanticField; 16] = [
        SemanticField::ControlNumber,
        SemanticField::Timestamp,
        SemanticField::FixedLengthData,
        SemanticField::Title,
        SemanticField::Author,
        SemanticField::Contributor,
        SemanticField::Edition,
        SemanticField::Publisher,
        SemanticField::Place,
        SemanticField::Year,
        SemanticField::Description,
        SemanticField::Series,
        SemanticField::Language,
        SemanticField::Isbn,
        SemanticField::Subjects,
        SemanticField::Notes,
    ];

    fn lookup(self) -> Lookup {
        use Lookup::{AllOf, FirstOf};
        match self {
            SemanticField::ControlNumber => FirstOf(&[("001", None)]),
            SemanticField::Timestamp => FirstOf(&[("005", None)]),
            SemanticField::FixedLengthData => FirstOf(&[("008", None)]),
            SemanticField::Title => FirstOf(&[("245", Some('a'))]),
            SemanticField::Author => FirstOf(&[("100", Some('a')), ("110", Some('a'))]),
            SemanticField::Contributor => FirstOf(&[("700", Some('a'))]),
            SemanticField::Edition => FirstOf(&[("250", Some('a'))]),
            SemanticField::Publisher => FirstOf(&[("260", Some('b')), ("264", Some('b'))]),
            SemanticField::Place => FirstOf(&[("260", Some('a')), ("264", Some('a'))]),
            SemanticField::Year => FirstOf(&[("260", Some('c')), ("264", Some('c'))]),
            SemanticField::Description => FirstOf(&[("300", Some('a'))]),
            SemanticField::Series => FirstOf(&[("490", Some('a'))]),
            SemanticField::Language => FirstOf(&[("041", Some('a'))]),
            SemanticField::Isbn => FirstOf(&[("020", Some('a'))]),
            SemanticField::Subjects => AllOf {
                tag: "650",
                code: 'a',
            },
            SemanticField::Notes => FirstOf(&[("500", Some('a'))]),
        }
    }

    /// Resolve this field against a record.
    #[must_use]
    pub fn resolve(self, record: &Record) -> Option<String> {
        match self.lookup() {
            Lookup::FirstOf(chain) => chain
                .iter()
                .find_map(|&(tag, code)| get(record, tag, code)),
            Lookup::AllOf { tag, code } => {
                let values: Vec<&str> = record
                    .data_fields_by_tag(tag)
                    .filter_map(|field| field.get_subfield(code))
                    .map(trim_punctuation)
                    .filter(|value| !value.is_empty())
                    .collect();
                if values.is_empty() {
                    None
                } else {
                    Some(values.join(", "))
                }
            },
        }
    }

    /// Machine name, as used in serialized output.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            SemanticField::ControlNumber => "control_number",
            SemanticField::Timestamp => "timestamp",
            SemanticField::FixedLengthData => "fixed_length_data",
            SemanticField::Title => "title",
            SemanticField::Author => "author",
            SemanticField::Contributor => "contributor",
            SemanticField::Edition => "edition",
            SemanticField::Publisher => "publisher",
            SemanticField::Place => "place",
            SemanticField::Year => "year",
            SemanticField::Description => "description",
            SemanticField::Series => "series",
            SemanticField::Language => "language",
            SemanticField::Isbn => "isbn",
            SemanticField::Subjects => "subjects",
            SemanticField::Notes => "notes",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SemanticField::ControlNumber => "Control Number",
            SemanticField::Timestamp => "Timestamp",
            SemanticField::FixedLengthData => "Fixed-Length Data",
            SemanticField::Title => "Title",
            SemanticField::Author => "Author",
            SemanticField::Contributor => "Contributor",
            SemanticField::Edition => "Edition",
            SemanticField::Publisher => "Publisher",
            SemanticField::Place => "Place",
            SemanticField::Year => "Year",
            SemanticField::Description => "Description",
            SemanticField::Series => "Series",
            SemanticField::Language => "Language",
            SemanticField::Isbn => "ISBN",
            SemanticField::Subjects => "Subjects",
            SemanticField::Notes => "Notes",
        }
    }
}

impl fmt::Display for SemanticField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for a field name that is not in the lookup table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown semantic field: {0}")]
pub struct UnknownSemanticField(pub String);

impl FromStr for SemanticField {
    type Err = UnknownSemanticField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SemanticField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| UnknownSemanticField(s.to_string()))
    }
}

/// Every semantic field of one record, resolved.
///
/// Iteration and serialization follow [`SemanticField::ALL`]. Absent values
/// serialize as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResolvedFieldSet {
    values: IndexMap<SemanticField, Option<String>>,
}

impl ResolvedFieldSet {
    /// Resolved value of `field`, `None` if absent.
    #[must_use]
    pub fn get(&self, field: SemanticField) -> Option<&str> {
        self.values.get(&field).and_then(Option::as_deref)
    }

    /// Iterate over (field, value) pairs in output order.
    pub fn iter(&self) -> impl Iterator<Item = (SemanticField, Option<&str>)> {
        self.values
            .iter()
            .map(|(field, value)| (*field, value.as_deref()))
    }

    /// Number of fields that resolved to a value.
    #[must_use]
    pub fn present_count(&self) -> usize {
        self.values.values().filter(|value| value.is_some()).count()
    }

    /// Render as a JSON object keyed by field name.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Resolve every semantic field of `record`.
#[must_use]
pub fn resolve(record: &Record) -> ResolvedFieldSet {
    ResolvedFieldSet {
        values: SemanticField::ALL
            .into_iter()
            .map(|field| (field, field.resolve(record)))
            .collect(),
    }
}

/// Extension trait adding semantic accessors to records.
pub trait FieldResolver {
    /// Look up a tag and optional subfield code; see [`get`].
    fn lookup(&self, tag: &str, code: Option<char>) -> Option<String>;

    /// Resolve one semantic field.
    fn resolve_field(&self, field: SemanticField) -> Option<String>;

    /// Resolve every semantic field.
    fn resolve_all(&self) -> ResolvedFieldSet;

    /// Control number from 001
    fn control_number(&self) -> Option<String> {
        self.resolve_field(SemanticField::ControlNumber)
    }

    /// Latest transaction timestamp from 005
    fn timestamp(&self) -> Option<String> {
        self.resolve_field(SemanticField::Timestamp)
    }

    /// Fixed-length data elements from 008
    fn fixed_length_data(&self) -> Option<String> {
        self.resolve_field(SemanticField::FixedLengthData)
    }

    /// Title from 245 $a
    fn title(&self) -> Option<String> {
        self.resolve_field(SemanticField::Title)
    }

    /// Author from 100 $a, falling back to 110 $a
    fn author(&self) -> Option<String> {
        self.resolve_field(SemanticField::Author)
    }

    /// Contributor from the first 700 $a
    fn contributor(&self) -> Option<String> {
        self.resolve_field(SemanticField::Contributor)
    }

    /// Edition from 250 $a
    fn edition(&self) -> Option<String> {
        self.resolve_field(SemanticField::Edition)
    }

    /// Publisher from 260 $b, falling back to 264 $b
    fn publisher(&self) -> Option<String> {
        self.resolve_field(SemanticField::Publisher)
    }

    /// Place of publication from 260 $a, falling back to 264 $a
    fn place(&self) -> Option<String> {
        self.resolve_field(SemanticField::Place)
    }

    /// Publication date from 260 $c, falling back to 264 $c
    fn year(&self) -> Option<String> {
        self.resolve_field(SemanticField::Year)
    }

    /// Physical description from 300 $a
    fn description(&self) -> Option<String> {
        self.resolve_field(SemanticField::Description)
    }

    /// Series statement from 490 $a
    fn series(&self) -> Option<String> {
        self.resolve_field(SemanticField::Series)
    }

    /// Language code from 041 $a
    fn language(&self) -> Option<String> {
        self.resolve_field(SemanticField::Language)
    }

    /// ISBN from 020 $a
    fn isbn(&self) -> Option<String> {
        self.resolve_field(SemanticField::Isbn)
    }

    /// Every 650 $a, comma-joined
    fn subjects(&self) -> Option<String> {
        self.resolve_field(SemanticField::Subjects)
    }

    /// General note from 500 $a
    fn notes(&self) -> Option<String> {
        self.resolve_field(SemanticField::Notes)
    }
}

impl FieldResolver for Record {
    fn lookup(&self, tag: &str, code: Option<char>) -> Option<String> {
        get(self, tag, code)
    }

    fn resolve_field(&self, field: SemanticField) -> Option<String> {
        field.resolve(self)
    }

    fn resolve_all(&self) -> ResolvedFieldSet {
        resolve(self)
    }
}
