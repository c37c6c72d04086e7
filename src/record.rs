//! MARC bibliographic record structures.
//!
//! This module provides the decoded record types:
//! - [`Record`]: Leader plus fields in directory order
//! - [`Field`]: Either a [`ControlField`] (001-009) or a [`DataField`] (010+)
//! - [`Subfield`]: Code/value pair within a data field
//!
//! Records are normally produced by [`crate::decode`]. The builders exist for
//! constructing records in tests and demos.
//!
//! # Examples
//!
//! ```
//! use marcdec::{DataField, Leader, Record};
//!
//! let record = Record::builder(Leader::default())
//!     .control_field_str("001", "12345")
//!     .field(
//!         DataField::builder("650", ' ', '0')
//!             .subfield_str('a', "Fiction")
//!             .build(),
//!     )
//!     .build();
//!
//! for field in record.data_fields_by_tag("650") {
//!     for value in field.subfields_by_code('a') {
//!         assert_eq!(value, "Fiction");
//!     }
//! }
//! ```

use crate::leader::Leader;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A decoded MARC record.
///
/// Fields keep the order of the directory they were decoded from, which is
/// not necessarily sorted by tag. Control and data fields are interleaved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Record leader (24 bytes)
    pub leader: Leader,
    /// All fields in directory order
    pub fields: Vec<Field>,
}

/// A variable field: control or data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Field {
    /// Control field (tags 001-009), raw text without subfields
    Control(ControlField),
    /// Data field (tags 010+), indicators and subfields
    Data(DataField),
}

/// A control field (tags below 010).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlField {
    /// Field tag (3 digits)
    pub tag: String,
    /// Raw field text, terminator removed
    pub value: String,
}

/// A data field (tags 010 and higher, or any non-numeric tag).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataField {
    /// Field tag (3 characters)
    pub tag: String,
    /// First indicator
    pub indicator1: char,
    /// Second indicator
    pub indicator2: char,
    /// Subfields (stored in `SmallVec` to avoid allocation for typical fields with 4 or fewer subfields)
    pub subfields: SmallVec<[Subfield; 4]>,
}

/// A subfield within a data field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subfield {
    /// Subfield code (single character, any byte but the delimiters)
    pub code: char,
    /// Subfield value
    pub value: String,
}

impl Record {
    /// Create an empty record with the given leader
    #[must_use]
    pub fn new(leader: Leader) -> Self {
        Record {
            leader,
            fields: Vec::new(),
        }
    }

    /// Create a builder for fluently constructing records
    #[must_use]
    pub fn builder(leader: Leader) -> RecordBuilder {
        RecordBuilder {
            record: Record::new(leader),
        }
    }

    /// Append a field, keeping insertion order
    pub fn push_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Iterate over all fields in directory order
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// Iterate over every field with the given tag, control or data
    pub fn fields_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Field> + 'a {
        self.fields.iter().filter(move |field| field.tag() == tag)
    }

    /// First field with the given tag
    #[must_use]
    pub fn first_field(&self, tag: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.tag() == tag)
    }

    /// Raw text of the first control field with the given tag
    #[must_use]
    pub fn get_control_field(&self, tag: &str) -> Option<&str> {
        self.fields.iter().find_map(|field| match field {
            Field::Control(control) if control.tag == tag => Some(control.value.as_str()),
            _ => None,
        })
    }

    /// Iterate over data fields with the given tag
    ///
    /// # Examples
    ///
    /// ```ignore
    /// for field in record.data_fields_by_tag("650") {
    ///     if let Some(subject) = field.get_subfield('a') {
    ///         println!("Subject: {}", subject);
    ///     }
    /// }
    /// ```
    pub fn data_fields_by_tag<'a>(
        &'a self,
        tag: &'a str,
    ) -> impl Iterator<Item = &'a DataField> + 'a {
        self.fields_by_tag(tag).filter_map(Field::as_data)
    }

    /// Iterate over all control fields as (tag, value) tuples
    pub fn control_fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().filter_map(|field| match field {
            Field::Control(control) => Some((control.tag.as_str(), control.value.as_str())),
            Field::Data(_) => None,
        })
    }

    /// Number of fields in the record
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder for [`Record`]
#[derive(Debug)]
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    /// Add a control field using string slices
    #[must_use]
    pub fn control_field_str(mut self, tag: &str, value: &str) -> Self {
        self.record
            .push_field(Field::Control(ControlField::new(tag, value)));
        self
    }

    /// Add a data field to the record being built
    #[must_use]
    pub fn field(mut self, field: DataField) -> Self {
        self.record.push_field(Field::Data(field));
        self
    }

    /// Build the record
    #[must_use]
    pub fn build(self) -> Record {
        self.record
    }
}

impl Field {
    /// Tag of the field
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Field::Control(control) => &control.tag,
            Field::Data(data) => &data.tag,
        }
    }

    /// Whether this is a control field
    #[must_use]
    pub fn is_control(&self) -> bool {
        matches!(self, Field::Control(_))
    }

    /// The data field, if this is one
    #[must_use]
    pub fn as_data(&self) -> Option<&DataField> {
        match self {
            Field::Data(data) => Some(data),
            Field::Control(_) => None,
        }
    }

    /// The control field, if this is one
    #[must_use]
    pub fn as_control(&self) -> Option<&ControlField> {
        match self {
            Field::Control(control) => Some(control),
            Field::Data(_) => None,
        }
    }
}

impl ControlField {
    /// Create a control field
    #[must_use]
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        ControlField {
            tag: tag.into(),
            value: value.into(),
        }
    }
}

impl DataField {
    /// Create a data field without subfields
    #[must_use]
    pub fn new(tag: impl Into<String>, indicator1: char, indicator2: char) -> Self {
        DataField {
            tag: tag.into(),
            indicator1,
            indicator2,
            subfields: SmallVec::new(),
        }
    }

    /// Create a builder for constructing fields fluently
    ///
    /// # Examples
    ///
    /// ```
    /// use marcdec::DataField;
    ///
    /// let field = DataField::builder("245", '1', '0')
    ///     .subfield_str('a', "The Great Gatsby /")
    ///     .subfield_str('c', "F. Scott Fitzgerald.")
    ///     .build();
    /// assert_eq!(field.get_subfield('c'), Some("F. Scott Fitzgerald."));
    /// ```
    #[must_use]
    pub fn builder(tag: impl Into<String>, indicator1: char, indicator2: char) -> DataFieldBuilder {
        DataFieldBuilder {
            field: DataField::new(tag, indicator1, indicator2),
        }
    }

    /// Add a subfield
    pub fn add_subfield(&mut self, code: char, value: String) {
        self.subfields.push(Subfield { code, value });
    }

    /// Add a subfield using a string slice
    pub fn add_subfield_str(&mut self, code: char, value: &str) {
        self.add_subfield(code, value.to_string());
    }

    /// Get first value for a subfield code
    #[must_use]
    pub fn get_subfield(&self, code: char) -> Option<&str> {
        self.subfields
            .iter()
            .find(|sf| sf.code == code)
            .map(|sf| sf.value.as_str())
    }

    /// Iterate over all subfields in field order
    pub fn subfields(&self) -> impl Iterator<Item = &Subfield> {
        self.subfields.iter()
    }

    /// Iterate over subfield values with a specific code
    pub fn subfields_by_code(&self, code: char) -> impl Iterator<Item = &str> {
        self.subfields
            .iter()
            .filter(move |sf| sf.code == code)
            .map(|sf| sf.value.as_str())
    }
}

/// Builder for [`DataField`]
#[derive(Debug)]
pub struct DataFieldBuilder {
    field: DataField,
}

impl DataFieldBuilder {
    /// Add a subfield using a string slice
    #[must_use]
    pub fn subfield_str(mut self, code: char, value: &str) -> Self {
        self.field.add_subfield_str(code, value);
        self
    }

    /// Build the field
    #[must_use]
    pub fn build(self) -> DataField {
        self.field
    }
}
