#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # marcdec: MARC21 decoder and field resolver
//!
//! Decodes ISO 2709 MARC21 bibliographic records from raw bytes and resolves
//! common catalog facts (title, author, imprint, subjects, ...) with fixed
//! tag fallback chains.
//!
//! ## Quick Start
//!
//! ### Decoding a stream of records
//!
//! ```no_run
//! use marcdec::{FieldResolver, MarcReader};
//! use std::fs::File;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let file = File::open("records.mrc")?;
//! for result in MarcReader::new(file) {
//!     match result {
//!         Ok(record) => println!("Title: {:?}", record.title()),
//!         Err(e) => eprintln!("{e}"),
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Resolving fields
//!
//! ```
//! use marcdec::{resolve, DataField, Leader, Record, SemanticField};
//!
//! let record = Record::builder(Leader::default())
//!     .control_field_str("001", " rec123 ")
//!     .field(
//!         DataField::builder("260", ' ', ' ')
//!             .subfield_str('b', "Springer, :")
//!             .build(),
//!     )
//!     .build();
//!
//! let fields = resolve(&record);
//! assert_eq!(fields.get(SemanticField::ControlNumber), Some("rec123"));
//! assert_eq!(fields.get(SemanticField::Publisher), Some("Springer"));
//! assert_eq!(fields.get(SemanticField::Subjects), None);
//! ```
//!
//! ## Modules
//!
//! - [`decoder`]: Decoding one record buffer into a [`Record`]
//! - [`resolver`]: Semantic lookups with fallback chains
//! - [`record`]: Core record structures (`Record`, `Field`, `Subfield`)
//! - [`leader`]: MARC record leader (24-byte header)
//! - [`directory`]: Directory entry parsing
//! - [`reader`]: Streaming records from any [`std::io::Read`]
//! - [`boundary_scanner`]: Record boundary detection for in-memory buffers
//! - [`parallel`]: Parallel decoding with Rayon
//! - [`recovery`]: Lenient and strict handling of malformed structure
//! - [`error`]: Error types and result type

pub mod boundary_scanner;
pub mod decoder;
pub mod directory;
pub mod error;
pub mod leader;
pub mod parallel;
pub mod reader;
/// Core MARC record structures (`Record`, `Field`, `Subfield`)
pub mod record;
pub mod recovery;
pub mod resolver;

pub use boundary_scanner::RecordBoundaryScanner;
pub use decoder::{decode, DecodeReport, Decoder};
pub use directory::DirectoryEntry;
pub use error::{DecodeError, MarcError, Result};
pub use leader::Leader;
pub use reader::MarcReader;
pub use record::{ControlField, DataField, Field, Record, Subfield};
pub use recovery::RecoveryMode;
pub use resolver::{
    get, resolve, trim_punctuation, FieldResolver, ResolvedFieldSet, SemanticField,
};
