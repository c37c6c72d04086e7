//! Common test helpers shared across the test suite.
//!
//! [`RecordFixture`] assembles synthetic ISO 2709 byte buffers so the tests
//! can exercise the decoder on exact layouts, including broken ones.

#![allow(dead_code)]

pub const FIELD_TERMINATOR: u8 = 0x1E;
pub const SUBFIELD_DELIMITER: u8 = 0x1F;
pub const RECORD_TERMINATOR: u8 = 0x1D;

/// Builder for the raw bytes of one record.
#[derive(Debug, Clone)]
pub struct RecordFixture {
    status_and_type: [u8; 7],
    fields: Vec<(String, Vec<u8>)>,
    directory_terminator: bool,
}

impl Default for RecordFixture {
    fn default() -> Self {
        RecordFixture {
            status_and_type: *b"nam a22",
            fields: Vec::new(),
            directory_terminator: true,
        }
    }
}

impl RecordFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leader positions 5-11.
    pub fn leader_flags(mut self, flags: &[u8; 7]) -> Self {
        self.status_and_type = *flags;
        self
    }

    pub fn control(mut self, tag: &str, value: &str) -> Self {
        self.fields.push((tag.to_string(), value.as_bytes().to_vec()));
        self
    }

    pub fn data(mut self, tag: &str, indicators: &str, subfields: &[(char, &str)]) -> Self {
        let mut body = indicators.as_bytes().to_vec();
        for (code, value) in subfields {
            body.push(SUBFIELD_DELIMITER);
            body.push(*code as u8);
            body.extend_from_slice(value.as_bytes());
        }
        self.fields.push((tag.to_string(), body));
        self
    }

    /// Field span without the trailing terminator, bytes taken verbatim.
    pub fn raw(mut self, tag: &str, body: &[u8]) -> Self {
        self.fields.push((tag.to_string(), body.to_vec()));
        self
    }

    pub fn without_directory_terminator(mut self) -> Self {
        self.directory_terminator = false;
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut directory = Vec::new();
        let mut data = Vec::new();
        for (tag, body) in &self.fields {
            let start = data.len();
            data.extend_from_slice(body);
            data.push(FIELD_TERMINATOR);
            directory.extend_from_slice(tag.as_bytes());
            directory.extend_from_slice(format!("{:04}", data.len() - start).as_bytes());
            directory.extend_from_slice(format!("{start:05}").as_bytes());
        }
        if self.directory_terminator {
            directory.push(FIELD_TERMINATOR);
        }

        let base_address = 24 + directory.len();
        let record_length = base_address + data.len() + 1;

        let mut bytes = format!("{record_length:05}").into_bytes();
        bytes.extend_from_slice(&self.status_and_type);
        bytes.extend_from_slice(format!("{base_address:05}").as_bytes());
        bytes.extend_from_slice(b" i 4500");
        bytes.extend_from_slice(&directory);
        bytes.extend_from_slice(&data);
        bytes.push(RECORD_TERMINATOR);
        bytes
    }
}

/// A realistic book record with imprint in 264 and two subjects.
pub fn gatsby() -> RecordFixture {
    RecordFixture::new()
        .control("001", " ocm00012345 ")
        .control("005", "20240101120000.0")
        .control("008", "200101s1925    nyu           000 1 eng d")
        .data("020", "  ", &[('a', "9780743273565")])
        .data("041", "0 ", &[('a', "eng")])
        .data("100", "1 ", &[('a', "Fitzgerald, F. Scott,"), ('d', "1896-1940.")])
        .data(
            "245",
            "14",
            &[('a', "The Great Gatsby /"), ('c', "F. Scott Fitzgerald.")],
        )
        .data("250", "  ", &[('a', "First Scribner trade paperback edition.")])
        .data(
            "264",
            " 1",
            &[('a', "New York :"), ('b', "Scribner,"), ('c', "2004.")],
        )
        .data("300", "  ", &[('a', "180 pages ;"), ('c', "21 cm")])
        .data("490", "0 ", &[('a', "Scribner classics")])
        .data("500", "  ", &[('a', "Originally published in 1925.")])
        .data("650", " 0", &[('a', "Rich people"), ('z', "New York (State)")])
        .data("650", " 0", &[('a', "First loves."), ('v', "Fiction.")])
        .data("700", "1 ", &[('a', "Bruccoli, Matthew J.,"), ('e', "editor.")])
}
