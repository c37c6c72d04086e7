//! Integration tests for decoding and resolving complete records

mod common;

use common::{gatsby, RecordFixture, FIELD_TERMINATOR};
use marcdec::{
    decode, resolve, DecodeError, Decoder, Field, FieldResolver, RecoveryMode, SemanticField,
};

#[test]
fn test_decode_realistic_book_record() {
    let bytes = gatsby().to_bytes();
    let record = decode(&bytes).expect("Failed to decode record");

    assert_eq!(record.leader.record_type, 'a');
    assert_eq!(record.leader.bibliographic_level, 'm');
    assert_eq!(record.len(), 15);

    let title = record
        .data_fields_by_tag("245")
        .next()
        .expect("No title field");
    assert_eq!(title.indicator1, '1');
    assert_eq!(title.indicator2, '4');
    assert_eq!(title.get_subfield('a'), Some("The Great Gatsby /"));
    assert_eq!(title.get_subfield('c'), Some("F. Scott Fitzgerald."));

    assert_eq!(record.get_control_field("001"), Some(" ocm00012345 "));
    assert_eq!(record.data_fields_by_tag("650").count(), 2);
}

#[test]
fn test_resolve_realistic_book_record() {
    let record = decode(&gatsby().to_bytes()).unwrap();
    let fields = resolve(&record);

    let expected = [
        (SemanticField::ControlNumber, Some("ocm00012345")),
        (SemanticField::Timestamp, Some("20240101120000.0")),
        (
            SemanticField::FixedLengthData,
            Some("200101s1925    nyu           000 1 eng d"),
        ),
        (SemanticField::Title, Some("The Great Gatsby")),
        (SemanticField::Author, Some("Fitzgerald, F. Scott")),
        (SemanticField::Contributor, Some("Bruccoli, Matthew J")),
        (
            SemanticField::Edition,
            Some("First Scribner trade paperback edition"),
        ),
        (SemanticField::Publisher, Some("Scribner")),
        (SemanticField::Place, Some("New York")),
        (SemanticField::Year, Some("2004")),
        (SemanticField::Description, Some("180 pages")),
        (SemanticField::Series, Some("Scribner classics")),
        (SemanticField::Language, Some("eng")),
        (SemanticField::Isbn, Some("9780743273565")),
        (SemanticField::Subjects, Some("Rich people, First loves")),
        (SemanticField::Notes, Some("Originally published in 1925")),
    ];

    let actual: Vec<(SemanticField, Option<&str>)> = fields.iter().collect();
    assert_eq!(actual, expected.to_vec());
}

#[test]
fn test_sparse_record_resolves_to_absent() {
    let bytes = RecordFixture::new()
        .data("245", "00", &[('a', "Untitled")])
        .to_bytes();
    let record = decode(&bytes).unwrap();

    assert_eq!(record.title().as_deref(), Some("Untitled"));
    assert_eq!(record.control_number(), None);
    assert_eq!(record.subjects(), None);
    assert_eq!(resolve(&record).present_count(), 1);
}

#[test]
fn test_field_order_follows_directory() {
    let bytes = RecordFixture::new()
        .data("650", " 0", &[('a', "Fiction")])
        .control("008", "fixed")
        .data("245", "00", &[('a', "Title")])
        .control("001", "id")
        .to_bytes();
    let record = decode(&bytes).unwrap();
    let tags: Vec<&str> = record.fields().map(Field::tag).collect();
    assert_eq!(tags, vec!["650", "008", "245", "001"]);
}

#[test]
fn test_unterminated_directory_is_lenient_by_default() {
    let bytes = gatsby().without_directory_terminator().to_bytes();

    let report = Decoder::new().decode_report(&bytes).unwrap();
    assert_eq!(report.warnings, vec![DecodeError::MissingDirectoryTerminator]);
    assert_eq!(report.record.title().as_deref(), Some("The Great Gatsby"));

    let strict = Decoder::new().with_recovery_mode(RecoveryMode::Strict);
    assert_eq!(
        strict.decode(&bytes),
        Err(DecodeError::MissingDirectoryTerminator)
    );
}

#[test]
fn test_ten_byte_buffer_is_truncated_leader() {
    assert_eq!(
        decode(b"0123456789"),
        Err(DecodeError::TruncatedLeader { len: 10 })
    );
}

#[test]
fn test_base_address_five_is_invalid_offsets() {
    let mut bytes = gatsby().to_bytes();
    bytes[12..17].copy_from_slice(b"00005");
    assert!(matches!(
        decode(&bytes),
        Err(DecodeError::InvalidOffsets { base_address: 5, .. })
    ));
}

#[test]
fn test_field_pointing_past_record_end() {
    let mut bytes = RecordFixture::new()
        .control("001", "id")
        .data("245", "00", &[('a', "Title")])
        .to_bytes();
    // Starting position of the second directory entry
    bytes[43..48].copy_from_slice(b"00900");
    assert_eq!(
        decode(&bytes),
        Err(DecodeError::FieldOutOfBounds {
            tag: "245".to_string()
        })
    );
}

#[test]
fn test_raw_field_bytes_are_split_on_delimiters() {
    let mut body = b"10".to_vec();
    body.extend_from_slice(&[0x1F, b'a']);
    body.extend_from_slice(b"Part one");
    body.extend_from_slice(&[0x1F, b'b']);
    body.extend_from_slice(b"Part two");
    let bytes = RecordFixture::new().raw("245", &body).to_bytes();

    let record = decode(&bytes).unwrap();
    let field = record.data_fields_by_tag("245").next().unwrap();
    let codes: Vec<char> = field.subfields().map(|sf| sf.code).collect();
    assert_eq!(codes, vec!['a', 'b']);
    assert_eq!(field.get_subfield('b'), Some("Part two"));
    assert!(!field.get_subfield('b').unwrap().contains(FIELD_TERMINATOR as char));
}

#[test]
fn test_control_field_resolves_without_subfield_path() {
    let bytes = RecordFixture::new().control("001", " rec123 ").to_bytes();
    let record = decode(&bytes).unwrap();
    assert_eq!(record.lookup("001", None).as_deref(), Some("rec123"));
    assert_eq!(record.lookup("001", Some('z')).as_deref(), Some("rec123"));
}

#[test]
fn test_record_serializes_to_json() {
    let record = decode(&gatsby().to_bytes()).unwrap();
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["leader"]["record_type"], "a");
    assert_eq!(json["fields"][0]["kind"], "control");
    assert_eq!(json["fields"][0]["tag"], "001");
}
