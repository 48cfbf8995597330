// SPDX-License-Identifier: Apache-2.0

use sipjson::{
    extract_bounded_records, CategoryCaps, ChunkReader, ExtractError, ExtractionSession, Pattern,
    Reader, Record, RecordBatch, RecordQuery, Scalar, SessionConfig, StopReason,
    DEFAULT_BUFFER_CAPACITY,
};

use test_log::test;

const FORECAST: &[u8] = include_bytes!("data/forecast.json");

const PERIODS: &[u8] = br#"{"periods":[{"number":1,"isDaytime":true,"name":"Today","temperature":75,"shortForecast":"Sunny"},{"number":2,"isDaytime":false,"name":"Tonight","temperature":55,"shortForecast":"Clear"}]}"#;

const PERIOD_FIELDS: [Pattern<'static>; 3] = [
    Pattern::string("name"),
    Pattern::number("temperature"),
    Pattern::string("shortForecast"),
];

fn periods_query(day: usize, night: usize) -> RecordQuery<'static> {
    RecordQuery::new("periods", "number", &PERIOD_FIELDS)
        .classify_by("isDaytime", CategoryCaps::new(day, night))
}

fn extract(json: &[u8], chunk_size: usize, query: &RecordQuery<'_>) -> RecordBatch {
    let mut buffer = [0u8; DEFAULT_BUFFER_CAPACITY];
    extract_bounded_records(ChunkReader::new(json, chunk_size), &mut buffer, query)
}

fn names(batch: &RecordBatch) -> Vec<&str> {
    batch
        .records
        .iter()
        .map(|record| record.str("name").unwrap_or("<null>"))
        .collect()
}

/// Build a periods document from `(name, is_daytime)` pairs.
fn periods_doc(periods: &[(&str, bool)]) -> Vec<u8> {
    let body: Vec<String> = periods
        .iter()
        .enumerate()
        .map(|(i, (name, day))| {
            format!(
                r#"{{"number":{},"name":"{}","isDaytime":{},"temperature":{},"detail":{{"note":"{{}}"}}}}"#,
                i + 1,
                name,
                day,
                50 + i
            )
        })
        .collect();
    format!(r#"{{"properties":{{"periods":[{}]}}}}"#, body.join(",")).into_bytes()
}

#[test]
fn test_day_and_night_scenario() {
    let batch = extract(PERIODS, 7, &periods_query(1, 1));

    let expected: Vec<Record> = vec![
        [
            ("name", Scalar::from("Today")),
            ("temperature", Scalar::Integer(75)),
            ("shortForecast", Scalar::from("Sunny")),
            ("isDaytime", Scalar::Bool(true)),
        ]
        .into_iter()
        .collect(),
        [
            ("name", Scalar::from("Tonight")),
            ("temperature", Scalar::Integer(55)),
            ("shortForecast", Scalar::from("Clear")),
            ("isDaytime", Scalar::Bool(false)),
        ]
        .into_iter()
        .collect(),
    ];
    assert_eq!(batch.records, expected);
    assert_eq!(batch.stop, StopReason::CapsReached);
    assert_eq!(batch.error(), None);
}

#[test]
fn test_cap_invariant_with_sentinel() {
    let doc = periods_doc(&[
        ("Today", true),
        ("Tonight", false),
        ("Friday", true),
        ("SENTINEL", false),
        ("Saturday", true),
        ("Saturday Night", false),
    ]);

    let mut reader = ChunkReader::new(&doc, 7);
    let mut buffer = [0u8; 512];
    let batch = extract_bounded_records(&mut reader, &mut buffer, &periods_query(2, 1));

    assert_eq!(names(&batch), ["Today", "Tonight", "Friday"]);
    assert_eq!(batch.stop, StopReason::CapsReached);
    // Scanning stopped at the cap point, well before the end of the document
    assert!(reader.position() < doc.len());
    assert!(!reader.remaining().is_empty());
}

#[test]
fn test_over_cap_records_are_skipped() {
    let doc = periods_doc(&[
        ("Today", true),
        ("Tonight", false),
        ("Friday", true),
        ("Friday Night", false),
        ("Saturday", true),
        ("Saturday Night", false),
    ]);
    let batch = extract(&doc, 11, &periods_query(1, 3));

    assert_eq!(names(&batch), ["Today", "Tonight", "Friday Night", "Saturday Night"]);
    assert_eq!(batch.stop, StopReason::CapsReached);
}

#[test]
fn test_caps_larger_than_document() {
    let batch = extract(FORECAST, 64, &periods_query(7, 3));

    let day = batch
        .records
        .iter()
        .filter(|r| r.get("isDaytime") == Some(&Scalar::Bool(true)))
        .count();
    assert_eq!(day, 4);
    assert_eq!(batch.records.len(), 7);
    assert_eq!(batch.stop, StopReason::ArrayEnd);
    assert_eq!(
        names(&batch),
        [
            "Today",
            "Tonight",
            "Friday",
            "Friday Night",
            "Saturday",
            "Saturday Night",
            "Sunday"
        ]
    );
}

#[test]
fn test_idempotent_sessions() {
    let query = periods_query(3, 2);
    let first = extract(FORECAST, 256, &query);
    let second = extract(FORECAST, 256, &query);
    assert_eq!(first, second);
    assert_eq!(first.records.len(), 5);
}

#[test]
fn test_truncated_before_closing_brace() {
    // Cut the document immediately before the second record's closing brace
    let cut = PERIODS
        .windows(2)
        .rposition(|w| w == b"}]")
        .unwrap();
    let truncated = &PERIODS[..cut];

    let batch = extract(truncated, 7, &periods_query(1, 1));
    assert_eq!(names(&batch), ["Today"]);
    assert_eq!(batch.stop, StopReason::IncompleteObject);
    assert_eq!(batch.error(), Some(ExtractError::IncompleteObject));
}

#[test]
fn test_truncated_between_records() {
    let cut = PERIODS
        .windows(2)
        .position(|w| w == b"},")
        .unwrap();
    let truncated = &PERIODS[..cut + 2];

    let batch = extract(truncated, 5, &periods_query(1, 1));
    assert_eq!(names(&batch), ["Today"]);
    assert_eq!(batch.stop, StopReason::EndOfStream);
    assert_eq!(batch.error(), None);
}

#[test]
fn test_array_end_without_classifier() {
    let query = RecordQuery::new("periods", "number", &PERIOD_FIELDS);
    let batch = extract(PERIODS, 3, &query);

    assert_eq!(names(&batch), ["Today", "Tonight"]);
    assert_eq!(batch.stop, StopReason::ArrayEnd);
    // Only the requested fields without a classifier
    assert_eq!(batch.records[0].len(), 3);
}

const CHUNK_SIZES: [usize; 9] = [1, 2, 3, 5, 7, 11, 16, 64, 256];

#[test]
fn test_objects_after_array_are_not_records() {
    let json = br#"{"periods":[{"x":1}],"other":[{"number":9,"name":"Stray"}]}"#;
    let query = RecordQuery::new("periods", "number", &PERIOD_FIELDS);

    for chunk_size in CHUNK_SIZES {
        let batch = extract(json, chunk_size, &query);
        assert!(batch.records.is_empty(), "chunk {}: {:?}", chunk_size, batch.records);
        assert_eq!(batch.stop, StopReason::ArrayEnd, "chunk {}", chunk_size);
    }
}

#[test]
fn test_last_element_without_anchor_ends_array() {
    let json = br#"{"periods":[{"number":1,"name":"Today"},{"name":"Unnumbered","detail":{"x":1}}],
        "history":[{"number":7,"name":"Stray"},{"number":8,"name":"Later"}]}"#;
    let query = RecordQuery::new("periods", "number", &PERIOD_FIELDS);

    for chunk_size in CHUNK_SIZES {
        let batch = extract(json, chunk_size, &query);
        assert_eq!(names(&batch), ["Today"], "chunk {}", chunk_size);
        assert_eq!(batch.stop, StopReason::ArrayEnd, "chunk {}", chunk_size);
    }

    // Uncapped categories keep scanning, but still only inside the array
    let batch = extract(json, 4, &periods_query(5, 5));
    assert_eq!(names(&batch), ["Today"]);
    assert_eq!(batch.stop, StopReason::ArrayEnd);
}

#[test]
fn test_array_not_found() {
    let json = br#"{"properties":{"units":"us","updateTime":"2026-10-16T13:58:38+00:00"}}"#;
    let batch = extract(json, 7, &periods_query(1, 1));
    assert!(batch.records.is_empty());
    assert_eq!(batch.stop, StopReason::ArrayNotFound);
    assert_eq!(batch.error(), Some(ExtractError::NotFound));
}

#[test]
fn test_bad_field_does_not_drop_record() {
    let json = br#"{"periods":[{"number":1,"name":"Today","temperature":7-5,"isDaytime":"yes"},{"number":2,"name":"Tonight","temperature":55,"isDaytime":false}]}"#;
    let batch = extract(json, 9, &periods_query(0, 2));

    assert_eq!(names(&batch), ["Today", "Tonight"]);
    let today = &batch.records[0];
    assert_eq!(today.get("temperature"), Some(&Scalar::Null));
    assert_eq!(today.get("shortForecast"), Some(&Scalar::Null));
    // Non-boolean classifier counts as the `false` category
    assert_eq!(today.get("isDaytime"), Some(&Scalar::Null));
    assert_eq!(batch.stop, StopReason::CapsReached);
}

#[test]
fn test_record_exceeding_buffer() {
    let mut buffer = [0u8; 96];
    let session = ExtractionSession::with_config(
        ChunkReader::full_slice(FORECAST),
        &mut buffer,
        SessionConfig::new(32),
    );
    let batch = session.bounded_records(&periods_query(1, 1));
    assert!(batch.records.is_empty());
    assert_eq!(batch.stop, StopReason::BufferFull);
    assert_eq!(batch.into_records(), Vec::new());
}

#[test]
fn test_reader_error_keeps_collected_records() {
    struct Dropped<'a> {
        inner: ChunkReader<'a>,
        budget: usize,
    }

    impl Reader for Dropped<'_> {
        type Error = ();

        fn read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
            if self.inner.position() >= self.budget {
                return Err(());
            }
            match self.inner.read(buf) {
                Ok(n) => Ok(n),
                Err(never) => match never {},
            }
        }
    }

    // Fails partway through the second period
    let budget = PERIODS.len() - 40;
    let reader = Dropped {
        inner: ChunkReader::new(PERIODS, 7),
        budget,
    };
    let mut buffer = [0u8; 256];
    let batch = extract_bounded_records(reader, &mut buffer, &periods_query(1, 1));

    assert_eq!(names(&batch), ["Today"]);
    assert_eq!(batch.stop, StopReason::ReaderError);
    assert_eq!(batch.error(), Some(ExtractError::ReaderError));
}
