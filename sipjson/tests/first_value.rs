// SPDX-License-Identifier: Apache-2.0

use sipjson::{
    extract_first_value, last_path_segment, ChunkReader, ExtractError, ExtractionSession, Pattern,
    Reader, Scalar, SessionConfig, DEFAULT_BUFFER_CAPACITY,
};

use test_log::test;

const STATIONS: &[u8] = include_bytes!("data/stations.json");
const FORECAST: &[u8] = include_bytes!("data/forecast.json");

const STATION_ID: Pattern<'static> = Pattern::string("id").containing("/stations/");

fn first(json: &[u8], chunk_size: usize, pattern: &Pattern<'_>) -> Result<Scalar, ExtractError> {
    let mut buffer = [0u8; DEFAULT_BUFFER_CAPACITY];
    extract_first_value(ChunkReader::new(json, chunk_size), &mut buffer, pattern)
}

/// Reader that hands out its data and then fails instead of ending.
struct FailingReader<'a> {
    inner: ChunkReader<'a>,
}

impl Reader for FailingReader<'_> {
    type Error = &'static str;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        match self.inner.read(buf) {
            Ok(0) => Err("connection reset"),
            Ok(n) => Ok(n),
            Err(never) => match never {},
        }
    }
}

#[test]
fn test_station_filter_skips_first_id() {
    let json = br#"{"features":[{"id":"https://api.weather.gov/zones/forecast/WAZ558"},{"id":"https://api.weather.gov/stations/KSEA"}]}"#;
    let value = first(json, 7, &STATION_ID).unwrap();
    let id = value.as_str().unwrap();
    assert_eq!(id, "https://api.weather.gov/stations/KSEA");
    assert_eq!(last_path_segment(id), "KSEA");
}

#[test]
fn test_station_from_listing() {
    let value = first(STATIONS, 64, &STATION_ID).unwrap();
    assert_eq!(value.as_str().map(last_path_segment), Some("KBFI"));

    // Without the filter the zone comes first
    let zone = first(STATIONS, 64, &Pattern::string("id")).unwrap();
    assert_eq!(zone.as_str().map(last_path_segment), Some("WAZ558"));
}

#[test]
fn test_pretty_printed_values() {
    assert_eq!(
        first(FORECAST, 13, &Pattern::string("generatedAt")),
        Ok(Scalar::from("2026-10-16T14:21:09+00:00"))
    );
    assert_eq!(
        first(FORECAST, 13, &Pattern::number("temperature")),
        Ok(Scalar::Integer(75))
    );
    assert_eq!(
        first(FORECAST, 13, &Pattern::boolean("isDaytime")),
        Ok(Scalar::Bool(true))
    );
}

#[test]
fn test_escaped_string_value() {
    let value = first(FORECAST, 5, &Pattern::string("detailedForecast").containing("Calm")).unwrap();
    assert_eq!(
        value.as_str(),
        Some("Clear, with a low around 55. \"Calm\" wind.")
    );
}

#[test]
fn test_nested_value() {
    let json = br#"{"properties":{"dewpoint":{"unitCode":"wmoUnit:degC","value":9},
        "relativeHumidity":{"unitCode":"wmoUnit:percent","value":64}}}"#;
    let pattern = Pattern::number("value").within("relativeHumidity");
    assert_eq!(first(json, 3, &pattern), Ok(Scalar::Integer(64)));
}

#[test]
fn test_null_is_not_a_match() {
    let json = br#"{"temperatureTrend":null,"periods":[{"temperatureTrend":"rising"}]}"#;
    assert_eq!(
        first(json, 4, &Pattern::any("temperatureTrend")),
        Ok(Scalar::from("rising"))
    );
}

#[test]
fn test_not_found() {
    assert_eq!(
        first(FORECAST, 256, &Pattern::string("stationIdentifier")),
        Err(ExtractError::NotFound)
    );
    assert_eq!(
        first(STATIONS, 16, &Pattern::string("id").containing("/offices/")),
        Err(ExtractError::NotFound)
    );
    assert_eq!(first(b"", 1, &STATION_ID), Err(ExtractError::NotFound));
}

#[test]
fn test_unterminated_string_at_end_of_stream() {
    let json = br#"{"id":"https://api.weather.gov/stations/KSE"#;
    assert_eq!(first(json, 8, &STATION_ID), Err(ExtractError::NotFound));
}

#[test]
fn test_malformed_number() {
    let json = br#"{"temperature": 7-5, "windSpeed": "5 mph"}"#;
    assert_eq!(
        first(json, 4, &Pattern::number("temperature")),
        Err(ExtractError::MalformedValue)
    );
}

#[test]
fn test_integer_overflow_is_malformed() {
    let json = br#"{"temperature": 99999999999999999999999}"#;
    assert_eq!(
        first(json, 4, &Pattern::number("temperature")),
        Err(ExtractError::MalformedValue)
    );
}

#[test]
fn test_invalid_escape_is_not_found() {
    let json = br#"{"name":"bad \q escape"}"#;
    assert_eq!(
        first(json, 4, &Pattern::string("name")),
        Err(ExtractError::NotFound)
    );
}

#[test]
fn test_station_filter_skips_undecodable_id() {
    let json = br#"{"features":[{"id":"https://x/zones/\q"},{"id":"https://x/stations/KSEA"}]}"#;
    for chunk_size in [1, 7, 64] {
        assert_eq!(
            first(json, chunk_size, &STATION_ID),
            Ok(Scalar::from("https://x/stations/KSEA")),
            "chunk {}",
            chunk_size
        );
    }
}

#[test]
fn test_reader_error() {
    let reader = FailingReader {
        inner: ChunkReader::new(STATIONS, 32),
    };
    let mut buffer = [0u8; 512];
    let pattern = Pattern::string("id").containing("/offices/");
    assert_eq!(
        extract_first_value(reader, &mut buffer, &pattern),
        Err(ExtractError::ReaderError)
    );

    // A match before the failure is still returned
    let reader = FailingReader {
        inner: ChunkReader::new(STATIONS, 32),
    };
    assert!(extract_first_value(reader, &mut buffer, &STATION_ID).is_ok());
}

#[test]
fn test_buffer_too_small_for_value() {
    let mut buffer = [0u8; 24];
    let session = ExtractionSession::with_config(
        ChunkReader::full_slice(STATIONS),
        &mut buffer,
        SessionConfig::new(8),
    );
    assert_eq!(
        session.first_value(&STATION_ID),
        Err(ExtractError::BufferFull)
    );
}

#[test]
fn test_small_buffer_long_document() {
    // 48 bytes of scratch are enough for a 7 KB document: only the match is held
    let mut buffer = [0u8; 48];
    let session = ExtractionSession::with_config(
        ChunkReader::full_slice(FORECAST),
        &mut buffer,
        SessionConfig::new(16),
    );
    assert_eq!(
        session.first_value(&Pattern::string("shortForecast").containing("Showers")),
        Ok(Scalar::from("Rain Showers"))
    );
}

#[test]
fn test_reader_stops_at_match() {
    let mut reader = ChunkReader::new(FORECAST, 32);
    let mut buffer = [0u8; 256];
    let value = extract_first_value(&mut reader, &mut buffer, &Pattern::string("units"));
    assert_eq!(value, Ok(Scalar::from("us")));
    assert!(reader.position() < FORECAST.len());
    assert!(!reader.remaining().is_empty());
}
