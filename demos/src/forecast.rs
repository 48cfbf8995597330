// SPDX-License-Identifier: Apache-2.0

//! Summarize a forecast response saved to disk.
//!
//! ```text
//! RUST_LOG=debug cargo run -p demos --bin forecast -- forecast.json [stations.json]
//! ```
//!
//! The file is streamed through a 4 KB scratch buffer in 256-byte reads,
//! the same budget a microcontroller would give the HTTP response body.

use std::fs::File;
use std::io::Read;
use std::process::ExitCode;

use log::{error, info};
use sipjson::{
    extract_bounded_records, extract_first_value, last_path_segment, CategoryCaps, Pattern,
    Reader, RecordQuery, Scalar, StopReason, DEFAULT_BUFFER_CAPACITY,
};

/// Day and night periods kept for the display.
const DAY_PERIODS: usize = 7;
const NIGHT_PERIODS: usize = 3;

const PERIOD_FIELDS: [Pattern<'static>; 4] = [
    Pattern::string("name"),
    Pattern::number("temperature"),
    Pattern::string("shortForecast"),
    Pattern::number("value").within("probabilityOfPrecipitation"),
];

const STATION_ID: Pattern<'static> = Pattern::string("id").containing("/stations/");

/// Adapts any `std::io::Read` to the extractor's [`Reader`].
struct IoReader<R>(R);

impl<R: Read> Reader for IoReader<R> {
    type Error = std::io::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        loop {
            match self.0.read(buf) {
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                result => return result,
            }
        }
    }
}

fn open(path: &str) -> Option<IoReader<File>> {
    match File::open(path) {
        Ok(file) => Some(IoReader(file)),
        Err(e) => {
            error!("cannot open {}: {}", path, e);
            None
        }
    }
}

fn display(value: Option<&Scalar>) -> String {
    match value {
        Some(Scalar::String(s)) => s.clone(),
        Some(Scalar::Integer(n)) => n.to_string(),
        Some(Scalar::Bool(b)) => b.to_string(),
        Some(Scalar::Null) | None => String::from("--"),
        #[allow(unreachable_patterns)]
        Some(other) => format!("{:?}", other),
    }
}

fn print_forecast(path: &str) -> bool {
    let Some(reader) = open(path) else {
        return false;
    };

    let mut buffer = [0u8; DEFAULT_BUFFER_CAPACITY];
    let query = RecordQuery::new("periods", "number", &PERIOD_FIELDS)
        .classify_by("isDaytime", CategoryCaps::new(DAY_PERIODS, NIGHT_PERIODS));
    let batch = extract_bounded_records(reader, &mut buffer, &query);

    if let Some(err) = batch.error() {
        error!("forecast incomplete ({:?}): {}", batch.stop, err);
    }
    if batch.records.is_empty() {
        println!("No forecast periods available");
        return batch.stop != StopReason::ArrayNotFound;
    }

    for record in &batch.records {
        let day = record.get("isDaytime").and_then(Scalar::as_bool) == Some(true);
        println!(
            "{:<16} {:>4}°F {:>4}%  {}  {}",
            display(record.get("name")),
            display(record.get("temperature")),
            display(record.get("value")),
            if day { "day  " } else { "night" },
            display(record.get("shortForecast")),
        );
    }
    info!("{} periods, stopped: {:?}", batch.records.len(), batch.stop);
    true
}

fn print_station(path: &str) -> bool {
    let Some(reader) = open(path) else {
        return false;
    };

    let mut buffer = [0u8; DEFAULT_BUFFER_CAPACITY];
    match extract_first_value(reader, &mut buffer, &STATION_ID) {
        Ok(Scalar::String(id)) => {
            println!("Observation station: {}", last_path_segment(&id));
            true
        }
        Ok(other) => {
            error!("unexpected station id {:?}", other);
            false
        }
        Err(e) => {
            error!("no station in {}: {}", path, e);
            false
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(forecast) = args.first() else {
        eprintln!("usage: forecast <forecast.json> [stations.json]");
        return ExitCode::from(2);
    };

    let mut ok = print_forecast(forecast);
    if let Some(stations) = args.get(1) {
        ok &= print_station(stations);
    }

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
