// Example demonstrating bounded extraction with a ChunkReader over a fixed-size array

use sipjson::{
    extract_bounded_records, extract_first_value, last_path_segment, CategoryCaps, ChunkReader,
    ExtractError, Pattern, RecordQuery,
};

fn main() -> Result<(), ExtractError> {
    println!("🚀 sipjson Demo with ChunkReader");
    println!("================================");

    let json = br#"{"properties": {"periods": [
        {"number": 1, "name": "Today", "isDaytime": true, "temperature": 75, "shortForecast": "Sunny"},
        {"number": 2, "name": "Tonight", "isDaytime": false, "temperature": 55, "shortForecast": "Clear"},
        {"number": 3, "name": "Friday", "isDaytime": true, "temperature": 78, "shortForecast": "Mostly Sunny"}
    ]}, "observationStations": {"id": "https://api.weather.gov/stations/KSEA"}}"#;

    println!("📏 Total size: {} bytes", json.len());

    // Small buffer and reads: the whole document never sits in memory
    let mut buffer = [0u8; 160];
    println!("   Buffer size: {} bytes", buffer.len());
    println!("   Chunk size: 8 bytes (simulates small network packets)");
    println!();

    const FIELDS: [Pattern<'static>; 2] = [Pattern::string("name"), Pattern::number("temperature")];
    let query = RecordQuery::new("periods", "number", &FIELDS)
        .classify_by("isDaytime", CategoryCaps::new(1, 1));

    let batch = extract_bounded_records(ChunkReader::new(json, 8), &mut buffer, &query);
    for record in &batch.records {
        println!(
            "  📋 {:?}: {:?}",
            record.str("name").unwrap_or("?"),
            record.get("temperature")
        );
    }
    println!("  🏁 Stopped: {:?}", batch.stop);
    if let Some(e) = batch.error() {
        return Err(e);
    }

    let pattern = Pattern::string("id").containing("/stations/");
    let id = extract_first_value(ChunkReader::new(json, 8), &mut buffer, &pattern)?;
    if let Some(id) = id.as_str() {
        println!("  🔑 Station: {}", last_path_segment(id));
    }

    println!();
    println!("✅ Extracted {} records with a {}-byte buffer", batch.records.len(), buffer.len());
    Ok(())
}
