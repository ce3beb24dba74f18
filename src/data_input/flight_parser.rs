// src/data_input/flight_parser.rs

use csv::ReaderBuilder;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::data_input::flight_data::{ColumnPresence, FlightData, FlightSample};
use crate::types::FlightParseResult;

// Column names expected in a processed flight log. The first four are
// essential; the rest are optional and tracked via ColumnPresence.
const TARGET_HEADERS: [&str; 11] = [
    "time",
    "voltage",
    "current",
    "is_moving",
    "total_mass",
    "vx_anemometer",
    "vy_anemometer",
    "vz_imu",
    "x_gps",
    "y_gps",
    "z_gps",
];

const ESSENTIAL_HEADER_COUNT: usize = 4;

/// Parses a boolean cell. Processed logs write `True`/`False`, but numeric
/// flags (`1`/`0`) are accepted as well.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        other => other.parse::<f64>().ok().map(|v| v != 0.0),
    }
}

/// Reads one processed flight log into a `FlightData`.
///
/// Header indices are mapped once from the CSV header record; rows with a
/// missing or unparseable essential value (time, voltage, current, is_moving)
/// are skipped with a warning, as are rows whose timestamp does not advance.
pub fn parse_flight_file(input_file: &Path, flight_id: u32) -> FlightParseResult {
    // --- Header Definition and Index Mapping ---
    let header_indices: Vec<Option<usize>>;
    {
        let file = File::open(input_file)
            .map_err(|e| format!("cannot open flight file '{}': {}", input_file.display(), e))?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(BufReader::new(file));
        let header_record = reader.headers()?.clone();

        header_indices = TARGET_HEADERS
            .iter()
            .map(|&target_header| header_record.iter().position(|h| h.trim() == target_header))
            .collect();

        let missing_essentials: Vec<String> = (0..ESSENTIAL_HEADER_COUNT)
            .filter(|&i| header_indices[i].is_none())
            .map(|i| format!("'{}'", TARGET_HEADERS[i]))
            .collect();
        if !missing_essentials.is_empty() {
            return Err(format!(
                "flight {}: missing essential columns {} in '{}'",
                flight_id,
                missing_essentials.join(", "),
                input_file.display()
            )
            .into());
        }
    }

    let columns = ColumnPresence {
        total_mass: header_indices[4].is_some(),
        vx_anemometer: header_indices[5].is_some(),
        vy_anemometer: header_indices[6].is_some(),
        vz_imu: header_indices[7].is_some(),
        x_gps: header_indices[8].is_some(),
        y_gps: header_indices[9].is_some(),
        z_gps: header_indices[10].is_some(),
    };

    // --- Data Reading and Storage ---
    let mut samples: Vec<FlightSample> = Vec::new();
    {
        let file = File::open(input_file)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(BufReader::new(file));

        for (row_index, result) in reader.records().enumerate() {
            match result {
                Ok(record) => {
                    let cell_by_target_idx = |target_idx: usize| -> Option<&str> {
                        header_indices
                            .get(target_idx)
                            .and_then(|opt_csv_idx| opt_csv_idx.as_ref())
                            .and_then(|&csv_idx| record.get(csv_idx))
                    };
                    let parse_f64_by_target_idx = |target_idx: usize| -> Option<f64> {
                        cell_by_target_idx(target_idx).and_then(|val_str| val_str.parse::<f64>().ok())
                    };

                    let time_s = parse_f64_by_target_idx(0);
                    let voltage = parse_f64_by_target_idx(1);
                    let current = parse_f64_by_target_idx(2);
                    let is_moving = cell_by_target_idx(3).and_then(parse_flag);

                    let (time_s, voltage, current, is_moving) =
                        match (time_s, voltage, current, is_moving) {
                            (Some(t), Some(v), Some(c), Some(m)) => (t, v, c, m),
                            _ => {
                                eprintln!(
                                    "Warning: flight {}: skipping row {} due to missing or invalid essential value",
                                    flight_id,
                                    row_index + 1
                                );
                                continue;
                            }
                        };

                    if let Some(last) = samples.last() {
                        if time_s <= last.time_s {
                            eprintln!(
                                "Warning: flight {}: skipping row {} with non-increasing timestamp {:.4}",
                                flight_id,
                                row_index + 1,
                                time_s
                            );
                            continue;
                        }
                    }

                    samples.push(FlightSample {
                        time_s,
                        voltage,
                        current,
                        is_moving,
                        total_mass: parse_f64_by_target_idx(4),
                        vx_anemometer: parse_f64_by_target_idx(5),
                        vy_anemometer: parse_f64_by_target_idx(6),
                        vz_imu: parse_f64_by_target_idx(7),
                        x_gps: parse_f64_by_target_idx(8),
                        y_gps: parse_f64_by_target_idx(9),
                        z_gps: parse_f64_by_target_idx(10),
                    });
                }
                Err(e) => {
                    eprintln!(
                        "Warning: flight {}: skipping row {} due to CSV read error: {}",
                        flight_id,
                        row_index + 1,
                        e
                    );
                }
            }
        }
    }

    println!(
        "  Flight {}: read {} data rows from '{}'.",
        flight_id,
        samples.len(),
        input_file.display()
    );

    Ok(FlightData {
        flight_id,
        samples,
        columns,
    })
}


// src/data_input/flight_parser.rs
