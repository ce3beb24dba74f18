// src/data_input/parameters.rs

use csv::ReaderBuilder;
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

// Column identifying the flight in the parameter table.
const FLIGHT_ID_HEADER: &str = "flight";

/// Predicate over one parameter-table column. Numeric predicates exclude rows
/// whose cell does not parse as a number.
pub enum ColumnPredicate {
    Numeric(Box<dyn Fn(f64) -> bool>),
    Text(Box<dyn Fn(&str) -> bool>),
}

/// One flight-selection filter: a column name plus the predicate its cells
/// must satisfy.
pub struct FlightCondition {
    pub column: String,
    pub predicate: ColumnPredicate,
}

impl FlightCondition {
    pub fn numeric<F>(column: &str, predicate: F) -> FlightCondition
    where
        F: Fn(f64) -> bool + 'static,
    {
        FlightCondition {
            column: column.to_string(),
            predicate: ColumnPredicate::Numeric(Box::new(predicate)),
        }
    }

    pub fn text<F>(column: &str, predicate: F) -> FlightCondition
    where
        F: Fn(&str) -> bool + 'static,
    {
        FlightCondition {
            column: column.to_string(),
            predicate: ColumnPredicate::Text(Box::new(predicate)),
        }
    }

    fn matches(&self, cell: &str) -> bool {
        match &self.predicate {
            ColumnPredicate::Numeric(f) => cell.trim().parse::<f64>().map(|v| f(v)).unwrap_or(false),
            ColumnPredicate::Text(f) => f(cell.trim()),
        }
    }
}

/// The flight-parameter table (`parameters.csv`): one row per recorded flight
/// with its id and recording conditions (route, payload, ...).
#[derive(Debug, Clone)]
pub struct ParameterTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ParameterTable {
    pub fn from_file(path: &Path) -> Result<ParameterTable, Box<dyn Error>> {
        let file = File::open(path)
            .map_err(|e| format!("cannot open parameter table '{}': {}", path.display(), e))?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(BufReader::new(file));

        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
        if !headers.iter().any(|h| h == FLIGHT_ID_HEADER) {
            return Err(format!(
                "parameter table '{}' has no '{}' column",
                path.display(),
                FLIGHT_ID_HEADER
            )
            .into());
        }

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(|cell| cell.to_string()).collect());
        }

        Ok(ParameterTable { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Ids of the flights whose parameter row satisfies every condition.
    ///
    /// All condition columns are validated before any filtering happens;
    /// a condition naming an absent column aborts the selection. Conditions
    /// are applied in order and filtering short-circuits once no rows remain.
    /// Ids are returned de-duplicated, in table order.
    pub fn flight_ids(&self, conditions: &[FlightCondition]) -> Result<Vec<u32>, Box<dyn Error>> {
        for condition in conditions {
            if self.column_index(&condition.column).is_none() {
                return Err(format!(
                    "flight-selection column '{}' does not exist in the parameter table (columns: {})",
                    condition.column,
                    self.headers.join(", ")
                )
                .into());
            }
        }

        let mut selected: Vec<&Vec<String>> = self.rows.iter().collect();
        for condition in conditions {
            let col = self.column_index(&condition.column).unwrap_or(0);
            selected.retain(|row| row.get(col).map(|cell| condition.matches(cell)).unwrap_or(false));
            if selected.is_empty() {
                break;
            }
        }

        let id_col = self.column_index(FLIGHT_ID_HEADER).unwrap_or(0);
        let mut ids: Vec<u32> = Vec::new();
        for row in selected {
            let cell = row.get(id_col).map(String::as_str).unwrap_or("");
            let id: u32 = cell.trim().parse().map_err(|_| {
                format!("parameter table contains a non-numeric flight id '{}'", cell)
            })?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}


// src/data_input/parameters.rs
