// src/types.rs
// Type aliases to reduce complexity warnings

use ndarray::Array1;
use std::error::Error;

// Flight parser return type
pub type FlightParseResult = Result<crate::data_input::flight_data::FlightData, Box<dyn Error>>;

// Collected (x, y) point series for plotting
pub type SeriesData = Vec<(f64, f64)>;

// Forecast output: derived-row timestamps and the power series aligned to them
pub type TimedSeries = (Array1<f64>, Array1<f64>);
