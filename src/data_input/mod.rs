// src/data_input/mod.rs

pub mod flight_data;
pub mod flight_parser;
pub mod parameters;
pub mod paths;

// src/data_input/mod.rs
