// src/data_analysis/mod.rs

pub mod battery;
pub mod evaluation;
pub mod least_squares;
pub mod metrics;
pub mod model_variants;
pub mod power_model;

// src/data_analysis/mod.rs
