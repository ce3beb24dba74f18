// src/data_input/paths.rs

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

/// Fixed layout of a flight-data directory and of the results tree written
/// next to it:
///
///   <data_dir>/parameters.csv
///   <data_dir>/flights/<id>.csv
///   <results_dir>/energy/flight_<id>_power_energy.png
///   <results_dir>/energy/flight_<id>_battery.png
///   <results_dir>/routes/flight_<id>_route.png
///   <results_dir>/forecast_<id>.csv
#[derive(Debug, Clone)]
pub struct DataPaths {
    data_dir: PathBuf,
    results_dir: PathBuf,
}

impl DataPaths {
    pub fn new(data_dir: &Path, results_dir: &Path) -> DataPaths {
        DataPaths {
            data_dir: data_dir.to_path_buf(),
            results_dir: results_dir.to_path_buf(),
        }
    }

    pub fn parameters_file(&self) -> PathBuf {
        self.data_dir.join("parameters.csv")
    }

    pub fn flight_file(&self, flight_id: u32) -> PathBuf {
        self.data_dir.join("flights").join(format!("{flight_id}.csv"))
    }

    pub fn energy_results_dir(&self) -> PathBuf {
        self.results_dir.join("energy")
    }

    pub fn routes_results_dir(&self) -> PathBuf {
        self.results_dir.join("routes")
    }

    pub fn power_energy_plot_file(&self, flight_id: u32) -> PathBuf {
        self.energy_results_dir()
            .join(format!("flight_{flight_id}_power_energy.png"))
    }

    pub fn battery_plot_file(&self, flight_id: u32) -> PathBuf {
        self.energy_results_dir()
            .join(format!("flight_{flight_id}_battery.png"))
    }

    pub fn route_plot_file(&self, flight_id: u32) -> PathBuf {
        self.routes_results_dir()
            .join(format!("flight_{flight_id}_route.png"))
    }

    pub fn forecast_file(&self, flight_id: u32) -> PathBuf {
        self.results_dir.join(format!("forecast_{flight_id}.csv"))
    }

    /// Creates the results tree if it is not already there.
    pub fn ensure_results_dirs(&self) -> Result<(), Box<dyn Error>> {
        fs::create_dir_all(self.energy_results_dir())?;
        fs::create_dir_all(self.routes_results_dir())?;
        Ok(())
    }
}


// src/data_input/paths.rs
