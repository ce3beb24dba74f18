// src/data_input/flight_data.rs

/// One row of a processed flight log.
/// The four base signals are guaranteed by the parser (rows missing any of
/// them are skipped); variant-specific raw signals stay `Option<f64>` because
/// not every log carries them.
#[derive(Debug, Default, Clone)]
pub struct FlightSample {
    pub time_s: f64,                // Timestamp (seconds, strictly increasing per flight).
    pub voltage: f64,               // Battery voltage (V).
    pub current: f64,               // Battery current draw (A).
    pub is_moving: bool,            // Propulsion phase flag.
    pub total_mass: Option<f64>,    // Airframe + payload mass (g).
    pub vx_anemometer: Option<f64>, // Horizontal airspeed component (m/s).
    pub vy_anemometer: Option<f64>, // Horizontal airspeed component (m/s).
    pub vz_imu: Option<f64>,        // Vertical velocity from the IMU (m/s).
    pub x_gps: Option<f64>,         // Cartesian ground-track position (m).
    pub y_gps: Option<f64>,         // Cartesian ground-track position (m).
    pub z_gps: Option<f64>,         // Altitude above the takeoff point (m).
}

impl FlightSample {
    /// Instantaneous electrical power draw (W).
    pub fn power(&self) -> f64 {
        self.voltage * self.current
    }
}

/// Which optional columns the parsed log actually carried.
#[derive(Debug, Default, Clone, Copy)]
pub struct ColumnPresence {
    pub total_mass: bool,
    pub vx_anemometer: bool,
    pub vy_anemometer: bool,
    pub vz_imu: bool,
    pub x_gps: bool,
    pub y_gps: bool,
    pub z_gps: bool,
}

impl ColumnPresence {
    /// All raw signals the force/velocity feature derivation reads.
    pub fn has_force_model_inputs(&self) -> bool {
        self.total_mass && self.vx_anemometer && self.vy_anemometer && self.vz_imu
    }

    /// All three position columns needed for the route-overview plot.
    pub fn has_gps(&self) -> bool {
        self.x_gps && self.y_gps && self.z_gps
    }
}

/// A fully parsed flight: id, samples in log order, and the column inventory.
#[derive(Debug, Default, Clone)]
pub struct FlightData {
    pub flight_id: u32,
    pub samples: Vec<FlightSample>,
    pub columns: ColumnPresence,
}

impl FlightData {
    /// Copy of this flight with the first `n` samples removed. Used by the
    /// evaluator, which discards the leading row when per-row time differences
    /// are formed.
    pub fn without_leading(&self, n: usize) -> FlightData {
        FlightData {
            flight_id: self.flight_id,
            samples: self.samples.iter().skip(n).cloned().collect(),
            columns: self.columns,
        }
    }
}


// src/data_input/flight_data.rs
