// src/data_analysis/model_variants.rs

use std::error::Error;

use crate::constants::DEFAULT_SAMPLE_INTERVAL_S;
use crate::data_analysis::power_model::{FeatureRow, ModelSpec};
use crate::data_input::flight_data::{FlightData, FlightSample};

/// Predictor columns of the force/velocity variant, in design-matrix order.
pub const FORCE_VELOCITY_PREDICTORS: [&str; 5] = [
    "total_mass",
    "force_z",
    "force_xy",
    "velocity_xy_factor",
    "velocity_z_factor",
];

/// Reference model variant. Power is regressed against mass, the vertical and
/// horizontal force terms and two velocity-dependent factors; the regression
/// target is compressed with the fractional power 2/3 to linearize the
/// power-versus-thrust relation.
pub struct ForceVelocityModel {
    sample_interval_s: f64,
}

impl ForceVelocityModel {
    pub fn new() -> ForceVelocityModel {
        ForceVelocityModel {
            sample_interval_s: DEFAULT_SAMPLE_INTERVAL_S,
        }
    }

    /// Overrides the sampling interval used for finite differencing. The
    /// interval is a recorder property, not read from the log.
    pub fn with_sample_interval(sample_interval_s: f64) -> ForceVelocityModel {
        ForceVelocityModel { sample_interval_s }
    }
}

impl Default for ForceVelocityModel {
    fn default() -> Self {
        ForceVelocityModel::new()
    }
}

/// Finite differencing leaves the first record of each flight without
/// features, so that record is dropped and a synthetic at-rest row (all
/// signals zero, stationary) takes its place at the head of the derived set.
/// The rest row keeps the derived set the same length as the input and feeds
/// one zero sample into the stationary-phase mean.
fn reinsert_rest_row(rows: &mut Vec<FeatureRow>, predictor_count: usize) {
    rows.insert(
        0,
        FeatureRow {
            features: vec![0.0; predictor_count],
            ..FeatureRow::default()
        },
    );
}

fn required_value(
    sample: &FlightSample,
    value: Option<f64>,
    column: &str,
    flight_id: u32,
) -> Result<f64, Box<dyn Error>> {
    value.ok_or_else(|| {
        format!(
            "flight {}: no value in column '{}' at t={}s, cannot derive force/velocity features",
            flight_id, column, sample.time_s
        )
        .into()
    })
}

impl ModelSpec for ForceVelocityModel {
    fn name(&self) -> &'static str {
        "force-velocity"
    }

    fn predictors(&self) -> &'static [&'static str] {
        &FORCE_VELOCITY_PREDICTORS
    }

    fn derive_features(&self, flight: &FlightData) -> Result<Vec<FeatureRow>, Box<dyn Error>> {
        if !flight.columns.has_force_model_inputs() {
            let mut missing: Vec<&str> = Vec::new();
            if !flight.columns.total_mass {
                missing.push("total_mass");
            }
            if !flight.columns.vx_anemometer {
                missing.push("vx_anemometer");
            }
            if !flight.columns.vy_anemometer {
                missing.push("vy_anemometer");
            }
            if !flight.columns.vz_imu {
                missing.push("vz_imu");
            }
            return Err(format!(
                "flight {}: log lacks column(s) {} required by the force-velocity model",
                flight.flight_id,
                missing.join(", ")
            )
            .into());
        }

        let dt = self.sample_interval_s;
        let mut rows: Vec<FeatureRow> = Vec::with_capacity(flight.samples.len());
        for window in flight.samples.windows(2) {
            let (prev, curr) = (&window[0], &window[1]);

            let mass = required_value(curr, curr.total_mass, "total_mass", flight.flight_id)?;
            let vx = required_value(curr, curr.vx_anemometer, "vx_anemometer", flight.flight_id)?;
            let vy = required_value(curr, curr.vy_anemometer, "vy_anemometer", flight.flight_id)?;
            let vz = required_value(curr, curr.vz_imu, "vz_imu", flight.flight_id)?;
            let prev_vx =
                required_value(prev, prev.vx_anemometer, "vx_anemometer", flight.flight_id)?;
            let prev_vy =
                required_value(prev, prev.vy_anemometer, "vy_anemometer", flight.flight_id)?;
            let prev_vz = required_value(prev, prev.vz_imu, "vz_imu", flight.flight_id)?;

            let xy_air_speed = (vx * vx + vy * vy).sqrt();
            let dvx = (vx - prev_vx) / dt;
            let dvy = (vy - prev_vy) / dt;
            let xy_air_acceleration = (dvx * dvx + dvy * dvy).sqrt();
            let z_acceleration = (vz - prev_vz) / dt;

            let force_z = z_acceleration * mass;
            let force_xy = xy_air_acceleration * mass;

            let mass_factor = mass.powf(2.0 / 3.0);
            let velocity_xy_factor = xy_air_speed * xy_air_speed * mass_factor;
            let velocity_z_factor = vz * vz * mass_factor;

            rows.push(FeatureRow {
                time_s: curr.time_s,
                voltage: curr.voltage,
                current: curr.current,
                is_moving: curr.is_moving,
                features: vec![mass, force_z, force_xy, velocity_xy_factor, velocity_z_factor],
            });
        }

        reinsert_rest_row(&mut rows, FORCE_VELOCITY_PREDICTORS.len());
        Ok(rows)
    }

    fn transform_power(&self, power: f64) -> f64 {
        power.powf(2.0 / 3.0)
    }

    fn retransform_power(&self, indicator: f64) -> f64 {
        indicator.powf(3.0 / 2.0)
    }
}

/// Baseline variant. No predictors and no transform: moving rows are forecast
/// as the intercept alone (the mean moving-phase power) and stationary rows as
/// the stationary mean.
pub struct MeanUsageModel;

impl ModelSpec for MeanUsageModel {
    fn name(&self) -> &'static str {
        "mean-usage"
    }

    fn predictors(&self) -> &'static [&'static str] {
        &[]
    }

    fn derive_features(&self, flight: &FlightData) -> Result<Vec<FeatureRow>, Box<dyn Error>> {
        Ok(flight
            .samples
            .iter()
            .map(|s| FeatureRow {
                time_s: s.time_s,
                voltage: s.voltage,
                current: s.current,
                is_moving: s.is_moving,
                features: Vec::new(),
            })
            .collect())
    }

    fn transform_power(&self, power: f64) -> f64 {
        power
    }

    fn retransform_power(&self, indicator: f64) -> f64 {
        indicator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_input::flight_data::ColumnPresence;
    use approx::assert_relative_eq;

    fn force_model_presence() -> ColumnPresence {
        ColumnPresence {
            total_mass: true,
            vx_anemometer: true,
            vy_anemometer: true,
            vz_imu: true,
            ..Default::default()
        }
    }

    fn kinematic_sample(time_s: f64, mass: f64, vx: f64, vy: f64, vz: f64) -> FlightSample {
        FlightSample {
            time_s,
            voltage: 22.2,
            current: 5.0,
            is_moving: true,
            total_mass: Some(mass),
            vx_anemometer: Some(vx),
            vy_anemometer: Some(vy),
            vz_imu: Some(vz),
            ..Default::default()
        }
    }

    #[test]
    fn test_power_transform_round_trip() {
        let model = ForceVelocityModel::new();
        assert_relative_eq!(model.transform_power(0.0), 0.0);
        assert_relative_eq!(model.transform_power(1.0), 1.0);
        assert_relative_eq!(model.transform_power(8.0), 4.0, epsilon = 1e-12);
        assert_relative_eq!(model.retransform_power(4.0), 8.0, epsilon = 1e-12);
        for p in [0.0, 0.5, 1.0, 8.0, 123.456, 2500.0] {
            assert_relative_eq!(
                model.retransform_power(model.transform_power(p)),
                p,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_derivation_matches_hand_computed_features() {
        let flight = FlightData {
            flight_id: 3,
            samples: vec![
                kinematic_sample(0.0, 8.0, 3.0, 4.0, 2.0),
                kinematic_sample(1.0, 8.0, 6.0, 8.0, 5.0),
            ],
            columns: force_model_presence(),
        };

        let model = ForceVelocityModel::with_sample_interval(1.0);
        let rows = model.derive_features(&flight).unwrap();
        assert_eq!(rows.len(), 2);

        // Head row is the synthetic rest row.
        assert!(!rows[0].is_moving);
        assert_eq!(rows[0].time_s, 0.0);
        assert_eq!(rows[0].power(), 0.0);
        assert!(rows[0].features.iter().all(|&f| f == 0.0));

        // Second row: dvx=3, dvy=4, dvz=3 over dt=1; mass 8 so mass^(2/3)=4;
        // xy speed = 10, xy acceleration = 5.
        let row = &rows[1];
        assert!(row.is_moving);
        assert_eq!(row.time_s, 1.0);
        assert_relative_eq!(row.features[0], 8.0); // total_mass
        assert_relative_eq!(row.features[1], 3.0 * 8.0, epsilon = 1e-9); // force_z
        assert_relative_eq!(row.features[2], 5.0 * 8.0, epsilon = 1e-9); // force_xy
        assert_relative_eq!(row.features[3], 100.0 * 4.0, epsilon = 1e-9); // velocity_xy_factor
        assert_relative_eq!(row.features[4], 25.0 * 4.0, epsilon = 1e-9); // velocity_z_factor
    }

    #[test]
    fn test_derivation_divides_by_the_configured_interval() {
        let flight = FlightData {
            flight_id: 3,
            samples: vec![
                kinematic_sample(0.0, 8.0, 3.0, 4.0, 2.0),
                kinematic_sample(0.5, 8.0, 6.0, 8.0, 5.0),
            ],
            columns: force_model_presence(),
        };

        let rows = ForceVelocityModel::with_sample_interval(0.5)
            .derive_features(&flight)
            .unwrap();
        let row = &rows[1];
        // Halving the interval doubles the accelerations; the velocity
        // factors depend only on instantaneous values.
        assert_relative_eq!(row.features[1], 6.0 * 8.0, epsilon = 1e-9);
        assert_relative_eq!(row.features[2], 10.0 * 8.0, epsilon = 1e-9);
        assert_relative_eq!(row.features[3], 100.0 * 4.0, epsilon = 1e-9);
        assert_relative_eq!(row.features[4], 25.0 * 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_missing_log_column_is_reported() {
        let mut columns = force_model_presence();
        columns.vz_imu = false;
        let flight = FlightData {
            flight_id: 12,
            samples: vec![kinematic_sample(0.0, 8.0, 3.0, 4.0, 2.0)],
            columns,
        };
        let err = ForceVelocityModel::new()
            .derive_features(&flight)
            .unwrap_err()
            .to_string();
        assert!(err.contains("flight 12"));
        assert!(err.contains("vz_imu"));
    }

    #[test]
    fn test_missing_cell_value_is_reported() {
        let mut bad = kinematic_sample(1.0, 8.0, 6.0, 8.0, 5.0);
        bad.total_mass = None;
        let flight = FlightData {
            flight_id: 9,
            samples: vec![kinematic_sample(0.0, 8.0, 3.0, 4.0, 2.0), bad],
            columns: force_model_presence(),
        };
        let err = ForceVelocityModel::new()
            .derive_features(&flight)
            .unwrap_err()
            .to_string();
        assert!(err.contains("flight 9"));
        assert!(err.contains("total_mass"));
    }

    #[test]
    fn test_empty_flight_derives_the_rest_row_only() {
        let flight = FlightData {
            flight_id: 1,
            samples: vec![],
            columns: force_model_presence(),
        };
        let rows = ForceVelocityModel::new().derive_features(&flight).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].is_moving);
        assert!(rows[0].features.iter().all(|&f| f == 0.0));
    }

    #[test]
    fn test_mean_usage_derivation_is_the_identity() {
        let flight = FlightData {
            flight_id: 2,
            samples: vec![
                kinematic_sample(0.0, 8.0, 3.0, 4.0, 2.0),
                kinematic_sample(0.17, 8.0, 6.0, 8.0, 5.0),
                kinematic_sample(0.34, 8.0, 6.0, 8.0, 5.0),
            ],
            columns: ColumnPresence::default(),
        };
        let model = MeanUsageModel;
        let rows = model.derive_features(&flight).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.features.is_empty()));
        assert_eq!(rows[0].time_s, 0.0);
        assert_relative_eq!(model.transform_power(111.0), 111.0);
        assert_relative_eq!(model.retransform_power(111.0), 111.0);
    }
}

// src/data_analysis/model_variants.rs
