// src/data_analysis/power_model.rs

use ndarray::{Array1, Array2};
use std::error::Error;

use crate::data_analysis::least_squares::solve_least_squares;
use crate::data_input::flight_data::FlightData;
use crate::types::TimedSeries;

/// One model-ready observation: electrical inputs, the phase flag, and the
/// derived feature vector in the order of `ModelSpec::predictors()`.
#[derive(Debug, Default, Clone)]
pub struct FeatureRow {
    pub time_s: f64,
    pub voltage: f64,
    pub current: f64,
    pub is_moving: bool,
    pub features: Vec<f64>,
}

impl FeatureRow {
    /// Instantaneous electrical power draw (W).
    pub fn power(&self) -> f64 {
        self.voltage * self.current
    }
}

/// Capability set a concrete model variant supplies: its predictor list, its
/// feature derivation, and the transform pair that linearizes the regression
/// target. The training/forecasting procedure itself lives in `PowerModel`
/// and is the same for every variant.
pub trait ModelSpec {
    /// Variant name used in reports and for selection on the command line.
    fn name(&self) -> &'static str;

    /// Predictor names, in design-matrix column order.
    fn predictors(&self) -> &'static [&'static str];

    /// Derives model-ready rows from one flight. Implementations may drop or
    /// synthesize rows, but every returned row's `features` must align with
    /// `predictors()`.
    fn derive_features(&self, flight: &FlightData) -> Result<Vec<FeatureRow>, Box<dyn Error>>;

    /// Forward transform turning raw power into the regression target.
    fn transform_power(&self, power: f64) -> f64;

    /// Inverse of `transform_power`, reconstructing power from the indicator.
    fn retransform_power(&self, indicator: f64) -> f64;
}

/// Regression state that exists only after a successful `train`.
#[derive(Debug, Clone)]
struct FittedState {
    coefficients: Array1<f64>,
    stationary_baseline: f64,
}

/// Two-phase power-consumption model: ordinary least squares over the
/// moving-phase rows, a constant mean baseline for the stationary phase.
pub struct PowerModel {
    spec: Box<dyn ModelSpec>,
    fitted: Option<FittedState>,
}

impl PowerModel {
    pub fn new(spec: Box<dyn ModelSpec>) -> PowerModel {
        PowerModel { spec, fitted: None }
    }

    pub fn name(&self) -> &'static str {
        self.spec.name()
    }

    pub fn predictors(&self) -> &'static [&'static str] {
        self.spec.predictors()
    }

    pub fn is_trained(&self) -> bool {
        self.fitted.is_some()
    }

    fn fitted(&self) -> Result<&FittedState, Box<dyn Error>> {
        self.fitted
            .as_ref()
            .ok_or_else(|| "model is not trained; call train before forecasting or reporting".into())
    }

    /// Fitted coefficient vector: `[intercept, one per predictor]`.
    pub fn coefficients(&self) -> Result<&Array1<f64>, Box<dyn Error>> {
        Ok(&self.fitted()?.coefficients)
    }

    /// Mean power indicator of the stationary training rows. NaN when the
    /// training set had no stationary rows.
    pub fn stationary_baseline(&self) -> Result<f64, Box<dyn Error>> {
        Ok(self.fitted()?.stationary_baseline)
    }

    /// Fits the model on the given flights.
    ///
    /// Feature derivation runs per flight; the derived rows are concatenated
    /// in input order and split by the `is_moving` flag. The moving subset is
    /// fit by least squares against the transformed power, the stationary
    /// subset is averaged into the baseline. Re-training overwrites the
    /// previous fit; the fitted state is only replaced once the whole
    /// computation has succeeded.
    pub fn train(&mut self, flights: &[FlightData]) -> Result<(), Box<dyn Error>> {
        let mut combined: Vec<FeatureRow> = Vec::new();
        for flight in flights {
            let mut rows = self.spec.derive_features(flight)?;
            combined.append(&mut rows);
        }
        if combined.is_empty() {
            return Err(
                "training set is empty after feature derivation; check the flight-selection conditions"
                    .into(),
            );
        }

        let indicator: Vec<f64> = combined
            .iter()
            .map(|row| self.spec.transform_power(row.power()))
            .collect();

        let moving_idx: Vec<usize> = combined
            .iter()
            .enumerate()
            .filter(|(_, row)| row.is_moving)
            .map(|(i, _)| i)
            .collect();
        let stationary: Vec<f64> = combined
            .iter()
            .zip(&indicator)
            .filter(|(row, _)| !row.is_moving)
            .map(|(_, &value)| value)
            .collect();

        if moving_idx.is_empty() {
            return Err(
                "training set has no moving-phase rows; the is_moving flag never fired for the selected flights"
                    .into(),
            );
        }

        let predictor_count = self.spec.predictors().len();
        let mut design = Array2::<f64>::zeros((moving_idx.len(), predictor_count + 1));
        let mut target = Array1::<f64>::zeros(moving_idx.len());
        for (obs, &row_idx) in moving_idx.iter().enumerate() {
            let row = &combined[row_idx];
            if row.features.len() != predictor_count {
                return Err(format!(
                    "derived row carries {} feature values but the '{}' variant declares {} predictors",
                    row.features.len(),
                    self.spec.name(),
                    predictor_count
                )
                .into());
            }
            design[[obs, 0]] = 1.0;
            for (j, &value) in row.features.iter().enumerate() {
                design[[obs, j + 1]] = value;
            }
            target[obs] = indicator[row_idx];
        }

        let coefficients = solve_least_squares(&design, &target)?;
        let stationary_baseline = if stationary.is_empty() {
            f64::NAN
        } else {
            stationary.iter().sum::<f64>() / stationary.len() as f64
        };

        self.fitted = Some(FittedState {
            coefficients,
            stationary_baseline,
        });
        Ok(())
    }

    /// Predicted power per derived row of the flight.
    ///
    /// Stationary rows receive the retransformed baseline; moving rows the
    /// retransformed regression value. The series is aligned to the row index
    /// after this variant's feature derivation.
    pub fn forecast(&self, flight: &FlightData) -> Result<Array1<f64>, Box<dyn Error>> {
        Ok(self.forecast_with_times(flight)?.1)
    }

    /// Like `forecast`, additionally returning the derived-row timestamps the
    /// series is aligned to. Used when exporting forecasts.
    pub fn forecast_with_times(&self, flight: &FlightData) -> Result<TimedSeries, Box<dyn Error>> {
        let fitted = self.fitted()?;
        let rows = self.spec.derive_features(flight)?;

        let times = Array1::from_iter(rows.iter().map(|row| row.time_s));
        let mut series = Array1::from_elem(rows.len(), fitted.stationary_baseline);
        for (i, row) in rows.iter().enumerate() {
            if row.is_moving {
                let mut value = fitted.coefficients[0];
                for (coef, &feature) in fitted.coefficients.iter().skip(1).zip(&row.features) {
                    value += coef * feature;
                }
                series[i] = value;
            }
        }
        Ok((times, series.mapv(|v| self.spec.retransform_power(v))))
    }

    /// Human-readable training summary: the intercept, one line per
    /// predictor coefficient, and the stationary baseline.
    pub fn report(&self) -> Result<String, Box<dyn Error>> {
        let fitted = self.fitted()?;
        let mut lines = Vec::with_capacity(self.spec.predictors().len() + 2);
        lines.push(format!("beta: {}, predictor: intercept", fitted.coefficients[0]));
        for (i, name) in self.spec.predictors().iter().enumerate() {
            lines.push(format!(
                "beta: {}, predictor: {}",
                fitted.coefficients[i + 1],
                name
            ));
        }
        lines.push(format!(
            "default stationary usage: {}",
            fitted.stationary_baseline
        ));
        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_input::flight_data::FlightSample;
    use approx::assert_relative_eq;

    /// Minimal variant for exercising the orchestrator: identity transforms
    /// and a single predictor read straight from `total_mass`.
    struct MassOnlySpec;

    impl ModelSpec for MassOnlySpec {
        fn name(&self) -> &'static str {
            "mass-only"
        }

        fn predictors(&self) -> &'static [&'static str] {
            &["total_mass"]
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
                    features: vec![s.total_mass.unwrap_or(0.0)],
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

    fn sample(time_s: f64, power: f64, is_moving: bool, mass: f64) -> FlightSample {
        FlightSample {
            time_s,
            voltage: 1.0,
            current: power,
            is_moving,
            total_mass: Some(mass),
            ..Default::default()
        }
    }

    fn flight(samples: Vec<FlightSample>) -> FlightData {
        FlightData {
            flight_id: 1,
            samples,
            ..Default::default()
        }
    }

    #[test]
    fn test_untrained_model_refuses_all_fitted_accessors() {
        let model = PowerModel::new(Box::new(MassOnlySpec));
        assert!(!model.is_trained());
        assert!(model.coefficients().is_err());
        assert!(model.stationary_baseline().is_err());
        assert!(model.report().is_err());
        assert!(model.forecast(&flight(vec![])).is_err());
    }

    #[test]
    fn test_train_recovers_noise_free_coefficients() {
        // power = 4 + 0.5 * mass on the moving rows
        let flights = vec![flight(vec![
            sample(0.0, 4.0 + 0.5 * 100.0, true, 100.0),
            sample(1.0, 4.0 + 0.5 * 200.0, true, 200.0),
            sample(2.0, 4.0 + 0.5 * 400.0, true, 400.0),
            sample(3.0, 7.0, false, 100.0),
        ])];
        let mut model = PowerModel::new(Box::new(MassOnlySpec));
        model.train(&flights).unwrap();

        let beta = model.coefficients().unwrap();
        assert_eq!(beta.len(), 2);
        assert_relative_eq!(beta[0], 4.0, epsilon = 1e-6);
        assert_relative_eq!(beta[1], 0.5, epsilon = 1e-6);
        assert_relative_eq!(model.stationary_baseline().unwrap(), 7.0, epsilon = 1e-12);
    }

    #[test]
    fn test_stationary_baseline_is_arithmetic_mean() {
        let flights = vec![flight(vec![
            sample(0.0, 10.0, true, 1.0),
            sample(1.0, 3.0, false, 1.0),
            sample(2.0, 4.0, false, 1.0),
            sample(3.0, 8.0, false, 1.0),
        ])];
        let mut model = PowerModel::new(Box::new(MassOnlySpec));
        model.train(&flights).unwrap();
        assert_relative_eq!(
            model.stationary_baseline().unwrap(),
            (3.0 + 4.0 + 8.0) / 3.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_appending_stationary_rows_leaves_coefficients_unchanged() {
        let moving_rows = vec![
            sample(0.0, 4.0 + 0.5 * 100.0, true, 100.0),
            sample(1.0, 4.0 + 0.5 * 200.0, true, 200.0),
            sample(2.0, 4.0 + 0.5 * 400.0, true, 400.0),
        ];

        let mut base = PowerModel::new(Box::new(MassOnlySpec));
        base.train(&[flight(moving_rows.clone())]).unwrap();
        let base_beta = base.coefficients().unwrap().clone();
        assert!(base.stationary_baseline().unwrap().is_nan());

        let mut extended_rows = moving_rows;
        extended_rows.push(sample(3.0, 5.0, false, 100.0));
        extended_rows.push(sample(4.0, 9.0, false, 100.0));
        let mut extended = PowerModel::new(Box::new(MassOnlySpec));
        extended.train(&[flight(extended_rows)]).unwrap();

        let extended_beta = extended.coefficients().unwrap();
        for (a, b) in base_beta.iter().zip(extended_beta.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-9);
        }
        assert_relative_eq!(
            extended.stationary_baseline().unwrap(),
            7.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_empty_training_set_fails() {
        let mut model = PowerModel::new(Box::new(MassOnlySpec));
        let err = model.train(&[]).unwrap_err().to_string();
        assert!(err.contains("training set is empty"));
        assert!(!model.is_trained());
    }

    #[test]
    fn test_all_stationary_training_set_fails() {
        let flights = vec![flight(vec![
            sample(0.0, 3.0, false, 1.0),
            sample(1.0, 4.0, false, 1.0),
        ])];
        let mut model = PowerModel::new(Box::new(MassOnlySpec));
        let err = model.train(&flights).unwrap_err().to_string();
        assert!(err.contains("no moving-phase rows"));
        assert!(!model.is_trained());
    }

    #[test]
    fn test_forecast_uses_baseline_for_stationary_and_fit_for_moving() {
        let flights = vec![flight(vec![
            sample(0.0, 4.0 + 0.5 * 100.0, true, 100.0),
            sample(1.0, 4.0 + 0.5 * 200.0, true, 200.0),
            sample(2.0, 4.0 + 0.5 * 400.0, true, 400.0),
            sample(3.0, 6.0, false, 100.0),
        ])];
        let mut model = PowerModel::new(Box::new(MassOnlySpec));
        model.train(&flights).unwrap();

        let probe = flight(vec![
            sample(0.0, 0.0, false, 300.0),
            sample(1.0, 0.0, true, 300.0),
        ]);
        let series = model.forecast(&probe).unwrap();
        assert_eq!(series.len(), 2);
        assert_relative_eq!(series[0], 6.0, epsilon = 1e-9); // baseline
        assert_relative_eq!(series[1], 4.0 + 0.5 * 300.0, epsilon = 1e-6);
    }

    #[test]
    fn test_forecast_is_deterministic_and_side_effect_free() {
        let flights = vec![flight(vec![
            sample(0.0, 54.0, true, 100.0),
            sample(1.0, 104.0, true, 200.0),
            sample(2.0, 5.0, false, 100.0),
        ])];
        let mut model = PowerModel::new(Box::new(MassOnlySpec));
        model.train(&flights).unwrap();

        let probe = flight(vec![sample(0.0, 0.0, true, 150.0), sample(1.0, 0.0, false, 150.0)]);
        let first = model.forecast(&probe).unwrap();
        let second = model.forecast(&probe).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_retrain_overwrites_previous_fit() {
        let mut model = PowerModel::new(Box::new(MassOnlySpec));
        model
            .train(&[flight(vec![
                sample(0.0, 54.0, true, 100.0),
                sample(1.0, 104.0, true, 200.0),
            ])])
            .unwrap();
        let first_beta = model.coefficients().unwrap().clone();

        model
            .train(&[flight(vec![
                sample(0.0, 10.0, true, 100.0),
                sample(1.0, 10.0, true, 200.0),
            ])])
            .unwrap();
        let second_beta = model.coefficients().unwrap();
        assert!(first_beta
            .iter()
            .zip(second_beta.iter())
            .any(|(a, b)| (a - b).abs() > 1e-9));
    }

    #[test]
    fn test_report_lists_intercept_and_predictors() {
        let mut model = PowerModel::new(Box::new(MassOnlySpec));
        model
            .train(&[flight(vec![
                sample(0.0, 54.0, true, 100.0),
                sample(1.0, 104.0, true, 200.0),
                sample(2.0, 5.0, false, 100.0),
            ])])
            .unwrap();
        let report = model.report().unwrap();
        assert!(report.contains("predictor: intercept"));
        assert!(report.contains("predictor: total_mass"));
        assert!(report.contains("default stationary usage"));
    }
}

// src/data_analysis/power_model.rs
