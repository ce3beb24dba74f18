// src/data_analysis/evaluation.rs

use ndarray::Array1;
use std::error::Error;

use crate::data_analysis::battery::{joules_to_soc, BatteryParams};
use crate::data_analysis::metrics;
use crate::data_analysis::power_model::PowerModel;
use crate::data_input::flight_parser::parse_flight_file;
use crate::data_input::paths::DataPaths;
use crate::plot_functions::plot_battery_soc::plot_battery_soc;
use crate::plot_functions::plot_power_energy::plot_power_energy;

/// Runs a trained model against recorded flights and scores the forecasts.
///
/// For each flight the evaluator rebuilds the true power and energy series
/// from the log, obtains the model's forecast, prints accuracy metrics and
/// renders the power/energy and battery figures. Per-flight series state is
/// discarded between flights; only the trailing-APE list accumulates.
pub struct Evaluator<'a> {
    model: &'a PowerModel,
    paths: &'a DataPaths,
    results: Vec<f64>,

    // Per-flight state, valid during one test only.
    time: Array1<f64>,
    battery_soc: Array1<f64>,
    power: Array1<f64>,
    energy: Array1<f64>,
    energy_cum: Array1<f64>,
    power_pred: Array1<f64>,
    energy_pred: Array1<f64>,
    energy_pred_cum: Array1<f64>,
}

impl<'a> Evaluator<'a> {
    pub fn new(model: &'a PowerModel, paths: &'a DataPaths) -> Evaluator<'a> {
        Evaluator {
            model,
            paths,
            results: Vec::new(),
            time: Array1::zeros(0),
            battery_soc: Array1::zeros(0),
            power: Array1::zeros(0),
            energy: Array1::zeros(0),
            energy_cum: Array1::zeros(0),
            power_pred: Array1::zeros(0),
            energy_pred: Array1::zeros(0),
            energy_pred_cum: Array1::zeros(0),
        }
    }

    /// Trailing absolute percentage errors collected so far, one per flight.
    pub fn results(&self) -> &[f64] {
        &self.results
    }

    /// Evaluates every listed flight in order and prints the collected
    /// trailing-APE list at the end.
    pub fn execute(&mut self, flight_ids: &[u32]) -> Result<(), Box<dyn Error>> {
        self.paths.ensure_results_dirs()?;
        for &flight_id in flight_ids {
            self.execute_test(flight_id)?;
        }
        println!("\nAPE across the tests: {:?}", self.results);
        Ok(())
    }

    fn execute_test(&mut self, flight_id: u32) -> Result<(), Box<dyn Error>> {
        let flight = parse_flight_file(&self.paths.flight_file(flight_id), flight_id)?;
        if flight.samples.len() < 2 {
            return Err(format!(
                "flight {}: needs at least two rows to form per-row time differences",
                flight_id
            )
            .into());
        }

        println!("\n--- Test for flight {flight_id} ---");

        // Per-row time differences. The leading row has no difference and is
        // dropped from the evaluation, as during feature derivation.
        let delta_time = Array1::from_iter(
            flight
                .samples
                .windows(2)
                .map(|pair| pair[1].time_s - pair[0].time_s),
        );
        let trimmed = flight.without_leading(1);

        self.time = Array1::from_iter(trimmed.samples.iter().map(|s| s.time_s));
        self.power = Array1::from_iter(trimmed.samples.iter().map(|s| s.power()));
        self.energy = &self.power * &delta_time;
        self.energy_cum = metrics::cumulative_sum(&self.energy);

        self.power_pred = self.model.forecast(&trimmed)?;
        if self.power_pred.len() != delta_time.len() {
            return Err(format!(
                "flight {}: forecast returned {} rows for {} observations",
                flight_id,
                self.power_pred.len(),
                delta_time.len()
            )
            .into());
        }
        self.energy_pred = &self.power_pred * &delta_time;
        self.energy_pred_cum = metrics::cumulative_sum(&self.energy_pred);

        self.evaluate_metrics();
        self.render_plots(flight_id)?;

        self.reset();
        Ok(())
    }

    fn evaluate_metrics(&mut self) {
        let mae = metrics::mean_absolute_error(&self.energy, &self.energy_pred);
        let mape = metrics::mean_absolute_percentage_error(&self.energy, &self.energy_pred);
        let mae_cum = metrics::mean_absolute_error(&self.energy_cum, &self.energy_pred_cum);
        let mape_cum =
            metrics::mean_absolute_percentage_error(&self.energy_cum, &self.energy_pred_cum);
        let r2 = metrics::r_squared(&self.energy, &self.energy_pred);
        let r2_cum = metrics::r_squared(&self.energy_cum, &self.energy_pred_cum);
        let ae = metrics::trailing_absolute_error(&self.energy_cum, &self.energy_pred_cum);
        let ape =
            metrics::trailing_absolute_percentage_error(&self.energy_cum, &self.energy_pred_cum);

        self.results.push(ape);

        // Forecast-only projection: full charge, no wear derate.
        let battery = BatteryParams {
            wear_capacity_coefficient: 1.0,
            ..Default::default()
        };
        self.battery_soc = joules_to_soc(1.0, &self.energy_pred_cum, &battery);

        println!("  MAE: {mae:.2}");
        println!("  MAPE: {mape:.2}%");
        println!("  MAE cum: {mae_cum:.2}");
        println!("  MAPE cum: {mape_cum:.2}%");
        println!("  R² (energy per time interval): {r2:.2}");
        println!("  R² (accumulated energy): {r2_cum:.2}");
        println!("  AE: {ae:.2}");
        println!("  APE: {ape:.2}%");
        if let Some(&final_soc) = self.battery_soc.last() {
            println!(
                "  Forecasted battery state after flight: {:.2}%",
                final_soc * 100.0
            );
        }
    }

    fn render_plots(&self, flight_id: u32) -> Result<(), Box<dyn Error>> {
        let power_energy_file = self.paths.power_energy_plot_file(flight_id);
        plot_power_energy(
            &power_energy_file.to_string_lossy(),
            flight_id,
            &self.time,
            &self.power,
            &self.power_pred,
            &self.energy_cum,
            &self.energy_pred_cum,
        )?;

        let battery_file = self.paths.battery_plot_file(flight_id);
        plot_battery_soc(
            &battery_file.to_string_lossy(),
            flight_id,
            &self.time,
            &self.battery_soc,
        )?;
        Ok(())
    }

    fn reset(&mut self) {
        self.time = Array1::zeros(0);
        self.battery_soc = Array1::zeros(0);
        self.power = Array1::zeros(0);
        self.energy = Array1::zeros(0);
        self.energy_cum = Array1::zeros(0);
        self.power_pred = Array1::zeros(0);
        self.energy_pred = Array1::zeros(0);
        self.energy_pred_cum = Array1::zeros(0);
    }
}

// src/data_analysis/evaluation.rs
