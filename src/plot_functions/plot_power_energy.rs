// src/plot_functions/plot_power_energy.rs

use ndarray::Array1;
use ndarray_stats::QuantileExt;
use plotters::style::RGBColor;
use std::error::Error;

use crate::constants::{
    COLOR_ENERGY_PRED, COLOR_ENERGY_TRUE, COLOR_POWER_PRED, COLOR_POWER_TRUE, LINE_WIDTH_PLOT,
};
use crate::plot_framework::{calculate_range, draw_side_by_side_plot, PlotConfig, PlotSeries};
use crate::types::SeriesData;

/// Combined min/max across several series. None when any series is empty or
/// carries NaN, in which case the panel renders a placeholder instead.
fn series_bounds(series: &[&Array1<f64>]) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for arr in series {
        match (arr.min(), arr.max()) {
            (Ok(&min_val), Ok(&max_val)) => {
                lo = lo.min(min_val);
                hi = hi.max(max_val);
            }
            _ => return None,
        }
    }
    Some((lo, hi))
}

/// Generates the side-by-side power and energy figure for one evaluated
/// flight: measured vs forecast power (W) on the left, consumed vs forecast
/// cumulative energy (kJ) on the right, over a common time axis.
pub fn plot_power_energy(
    output_file: &str,
    flight_id: u32,
    time: &Array1<f64>,
    power_true: &Array1<f64>,
    power_pred: &Array1<f64>,
    energy_cum_true: &Array1<f64>,
    energy_cum_pred: &Array1<f64>,
) -> Result<(), Box<dyn Error>> {
    let root_name = format!("Flight {flight_id}");

    let power_true_data: SeriesData = time
        .iter()
        .zip(power_true.iter())
        .map(|(&t, &v)| (t, v))
        .collect();
    let power_pred_data: SeriesData = time
        .iter()
        .zip(power_pred.iter())
        .map(|(&t, &v)| (t, v))
        .collect();
    let energy_true_data: SeriesData = time
        .iter()
        .zip(energy_cum_true.iter())
        .map(|(&t, &v)| (t, v / 1000.0))
        .collect();
    let energy_pred_data: SeriesData = time
        .iter()
        .zip(energy_cum_pred.iter())
        .map(|(&t, &v)| (t, v / 1000.0))
        .collect();

    let time_bounds = series_bounds(&[time]);
    let power_bounds = series_bounds(&[power_true, power_pred]);
    let energy_bounds =
        series_bounds(&[energy_cum_true, energy_cum_pred]).map(|(lo, hi)| (lo / 1000.0, hi / 1000.0));

    let color_power_true: RGBColor = *COLOR_POWER_TRUE;
    let color_power_pred: RGBColor = *COLOR_POWER_PRED;
    let color_energy_true: RGBColor = *COLOR_ENERGY_TRUE;
    let color_energy_pred: RGBColor = *COLOR_ENERGY_PRED;
    let line_stroke_plot = LINE_WIDTH_PLOT;

    draw_side_by_side_plot(
        output_file,
        &root_name,
        ["Power", "Energy"],
        move |panel_index| {
            let (time_min, time_max) = time_bounds?;
            if panel_index == 0 {
                let (power_min, power_max) = power_bounds?;
                let (y_min, y_max) = calculate_range(power_min, power_max);
                Some(PlotConfig {
                    title: "Power".to_string(),
                    x_range: time_min..time_max,
                    y_range: y_min..y_max,
                    series: vec![
                        PlotSeries {
                            data: power_true_data.clone(),
                            label: "Instantaneous power".to_string(),
                            color: color_power_true,
                            stroke_width: line_stroke_plot,
                        },
                        PlotSeries {
                            data: power_pred_data.clone(),
                            label: "Predicted power".to_string(),
                            color: color_power_pred,
                            stroke_width: line_stroke_plot,
                        },
                    ],
                    x_label: "Time [s]".to_string(),
                    y_label: "Power [W]".to_string(),
                })
            } else {
                let (energy_min, energy_max) = energy_bounds?;
                let (y_min, y_max) = calculate_range(energy_min, energy_max);
                Some(PlotConfig {
                    title: "Cumulative Energy".to_string(),
                    x_range: time_min..time_max,
                    y_range: y_min..y_max,
                    series: vec![
                        PlotSeries {
                            data: energy_true_data.clone(),
                            label: "Consumed energy".to_string(),
                            color: color_energy_true,
                            stroke_width: line_stroke_plot,
                        },
                        PlotSeries {
                            data: energy_pred_data.clone(),
                            label: "Predicted energy".to_string(),
                            color: color_energy_pred,
                            stroke_width: line_stroke_plot,
                        },
                    ],
                    x_label: "Time [s]".to_string(),
                    y_label: "Cumulative Energy [kJ]".to_string(),
                })
            }
        },
    )
}

// src/plot_functions/plot_power_energy.rs
