// src/plot_functions/plot_battery_soc.rs

use ndarray::Array1;
use ndarray_stats::QuantileExt;
use plotters::style::RGBColor;
use std::error::Error;

use crate::constants::{COLOR_BATTERY_SOC, LINE_WIDTH_PLOT};
use crate::plot_framework::{calculate_range, draw_single_plot, PlotConfig, PlotSeries};
use crate::types::SeriesData;

/// Generates the forecasted battery state-of-charge figure for one evaluated
/// flight, in percent of effective capacity over time.
pub fn plot_battery_soc(
    output_file: &str,
    flight_id: u32,
    time: &Array1<f64>,
    battery_soc: &Array1<f64>,
) -> Result<(), Box<dyn Error>> {
    let root_name = format!("Flight {flight_id}");

    let soc_data: SeriesData = time
        .iter()
        .zip(battery_soc.iter())
        .map(|(&t, &soc)| (t, soc * 100.0))
        .collect();

    let time_bounds = match (time.min(), time.max()) {
        (Ok(&lo), Ok(&hi)) => Some((lo, hi)),
        _ => None,
    };
    let soc_bounds = match (battery_soc.min(), battery_soc.max()) {
        (Ok(&lo), Ok(&hi)) => Some((lo * 100.0, hi * 100.0)),
        _ => None,
    };

    let color_soc: RGBColor = *COLOR_BATTERY_SOC;
    let line_stroke_plot = LINE_WIDTH_PLOT;

    draw_single_plot(output_file, &root_name, "Battery State", move || {
        let (time_min, time_max) = time_bounds?;
        let (soc_min, soc_max) = soc_bounds?;
        let (y_min, y_max) = calculate_range(soc_min, soc_max);
        Some(PlotConfig {
            title: "Battery State".to_string(),
            x_range: time_min..time_max,
            y_range: y_min..y_max,
            series: vec![PlotSeries {
                data: soc_data.clone(),
                label: "Forecasted state of charge".to_string(),
                color: color_soc,
                stroke_width: line_stroke_plot,
            }],
            x_label: "Time [s]".to_string(),
            y_label: "Battery state [%]".to_string(),
        })
    })
}

// src/plot_functions/plot_battery_soc.rs
