// src/plot_functions/plot_flight_route.rs

use plotters::style::RGBColor;
use std::error::Error;

use crate::constants::{COLOR_ROUTE_ALTITUDE, COLOR_ROUTE_TRACK, LINE_WIDTH_PLOT};
use crate::data_input::flight_data::FlightData;
use crate::plot_framework::{calculate_range, draw_side_by_side_plot, PlotConfig, PlotSeries};
use crate::types::SeriesData;

/// Generates the route-overview figure for one flight: ground track (x vs y)
/// on the left, altitude over time on the right. Rows without position values
/// are left out of the respective panel.
pub fn plot_flight_route(output_file: &str, flight: &FlightData) -> Result<(), Box<dyn Error>> {
    let root_name = format!("Flight {} Route", flight.flight_id);

    let mut track_data: SeriesData = Vec::new();
    let mut altitude_data: SeriesData = Vec::new();
    for sample in &flight.samples {
        if let (Some(x), Some(y)) = (sample.x_gps, sample.y_gps) {
            track_data.push((x, y));
        }
        if let Some(z) = sample.z_gps {
            altitude_data.push((sample.time_s, z));
        }
    }

    let mut track_x_min = f64::INFINITY;
    let mut track_x_max = f64::NEG_INFINITY;
    let mut track_y_min = f64::INFINITY;
    let mut track_y_max = f64::NEG_INFINITY;
    for &(x, y) in &track_data {
        track_x_min = track_x_min.min(x);
        track_x_max = track_x_max.max(x);
        track_y_min = track_y_min.min(y);
        track_y_max = track_y_max.max(y);
    }

    let mut alt_time_min = f64::INFINITY;
    let mut alt_time_max = f64::NEG_INFINITY;
    let mut alt_min = f64::INFINITY;
    let mut alt_max = f64::NEG_INFINITY;
    for &(t, z) in &altitude_data {
        alt_time_min = alt_time_min.min(t);
        alt_time_max = alt_time_max.max(t);
        alt_min = alt_min.min(z);
        alt_max = alt_max.max(z);
    }

    let color_track: RGBColor = *COLOR_ROUTE_TRACK;
    let color_altitude: RGBColor = *COLOR_ROUTE_ALTITUDE;
    let line_stroke_plot = LINE_WIDTH_PLOT;

    draw_side_by_side_plot(
        output_file,
        &root_name,
        ["Ground Track", "Altitude"],
        move |panel_index| {
            if panel_index == 0 {
                if track_data.is_empty() || !track_x_min.is_finite() || !track_y_min.is_finite() {
                    return None;
                }
                // Both axes are spatial, pad both.
                let (x_min, x_max) = calculate_range(track_x_min, track_x_max);
                let (y_min, y_max) = calculate_range(track_y_min, track_y_max);
                Some(PlotConfig {
                    title: "Ground Track".to_string(),
                    x_range: x_min..x_max,
                    y_range: y_min..y_max,
                    series: vec![PlotSeries {
                        data: track_data.clone(),
                        label: "Trajectory".to_string(),
                        color: color_track,
                        stroke_width: line_stroke_plot,
                    }],
                    x_label: "x [m]".to_string(),
                    y_label: "y [m]".to_string(),
                })
            } else {
                if altitude_data.is_empty() || !alt_time_min.is_finite() || !alt_min.is_finite() {
                    return None;
                }
                let (y_min, y_max) = calculate_range(alt_min, alt_max);
                Some(PlotConfig {
                    title: "Altitude".to_string(),
                    x_range: alt_time_min..alt_time_max,
                    y_range: y_min..y_max,
                    series: vec![PlotSeries {
                        data: altitude_data.clone(),
                        label: "Height".to_string(),
                        color: color_altitude,
                        stroke_width: line_stroke_plot,
                    }],
                    x_label: "Time [s]".to_string(),
                    y_label: "Height [m]".to_string(),
                })
            }
        },
    )
}

// src/plot_functions/plot_flight_route.rs
