// src/constants.rs

// Import specific colors needed
use plotters::style::colors::full_palette::{BLUE, GREEN, LIGHTBLUE, ORANGE, PURPLE, RED};
use plotters::style::RGBColor;

// Plot dimensions.
pub const PLOT_WIDTH: u32 = 1920;
pub const PLOT_HEIGHT: u32 = 1080;

// Sampling interval of the processed flight logs, in seconds. Finite-difference
// features (accelerations) divide by this value.
pub const DEFAULT_SAMPLE_INTERVAL_S: f64 = 0.17;

// --- Battery Pack Defaults ---
pub const DEFAULT_NOMINAL_CAPACITY_MAH: f64 = 4500.0;
pub const DEFAULT_PACK_VOLTAGE_V: f64 = 22.2;
pub const DEFAULT_WEAR_CAPACITY_COEFFICIENT: f64 = 0.8;
pub const DEFAULT_AMBIENT_TEMP_C: f64 = 25.0;
// 1 mAh at 1 V stores 3.6 J.
pub const JOULES_PER_MAH_VOLT: f64 = 3.6;

// Capacity-vs-temperature reference points, percent of nominal capacity.
// One sample per entry of BATTERY_TEMP_GRID_C, per lithium chemistry.
pub const BATTERY_TEMP_GRID_C: [f64; 8] = [-40.0, -20.0, -10.0, 0.0, 25.0, 40.0, 55.0, 60.0];
pub const CAPACITY_PCT_LI_IRON_PHOSPHATE: [f64; 8] =
    [46.6, 74.8, 88.1, 97.6, 100.0, 110.9, 104.4, 99.1];
pub const CAPACITY_PCT_LI_MANGANESE: [f64; 8] =
    [36.8, 68.0, 78.4, 97.6, 100.0, 101.2, 123.5, 110.3];
pub const CAPACITY_PCT_LI_COBALT_OXIDE: [f64; 8] =
    [11.7, 45.2, 73.6, 93.4, 100.0, 97.7, 99.6, 98.6];

// --- Plot Color Assignments ---
pub const COLOR_POWER_TRUE: &RGBColor = &LIGHTBLUE;
pub const COLOR_POWER_PRED: &RGBColor = &PURPLE;
pub const COLOR_ENERGY_TRUE: &RGBColor = &BLUE;
pub const COLOR_ENERGY_PRED: &RGBColor = &RED;
pub const COLOR_BATTERY_SOC: &RGBColor = &GREEN;
pub const COLOR_ROUTE_TRACK: &RGBColor = &ORANGE;
pub const COLOR_ROUTE_ALTITUDE: &RGBColor = &LIGHTBLUE;

// Stroke widths for lines
pub const LINE_WIDTH_PLOT: u32 = 1;
pub const LINE_WIDTH_LEGEND: u32 = 2;

// Font sizes used by the plot framework.
pub const FONT_SIZE_MAIN_TITLE: u32 = 30;
pub const FONT_SIZE_CHART_TITLE: u32 = 20;
pub const FONT_SIZE_AXIS_LABEL: u32 = 12;
pub const FONT_SIZE_LEGEND: u32 = 12;
pub const FONT_SIZE_MESSAGE: u32 = 20;

// src/constants.rs
