// src/data_analysis/battery.rs

use ndarray::Array1;

use crate::constants::{
    BATTERY_TEMP_GRID_C, CAPACITY_PCT_LI_COBALT_OXIDE, CAPACITY_PCT_LI_IRON_PHOSPHATE,
    CAPACITY_PCT_LI_MANGANESE, DEFAULT_AMBIENT_TEMP_C, DEFAULT_NOMINAL_CAPACITY_MAH,
    DEFAULT_PACK_VOLTAGE_V, DEFAULT_WEAR_CAPACITY_COEFFICIENT, JOULES_PER_MAH_VOLT,
};

/// Battery pack description for capacity and state-of-charge conversions.
#[derive(Debug, Clone, Copy)]
pub struct BatteryParams {
    pub temp_c: f64,
    pub nominal_capacity_mah: f64,
    pub pack_voltage_v: f64,
    pub wear_capacity_coefficient: f64,
}

impl Default for BatteryParams {
    fn default() -> Self {
        BatteryParams {
            temp_c: DEFAULT_AMBIENT_TEMP_C,
            nominal_capacity_mah: DEFAULT_NOMINAL_CAPACITY_MAH,
            pack_voltage_v: DEFAULT_PACK_VOLTAGE_V,
            wear_capacity_coefficient: DEFAULT_WEAR_CAPACITY_COEFFICIENT,
        }
    }
}

// --- Natural Cubic Spline over the Temperature Grid ---

/// Second derivatives of the natural cubic spline through (xs, ys).
/// End conditions are zero curvature; the interior tridiagonal system is
/// solved by forward elimination and back substitution.
fn spline_second_derivatives(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let mut m = vec![0.0; n];
    if n < 3 {
        return m;
    }

    let interior = n - 2;
    let mut lower = vec![0.0; interior];
    let mut diag = vec![0.0; interior];
    let mut upper = vec![0.0; interior];
    let mut rhs = vec![0.0; interior];
    for k in 0..interior {
        let i = k + 1;
        let h_prev = xs[i] - xs[i - 1];
        let h_next = xs[i + 1] - xs[i];
        lower[k] = h_prev;
        diag[k] = 2.0 * (h_prev + h_next);
        upper[k] = h_next;
        rhs[k] = 6.0 * ((ys[i + 1] - ys[i]) / h_next - (ys[i] - ys[i - 1]) / h_prev);
    }

    for k in 1..interior {
        let w = lower[k] / diag[k - 1];
        diag[k] -= w * upper[k - 1];
        rhs[k] -= w * rhs[k - 1];
    }

    m[interior] = rhs[interior - 1] / diag[interior - 1];
    for k in (0..interior - 1).rev() {
        m[k + 1] = (rhs[k] - upper[k] * m[k + 2]) / diag[k];
    }
    m
}

/// Evaluates the spline at `x`. Outside the grid the nearest end segment's
/// polynomial is extended.
fn spline_value(xs: &[f64], ys: &[f64], m: &[f64], x: f64) -> f64 {
    let n = xs.len();
    let mut seg = n - 2;
    for i in 0..n - 1 {
        if x < xs[i + 1] {
            seg = i;
            break;
        }
    }

    let h = xs[seg + 1] - xs[seg];
    let t = x - xs[seg];
    let b = (ys[seg + 1] - ys[seg]) / h - h * (2.0 * m[seg] + m[seg + 1]) / 6.0;
    let c = m[seg] / 2.0;
    let d = (m[seg + 1] - m[seg]) / (6.0 * h);
    ys[seg] + b * t + c * t * t + d * t * t * t
}

fn interpolate_capacity_pct(curve: &[f64; 8], temp_c: f64) -> f64 {
    let m = spline_second_derivatives(&BATTERY_TEMP_GRID_C, curve);
    spline_value(&BATTERY_TEMP_GRID_C, curve, &m, temp_c)
}

/// Effective capacity at the given temperature as a fraction of the nominal
/// (25 degC) capacity. Averages the reference curves of three lithium
/// chemistries, spline-interpolated over the temperature grid.
pub fn temperature_efficiency(temp_c: f64) -> f64 {
    let iron = interpolate_capacity_pct(&CAPACITY_PCT_LI_IRON_PHOSPHATE, temp_c);
    let manganese = interpolate_capacity_pct(&CAPACITY_PCT_LI_MANGANESE, temp_c);
    let cobalt = interpolate_capacity_pct(&CAPACITY_PCT_LI_COBALT_OXIDE, temp_c);
    (iron + manganese + cobalt) / 3.0 / 100.0
}

/// Usable pack energy in joules, after temperature and wear derating.
pub fn effective_capacity_joules(params: &BatteryParams) -> f64 {
    params.nominal_capacity_mah
        * params.pack_voltage_v
        * JOULES_PER_MAH_VOLT
        * temperature_efficiency(params.temp_c)
        * params.wear_capacity_coefficient
}

/// Converts a cumulative energy-usage series (J) into a state-of-charge
/// trajectory, as a fraction of effective capacity.
pub fn joules_to_soc(
    initial_fraction: f64,
    usage_joules: &Array1<f64>,
    params: &BatteryParams,
) -> Array1<f64> {
    let capacity = effective_capacity_joules(params);
    let initial_energy = capacity * initial_fraction;
    usage_joules.mapv(|used| (initial_energy - used) / capacity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_efficiency_is_exact_on_grid_points() {
        // Spline interpolation passes through the knots, so grid temperatures
        // reproduce the averaged table values exactly.
        assert_relative_eq!(temperature_efficiency(25.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(
            temperature_efficiency(0.0),
            (97.6 + 97.6 + 93.4) / 3.0 / 100.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            temperature_efficiency(-40.0),
            (46.6 + 36.8 + 11.7) / 3.0 / 100.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_cold_packs_hold_less_than_warm_packs() {
        assert!(temperature_efficiency(-20.0) < temperature_efficiency(0.0));
        assert!(temperature_efficiency(0.0) < temperature_efficiency(25.0));
        assert!(temperature_efficiency(-30.0) < temperature_efficiency(25.0));
    }

    #[test]
    fn test_effective_capacity_defaults() {
        // 4500 mAh * 22.2 V * 3.6 = 359640 J before derating.
        let no_wear = BatteryParams {
            wear_capacity_coefficient: 1.0,
            ..Default::default()
        };
        assert_relative_eq!(effective_capacity_joules(&no_wear), 359_640.0, epsilon = 1e-6);
        assert_relative_eq!(
            effective_capacity_joules(&BatteryParams::default()),
            359_640.0 * 0.8,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_soc_trajectory_decreases_with_usage() {
        let params = BatteryParams {
            wear_capacity_coefficient: 1.0,
            ..Default::default()
        };
        let capacity = effective_capacity_joules(&params);
        let usage = array![0.0, capacity / 4.0, capacity / 2.0];
        let soc = joules_to_soc(1.0, &usage, &params);
        assert_relative_eq!(soc[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(soc[1], 0.75, epsilon = 1e-12);
        assert_relative_eq!(soc[2], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_soc_respects_initial_fraction() {
        let params = BatteryParams {
            wear_capacity_coefficient: 1.0,
            ..Default::default()
        };
        let capacity = effective_capacity_joules(&params);
        let soc = joules_to_soc(0.5, &array![capacity / 4.0], &params);
        assert_relative_eq!(soc[0], 0.25, epsilon = 1e-12);
    }
}

// src/data_analysis/battery.rs
