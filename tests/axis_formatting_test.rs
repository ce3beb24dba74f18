// tests/axis_formatting_test.rs

/// Mock Y-axis formatter to test the formatting logic from plot_framework.rs
fn test_y_axis_formatter(y: f64) -> String {
    // This mimics the logic from plot_framework.rs draw_single_chart_with_config
    if y.abs() >= 1_000_000.0 {
        format!("{:.1}M", y / 1_000_000.0)
    } else if y.abs() >= 1000.0 {
        format!("{:.0}k", y / 1000.0)
    } else if y.abs() < 10.0 && y.fract() != 0.0 {
        format!("{:.1}", y)
    } else {
        format!("{:.0}", y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_axis_formatting() {
        // Typical power draws in watts - integers stay plain
        assert_eq!(test_y_axis_formatter(0.0), "0");
        assert_eq!(test_y_axis_formatter(10.0), "10");
        assert_eq!(test_y_axis_formatter(250.0), "250");

        // Small values with fractional parts keep one decimal
        assert_eq!(test_y_axis_formatter(0.5), "0.5");
        assert_eq!(test_y_axis_formatter(5.7), "5.7");
    }

    #[test]
    fn test_battery_percent_axis_formatting() {
        // State-of-charge panels plot 0-100 %, so values round to integers
        assert_eq!(test_y_axis_formatter(100.0), "100");
        assert_eq!(test_y_axis_formatter(97.5), "98");
        assert_eq!(test_y_axis_formatter(62.0), "62");
    }

    #[test]
    fn test_energy_axis_k_and_m_notation() {
        // Cumulative energy grows large enough to need k/M notation
        assert_eq!(test_y_axis_formatter(1000.0), "1k");
        assert_eq!(test_y_axis_formatter(5000.0), "5k");
        assert_eq!(test_y_axis_formatter(12500.0), "12k"); // 12500/1000 = 12.5, formatted with {:.0} = 12

        assert_eq!(test_y_axis_formatter(1_000_000.0), "1.0M");
        assert_eq!(test_y_axis_formatter(2_500_000.0), "2.5M");
    }

    #[test]
    fn test_negative_values_keep_sign() {
        // Regenerative dips below zero must not lose their sign
        assert_eq!(test_y_axis_formatter(-5.7), "-5.7");
        assert_eq!(test_y_axis_formatter(-60.0), "-60");
        assert_eq!(test_y_axis_formatter(-1500.0), "-2k");
    }
}
