// src/data_analysis/least_squares.rs

use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2};
use std::error::Error;

/// Solves `design · x ≈ target` in the least-squares sense.
///
/// The solve goes through an SVD so a rank-deficient design matrix (collinear
/// predictors, short flights) still yields the minimum-norm solution instead
/// of failing. Singular values below `max(nrows, ncols) · machine-eps · σ_max`
/// are treated as zero.
pub fn solve_least_squares(
    design: &Array2<f64>,
    target: &Array1<f64>,
) -> Result<Array1<f64>, Box<dyn Error>> {
    let (nrows, ncols) = design.dim();
    if nrows == 0 || ncols == 0 {
        return Err("least squares requires a non-empty design matrix".into());
    }
    if nrows != target.len() {
        return Err(format!(
            "design matrix has {} rows but the target vector has {} entries",
            nrows,
            target.len()
        )
        .into());
    }

    let a = DMatrix::from_row_iterator(nrows, ncols, design.iter().cloned());
    let b = DVector::from_iterator(nrows, target.iter().cloned());

    let svd = a.svd(true, true);
    let sigma_max = svd.singular_values.iter().cloned().fold(0.0_f64, f64::max);
    let cutoff = nrows.max(ncols) as f64 * f64::EPSILON * sigma_max;
    let solution = svd
        .solve(&b, cutoff)
        .map_err(|e| format!("least-squares SVD solve failed: {e}"))?;

    Ok(Array1::from_iter(solution.iter().cloned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_exact_square_system() {
        // y = 2 + 3x sampled at x = 0, 1
        let design = array![[1.0, 0.0], [1.0, 1.0]];
        let target = array![2.0, 5.0];
        let beta = solve_least_squares(&design, &target).unwrap();
        assert_relative_eq!(beta[0], 2.0, epsilon = 1e-9);
        assert_relative_eq!(beta[1], 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_overdetermined_consistent_system() {
        // y = 1 + 2a - 0.5b, four noise-free observations
        let design = array![
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [1.0, 0.0, 2.0],
            [1.0, 3.0, 1.0],
        ];
        let target = array![1.0, 3.0, 0.0, 6.5];
        let beta = solve_least_squares(&design, &target).unwrap();
        assert_relative_eq!(beta[0], 1.0, epsilon = 1e-9);
        assert_relative_eq!(beta[1], 2.0, epsilon = 1e-9);
        assert_relative_eq!(beta[2], -0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_inconsistent_system_minimizes_residual() {
        // Intercept-only fit of [1, 2, 3] is their mean.
        let design = array![[1.0], [1.0], [1.0]];
        let target = array![1.0, 2.0, 3.0];
        let beta = solve_least_squares(&design, &target).unwrap();
        assert_relative_eq!(beta[0], 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rank_deficient_returns_minimum_norm_solution() {
        // Two identical columns: any [x, 2 - x] fits; minimum norm is [1, 1].
        let design = array![[1.0, 1.0], [1.0, 1.0]];
        let target = array![2.0, 2.0];
        let beta = solve_least_squares(&design, &target).unwrap();
        assert_relative_eq!(beta[0], 1.0, epsilon = 1e-9);
        assert_relative_eq!(beta[1], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let design = array![[1.0, 0.0], [1.0, 1.0]];
        let target = array![1.0, 2.0, 3.0];
        assert!(solve_least_squares(&design, &target).is_err());
    }

    #[test]
    fn test_empty_design_is_rejected() {
        let design = Array2::<f64>::zeros((0, 3));
        let target = Array1::<f64>::zeros(0);
        assert!(solve_least_squares(&design, &target).is_err());
    }
}

// src/data_analysis/least_squares.rs
