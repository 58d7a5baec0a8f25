//! Bounded false-position root finding with the Illinois modification.
//!
//! The iteration cap is a fixed budget rather than a convergence guarantee:
//! when it is exhausted the latest estimate is returned as-is. Lock-step
//! callers rely on this to bound the slowest lane.

use crate::traits::Scalar;
use serde::{Deserialize, Serialize};

pub const MAX_ITERATIONS: u32 = 25;
pub const TOLERANCE: f64 = 1.0e-12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverSettings {
    pub max_iterations: u32,
    pub tolerance: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            max_iterations: MAX_ITERATIONS,
            tolerance: TOLERANCE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootResult<T> {
    pub root: T,
    /// Iterations performed; equals `max_iterations` when the budget ran out.
    pub iterations: u32,
}

/// Finds a root of `f` in `[lo, hi]`.
///
/// Both endpoints and the function values are expected to be of order unity,
/// so `tolerance` is used as an absolute bound on the bracket width and on
/// `|f|`. Non-finite evaluations are not trapped.
pub fn regula_falsi<T, F>(mut f: F, lo: T, hi: T, tolerance: T, max_iterations: u32) -> RootResult<T>
where
    T: Scalar,
    F: FnMut(T) -> T,
{
    let two = T::one() + T::one();

    let mut zm = lo;
    let mut zp = hi;
    let mut fm = f(zm);
    let mut fp = f(zp);

    if (zm - zp).abs() < tolerance || fm.abs() + fp.abs() < two * tolerance {
        return RootResult {
            root: (zm + zp) / two,
            iterations: 0,
        };
    }

    let mut z = (zm + zp) / two;
    let mut iterations = max_iterations;
    for iter in 0..max_iterations {
        z = (zm * fp - zp * fm) / (fp - fm);
        let fz = f(z);
        if (zm - zp).abs() < tolerance || fz.abs() < tolerance {
            iterations = iter;
            break;
        }
        if fz * fp < T::zero() {
            zm = zp;
            fm = fp;
        } else {
            // Illinois: halve the retained endpoint so it cannot stall.
            fm = fm / two;
        }
        zp = z;
        fp = fz;
    }

    RootResult {
        root: z,
        iterations,
    }
}

impl SolverSettings {
    pub fn solve<F: FnMut(f64) -> f64>(&self, f: F, lo: f64, hi: f64) -> RootResult<f64> {
        regula_falsi(f, lo, hi, self.tolerance, self.max_iterations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_function_converges_in_one_step() {
        let result = SolverSettings::default().solve(|x| 2.0 * x - 0.5, 0.0, 1.0);
        assert!((result.root - 0.25).abs() < 1e-15);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn finds_square_root_of_two() {
        let result = SolverSettings::default().solve(|x| x * x - 2.0, 0.0, 2.0);
        assert!((result.root - 2f64.sqrt()).abs() < 1e-11);
        assert!(result.iterations < MAX_ITERATIONS);
    }

    #[test]
    fn illinois_handles_one_sided_convexity() {
        // Plain false position creeps in from one side on this function.
        let result = SolverSettings::default().solve(|x: f64| x.powi(10) - 0.5, 0.0, 1.0);
        assert!((result.root - 0.5f64.powf(0.1)).abs() < 1e-11);
    }

    #[test]
    fn budget_caps_iterations() {
        let result = regula_falsi(|x: f64| x.powi(10) - 0.5, 0.0, 1.0, 1e-300, 7);
        assert_eq!(result.iterations, 7);
        assert!(result.root > 0.0 && result.root < 1.0);
    }

    #[test]
    fn collapsed_bracket_skips_iteration() {
        let mut calls = 0;
        let result = SolverSettings::default().solve(
            |x| {
                calls += 1;
                x - 0.3
            },
            0.3,
            0.3,
        );
        assert_eq!(result.iterations, 0);
        assert_eq!(calls, 2);
        assert!((result.root - 0.3).abs() < 1e-15);
    }

    #[test]
    fn works_in_single_precision() {
        let result = regula_falsi(|x: f32| x * x - 0.25, 0.0f32, 1.0, 1e-6, MAX_ITERATIONS);
        assert!((result.root - 0.5).abs() < 1e-5);
    }
}
