//! Conversions between the mean, eccentric and true anomalies of an elliptic
//! orbit.
//!
//! Going from the mean anomaly to the eccentric anomaly means solving Kepler's
//! equation `M = E - e sin(E)`, which has no closed form. That step is
//! abstracted behind [KeplerSolver], so callers can pick between the cheap
//! first-order approximation and a converging Newton solve.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::math::intervals::Interval;
use crate::math::root_finding::{newton_plus_bisection, RootFindingError};

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum SolveError {
    /// The solver ran out of iterations. The last estimate is still usable.
    #[error(
        "Kepler solve for M = {mean_anomaly} did not converge in {iterations} iterations \
         (last estimate {last_estimate})"
    )]
    NumericDivergence {
        mean_anomaly: f64,
        last_estimate: f64,
        iterations: usize,
    },
}

impl SolveError {
    pub fn last_estimate(&self) -> f64 {
        match self {
            SolveError::NumericDivergence { last_estimate, .. } => *last_estimate,
        }
    }
}

/// A strategy for solving Kepler's equation for the eccentric anomaly.
pub trait KeplerSolver {
    fn solve(&self, mean_anomaly: f64, e: f64) -> Result<f64, SolveError>;
}


/// A single fixed-point step, `E = M + e sin(M)`.
///
/// This is only accurate to first order in `e`, but it's cheap and never
/// fails. The error grows quickly past e ~ 0.3.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedPointSolver;

impl KeplerSolver for FixedPointSolver {
    fn solve(&self, mean_anomaly: f64, e: f64) -> Result<f64, SolveError> {
        Ok(mean_anomaly + e * mean_anomaly.sin())
    }
}

/// Newton's method, safeguarded by bisection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewtonSolver {
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for NewtonSolver {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 50,
        }
    }
}

impl KeplerSolver for NewtonSolver {
    fn solve(&self, mean_anomaly: f64, e: f64) -> Result<f64, SolveError> {
        debug_assert!((0.0..1.0).contains(&e));

        // Solve near zero and shift back afterwards; E - M is periodic in M.
        let wrapped = wrap_angle(mean_anomaly);
        let offset = mean_anomaly - wrapped;

        if e == 0.0 {
            return Ok(mean_anomaly);
        }

        // E - M = e sin(E), so the root is always within e of M.
        let kepler = |x: f64| (eccentric_to_mean(x, e) - wrapped, 1.0 - e * x.cos());
        let bracket = Interval::new(wrapped - e, wrapped + e);

        match newton_plus_bisection(kepler, bracket, self.tolerance, self.max_iterations) {
            Ok(ecc_anomaly) => Ok(ecc_anomaly + offset),
            Err(RootFindingError::NoConvergence {
                last_estimate,
                iterations,
            }) => Err(SolveError::NumericDivergence {
                mean_anomaly,
                last_estimate: last_estimate + offset,
                iterations,
            }),
            // Can only happen if the bracket reasoning above is wrong, e.g. for
            // NaN input. Fall back to the first-order guess.
            Err(RootFindingError::NotBracketed(_)) => Err(SolveError::NumericDivergence {
                mean_anomaly,
                last_estimate: mean_anomaly + e * mean_anomaly.sin(),
                iterations: 0,
            }),
        }
    }
}

/// Solver selection that can be stored in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum AnomalySolver {
    #[default]
    FixedPoint,
    Newton {
        tolerance: f64,
        max_iterations: usize,
    },
}

impl AnomalySolver {
    pub fn newton() -> Self {
        let NewtonSolver {
            tolerance,
            max_iterations,
        } = NewtonSolver::default();
        AnomalySolver::Newton {
            tolerance,
            max_iterations,
        }
    }
}

impl KeplerSolver for AnomalySolver {
    fn solve(&self, mean_anomaly: f64, e: f64) -> Result<f64, SolveError> {
        match *self {
            AnomalySolver::FixedPoint => FixedPointSolver.solve(mean_anomaly, e),
            AnomalySolver::Newton {
                tolerance,
                max_iterations,
            } => NewtonSolver {
                tolerance,
                max_iterations,
            }
            .solve(mean_anomaly, e),
        }
    }
}

/// Reduces an angle to the range [-pi, pi).
pub fn wrap_angle(angle: f64) -> f64 {
    (angle + PI).rem_euclid(TAU) - PI
}

pub fn eccentric_to_mean(eccentric_anomaly: f64, e: f64) -> f64 {
    eccentric_anomaly - e * eccentric_anomaly.sin()
}

pub fn eccentric_to_true(eccentric_anomaly: f64, e: f64) -> f64 {
    // tan(theta/2) = sqrt((1+e)/(1-e)) * tan(E/2)
    // The result lands in [-pi, pi], regardless of how many turns E has made.
    2.0 * (((1.0 + e) / (1.0 - e)).sqrt() * (eccentric_anomaly / 2.0).tan()).atan()
}

pub fn true_to_eccentric(true_anomaly: f64, e: f64) -> f64 {
    2.0 * (((1.0 - e) / (1.0 + e)).sqrt() * (true_anomaly / 2.0).tan()).atan()
}
