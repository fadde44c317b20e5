use std::f64::consts::TAU;

use nalgebra::Vector3;
use tracing::warn;

use super::elements::OrbitalElements;
use crate::math::anomaly::{eccentric_to_true, FixedPointSolver, KeplerSolver};
use crate::math::sampling::parametric_samples;

/// Where a body is on its orbit at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    pub position: Vector3<f64>,
    pub true_anomaly: f64,
    pub eccentric_anomaly: f64,
    /// False if the Kepler solver gave up and `eccentric_anomaly` is only its
    /// last estimate.
    pub converged: bool,
}

impl OrbitState {
    pub fn radius(&self) -> f64 {
        self.position.norm()
    }
}

/// Turns orbital elements into scene-space positions.
///
/// Holds no state besides the choice of Kepler solver, so a single instance can
/// be shared by every body in a scene.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Propagator<S = FixedPointSolver> {
    solver: S,
}

impl Propagator<FixedPointSolver> {
    pub fn new() -> Self {
        Self {
            solver: FixedPointSolver,
        }
    }
}

impl<S: KeplerSolver> Propagator<S> {
    pub fn with_solver(solver: S) -> Self {
        Self { solver }
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    pub fn state_at_mean_anomaly(&self, elements: &OrbitalElements, mean_anomaly: f64) -> OrbitState {
        let e = elements.eccentricity();

        let (eccentric_anomaly, converged) = match self.solver.solve(mean_anomaly, e) {
            Ok(ecc_anomaly) => (ecc_anomaly, true),
            Err(err) => {
                warn!(error = %err, "Kepler solver gave up, using its last estimate");
                (err.last_estimate(), false)
            }
        };

        let true_anomaly = eccentric_to_true(eccentric_anomaly, e);
        let radius = elements.semimajor_axis() * (1.0 - e * eccentric_anomaly.cos());

        // Position in the orbital plane, then rotated into the scene
        let (sin_theta, cos_theta) = true_anomaly.sin_cos();
        let position = elements
            .basis()
            .to_scene(radius * cos_theta, radius * sin_theta);

        OrbitState {
            position,
            true_anomaly,
            eccentric_anomaly,
            converged,
        }
    }

    /// Accepts any time, including negative ones and ones past the period.
    pub fn state_at_time(&self, elements: &OrbitalElements, time: f64) -> OrbitState {
        self.state_at_mean_anomaly(elements, elements.mean_anomaly_at(time))
    }

    pub fn position_at_time(&self, elements: &OrbitalElements, time: f64) -> Vector3<f64> {
        self.state_at_time(elements, time).position
    }

    /// Returns a closed polyline around the orbit: `segments + 1` points, with
    /// the mean anomaly evenly spaced over a full turn. The first and last
    /// points coincide.
    ///
    /// The iterator is lazy, and can be cloned to walk the path again.
    ///
    /// # Panics
    ///
    /// Panics if `segments` is zero.
    pub fn path<'a>(
        &'a self,
        elements: &'a OrbitalElements,
        segments: usize,
    ) -> impl Iterator<Item = Vector3<f64>> + Clone + 'a {
        let f = move |mean_anomaly: f64| self.state_at_mean_anomaly(elements, mean_anomaly).position;
        parametric_samples(f, 0.0, TAU, segments)
    }

    pub fn build_path(&self, elements: &OrbitalElements, segments: usize) -> Vec<Vector3<f64>> {
        self.path(elements, segments).collect()
    }
}

/// Position at `time`, using the single-step Kepler approximation.
pub fn position_at_time(elements: &OrbitalElements, time: f64) -> Vector3<f64> {
    Propagator::new().position_at_time(elements, time)
}

/// Closed orbit polyline, using the single-step Kepler approximation.
pub fn build_path(elements: &OrbitalElements, segments: usize) -> Vec<Vector3<f64>> {
    Propagator::new().build_path(elements, segments)
}
