use nalgebra::Vector3;
use tracing::debug;

use super::body::{Body, BodyID, BodyInfo};

use crate::astro::{OrbitState, OrbitalElements, Propagator};
use crate::math::anomaly::{AnomalySolver, KeplerSolver};

/// Registry of every body in a scene, along with the propagator used to move
/// them. Bodies are never removed, so IDs stay valid for the orrery's lifetime.
#[derive(Debug, Clone)]
pub struct Orrery<S = AnomalySolver> {
    bodies: Vec<Body>,
    propagator: Propagator<S>,
    path_segments: usize,
}

impl<S: KeplerSolver> Orrery<S> {
    pub fn new(propagator: Propagator<S>, path_segments: usize) -> Self {
        assert!(
            path_segments >= 1,
            "Orbit paths need at least one segment, path_segments was {}",
            path_segments
        );
        Orrery {
            bodies: vec![],
            propagator,
            path_segments,
        }
    }

    pub fn propagator(&self) -> &Propagator<S> {
        &self.propagator
    }

    pub fn path_segments(&self) -> usize {
        self.path_segments
    }

    pub fn add_body(&mut self, info: BodyInfo, elements: OrbitalElements) -> BodyID {
        let id = BodyID(self.bodies.len());
        let path = self.propagator.build_path(&elements, self.path_segments);
        debug!(id = id.0, name = %info.name, points = path.len(), "Added body");

        self.bodies.push(Body {
            id,
            info,
            elements,
            path,
        });
        id
    }

    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn get_body(&self, id: BodyID) -> Option<&Body> {
        self.bodies.get(id.0)
    }

    /// Looks a body up by name, ignoring case.
    pub fn find_body(&self, name: &str) -> Option<&Body> {
        self.bodies
            .iter()
            .find(|body| body.info.name.eq_ignore_ascii_case(name))
    }

    /// State of a body at the given simulation time. The time goes through
    /// [Body::local_time] first.
    pub fn state_of(&self, id: BodyID, time: f64) -> Option<OrbitState> {
        let body = self.get_body(id)?;
        Some(
            self.propagator
                .state_at_time(&body.elements, body.local_time(time)),
        )
    }

    pub fn position_of(&self, id: BodyID, time: f64) -> Option<Vector3<f64>> {
        self.state_of(id, time).map(|state| state.position)
    }

    pub fn positions_at(&self, time: f64) -> impl Iterator<Item = (BodyID, Vector3<f64>)> + '_ {
        self.bodies.iter().map(move |body| {
            let position = self
                .propagator
                .position_at_time(&body.elements, body.local_time(time));
            (body.id, position)
        })
    }

    pub fn path_of(&self, id: BodyID) -> Option<&[Vector3<f64>]> {
        self.get_body(id).map(Body::path)
    }
}
