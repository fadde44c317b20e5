use nalgebra::{Point3, Vector3};

use crate::astro::OrbitalElements;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BodyID(pub usize);

// All the immutable info about a body
#[derive(Debug, Clone, PartialEq)]
pub struct BodyInfo {
    pub name: String,
    pub radius: f32,
    pub color: Point3<f32>,
    /// Multiplies the scene time before it reaches this body's orbit.
    pub time_scale: f64,
}

#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyID,
    pub info: BodyInfo,
    pub elements: OrbitalElements,
    // Closed polyline around the orbit, computed once when the body is added
    pub(super) path: Vec<Vector3<f64>>,
}

impl Body {
    pub fn path(&self) -> &[Vector3<f64>] {
        &self.path
    }

    /// Scene time as seen by this body: scaled, then reduced into the current
    /// revolution, in [0, period).
    pub fn local_time(&self, time: f64) -> f64 {
        (time * self.info.time_scale).rem_euclid(self.elements.period())
    }
}
