use std::f64::consts::TAU;

use nalgebra::{Rotation3, Unit, Vector3};

use crate::math::geometry::{rotation_from_angles, PerifocalBasis};

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ElementsError {
    #[error("semi-major axis must be positive and finite, got {0}")]
    InvalidSemimajorAxis(f64),
    #[error("eccentricity must be in [0, 1), got {0}")]
    InvalidEccentricity(f64),
    #[error("period must be positive and finite, got {0}")]
    InvalidPeriod(f64),
    #[error("{name} must be finite, got {value}")]
    NonFiniteAngle { name: &'static str, value: f64 },
}

/// The six classical elements of a closed (elliptic) orbit.
///
/// Angles are stored in radians. Instances can only be built through
/// [OrbitalElements::new] or [OrbitalElements::from_degrees], so every value
/// of this type describes a valid ellipse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElements {
    a: f64,
    ecc: f64,
    incl: f64,
    lan: f64,
    argp: f64,
    period: f64,
    // Derived from the three angles, cached since it never changes.
    basis: PerifocalBasis,
}

impl OrbitalElements {
    pub fn new(
        a: f64,
        ecc: f64,
        incl: f64,
        lan: f64,
        argp: f64,
        period: f64,
    ) -> Result<Self, ElementsError> {
        if !(a.is_finite() && a > 0.0) {
            return Err(ElementsError::InvalidSemimajorAxis(a));
        }
        if !(0.0..1.0).contains(&ecc) {
            return Err(ElementsError::InvalidEccentricity(ecc));
        }
        if !(period.is_finite() && period > 0.0) {
            return Err(ElementsError::InvalidPeriod(period));
        }
        for (name, value) in [
            ("inclination", incl),
            ("longitude of ascending node", lan),
            ("argument of periapsis", argp),
        ] {
            if !value.is_finite() {
                return Err(ElementsError::NonFiniteAngle { name, value });
            }
        }

        Ok(OrbitalElements {
            a,
            ecc,
            incl,
            lan,
            argp,
            period,
            basis: PerifocalBasis::from_angles(incl, lan, argp),
        })
    }

    /// Same as [OrbitalElements::new], but with the angles in degrees.
    pub fn from_degrees(
        a: f64,
        ecc: f64,
        incl: f64,
        lan: f64,
        argp: f64,
        period: f64,
    ) -> Result<Self, ElementsError> {
        Self::new(
            a,
            ecc,
            incl.to_radians(),
            lan.to_radians(),
            argp.to_radians(),
            period,
        )
    }

    // -- Orbital elements --

    pub fn semimajor_axis(&self) -> f64 {
        self.a
    }

    pub fn eccentricity(&self) -> f64 {
        self.ecc
    }

    pub fn inclination(&self) -> f64 {
        self.incl
    }

    pub fn long_asc_node(&self) -> f64 {
        self.lan
    }

    pub fn arg_periapse(&self) -> f64 {
        self.argp
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    // -- Other geometric characteristics --

    pub fn periapsis(&self) -> f64 {
        self.a * (1.0 - self.ecc)
    }

    pub fn apoapsis(&self) -> f64 {
        self.a * (1.0 + self.ecc)
    }

    pub fn semiminor_axis(&self) -> f64 {
        self.a * (1.0 - self.ecc * self.ecc).sqrt()
    }

    pub fn semilatus_rectum(&self) -> f64 {
        self.a * (1.0 - self.ecc * self.ecc)
    }

    pub fn mean_motion(&self) -> f64 {
        TAU / self.period
    }

    /// M = 2pi t / P. Not reduced mod 2pi.
    pub fn mean_anomaly_at(&self, time: f64) -> f64 {
        TAU * time / self.period
    }

    // -- Axes and vectors --

    pub fn basis(&self) -> &PerifocalBasis {
        &self.basis
    }

    pub fn orientation(&self) -> Rotation3<f64> {
        rotation_from_angles(self.incl, self.lan, self.argp)
    }

    pub fn periapse_vector(&self) -> Unit<Vector3<f64>> {
        Unit::new_normalize(self.basis.p)
    }

    pub fn normal_vector(&self) -> Unit<Vector3<f64>> {
        Unit::new_normalize(self.basis.normal())
    }
}
